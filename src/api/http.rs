//! Shared HTTP client.
//!
//! Every request goes through [`HttpClient`], which applies a fixed timeout
//! and identifying user agent and turns non-success statuses into errors.
//! JSON calls get a whole-request deadline; streamed downloads only an idle
//! deadline, so a long transfer that keeps receiving bytes is never cut.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{Result, SoundCloudError};

/// Connect, idle-read and JSON request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("soundsweep/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept for reporting.
const MAX_ERROR_BODY: usize = 500;

/// Thin wrapper over [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Build a client with the fixed timeout and user agent.
    pub fn new() -> Result<Self> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    /// Build a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Send a GET and fail on non-success statuses.
    ///
    /// `deadline` bounds the whole exchange, body included.
    async fn send(
        &self,
        url: &str,
        params: &[(&str, &str)],
        deadline: Option<Duration>,
    ) -> Result<Response> {
        debug!("GET {}", without_query(url));

        let mut request = self.client.get(url).query(params);
        if let Some(deadline) = deadline {
            request = request.timeout(deadline);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
            body.push_str("...");
        }
        error!("GET {} failed with status {}", without_query(url), status);

        Err(SoundCloudError::Status {
            url: without_query(url).to_string(),
            status: status.as_u16(),
            body,
        })
    }

    /// GET and decode the body as JSON.
    pub async fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<Value> {
        let response = self.send(url, params, Some(self.timeout)).await?;
        Ok(response.json::<Value>().await?)
    }

    /// GET and hand back the response for streaming its body.
    ///
    /// Only connect and idle-read timeouts apply.
    pub async fn get_stream(&self, url: &str) -> Result<Response> {
        self.send(url, &[], None).await
    }
}

/// URL with its query string dropped, for logs and errors.
fn without_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
