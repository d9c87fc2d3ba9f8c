//! Public SoundCloud API client.
//!
//! Covers the three endpoints an archive run needs: resolving a profile URL,
//! paging through a user's tracks and exchanging a transcoding for a signed
//! stream URL. All of them take the `client_id` credential as a query param.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::http::HttpClient;
use crate::config::Config;
use crate::error::{Result, SoundCloudError};
use crate::media::{self, AudioSource};
use crate::models::{Track, User};
use crate::throttle::{Pause, Throttle};

/// One page of a user's catalog.
#[derive(Debug, Clone, Default)]
pub struct TracksPage {
    /// Tracks that decoded, in API order.
    pub tracks: Vec<Track>,
    /// Items the API returned, decodable or not. Drives the next offset.
    pub item_count: usize,
}

/// Public SoundCloud API client.
///
/// # Example
///
/// ```rust,no_run
/// use soundsweep::{Config, SoundCloudApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new("your_client_id", "https://soundcloud.com/someone")?;
///     let api = SoundCloudApi::new(&config)?;
///     let user = api.resolve_user(&config.profile_url).await?;
///     let tracks = api.list_tracks(user.id).await?;
///     println!("{} has {} tracks", user.username, tracks.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SoundCloudApi {
    http: HttpClient,
    api_base: String,
    client_id: String,
    page_size: u32,
    throttle: Throttle,
}

impl SoundCloudApi {
    /// Create a client from a run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_http(HttpClient::new()?, config))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_http(http: HttpClient, config: &Config) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            client_id: config.client_id.clone(),
            page_size: config.page_size,
            throttle: Throttle::new(config.throttle),
        }
    }

    /// The credential appended to API calls.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Map a public profile URL to a user record.
    ///
    /// # Errors
    ///
    /// Returns `Resolution` if the response carries no numeric `id`.
    pub async fn resolve_user(&self, profile_url: &str) -> Result<User> {
        let url = format!("{}/resolve", self.api_base);
        let data = self
            .http
            .get_json(&url, &[("url", profile_url), ("client_id", self.client_id.as_str())])
            .await?;

        if data.get("id").and_then(Value::as_u64).is_none() {
            return Err(SoundCloudError::Resolution(format!(
                "no user id returned for {}",
                profile_url
            )));
        }

        Ok(serde_json::from_value(data)?)
    }

    /// Fetch one page of a user's tracks.
    ///
    /// Returns `None` when the body is not a track sequence. Both a bare JSON
    /// array and the `{"collection": [...]}` envelope are accepted. Items
    /// that do not decode as tracks are logged and skipped.
    pub async fn fetch_tracks_page(&self, user_id: u64, offset: usize) -> Result<Option<TracksPage>> {
        let url = format!("{}/users/{}/tracks", self.api_base, user_id);
        let limit = self.page_size.to_string();
        let offset_param = offset.to_string();
        let data = self
            .http
            .get_json(
                &url,
                &[
                    ("client_id", self.client_id.as_str()),
                    ("limit", limit.as_str()),
                    ("offset", offset_param.as_str()),
                ],
            )
            .await?;

        let items = match data {
            Value::Array(items) => items,
            Value::Object(mut obj) => match obj.remove("collection") {
                Some(Value::Array(items)) => items,
                _ => return Ok(None),
            },
            _ => return Ok(None),
        };

        let item_count = items.len();
        let tracks = items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| match serde_json::from_value::<Track>(item) {
                Ok(track) => Some(track),
                Err(e) => {
                    warn!("Skipping undecodable track at offset {}: {}", offset + i, e);
                    None
                }
            })
            .collect();

        Ok(Some(TracksPage { tracks, item_count }))
    }

    /// Fetch a user's whole catalog, page by page, in API order.
    ///
    /// Stops on an empty page, a short page or a non-sequence body, pausing
    /// between full pages.
    pub async fn list_tracks(&self, user_id: u64) -> Result<Vec<Track>> {
        let mut all_tracks = Vec::new();
        let mut offset = 0usize;

        loop {
            let page = match self.fetch_tracks_page(user_id, offset).await? {
                Some(page) if page.item_count > 0 => page,
                _ => break,
            };

            let count = page.item_count;
            debug!("Fetched {} tracks at offset {}", count, offset);
            all_tracks.extend(page.tracks);
            offset += count;

            if count < self.page_size as usize {
                break;
            }
            self.throttle.pause(Pause::Page).await;
        }

        info!("Listed {} tracks for user {}", all_tracks.len(), user_id);
        Ok(all_tracks)
    }

    /// Exchange a transcoding metadata URL for the signed stream URL.
    ///
    /// Returns `None` if the response has no `url` field.
    pub async fn progressive_stream_url(&self, transcoding_url: &str) -> Result<Option<String>> {
        let data = self
            .http
            .get_json(transcoding_url, &[("client_id", self.client_id.as_str())])
            .await?;

        Ok(data
            .get("url")
            .and_then(Value::as_str)
            .filter(|u| !u.is_empty())
            .map(str::to_string))
    }

    /// Work out the final audio URL for a track.
    ///
    /// Direct downloads need no extra request; progressive transcodings cost
    /// exactly one metadata call.
    pub async fn resolve_audio_url(&self, track: &Track) -> Result<Option<String>> {
        match media::select_audio_source(track, &self.client_id) {
            Some(AudioSource::Direct(url)) => Ok(Some(url)),
            Some(AudioSource::Progressive(transcoding_url)) => {
                let url = self.progressive_stream_url(&transcoding_url).await?;
                if url.is_none() {
                    warn!("Transcoding for track {} returned no stream URL", track.id);
                }
                Ok(url)
            }
            None => Ok(None),
        }
    }
}
