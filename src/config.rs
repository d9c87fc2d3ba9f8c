//! Run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SoundCloudError};

/// Default base URL for the SoundCloud v2 API.
pub const DEFAULT_API_BASE: &str = "https://api-v2.soundcloud.com";

/// Default number of tracks requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Fixed pauses inserted between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Pause after each catalog page.
    pub page: Duration,
    /// Pause after each attempted artwork transfer.
    pub artwork: Duration,
    /// Pause after each attempted audio transfer.
    pub audio: Duration,
}

impl ThrottleConfig {
    /// No pauses at all.
    pub fn disabled() -> Self {
        Self {
            page: Duration::ZERO,
            artwork: Duration::ZERO,
            audio: Duration::ZERO,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            page: Duration::from_millis(300),
            artwork: Duration::from_millis(200),
            audio: Duration::from_millis(400),
        }
    }
}

/// Everything a run needs, built once at program entry.
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential sent as the `client_id` query parameter.
    pub client_id: String,
    /// Public profile URL to archive.
    pub profile_url: String,
    /// Root of the download tree.
    pub output_dir: PathBuf,
    /// API base URL, without trailing slash.
    pub api_base: String,
    /// Tracks per catalog page.
    pub page_size: u32,
    /// Fixed pauses between requests.
    pub throttle: ThrottleConfig,
}

impl Config {
    /// Create a configuration with default output dir, API base and delays.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the credential or profile URL is empty.
    pub fn new<S1: Into<String>, S2: Into<String>>(client_id: S1, profile_url: S2) -> Result<Self> {
        let client_id = client_id.into().trim().to_string();
        let profile_url = profile_url.into().trim().to_string();

        if client_id.is_empty() {
            return Err(SoundCloudError::Config("missing CLIENT_ID".to_string()));
        }
        if profile_url.is_empty() {
            return Err(SoundCloudError::Config("missing PROFILE_URL".to_string()));
        }

        Ok(Self {
            client_id,
            profile_url,
            output_dir: PathBuf::from("downloads"),
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            throttle: ThrottleConfig::default(),
        })
    }

    /// Set the root of the download tree.
    pub fn with_output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Point the client at a different API host.
    pub fn with_api_base<S: Into<String>>(mut self, base: S) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the catalog page size (at least 1).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replace the fixed delays.
    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    /// Directory holding cover images.
    pub fn artwork_dir(&self) -> PathBuf {
        self.output_dir.join("artwork")
    }

    /// Directory holding audio files.
    pub fn audio_dir(&self) -> PathBuf {
        self.output_dir.join("audio")
    }
}
