//! Profile archiving.
//!
//! [`Downloader`] drives a whole run: resolve the profile, list its tracks,
//! then fetch artwork and audio for each track in order. Failures on a
//! single asset are logged and counted; only resolution and listing
//! failures abort the run.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::api::{HttpClient, SoundCloudApi};
use crate::config::Config;
use crate::error::{Result, SoundCloudError};
use crate::media;
use crate::models::{Track, User};
use crate::naming;
use crate::throttle::{Pause, Throttle};

/// What happened to one asset of one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// File written in this run.
    Saved,
    /// Destination already existed.
    AlreadyPresent,
    /// No source for this asset.
    Unavailable,
    /// Transfer or lookup failed; logged and skipped.
    Failed,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Resolved profile name.
    pub username: String,
    /// Tracks in the catalog.
    pub total_tracks: usize,
    /// Artwork files written in this run.
    pub artwork_saved: usize,
    /// Audio files written in this run.
    pub audio_saved: usize,
    /// Artwork transfers that failed.
    pub artwork_failed: usize,
    /// Audio lookups or transfers that failed.
    pub audio_failed: usize,
    /// Tracks with no usable audio source.
    pub audio_unavailable: usize,
    /// Destinations skipped because they already existed.
    pub already_present: usize,
}

impl RunSummary {
    fn record_artwork(&mut self, outcome: AssetOutcome) {
        match outcome {
            AssetOutcome::Saved => self.artwork_saved += 1,
            AssetOutcome::AlreadyPresent => self.already_present += 1,
            AssetOutcome::Failed => self.artwork_failed += 1,
            AssetOutcome::Unavailable => {}
        }
    }

    fn record_audio(&mut self, outcome: AssetOutcome) {
        match outcome {
            AssetOutcome::Saved => self.audio_saved += 1,
            AssetOutcome::AlreadyPresent => self.already_present += 1,
            AssetOutcome::Failed => self.audio_failed += 1,
            AssetOutcome::Unavailable => self.audio_unavailable += 1,
        }
    }

    /// Number of files written in this run.
    pub fn files_written(&self) -> usize {
        self.artwork_saved + self.audio_saved
    }

    /// Check if every attempted transfer succeeded.
    pub fn all_successful(&self) -> bool {
        self.artwork_failed == 0 && self.audio_failed == 0
    }
}

/// Stream `url` into `path`, creating parent directories.
///
/// Writes unconditionally; callers check [`naming::already_downloaded`]
/// first. A partially written file is removed on failure. Returns the
/// number of bytes written.
pub async fn download_to(http: &HttpClient, url: &str, path: &Path) -> Result<u64> {
    let response = http.get_stream(url).await?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(path).await?;
    let copied = copy_body(response, &mut file, path).await;
    drop(file);

    if copied.is_err() {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Could not remove partial file {}: {}", path.display(), e);
        }
    }
    copied
}

async fn copy_body(response: reqwest::Response, file: &mut fs::File, path: &Path) -> Result<u64> {
    let transfer_error = |reason: String| SoundCloudError::Transfer {
        path: path.to_path_buf(),
        reason,
    };

    let mut written = 0u64;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk: bytes::Bytes = chunk.map_err(|e| transfer_error(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| transfer_error(e.to_string()))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|e| transfer_error(e.to_string()))?;
    Ok(written)
}

/// Archives every track of one profile.
///
/// # Example
///
/// ```rust,no_run
/// use soundsweep::{Config, Downloader};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::new("your_client_id", "https://soundcloud.com/someone")?
///         .with_output_dir("downloads");
///     let summary = Downloader::new(config)?.run().await?;
///     println!("Saved {} audio files", summary.audio_saved);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Downloader {
    api: SoundCloudApi,
    throttle: Throttle,
    artwork_dir: PathBuf,
    audio_dir: PathBuf,
    config: Config,
}

impl Downloader {
    /// Create a downloader for a configured run.
    pub fn new(config: Config) -> Result<Self> {
        let api = SoundCloudApi::new(&config)?;
        Ok(Self::with_api(api, config))
    }

    /// Create a downloader around an existing API client.
    pub fn with_api(api: SoundCloudApi, config: Config) -> Self {
        Self {
            api,
            throttle: Throttle::new(config.throttle),
            artwork_dir: config.artwork_dir(),
            audio_dir: config.audio_dir(),
            config,
        }
    }

    /// The API client in use.
    pub fn api(&self) -> &SoundCloudApi {
        &self.api
    }

    /// The run configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the configured profile.
    pub async fn resolve(&self) -> Result<User> {
        info!("Resolving user {}", self.config.profile_url);
        let user = self.api.resolve_user(&self.config.profile_url).await?;
        info!("User: {} (#{})", user.username, user.id);
        Ok(user)
    }

    /// Resolve the profile and list its catalog without downloading anything.
    pub async fn catalog(&self) -> Result<(User, Vec<Track>)> {
        let user = self.resolve().await?;
        info!("Fetching tracks");
        let tracks = self.api.list_tracks(user.id).await?;
        info!("Found {} tracks", tracks.len());
        Ok((user, tracks))
    }

    /// Run the whole archive: resolve, list, then process each track.
    ///
    /// # Errors
    ///
    /// Fails only if the profile cannot be resolved or the catalog cannot
    /// be listed. Per-track failures are counted in the summary.
    pub async fn run(&self) -> Result<RunSummary> {
        let (user, tracks) = self.catalog().await?;

        let mut summary = RunSummary {
            username: user.username,
            total_tracks: tracks.len(),
            ..Default::default()
        };

        for track in &tracks {
            self.process_track(track, &mut summary).await;
        }

        info!(
            "Done. Saved {} artwork and {} audio file(s) in {}",
            summary.artwork_saved,
            summary.audio_saved,
            self.config.output_dir.display()
        );
        Ok(summary)
    }

    /// Fetch artwork then audio for one track, recording both outcomes.
    pub async fn process_track(&self, track: &Track, summary: &mut RunSummary) {
        let stem = naming::track_file_stem(track);

        let artwork = self.download_artwork(track, &stem).await;
        summary.record_artwork(artwork);

        let audio = self.download_audio(track, &stem).await;
        summary.record_audio(audio);
    }

    /// Fetch a track's artwork unless it is missing or already on disk.
    pub async fn download_artwork(&self, track: &Track, stem: &str) -> AssetOutcome {
        let Some(url) = media::best_artwork_url(track) else {
            debug!("No artwork for {}", stem);
            return AssetOutcome::Unavailable;
        };

        let path = naming::artwork_path(&self.artwork_dir, stem, media::artwork_extension(&url));
        if naming::already_downloaded(&path) {
            debug!("Artwork already present: {}", path.display());
            return AssetOutcome::AlreadyPresent;
        }

        info!("Artwork ↓ {}", stem);
        let outcome = match download_to(self.api.http(), &url, &path).await {
            Ok(_) => AssetOutcome::Saved,
            Err(e) => {
                warn!("Artwork failed {}: {}", stem, e);
                AssetOutcome::Failed
            }
        };
        self.throttle.pause(Pause::Artwork).await;
        outcome
    }

    /// Fetch a track's audio unless no source exists or it is already on disk.
    pub async fn download_audio(&self, track: &Track, stem: &str) -> AssetOutcome {
        let url = match self.api.resolve_audio_url(track).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                info!("No downloadable/progressive audio for {}", stem);
                return AssetOutcome::Unavailable;
            }
            Err(e) => {
                warn!("Audio lookup failed {}: {}", stem, e);
                return AssetOutcome::Failed;
            }
        };

        let path = naming::audio_path(&self.audio_dir, stem);
        if naming::already_downloaded(&path) {
            debug!("Audio already present: {}", path.display());
            return AssetOutcome::AlreadyPresent;
        }

        info!("Audio ↓ {}", stem);
        let outcome = match download_to(self.api.http(), &url, &path).await {
            Ok(_) => AssetOutcome::Saved,
            Err(e) => {
                warn!("Audio failed {}: {}", stem, e);
                AssetOutcome::Failed
            }
        };
        self.throttle.pause(Pause::Audio).await;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThrottleConfig;
    use crate::models::TrackOwner;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serve one raw HTTP response: headers, then `chunks` spaced by `gap`,
    /// then close. `content_length` may overstate the body to cut it short.
    async fn serve_raw(content_length: usize, chunks: Vec<Vec<u8>>, gap: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = tokio::io::AsyncReadExt::read(&mut socket, &mut request).await;

            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: audio/mpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                content_length
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            for chunk in chunks {
                tokio::time::sleep(gap).await;
                if socket.write_all(&chunk).await.is_err() {
                    return;
                }
                let _ = socket.flush().await;
            }
            let _ = socket.shutdown().await;
        });

        format!("http://{}/cdn/file.mp3", addr)
    }

    fn test_downloader(server: &MockServer, out: &Path) -> Downloader {
        let config = Config::new("test-client", "https://soundcloud.com/someone")
            .unwrap()
            .with_api_base(server.uri())
            .with_output_dir(out)
            .with_throttle(ThrottleConfig::disabled());
        Downloader::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_download_to_creates_parent_dirs() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/cdn/file.mp3"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
            .mount(&mock_server)
            .await;

        let http = HttpClient::new().unwrap();
        let dest = temp_dir.path().join("a/b/file.mp3");
        let written = download_to(&http, &format!("{}/cdn/file.mp3", mock_server.uri()), &dest)
            .await
            .unwrap();

        assert_eq!(written, 4096);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![7u8; 4096]);
    }

    #[tokio::test]
    async fn test_download_to_http_error_writes_nothing() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let http = HttpClient::new().unwrap();
        let dest = temp_dir.path().join("missing.jpg");
        let err = download_to(&http, &format!("{}/gone.jpg", mock_server.uri()), &dest)
            .await
            .unwrap_err();

        assert!(err.is_network());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_steady_stream_outlives_timeout() {
        let temp_dir = TempDir::new().unwrap();
        let chunks: Vec<Vec<u8>> = (0..8).map(|i| vec![i as u8; 512]).collect();
        let url = serve_raw(8 * 512, chunks, Duration::from_millis(100)).await;

        // Each gap stays under the timeout; the whole body does not.
        let http = HttpClient::with_timeout(Duration::from_millis(400)).unwrap();
        let dest = temp_dir.path().join("audio/slow.mp3");
        let start = std::time::Instant::now();
        let written = download_to(&http, &url, &dest).await.unwrap();

        assert!(start.elapsed() > Duration::from_millis(400));
        assert_eq!(written, 8 * 512);
        assert_eq!(std::fs::metadata(&dest).unwrap().len(), 8 * 512);
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let url = serve_raw(4096, vec![vec![1u8; 1024]], Duration::from_millis(10)).await;

        let http = HttpClient::new().unwrap();
        let dest = temp_dir.path().join("audio/cut.mp3");
        let err = download_to(&http, &url, &dest).await.unwrap_err();

        assert!(matches!(err, SoundCloudError::Transfer { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_no_artwork_sources_makes_no_request() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let downloader = test_downloader(&mock_server, temp_dir.path());
        let track = Track {
            id: 3,
            title: Some("Bare".to_string()),
            user: Some(TrackOwner::default()),
            ..Default::default()
        };

        let outcome = downloader.download_artwork(&track, "Bare - 3").await;
        assert_eq!(outcome, AssetOutcome::Unavailable);
        assert!(!temp_dir.path().join("artwork").exists());
    }

    #[tokio::test]
    async fn test_existing_artwork_is_not_refetched() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .expect(0)
            .mount(&mock_server)
            .await;

        let downloader = test_downloader(&mock_server, temp_dir.path());
        let track = Track {
            id: 3,
            artwork_url: Some(format!("{}/artworks-a-large.jpg", mock_server.uri())),
            ..Default::default()
        };

        let existing = temp_dir.path().join("artwork/untitled - 3.jpg");
        std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
        std::fs::write(&existing, b"old").unwrap();

        let outcome = downloader.download_artwork(&track, "untitled - 3").await;
        assert_eq!(outcome, AssetOutcome::AlreadyPresent);
        assert_eq!(std::fs::read(&existing).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_failed_audio_is_counted_not_fatal() {
        let mock_server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/tracks/9/download"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let downloader = test_downloader(&mock_server, temp_dir.path());
        let track = Track {
            id: 9,
            title: Some("Broken".to_string()),
            downloadable: Some(true),
            download_url: Some(format!("{}/tracks/9/download", mock_server.uri())),
            ..Default::default()
        };

        let mut summary = RunSummary::default();
        downloader.process_track(&track, &mut summary).await;

        assert_eq!(summary.audio_failed, 1);
        assert_eq!(summary.audio_saved, 0);
        assert!(!summary.all_successful());
        assert!(!temp_dir.path().join("audio/Broken - 9.mp3").exists());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record_artwork(AssetOutcome::Saved);
        summary.record_artwork(AssetOutcome::AlreadyPresent);
        summary.record_audio(AssetOutcome::Saved);
        summary.record_audio(AssetOutcome::Unavailable);

        assert_eq!(summary.files_written(), 2);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.audio_unavailable, 1);
        assert!(summary.all_successful());
    }
}
