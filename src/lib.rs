//! # Soundsweep
//!
//! A Rust library for archiving every track and cover image of a SoundCloud
//! profile to a local directory.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soundsweep::{Config, Downloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("your_client_id", "https://soundcloud.com/someone")?
//!         .with_output_dir("downloads");
//!
//!     let summary = Downloader::new(config)?.run().await?;
//!     println!(
//!         "Saved {} artwork and {} audio file(s)",
//!         summary.artwork_saved, summary.audio_saved
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Layout on disk
//!
//! - `<output_dir>/artwork/<title> - <id>.jpg|png`
//! - `<output_dir>/audio/<title> - <id>.mp3`
//!
//! Existing files are never overwritten, so re-running only fetches what is new.
//!
//! ## Low-Level APIs
//!
//! - [`SoundCloudApi`] - resolve, catalog paging, transcoding lookups
//! - [`media`] - artwork and audio source selection
//! - [`naming`] - filename sanitization and destination paths

pub mod api;
pub mod config;
mod downloader;
pub mod error;
pub mod media;
pub mod models;
pub mod naming;
pub mod throttle;

// Main interface (recommended)
pub use downloader::{download_to, AssetOutcome, Downloader, RunSummary};

// Low-level APIs
pub use api::{HttpClient, SoundCloudApi};
pub use config::{Config, ThrottleConfig};
pub use error::SoundCloudError;
pub use models::{Track, Transcoding, User};
