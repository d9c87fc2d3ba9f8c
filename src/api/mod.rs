//! API clients for SoundCloud.
//!
//! - [`HttpClient`]: shared GET wrapper with timeout and user agent
//! - [`SoundCloudApi`]: resolve, catalog paging and transcoding lookups

pub mod http;
pub mod public;

pub use http::HttpClient;
pub use public::{SoundCloudApi, TracksPage};
