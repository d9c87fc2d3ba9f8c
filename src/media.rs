//! Artwork and audio source selection.
//!
//! Everything here is pure: it looks at a [`Track`] snapshot and decides
//! where artwork and audio should come from. The one network hop needed for
//! progressive transcodings lives in [`SoundCloudApi`](crate::SoundCloudApi).

use reqwest::Url;

use crate::models::Track;

/// Suffix rewrites from the default CDN size to 500x500.
const ARTWORK_UPSCALES: [(&str, &str); 2] = [
    ("-large.jpg", "-t500x500.jpg"),
    ("-large.png", "-t500x500.png"),
];

/// Where a track's audio will come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Original upload, credential already appended.
    Direct(String),
    /// Transcoding metadata endpoint to ask for a signed stream URL.
    Progressive(String),
}

impl AudioSource {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            AudioSource::Direct(_) => "download",
            AudioSource::Progressive(_) => "progressive",
        }
    }
}

/// Rewrite `-large` CDN artwork URLs to the 500x500 variant.
///
/// Purely textual; other URLs come back unchanged.
pub fn upscale_artwork_url(url: &str) -> String {
    ARTWORK_UPSCALES
        .iter()
        .fold(url.to_string(), |acc, (from, to)| acc.replacen(from, to, 1))
}

/// Best artwork URL: the track's own artwork, else the owner's avatar.
pub fn best_artwork_url(track: &Track) -> Option<String> {
    let raw = non_empty(track.artwork_url.as_deref()).or_else(|| non_empty(track.owner_avatar_url()))?;
    Some(upscale_artwork_url(raw))
}

/// File extension for an artwork URL.
pub fn artwork_extension(url: &str) -> &'static str {
    if url.ends_with(".png") {
        "png"
    } else {
        "jpg"
    }
}

/// Append `client_id` as a query parameter.
pub fn with_client_id(url: &str, client_id: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.query_pairs_mut().append_pair("client_id", client_id);
            parsed.to_string()
        }
        Err(_) => {
            let sep = if url.contains('?') { '&' } else { '?' };
            format!("{}{}client_id={}", url, sep, client_id)
        }
    }
}

/// Choose the audio source for a track without touching the network.
///
/// A downloadable track with a download URL always wins; otherwise the
/// first progressive MP3 transcoding is used.
pub fn select_audio_source(track: &Track, client_id: &str) -> Option<AudioSource> {
    if track.is_downloadable() {
        if let Some(url) = non_empty(track.download_url.as_deref()) {
            return Some(AudioSource::Direct(with_client_id(url, client_id)));
        }
    }

    track
        .transcodings()
        .iter()
        .find(|t| t.is_progressive_mp3() && !t.url.is_empty())
        .map(|t| AudioSource::Progressive(t.url.clone()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
