//! Track models.
//!
//! Only the fields needed to pick artwork and audio sources are kept;
//! everything else in the API payload is ignored.

use serde::{Deserialize, Serialize};

use super::null_as_default;
use super::user::TrackOwner;

/// Delivery format of a transcoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscodingFormat {
    /// "progressive" or "hls".
    #[serde(default, deserialize_with = "null_as_default")]
    pub protocol: String,

    /// e.g. `audio/mpeg`, `audio/ogg; codecs="opus"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub mime_type: String,
}

/// One encoding of a track's audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transcoding {
    /// Metadata endpoint returning the signed media URL, not the media itself.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    /// Delivery protocol and MIME type.
    #[serde(default, deserialize_with = "null_as_default")]
    pub format: TranscodingFormat,
}

impl Transcoding {
    /// Whether this is a single-file MP3 stream.
    pub fn is_progressive_mp3(&self) -> bool {
        self.format.protocol == "progressive" && self.format.mime_type.contains("audio/mpeg")
    }
}

/// Media block of a track.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Media {
    /// Available encodings, in API order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub transcodings: Vec<Transcoding>,
}

/// A track record as returned by the catalog endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Stable numeric track ID.
    pub id: u64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub artwork_url: Option<String>,

    #[serde(default)]
    pub downloadable: Option<bool>,

    /// Direct original-file download endpoint (only meaningful when downloadable).
    #[serde(default)]
    pub download_url: Option<String>,

    #[serde(default)]
    pub media: Option<Media>,

    /// Track owner.
    #[serde(default)]
    pub user: Option<TrackOwner>,
}

impl Track {
    /// Title, or `untitled` when missing or blank.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => "untitled",
        }
    }

    /// Whether the owner enabled direct downloads.
    pub fn is_downloadable(&self) -> bool {
        self.downloadable.unwrap_or(false)
    }

    /// Transcodings in API order (empty when the media block is absent).
    pub fn transcodings(&self) -> &[Transcoding] {
        self.media
            .as_ref()
            .map(|m| m.transcodings.as_slice())
            .unwrap_or(&[])
    }

    /// Owner's avatar URL.
    pub fn owner_avatar_url(&self) -> Option<&str> {
        self.user.as_ref().and_then(|u| u.avatar_url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_from_api_payload() {
        let json = r#"{
            "id": 42,
            "kind": "track",
            "title": "Night Drive",
            "artwork_url": null,
            "downloadable": false,
            "download_url": null,
            "media": {
                "transcodings": [
                    {
                        "url": "https://api-v2.soundcloud.com/media/soundcloud:tracks:42/aaa/stream/hls",
                        "preset": "mp3_0_0",
                        "format": { "protocol": "hls", "mime_type": "audio/mpeg" }
                    },
                    {
                        "url": "https://api-v2.soundcloud.com/media/soundcloud:tracks:42/bbb/stream/progressive",
                        "preset": "mp3_0_0",
                        "format": { "protocol": "progressive", "mime_type": "audio/mpeg" }
                    }
                ]
            },
            "user": { "id": 7, "username": "someone", "avatar_url": "https://i1.sndcdn.com/avatars-x-large.jpg" }
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.id, 42);
        assert_eq!(track.display_title(), "Night Drive");
        assert!(!track.is_downloadable());
        assert_eq!(track.transcodings().len(), 2);
        assert!(!track.transcodings()[0].is_progressive_mp3());
        assert!(track.transcodings()[1].is_progressive_mp3());
        assert_eq!(
            track.owner_avatar_url(),
            Some("https://i1.sndcdn.com/avatars-x-large.jpg")
        );
    }

    #[test]
    fn test_sparse_track() {
        let track: Track = serde_json::from_str(r#"{"id": 9, "title": "  ", "media": null}"#).unwrap();
        assert_eq!(track.display_title(), "untitled");
        assert!(track.transcodings().is_empty());
        assert_eq!(track.owner_avatar_url(), None);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let track: Track = serde_json::from_str(
            r#"{"id": 2, "media": {"transcodings": null}}"#,
        )
        .unwrap();
        assert!(track.transcodings().is_empty());

        let track: Track = serde_json::from_str(
            r#"{"id": 3, "media": {"transcodings": [
                {"url": null, "format": null},
                {"url": "u", "format": {"protocol": null, "mime_type": "audio/mpeg"}}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(track.transcodings().len(), 2);
        assert_eq!(track.transcodings()[0].url, "");
        assert_eq!(track.transcodings()[1].format.protocol, "");
        assert!(!track.transcodings()[1].is_progressive_mp3());
    }

    #[test]
    fn test_opus_is_not_progressive_mp3() {
        let t = Transcoding {
            url: "u".to_string(),
            format: TranscodingFormat {
                protocol: "progressive".to_string(),
                mime_type: "audio/ogg; codecs=\"opus\"".to_string(),
            },
        };
        assert!(!t.is_progressive_mp3());
    }
}
