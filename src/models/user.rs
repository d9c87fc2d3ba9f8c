//! User models.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A resolved SoundCloud user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Internal numeric user ID.
    pub id: u64,

    /// Display/handle name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// Profile picture URL.
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Public profile URL.
    #[serde(default)]
    pub permalink_url: Option<String>,
}

/// Track owner as embedded in a track record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackOwner {
    #[serde(default)]
    pub id: Option<u64>,

    #[serde(default)]
    pub username: Option<String>,

    /// Fallback artwork source when the track has no artwork of its own.
    #[serde(default)]
    pub avatar_url: Option<String>,
}
