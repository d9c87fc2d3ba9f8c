//! Data models for SoundCloud API responses.

use serde::{Deserialize, Deserializer};

pub mod track;
pub mod user;

pub use track::{Media, Track, Transcoding, TranscodingFormat};
pub use user::{TrackOwner, User};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
