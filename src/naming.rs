//! Destination paths.
//!
//! A track's files are named `<title> - <id>`, sanitized and capped, under
//! `artwork/` or `audio/`. The path doubles as the idempotency key: if it
//! exists, the asset counts as downloaded.

use std::path::{Path, PathBuf};

use crate::models::Track;

/// Maximum length of a file stem, in characters.
pub const MAX_STEM_CHARS: usize = 120;

/// Characters never allowed in a filename.
const ILLEGAL_CHARS: [char; 9] = ['/', '?', '<', '>', '\\', ':', '*', '|', '"'];

/// Windows device names, matched case-insensitively with or without extension.
const WINDOWS_RESERVED: [&str; 4] = ["con", "prn", "aux", "nul"];

/// Strip characters and names that are unsafe in a filename.
///
/// Illegal and control characters are removed, names made only of dots
/// or matching a Windows device name become empty, and trailing dots and
/// spaces are trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .filter(|c| !is_control(*c))
        .collect();

    if cleaned.chars().all(|c| c == '.') || is_windows_reserved(&cleaned) {
        return String::new();
    }

    cleaned.trim_end_matches(['.', ' ']).to_string()
}

fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1f | 0x80..=0x9f)
}

fn is_windows_reserved(name: &str) -> bool {
    let base = name.split('.').next().unwrap_or_default().to_ascii_lowercase();
    if WINDOWS_RESERVED.contains(&base.as_str()) {
        return true;
    }
    let numbered = |prefix: &str| {
        base.len() == prefix.len() + 1
            && base.starts_with(prefix)
            && base.as_bytes()[prefix.len()].is_ascii_digit()
    };
    numbered("com") || numbered("lpt")
}

/// File stem shared by a track's artwork and audio.
pub fn track_file_stem(track: &Track) -> String {
    let base = format!("{} - {}", track.display_title(), track.id);
    sanitize_filename(&base).chars().take(MAX_STEM_CHARS).collect()
}

/// Artwork destination, e.g. `<dir>/<stem>.jpg`.
pub fn artwork_path(artwork_dir: &Path, stem: &str, extension: &str) -> PathBuf {
    artwork_dir.join(format!("{}.{}", stem, extension))
}

/// Audio destination, `<dir>/<stem>.mp3`.
pub fn audio_path(audio_dir: &Path, stem: &str) -> PathBuf {
    audio_dir.join(format!("{}.mp3", stem))
}

/// Whether a destination is already on disk and should be skipped.
pub fn already_downloaded(path: &Path) -> bool {
    path.exists()
}
