use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LibraryError;

use super::model::Track;

/// A user-curated playlist loaded from a TOML file.
///
/// ```toml
/// name = "Late night"
///
/// [[tracks]]
/// id = "a1"
/// title = "Intro"
/// artist = "Someone"
/// source = "music/intro.flac"
/// cover = "art/intro.jpg"
/// ```
///
/// Entries without `source` are kept; they show up in the list but cannot play.
#[derive(Debug, Clone, Deserialize)]
pub struct Mix {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Load a mix, resolving relative `source`/`cover` paths against the file's directory.
pub fn load_mix(path: &Path) -> Result<Mix, LibraryError> {
    let text = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut mix: Mix = toml::from_str(&text).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    if mix.name.trim().is_empty() {
        mix.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mix")
            .to_string();
    }
    for track in &mut mix.tracks {
        track.source = track.source.take().map(|s| resolve_locator(base, &s));
        track.cover = track.cover.take().map(|s| resolve_locator(base, &s));
    }
    Ok(mix)
}

/// URLs and absolute paths pass through; anything else is relative to `base`.
fn resolve_locator(base: &Path, locator: &str) -> String {
    let trimmed = locator.trim();
    if trimmed.is_empty() || trimmed.contains("://") || Path::new(trimmed).is_absolute() {
        return trimmed.to_string();
    }
    PathBuf::from(base).join(trimmed).display().to_string()
}
