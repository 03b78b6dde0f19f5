use std::path::Path;

use lofty::prelude::{Accessor, TaggedFileExt};
use log::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

const COVER_STEMS: [&str; 3] = ["cover", "folder", "front"];
const COVER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Look for `cover.jpg`, `folder.png` and friends next to `track`.
fn sibling_cover(track: &Path) -> Option<String> {
    let dir = track.parent()?;
    COVER_STEMS
        .iter()
        .flat_map(|stem| COVER_EXTENSIONS.iter().map(move |ext| dir.join(format!("{stem}.{ext}"))))
        .find(|p| p.is_file())
        .map(|p| p.display().to_string())
}

/// Walk `dir` and build a track per audio file, sorted by "artist - title".
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist = String::new();

        match lofty::read_from_path(path) {
            Ok(tagged) => {
                if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                    if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                        title = v.trim().to_string();
                    }
                    if let Some(v) = tag.artist().filter(|v| !v.trim().is_empty()) {
                        artist = v.trim().to_string();
                    }
                }
            }
            Err(e) => debug!("no tags for {}: {e}", path.display()),
        }

        let id = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned();

        tracks.push(Track {
            id,
            title,
            artist,
            cover: sibling_cover(path),
            source: Some(path.display().to_string()),
        });
    }

    tracks.sort_by_key(|t| t.display().to_lowercase());
    tracks
}
