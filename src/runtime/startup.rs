use std::path::{Path, PathBuf};

use log::info;

use crate::audio::{EngineDefaults, RepeatMode};
use crate::config::Settings;
use crate::error::LibraryError;
use crate::library::{Track, load_mix, scan};
use crate::store::{TomlFileStore, default_store_path};

/// The list shown at startup and a label for where it came from.
pub struct Catalog {
    pub label: String,
    pub tracks: Vec<Track>,
}

/// A `.toml` argument is a mix file; anything else is a directory to scan.
pub fn load_catalog(arg: &str, settings: &Settings) -> Result<Catalog, LibraryError> {
    let path = Path::new(arg);
    let is_mix = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let catalog = if is_mix {
        let mix = load_mix(path)?;
        Catalog {
            label: mix.name,
            tracks: mix.tracks,
        }
    } else {
        Catalog {
            label: arg.to_string(),
            tracks: scan(path, &settings.library),
        }
    };
    info!("catalog '{}' with {} tracks", catalog.label, catalog.tracks.len());
    Ok(catalog)
}

/// Open the settings store at the configured path, falling back to the
/// per-user default. `None` means no usable location exists.
pub fn open_store(settings: &Settings) -> Option<TomlFileStore> {
    let path: PathBuf = settings.store.path.clone().or_else(default_store_path)?;
    Some(TomlFileStore::open_or_empty(path))
}

pub fn engine_defaults(settings: &Settings) -> EngineDefaults {
    EngineDefaults {
        shuffle: settings.playback.shuffle,
        repeat: RepeatMode::from(settings.playback.repeat),
        volume: settings.playback.default_volume,
    }
}
