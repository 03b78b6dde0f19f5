//! Error types shared across the player.
//!
//! Nothing here is fatal: the engine settles into a non-playing state and
//! surfaces these to the UI, the store and catalog report them to the runtime.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Recoverable playback conditions reported by the queue engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayerError {
    /// The target track has no source locator, so nothing can be loaded.
    #[error("track {id} has no playable source")]
    ContentUnavailable { id: String },

    /// The sink refused to begin playback.
    #[error("playback could not start: {reason}")]
    StartRejected { reason: String },
}

/// Failures of the persistent settings store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings store at {path} is not valid TOML: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to encode settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Failures inside the rodio-backed media sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("no audio output device: {0}")]
    NoDevice(String),

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

/// Failures while reading the track catalog.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid mix file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
