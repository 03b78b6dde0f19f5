use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use toml::{Table, Value};

use crate::error::StoreError;

use super::{SettingValue, SettingsStore};

/// Settings kept as one flat TOML table on disk.
///
/// The whole table is rewritten on every `set` (temp file + rename), so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    table: Table,
}

impl TomlFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(text) => text.parse::<Table>().map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, table })
    }

    /// Like `open`, but an unreadable or corrupt file starts out empty and is
    /// replaced on the next write.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                warn!("ignoring settings store: {e}");
                Self {
                    path,
                    table: Table::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let text = toml::to_string(&self.table)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl SettingsStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        match self.table.get(key)? {
            Value::Float(f) => Some(SettingValue::Real(*f)),
            Value::Integer(i) => Some(SettingValue::Real(*i as f64)),
            Value::Boolean(b) => Some(SettingValue::Bool(*b)),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError> {
        let v = match value {
            SettingValue::Real(f) => Value::Float(f),
            SettingValue::Bool(b) => Value::Boolean(b),
        };
        self.table.insert(key.to_string(), v);
        self.commit()
    }
}

/// Default location: `$XDG_STATE_HOME/loop-player/state.toml` or
/// `~/.local/state/loop-player/state.toml`.
pub fn default_store_path() -> Option<PathBuf> {
    state_dir().map(|d| d.join("state.toml"))
}

/// Per-user state directory for the player.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("loop-player"))
}
