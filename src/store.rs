//! Persistent key/value settings store.
//!
//! The queue engine is the only writer. Every mutator commits synchronously,
//! writes are last-write-wins and need no transaction.

mod file;
mod memory;

pub use file::*;
pub use memory::*;

use crate::error::StoreError;

/// Key holding the stored (pre-mute) output volume.
pub const VOLUME_KEY: &str = "player.volume";
/// Key holding the mute flag.
pub const MUTED_KEY: &str = "player.muted";

/// A value kept in the settings store.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SettingValue {
    Real(f64),
    Bool(bool),
}

impl SettingValue {
    pub fn as_real(self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(v),
            Self::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            Self::Real(_) => None,
        }
    }
}

pub trait SettingsStore {
    /// Read a value, `None` when absent.
    fn get(&self, key: &str) -> Option<SettingValue>;

    /// Write a value and commit it before returning.
    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError>;
}
