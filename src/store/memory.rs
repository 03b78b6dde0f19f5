use std::collections::HashMap;

use crate::error::StoreError;

use super::{SettingValue, SettingsStore};

/// Volatile store; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, SettingValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: SettingValue) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}
