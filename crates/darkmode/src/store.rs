//! Preference persistence. The controller records the current toggle state
//! through this trait so a page revisit can restore it.

use std::collections::BTreeMap;

/// Key/value persistence for the dark mode preference.
pub trait PreferenceStore {
    /// Last stored value for `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any prior value.
    fn write(&mut self, key: &str, value: &str);
}

/// In-memory store used by tests and headless sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}
