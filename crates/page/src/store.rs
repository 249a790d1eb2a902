//! File-backed preference persistence. Preferences survive across sessions;
//! losing them must never take the page down, so every IO failure degrades to
//! an in-memory store with a warning.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use darkmode::PreferenceStore;
use log::warn;
use serde::{Deserialize, Serialize};

/// On-disk shape of the preference file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    values: BTreeMap<String, String>,
}

/// Preference store persisted as pretty-printed JSON, written through on
/// every update.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file: PreferenceFile,
}

impl JsonFileStore {
    /// Open a store backed by `path`. A missing file starts empty; a
    /// malformed one is ignored with a warning and will be overwritten by the
    /// next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = load(&path);
        Self { path, file }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        let data = match serde_json::to_vec_pretty(&self.file) {
            Ok(data) => data,
            Err(error) => {
                warn!("failed to encode preferences: {error}");
                return;
            }
        };
        if let Err(error) = fs::write(&self.path, data) {
            warn!("failed to write {}: {error}", self.path.display());
        }
    }
}

fn load(path: &Path) -> PreferenceFile {
    let Ok(data) = fs::read(path) else {
        return PreferenceFile::default();
    };
    match serde_json::from_slice(&data) {
        Ok(file) => file,
        Err(error) => {
            warn!(
                "ignoring malformed preference file {}: {error}",
                path.display()
            );
            PreferenceFile::default()
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.file.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.file
            .values
            .insert(key.to_string(), value.to_string());
        self.persist();
    }
}
