// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Local key-value store.
//!
//! Values are JSON text strings keyed by name, the same shape a browser's
//! local storage holds. `FileStore` persists the whole map to one JSON file
//! in the data directory; `MemoryStore` is used when no directory is
//! available and in tests.

use crate::models::session::Session;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key holding the signed-in user mirror.
pub const USER_KEY: &str = "resizeP_user";
/// Key holding the saved project array.
pub const PROJECTS_KEY: &str = "resizeP_projects";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access store file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored data under '{key}' is malformed: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage quota exceeded ({needed} of {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// String key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Total stored bytes once `key` holds `value`.
fn size_with(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}

fn check_quota(
    entries: &BTreeMap<String, String>,
    quota: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    if let Some(quota) = quota {
        let needed = size_with(entries, key, value);
        if needed > quota {
            return Err(StorageError::QuotaExceeded { needed, quota });
        }
    }
    Ok(())
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(&self.entries, self.quota, key, &value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl FileStore {
    /// Open the store at `path`, creating an empty one if the file is missing.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| StorageError::Malformed {
                key: path.display().to_string(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        log::info!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries,
            quota,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the map to a sibling temp file and rename it over the store.
    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries).map_err(|source| {
            StorageError::Malformed {
                key: self.path.display().to_string(),
                source,
            }
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        check_quota(&self.entries, self.quota, key, &value)?;
        let previous = self.entries.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            match previous {
                Some(v) => self.entries.insert(key.to_string(), v),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if let Some(previous) = self.entries.remove(key) {
            if let Err(e) = self.flush() {
                self.entries.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Mirror the signed-in user into the store.
pub fn save_user(store: &mut dyn KeyValueStore, session: &Session) -> Result<(), StorageError> {
    let json = serde_json::to_string(session).map_err(|source| StorageError::Malformed {
        key: USER_KEY.to_string(),
        source,
    })?;
    store.set(USER_KEY, json)
}

/// Read the mirrored user, if any.
pub fn load_user(store: &dyn KeyValueStore) -> Result<Option<Session>, StorageError> {
    store
        .get(USER_KEY)
        .map(|json| {
            serde_json::from_str(&json).map_err(|source| StorageError::Malformed {
                key: USER_KEY.to_string(),
                source,
            })
        })
        .transpose()
}

pub fn clear_user(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(USER_KEY)
}
