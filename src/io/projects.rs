// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Saved project list.
//!
//! Projects live as one JSON array under [`PROJECTS_KEY`]. The list is
//! append-only: saving pushes a new entry and never touches earlier ones.

use super::storage::{KeyValueStore, StorageError, PROJECTS_KEY};
use crate::models::project::Project;
use serde_json::value::RawValue;

/// Read every saved project. A missing key is an empty list.
pub fn list(store: &dyn KeyValueStore) -> Result<Vec<Project>, StorageError> {
    match store.get(PROJECTS_KEY) {
        Some(json) => serde_json::from_str(&json).map_err(|source| StorageError::Malformed {
            key: PROJECTS_KEY.to_string(),
            source,
        }),
        None => Ok(Vec::new()),
    }
}

/// Append one project and return the new list length.
pub fn append(store: &mut dyn KeyValueStore, project: &Project) -> Result<usize, StorageError> {
    // Earlier entries stay raw so they are written back byte-for-byte.
    let mut entries: Vec<Box<RawValue>> = match store.get(PROJECTS_KEY) {
        Some(json) => serde_json::from_str(&json).map_err(|source| StorageError::Malformed {
            key: PROJECTS_KEY.to_string(),
            source,
        })?,
        None => Vec::new(),
    };
    let value = serde_json::value::to_raw_value(project).map_err(|source| {
        StorageError::Malformed {
            key: PROJECTS_KEY.to_string(),
            source,
        }
    })?;
    entries.push(value);

    let json = serde_json::to_string(&entries).map_err(|source| StorageError::Malformed {
        key: PROJECTS_KEY.to_string(),
        source,
    })?;
    store.set(PROJECTS_KEY, json)?;
    Ok(entries.len())
}

pub fn clear(store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(PROJECTS_KEY)
}
