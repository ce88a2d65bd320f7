// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project snapshots.
//!
//! A project is a point-in-time copy of the canvas state together with the
//! original and target dimensions it was produced from.

use super::canvas::CanvasState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Width and height pair as recorded in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Complete project data for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub canvas_data: CanvasState,
    pub timestamp: DateTime<Utc>,
    /// Canvas (target) size at the time of saving.
    pub size: Size,
    /// Natural size of the source image.
    pub original_size: Size,
}

impl Project {
    /// Snapshot the given canvas state. Returns `None` for an empty canvas.
    pub fn snapshot(canvas: &CanvasState, timestamp: DateTime<Utc>) -> Option<Self> {
        let (width, height) = canvas.original_size()?;
        Some(Self {
            canvas_data: canvas.clone(),
            timestamp,
            size: Size {
                width: canvas.width,
                height: canvas.height,
            },
            original_size: Size { width, height },
        })
    }
}
