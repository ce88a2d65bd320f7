// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas state.
//!
//! The canvas holds at most one placed image. Its state is what gets
//! rendered, downloaded, and serialized into project snapshots.

use crate::util::geometry::{self, Placement};
use serde::{Deserialize, Serialize};

/// Width of the viewport a freshly loaded image is fitted into.
pub const VIEWPORT_WIDTH: u32 = 800;
/// Height of the viewport a freshly loaded image is fitted into.
pub const VIEWPORT_HEIGHT: u32 = 600;

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// An image object placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// File name the image was loaded from.
    pub source: String,
    /// Natural (decoded) width in pixels.
    pub width: u32,
    /// Natural (decoded) height in pixels.
    pub height: u32,
    pub left: f64,
    pub top: f64,
    pub scale: f64,
}

impl PlacedImage {
    /// Rendered size after applying the scale factor.
    pub fn scaled_size(&self) -> (u32, u32) {
        geometry::scaled_size(self.width, self.height, self.scale)
    }

    fn apply(&mut self, placement: Placement) {
        self.scale = placement.scale;
        self.left = placement.left;
        self.top = placement.top;
    }
}

/// Serializable canvas state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub image: Option<PlacedImage>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            background: DEFAULT_BACKGROUND.to_string(),
            image: None,
        }
    }
}

impl CanvasState {
    /// Clear the canvas and place a new image fitted into the viewport.
    ///
    /// Images smaller than the viewport keep their natural size.
    pub fn place(&mut self, source: String, width: u32, height: u32) {
        *self = Self::default();
        let mut image = PlacedImage {
            source,
            width,
            height,
            left: 0.0,
            top: 0.0,
            scale: 1.0,
        };
        image.apply(geometry::fit_and_center(
            (width, height),
            (self.width, self.height),
            false,
        ));
        self.image = Some(image);
    }

    /// Set the canvas to the target size and refit the image into it.
    ///
    /// Returns false when there is no image to refit.
    pub fn refit(&mut self, target_width: u32, target_height: u32) -> bool {
        let Some(image) = self.image.as_mut() else {
            return false;
        };
        self.width = target_width;
        self.height = target_height;
        image.apply(geometry::fit_and_center(
            (image.width, image.height),
            (target_width, target_height),
            true,
        ));
        true
    }

    /// Move the image by a canvas-space delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        if let Some(image) = self.image.as_mut() {
            image.left += dx;
            image.top += dy;
        }
    }

    pub fn original_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| (img.width, img.height))
    }
}
