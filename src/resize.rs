// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize controller.
//!
//! Owns the single active image and the canvas it is placed on. Loading
//! fits the image into the viewport; resizing changes the canvas to the
//! target size and refits the image with its aspect ratio preserved.
//! Rendering composites the scaled image onto the canvas background.

use crate::io::media::{self, ExportFormat, LoadedImage, MediaError};
use crate::models::canvas::CanvasState;
use crate::models::project::Project;
use chrono::{DateTime, Utc};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::Path;
use thiserror::Error;

/// Largest canvas side accepted by [`ResizeController::resize`].
pub const MAX_DIMENSION: u32 = 16_384;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("Please upload an image first!")]
    NoImage,
    #[error("Please enter valid width and height!")]
    InvalidDimensions,
    #[error("Please enter a width and height of at most {max} pixels!")]
    TooLarge { max: u32 },
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Image plus canvas state for the current editing session.
#[derive(Default)]
pub struct ResizeController {
    canvas: CanvasState,
    source: Option<RgbaImage>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// Replace whatever is on the canvas with a freshly decoded image.
    pub fn load(&mut self, image: LoadedImage) {
        let (width, height) = image.pixels.dimensions();
        self.canvas.place(image.name, width, height);
        self.source = Some(image.pixels);
        log::info!("Loaded image {}x{} onto canvas", width, height);
    }

    /// Resize the canvas to the target and refit the image into it.
    ///
    /// `None` stands for a missing or non-positive dimension in the input.
    pub fn resize(&mut self, width: Option<u32>, height: Option<u32>) -> Result<(), ResizeError> {
        if !self.has_image() {
            return Err(ResizeError::NoImage);
        }
        let (Some(width), Some(height)) = (width, height) else {
            return Err(ResizeError::InvalidDimensions);
        };
        if width == 0 || height == 0 {
            return Err(ResizeError::InvalidDimensions);
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            log::warn!("Rejected oversize canvas {}x{}", width, height);
            return Err(ResizeError::TooLarge { max: MAX_DIMENSION });
        }
        self.canvas.refit(width, height);
        log::info!("Resized canvas to {}x{}", width, height);
        Ok(())
    }

    /// Drag the image around the canvas.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.canvas.translate(dx, dy);
    }

    /// Rasterize the canvas.
    pub fn render(&self) -> Result<RgbaImage, ResizeError> {
        let (Some(source), Some(placed)) = (self.source.as_ref(), self.canvas.image.as_ref()) else {
            return Err(ResizeError::NoImage);
        };
        let background = parse_hex_color(&self.canvas.background).unwrap_or(Rgba([255, 255, 255, 255]));
        let mut out = RgbaImage::from_pixel(self.canvas.width, self.canvas.height, background);

        let (scaled_w, scaled_h) = placed.scaled_size();
        let scaled = if (scaled_w, scaled_h) == source.dimensions() {
            source.clone()
        } else {
            imageops::resize(source, scaled_w, scaled_h, FilterType::Lanczos3)
        };
        imageops::overlay(
            &mut out,
            &scaled,
            placed.left.round() as i64,
            placed.top.round() as i64,
        );
        Ok(out)
    }

    /// Encode the rendered canvas.
    pub fn encode(&self, format: ExportFormat, quality: f32) -> Result<Vec<u8>, ResizeError> {
        let rendered = self.render()?;
        Ok(media::encode(&rendered, format, quality)?)
    }

    /// Render, encode, and write the canvas to `path`.
    pub fn download(&self, path: &Path, format: ExportFormat, quality: f32) -> Result<(), ResizeError> {
        let bytes = self.encode(format, quality)?;
        media::write_file(path, &bytes)?;
        log::info!("Downloaded {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// File name offered in the save dialog.
    pub fn default_file_name(&self, format: ExportFormat, now: DateTime<Utc>) -> String {
        format!(
            "resized-image-{}x{}-{}.{}",
            self.canvas.width,
            self.canvas.height,
            now.timestamp_millis(),
            format.ext()
        )
    }

    /// Snapshot the canvas for the project store.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<Project, ResizeError> {
        Project::snapshot(&self.canvas, now).ok_or(ResizeError::NoImage)
    }
}

/// Parse `#rrggbb` into an opaque pixel.
fn parse_hex_color(hex: &str) -> Option<Rgba<u8>> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, 255]))
}
