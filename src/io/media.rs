// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading and export.
//!
//! This module handles the file boundary: the MIME check on incoming files,
//! decoding into RGBA pixels, and encoding the rendered canvas to disk.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbaImage};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{name} is not an image file ({mime})")]
    NotAnImage { name: String, mime: String },
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Output format for downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn ext(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }
}

/// A decoded image ready for placement on the canvas.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub name: String,
    pub pixels: RgbaImage,
}

/// MIME type guessed from the file name.
pub fn mime_of(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Check that a file looks like an image before reading it.
pub fn is_image_file(path: &Path) -> bool {
    mime_of(path).starts_with("image/")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load and decode an image file.
pub fn load_image(path: &Path) -> Result<LoadedImage, MediaError> {
    let name = file_name(path);
    if !is_image_file(path) {
        return Err(MediaError::NotAnImage {
            name,
            mime: mime_of(path),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| MediaError::Read {
        name: name.clone(),
        source,
    })?;
    decode_image(name, &bytes)
}

/// Decode an in-memory image (used for dropped files that carry bytes).
pub fn decode_image(name: String, bytes: &[u8]) -> Result<LoadedImage, MediaError> {
    let decoded = image::load_from_memory(bytes).map_err(|source| MediaError::Decode {
        name: name.clone(),
        source,
    })?;
    Ok(LoadedImage {
        name,
        pixels: decoded.to_rgba8(),
    })
}

/// Encode an image. PNG ignores `quality`; JPEG maps 0.0..=1.0 to 1..=100.
pub fn encode(image: &RgbaImage, format: ExportFormat, quality: f32) -> Result<Vec<u8>, MediaError> {
    let mut out = Vec::new();
    match format {
        ExportFormat::Png => {
            PngEncoder::new(&mut out).write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )?;
        }
        ExportFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let q = (quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8;
            JpegEncoder::new_with_quality(&mut out, q).write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(out)
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), MediaError> {
    std::fs::write(path, bytes).map_err(|source| MediaError::Write {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(8, 4, |x, y| image::Rgba([(x * 30) as u8, (y * 60) as u8, 0, 255]))
    }

    #[test]
    fn test_mime_check() {
        assert!(is_image_file(Path::new("photo.JPG")));
        assert!(is_image_file(Path::new("/tmp/a.png")));
        assert!(is_image_file(Path::new("scan.webp")));
        assert!(!is_image_file(Path::new("notes.txt")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_non_image_rejected_before_read() {
        let err = load_image(Path::new("/does/not/exist/readme.md")).unwrap_err();
        assert!(matches!(err, MediaError::NotAnImage { .. }));
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        sample().save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.name, "sample.png");
        assert_eq!(loaded.pixels.dimensions(), (8, 4));
        assert_eq!(loaded.pixels.get_pixel(7, 3), sample().get_pixel(7, 3));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = decode_image("fake.png".into(), b"definitely not a png").unwrap_err();
        assert!(matches!(err, MediaError::Decode { .. }));
    }

    #[test]
    fn test_encode_png_and_jpeg() {
        let png = encode(&sample(), ExportFormat::Png, 0.1).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, sample());

        let jpeg = encode(&sample(), ExportFormat::Jpeg, 0.8).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
