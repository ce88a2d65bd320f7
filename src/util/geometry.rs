// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the fit-and-center arithmetic used to place an
//! image inside a canvas while preserving its aspect ratio.

/// Scale factor and top-left offset of an image placed in a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub left: f64,
    pub top: f64,
}

/// Scale factor that fits `(width, height)` inside `(box_width, box_height)`.
///
/// The smaller of the two axis ratios wins, so the aspect ratio is always
/// preserved and the image is letterboxed rather than stretched. When
/// `allow_upscale` is false the factor is additionally capped at 1.
pub fn fit_scale(width: u32, height: u32, box_width: u32, box_height: u32, allow_upscale: bool) -> f64 {
    if width == 0 || height == 0 {
        return 1.0;
    }
    let scale_x = box_width as f64 / width as f64;
    let scale_y = box_height as f64 / height as f64;
    let scale = scale_x.min(scale_y);
    if allow_upscale {
        scale
    } else {
        scale.min(1.0)
    }
}

/// Offset that centers `content` inside `container` along one axis.
pub fn centered_offset(container: f64, content: f64) -> f64 {
    (container - content) / 2.0
}

/// Dimensions of `(width, height)` after scaling, rounded to whole pixels.
pub fn scaled_size(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let w = (width as f64 * scale).round().max(1.0) as u32;
    let h = (height as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

/// Fit an image into a container and center it.
pub fn fit_and_center(
    (width, height): (u32, u32),
    (box_width, box_height): (u32, u32),
    allow_upscale: bool,
) -> Placement {
    let scale = fit_scale(width, height, box_width, box_height, allow_upscale);
    Placement {
        scale,
        left: centered_offset(box_width as f64, width as f64 * scale),
        top: centered_offset(box_height as f64, height as f64 * scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_takes_smaller_ratio() {
        // 1600x600 into 800x600: width ratio 0.5, height ratio 1.0
        assert_eq!(fit_scale(1600, 600, 800, 600, false), 0.5);
        // 400x1200 into 800x600: width ratio 2.0, height ratio 0.5
        assert_eq!(fit_scale(400, 1200, 800, 600, false), 0.5);
    }

    #[test]
    fn test_fit_scale_never_upscales_without_permission() {
        assert_eq!(fit_scale(200, 100, 800, 600, false), 1.0);
        assert_eq!(fit_scale(200, 100, 800, 600, true), 4.0);
    }

    #[test]
    fn test_fit_scale_matches_min_of_ratios() {
        let cases = [(1920, 1080), (640, 480), (3000, 200), (50, 5000), (800, 600)];
        for (w, h) in cases {
            let expected = (800.0 / w as f64).min(600.0 / h as f64).min(1.0);
            assert!((fit_scale(w, h, 800, 600, false) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_centered_offsets() {
        let placement = fit_and_center((1600, 600), (800, 600), false);
        assert_eq!(placement.scale, 0.5);
        // scaled image is 800x300
        assert_eq!(placement.left, 0.0);
        assert_eq!(placement.top, 150.0);
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        let (w, h) = (1234, 567);
        let placement = fit_and_center((w, h), (1080, 1920), true);
        let scaled_w = w as f64 * placement.scale;
        let scaled_h = h as f64 * placement.scale;
        assert!((scaled_w / placement.scale - w as f64).abs() < 1e-9);
        assert!((scaled_h / placement.scale - h as f64).abs() < 1e-9);
        assert!((placement.left - (1080.0 - scaled_w) / 2.0).abs() < 1e-9);
        assert!((placement.top - (1920.0 - scaled_h) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_size_rounds_and_clamps() {
        assert_eq!(scaled_size(1000, 500, 0.3333), (333, 167));
        assert_eq!(scaled_size(1000, 1, 0.1), (100, 1));
    }
}
