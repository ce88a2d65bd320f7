// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Named target sizes offered in the size picker.

/// A named target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl SizePreset {
    const fn new(name: &'static str, width: u32, height: u32) -> Self {
        Self { name, width, height }
    }

    /// Label shown in the picker, e.g. `Discord Banner (960x540)`.
    pub fn label(&self) -> String {
        format!("{} ({}x{})", self.name, self.width, self.height)
    }
}

/// Presets available to everyone.
pub const FREE_PRESETS: &[SizePreset] = &[
    SizePreset::new("HD", 1280, 720),
    SizePreset::new("Full HD", 1920, 1080),
    SizePreset::new("Square", 1080, 1080),
    SizePreset::new("Instagram Post", 1080, 1350),
    SizePreset::new("Facebook Post", 1200, 630),
    SizePreset::new("Twitter Post", 1600, 900),
];

/// Presets shown only to signed-in users.
pub const PREMIUM_PRESETS: &[SizePreset] = &[
    SizePreset::new("Instagram Story", 1080, 1920),
    SizePreset::new("Facebook Cover", 820, 312),
    SizePreset::new("Twitter Header", 1500, 500),
    SizePreset::new("LinkedIn Post", 1200, 627),
    SizePreset::new("Pinterest Pin", 1000, 1500),
    SizePreset::new("TikTok Video", 1080, 1920),
    SizePreset::new("WhatsApp Status", 1080, 1920),
    SizePreset::new("YouTube Channel Art", 2560, 1440),
    SizePreset::new("Twitch Banner", 1200, 380),
    SizePreset::new("Discord Banner", 960, 540),
];

/// Parse a dimension typed into a size field.
///
/// Leading digits are taken (so `"640px"` is 640); empty, zero, and
/// negative input is rejected.
pub fn parse_dimension(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    let value: i64 = trimmed[..digits_end].parse().ok()?;
    u32::try_from(value).ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_labels() {
        assert_eq!(PREMIUM_PRESETS.len(), 10);
        assert_eq!(PREMIUM_PRESETS[0].label(), "Instagram Story (1080x1920)");
        assert_eq!(PREMIUM_PRESETS[9].label(), "Discord Banner (960x540)");
    }

    #[test]
    fn test_parse_dimension_accepts_positive() {
        assert_eq!(parse_dimension("1080"), Some(1080));
        assert_eq!(parse_dimension("  640 "), Some(640));
        assert_eq!(parse_dimension("640px"), Some(640));
        assert_eq!(parse_dimension("+12"), Some(12));
    }

    #[test]
    fn test_parse_dimension_rejects_missing_zero_negative() {
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("abc"), None);
        assert_eq!(parse_dimension("0"), None);
        assert_eq!(parse_dimension("-20"), None);
        assert_eq!(parse_dimension("-"), None);
    }
}
