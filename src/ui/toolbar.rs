// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize controls.
//!
//! This module provides the side panel with size presets, custom size
//! fields, export options, and the resize/download/save buttons.

use crate::io::media::ExportFormat;
use crate::models::presets::{SizePreset, FREE_PRESETS, PREMIUM_PRESETS};
use crate::ui::visibility::Visibility;

/// Export quality choices, as offered by the quality picker.
pub const QUALITY_LEVELS: &[(f32, &str)] = &[(1.0, "High"), (0.8, "Medium"), (0.6, "Low")];

/// Editable state of the resize form.
pub struct ResizeForm {
    pub preset: Option<SizePreset>,
    pub width: String,
    pub height: String,
    pub quality: f32,
    pub format: ExportFormat,
}

impl Default for ResizeForm {
    fn default() -> Self {
        Self {
            preset: None,
            width: String::new(),
            height: String::new(),
            quality: 1.0,
            format: ExportFormat::Png,
        }
    }
}

impl ResizeForm {
    /// Copy a preset into the custom size fields.
    pub fn select_preset(&mut self, preset: SizePreset) {
        self.preset = Some(preset);
        self.width = preset.width.to_string();
        self.height = preset.height.to_string();
    }

    /// A hand edit of either field drops the preset selection.
    pub fn custom_size_edited(&mut self) {
        if !self.width.is_empty() && !self.height.is_empty() {
            self.preset = None;
        }
    }
}

/// Button pressed in the controls panel.
pub enum ToolbarAction {
    None,
    UploadNew,
    Resize,
    Download,
    SaveProject,
}

/// Display the controls panel.
pub fn show(
    ui: &mut egui::Ui,
    form: &mut ResizeForm,
    visibility: &Visibility,
    has_image: bool,
    original_size: Option<(u32, u32)>,
    canvas_size: (u32, u32),
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.heading("Resize");
    ui.add_space(4.0);

    if has_image && ui.button("⬆ Upload New").clicked() {
        action = ToolbarAction::UploadNew;
    }

    ui.separator();
    ui.label("Size presets");
    let selected_text = form
        .preset
        .map(|p| p.label())
        .unwrap_or_else(|| "Custom".to_string());
    egui::ComboBox::from_id_source("size_presets")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            preset_group(ui, form, FREE_PRESETS);
            if visibility.premium_sizes {
                ui.separator();
                ui.label(egui::RichText::new("Premium sizes").weak());
                preset_group(ui, form, PREMIUM_PRESETS);
            }
        });

    ui.add_space(4.0);
    egui::Grid::new("custom_size").num_columns(2).show(ui, |ui| {
        ui.label("Width");
        let width = ui.add(egui::TextEdit::singleline(&mut form.width).hint_text("px"));
        ui.end_row();
        ui.label("Height");
        let height = ui.add(egui::TextEdit::singleline(&mut form.height).hint_text("px"));
        ui.end_row();
        if width.changed() || height.changed() {
            form.custom_size_edited();
        }
    });

    ui.add_space(4.0);
    if ui.button("Resize").clicked() {
        action = ToolbarAction::Resize;
    }

    ui.separator();
    ui.label("Export");
    ui.horizontal(|ui| {
        ui.selectable_value(&mut form.format, ExportFormat::Png, "PNG");
        ui.selectable_value(&mut form.format, ExportFormat::Jpeg, "JPEG");
    });
    let quality_label = QUALITY_LEVELS
        .iter()
        .find(|(q, _)| *q == form.quality)
        .map_or("Custom", |(_, label)| *label);
    egui::ComboBox::from_id_source("quality")
        .selected_text(quality_label)
        .show_ui(ui, |ui| {
            for (quality, label) in QUALITY_LEVELS {
                ui.selectable_value(&mut form.quality, *quality, *label);
            }
        });

    if ui.button("⬇ Download").clicked() {
        action = ToolbarAction::Download;
    }
    if visibility.save_project && ui.button("💾 Save Project").clicked() {
        action = ToolbarAction::SaveProject;
    }

    ui.separator();
    egui::Grid::new("size_info").num_columns(2).show(ui, |ui| {
        ui.label("Original:");
        ui.label(original_size.map_or("-".to_string(), |(w, h)| format!("{} x {}", w, h)));
        ui.end_row();
        ui.label("Current:");
        ui.label(format!("{} x {}", canvas_size.0, canvas_size.1));
        ui.end_row();
    });

    action
}

fn preset_group(ui: &mut egui::Ui, form: &mut ResizeForm, presets: &[SizePreset]) {
    for preset in presets {
        let selected = form.preset == Some(*preset);
        if ui.selectable_label(selected, preset.label()).clicked() {
            form.select_preset(*preset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_fills_fields() {
        let mut form = ResizeForm::default();
        form.select_preset(PREMIUM_PRESETS[1]);
        assert_eq!(form.width, "820");
        assert_eq!(form.height, "312");
        assert_eq!(form.preset, Some(PREMIUM_PRESETS[1]));
    }

    #[test]
    fn test_custom_edit_clears_preset() {
        let mut form = ResizeForm::default();
        form.select_preset(FREE_PRESETS[0]);
        form.width = "1000".into();
        form.custom_size_edited();
        assert_eq!(form.preset, None);
    }

    #[test]
    fn test_partial_edit_keeps_preset() {
        let mut form = ResizeForm::default();
        form.select_preset(FREE_PRESETS[0]);
        form.height.clear();
        form.custom_size_edited();
        assert!(form.preset.is_some());
    }
}
