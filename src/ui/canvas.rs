// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas area.
//!
//! Shows either the upload area (click or drop a file) or the current canvas
//! with the placed image. The canvas is scaled down to fit the panel; the
//! image can be dragged around inside it.

use crate::models::canvas::CanvasState;
use crate::util::geometry;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    OpenFile,
    /// Image dragged by a delta in canvas pixels.
    MoveImage(f64, f64),
}

/// Display the canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    canvas: &CanvasState,
    image_texture: &Option<egui::TextureHandle>,
    files_hovered: bool,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let (Some(texture), Some(placed)) = (image_texture, canvas.image.as_ref()) else {
            if upload_area(ui, files_hovered) {
                action = CanvasAction::OpenFile;
            }
            return;
        };

        let available = ui.available_size();
        let view = geometry::fit_and_center(
            (canvas.width, canvas.height),
            (available.x.max(1.0) as u32, available.y.max(1.0) as u32),
            false,
        );
        let view_scale = view.scale as f32;
        let canvas_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(view.left as f32, view.top as f32),
            egui::vec2(canvas.width as f32 * view_scale, canvas.height as f32 * view_scale),
        );

        let painter = ui.painter_at(canvas_rect);
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::WHITE);

        let (scaled_w, scaled_h) = placed.scaled_size();
        let image_rect = egui::Rect::from_min_size(
            canvas_rect.min + egui::vec2(placed.left as f32 * view_scale, placed.top as f32 * view_scale),
            egui::vec2(scaled_w as f32 * view_scale, scaled_h as f32 * view_scale),
        );
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let response = ui.allocate_rect(image_rect.intersect(canvas_rect), egui::Sense::drag());
        if response.dragged() && view_scale > 0.0 {
            let delta = response.drag_delta();
            action = CanvasAction::MoveImage(
                (delta.x / view_scale) as f64,
                (delta.y / view_scale) as f64,
            );
        }
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }
        ui.painter().rect_stroke(
            canvas_rect,
            0.0,
            egui::Stroke::new(1.0, egui::Color32::from_gray(90)),
        );
    });

    action
}

/// Draw the upload prompt. Returns true when it was clicked.
fn upload_area(ui: &mut egui::Ui, files_hovered: bool) -> bool {
    let rect = ui.max_rect().shrink(24.0);
    let response = ui.allocate_rect(rect, egui::Sense::click());
    let fill = if files_hovered || response.hovered() {
        egui::Color32::from_rgb(0xf0, 0xe6, 0xff)
    } else {
        egui::Color32::from_gray(55)
    };
    let text_color = if files_hovered || response.hovered() {
        egui::Color32::from_gray(60)
    } else {
        egui::Color32::from_gray(180)
    };

    let painter = ui.painter();
    painter.rect_filled(rect, 8.0, fill);
    painter.rect_stroke(rect, 8.0, egui::Stroke::new(2.0, egui::Color32::from_gray(120)));
    painter.text(
        rect.center() - egui::vec2(0.0, 14.0),
        egui::Align2::CENTER_CENTER,
        "Resize P",
        egui::FontId::proportional(28.0),
        text_color,
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 18.0),
        egui::Align2::CENTER_CENTER,
        "Drop an image here or click to upload",
        egui::FontId::proportional(15.0),
        text_color,
    );

    response.clicked()
}
