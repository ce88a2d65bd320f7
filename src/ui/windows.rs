// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Floating windows: notices, saved projects, activity history, profile.

use crate::models::project::Project;
use crate::models::session::Session;
use chrono::{DateTime, Local, Utc};

/// Blocking notice shown in place of a browser alert.
pub fn notice(ctx: &egui::Context, message: &mut Option<String>) {
    let Some(text) = message.as_deref() else {
        return;
    };
    let mut dismissed = false;
    egui::Window::new("Resize P")
        .id(egui::Id::new("notice"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 80.0))
        .show(ctx, |ui| {
            ui.label(text);
            ui.add_space(6.0);
            if ui.button("OK").clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                dismissed = true;
            }
        });
    if dismissed {
        *message = None;
    }
}

pub enum ProjectsAction {
    None,
    Export,
}

/// Saved projects list.
pub fn projects(ctx: &egui::Context, open: &mut bool, projects: &[Project]) -> ProjectsAction {
    let mut action = ProjectsAction::None;
    egui::Window::new("Projects")
        .open(open)
        .default_width(360.0)
        .show(ctx, |ui| {
            if projects.is_empty() {
                ui.label(egui::RichText::new("No saved projects yet").weak());
                return;
            }
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                egui::Grid::new("projects_grid")
                    .num_columns(3)
                    .striped(true)
                    .show(ui, |ui| {
                        ui.strong("Saved");
                        ui.strong("Size");
                        ui.strong("Original");
                        ui.end_row();
                        for project in projects.iter().rev() {
                            ui.label(local_time(project.timestamp));
                            ui.label(format!("{} x {}", project.size.width, project.size.height));
                            ui.label(format!(
                                "{} x {}",
                                project.original_size.width, project.original_size.height
                            ));
                            ui.end_row();
                        }
                    });
            });
            ui.separator();
            if ui.button("Export Projects...").clicked() {
                action = ProjectsAction::Export;
            }
        });
    action
}

/// In-run activity log.
pub fn history(ctx: &egui::Context, open: &mut bool, entries: &[(DateTime<Utc>, String)]) {
    egui::Window::new("History")
        .open(open)
        .default_width(320.0)
        .show(ctx, |ui| {
            if entries.is_empty() {
                ui.label(egui::RichText::new("Nothing yet").weak());
                return;
            }
            egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                for (at, what) in entries.iter().rev() {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(local_time(*at)).weak());
                        ui.label(what);
                    });
                }
            });
        });
}

pub fn profile(ctx: &egui::Context, open: &mut bool, session: Option<&Session>, provider: &str) {
    egui::Window::new("Profile")
        .open(open)
        .resizable(false)
        .show(ctx, |ui| match session {
            Some(session) => {
                egui::Grid::new("profile_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Email");
                    ui.label(&session.email);
                    ui.end_row();
                    ui.label("User ID");
                    ui.label(egui::RichText::new(&session.uid).monospace());
                    ui.end_row();
                    ui.label("Provider");
                    ui.label(provider);
                    ui.end_row();
                });
            }
            None => {
                ui.label("Not signed in");
            }
        });
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
