// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Resize P - image resizing tool
//!
//! A cross-platform desktop application for resizing images to social
//! media presets or custom dimensions, with optional sign-in for saving
//! projects locally.

mod app;
mod auth;
mod config;
mod io;
mod models;
mod resize;
mod ui;
mod util;

use anyhow::Result;
use app::ResizeApp;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = config::load(config::Cli::parse())?;
    log::info!("Starting with {:?} provider, data dir {:?}", settings.provider, settings.data_dir);
    let app = ResizeApp::new(&settings)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true)
            .with_title("Resize P"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Resize P",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
