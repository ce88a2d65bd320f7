// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It mediates between file input, the resize
//! controller, the auth adapter, and the local store. Image decoding and
//! identity provider calls run on background threads and report back over
//! channels polled once per frame.

use crate::auth::adapter::{AuthAdapter, SessionEvent};
use crate::auth::{self, AuthError, AuthMode};
use crate::config::Settings;
use crate::io::media::{self, LoadedImage, MediaError};
use crate::io::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::io::{projects, serialization};
use crate::models::presets::parse_dimension;
use crate::models::project::Project;
use crate::models::session::Session;
use crate::resize::{ResizeController, ResizeError};
use crate::ui::auth_modal::{self, AuthForm, AuthModalAction};
use crate::ui::canvas::{self, CanvasAction};
use crate::ui::toolbar::{self, ResizeForm, ToolbarAction};
use crate::ui::visibility::Visibility;
use crate::ui::windows::{self, ProjectsAction};
use crate::util::geometry;
use chrono::{DateTime, Utc};
use image::imageops::{self, FilterType};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};

/// Largest texture side uploaded for the on-screen preview.
const MAX_PREVIEW_SIDE: u32 = 4096;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Result of a background identity provider call.
enum AuthReply {
    Submitted(AuthMode, Result<Option<Session>, AuthError>),
    LoggedOut(Result<(), AuthError>),
}

/// Main application state.
pub struct ResizeApp {
    /// Image and canvas state
    controller: ResizeController,

    /// Size presets, custom size fields, export options
    form: ResizeForm,

    /// Login / register modal
    auth_form: AuthForm,

    auth: AuthAdapter,

    /// Local key-value store (session mirror and saved projects)
    store: Box<dyn KeyValueStore>,

    /// Session-gated regions
    visibility: Visibility,

    /// Session changes published by the auth adapter
    session_events: Receiver<SessionEvent>,

    /// Texture of the loaded image for display
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImage, MediaError>>>,

    /// Receiver for the in-flight identity provider call
    auth_pending: Option<Receiver<AuthReply>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Pending user notice
    notice: Option<String>,

    saved_projects: Vec<Project>,
    activity: Vec<(DateTime<Utc>, String)>,
    show_projects: bool,
    show_history: bool,
    show_profile: bool,
}

impl ResizeApp {
    /// Create the application from resolved settings.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut notice = None;
        let store: Box<dyn KeyValueStore> = match settings.store_path() {
            Some(path) => match FileStore::open(&path, settings.store_quota_bytes) {
                Ok(store) => {
                    log::info!("Local store at {}", store.path().display());
                    Box::new(store)
                }
                Err(e) => {
                    log::error!("Falling back to in-memory store: {}", e);
                    notice = Some(format!("Saved data could not be loaded: {}", e));
                    Box::new(in_memory_store(settings))
                }
            },
            None => {
                log::warn!("No data directory available, using in-memory store");
                Box::new(in_memory_store(settings))
            }
        };

        let provider = auth::from_settings(settings)?;
        let mut auth = AuthAdapter::new(provider, settings.clear_projects_on_logout);
        let (sender, session_events) = channel();
        auth.subscribe(move |event| {
            let _ = sender.send(event.clone());
        });

        let mut app = Self {
            controller: ResizeController::new(),
            form: ResizeForm::default(),
            auth_form: AuthForm::default(),
            auth,
            store,
            visibility: Visibility::for_session(false),
            session_events,
            image_texture: None,
            image_loader: None,
            auth_pending: None,
            loading_message: None,
            notice,
            saved_projects: Vec::new(),
            activity: Vec::new(),
            show_projects: false,
            show_history: false,
            show_profile: false,
        };

        if let Err(e) = app.auth.restore(app.store.as_ref()) {
            log::error!("Ignoring stored session: {}", e);
            app.alert(format!("Stored session could not be restored: {}", e));
        }
        app.apply_session_events();
        Ok(app)
    }

    fn record(&mut self, what: impl Into<String>) {
        self.activity.push((Utc::now(), what.into()));
    }

    fn alert(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Recompute visibility from queued session changes.
    fn apply_session_events(&mut self) {
        while let Ok(event) = self.session_events.try_recv() {
            match event {
                SessionEvent::SignedIn(session) => {
                    self.visibility = Visibility::for_session(true);
                    self.record(format!("Signed in as {}", session.email));
                    self.refresh_projects();
                }
                SessionEvent::SignedOut => {
                    self.visibility = Visibility::for_session(false);
                    self.show_projects = false;
                    self.show_history = false;
                    self.show_profile = false;
                    self.saved_projects.clear();
                    self.record("Signed out");
                }
            }
            log::debug!("Visible regions: {:?}", self.visibility.shown());
        }
    }

    fn refresh_projects(&mut self) {
        match projects::list(self.store.as_ref()) {
            Ok(list) => self.saved_projects = list,
            Err(e) => {
                log::error!("Failed to read saved projects: {}", e);
                self.saved_projects.clear();
                self.alert(format!("Saved projects could not be read: {}", e));
            }
        }
    }

    /// Open the native picker and load the chosen image.
    fn pick_image(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    /// Load an image file (asynchronously). Non-image files are ignored.
    pub fn load_image_file(&mut self, path: PathBuf) {
        if !media::is_image_file(&path) {
            log::warn!("Ignoring non-image file {}", path.display());
            return;
        }
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let result = media::load_image(&path);
            if let Ok(loaded) = &result {
                log::info!(
                    "Decoded image: {} ({}x{})",
                    path.display(),
                    loaded.pixels.width(),
                    loaded.pixels.height()
                );
            }
            let _ = sender.send(result);
        });
    }

    /// Load a dropped file that arrived as bytes rather than a path.
    fn load_image_bytes(&mut self, name: String, bytes: std::sync::Arc<[u8]>) {
        if !media::is_image_file(Path::new(&name)) {
            log::warn!("Ignoring non-image file {}", name);
            return;
        }
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some("Loading image...".to_string());

        std::thread::spawn(move || {
            let _ = sender.send(media::decode_image(name, &bytes));
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = file.path {
            self.load_image_file(path);
        } else if let Some(bytes) = file.bytes {
            self.load_image_bytes(file.name, bytes);
        }
    }

    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok(result) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match result {
            Ok(loaded) => {
                let preview = preview_pixels(&loaded.pixels);
                let size = [preview.width() as usize, preview.height() as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
                self.image_texture =
                    Some(ctx.load_texture("loaded_image", color_image, egui::TextureOptions::LINEAR));
                self.record(format!(
                    "Loaded {} ({} x {})",
                    loaded.name,
                    loaded.pixels.width(),
                    loaded.pixels.height()
                ));
                self.controller.load(loaded);
            }
            Err(e) => {
                log::error!("Failed to load image: {}", e);
                self.alert(e.to_string());
            }
        }
    }

    fn resize_image(&mut self) {
        let width = parse_dimension(&self.form.width);
        let height = parse_dimension(&self.form.height);
        match self.controller.resize(width, height) {
            Ok(()) => {
                let canvas = self.controller.canvas();
                let what = format!("Resized to {} x {}", canvas.width, canvas.height);
                self.record(what);
            }
            Err(e) => {
                log::error!("Resize rejected: {}", e);
                self.alert(e.to_string());
            }
        }
    }

    fn download_image(&mut self) {
        if !self.controller.has_image() {
            self.alert(ResizeError::NoImage.to_string());
            return;
        }
        let format = self.form.format;
        let file_name = self.controller.default_file_name(format, Utc::now());
        let Some(path) = rfd::FileDialog::new()
            .add_filter(format.ext(), &[format.ext()])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };
        match self.controller.download(&path, format, self.form.quality) {
            Ok(()) => self.record(format!("Downloaded {}", path.display())),
            Err(e) => {
                log::error!("Download failed: {}", e);
                self.alert(e.to_string());
            }
        }
    }

    fn save_project(&mut self) {
        if !self.auth.is_signed_in() {
            self.alert("Please login to save projects!");
            return;
        }
        let result = self
            .controller
            .snapshot(Utc::now())
            .map_err(|e| e.to_string())
            .and_then(|project| {
                projects::append(self.store.as_mut(), &project).map_err(|e| e.to_string())
            });
        match result {
            Ok(count) => {
                log::info!("Saved project, total: {}", count);
                self.record("Saved project");
                self.refresh_projects();
                self.alert("Project saved successfully!");
            }
            Err(message) => {
                log::error!("Failed to save project: {}", message);
                self.alert(message);
            }
        }
    }

    fn export_projects(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .add_filter("YAML", &["yaml", "yml"])
            .set_file_name("projects.json")
            .save_file()
        else {
            return;
        };
        match serialization::export(&self.saved_projects, &path) {
            Ok(()) => log::info!("Exported projects to {}", path.display()),
            Err(e) => {
                log::error!("Failed to export projects: {}", e);
                self.alert(format!("Failed to export projects: {}", e));
            }
        }
    }

    /// Send the auth form to the provider (asynchronously).
    fn submit_auth(&mut self) {
        if self.auth_pending.is_some() {
            return;
        }
        let request = self.auth_form.request();
        let provider = self.auth.provider();
        let (sender, receiver) = channel();
        self.auth_pending = Some(receiver);

        std::thread::spawn(move || {
            let result = auth::submit(provider.as_ref(), &request);
            let _ = sender.send(AuthReply::Submitted(request.mode, result));
        });
    }

    fn logout(&mut self) {
        if self.auth_pending.is_some() {
            return;
        }
        let Some(session) = self.auth.begin_logout() else {
            return;
        };
        let provider = self.auth.provider();
        let (sender, receiver) = channel();
        self.auth_pending = Some(receiver);

        std::thread::spawn(move || {
            let _ = sender.send(AuthReply::LoggedOut(provider.sign_out(&session)));
        });
    }

    fn poll_auth(&mut self) {
        let Some(receiver) = &self.auth_pending else {
            return;
        };
        let Ok(reply) = receiver.try_recv() else {
            return;
        };
        self.auth_pending = None;

        match reply {
            AuthReply::Submitted(mode, result) => {
                match self.auth.complete(self.store.as_mut(), mode, result) {
                    Ok(message) => {
                        self.auth_form.reset();
                        self.alert(message);
                    }
                    Err(message) => self.alert(message),
                }
            }
            AuthReply::LoggedOut(result) => {
                let message = match self.auth.finish_logout(self.store.as_mut(), result) {
                    Ok(message) | Err(message) => message,
                };
                self.alert(message);
            }
        }
        self.apply_session_events();
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Image...").clicked() {
                        self.pick_image();
                        ui.close_menu();
                    }
                    if ui.button("Download...").clicked() {
                        self.download_image();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let busy = self.auth_pending.is_some();
                    if self.visibility.login && ui.add_enabled(!busy, egui::Button::new("Login")).clicked() {
                        self.auth_form.open_login();
                    }
                    if self.visibility.logout && ui.add_enabled(!busy, egui::Button::new("Logout")).clicked() {
                        self.logout();
                    }
                    if self.visibility.profile && ui.button("Profile").clicked() {
                        self.show_profile = !self.show_profile;
                    }
                    if self.visibility.projects && ui.button("Projects").clicked() {
                        self.refresh_projects();
                        self.show_projects = !self.show_projects;
                    }
                    if self.visibility.history && ui.button("History").clicked() {
                        self.show_history = !self.show_history;
                    }
                    if busy {
                        ui.spinner();
                    }
                });
            });
        });
    }
}

fn in_memory_store(settings: &Settings) -> MemoryStore {
    match settings.store_quota_bytes {
        Some(quota) => MemoryStore::with_quota(quota),
        None => MemoryStore::new(),
    }
}

/// Downscale very large images for the on-screen texture.
fn preview_pixels(pixels: &image::RgbaImage) -> std::borrow::Cow<'_, image::RgbaImage> {
    let (width, height) = pixels.dimensions();
    if width <= MAX_PREVIEW_SIDE && height <= MAX_PREVIEW_SIDE {
        return std::borrow::Cow::Borrowed(pixels);
    }
    let scale = geometry::fit_scale(width, height, MAX_PREVIEW_SIDE, MAX_PREVIEW_SIDE, false);
    let (w, h) = geometry::scaled_size(width, height, scale);
    std::borrow::Cow::Owned(imageops::resize(pixels, w, h, FilterType::Triangle))
}

impl eframe::App for ResizeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_image_loader(ctx);
        self.poll_auth();
        self.apply_session_events();

        // Request repaint while background work is pending (to update spinner)
        if self.loading_message.is_some() || self.auth_pending.is_some() {
            ctx.request_repaint();
        }

        self.menu_bar(ctx);

        // Resize controls (left side)
        let canvas_size = (self.controller.canvas().width, self.controller.canvas().height);
        let toolbar_action = egui::SidePanel::left("controls")
            .default_width(260.0)
            .show(ctx, |ui| {
                toolbar::show(
                    ui,
                    &mut self.form,
                    &self.visibility,
                    self.controller.has_image(),
                    self.controller.canvas().original_size(),
                    canvas_size,
                )
            })
            .inner;

        match toolbar_action {
            ToolbarAction::UploadNew => self.pick_image(),
            ToolbarAction::Resize => self.resize_image(),
            ToolbarAction::Download => self.download_image(),
            ToolbarAction::SaveProject => self.save_project(),
            ToolbarAction::None => {}
        }

        // Main canvas (center)
        let files_hovered = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    CanvasAction::None
                } else {
                    canvas::show(
                        ui,
                        self.controller.canvas(),
                        &self.image_texture,
                        files_hovered,
                    )
                }
            })
            .inner;

        match canvas_action {
            CanvasAction::OpenFile => self.pick_image(),
            CanvasAction::MoveImage(dx, dy) => self.controller.move_by(dx, dy),
            CanvasAction::None => {}
        }

        // Floating windows
        if let AuthModalAction::Submit =
            auth_modal::show(ctx, &mut self.auth_form, self.auth_pending.is_some())
        {
            self.submit_auth();
        }

        let mut show_projects = self.show_projects;
        let projects_action = windows::projects(ctx, &mut show_projects, &self.saved_projects);
        self.show_projects = show_projects;
        if let ProjectsAction::Export = projects_action {
            self.export_projects();
        }

        windows::history(ctx, &mut self.show_history, &self.activity);
        windows::profile(
            ctx,
            &mut self.show_profile,
            self.auth.session(),
            self.auth.provider().name(),
        );
        windows::notice(ctx, &mut self.notice);
    }
}
