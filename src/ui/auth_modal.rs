// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Login / register modal.

use crate::auth::{AuthMode, AuthRequest};

/// State of the auth form.
pub struct AuthForm {
    pub open: bool,
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            open: false,
            mode: AuthMode::Login,
            email: String::new(),
            password: String::new(),
        }
    }
}

impl AuthForm {
    /// Open the modal in login mode.
    pub fn open_login(&mut self) {
        self.open = true;
        self.mode = AuthMode::Login;
    }

    pub fn request(&self) -> AuthRequest {
        AuthRequest {
            mode: self.mode,
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Close the modal and clear the fields after a successful submit.
    pub fn reset(&mut self) {
        self.open = false;
        self.email.clear();
        self.password.clear();
    }
}

pub enum AuthModalAction {
    None,
    Submit,
}

/// Display the modal while it is open.
pub fn show(ctx: &egui::Context, form: &mut AuthForm, pending: bool) -> AuthModalAction {
    let mut action = AuthModalAction::None;
    if !form.open {
        return action;
    }

    let mut open = form.open;
    egui::Window::new(form.mode.title())
        .id(egui::Id::new("auth_modal"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            egui::Grid::new("auth_fields").num_columns(2).show(ui, |ui| {
                ui.label("Email");
                ui.add_enabled(!pending, egui::TextEdit::singleline(&mut form.email));
                ui.end_row();
                ui.label("Password");
                let password = ui.add_enabled(
                    !pending,
                    egui::TextEdit::singleline(&mut form.password).password(true),
                );
                ui.end_row();
                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) && !pending {
                    action = AuthModalAction::Submit;
                }
            });

            ui.add_space(6.0);
            let label = if pending { "Loading..." } else { form.mode.submit_label() };
            if ui.add_enabled(!pending, egui::Button::new(label)).clicked() {
                action = AuthModalAction::Submit;
            }

            ui.add_space(6.0);
            ui.horizontal(|ui| {
                let (prompt, link) = match form.mode {
                    AuthMode::Login => ("Don't have an account?", "Register"),
                    AuthMode::Register => ("Already have an account?", "Login"),
                };
                ui.label(prompt);
                if ui.add_enabled(!pending, egui::Link::new(link)).clicked() {
                    form.mode = form.mode.toggled();
                }
            });
        });
    form.open = open;

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_after_success() {
        let mut form = AuthForm::default();
        form.open_login();
        form.mode = AuthMode::Register;
        form.open_login();
        assert_eq!(form.mode, AuthMode::Login);

        form.email = "me@example.com".into();
        form.password = "hunter22".into();
        let request = form.request();
        assert_eq!(request.email, "me@example.com");

        form.reset();
        assert!(!form.open);
        assert!(form.email.is_empty() && form.password.is_empty());
    }
}
