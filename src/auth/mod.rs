// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Authentication against a hosted identity provider.
//!
//! Two interchangeable back ends implement [`IdentityProvider`]: a Supabase
//! style GoTrue API and the Firebase Identity Toolkit API. Exactly one is
//! active per run. The [`adapter::AuthAdapter`] sits between the provider
//! and the rest of the application.

pub mod adapter;
pub mod firebase;
pub mod supabase;

use crate::config::{ProviderKind, Settings};
use crate::models::session::Session;
use std::sync::Arc;
use thiserror::Error;

pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Error text reported by the provider, verbatim.
    #[error("{0}")]
    Provider(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Parse(String),
    #[error("identity provider is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Hosted email/password identity service.
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Create an account. `None` means the account exists but no session was
    /// issued yet (email confirmation pending).
    fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    fn sign_out(&self, session: &Session) -> Result<(), AuthError>;

    /// Map a failure to the string shown to the user.
    fn user_message(&self, error: &AuthError) -> &'static str;
}

/// Which form the auth modal is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login to Resize P",
            AuthMode::Register => "Register for Resize P",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            AuthMode::Login => "Login successful!",
            AuthMode::Register => "Registration successful! Check your email for verification.",
        }
    }
}

/// Credentials submitted from the auth form.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub email: String,
    pub password: String,
}

/// Run one request against the provider. Blocking; called on a worker thread.
pub fn submit(provider: &dyn IdentityProvider, request: &AuthRequest) -> Result<Option<Session>, AuthError> {
    match request.mode {
        AuthMode::Login => provider.sign_in(&request.email, &request.password).map(Some),
        AuthMode::Register => provider.sign_up(&request.email, &request.password),
    }
}

/// Build the configured provider.
pub fn from_settings(settings: &Settings) -> Result<Arc<dyn IdentityProvider>, AuthError> {
    let provider: Arc<dyn IdentityProvider> = match settings.provider {
        ProviderKind::Supabase => Arc::new(supabase::SupabaseAuth::new(
            settings.supabase.url.clone(),
            settings.supabase.anon_key.clone(),
        )?),
        ProviderKind::Firebase => Arc::new(firebase::FirebaseAuth::new(
            settings.firebase.base_url.clone(),
            settings.firebase.api_key.clone(),
        )?),
    };
    log::info!("Using {} identity provider", provider.name());
    Ok(provider)
}

/// Blocking HTTP client shared by both providers.
fn http_client() -> Result<reqwest::blocking::Client, AuthError> {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| AuthError::Transport(e.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    /// Scripted provider for adapter tests.
    #[derive(Default)]
    pub struct FakeProvider {
        pub sign_in_result: Mutex<Option<Result<Session, AuthError>>>,
        pub sign_up_result: Mutex<Option<Result<Option<Session>, AuthError>>>,
        pub sign_out_fails: bool,
        pub sign_outs: Mutex<Vec<String>>,
    }

    impl IdentityProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn sign_up(&self, _email: &str, _password: &str) -> Result<Option<Session>, AuthError> {
            self.sign_up_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AuthError::Transport("unscripted".into())))
        }

        fn sign_in(&self, _email: &str, _password: &str) -> Result<Session, AuthError> {
            self.sign_in_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AuthError::Transport("unscripted".into())))
        }

        fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
            self.sign_outs.lock().unwrap().push(session.uid.clone());
            if self.sign_out_fails {
                Err(AuthError::Transport("offline".into()))
            } else {
                Ok(())
            }
        }

        fn user_message(&self, error: &AuthError) -> &'static str {
            match error {
                AuthError::Provider(text) if text == "bad" => "Invalid email or password.",
                _ => GENERIC_ERROR,
            }
        }
    }
}
