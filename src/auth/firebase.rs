// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Firebase Identity Toolkit auth client.
//!
//! Sign-up and password sign-in go through `accounts:signUp` and
//! `accounts:signInWithPassword`. Firebase ID tokens are not revoked
//! server-side, so sign-out is purely local.

use super::{http_client, AuthError, IdentityProvider, GENERIC_ERROR};
use crate::models::session::Session;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

pub struct FirebaseAuth {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuth {
    pub fn new(base_url: String, api_key: String) -> Result<Self, AuthError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn call(&self, method: &str, email: &str, password: &str) -> Result<Session, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::NotConfigured("firebase api key"));
        }
        let body = ApiRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response = self
            .http
            .post(format!("{}/accounts:{}", self.base_url, method))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        parse_response(status, &text)
    }
}

impl IdentityProvider for FirebaseAuth {
    fn name(&self) -> &'static str {
        "firebase"
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        self.call("signUp", email, password).map(Some)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.call("signInWithPassword", email, password)
    }

    fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        Ok(())
    }

    fn user_message(&self, error: &AuthError) -> &'static str {
        let AuthError::Provider(text) = error else {
            return GENERIC_ERROR;
        };
        // Messages look like `WEAK_PASSWORD : Password should be ...`.
        let code = text.split(" : ").next().unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
                "Invalid email or password."
            }
            "EMAIL_EXISTS" => "This email is already registered.",
            "WEAK_PASSWORD" => "Password should be at least 6 characters.",
            "INVALID_EMAIL" => "Please enter a valid email address.",
            "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
            _ => GENERIC_ERROR,
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(status: u16, body: &str) -> Result<Session, AuthError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.trim().to_string());
        return Err(AuthError::Provider(message));
    }
    let api: ApiResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(Session::new(api.local_id, api.email).with_token(api.id_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FirebaseAuth {
        FirebaseAuth::new(DEFAULT_BASE_URL.into(), String::new()).unwrap()
    }

    #[test]
    fn test_parse_success() {
        let body = r#"{"kind":"identitytoolkit#VerifyPasswordResponse","localId":"abc",
            "email":"me@example.com","idToken":"jwt","refreshToken":"r","expiresIn":"3600"}"#;
        let session = parse_response(200, body).unwrap();
        assert_eq!(session, Session::new("abc", "me@example.com").with_token("jwt"));
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[{"message":"EMAIL_EXISTS","domain":"global","reason":"invalid"}]}}"#;
        assert!(matches!(
            parse_response(400, body),
            Err(AuthError::Provider(text)) if text == "EMAIL_EXISTS"
        ));
    }

    #[test]
    fn test_parse_malformed_success_body() {
        assert!(matches!(
            parse_response(200, "{}"),
            Err(AuthError::Parse(_))
        ));
    }

    #[test]
    fn test_user_messages() {
        let auth = client();
        let message = |text: &str| auth.user_message(&AuthError::Provider(text.into()));
        assert_eq!(message("EMAIL_NOT_FOUND"), "Invalid email or password.");
        assert_eq!(message("INVALID_LOGIN_CREDENTIALS"), "Invalid email or password.");
        assert_eq!(message("EMAIL_EXISTS"), "This email is already registered.");
        assert_eq!(
            message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters."
        );
        assert_eq!(message("OPERATION_NOT_ALLOWED"), GENERIC_ERROR);
        assert_eq!(
            auth.user_message(&AuthError::NotConfigured("firebase api key")),
            GENERIC_ERROR
        );
    }

    #[test]
    fn test_sign_out_is_local() {
        assert!(client().sign_out(&Session::new("abc", "me@example.com")).is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            client().sign_up("a@b.c", "secret"),
            Err(AuthError::NotConfigured(_))
        ));
    }
}
