// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Supabase (GoTrue) auth client.
//!
//! Thin blocking wrapper over `/auth/v1/signup`, `/auth/v1/token` and
//! `/auth/v1/logout`. Response parsing is kept in pure functions.

use super::{http_client, AuthError, IdentityProvider, GENERIC_ERROR};
use crate::models::session::Session;
use serde::Deserialize;

pub struct SupabaseAuth {
    http: reqwest::blocking::Client,
    url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(url: String, anon_key: String) -> Result<Self, AuthError> {
        Ok(Self {
            http: http_client()?,
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }

    fn ensure_configured(&self) -> Result<(), AuthError> {
        if self.url.is_empty() {
            return Err(AuthError::NotConfigured("supabase url"));
        }
        if self.anon_key.is_empty() {
            return Err(AuthError::NotConfigured("supabase anon key"));
        }
        Ok(())
    }

    fn post(&self, path: &str, bearer: &str, body: Option<&Credentials>) -> Result<(u16, String), AuthError> {
        self.ensure_configured()?;
        let mut request = self
            .http
            .post(format!("{}{}", self.url, path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| AuthError::Transport(e.to_string()))?;
        Ok((status, text))
    }
}

impl IdentityProvider for SupabaseAuth {
    fn name(&self) -> &'static str {
        "supabase"
    }

    fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, AuthError> {
        let (status, body) = self.post("/auth/v1/signup", &self.anon_key, Some(&Credentials { email, password }))?;
        parse_sign_up(status, &body)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let (status, body) = self.post(
            "/auth/v1/token?grant_type=password",
            &self.anon_key,
            Some(&Credentials { email, password }),
        )?;
        parse_sign_in(status, &body)
    }

    fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let Some(token) = session.access_token.as_deref() else {
            // Restored from the store without a token; nothing to revoke.
            return Ok(());
        };
        let (status, body) = self.post("/auth/v1/logout", token, None)?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(AuthError::Provider(error_text(&body)))
        }
    }

    fn user_message(&self, error: &AuthError) -> &'static str {
        match error {
            AuthError::Provider(text) => match text.as_str() {
                "Invalid login credentials" => "Invalid email or password.",
                "Email not confirmed" => "Please verify your email address.",
                "User already registered" => "This email is already registered.",
                "Password should be at least 6 characters" => {
                    "Password should be at least 6 characters."
                }
                _ => GENERIC_ERROR,
            },
            _ => GENERIC_ERROR,
        }
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ApiUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ApiSession {
    access_token: String,
    user: ApiUser,
}

/// Sign-up returns a session when auto-confirm is on, a bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(ApiSession),
    User(ApiUser),
}

#[derive(Deserialize, Default)]
struct ApiError {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

impl ApiSession {
    fn into_session(self) -> Session {
        Session::new(self.user.id, self.user.email.unwrap_or_default()).with_token(self.access_token)
    }
}

/// Pull the human-readable message out of an error body, the way the
/// JS client does: `msg`, then `message`, `error_description`, `error`.
fn error_text(body: &str) -> String {
    let parsed: ApiError = serde_json::from_str(body).unwrap_or_default();
    parsed
        .msg
        .or(parsed.message)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| body.trim().to_string())
}

fn check_status(status: u16, body: &str) -> Result<(), AuthError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AuthError::Provider(error_text(body)))
    }
}

fn parse_sign_in(status: u16, body: &str) -> Result<Session, AuthError> {
    check_status(status, body)?;
    let api: ApiSession = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(api.into_session())
}

fn parse_sign_up(status: u16, body: &str) -> Result<Option<Session>, AuthError> {
    check_status(status, body)?;
    let api: SignUpResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(match api {
        SignUpResponse::Session(session) => Some(session.into_session()),
        SignUpResponse::User(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sign_in_success() {
        let body = r#"{"access_token":"tok","token_type":"bearer","expires_in":3600,
            "refresh_token":"r","user":{"id":"uuid-1","email":"me@example.com","role":"authenticated"}}"#;
        let session = parse_sign_in(200, body).unwrap();
        assert_eq!(session.uid, "uuid-1");
        assert_eq!(session.email, "me@example.com");
        assert_eq!(session.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_parse_sign_in_error_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        match parse_sign_in(400, body) {
            Err(AuthError::Provider(text)) => assert_eq!(text, "Invalid login credentials"),
            other => panic!("unexpected: {:?}", other.map(|s| s.uid)),
        }
    }

    #[test]
    fn test_parse_sign_up_without_session() {
        let body = r#"{"id":"uuid-2","email":"new@example.com","confirmation_sent_at":"2025-01-01T00:00:00Z"}"#;
        assert_eq!(parse_sign_up(200, body).unwrap(), None);
    }

    #[test]
    fn test_parse_sign_up_with_session() {
        let body = r#"{"access_token":"tok","user":{"id":"uuid-3","email":"auto@example.com"}}"#;
        let session = parse_sign_up(200, body).unwrap().unwrap();
        assert_eq!(session.uid, "uuid-3");
    }

    #[test]
    fn test_parse_sign_up_msg_error() {
        let body = r#"{"code":422,"error_code":"user_already_exists","msg":"User already registered"}"#;
        assert!(matches!(
            parse_sign_up(422, body),
            Err(AuthError::Provider(text)) if text == "User already registered"
        ));
    }

    #[test]
    fn test_non_json_error_body() {
        assert_eq!(error_text("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_user_messages() {
        let auth = SupabaseAuth::new(String::new(), String::new()).unwrap();
        let cases = [
            ("Invalid login credentials", "Invalid email or password."),
            ("Email not confirmed", "Please verify your email address."),
            ("User already registered", "This email is already registered."),
            (
                "Password should be at least 6 characters",
                "Password should be at least 6 characters.",
            ),
            ("invalid login credentials", GENERIC_ERROR),
        ];
        for (provider_text, expected) in cases {
            assert_eq!(
                auth.user_message(&AuthError::Provider(provider_text.into())),
                expected
            );
        }
        assert_eq!(
            auth.user_message(&AuthError::Transport("dns".into())),
            GENERIC_ERROR
        );
    }

    #[test]
    fn test_unconfigured_client_fails_fast() {
        let auth = SupabaseAuth::new(String::new(), "key".into()).unwrap();
        assert!(matches!(
            auth.sign_in("a@b.c", "pw"),
            Err(AuthError::NotConfigured(_))
        ));
    }
}
