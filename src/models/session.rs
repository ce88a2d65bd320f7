// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Signed-in user session.

use serde::{Deserialize, Serialize};

/// Identity returned by the provider and mirrored into the local store.
///
/// Only `uid` and `email` are persisted. The access token lives in memory
/// for the rest of the run and is used for provider sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub email: String,
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}
