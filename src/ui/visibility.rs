// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session-gated UI regions.

/// Which session-dependent regions are currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub premium_sizes: bool,
    pub save_project: bool,
    pub login: bool,
    pub logout: bool,
    pub history: bool,
    pub projects: bool,
    pub profile: bool,
}

impl Visibility {
    /// Regions for a signed-in or signed-out user. Signing in shows
    /// everything except the login button; signing out shows only that.
    pub fn for_session(signed_in: bool) -> Self {
        Self {
            premium_sizes: signed_in,
            save_project: signed_in,
            login: !signed_in,
            logout: signed_in,
            history: signed_in,
            projects: signed_in,
            profile: signed_in,
        }
    }

    fn flags(&self) -> [(&'static str, bool); 7] {
        [
            ("premium_sizes", self.premium_sizes),
            ("save_project", self.save_project),
            ("login", self.login),
            ("logout", self.logout),
            ("history", self.history),
            ("projects", self.projects),
            ("profile", self.profile),
        ]
    }

    /// Names of the regions that are shown.
    pub fn shown(&self) -> Vec<&'static str> {
        self.flags()
            .into_iter()
            .filter(|(_, on)| *on)
            .map(|(name, _)| name)
            .collect()
    }
}
