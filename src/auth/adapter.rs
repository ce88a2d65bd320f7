// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state between the identity provider and the application.
//!
//! Provider calls are blocking and run on worker threads; their results are
//! handed back to [`AuthAdapter`] on the UI thread, which updates the
//! session, mirrors it into the local store, and notifies subscribers.

use super::{AuthError, AuthMode, IdentityProvider};
use crate::io::projects;
use crate::io::storage::{self, KeyValueStore, StorageError};
use crate::models::session::Session;
use std::sync::Arc;

pub const LOGOUT_SUCCESS: &str = "Logged out successfully!";
pub const LOGOUT_FAILURE: &str = "Error logging out. Please try again.";

/// Session-change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

pub struct AuthAdapter {
    provider: Arc<dyn IdentityProvider>,
    session: Option<Session>,
    clear_projects_on_logout: bool,
    listeners: Vec<Listener>,
}

impl AuthAdapter {
    pub fn new(provider: Arc<dyn IdentityProvider>, clear_projects_on_logout: bool) -> Self {
        Self {
            provider,
            session: None,
            clear_projects_on_logout,
            listeners: Vec::new(),
        }
    }

    /// Provider handle for worker threads.
    pub fn provider(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.provider)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Register a session-change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&SessionEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Pick up a session mirrored by a previous run.
    pub fn restore(&mut self, store: &dyn KeyValueStore) -> Result<(), StorageError> {
        if let Some(session) = storage::load_user(store)? {
            log::info!("Restored session for {}", session.email);
            self.session = Some(session.clone());
            self.notify(&SessionEvent::SignedIn(session));
        }
        Ok(())
    }

    /// Apply the result of a login or register request.
    ///
    /// Returns the message to show the user: the success text, or the
    /// provider error mapped through its message table.
    pub fn complete(
        &mut self,
        store: &mut dyn KeyValueStore,
        mode: AuthMode,
        result: Result<Option<Session>, AuthError>,
    ) -> Result<&'static str, String> {
        match result {
            Ok(Some(session)) => {
                log::info!("User logged in: {}", session.email);
                self.set_session(store, Some(session))
                    .map_err(|e| e.to_string())?;
                Ok(mode.success_message())
            }
            Ok(None) => {
                log::info!("Registration pending email confirmation");
                Ok(mode.success_message())
            }
            Err(e) => {
                log::error!("Auth error: {}", e);
                Err(self.provider.user_message(&e).to_string())
            }
        }
    }

    /// Session to hand to the provider for sign-out, if signed in.
    pub fn begin_logout(&self) -> Option<Session> {
        self.session.clone()
    }

    /// Tear down the local session once the provider call has returned.
    ///
    /// The session is dropped locally even when the provider call failed.
    pub fn finish_logout(
        &mut self,
        store: &mut dyn KeyValueStore,
        result: Result<(), AuthError>,
    ) -> Result<&'static str, &'static str> {
        let teardown = self.set_session(store, None);
        if let Err(e) = &result {
            log::error!("Logout error: {}", e);
        }
        if let Err(e) = &teardown {
            log::error!("Failed to clear stored session: {}", e);
        }
        match (result, teardown) {
            (Ok(()), Ok(())) => {
                log::info!("User logged out");
                Ok(LOGOUT_SUCCESS)
            }
            _ => Err(LOGOUT_FAILURE),
        }
    }

    fn set_session(
        &mut self,
        store: &mut dyn KeyValueStore,
        session: Option<Session>,
    ) -> Result<(), StorageError> {
        match session {
            Some(session) => {
                storage::save_user(store, &session)?;
                self.session = Some(session.clone());
                self.notify(&SessionEvent::SignedIn(session));
            }
            None => {
                self.session = None;
                self.notify(&SessionEvent::SignedOut);
                storage::clear_user(store)?;
                if self.clear_projects_on_logout {
                    projects::clear(store)?;
                }
            }
        }
        Ok(())
    }

    fn notify(&mut self, event: &SessionEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::FakeProvider;
    use crate::auth::GENERIC_ERROR;
    use crate::io::storage::{MemoryStore, PROJECTS_KEY, USER_KEY};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn adapter(clear_projects: bool, sign_out_fails: bool) -> (AuthAdapter, Rc<RefCell<Vec<SessionEvent>>>) {
        let provider = FakeProvider {
            sign_out_fails,
            ..FakeProvider::default()
        };
        let mut adapter = AuthAdapter::new(Arc::new(provider), clear_projects);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        adapter.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        (adapter, events)
    }

    fn session() -> Session {
        Session::new("u-1", "me@example.com").with_token("tok")
    }

    #[test]
    fn test_login_success_mirrors_session() {
        let (mut adapter, events) = adapter(true, false);
        let mut store = MemoryStore::new();

        let message = adapter.complete(&mut store, AuthMode::Login, Ok(Some(session())));
        assert_eq!(message, Ok("Login successful!"));
        assert!(adapter.is_signed_in());
        assert_eq!(
            store.get(USER_KEY).as_deref(),
            Some(r#"{"uid":"u-1","email":"me@example.com"}"#)
        );
        assert_eq!(*events.borrow(), vec![SessionEvent::SignedIn(session())]);
    }

    #[test]
    fn test_register_pending_confirmation_stays_signed_out() {
        let (mut adapter, events) = adapter(true, false);
        let mut store = MemoryStore::new();

        let message = adapter.complete(&mut store, AuthMode::Register, Ok(None));
        assert_eq!(
            message,
            Ok("Registration successful! Check your email for verification.")
        );
        assert!(!adapter.is_signed_in());
        assert!(events.borrow().is_empty());
        assert_eq!(store.get(USER_KEY), None);
    }

    #[test]
    fn test_failure_maps_provider_text() {
        let (mut adapter, _) = adapter(true, false);
        let mut store = MemoryStore::new();

        let mapped = adapter.complete(
            &mut store,
            AuthMode::Login,
            Err(AuthError::Provider("bad".into())),
        );
        assert_eq!(mapped, Err("Invalid email or password.".to_string()));

        let fallback = adapter.complete(
            &mut store,
            AuthMode::Login,
            Err(AuthError::Provider("something new".into())),
        );
        assert_eq!(fallback, Err(GENERIC_ERROR.to_string()));
        assert!(!adapter.is_signed_in());
    }

    #[test]
    fn test_logout_clears_user_and_projects_when_configured() {
        let (mut adapter, events) = adapter(true, false);
        let mut store = MemoryStore::new();
        adapter.complete(&mut store, AuthMode::Login, Ok(Some(session()))).unwrap();
        store.set(PROJECTS_KEY, "[]".into()).unwrap();

        assert_eq!(adapter.begin_logout(), Some(session()));
        assert_eq!(adapter.finish_logout(&mut store, Ok(())), Ok(LOGOUT_SUCCESS));
        assert!(!adapter.is_signed_in());
        assert_eq!(store.get(USER_KEY), None);
        assert_eq!(store.get(PROJECTS_KEY), None);
        assert_eq!(events.borrow().last(), Some(&SessionEvent::SignedOut));
    }

    #[test]
    fn test_logout_keeps_projects_when_configured() {
        let (mut adapter, _) = adapter(false, false);
        let mut store = MemoryStore::new();
        adapter.complete(&mut store, AuthMode::Login, Ok(Some(session()))).unwrap();
        store.set(PROJECTS_KEY, "[]".into()).unwrap();

        adapter.finish_logout(&mut store, Ok(())).unwrap();
        assert_eq!(store.get(PROJECTS_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn test_logout_provider_failure_still_signs_out_locally() {
        let (mut adapter, _) = adapter(false, true);
        let mut store = MemoryStore::new();
        adapter.complete(&mut store, AuthMode::Login, Ok(Some(session()))).unwrap();

        let provider = adapter.provider();
        let result = provider.sign_out(&adapter.begin_logout().unwrap());
        assert_eq!(adapter.finish_logout(&mut store, result), Err(LOGOUT_FAILURE));
        assert!(!adapter.is_signed_in());
        assert_eq!(store.get(USER_KEY), None);
    }

    #[test]
    fn test_restore_from_store() {
        let (mut adapter, events) = adapter(true, false);
        let mut store = MemoryStore::new();
        storage::save_user(&mut store, &session()).unwrap();

        adapter.restore(&store).unwrap();
        assert_eq!(adapter.session(), Some(&Session::new("u-1", "me@example.com")));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_storage_failure_surfaces_on_login() {
        let (mut adapter, _) = adapter(true, false);
        let mut store = MemoryStore::with_quota(4);

        let result = adapter.complete(&mut store, AuthMode::Login, Ok(Some(session())));
        assert!(result.unwrap_err().contains("quota"));
        assert!(!adapter.is_signed_in());
    }
}
