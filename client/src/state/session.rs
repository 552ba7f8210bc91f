//! Session manager: the one writer of [`AuthState`].
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds a single manager, provides it through Leptos context, and
//! starts the session watch. Pages call its credential operations; nothing
//! else mutates auth state.
//!
//! DESIGN
//! ======
//! Credential calls go through the [`AuthBackend`] seam so the bookkeeping
//! (loading counter, error capture, sequenced events) is testable without a
//! browser.
//!
//! Events are sequenced by when the server's answer describes its session.
//! A session check reports the session as of its request, so it takes its
//! number before sending. A credential operation changes the session only
//! when the server answers, so it takes its number after the answer
//! arrives. Either way a check that overlaps a sign-in or sign-out can
//! never undo it. State lives behind [`AuthStore`], implemented for the reactive
//! `RwSignal` in the app and for a plain cell in tests.
//!
//! ERROR HANDLING
//! ==============
//! Every operation stores its failure message in `AuthState::error` and also
//! returns it as `Err`, so callers can react locally (stay on the form) while
//! shared UI shows the message.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::*;
use recipes::{Credentials, SessionInfo, SignUpOutcome};

use super::auth::{AuthEvent, AuthState};
use crate::net::api;

/// Seconds between background session checks.
pub const SESSION_CHECK_INTERVAL_SECS: u64 = 60;

/// Credential operations against the server's `/api/auth` surface.
#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionInfo, String>;
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, String>;
    async fn sign_out(&self) -> Result<(), String>;
    async fn reset_password(&self, email: &str) -> Result<(), String>;
    async fn update_password(&self, password: &str) -> Result<(), String>;
    /// Current session, `Ok(None)` when signed out.
    async fn session(&self) -> Result<Option<SessionInfo>, String>;
}

/// Where auth state is kept.
pub trait AuthStore: Clone + 'static {
    fn modify(&self, f: impl FnOnce(&mut AuthState));
    fn snapshot(&self) -> AuthState;
}

impl AuthStore for RwSignal<AuthState> {
    fn modify(&self, f: impl FnOnce(&mut AuthState)) {
        self.update(f);
    }

    fn snapshot(&self) -> AuthState {
        self.get_untracked()
    }
}

/// Backend that calls the server over HTTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpAuthBackend;

impl AuthBackend for HttpAuthBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionInfo, String> {
        api::sign_in(credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, String> {
        api::sign_up(credentials).await
    }

    async fn sign_out(&self) -> Result<(), String> {
        api::sign_out().await
    }

    async fn reset_password(&self, email: &str) -> Result<(), String> {
        api::reset_password(email).await
    }

    async fn update_password(&self, password: &str) -> Result<(), String> {
        api::update_password(password).await
    }

    async fn session(&self) -> Result<Option<SessionInfo>, String> {
        api::fetch_session().await
    }
}

/// The manager type the app provides through context.
pub type AppSession = SessionManager<HttpAuthBackend, RwSignal<AuthState>>;

pub struct SessionManager<B, S> {
    backend: Arc<B>,
    store: S,
    seq: Arc<AtomicU64>,
}

impl<B, S: Clone> Clone for SessionManager<B, S> {
    fn clone(&self) -> Self {
        Self { backend: Arc::clone(&self.backend), store: self.store.clone(), seq: Arc::clone(&self.seq) }
    }
}

impl<B: AuthBackend, S: AuthStore> SessionManager<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        Self { backend: Arc::new(backend), store, seq: Arc::new(AtomicU64::new(0)) }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> AuthState {
        self.store.snapshot()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Route an auth change event into state. Returns whether it applied.
    pub fn apply_event(&self, seq: u64, event: AuthEvent) -> bool {
        let mut applied = false;
        self.store.modify(|state| applied = state.apply(seq, event));
        applied
    }

    fn begin_operation(&self) {
        self.store.modify(AuthState::begin_operation);
    }

    fn end_operation<T>(&self, result: &Result<T, String>) {
        let error = result.as_ref().err().cloned();
        self.store.modify(|state| state.end_operation(error));
    }

    /// # Errors
    ///
    /// Returns the server's message, e.g. for invalid credentials.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionInfo, String> {
        self.begin_operation();
        let credentials = Credentials { email: email.trim().to_owned(), password: password.to_owned() };
        let result = self.backend.sign_in(&credentials).await;
        if let Ok(session) = &result {
            self.apply_event(self.next_seq(), AuthEvent::SignedIn(session.clone()));
        }
        self.end_operation(&result);
        result
    }

    /// When the provider requires email confirmation no session is applied
    /// and the user stays signed out.
    ///
    /// # Errors
    ///
    /// Returns the server's message, e.g. for an already registered email.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, String> {
        self.begin_operation();
        let credentials = Credentials { email: email.trim().to_owned(), password: password.to_owned() };
        let result = self.backend.sign_up(&credentials).await;
        if let Ok(SignUpOutcome::SignedIn(session)) = &result {
            self.apply_event(self.next_seq(), AuthEvent::SignedIn(session.clone()));
        }
        self.end_operation(&result);
        result
    }

    /// # Errors
    ///
    /// Returns the failure message; the local session is kept in that case.
    pub async fn sign_out(&self) -> Result<(), String> {
        self.begin_operation();
        let result = self.backend.sign_out().await;
        if result.is_ok() {
            self.apply_event(self.next_seq(), AuthEvent::SignedOut);
        }
        self.end_operation(&result);
        result
    }

    /// # Errors
    ///
    /// Returns the failure message.
    pub async fn reset_password(&self, email: &str) -> Result<(), String> {
        self.begin_operation();
        let result = self.backend.reset_password(email.trim()).await;
        self.end_operation(&result);
        result
    }

    /// The server enforces that a session is present.
    ///
    /// # Errors
    ///
    /// Returns the failure message, e.g. when not signed in.
    pub async fn update_password(&self, password: &str) -> Result<(), String> {
        self.begin_operation();
        let result = self.backend.update_password(password).await;
        self.end_operation(&result);
        result
    }

    pub fn clear_error(&self) {
        self.store.modify(AuthState::clear_error);
    }

    /// Ask the server for the current session and apply the answer.
    ///
    /// Does not touch `loading` or `error`. A failed check before the first
    /// answer resolves to signed out so guarded views do not wait forever;
    /// later failures keep the current state.
    pub async fn check_session(&self) -> bool {
        let seq = self.next_seq();
        self.store.modify(AuthState::begin_restore);
        match self.backend.session().await {
            Ok(session) => self.apply_event(seq, AuthEvent::SessionChecked(session)),
            Err(message) => {
                #[cfg(feature = "hydrate")]
                log::warn!("session check failed: {message}");
                #[cfg(not(feature = "hydrate"))]
                let _ = message;
                if self.store.snapshot().resolved() {
                    false
                } else {
                    self.apply_event(seq, AuthEvent::SessionChecked(None))
                }
            }
        }
    }
}

/// Restore the session now, then re-check it periodically until the owning
/// reactive scope is cleaned up.
#[cfg(feature = "hydrate")]
pub fn start_session_watch<B, S>(manager: SessionManager<B, S>)
where
    B: AuthBackend + 'static,
    S: AuthStore,
{
    let alive = Arc::new(std::sync::atomic::AtomicBool::new(true));
    let alive_task = alive.clone();
    leptos::task::spawn_local(async move {
        manager.check_session().await;
        loop {
            gloo_timers::future::sleep(std::time::Duration::from_secs(SESSION_CHECK_INTERVAL_SECS)).await;
            if !alive_task.load(Ordering::Relaxed) {
                break;
            }
            manager.check_session().await;
        }
    });
    on_cleanup(move || alive.store(false, Ordering::Relaxed));
}
