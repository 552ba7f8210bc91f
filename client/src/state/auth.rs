//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard, the header, and the login page. Written only by
//! `state::session::SessionManager`, which feeds it operation bookkeeping and
//! sequenced auth change events.
//!
//! DESIGN
//! ======
//! Every auth change event carries a sequence number for the moment the
//! server's session looked the way the event says (see
//! `state::session`). `apply` drops events that are not newer than the last
//! applied one, so a slow session check cannot overwrite a sign-in or
//! sign-out that completed after the check was sent. `loading` is derived from a pending-operation counter so
//! overlapping operations do not clear each other's flag.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use recipes::{SessionInfo, User};

/// Where the session lifecycle currently stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// Nothing has been asked of the server yet.
    #[default]
    Uninitialized,
    /// The initial session restore is in flight.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// A change to the signed-in identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(SessionInfo),
    SignedOut,
    /// Result of a session check: the current session, or none.
    SessionChecked(Option<SessionInfo>),
}

impl AuthEvent {
    fn into_session(self) -> Option<SessionInfo> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::SignedOut => None,
            Self::SessionChecked(session) => session,
        }
    }
}

/// Authentication state tracking the current user and operation status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<SessionInfo>,
    pub phase: AuthPhase,
    pub error: Option<String>,
    /// Incremented on every applied event.
    pub version: u64,
    /// Sequence number of the last applied event.
    pub last_seq: u64,
    pending: u32,
}

impl AuthState {
    /// Whether any credential operation is in flight.
    pub fn loading(&self) -> bool {
        self.pending > 0
    }

    /// Whether the session restore has produced an answer.
    pub fn resolved(&self) -> bool {
        matches!(self.phase, AuthPhase::Authenticated | AuthPhase::Unauthenticated)
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated && self.user.is_some()
    }

    /// Mark the initial restore as started. No-op once resolved.
    pub fn begin_restore(&mut self) {
        if self.phase == AuthPhase::Uninitialized {
            self.phase = AuthPhase::Loading;
        }
    }

    /// Start a credential operation: counts it and clears any previous error.
    pub fn begin_operation(&mut self) {
        self.pending += 1;
        self.error = None;
    }

    /// Finish a credential operation, recording its failure message if any.
    pub fn end_operation(&mut self, error: Option<String>) {
        self.pending = self.pending.saturating_sub(1);
        if error.is_some() {
            self.error = error;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Apply an auth change event produced by a request started at `seq`.
    ///
    /// Returns `false` and leaves the state untouched when the event is not
    /// newer than the last one applied.
    pub fn apply(&mut self, seq: u64, event: AuthEvent) -> bool {
        if seq <= self.last_seq {
            return false;
        }
        let session = event.into_session();
        self.user = session.as_ref().map(|s| s.user.clone());
        self.phase = if session.is_some() { AuthPhase::Authenticated } else { AuthPhase::Unauthenticated };
        self.session = session;
        self.last_seq = seq;
        self.version += 1;
        true
    }
}
