use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use recipes::User;
use uuid::Uuid;

use super::*;
use crate::state::auth::AuthPhase;

const EMAIL: &str = "cook@example.com";
const PASSWORD: &str = "secret123";

#[derive(Clone, Default)]
struct MemoryStore(Rc<RefCell<AuthState>>);

impl AuthStore for MemoryStore {
    fn modify(&self, f: impl FnOnce(&mut AuthState)) {
        f(&mut self.0.borrow_mut());
    }

    fn snapshot(&self) -> AuthState {
        self.0.borrow().clone()
    }
}

#[derive(Default)]
struct MockBackend {
    current: RefCell<Option<SessionInfo>>,
    require_confirmation: Cell<bool>,
    offline: Cell<bool>,
    pending_check: RefCell<Option<oneshot::Receiver<Option<SessionInfo>>>>,
    /// Holds sign-in and sign-out until released; the server-side session
    /// changes only when they answer.
    credential_gate: RefCell<Option<oneshot::Receiver<()>>>,
    resets: RefCell<Vec<String>>,
}

fn info() -> SessionInfo {
    SessionInfo {
        user: User { id: Uuid::from_u128(7), email: Some(EMAIL.to_owned()) },
        expires_at: 1_900_000_000,
    }
}

impl MockBackend {
    fn offline_check(&self) -> Result<(), String> {
        if self.offline.get() { Err("network error".to_owned()) } else { Ok(()) }
    }

    async fn answer_credential_call(&self) {
        let gate = self.credential_gate.borrow_mut().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }
}

impl AuthBackend for MockBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<SessionInfo, String> {
        self.offline_check()?;
        if credentials.email != EMAIL || credentials.password != PASSWORD {
            return Err("Invalid login credentials".to_owned());
        }
        self.answer_credential_call().await;
        *self.current.borrow_mut() = Some(info());
        Ok(info())
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, String> {
        self.offline_check()?;
        if credentials.email == EMAIL {
            return Err("User already registered".to_owned());
        }
        if self.require_confirmation.get() {
            return Ok(SignUpOutcome::ConfirmationRequired { email: credentials.email.clone() });
        }
        let session = SessionInfo {
            user: User { id: Uuid::from_u128(8), email: Some(credentials.email.clone()) },
            expires_at: 1_900_000_000,
        };
        *self.current.borrow_mut() = Some(session.clone());
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> Result<(), String> {
        self.offline_check()?;
        self.answer_credential_call().await;
        *self.current.borrow_mut() = None;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), String> {
        self.offline_check()?;
        self.resets.borrow_mut().push(email.to_owned());
        Ok(())
    }

    async fn update_password(&self, _password: &str) -> Result<(), String> {
        self.offline_check()?;
        if self.current.borrow().is_none() {
            return Err("Not signed in".to_owned());
        }
        Ok(())
    }

    async fn session(&self) -> Result<Option<SessionInfo>, String> {
        self.offline_check()?;
        let pending = self.pending_check.borrow_mut().take();
        if let Some(rx) = pending {
            return rx.await.map_err(|_| "cancelled".to_owned());
        }
        Ok(self.current.borrow().clone())
    }
}

fn manager() -> SessionManager<MockBackend, MemoryStore> {
    SessionManager::new(MockBackend::default(), MemoryStore::default())
}

#[test]
fn sign_in_sets_user_and_session() {
    let m = manager();
    let session = block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();

    let state = m.state();
    assert_eq!(state.phase, AuthPhase::Authenticated);
    assert_eq!(state.user, Some(session.user.clone()));
    assert_eq!(state.session, Some(session));
    assert!(!state.loading());
    assert!(state.error.is_none());
}

#[test]
fn sign_in_trims_email() {
    let m = manager();
    assert!(block_on(m.sign_in("  cook@example.com ", PASSWORD)).is_ok());
}

#[test]
fn invalid_credentials_leave_user_unset_and_error_set() {
    let m = manager();
    let err = block_on(m.sign_in(EMAIL, "wrong")).unwrap_err();

    let state = m.state();
    assert_eq!(err, "Invalid login credentials");
    assert!(state.user.is_none());
    assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));
    assert!(!state.loading());
}

#[test]
fn sign_out_after_sign_in_clears_user_and_session() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    block_on(m.sign_out()).unwrap();

    let state = m.state();
    assert!(state.user.is_none());
    assert!(state.session.is_none());
    assert_eq!(state.phase, AuthPhase::Unauthenticated);
}

#[test]
fn failed_sign_out_keeps_session_and_reports_error() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    m.backend().offline.set(true);

    assert!(block_on(m.sign_out()).is_err());
    let state = m.state();
    assert!(state.user.is_some());
    assert_eq!(state.error.as_deref(), Some("network error"));
}

#[test]
fn sign_up_with_session_signs_in() {
    let m = manager();
    let outcome = block_on(m.sign_up("new@example.com", PASSWORD)).unwrap();
    assert!(matches!(outcome, SignUpOutcome::SignedIn(_)));
    assert_eq!(
        m.state().user.and_then(|u| u.email).as_deref(),
        Some("new@example.com")
    );
}

#[test]
fn sign_up_requiring_confirmation_stays_signed_out() {
    let m = manager();
    m.backend().require_confirmation.set(true);

    let outcome = block_on(m.sign_up("new@example.com", PASSWORD)).unwrap();
    assert_eq!(outcome, SignUpOutcome::ConfirmationRequired { email: "new@example.com".to_owned() });
    assert!(m.state().user.is_none());
    assert_eq!(m.state().version, 0);
}

#[test]
fn sign_up_failure_is_captured() {
    let m = manager();
    let err = block_on(m.sign_up(EMAIL, PASSWORD)).unwrap_err();
    assert_eq!(m.state().error, Some(err));
}

#[test]
fn reset_password_changes_nothing_but_bookkeeping() {
    let m = manager();
    block_on(m.reset_password(" cook@example.com ")).unwrap();
    assert_eq!(*m.backend().resets.borrow(), ["cook@example.com"]);
    assert_eq!(m.state(), AuthState::default());
}

#[test]
fn update_password_without_session_fails() {
    let m = manager();
    let err = block_on(m.update_password("newsecret")).unwrap_err();
    assert_eq!(err, "Not signed in");
    assert_eq!(m.state().error.as_deref(), Some("Not signed in"));
}

#[test]
fn clear_error_only_resets_error() {
    let m = manager();
    block_on(m.sign_in(EMAIL, "wrong")).unwrap_err();
    m.clear_error();
    let state = m.state();
    assert!(state.error.is_none());
    assert_eq!(state.phase, AuthPhase::Uninitialized);
}

#[test]
fn check_session_restores_existing_session() {
    let m = manager();
    *m.backend().current.borrow_mut() = Some(info());

    assert!(block_on(m.check_session()));
    assert_eq!(m.state().phase, AuthPhase::Authenticated);
}

#[test]
fn check_session_without_session_resolves_unauthenticated() {
    let m = manager();
    assert!(block_on(m.check_session()));
    assert_eq!(m.state().phase, AuthPhase::Unauthenticated);
}

#[test]
fn first_check_failure_resolves_unauthenticated() {
    let m = manager();
    m.backend().offline.set(true);
    assert!(block_on(m.check_session()));
    assert_eq!(m.state().phase, AuthPhase::Unauthenticated);
    assert!(m.state().error.is_none());
}

#[test]
fn later_check_failure_keeps_session() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    m.backend().offline.set(true);

    assert!(!block_on(m.check_session()));
    assert!(m.state().is_authenticated());
}

#[test]
fn check_detects_server_side_sign_out() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    *m.backend().current.borrow_mut() = None;

    assert!(block_on(m.check_session()));
    assert!(m.state().user.is_none());
}

#[test]
fn slow_session_check_cannot_overwrite_newer_sign_in() {
    let m = manager();
    let (tx, rx) = oneshot::channel();
    *m.backend().pending_check.borrow_mut() = Some(rx);

    let check = m.check_session();
    let sign_in = async {
        let result = m.sign_in(EMAIL, PASSWORD).await;
        // The check started first answers only after the sign-in landed.
        tx.send(None).unwrap();
        result
    };
    let (applied, signed_in) = block_on(async { futures::join!(check, sign_in) });

    assert!(!applied);
    assert!(signed_in.is_ok());
    assert!(m.state().is_authenticated());
    assert_eq!(m.state().last_seq, 2);
}

#[test]
fn check_sent_during_sign_in_cannot_undo_it() {
    let m = manager();
    let (tx, rx) = oneshot::channel();
    *m.backend().credential_gate.borrow_mut() = Some(rx);

    let sign_in = m.sign_in(EMAIL, PASSWORD);
    let check = async {
        // The server has not set the session yet, so this answers signed out.
        let applied = m.check_session().await;
        tx.send(()).unwrap();
        applied
    };
    let (signed_in, applied) = block_on(async { futures::join!(sign_in, check) });

    assert!(signed_in.is_ok());
    assert!(applied);
    let state = m.state();
    assert_eq!(state.phase, AuthPhase::Authenticated);
    assert!(state.is_authenticated());
    assert!(!state.loading());
}

#[test]
fn slow_session_check_cannot_undo_newer_sign_out() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    let (tx, rx) = oneshot::channel();
    *m.backend().pending_check.borrow_mut() = Some(rx);

    let check = m.check_session();
    let sign_out = async {
        let result = m.sign_out().await;
        // The check was sent while the session still existed.
        tx.send(Some(info())).unwrap();
        result
    };
    let (applied, signed_out) = block_on(async { futures::join!(check, sign_out) });

    assert!(!applied);
    assert!(signed_out.is_ok());
    assert!(m.state().user.is_none());
    assert_eq!(m.state().last_seq, 3);
}

#[test]
fn check_sent_during_sign_out_cannot_restore_session() {
    let m = manager();
    block_on(m.sign_in(EMAIL, PASSWORD)).unwrap();
    let (tx, rx) = oneshot::channel();
    *m.backend().credential_gate.borrow_mut() = Some(rx);

    let sign_out = m.sign_out();
    let check = async {
        // Cookies are still set on the server, so this still sees the session.
        let applied = m.check_session().await;
        tx.send(()).unwrap();
        applied
    };
    let (signed_out, applied) = block_on(async { futures::join!(sign_out, check) });

    assert!(signed_out.is_ok());
    assert!(applied);
    let state = m.state();
    assert_eq!(state.phase, AuthPhase::Unauthenticated);
    assert!(state.user.is_none());
    assert!(state.session.is_none());
}

#[test]
fn clones_share_state_and_sequence() {
    let m = manager();
    let other = m.clone();
    block_on(other.sign_in(EMAIL, PASSWORD)).unwrap();
    assert!(m.state().is_authenticated());
    // The next event from either handle must be newer.
    assert!(m.apply_event(m.state().last_seq + 1, AuthEvent::SignedOut));
}
