use super::*;
use uuid::Uuid;

fn session(email: &str) -> SessionInfo {
    SessionInfo {
        user: User { id: Uuid::new_v4(), email: Some(email.to_owned()) },
        expires_at: 1_900_000_000,
    }
}

#[test]
fn default_state_is_uninitialized_and_idle() {
    let state = AuthState::default();
    assert_eq!(state.phase, AuthPhase::Uninitialized);
    assert!(!state.loading());
    assert!(!state.resolved());
    assert!(state.user.is_none());
}

#[test]
fn begin_restore_only_moves_out_of_uninitialized() {
    let mut state = AuthState::default();
    state.begin_restore();
    assert_eq!(state.phase, AuthPhase::Loading);

    state.apply(1, AuthEvent::SignedOut);
    state.begin_restore();
    assert_eq!(state.phase, AuthPhase::Unauthenticated);
}

#[test]
fn signed_in_event_sets_user_and_session() {
    let mut state = AuthState::default();
    let info = session("cook@example.com");

    assert!(state.apply(1, AuthEvent::SignedIn(info.clone())));
    assert_eq!(state.phase, AuthPhase::Authenticated);
    assert_eq!(state.user.as_ref(), Some(&info.user));
    assert_eq!(state.session, Some(info));
    assert!(state.is_authenticated());
    assert_eq!(state.version, 1);
}

#[test]
fn signed_out_event_clears_user_and_session() {
    let mut state = AuthState::default();
    state.apply(1, AuthEvent::SignedIn(session("cook@example.com")));
    assert!(state.apply(2, AuthEvent::SignedOut));

    assert_eq!(state.phase, AuthPhase::Unauthenticated);
    assert!(state.user.is_none());
    assert!(state.session.is_none());
    assert_eq!(state.version, 2);
}

#[test]
fn stale_event_is_discarded() {
    let mut state = AuthState::default();
    let info = session("cook@example.com");
    assert!(state.apply(5, AuthEvent::SignedIn(info.clone())));

    // A session check started before the sign-in answers late with no session.
    assert!(!state.apply(3, AuthEvent::SessionChecked(None)));
    assert_eq!(state.session, Some(info));
    assert_eq!(state.last_seq, 5);
    assert_eq!(state.version, 1);
}

#[test]
fn repeated_sequence_is_discarded() {
    let mut state = AuthState::default();
    state.apply(2, AuthEvent::SignedOut);
    assert!(!state.apply(2, AuthEvent::SignedIn(session("late@example.com"))));
    assert!(state.user.is_none());
}

#[test]
fn overlapping_operations_keep_loading_until_all_finish() {
    let mut state = AuthState::default();
    state.begin_operation();
    state.begin_operation();
    state.end_operation(None);
    assert!(state.loading());
    state.end_operation(None);
    assert!(!state.loading());
}

#[test]
fn operation_error_is_recorded_and_cleared_by_next_operation() {
    let mut state = AuthState::default();
    state.begin_operation();
    state.end_operation(Some("Invalid login credentials".to_owned()));
    assert_eq!(state.error.as_deref(), Some("Invalid login credentials"));

    state.begin_operation();
    assert!(state.error.is_none());
}

#[test]
fn clear_error_leaves_other_fields_alone() {
    let mut state = AuthState::default();
    let info = session("cook@example.com");
    state.apply(1, AuthEvent::SignedIn(info.clone()));
    state.error = Some("boom".to_owned());

    state.clear_error();
    assert!(state.error.is_none());
    assert_eq!(state.session, Some(info));
    assert_eq!(state.phase, AuthPhase::Authenticated);
}

#[test]
fn extra_end_operation_does_not_underflow() {
    let mut state = AuthState::default();
    state.end_operation(None);
    assert!(!state.loading());
}
