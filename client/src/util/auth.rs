//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded routes apply identical unauthenticated redirect behavior: send the
//! user to `/login?next=<requested path>`, and after sign-in send them back to
//! `next` when it is a same-origin relative path.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// What a guarded route should render for the current auth state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    /// Session restore has not answered yet.
    Loading,
    Redirect,
    Render,
}

pub fn guard_view(state: &AuthState) -> GuardView {
    if !state.resolved() {
        GuardView::Loading
    } else if state.is_authenticated() {
        GuardView::Render
    } else {
        GuardView::Redirect
    }
}

/// Login URL that returns to `requested` after sign-in.
pub fn login_redirect(requested: &str) -> String {
    format!("{LOGIN_PATH}?next={}", urlencoding::encode(requested))
}

/// Resolve the `next` query parameter to a path that is safe to navigate to.
///
/// Only same-origin relative paths are honored; anything else (absolute or
/// protocol-relative URLs, backslash tricks, the login page itself) falls
/// back to the home page.
pub fn safe_next_path(next: Option<&str>) -> String {
    let Some(next) = next.map(str::trim).filter(|n| !n.is_empty()) else {
        return HOME_PATH.to_owned();
    };
    let relative = next.starts_with('/') && !next.starts_with("//");
    let clean = !next.contains('\\') && !next.chars().any(char::is_control);
    let is_login = next == LOGIN_PATH || next.starts_with("/login?") || next.starts_with("/login/");
    if relative && clean && !is_login { next.to_owned() } else { HOME_PATH.to_owned() }
}

/// Redirect to the login page, remembering `requested`, whenever the session
/// has resolved to signed out.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, requested: Signal<String>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if guard_view(&auth.get()) == GuardView::Redirect {
            let target = login_redirect(&requested.get_untracked());
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
