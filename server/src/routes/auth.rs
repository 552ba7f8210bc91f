//! Auth routes: credential operations proxied to the provider, session
//! cookies, and the authenticated-user extractor.
//!
//! DESIGN
//! ======
//! The browser never sees provider tokens. Sign-in and refresh store the
//! access token, refresh token and access expiry in HttpOnly cookies; the
//! JSON body only carries the user and expiry. `AuthUser` resolves the access
//! cookie through the session cache, falling back to the provider's `/user`
//! endpoint on a miss.

use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use recipes::auth::{check_password, normalize_email};
use recipes::{Credentials, EmailRequest, PasswordUpdate, SessionInfo, SignUpOutcome};
use time::Duration;
use tracing::{info, warn};

use super::ApiFailure;
use crate::provider::{ProviderError, ProviderSession, ProviderUser, SignUpResult};
use crate::services::session::{CachedUser, UNKNOWN_EXPIRY_TTL_SECS, now_unix};
use crate::state::AppState;

pub(crate) const ACCESS_COOKIE: &str = "sb-access-token";
pub(crate) const REFRESH_COOKIE: &str = "sb-refresh-token";
pub(crate) const EXPIRES_COOKIE: &str = "sb-expires-at";
const REFRESH_COOKIE_DAYS: i64 = 30;

// =============================================================================
// COOKIES
// =============================================================================

fn build_cookie(name: &'static str, value: String, secure: bool, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

pub(crate) fn set_session_cookies(jar: CookieJar, session: &ProviderSession, secure: bool, now: i64) -> CookieJar {
    let access_ttl = Duration::seconds((session.expires_at - now).max(0));
    jar.add(build_cookie(ACCESS_COOKIE, session.access_token.clone(), secure, access_ttl))
        .add(build_cookie(EXPIRES_COOKIE, session.expires_at.to_string(), secure, access_ttl))
        .add(build_cookie(
            REFRESH_COOKIE,
            session.refresh_token.clone(),
            secure,
            Duration::days(REFRESH_COOKIE_DAYS),
        ))
}

pub(crate) fn clear_session_cookies(jar: CookieJar, secure: bool) -> CookieJar {
    [ACCESS_COOKIE, EXPIRES_COOKIE, REFRESH_COOKIE]
        .into_iter()
        .fold(jar, |jar, name| jar.add(build_cookie(name, String::new(), secure, Duration::ZERO)))
}

fn cookie_value<'a>(jar: &'a CookieJar, name: &str) -> Option<&'a str> {
    jar.get(name).map(Cookie::value).filter(|v| !v.is_empty())
}

fn session_info(user: &ProviderUser, expires_at: i64) -> SessionInfo {
    SessionInfo { user: user.clone().into(), expires_at }
}

// =============================================================================
// TOKEN RESOLUTION
// =============================================================================

/// Resolve an access token to its user. `Ok(None)` means the token is
/// expired, revoked or unknown to the provider.
pub(crate) async fn resolve_access_token(
    state: &AppState,
    token: &str,
    expiry_hint: Option<i64>,
) -> Result<Option<CachedUser>, ProviderError> {
    let now = now_unix();
    if let Some(hit) = state.sessions.get(token, now).await {
        return Ok(Some(hit));
    }
    if expiry_hint.is_some_and(|exp| exp <= now) {
        return Ok(None);
    }

    match state.auth.get_user(token).await {
        Ok(user) => {
            let expires_at = expiry_hint.unwrap_or(now + UNKNOWN_EXPIRY_TTL_SECS);
            state.sessions.insert(token, user.clone(), expires_at).await;
            Ok(Some(CachedUser { user, expires_at }))
        }
        Err(ProviderError::Rejected { status, .. }) if (400..500).contains(&status) => Ok(None),
        Err(e) => Err(e),
    }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the access-token cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: ProviderUser,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = cookie_value(&jar, ACCESS_COOKIE) else {
            return Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Not signed in"));
        };
        let expiry_hint = cookie_value(&jar, EXPIRES_COOKIE).and_then(|v| v.parse::<i64>().ok());

        let app_state = AppState::from_ref(state);
        match resolve_access_token(&app_state, token, expiry_hint).await {
            Ok(Some(cached)) => Ok(Self { user: cached.user, token: token.to_owned() }),
            Ok(None) => Err(ApiFailure::new(StatusCode::UNAUTHORIZED, "Session expired")),
            Err(e) => {
                warn!(error = %e, "access token validation failed");
                Err(ApiFailure::provider(&e))
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn require_email(raw: &str) -> Result<String, ApiFailure> {
    normalize_email(raw).ok_or_else(|| ApiFailure::new(StatusCode::BAD_REQUEST, "Enter a valid email address"))
}

/// `POST /api/auth/sign-in`: exchange credentials for session cookies.
pub async fn sign_in(State(state): State<AppState>, jar: CookieJar, Json(body): Json<Credentials>) -> Response {
    let email = match require_email(&body.email) {
        Ok(email) => email,
        Err(failure) => return failure.into_response(),
    };
    if body.password.is_empty() {
        return ApiFailure::new(StatusCode::BAD_REQUEST, "Password is required").into_response();
    }

    match state.auth.sign_in(&email, &body.password).await {
        Ok(session) => {
            info!(user_id = %session.user.id, "user signed in");
            start_session(&state, jar, &session).await
        }
        Err(e) => {
            warn!(error = %e, "sign-in rejected");
            ApiFailure::provider(&e).into_response()
        }
    }
}

async fn start_session(state: &AppState, jar: CookieJar, session: &ProviderSession) -> Response {
    state
        .sessions
        .insert(&session.access_token, session.user.clone(), session.expires_at)
        .await;
    let jar = set_session_cookies(jar, session, state.config.cookie_secure, now_unix());
    (jar, Json(session_info(&session.user, session.expires_at))).into_response()
}

/// `POST /api/auth/sign-up`: register; signs in immediately unless the
/// provider requires email confirmation.
pub async fn sign_up(State(state): State<AppState>, jar: CookieJar, Json(body): Json<Credentials>) -> Response {
    let email = match require_email(&body.email) {
        Ok(email) => email,
        Err(failure) => return failure.into_response(),
    };
    if let Err(message) = check_password(&body.password) {
        return ApiFailure::new(StatusCode::BAD_REQUEST, message).into_response();
    }

    match state.auth.sign_up(&email, &body.password).await {
        Ok(SignUpResult::Session(session)) => {
            info!(user_id = %session.user.id, "user signed up");
            state
                .sessions
                .insert(&session.access_token, session.user.clone(), session.expires_at)
                .await;
            let jar = set_session_cookies(jar, &session, state.config.cookie_secure, now_unix());
            let outcome = SignUpOutcome::SignedIn(session_info(&session.user, session.expires_at));
            (jar, Json(outcome)).into_response()
        }
        Ok(SignUpResult::ConfirmationRequired(user)) => {
            info!(user_id = %user.id, "sign-up awaiting email confirmation");
            Json(SignUpOutcome::ConfirmationRequired { email }).into_response()
        }
        Err(e) => {
            warn!(error = %e, "sign-up rejected");
            ApiFailure::provider(&e).into_response()
        }
    }
}

/// `POST /api/auth/sign-out`: revoke at the provider, drop the cache entry,
/// clear cookies. Succeeds even without a session.
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = cookie_value(&jar, ACCESS_COOKIE) {
        state.sessions.invalidate(token).await;
        if let Err(e) = state.auth.sign_out(token).await {
            warn!(error = %e, "provider sign-out failed; clearing local session anyway");
        }
    }
    let jar = clear_session_cookies(jar, state.config.cookie_secure);
    (jar, StatusCode::NO_CONTENT).into_response()
}

/// `POST /api/auth/reset-password`: ask the provider to email a reset link.
pub async fn reset_password(State(state): State<AppState>, Json(body): Json<EmailRequest>) -> Response {
    let email = match require_email(&body.email) {
        Ok(email) => email,
        Err(failure) => return failure.into_response(),
    };
    match state.auth.reset_password(&email).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            warn!(error = %e, "password reset request failed");
            ApiFailure::provider(&e).into_response()
        }
    }
}

/// `POST /api/auth/update-password`: set a new password for the signed-in user.
pub async fn update_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PasswordUpdate>,
) -> Response {
    if let Err(message) = check_password(&body.password) {
        return ApiFailure::new(StatusCode::BAD_REQUEST, message).into_response();
    }
    match state.auth.update_password(&auth.token, &body.password).await {
        Ok(user) => {
            info!(user_id = %user.id, "password updated");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            warn!(error = %e, user_id = %auth.user.id, "password update failed");
            ApiFailure::provider(&e).into_response()
        }
    }
}

/// `GET /api/auth/session`: current session, refreshed through the refresh
/// cookie when the access token has expired.
pub async fn session(State(state): State<AppState>, jar: CookieJar) -> Response {
    let secure = state.config.cookie_secure;

    if let Some(token) = cookie_value(&jar, ACCESS_COOKIE) {
        let expiry_hint = cookie_value(&jar, EXPIRES_COOKIE).and_then(|v| v.parse::<i64>().ok());
        match resolve_access_token(&state, token, expiry_hint).await {
            Ok(Some(cached)) => return Json(session_info(&cached.user, cached.expires_at)).into_response(),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "session check failed");
                return ApiFailure::provider(&e).into_response();
            }
        }
        state.sessions.invalidate(token).await;
    }

    let Some(refresh_token) = cookie_value(&jar, REFRESH_COOKIE) else {
        return (clear_session_cookies(jar, secure), ApiFailure::new(StatusCode::UNAUTHORIZED, "Not signed in"))
            .into_response();
    };

    match state.auth.refresh(refresh_token).await {
        Ok(refreshed) => {
            info!(user_id = %refreshed.user.id, "session refreshed");
            start_session(&state, jar, &refreshed).await
        }
        Err(ProviderError::Rejected { status, message }) if status < 500 => {
            info!(%message, "refresh token rejected");
            (clear_session_cookies(jar, secure), ApiFailure::new(StatusCode::UNAUTHORIZED, "Session expired"))
                .into_response()
        }
        Err(e) => {
            warn!(error = %e, "session refresh failed");
            ApiFailure::provider(&e).into_response()
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
