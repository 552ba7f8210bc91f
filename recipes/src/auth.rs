//! Auth DTOs exchanged between the client and `/api/auth/*`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::FieldErrors;

/// Minimum password length accepted by the provider.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordUpdate {
    pub password: String,
}

/// The signed-in identity as exposed to the browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Current session as seen by the browser. Tokens stay in HttpOnly cookies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user: User,
    /// Access-token expiry, seconds since the Unix epoch.
    pub expires_at: i64,
}

/// Result of `POST /api/auth/sign-up`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SignUpOutcome {
    /// The provider issued a session immediately.
    SignedIn(SessionInfo),
    /// The provider sent a confirmation email; no session yet.
    ConfirmationRequired { email: String },
}

/// JSON error body returned by every API endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl ApiError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into(), fields: FieldErrors::new() }
    }

    #[must_use]
    pub fn with_fields(message: impl Into<String>, fields: FieldErrors) -> Self {
        Self { error: message.into(), fields }
    }
}

/// Trim and lowercase an email address, rejecting values that are not
/// shaped like `local@domain`.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let mut parts = normalized.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return None;
    };
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(normalized)
}

/// Check a new password against the provider's minimum length.
///
/// # Errors
///
/// Returns the message to show next to the password field.
pub fn check_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
    Ok(())
}
