//! Provider-side identity and session types.

use axum::http::StatusCode;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<ProviderUser> for recipes::User {
    fn from(user: ProviderUser) -> Self {
        Self { id: user.id, email: user.email }
    }
}

/// Tokens issued by the provider. Only ever stored in HttpOnly cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token expiry, seconds since the Unix epoch.
    pub expires_at: i64,
    pub user: ProviderUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpResult {
    Session(ProviderSession),
    ConfirmationRequired(ProviderUser),
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider response parse failed: {0}")]
    Parse(String),
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ProviderError {
    /// Status to return to the browser for this failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => match *status {
                401 | 403 => StatusCode::UNAUTHORIZED,
                422 => StatusCode::UNPROCESSABLE_ENTITY,
                429 => StatusCode::TOO_MANY_REQUESTS,
                400..=499 => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Request(_) | Self::Parse(_) | Self::HttpClientBuild(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { status, message } if *status < 500 => message.clone(),
            _ => "Authentication service is unavailable. Please try again.".to_owned(),
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
