//! Supabase-style provider client: GoTrue auth endpoints plus object storage.
//!
//! Thin HTTP wrapper over `/auth/v1/*` and `/storage/v1/object/*`. Response
//! parsing lives in free functions so it can be tested without a network.

use reqwest::RequestBuilder;
use serde_json::{Value, json};

use super::types::{ProviderError, ProviderSession, ProviderUser, SignUpResult};
use super::{AuthProvider, ImageStorage};
use crate::config::AppConfig;
use crate::services::session::now_unix;

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseClient {
    /// Build a client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AppConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.provider_timeouts.request())
            .connect_timeout(config.provider_timeouts.connect())
            .build()
            .map_err(|e| ProviderError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.provider_url.clone(),
            anon_key: config.provider_anon_key.clone(),
            bucket: config.storage_bucket.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    /// Attach the project key and a bearer token. Anonymous calls use the
    /// anon key as the bearer.
    fn authorize(&self, request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(self.anon_key.as_str()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ProviderError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(rejection(status, &text));
        }
        Ok(text)
    }

    async fn password_grant(&self, email: &str, password: &str) -> Result<ProviderSession, ProviderError> {
        let request = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .json(&json!({ "email": email, "password": password }));
        let text = self.send(self.authorize(request, None)).await?;
        parse_session(&text, now_unix())
    }
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, ProviderError> {
        self.password_grant(email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, ProviderError> {
        let request = self
            .http
            .post(self.auth_url("signup"))
            .json(&json!({ "email": email, "password": password }));
        let text = self.send(self.authorize(request, None)).await?;
        parse_sign_up(&text, now_unix())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError> {
        let request = self.http.post(self.auth_url("logout"));
        self.send(self.authorize(request, Some(access_token))).await?;
        Ok(())
    }

    async fn reset_password(&self, email: &str) -> Result<(), ProviderError> {
        let request = self
            .http
            .post(self.auth_url("recover"))
            .json(&json!({ "email": email }));
        self.send(self.authorize(request, None)).await?;
        Ok(())
    }

    async fn update_password(&self, access_token: &str, password: &str) -> Result<ProviderUser, ProviderError> {
        let request = self
            .http
            .put(self.auth_url("user"))
            .json(&json!({ "password": password }));
        let text = self.send(self.authorize(request, Some(access_token))).await?;
        parse_user(&text)
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError> {
        let request = self.http.get(self.auth_url("user"));
        let text = self.send(self.authorize(request, Some(access_token))).await?;
        parse_user(&text)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, ProviderError> {
        let request = self
            .http
            .post(self.auth_url("token?grant_type=refresh_token"))
            .json(&json!({ "refresh_token": refresh_token }));
        let text = self.send(self.authorize(request, None)).await?;
        parse_session(&text, now_unix())
    }
}

#[async_trait::async_trait]
impl ImageStorage for SupabaseClient {
    async fn upload(
        &self,
        access_token: &str,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError> {
        let request = self
            .http
            .post(object_url(&self.base_url, &self.bucket, object_path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes);
        self.send(self.authorize(request, Some(access_token))).await?;
        Ok(public_url(&self.base_url, &self.bucket, object_path))
    }
}

// =============================================================================
// URLS
// =============================================================================

pub(crate) fn object_url(base_url: &str, bucket: &str, object_path: &str) -> String {
    format!("{base_url}/storage/v1/object/{bucket}/{object_path}")
}

pub(crate) fn public_url(base_url: &str, bucket: &str, object_path: &str) -> String {
    format!("{base_url}/storage/v1/object/public/{bucket}/{object_path}")
}

// =============================================================================
// PARSING
// =============================================================================

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: ProviderUser,
}

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

fn session_from_token(token: TokenResponse, now: i64) -> ProviderSession {
    let expires_at = token
        .expires_at
        .unwrap_or_else(|| now + token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
    ProviderSession {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        expires_at,
        user: token.user,
    }
}

pub(crate) fn parse_session(json: &str, now: i64) -> Result<ProviderSession, ProviderError> {
    let token: TokenResponse = serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(session_from_token(token, now))
}

/// Sign-up answers with a full token response when email confirmation is
/// disabled, and with the bare user (sometimes wrapped in `user`) otherwise.
pub(crate) fn parse_sign_up(json: &str, now: i64) -> Result<SignUpResult, ProviderError> {
    let value: Value = serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;
    if value.get("access_token").is_some_and(|t| !t.is_null()) {
        let token: TokenResponse = serde_json::from_value(value).map_err(|e| ProviderError::Parse(e.to_string()))?;
        return Ok(SignUpResult::Session(session_from_token(token, now)));
    }
    let user_value = match value.get("user") {
        Some(inner) if inner.is_object() => inner.clone(),
        _ => value,
    };
    let user: ProviderUser = serde_json::from_value(user_value).map_err(|e| ProviderError::Parse(e.to_string()))?;
    Ok(SignUpResult::ConfirmationRequired(user))
}

pub(crate) fn parse_user(json: &str) -> Result<ProviderUser, ProviderError> {
    serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Pull the human-readable message out of a provider error body. GoTrue and
/// storage disagree on the field name.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error_description", "msg", "message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_owned)
}

fn rejection(status: u16, body: &str) -> ProviderError {
    let message = error_message(body).unwrap_or_else(|| format!("request failed with status {status}"));
    ProviderError::Rejected { status, message }
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
