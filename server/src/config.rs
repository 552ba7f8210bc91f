//! Server configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup loads this once and aborts when a required provider or database
//! variable is missing. Handlers read it through `AppState::config`.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORAGE_BUCKET: &str = "recipe-images";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl ProviderTimeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Provider project base URL, without a trailing slash.
    pub provider_url: String,
    /// Public (anon) API key sent as the `apikey` header.
    pub provider_anon_key: String,
    pub database_url: String,
    pub port: u16,
    pub storage_bucket: String,
    pub cookie_secure: bool,
    pub seed_sample_recipes: bool,
    pub db_max_connections: u32,
    pub provider_timeouts: ProviderTimeouts,
    pub max_image_bytes: usize,
}

impl AppConfig {
    /// Build typed config from process environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL`
    /// - `SUPABASE_ANON_KEY`
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `STORAGE_BUCKET`: default `recipe-images`
    /// - `COOKIE_SECURE`: inferred from an `https://` provider URL when absent
    /// - `SEED_SAMPLE_RECIPES`: default true
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `PROVIDER_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PROVIDER_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MAX_IMAGE_BYTES`: default 5 MiB
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let provider_url = required("SUPABASE_URL")?.trim_end_matches('/').to_owned();
        let provider_anon_key = required("SUPABASE_ANON_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "COOKIE_SECURE", value: raw })?,
            None => provider_url.starts_with("https://"),
        };
        let seed_sample_recipes = match lookup("SEED_SAMPLE_RECIPES") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid { var: "SEED_SAMPLE_RECIPES", value: raw })?,
            None => true,
        };

        Ok(Self {
            provider_url,
            provider_anon_key,
            database_url,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            storage_bucket: lookup("STORAGE_BUCKET")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_BUCKET.to_owned()),
            cookie_secure,
            seed_sample_recipes,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            provider_timeouts: ProviderTimeouts {
                request_secs: parse_or(&lookup, "PROVIDER_REQUEST_TIMEOUT_SECS", DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECS)?,
                connect_secs: parse_or(&lookup, "PROVIDER_CONNECT_TIMEOUT_SECS", DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS)?,
            },
            max_image_bytes: parse_or(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
