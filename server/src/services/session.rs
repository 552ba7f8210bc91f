//! Access-token cache in front of the provider's `/user` endpoint.
//!
//! ARCHITECTURE
//! ============
//! Every authenticated request carries the provider access token in an
//! HttpOnly cookie. Resolving it remotely on each request would put the
//! provider on the hot path, so resolved users are cached in process memory
//! until the token's own expiry (or a short TTL when the expiry is unknown).
//!
//! TRADE-OFFS
//! ==========
//! A token revoked from another device stays valid here until its cache
//! entry expires. Sign-out through this server invalidates immediately.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::provider::ProviderUser;

/// TTL applied when a token is resolved without a known expiry.
pub const UNKNOWN_EXPIRY_TTL_SECS: i64 = 60;
const PURGE_INTERVAL_SECS: u64 = 60;

/// Current wall-clock time in Unix seconds.
#[must_use]
pub fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Current wall-clock time in Unix milliseconds.
#[must_use]
pub fn now_unix_ms() -> i64 {
    i64::try_from(time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUser {
    pub user: ProviderUser,
    /// Seconds since the Unix epoch.
    pub expires_at: i64,
}

#[derive(Clone, Default)]
pub struct SessionCache {
    entries: Arc<RwLock<HashMap<String, CachedUser>>>,
}

impl SessionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token. Expired entries are treated as absent.
    pub async fn get(&self, token: &str, now: i64) -> Option<CachedUser> {
        let entries = self.entries.read().await;
        entries
            .get(token)
            .filter(|entry| entry.expires_at > now)
            .cloned()
    }

    pub async fn insert(&self, token: &str, user: ProviderUser, expires_at: i64) {
        let mut entries = self.entries.write().await;
        entries.insert(token.to_owned(), CachedUser { user, expires_at });
    }

    pub async fn invalidate(&self, token: &str) {
        let mut entries = self.entries.write().await;
        entries.remove(token);
    }

    /// Drop every entry whose expiry has passed. Returns how many were removed.
    pub async fn purge_expired(&self, now: i64) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

/// Spawn the background sweeper that keeps the cache bounded by live tokens.
pub fn spawn_purge_task(cache: SessionCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let removed = cache.purge_expired(now_unix()).await;
            if removed > 0 {
                debug!(removed, "purged expired session cache entries");
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
