//! Hosted auth and object-storage provider.
//!
//! DESIGN
//! ======
//! Credentials, sessions and uploaded images live with an external provider.
//! Handlers never talk HTTP to it directly. They go through two traits,
//! [`AuthProvider`] and [`ImageStorage`], held as `Arc<dyn _>` in
//! `AppState` so tests can swap in in-memory doubles.
//!
//! ERROR HANDLING
//! ==============
//! Provider rejections keep the provider's status code and human message so
//! the login page can show it verbatim. Transport and parse failures collapse
//! into a generic "service unavailable" message for the browser and a
//! detailed `tracing` event for operators.

pub mod supabase;
pub mod types;

pub use supabase::SupabaseClient;
pub use types::{ProviderError, ProviderSession, ProviderUser, SignUpResult};

// =============================================================================
// TRAITS
// =============================================================================

#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange email + password for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<ProviderSession, ProviderError>;

    /// Register a new account. May return a session immediately or require
    /// email confirmation first.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResult, ProviderError>;

    /// Revoke the session identified by `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), ProviderError>;

    /// Ask the provider to email a password-reset link.
    async fn reset_password(&self, email: &str) -> Result<(), ProviderError>;

    /// Set a new password for the user owning `access_token`.
    async fn update_password(&self, access_token: &str, password: &str) -> Result<ProviderUser, ProviderError>;

    /// Resolve the user behind an access token.
    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, ProviderError>;

    /// Trade a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &str) -> Result<ProviderSession, ProviderError>;
}

#[async_trait::async_trait]
pub trait ImageStorage: Send + Sync {
    /// Store `bytes` at `object_path` on behalf of the user owning
    /// `access_token` and return the object's public URL.
    async fn upload(
        &self,
        access_token: &str,
        object_path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ProviderError>;
}
