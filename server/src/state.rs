//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed config, the recipe store, the provider seams for auth
//! and image storage, and the access-token cache. Every external dependency
//! sits behind a trait object so route tests run without Postgres or a
//! provider project.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::provider::{AuthProvider, ImageStorage};
use crate::services::recipe::RecipeStore;
use crate::services::session::SessionCache;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub recipes: Arc<dyn RecipeStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub storage: Arc<dyn ImageStorage>,
    pub sessions: SessionCache,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        recipes: Arc<dyn RecipeStore>,
        auth: Arc<dyn AuthProvider>,
        storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self { config: Arc::new(config), recipes, auth, storage, sessions: SessionCache::new() }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
