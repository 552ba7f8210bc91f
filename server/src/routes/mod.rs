//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API and stitches it with Leptos SSR rendering
//! under a single Axum router. Compiled client assets are served from
//! `/pkg`; everything else under the site root (recipe placeholder images,
//! icons) is served as static files.

pub mod auth;
pub mod recipes;

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::provider::ProviderError;
use crate::state::AppState;

/// Multipart overhead allowed on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

// =============================================================================
// ERRORS
// =============================================================================

/// JSON error response: `{ "error": "...", "fields": { ... } }`.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub body: ::recipes::ApiError,
}

impl ApiFailure {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, body: ::recipes::ApiError::new(message) }
    }

    #[must_use]
    pub fn with_fields(status: StatusCode, message: impl Into<String>, fields: ::recipes::FieldErrors) -> Self {
        Self { status, body: ::recipes::ApiError::with_fields(message, fields) }
    }

    /// Map a provider failure to the status and message the browser sees.
    #[must_use]
    pub fn provider(err: &ProviderError) -> Self {
        Self::new(err.status(), err.user_message())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// JSON API routes.
pub fn api_routes(state: AppState) -> Router {
    let upload_limit = state.config.max_image_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/api/auth/sign-in", post(auth::sign_in))
        .route("/api/auth/sign-up", post(auth::sign_up))
        .route("/api/auth/sign-out", post(auth::sign_out))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .route("/api/auth/update-password", post(auth::update_password))
        .route("/api/auth/session", get(auth::session))
        .route(
            "/api/recipes",
            get(recipes::list_recipes)
                .post(recipes::create_recipe)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/recipes/{id}", get(recipes::get_recipe))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API routes + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[[workspace.metadata.leptos]]` section).
pub fn app(state: AppState) -> Result<Router, String> {
    let conf = get_configuration(None).map_err(|e| format!("leptos configuration: {e}"))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(api_routes(state)
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback_service(ServeDir::new(site_root_path))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "http_helpers_test.rs"]
pub(crate) mod test_http;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
