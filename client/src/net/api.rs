//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`. Session cookies are
//! HttpOnly and same-origin, so the browser attaches them to every request.
//! Server-side (SSR): stubs returning an error since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses carry a JSON `ApiError`; its `error` text becomes the
//! `Err` string callers show to the user. Bodies that are not an `ApiError`
//! fall back to a status-only message.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(feature = "hydrate")]
use gloo_net::http::{Request, Response};
#[cfg(any(test, feature = "hydrate"))]
use recipes::ApiError;
use recipes::{Credentials, Recipe, RecipeSummary, SessionInfo, SignUpOutcome};
use uuid::Uuid;

#[cfg(any(test, feature = "hydrate"))]
const RECIPES_ENDPOINT: &str = "/api/recipes";

#[cfg(any(test, feature = "hydrate"))]
fn recipe_endpoint(id: Uuid) -> String {
    format!("{RECIPES_ENDPOINT}/{id}")
}

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(status: u16) -> String {
    format!("request failed: {status}")
}

/// Decode an error response body, falling back to a status-only message.
#[cfg(any(test, feature = "hydrate"))]
fn failure_body(status: u16, body: &str) -> ApiError {
    serde_json::from_str::<ApiError>(body).unwrap_or_else(|_| ApiError::new(request_failed_message(status)))
}

#[cfg(any(test, feature = "hydrate"))]
fn recipe_failure_message(status: u16, body: &str) -> String {
    if status == 404 {
        return "Recipe not found".to_owned();
    }
    failure_body(status, body).error
}

#[cfg(feature = "hydrate")]
async fn read_failure(resp: Response) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    failure_body(status, &body)
}

#[cfg(feature = "hydrate")]
async fn post_json<B: serde::Serialize>(url: &str, body: &B) -> Result<Response, String> {
    let resp = Request::post(url)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(read_failure(resp).await.error);
    }
    Ok(resp)
}

/// Sign in via `POST /api/auth/sign-in`.
///
/// # Errors
///
/// Returns the server's message, e.g. for invalid credentials.
pub async fn sign_in(credentials: &Credentials) -> Result<SessionInfo, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = post_json("/api/auth/sign-in", credentials).await?;
        resp.json::<SessionInfo>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = credentials;
        Err("not available on server".to_owned())
    }
}

/// Create an account via `POST /api/auth/sign-up`.
///
/// # Errors
///
/// Returns the server's message, e.g. for an already registered email.
pub async fn sign_up(credentials: &Credentials) -> Result<SignUpOutcome, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = post_json("/api/auth/sign-up", credentials).await?;
        resp.json::<SignUpOutcome>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = credentials;
        Err("not available on server".to_owned())
    }
}

/// Sign out via `POST /api/auth/sign-out`. The server clears the cookies.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn sign_out() -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = Request::post("/api/auth/sign-out").send().await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure(resp).await.error);
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Request a password reset email via `POST /api/auth/reset-password`.
///
/// # Errors
///
/// Returns the server's message if the request is rejected.
pub async fn reset_password(email: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        post_json("/api/auth/reset-password", &recipes::EmailRequest { email: email.to_owned() }).await?;
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = email;
        Err("not available on server".to_owned())
    }
}

/// Change the signed-in user's password via `POST /api/auth/update-password`.
///
/// # Errors
///
/// Returns the server's message, e.g. when there is no session.
pub async fn update_password(password: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        post_json("/api/auth/update-password", &recipes::PasswordUpdate { password: password.to_owned() }).await?;
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = password;
        Err("not available on server".to_owned())
    }
}

/// Fetch the current session from `GET /api/auth/session`.
/// A 401 means signed out and yields `Ok(None)`.
///
/// # Errors
///
/// Returns an error string if the request fails for any other reason.
pub async fn fetch_session() -> Result<Option<SessionInfo>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = Request::get("/api/auth/session").send().await.map_err(|e| e.to_string())?;
        if resp.status() == 401 {
            return Ok(None);
        }
        if !resp.ok() {
            return Err(read_failure(resp).await.error);
        }
        resp.json::<SessionInfo>().await.map(Some).map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Fetch the catalog from `GET /api/recipes`, newest first.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn fetch_recipes() -> Result<Vec<RecipeSummary>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = Request::get(RECIPES_ENDPOINT).send().await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(read_failure(resp).await.error);
        }
        resp.json::<Vec<RecipeSummary>>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Fetch one recipe from `GET /api/recipes/{id}`.
///
/// # Errors
///
/// Returns `"Recipe not found"` on 404, otherwise the failure message.
pub async fn fetch_recipe(id: Uuid) -> Result<Recipe, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = Request::get(&recipe_endpoint(id)).send().await.map_err(|e| e.to_string())?;
        if !resp.ok() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(recipe_failure_message(status, &body));
        }
        resp.json::<Recipe>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
        Err("not available on server".to_owned())
    }
}

/// Submit a new recipe as `multipart/form-data` to `POST /api/recipes`.
///
/// # Errors
///
/// Returns the server's `ApiError`, including per-field messages on 422.
#[cfg(feature = "hydrate")]
pub async fn create_recipe(draft: &recipes::RecipeDraft, image: &web_sys::File) -> Result<Recipe, ApiError> {
    let form_error = |_| ApiError::new("Could not prepare the submission");
    let form = web_sys::FormData::new().map_err(form_error)?;
    for (name, value) in recipes::form::encode_fields(draft) {
        form.append_with_str(name, &value).map_err(form_error)?;
    }
    form.append_with_blob_and_filename(recipes::form::IMAGE, image, &image.name())
        .map_err(form_error)?;

    let resp = Request::post(RECIPES_ENDPOINT)
        .body(form)
        .map_err(|e| ApiError::new(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::new(e.to_string()))?;
    if !resp.ok() {
        return Err(read_failure(resp).await);
    }
    resp.json::<Recipe>().await.map_err(|e| ApiError::new(e.to_string()))
}
