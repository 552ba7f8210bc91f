//! Recipe routes: catalog listing, detail lookup, and multipart submission.
//!
//! ERROR HANDLING
//! ==============
//! A submission is decoded, validated and image-checked before anything
//! leaves the process. Fields that fail to decode or validate come back as
//! one 422 field map; only a malformed free-form list (tags, tips,
//! substitutions) is a plain 400. Only a fully valid submission reaches storage, and
//! the row is inserted only after the image upload succeeded.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use recipes::form::{self, apply_field};
use recipes::{FieldErrors, FormField, Recipe, RecipeDraft, RecipeSummary};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::ApiFailure;
use super::auth::AuthUser;
use crate::services::session::now_unix_ms;
use crate::services::upload::{ImageUpload, object_path};
use crate::state::AppState;

/// One decoded multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, upload: ImageUpload },
}

/// `GET /api/recipes`: listing projection, newest first.
pub async fn list_recipes(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<RecipeSummary>>, ApiFailure> {
    let recipes = state.recipes.list().await.map_err(|e| {
        error!(error = %e, "recipe listing failed");
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipes")
    })?;
    Ok(Json(recipes))
}

/// `GET /api/recipes/{id}`: full recipe. Ids that do not parse are reported
/// as not found, like unknown ids.
pub async fn get_recipe(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiFailure> {
    let not_found = || ApiFailure::new(StatusCode::NOT_FOUND, "Recipe not found");
    let id = Uuid::parse_str(id.trim()).map_err(|_| not_found())?;
    let recipe = state.recipes.get(id).await.map_err(|e| {
        error!(error = %e, %id, "recipe lookup failed");
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load recipe")
    })?;
    recipe.map(Json).ok_or_else(not_found)
}

/// `POST /api/recipes`: multipart recipe fields plus an `image` file.
pub async fn create_recipe(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>), ApiFailure> {
    let parts = read_parts(multipart).await?;
    let recipe = submit_recipe(&state, &auth, parts).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<FormPart>, ApiFailure> {
    let malformed = |e: axum::extract::multipart::MultipartError| {
        warn!(error = %e, "malformed multipart body");
        ApiFailure::new(e.status(), "Malformed form submission")
    };

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        if let Some(file_name) = field.file_name().map(str::to_owned) {
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(malformed)?;
            let upload = ImageUpload {
                file_name: Some(file_name).filter(|f| !f.is_empty()),
                content_type,
                bytes: bytes.to_vec(),
            };
            parts.push(FormPart::File { name, upload });
        } else {
            let value = field.text().await.map_err(malformed)?;
            parts.push(FormPart::Text { name, value });
        }
    }
    Ok(parts)
}

/// Decode, validate, upload and store a submission.
pub(crate) async fn submit_recipe(
    state: &AppState,
    auth: &AuthUser,
    parts: Vec<FormPart>,
) -> Result<Recipe, ApiFailure> {
    let mut draft = RecipeDraft::default();
    let mut image: Option<ImageUpload> = None;
    let mut decode_errors = FieldErrors::new();
    for part in parts {
        match part {
            FormPart::Text { name, value } => {
                if let Err(e) = apply_field(&mut draft, &name, &value) {
                    let Some(field) = e.form_field() else {
                        warn!(error = %e, "undecodable recipe field");
                        return Err(ApiFailure::new(StatusCode::BAD_REQUEST, e.to_string()));
                    };
                    decode_errors.insert(field, e.inline_message());
                }
            }
            FormPart::File { name, upload } if name == form::IMAGE && !upload.bytes.is_empty() => {
                image = Some(upload);
            }
            FormPart::File { .. } => {}
        }
    }
    draft.has_image = image.is_some();

    let mut fields = FieldErrors::new();
    let checked = match &image {
        Some(upload) => match upload.check(state.config.max_image_bytes) {
            Ok(kind) => Some(kind),
            Err(e) => {
                fields.insert(FormField::Image, e.to_string());
                None
            }
        },
        None => None,
    };
    let validated = draft.validate();
    if let Err(errors) = &validated {
        fields.extend(errors.clone());
    }
    // A field that failed to decode kept its default; report the decode
    // failure rather than whatever validation made of the default.
    fields.extend(decode_errors);
    let (Ok(new_recipe), Some((content_type, ext)), Some(upload), true) =
        (validated, checked, image, fields.is_empty())
    else {
        info!(user_id = %auth.user.id, invalid = fields.len(), "recipe submission rejected");
        return Err(ApiFailure::with_fields(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Please fix the highlighted fields",
            fields,
        ));
    };

    let path = object_path(auth.user.id, &upload.bytes, ext);
    let size = upload.bytes.len();
    let image_url = state
        .storage
        .upload(&auth.token, &path, content_type, upload.bytes)
        .await
        .map_err(|e| {
            error!(error = %e, %path, "image upload failed");
            ApiFailure::new(StatusCode::BAD_GATEWAY, "Image upload failed")
        })?;
    info!(%path, size, "recipe image uploaded");

    let recipe = new_recipe.into_recipe(Uuid::new_v4(), image_url, Some(auth.user.id), now_unix_ms());
    state.recipes.insert(&recipe).await.map_err(|e| {
        error!(error = %e, recipe_id = %recipe.id, "recipe insert failed");
        ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save recipe")
    })?;
    info!(recipe_id = %recipe.id, user_id = %auth.user.id, "recipe created");
    Ok(recipe)
}

#[cfg(test)]
#[path = "recipes_test.rs"]
mod tests;
