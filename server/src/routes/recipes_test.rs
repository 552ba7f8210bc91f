use axum::http::Method;
use recipes::{Difficulty, IngredientDraft, RecipeDraft};

use super::*;
use crate::routes::api_routes;
use crate::routes::auth::ACCESS_COOKIE;
use crate::routes::test_http::*;
use crate::services::recipe::RecipeStore;
use crate::services::seed::seed_if_empty;
use crate::services::session::now_unix;
use crate::state::test_helpers::{TestApp, test_app};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

fn sign_in(app: &TestApp) -> (String, Uuid) {
    let user = app.provider.add_account("cook@example.com", "secret123");
    let session = app.provider.issue(&user);
    (format!("{ACCESS_COOKIE}={}", session.access_token), user.id)
}

fn valid_draft() -> RecipeDraft {
    RecipeDraft {
        title: "Tofu Scramble".to_owned(),
        description: "Savory breakfast scramble.".to_owned(),
        prep_time: 5,
        cook_time: 10,
        servings: 2,
        difficulty: Difficulty::Easy,
        category: "Breakfast".to_owned(),
        tags: vec!["quick".to_owned()],
        spicy_level: 1,
        ingredients: vec![IngredientDraft {
            name: "firm tofu".to_owned(),
            amount: 400.0,
            unit: "g".to_owned(),
            ..IngredientDraft::default()
        }],
        instructions: vec!["Crumble tofu.".to_owned(), "Fry with spices.".to_owned()],
        ..RecipeDraft::default()
    }
}

fn text_parts(draft: &RecipeDraft) -> Vec<FormPart> {
    form::encode_fields(draft)
        .into_iter()
        .map(|(name, value)| FormPart::Text { name: name.to_owned(), value })
        .collect()
}

fn image_part(bytes: &[u8], content_type: &str) -> FormPart {
    FormPart::File {
        name: form::IMAGE.to_owned(),
        upload: ImageUpload {
            file_name: Some("photo.png".to_owned()),
            content_type: content_type.to_owned(),
            bytes: bytes.to_vec(),
        },
    }
}

fn auth_user(app: &TestApp) -> AuthUser {
    let user = app.provider.add_account("author@example.com", "secret123");
    let session = app.provider.issue(&user);
    AuthUser { user, token: session.access_token }
}

// =============================================================================
// submit_recipe
// =============================================================================

#[tokio::test]
async fn submit_valid_recipe_uploads_then_inserts() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut parts = text_parts(&valid_draft());
    parts.push(image_part(PNG, "image/png"));

    let recipe = submit_recipe(&app.state, &auth, parts).await.unwrap();

    assert_eq!(recipe.title, "Tofu Scramble");
    assert_eq!(recipe.user_id, Some(auth.user.id));
    let steps: Vec<u32> = recipe.instructions.iter().map(|i| i.step).collect();
    assert_eq!(steps, [1, 2]);

    let objects = app.storage.objects();
    assert_eq!(objects.len(), 1);
    assert!(objects[0].path.starts_with(&format!("{}/", auth.user.id)));
    assert!(objects[0].path.ends_with(".png"));
    assert_eq!(objects[0].access_token, auth.token);
    assert!(recipe.image_url.ends_with(&objects[0].path));

    assert_eq!(app.store.get(recipe.id).await.unwrap(), Some(recipe));
}

#[tokio::test]
async fn submit_without_title_or_ingredients_is_rejected_before_upload() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut draft = valid_draft();
    draft.title = "   ".to_owned();
    draft.ingredients.clear();
    let mut parts = text_parts(&draft);
    parts.push(image_part(PNG, "image/png"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();

    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(failure.body.fields.get(&FormField::Title).map(String::as_str), Some("Title is required"));
    assert!(failure.body.fields.contains_key(&FormField::Ingredients));
    assert!(app.storage.objects().is_empty());
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn submit_without_image_is_rejected() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut parts = text_parts(&valid_draft());
    parts.push(image_part(b"", "application/octet-stream"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();
    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(failure.body.fields.get(&FormField::Image).map(String::as_str), Some("Image is required"));
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn submit_with_non_image_file_is_rejected() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut parts = text_parts(&valid_draft());
    parts.push(FormPart::File {
        name: form::IMAGE.to_owned(),
        upload: ImageUpload {
            file_name: Some("notes.txt".to_owned()),
            content_type: "text/plain".to_owned(),
            bytes: b"hello".to_vec(),
        },
    });

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();
    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(failure.body.fields.contains_key(&FormField::Image));
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn submit_with_oversized_image_is_rejected() {
    let app = test_app();
    let auth = auth_user(&app);
    let too_big = vec![0u8; app.state.config.max_image_bytes + 1];
    let mut parts = text_parts(&valid_draft());
    parts.push(image_part(&too_big, "image/png"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();
    assert!(failure.body.fields.contains_key(&FormField::Image));
}

fn with_text(parts: Vec<FormPart>, field: &str, replacement: &str) -> Vec<FormPart> {
    parts
        .into_iter()
        .map(|part| match part {
            FormPart::Text { name, .. } if name == field => FormPart::Text { name, value: replacement.to_owned() },
            other => other,
        })
        .collect()
}

#[tokio::test]
async fn undecodable_fields_are_422_on_their_fields() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut parts = text_parts(&valid_draft());
    parts = with_text(parts, form::SERVINGS, "four");
    parts = with_text(parts, form::PREP_TIME, "soon");
    parts = with_text(parts, form::DIFFICULTY, "legendary");
    parts.push(image_part(PNG, "image/png"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();

    assert_eq!(failure.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields = &failure.body.fields;
    assert_eq!(fields.get(&FormField::Servings).map(String::as_str), Some("Enter a whole number"));
    assert_eq!(fields.get(&FormField::PrepTime).map(String::as_str), Some("Enter a whole number"));
    assert!(fields.contains_key(&FormField::Difficulty));
    assert!(app.storage.objects().is_empty());
    assert_eq!(app.store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_tag_list_is_400() {
    let app = test_app();
    let auth = auth_user(&app);
    let mut parts = with_text(text_parts(&valid_draft()), form::TAGS, "[oops");
    parts.push(image_part(PNG, "image/png"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();
    assert_eq!(failure.status, StatusCode::BAD_REQUEST);
    assert!(app.storage.objects().is_empty());
}

#[tokio::test]
async fn storage_failure_inserts_nothing() {
    let app = test_app();
    app.storage.set_fail(true);
    let auth = auth_user(&app);
    let mut parts = text_parts(&valid_draft());
    parts.push(image_part(PNG, "image/png"));

    let failure = submit_recipe(&app.state, &auth, parts).await.unwrap_err();
    assert_eq!(failure.status, StatusCode::BAD_GATEWAY);
    assert_eq!(app.store.count().await.unwrap(), 0);
}

// =============================================================================
// HTTP
// =============================================================================

#[tokio::test]
async fn recipe_routes_require_auth() {
    let app = test_app();
    let router = api_routes(app.state.clone());
    for uri in ["/api/recipes", "/api/recipes/3f1c6a2e-8d4b-4b7a-9a51-0c2f6e1d7a01"] {
        let response = send(&router, empty_request(Method::GET, uri, None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn list_returns_summaries_newest_first() {
    let app = test_app();
    seed_if_empty(app.store.as_ref()).await.unwrap();
    let (cookie, _) = sign_in(&app);
    let router = api_routes(app.state.clone());

    let response = send(&router, empty_request(Method::GET, "/api/recipes", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 6);
    assert_eq!(list[0]["title"], "Rainbow Quinoa Buddha Bowl");
    assert_eq!(list[0]["imageUrl"], "/images/recipes/quinoa-bowl.jpg");
    assert!(list[0].get("ingredients").is_none());
}

#[tokio::test]
async fn get_known_recipe() {
    let app = test_app();
    seed_if_empty(app.store.as_ref()).await.unwrap();
    let (cookie, _) = sign_in(&app);
    let router = api_routes(app.state.clone());

    let uri = "/api/recipes/3f1c6a2e-8d4b-4b7a-9a51-0c2f6e1d7a03";
    let response = send(&router, empty_request(Method::GET, uri, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Spiced Lentil Curry");
    assert_eq!(body["servings"], 4);
    assert_eq!(body["instructions"][0]["step"], 1);
}

#[tokio::test]
async fn unknown_and_unparseable_ids_are_404() {
    let app = test_app();
    let (cookie, _) = sign_in(&app);
    let router = api_routes(app.state.clone());

    for id in [Uuid::new_v4().to_string(), "quinoa-bowl".to_owned()] {
        let response = send(&router, empty_request(Method::GET, &format!("/api/recipes/{id}"), Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{id}");
        assert_eq!(body_json(response).await["error"], "Recipe not found");
    }
}

#[tokio::test]
async fn multipart_post_creates_recipe() {
    let app = test_app();
    let (cookie, user_id) = sign_in(&app);
    let router = api_routes(app.state.clone());

    let fields = form::encode_fields(&valid_draft());
    let body = multipart_body(&fields, Some((form::IMAGE, "photo.png", "image/png", PNG)));
    let response = send(&router, multipart_request("/api/recipes", body, Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Tofu Scramble");
    assert_eq!(json["userId"], user_id.to_string());
    assert!(json["createdAt"].as_i64().unwrap() >= now_unix() * 1000 - 5_000);
    assert_eq!(app.store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn multipart_post_with_errors_is_422() {
    let app = test_app();
    let (cookie, _) = sign_in(&app);
    let router = api_routes(app.state.clone());

    let mut draft = valid_draft();
    draft.title.clear();
    let fields = form::encode_fields(&draft);
    let body = multipart_body(&fields, None);
    let response = send(&router, multipart_request("/api/recipes", body, Some(&cookie))).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["title"], "Title is required");
    assert_eq!(json["fields"]["image"], "Image is required");
    assert!(app.storage.objects().is_empty());
}
