use super::*;

fn rejected(status: u16) -> ProviderError {
    ProviderError::Rejected { status, message: "Invalid login credentials".to_owned() }
}

#[test]
fn client_rejections_keep_provider_message() {
    assert_eq!(rejected(400).user_message(), "Invalid login credentials");
    assert_eq!(rejected(400).status(), StatusCode::BAD_REQUEST);
    assert_eq!(rejected(401).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(rejected(422).status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(rejected(429).status(), StatusCode::TOO_MANY_REQUESTS);
}

#[test]
fn server_failures_are_masked() {
    let err = rejected(503);
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert!(err.user_message().contains("unavailable"));

    let err = ProviderError::Request("connection refused".to_owned());
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    assert!(!err.user_message().contains("refused"));
}

#[test]
fn provider_user_converts_to_wire_user() {
    let id = Uuid::new_v4();
    let user: recipes::User = ProviderUser { id, email: Some("a@b.com".to_owned()) }.into();
    assert_eq!(user.id, id);
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
}
