use super::*;

fn upload(content_type: &str, file_name: Option<&str>, bytes: &[u8]) -> ImageUpload {
    ImageUpload {
        file_name: file_name.map(str::to_owned),
        content_type: content_type.to_owned(),
        bytes: bytes.to_vec(),
    }
}

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

// =============================================================================
// image_extension
// =============================================================================

#[test]
fn image_extension_known_types() {
    assert_eq!(image_extension("image/jpeg"), Some("jpg"));
    assert_eq!(image_extension("IMAGE/PNG"), Some("png"));
    assert_eq!(image_extension("image/webp; charset=binary"), Some("webp"));
    assert_eq!(image_extension("image/gif"), Some("gif"));
}

#[test]
fn image_extension_rejects_other_types() {
    assert_eq!(image_extension("application/pdf"), None);
    assert_eq!(image_extension("image/svg+xml"), None);
    assert_eq!(image_extension(""), None);
}

// =============================================================================
// check
// =============================================================================

#[test]
fn check_accepts_declared_image() {
    let result = upload("image/png", Some("a.png"), b"png-bytes").check(1024);
    assert_eq!(result, Ok(("image/png", "png")));
}

#[test]
fn check_falls_back_to_file_name() {
    let result = upload("application/octet-stream", Some("Dinner.JPEG"), b"jpeg").check(1024);
    assert_eq!(result, Ok(("image/jpeg", "jpg")));
}

#[test]
fn check_rejects_empty() {
    assert_eq!(upload("image/png", None, b"").check(1024), Err(UploadError::Empty));
}

#[test]
fn check_rejects_oversized() {
    let err = upload("image/png", None, &[0u8; 11]).check(10).unwrap_err();
    assert_eq!(err, UploadError::TooLarge { size: 11, max: 10 });
}

#[test]
fn check_rejects_non_image() {
    let err = upload("text/plain", Some("notes.txt"), b"hello").check(1024).unwrap_err();
    assert_eq!(err, UploadError::UnsupportedType("text/plain".to_owned()));
}

// =============================================================================
// object_path
// =============================================================================

#[test]
fn object_path_is_user_scoped_sha256() {
    let user = Uuid::nil();
    let path = object_path(user, b"abc", "jpg");
    assert_eq!(
        path,
        "00000000-0000-0000-0000-000000000000/ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.jpg"
    );
}

#[test]
fn object_path_same_bytes_same_path() {
    let user = Uuid::new_v4();
    assert_eq!(object_path(user, b"x", "png"), object_path(user, b"x", "png"));
    assert_ne!(object_path(user, b"x", "png"), object_path(Uuid::new_v4(), b"x", "png"));
}
