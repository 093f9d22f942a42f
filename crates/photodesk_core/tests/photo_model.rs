use photodesk_core::{ExternalId, Photo, PhotoState, PhotoValidationError, NULL_PLACEHOLDER};

#[test]
fn new_state_generates_uuid_shaped_external_id() {
    let state = PhotoState::new("a.png", Vec::new(), "image/png");

    assert_eq!(state.external_id().as_str().len(), 36);
    assert!(!state.is_null());
    assert!(!state.identity().is_persisted());
    assert_eq!(state.identity().version(), 0);
}

#[test]
fn create_wraps_state_without_changing_identity() {
    let state = PhotoState::create_random();
    let external_id = state.external_id().clone();

    let photo = Photo::create(state);
    assert_eq!(photo.external_id(), &external_id);
    assert_eq!(photo.content_type(), "image/png");
    assert!(photo.file_name().ends_with(".png"));
    assert!(!photo.is_null());
}

#[test]
fn null_facades_are_value_equal_sentinels() {
    let first = Photo::null();
    let second = Photo::null();

    assert_eq!(first, second);
    assert!(first.is_null());
    assert!(second.is_null());
    assert_eq!(first.external_id().as_str(), NULL_PLACEHOLDER);
    assert_eq!(first.file_name(), NULL_PLACEHOLDER);
    assert_eq!(first.content_type(), NULL_PLACEHOLDER);
}

#[test]
fn mutating_returned_state_never_leaks_into_facade() {
    let photo = Photo::create(PhotoState::new("a.png", vec![1, 2, 3], "image/png"));

    let mut copy = photo.state();
    copy.file_name = "b.png".to_string();
    copy.file[0] = 9;
    copy.file.push(4);
    copy.content_type = "image/gif".to_string();

    let again = photo.state();
    assert_eq!(again.file_name, "a.png");
    assert_eq!(again.file, vec![1, 2, 3]);
    assert_eq!(again.content_type, "image/png");
    assert_eq!(photo.file(), &[1, 2, 3]);
}

#[test]
fn copy_preserves_identity_and_does_not_share_payload() {
    let state = PhotoState::new("a.png", vec![7; 16], "image/png");
    let copy = state.copy();

    assert_eq!(copy, state);
    assert_ne!(copy.file.as_ptr(), state.file.as_ptr());
}

#[test]
fn mutators_write_through_to_wrapped_state() {
    let mut photo = Photo::create(PhotoState::create_random());
    photo.set_file_name("renamed.jpeg");
    photo.set_content_type("image/jpeg");
    photo.set_file(vec![0xff, 0xd8]);

    let state = photo.state();
    assert_eq!(state.file_name, "renamed.jpeg");
    assert_eq!(state.content_type, "image/jpeg");
    assert_eq!(state.file, vec![0xff, 0xd8]);
}

#[test]
fn validate_enforces_file_name_rules() {
    let cases = [
        ("", PhotoValidationError::EmptyFileName),
        (
            "notes.txt",
            PhotoValidationError::InvalidFileName("notes.txt".to_string()),
        ),
        (
            "dir/a.png",
            PhotoValidationError::InvalidFileName("dir/a.png".to_string()),
        ),
    ];
    for (name, expected) in cases {
        let state = PhotoState::new(name, Vec::new(), "image/png");
        assert_eq!(state.validate().unwrap_err(), expected, "file name `{name}`");
    }

    let long_name = format!("{}.png", "x".repeat(252));
    let state = PhotoState::new(long_name, Vec::new(), "image/png");
    assert_eq!(
        state.validate().unwrap_err(),
        PhotoValidationError::FileNameTooLong(256)
    );

    for name in ["a.png", "b.jpg", "c.jpeg", "d.gif"] {
        assert!(PhotoState::new(name, Vec::new(), "").validate().is_ok());
    }
}

#[test]
fn null_sentinel_never_validates() {
    assert_eq!(
        PhotoState::create_null().validate().unwrap_err(),
        PhotoValidationError::NullSentinel
    );

    let state = PhotoState::with_external_id(ExternalId::null(), "a.png", Vec::new(), "");
    assert_eq!(
        state.validate().unwrap_err(),
        PhotoValidationError::NullSentinel
    );
}

#[test]
fn serialization_omits_binary_content() {
    let state = PhotoState::new("a.png", vec![1, 2, 3], "image/png");

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["uuid"], state.external_id().as_str());
    assert_eq!(json["file_name"], "a.png");
    assert_eq!(json["content_type"], "image/png");
    assert_eq!(json["null"], false);
    assert_eq!(json["version"], 0);
    assert!(json["id"].is_null());
    assert!(json.get("file").is_none());
}

#[test]
fn deserializing_a_bare_body_generates_identity() {
    let state: PhotoState = serde_json::from_value(serde_json::json!({
        "file_name": "a.png"
    }))
    .unwrap();

    assert_eq!(state.external_id().as_str().len(), 36);
    assert!(!state.identity().is_persisted());
    assert!(state.file.is_empty());
    assert!(state.validate().is_ok());
}

#[test]
fn deserializing_cannot_forge_storage_identity() {
    let state: PhotoState = serde_json::from_value(serde_json::json!({
        "id": 7,
        "version": 3,
        "created_at": "2001-01-01T00:00:00Z",
        "modified_at": "2001-01-02T00:00:00Z",
        "file_name": "a.png",
        "content_type": "image/png"
    }))
    .unwrap();

    assert!(!state.identity().is_persisted());
    assert_eq!(state.identity().id(), None);
    assert_eq!(state.identity().version(), 0);
    assert!(state.identity().modified_at().is_none());
    assert_eq!(state.file_name, "a.png");
}
