use folio_core::{check_upload, DragDepth, UploadError, MAX_UPLOAD_BYTES};

#[test]
fn limit_is_four_mebibytes() {
    assert_eq!(MAX_UPLOAD_BYTES, 4_194_304);
}

#[test]
fn accepts_image_at_limit() {
    assert_eq!(check_upload(MAX_UPLOAD_BYTES, "image/png"), Ok(()));
    assert_eq!(check_upload(1_024, "image/jpeg"), Ok(()));
}

#[test]
fn rejects_one_byte_over_limit() {
    let err = check_upload(MAX_UPLOAD_BYTES + 1, "image/png").unwrap_err();
    assert_eq!(
        err,
        UploadError::TooLarge {
            size: MAX_UPLOAD_BYTES + 1,
            limit: MAX_UPLOAD_BYTES
        }
    );
    assert!(err.to_string().contains("4 Mo"));
}

#[test]
fn rejects_empty_and_non_image() {
    assert_eq!(check_upload(0, "image/png"), Err(UploadError::Empty));
    assert!(matches!(
        check_upload(10, "application/pdf"),
        Err(UploadError::NotAnImage { .. })
    ));
}

#[test]
fn nested_enter_leave_toggles_once() {
    let mut depth = DragDepth::new();
    assert!(depth.enter());
    // crossing into a child element
    assert!(!depth.enter());
    assert!(!depth.leave());
    assert!(depth.is_active());
    assert!(depth.leave());
    assert!(!depth.is_active());
}

#[test]
fn stray_leave_does_not_underflow() {
    let mut depth = DragDepth::new();
    assert!(!depth.leave());
    assert!(depth.enter());
}

#[test]
fn reset_after_drop() {
    let mut depth = DragDepth::new();
    depth.enter();
    depth.enter();
    depth.reset();
    assert!(!depth.is_active());
    assert!(depth.enter());
}
