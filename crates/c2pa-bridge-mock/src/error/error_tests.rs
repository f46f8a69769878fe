#![allow(non_snake_case)]

use super::*;

#[test]
fn MockError___display___uses_tag_prefix() {
    let err = MockError::ManifestNotFound("no JUMBF data found".to_string());

    assert_eq!(err.to_string(), "ManifestNotFound: no JUMBF data found");
}

#[test]
fn MockError___signature_variant___displays_cose_tag() {
    let err = MockError::Signature("bad".to_string());

    assert!(err.to_string().starts_with("CoseSignature: "));
}

#[test]
fn MockError___from_io_error___is_io() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");

    let err: MockError = io.into();

    assert_eq!(err, MockError::Io("pipe closed".to_string()));
}

#[test]
fn MockError___from_json_error___is_json() {
    let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();

    let err: MockError = json.into();

    assert!(matches!(err, MockError::Json(_)));
}

#[test]
fn take_last_error___after_set___returns_once() {
    set_last_error(&MockError::BadParam("x".to_string()));

    assert_eq!(take_last_error().as_deref(), Some("BadParam: x"));
    assert_eq!(take_last_error(), None);
}

#[test]
fn set_last_error___twice___keeps_latest() {
    set_last_error(&MockError::BadParam("first".to_string()));
    set_last_error(&MockError::Io("second".to_string()));

    assert_eq!(take_last_error().as_deref(), Some("Io: second"));
}

#[test]
fn last_error___is_per_thread() {
    set_last_error(&MockError::BadParam("main".to_string()));

    let other = std::thread::spawn(take_last_error).join().unwrap();

    assert_eq!(other, None);
    assert_eq!(take_last_error().as_deref(), Some("BadParam: main"));
}
