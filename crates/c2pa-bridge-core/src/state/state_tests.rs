#![allow(non_snake_case)]

use super::*;

#[test]
fn BuilderState___default___is_empty() {
    assert_eq!(BuilderState::default(), BuilderState::Empty);
}

#[test]
fn BuilderState___display___matches_variant_name() {
    assert_eq!(BuilderState::PlaceholderIssued.to_string(), "PlaceholderIssued");
    assert_eq!(BuilderState::Composing.to_string(), "Composing");
}

#[test]
fn BuilderState___serde___uses_snake_case() {
    let json = serde_json::to_string(&BuilderState::PlaceholderIssued).unwrap();

    assert_eq!(json, "\"placeholder_issued\"");
}
