//! End-to-end protocol scenarios, driven entirely through the byte-oriented
//! [`crate::api`] surface the way a host application would use it.
use std::collections::HashSet;

use crate::api;
use crate::issuance::{finalize, prepare, register};
use crate::keys::{PublicKey, SecretKey};
use crate::showing::{sign_request, verify_signature};
use crate::vocabulary::AttributeVocabulary;

fn issuer(names: &[&str]) -> (SecretKey, PublicKey) {
    let vocab = AttributeVocabulary::new(names).unwrap();
    let sk = SecretKey::new(&vocab).unwrap();
    let pk = PublicKey::from_secret_key(&sk, vocab).unwrap();
    (sk, pk)
}

#[test]
fn scenario_1_reveal_held_attribute_verifies() {
    let (sk, pk) = issuer(&["gym", "spa", "restaurant", "bars"]);
    let (state, request) = prepare(&pk).unwrap();
    let held = AttributeVocabulary::normalize_csv("gym,bars");
    let response = register(&sk, &pk, &request, &held).unwrap();
    let credential = finalize(&pk, state, response).unwrap();

    let reveal: HashSet<String> = ["gym".to_string()].into_iter().collect();
    let showing = sign_request(&credential, &pk, &reveal, b"46.52345,6.57890").unwrap();
    assert!(verify_signature(&pk, &showing, b"46.52345,6.57890").is_ok());
}

#[test]
fn scenario_2_reveal_unheld_attribute_fails() {
    let (sk, pk) = issuer(&["gym", "spa", "restaurant", "bars"]);
    let (state, request) = prepare(&pk).unwrap();
    let held = AttributeVocabulary::normalize_csv("");
    let response = register(&sk, &pk, &request, &held).unwrap();
    let credential = finalize(&pk, state, response).unwrap();
    assert!(credential.verify(&pk));

    let reveal: HashSet<String> = ["restaurant".to_string()].into_iter().collect();
    let showing = sign_request(&credential, &pk, &reveal, b"ctx").unwrap();
    assert!(verify_signature(&pk, &showing, b"ctx").is_err());
}

#[test]
fn scenario_3_large_vocabulary_partial_reveal_and_unlinkability() {
    let names: Vec<String> = (0..50).map(|i| format!("a{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (sk, pk) = issuer(&name_refs);
    let (state, request) = prepare(&pk).unwrap();
    let held_csv = name_refs[..10].join(",");
    let held = AttributeVocabulary::normalize_csv(&held_csv);
    let response = register(&sk, &pk, &request, &held).unwrap();
    let credential = finalize(&pk, state, response).unwrap();

    let reveal: HashSet<String> = name_refs[..3].iter().map(|s| s.to_string()).collect();
    let first = sign_request(&credential, &pk, &reveal, b"ctx").unwrap();
    let second = sign_request(&credential, &pk, &reveal, b"ctx").unwrap();
    assert!(verify_signature(&pk, &first, b"ctx").is_ok());
    assert!(verify_signature(&pk, &second, b"ctx").is_ok());
    assert_ne!(first.signature, second.signature);
}

#[test]
fn scenario_4_tampered_showing_is_rejected() {
    let (sk, pk) = issuer(&["gym", "spa"]);
    let (state, request) = prepare(&pk).unwrap();
    let held = AttributeVocabulary::normalize_csv("gym");
    let response = register(&sk, &pk, &request, &held).unwrap();
    let credential = finalize(&pk, state, response).unwrap();

    let reveal: HashSet<String> = ["gym".to_string()].into_iter().collect();
    let showing = sign_request(&credential, &pk, &reveal, b"ctx").unwrap();
    let mut bytes = showing.to_bytes();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let showing = crate::showing::ShowingSignature::from_bytes(&bytes).unwrap();
    assert!(verify_signature(&pk, &showing, b"ctx").is_err());
}

#[test]
fn scenario_5_wrong_public_key_is_rejected() {
    let (sk, pk) = issuer(&["gym"]);
    let (_other_sk, other_pk) = issuer(&["gym"]);
    let (state, request) = prepare(&pk).unwrap();
    let held = AttributeVocabulary::normalize_csv("gym");
    let response = register(&sk, &pk, &request, &held).unwrap();
    let credential = finalize(&pk, state, response).unwrap();

    let reveal: HashSet<String> = ["gym".to_string()].into_iter().collect();
    let showing = sign_request(&credential, &pk, &reveal, b"ctx").unwrap();
    assert!(verify_signature(&other_pk, &showing, b"ctx").is_err());
}

#[test]
fn scenario_6_unknown_attribute_at_registration_is_refused() {
    let (sk_bytes, pk_bytes) = api::generate_ca("gym,spa").unwrap();
    let (_state_bytes, request_bytes) = api::prepare_registration(&pk_bytes).unwrap();
    let response_bytes = api::register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "pool").unwrap();
    assert!(response_bytes.is_empty());
}

#[test]
fn full_api_round_trip_matches_typed_api() {
    let (sk_bytes, pk_bytes) = api::generate_ca("gym,spa,restaurant,bars").unwrap();
    let (state_bytes, request_bytes) = api::prepare_registration(&pk_bytes).unwrap();
    let response_bytes = api::register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "gym,bars").unwrap();
    assert!(!response_bytes.is_empty());
    let credential_bytes = api::proceed_registration_response(&pk_bytes, &state_bytes, &response_bytes).unwrap();
    let showing_bytes = api::sign_request(&pk_bytes, &credential_bytes, "gym,bars", b"ctx").unwrap();
    assert!(api::check_request_signature(&pk_bytes, &showing_bytes, "gym,bars", b"ctx").unwrap());
    assert!(!api::check_request_signature(&pk_bytes, &showing_bytes, "gym,bars", b"different-ctx").unwrap());
    assert!(!api::check_request_signature(&pk_bytes, &showing_bytes, "gym", b"ctx").unwrap());
}
