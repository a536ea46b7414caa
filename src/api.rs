//! Byte-in, byte-out entry points (API).
//!
//! Everything above this module deals in typed group elements. This module
//! is the only place that parses caller-supplied bytes and csv strings and
//! is the boundary a host application (a server handler, an FFI shim) is
//! expected to call through — mirroring `original_source/your_code.py`'s
//! `Server`/`Client` methods, which likewise take and return plain bytes
//! and comma-separated attribute lists rather than typed objects.
use std::collections::HashSet;

use crate::error::Error;
use crate::issuance::{self, Credential, IssuanceRequest, IssuanceResponse, IssuanceState};
use crate::keys::{PublicKey, SecretKey};
use crate::showing;
use crate::vocabulary::AttributeVocabulary;

/// Generate a fresh issuer keypair for the comma-separated attribute list
/// in `attributes_csv`. Returns `(secret_key_bytes, public_key_bytes)`; the
/// public key bytes are self-describing (they embed the vocabulary), the
/// secret key bytes are not and must be paired with the vocabulary length
/// the caller already has from the public key.
pub fn generate_ca(attributes_csv: &str) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let vocabulary = AttributeVocabulary::from_csv(attributes_csv)?;
    let sk = SecretKey::new(&vocabulary)?;
    let pk = PublicKey::from_secret_key(&sk, vocabulary)?;
    Ok((sk.to_bytes(), pk.to_bytes()))
}

/// Begin issuance against `pk_bytes`. Returns `(state_bytes, request_bytes)`;
/// the caller must hold onto `state_bytes` and pass it unchanged to
/// [`proceed_registration_response`].
pub fn prepare_registration(pk_bytes: &[u8]) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let pk = PublicKey::from_bytes(pk_bytes)?;
    let (state, request) = issuance::prepare(&pk)?;
    Ok((state.to_bytes().to_vec(), request.to_bytes()))
}

/// Process an issuance request on the issuer side. `username` identifies
/// the registrant for the issuer's own bookkeeping and is not otherwise
/// used by this crate. On success returns the serialised issuance response;
/// on refusal (an unknown attribute, or a request whose proof does not
/// verify) returns an empty vector rather than an error, so a caller can
/// treat "refused" and "malformed" differently — the latter still surfaces
/// as `Err`.
pub fn register(
    sk_bytes: &[u8],
    pk_bytes: &[u8],
    request_bytes: &[u8],
    _username: &str,
    attributes_csv: &str,
) -> Result<Vec<u8>, Error> {
    let pk = PublicKey::from_bytes(pk_bytes)?;
    let sk = SecretKey::from_bytes(sk_bytes, pk.vocabulary().len())?;
    let request = IssuanceRequest::from_bytes(request_bytes)?;
    let held = AttributeVocabulary::normalize_csv(attributes_csv);
    if pk.vocabulary().validate_subset(&held).is_err() {
        return Ok(Vec::new());
    }
    match issuance::register(&sk, &pk, &request, &held) {
        Ok(response) => Ok(response.to_bytes()),
        Err(Error::ProofFailure) | Err(Error::UnknownAttribute(_)) => Ok(Vec::new()),
        Err(other) => Err(other),
    }
}

/// Finish issuance on the user side: unblind the issuer's response against
/// the state from [`prepare_registration`], verify the result against
/// `pk_bytes`, and return the serialised credential. Fails with
/// [`Error::ProofFailure`] if the issuer's signature does not verify —
/// the user's only defence against a malicious or buggy issuer.
pub fn proceed_registration_response(
    pk_bytes: &[u8],
    state_bytes: &[u8],
    response_bytes: &[u8],
) -> Result<Vec<u8>, Error> {
    let pk = PublicKey::from_bytes(pk_bytes)?;
    let state = IssuanceState::from_bytes(state_bytes)?;
    let response = IssuanceResponse::from_bytes(response_bytes)?;
    let credential = issuance::finalize(&pk, state, response)?;
    Ok(credential.to_bytes())
}

/// Produce a showing of `credential_bytes`, revealing exactly the
/// attributes named in `reveal_csv`, bound to `nonce`.
pub fn sign_request(
    pk_bytes: &[u8],
    credential_bytes: &[u8],
    reveal_csv: &str,
    nonce: &[u8],
) -> Result<Vec<u8>, Error> {
    let pk = PublicKey::from_bytes(pk_bytes)?;
    let credential = Credential::from_bytes(credential_bytes)?;
    let reveal = AttributeVocabulary::normalize_csv(reveal_csv);
    let showing = showing::sign_request(&credential, &pk, &reveal, nonce)?;
    Ok(showing.to_bytes())
}

/// Verify a showing produced by [`sign_request`] against the same nonce and
/// the verifier's own required disclosure set `revealed_csv`. Returns `true`
/// iff the proof verifies *and* the attributes the prover actually disclosed
/// are exactly the ones the verifier demanded — so a verifier can enforce a
/// disclosure policy, not just confirm the prover's claim is internally
/// self-consistent. Any proof failure or disclosure mismatch collapses to
/// `false` rather than an error, so a verifier cannot learn which check
/// failed. Malformed byte inputs still surface as `Err`.
pub fn check_request_signature(
    pk_bytes: &[u8],
    showing_bytes: &[u8],
    revealed_csv: &str,
    nonce: &[u8],
) -> Result<bool, Error> {
    let pk = PublicKey::from_bytes(pk_bytes)?;
    let showing = showing::ShowingSignature::from_bytes(showing_bytes)?;
    let required = AttributeVocabulary::normalize_csv(revealed_csv);
    match showing::verify_signature(&pk, &showing, nonce) {
        Ok(revealed) => Ok(revealed.into_iter().collect::<HashSet<String>>() == required),
        Err(Error::ProofFailure) => Ok(false),
        Err(other) => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_byte_level_round_trip() {
        let (sk_bytes, pk_bytes) = generate_ca("gym,spa,restaurant,bars").unwrap();
        let (state_bytes, request_bytes) = prepare_registration(&pk_bytes).unwrap();
        let response_bytes = register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "gym,bars").unwrap();
        assert!(!response_bytes.is_empty());
        let credential_bytes = proceed_registration_response(&pk_bytes, &state_bytes, &response_bytes).unwrap();

        let showing_bytes = sign_request(&pk_bytes, &credential_bytes, "gym", b"challenge-1").unwrap();
        let result = check_request_signature(&pk_bytes, &showing_bytes, "gym", b"challenge-1").unwrap();
        assert!(result);
    }

    #[test]
    fn register_refuses_unknown_attribute_with_empty_bytes() {
        let (sk_bytes, pk_bytes) = generate_ca("gym").unwrap();
        let (_state_bytes, request_bytes) = prepare_registration(&pk_bytes).unwrap();
        let response_bytes = register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "pool").unwrap();
        assert!(response_bytes.is_empty());
    }

    #[test]
    fn check_request_signature_refuses_wrong_nonce_with_empty_bytes() {
        let (sk_bytes, pk_bytes) = generate_ca("gym").unwrap();
        let (state_bytes, request_bytes) = prepare_registration(&pk_bytes).unwrap();
        let response_bytes = register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "gym").unwrap();
        let credential_bytes = proceed_registration_response(&pk_bytes, &state_bytes, &response_bytes).unwrap();
        let showing_bytes = sign_request(&pk_bytes, &credential_bytes, "gym", b"right").unwrap();
        let result = check_request_signature(&pk_bytes, &showing_bytes, "gym", b"wrong").unwrap();
        assert!(!result);
    }

    #[test]
    fn check_request_signature_refuses_a_weaker_disclosure_than_demanded() {
        let (sk_bytes, pk_bytes) = generate_ca("gym,spa").unwrap();
        let (state_bytes, request_bytes) = prepare_registration(&pk_bytes).unwrap();
        let response_bytes = register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "gym,spa").unwrap();
        let credential_bytes = proceed_registration_response(&pk_bytes, &state_bytes, &response_bytes).unwrap();
        let showing_bytes = sign_request(&pk_bytes, &credential_bytes, "gym", b"ctx").unwrap();
        let result = check_request_signature(&pk_bytes, &showing_bytes, "gym,spa", b"ctx").unwrap();
        assert!(!result);
    }

    #[test]
    fn malformed_bytes_are_an_error_not_a_refusal() {
        let (_sk_bytes, pk_bytes) = generate_ca("gym").unwrap();
        assert!(prepare_registration(&pk_bytes[..pk_bytes.len() - 1]).is_err());
    }

    #[test]
    fn proceed_registration_response_refuses_a_tampered_response() {
        let (sk_bytes, pk_bytes) = generate_ca("gym").unwrap();
        let (state_bytes, request_bytes) = prepare_registration(&pk_bytes).unwrap();
        let mut response_bytes = register(&sk_bytes, &pk_bytes, &request_bytes, "alice", "gym").unwrap();
        let last = response_bytes.len() - 1;
        response_bytes[last] ^= 0x01;
        assert!(matches!(
            proceed_registration_response(&pk_bytes, &state_bytes, &response_bytes),
            Err(Error::Malformed(_)) | Err(Error::ProofFailure)
        ));
    }
}
