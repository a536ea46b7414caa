//! Explicit, versioned wire encodings (MSG).
//!
//! `spec.md` §9 calls out the original implementation's use of runtime type
//! reflection (`jsonpickle`) for serialisation as a source of fragility;
//! every message type here instead gets a fixed field order, explicit
//! length prefixes, and a leading version byte so a future format change
//! can be rejected cleanly instead of silently misparsed.
use crate::error::Error;
use crate::group::{self, Scalar, G1_BYTES};
use crate::issuance::{Credential, IssuanceRequest, IssuanceResponse};
use crate::signature::Signature;
use crate::zk::SchnorrProof;

const WIRE_VERSION: u8 = 1;

fn with_version(mut body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(WIRE_VERSION);
    out.append(&mut body);
    out
}

fn strip_version(bytes: &[u8]) -> Result<&[u8], Error> {
    match bytes.split_first() {
        Some((&WIRE_VERSION, rest)) => Ok(rest),
        Some(_) => Err(Error::Malformed("unsupported wire version")),
        None => Err(Error::Malformed("empty message")),
    }
}

fn push_scalars(out: &mut Vec<u8>, scalars: &[Scalar]) {
    out.extend_from_slice(&(scalars.len() as u16).to_be_bytes());
    for s in scalars {
        out.extend_from_slice(&s.to_be_bytes());
    }
}

fn read_scalars(bytes: &[u8], pos: &mut usize) -> Result<Vec<Scalar>, Error> {
    let len_bytes = bytes.get(*pos..*pos + 2).ok_or("truncated scalar count")?;
    let count = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    *pos += 2;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let chunk = bytes.get(*pos..*pos + group::SCALAR_BYTES).ok_or("truncated scalar")?;
        out.push(group::decode_scalar(chunk)?);
        *pos += group::SCALAR_BYTES;
    }
    Ok(out)
}

impl IssuanceRequest {
    /// Versioned canonical encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.commitment.to_compressed());
        body.extend_from_slice(&self.proof.commitment.to_compressed());
        push_scalars(&mut body, &self.proof.responses);
        with_version(body)
    }

    /// Parse a versioned issuance request.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let body = strip_version(bytes)?;
        let mut pos = 0usize;
        let commitment = group::decode_g1(body.get(pos..pos + G1_BYTES).ok_or("truncated commitment")?)?;
        pos += G1_BYTES;
        let proof_commitment =
            group::decode_g1(body.get(pos..pos + G1_BYTES).ok_or("truncated proof commitment")?)?;
        pos += G1_BYTES;
        let responses = read_scalars(body, &mut pos)?;
        Ok(Self {
            commitment,
            proof: SchnorrProof {
                commitment: proof_commitment,
                responses,
            },
        })
    }
}

impl IssuanceResponse {
    /// Versioned canonical encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.signature.to_bytes());
        push_scalars(&mut body, &self.bits);
        with_version(body)
    }

    /// Parse a versioned issuance response.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let body = strip_version(bytes)?;
        let mut pos = 0usize;
        let sig_bytes = body.get(pos..pos + Signature::ENCODED_LEN).ok_or("truncated signature")?;
        let signature = Signature::from_bytes(sig_bytes)?;
        pos += Signature::ENCODED_LEN;
        let bits = read_scalars(body, &mut pos)?;
        Ok(Self { signature, bits })
    }
}

impl Credential {
    /// Versioned canonical encoding: signature followed by the full message
    /// vector, so a credential can be stored and reloaded verbatim.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&self.signature.to_bytes());
        push_scalars(&mut body, &self.messages);
        with_version(body)
    }

    /// Parse a versioned credential.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let body = strip_version(bytes)?;
        let mut pos = 0usize;
        let sig_bytes = body.get(pos..pos + Signature::ENCODED_LEN).ok_or("truncated signature")?;
        let signature = Signature::from_bytes(sig_bytes)?;
        pos += Signature::ENCODED_LEN;
        let messages = read_scalars(body, &mut pos)?;
        Ok(Self { signature, messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::{finalize, prepare, register};
    use crate::keys::{PublicKey, SecretKey};
    use crate::vocabulary::AttributeVocabulary;
    use std::collections::HashSet;

    #[test]
    fn issuance_request_round_trips() {
        let vocab = AttributeVocabulary::new(&["gym", "spa"]).unwrap();
        let sk = SecretKey::new(&vocab).unwrap();
        let pk = PublicKey::from_secret_key(&sk, vocab).unwrap();
        let (_state, request) = prepare(&pk).unwrap();
        let bytes = request.to_bytes();
        let decoded = IssuanceRequest::from_bytes(&bytes).unwrap();
        assert_eq!(request, decoded);
    }

    #[test]
    fn issuance_response_and_credential_round_trip() {
        let vocab = AttributeVocabulary::new(&["gym", "spa"]).unwrap();
        let sk = SecretKey::new(&vocab).unwrap();
        let pk = PublicKey::from_secret_key(&sk, vocab).unwrap();
        let (state, request) = prepare(&pk).unwrap();
        let held: HashSet<String> = ["gym".to_string()].into_iter().collect();
        let response = register(&sk, &pk, &request, &held).unwrap();
        let response_bytes = response.to_bytes();
        let decoded_response = IssuanceResponse::from_bytes(&response_bytes).unwrap();
        assert_eq!(response, decoded_response);

        let credential = finalize(&pk, state, decoded_response).unwrap();
        let cred_bytes = credential.to_bytes();
        let decoded_credential = Credential::from_bytes(&cred_bytes).unwrap();
        assert_eq!(credential, decoded_credential);
        assert!(decoded_credential.verify(&pk));
    }

    #[test]
    fn rejects_unknown_wire_version() {
        let mut bytes = vec![WIRE_VERSION + 1];
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(Credential::from_bytes(&bytes).is_err());
    }
}
