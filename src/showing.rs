//! Selective-disclosure showing protocol (SHOW).
//!
//! Mirrors `original_source/your_code.py`'s `Client.sign_request` /
//! `Server.check_request_signature`: the holder randomises its credential
//! signature and proves, without revealing them, that the hidden attributes
//! and secret slot are consistent with the issuer's signature, while
//! asserting that every revealed attribute is held. Randomising the
//! signature on every showing is what makes two showings of the same
//! credential unlinkable. Revealing an attribute the credential does not
//! actually hold does not raise an error — the assertion is simply false,
//! and the pairing relation the proof is over no longer holds, so
//! verification fails like any other forged claim.
use std::collections::HashSet;

use rand::rngs::OsRng;

use crate::error::Error;
use crate::group::{self, pair, G2Projective, Gt, Scalar};
use crate::issuance::Credential;
use crate::keys::PublicKey;
use crate::signature::Signature;
use crate::zk::SchnorrProof;

/// A presented, selectively-disclosed credential showing.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowingSignature {
    pub(crate) signature: Signature,
    pub(crate) revealed: Vec<usize>,
    pub(crate) proof: SchnorrProof<Gt>,
}

const SHOWING_LABEL: &[u8] = b"ps-abc-credentials/showing";

fn revealed_indices(pk: &PublicKey, reveal: &HashSet<String>) -> Result<Vec<usize>, Error> {
    let mut indices = Vec::with_capacity(reveal.len());
    for name in reveal {
        let idx = pk
            .vocabulary()
            .index_of(name)
            .filter(|i| *i != 0)
            .ok_or_else(|| Error::UnknownAttribute(name.clone()))?;
        indices.push(idx);
    }
    indices.sort_unstable();
    Ok(indices)
}

fn hidden_attribute_indices(pk: &PublicKey, revealed: &[usize]) -> Vec<usize> {
    (1..pk.vocabulary().len()).filter(|i| !revealed.contains(i)).collect()
}

/// `X2 · ∏_{i ∈ revealed} Y2_i`, i.e. the known-G2 side of the pairing
/// equation asserting every revealed attribute's bit is exactly `1`.
fn known_g2(pk: &PublicKey, revealed: &[usize]) -> G2Projective {
    revealed.iter().fold(pk.x2, |acc, i| acc + pk.y2[*i])
}

fn gt_statement(pk: &PublicKey, sig: &Signature, revealed: &[usize]) -> Gt {
    pair(sig.sigma2, G2Projective::GENERATOR) - pair(sig.sigma1, known_g2(pk, revealed))
}

/// Bases in the fixed order `[e(σ̃1, g2), e(σ̃1, Y2_0), e(σ̃1, Y2_i)...]` for
/// every hidden attribute index `i`, matching the order the verifier
/// rebuilds independently.
fn gt_bases(pk: &PublicKey, sig: &Signature, hidden_attrs: &[usize]) -> Vec<Gt> {
    let mut bases = vec![pair(sig.sigma1, G2Projective::GENERATOR), pair(sig.sigma1, pk.y2[0])];
    bases.extend(hidden_attrs.iter().map(|i| pair(sig.sigma1, pk.y2[*i])));
    bases
}

fn context(nonce: &[u8]) -> Vec<u8> {
    [SHOWING_LABEL, nonce].concat()
}

/// Produce a showing of `credential` against the issuer's public key,
/// disclosing exactly the attributes named in `reveal` (the secret slot can
/// never be revealed). `nonce` binds the proof to an application-chosen
/// context, e.g. a verifier challenge, preventing replay across contexts.
pub fn sign_request(
    credential: &Credential,
    pk: &PublicKey,
    reveal: &HashSet<String>,
    nonce: &[u8],
) -> Result<ShowingSignature, Error> {
    let revealed = revealed_indices(pk, reveal)?;
    let hidden_attrs = hidden_attribute_indices(pk, &revealed);

    let mut rng = OsRng;
    let r = Scalar::random(&mut rng);
    let t_prime = Scalar::random(&mut rng);
    let signature = credential.signature().randomize(r, t_prime);

    let bases = gt_bases(pk, &signature, &hidden_attrs);
    let mut secrets = vec![t_prime, credential.messages()[0]];
    secrets.extend(hidden_attrs.iter().map(|i| credential.messages()[*i]));

    let statement = gt_statement(pk, &signature, &revealed);
    let message = context(nonce);
    let (_, proof) = SchnorrProof::prove(&bases, &secrets, Some(statement), Some(&message))?;

    Ok(ShowingSignature { signature, revealed, proof })
}

/// Verify a showing against the issuer's public key and the same nonce the
/// holder was given. On success returns the revealed attribute names, in
/// vocabulary order. Every failure mode (malformed proof, wrong key,
/// tampered signature, an attribute claimed but not actually held) collapses
/// into [`Error::ProofFailure`] — a single boolean outcome, per `spec.md`
/// §7's requirement that showing verification never leaks which check
/// failed.
pub fn verify_signature(
    pk: &PublicKey,
    showing: &ShowingSignature,
    nonce: &[u8],
) -> Result<Vec<String>, Error> {
    if bool::from(showing.signature.sigma1.is_identity()) {
        return Err(Error::ProofFailure);
    }
    let l = pk.vocabulary().len();
    if showing.revealed.iter().any(|i| *i == 0 || *i >= l) {
        return Err(Error::ProofFailure);
    }
    let hidden_attrs = hidden_attribute_indices(pk, &showing.revealed);

    let bases = gt_bases(pk, &showing.signature, &hidden_attrs);
    let statement = gt_statement(pk, &showing.signature, &showing.revealed);
    let message = context(nonce);
    if !showing.proof.verify(&bases, statement, Some(&message)) {
        return Err(Error::ProofFailure);
    }

    let names = pk.vocabulary().attribute_names();
    Ok(showing.revealed.iter().map(|i| names[*i - 1].clone()).collect())
}

impl ShowingSignature {
    /// Canonical encoding: signature, revealed attribute indices, then the
    /// proof's GT commitment and response vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.signature.to_bytes());
        out.extend_from_slice(&(self.revealed.len() as u16).to_be_bytes());
        for i in &self.revealed {
            out.extend_from_slice(&(*i as u16).to_be_bytes());
        }
        out.extend_from_slice(self.proof.commitment.to_bytes().as_ref());
        out.extend_from_slice(&(self.proof.responses.len() as u16).to_be_bytes());
        for z in &self.proof.responses {
            out.extend_from_slice(&z.to_be_bytes());
        }
        out
    }

    /// Parse a showing signature from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut pos = 0usize;
        let sig_bytes = bytes.get(pos..pos + Signature::ENCODED_LEN).ok_or("truncated signature")?;
        let signature = Signature::from_bytes(sig_bytes)?;
        pos += Signature::ENCODED_LEN;

        let revealed_count = u16_at(bytes, &mut pos)?;
        let mut revealed = Vec::with_capacity(revealed_count);
        for _ in 0..revealed_count {
            revealed.push(u16_at(bytes, &mut pos)?);
        }

        let gt_bytes = bytes.get(pos..pos + group::GT_BYTES).ok_or("truncated GT commitment")?;
        let commitment = group::decode_gt(gt_bytes)?;
        pos += group::GT_BYTES;

        let response_count = u16_at(bytes, &mut pos)?;
        let mut responses = Vec::with_capacity(response_count);
        for _ in 0..response_count {
            let scalar_bytes = bytes.get(pos..pos + group::SCALAR_BYTES).ok_or("truncated response")?;
            responses.push(group::decode_scalar(scalar_bytes)?);
            pos += group::SCALAR_BYTES;
        }

        Ok(Self {
            signature,
            revealed,
            proof: SchnorrProof { commitment, responses },
        })
    }
}

fn u16_at(bytes: &[u8], pos: &mut usize) -> Result<usize, Error> {
    let chunk = bytes.get(*pos..*pos + 2).ok_or("truncated length field")?;
    *pos += 2;
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]) as usize)
}
