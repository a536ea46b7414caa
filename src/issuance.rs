//! Credential issuance protocol (ISS).
//!
//! Three steps mirroring `original_source/your_code.py`'s
//! `Client.prepare_registration` / `Server.register` /
//! `Client.proceed_registration_response`: the user commits to a fresh
//! secret and proves knowledge of it, the issuer blind-signs that
//! commitment together with the attributes it asserts, and the user
//! unblinds the result into a credential ready for showing.
use std::collections::HashSet;

use rand::rngs::OsRng;

use crate::error::Error;
use crate::group::{G1Projective, Scalar};
use crate::keys::{PublicKey, SecretKey};
use crate::signature::Signature;
use crate::zk::SchnorrProof;

const ISSUANCE_LABEL: &[u8] = b"ps-abc-credentials/issuance";

/// The user's private state carried from [`prepare`] to [`finalize`].
pub struct IssuanceState {
    pub(crate) t: Scalar,
    pub(crate) s: Scalar,
}

impl IssuanceState {
    /// Byte length of the canonical encoding.
    pub const ENCODED_LEN: usize = crate::group::SCALAR_BYTES * 2;

    /// Canonical encoding: `t || s`. Holds no group elements, so unlike the
    /// other protocol messages it never crosses the wire to a peer — this
    /// exists only so the byte-oriented API can hand it back to the caller
    /// between `prepare` and `finalize`.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..crate::group::SCALAR_BYTES].copy_from_slice(&self.t.to_be_bytes());
        out[crate::group::SCALAR_BYTES..].copy_from_slice(&self.s.to_be_bytes());
        out
    }

    /// Parse issuance state from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(Error::Malformed("issuance state length mismatch"));
        }
        let t = crate::group::decode_scalar(&bytes[..crate::group::SCALAR_BYTES])?;
        let s = crate::group::decode_scalar(&bytes[crate::group::SCALAR_BYTES..])?;
        Ok(Self { t, s })
    }
}

/// The user's first message to the issuer: a commitment to a fresh secret
/// `s`, blinded by `t`, with a proof of knowledge of both exponents.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuanceRequest {
    pub(crate) commitment: G1Projective,
    pub(crate) proof: SchnorrProof<G1Projective>,
}

/// The issuer's response: a blind signature over the commitment and the
/// attribute bits it decided to assert, plus those bits so the user can
/// finalise the same message vector the issuer signed.
#[derive(Clone, Debug, PartialEq)]
pub struct IssuanceResponse {
    pub(crate) signature: Signature,
    pub(crate) bits: Vec<Scalar>,
}

/// A finished, ready-to-show credential: an unblinded PS signature over the
/// user's secret and the issuer-asserted attribute bits.
#[derive(Clone, Debug, PartialEq)]
pub struct Credential {
    pub(crate) signature: Signature,
    pub(crate) messages: Vec<Scalar>,
}

/// Begin issuance: sample `(t, s)`, commit `C = g1^t · Y1_0^s`, and prove
/// knowledge of both exponents without revealing them.
pub fn prepare(pk: &PublicKey) -> Result<(IssuanceState, IssuanceRequest), Error> {
    let mut rng = OsRng;
    let t = Scalar::random(&mut rng);
    let s = Scalar::random(&mut rng);
    let bases = [G1Projective::GENERATOR, pk.y1[0]];
    let secrets = [t, s];
    let (commitment, proof) = SchnorrProof::prove(&bases, &secrets, None, Some(ISSUANCE_LABEL))?;
    Ok((IssuanceState { t, s }, IssuanceRequest { commitment, proof }))
}

/// Verify the request's proof of knowledge and blind-sign the commitment
/// together with the attributes named in `held`. `held` must be a subset of
/// the issuer's vocabulary and must not name the reserved secret slot.
pub fn register(
    sk: &SecretKey,
    pk: &PublicKey,
    request: &IssuanceRequest,
    held: &HashSet<String>,
) -> Result<IssuanceResponse, Error> {
    let bases = [G1Projective::GENERATOR, pk.y1[0]];
    if !request.proof.verify(&bases, request.commitment, Some(ISSUANCE_LABEL)) {
        return Err(Error::ProofFailure);
    }
    let bits = pk.vocabulary().bitmap(held)?;
    let signature = Signature::sign_blind(sk, request.commitment, &bits)?;
    Ok(IssuanceResponse { signature, bits })
}

/// Unblind the issuer's signature, assemble the finished credential, and
/// verify it against `pk` before handing it back — per
/// `original_source/your_code.py`'s `Client.proceed_registration_response`,
/// which raises rather than accept a signature that fails `PS.Verify`. This
/// is the user's only defence against a malicious or buggy issuer returning
/// a signature that does not actually verify.
pub fn finalize(pk: &PublicKey, state: IssuanceState, response: IssuanceResponse) -> Result<Credential, Error> {
    let signature = response.signature.unblind(state.t);
    let mut messages = Vec::with_capacity(response.bits.len() + 1);
    messages.push(state.s);
    messages.extend(response.bits);
    if !signature.verify(pk, &messages) {
        return Err(Error::ProofFailure);
    }
    Ok(Credential { signature, messages })
}

impl Credential {
    /// Verify the credential against the issuer's public key.
    pub fn verify(&self, pk: &PublicKey) -> bool {
        self.signature.verify(pk, &self.messages)
    }

    /// The full message vector `(s, b1, ..., b_{L-1})` backing this credential.
    pub fn messages(&self) -> &[Scalar] {
        &self.messages
    }

    /// The underlying PS signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}
