//! Pointcheval-Sanders signatures over committed messages (PS).
//!
//! Mirrors the pairing-check shape of the teacher's `witness.rs`
//! (`e(witness, ...) == e(accumulator, ...)`) generalised to the PS
//! verification equation, and the blind-signing algebra of
//! `original_source/your_code.py`'s `Server.register`.
use rand::rngs::OsRng;

use crate::error::Error;
use crate::group::{self, pair, G1Projective, G2Projective, Scalar, G1_BYTES};
use crate::keys::{PublicKey, SecretKey};

/// A PS signature `(σ1, σ2) ∈ G1 × G1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) sigma1: G1Projective,
    pub(crate) sigma2: G1Projective,
}

fn g1_linear_combination(bases: &[G1Projective], scalars: &[Scalar]) -> G1Projective {
    bases
        .iter()
        .zip(scalars)
        .fold(G1Projective::IDENTITY, |acc, (g, m)| acc + *g * *m)
}

impl Signature {
    /// Sign a commitment `C = g1^t · Y1_0^s` together with the openly-known
    /// attribute bits `bits = (b1, ..., b_{L-1})`, per `spec.md` §4.2's
    /// issuance step: `σ1 = g1^u`, `σ2 = (X1 · C · ∏ Y1_i^{bi})^u`.
    ///
    /// `bits` must have exactly `L - 1` entries, one per vocabulary slot
    /// after the reserved secret slot.
    pub fn sign_blind(sk: &SecretKey, commitment: G1Projective, bits: &[Scalar]) -> Result<Self, Error> {
        if bits.len() != sk.y.len() - 1 {
            return Err(Error::Malformed("attribute bit vector length mismatch"));
        }
        let mut rng = OsRng;
        let u = Scalar::random(&mut rng);
        let x1 = G1Projective::GENERATOR * sk.x;
        let known = g1_linear_combination(
            &sk.y[1..]
                .iter()
                .map(|yi| G1Projective::GENERATOR * *yi)
                .collect::<Vec<_>>(),
            bits,
        );
        let base = x1 + commitment + known;
        Ok(Self {
            sigma1: G1Projective::GENERATOR * u,
            sigma2: base * u,
        })
    }

    /// Remove the user's blinding factor `t` from a freshly-issued
    /// signature: `σ2' = σ2 / σ1^t`.
    pub fn unblind(&self, t: Scalar) -> Self {
        Self {
            sigma1: self.sigma1,
            sigma2: self.sigma2 - self.sigma1 * t,
        }
    }

    /// Re-randomise the signature for a showing, per `spec.md` §4.4:
    /// `σ̃1 = σ1^r`, `σ̃2 = (σ2 · σ1^{t'})^r`, for fresh `r` and an
    /// additional blinding exponent `t'` applied to the showing's own
    /// commitment.
    pub fn randomize(&self, r: Scalar, t_prime: Scalar) -> Self {
        Self {
            sigma1: self.sigma1 * r,
            sigma2: (self.sigma2 + self.sigma1 * t_prime) * r,
        }
    }

    /// Verify the signature against the full message vector
    /// `m = (s, b1, ..., b_{L-1})` and the issuer's public key:
    /// `e(σ1, X2 · ∏ Y2_i^{mi}) = e(σ2, g2)`. A signature with `σ1 = 1` is
    /// the PS scheme's degenerate forgery and is always rejected.
    pub fn verify(&self, pk: &PublicKey, messages: &[Scalar]) -> bool {
        if bool::from(self.sigma1.is_identity()) || messages.len() != pk.y2.len() {
            return false;
        }
        let exponent = pk.x2
            + pk.y2
                .iter()
                .zip(messages)
                .fold(G2Projective::IDENTITY, |acc, (g, m)| acc + *g * *m);
        pair(self.sigma1, exponent) == pair(self.sigma2, G2Projective::GENERATOR)
    }

    /// Byte length of the canonical signature encoding.
    pub const ENCODED_LEN: usize = G1_BYTES * 2;

    /// Canonical encoding: `σ1 || σ2`.
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[..G1_BYTES].copy_from_slice(&self.sigma1.to_compressed());
        out[G1_BYTES..].copy_from_slice(&self.sigma2.to_compressed());
        out
    }

    /// Parse a signature from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(Error::Malformed("signature length mismatch"));
        }
        let sigma1 = group::decode_g1(&bytes[..G1_BYTES])?;
        let sigma2 = group::decode_g1(&bytes[G1_BYTES..])?;
        Ok(Self { sigma1, sigma2 })
    }
}
