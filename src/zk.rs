//! Generalised Schnorr zero-knowledge proof engine (ZK), made non-interactive
//! via Fiat-Shamir (`spec.md` §4.3).
//!
//! A proof instance is parameterised over a group `G` (here `G1Projective`
//! for issuance, `Gt` for showing) and an ordered list of bases. The engine
//! is the generalisation of the teacher's `witness.rs`
//! `MembershipProofCommitting`/`MembershipProof` pair (which hard-codes 8
//! fixed secrets) to an arbitrary-length base/secret vector.
use rand::rngs::OsRng;

use crate::error::Error;
use crate::group::{G1Projective, Gt, Scalar};
use crate::transcript::ChallengeTranscript;

/// A group usable as the target of a generalised Schnorr proof: closed
/// under addition, subtraction, and scalar multiplication, with an identity
/// element and a canonical transcript encoding.
pub trait SchnorrGroup:
    Copy
    + PartialEq
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Scalar, Output = Self>
{
    /// The group's identity element.
    fn identity() -> Self;
    /// Append the canonical encoding of `self` to `transcript` under `label`.
    fn append_to_transcript(&self, label: &str, transcript: &mut ChallengeTranscript);
}

impl SchnorrGroup for G1Projective {
    fn identity() -> Self {
        G1Projective::IDENTITY
    }

    fn append_to_transcript(&self, label: &str, transcript: &mut ChallengeTranscript) {
        transcript.append_g1(label, self);
    }
}

impl SchnorrGroup for Gt {
    fn identity() -> Self {
        Gt::IDENTITY
    }

    fn append_to_transcript(&self, label: &str, transcript: &mut ChallengeTranscript) {
        transcript.append_gt(label, self);
    }
}

fn linear_combination<G: SchnorrGroup>(bases: &[G], scalars: &[Scalar]) -> G {
    bases
        .iter()
        .zip(scalars)
        .fold(G::identity(), |acc, (g, x)| acc + *g * *x)
}

fn challenge<G: SchnorrGroup>(
    bases: &[G],
    commitment: &G,
    statement: &G,
    message: Option<&[u8]>,
) -> Scalar {
    let mut transcript = ChallengeTranscript::new();
    for (i, base) in bases.iter().enumerate() {
        base.append_to_transcript(&format!("base[{i}]"), &mut transcript);
    }
    commitment.append_to_transcript("commitment", &mut transcript);
    statement.append_to_transcript("statement", &mut transcript);
    if let Some(message) = message {
        transcript.append_bytes("message", message);
    }
    transcript.challenge_scalar()
}

/// A non-interactive generalised Schnorr proof: a commitment `R` and the
/// per-base response vector `z`.
#[derive(Clone, Debug, PartialEq)]
pub struct SchnorrProof<G> {
    /// The prover's commitment `R = ∏ gᵢ^{rᵢ}`.
    pub commitment: G,
    /// The responses `zᵢ = rᵢ + c·xᵢ (mod p)`.
    pub responses: Vec<Scalar>,
}

impl<G: SchnorrGroup> SchnorrProof<G> {
    /// Prove knowledge of `secrets` such that `Y = ∏ bases[i]^{secrets[i]}`.
    /// If `statement` is `None`, `Y` is computed from `bases`/`secrets`;
    /// otherwise the caller-supplied statement is used as-is (the issuance
    /// protocol already has `C` in hand). Returns the statement `Y` alongside
    /// the proof so callers that computed it can reuse it.
    pub fn prove(
        bases: &[G],
        secrets: &[Scalar],
        statement: Option<G>,
        message: Option<&[u8]>,
    ) -> Result<(G, Self), Error> {
        if bases.len() != secrets.len() || bases.is_empty() {
            return Err(Error::ProgrammerError);
        }
        let mut rng = OsRng;
        let statement = statement.unwrap_or_else(|| linear_combination(bases, secrets));
        let blinds: Vec<Scalar> = (0..bases.len()).map(|_| Scalar::random(&mut rng)).collect();
        let commitment = linear_combination(bases, &blinds);
        let c = challenge(bases, &commitment, &statement, message);
        let responses: Vec<Scalar> = blinds
            .iter()
            .zip(secrets)
            .map(|(r, x)| *r + c * *x)
            .collect();
        Ok((statement, Self { commitment, responses }))
    }

    /// Verify the proof against `bases` and `statement`. Recomputes the
    /// challenge exactly as the prover did and accepts iff
    /// `R · Y^c = ∏ gᵢ^{zᵢ}`.
    pub fn verify(&self, bases: &[G], statement: G, message: Option<&[u8]>) -> bool {
        if bases.len() != self.responses.len() || bases.is_empty() {
            return false;
        }
        let c = challenge(bases, &self.commitment, &statement, message);
        let lhs = self.commitment + statement * c;
        let rhs = linear_combination(bases, &self.responses);
        lhs == rhs
    }
}
