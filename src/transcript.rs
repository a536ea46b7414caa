//! Fiat-Shamir transcript hashing (TH).
//!
//! Produces the scalar challenge used throughout the ZK engine by feeding
//! SHA-256 the concatenation of the canonical, length-prefixed encodings of
//! every element appended to the transcript, then reducing the digest modulo
//! `p`. The append order — bases, prover commitment, statement, optional
//! message — is fixed by every caller in this crate and must never change
//! independently on the prover and verifier sides.
use sha2::{Digest, Sha256};

use crate::group::{G1Projective, G2Projective, Gt, Scalar};

/// An append-only Fiat-Shamir transcript.
pub struct ChallengeTranscript {
    hasher: Sha256,
}

impl Default for ChallengeTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeTranscript {
    /// Start a new, empty transcript.
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Append a length-prefixed, labelled byte string.
    pub fn append_bytes(&mut self, label: &str, bytes: &[u8]) -> &mut Self {
        self.hasher.update((label.len() as u64).to_be_bytes());
        self.hasher.update(label.as_bytes());
        self.hasher.update((bytes.len() as u64).to_be_bytes());
        self.hasher.update(bytes);
        self
    }

    /// Append a `G1` point.
    pub fn append_g1(&mut self, label: &str, point: &G1Projective) -> &mut Self {
        self.append_bytes(label, &point.to_compressed())
    }

    /// Append a `G2` point.
    pub fn append_g2(&mut self, label: &str, point: &G2Projective) -> &mut Self {
        self.append_bytes(label, &point.to_compressed())
    }

    /// Append a `GT` element.
    pub fn append_gt(&mut self, label: &str, point: &Gt) -> &mut Self {
        self.append_bytes(label, point.to_bytes().as_ref())
    }

    /// Append a scalar.
    pub fn append_scalar(&mut self, label: &str, scalar: &Scalar) -> &mut Self {
        self.append_bytes(label, &scalar.to_be_bytes())
    }

    /// Consume the transcript, reducing the SHA-256 digest modulo `p`.
    pub fn challenge_scalar(self) -> Scalar {
        let digest = self.hasher.finalize();
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&digest);
        Scalar::from_bytes_wide(&wide)
    }
}
