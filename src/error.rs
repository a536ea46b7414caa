//! Error kinds for the credential core (see `spec.md` §7).
//!
//! Bad vocabularies, malformed wire input, zero-knowledge or PS-signature
//! proof failure (including the `σ1 = 1` degenerate case, which is treated
//! identically to proof failure), and programmer error. None of these ever
//! carry information that would let a caller distinguish *which* check
//! failed during showing verification — that boundary stays a single
//! boolean, enforced in `showing::verify_signature`.
use thiserror::Error;

/// Errors surfaced by this crate's public API.
#[derive(Debug, Error)]
pub enum Error {
    /// A vocabulary with zero attributes was requested.
    #[error("attribute vocabulary must contain at least one attribute")]
    EmptyVocabulary,
    /// An attribute name appeared twice, or collided with the reserved slot.
    #[error("duplicate or reserved attribute name: {0}")]
    DuplicateAttribute(String),
    /// An attribute name is not part of the issuer's vocabulary.
    #[error("attribute not present in vocabulary: {0}")]
    UnknownAttribute(String),
    /// A byte string could not be parsed as the expected wire type.
    #[error("malformed wire encoding: {0}")]
    Malformed(&'static str),
    /// A zero-knowledge or PS-signature proof failed to verify, including
    /// the algebraic-degenerate case `σ1 = 1`.
    #[error("proof failed to verify")]
    ProofFailure,
    /// A prover API was invoked with a base/secret count mismatch.
    #[error("generalised Schnorr proof requires one secret per base")]
    ProgrammerError,
}

impl From<&'static str> for Error {
    fn from(message: &'static str) -> Self {
        Error::Malformed(message)
    }
}
