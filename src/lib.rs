//! Privacy-preserving attribute-based credentials.
//!
//! A credential binds a hidden user secret to an issuer-asserted set of
//! boolean attributes under a Pointcheval-Sanders signature over a Type-3
//! bilinear pairing. Issuance blind-signs a Pedersen-style commitment so
//! the issuer never sees the user's secret; showing randomises the
//! signature and proves, with a non-interactive generalised Schnorr
//! argument, that the undisclosed attributes are consistent with it —
//! without revealing them, and without letting two showings of the same
//! credential be linked to each other.
//!
//! [`api`] is the byte-in, byte-out surface most callers want. The typed
//! modules underneath it (`keys`, `issuance`, `showing`, ...) are public for
//! callers that want to hold onto typed values across a protocol run
//! instead of re-parsing bytes at every step.
#![deny(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_parens,
    unused_lifetimes,
    unconditional_recursion,
    unused_extern_crates,
    trivial_casts,
    trivial_numeric_casts
)]
pub mod api;
pub mod error;
pub mod group;
pub mod issuance;
pub mod keys;
mod messages;
pub mod showing;
pub mod signature;
mod transcript;
pub mod vocabulary;
mod zk;

pub use error::Error;
pub use issuance::{Credential, IssuanceRequest, IssuanceResponse, IssuanceState};
pub use keys::{PublicKey, SecretKey};
pub use showing::ShowingSignature;
pub use signature::Signature;
pub use vocabulary::AttributeVocabulary;
pub use zk::{SchnorrGroup, SchnorrProof};

#[cfg(test)]
mod tests;
