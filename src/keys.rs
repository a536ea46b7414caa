//! PS secret and public keys (part of PS).
//!
//! Mirrors the teacher's `accumulator/key.rs`: a scalar-holding secret key
//! that zeroizes on drop, and a public key derived from it by exponentiating
//! the group generators.
use std::convert::TryFrom;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::Error;
use crate::group::{self, G1Projective, G2Projective, Scalar, G1_BYTES, G2_BYTES, SCALAR_BYTES};
use crate::vocabulary::AttributeVocabulary;

/// The issuer's secret key: `x ∈ Zp` and `y = (y0, ..., y_{L-1}) ∈ Zp^L`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecretKey {
    pub(crate) x: Scalar,
    pub(crate) y: Vec<Scalar>,
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.x.zeroize();
        for yi in self.y.iter_mut() {
            yi.zeroize();
        }
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SecretKey {
    /// Generate a fresh secret key for a vocabulary of `L = vocabulary.len()`
    /// attributes (including the secret slot). Fails when `L = 0`, which
    /// [`AttributeVocabulary`] never permits — kept here as a defensive
    /// mirror of `spec.md` §4.2's keygen failure mode.
    pub fn new(vocabulary: &AttributeVocabulary) -> Result<Self, Error> {
        let l = vocabulary.len();
        if l == 0 {
            return Err(Error::EmptyVocabulary);
        }
        let rng = rand::rngs::OsRng;
        let x = group::generate_fr(group::SALT, None, rng);
        let y = (0..l).map(|_| group::generate_fr(group::SALT, None, rng)).collect();
        Ok(Self { x, y })
    }

    /// Byte length of the canonical secret-key encoding for a vocabulary of
    /// length `l`.
    pub fn encoded_len(l: usize) -> usize {
        SCALAR_BYTES * (1 + l)
    }

    /// Canonical fixed-width encoding: `x || y0 || ... || y_{L-1}`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::encoded_len(self.y.len()));
        out.extend_from_slice(&self.x.to_be_bytes());
        for yi in &self.y {
            out.extend_from_slice(&yi.to_be_bytes());
        }
        out
    }

    /// Parse a secret key for a vocabulary of length `l` from its canonical
    /// encoding.
    pub fn from_bytes(bytes: &[u8], l: usize) -> Result<Self, Error> {
        if bytes.len() != Self::encoded_len(l) {
            return Err(Error::Malformed("secret key length mismatch"));
        }
        let x = group::decode_scalar(&bytes[0..SCALAR_BYTES])?;
        let y = (0..l)
            .map(|i| {
                let start = SCALAR_BYTES * (1 + i);
                group::decode_scalar(&bytes[start..start + SCALAR_BYTES])
            })
            .collect::<Result<Vec<_>, &'static str>>()?;
        Ok(Self { x, y })
    }
}

/// The issuer's public key: `X2 = g2^x`, `Y1_i = g1^{yi}`, `Y2_i = g2^{yi}`,
/// plus the vocabulary that fixes `L` and attribute ordering.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) x2: G2Projective,
    pub(crate) y1: Vec<G1Projective>,
    pub(crate) y2: Vec<G2Projective>,
    pub(crate) vocabulary: AttributeVocabulary,
}

impl PublicKey {
    /// Derive the public key from a secret key and the vocabulary it was
    /// generated for.
    pub fn from_secret_key(sk: &SecretKey, vocabulary: AttributeVocabulary) -> Result<Self, Error> {
        if sk.y.len() != vocabulary.len() {
            return Err(Error::Malformed("secret key / vocabulary length mismatch"));
        }
        let x2 = G2Projective::GENERATOR * sk.x;
        let y1 = sk.y.iter().map(|yi| G1Projective::GENERATOR * *yi).collect();
        let y2 = sk.y.iter().map(|yi| G2Projective::GENERATOR * *yi).collect();
        Ok(Self { x2, y1, y2, vocabulary })
    }

    /// The vocabulary this key was generated for.
    pub fn vocabulary(&self) -> &AttributeVocabulary {
        &self.vocabulary
    }

    /// Canonical fixed-width encoding: `L || X2 || Y1_0..L || Y2_0..L || vocabulary`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let l = self.y1.len();
        let mut out = Vec::with_capacity(2 + G2_BYTES + l * (G1_BYTES + G2_BYTES) + 256);
        out.extend_from_slice(&(l as u16).to_be_bytes());
        out.extend_from_slice(&self.x2.to_compressed());
        for p in &self.y1 {
            out.extend_from_slice(&p.to_compressed());
        }
        for p in &self.y2 {
            out.extend_from_slice(&p.to_compressed());
        }
        group::push_len_prefixed(&mut out, &self.vocabulary.to_bytes());
        out
    }

    /// Parse a public key from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 2 + G2_BYTES {
            return Err(Error::Malformed("public key too short"));
        }
        let l = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let mut pos = 2;
        let x2 = group::decode_g2(&bytes[pos..pos + G2_BYTES])?;
        pos += G2_BYTES;
        let mut y1 = Vec::with_capacity(l);
        for _ in 0..l {
            let chunk = bytes.get(pos..pos + G1_BYTES).ok_or("truncated Y1")?;
            y1.push(group::decode_g1(chunk)?);
            pos += G1_BYTES;
        }
        let mut y2 = Vec::with_capacity(l);
        for _ in 0..l {
            let chunk = bytes.get(pos..pos + G2_BYTES).ok_or("truncated Y2")?;
            y2.push(group::decode_g2(chunk)?);
            pos += G2_BYTES;
        }
        let vocab_bytes = group::read_len_prefixed(bytes, &mut pos)?;
        let vocabulary = AttributeVocabulary::from_bytes(vocab_bytes)?;
        if vocabulary.len() != l {
            return Err(Error::Malformed("vocabulary length mismatch"));
        }
        Ok(Self { x2, y1, y2, vocabulary })
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_round_trips_to_public_key() {
        let vocab = AttributeVocabulary::new(&["gym", "spa"]).unwrap();
        let sk = SecretKey::new(&vocab).unwrap();
        let pk = PublicKey::from_secret_key(&sk, vocab.clone()).unwrap();
        assert_eq!(pk.y1.len(), vocab.len());
        assert_eq!(pk.y2.len(), vocab.len());
        assert_ne!(pk.x2, G2Projective::IDENTITY);
    }

    #[test]
    fn secret_key_bytes_round_trip() {
        let vocab = AttributeVocabulary::new(&["gym", "spa"]).unwrap();
        let sk = SecretKey::new(&vocab).unwrap();
        let bytes = sk.to_bytes();
        let sk2 = SecretKey::from_bytes(&bytes, vocab.len()).unwrap();
        assert_eq!(sk.x, sk2.x);
        assert_eq!(sk.y, sk2.y);
    }

    #[test]
    fn public_key_bytes_round_trip() {
        let vocab = AttributeVocabulary::new(&["gym", "spa", "bars"]).unwrap();
        let sk = SecretKey::new(&vocab).unwrap();
        let pk = PublicKey::from_secret_key(&sk, vocab).unwrap();
        let bytes = pk.to_bytes();
        let pk2 = PublicKey::from_bytes(&bytes).unwrap();
        assert_eq!(pk, pk2);
    }
}
