//! Group, scalar and pairing primitives (GRP).
//!
//! Thin wrappers around `blsful`'s BLS12-381 types: the Type-3 pairing
//! `e : G1 x G2 -> GT`, scalar sampling in `Zp`, and the canonical
//! fixed-width byte encodings every other module builds on.
use blsful::inner_types::*;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};

pub use blsful::inner_types::{G1Projective, G2Projective, Gt, Scalar};

/// Domain-separation salt for all scalar derivation in this crate.
pub(crate) const SALT: &[u8] = b"PS-ABC-CRED-KEYGEN-SALT-";

/// Byte length of a `Zp` scalar's big-endian encoding.
pub const SCALAR_BYTES: usize = 32;
/// Byte length of a compressed `G1` point.
pub const G1_BYTES: usize = 48;
/// Byte length of a compressed `G2` point.
pub const G2_BYTES: usize = 96;
/// Byte length of a `GT` element's encoding.
pub const GT_BYTES: usize = 576;

/// Evaluate the Type-3 bilinear pairing `e(g1, g2) ∈ GT`.
pub fn pair(g1: G1Projective, g2: G2Projective) -> Gt {
    multi_miller_loop(&[(&g1.to_affine(), &G2Prepared::from(g2.to_affine()))])
        .final_exponentiation()
}

/// Sample a scalar in `Zp`. When `seed` is given, the scalar is derived
/// deterministically from `salt || seed` (used for reproducible test vectors);
/// otherwise it is drawn uniformly from `rng`.
pub fn generate_fr(salt: &'static [u8], seed: Option<&[u8]>, mut rng: impl RngCore + CryptoRng) -> Scalar {
    match seed {
        Some(data) => {
            let mut hasher = Sha512::new();
            hasher.update(salt);
            hasher.update(data);
            let digest = hasher.finalize();
            let mut wide = [0u8; 64];
            wide.copy_from_slice(&digest);
            Scalar::from_bytes_wide(&wide)
        }
        None => Scalar::random(&mut rng),
    }
}

/// Parse a compressed `G1` point from exactly [`G1_BYTES`] bytes.
pub(crate) fn decode_g1(bytes: &[u8]) -> Result<G1Projective, &'static str> {
    let buf = <[u8; G1_BYTES]>::try_from(bytes).map_err(|_| "invalid G1 length")?;
    Option::<G1Projective>::from(G1Projective::from_compressed(&buf)).ok_or("invalid G1 encoding")
}

/// Parse a compressed `G2` point from exactly [`G2_BYTES`] bytes.
pub(crate) fn decode_g2(bytes: &[u8]) -> Result<G2Projective, &'static str> {
    let buf = <[u8; G2_BYTES]>::try_from(bytes).map_err(|_| "invalid G2 length")?;
    Option::<G2Projective>::from(G2Projective::from_compressed(&buf)).ok_or("invalid G2 encoding")
}

/// Parse a `GT` element from exactly [`GT_BYTES`] bytes.
pub(crate) fn decode_gt(bytes: &[u8]) -> Result<Gt, &'static str> {
    let buf = <[u8; GT_BYTES]>::try_from(bytes).map_err(|_| "invalid GT length")?;
    Option::<Gt>::from(Gt::from_bytes(&buf)).ok_or("invalid GT encoding")
}

/// Parse a scalar from exactly [`SCALAR_BYTES`] big-endian bytes.
pub(crate) fn decode_scalar(bytes: &[u8]) -> Result<Scalar, &'static str> {
    let buf = <[u8; SCALAR_BYTES]>::try_from(bytes).map_err(|_| "invalid scalar length")?;
    Option::<Scalar>::from(Scalar::from_be_bytes(&buf)).ok_or("invalid scalar encoding")
}

/// Append a `u16`-length-prefixed byte string to `buf`.
pub(crate) fn push_len_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    buf.extend_from_slice(bytes);
}

/// Read a `u16`-length-prefixed byte string starting at `*pos`, advancing it.
pub(crate) fn read_len_prefixed<'a>(buf: &'a [u8], pos: &mut usize) -> Result<&'a [u8], &'static str> {
    let len_bytes = buf.get(*pos..*pos + 2).ok_or("truncated length prefix")?;
    let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
    *pos += 2;
    let bytes = buf.get(*pos..*pos + len).ok_or("truncated field")?;
    *pos += len;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairing_is_non_degenerate() {
        let gt = pair(G1Projective::GENERATOR, G2Projective::GENERATOR);
        assert_ne!(gt, Gt::IDENTITY);
    }

    #[test]
    fn pairing_is_bilinear() {
        let a = Scalar::from(7u64);
        let b = Scalar::from(11u64);
        let lhs = pair(G1Projective::GENERATOR * a, G2Projective::GENERATOR * b);
        let rhs = pair(G1Projective::GENERATOR, G2Projective::GENERATOR) * (a * b);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn g1_round_trips_through_bytes() {
        let p = G1Projective::GENERATOR * Scalar::from(42u64);
        let encoded = p.to_compressed();
        let decoded = decode_g1(&encoded).unwrap();
        assert_eq!(p, decoded);
    }

    #[test]
    fn len_prefixed_round_trips() {
        let mut buf = Vec::new();
        push_len_prefixed(&mut buf, b"hello");
        push_len_prefixed(&mut buf, b"");
        let mut pos = 0;
        assert_eq!(read_len_prefixed(&buf, &mut pos).unwrap(), b"hello");
        assert_eq!(read_len_prefixed(&buf, &mut pos).unwrap(), b"");
        assert_eq!(pos, buf.len());
    }

    #[test]
    fn deterministic_seed_is_reproducible() {
        let a = generate_fr(SALT, Some(b"fixed"), rand::rngs::OsRng);
        let b = generate_fr(SALT, Some(b"fixed"), rand::rngs::OsRng);
        assert_eq!(a, b);
    }
}
