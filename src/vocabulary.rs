//! Attribute vocabulary (ATTR).
//!
//! The ordered list of attribute names fixed at issuer-key-generation time.
//! Index 0 is always the reserved, user-visible secret slot; it never
//! appears in a held-attribute set or a revealed set.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::group::Scalar;

/// The reserved name occupying vocabulary index 0.
pub const SECRET_SLOT: &str = "secret_key";

/// The ordered, issuer-fixed list of attribute names, including the
/// reserved secret slot at index 0.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeVocabulary {
    names: Vec<String>,
}

impl AttributeVocabulary {
    /// Build a vocabulary from issuer-chosen attribute names (excluding the
    /// secret slot, which is inserted automatically). Fails if the list is
    /// empty, contains duplicates, or names the reserved slot explicitly.
    pub fn new(attribute_names: &[&str]) -> Result<Self, Error> {
        if attribute_names.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        let mut names = Vec::with_capacity(attribute_names.len() + 1);
        names.push(SECRET_SLOT.to_string());
        for name in attribute_names {
            if *name == SECRET_SLOT || names.iter().any(|n| n == name) {
                return Err(Error::DuplicateAttribute((*name).to_string()));
            }
            names.push((*name).to_string());
        }
        Ok(Self { names })
    }

    /// Build a vocabulary from a comma-separated list, per `spec.md` §6:
    /// an empty field means an empty vocabulary, which is rejected.
    pub fn from_csv(csv: &str) -> Result<Self, Error> {
        let attrs: Vec<&str> = csv.split(',').filter(|s| !s.is_empty()).collect();
        if attrs.is_empty() {
            return Err(Error::EmptyVocabulary);
        }
        Self::new(&attrs)
    }

    /// The total vocabulary length `L` (including the secret slot).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always `false`: a valid vocabulary always carries the secret slot.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The issuer-managed attribute names, excluding the secret slot, in
    /// vocabulary order.
    pub fn attribute_names(&self) -> &[String] {
        &self.names[1..]
    }

    /// The position of `name` within the full vocabulary (secret slot is
    /// index 0), or `None` if unknown. O(L) by design.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Parse a comma-separated attribute set into a normalised (deduplicated,
    /// trimmed) set of names, discarding empty fields.
    pub fn normalize_csv(csv: &str) -> HashSet<String> {
        csv.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Canonical encoding: attribute count (excluding the secret slot) as a
    /// `u16`, followed by each name as a length-prefixed UTF-8 string, in
    /// vocabulary order. The secret slot itself is not encoded — it is
    /// reinserted on decode.
    pub fn to_bytes(&self) -> Vec<u8> {
        let names = self.attribute_names();
        let mut out = Vec::with_capacity(2 + names.len() * 8);
        out.extend_from_slice(&(names.len() as u16).to_be_bytes());
        for name in names {
            crate::group::push_len_prefixed(&mut out, name.as_bytes());
        }
        out
    }

    /// Parse a vocabulary from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 2 {
            return Err(Error::Malformed("vocabulary too short"));
        }
        let count = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        let mut pos = 2;
        let mut names = Vec::with_capacity(count);
        for _ in 0..count {
            let raw = crate::group::read_len_prefixed(bytes, &mut pos)?;
            names.push(std::str::from_utf8(raw).map_err(|_| "non-UTF-8 attribute name")?);
        }
        Self::new(&names)
    }

    /// Reject `subset` if it names the secret slot or any attribute outside
    /// the vocabulary.
    pub fn validate_subset(&self, subset: &HashSet<String>) -> Result<(), Error> {
        for name in subset {
            if name == SECRET_SLOT || self.index_of(name).is_none() {
                return Err(Error::UnknownAttribute(name.clone()));
            }
        }
        Ok(())
    }

    /// Build the canonical `L - 1`-length bitmap over [`attribute_names`]
    /// for a held-attribute set: `1` where held, `0` otherwise.
    ///
    /// [`attribute_names`]: Self::attribute_names
    pub fn bitmap(&self, held: &HashSet<String>) -> Result<Vec<Scalar>, Error> {
        self.validate_subset(held)?;
        Ok(self
            .attribute_names()
            .iter()
            .map(|name| {
                if held.contains(name) {
                    Scalar::ONE
                } else {
                    Scalar::ZERO
                }
            })
            .collect())
    }
}
