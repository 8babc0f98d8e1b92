//! Key assignment for candidates found in one document query.
//!
//! Keys are stamped onto elements as a data attribute so the same element
//! maps to the same key across queries, observer callbacks and sessions.
//! Cloning an element copies the stamp, so a stamp seen twice in one query
//! belongs to two elements: the first keeps it and every later copy is
//! re-stamped with a fresh key.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::collections::HashSet;

use crate::candidate::CandidateKey;

/// What the host must do with one queried element's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAssignment {
    /// The stamp already on the element is its key.
    Reuse(CandidateKey),
    /// Write this key onto the element, replacing whatever was there.
    Stamp(CandidateKey),
}

impl KeyAssignment {
    #[must_use]
    pub fn key(self) -> CandidateKey {
        match self {
            Self::Reuse(key) | Self::Stamp(key) => key,
        }
    }
}

/// Parse a raw stamp attribute. Missing or malformed stamps are `None`.
#[must_use]
pub fn parse_stamp(raw: Option<&str>) -> Option<u64> {
    match raw?.trim().parse::<u64>() {
        Ok(stamp) => Some(stamp),
        Err(_) => None,
    }
}

/// Assign a unique key to every element of one query, in document order.
///
/// `stamps` holds each element's parsed stamp. `fresh` is drawn from until it
/// yields a value no element of the query carries or was given.
pub fn assign_keys(stamps: &[Option<u64>], mut fresh: impl FnMut() -> u64) -> Vec<KeyAssignment> {
    let stamped = stamps.iter().flatten().copied().collect::<HashSet<_>>();
    let mut taken = HashSet::with_capacity(stamps.len());

    stamps
        .iter()
        .map(|stamp| {
            if let Some(key) = *stamp
                && taken.insert(key)
            {
                return KeyAssignment::Reuse(CandidateKey(key));
            }
            let key = loop {
                let key = fresh();
                if !stamped.contains(&key) && taken.insert(key) {
                    break key;
                }
            };
            KeyAssignment::Stamp(CandidateKey(key))
        })
        .collect()
}
