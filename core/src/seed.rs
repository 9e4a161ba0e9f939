//! Per-day seed derivation.

use alloc::string::String;
use sha2::{Digest, Sha256};

use crate::constants::SEED_HINT_LEN;

/// The seed for one UTC day: lowercase hex of `SHA-256("{secret}-ROPE-{YYYYMMDD}")`.
///
/// Only [`DailySeed::hint`] may leave the server.
#[derive(Clone, PartialEq, Eq)]
pub struct DailySeed(String);

impl DailySeed {
    /// `day_stamp` is the UTC date formatted as `YYYYMMDD`.
    pub fn derive(secret: &str, day_stamp: &str) -> Self {
        let mut h = Sha256::new();
        h.update(secret.as_bytes());
        h.update(b"-ROPE-");
        h.update(day_stamp.as_bytes());
        Self(hex::encode(h.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Short display prefix of the seed hash.
    pub fn hint(&self) -> &str {
        &self.0[..SEED_HINT_LEN]
    }
}

// Keep the full seed out of logs.
impl core::fmt::Debug for DailySeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "DailySeed({}..)", self.hint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_day_same_seed() {
        let a = DailySeed::derive("okapi", "20250301");
        let b = DailySeed::derive("okapi", "20250301");
        assert_eq!(a, b);
        assert_eq!(a.hint(), b.hint());
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(a.hint().len(), SEED_HINT_LEN);
    }

    #[test]
    fn test_known_seed() {
        let seed = DailySeed::derive("okapi", "20250301");
        assert_eq!(
            seed.as_str(),
            "324c2d0424708944f4ac8560f41e448ab8cb877d930aa56c4cf6a9e442954cbd"
        );
        assert_eq!(seed.hint(), "324c2d04");
    }

    #[test]
    fn test_day_and_secret_change_seed() {
        let base = DailySeed::derive("okapi", "20250301");
        assert_ne!(base, DailySeed::derive("okapi", "20250302"));
        assert_ne!(base, DailySeed::derive("other", "20250301"));
    }

    #[test]
    fn test_debug_hides_seed() {
        let seed = DailySeed::derive("okapi", "20250301");
        let shown = alloc::format!("{:?}", seed);
        assert!(!shown.contains(seed.as_str()));
    }
}
