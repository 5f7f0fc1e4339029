//! Tie-break randomness collaborator.
//!
//! Winner determination resolves top-bid ties with a uniform draw. Because
//! the same logical transaction is re-executed on several replicas for
//! validation, the draw must come out identical everywhere; it is therefore
//! injected as a capability seeded from transaction-identifying material
//! instead of read from an ambient generator. Replica agreement is a
//! correctness requirement, not a performance concern.

use rand::{Rng, SeedableRng, rngs::StdRng};

#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait TieBreaker: Send + Sync {
    /// Returns a uniformly distributed index in `[0, n)`.
    ///
    /// Only ever called with `n >= 2`; implementations may panic on `n == 0`.
    fn random_uniform(&self, n: u64) -> u64;
}

/// Tie breaker drawing from a cryptographically secure generator seeded with
/// 32 bytes of transaction-identifying material. Equal seeds yield equal
/// draws on every replica.
#[derive(Clone, Debug)]
pub struct SeededTieBreaker {
    seed: [u8; 32],
}

impl SeededTieBreaker {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed }
    }
}

impl TieBreaker for SeededTieBreaker {
    fn random_uniform(&self, n: u64) -> u64 {
        StdRng::from_seed(self.seed).gen_range(0..n)
    }
}
