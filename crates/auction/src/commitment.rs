//! Commit-reveal scheme for hidden bids.
//!
//! A bidder commits to a price without revealing it by publishing 64 bytes of
//! SHAKE256 output over their identity, the price and a secret salt. The
//! commitment is binding (claiming a different price later requires a second
//! preimage) and hiding as long as the salt stays secret and carries enough
//! entropy.

use {
    model::Identity,
    sha3::{
        Shake256,
        digest::{ExtendableOutput, Update, XofReader},
    },
};

/// Exact length of a bid commitment in bytes (512 bits of SHAKE256 output).
pub const COMMITMENT_LEN: usize = 64;

/// Minimum accepted salt length in bytes. A short salt would let observers
/// brute force the commitment over plausible prices.
pub const MIN_SALT_LEN: usize = 64;

/// Computes the commitment binding a bidder to a price.
///
/// The digest absorbs, in order: the bidder's raw identity bytes, the price
/// as a fixed-width 8 byte big-endian integer, and the salt. The fixed-width
/// price encoding keeps the input length-unambiguous.
pub fn commit(bidder: &Identity, price: u64, salt: &[u8]) -> [u8; COMMITMENT_LEN] {
    let mut shake = Shake256::default();
    shake.update(bidder.as_bytes());
    shake.update(&price.to_be_bytes());
    shake.update(salt);
    let mut digest = [0; COMMITMENT_LEN];
    shake.finalize_xof().read(&mut digest);
    digest
}

/// Checks a stored commitment against a claimed `(bidder, price, salt)`.
///
/// The comparison is exact and byte-for-byte; there is no partial matching.
pub fn verify(commitment: &[u8], bidder: &Identity, price: u64, salt: &[u8]) -> bool {
    commitment == commit(bidder, price, salt).as_slice()
}
