//! Sealed-bid second-price ("Vickrey") auction mechanism, executed as
//! deterministic transaction logic against a shared key-value ledger.
//!
//! Every operation is a single read-modify-write of one [`model::Auction`]
//! entity: read the current state through the ledger collaborator, validate
//! preconditions against the caller's identity, mutate the entity, write it
//! back and publish a summary through the event collaborator. The hosting
//! platform owns transaction atomicity, ordering and conflict control; the
//! mechanism is a pure function of the ledger state, the caller identity, the
//! operation arguments and the injected tie-break randomness, so every
//! replica re-executing the same transaction arrives at the same result.

pub mod arbitrator;
pub mod commitment;
pub mod contract;
pub mod events;
pub mod identity;
pub mod ledger;
pub mod randomness;

pub use {
    arbitrator::{Arbitrator, Settlement},
    contract::{AuctionContract, Error, ErrorKind},
};
