//! Contains the persisted auction entities that are shared between the
//! mechanism and the platform hosting it.

pub mod auction;
pub mod bytes_hex;
pub mod identity;

pub use {
    auction::{Auction, AuctionResult, AuctionStatus, AuctionSummary, Bid},
    identity::Identity,
};
