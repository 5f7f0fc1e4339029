//! The auction operations: a monotonic state machine over the ledger.
//!
//! Lifecycle: the seller creates an auction (`Open`), bidders append hidden
//! bids, the seller closes it (`Closed`, no further bids), bidders reveal
//! their prices in place, the seller ends it (`Ended`, winner and hammer
//! price settled) — or, at any point before `Ended`, any buyer short-circuits
//! the whole auction through a direct buy.

use {
    crate::{
        arbitrator::Arbitrator,
        commitment::{self, COMMITMENT_LEN, MIN_SALT_LEN},
        events::{EventSink, emit_summary},
        identity::IdentityProvider,
        ledger::{LedgerStore, auction_exists, read_auction, write_auction},
        randomness::TieBreaker,
    },
    model::{Auction, AuctionResult, AuctionStatus, Bid, Identity},
    std::sync::Arc,
};

/// Why an operation was rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("auction `{0}` does not exist")]
    NotFound(String),

    #[error("auction `{0}` already exists")]
    AlreadyExists(String),

    #[error("only the auction seller may {0}")]
    Unauthorized(&'static str),

    #[error("bid price cannot be zero")]
    ZeroBidPrice,

    #[error("salt must be at least {MIN_SALT_LEN} bytes, got {0}")]
    WeakSalt(usize),

    #[error("hidden commitment must be exactly {COMMITMENT_LEN} bytes, got {0}")]
    MalformedCommitment(usize),

    #[error("auction `{0}` no longer accepts bids")]
    BiddingClosed(String),

    #[error("cannot end auction `{0}`: not all bids are revealed yet")]
    UnrevealedBids(String),

    #[error("auction `{0}` has already ended")]
    AlreadyEnded(String),

    #[error("direct buy is disabled for auction `{0}`")]
    DirectBuyDisabled(String),

    #[error("offered price {offered} is below the direct buy price {threshold}")]
    InsufficientPayment { offered: u64, threshold: u64 },

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// Coarse classification of [`Error`] for callers that branch on the kind of
/// rejection rather than the specific variant.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Unauthorized,
    InvalidArgument,
    PreconditionFailed,
    /// A collaborator interface failed; nothing was decided.
    Collaborator,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::ZeroBidPrice
            | Self::WeakSalt(_)
            | Self::MalformedCommitment(_)
            | Self::InsufficientPayment { .. } => ErrorKind::InvalidArgument,
            Self::BiddingClosed(_)
            | Self::UnrevealedBids(_)
            | Self::AlreadyEnded(_)
            | Self::DirectBuyDisabled(_) => ErrorKind::PreconditionFailed,
            Self::Collaborator(_) => ErrorKind::Collaborator,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Executes auction operations against the shared ledger.
///
/// One instance is scoped to a single consensus-ordered transaction: the
/// collaborators provide that transaction's ledger view, caller identity and
/// tie-break seed. Every operation runs to completion or fails atomically; on
/// failure no state is written.
pub struct AuctionContract {
    pub store: Arc<dyn LedgerStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub events: Arc<dyn EventSink>,
    pub tie_breaker: Arc<dyn TieBreaker>,
}

impl AuctionContract {
    fn caller(&self) -> Result<Identity> {
        Ok(self.identity.current_caller()?)
    }

    fn auction(&self, name: &str) -> Result<Auction> {
        read_auction(self.store.as_ref(), name)?.ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn persist(&self, auction: &Auction, result: Option<AuctionResult>) -> Result<()> {
        write_auction(self.store.as_ref(), auction)?;
        emit_summary(self.events.as_ref(), &auction.summary(result))?;
        Ok(())
    }

    /// Creates a new auction with the caller as seller.
    ///
    /// `direct_buy_price == 0` disables the direct-buy fast path.
    pub fn create_auction(&self, name: &str, direct_buy_price: u64) -> Result<()> {
        let seller = self.caller()?;
        if auction_exists(self.store.as_ref(), name)? {
            return Err(Error::AlreadyExists(name.to_string()));
        }

        let auction = Auction {
            name: name.to_string(),
            seller,
            status: AuctionStatus::Open,
            direct_buy_price,
            bids: Vec::new(),
            winner: None,
            hammer_price: 0,
        };
        self.persist(&auction, None)?;
        tracing::debug!(name, direct_buy_price, "created auction");
        Ok(())
    }

    /// Stops accepting hidden bids. Seller only.
    ///
    /// Closing an auction that is no longer open is deliberately a no-op, so
    /// retried transactions converge on the same state.
    pub fn close_auction(&self, name: &str) -> Result<()> {
        let caller = self.caller()?;
        let mut auction = self.auction(name)?;
        if auction.seller != caller {
            return Err(Error::Unauthorized("close the auction"));
        }
        if auction.status != AuctionStatus::Open {
            return Ok(());
        }

        auction.status = AuctionStatus::Closed;
        self.persist(&auction, None)?;
        tracing::debug!(name, "closed auction");
        Ok(())
    }

    /// Determines the winner and hammer price and ends the auction. Seller
    /// only; requires every bid to be revealed. A no-op once ended.
    pub fn end_auction(&self, name: &str) -> Result<()> {
        let caller = self.caller()?;
        let mut auction = self.auction(name)?;
        if auction.seller != caller {
            return Err(Error::Unauthorized("end the auction"));
        }
        if auction.status == AuctionStatus::Ended {
            return Ok(());
        }
        if !auction.all_bids_revealed() {
            return Err(Error::UnrevealedBids(name.to_string()));
        }

        let settlement = Arbitrator {
            tie_breaker: self.tie_breaker.as_ref(),
        }
        .settle(&auction.bids);
        auction.winner = settlement.winner;
        auction.hammer_price = settlement.hammer_price;
        auction.status = AuctionStatus::Ended;

        let result = AuctionResult {
            winner: auction.winner.clone(),
            direct_buy: false,
            hammer_price: auction.hammer_price,
        };
        self.persist(&auction, Some(result))?;
        tracing::debug!(
            name,
            winner = ?auction.winner,
            hammer_price = auction.hammer_price,
            "ended auction"
        );
        Ok(())
    }

    /// Appends a hidden bid. Only possible while the auction is open.
    pub fn bid(&self, name: &str, hidden_commit: Vec<u8>) -> Result<()> {
        if hidden_commit.len() != COMMITMENT_LEN {
            return Err(Error::MalformedCommitment(hidden_commit.len()));
        }
        let buyer = self.caller()?;
        let mut auction = self.auction(name)?;
        if auction.status != AuctionStatus::Open {
            return Err(Error::BiddingClosed(name.to_string()));
        }

        auction.bids.push(Bid {
            buyer,
            bid_price: 0,
            hidden_commit,
        });
        self.persist(&auction, None)?;
        tracing::debug!(name, bids = auction.bids.len(), "appended hidden bid");
        Ok(())
    }

    /// Reveals every hidden bid of the caller whose commitment matches
    /// `(price, salt)`. A bidder with several hidden bids reveals each one by
    /// supplying its own `(price, salt)` pair.
    ///
    /// A reveal that matches nothing succeeds as a no-op: failing loudly
    /// would tell the caller which precondition rejected the claim. The same
    /// goes for a straggler reveal once the auction has ended; the winner and
    /// hammer price are write-once, so the entity is left untouched. Neither
    /// no-op writes state or publishes a summary.
    pub fn open_bid(&self, name: &str, price: u64, salt: &[u8]) -> Result<()> {
        if price == 0 {
            return Err(Error::ZeroBidPrice);
        }
        if salt.len() < MIN_SALT_LEN {
            return Err(Error::WeakSalt(salt.len()));
        }
        let caller = self.caller()?;
        let mut auction = self.auction(name)?;
        if auction.status == AuctionStatus::Ended {
            tracing::debug!(name, "ignoring reveal for ended auction");
            return Ok(());
        }

        let expected = commitment::commit(&caller, price, salt);
        let mut revealed = 0_usize;
        for bid in &mut auction.bids {
            if bid.buyer == caller && bid.bid_price == 0 && bid.hidden_commit == expected {
                bid.bid_price = price;
                revealed += 1;
            }
        }
        if revealed == 0 {
            tracing::warn!(name, "reveal matched no hidden bid");
            return Ok(());
        }
        tracing::debug!(name, revealed, "revealed bid price");

        self.persist(&auction, None)?;
        Ok(())
    }

    /// Buys the item outright, ending the auction immediately with the caller
    /// as winner and the paid price as hammer price.
    ///
    /// Works at any point before the auction has ended, even while hidden
    /// bids are pending; those bids are simply discarded.
    pub fn direct_buy(&self, name: &str, price: u64) -> Result<()> {
        let buyer = self.caller()?;
        let mut auction = self.auction(name)?;
        if auction.status == AuctionStatus::Ended {
            return Err(Error::AlreadyEnded(name.to_string()));
        }
        if auction.direct_buy_price == 0 {
            return Err(Error::DirectBuyDisabled(name.to_string()));
        }
        if price < auction.direct_buy_price {
            return Err(Error::InsufficientPayment {
                offered: price,
                threshold: auction.direct_buy_price,
            });
        }

        auction.winner = Some(buyer);
        auction.hammer_price = price;
        auction.status = AuctionStatus::Ended;

        let result = AuctionResult {
            winner: auction.winner.clone(),
            direct_buy: true,
            hammer_price: price,
        };
        self.persist(&auction, Some(result))?;
        tracing::debug!(name, price, "auction ended by direct buy");
        Ok(())
    }

    /// Current state of an auction, for inspection by callers and tests.
    pub fn get_auction(&self, name: &str) -> Result<Auction> {
        self.auction(name)
    }
}
