//! Module defining the auction entity as it lives on the ledger.

use {
    crate::identity::Identity,
    serde::{Deserialize, Serialize},
};

/// Lifecycle status of an auction. Only ever moves forward.
///
/// Persisted as its integer discriminant to keep the ledger representation
/// stable across renames.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum AuctionStatus {
    /// Buyers can submit hidden bids or buy directly.
    #[default]
    Open = 0,
    /// No new bids; buyers reveal their bid prices.
    Closed = 1,
    /// The winner and hammer price are set.
    Ended = 2,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid auction status {0}")]
pub struct InvalidStatus(u8);

impl From<AuctionStatus> for u8 {
    fn from(status: AuctionStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for AuctionStatus {
    type Error = InvalidStatus;

    fn try_from(discriminant: u8) -> Result<Self, Self::Error> {
        match discriminant {
            0 => Ok(Self::Open),
            1 => Ok(Self::Closed),
            2 => Ok(Self::Ended),
            other => Err(InvalidStatus(other)),
        }
    }
}

/// A single bid as stored inside the auction entity.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// The potential buyer that submitted this bid.
    pub buyer: Identity,
    /// `0` while the bid is still hidden; set to the actual price on reveal.
    /// A revealed price of `0` is rejected up front because `0` is reserved
    /// as the "still hidden" sentinel.
    pub bid_price: u64,
    /// 64 byte SHAKE256 commitment binding `(buyer, bid_price, salt)`.
    #[serde(with = "crate::bytes_hex")]
    pub hidden_commit: Vec<u8>,
}

/// One auction per globally unique name.
///
/// The entity is read and replaced wholesale within a single ledger
/// transaction per operation; no partial field update is ever visible outside
/// a transaction boundary.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub name: String,
    /// The seller who opened this auction; immutable.
    pub seller: Identity,
    pub status: AuctionStatus,
    /// A buyer can purchase the item outright by paying at least this price.
    /// `0` disables the direct-buy fast path.
    pub direct_buy_price: u64,
    /// Submission order, which is insertion order.
    pub bids: Vec<Bid>,
    /// Set exactly once, when the status becomes [`AuctionStatus::Ended`].
    pub winner: Option<Identity>,
    /// Final price; `0` until the winner is determined.
    pub hammer_price: u64,
}

impl Auction {
    /// `true` once every submitted bid carries a revealed price.
    pub fn all_bids_revealed(&self) -> bool {
        self.bids.iter().all(|bid| bid.bid_price != 0)
    }

    /// Builds the user-facing summary published after a state change.
    pub fn summary(&self, result: Option<AuctionResult>) -> AuctionSummary {
        AuctionSummary {
            name: self.name.clone(),
            seller: self.seller.clone(),
            status: self.status,
            direct_buy_price: self.direct_buy_price,
            result,
        }
    }
}

/// Auction status information published to users through the event sink.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionSummary {
    pub name: String,
    pub seller: Identity,
    pub status: AuctionStatus,
    pub direct_buy_price: u64,
    /// `None` until the auction has ended.
    pub result: Option<AuctionResult>,
}

/// The outcome of an ended auction.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionResult {
    /// Absent when the auction ended without any bids.
    pub winner: Option<Identity>,
    /// `true` if the winner bought directly, otherwise they were the highest
    /// bidder.
    pub direct_buy: bool,
    pub hammer_price: u64,
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn roundtrips_auction() {
        let auction = Auction {
            name: "painting".to_string(),
            seller: Identity::new([0x11; 4]),
            status: AuctionStatus::Open,
            direct_buy_price: 1000,
            bids: vec![Bid {
                buyer: Identity::new([0x22; 4]),
                bid_price: 0,
                hidden_commit: vec![0x33; 64],
            }],
            winner: None,
            hammer_price: 0,
        };

        assert_eq!(
            serde_json::to_value(&auction).unwrap(),
            json!({
                "name": "painting",
                "seller": "0x11111111",
                "status": 0,
                "directBuyPrice": 1000,
                "bids": [
                    {
                        "buyer": "0x22222222",
                        "bidPrice": 0,
                        "hiddenCommit": format!("0x{}", "33".repeat(64)),
                    },
                ],
                "winner": null,
                "hammerPrice": 0,
            }),
        );
        assert_eq!(
            serde_json::from_value::<Auction>(serde_json::to_value(&auction).unwrap()).unwrap(),
            auction,
        );
    }

    #[test]
    fn roundtrips_summary_with_result() {
        let summary = AuctionSummary {
            name: "painting".to_string(),
            seller: Identity::new([0x11; 4]),
            status: AuctionStatus::Ended,
            direct_buy_price: 0,
            result: Some(AuctionResult {
                winner: Some(Identity::new([0x22; 4])),
                direct_buy: false,
                hammer_price: 20,
            }),
        };

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({
                "name": "painting",
                "seller": "0x11111111",
                "status": 2,
                "directBuyPrice": 0,
                "result": {
                    "winner": "0x22222222",
                    "directBuy": false,
                    "hammerPrice": 20,
                },
            }),
        );
        assert_eq!(
            serde_json::from_value::<AuctionSummary>(serde_json::to_value(&summary).unwrap())
                .unwrap(),
            summary,
        );
    }

    #[test]
    fn rejects_unknown_status() {
        assert!(serde_json::from_value::<AuctionStatus>(json!(3)).is_err());
    }

    #[test]
    fn all_bids_revealed() {
        let bid = |price| Bid {
            buyer: Identity::new([0x22; 4]),
            bid_price: price,
            hidden_commit: vec![0x33; 64],
        };
        let mut auction = Auction::default();
        assert!(auction.all_bids_revealed());
        auction.bids = vec![bid(10), bid(0)];
        assert!(!auction.all_bids_revealed());
        auction.bids = vec![bid(10), bid(20)];
        assert!(auction.all_bids_revealed());
    }
}
