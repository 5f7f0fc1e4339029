//! Winner determination.
//!
//! Implements second-price ("Vickrey") settlement: the highest bidder wins
//! but pays the price of the best losing bidder, which keeps truthful bidding
//! the dominant strategy. Ties at the top are resolved by a uniform draw
//! through the injected tie breaker.

use {
    crate::randomness::TieBreaker,
    model::{Bid, Identity},
    std::collections::BTreeMap,
};

/// Outcome of settling a fully revealed bid list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Settlement {
    /// The winning bidder; absent when nobody bid.
    pub winner: Option<Identity>,
    /// The price the winner pays; `0` when nobody bid.
    pub hammer_price: u64,
}

/// Settles revealed bids into a winner and hammer price.
pub struct Arbitrator<'a> {
    pub tie_breaker: &'a dyn TieBreaker,
}

impl Arbitrator<'_> {
    /// Runs winner determination over a bid list in which every bid has been
    /// revealed (callers check this beforehand).
    ///
    /// Each bidder competes only with their highest revealed price; lower,
    /// abandoned bids of the same bidder do not count towards the second
    /// price.
    pub fn settle(&self, bids: &[Bid]) -> Settlement {
        // BTreeMap so that the ranking below has one deterministic order on
        // every replica; a hash map would make the tied prefix, and with it
        // the drawn winner, depend on process-local iteration order.
        let mut best_by_bidder = BTreeMap::<&Identity, u64>::new();
        for bid in bids {
            let best = best_by_bidder.entry(&bid.buyer).or_default();
            *best = (*best).max(bid.bid_price);
        }

        let mut ranking: Vec<(u64, &Identity)> = best_by_bidder
            .into_iter()
            .map(|(bidder, price)| (price, bidder))
            .collect();
        // Stable sort: bidders tied on price stay in identity order.
        ranking.sort_by_key(|&(price, _)| std::cmp::Reverse(price));

        let Some(&(highest, _)) = ranking.first() else {
            return Settlement::default();
        };

        // The ranking is sorted, so the bidders tied at the top are exactly
        // the contiguous prefix with `price == highest`.
        let tied = ranking
            .iter()
            .take_while(|&&(price, _)| price == highest)
            .count();

        // Second price: the entry right below the tied group, or the highest
        // price itself in the degenerate case without lower bidders.
        let hammer_price = ranking
            .get(tied)
            .map(|&(price, _)| price)
            .unwrap_or(highest);

        let pick = match tied {
            1 => 0,
            _ => {
                let pick = self.tie_breaker.random_uniform(tied as u64) as usize;
                tracing::debug!(tied, pick, "drew winner from tied top bidders");
                pick
            }
        };
        let (_, winner) = ranking[pick];

        Settlement {
            winner: Some(winner.clone()),
            hammer_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::randomness::{MockTieBreaker, SeededTieBreaker},
        maplit::hashmap,
        mockall::predicate::eq,
    };

    fn bid(buyer: u8, price: u64) -> Bid {
        Bid {
            buyer: Identity::new([buyer; 4]),
            bid_price: price,
            hidden_commit: vec![0; 64],
        }
    }

    fn no_draw_expected() -> MockTieBreaker {
        let mut tie_breaker = MockTieBreaker::new();
        tie_breaker.expect_random_uniform().never();
        tie_breaker
    }

    #[test]
    fn pays_second_highest_price() {
        let tie_breaker = no_draw_expected();
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[bid(1, 10), bid(2, 40), bid(3, 20)]);
        assert_eq!(
            settlement,
            Settlement {
                winner: Some(Identity::new([2; 4])),
                hammer_price: 20,
            }
        );
    }

    #[test]
    fn no_bids_no_winner() {
        let tie_breaker = no_draw_expected();
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[]);
        assert_eq!(settlement, Settlement::default());
    }

    #[test]
    fn single_bidder_pays_own_price() {
        let tie_breaker = no_draw_expected();
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[bid(1, 40)]);
        assert_eq!(
            settlement,
            Settlement {
                winner: Some(Identity::new([1; 4])),
                hammer_price: 40,
            }
        );
    }

    #[test]
    fn abandoned_lower_bids_do_not_count() {
        // Bidder 2 bid twice; only their 40 competes, so the second price is
        // bidder 1's 15 rather than bidder 2's abandoned 30.
        let tie_breaker = no_draw_expected();
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[bid(2, 30), bid(1, 15), bid(2, 40)]);
        assert_eq!(
            settlement,
            Settlement {
                winner: Some(Identity::new([2; 4])),
                hammer_price: 15,
            }
        );
    }

    #[test]
    fn tie_is_drawn_uniformly_below_tied_price() {
        let mut tie_breaker = MockTieBreaker::new();
        tie_breaker
            .expect_random_uniform()
            .with(eq(2))
            .times(1)
            .return_const(1u64);
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[bid(1, 40), bid(2, 40), bid(3, 20)]);
        // Tied bidders are ranked in identity order, so index 1 is bidder 2.
        assert_eq!(
            settlement,
            Settlement {
                winner: Some(Identity::new([2; 4])),
                hammer_price: 20,
            }
        );
    }

    #[test]
    fn tie_without_lower_bidders_pays_tied_price() {
        let mut tie_breaker = MockTieBreaker::new();
        tie_breaker
            .expect_random_uniform()
            .with(eq(3))
            .times(1)
            .return_const(0u64);
        let settlement = Arbitrator {
            tie_breaker: &tie_breaker,
        }
        .settle(&[bid(3, 40), bid(1, 40), bid(2, 40)]);
        assert_eq!(
            settlement,
            Settlement {
                winner: Some(Identity::new([1; 4])),
                hammer_price: 40,
            }
        );
    }

    #[test]
    fn equal_seeds_settle_identically() {
        let bids = [bid(1, 40), bid(2, 40), bid(3, 20)];
        let first = Arbitrator {
            tie_breaker: &SeededTieBreaker::new([9; 32]),
        }
        .settle(&bids);
        let second = Arbitrator {
            tie_breaker: &SeededTieBreaker::new([9; 32]),
        }
        .settle(&bids);
        assert_eq!(first, second);
    }

    #[test]
    fn tied_bidders_win_roughly_equally_often() {
        let bids = [bid(1, 40), bid(2, 40), bid(3, 20)];
        let mut wins = hashmap! {
            Identity::new([1; 4]) => 0,
            Identity::new([2; 4]) => 0,
        };
        for seed in 0..100 {
            let settlement = Arbitrator {
                tie_breaker: &SeededTieBreaker::new([seed; 32]),
            }
            .settle(&bids);
            assert_eq!(settlement.hammer_price, 20);
            *wins.get_mut(&settlement.winner.unwrap()).unwrap() += 1;
        }
        for count in wins.values() {
            assert!((20..=80).contains(count), "skewed tie break: {wins:?}");
        }
    }
}
