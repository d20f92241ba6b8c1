//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements a supplemental, read-only aggregated view of top-of-book
// volume per price level. It is derived state only: nothing here participates in a
// matching decision, and no invariant in this crate depends on it.
//
// | Component      | Description                                                 |
// |----------------|---------------------------------------------------------------|
// | PriceLevelView | Aggregated volume/order-count at one price.                 |
// | DepthSnapshot  | Immutable point-in-time view of book depth.                 |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::domain::models::decimal::Amount;
use crate::domain::services::orderbook::side_index::SideIndex;

/// An aggregated price level in a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevelView {
    pub price: Amount,
    pub volume: Amount,
    pub order_count: usize,
}

/// An immutable snapshot of order book depth, best price first on each side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub bids: Vec<PriceLevelView>,
    pub asks: Vec<PriceLevelView>,
}

impl DepthSnapshot {
    /// Builds a snapshot directly from the live side indexes, truncated to `limit`
    /// levels per side. This walks both indexes on demand rather than maintaining a
    /// separately-updated cache, since the book's id-uniqueness invariant makes a
    /// live snapshot cheap enough at the scale this core targets.
    pub fn capture(bids: &SideIndex, asks: &SideIndex, limit: usize) -> Self {
        let build = |side: &SideIndex| -> Vec<PriceLevelView> {
            side.iterate_best_first()
                .take(limit)
                .map(|(price, level)| PriceLevelView {
                    price,
                    volume: level
                        .iter()
                        .fold(Amount::ZERO, |acc, o| acc.checked_add(o.quantity).unwrap_or(acc)),
                    order_count: level.len(),
                })
                .collect()
        };
        DepthSnapshot {
            bids: build(bids),
            asks: build(asks),
        }
    }

    pub fn best_bid(&self) -> Option<Amount> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Amount> {
        self.asks.first().map(|l| l.price)
    }

    pub fn spread(&self) -> Option<Amount> {
        match (self.best_ask(), self.best_bid()) {
            (Some(ask), Some(bid)) => ask.checked_sub(bid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::{Order, Side, TimeInForce};

    #[test]
    fn capture_aggregates_volume_per_level() {
        let mut bids = SideIndex::new(Side::Buy);
        bids.append(
            Order::limit("a", Side::Buy, Amount::from_i64(3), Amount::from_i64(100), TimeInForce::GTC, "", "")
                .unwrap(),
        );
        bids.append(
            Order::limit("b", Side::Buy, Amount::from_i64(2), Amount::from_i64(100), TimeInForce::GTC, "", "")
                .unwrap(),
        );
        let asks = SideIndex::new(Side::Sell);
        let snapshot = DepthSnapshot::capture(&bids, &asks, 10);
        assert_eq!(snapshot.bids.len(), 1);
        assert_eq!(snapshot.bids[0].volume, Amount::from_i64(5));
        assert_eq!(snapshot.bids[0].order_count, 2);
        assert_eq!(snapshot.best_bid(), Some(Amount::from_i64(100)));
        assert_eq!(snapshot.spread(), None);
    }
}
