//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the OrderBook aggregate: the id map, both side indexes, the
// stop book, the OCO registry, and the last traded price, for a single instrument.
// It owns the data structures the matching engine coordinates; it does not itself
// implement matching, stop triggering, or OCO cancellation logic (see matching_engine).
//
// | Component  | Description                                                            |
// |------------|----------------------------------------------------------------------------|
// | OrderBook  | id map + bids/asks SideIndex + StopBook + OcoRegistry + last_trade_price. |
//--------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::models::decimal::Amount;
use crate::domain::models::oco::OcoRegistry;
use crate::domain::models::types::{Order, OrderKind, Side};
use crate::domain::services::orderbook::depth::DepthSnapshot;
use crate::domain::services::orderbook::stop_book::StopBook;
use crate::domain::services::orderbook::side_index::SideIndex;

/// Errors raised by direct OrderBook operations (distinct from MatchingEngine's
/// higher-level EngineError, which wraps these where relevant).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderbookError {
    #[error("order {0} already exists")]
    OrderExists(String),
    #[error("order {0} not found")]
    NonexistentOrder(String),
}

/// A single instrument's order book: resting orders, the stop book, and OCO links.
#[derive(Debug)]
pub struct OrderBook {
    orders: HashMap<String, Order>,
    bids: SideIndex,
    asks: SideIndex,
    stop_book: StopBook,
    oco: OcoRegistry,
    last_trade_price: Amount,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            bids: SideIndex::new(Side::Buy),
            asks: SideIndex::new(Side::Sell),
            stop_book: StopBook::new(),
            oco: OcoRegistry::new(),
            last_trade_price: Amount::ZERO,
        }
    }

    pub fn last_trade_price(&self) -> Amount {
        self.last_trade_price
    }

    pub fn contains(&self, id: &str) -> bool {
        self.orders.contains_key(id)
    }

    pub fn get_order(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn get_order_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.get_mut(id)
    }

    /// Inserts into the id map. Fails with `OrderExists` if the id is already present.
    pub fn store_order(&mut self, order: Order) -> Result<(), OrderbookError> {
        if self.orders.contains_key(&order.id) {
            return Err(OrderbookError::OrderExists(order.id));
        }
        self.orders.insert(order.id.clone(), order);
        Ok(())
    }

    /// Removes from the id map only. Idempotent.
    pub fn delete_order(&mut self, id: &str) -> Option<Order> {
        self.orders.remove(id)
    }

    pub fn side_index(&self, side: Side) -> &SideIndex {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    pub fn side_index_mut(&mut self, side: Side) -> &mut SideIndex {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    pub fn opposite_index(&self, side: Side) -> &SideIndex {
        self.side_index(side.opposite())
    }

    pub fn opposite_index_mut(&mut self, side: Side) -> &mut SideIndex {
        self.side_index_mut(side.opposite())
    }

    pub fn bids(&self) -> &SideIndex {
        &self.bids
    }

    pub fn asks(&self) -> &SideIndex {
        &self.asks
    }

    pub fn stop_book(&self) -> &StopBook {
        &self.stop_book
    }

    pub fn stop_book_mut(&mut self) -> &mut StopBook {
        &mut self.stop_book
    }

    pub fn oco(&self) -> &OcoRegistry {
        &self.oco
    }

    pub fn oco_mut(&mut self) -> &mut OcoRegistry {
        &mut self.oco
    }

    /// Advances the last trade price. Only the matching engine's trade path should
    /// call this — cancel/store events never move it (§8 invariant 8).
    pub fn record_trade_price(&mut self, price: Amount) {
        self.last_trade_price = price;
    }

    pub fn is_stop(order_kind: OrderKind) -> bool {
        matches!(order_kind, OrderKind::StopLimit)
    }

    /// Read-side aggregated depth view (supplemental; see SPEC_FULL.md).
    pub fn depth_snapshot(&self, limit: usize) -> DepthSnapshot {
        DepthSnapshot::capture(&self.bids, &self.asks, limit)
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::TimeInForce;

    fn limit_order(id: &str, side: Side, price: i64) -> Order {
        Order::limit(id, side, Amount::from_i64(1), Amount::from_i64(price), TimeInForce::GTC, "", "").unwrap()
    }

    #[test]
    fn store_order_rejects_duplicate_id() {
        let mut book = OrderBook::new();
        book.store_order(limit_order("a", Side::Buy, 100)).unwrap();
        let err = book.store_order(limit_order("a", Side::Buy, 101)).unwrap_err();
        assert_eq!(err, OrderbookError::OrderExists("a".to_string()));
    }

    #[test]
    fn delete_order_is_idempotent() {
        let mut book = OrderBook::new();
        book.store_order(limit_order("a", Side::Buy, 100)).unwrap();
        assert!(book.delete_order("a").is_some());
        assert!(book.delete_order("a").is_none());
    }

    #[test]
    fn record_trade_price_is_the_only_way_last_trade_price_moves() {
        let mut book = OrderBook::new();
        assert!(book.last_trade_price().is_zero());
        book.store_order(limit_order("a", Side::Buy, 100)).unwrap();
        assert!(book.last_trade_price().is_zero());
        book.record_trade_price(Amount::from_i64(100));
        assert_eq!(book.last_trade_price(), Amount::from_i64(100));
    }
}
