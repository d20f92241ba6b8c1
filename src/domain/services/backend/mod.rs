//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the storage/index contract the matching engine consumes (§6.1),
// and an in-memory implementation of it. The engine is generic over `Backend`, dispatched
// statically, so a remote-KV-backed flavour can be dropped in without touching matching
// logic — no runtime reflection or trait-object duck-typing is used.
//
// | Component        | Description                                                      |
// |-------------------|-------------------------------------------------------------------|
// | Backend           | Storage/index trait consumed by MatchingEngine.                  |
// | BackendError       | Errors a backend may return.                                      |
// | InMemoryBackend    | A Backend implementation backed by an in-process OrderBook.       |
//--------------------------------------------------------------------------------------------------

use thiserror::Error;

use crate::domain::models::decimal::Amount;
use crate::domain::models::types::{Order, Side};
use crate::domain::services::orderbook::depth::DepthSnapshot;
use crate::domain::services::orderbook::orderbook::{OrderBook, OrderbookError};
use crate::domain::services::orderbook::side_index::SideIndex;
use crate::domain::services::orderbook::stop_book::StopBook;

/// Errors a backend may return. A remote-KV-backed flavour additionally surfaces
/// `Other` for its own transport failures; the engine treats any `Err` here as a
/// backend failure per §7 (fatal-to-the-call, recoverable for the book).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("order already exists: {0}")]
    OrderExists(String),
    #[error("order not found: {0}")]
    NonexistentOrder(String),
    #[error("backend failure: {0}")]
    Other(String),
}

impl From<OrderbookError> for BackendError {
    fn from(err: OrderbookError) -> Self {
        match err {
            OrderbookError::OrderExists(id) => BackendError::OrderExists(id),
            OrderbookError::NonexistentOrder(id) => BackendError::NonexistentOrder(id),
        }
    }
}

/// The storage/index interface consumed by the matcher (§6.1). All operations are
/// synchronous; a remote-KV implementation is expected to block the calling thread
/// rather than yield, preserving the single-writer-per-book model of §5.
pub trait Backend {
    fn get_order(&self, id: &str) -> Option<Order>;
    fn store_order(&mut self, order: Order) -> Result<(), BackendError>;
    fn update_order(&mut self, order: Order) -> Result<(), BackendError>;
    /// Idempotent.
    fn delete_order(&mut self, id: &str);

    /// No-op for market orders (callers should not call this for Market kind).
    fn append_to_side(&mut self, side: Side, order: Order);
    fn remove_from_side(&mut self, side: Side, id: &str) -> bool;

    /// No-op for non-stop orders (callers should not call this for non-StopLimit kind).
    fn append_to_stop_book(&mut self, order: Order);
    fn remove_from_stop_book(&mut self, side: Side, stop_price: Amount, id: &str) -> bool;

    /// Non-destructive lookup of an OCO sibling id, or `None` if `id` has no link.
    fn check_oco(&self, id: &str) -> Option<String>;
    fn link_oco(&mut self, a: &str, b: &str);
    /// Removes both directions of any OCO link involving `id`.
    fn purge_oco(&mut self, id: &str);

    fn get_bids(&self) -> &SideIndex;
    fn get_asks(&self) -> &SideIndex;
    fn get_stop_book(&self) -> &StopBook;

    fn last_trade_price(&self) -> Amount;
    fn record_trade_price(&mut self, price: Amount);

    /// Removes and returns every stop order triggered by `last_trade_price`, in
    /// buy-before-sell, closest-to-trigger-first order (see StopBook::collect_triggered).
    fn take_triggered_stops(&mut self, last_trade_price: Amount) -> Vec<Order>;

    fn depth_snapshot(&self, limit: usize) -> DepthSnapshot;
}

/// An in-process, in-memory conforming backend, wrapping an `OrderBook` directly.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    book: OrderBook,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self { book: OrderBook::new() }
    }
}

impl Backend for InMemoryBackend {
    fn get_order(&self, id: &str) -> Option<Order> {
        self.book.get_order(id).cloned()
    }

    fn store_order(&mut self, order: Order) -> Result<(), BackendError> {
        self.book.store_order(order).map_err(Into::into)
    }

    fn update_order(&mut self, order: Order) -> Result<(), BackendError> {
        if !self.book.contains(&order.id) {
            return Err(BackendError::NonexistentOrder(order.id));
        }
        if let Some(slot) = self.book.get_order_mut(&order.id) {
            *slot = order;
        }
        Ok(())
    }

    fn delete_order(&mut self, id: &str) {
        self.book.delete_order(id);
    }

    fn append_to_side(&mut self, side: Side, order: Order) {
        self.book.side_index_mut(side).append(order);
    }

    fn remove_from_side(&mut self, side: Side, id: &str) -> bool {
        self.book.side_index_mut(side).remove(id).is_some()
    }

    fn append_to_stop_book(&mut self, order: Order) {
        self.book.stop_book_mut().insert(order);
    }

    fn remove_from_stop_book(&mut self, side: Side, stop_price: Amount, id: &str) -> bool {
        self.book.stop_book_mut().remove(side, stop_price, id).is_some()
    }

    fn check_oco(&self, id: &str) -> Option<String> {
        self.book.oco().lookup(id).map(str::to_string)
    }

    fn link_oco(&mut self, a: &str, b: &str) {
        self.book.oco_mut().insert(a, b);
    }

    fn purge_oco(&mut self, id: &str) {
        self.book.oco_mut().purge(id);
    }

    fn get_bids(&self) -> &SideIndex {
        self.book.bids()
    }

    fn get_asks(&self) -> &SideIndex {
        self.book.asks()
    }

    fn get_stop_book(&self) -> &StopBook {
        self.book.stop_book()
    }

    fn last_trade_price(&self) -> Amount {
        self.book.last_trade_price()
    }

    fn record_trade_price(&mut self, price: Amount) {
        self.book.record_trade_price(price);
    }

    fn take_triggered_stops(&mut self, last_trade_price: Amount) -> Vec<Order> {
        self.book.stop_book_mut().collect_triggered(last_trade_price)
    }

    fn depth_snapshot(&self, limit: usize) -> DepthSnapshot {
        self.book.depth_snapshot(limit)
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
    fn store_then_get_round_trips() {
        let mut backend = InMemoryBackend::new();
        backend.store_order(limit_order("a", Side::Buy, 100)).unwrap();
        assert_eq!(backend.get_order("a").unwrap().id, "a");
    }

    #[test]
    fn update_fails_for_absent_order() {
        let mut backend = InMemoryBackend::new();
        let err = backend.update_order(limit_order("a", Side::Buy, 100)).unwrap_err();
        assert_eq!(err, BackendError::NonexistentOrder("a".to_string()));
    }

    #[test]
    fn oco_link_and_purge_round_trip() {
        let mut backend = InMemoryBackend::new();
        backend.link_oco("a", "b");
        assert_eq!(backend.check_oco("a"), Some("b".to_string()));
        backend.purge_oco("a");
        assert_eq!(backend.check_oco("a"), None);
        assert_eq!(backend.check_oco("b"), None);
    }
}
