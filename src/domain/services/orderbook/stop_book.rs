//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the stop-order trigger book: two indexes of resting StopLimit
// orders keyed by trigger price, collected by a range query against the last trade price
// whenever a fresh trade occurs.
//
// | Component  | Description                                                              |
// |------------|-----------------------------------------------------------------------------|
// | StopBook   | buy_stops / sell_stops BTreeMaps plus an id -> (side, price) lookup.     |
//--------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use crate::domain::models::decimal::Amount;
use crate::domain::models::types::{Order, Side};

/// Two side indexes keyed by trigger price, one per side. Unlike the main book's
/// SideIndex (where iteration direction is applied at read time over a single
/// ascending map), triggering here is a bounded range query — `buy_stops` collects
/// `stop_price <= last_trade_price` and `sell_stops` collects `stop_price >=
/// last_trade_price` — so the cost of a sweep is always proportional to the number
/// of orders actually triggered, never to the size of the stop book, regardless of
/// which physical direction the underlying map happens to store prices in.
#[derive(Debug, Default)]
pub struct StopBook {
    buy_stops: BTreeMap<Amount, Vec<Order>>,
    sell_stops: BTreeMap<Amount, Vec<Order>>,
}

impl StopBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.buy_stops.is_empty() && self.sell_stops.is_empty()
    }

    pub fn insert(&mut self, order: Order) {
        let book = match order.side {
            Side::Buy => &mut self.buy_stops,
            Side::Sell => &mut self.sell_stops,
        };
        book.entry(order.stop_price).or_default().push(order);
    }

    /// Removes a stop order by id and side, returning it if present.
    pub fn remove(&mut self, side: Side, stop_price: Amount, id: &str) -> Option<Order> {
        let book = match side {
            Side::Buy => &mut self.buy_stops,
            Side::Sell => &mut self.sell_stops,
        };
        let level = book.get_mut(&stop_price)?;
        let idx = level.iter().position(|o| o.id == id)?;
        let removed = level.remove(idx);
        if level.is_empty() {
            book.remove(&stop_price);
        }
        Some(removed)
    }

    pub fn contains(&self, side: Side, stop_price: Amount, id: &str) -> bool {
        let book = match side {
            Side::Buy => &self.buy_stops,
            Side::Sell => &self.sell_stops,
        };
        book.get(&stop_price)
            .map(|level| level.iter().any(|o| o.id == id))
            .unwrap_or(false)
    }

    /// Collects every stop order whose trigger condition is satisfied by
    /// `last_trade_price`, removing them from the book. Ordering is deterministic:
    /// buy side before sell side, each side ordered by proximity to
    /// `last_trade_price` (closest first), and FIFO within a trigger price.
    pub fn collect_triggered(&mut self, last_trade_price: Amount) -> Vec<Order> {
        let mut triggered = Vec::new();

        let buy_prices: Vec<Amount> = self
            .buy_stops
            .range(..=last_trade_price)
            .map(|(p, _)| *p)
            .collect();
        // Closest-to-price first: highest qualifying buy stop price first.
        for price in buy_prices.into_iter().rev() {
            if let Some(level) = self.buy_stops.remove(&price) {
                triggered.extend(level);
            }
        }

        let sell_prices: Vec<Amount> = self
            .sell_stops
            .range(last_trade_price..)
            .map(|(p, _)| *p)
            .collect();
        // Closest-to-price first: lowest qualifying sell stop price first.
        for price in sell_prices {
            if let Some(level) = self.sell_stops.remove(&price) {
                triggered.extend(level);
            }
        }

        triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::types::TimeInForce;

    fn stop(id: &str, side: Side, stop_price: i64) -> Order {
        Order::stop_limit(
            id,
            side,
            Amount::from_i64(1),
            Amount::from_i64(100),
            Amount::from_i64(stop_price),
            TimeInForce::GTC,
            "",
            "",
        )
        .unwrap()
    }

    #[test]
    fn buy_stops_trigger_when_price_crosses_at_or_above() {
        let mut book = StopBook::new();
        book.insert(stop("b1", Side::Buy, 105));
        book.insert(stop("b2", Side::Buy, 110));
        let triggered = book.collect_triggered(Amount::from_i64(105));
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].id, "b1");
        assert!(book.contains(Side::Buy, Amount::from_i64(110), "b2"));
    }

    #[test]
    fn sell_stops_trigger_when_price_crosses_at_or_below() {
        let mut book = StopBook::new();
        book.insert(stop("s1", Side::Sell, 95));
        book.insert(stop("s2", Side::Sell, 90));
        let triggered = book.collect_triggered(Amount::from_i64(95));
        assert_eq!(triggered.len(), 1);
        assert_eq!(triggered[0].id, "s1");
    }

    #[test]
    fn collected_orders_are_removed_from_the_book() {
        let mut book = StopBook::new();
        book.insert(stop("b1", Side::Buy, 100));
        book.collect_triggered(Amount::from_i64(100));
        assert!(book.is_empty());
    }

    #[test]
    fn collect_triggered_orders_buys_before_sells() {
        let mut book = StopBook::new();
        book.insert(stop("s1", Side::Sell, 100));
        book.insert(stop("b1", Side::Buy, 100));
        let triggered = book.collect_triggered(Amount::from_i64(100));
        assert_eq!(triggered[0].id, "b1");
        assert_eq!(triggered[1].id, "s1");
    }
}
