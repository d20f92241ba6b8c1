//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements one side (bids or asks) of an order book: an ordered map from
// price to PriceLevel, with side-dependent best-price iteration.
//
// | Component  | Description                                                             |
// |------------|---------------------------------------------------------------------------|
// | SideIndex  | BTreeMap<Amount, PriceLevel> plus an id -> price lookup for O(1) removal. |
//--------------------------------------------------------------------------------------------------

use std::collections::{BTreeMap, HashMap};

use crate::domain::models::decimal::Amount;
use crate::domain::models::types::{Order, Side};

/// One side of the book: an ordered collection of price levels.
///
/// Bids iterate best-first as descending price; asks iterate best-first as ascending
/// price. Both are backed by the same ascending `BTreeMap`; the direction is applied
/// only at iteration time.
#[derive(Debug, Default)]
pub struct SideIndex {
    side: Option<Side>,
    levels: BTreeMap<Amount, crate::domain::services::orderbook::price_level::PriceLevel>,
    locations: HashMap<String, Amount>,
}

use crate::domain::services::orderbook::price_level::PriceLevel;

impl SideIndex {
    pub fn new(side: Side) -> Self {
        Self {
            side: Some(side),
            levels: BTreeMap::new(),
            locations: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Inserts `order` at `order.price`, creating the level if absent.
    pub fn append(&mut self, order: Order) {
        self.locations.insert(order.id.clone(), order.price);
        self.levels.entry(order.price).or_insert_with(PriceLevel::new).append(order);
    }

    /// Removes the order with the given id. Returns the removed order, or `None` if
    /// not present. Deletes the price level entirely if it becomes empty.
    pub fn remove(&mut self, id: &str) -> Option<Order> {
        let price = self.locations.remove(id)?;
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Order> {
        let price = *self.locations.get(id)?;
        self.levels.get_mut(&price)?.get_mut(id)
    }

    /// Returns the extremal price: max for bids, min for asks.
    pub fn best(&self) -> Option<Amount> {
        match self.side {
            Some(Side::Buy) => self.levels.keys().next_back().copied(),
            Some(Side::Sell) | None => self.levels.keys().next().copied(),
        }
    }

    /// Returns the first order at the best price, without removing it.
    pub fn best_front(&self) -> Option<(Amount, &Order)> {
        let (price, level) = self.iterate_best_first().next()?;
        level.front().map(|order| (price, order))
    }

    /// Yields `(price, &PriceLevel)` pairs in matching order: best price first.
    pub fn iterate_best_first(&self) -> Box<dyn Iterator<Item = (Amount, &PriceLevel)> + '_> {
        match self.side {
            Some(Side::Buy) => Box::new(self.levels.iter().rev().map(|(p, l)| (*p, l))),
            Some(Side::Sell) | None => Box::new(self.levels.iter().map(|(p, l)| (*p, l))),
        }
    }

    pub fn prices(&self) -> Vec<Amount> {
        self.iterate_best_first().map(|(p, _)| p).collect()
    }

    pub fn orders_at(&self, price: Amount) -> Vec<&Order> {
        self.levels
            .get(&price)
            .map(|level| level.iter().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(id: &str, price: i64) -> Order {
        Order::limit(
            id,
            Side::Buy,
            Amount::from_i64(1),
            Amount::from_i64(price),
            crate::domain::models::types::TimeInForce::GTC,
            "",
            "",
        )
        .unwrap()
    }

    #[test]
    fn bids_best_is_max_price() {
        let mut bids = SideIndex::new(Side::Buy);
        bids.append(order("a", 100));
        bids.append(order("b", 105));
        bids.append(order("c", 95));
        assert_eq!(bids.best(), Some(Amount::from_i64(105)));
    }

    #[test]
    fn asks_best_is_min_price() {
        let mut asks = SideIndex::new(Side::Sell);
        asks.append(order("a", 100));
        asks.append(order("b", 95));
        assert_eq!(asks.best(), Some(Amount::from_i64(95)));
    }

    #[test]
    fn iterate_best_first_visits_bids_descending() {
        let mut bids = SideIndex::new(Side::Buy);
        bids.append(order("a", 100));
        bids.append(order("b", 105));
        let prices: Vec<_> = bids.iterate_best_first().map(|(p, _)| p).collect();
        assert_eq!(prices, vec![Amount::from_i64(105), Amount::from_i64(100)]);
    }

    #[test]
    fn remove_deletes_emptied_level() {
        let mut bids = SideIndex::new(Side::Buy);
        bids.append(order("a", 100));
        assert!(bids.remove("a").is_some());
        assert!(bids.is_empty());
        assert!(bids.remove("a").is_none());
    }
}
