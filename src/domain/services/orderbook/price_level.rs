//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements a single price level: a FIFO queue of orders resting at one
// price, with O(1) removal by id.
//
// | Component   | Description                                                           |
// |-------------|-------------------------------------------------------------------------|
// | PriceLevel  | FIFO VecDeque of orders plus an id -> position lookup.                |
//--------------------------------------------------------------------------------------------------

use std::collections::{HashMap, VecDeque};

use crate::domain::models::types::Order;

/// A FIFO queue of orders resting at a single price.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    orders: VecDeque<Order>,
    /// Maps order id to its current index in `orders`, kept in sync on every mutation
    /// so removal by id stays O(1) amortized instead of a linear scan.
    positions: HashMap<String, usize>,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    /// Appends `order` at the tail. If an order with the same id is already present
    /// at this level it is replaced in place (the indexing contract in §4.3 is
    /// idempotent; matching correctness still depends on the caller not double-submitting).
    pub fn append(&mut self, order: Order) {
        if let Some(&idx) = self.positions.get(&order.id) {
            self.orders[idx] = order;
            return;
        }
        self.positions.insert(order.id.clone(), self.orders.len());
        self.orders.push_back(order);
    }

    /// Removes the order with the given id, returning it if present. Rebuilds the
    /// position index for the shifted tail — price levels are shallow in practice
    /// (few resting orders per price), so this stays cheap relative to a BTreeMap
    /// of queues at the SideIndex layer.
    pub fn remove(&mut self, id: &str) -> Option<Order> {
        let idx = self.positions.remove(id)?;
        let removed = self.orders.remove(idx)?;
        for (_, pos) in self.positions.iter_mut() {
            if *pos > idx {
                *pos -= 1;
            }
        }
        Some(removed)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Order> {
        let idx = *self.positions.get(id)?;
        self.orders.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
