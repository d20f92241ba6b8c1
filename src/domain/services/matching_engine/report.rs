//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the ExecutionReport emitted by every `process` call (§6.2): the
// structured record downstream consumers receive, with decimals serialized as strings
// carrying at least three fractional digits.
//
// | Component        | Description                                                     |
// |-------------------|--------------------------------------------------------------------|
// | TradeEntry        | One leg (taker or maker) of a trade within a report.              |
// | ExecutionReport   | The full report for one `process` call.                          |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::domain::models::decimal::Amount;
use crate::domain::models::types::Role;

/// One leg of a trade as it appears inside an `ExecutionReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEntry {
    pub order_id: String,
    pub role: Role,
    /// Serialized as a string with >= 3 fractional digits, per §6.2.
    pub price: Amount,
    pub quantity: Amount,
    pub is_quote: bool,
    pub user_address: String,
}

/// The structured record emitted to downstream consumers for a single `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: String,
    /// Total quantity processed for the taker.
    pub executed_quantity: Amount,
    /// `original - processed`.
    pub remaining_quantity: Amount,
    /// The taker appears first (aggregate processed quantity); makers follow in
    /// match order.
    pub trades: Vec<TradeEntry>,
    /// Ids of orders canceled as a side effect (OCO siblings, TIF cancellations).
    pub canceled: Vec<String>,
    /// Ids of stop orders converted to limits during this call.
    pub activated: Vec<String>,
    /// Whether the taker now rests on the book.
    pub stored: bool,
    pub quantity: Amount,
    pub processed: Amount,
    pub left: Amount,
}

impl ExecutionReport {
    pub fn builder(order_id: impl Into<String>, original_quantity: Amount) -> ExecutionReportBuilder {
        ExecutionReportBuilder {
            order_id: order_id.into(),
            original_quantity,
            trades: Vec::new(),
            canceled: Vec::new(),
            activated: Vec::new(),
            stored: false,
        }
    }
}

/// Accumulates the pieces of a report as the matching algorithm runs, then finalizes
/// the duplicated `quantity`/`processed`/`left` convenience fields in one place.
pub struct ExecutionReportBuilder {
    order_id: String,
    original_quantity: Amount,
    trades: Vec<TradeEntry>,
    canceled: Vec<String>,
    activated: Vec<String>,
    stored: bool,
}

impl ExecutionReportBuilder {
    pub fn trade(mut self, entry: TradeEntry) -> Self {
        self.trades.push(entry);
        self
    }

    pub fn extend_trades(mut self, entries: impl IntoIterator<Item = TradeEntry>) -> Self {
        self.trades.extend(entries);
        self
    }

    pub fn canceled(mut self, id: impl Into<String>) -> Self {
        self.canceled.push(id.into());
        self
    }

    pub fn activated(mut self, id: impl Into<String>) -> Self {
        self.activated.push(id.into());
        self
    }

    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    pub fn build(self, processed: Amount) -> ExecutionReport {
        let left = self
            .original_quantity
            .checked_sub(processed)
            .expect("processed never exceeds original_quantity");
        ExecutionReport {
            order_id: self.order_id,
            executed_quantity: processed,
            remaining_quantity: left,
            trades: self.trades,
            canceled: self.canceled,
            activated: self.activated,
            stored: self.stored,
            quantity: self.original_quantity,
            processed,
            left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_computes_left_from_processed() {
        let report = ExecutionReport::builder("o1", Amount::from_i64(10))
            .trade(TradeEntry {
                order_id: "o1".to_string(),
                role: Role::Taker,
                price: Amount::from_i64(100),
                quantity: Amount::from_i64(10),
                is_quote: false,
                user_address: String::new(),
            })
            .build(Amount::from_i64(10));
        assert_eq!(report.left, Amount::ZERO);
        assert_eq!(report.processed, Amount::from_i64(10));
        assert_eq!(report.remaining_quantity, Amount::ZERO);
    }

    #[test]
    fn decimal_fields_format_with_three_fractional_digits() {
        let amount = Amount::from_i64(10);
        assert_eq!(amount.to_string(), "10.000");
    }
}
