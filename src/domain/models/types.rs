//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module defines the core data types used throughout the matching engine: the Order
// entity, its side/kind/time-in-force enums, and the Trade record produced by a match.
//
// | Section            | Description                                                      |
// |--------------------|------------------------------------------------------------------|
// | ENUMS              | Discrete sets of values (Side, OrderKind, TimeInForce, Role).    |
// | STRUCTS            | Order and Trade.                                                  |
// | OrderError         | Validation errors raised by Order constructors.                  |
// | TESTS              | Unit tests for constructors and mutators.                         |
//--------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decimal::Amount;

/// Represents the side of an order (Buy or Sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

/// Represents the type of an order, influencing its matching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Executes immediately at the best available price(s); never rests.
    Market,
    /// Executes at a specific price or better; may rest depending on TIF.
    Limit,
    /// Rests in the stop book until the last trade price crosses `stop_price`,
    /// then converts into a Limit order with the same id.
    StopLimit,
}

/// Defines how long an order remains active in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good Till Cancel — rests until explicitly cancelled or fully filled.
    GTC,
    /// Immediate Or Cancel — fills what it can, cancels the remainder.
    IOC,
    /// Fill Or Kill — fills fully or not at all.
    FOK,
}

impl Default for TimeInForce {
    fn default() -> Self {
        Self::GTC
    }
}

/// Role an order played in a specific trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Maker,
    Taker,
}

/// Errors raised by Order construction, before any book state is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("invalid price: {0}")]
    InvalidPrice(String),
    #[error("invalid time in force: {0}")]
    InvalidTif(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// A trading order.
///
/// `id` is an opaque, caller-supplied string rather than an engine-minted identifier —
/// the façade (out of scope here) owns id allocation and uniqueness across instruments;
/// this crate only guarantees uniqueness within a single book's id map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub kind: OrderKind,
    pub side: Side,
    /// Market order whose quantity is denominated in quote currency. Informational only;
    /// it never changes matching behavior.
    pub is_quote: bool,
    /// Remaining quantity, mutated as the order is matched.
    pub quantity: Amount,
    /// Quantity at creation time; never mutated.
    pub original_quantity: Amount,
    /// Limit price. Zero for Market orders.
    pub price: Amount,
    /// Trigger price. Zero for non-StopLimit orders.
    pub stop_price: Amount,
    pub tif: TimeInForce,
    /// Id of a sibling order to cancel when this one fills. Empty string if none.
    pub oco_id: String,
    pub role: Role,
    pub canceled: bool,
    /// Opaque passthrough string for downstream attribution.
    pub user_address: String,
}

impl Order {
    fn validate_quantity(quantity: Amount) -> Result<(), OrderError> {
        if quantity.is_zero() || quantity.raw() < 0 {
            return Err(OrderError::InvalidQuantity(format!(
                "quantity must be strictly positive, got {quantity}"
            )));
        }
        Ok(())
    }

    fn validate_tif(tif: TimeInForce) -> Result<(), OrderError> {
        // All three variants are valid for limit orders; this exists so a future TIF
        // addition has a single enforcement point, matching §3's construction invariant.
        match tif {
            TimeInForce::GTC | TimeInForce::IOC | TimeInForce::FOK => Ok(()),
        }
    }

    /// Constructs a Market order. Market is implicitly IOC and carries no limit price.
    pub fn market(
        id: impl Into<String>,
        side: Side,
        quantity: Amount,
        is_quote: bool,
        user_address: impl Into<String>,
    ) -> Result<Self, OrderError> {
        Self::validate_quantity(quantity)?;
        Ok(Order {
            id: id.into(),
            kind: OrderKind::Market,
            side,
            is_quote,
            quantity,
            original_quantity: quantity,
            price: Amount::ZERO,
            stop_price: Amount::ZERO,
            tif: TimeInForce::IOC,
            oco_id: String::new(),
            role: Role::Taker,
            canceled: false,
            user_address: user_address.into(),
        })
    }

    /// Constructs a Limit order.
    pub fn limit(
        id: impl Into<String>,
        side: Side,
        quantity: Amount,
        price: Amount,
        tif: TimeInForce,
        oco_id: impl Into<String>,
        user_address: impl Into<String>,
    ) -> Result<Self, OrderError> {
        Self::validate_quantity(quantity)?;
        Self::validate_tif(tif)?;
        if price.is_zero() || price.raw() < 0 {
            return Err(OrderError::InvalidPrice(format!(
                "limit price must be strictly positive, got {price}"
            )));
        }
        Ok(Order {
            id: id.into(),
            kind: OrderKind::Limit,
            side,
            is_quote: false,
            quantity,
            original_quantity: quantity,
            price,
            stop_price: Amount::ZERO,
            tif,
            oco_id: oco_id.into(),
            role: Role::Taker,
            canceled: false,
            user_address: user_address.into(),
        })
    }

    /// Constructs a StopLimit order.
    pub fn stop_limit(
        id: impl Into<String>,
        side: Side,
        quantity: Amount,
        price: Amount,
        stop_price: Amount,
        tif: TimeInForce,
        oco_id: impl Into<String>,
        user_address: impl Into<String>,
    ) -> Result<Self, OrderError> {
        Self::validate_quantity(quantity)?;
        Self::validate_tif(tif)?;
        if price.is_zero() || price.raw() < 0 {
            return Err(OrderError::InvalidPrice(format!(
                "limit price must be strictly positive, got {price}"
            )));
        }
        if stop_price.is_zero() || stop_price.raw() < 0 {
            return Err(OrderError::InvalidPrice(format!(
                "stop price must be strictly positive, got {stop_price}"
            )));
        }
        Ok(Order {
            id: id.into(),
            kind: OrderKind::StopLimit,
            side,
            is_quote: false,
            quantity,
            original_quantity: quantity,
            price,
            stop_price,
            tif,
            oco_id: oco_id.into(),
            role: Role::Taker,
            canceled: false,
            user_address: user_address.into(),
        })
    }

    /// Transforms a resting StopLimit order into a Limit order in place: zeroes
    /// `stop_price` and changes `kind`. Precondition: `self.kind == OrderKind::StopLimit`.
    pub fn activate_stop(&mut self) {
        debug_assert_eq!(self.kind, OrderKind::StopLimit, "activate_stop on a non-stop order");
        self.kind = OrderKind::Limit;
        self.stop_price = Amount::ZERO;
    }

    /// Subtracts `qty` from the remaining quantity. Callers must cap `qty` at
    /// `self.quantity`; underflow is a caller bug, not a recoverable error.
    pub fn decrease_quantity(&mut self, qty: Amount) {
        self.quantity = self
            .quantity
            .checked_sub(qty)
            .expect("decrease_quantity: caller must cap qty at remaining quantity");
    }

    pub fn cancel(&mut self) {
        self.canceled = true;
    }

    pub fn is_filled(&self) -> bool {
        self.quantity.is_zero()
    }

    pub fn processed(&self) -> Amount {
        self.original_quantity
            .checked_sub(self.quantity)
            .expect("quantity never exceeds original_quantity")
    }
}

/// A completed trade resulting from matching two orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub maker_order_id: String,
    pub taker_order_id: String,
    pub price: Amount,
    pub quantity: Amount,
}
