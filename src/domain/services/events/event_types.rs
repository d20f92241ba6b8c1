//--------------------------------------------------------------------------------------------------
// STRUCTS & ENUMS
//--------------------------------------------------------------------------------------------------
// | Name                    | Description                                       | Key Methods       |
// |-------------------------|---------------------------------------------------|------------------|
// | MatchingEngineEvent     | Event variants for the matching engine           | clone, send, sync |
// | EventError              | Error types for event processing                 | error, from       |
//--------------------------------------------------------------------------------------------------

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::types::{Order, Trade};
use crate::domain::services::matching_engine::report::ExecutionReport;
use crate::domain::services::orderbook::depth::DepthSnapshot;

/// Errors that can occur in the event system
#[derive(Error, Debug, Clone)]
pub enum EventError {
    /// Failed to publish an event (e.g., no subscribers or channel full)
    #[error("Failed to publish event: {0}")]
    PublishError(String),

    /// Failed to process an event
    #[error("Failed to process event: {0}")]
    ProcessingError(String),

    /// Event handler not found for event type
    #[error("No handler registered for event type: {0}")]
    HandlerNotFound(String),
}

/// Type alias for Result with EventError
pub type EventResult<T> = Result<T, EventError>;

/// Represents events that can occur in the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchingEngineEvent {
    /// Generated when an order starts resting on the book (GTC rest, or a
    /// StopLimit order entering the stop book).
    OrderAdded {
        order: Order,
        timestamp: chrono::DateTime<Utc>,
    },

    /// Generated when an order is canceled, whether user-initiated, an OCO
    /// cascade, or an IOC/FOK rejection.
    OrderCancelled {
        order: Order,
        timestamp: chrono::DateTime<Utc>,
    },

    /// Generated once per leg of a match.
    TradeExecuted {
        trade: Trade,
        timestamp: chrono::DateTime<Utc>,
    },

    /// Generated for the full structured report of a single `process` call
    /// (§6.2), including every trade leg, cancellation, and activation it
    /// produced. This is the primary event downstream consumers subscribe to.
    ExecutionReportEvent {
        report: ExecutionReport,
        timestamp: chrono::DateTime<Utc>,
    },

    /// Generated when the depth snapshot changes.
    DepthUpdated {
        depth: DepthSnapshot,
        timestamp: chrono::DateTime<Utc>,
    },
}
