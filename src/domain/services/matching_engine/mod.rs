use thiserror::Error;

use crate::domain::models::types::OrderError;
use crate::domain::services::backend::BackendError;

pub mod matching_engine;
pub mod report;

pub use self::matching_engine::MatchingEngine;
pub use self::report::{ExecutionReport, TradeEntry};

/// Errors a `process`/`cancel` call can return (§7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// An order with this id is already resting or known to the backend.
    #[error("order {0} already exists")]
    DuplicateOrder(String),

    /// `cancel` was called with an id the backend has no record of.
    #[error("order {0} not found")]
    NonexistentOrder(String),

    /// A FOK order could not be filled in full and was rejected without any book mutation.
    #[error("insufficient quantity to fill order {0}")]
    InsufficientQuantity(String),

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}
