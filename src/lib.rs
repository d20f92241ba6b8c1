pub mod config;
pub mod domain;

pub use domain::models::decimal::Amount;
pub use domain::models::oco::OcoRegistry;
pub use domain::models::types::{Order, OrderError, OrderKind, Role, Side, TimeInForce, Trade};
pub use domain::services::backend::{Backend, BackendError, InMemoryBackend};
pub use domain::services::events::{
    EventBus, EventDispatcher, EventError, EventHandler, EventLogger, EventResult,
    MatchingEngineEvent, PersistenceEventHandler,
};
pub use domain::services::matching_engine::{EngineError, ExecutionReport, MatchingEngine, TradeEntry};
pub use domain::services::orderbook::depth::{DepthSnapshot, PriceLevelView};
pub use domain::services::orderbook::{OrderBook, OrderbookError};

pub use config::Config;
