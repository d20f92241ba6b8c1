//! Domain layer: models (entities, value types) and services (orderbook,
//! matching engine, backend, events) that operate on them.

pub mod models;
pub mod services;
