//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Scripted, non-networked demo of the matching engine: seeds a handful of resting
// orders, submits a taker that crosses several of them, and prints the resulting
// execution report plus a depth snapshot. There is no API/transport layer here —
// see SPEC_FULL.md's Non-goal boundary.
//--------------------------------------------------------------------------------------------------

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ultimate_matching::{
    Amount, Backend, Config, EventBus, EventDispatcher, EventLogger, InMemoryBackend,
    MatchingEngine, Order, Side, TimeInForce,
};

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter.clone()))
        .init();

    let event_bus = EventBus::new(config.event_capacity);
    let logger = Arc::new(EventLogger::new(64));
    let dispatcher = EventDispatcher::new(event_bus.clone());
    dispatcher.register_handler(logger.clone()).await;
    let _dispatcher_handle = dispatcher.start().await;

    let mut engine = MatchingEngine::with_event_bus(InMemoryBackend::new(), event_bus.clone());

    let seed = [
        ("s1", Side::Sell, 10, 101),
        ("s2", Side::Sell, 5, 102),
        ("b1", Side::Buy, 8, 99),
    ];
    for (id, side, qty, price) in seed {
        let order = Order::limit(
            id,
            side,
            Amount::from_i64(qty),
            Amount::from_i64(price),
            TimeInForce::GTC,
            "",
            "demo-user",
        )
        .unwrap();
        engine.process(order).unwrap();
        info!(%id, "seeded resting order");
    }

    let taker = Order::limit(
        "taker",
        Side::Buy,
        Amount::from_i64(12),
        Amount::from_i64(102),
        TimeInForce::GTC,
        "",
        "demo-user",
    )
    .unwrap();

    let report = engine.process(taker).unwrap();
    info!(?report, "execution report");
    println!("{report:#?}");

    let depth = engine.backend().depth_snapshot(10);
    println!("{depth:#?}");

    // Give the dispatcher's background task a chance to drain the bus before exit.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}
