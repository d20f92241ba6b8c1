//--------------------------------------------------------------------------------------------------
// TEST MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// Universal invariants, round-trip/idempotence properties, and boundary behaviors that
// must hold across any sequence of `process`/`cancel` calls, independent of any single
// worked scenario.
//--------------------------------------------------------------------------------------------------

use ultimate_matching::{Amount, Backend, EngineError, InMemoryBackend, MatchingEngine, Order, Side, TimeInForce};

fn engine() -> MatchingEngine<InMemoryBackend> {
    MatchingEngine::new(InMemoryBackend::new())
}

fn limit(id: &str, side: Side, qty: i64, price: i64, tif: TimeInForce) -> Order {
    Order::limit(id, side, Amount::from_i64(qty), Amount::from_i64(price), tif, "", "").unwrap()
}

// Invariant 1: original_quantity == processed + left, and left is the only quantity
// that can be nonzero once a call returns (canceled_remainder is reported separately).
#[test]
fn processed_plus_left_equals_original_quantity() {
    let mut engine = engine();
    engine.process(limit("s", Side::Sell, 7, 100, TimeInForce::GTC)).unwrap();
    let report = engine.process(limit("b", Side::Buy, 10, 100, TimeInForce::IOC)).unwrap();

    assert_eq!(report.processed.checked_add(report.left).unwrap(), Amount::from_i64(10));
}

// Invariant 2: a price level that is fully drained is removed from the side index
// entirely rather than left behind empty.
#[test]
fn fully_drained_price_level_leaves_no_empty_level_behind() {
    let mut engine = engine();
    engine.process(limit("s", Side::Sell, 5, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("b", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();

    assert!(engine.backend().get_asks().best().is_none());
}

// Invariant 3: an id cannot be reused by a second `process` call while the first
// is still live (resting or in the stop book).
#[test]
fn duplicate_id_is_rejected_while_the_first_order_is_still_live() {
    let mut engine = engine();
    engine.process(limit("dup", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();

    let err = engine.process(limit("dup", Side::Buy, 1, 99, TimeInForce::GTC)).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateOrder(id) if id == "dup"));
}

// Invariant 3, continued: once an id is fully canceled/filled it is free to reuse —
// this is also the stop-activation id-reuse path from the design notes.
#[test]
fn id_becomes_reusable_after_the_order_is_gone() {
    let mut engine = engine();
    engine.process(limit("a", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();
    engine.cancel("a").unwrap();

    engine.process(limit("a", Side::Buy, 1, 99, TimeInForce::GTC)).unwrap();
    assert!(engine.backend().get_order("a").is_some());
}

// Invariant 4: OCO links are symmetric and purged from both directions together.
#[test]
fn oco_link_is_symmetric_and_purge_removes_both_directions() {
    let mut backend = InMemoryBackend::new();
    backend.link_oco("a", "b");
    assert_eq!(backend.check_oco("a"), Some("b".to_string()));
    assert_eq!(backend.check_oco("b"), Some("a".to_string()));

    backend.purge_oco("a");
    assert_eq!(backend.check_oco("a"), None);
    assert_eq!(backend.check_oco("b"), None);
}

// Invariant 6: the taker's own entry leads the report, carrying the aggregate
// processed quantity; makers follow in the order they were matched.
#[test]
fn taker_entry_leads_the_report_with_the_aggregate_quantity() {
    let mut engine = engine();
    engine.process(limit("s1", Side::Sell, 3, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("s2", Side::Sell, 3, 100, TimeInForce::GTC)).unwrap();

    let report = engine.process(limit("b", Side::Buy, 6, 100, TimeInForce::GTC)).unwrap();

    assert_eq!(report.trades[0].order_id, "b");
    assert_eq!(report.trades[0].quantity, Amount::from_i64(6));
    assert_eq!(report.trades[1].order_id, "s1");
    assert_eq!(report.trades[2].order_id, "s2");
}

// Invariant 8: last_trade_price only advances on an actual trade; a resting order
// that matches nothing, or a cancel, must not move it.
#[test]
fn last_trade_price_is_unaffected_by_non_trading_calls() {
    let mut engine = engine();
    engine.process(limit("s", Side::Sell, 5, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("b1", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();
    assert_eq!(engine.backend().last_trade_price(), Amount::from_i64(100));

    // A resting buy below the ask does not cross and must not touch last_trade_price.
    engine.process(limit("b2", Side::Buy, 1, 50, TimeInForce::GTC)).unwrap();
    assert_eq!(engine.backend().last_trade_price(), Amount::from_i64(100));

    engine.cancel("b2").unwrap();
    assert_eq!(engine.backend().last_trade_price(), Amount::from_i64(100));
}

// Round-trip: cancel right after store restores the book to its prior state, modulo
// last_trade_price/OCO state which the spec explicitly exempts.
#[test]
fn cancel_immediately_after_store_restores_prior_book_state() {
    let mut engine = engine();
    engine.process(limit("s1", Side::Sell, 5, 100, TimeInForce::GTC)).unwrap();
    let asks_before = engine.backend().get_asks().best();

    engine.process(limit("s2", Side::Sell, 3, 99, TimeInForce::GTC)).unwrap();
    engine.cancel("s2").unwrap();

    assert_eq!(engine.backend().get_asks().best(), asks_before);
    assert!(engine.backend().get_order("s2").is_none());
}

// Round-trip: a serialized execution report's decimal fields reproduce exact equality
// once deserialized, and print with at least three fractional digits.
#[test]
fn execution_report_round_trips_through_json_with_exact_decimals() {
    let mut engine = engine();
    engine.process(limit("s", Side::Sell, 10, 100, TimeInForce::GTC)).unwrap();
    let report = engine.process(limit("b", Side::Buy, 10, 100, TimeInForce::GTC)).unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let restored: ultimate_matching::ExecutionReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, restored);
    assert_eq!(restored.trades[0].price.to_string(), "100.000");
}

// Boundary: a market order against an empty opposite side is fully unfilled, not stored,
// and triggers no stop sweep.
#[test]
fn market_order_against_empty_book_is_unfilled_and_not_stored() {
    let mut engine = engine();
    let report = engine.process(Order::market("m", Side::Buy, Amount::from_i64(5), false, "").unwrap()).unwrap();

    assert!(report.processed.is_zero());
    assert_eq!(report.left, Amount::from_i64(5));
    assert!(!report.stored);
    assert!(report.activated.is_empty());
    assert_eq!(report.trades.len(), 1);
    assert!(report.trades[0].quantity.is_zero());
    assert!(report.canceled.contains(&"m".to_string()));
    assert!(engine.backend().get_order("m").is_none());
}

// Boundary: a stop-limit order whose trigger is already satisfied at submission time
// converts and matches within the same `process` call, not the next one.
#[test]
fn stop_already_satisfied_at_submission_activates_immediately() {
    let mut engine = engine();
    engine.process(limit("seed_sell", Side::Sell, 5, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("seed_buy", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();
    assert_eq!(engine.backend().last_trade_price(), Amount::from_i64(100));

    engine.process(limit("ask", Side::Sell, 2, 100, TimeInForce::GTC)).unwrap();

    let stop = Order::stop_limit(
        "stp",
        Side::Buy,
        Amount::from_i64(2),
        Amount::from_i64(100),
        Amount::from_i64(100),
        TimeInForce::GTC,
        "",
        "",
    )
    .unwrap();
    let report = engine.process(stop).unwrap();

    assert!(report.activated.contains(&"stp".to_string()));
    assert_eq!(report.processed, Amount::from_i64(2));
    assert!(engine.backend().get_order("ask").is_none());
}

// Invariant 7: once a stop activates and rests as its converted limit, its id is live
// and cannot be reused by a fresh submission until that limit is gone.
#[test]
fn activated_stop_id_stays_live_and_rejects_reuse_while_resting() {
    let mut engine = engine();
    engine.process(limit("seed_sell", Side::Sell, 5, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("seed_buy", Side::Buy, 5, 100, TimeInForce::GTC)).unwrap();
    engine.process(limit("thin_ask", Side::Sell, 1, 100, TimeInForce::GTC)).unwrap();

    let stop = Order::stop_limit(
        "stp",
        Side::Buy,
        Amount::from_i64(2),
        Amount::from_i64(100),
        Amount::from_i64(100),
        TimeInForce::GTC,
        "",
        "",
    )
    .unwrap();
    let report = engine.process(stop).unwrap();
    assert!(report.activated.contains(&"stp".to_string()));
    assert!(report.stored);
    assert!(engine.backend().get_order("stp").is_some());

    let err = engine.process(limit("stp", Side::Buy, 1, 100, TimeInForce::GTC)).unwrap_err();
    assert!(matches!(err, EngineError::DuplicateOrder(id) if id == "stp"));
}
