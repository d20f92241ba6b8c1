//--------------------------------------------------------------------------------------------------
// MODULE OVERVIEW
//--------------------------------------------------------------------------------------------------
// This module implements the core matching algorithm: price-time-priority crossing of a
// taker order against the resting book, stop-order triggering on every fresh trade price,
// and OCO cancellation cascades. It is generic over `Backend` so the storage/index layer
// can be swapped without touching matching logic.
//
// | Component       | Description                                                          |
// |------------------|-----------------------------------------------------------------------|
// | MatchingEngine   | Holds a `Backend` and exposes `process`/`cancel`.                    |
//--------------------------------------------------------------------------------------------------

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::models::decimal::Amount;
use crate::domain::models::types::{Order, OrderKind, Role, Side, TimeInForce};
use crate::domain::services::backend::Backend;
use crate::domain::services::events::{EventBus, MatchingEngineEvent};
use crate::domain::services::matching_engine::report::{ExecutionReport, TradeEntry};
use crate::domain::services::matching_engine::EngineError;

/// The core matcher. Holds no state of its own beyond the backend it was built with —
/// every order book fact lives in `B`. An attached `EventBus`, if any, receives the
/// exact `ExecutionReport` each `process` call returns (§6.2/SUPPLEMENTAL FEATURES).
#[derive(Debug)]
pub struct MatchingEngine<B: Backend> {
    backend: B,
    events: Option<EventBus>,
}

impl<B: Backend> MatchingEngine<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, events: None }
    }

    /// Builds an engine that publishes every `process` report to `events`.
    pub fn with_event_bus(backend: B, events: EventBus) -> Self {
        Self { backend, events: Some(events) }
    }

    /// Attaches (or replaces) the event bus reports are published to.
    pub fn set_event_bus(&mut self, events: EventBus) {
        self.events = Some(events);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Accepts a new order, matching it against the resting book and returning the
    /// resulting report (§4, §6.2). Fails only if `order.id` already exists.
    pub fn process(&mut self, order: Order) -> Result<ExecutionReport, EngineError> {
        if self.backend.get_order(&order.id).is_some() {
            return Err(EngineError::DuplicateOrder(order.id));
        }
        let report = match order.kind {
            OrderKind::Market => self.process_market(order),
            OrderKind::Limit => self.process_limit(order),
            OrderKind::StopLimit => self.process_stop(order),
        }?;

        if let Some(bus) = &self.events {
            let _ = bus.publish(MatchingEngineEvent::ExecutionReportEvent {
                report: report.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(report)
    }

    /// Cancels a resting order by id (§4.6). Returns the canceled order, or `None` if
    /// no such order is known to the backend. Only purges this order's own OCO link;
    /// it never cascades to a sibling (a user-initiated cancel is not a fill).
    pub fn cancel(&mut self, order_id: &str) -> Option<Order> {
        let mut order = self.backend.get_order(order_id)?;
        order.cancel();

        if order.kind == OrderKind::StopLimit {
            self.backend.remove_from_stop_book(order.side, order.stop_price, order_id);
        } else {
            self.backend.remove_from_side(order.side, order_id);
        }
        self.backend.delete_order(order_id);
        self.backend.purge_oco(order_id);

        info!(order_id, "order canceled");
        Some(order)
    }

    /// Side-effect-free estimate of the average execution price for a market order of
    /// `quantity` on `side`, walking the opposite side's resting levels. Used only to
    /// answer "what would this market order cost" without touching the book (§4.4).
    pub fn calculate_market_price(&self, side: Side, quantity: Amount) -> Result<Amount, EngineError> {
        let opposite = side.opposite();
        let index = match opposite {
            Side::Buy => self.backend.get_bids(),
            Side::Sell => self.backend.get_asks(),
        };

        let mut remaining = quantity;
        let mut cost = Amount::ZERO;
        for (price, level) in index.iterate_best_first() {
            for resting in level.iter() {
                if remaining.is_zero() {
                    break;
                }
                let take = remaining.min(resting.quantity);
                let leg_cost = price
                    .checked_mul_scaled(take)
                    .ok_or_else(|| EngineError::InsufficientQuantity("overflow while pricing".into()))?;
                cost = cost
                    .checked_add(leg_cost)
                    .ok_or_else(|| EngineError::InsufficientQuantity("overflow while pricing".into()))?;
                remaining = remaining
                    .checked_sub(take)
                    .expect("take is capped at remaining");
            }
            if remaining.is_zero() {
                break;
            }
        }

        if !remaining.is_zero() {
            return Err(EngineError::InsufficientQuantity(
                "not enough resting quantity to fill this market order".into(),
            ));
        }
        Ok(cost)
    }

    fn process_market(&mut self, mut order: Order) -> Result<ExecutionReport, EngineError> {
        order.role = Role::Taker;
        let original_quantity = order.original_quantity;
        self.backend.store_order(order.clone())?;

        let opposite_empty = match order.side.opposite() {
            Side::Buy => self.backend.get_bids().is_empty(),
            Side::Sell => self.backend.get_asks().is_empty(),
        };

        let (maker_entries, oco_canceled) = if opposite_empty {
            (Vec::new(), Vec::new())
        } else {
            self.match_against_opposite(&mut order, |_| true)
        };

        // Market orders never rest; any unfilled remainder is simply dropped (§4.4).
        self.backend.delete_order(&order.id);

        let processed = order.processed();
        let mut builder = ExecutionReport::builder(order.id.clone(), original_quantity).trade(TradeEntry {
            order_id: order.id.clone(),
            role: Role::Taker,
            price: order.price,
            quantity: processed,
            is_quote: order.is_quote,
            user_address: order.user_address.clone(),
        });
        builder = builder.extend_trades(maker_entries);
        for id in &oco_canceled {
            builder = builder.canceled(id.clone());
        }
        if processed < original_quantity {
            builder = builder.canceled(order.id.clone());
        }

        if order.is_filled() && !order.oco_id.is_empty() {
            let sibling_id = order.oco_id.clone();
            if self.cancel_sibling(&sibling_id).is_some() {
                builder = builder.canceled(sibling_id);
            }
        }
        // Market orders carry no `oco_id` in practice (see `Order::market`), but the
        // check is kept for symmetry with `process_limit`'s own-fill cascade.

        let mut activated = Vec::new();
        if !processed.is_zero() {
            activated = self.sweep_stops();
        }
        for id in activated {
            builder = builder.activated(id);
        }

        Ok(builder.build(processed))
    }

    fn process_limit(&mut self, mut order: Order) -> Result<ExecutionReport, EngineError> {
        order.role = Role::Taker;
        let original_quantity = order.original_quantity;
        let limit_price = order.price;
        let side = order.side;
        let predicate = move |price: Amount| match side {
            Side::Buy => price <= limit_price,
            Side::Sell => price >= limit_price,
        };

        self.backend.store_order(order.clone())?;

        if order.tif == TimeInForce::FOK {
            let available = self.available_quantity(side, &predicate);
            if available < order.quantity {
                self.backend.delete_order(&order.id);
                let report = ExecutionReport::builder(order.id.clone(), original_quantity)
                    .trade(TradeEntry {
                        order_id: order.id.clone(),
                        role: Role::Taker,
                        price: order.price,
                        quantity: Amount::ZERO,
                        is_quote: order.is_quote,
                        user_address: order.user_address.clone(),
                    })
                    .canceled(order.id.clone())
                    .build(Amount::ZERO);
                return Ok(report);
            }
        }

        let (maker_entries, oco_canceled) = self.match_against_opposite(&mut order, predicate);

        let processed = order.processed();
        let mut builder = ExecutionReport::builder(order.id.clone(), original_quantity).trade(TradeEntry {
            order_id: order.id.clone(),
            role: Role::Taker,
            price: order.price,
            quantity: processed,
            is_quote: order.is_quote,
            user_address: order.user_address.clone(),
        });
        builder = builder.extend_trades(maker_entries);
        for id in &oco_canceled {
            builder = builder.canceled(id.clone());
        }

        let stored = if order.is_filled() {
            self.backend.delete_order(&order.id);
            if !order.oco_id.is_empty() {
                let sibling_id = order.oco_id.clone();
                if self.cancel_sibling(&sibling_id).is_some() {
                    builder = builder.canceled(sibling_id);
                }
            }
            false
        } else if order.tif == TimeInForce::IOC {
            self.backend.delete_order(&order.id);
            builder = builder.canceled(order.id.clone());
            false
        } else {
            // GTC rests with whatever quantity remains.
            self.backend.update_order(order.clone())?;
            self.backend.append_to_side(order.side, order.clone());
            if !order.oco_id.is_empty() {
                self.backend.link_oco(&order.id, &order.oco_id);
            }
            true
        };
        builder = builder.stored(stored);

        let mut activated = Vec::new();
        if !processed.is_zero() {
            activated = self.sweep_stops();
        }
        for id in activated {
            builder = builder.activated(id);
        }

        Ok(builder.build(processed))
    }

    fn process_stop(&mut self, mut order: Order) -> Result<ExecutionReport, EngineError> {
        self.backend.store_order(order.clone())?;

        let last = self.backend.last_trade_price();
        let triggered = !last.is_zero()
            && match order.side {
                Side::Buy => last >= order.stop_price,
                Side::Sell => last <= order.stop_price,
            };

        if triggered {
            self.backend.delete_order(&order.id);
            order.activate_stop();
            let mut report = self.process_limit(order.clone())?;
            report.activated.insert(0, order.id.clone());
            return Ok(report);
        }

        self.backend.append_to_stop_book(order.clone());
        if !order.oco_id.is_empty() {
            self.backend.link_oco(&order.id, &order.oco_id);
        }

        Ok(ExecutionReport::builder(order.id.clone(), order.original_quantity)
            .stored(true)
            .build(Amount::ZERO))
    }

    /// Side-effect-free sum of resting quantity across levels the predicate admits,
    /// used only for the FOK precheck.
    fn available_quantity(&self, side: Side, predicate: &impl Fn(Amount) -> bool) -> Amount {
        let index = match side.opposite() {
            Side::Buy => self.backend.get_bids(),
            Side::Sell => self.backend.get_asks(),
        };
        let mut total = Amount::ZERO;
        for (price, level) in index.iterate_best_first() {
            if !predicate(price) {
                break;
            }
            for resting in level.iter() {
                total = total.checked_add(resting.quantity).expect("book quantity never overflows");
            }
        }
        total
    }

    /// Crosses `taker` against the opposite side while `predicate(price)` holds and the
    /// taker has quantity left. Mutates the book in place: decrements both orders,
    /// removes/persists makers, records the trade price, and cascades OCO cancellation
    /// on a maker's full fill. Returns the maker-side trade entries (in match order)
    /// and the ids of any OCO siblings canceled as a side effect.
    fn match_against_opposite(
        &mut self,
        taker: &mut Order,
        predicate: impl Fn(Amount) -> bool,
    ) -> (Vec<TradeEntry>, Vec<String>) {
        let mut entries = Vec::new();
        let mut oco_canceled = Vec::new();

        loop {
            if taker.quantity.is_zero() {
                break;
            }
            let opposite = taker.side.opposite();
            let best = match opposite {
                Side::Buy => self.backend.get_bids().best_front(),
                Side::Sell => self.backend.get_asks().best_front(),
            };
            let Some((price, front)) = best else {
                break;
            };
            if !predicate(price) {
                break;
            }

            let mut maker = front.clone();
            let match_qty = taker.quantity.min(maker.quantity);
            taker.decrease_quantity(match_qty);
            maker.decrease_quantity(match_qty);
            maker.role = Role::Maker;

            self.backend.record_trade_price(price);
            entries.push(TradeEntry {
                order_id: maker.id.clone(),
                role: Role::Maker,
                price,
                quantity: match_qty,
                is_quote: maker.is_quote,
                user_address: maker.user_address.clone(),
            });

            if maker.is_filled() {
                self.backend.remove_from_side(opposite, &maker.id);
                self.backend.delete_order(&maker.id);
                if let Some(sibling_id) = self.backend.check_oco(&maker.id) {
                    if let Some(_sibling) = self.cancel_sibling(&sibling_id) {
                        oco_canceled.push(sibling_id);
                    }
                }
                debug!(maker_id = %maker.id, %price, quantity = %match_qty, "maker fully filled");
            } else {
                self.backend
                    .update_order(maker.clone())
                    .expect("maker was just read from the backend");
                self.backend.append_to_side(opposite, maker.clone());
                debug!(maker_id = %maker.id, %price, quantity = %match_qty, "maker partially filled");
            }
        }

        (entries, oco_canceled)
    }

    /// Cancels an OCO sibling as a side effect of its pair filling. Unlike the public
    /// `cancel`, this always purges the OCO link on both sides (the pair is now fully
    /// resolved either way).
    fn cancel_sibling(&mut self, sibling_id: &str) -> Option<Order> {
        let mut sibling = self.backend.get_order(sibling_id)?;
        sibling.cancel();

        if sibling.kind == OrderKind::StopLimit {
            self.backend
                .remove_from_stop_book(sibling.side, sibling.stop_price, sibling_id);
        } else {
            self.backend.remove_from_side(sibling.side, sibling_id);
        }
        self.backend.delete_order(sibling_id);
        self.backend.purge_oco(sibling_id);

        info!(order_id = sibling_id, "order canceled via OCO cascade");
        Some(sibling)
    }

    /// Activates every stop order triggered by the current last trade price, feeding
    /// each through `process_limit` in turn (§4.9). Returns the ids activated; the
    /// nested reports are not folded into the triggering call's own report — only
    /// observable here as activated ids, with the full nested report intended for
    /// separate publication once the event bus carries it.
    fn sweep_stops(&mut self) -> Vec<String> {
        let last_price = self.backend.last_trade_price();
        let triggered = self.backend.take_triggered_stops(last_price);

        let mut activated = Vec::new();
        for mut stop in triggered {
            self.backend.delete_order(&stop.id);
            stop.activate_stop();
            let id = stop.id.clone();
            // `process_limit` stores the order itself; storing it here too would
            // always fail with `OrderExists`, same as the submission-time trigger
            // path in `process_stop` above.
            match self.process_limit(stop) {
                Ok(_report) => {
                    activated.push(id);
                }
                Err(err) => {
                    tracing::error!(order_id = %id, error = %err, "failed to activate triggered stop");
                }
            }
        }
        activated
    }
}
