use std::sync::atomic::{AtomicU64, Ordering};

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ultimate_matching::{Amount, Backend, InMemoryBackend, MatchingEngine, Order, Side, TimeInForce};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn next_id() -> String {
    format!("o{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

fn limit_order(side: Side, price: i64, quantity: i64, tif: TimeInForce) -> Order {
    Order::limit(
        next_id(),
        side,
        Amount::from_i64(quantity),
        Amount::from_i64(price),
        tif,
        "",
        "",
    )
    .unwrap()
}

fn market_order(side: Side, quantity: i64) -> Order {
    Order::market(next_id(), side, Amount::from_i64(quantity), false, "").unwrap()
}

fn setup_engine() -> MatchingEngine<InMemoryBackend> {
    MatchingEngine::new(InMemoryBackend::new())
}

fn bench_mixed_workload(c: &mut Criterion) {
    let mut engine = setup_engine();
    let mut group = c.benchmark_group("mixed_workload");

    group.bench_function("realistic_mixed_operations", |b| {
        b.iter(|| {
            // 60% resting limit orders
            for _ in 0..6 {
                black_box(engine.process(limit_order(Side::Buy, 100, 1, TimeInForce::GTC)).unwrap());
            }

            // 20% cancellations of just-placed orders
            for _ in 0..2 {
                let order = limit_order(Side::Sell, 101, 1, TimeInForce::GTC);
                let id = order.id.clone();
                engine.process(order).unwrap();
                black_box(engine.cancel(&id));
            }

            // 20% crossing matches
            for _ in 0..2 {
                engine.process(limit_order(Side::Buy, 100, 1, TimeInForce::GTC)).unwrap();
                black_box(
                    engine
                        .process(limit_order(Side::Sell, 100, 1, TimeInForce::GTC))
                        .unwrap(),
                );
            }
        })
    });

    group.finish();
}

fn bench_high_frequency_matching(c: &mut Criterion) {
    let mut engine = setup_engine();
    let mut group = c.benchmark_group("high_frequency_matching");

    for i in 0..10 {
        for _ in 0..100 {
            engine
                .process(limit_order(Side::Sell, 100 + i, 1, TimeInForce::GTC))
                .unwrap();
        }
    }

    group.bench_function("rapid_matching", |b| {
        b.iter(|| {
            black_box(
                engine
                    .process(limit_order(Side::Buy, 110, 5, TimeInForce::GTC))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn bench_market_stress(c: &mut Criterion) {
    let mut engine = setup_engine();
    let mut group = c.benchmark_group("market_stress");

    group.bench_function("high_volatility", |b| {
        b.iter(|| {
            for i in 0..5 {
                engine
                    .process(limit_order(Side::Buy, 100 + i, 1, TimeInForce::GTC))
                    .unwrap();
                black_box(
                    engine
                        .process(limit_order(Side::Sell, 100 + i, 1, TimeInForce::GTC))
                        .unwrap(),
                );
            }
        })
    });

    group.finish();
}

fn bench_order_book_depth(c: &mut Criterion) {
    let mut engine = setup_engine();
    let mut group = c.benchmark_group("order_book_depth");

    for i in 0..50 {
        for _ in 0..20 {
            engine
                .process(limit_order(Side::Sell, 100 + i, 1, TimeInForce::GTC))
                .unwrap();
        }
    }

    group.bench_function("deep_book_operations", |b| {
        b.iter(|| {
            black_box(
                engine
                    .process(limit_order(Side::Buy, 125, 1, TimeInForce::GTC))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn bench_ioc_orders(c: &mut Criterion) {
    let mut engine = setup_engine();
    let mut group = c.benchmark_group("ioc_orders");

    for i in 0..5 {
        engine
            .process(limit_order(Side::Sell, 100 + i, 1, TimeInForce::GTC))
            .unwrap();
    }

    group.bench_function("ioc_processing", |b| {
        b.iter(|| {
            black_box(
                engine
                    .process(limit_order(Side::Buy, 102, 1, TimeInForce::IOC))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

fn bench_market_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_orders");

    group.bench_function("market_order_processing", |b| {
        b.iter_batched(
            || {
                let mut engine = setup_engine();
                for i in 0..5 {
                    engine
                        .process(limit_order(Side::Sell, 100 + i, 10, TimeInForce::GTC))
                        .unwrap();
                }
                engine
            },
            |mut engine| black_box(engine.process(market_order(Side::Buy, 1)).unwrap()),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_mixed_workload,
    bench_high_frequency_matching,
    bench_market_stress,
    bench_order_book_depth,
    bench_ioc_orders,
    bench_market_orders,
);
criterion_main!(benches);
