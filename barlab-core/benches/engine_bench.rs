//! Criterion benchmarks for BarLab hot paths.
//!
//! Benchmarks:
//! 1. Bar run loop (full backtest over the three reference strategies)
//! 2. Incremental indicator updates (SMA, Bollinger, RSI)
//! 3. Broker fill path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use barlab_core::domain::{Bar, BarSeries, Order, PriceField};
use barlab_core::engine::{run_backtest, Broker, EngineConfig, TradingMode};
use barlab_core::indicators::{BollingerBands, Indicator, Rsi, Sma};
use barlab_core::strategy::StrategySpec;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            let open = close - 0.3;
            let high = close + 1.5;
            let low = close - 1.8;
            Bar {
                symbol: "BENCH".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
                adj_close: close,
            }
        })
        .collect()
}

fn make_series(n: usize) -> BarSeries {
    BarSeries::from_bars(make_bars(n)).expect("bench bars are valid")
}

// ── 1. Bar Run Loop ──────────────────────────────────────────────────

fn bench_run_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_loop");

    let specs = [
        StrategySpec::BollingerReversion { period: 20, multiplier: 2.0 },
        StrategySpec::SmaCrossover { period: 50, shares: 100.0 },
        StrategySpec::Rsi2 {
            entry_period: 200,
            exit_period: 5,
            rsi_period: 2,
            oversold: 10.0,
            overbought: 90.0,
        },
    ];

    for &bar_count in &[252, 1260, 2520] {
        let series = make_series(bar_count);
        let config = EngineConfig::new(100_000.0, PriceField::Close);

        for spec in &specs {
            group.bench_with_input(
                BenchmarkId::new(spec.name(), bar_count),
                &bar_count,
                |b, _| {
                    b.iter(|| {
                        let mut strategy = spec.build(PriceField::Close).unwrap();
                        run_backtest(
                            black_box(&series),
                            strategy.as_mut(),
                            black_box(&config),
                        )
                    });
                },
            );
        }
    }

    group.finish();
}

// ── 2. Incremental Indicator Updates ─────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_update");

    let bars = make_bars(2520);

    group.bench_function("sma_20_2520_bars", |b| {
        b.iter(|| {
            let mut sma = Sma::new(20, PriceField::Close);
            for bar in &bars {
                sma.update(black_box(bar));
            }
            black_box(sma.value())
        });
    });

    group.bench_function("bollinger_20_2520_bars", |b| {
        b.iter(|| {
            let mut bb = BollingerBands::new(20, 2.0, PriceField::Close);
            for bar in &bars {
                bb.update(black_box(bar));
            }
            black_box(bb.upper())
        });
    });

    group.bench_function("rsi_14_2520_bars", |b| {
        b.iter(|| {
            let mut rsi = Rsi::new(14, PriceField::Close);
            for bar in &bars {
                rsi.update(black_box(bar));
            }
            black_box(rsi.value())
        });
    });

    group.finish();
}

// ── 3. Broker Fill Path ──────────────────────────────────────────────

fn bench_broker(c: &mut Criterion) {
    let mut group = c.benchmark_group("broker");

    let bars = make_bars(1000);

    group.bench_function("alternating_fills_1000_bars", |b| {
        b.iter(|| {
            let mut broker = Broker::new(1_000_000.0, PriceField::Close, TradingMode::LongOnly);
            for (i, bar) in bars.iter().enumerate() {
                let order = if i % 2 == 0 {
                    Order::buy("BENCH", 100.0)
                } else {
                    Order::sell("BENCH", 100.0)
                };
                let _ = broker.submit(black_box(&order), bar, i);
                broker.mark_to_market(bar);
            }
            black_box(broker.equity())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_run_loop, bench_indicators, bench_broker);
criterion_main!(benches);
