use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trade_recap::{
    aggregate::RecapSummary,
    data::{fx::RateTable, trades::TradeRecord},
    engine::{EngineConfig, RecapEngine},
};

const CODES: [&str; 4] = ["CPOID-JAN25", "CPOID-FEB25", "KOPI-MAR25", "OLEIN-APR25"];

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn rate_table(days: i64) -> RateTable {
    RateTable::build(
        (0..days)
            .map(|i| {
                // Every seventh day has no published rate
                let rate = (i % 7 != 0).then(|| 15_500.0 + (i % 50) as f64);
                (start() + Duration::days(i), rate)
            })
            .collect(),
    )
}

fn records(n: usize) -> Vec<TradeRecord> {
    (0..n)
        .map(|i| {
            TradeRecord::new(
                start() + Duration::days((i % 500) as i64),
                CODES[i % CODES.len()],
                Some(3_900.0 + (i % 200) as f64),
                Some((1 + i % 25) as f64),
                "IDR",
            )
        })
        .collect()
}

fn benchmark_enrichment(c: &mut Criterion) {
    let engine = RecapEngine::new(EngineConfig::default(), rate_table(600)).unwrap();
    let batch = records(10_000);

    c.bench_function("enrich_10000_trades", |b| {
        b.iter(|| {
            let trades = engine.enrich_batch(black_box(batch.clone()));
            black_box(trades);
        });
    });
}

fn benchmark_rate_table_build(c: &mut Criterion) {
    c.bench_function("rate_table_build_5000_days", |b| {
        b.iter(|| black_box(rate_table(black_box(5_000))));
    });
}

fn benchmark_aggregation(c: &mut Criterion) {
    let engine = RecapEngine::new(EngineConfig::default(), rate_table(600)).unwrap();
    let trades = engine.enrich_batch(records(10_000));

    c.bench_function("recap_summary_10000_trades", |b| {
        b.iter(|| black_box(RecapSummary::build(black_box(&trades))));
    });
}

criterion_group!(
    benches,
    benchmark_enrichment,
    benchmark_rate_table_build,
    benchmark_aggregation
);
criterion_main!(benches);
