//! Benchmarks for model fitting and the batch pass.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use demandcast::core::ProductSeries;
use demandcast::data::SalesRecord;
use demandcast::models::arima::Arima;
use demandcast::models::Forecaster;
use demandcast::pipeline::{run_batch, PipelineConfig};

fn synthetic_series(n: usize) -> ProductSeries {
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| NaiveDate::from_ymd_opt(2015 + i as i32 / 12, 1 + (i as u32 % 12), 1).unwrap())
        .collect();
    let units: Vec<f64> = (0..n)
        .map(|i| 100.0 + 0.3 * i as f64 + 12.0 * (i as f64 * 0.52).sin())
        .collect();
    ProductSeries::new("BENCH", dates, units).unwrap()
}

fn bench_arima_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("arima_fit_predict");
    for &size in &[24usize, 60, 120] {
        let series = synthetic_series(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut model = Arima::new(1, 0, 1);
                model.fit(black_box(&series)).unwrap();
                model.predict(12).unwrap()
            })
        });
    }
    group.finish();
}

fn bench_batch_pass(c: &mut Criterion) {
    let records: Vec<SalesRecord> = (0..8)
        .flat_map(|product| {
            (0..36).map(move |i| SalesRecord {
                date: NaiveDate::from_ymd_opt(2020 + i / 12, 1 + (i % 12) as u32, 1).unwrap(),
                product_id: format!("P{product:03}"),
                units_sold: 50.0 + product as f64 * 10.0 + (i as f64 * 0.8).sin() * 6.0,
            })
        })
        .collect();

    c.bench_function("run_batch_8_products", |b| {
        b.iter(|| run_batch(black_box(&records), &PipelineConfig::default()).unwrap())
    });
}

criterion_group!(benches, bench_arima_fit, bench_batch_pass);
criterion_main!(benches);
