//! Filter performance benchmarks.
//!
//! Measures filter application, bounds evaluation and active-design queries
//! on generated design spaces.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use designspace::{AxisDefaults, Chart, DataSheet, DataTable, FilterKind, ImportConfig, NoProgress};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A sheet of `rows` designs with `numeric` numeric parameters and one
/// discrete parameter.
fn generate_sheet(rows: usize, numeric: usize) -> DataSheet {
    let mut rng = StdRng::seed_from_u64(7);
    let mut headers: Vec<String> = (0..numeric).map(|i| format!("x{}", i)).collect();
    headers.push("kind".to_string());

    let rows = (0..rows)
        .map(|_| {
            let mut row: Vec<String> = (0..numeric)
                .map(|_| format!("{:.3}", rng.gen_range(0.0..100.0)))
                .collect();
            row.push(format!("k{}", rng.gen_range(0..12)));
            row
        })
        .collect();

    let table = DataTable::new(headers, rows, b',');
    DataSheet::import(&table, &ImportConfig::default(), &mut NoProgress).unwrap()
}

fn bench_set_filter_value(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_filter_value");

    for rows in [1_000, 10_000, 100_000].iter() {
        let mut sheet = generate_sheet(*rows, 4);
        let mut chart = Chart::new("bench", &mut sheet, &AxisDefaults::default()).unwrap();
        let x0 = sheet.parameters()[0].id();

        group.bench_function(BenchmarkId::new("rows", rows), |b| {
            let mut value = 10.0;
            b.iter(|| {
                value = if value > 90.0 { 10.0 } else { value + 1.0 };
                chart
                    .set_filter_value(x0, FilterKind::Upper, black_box(value), &mut sheet)
                    .unwrap();
            })
        });
    }

    group.finish();
}

fn bench_discrete_filter(c: &mut Criterion) {
    let mut sheet = generate_sheet(10_000, 2);
    let mut chart = Chart::new("bench", &mut sheet, &AxisDefaults::default()).unwrap();
    let kind = sheet.parameter_by_name("kind").unwrap().id();

    c.bench_function("discrete_filter_10000", |b| {
        b.iter(|| {
            chart
                .set_window(kind, black_box(2.0), black_box(8.0), &mut sheet)
                .unwrap();
        })
    });
}

fn bench_active_designs(c: &mut Criterion) {
    let mut group = c.benchmark_group("active_count");

    for axes in [2, 8, 32].iter() {
        let mut sheet = generate_sheet(10_000, *axes);
        let mut chart = Chart::new("bench", &mut sheet, &AxisDefaults::default()).unwrap();
        let numeric: Vec<_> = sheet
            .parameters()
            .iter()
            .filter(|p| p.is_numeric())
            .map(|p| p.id())
            .collect();
        for id in numeric {
            chart.set_window(id, 5.0, 95.0, &mut sheet).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("axes", axes), &sheet, |b, sheet| {
            b.iter(|| black_box(chart.active_count(sheet)))
        });
    }

    group.finish();
}

fn bench_evaluate_bounds(c: &mut Criterion) {
    let mut sheet = generate_sheet(10_000, 8);
    let chart = Chart::new("bench", &mut sheet, &AxisDefaults::default()).unwrap();

    c.bench_function("evaluate_bounds_10000", |b| {
        b.iter(|| black_box(chart.evaluate_bounds(&mut sheet)))
    });
}

criterion_group!(
    benches,
    bench_set_filter_value,
    bench_discrete_filter,
    bench_active_designs,
    bench_evaluate_bounds,
);
criterion_main!(benches);
