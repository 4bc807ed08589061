use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use transit_engine::algorithms::{MergeWindow, SignificanceScanner, TransitConsolidator};
use transit_engine::models::BirthChart;
use transit_engine::providers::{LuniSolarPanchang, MeanMotionEphemeris, PositionProvider};
use transit_engine::rules::RuleTables;

fn natal_chart(ephemeris: &MeanMotionEphemeris) -> BirthChart {
    let birth = NaiveDate::from_ymd_opt(1990, 4, 15).unwrap();
    BirthChart::new(ephemeris.positions_at(birth).unwrap())
        .unwrap()
        .with_ascendant(95.0)
        .unwrap()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    let ephemeris = MeanMotionEphemeris::tropical();
    let panchang = LuniSolarPanchang;
    let rules = RuleTables::default();
    let chart = natal_chart(&ephemeris);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for days in [30u64, 365] {
        let end = start + chrono::Days::new(days - 1);
        group.bench_with_input(BenchmarkId::new("scan_days", days), &end, |b, end| {
            let scanner = SignificanceScanner::new(&ephemeris, &panchang, &rules);
            b.iter(|| scanner.scan(black_box(&chart), start, *end).unwrap());
        });
    }

    group.finish();
}

fn bench_scan_and_consolidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("transit_periods");

    let ephemeris = MeanMotionEphemeris::tropical();
    let panchang = LuniSolarPanchang;
    let rules = RuleTables::default();
    let chart = natal_chart(&ephemeris);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let scanner = SignificanceScanner::new(&ephemeris, &panchang, &rules);
    let consolidator = TransitConsolidator::new(MergeWindow::default());

    group.bench_function("one_year", |b| {
        b.iter(|| {
            let observations = scanner.scan(black_box(&chart), start, end).unwrap();
            consolidator.consolidate(
                observations
                    .into_iter()
                    .flat_map(|observation| observation.into_transits()),
            )
        });
    });

    let observations: Vec<_> = scanner
        .scan(&chart, start, end)
        .unwrap()
        .into_iter()
        .flat_map(|observation| observation.into_transits())
        .collect();
    group.bench_function("consolidate_only", |b| {
        b.iter(|| consolidator.consolidate(black_box(observations.clone())));
    });

    group.finish();
}

criterion_group!(benches, bench_scan, bench_scan_and_consolidate);
criterion_main!(benches);
