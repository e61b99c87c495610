use climate_odds::{
    distribution, summarize, Aggregation, CalendarDay, Denominator, LatLon, QueryKey,
    SampleOutcome, ThresholdTable,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn grid_outcomes(years: i32, cells: usize) -> Vec<(QueryKey, SampleOutcome)> {
    let day = CalendarDay::new(6, 15).expect("valid day");
    (1995..1995 + years)
        .flat_map(|year| {
            (0..cells).map(move |cell| {
                let key = QueryKey::new(year, LatLon(-23.8, 90.0 + cell as f64 * 0.25), day);
                let outcome = match (year as usize + cell) % 7 {
                    0 => SampleOutcome::Missing,
                    1 => SampleOutcome::Failed,
                    n => SampleOutcome::Observed {
                        value: 20.0 + n as f64 * 8.0,
                    },
                };
                (key, outcome)
            })
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let point = grid_outcomes(30, 1);
    let grid = grid_outcomes(30, 200);
    let humidity = ThresholdTable::humidity();

    c.bench_function("distribution_point", |b| {
        b.iter(|| {
            distribution(
                black_box(&point),
                &humidity,
                Aggregation::Mean,
                30,
                Denominator::ConfiguredYears,
            )
        })
    });
    c.bench_function("summarize_grid", |b| {
        b.iter(|| {
            summarize(
                black_box(&grid),
                &humidity,
                Aggregation::Mean,
                30,
                Denominator::ConfiguredYears,
            )
        })
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
