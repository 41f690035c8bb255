//! Benchmarks for rotor value search and trace movement
//!
//! Run with: cargo bench --bench rotor_scan

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use maidr_rs::model::{Figure, Maidr, PlotPath};
use maidr_rs::navigation::{NavigationContext, RotorNavigator, RotorUnit};
use maidr_rs::output::{Notifier, OutputBridge};
use maidr_rs::{Coordinate, Direction};
use serde_json::json;

fn line_figure(len: usize) -> Figure {
    // Sawtooth starting at its minimum, so a lower-value search scans everything
    let points: Vec<_> = (0..len)
        .map(|i| {
            json!({ "x": i, "y": (i % 7) as f64 })
        })
        .collect();
    let chart = json!({
        "id": "bench",
        "subplots": [[{ "layers": [{ "id": "l", "type": "line", "data": [points] }] }]]
    });
    let chart: Maidr = serde_json::from_value(chart).unwrap();
    Figure::from_grammar(&chart).unwrap()
}

fn bench_value_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("rotor_search");
    let (_bridge, sender) = OutputBridge::new(16);
    let rotor = RotorNavigator::new(Notifier::new(sender));

    for len in [100, 1_000, 10_000] {
        let mut figure = line_figure(len);
        let ctx = NavigationContext::new(&figure);
        ctx.move_to_index(&mut figure, Coordinate::new(0, 0));
        let PlotPath::Trace { subplot, layer } = ctx.active() else {
            continue;
        };
        let Some(trace) = figure.trace(subplot, layer) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("lower_forward_miss", len), &len, |b, _| {
            b.iter(|| {
                rotor.find_target_for_value_navigation(
                    black_box(trace),
                    Direction::Forward,
                    RotorUnit::LowerValue,
                )
            })
        });
    }

    group.finish();
}

fn bench_move_once(c: &mut Criterion) {
    let mut figure = line_figure(1_000);
    let ctx = NavigationContext::new(&figure);

    c.bench_function("move_once_round_trip", |b| {
        b.iter(|| {
            ctx.move_once(&mut figure, Direction::Forward);
            ctx.move_once(&mut figure, Direction::Backward);
        })
    });
}

criterion_group!(benches, bench_value_search, bench_move_once);
criterion_main!(benches);
