//! Integration tests for value search over real traces

mod common;

use common::builders::{heatmap_layer, line_layer, ChartBuilder};
use maidr_rs::model::{Figure, PlotPath, ValueGrid};
use maidr_rs::navigation::{NavigationContext, RotorNavigator, RotorUnit};
use maidr_rs::output::{Notifier, OutputBridge, OutputEvent};
use maidr_rs::{Coordinate, Direction};
use serde_json::json;

fn rotor() -> (RotorNavigator, OutputBridge) {
    let (bridge, sender) = OutputBridge::new(64);
    (RotorNavigator::new(Notifier::new(sender)), bridge)
}

fn find(
    rotor: &RotorNavigator,
    figure: &Figure,
    ctx: &NavigationContext,
    direction: Direction,
    unit: RotorUnit,
) -> Option<Coordinate> {
    let PlotPath::Trace { subplot, layer } = ctx.active() else {
        return None;
    };
    let trace = figure.trace(subplot, layer)?;
    rotor.find_target_for_value_navigation(trace, direction, unit)
}

#[test]
fn test_line_search_jumps_to_first_strictly_higher() {
    let mut figure = ChartBuilder::new("c")
        .subplot(vec![line_layer("l", &[&[5.0, 10.0, 15.0, 8.0, 12.0]])])
        .figure();
    let ctx = NavigationContext::new(&figure);
    let (rotor, _bridge) = rotor();
    ctx.move_to_index(&mut figure, Coordinate::new(0, 1));

    let target = find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::HigherValue);
    assert_eq!(target, Some(Coordinate::new(0, 2)));
    assert!(ctx.move_to_index(&mut figure, Coordinate::new(0, 2)));

    // 15 is the maximum, nothing further is higher
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::HigherValue),
        None
    );
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::LowerValue),
        Some(Coordinate::new(0, 3))
    );
}

#[test]
fn test_multiline_search_stays_in_group() {
    let mut figure = ChartBuilder::new("c")
        .subplot(vec![line_layer("l", &[&[1.0, 2.0, 3.0], &[9.0, 1.0, 0.0]])])
        .figure();
    let ctx = NavigationContext::new(&figure);
    let (rotor, _bridge) = rotor();
    ctx.move_to_index(&mut figure, Coordinate::new(1, 0));

    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::HigherValue),
        None
    );
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::LowerValue),
        Some(Coordinate::new(1, 1))
    );
}

#[test]
fn test_heatmap_search_follows_axis() {
    let mut figure = ChartBuilder::new("c")
        .subplot(vec![heatmap_layer(
            "h",
            &[&[1.0, 2.0, 3.0], &[4.0, 5.0, 0.0], &[7.0, 8.0, 9.0]],
        )])
        .figure();
    let ctx = NavigationContext::new(&figure);
    let (rotor, _bridge) = rotor();
    ctx.move_to_index(&mut figure, Coordinate::new(1, 1));

    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::LowerValue),
        Some(Coordinate::new(1, 2))
    );
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Upward, RotorUnit::HigherValue),
        Some(Coordinate::new(2, 1))
    );
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Downward, RotorUnit::HigherValue),
        None
    );
}

#[test]
fn test_candlestick_search_keeps_channel() {
    let candles = json!({
        "id": "k",
        "type": "candlestick",
        "data": [
            {"value": "Mon", "open": 10.0, "high": 12.0, "low": 9.0, "close": 11.0},
            {"value": "Tue", "open": 9.0, "high": 14.0, "low": 8.0, "close": 13.0},
            {"value": "Wed", "open": 12.0, "high": 13.0, "low": 10.0, "close": 10.5}
        ]
    });
    let mut figure = ChartBuilder::new("c").subplot(vec![candles]).figure();
    let ctx = NavigationContext::new(&figure);
    let (rotor, _bridge) = rotor();
    ctx.move_once(&mut figure, Direction::Forward);

    let PlotPath::Trace { subplot, layer } = ctx.active() else {
        panic!("expected a trace");
    };
    let trace = figure.trace(subplot, layer).unwrap();
    assert_eq!(trace.position(), Coordinate::new(0, 1));
    assert_eq!(trace.value_channel(), Some(1));

    // Opening prices: 10, 9, 12
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::HigherValue),
        Some(Coordinate::new(2, 1))
    );
    assert_eq!(
        find(&rotor, &figure, &ctx, Direction::Forward, RotorUnit::LowerValue),
        Some(Coordinate::new(1, 1))
    );
}

#[test]
fn test_not_found_is_reported() {
    let (rotor, bridge) = rotor();
    rotor.emit_target_not_found(RotorUnit::LowerValue, Direction::Backward);
    assert!(matches!(
        bridge.drain().as_slice(),
        [OutputEvent::TargetNotFound { message, .. }] if message == "No lower value found backward"
    ));
}

#[test]
fn test_cycle_reaches_every_unit() {
    let (mut rotor, bridge) = rotor();
    let units: Vec<RotorUnit> = (0..3).map(|_| rotor.cycle_next()).collect();
    assert_eq!(
        units,
        vec![RotorUnit::HigherValue, RotorUnit::LowerValue, RotorUnit::DataPoint]
    );
    assert_eq!(bridge.drain().len(), 3);
}
