//! Typed trace data and the per-kind read-outs built from it
//!
//! A [`Series`] is the decoded payload of one layer. It knows how its points
//! map onto the `[row][col]` value grid the cursor walks, and how to turn
//! the point under the cursor into text, audio and braille payloads.
//!
//! # Grid shapes
//!
//! | kind        | rows                      | columns               |
//! |-------------|---------------------------|-----------------------|
//! | bar, hist   | one                       | bars                  |
//! | line        | one per series            | points                |
//! | segmented   | one per fill level + sum  | categories            |
//! | heatmap     | y labels                  | x labels              |
//! | candlestick | candles                   | value channels        |
//! | box         | boxes                     | sections              |
//! | scatter     | x groups, then y groups   | distinct coordinates  |

use crate::error::{MaidrError, Result};
use crate::model::grammar::{
    BarPoint, BoxPoint, CandlestickPoint, HeatmapData, HistogramPoint, LayerData, LinePoint,
    ScatterPoint, SegmentedPoint, XValue,
};
use crate::model::grid::{Geometry, Layout};
use crate::model::state::{
    format_number, AudioState, AudioValue, FillField, TextField, TextRange, TextState, TextValue,
};
use crate::types::{Coordinate, Orientation};

/// Value channels of a candle, in column order
pub const CANDLE_CHANNELS: [&str; 5] = ["volatility", "open", "high", "low", "close"];

/// Channel announced on entry
const CANDLE_ENTRY_CHANNEL: usize = 1;

/// Channel used for value searches when volatility is announced
pub const CANDLE_CLOSE_CHANNEL: usize = 4;

/// Fill value reported on the summary row of segmented bars
const SUMMARY_FILL: &str = "All";

/// Sections of a box, in column order
pub const BOX_SECTIONS: [&str; 7] = [
    "Lower outlier(s)",
    "Minimum",
    "25%",
    "50%",
    "75%",
    "Maximum",
    "Upper outlier(s)",
];

const BOX_LOWER_OUTLIERS: usize = 0;
const BOX_UPPER_OUTLIERS: usize = 6;

/// Section announced on entry
const BOX_ENTRY_SECTION: usize = 1;

/// Row of a scatter grid holding the points grouped by x
const SCATTER_X_ROW: usize = 0;

/// Axis labels of a trace
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub x: String,
    pub y: String,
    pub fill: String,
}

/// Candle with derived fields filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub value: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub trend: String,
    pub volatility: f64,
}

impl Candle {
    fn from_point(point: CandlestickPoint) -> Self {
        let trend = point.trend.unwrap_or_else(|| {
            if point.close > point.open {
                "Bull".to_string()
            } else if point.close < point.open {
                "Bear".to_string()
            } else {
                "Neutral".to_string()
            }
        });
        let volatility = point.volatility.unwrap_or(point.high - point.low);
        Self {
            value: point.value,
            open: point.open,
            high: point.high,
            low: point.low,
            close: point.close,
            volume: point.volume,
            trend,
            volatility,
        }
    }

    fn channels(&self) -> Vec<f64> {
        vec![self.volatility, self.open, self.high, self.low, self.close]
    }
}

/// Points sharing one coordinate; `others` holds the other coordinate, sorted
#[derive(Debug, Clone, PartialEq)]
pub struct PointGroup {
    pub at: f64,
    pub others: Vec<f64>,
}

/// Group points by `key`, ordering groups and members ascending
fn group_points(
    points: &[ScatterPoint],
    key: fn(&ScatterPoint) -> f64,
    other: fn(&ScatterPoint) -> f64,
) -> Vec<PointGroup> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then(other(a).total_cmp(&other(b)))
    });

    let mut groups: Vec<PointGroup> = Vec::new();
    for point in &sorted {
        match groups.last_mut() {
            Some(group) if group.at == key(point) => group.others.push(other(point)),
            _ => groups.push(PointGroup {
                at: key(point),
                others: vec![other(point)],
            }),
        }
    }
    groups
}

fn box_sections(point: &BoxPoint) -> Vec<f64> {
    // Outlier sections carry the outlier nearest the box, NaN when there is none
    let lower = point
        .lower_outliers
        .iter()
        .copied()
        .fold(f64::NAN, f64::max);
    let upper = point
        .upper_outliers
        .iter()
        .copied()
        .fold(f64::NAN, f64::min);
    vec![
        lower, point.min, point.q1, point.q2, point.q3, point.max, upper,
    ]
}

/// Decoded layer payload
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    Bar {
        points: Vec<BarPoint>,
        orientation: Orientation,
    },
    Histogram {
        points: Vec<HistogramPoint>,
        orientation: Orientation,
    },
    Line(Vec<Vec<LinePoint>>),
    /// Fill levels of a stacked, dodged or normalized bar chart
    Segmented(Vec<Vec<SegmentedPoint>>),
    Heatmap {
        x: Vec<String>,
        y: Vec<String>,
    },
    Candlestick(Vec<Candle>),
    Box {
        boxes: Vec<BoxPoint>,
        orientation: Orientation,
    },
    /// Points grouped by x (first grid row) and by y (second grid row)
    Scatter {
        by_x: Vec<PointGroup>,
        by_y: Vec<PointGroup>,
    },
}

impl Series {
    /// Build the series and its raw value grid
    pub fn decode(
        data: LayerData,
        orientation: Orientation,
        layer_id: &str,
    ) -> Result<(Self, Vec<Vec<f64>>)> {
        let invalid = |what: String| MaidrError::InvalidChart(format!("layer '{}': {}", layer_id, what));

        let decoded = match data {
            LayerData::Bar(points) => {
                let row = points
                    .iter()
                    .map(|p| numeric(bar_value(&p.x, &p.y, orientation)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                (Series::Bar { points, orientation }, vec![row])
            }
            LayerData::Histogram(points) => {
                let row = points
                    .iter()
                    .map(|p| numeric(bar_value(&p.x, &p.y, orientation)))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(invalid)?;
                (Series::Histogram { points, orientation }, vec![row])
            }
            LayerData::Line(lines) => {
                let values = lines
                    .iter()
                    .map(|line| line.iter().map(|p| p.y).collect())
                    .collect();
                (Series::Line(lines), values)
            }
            LayerData::Segmented(levels) => {
                let mut values = levels
                    .iter()
                    .map(|level| {
                        level
                            .iter()
                            .map(|p| numeric(&p.y))
                            .collect::<std::result::Result<Vec<_>, _>>()
                    })
                    .collect::<std::result::Result<Vec<Vec<f64>>, _>>()
                    .map_err(invalid)?;
                let width = values.iter().map(Vec::len).max().unwrap_or(0);
                let totals = (0..width)
                    .map(|col| values.iter().filter_map(|row| row.get(col)).sum())
                    .collect();
                values.push(totals);
                (Series::Segmented(levels), values)
            }
            LayerData::Heatmap(HeatmapData { x, y, points }) => {
                if points.len() != y.len() || points.iter().any(|row| row.len() != x.len()) {
                    return Err(invalid(format!(
                        "heatmap points must be {} rows of {} values",
                        y.len(),
                        x.len()
                    )));
                }
                (Series::Heatmap { x, y }, points)
            }
            LayerData::Candlestick(points) => {
                let candles: Vec<Candle> = points.into_iter().map(Candle::from_point).collect();
                let values = candles.iter().map(Candle::channels).collect();
                (Series::Candlestick(candles), values)
            }
            LayerData::Box(boxes) => {
                let values = boxes.iter().map(box_sections).collect();
                (Series::Box { boxes, orientation }, values)
            }
            LayerData::Scatter(points) => {
                let by_x = group_points(&points, |p| p.x, |p| p.y);
                let by_y = group_points(&points, |p| p.y, |p| p.x);
                let values = vec![
                    by_x.iter().map(|g| g.at).collect(),
                    by_y.iter().map(|g| g.at).collect(),
                ];
                (Series::Scatter { by_x, by_y }, values)
            }
        };

        if decoded.1.iter().any(Vec::is_empty) {
            return Err(invalid("every series needs at least one point".to_string()));
        }
        Ok(decoded)
    }

    pub fn geometry(&self) -> Geometry {
        match self {
            Series::Candlestick(_) | Series::Box { .. } => Geometry::Channels,
            Series::Heatmap { .. } => Geometry::Grid,
            _ => Geometry::Sequence,
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            Series::Candlestick(_) => Layout::Transposed,
            Series::Box {
                orientation: Orientation::Vertical,
                ..
            } => Layout::Transposed,
            _ => Layout::RowMajor,
        }
    }

    /// Default entry point for a grid of `rows` rows
    pub fn entry(&self, rows: usize) -> Coordinate {
        match self {
            Series::Heatmap { .. } => Coordinate::new(rows.saturating_sub(1), 0),
            Series::Candlestick(_) => Coordinate::new(0, CANDLE_ENTRY_CHANNEL),
            Series::Box {
                orientation: Orientation::Horizontal,
                ..
            } => Coordinate::new(rows.saturating_sub(1), BOX_ENTRY_SECTION),
            Series::Box { .. } => Coordinate::new(0, BOX_ENTRY_SECTION),
            _ => Coordinate::default(),
        }
    }

    /// Number of series shown in the trace
    pub fn group_count(&self) -> usize {
        match self {
            Series::Line(lines) => lines.len(),
            Series::Segmented(levels) => levels.len(),
            _ => 1,
        }
    }

    /// Column holding the announced value, for channel geometries
    pub fn value_channel(&self, at: Coordinate) -> Option<usize> {
        match self {
            Series::Candlestick(_) if at.col == 0 => Some(CANDLE_CLOSE_CHANNEL),
            Series::Candlestick(_) | Series::Box { .. } => Some(at.col),
            _ => None,
        }
    }

    /// Braille cells, or `None` for kinds without a braille rendering
    pub fn braille(&self, values: &[Vec<f64>]) -> Option<Vec<Vec<char>>> {
        match self {
            Series::Candlestick(_) | Series::Box { .. } | Series::Scatter { .. } => None,
            Series::Heatmap { .. } => Some(grid_braille(values)),
            _ => Some(values.iter().map(|row| row_braille(row)).collect()),
        }
    }

    /// Category under the cursor, used to keep the x position across layers
    pub fn x_at(&self, at: Coordinate) -> Option<XValue> {
        match self {
            Series::Bar { points, orientation } => points
                .get(at.col)
                .map(|p| bar_category(&p.x, &p.y, *orientation).clone()),
            Series::Histogram { points, orientation } => points
                .get(at.col)
                .map(|p| bar_category(&p.x, &p.y, *orientation).clone()),
            Series::Line(lines) => lines.get(at.row)?.get(at.col).map(|p| p.x.clone()),
            Series::Segmented(levels) => levels
                .get(at.row)
                .and_then(|level| level.get(at.col))
                .or_else(|| levels.iter().find_map(|level| level.get(at.col)))
                .map(|p| p.x.clone()),
            Series::Heatmap { x, .. } => x.get(at.col).cloned().map(XValue::Text),
            Series::Candlestick(candles) => {
                candles.get(at.row).map(|c| XValue::Text(c.value.clone()))
            }
            Series::Box { boxes, .. } => boxes.get(at.row).map(|b| XValue::Text(b.fill.clone())),
            Series::Scatter { by_x, .. } if at.row == SCATTER_X_ROW => {
                by_x.get(at.col).map(|g| XValue::Number(g.at))
            }
            Series::Scatter { .. } => None,
        }
    }

    /// Position showing `x`, preferring the row (or channel) of `near`
    pub fn locate_x(&self, x: &XValue, near: Coordinate, shape: &[usize]) -> Option<Coordinate> {
        let wanted = x.to_string();
        let same_x = |candidate: Option<XValue>| candidate.is_some_and(|c| c.to_string() == wanted);

        match self {
            Series::Candlestick(candles) => {
                let row = candles.iter().position(|c| c.value == wanted)?;
                return Some(Coordinate::new(row, near.col));
            }
            Series::Box { boxes, .. } => {
                let row = boxes.iter().position(|b| b.fill == wanted)?;
                return Some(Coordinate::new(row, near.col));
            }
            _ => {}
        }

        let preferred = near.row.min(shape.len().saturating_sub(1));
        let rows = std::iter::once(preferred).chain((0..shape.len()).filter(|&r| r != preferred));
        for row in rows {
            let len = shape.get(row).copied().unwrap_or(0);
            if let Some(col) = (0..len).find(|&col| same_x(self.x_at(Coordinate::new(row, col)))) {
                return Some(Coordinate::new(row, col));
            }
        }
        None
    }

    pub fn text(&self, labels: &Labels, values: &[Vec<f64>], at: Coordinate) -> TextState {
        let single = |label: &str, value: String| TextField {
            label: label.to_string(),
            value: TextValue::Single(value),
        };

        match self {
            Series::Bar { points, orientation } => {
                let point = &points[at.col];
                let (main, cross) = bar_fields(labels, &point.x, &point.y, *orientation);
                TextState {
                    main: single(&main.0, main.1),
                    cross: single(&cross.0, cross.1),
                    fill: None,
                    section: None,
                    range: None,
                }
            }
            Series::Histogram { points, orientation } => {
                let point = &points[at.col];
                let (main, cross) = bar_fields(labels, &point.x, &point.y, *orientation);
                let (min, max) = match orientation {
                    Orientation::Vertical => (point.x_min, point.x_max),
                    Orientation::Horizontal => (point.y_min, point.y_max),
                };
                TextState {
                    main: single(&main.0, main.1),
                    cross: single(&cross.0, cross.1),
                    fill: None,
                    section: None,
                    range: Some(TextRange {
                        min: format_number(min),
                        max: format_number(max),
                    }),
                }
            }
            Series::Line(lines) => {
                let point = &lines[at.row][at.col];
                TextState {
                    main: single(&labels.x, point.x.to_string()),
                    cross: single(&labels.y, format_number(point.y)),
                    fill: point.fill.as_ref().map(|fill| FillField {
                        label: labels.fill.clone(),
                        value: fill.clone(),
                    }),
                    section: None,
                    range: None,
                }
            }
            Series::Segmented(levels) if at.row >= levels.len() => {
                let category = self
                    .x_at(at)
                    .map(|x| x.to_string())
                    .unwrap_or_default();
                let level_values = levels
                    .iter()
                    .filter_map(|level| level.get(at.col))
                    .map(|p| p.y.to_string())
                    .collect();
                TextState {
                    main: single(&labels.x, category),
                    cross: TextField {
                        label: labels.y.clone(),
                        value: TextValue::Many(level_values),
                    },
                    fill: Some(FillField {
                        label: labels.fill.clone(),
                        value: SUMMARY_FILL.to_string(),
                    }),
                    section: None,
                    range: None,
                }
            }
            Series::Segmented(levels) => {
                let point = &levels[at.row][at.col];
                TextState {
                    main: single(&labels.x, point.x.to_string()),
                    cross: single(&labels.y, point.y.to_string()),
                    fill: Some(FillField {
                        label: labels.fill.clone(),
                        value: point.fill.clone(),
                    }),
                    section: None,
                    range: None,
                }
            }
            Series::Heatmap { x, y } => TextState {
                main: single(&labels.x, x[at.col].clone()),
                cross: single(&labels.y, y[at.row].clone()),
                fill: Some(FillField {
                    label: labels.fill.clone(),
                    value: format_number(values[at.row][at.col]),
                }),
                section: None,
                range: None,
            },
            Series::Candlestick(candles) => {
                let candle = &candles[at.row];
                TextState {
                    main: single(&labels.x, candle.value.clone()),
                    cross: single(&labels.y, format_number(values[at.row][at.col])),
                    fill: Some(FillField {
                        label: "Trend".to_string(),
                        value: candle.trend.clone(),
                    }),
                    section: CANDLE_CHANNELS.get(at.col).map(|s| s.to_string()),
                    range: None,
                }
            }
            Series::Box { boxes, orientation } => {
                let point = &boxes[at.row];
                let (main, cross) = match orientation {
                    Orientation::Vertical => (&labels.x, &labels.y),
                    Orientation::Horizontal => (&labels.y, &labels.x),
                };
                let outliers = match at.col {
                    BOX_LOWER_OUTLIERS => Some(&point.lower_outliers),
                    BOX_UPPER_OUTLIERS => Some(&point.upper_outliers),
                    _ => None,
                };
                let value = match outliers {
                    Some(list) if list.is_empty() => TextValue::Single("none".to_string()),
                    Some(list) => TextValue::Many(list.iter().map(|v| format_number(*v)).collect()),
                    None => TextValue::Single(format_number(values[at.row][at.col])),
                };
                TextState {
                    main: single(main, point.fill.clone()),
                    cross: TextField {
                        label: cross.clone(),
                        value,
                    },
                    fill: None,
                    section: BOX_SECTIONS.get(at.col).map(|s| s.to_string()),
                    range: None,
                }
            }
            Series::Scatter { by_x, by_y } => {
                let (group, main, cross) = if at.row == SCATTER_X_ROW {
                    (&by_x[at.col], &labels.x, &labels.y)
                } else {
                    (&by_y[at.col], &labels.y, &labels.x)
                };
                let others: Vec<String> = group.others.iter().map(|v| format_number(*v)).collect();
                TextState {
                    main: single(main, format_number(group.at)),
                    cross: TextField {
                        label: cross.clone(),
                        value: match others.as_slice() {
                            [one] => TextValue::Single(one.clone()),
                            _ => TextValue::Many(others),
                        },
                    },
                    fill: None,
                    section: None,
                    range: None,
                }
            }
        }
    }

    pub fn audio(&self, values: &[Vec<f64>], at: Coordinate) -> AudioState {
        let value = values[at.row][at.col];
        match self {
            Series::Line(_) => {
                let (min, max) = bounds(values[at.row].iter().copied());
                AudioState {
                    min,
                    max,
                    size: values[at.row].len(),
                    index: at.col,
                    value: AudioValue::Single(value),
                }
            }
            Series::Segmented(levels) => {
                let (min, max) = bounds(values[..levels.len()].iter().flatten().copied());
                let value = if at.row >= levels.len() {
                    AudioValue::Group(
                        values[..levels.len()]
                            .iter()
                            .filter_map(|row| row.get(at.col).copied())
                            .collect(),
                    )
                } else {
                    AudioValue::Single(value)
                };
                AudioState {
                    min,
                    max,
                    size: values[at.row].len(),
                    index: at.col,
                    value,
                }
            }
            Series::Candlestick(_) => {
                let (min, max) = bounds(values.iter().flat_map(|row| row[1..].iter().copied()));
                AudioState {
                    min,
                    max,
                    size: values.len(),
                    index: at.row,
                    value: AudioValue::Single(value),
                }
            }
            Series::Box { boxes, .. } => {
                let (min, max) = bounds(boxes.iter().flat_map(|b| {
                    b.lower_outliers
                        .iter()
                        .chain(&b.upper_outliers)
                        .copied()
                        .chain([b.min, b.max])
                }));
                let point = &boxes[at.row];
                let outliers = match at.col {
                    BOX_LOWER_OUTLIERS => Some(&point.lower_outliers),
                    BOX_UPPER_OUTLIERS => Some(&point.upper_outliers),
                    _ => None,
                };
                let value = match outliers {
                    Some(list) if list.len() > 1 => AudioValue::Group(list.clone()),
                    _ => AudioValue::Single(value),
                };
                AudioState {
                    min,
                    max,
                    size: BOX_SECTIONS.len(),
                    index: at.col,
                    value,
                }
            }
            Series::Scatter { by_x, by_y } => {
                let (group, across) = if at.row == SCATTER_X_ROW {
                    (&by_x[at.col], by_y)
                } else {
                    (&by_y[at.col], by_x)
                };
                let (min, max) = bounds(across.iter().map(|g| g.at));
                let value = match group.others.as_slice() {
                    [one] => AudioValue::Single(*one),
                    many => AudioValue::Group(many.to_vec()),
                };
                AudioState {
                    min,
                    max,
                    size: values[at.row].len(),
                    index: at.col,
                    value,
                }
            }
            _ => {
                let (min, max) = bounds(values.iter().flatten().copied());
                AudioState {
                    min,
                    max,
                    size: values[at.row].len(),
                    index: at.col,
                    value: AudioValue::Single(value),
                }
            }
        }
    }
}

fn numeric(value: &XValue) -> std::result::Result<f64, String> {
    value
        .as_f64()
        .ok_or_else(|| format!("value '{}' is not a number", value))
}

fn bar_value<'a>(x: &'a XValue, y: &'a XValue, orientation: Orientation) -> &'a XValue {
    match orientation {
        Orientation::Vertical => y,
        Orientation::Horizontal => x,
    }
}

fn bar_category<'a>(x: &'a XValue, y: &'a XValue, orientation: Orientation) -> &'a XValue {
    match orientation {
        Orientation::Vertical => x,
        Orientation::Horizontal => y,
    }
}

/// `(label, value)` pairs for the main and cross axis of a bar
fn bar_fields(
    labels: &Labels,
    x: &XValue,
    y: &XValue,
    orientation: Orientation,
) -> ((String, String), (String, String)) {
    let xs = (labels.x.clone(), x.to_string());
    let ys = (labels.y.clone(), y.to_string());
    match orientation {
        Orientation::Vertical => (xs, ys),
        Orientation::Horizontal => (ys, xs),
    }
}

/// Min and max ignoring NaN; `(0, 0)` when nothing is finite
pub fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

/// Four-level cells scaled to the row's own range
pub fn row_braille(row: &[f64]) -> Vec<char> {
    let (min, max) = bounds(row.iter().copied());
    let range = (max - min) / 4.0;
    let low = min + range;
    let medium = low + range;
    let high = medium + range;

    row.iter()
        .map(|&v| {
            if v == 0.0 {
                ' '
            } else if v <= low {
                '⣀'
            } else if v <= medium {
                '⠤'
            } else if v <= high {
                '⠒'
            } else {
                '⠉'
            }
        })
        .collect()
}

/// Three-level cells scaled to the whole grid's range
pub fn grid_braille(values: &[Vec<f64>]) -> Vec<Vec<char>> {
    let (min, max) = bounds(values.iter().flatten().copied());
    let range = (max - min) / 3.0;
    let low = min + range;
    let medium = low + range;

    values
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| {
                    if v == 0.0 {
                        ' '
                    } else if v <= low {
                        '⠤'
                    } else if v <= medium {
                        '⠒'
                    } else {
                        '⠉'
                    }
                })
                .collect()
        })
        .collect()
}
