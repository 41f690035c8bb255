//! Chart description format
//!
//! Charts arrive as JSON. The layer payload depends on the trace type, so it
//! is kept as a raw [`serde_json::Value`] here and decoded into typed points
//! by [`MaidrLayer::decode`].

use crate::error::{MaidrError, Result};
use crate::types::{Orientation, TraceType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Root of a chart description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maidr {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    /// Grid of subplots, row by row
    pub subplots: Vec<Vec<MaidrSubplot>>,
}

impl Maidr {
    /// Parse a chart description from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| MaidrError::InvalidChart(format!("Failed to parse chart: {}", e)))
    }

    /// Read and parse a chart description file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| e.with_context(format!("{:?}", path)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaidrSubplot {
    #[serde(default)]
    pub legend: Option<Vec<String>>,
    #[serde(default)]
    pub layers: Vec<MaidrLayer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Axes {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaidrLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub axes: Axes,
    pub data: serde_json::Value,
}

/// A category or coordinate as written in the chart: number or text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
}

impl XValue {
    /// Numeric reading of the value, accepting numeric text
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            XValue::Number(n) => Some(*n),
            XValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for XValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XValue::Number(n) => f.write_str(&super::state::format_number(*n)),
            XValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarPoint {
    pub x: XValue,
    pub y: XValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramPoint {
    pub x: XValue,
    pub y: XValue,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub x: XValue,
    pub y: f64,
    #[serde(default)]
    pub fill: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedPoint {
    pub x: XValue,
    pub y: XValue,
    pub fill: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapData {
    pub x: Vec<String>,
    pub y: Vec<String>,
    pub points: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickPoint {
    pub value: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub volatility: Option<f64>,
}

/// One box of a box plot; outlier lists may be empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPoint {
    pub fill: String,
    #[serde(default)]
    pub lower_outliers: Vec<f64>,
    pub min: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub max: f64,
    #[serde(default)]
    pub upper_outliers: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

/// Layer payload decoded according to its trace type
#[derive(Debug, Clone, PartialEq)]
pub enum LayerData {
    Bar(Vec<BarPoint>),
    Box(Vec<BoxPoint>),
    Histogram(Vec<HistogramPoint>),
    Line(Vec<Vec<LinePoint>>),
    Segmented(Vec<Vec<SegmentedPoint>>),
    Heatmap(HeatmapData),
    Candlestick(Vec<CandlestickPoint>),
    Scatter(Vec<ScatterPoint>),
}

impl MaidrLayer {
    /// Decode the raw payload into the shape its trace type expects
    pub fn decode(&self) -> Result<LayerData> {
        let data = match self.trace_type {
            TraceType::Bar => LayerData::Bar(self.decode_as()?),
            TraceType::Box => LayerData::Box(self.decode_as()?),
            TraceType::Histogram => LayerData::Histogram(self.decode_as()?),
            TraceType::Line => LayerData::Line(self.decode_as()?),
            TraceType::Heatmap => LayerData::Heatmap(self.decode_as()?),
            TraceType::Candlestick => LayerData::Candlestick(self.decode_as()?),
            TraceType::Scatter => LayerData::Scatter(self.decode_as()?),
            TraceType::StackedBar | TraceType::DodgedBar | TraceType::NormalizedBar => {
                LayerData::Segmented(self.decode_as()?)
            }
        };
        Ok(data)
    }

    fn decode_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            MaidrError::InvalidChart(format!(
                "layer '{}' has malformed {} data: {}",
                self.id, self.trace_type, e
            ))
        })
    }
}
