//! Test data builders for chart descriptions

use maidr_rs::model::{Figure, Maidr};
use serde_json::{json, Value};

/// Builder for chart descriptions, one subplot row at a time
pub struct ChartBuilder {
    id: String,
    title: Option<String>,
    subtitle: Option<String>,
    caption: Option<String>,
    rows: Vec<Vec<Value>>,
}

impl ChartBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            subtitle: None,
            caption: None,
            rows: vec![Vec::new()],
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    /// Append a subplot holding `layers` to the current row
    pub fn subplot(mut self, layers: Vec<Value>) -> Self {
        if let Some(row) = self.rows.last_mut() {
            row.push(json!({ "layers": layers }));
        }
        self
    }

    /// Start a new subplot row
    pub fn next_row(mut self) -> Self {
        self.rows.push(Vec::new());
        self
    }

    pub fn to_json(&self) -> Value {
        let rows: Vec<&Vec<Value>> = self.rows.iter().filter(|row| !row.is_empty()).collect();
        let mut chart = json!({ "id": self.id, "subplots": rows });
        for (key, value) in [
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("caption", &self.caption),
        ] {
            if let Some(value) = value {
                chart[key] = json!(value);
            }
        }
        chart
    }

    pub fn build(&self) -> Maidr {
        serde_json::from_value(self.to_json()).unwrap()
    }

    pub fn figure(&self) -> Figure {
        Figure::from_grammar(&self.build()).unwrap()
    }
}

/// Bar layer with `Day`/`Sales` axes
pub fn bar_layer(id: &str, points: &[(&str, f64)]) -> Value {
    let data: Vec<Value> = points
        .iter()
        .map(|(x, y)| json!({ "x": x, "y": y }))
        .collect();
    json!({
        "id": id,
        "type": "bar",
        "title": id,
        "axes": { "x": "Day", "y": "Sales" },
        "data": data,
    })
}

/// Line layer with one group per slice of `lines`; x runs 1, 2, 3, ...
pub fn line_layer(id: &str, lines: &[&[f64]]) -> Value {
    let data: Vec<Vec<Value>> = lines
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, y)| json!({ "x": i + 1, "y": y }))
                .collect()
        })
        .collect();
    json!({
        "id": id,
        "type": "line",
        "title": id,
        "axes": { "x": "Day", "y": "Price" },
        "data": data,
    })
}

/// Heatmap layer; `points[row][col]`
pub fn heatmap_layer(id: &str, points: &[&[f64]]) -> Value {
    let x: Vec<String> = (0..points.first().map_or(0, |row| row.len()))
        .map(|i| format!("c{}", i))
        .collect();
    let y: Vec<String> = (0..points.len()).map(|i| format!("r{}", i)).collect();
    json!({
        "id": id,
        "type": "heat",
        "axes": { "x": "Column", "y": "Row", "fill": "Count" },
        "data": { "x": x, "y": y, "points": points },
    })
}

/// Vertical box layer; each box is `(group, [min, q1, q2, q3, max], upper outliers)`
pub fn box_layer(id: &str, boxes: &[(&str, [f64; 5], &[f64])]) -> Value {
    let data: Vec<Value> = boxes
        .iter()
        .map(|(fill, [min, q1, q2, q3, max], upper)| {
            json!({
                "fill": fill,
                "lowerOutliers": [],
                "min": min, "q1": q1, "q2": q2, "q3": q3, "max": max,
                "upperOutliers": upper,
            })
        })
        .collect();
    json!({
        "id": id,
        "type": "box",
        "axes": { "x": "Group", "y": "Value" },
        "data": data,
    })
}

/// Scatter layer from `(x, y)` points
pub fn scatter_layer(id: &str, points: &[(f64, f64)]) -> Value {
    let data: Vec<Value> = points.iter().map(|(x, y)| json!({ "x": x, "y": y })).collect();
    json!({
        "id": id,
        "type": "point",
        "axes": { "x": "Height", "y": "Weight" },
        "data": data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_builder() {
        let chart = ChartBuilder::new("c")
            .title("Sales")
            .subplot(vec![bar_layer("b", &[("Mon", 1.0)])])
            .next_row()
            .subplot(vec![line_layer("l", &[&[1.0, 2.0]])])
            .build();

        assert_eq!(chart.id, "c");
        assert_eq!(chart.title.as_deref(), Some("Sales"));
        assert_eq!(chart.subplots.len(), 2);
    }
}
