use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plotly-compatible figure: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStyle {
    pub dash: String,
}

/// A single named series. `x` and `y` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<LineStyle>,
}

impl Trace {
    pub fn line(name: impl Into<String>, points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            x,
            y,
            kind: TraceKind::Scatter,
            mode: Some("lines".to_string()),
            name: name.into(),
            line: None,
        }
    }

    pub fn bar(name: impl Into<String>, points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self {
            x,
            y,
            kind: TraceKind::Bar,
            mode: None,
            name: name.into(),
            line: None,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.line = Some(LineStyle { dash: "dash".to_string() });
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl Layout {
    pub fn new(title: impl Into<String>, x_title: &str, y_title: &str) -> Self {
        Self {
            title: title.into(),
            xaxis: Axis { title: x_title.to_string() },
            yaxis: Axis { title: y_title.to_string() },
        }
    }
}

/// What an output region of the page displays: a chart or a line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    Graph { id: String, figure: Figure },
    Message { text: String },
}

impl Panel {
    pub fn graph(id: &str, figure: Figure) -> Self {
        Panel::Graph { id: id.to_string(), figure }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Panel::Message { text: text.into() }
    }

    pub fn as_message(&self) -> Option<&str> {
        match self {
            Panel::Message { text } => Some(text),
            Panel::Graph { .. } => None,
        }
    }

    pub fn as_figure(&self) -> Option<&Figure> {
        match self {
            Panel::Graph { figure, .. } => Some(figure),
            Panel::Message { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashed_line_serializes_as_plotly_scatter() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let trace = Trace::line("Predicted Prices", vec![(day, 10.5)]).dashed();

        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "scatter");
        assert_eq!(json["mode"], "lines");
        assert_eq!(json["line"]["dash"], "dash");
        assert_eq!(json["x"][0], "2024-03-01");
        assert_eq!(json["y"][0], 10.5);
    }

    #[test]
    fn test_bar_omits_line_fields() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let json = serde_json::to_value(Trace::bar("Sales Amount", vec![(day, 15.0)])).unwrap();

        assert_eq!(json["type"], "bar");
        assert!(json.get("mode").is_none());
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_panel_is_tagged() {
        let json = serde_json::to_value(Panel::message("Please upload a CSV file.")).unwrap();
        assert_eq!(json["type"], "message");
        assert_eq!(json["text"], "Please upload a CSV file.");
    }
}
