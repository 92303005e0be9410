//! Plotly-compatible bar chart descriptors.
//!
//! A [`Figure`] serializes to the `{"data": [...], "layout": {...}}` object that the dashboard
//! front-end hands to `Plotly.react`. Rounding of the displayed values and the conversion of
//! assets into crores happen here, the [`Aggregation`] itself carries raw means.

use serde::Serialize;

use crate::aggregation::{Aggregation, Dimension, Metric, Ranking};

/// Assets are displayed in crores (1 crore = 10 million rupees).
pub const CRORE: f64 = 10_000_000.0;

const BAR_OUTLINE_COLOR: &str = "rgb(8,48,107)";
const AXIS_TITLE_FONT: Font = Font {
    family: "Courier New, monospace",
    size: 18,
    color: "#7f7f7f",
};
const TICK_FONT: Font = Font {
    family: "Old Standard TT, serif",
    size: 10,
    color: "black",
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub text: &'static str,
    pub marker: Marker,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    pub title: String,
    pub showlegend: bool,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
    pub titlefont: Font,
    pub showticklabels: bool,
    pub tickfont: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nticks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[u32; 2]>,
}

impl Axis {
    fn titled(title: String) -> Self {
        Self {
            title,
            titlefont: AXIS_TITLE_FONT,
            showticklabels: true,
            tickfont: TICK_FONT,
            autorange: None,
            nticks: None,
            range: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u32,
    pub color: &'static str,
}

impl Metric {
    /// The decimal places shown on the chart.
    pub fn precision(self) -> i32 {
        match self {
            Metric::Assets => 2,
            Metric::CriminalCases | Metric::Age => 1,
        }
    }

    /// Converts a raw mean into the displayed value.
    pub fn present(self, mean: f64) -> f64 {
        let value = match self {
            Metric::Assets => mean / CRORE,
            Metric::CriminalCases | Metric::Age => mean,
        };
        round_to(value, self.precision())
    }

    fn unit(self) -> &'static str {
        match self {
            Metric::CriminalCases => "criminal case(s)",
            Metric::Assets => "Crores",
            Metric::Age => "Years",
        }
    }

    fn trace_name(self, dimension: Dimension) -> String {
        match self {
            Metric::CriminalCases => {
                format!("<i><b>{dimension} wise average no. of criminal cases</b></i>")
            }
            Metric::Assets => format!("{dimension} wise average assets (in Cr.)"),
            Metric::Age => format!("{dimension} wise average age (in Yrs.)"),
        }
    }

    fn title(self) -> &'static str {
        match self {
            Metric::CriminalCases => "average no. of criminal cases",
            Metric::Assets => "average assets (in Cr.)",
            Metric::Age => "average age (in Yrs.)",
        }
    }

    fn axis_title(self) -> &'static str {
        match self {
            Metric::CriminalCases => "No. of Cases",
            Metric::Assets => "Assets (in Cr.)",
            Metric::Age => "Age (in Yrs.)",
        }
    }
}

/// Rounds half to even, like numpy does for the displayed values.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Builds the bar trace for one ranking.
pub fn trace(ranking: &Ranking, dimension: Dimension) -> Trace {
    let metric = ranking.metric;
    Trace {
        x: ranking.labels().map(str::to_owned).collect(),
        y: ranking
            .groups
            .iter()
            .map(|group| metric.present(group.mean))
            .collect(),
        name: metric.trace_name(dimension),
        ty: "bar",
        text: metric.unit(),
        marker: Marker {
            line: Line {
                color: BAR_OUTLINE_COLOR,
                width: 1.5,
            },
        },
        opacity: 0.7,
    }
}

/// Builds the static layout of the chart for `metric`.
///
/// Only the grouping dimension shows up in titles, the year is part of the dropdown instead.
pub fn layout(metric: Metric, dimension: Dimension) -> Layout {
    let mut yaxis = Axis::titled(format!("<i><b>{}</i></b>", metric.axis_title()));
    if metric == Metric::Age {
        yaxis.autorange = Some(false);
        yaxis.nticks = Some(10);
        yaxis.range = Some([30, 80]);
    }

    Layout {
        margin: (metric == Metric::CriminalCases).then_some(Margin { t: 100 }),
        title: format!("<b>{dimension} wise top 5 {}</b>", metric.title()),
        showlegend: false,
        xaxis: Axis::titled(format!("<i><b>{dimension}</i></b>")),
        yaxis,
    }
}

/// Builds the three figures for an aggregation, in the order of [`Metric::ALL`].
pub fn figures(aggregation: &Aggregation) -> [Figure; 3] {
    let dimension = aggregation.key.dimension;
    Metric::ALL.map(|metric| Figure {
        data: vec![trace(aggregation.ranking(metric), dimension)],
        layout: layout(metric, dimension),
    })
}
