use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::data::model::MetricSchema;
use crate::data::time::{convert, TimeUnit};
use crate::error::{Error, Result};

const ENSEMBLE_LINE_WIDTH: f32 = 1.5;
const ENSEMBLE_LINE_ALPHA: f32 = 0.5;
const MEASURED_LINE_WIDTH: f32 = 2.0;
const MEASURED_LABEL: &str = "Measured";

// ---------------------------------------------------------------------------
// Axis captions
// ---------------------------------------------------------------------------

/// `(x_label, y_label)` for a chart of `metric` against time in `unit`.
pub fn format_axis_label<M: MetricSchema>(metric: M, unit: TimeUnit) -> (String, String) {
    (
        format!("Simulated time ({unit})"),
        metric.caption().to_string(),
    )
}

// ---------------------------------------------------------------------------
// Chart building blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    /// Converted time.
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Position in the ensemble colour cycle; `None` for series outside it.
    pub color_index: Option<usize>,
    pub color: Rgb,
    pub style: LineStyle,
    pub width: f32,
    pub alpha: f32,
}

/// Fixed coordinate window of the zoomed inset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsetBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Magnification relative to the parent axes.
    pub zoom: f64,
}

impl Default for InsetBounds {
    fn default() -> Self {
        Self {
            x_min: 40.0,
            x_max: 70.0,
            y_min: 5.0,
            y_max: 30.0,
            zoom: 3.5,
        }
    }
}

/// Secondary view repeating every ensemble series over [`InsetBounds`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsetView {
    pub bounds: InsetBounds,
    pub series: Vec<Series>,
}

/// Where an in-line label for one series should be drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelAnchor {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

// ---------------------------------------------------------------------------
// EnsembleChart
// ---------------------------------------------------------------------------

/// The chart state of one plotting session, independent of rendering.
///
/// Every builder step takes the chart by value and returns it. The caller
/// owns the result and hands it to a renderer (see [`EnsembleChart::to_json`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnsembleChart {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
    pub inset: Option<InsetView>,
    pub line_labels: Vec<LabelAnchor>,
    /// Colour cycle shared by the main axes and the inset.
    pub colors: Vec<Rgb>,
    #[serde(skip)]
    time_delta: f64,
    #[serde(skip)]
    time_unit: TimeUnit,
}

impl EnsembleChart {
    /// Empty chart with a colour cycle and the time conversion used for
    /// data added later via [`EnsembleChart::with_measured`].
    pub fn new(colors: Vec<Rgb>, time_delta: f64, time_unit: TimeUnit) -> Self {
        Self {
            x_label: format!("Simulated time ({time_unit})"),
            y_label: String::new(),
            series: Vec::new(),
            inset: None,
            line_labels: Vec::new(),
            colors,
            time_delta,
            time_unit,
        }
    }

    pub fn with_inset(mut self, bounds: InsetBounds) -> Self {
        self.inset = Some(InsetView {
            bounds,
            series: Vec::new(),
        });
        self
    }

    /// Append an ensemble series. It takes the next colour in the cycle and
    /// is repeated in the inset when one exists.
    pub fn with_series(mut self, label: impl Into<String>, x: Vec<f64>, y: Vec<f64>) -> Self {
        let index = self
            .series
            .iter()
            .filter(|s| s.color_index.is_some())
            .count();
        let color = if self.colors.is_empty() {
            Rgb::BLACK
        } else {
            self.colors[index % self.colors.len()]
        };

        let series = Series {
            label: label.into(),
            x,
            y,
            color_index: Some(index),
            color,
            style: LineStyle::Solid,
            width: ENSEMBLE_LINE_WIDTH,
            alpha: ENSEMBLE_LINE_ALPHA,
        };

        if let Some(inset) = &mut self.inset {
            inset.series.push(series.clone());
        }
        self.series.push(series);
        self
    }

    /// Set both axis captions from `metric` and the chart's time unit.
    pub fn with_axis_labels<M: MetricSchema>(mut self, metric: M) -> Self {
        let (x_label, y_label) = format_axis_label(metric, self.time_unit);
        self.x_label = x_label;
        self.y_label = y_label;
        self
    }

    /// Append externally measured data (raw timesteps, values) as a dashed
    /// black line outside the colour cycle.
    pub fn with_measured(mut self, raw_time: &[f64], values: Vec<f64>) -> Self {
        let x = convert(raw_time, self.time_delta, self.time_unit);
        self.series.push(Series {
            label: MEASURED_LABEL.to_string(),
            x,
            y: values,
            color_index: None,
            color: Rgb::BLACK,
            style: LineStyle::Dashed,
            width: MEASURED_LINE_WIDTH,
            alpha: 1.0,
        });
        self
    }

    /// Store in-line label anchors computed by [`EnsembleChart::line_label_anchors`].
    pub fn with_line_labels(mut self, x_positions: &[f64]) -> Self {
        self.line_labels = self.line_label_anchors(x_positions);
        self
    }

    /// Pair ensemble series with x positions in order and place each label on
    /// its line.
    ///
    /// Only series in the colour cycle are labelled, so measured data never
    /// takes a position. Series or positions without a partner are ignored, as
    /// are empty series and non-finite positions.
    pub fn line_label_anchors(&self, x_positions: &[f64]) -> Vec<LabelAnchor> {
        self.series
            .iter()
            .filter(|s| s.color_index.is_some())
            .zip(x_positions)
            .filter_map(|(s, &x)| {
                interpolate(&s.x, &s.y, x).map(|y| LabelAnchor {
                    label: s.label.clone(),
                    x,
                    y,
                })
            })
            .collect()
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Piecewise-linear interpolation over increasing `xs`, clamped to the end
/// values outside the data range.
fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || !x.is_finite() {
        return None;
    }
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[n - 1] {
        return Some(ys[n - 1]);
    }
    let hi = xs[..n].partition_point(|&v| v <= x);
    let lo = hi.checked_sub(1)?;
    let span = xs[hi] - xs[lo];
    if span == 0.0 {
        return Some(ys[lo]);
    }
    let t = (x - xs[lo]) / span;
    Some(ys[lo] + t * (ys[hi] - ys[lo]))
}
