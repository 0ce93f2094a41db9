//! Chart building for CAESAR-Lisflood timeseries output.
//!
//! Reads the whitespace-delimited files a simulation writes, picks a metric
//! column, converts timesteps into real time and gathers an ensemble of runs
//! into one [`EnsembleChart`] for an external renderer.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;

pub use chart::{format_axis_label, EnsembleChart, InsetBounds};
pub use color::Colormap;
pub use config::EnsembleConfig;
pub use data::label::LabelStrategy;
pub use data::loader::{extract, extract_named, load_measured};
pub use data::model::{InundationMetric, Metric, MetricSchema};
pub use data::time::{convert, convert_named, TimeUnit};
pub use ensemble::{run, run_config, Ensemble};
pub use error::{Error, Result};
