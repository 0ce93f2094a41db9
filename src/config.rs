use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::chart::InsetBounds;
use crate::color::Colormap;
use crate::data::label::LabelStrategy;
use crate::data::model::Metric;
use crate::data::time::TimeUnit;
use crate::ensemble::check_pattern;
use crate::error::{Error, Result};

/// Settings for one ensemble plotting session.
///
/// Loaded from JSON; everything except `data_dir` and `label_strategy` has a
/// default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnsembleConfig {
    /// Directory holding the timeseries files.
    pub data_dir: PathBuf,
    /// Wildcard matched against file names in `data_dir`.
    #[serde(default = "EnsembleConfig::default_pattern")]
    pub pattern: String,
    #[serde(default = "EnsembleConfig::default_metric")]
    pub metric: Metric,
    /// Minutes between consecutive output timesteps.
    #[serde(default = "EnsembleConfig::default_time_delta")]
    pub time_delta: f64,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub colormap: Colormap,
    pub label_strategy: LabelStrategy,
    #[serde(default)]
    pub draw_inset: bool,
    #[serde(default)]
    pub inset: InsetBounds,
    #[serde(default)]
    pub line_labels: bool,
    #[serde(default = "EnsembleConfig::default_line_label_x")]
    pub line_label_x: Vec<f64>,
    /// Gauging-station CSV; relative paths are resolved against `data_dir`.
    #[serde(default)]
    pub measured_data: Option<PathBuf>,
}

impl EnsembleConfig {
    fn default_pattern() -> String {
        "*.dat".to_string()
    }
    fn default_metric() -> Metric {
        Metric::QLisflood
    }
    fn default_time_delta() -> f64 {
        60.0
    }
    fn default_line_label_x() -> Vec<f64> {
        vec![44.3, 45.8, 48.0, 52.0, 56.0, 60.0]
    }

    /// Defaults for everything but the two required fields.
    pub fn new(data_dir: impl Into<PathBuf>, label_strategy: LabelStrategy) -> Self {
        Self {
            data_dir: data_dir.into(),
            pattern: Self::default_pattern(),
            metric: Self::default_metric(),
            time_delta: Self::default_time_delta(),
            time_unit: TimeUnit::default(),
            colormap: Colormap::default(),
            label_strategy,
            draw_inset: false,
            inset: InsetBounds::default(),
            line_labels: false,
            line_label_x: Self::default_line_label_x(),
            measured_data: None,
        }
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.time_delta.is_finite() && self.time_delta > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "time_delta must be a positive number of minutes, got {}",
                self.time_delta
            )));
        }
        check_pattern(&self.pattern)?;
        if let Some(x) = self.line_label_x.iter().find(|x| !x.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "line_label_x positions must be finite, got {x}"
            )));
        }
        let b = &self.inset;
        if !(b.x_min < b.x_max && b.y_min < b.y_max) {
            return Err(Error::InvalidConfig(format!(
                "inset range is empty: x {}..{}, y {}..{}",
                b.x_min, b.x_max, b.y_min, b.y_max
            )));
        }
        if !(b.zoom.is_finite() && b.zoom > 0.0) {
            return Err(Error::InvalidConfig(format!("inset zoom must be positive, got {}", b.zoom)));
        }
        Ok(())
    }

    pub fn measured_data_path(&self) -> Option<PathBuf> {
        self.measured_data.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.data_dir.join(p)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_minimal_config_takes_defaults() {
        let f = write_config(r#"{ "data_dir": "/data/ryedale", "label_strategy": "model_parameter" }"#);
        let cfg = EnsembleConfig::load(f.path()).unwrap();
        assert_eq!(cfg, EnsembleConfig::new("/data/ryedale", LabelStrategy::ModelParameter));
        assert_eq!(cfg.pattern, "*.dat");
        assert_eq!(cfg.time_unit, TimeUnit::Hours);
        assert_eq!(cfg.inset, InsetBounds::default());
    }

    #[test]
    fn test_full_config() {
        let f = write_config(
            r#"{
                "data_dir": "/data",
                "pattern": "ryedale_*.dat",
                "metric": "d3",
                "time_delta": 30,
                "time_unit": "days",
                "colormap": "gray",
                "label_strategy": "run_variant",
                "draw_inset": true,
                "inset": { "x_min": 1, "x_max": 2 },
                "line_labels": true,
                "line_label_x": [1.5],
                "measured_data": "gauge.csv"
            }"#,
        );
        let cfg = EnsembleConfig::load(f.path()).unwrap();
        assert_eq!(cfg.metric, Metric::D3);
        assert_eq!(cfg.time_unit, TimeUnit::Days);
        assert_eq!(cfg.colormap, Colormap::Gray);
        assert_eq!(cfg.inset.x_max, 2.0);
        assert_eq!(cfg.inset.y_max, 30.0);
        assert_eq!(cfg.measured_data_path(), Some(PathBuf::from("/data/gauge.csv")));
    }

    #[test]
    fn test_missing_label_strategy_is_an_error() {
        let f = write_config(r#"{ "data_dir": "/data" }"#);
        assert!(matches!(EnsembleConfig::load(f.path()).unwrap_err(), Error::Config { .. }));
    }

    #[test]
    fn test_unknown_time_unit_is_an_error() {
        let f = write_config(
            r#"{ "data_dir": "/d", "label_strategy": "run_variant", "time_unit": "fortnights" }"#,
        );
        let err = EnsembleConfig::load(f.path()).unwrap_err();
        assert!(err.to_string().contains("fortnights"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = EnsembleConfig::new("/d", LabelStrategy::RunVariant);
        cfg.time_delta = 0.0;
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = EnsembleConfig::new("/d", LabelStrategy::RunVariant);
        cfg.inset.x_min = 80.0;
        assert!(cfg.validate().is_err());

        let mut cfg = EnsembleConfig::new("/d", LabelStrategy::RunVariant);
        cfg.pattern = "runs/*.dat".to_string();
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        let mut cfg = EnsembleConfig::new("/d", LabelStrategy::RunVariant);
        cfg.line_label_x = vec![44.3, f64::NAN];
        assert!(matches!(cfg.validate(), Err(Error::InvalidConfig(_))));

        assert!(EnsembleConfig::new("/d", LabelStrategy::RunVariant).validate().is_ok());
    }
}
