use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

const MINUTES_PER_HOUR: f64 = 60.0;
const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_YEAR: f64 = 365.25;

/// Units a raw model timestep can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum TimeUnit {
    Minutes,
    #[default]
    Hours,
    Days,
    Years,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
        TimeUnit::Years,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
            TimeUnit::Years => "years",
        }
    }

    /// Convert a duration in minutes into this unit.
    fn scale_minutes(self, minutes: f64) -> f64 {
        let hours = minutes / MINUTES_PER_HOUR;
        let days = hours / HOURS_PER_DAY;
        match self {
            TimeUnit::Minutes => minutes,
            TimeUnit::Hours => hours,
            TimeUnit::Days => days,
            TimeUnit::Years => days / DAYS_PER_YEAR,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TimeUnit::ALL
            .into_iter()
            .find(|u| u.label() == s)
            .ok_or_else(|| Error::UnsupportedTimeUnit(s.to_string()))
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Convert unitless model timesteps into `unit`.
///
/// `time_delta` is the number of minutes between consecutive timesteps in the
/// output file. It cannot be inferred from the file and must be supplied.
pub fn convert(raw: &[f64], time_delta: f64, unit: TimeUnit) -> Vec<f64> {
    raw.iter()
        .map(|&t| unit.scale_minutes(t * time_delta))
        .collect()
}

/// [`convert`] with the unit given by name.
pub fn convert_named(raw: &[f64], time_delta: f64, unit_label: &str) -> Result<Vec<f64>> {
    let unit: TimeUnit = unit_label.parse()?;
    Ok(convert(raw, time_delta, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_minutes_is_exact_product() {
        let raw = [0.0, 1.0, 2.5, 7.0, 1e6];
        for delta in [0.5, 1.0, 60.0, 17.3] {
            let out = convert(&raw, delta, TimeUnit::Minutes);
            for (o, r) in out.iter().zip(raw) {
                assert_eq!(*o, r * delta);
            }
        }
    }

    #[test]
    fn test_hourly_output_in_hours() {
        assert_eq!(convert(&[1.0, 2.0, 3.0], 60.0, TimeUnit::Hours), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_days_and_years_chain() {
        let days = convert(&[24.0], 60.0, TimeUnit::Days);
        assert!((days[0] - 1.0).abs() < TOL);

        let years = convert(&[365.25 * 24.0], 60.0, TimeUnit::Years);
        assert!((years[0] - 1.0).abs() < TOL);
    }

    #[test]
    fn test_conversion_is_strictly_monotonic() {
        let raw: Vec<f64> = (0..50).map(|i| i as f64 * 3.0).collect();
        for unit in TimeUnit::ALL {
            for delta in [0.25, 1.0, 60.0, 1440.0] {
                let out = convert(&raw, delta, unit);
                assert_eq!(out.len(), raw.len());
                assert!(out.windows(2).all(|w| w[1] > w[0]), "{unit} {delta}");
            }
        }
    }

    #[test]
    fn test_unsupported_unit_names_value() {
        let err = convert_named(&[1.0], 60.0, "weeks").unwrap_err();
        assert!(matches!(err, Error::UnsupportedTimeUnit(ref u) if u == "weeks"));
        assert!(err.to_string().contains("weeks"));
    }

    #[test]
    fn test_named_conversion_matches_typed() {
        let raw = [1.0, 10.0];
        for unit in TimeUnit::ALL {
            assert_eq!(
                convert_named(&raw, 15.0, unit.label()).unwrap(),
                convert(&raw, 15.0, unit)
            );
        }
    }
}
