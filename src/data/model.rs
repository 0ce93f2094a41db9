use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

// ---------------------------------------------------------------------------
// MetricSchema – how a file layout maps onto named series
// ---------------------------------------------------------------------------

/// A closed set of metrics stored in one fixed-column file layout.
///
/// `USECOLS` lists the file columns read from every row, in the order the
/// loader hands them back. Position 0 is always the raw timestep.
pub trait MetricSchema: Copy + fmt::Display {
    const USECOLS: &'static [usize];

    /// Select (or derive) this metric's series from the loaded columns.
    /// `columns[i]` holds file column `USECOLS[i]`.
    fn series(self, columns: &[Vec<f64>]) -> Vec<f64>;

    /// Axis caption for this metric.
    fn caption(self) -> &'static str;
}

/// Position of the timestep within every schema's `USECOLS`.
pub const TIME_STEP: usize = 0;

// ---------------------------------------------------------------------------
// Metric – CAESAR-Lisflood timeseries (.dat) columns
// ---------------------------------------------------------------------------

/// File columns of a CAESAR-Lisflood timeseries file.
///
/// Column 3 is never read.
pub mod caesar_columns {
    pub const TIME_STEP: usize = 0;
    pub const Q_LISFLOOD: usize = 1;
    pub const Q_TOPMODEL: usize = 2;
    pub const SED_TOT: usize = 4;
    pub const GRAIN_SIZE: [usize; 9] = [5, 6, 7, 8, 9, 10, 11, 12, 13];
}

// Positions within `Metric::USECOLS`.
const Q_LISFLOOD_POS: usize = 1;
const Q_TOPMODEL_POS: usize = 2;
const SED_TOT_POS: usize = 3;
const D1_POS: usize = 4;

/// A data metric that can be plotted from a CAESAR-Lisflood timeseries file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Metric {
    QLisflood,
    QTopmodel,
    SedTot,
    D1,
    D2,
    D3,
    D4,
    D5,
    D6,
    D7,
    D8,
    D9,
    /// Running total of `sed_tot`; not stored in the file.
    CumulativeSedTot,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::QLisflood,
        Metric::QTopmodel,
        Metric::SedTot,
        Metric::D1,
        Metric::D2,
        Metric::D3,
        Metric::D4,
        Metric::D5,
        Metric::D6,
        Metric::D7,
        Metric::D8,
        Metric::D9,
        Metric::CumulativeSedTot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::QLisflood => "q_lisflood",
            Metric::QTopmodel => "q_topmodel",
            Metric::SedTot => "sed_tot",
            Metric::D1 => "d1",
            Metric::D2 => "d2",
            Metric::D3 => "d3",
            Metric::D4 => "d4",
            Metric::D5 => "d5",
            Metric::D6 => "d6",
            Metric::D7 => "d7",
            Metric::D8 => "d8",
            Metric::D9 => "d9",
            Metric::CumulativeSedTot => "cumulative_sed_tot",
        }
    }
}

impl MetricSchema for Metric {
    const USECOLS: &'static [usize] = &[
        caesar_columns::TIME_STEP,
        caesar_columns::Q_LISFLOOD,
        caesar_columns::Q_TOPMODEL,
        caesar_columns::SED_TOT,
        caesar_columns::GRAIN_SIZE[0],
        caesar_columns::GRAIN_SIZE[1],
        caesar_columns::GRAIN_SIZE[2],
        caesar_columns::GRAIN_SIZE[3],
        caesar_columns::GRAIN_SIZE[4],
        caesar_columns::GRAIN_SIZE[5],
        caesar_columns::GRAIN_SIZE[6],
        caesar_columns::GRAIN_SIZE[7],
        caesar_columns::GRAIN_SIZE[8],
    ];

    fn series(self, columns: &[Vec<f64>]) -> Vec<f64> {
        let pos = match self {
            Metric::QLisflood => Q_LISFLOOD_POS,
            Metric::QTopmodel => Q_TOPMODEL_POS,
            Metric::SedTot => SED_TOT_POS,
            Metric::CumulativeSedTot => return cumulative_sum(&columns[SED_TOT_POS]),
            Metric::D1 => D1_POS,
            Metric::D2 => D1_POS + 1,
            Metric::D3 => D1_POS + 2,
            Metric::D4 => D1_POS + 3,
            Metric::D5 => D1_POS + 4,
            Metric::D6 => D1_POS + 5,
            Metric::D7 => D1_POS + 6,
            Metric::D8 => D1_POS + 7,
            Metric::D9 => D1_POS + 8,
        };
        columns[pos].clone()
    }

    fn caption(self) -> &'static str {
        match self {
            Metric::QLisflood => "water discharge (m³ s⁻¹)",
            Metric::QTopmodel => "water (TOPMODEL) discharge (m³ s⁻¹)",
            Metric::SedTot => "sediment flux (m³)",
            Metric::D1 => "d1 proportion",
            Metric::D2 => "d2 proportion",
            Metric::D3 => "d3 proportion",
            Metric::D4 => "d4 proportion",
            Metric::D5 => "d5 proportion",
            Metric::D6 => "d6 proportion",
            Metric::D7 => "d7 proportion",
            Metric::D8 => "d8 proportion",
            Metric::D9 => "d9 proportion",
            Metric::CumulativeSedTot => "Cumulative sediment yield (m³)",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for Metric {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Inclusive running sum: `out[i] = values[0] + ... + values[i]`.
pub fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .scan(0.0, |acc, &v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// InundationMetric – inundation metric generator output
// ---------------------------------------------------------------------------

/// Columns written by the inundation metric generator, one file per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum InundationMetric {
    InundationArea,
    CatchmentDepth,
    FloodplainDepth,
    ChannelDepth,
}

impl InundationMetric {
    pub const ALL: [InundationMetric; 4] = [
        InundationMetric::InundationArea,
        InundationMetric::CatchmentDepth,
        InundationMetric::FloodplainDepth,
        InundationMetric::ChannelDepth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InundationMetric::InundationArea => "inundation_area",
            InundationMetric::CatchmentDepth => "catchment_depth",
            InundationMetric::FloodplainDepth => "floodplain_depth",
            InundationMetric::ChannelDepth => "channel_depth",
        }
    }
}

impl MetricSchema for InundationMetric {
    const USECOLS: &'static [usize] = &[0, 1, 2, 3, 4];

    fn series(self, columns: &[Vec<f64>]) -> Vec<f64> {
        let pos = match self {
            InundationMetric::InundationArea => 1,
            InundationMetric::CatchmentDepth => 2,
            InundationMetric::FloodplainDepth => 3,
            InundationMetric::ChannelDepth => 4,
        };
        columns[pos].clone()
    }

    fn caption(self) -> &'static str {
        match self {
            InundationMetric::InundationArea => "inundated area (m²)",
            InundationMetric::CatchmentDepth => "mean catchment water depth (m)",
            InundationMetric::FloodplainDepth => "mean floodplain water depth (m)",
            InundationMetric::ChannelDepth => "mean channel water depth (m)",
        }
    }
}

impl fmt::Display for InundationMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InundationMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InundationMetric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownMetric(s.to_string()))
    }
}

impl TryFrom<String> for InundationMetric {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
