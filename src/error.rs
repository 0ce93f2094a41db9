use std::num::ParseFloatError;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Crate error type
// ---------------------------------------------------------------------------

/// Everything that can abort a plotting session.
///
/// No variant is recovered from inside the crate: the first failure is
/// returned to the caller and the current invocation stops.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown data metric: {0}")]
    UnknownMetric(String),

    #[error("Your selected time units are not supported: {0}")]
    UnsupportedTimeUnit(String),

    #[error("unknown colormap: {0}")]
    UnknownColormap(String),

    #[error("unknown line label strategy: {0}")]
    UnknownLabelStrategy(String),

    #[error("file name '{name}' has {found} label tokens, at least {required} expected")]
    LabelTokens {
        name: String,
        found: usize,
        required: usize,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: row has {found} columns, at least {required} expected", path.display())]
    ShortRow {
        path: PathBuf,
        line: usize,
        found: usize,
        required: usize,
    },

    #[error("{}:{line}: column {column}: '{token}' is not a number", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("measured data {}: {source}", path.display())]
    MeasuredData {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serializing chart: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
