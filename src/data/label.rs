use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Every strategy indexes up to the fourth token.
const REQUIRED_TOKENS: usize = 4;

/// How a series label is built from a run's file name.
///
/// File names are expected to look like `<param>_<run>_<variant>.dat`; the
/// convention is not validated beyond the token count. There is no default:
/// callers choose one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LabelStrategy {
    /// Split on `_` and `.`, label `tokens[2] + "_" + tokens[3]`.
    RunVariant,
    /// Split on `_` and `.`, label `"M = " + tokens[0]`.
    ModelParameter,
    /// Drop the extension, split the stem on `_`, label `parts[2] + "_" + parts[3]`.
    StemParts,
}

impl LabelStrategy {
    pub const ALL: [LabelStrategy; 3] = [
        LabelStrategy::RunVariant,
        LabelStrategy::ModelParameter,
        LabelStrategy::StemParts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelStrategy::RunVariant => "run_variant",
            LabelStrategy::ModelParameter => "model_parameter",
            LabelStrategy::StemParts => "stem_parts",
        }
    }

    /// Build the label for a file name (basename, not a full path).
    pub fn label(self, file_name: &str) -> Result<String> {
        let tokens: Vec<&str> = match self {
            LabelStrategy::RunVariant | LabelStrategy::ModelParameter => {
                file_name.split(['_', '.']).collect()
            }
            LabelStrategy::StemParts => {
                let stem = Path::new(file_name)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(file_name);
                stem.split('_').collect()
            }
        };

        if tokens.len() < REQUIRED_TOKENS {
            return Err(Error::LabelTokens {
                name: file_name.to_string(),
                found: tokens.len(),
                required: REQUIRED_TOKENS,
            });
        }

        let label = match self {
            LabelStrategy::ModelParameter => format!("M = {}", tokens[0]),
            LabelStrategy::RunVariant | LabelStrategy::StemParts => {
                format!("{}_{}", tokens[2], tokens[3])
            }
        };
        log::debug!("{file_name} -> {label}");
        Ok(label)
    }
}

impl fmt::Display for LabelStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LabelStrategy::ALL
            .into_iter()
            .find(|l| l.name() == s)
            .ok_or_else(|| Error::UnknownLabelStrategy(s.to_string()))
    }
}

impl TryFrom<String> for LabelStrategy {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_routines_on_same_name() {
        let name = "20_run03_variantA.dat";
        assert_eq!(LabelStrategy::RunVariant.label(name).unwrap(), "variantA_dat");
        assert_eq!(LabelStrategy::ModelParameter.label(name).unwrap(), "M = 20");
    }

    #[test]
    fn test_stem_parts_drops_extension() {
        let name = "boscastle_inundation_m_0.005.txt";
        assert_eq!(LabelStrategy::StemParts.label(name).unwrap(), "m_0.005");
    }

    #[test]
    fn test_too_few_tokens() {
        let err = LabelStrategy::ModelParameter.label("ryedale.dat").unwrap_err();
        match err {
            Error::LabelTokens { found, required, .. } => {
                assert_eq!(found, 2);
                assert_eq!(required, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(LabelStrategy::StemParts.label("a_b_c.dat").is_err());
    }

    #[test]
    fn test_empty_tokens_count() {
        // "a__b.dat" splits into ["a", "", "b", "dat"]
        assert_eq!(LabelStrategy::RunVariant.label("a__b.dat").unwrap(), "b_dat");
    }

    #[test]
    fn test_parse_strategy() {
        assert_eq!("model_parameter".parse::<LabelStrategy>().unwrap(), LabelStrategy::ModelParameter);
        assert!(matches!(
            "canonical".parse::<LabelStrategy>().unwrap_err(),
            Error::UnknownLabelStrategy(_)
        ));
    }
}
