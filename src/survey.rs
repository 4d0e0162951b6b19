//! Survey layout: the Big Five questionnaire items and the demographic column

use crate::error::{OceanError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Categorical column holding the respondent's country code
pub const COUNTRY_COLUMN: &str = "country";

/// Item predicted by default ("I am the life of the party.")
pub const DEFAULT_TARGET: &str = "EXT1";

/// Number of items per trait
pub const ITEMS_PER_TRAIT: usize = 10;

/// Big Five trait, in questionnaire order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trait {
    Extraversion,
    EmotionalStability,
    Agreeableness,
    Conscientiousness,
    Openness,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Extraversion,
        Trait::EmotionalStability,
        Trait::Agreeableness,
        Trait::Conscientiousness,
        Trait::Openness,
    ];

    /// Column prefix used in the survey export
    pub fn prefix(&self) -> &'static str {
        match self {
            Trait::Extraversion => "EXT",
            Trait::EmotionalStability => "EST",
            Trait::Agreeableness => "AGR",
            Trait::Conscientiousness => "CSN",
            Trait::Openness => "OPN",
        }
    }

    /// Column names for this trait's items, `EXT1..EXT10` style
    pub fn items(&self) -> Vec<String> {
        (1..=ITEMS_PER_TRAIT)
            .map(|i| format!("{}{}", self.prefix(), i))
            .collect()
    }
}

/// The 50 numeric item columns in declared order
pub fn item_columns() -> Vec<String> {
    Trait::ALL.iter().flat_map(|t| t.items()).collect()
}

/// Check that every required column is present in the loaded frame.
///
/// The CSV reader never fails on a wrong delimiter, it just produces one wide
/// string column, so this is where that mistake gets reported.
pub fn validate_columns(df: &DataFrame, categorical: &str, numeric: &[String]) -> Result<()> {
    let present: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let missing: Vec<&str> = std::iter::once(categorical)
        .chain(numeric.iter().map(|s| s.as_str()))
        .filter(|name| !present.iter().any(|p| p == name))
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    let expected = numeric.len() + 1;
    let mut msg = format!(
        "expected {} columns ({} + {} numeric items), {} missing: {}",
        expected,
        categorical,
        numeric.len(),
        missing.len(),
        missing.join(", ")
    );
    if df.width() == 1 {
        msg.push_str("; the file parsed as a single column, check the delimiter");
    }
    Err(OceanError::SchemaError(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_columns_order() {
        let cols = item_columns();
        assert_eq!(cols.len(), 50);
        assert_eq!(cols[0], "EXT1");
        assert_eq!(cols[9], "EXT10");
        assert_eq!(cols[10], "EST1");
        assert_eq!(cols[49], "OPN10");
    }

    #[test]
    fn test_validate_reports_missing() {
        let df = df!("country" => &["US"], "EXT1" => &[3.0]).unwrap();
        let err = validate_columns(&df, COUNTRY_COLUMN, &item_columns()).unwrap_err();
        match err {
            OceanError::SchemaError(msg) => {
                assert!(msg.contains("49 missing"));
                assert!(msg.contains("OPN10"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_hints_delimiter() {
        let df = df!("country,EXT1" => &["US,3"]).unwrap();
        let err = validate_columns(&df, COUNTRY_COLUMN, &item_columns()).unwrap_err();
        assert!(err.to_string().contains("delimiter"));
    }
}
