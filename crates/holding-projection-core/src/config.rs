use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate, Year};

/// Horizon used when the caller does not ask for one.
pub const DEFAULT_HORIZON_YEARS: u32 = 20;

/// Longest projection accepted, in years.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Calendar years accepted for entity creation and property purchases.
pub const MIN_YEAR: Year = 1900;
pub const MAX_YEAR: Year = 2200;

/// Straight-line depreciation durations, in years, per asset base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepreciationDurations {
    /// Building structure (purchase price net of renovation)
    pub building: u32,
    pub renovation: u32,
    pub furniture: u32,
    pub notary_fees: u32,
    pub agency_fees: u32,
}

impl Default for DepreciationDurations {
    fn default() -> Self {
        Self {
            building: 30,
            renovation: 15,
            furniture: 7,
            notary_fees: 5,
            agency_fees: 30,
        }
    }
}

/// Two-bracket corporate tax schedule.
///
/// The reduced rate applies to the first `threshold` of taxable profit and the
/// standard rate to any excess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorporateTaxRules {
    pub threshold: Money,
    pub reduced_rate: Rate,
    pub standard_rate: Rate,
}

impl Default for CorporateTaxRules {
    fn default() -> Self {
        Self {
            threshold: dec!(42500),
            reduced_rate: dec!(0.15),
            standard_rate: dec!(0.25),
        }
    }
}

/// Tunable assumptions of a projection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub depreciation: DepreciationDurations,
    pub tax: CorporateTaxRules,
    pub horizon_years: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            depreciation: DepreciationDurations::default(),
            tax: CorporateTaxRules::default(),
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let cfg: ProjectionConfig =
            serde_json::from_str(r#"{ "depreciation": { "building": 40 } }"#).unwrap();
        assert_eq!(cfg.depreciation.building, 40);
        assert_eq!(cfg.depreciation.renovation, 15);
        assert_eq!(cfg.tax.threshold, dec!(42500));
        assert_eq!(cfg.horizon_years, DEFAULT_HORIZON_YEARS);
    }

    #[test]
    fn test_tax_rates_accept_string_decimals() {
        let rules: CorporateTaxRules =
            serde_json::from_str(r#"{ "reduced_rate": "0.10" }"#).unwrap();
        assert_eq!(rules.reduced_rate, dec!(0.10));
        assert_eq!(rules.standard_rate, dec!(0.25));
    }
}
