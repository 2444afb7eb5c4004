//! Starting parameters for a new city.

use serde::{Deserialize, Serialize};

use crate::{ValidationError, DEFAULT_TAX_RATE, DEFAULT_VAT_RATE, MAX_TAX_RATE, MAX_VAT_RATE};

/// Parameters a new city is created from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    /// Families living in the city on day zero.
    pub initial_families: usize,
    /// Starting budget in currency units.
    pub initial_budget: i64,
    /// Starting satisfaction in [0, 100].
    pub initial_satisfaction: i32,
    /// Income tax rate in [0, 0.4].
    pub tax_rate: f64,
    /// VAT rate in [0, 0.25].
    pub vat_rate: f64,
    /// Seed for the city's deterministic RNG.
    pub rng_seed: u64,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            initial_families: 10,
            initial_budget: 1000,
            initial_satisfaction: 50,
            tax_rate: DEFAULT_TAX_RATE,
            vat_rate: DEFAULT_VAT_RATE,
            rng_seed: 42,
        }
    }
}

/// Validate configuration fields before a city is built from them.
pub fn validate_config(cfg: &CityConfig) -> Result<(), ValidationError> {
    if !cfg.tax_rate.is_finite() {
        return Err(ValidationError::NonFinite("tax_rate"));
    }
    if !cfg.vat_rate.is_finite() {
        return Err(ValidationError::NonFinite("vat_rate"));
    }
    if !(0.0..=MAX_TAX_RATE).contains(&cfg.tax_rate) {
        return Err(ValidationError::RateOutOfRange {
            name: "tax_rate",
            value: cfg.tax_rate,
            max: MAX_TAX_RATE,
        });
    }
    if !(0.0..=MAX_VAT_RATE).contains(&cfg.vat_rate) {
        return Err(ValidationError::RateOutOfRange {
            name: "vat_rate",
            value: cfg.vat_rate,
            max: MAX_VAT_RATE,
        });
    }
    if !(0..=100).contains(&cfg.initial_satisfaction) {
        return Err(ValidationError::SatisfactionOutOfRange(
            cfg.initial_satisfaction,
        ));
    }
    Ok(())
}
