#![deny(warnings)]

//! Core domain models and invariants for the city simulation.
//!
//! This crate defines the serializable building catalog, the family pool,
//! service capacity aggregation and the difficulty tiers shared by the
//! economic and runtime crates. Everything here is deterministic; any
//! randomness is drawn from an RNG supplied by the caller.

pub mod building;
pub mod capacity;
pub mod catalog;
pub mod config;
pub mod family;
pub mod tiers;

pub use building::Building;
pub use capacity::{coverage, Coverage, ServiceCapacity};
pub use catalog::{construction_cost, BuildingKind, BuildingSpec};
pub use config::{validate_config, CityConfig};
pub use family::{EmploymentChange, Family, FamilyPool, IncomeFactors};
pub use tiers::Difficulty;

use thiserror::Error;

/// Errors raised by mutating operations on the city.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CityError {
    /// The requested building kind is not part of the catalog.
    #[error("unknown building kind: {0}")]
    UnknownBuildingKind(String),
}

/// Validation errors for configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered in {0}")]
    NonFinite(&'static str),
    /// Satisfaction must be within [0, 100].
    #[error("satisfaction {0} is out of range [0, 100]")]
    SatisfactionOutOfRange(i32),
    /// Rate must be within its documented range.
    #[error("{name} {value} is out of range [0, {max}]")]
    RateOutOfRange {
        name: &'static str,
        value: f64,
        max: f64,
    },
}

/// Highest income tax rate the city accepts.
pub const MAX_TAX_RATE: f64 = 0.4;
/// Highest VAT rate the city accepts.
pub const MAX_VAT_RATE: f64 = 0.25;
/// Income tax rate considered neutral by citizens.
pub const DEFAULT_TAX_RATE: f64 = 0.10;
/// VAT rate considered neutral by citizens.
pub const DEFAULT_VAT_RATE: f64 = 0.05;

/// Clamp an income tax rate into `[0, MAX_TAX_RATE]`. NaN maps to zero.
pub fn clamp_tax_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, MAX_TAX_RATE)
}

/// Clamp a VAT rate into `[0, MAX_VAT_RATE]`. NaN maps to zero.
pub fn clamp_vat_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, MAX_VAT_RATE)
}
