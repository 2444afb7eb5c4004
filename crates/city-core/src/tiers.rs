//! City-size difficulty tiers.
//!
//! Thresholds are strict "more than" comparisons on the family count and do
//! not stack: the highest tier reached wins.

use serde::{Deserialize, Serialize};

/// Difficulty tier derived from the number of families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Up to 50 families.
    Village,
    /// More than 50 families.
    Town,
    /// More than 100 families.
    City,
    /// More than 200 families.
    Metropolis,
}

impl Difficulty {
    pub fn for_families(families: usize) -> Self {
        match families {
            n if n > 200 => Difficulty::Metropolis,
            n if n > 100 => Difficulty::City,
            n if n > 50 => Difficulty::Town,
            _ => Difficulty::Village,
        }
    }

    /// Multiplier applied to every family's computed income.
    pub fn income_multiplier(self) -> f64 {
        match self {
            Difficulty::Village => 1.0,
            Difficulty::Town => 0.95,
            Difficulty::City => 0.90,
            Difficulty::Metropolis => 0.85,
        }
    }

    /// Multiplier applied on top of the upkeep size factor.
    pub fn expense_multiplier(self) -> f64 {
        match self {
            Difficulty::Village => 1.0,
            Difficulty::Town => 1.05,
            Difficulty::City => 1.10,
            Difficulty::Metropolis => 1.15,
        }
    }

    /// Size multiplier for upkeep and construction prices.
    pub fn size_multiplier(self) -> f64 {
        match self {
            Difficulty::Village => 1.0,
            Difficulty::Town => 1.15,
            Difficulty::City => 1.3,
            Difficulty::Metropolis => 1.5,
        }
    }

    /// Upkeep factor: size multiplier compounded with the expense multiplier.
    pub fn upkeep_factor(self) -> f64 {
        self.size_multiplier() * self.expense_multiplier()
    }

    /// Per-family share of the flat city-services cost.
    pub fn per_family_service_cost(self) -> f64 {
        match self {
            Difficulty::Village => 3.0,
            Difficulty::Town => 4.0,
            Difficulty::City => 6.0,
            Difficulty::Metropolis => 8.0,
        }
    }
}
