#![deny(warnings)]

//! Score a city from its public accessors: higher is better.
//!
//! The standard weighting is `families×50 + budget/20 + satisfaction×2`.
//! The legacy weighting `families×10 + budget/10 + satisfaction×5 + days×2`
//! is kept for comparing against older highscores.

use city_runtime::City;
use serde::{Deserialize, Serialize};

/// Weighting used to turn a city into a score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFormula {
    #[default]
    Standard,
    Legacy,
}

/// Raw figures a score is computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInputs {
    /// Families living in the city.
    pub families: i64,
    /// Budget at the end of the run.
    pub budget: i64,
    /// Satisfaction level in [0, 100].
    pub satisfaction: i64,
    /// Day counter the city reached.
    pub days: i64,
}

impl ScoreInputs {
    pub fn of(city: &City) -> Self {
        Self {
            families: i64::try_from(city.families()).unwrap_or(i64::MAX),
            budget: city.budget(),
            satisfaction: i64::from(city.satisfaction()),
            days: i64::from(city.day()),
        }
    }
}

/// Score under `formula`. Saturates instead of overflowing.
pub fn score_inputs(inputs: ScoreInputs, formula: ScoreFormula) -> i64 {
    let ScoreInputs {
        families,
        budget,
        satisfaction,
        days,
    } = inputs;
    match formula {
        ScoreFormula::Standard => families
            .saturating_mul(50)
            .saturating_add(budget / 20)
            .saturating_add(satisfaction * 2),
        ScoreFormula::Legacy => families
            .saturating_mul(10)
            .saturating_add(budget / 10)
            .saturating_add(satisfaction * 5)
            .saturating_add(days.saturating_mul(2)),
    }
}

/// Score of `city` under the standard weighting.
pub fn score(city: &City) -> i64 {
    score_with(city, ScoreFormula::Standard)
}

pub fn score_with(city: &City, formula: ScoreFormula) -> i64 {
    score_inputs(ScoreInputs::of(city), formula)
}
