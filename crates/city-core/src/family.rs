//! Families and the ordered pool that owns them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Share of families employed when they move in.
pub const INITIAL_EMPLOYMENT_CHANCE: f64 = 0.8;
/// Chance for an unemployed family to find work when jobs cover everyone.
pub const HIRING_CHANCE: f64 = 0.5;
/// Share of computed income an unemployed family actually earns.
pub const UNEMPLOYED_INCOME_SHARE: f64 = 0.6;
/// Income boost on the day a family finds work.
pub const HIRING_INCOME_BOOST: f64 = 1.5;

/// A single household.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// Starting income the daily recomputation is based on.
    pub base_income: u32,
    /// Income computed for the current day.
    pub income: u32,
    /// Whether the family holds a job. Only ever flips to `true` after arrival.
    pub employed: bool,
}

impl Family {
    /// Fresh family with income in [40, 60] and an 80% chance of a job.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let base_income = rng.gen_range(40..=60);
        Self {
            base_income,
            income: base_income,
            employed: rng.gen_bool(INITIAL_EMPLOYMENT_CHANCE),
        }
    }
}

/// Inputs of the daily income recomputation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncomeFactors {
    /// Commercial share of job buildings in [0, 1].
    pub job_quality: f64,
    /// Job coverage ratio in [0, 1].
    pub job_ratio: f64,
    /// Education coverage ratio in [0, 1].
    pub education_ratio: f64,
    /// Difficulty income multiplier.
    pub income_multiplier: f64,
}

/// Employment transitions performed by one income update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentChange {
    /// Unemployed families that found work this update.
    pub hired: usize,
}

/// Ordered collection of families; arrivals append and departures pop from the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyPool {
    families: Vec<Family>,
}

impl FamilyPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool of `count` randomly generated families.
    pub fn with_random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut pool = Self::new();
        pool.add_random(count, rng);
        pool
    }

    pub fn count(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Family> {
        self.families.iter()
    }

    pub fn push(&mut self, family: Family) {
        self.families.push(family);
    }

    pub fn add_random<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        self.families.reserve(count);
        for _ in 0..count {
            self.families.push(Family::random(rng));
        }
    }

    /// Remove up to `count` families from the end. Returns how many were removed.
    pub fn remove_last(&mut self, count: usize) -> usize {
        let removed = count.min(self.families.len());
        self.families.truncate(self.families.len() - removed);
        removed
    }

    pub fn employed(&self) -> usize {
        self.families.iter().filter(|f| f.employed).count()
    }

    pub fn total_income(&self) -> u64 {
        self.families.iter().map(|f| u64::from(f.income)).sum()
    }

    /// Mean income, zero for an empty pool.
    pub fn average_income(&self) -> f64 {
        if self.families.is_empty() {
            return 0.0;
        }
        self.total_income() as f64 / self.families.len() as f64
    }

    /// Recompute every family's income for the day.
    ///
    /// Consumes exactly one uniform draw per family so runs stay reproducible
    /// regardless of which branch a family takes. A family earns the reduced
    /// share when it was unemployed before the update or its draw falls outside
    /// the covered job share. Employment only ever flips from unemployed to
    /// employed, and only while jobs cover everyone.
    pub fn update_incomes<R: Rng + ?Sized>(
        &mut self,
        factors: IncomeFactors,
        rng: &mut R,
    ) -> EmploymentChange {
        let job_ratio = factors.job_ratio.clamp(0.0, 1.0);
        let quality_bonus = 1.0 + 0.3 * factors.job_quality.clamp(0.0, 1.0);
        let shortage_penalty = if job_ratio < 1.0 {
            1.0 - 0.4 * (1.0 - job_ratio)
        } else {
            1.0
        };
        let education_bonus = 1.0 + 0.25 * factors.education_ratio.clamp(0.0, 1.0);

        let mut change = EmploymentChange::default();
        for family in &mut self.families {
            let draw: f64 = rng.gen();
            let was_employed = family.employed;
            let covered = job_ratio >= 1.0 || draw < job_ratio;
            let mut income = f64::from(family.base_income) * quality_bonus * shortage_penalty;
            if !was_employed || !covered {
                income *= UNEMPLOYED_INCOME_SHARE;
            }
            if !was_employed && job_ratio >= 1.0 && draw < HIRING_CHANCE {
                family.employed = true;
                change.hired += 1;
                income *= HIRING_INCOME_BOOST;
            }
            income *= education_bonus * factors.income_multiplier;
            family.income = income.round().max(0.0) as u32;
        }
        change
    }
}
