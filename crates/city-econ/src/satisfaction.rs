//! Satisfaction terms and the capped daily ledger.

use city_core::{Building, Coverage, DEFAULT_TAX_RATE, DEFAULT_VAT_RATE};
use serde::{Deserialize, Serialize};

/// Largest total increase allowed within one day.
pub const MAX_DAILY_INCREASE: i32 = 5;
/// Largest total decrease allowed within one day.
pub const MAX_DAILY_DECREASE: i32 = 50;
/// Level above which satisfaction is compressed.
pub const COMPRESSION_THRESHOLD: i32 = 80;

const EDUCATION_SHORTAGE_MAX: f64 = 25.0;
const HEALTHCARE_SHORTAGE_MAX: f64 = 30.0;
const UTILITY_SHORTAGE_MAX: f64 = 40.0;
const FULL_SERVICE_BONUS: f64 = 25.0;
const PARTIAL_SERVICE_BONUS: f64 = 15.0;

/// Satisfaction lost to the income tax rate.
pub fn income_tax_impact(rate: f64) -> f64 {
    rate * 120.0 + (rate - DEFAULT_TAX_RATE).max(0.0) * 180.0
}

/// Satisfaction lost to the VAT rate.
pub fn vat_impact(rate: f64) -> f64 {
    rate * 80.0 + (rate - DEFAULT_VAT_RATE).max(0.0) * 120.0
}

/// Combined penalty for education, healthcare and utility shortages.
pub fn shortage_penalty(coverage: &Coverage) -> f64 {
    EDUCATION_SHORTAGE_MAX * (1.0 - coverage.education)
        + HEALTHCARE_SHORTAGE_MAX * (1.0 - coverage.healthcare)
        + UTILITY_SHORTAGE_MAX * (1.0 - coverage.utility())
}

/// Bonus for service quality: flat 25 with full coverage, otherwise up to 15.
pub fn service_bonus(coverage: &Coverage) -> f64 {
    if coverage.services_complete() {
        FULL_SERVICE_BONUS
    } else {
        PARTIAL_SERVICE_BONUS * coverage.service_average()
    }
}

/// Compress levels above 80: `80 + x(1 - x/40)` where `x = level - 80`.
pub fn compress_high(level: i32) -> i32 {
    if level <= COMPRESSION_THRESHOLD {
        return level;
    }
    let x = f64::from(level - COMPRESSION_THRESHOLD);
    let compressed = f64::from(COMPRESSION_THRESHOLD) + x * (1.0 - x / 40.0);
    compressed.round() as i32
}

/// Terms making up one day's satisfaction change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionBreakdown {
    /// Summed satisfaction impact of every building.
    pub buildings: i32,
    /// Income tax burden, subtracted.
    pub income_tax: f64,
    /// VAT burden, subtracted.
    pub vat: f64,
    /// Education, healthcare and utility shortage penalty, subtracted.
    pub shortages: f64,
    /// Bonus for well covered services.
    pub service_bonus: f64,
}

impl SatisfactionBreakdown {
    pub fn compute(
        buildings: &[Building],
        coverage: &Coverage,
        tax_rate: f64,
        vat_rate: f64,
    ) -> Self {
        Self {
            buildings: buildings.iter().map(Building::satisfaction_impact).sum(),
            income_tax: income_tax_impact(tax_rate),
            vat: vat_impact(vat_rate),
            shortages: shortage_penalty(coverage),
            service_bonus: service_bonus(coverage),
        }
    }

    /// Signed sum of all terms.
    pub fn raw(&self) -> f64 {
        f64::from(self.buildings) - self.income_tax - self.vat - self.shortages
            + self.service_bonus
    }

    /// Daily delta: the raw sum scaled down by ten, rounded.
    pub fn delta(&self) -> i32 {
        (self.raw() / 10.0).round() as i32
    }
}

/// Satisfaction level with the running same-day increase and decrease totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatisfactionLedger {
    level: i32,
    increase_today: i32,
    decrease_today: i32,
}

impl SatisfactionLedger {
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(0, 100),
            increase_today: 0,
            decrease_today: 0,
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn increase_today(&self) -> i32 {
        self.increase_today
    }

    pub fn decrease_today(&self) -> i32 {
        self.decrease_today
    }

    /// Start a new day with fresh allowances.
    pub fn reset_day(&mut self) {
        self.increase_today = 0;
        self.decrease_today = 0;
    }

    /// Overwrite the level without touching the daily totals.
    pub fn force_level(&mut self, level: i32) {
        self.level = level.clamp(0, 100);
    }

    /// Apply `delta` truncated against the remaining daily allowance and the
    /// [0, 100] bounds. Returns the change actually applied.
    pub fn apply(&mut self, delta: i32) -> i32 {
        let allowed = if delta > 0 {
            delta.min(MAX_DAILY_INCREASE - self.increase_today)
        } else {
            delta.max(-(MAX_DAILY_DECREASE - self.decrease_today))
        };
        let next = (self.level + allowed).clamp(0, 100);
        let applied = next - self.level;
        if applied > 0 {
            self.increase_today += applied;
        } else {
            self.decrease_today -= applied;
        }
        self.level = next;
        applied
    }

    /// Apply the satisfaction engine's delta, then compress whatever level
    /// above 80 it leaves, whichever way the day moved. The compression goes
    /// through [`apply`](Self::apply) and counts against the daily allowance.
    /// Returns the net change.
    pub fn settle(&mut self, delta: i32) -> i32 {
        let before = self.level;
        self.apply(delta);
        if self.level > COMPRESSION_THRESHOLD {
            let target = compress_high(self.level);
            self.apply(target - self.level);
        }
        self.level - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_core::{BuildingKind, ServiceCapacity};
    use proptest::prelude::*;

    #[test]
    fn tax_impacts() {
        assert!((income_tax_impact(0.10) - 12.0).abs() < 1e-9);
        assert!((income_tax_impact(0.20) - (24.0 + 18.0)).abs() < 1e-9);
        assert!((vat_impact(0.05) - 4.0).abs() < 1e-9);
        assert!((vat_impact(0.15) - (12.0 + 12.0)).abs() < 1e-9);
        assert_eq!(income_tax_impact(0.0), 0.0);
    }

    #[test]
    fn compression_curve() {
        assert_eq!(compress_high(50), 50);
        assert_eq!(compress_high(80), 80);
        assert_eq!(compress_high(85), 84);
        assert_eq!(compress_high(100), 90);
    }

    #[test]
    fn empty_city_has_no_shortage_penalty() {
        let cov = ServiceCapacity::aggregate(&[]).coverage(0);
        assert_eq!(shortage_penalty(&cov), 0.0);
        assert_eq!(service_bonus(&cov), 25.0);
    }

    #[test]
    fn starter_city_breakdown() {
        let buildings: Vec<Building> = [
            BuildingKind::Residential,
            BuildingKind::School,
            BuildingKind::Hospital,
            BuildingKind::WaterPlant,
            BuildingKind::PowerPlant,
        ]
        .into_iter()
        .map(Building::new)
        .collect();
        let cov = ServiceCapacity::aggregate(&buildings).coverage(10);
        let b = SatisfactionBreakdown::compute(&buildings, &cov, 0.10, 0.05);
        assert_eq!(b.buildings, 23);
        assert_eq!(b.shortages, 0.0);
        // 23 - 12 - 4 + 25 = 32
        assert_eq!(b.delta(), 3);
    }

    #[test]
    fn utility_shortage_uses_worse_coverage() {
        let buildings = vec![
            Building::new(BuildingKind::School),
            Building::new(BuildingKind::Hospital),
            Building::new(BuildingKind::PowerPlant),
        ];
        let cov = ServiceCapacity::aggregate(&buildings).coverage(40);
        assert!((shortage_penalty(&cov) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn ledger_caps_daily_increase() {
        let mut l = SatisfactionLedger::new(50);
        assert_eq!(l.apply(3), 3);
        assert_eq!(l.apply(4), 2);
        assert_eq!(l.apply(1), 0);
        assert_eq!(l.level(), 55);
        l.reset_day();
        assert_eq!(l.apply(1), 1);
    }

    #[test]
    fn ledger_caps_daily_decrease_and_bounds() {
        let mut l = SatisfactionLedger::new(100);
        assert_eq!(l.apply(-30), -30);
        assert_eq!(l.apply(-30), -20);
        assert_eq!(l.apply(-1), 0);
        assert_eq!(l.level(), 50);
        let mut low = SatisfactionLedger::new(3);
        assert_eq!(low.apply(-10), -3);
        assert_eq!(low.level(), 0);
        assert_eq!(low.decrease_today(), 3);
    }

    #[test]
    fn settle_compresses_gains_above_eighty() {
        let mut l = SatisfactionLedger::new(88);
        l.settle(5);
        // 93 -> 80 + 13 * 27/40 = 88.775
        assert_eq!(l.level(), 89);
        let mut falling = SatisfactionLedger::new(95);
        assert_eq!(falling.settle(-2), -6);
        assert_eq!(falling.level(), 89);
        assert_eq!(falling.decrease_today(), 6);
    }

    #[test]
    fn settle_compresses_without_a_gain() {
        let mut full = SatisfactionLedger::new(100);
        assert_eq!(full.settle(-1), -10);
        assert_eq!(full.level(), 90);

        let mut steady = SatisfactionLedger::new(90);
        assert_eq!(steady.settle(0), -2);
        assert_eq!(steady.level(), 88);

        let mut below = SatisfactionLedger::new(80);
        assert_eq!(below.settle(0), 0);
        assert_eq!(below.level(), 80);
    }

    #[test]
    fn settle_compresses_after_the_increase_allowance_is_spent() {
        let mut l = SatisfactionLedger::new(90);
        assert_eq!(l.apply(10), 5);
        assert_eq!(l.level(), 95);
        // engine gain is truncated to zero but 95 still compresses to 89
        assert_eq!(l.settle(3), -6);
        assert_eq!(l.level(), 89);
    }

    proptest! {
        #[test]
        fn ledger_invariants(
            start in 0i32..=100,
            deltas in proptest::collection::vec(-60i32..60, 0..20),
        ) {
            let mut l = SatisfactionLedger::new(start);
            for d in deltas {
                l.settle(d);
                prop_assert!((0..=100).contains(&l.level()));
                prop_assert!(l.increase_today() <= MAX_DAILY_INCREASE);
                prop_assert!(l.decrease_today() <= MAX_DAILY_DECREASE);
            }
        }

        #[test]
        fn compression_never_raises(level in 0i32..=100) {
            prop_assert!(compress_high(level) <= level);
            prop_assert!(compress_high(level) >= level.min(COMPRESSION_THRESHOLD));
        }
    }
}
