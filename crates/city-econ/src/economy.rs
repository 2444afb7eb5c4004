//! Daily income and expense computation.

use city_core::{
    Building, Coverage, Difficulty, EmploymentChange, FamilyPool, IncomeFactors, ServiceCapacity,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Share of average income a family spends per day at neutral satisfaction.
const SPENDING_SHARE: f64 = 0.25;
/// Flat daily cost of running city services.
const BASE_SERVICES_COST: f64 = 15.0;
const WATER_BASE_COST: f64 = 8.0;
const WATER_PER_FAMILY: f64 = 0.3;
const POWER_BASE_COST: f64 = 12.0;
const POWER_PER_FAMILY: f64 = 0.4;

/// Spending multiplier in [0.7, 1.3] driven by satisfaction.
pub fn spending_multiplier(satisfaction: i32) -> f64 {
    0.7 + f64::from(satisfaction.clamp(0, 100)) * 0.006
}

/// Revenue figures for one day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeReport {
    /// Commercial share of the job buildings, in [0, 1].
    pub job_quality: f64,
    /// Jobs over families, in [0, 1].
    pub job_ratio: f64,
    /// Income tax collected before rounding.
    pub income_tax: f64,
    /// VAT collected before rounding.
    pub vat: f64,
    /// Rounded revenue credited to the budget.
    pub total: i64,
    /// Hiring performed by the income update.
    pub employment: EmploymentChange,
}

/// Cost figures for one day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    /// Building upkeep, service buildings scaled by usage.
    pub upkeep: f64,
    /// Flat city services plus the per-family service cost.
    pub services: f64,
    /// Water plant operation, zero without a plant.
    pub water: f64,
    /// Power plant operation, zero without a plant.
    pub power: f64,
    /// Rounded cost debited from the budget.
    pub total: i64,
}

/// Update family incomes and compute the day's tax and VAT revenue.
pub fn compute_income<R: Rng + ?Sized>(
    pool: &mut FamilyPool,
    capacity: &ServiceCapacity,
    tax_rate: f64,
    vat_rate: f64,
    satisfaction: i32,
    rng: &mut R,
) -> IncomeReport {
    let families = pool.count();
    let coverage = capacity.coverage(families);
    let difficulty = Difficulty::for_families(families);
    let job_quality = capacity.job_quality();

    let employment = pool.update_incomes(
        IncomeFactors {
            job_quality,
            job_ratio: coverage.jobs,
            education_ratio: coverage.education,
            income_multiplier: difficulty.income_multiplier(),
        },
        rng,
    );

    let income_tax = pool.total_income() as f64 * tax_rate;
    let spending = pool.average_income() * SPENDING_SHARE * spending_multiplier(satisfaction);
    let vat = families as f64 * spending * vat_rate;
    let total = (income_tax + vat).round() as i64;
    debug!(
        families,
        job_quality, job_ratio = coverage.jobs, income_tax, vat, total, "daily income"
    );
    IncomeReport {
        job_quality,
        job_ratio: coverage.jobs,
        income_tax,
        vat,
        total,
        employment,
    }
}

fn usage_ratio(families: usize, service_capacity: u32) -> f64 {
    if service_capacity == 0 {
        return 1.0;
    }
    (families as f64 / f64::from(service_capacity)).min(1.0)
}

/// Compute the day's upkeep, services and utility operation costs.
pub fn compute_expenses(
    buildings: &[Building],
    capacity: &ServiceCapacity,
    families: usize,
) -> ExpenseReport {
    let difficulty = Difficulty::for_families(families);
    let factor = difficulty.upkeep_factor();

    let upkeep: f64 = buildings
        .iter()
        .map(|b| {
            let base = f64::from(b.upkeep()) * factor;
            if b.kind().is_service() {
                base * (0.5 + usage_ratio(families, b.kind().service_capacity()))
            } else {
                base
            }
        })
        .sum();

    let services = if families == 0 {
        BASE_SERVICES_COST
    } else {
        BASE_SERVICES_COST + families as f64 * difficulty.per_family_service_cost()
    };

    let f = families as f64;
    let water = if capacity.water_plants > 0 {
        let ratio = (f / capacity.water as f64).min(1.0);
        WATER_BASE_COST + f * ratio * WATER_PER_FAMILY
    } else {
        0.0
    };
    let power = if capacity.power_plants > 0 {
        let ratio = (f / capacity.power as f64).min(1.0);
        POWER_BASE_COST + f * ratio * POWER_PER_FAMILY
    } else {
        0.0
    };

    let total = (upkeep + services + water + power).round() as i64;
    debug!(families, upkeep, services, water, power, total, "daily expenses");
    ExpenseReport {
        upkeep,
        services,
        water,
        power,
        total,
    }
}

/// Log lines for every service the population has outgrown.
pub fn shortage_notes(
    capacity: &ServiceCapacity,
    coverage: &Coverage,
    families: usize,
) -> Vec<String> {
    let mut notes = Vec::new();
    let mut note = |ratio: f64, what: &str, cap: u64| {
        if ratio < 1.0 {
            notes.push(format!(
                "{what} shortage: capacity {cap} for {families} families ({:.0}% covered)",
                ratio * 100.0
            ));
        }
    };
    note(coverage.housing, "Housing", capacity.housing);
    note(coverage.jobs, "Job", capacity.jobs());
    note(coverage.education, "Education", capacity.education);
    note(coverage.healthcare, "Healthcare", capacity.healthcare);
    note(coverage.water, "Water", capacity.water);
    note(coverage.power, "Power", capacity.power);
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_core::{BuildingKind, Family};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn starter() -> Vec<Building> {
        [
            BuildingKind::Residential,
            BuildingKind::School,
            BuildingKind::Hospital,
            BuildingKind::WaterPlant,
            BuildingKind::PowerPlant,
        ]
        .into_iter()
        .map(Building::new)
        .collect()
    }

    fn pool_of(n: usize, base: u32) -> FamilyPool {
        let mut pool = FamilyPool::new();
        for _ in 0..n {
            pool.push(Family {
                base_income: base,
                income: base,
                employed: true,
            });
        }
        pool
    }

    #[test]
    fn spending_multiplier_range() {
        assert!((spending_multiplier(0) - 0.7).abs() < 1e-12);
        assert!((spending_multiplier(100) - 1.3).abs() < 1e-12);
        assert!((spending_multiplier(250) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn empty_city_earns_nothing() {
        let buildings = starter();
        let cap = ServiceCapacity::aggregate(&buildings);
        let mut pool = FamilyPool::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let r = compute_income(&mut pool, &cap, 0.1, 0.05, 50, &mut rng);
        assert_eq!(r.total, 0);
        assert_eq!(r.income_tax, 0.0);
        assert_eq!(r.vat, 0.0);
    }

    #[test]
    fn income_with_full_job_coverage() {
        let mut buildings = starter();
        buildings.push(Building::new(BuildingKind::Commercial));
        let cap = ServiceCapacity::aggregate(&buildings);
        let mut pool = pool_of(10, 40);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let r = compute_income(&mut pool, &cap, 0.1, 0.05, 50, &mut rng);
        // 40 * 1.3 * 1.25 = 65 per family
        assert_eq!(pool.total_income(), 650);
        assert!((r.income_tax - 65.0).abs() < 1e-9);
        // 10 * 65 * 0.25 * 1.0 * 0.05
        assert!((r.vat - 8.125).abs() < 1e-9);
        assert_eq!(r.total, 73);
        assert_eq!(r.job_quality, 1.0);
    }

    #[test]
    fn expenses_for_starter_city() {
        let buildings = starter();
        let cap = ServiceCapacity::aggregate(&buildings);
        let r = compute_expenses(&buildings, &cap, 10);
        // residential 5, school 15*0.7, hospital 25*(0.5+1/6),
        // water 30*(0.5+10/75), power 40*(0.5+0.1)
        let upkeep = 5.0 + 10.5 + 25.0 * (0.5 + 10.0 / 60.0) + 30.0 * (0.5 + 10.0 / 75.0) + 24.0;
        assert!((r.upkeep - upkeep).abs() < 1e-9);
        assert_eq!(r.services, 45.0);
        assert!((r.water - (8.0 + 10.0 * (10.0 / 75.0) * 0.3)).abs() < 1e-9);
        assert!((r.power - (12.0 + 10.0 * 0.1 * 0.4)).abs() < 1e-9);
        assert_eq!(
            r.total,
            (r.upkeep + r.services + r.water + r.power).round() as i64
        );
    }

    #[test]
    fn no_utilities_no_operation_cost() {
        let buildings = vec![Building::new(BuildingKind::Residential)];
        let cap = ServiceCapacity::aggregate(&buildings);
        let r = compute_expenses(&buildings, &cap, 0);
        assert_eq!(r.water, 0.0);
        assert_eq!(r.power, 0.0);
        assert_eq!(r.services, 15.0);
        assert_eq!(r.total, 20);
    }

    #[test]
    fn bigger_cities_pay_more_per_building() {
        let buildings = vec![Building::new(BuildingKind::Park)];
        let cap = ServiceCapacity::aggregate(&buildings);
        let small = compute_expenses(&buildings, &cap, 10).upkeep;
        let large = compute_expenses(&buildings, &cap, 250).upkeep;
        assert_eq!(small, 2.0);
        assert!((large - 2.0 * 1.5 * 1.15).abs() < 1e-9);
    }

    #[test]
    fn shortages_are_reported() {
        let buildings = starter();
        let cap = ServiceCapacity::aggregate(&buildings);
        let cov = cap.coverage(80);
        let notes = shortage_notes(&cap, &cov, 80);
        assert!(notes.iter().any(|n| n.starts_with("Housing shortage")));
        assert!(notes.iter().any(|n| n.starts_with("Job shortage")));
        assert!(notes.iter().any(|n| n.starts_with("Education shortage")));
        assert!(notes.iter().any(|n| n.starts_with("Water shortage")));
        assert!(!notes.iter().any(|n| n.starts_with("Power shortage")));
        assert!(shortage_notes(&cap, &cap.coverage(0), 0).is_empty());
    }
}
