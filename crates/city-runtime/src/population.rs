//! Arrivals and departures of families.

use city_core::{Building, Coverage, ServiceCapacity, DEFAULT_TAX_RATE, DEFAULT_VAT_RATE};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Housing occupancy above which the city counts as overcrowded.
pub const OVERCROWDING_THRESHOLD: f64 = 0.9;
/// Ceiling on the per-family departure chance.
pub const MAX_DEPARTURE_CHANCE: f64 = 0.5;

/// City state population dynamics is computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopulationContext {
    /// Families living in the city before today's moves.
    pub families: usize,
    /// Satisfaction after today's satisfaction update.
    pub satisfaction: i32,
    /// Current income tax rate.
    pub tax_rate: f64,
    /// Current VAT rate.
    pub vat_rate: f64,
    /// Capacities aggregated over the current buildings.
    pub capacity: ServiceCapacity,
    /// `capacity` measured against `families`.
    pub coverage: Coverage,
}

impl PopulationContext {
    pub fn new(
        families: usize,
        satisfaction: i32,
        tax_rate: f64,
        vat_rate: f64,
        buildings: &[Building],
    ) -> Self {
        let capacity = ServiceCapacity::aggregate(buildings);
        Self {
            families,
            satisfaction,
            tax_rate,
            vat_rate,
            capacity,
            coverage: capacity.coverage(families),
        }
    }

    /// Families per housing unit; a city without housing counts as full.
    pub fn occupancy(&self) -> f64 {
        if self.capacity.housing == 0 {
            return 1.0;
        }
        self.families as f64 / self.capacity.housing as f64
    }

    pub fn overcrowded(&self) -> bool {
        self.occupancy() > OVERCROWDING_THRESHOLD
    }

    pub fn free_housing(&self) -> u64 {
        self.capacity.free_housing(self.families)
    }

    /// Share of the way from 90% occupancy to full, in [0, 1].
    fn overcrowding(&self) -> f64 {
        let excess = self.occupancy() - OVERCROWDING_THRESHOLD;
        (excess / (1.0 - OVERCROWDING_THRESHOLD)).clamp(0.0, 1.0)
    }

    /// Chance that one arrival attempt succeeds.
    pub fn arrival_chance(&self) -> f64 {
        if self.free_housing() == 0 {
            return 0.0;
        }
        let cov = &self.coverage;
        let mut chance = 0.05 + f64::from(self.satisfaction) * 0.0065;
        if self.capacity.jobs() > self.families as u64 {
            chance += 0.1;
        }
        chance += cov.service_average() * 0.2;

        chance -= (self.tax_rate - DEFAULT_TAX_RATE).max(0.0) * 0.8;
        chance -= (self.vat_rate - DEFAULT_VAT_RATE).max(0.0) * 0.6;
        if self.tax_rate > 0.20 {
            chance -= 0.1;
        }
        if self.vat_rate > 0.10 {
            chance -= 0.1;
        }
        if cov.education < 0.5 {
            chance -= 0.1;
        }
        if cov.healthcare < 0.5 {
            chance -= 0.1;
        }
        if cov.utility() < 0.7 {
            chance -= 0.2;
        }
        if self.overcrowded() {
            chance *= 1.0 - self.overcrowding();
        }
        chance.clamp(0.0, 1.0)
    }

    /// Number of arrival attempts; very happy cities draw far more.
    pub fn max_attempts(&self) -> u32 {
        if self.satisfaction > 90 {
            50
        } else if self.satisfaction > 85 && self.free_housing() >= 100 {
            30
        } else {
            5
        }
    }

    /// Chance that an existing family leaves today.
    pub fn departure_chance(&self) -> f64 {
        let cov = &self.coverage;
        let mut chance = if self.satisfaction < 50 {
            f64::from(50 - self.satisfaction) * 0.01
        } else {
            0.0
        };
        if cov.utility() < 0.5 {
            chance += 0.15;
        }
        if cov.education < 0.4 {
            chance += 0.1;
        }
        if cov.healthcare < 0.4 {
            chance += 0.1;
        }
        if self.overcrowded() {
            chance += 0.1 * self.overcrowding();
        }
        chance.min(MAX_DEPARTURE_CHANCE)
    }
}

/// Arrivals and departures drawn for one day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationPlan {
    /// Success chance of each arrival attempt.
    pub arrival_chance: f64,
    /// Arrival attempts drawn.
    pub attempts: u32,
    /// Successful attempts, capped by free housing.
    pub arrivals: usize,
    /// Chance each existing family leaves.
    pub departure_chance: f64,
    /// Families that will leave.
    pub departures: usize,
}

/// Draw today's arrivals and departures.
///
/// Arrivals never exceed the free housing; departures are one trial per
/// family living in the city before today's arrivals.
pub fn plan<R: Rng + ?Sized>(ctx: &PopulationContext, rng: &mut R) -> PopulationPlan {
    let arrival_chance = ctx.arrival_chance();
    let attempts = ctx.max_attempts();
    let arrivals = if arrival_chance > 0.0 {
        let hits = (0..attempts).filter(|_| rng.gen::<f64>() < arrival_chance).count();
        hits.min(usize::try_from(ctx.free_housing()).unwrap_or(usize::MAX))
    } else {
        0
    };

    let departure_chance = ctx.departure_chance();
    let departures = if departure_chance > 0.0 {
        (0..ctx.families)
            .filter(|_| rng.gen::<f64>() < departure_chance)
            .count()
    } else {
        0
    };

    PopulationPlan {
        arrival_chance,
        attempts,
        arrivals,
        departure_chance,
        departures,
    }
}
