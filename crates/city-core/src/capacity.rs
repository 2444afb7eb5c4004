//! Service capacity aggregation and coverage ratios.

use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::catalog::BuildingKind;

/// Coverage ratio `min(1, capacity / families)`, defined as 1.0 for an empty city.
pub fn coverage(capacity: u64, families: usize) -> f64 {
    if families == 0 {
        return 1.0;
    }
    (capacity as f64 / families as f64).min(1.0)
}

/// Raw capacities summed over every building, plus per-kind counts the
/// engines need for mitigation and job quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCapacity {
    /// Families the residential buildings can house.
    pub housing: u64,
    /// Jobs offered by commercial buildings.
    pub commercial_jobs: u64,
    /// Jobs offered by industrial buildings.
    pub industrial_jobs: u64,
    /// Families schools can serve.
    pub education: u64,
    /// Families hospitals can serve.
    pub healthcare: u64,
    /// Families water plants can supply.
    pub water: u64,
    /// Families power plants can supply.
    pub power: u64,
    /// Number of commercial buildings.
    pub commercial_buildings: usize,
    /// Number of industrial buildings.
    pub industrial_buildings: usize,
    /// Number of hospitals, used to mitigate epidemics.
    pub hospitals: usize,
    /// Number of water plants.
    pub water_plants: usize,
    /// Number of power plants.
    pub power_plants: usize,
}

/// Coverage ratios against a family count, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Housing capacity over families.
    pub housing: f64,
    /// Commercial plus industrial jobs over families.
    pub jobs: f64,
    /// Education capacity over families.
    pub education: f64,
    /// Healthcare capacity over families.
    pub healthcare: f64,
    /// Water supply over families.
    pub water: f64,
    /// Power supply over families.
    pub power: f64,
}

impl Coverage {
    /// The worse of water and power coverage.
    pub fn utility(&self) -> f64 {
        self.water.min(self.power)
    }

    /// Mean of education, healthcare, water and power coverage.
    pub fn service_average(&self) -> f64 {
        (self.education + self.healthcare + self.water + self.power) / 4.0
    }

    /// Whether all four public services fully cover the population.
    pub fn services_complete(&self) -> bool {
        self.education >= 1.0 && self.healthcare >= 1.0 && self.water >= 1.0 && self.power >= 1.0
    }
}

impl ServiceCapacity {
    /// Sum capacities over `buildings` in a single pass.
    pub fn aggregate(buildings: &[Building]) -> Self {
        let mut c = Self::default();
        for b in buildings {
            match b.kind() {
                BuildingKind::Residential => c.housing += u64::from(b.capacity()),
                BuildingKind::Commercial => {
                    c.commercial_jobs += u64::from(b.capacity());
                    c.commercial_buildings += 1;
                }
                BuildingKind::Industrial => {
                    c.industrial_jobs += u64::from(b.capacity());
                    c.industrial_buildings += 1;
                }
                BuildingKind::Park => {}
                BuildingKind::School => c.education += u64::from(b.education_capacity()),
                BuildingKind::Hospital => {
                    c.healthcare += u64::from(b.healthcare_capacity());
                    c.hospitals += 1;
                }
                BuildingKind::WaterPlant => {
                    c.water += u64::from(b.utility_capacity());
                    c.water_plants += 1;
                }
                BuildingKind::PowerPlant => {
                    c.power += u64::from(b.utility_capacity());
                    c.power_plants += 1;
                }
            }
        }
        c
    }

    pub fn jobs(&self) -> u64 {
        self.commercial_jobs + self.industrial_jobs
    }

    /// Commercial share of job buildings; zero when there are none.
    pub fn job_quality(&self) -> f64 {
        let total = self.commercial_buildings + self.industrial_buildings;
        if total == 0 {
            return 0.0;
        }
        self.commercial_buildings as f64 / total as f64
    }

    /// Housing units not taken by `families`.
    pub fn free_housing(&self, families: usize) -> u64 {
        self.housing.saturating_sub(families as u64)
    }

    pub fn coverage(&self, families: usize) -> Coverage {
        Coverage {
            housing: coverage(self.housing, families),
            jobs: coverage(self.jobs(), families),
            education: coverage(self.education, families),
            healthcare: coverage(self.healthcare, families),
            water: coverage(self.water, families),
            power: coverage(self.power, families),
        }
    }
}
