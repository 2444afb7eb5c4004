//! Static table of building kinds and their parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::tiers::Difficulty;
use crate::CityError;

/// Kinds of buildings a city can construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Housing for families.
    Residential,
    /// Shops and offices; preferred jobs.
    Commercial,
    /// Factories; jobs with a satisfaction cost.
    Industrial,
    /// Green space.
    Park,
    /// Education service.
    School,
    /// Healthcare service.
    Hospital,
    /// Water utility.
    WaterPlant,
    /// Power utility.
    PowerPlant,
}

/// Fixed parameters of a building kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingSpec {
    /// Housing units for residential, job slots for commercial/industrial.
    pub capacity: u32,
    /// Daily upkeep before scaling.
    pub upkeep: u32,
    /// Signed contribution to the satisfaction sum.
    pub satisfaction_impact: i32,
    /// Families served by a school.
    pub education_capacity: u32,
    /// Families served by a hospital.
    pub healthcare_capacity: u32,
    /// Families served by a water or power plant.
    pub utility_capacity: u32,
}

const fn spec(capacity: u32, upkeep: u32, satisfaction_impact: i32) -> BuildingSpec {
    BuildingSpec {
        capacity,
        upkeep,
        satisfaction_impact,
        education_capacity: 0,
        healthcare_capacity: 0,
        utility_capacity: 0,
    }
}

impl BuildingKind {
    /// Every kind in catalog order.
    pub const ALL: [BuildingKind; 8] = [
        BuildingKind::Residential,
        BuildingKind::Commercial,
        BuildingKind::Industrial,
        BuildingKind::Park,
        BuildingKind::School,
        BuildingKind::Hospital,
        BuildingKind::WaterPlant,
        BuildingKind::PowerPlant,
    ];

    /// Catalog parameters for this kind.
    pub const fn spec(self) -> BuildingSpec {
        match self {
            BuildingKind::Residential => spec(25, 5, 5),
            BuildingKind::Commercial => spec(15, 10, 2),
            BuildingKind::Industrial => spec(10, 20, -3),
            BuildingKind::Park => spec(0, 2, 8),
            BuildingKind::School => BuildingSpec {
                education_capacity: 50,
                ..spec(0, 15, 6)
            },
            BuildingKind::Hospital => BuildingSpec {
                healthcare_capacity: 60,
                ..spec(0, 25, 7)
            },
            BuildingKind::WaterPlant => BuildingSpec {
                utility_capacity: 75,
                ..spec(0, 30, 3)
            },
            BuildingKind::PowerPlant => BuildingSpec {
                utility_capacity: 100,
                ..spec(0, 40, 2)
            },
        }
    }

    /// Display name, e.g. "Water Plant".
    pub const fn name(self) -> &'static str {
        match self {
            BuildingKind::Residential => "Residential",
            BuildingKind::Commercial => "Commercial",
            BuildingKind::Industrial => "Industrial",
            BuildingKind::Park => "Park",
            BuildingKind::School => "School",
            BuildingKind::Hospital => "Hospital",
            BuildingKind::WaterPlant => "Water Plant",
            BuildingKind::PowerPlant => "Power Plant",
        }
    }

    /// Whether upkeep of this kind scales with how much of its service is used.
    pub const fn is_service(self) -> bool {
        matches!(
            self,
            BuildingKind::School
                | BuildingKind::Hospital
                | BuildingKind::WaterPlant
                | BuildingKind::PowerPlant
        )
    }

    /// Capacity of the specialized service this kind provides, zero otherwise.
    pub const fn service_capacity(self) -> u32 {
        let s = self.spec();
        match self {
            BuildingKind::School => s.education_capacity,
            BuildingKind::Hospital => s.healthcare_capacity,
            BuildingKind::WaterPlant | BuildingKind::PowerPlant => s.utility_capacity,
            _ => 0,
        }
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildingKind {
    type Err = CityError;

    /// Accepts display names case-insensitively, with or without the space
    /// ("Water Plant", "waterplant", "water_plant").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        BuildingKind::ALL
            .into_iter()
            .find(|k| k.name().replace(' ', "").to_lowercase() == key)
            .ok_or_else(|| CityError::UnknownBuildingKind(s.to_string()))
    }
}

/// Price of constructing `kind` in a city of `families`.
///
/// Ten days of base upkeep scaled by the city-size multiplier.
pub fn construction_cost(kind: BuildingKind, families: usize) -> i64 {
    let base = f64::from(kind.spec().upkeep) * 10.0;
    (base * Difficulty::for_families(families).size_multiplier()).round() as i64
}
