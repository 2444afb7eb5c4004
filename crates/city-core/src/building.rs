//! Building entities constructed from the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::BuildingKind;
use crate::CityError;

/// A constructed building. Everything except `occupancy` is fixed by its kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    kind: BuildingKind,
    capacity: u32,
    upkeep: u32,
    satisfaction_impact: i32,
    education_capacity: u32,
    healthcare_capacity: u32,
    utility_capacity: u32,
    occupancy: u32,
}

impl Building {
    /// Build a fresh, empty building of `kind`.
    pub fn new(kind: BuildingKind) -> Self {
        let s = kind.spec();
        Self {
            kind,
            capacity: s.capacity,
            upkeep: s.upkeep,
            satisfaction_impact: s.satisfaction_impact,
            education_capacity: s.education_capacity,
            healthcare_capacity: s.healthcare_capacity,
            utility_capacity: s.utility_capacity,
            occupancy: 0,
        }
    }

    /// Build from a catalog name such as "Water Plant".
    pub fn from_name(name: &str) -> Result<Self, CityError> {
        Ok(Self::new(name.parse()?))
    }

    pub fn kind(&self) -> BuildingKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn upkeep(&self) -> u32 {
        self.upkeep
    }

    pub fn satisfaction_impact(&self) -> i32 {
        self.satisfaction_impact
    }

    pub fn education_capacity(&self) -> u32 {
        self.education_capacity
    }

    pub fn healthcare_capacity(&self) -> u32 {
        self.healthcare_capacity
    }

    pub fn utility_capacity(&self) -> u32 {
        self.utility_capacity
    }

    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Set occupancy, clamped to `[0, capacity]`. Returns the stored value.
    pub fn set_occupancy(&mut self, occupancy: u32) -> u32 {
        self.occupancy = occupancy.min(self.capacity);
        self.occupancy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_building_copies_catalog() {
        let b = Building::new(BuildingKind::Hospital);
        assert_eq!(b.upkeep(), 25);
        assert_eq!(b.healthcare_capacity(), 60);
        assert_eq!(b.occupancy(), 0);
    }

    #[test]
    fn occupancy_is_clamped() {
        let mut b = Building::new(BuildingKind::Residential);
        assert_eq!(b.set_occupancy(30), 25);
        assert_eq!(b.set_occupancy(7), 7);
        let mut park = Building::new(BuildingKind::Park);
        assert_eq!(park.set_occupancy(3), 0);
    }

    #[test]
    fn from_name_rejects_unknown() {
        assert!(Building::from_name("Castle").is_err());
        assert_eq!(
            Building::from_name("school").map(|b| b.kind()),
            Ok(BuildingKind::School)
        );
    }
}
