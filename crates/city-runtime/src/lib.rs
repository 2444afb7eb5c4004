#![deny(warnings)]

//! Daily simulation runtime for the city.
//!
//! [`City`] is the aggregate root. A tick runs the economic calculator,
//! the random event engine, the satisfaction engine and population
//! dynamics strictly in that order, drawing every random number from the
//! city's own seeded `ChaCha8Rng` so a seed reproduces a whole run.

pub mod city;
pub mod events;
pub mod population;
mod rng;
mod tick;

pub use city::{City, CityBuilder, DailyReport, STARTER_BUILDINGS};
pub use events::{EventContext, EventKind, EventOutcome};
pub use population::{PopulationContext, PopulationPlan};

pub use city_core::{Building, BuildingKind, CityConfig, CityError};

/// Run `days` ticks on a city built from `config`, stopping early once the
/// budget goes negative. Returns the city and the number of days run.
pub fn run_days(config: &CityConfig, days: u32) -> (City, u32) {
    let mut city = City::from_config(config);
    let mut ran = 0;
    while ran < days && city.budget() >= 0 {
        city.advance_day();
        ran += 1;
    }
    (city, ran)
}
