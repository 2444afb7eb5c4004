//! The city aggregate and its builder.

use std::collections::BTreeMap;

use city_core::{
    clamp_tax_rate, clamp_vat_rate, construction_cost, Building, BuildingKind, CityConfig,
    CityError, FamilyPool,
};
use city_econ::{income_tax_impact, vat_impact, SatisfactionLedger};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::EventKind;

/// Buildings every new city receives without paying for them.
pub const STARTER_BUILDINGS: [BuildingKind; 5] = [
    BuildingKind::Residential,
    BuildingKind::School,
    BuildingKind::Hospital,
    BuildingKind::WaterPlant,
    BuildingKind::PowerPlant,
];

/// Summary of the most recent day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Day the report describes.
    pub day: u32,
    /// Income tax plus VAT collected.
    pub income: i64,
    /// Upkeep, services and utilities paid.
    pub expenses: i64,
    /// Random event that fired, if any.
    pub event: Option<EventKind>,
    /// Unemployed families that found work.
    pub hired: usize,
    /// Families that moved in.
    pub arrivals: usize,
    /// Families that left because of low satisfaction.
    pub departures: usize,
    /// Families removed because housing ran out.
    pub evicted: usize,
    /// Net satisfaction movement over the whole day.
    pub satisfaction_change: i32,
}

impl DailyReport {
    /// Income minus expenses.
    pub fn net(&self) -> i64 {
        self.income - self.expenses
    }
}

/// The simulated city. Mutated only through [`City::advance_day`],
/// [`City::add_building`] and the rate setters.
///
/// Per-kind counts are not part of a snapshot; they are rebuilt from the
/// building list on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "CitySnapshot")]
pub struct City {
    pub(crate) day: u32,
    pub(crate) budget: i64,
    pub(crate) satisfaction: SatisfactionLedger,
    pub(crate) tax_rate: f64,
    pub(crate) vat_rate: f64,
    pub(crate) buildings: Vec<Building>,
    #[serde(skip)]
    pub(crate) building_counts: BTreeMap<BuildingKind, usize>,
    pub(crate) event_log: Vec<String>,
    pub(crate) daily_income: i64,
    pub(crate) daily_expenses: i64,
    pub(crate) families: FamilyPool,
    pub(crate) report: DailyReport,
    #[serde(with = "crate::rng")]
    pub(crate) rng: ChaCha8Rng,
}

/// Serialized form of [`City`] without derived state.
#[derive(Deserialize)]
struct CitySnapshot {
    day: u32,
    budget: i64,
    satisfaction: SatisfactionLedger,
    tax_rate: f64,
    vat_rate: f64,
    buildings: Vec<Building>,
    event_log: Vec<String>,
    daily_income: i64,
    daily_expenses: i64,
    families: FamilyPool,
    report: DailyReport,
    #[serde(with = "crate::rng")]
    rng: ChaCha8Rng,
}

impl From<CitySnapshot> for City {
    fn from(snap: CitySnapshot) -> Self {
        let building_counts = count_kinds(&snap.buildings);
        City {
            day: snap.day,
            budget: snap.budget,
            satisfaction: snap.satisfaction,
            tax_rate: snap.tax_rate,
            vat_rate: snap.vat_rate,
            buildings: snap.buildings,
            building_counts,
            event_log: snap.event_log,
            daily_income: snap.daily_income,
            daily_expenses: snap.daily_expenses,
            families: snap.families,
            report: snap.report,
            rng: snap.rng,
        }
    }
}

fn count_kinds(buildings: &[Building]) -> BTreeMap<BuildingKind, usize> {
    let mut counts = BTreeMap::new();
    for b in buildings {
        *counts.entry(b.kind()).or_insert(0) += 1;
    }
    counts
}

impl City {
    /// City with default rates and seed.
    pub fn new(families: usize, budget: i64) -> Self {
        CityBuilder::new().families(families).budget(budget).build()
    }

    pub fn from_config(config: &CityConfig) -> Self {
        CityBuilder::from_config(config.clone()).build()
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn budget(&self) -> i64 {
        self.budget
    }

    pub fn satisfaction(&self) -> i32 {
        self.satisfaction.level()
    }

    pub fn daily_satisfaction_increase(&self) -> i32 {
        self.satisfaction.increase_today()
    }

    pub fn daily_satisfaction_decrease(&self) -> i32 {
        self.satisfaction.decrease_today()
    }

    pub fn families(&self) -> usize {
        self.families.count()
    }

    pub fn family_pool(&self) -> &FamilyPool {
        &self.families
    }

    pub fn tax_rate(&self) -> f64 {
        self.tax_rate
    }

    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building_counts(&self) -> &BTreeMap<BuildingKind, usize> {
        &self.building_counts
    }

    pub fn building_count(&self, kind: BuildingKind) -> usize {
        self.building_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Log lines of the current day only.
    pub fn event_log(&self) -> &[String] {
        &self.event_log
    }

    pub fn daily_income(&self) -> i64 {
        self.daily_income
    }

    pub fn daily_expenses(&self) -> i64 {
        self.daily_expenses
    }

    pub fn daily_report(&self) -> &DailyReport {
        &self.report
    }

    /// Price of a new building of `kind` at the current city size.
    pub fn construction_cost(&self, kind: BuildingKind) -> i64 {
        construction_cost(kind, self.families())
    }

    /// Construct a building by catalog name and pay `cost` for it.
    pub fn add_building(&mut self, kind: &str, cost: i64) -> Result<Building, CityError> {
        let kind: BuildingKind = kind.parse()?;
        Ok(self.construct(kind, cost))
    }

    /// Construct a building of a known kind and pay `cost` for it.
    pub fn construct(&mut self, kind: BuildingKind, cost: i64) -> Building {
        let building = Building::new(kind);
        self.insert(building.clone());
        self.budget -= cost;
        info!(%kind, cost, budget = self.budget, "building constructed");
        self.event_log
            .push(format!("Built a new {kind} for {cost} (budget {})", self.budget));
        building
    }

    fn insert(&mut self, building: Building) {
        *self.building_counts.entry(building.kind()).or_insert(0) += 1;
        self.buildings.push(building);
    }

    /// Set the income tax rate, clamped to [0, 0.4].
    pub fn set_tax_rate(&mut self, rate: f64) {
        let previous = self.tax_rate;
        self.tax_rate = clamp_tax_rate(rate);
        let impact = income_tax_impact(self.tax_rate) / 10.0;
        info!(requested = rate, applied = self.tax_rate, "income tax changed");
        self.event_log.push(format!(
            "Income tax set to {:.1}% (was {:.1}%), satisfaction pressure {impact:.1} per day",
            self.tax_rate * 100.0,
            previous * 100.0
        ));
    }

    /// Set the VAT rate, clamped to [0, 0.25].
    pub fn set_vat_rate(&mut self, rate: f64) {
        let previous = self.vat_rate;
        self.vat_rate = clamp_vat_rate(rate);
        let impact = vat_impact(self.vat_rate) / 10.0;
        info!(requested = rate, applied = self.vat_rate, "VAT changed");
        self.event_log.push(format!(
            "VAT set to {:.1}% (was {:.1}%), satisfaction pressure {impact:.1} per day",
            self.vat_rate * 100.0,
            previous * 100.0
        ));
    }
}

/// Builder for [`City`].
#[derive(Clone, Debug, Default)]
pub struct CityBuilder {
    config: CityConfig,
    rng: Option<ChaCha8Rng>,
}

impl CityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: CityConfig) -> Self {
        Self { config, rng: None }
    }

    pub fn families(mut self, families: usize) -> Self {
        self.config.initial_families = families;
        self
    }

    pub fn budget(mut self, budget: i64) -> Self {
        self.config.initial_budget = budget;
        self
    }

    pub fn satisfaction(mut self, satisfaction: i32) -> Self {
        self.config.initial_satisfaction = satisfaction;
        self
    }

    pub fn tax_rate(mut self, rate: f64) -> Self {
        self.config.tax_rate = rate;
        self
    }

    pub fn vat_rate(mut self, rate: f64) -> Self {
        self.config.vat_rate = rate;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = seed;
        self.rng = None;
        self
    }

    /// Use an explicit generator instead of seeding one from the config.
    pub fn with_rng(mut self, rng: ChaCha8Rng) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn build(self) -> City {
        let cfg = self.config;
        let mut rng = self
            .rng
            .unwrap_or_else(|| ChaCha8Rng::seed_from_u64(cfg.rng_seed));
        let families = FamilyPool::with_random(cfg.initial_families, &mut rng);
        let mut city = City {
            day: 1,
            budget: cfg.initial_budget,
            satisfaction: SatisfactionLedger::new(cfg.initial_satisfaction),
            tax_rate: clamp_tax_rate(cfg.tax_rate),
            vat_rate: clamp_vat_rate(cfg.vat_rate),
            buildings: Vec::new(),
            building_counts: BTreeMap::new(),
            event_log: Vec::new(),
            daily_income: 0,
            daily_expenses: 0,
            families,
            report: DailyReport::default(),
            rng,
        };
        for kind in STARTER_BUILDINGS {
            city.insert(Building::new(kind));
        }
        city.report.day = city.day;
        info!(
            families = city.families(),
            budget = city.budget,
            "city founded"
        );
        city
    }
}
