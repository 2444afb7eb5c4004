//! The daily tick: economy, events, satisfaction, population, in that order.

use city_core::{BuildingKind, ServiceCapacity};
use city_econ::{compute_expenses, compute_income, shortage_notes, SatisfactionBreakdown};
use tracing::{debug, info, warn};

use crate::city::{City, DailyReport};
use crate::events::{roll_event, EventContext};
use crate::population::{self, PopulationContext};

impl City {
    /// Run one full simulated day.
    ///
    /// Resets the per-day counters and the event log, then runs the economic
    /// calculator, the random event engine, the satisfaction engine and
    /// population dynamics, each consuming what the previous stage produced.
    pub fn advance_day(&mut self) {
        self.day += 1;
        self.event_log.clear();
        self.satisfaction.reset_day();
        let mut report = DailyReport {
            day: self.day,
            ..DailyReport::default()
        };
        let start_satisfaction = self.satisfaction.level();

        self.run_economy(&mut report);
        self.run_events(&mut report);
        self.run_satisfaction();
        self.run_population(&mut report);
        self.update_occupancy();

        report.satisfaction_change = self.satisfaction.level() - start_satisfaction;
        debug!(
            day = report.day,
            budget = self.budget,
            families = self.families(),
            satisfaction = self.satisfaction.level(),
            net = report.net(),
            "day complete"
        );
        self.report = report;
    }

    /// Advance `days` days in a row.
    pub fn advance_days(&mut self, days: u32) {
        for _ in 0..days {
            self.advance_day();
        }
    }

    fn run_economy(&mut self, report: &mut DailyReport) {
        let capacity = ServiceCapacity::aggregate(&self.buildings);
        let families = self.families.count();

        let income = compute_income(
            &mut self.families,
            &capacity,
            self.tax_rate,
            self.vat_rate,
            self.satisfaction.level(),
            &mut self.rng,
        );
        let expenses = compute_expenses(&self.buildings, &capacity, families);

        self.daily_income = income.total;
        self.daily_expenses = expenses.total;
        self.budget += income.total - expenses.total;
        report.income = income.total;
        report.expenses = expenses.total;
        report.hired = income.employment.hired;

        self.event_log.push(format!(
            "Income {} (income tax {:.0}, VAT {:.0}), expenses {} (upkeep {:.0}, services {:.0}, \
             utilities {:.0}), budget {}",
            income.total,
            income.income_tax,
            income.vat,
            expenses.total,
            expenses.upkeep,
            expenses.services,
            expenses.water + expenses.power,
            self.budget
        ));
        if income.employment.hired > 0 {
            self.event_log
                .push(format!("{} families found work", income.employment.hired));
        }
        for note in shortage_notes(&capacity, &capacity.coverage(families), families) {
            warn!(day = self.day, "{note}");
            self.event_log.push(note);
        }
    }

    fn run_events(&mut self, report: &mut DailyReport) {
        let ctx = EventContext::new(
            self.families.count(),
            self.budget,
            self.satisfaction.level(),
            &self.buildings,
        );
        let Some(outcome) = roll_event(&ctx, &self.buildings, &mut self.rng) else {
            return;
        };
        self.budget += outcome.budget_delta;
        let applied = self.satisfaction.apply(outcome.satisfaction_delta);
        info!(
            day = self.day,
            kind = %outcome.kind,
            budget_delta = outcome.budget_delta,
            satisfaction = applied,
            "random event"
        );
        self.event_log.push(outcome.message);
        report.event = Some(outcome.kind);
    }

    fn run_satisfaction(&mut self) {
        let capacity = ServiceCapacity::aggregate(&self.buildings);
        let coverage = capacity.coverage(self.families.count());
        let terms = SatisfactionBreakdown::compute(
            &self.buildings,
            &coverage,
            self.tax_rate,
            self.vat_rate,
        );
        let before = self.satisfaction.level();
        let change = self.satisfaction.settle(terms.delta());
        debug!(?terms, raw = terms.raw(), change, "satisfaction");
        if change != 0 {
            self.event_log.push(format!(
                "Satisfaction {change:+} ({before}% -> {}%)",
                self.satisfaction.level()
            ));
        }
    }

    fn run_population(&mut self, report: &mut DailyReport) {
        let ctx = PopulationContext::new(
            self.families.count(),
            self.satisfaction.level(),
            self.tax_rate,
            self.vat_rate,
            &self.buildings,
        );
        let plan = population::plan(&ctx, &mut self.rng);

        let departed = self.families.remove_last(plan.departures);
        self.families.add_random(plan.arrivals, &mut self.rng);
        report.departures = departed;
        report.arrivals = plan.arrivals;
        if plan.arrivals > 0 {
            info!(day = self.day, arrivals = plan.arrivals, "families arrived");
            self.event_log.push(format!(
                "{} new families moved in ({:.0}% chance over {} attempts)",
                plan.arrivals,
                plan.arrival_chance * 100.0,
                plan.attempts
            ));
        }
        if departed > 0 {
            info!(day = self.day, departures = departed, "families left");
            self.event_log.push(format!(
                "{departed} families left the city ({:.0}% chance each)",
                plan.departure_chance * 100.0
            ));
        }

        let housing = usize::try_from(ctx.capacity.housing).unwrap_or(usize::MAX);
        let excess = self.families.count().saturating_sub(housing);
        if excess > 0 {
            let evicted = self.families.remove_last(excess);
            report.evicted = evicted;
            warn!(day = self.day, evicted, housing, "families evicted");
            self.event_log.push(format!(
                "CRITICAL: {evicted} families were evicted, only {housing} housing units exist"
            ));
        }
    }

    /// Spread residents over residential buildings and workers over job
    /// buildings in construction order.
    fn update_occupancy(&mut self) {
        let mut residents = self.families.count() as u64;
        let mut workers = self.families.employed() as u64;
        for b in &mut self.buildings {
            let pool = match b.kind() {
                BuildingKind::Residential => &mut residents,
                BuildingKind::Commercial | BuildingKind::Industrial => &mut workers,
                _ => continue,
            };
            let placed = b.set_occupancy(u32::try_from(*pool).unwrap_or(u32::MAX));
            *pool -= u64::from(placed);
        }
    }
}
