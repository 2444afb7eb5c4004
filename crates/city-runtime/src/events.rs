//! Random city events.
//!
//! Every day the engine rolls once for an event. A fired event always
//! resolves to exactly one of fire, epidemic, economic crisis or grant and
//! produces exactly one log line.

use city_core::{Building, Coverage, Difficulty, ServiceCapacity};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of random events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Fire,
    Epidemic,
    EconomicCrisis,
    Grant,
}

impl EventKind {
    pub fn is_negative(self) -> bool {
        !matches!(self, EventKind::Grant)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Fire => "Fire",
            EventKind::Epidemic => "Epidemic",
            EventKind::EconomicCrisis => "Economic crisis",
            EventKind::Grant => "Grant",
        })
    }
}

/// City state an event is resolved against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventContext {
    /// Current family count, which also selects the difficulty tier.
    pub families: usize,
    /// Budget before the event.
    pub budget: i64,
    /// Satisfaction before the event.
    pub satisfaction: i32,
    /// Capacities aggregated over the current buildings.
    pub capacity: ServiceCapacity,
    /// `capacity` measured against `families`.
    pub coverage: Coverage,
}

impl EventContext {
    pub fn new(families: usize, budget: i64, satisfaction: i32, buildings: &[Building]) -> Self {
        let capacity = ServiceCapacity::aggregate(buildings);
        Self {
            families,
            budget,
            satisfaction,
            capacity,
            coverage: capacity.coverage(families),
        }
    }

    fn difficulty(&self) -> Difficulty {
        Difficulty::for_families(self.families)
    }

    /// Pick a value by size tier: up to 50, more than 50, more than 100 families.
    fn by_tier<T>(&self, small: T, medium: T, large: T) -> T {
        match self.difficulty() {
            Difficulty::Village => small,
            Difficulty::Town => medium,
            Difficulty::City | Difficulty::Metropolis => large,
        }
    }

    fn positive_budget(&self) -> f64 {
        self.budget.max(0) as f64
    }
}

/// Effect of a resolved event, not yet applied to the city.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// Which event fired.
    pub kind: EventKind,
    /// Signed change to the budget.
    pub budget_delta: i64,
    /// Signed change requested from the satisfaction ledger.
    pub satisfaction_delta: i32,
    /// Log line describing what happened.
    pub message: String,
}

/// Daily chance that any event fires.
pub fn event_probability(ctx: &EventContext) -> f64 {
    let base = ctx.by_tier(0.05, 0.07, 0.10);
    let service = ctx.coverage.service_average();
    if service < 0.7 {
        base + 0.07 * (0.7 - service) / 0.7
    } else {
        base
    }
}

/// Share of fired events that are negative.
pub fn negative_share(ctx: &EventContext) -> f64 {
    (0.75 + 0.21 * (1.0 - ctx.coverage.service_average())).min(0.95)
}

/// Roll for today's event and resolve it if one fires.
pub fn roll_event<R: Rng + ?Sized>(
    ctx: &EventContext,
    buildings: &[Building],
    rng: &mut R,
) -> Option<EventOutcome> {
    if rng.gen::<f64>() >= event_probability(ctx) {
        return None;
    }
    let kind = if rng.gen::<f64>() < negative_share(ctx) {
        match rng.gen_range(0..3) {
            0 => EventKind::Fire,
            1 => EventKind::Epidemic,
            _ => EventKind::EconomicCrisis,
        }
    } else {
        EventKind::Grant
    };
    Some(resolve(kind, ctx, buildings, rng))
}

/// Resolve a specific event kind.
pub fn resolve<R: Rng + ?Sized>(
    kind: EventKind,
    ctx: &EventContext,
    buildings: &[Building],
    rng: &mut R,
) -> EventOutcome {
    match kind {
        EventKind::Fire => resolve_fire(ctx, buildings, rng),
        EventKind::Epidemic => resolve_epidemic(ctx, rng),
        EventKind::EconomicCrisis => resolve_crisis(ctx, rng),
        EventKind::Grant => resolve_grant(ctx, rng),
    }
}

/// Fire damage for a building with `upkeep` at `severity` in [0.25, 0.75).
///
/// Water plants cut damage by up to half in proportion to water coverage.
pub fn fire_damage(ctx: &EventContext, upkeep: u32, severity: f64) -> i64 {
    let mut damage = 10.0 * f64::from(upkeep) * severity * ctx.by_tier(1.0, 1.2, 1.5);
    if ctx.capacity.water_plants > 0 {
        damage *= 1.0 - 0.5 * ctx.coverage.water;
    }
    damage.round() as i64
}

fn resolve_fire<R: Rng + ?Sized>(
    ctx: &EventContext,
    buildings: &[Building],
    rng: &mut R,
) -> EventOutcome {
    if buildings.is_empty() {
        return EventOutcome {
            kind: EventKind::Fire,
            budget_delta: 0,
            satisfaction_delta: 0,
            message: "FIRE: a blaze broke out on empty land and burned out harmlessly".to_string(),
        };
    }
    let target = &buildings[rng.gen_range(0..buildings.len())];
    let severity = rng.gen_range(0.25..0.75);
    let damage = fire_damage(ctx, target.upkeep(), severity);

    let budget = ctx.budget as f64;
    let mut penalty = 5;
    if damage as f64 > budget * 0.1 {
        penalty += 3;
    }
    if damage as f64 > budget * 0.2 {
        penalty += 5;
    }
    let mitigation = if ctx.capacity.water_plants > 0 {
        format!(
            ", water coverage {:.0}% limited the damage",
            ctx.coverage.water * 100.0
        )
    } else {
        String::new()
    };
    EventOutcome {
        kind: EventKind::Fire,
        budget_delta: -damage,
        satisfaction_delta: -penalty,
        message: format!(
            "FIRE: a {} building burned, repairs cost {damage}{mitigation} \
             (satisfaction -{penalty})",
            target.kind()
        ),
    }
}

fn resolve_epidemic<R: Rng + ?Sized>(ctx: &EventContext, rng: &mut R) -> EventOutcome {
    if ctx.families == 0 {
        return EventOutcome {
            kind: EventKind::Epidemic,
            budget_delta: 0,
            satisfaction_delta: 0,
            message: "EPIDEMIC: an outbreak found no residents to infect".to_string(),
        };
    }
    let severity: i32 = (rng.gen_range(10i32..=30) + ctx.by_tier(0i32, 5, 10)).min(50);
    let affected = ((ctx.families as f64 * f64::from(severity) / 100.0).round() as usize).max(1);
    let cost_per_family = ctx.by_tier(20.0, 25.0, 30.0);

    let mitigation = if ctx.capacity.hospitals > 0 {
        ctx.coverage.healthcare
    } else {
        0.0
    };
    let cost = (affected as f64 * cost_per_family * (1.0 - 0.6 * mitigation)).round() as i64;
    let base_impact = match severity {
        s if s > 40 => 20.0,
        s if s > 30 => 15.0,
        _ => 10.0,
    };
    let impact = (base_impact * (1.0 - 0.7 * mitigation)).round() as i32;
    EventOutcome {
        kind: EventKind::Epidemic,
        budget_delta: -cost,
        satisfaction_delta: -impact,
        message: format!(
            "EPIDEMIC: {severity}% of the city fell ill ({affected} families), \
             treatment cost {cost}, hospitals covered {:.0}% (satisfaction -{impact})",
            mitigation * 100.0
        ),
    }
}

fn resolve_crisis<R: Rng + ?Sized>(ctx: &EventContext, rng: &mut R) -> EventOutcome {
    let mut impact = rng.gen_range(5i64..=15) + ctx.by_tier(0i64, 3, 5);
    let commercial = ctx.capacity.commercial_buildings;
    let total = commercial + ctx.capacity.industrial_buildings;
    let mut balance_note = "";
    if total > 0 {
        let share = commercial as f64 / total as f64;
        if (0.4..=0.6).contains(&share) {
            impact -= 2;
            balance_note = ", a balanced economy softened the blow";
        } else if !(0.3..=0.7).contains(&share) {
            impact += 3;
            balance_note = ", a lopsided economy made it worse";
        }
    }
    let impact = impact.clamp(3, 25);
    let loss = (ctx.positive_budget() * impact as f64 / 100.0).round() as i64;
    let penalty = match impact {
        i if i > 20 => 17,
        i if i > 15 => 12,
        _ => 8,
    };
    EventOutcome {
        kind: EventKind::EconomicCrisis,
        budget_delta: -loss,
        satisfaction_delta: -penalty,
        message: format!(
            "ECONOMIC CRISIS: the city lost {impact}% of its budget ({loss}){balance_note} \
             (satisfaction -{penalty})"
        ),
    }
}

fn resolve_grant<R: Rng + ?Sized>(ctx: &EventContext, rng: &mut R) -> EventOutcome {
    let mut share = rng.gen_range(10i64..=20) - ctx.by_tier(0i64, 2, 5);
    if ctx.satisfaction < 40 {
        share += 5;
    }
    let share = share.clamp(5, 25);
    let amount = ((ctx.positive_budget() * share as f64 / 100.0).round() as i64).max(100);
    let gain = match share {
        s if s > 20 => 10,
        s if s > 15 => 7,
        _ => 5,
    };
    EventOutcome {
        kind: EventKind::Grant,
        budget_delta: amount,
        satisfaction_delta: gain,
        message: format!(
            "GRANT: the region awarded a {share}% grant of {amount} (satisfaction +{gain})"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use city_core::BuildingKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn buildings(kinds: &[BuildingKind]) -> Vec<Building> {
        kinds.iter().copied().map(Building::new).collect()
    }

    fn starter() -> Vec<Building> {
        buildings(&[
            BuildingKind::Residential,
            BuildingKind::School,
            BuildingKind::Hospital,
            BuildingKind::WaterPlant,
            BuildingKind::PowerPlant,
        ])
    }

    #[test]
    fn probability_tiers() {
        let b = starter();
        assert!((event_probability(&EventContext::new(10, 0, 50, &b)) - 0.05).abs() < 1e-12);
        let bare = EventContext::new(60, 0, 50, &[]);
        // 60 families, no services at all
        assert!((event_probability(&bare) - 0.14).abs() < 1e-12);
        assert!((negative_share(&bare) - 0.95).abs() < 1e-12);
        assert!((negative_share(&EventContext::new(10, 0, 50, &b)) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn water_plant_reduces_fire_damage() {
        let targets = buildings(&[BuildingKind::Industrial, BuildingKind::Residential]);
        let mut with_water = targets.clone();
        with_water.push(Building::new(BuildingKind::WaterPlant));
        let wet = EventContext::new(20, 1000, 50, &with_water);
        let dry = EventContext::new(20, 1000, 50, &targets);
        assert_eq!(wet.coverage.water, 1.0);

        for seed in 0..32 {
            let a = resolve(EventKind::Fire, &wet, &targets, &mut ChaCha8Rng::seed_from_u64(seed));
            let b = resolve(EventKind::Fire, &dry, &targets, &mut ChaCha8Rng::seed_from_u64(seed));
            assert!(
                a.budget_delta.abs() < b.budget_delta.abs(),
                "seed {seed}: {} vs {}",
                a.budget_delta,
                b.budget_delta
            );
        }
        assert_eq!(fire_damage(&dry, 20, 0.5), 100);
        assert_eq!(fire_damage(&wet, 20, 0.5), 50);
    }

    #[test]
    fn fire_scales_with_city_size() {
        let b = buildings(&[BuildingKind::Park]);
        assert_eq!(fire_damage(&EventContext::new(10, 0, 50, &b), 20, 0.5), 100);
        assert_eq!(fire_damage(&EventContext::new(60, 0, 50, &b), 20, 0.5), 120);
        assert_eq!(fire_damage(&EventContext::new(300, 0, 50, &b), 20, 0.5), 150);
    }

    #[test]
    fn fire_penalty_grows_with_relative_damage() {
        let b = buildings(&[BuildingKind::PowerPlant]);
        let poor = EventContext::new(10, 100, 50, &[]);
        let out = resolve(EventKind::Fire, &poor, &b, &mut ChaCha8Rng::seed_from_u64(3));
        // at least 100 damage against a budget of 100
        assert_eq!(out.satisfaction_delta, -13);
        let rich = EventContext::new(10, 1_000_000, 50, &[]);
        let out = resolve(EventKind::Fire, &rich, &b, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(out.satisfaction_delta, -5);
    }

    #[test]
    fn epidemic_without_families_is_harmless() {
        let ctx = EventContext::new(0, 500, 50, &starter());
        let out = resolve(EventKind::Epidemic, &ctx, &[], &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(out.budget_delta, 0);
        assert_eq!(out.satisfaction_delta, 0);
        assert!(out.message.starts_with("EPIDEMIC"));
    }

    #[test]
    fn hospitals_mitigate_epidemics() {
        let covered = EventContext::new(40, 1000, 50, &buildings(&[BuildingKind::Hospital]));
        let bare = EventContext::new(40, 1000, 50, &[]);
        for seed in 0..16 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let a = resolve(EventKind::Epidemic, &covered, &[], &mut rng);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let b = resolve(EventKind::Epidemic, &bare, &[], &mut rng);
            assert!(a.budget_delta > b.budget_delta);
            assert!(a.satisfaction_delta > b.satisfaction_delta);
            assert!(b.budget_delta <= -20 * 4);
        }
    }

    #[test]
    fn crisis_impact_is_bounded() {
        let lopsided = buildings(&[BuildingKind::Industrial; 4]);
        for seed in 0..64 {
            let ctx = EventContext::new(300, 10_000, 50, &lopsided);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let out = resolve(EventKind::EconomicCrisis, &ctx, &[], &mut rng);
            assert!(out.budget_delta <= -300 && out.budget_delta >= -2500);
            assert!(out.message.contains("lopsided"));
        }
        let broke = EventContext::new(10, -500, 50, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = resolve(EventKind::EconomicCrisis, &broke, &[], &mut rng);
        assert_eq!(out.budget_delta, 0);
    }

    #[test]
    fn grant_has_a_floor() {
        let ctx = EventContext::new(10, 0, 30, &[]);
        for seed in 0..16 {
            let out = resolve(EventKind::Grant, &ctx, &[], &mut ChaCha8Rng::seed_from_u64(seed));
            assert_eq!(out.budget_delta, 100);
            assert!(out.satisfaction_delta >= 5);
        }
        let rich = EventContext::new(10, 10_000, 80, &[]);
        let out = resolve(EventKind::Grant, &rich, &[], &mut ChaCha8Rng::seed_from_u64(2));
        assert!((1000..=2000).contains(&out.budget_delta));
    }

    #[test]
    fn fired_events_always_resolve() {
        let b = starter();
        let ctx = EventContext::new(150, 2000, 20, &b[..1]);
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut fired = 0;
        for _ in 0..2000 {
            if let Some(out) = roll_event(&ctx, &b, &mut rng) {
                fired += 1;
                assert!(!out.message.is_empty());
                assert_eq!(out.kind.is_negative(), out.satisfaction_delta <= 0);
            }
        }
        assert!(fired > 0);
    }
}
