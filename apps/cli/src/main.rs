#![deny(warnings)]

//! Headless runner: simulates a city for a number of days and prints KPIs.

use anyhow::{bail, Context, Result};
use city_core::{validate_config, CityConfig};
use city_runtime::City;
use city_score::{score_with, ScoreFormula};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    days: Option<u32>,
    seed: Option<u64>,
    families: Option<usize>,
    budget: Option<i64>,
    tax: Option<f64>,
    vat: Option<f64>,
    legacy_score: bool,
    quiet: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        let mut value = |name: &str| it.next().with_context(|| format!("{name} needs a value"));
        match arg.as_str() {
            "--config" => args.config = Some(value("--config")?),
            "--days" => args.days = Some(value("--days")?.parse()?),
            "--seed" => args.seed = Some(value("--seed")?.parse()?),
            "--families" => args.families = Some(value("--families")?.parse()?),
            "--budget" => args.budget = Some(value("--budget")?.parse()?),
            "--tax" => args.tax = Some(value("--tax")?.parse()?),
            "--vat" => args.vat = Some(value("--vat")?.parse()?),
            "--legacy-score" => args.legacy_score = true,
            "--quiet" => args.quiet = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(args)
}

fn load_config(args: &Args) -> Result<CityConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => CityConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    if let Some(families) = args.families {
        cfg.initial_families = families;
    }
    if let Some(budget) = args.budget {
        cfg.initial_budget = budget;
    }
    if let Some(tax) = args.tax {
        cfg.tax_rate = tax;
    }
    if let Some(vat) = args.vat {
        cfg.vat_rate = vat;
    }
    validate_config(&cfg)?;
    Ok(cfg)
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::DEBUG)
        .init();

    let args = parse_args()?;
    let cfg = load_config(&args)?;
    let days = args.days.unwrap_or(30);
    info!(build = env!("GIT_SHA"), ?cfg, days, "starting city");

    let mut city = City::from_config(&cfg);
    for _ in 0..days {
        city.advance_day();
        let r = city.daily_report();
        if !args.quiet {
            println!(
                "Day {:>4} | budget {:>8} | net {:>+6} | families {:>4} | satisfaction {:>3}% | {}",
                r.day,
                city.budget(),
                r.net(),
                city.families(),
                city.satisfaction(),
                r.event.map(|e| e.to_string()).unwrap_or_else(|| "-".into())
            );
            for line in city.event_log() {
                println!("           {line}");
            }
        }
        if city.budget() < 0 {
            warn!(day = city.day(), budget = city.budget(), "budget exhausted");
            break;
        }
    }

    let formula = if args.legacy_score {
        ScoreFormula::Legacy
    } else {
        ScoreFormula::Standard
    };
    println!(
        "Final | day: {} | families: {} | budget: {} | satisfaction: {}% | score: {}",
        city.day(),
        city.families(),
        city.budget(),
        city.satisfaction(),
        score_with(&city, formula)
    );
    Ok(())
}
