//! Demo binary: drives `AdmissionDecider` over a synthetic candidate stream
//! sampled from a small hard-coded set of attribute frequencies and
//! correlations, for local experimentation and manual verification.

use std::collections::{HashMap, HashSet};

use clap::Parser;
use colored::Colorize;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use turnstile::config::CliOverrides;
use turnstile::decider::{AdmissionDecider, Candidate};
use turnstile::metrics::Metrics;

/// Attribute id, relative frequency, and quota as a fraction of capacity.
const ATTRIBUTES: &[(&str, f64, f64)] = &[
    ("young", 0.35, 0.40),
    ("well_dressed", 0.25, 0.30),
    ("creative", 0.15, 0.25),
];

/// Pairwise correlations over the attributes above; anything unlisted is
/// treated as uncorrelated.
const CORRELATIONS: &[(&str, &str, f64)] = &[("young", "creative", 0.4), ("well_dressed", "creative", -0.55)];

fn sample_person(rng: &mut SmallRng) -> Candidate {
    use rand::Rng;
    let attributes: HashSet<String> = ATTRIBUTES
        .iter()
        .filter(|(_, freq, _)| rng.random::<f64>() < *freq)
        .map(|(id, _, _)| id.to_string())
        .collect();
    Candidate { attributes }
}

fn build_metrics(capacity: usize) -> Metrics {
    let mut frequency = HashMap::new();
    let mut correlation = HashMap::new();
    let mut constraints = Vec::new();
    for (id, freq, quota_fraction) in ATTRIBUTES {
        frequency.insert(id.to_string(), *freq);
        correlation.insert((id.to_string(), id.to_string()), 1.0);
        constraints.push((id.to_string(), (*quota_fraction * capacity as f64).round() as usize));
    }
    for (a, b, corr) in CORRELATIONS {
        correlation.insert((a.to_string(), b.to_string()), *corr);
        correlation.insert((b.to_string(), a.to_string()), *corr);
    }
    Metrics::new(capacity, constraints, frequency, correlation)
}

fn main() -> anyhow::Result<()> {
    turnstile::init_logging();
    let cli = CliOverrides::parse();
    let seed = cli.seed;
    let config = cli.into_config();
    log::info!(
        "starting scenario {} capacity={} preset={:?}",
        config.scenario_id,
        config.capacity,
        config.preset
    );

    let metrics = build_metrics(config.capacity);
    let total_people = config.total_people;
    let capacity = config.capacity;
    let mut decider = AdmissionDecider::new(config, metrics);

    let mut rng = SmallRng::seed_from_u64(seed);
    let bar = turnstile::progress(total_people);

    let mut admitted = 0usize;
    let mut rejected = 0usize;
    for _ in 0..total_people {
        if admitted >= capacity {
            break;
        }
        let person = sample_person(&mut rng);
        let ok = decider.admit(admitted, rejected, Some(&person));
        if ok {
            admitted += 1;
        } else {
            rejected += 1;
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    let all_met = decider.metrics().all_constraints_met();
    println!(
        "{} admitted={} rejected={} capacity={}",
        if all_met { "SUCCESS".green() } else { "SHORTFALL".red() },
        admitted,
        rejected,
        capacity,
    );
    for (id, _, _) in ATTRIBUTES {
        println!(
            "  {:<14} needed={:<6} progress={:.2}",
            id,
            decider.metrics().needed(id),
            decider.metrics().progress(id),
        );
    }
    if !all_met {
        log::warn!("scenario finished without meeting every quota");
    }

    Ok(())
}
