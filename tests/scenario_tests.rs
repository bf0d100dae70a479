//! Boundary scenarios exercising `AdmissionDecider` end to end, as literal
//! (input, expected output) pairs rather than property sweeps.

use std::collections::{HashMap, HashSet};

use turnstile::config::{Config, Preset, Tunables};
use turnstile::decider::{AdmissionDecider, Candidate};
use turnstile::metrics::Metrics;

fn candidate(attrs: &[&str]) -> Candidate {
    Candidate {
        attributes: attrs.iter().map(|s| s.to_string()).collect(),
    }
}

fn two_constraint_decider() -> AdmissionDecider {
    let mut frequency = HashMap::new();
    frequency.insert("a".to_string(), 0.3);
    frequency.insert("b".to_string(), 0.1);
    let mut correlation = HashMap::new();
    correlation.insert(("a".to_string(), "a".to_string()), 1.0);
    correlation.insert(("b".to_string(), "b".to_string()), 1.0);
    correlation.insert(("a".to_string(), "b".to_string()), -0.6);
    correlation.insert(("b".to_string(), "a".to_string()), -0.6);
    let metrics = Metrics::new(
        1000,
        vec![("a".to_string(), 300), ("b".to_string(), 400)],
        frequency,
        correlation,
    );
    let config = Config {
        scenario_id: "s1".into(),
        capacity: 1000,
        total_people: 10_000,
        preset: Preset::Balanced,
        tunables: Tunables::default(),
    };
    AdmissionDecider::new(config, metrics)
}

#[test]
fn e3_negatively_correlated_pair_admitted_at_start() {
    let mut decider = two_constraint_decider();
    let person = candidate(&["a", "b"]);
    assert!(decider.admit(0, 0, Some(&person)));
    assert_eq!(decider.metrics().count("a"), 1);
    assert_eq!(decider.metrics().count("b"), 1);
}

#[test]
fn e4_warmup_suppresses_critical_until_fiftieth_admit() {
    let mut decider = two_constraint_decider();
    let both = candidate(&["a", "b"]);
    for i in 0..49 {
        assert!(decider.admit(i, 0, Some(&both)), "admit #{i} should succeed pre-warmup");
    }
    assert_eq!(decider.metrics().count("b"), 49);
    // admitted_count=49 is still < WARMUP_ADMITTED; the critical table stays
    // empty for this call too, but admission still succeeds on score alone.
    assert!(decider.admit(49, 0, Some(&both)));
    assert_eq!(decider.metrics().count("b"), 50);
}

fn endgame_decider() -> AdmissionDecider {
    let mut frequency = HashMap::new();
    frequency.insert("c".to_string(), 0.2);
    let mut correlation = HashMap::new();
    correlation.insert(("c".to_string(), "c".to_string()), 1.0);
    let mut metrics = Metrics::new(1000, vec![("c".to_string(), 500)], frequency, correlation);
    let mut attrs = HashSet::new();
    attrs.insert("c".to_string());
    for _ in 0..485 {
        metrics.record_admit(&attrs);
    }
    let config = Config {
        scenario_id: "s2".into(),
        capacity: 1000,
        total_people: 10_000,
        preset: Preset::Balanced,
        tunables: Tunables::default(),
    };
    AdmissionDecider::new(config, metrics)
}

#[test]
fn e5_endgame_candidate_with_needed_attribute_admitted() {
    let mut decider = endgame_decider();
    // spots_left = 1000 - 985 = 15, needed(c) = 15: inside the endgame band.
    let person = candidate(&["c"]);
    assert!(decider.admit(985, 0, Some(&person)));
}

#[test]
fn e6_endgame_candidate_with_no_needed_attribute_rejected() {
    let mut decider = endgame_decider();
    let person = candidate(&["z"]);
    assert!(!decider.admit(985, 0, Some(&person)));
}

#[test]
fn p1_per_constraint_counts_never_exceed_admits_so_far() {
    let mut decider = two_constraint_decider();
    let both = candidate(&["a", "b"]);
    let mut admitted = 0usize;
    let mut rejected = 0usize;
    for _ in 0..300 {
        if decider.admit(admitted, rejected, Some(&both)) {
            admitted += 1;
        } else {
            rejected += 1;
        }
        assert!(decider.metrics().count("a") <= admitted);
        assert!(decider.metrics().count("b") <= admitted);
    }
}

#[test]
fn p3_all_quotas_met_admits_any_candidate() {
    let mut frequency = HashMap::new();
    frequency.insert("a".to_string(), 0.5);
    let mut correlation = HashMap::new();
    correlation.insert(("a".to_string(), "a".to_string()), 1.0);
    let metrics = Metrics::new(1000, vec![("a".to_string(), 0)], frequency, correlation);
    let mut decider = AdmissionDecider::new(Config::default(), metrics);
    let empty = candidate(&[]);
    assert!(decider.admit(0, 0, Some(&empty)));
}
