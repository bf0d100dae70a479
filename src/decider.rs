//! Composes Metrics, the score calculator, the deflation controller, the
//! critical detector, and the threshold controller into the single
//! mutating entry point: `admit`. Always total — every call returns a
//! boolean, never an error. `Metrics` is value-owned here with one-way
//! calls only; the decider is the sole writer of its state.

use std::collections::HashSet;

use crate::config::Config;
use crate::critical::CriticalDetector;
use crate::deflation::{DeflationController, DeflationLaw};
use crate::metrics::{Metrics, RiskAssessment};
use crate::score::ScoreCalculator;
use crate::threshold::ThresholdController;
use crate::transport::NextPerson;
use crate::AttributeId;

/// A single candidate's boolean attribute set.
#[derive(Debug, Clone, Default)]
pub struct Candidate {
    pub attributes: HashSet<AttributeId>,
}

impl From<&NextPerson> for Candidate {
    fn from(person: &NextPerson) -> Self {
        Self {
            attributes: person
                .attributes
                .iter()
                .filter_map(|(k, v)| v.then(|| k.clone()))
                .collect(),
        }
    }
}

const EMERGENCY_PEOPLE_LEFT_RATIO: f64 = 5.0;
const EMERGENCY_SPOTS_LEFT: usize = 100;
const ENDGAME_SPOTS_LEFT: usize = 50;
const LATE_GAME_SPOTS_LEFT: usize = 20;
const REGULAR_SCORE_ENDGAME_GATE: f64 = 0.3;
const ENDGAME_ADMIT_THRESHOLD: f64 = 0.5;

pub struct AdmissionDecider {
    config: Config,
    metrics: Metrics,
    score_calc: ScoreCalculator,
    deflation: DeflationController,
    critical_detector: CriticalDetector,
    threshold_ctrl: ThresholdController,
    risk: RiskAssessment,
}

impl AdmissionDecider {
    pub fn new(config: Config, metrics: Metrics) -> Self {
        Self::with_deflation_law(config, metrics, DeflationLaw::TieredStep, false)
    }

    pub fn with_deflation_law(
        config: Config,
        metrics: Metrics,
        law: DeflationLaw,
        adaptive: bool,
    ) -> Self {
        let score_calc = ScoreCalculator::new(&config);
        let deflation = DeflationController::new(law, config.tunables.target_rate, adaptive);
        let critical_detector = CriticalDetector::new(config.tunables);
        let threshold_ctrl = ThresholdController::new(config.tunables);
        let risk = metrics.risk(config.total_people);
        Self {
            config,
            metrics,
            score_calc,
            deflation,
            critical_detector,
            threshold_ctrl,
            risk,
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn risk(&self) -> &RiskAssessment {
        &self.risk
    }

    fn is_endgame(spots_left: usize) -> bool {
        spots_left > 0 && spots_left <= ENDGAME_SPOTS_LEFT
    }

    /// The sole mutating entry point. `admitted_count`/`rejected_count` are
    /// the running totals reported by the caller for this step;
    /// `next_person` is `None` when the stream has nothing to offer.
    pub fn admit(
        &mut self,
        admitted_count: usize,
        rejected_count: usize,
        next_person: Option<&Candidate>,
    ) -> bool {
        let Some(person) = next_person else {
            return false;
        };

        if self.metrics.all_constraints_met() {
            self.metrics.record_admit(&person.attributes);
            self.risk = self.metrics.risk(self.people_in_line_left(admitted_count, rejected_count));
            return true;
        }

        let capacity = self.config.capacity;
        let spots_left = capacity.saturating_sub(admitted_count);
        let is_endgame = Self::is_endgame(spots_left);
        let people_in_line_left = self.people_in_line_left(admitted_count, rejected_count);

        let critical = self.critical_detector.detect(
            &self.metrics,
            admitted_count,
            spots_left,
            people_in_line_left,
            &self.risk,
        );

        let useful = self.metrics.useful(&person.attributes, is_endgame);

        let regular = self.score_calc.regular_score(
            &self.metrics,
            &person.attributes,
            &critical,
            false,
            admitted_count,
            capacity,
            is_endgame,
        );
        let endgame = if regular < REGULAR_SCORE_ENDGAME_GATE {
            self.score_calc.endgame(&self.metrics, &person.attributes, spots_left)
        } else {
            0.0
        };
        let raw = regular.max(endgame);

        let deflation_factor = self.deflation.factor(admitted_count, rejected_count, capacity);
        let score = raw * deflation_factor;

        let realized_rate = if admitted_count + rejected_count == 0 {
            0.0
        } else {
            admitted_count as f64 / (admitted_count + rejected_count) as f64
        };
        let threshold = self.threshold_ctrl.threshold(
            admitted_count + rejected_count,
            self.metrics.total_progress(),
            realized_rate,
        );

        let has_every_attribute = self
            .metrics
            .attribute_ids()
            .all(|a| person.attributes.contains(a));
        let has_every_critical_attribute =
            !critical.is_empty() && critical.keys().all(|a| person.attributes.contains(a));
        let has_some_critical_attribute = critical.keys().any(|a| person.attributes.contains(a));
        let emergency_admit = {
            let total_needed = self.metrics.total_needed();
            (people_in_line_left as f64 / total_needed.max(1) as f64) < EMERGENCY_PEOPLE_LEFT_RATIO
                && spots_left < EMERGENCY_SPOTS_LEFT
                && !useful.is_empty()
        };

        let admit = has_every_attribute
            || has_every_critical_attribute
            || (is_endgame && endgame > ENDGAME_ADMIT_THRESHOLD)
            || score > threshold
            || (spots_left < LATE_GAME_SPOTS_LEFT && has_some_critical_attribute)
            || emergency_admit;

        if admit {
            self.metrics.record_admit(&person.attributes);
            self.risk = self.metrics.risk(people_in_line_left.saturating_sub(1));
        }
        admit
    }

    fn people_in_line_left(&self, admitted_count: usize, rejected_count: usize) -> usize {
        self.config
            .total_people
            .saturating_sub(admitted_count + rejected_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Preset, Tunables};
    use std::collections::HashMap;

    fn s0_decider() -> AdmissionDecider {
        let mut frequency = HashMap::new();
        frequency.insert("a".to_string(), 0.5);
        let mut correlation = HashMap::new();
        correlation.insert(("a".to_string(), "a".to_string()), 1.0);
        let metrics = Metrics::new(1000, vec![("a".to_string(), 500)], frequency, correlation);
        let config = Config {
            scenario_id: "s0".into(),
            capacity: 1000,
            total_people: 10_000,
            preset: Preset::Balanced,
            tunables: Tunables::default(),
        };
        AdmissionDecider::new(config, metrics)
    }

    fn candidate(attrs: &[&str]) -> Candidate {
        Candidate {
            attributes: attrs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn p2_absent_candidate_always_rejected() {
        let mut decider = s0_decider();
        assert!(!decider.admit(0, 0, None));
    }

    #[test]
    fn p3_all_quotas_met_admits_regardless_of_attributes() {
        let mut frequency = HashMap::new();
        frequency.insert("a".to_string(), 0.5);
        let mut correlation = HashMap::new();
        correlation.insert(("a".to_string(), "a".to_string()), 1.0);
        // min_count 0 => trivially satisfied from the start
        let metrics = Metrics::new(1000, vec![("a".to_string(), 0)], frequency, correlation);
        let config = Config::default();
        let mut decider = AdmissionDecider::new(config, metrics);
        let empty = candidate(&[]);
        assert!(decider.admit(0, 0, Some(&empty)));
    }

    #[test]
    fn e1_stream_admits_until_quota_then_falls_back_to_short_circuit() {
        let mut decider = s0_decider();
        let present = candidate(&["a"]);
        let mut admitted = 0usize;
        let mut rejected = 0usize;
        for _ in 0..600 {
            let ok = decider.admit(admitted, rejected, Some(&present));
            if ok {
                admitted += 1;
            } else {
                rejected += 1;
            }
        }
        assert_eq!(admitted, 600);
        assert_eq!(rejected, 0);
        assert_eq!(decider.metrics().count("a"), 500);
    }

    fn s2_metrics() -> Metrics {
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
        metrics
    }

    #[test]
    fn s2_endgame_candidate_admitted_via_late_game_critical_rule() {
        let config = Config {
            capacity: 1000,
            ..Config::default()
        };
        let mut decider = AdmissionDecider::new(config, s2_metrics());
        // needed("c") = 15, spots_left = 1000 - 985 = 15 < 20
        let present = candidate(&["c"]);
        assert!(decider.admit(985, 0, Some(&present)));
    }

    #[test]
    fn e6_endgame_candidate_with_no_needed_attribute_rejected() {
        let config = Config {
            capacity: 1000,
            ..Config::default()
        };
        let mut decider = AdmissionDecider::new(config, s2_metrics());
        let absent = candidate(&["z"]);
        assert!(!decider.admit(985, 0, Some(&absent)));
    }
}
