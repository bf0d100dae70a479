//! Quota bookkeeping and the derived statistics every other component reads
//! but never mutates. `Metrics` exclusively owns constraint counters and
//! cached attribute statistics; the decider is the sole writer.

use std::collections::{HashMap, HashSet};

use crate::error::{AdmissionError, Result};
use crate::stats;
use crate::transport::InitPayload;
use crate::{AttributeId, Correlation, Probability};

/// `{ attribute_id, min_count, admitted_count }`. `admitted_count` is
/// monotone non-decreasing and mutated only by `Metrics::record_admit`
/// (or zeroed wholesale by `Metrics::reset`).
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub attribute_id: AttributeId,
    pub min_count: usize,
    pub admitted_count: usize,
}

impl Constraint {
    fn needed(&self) -> usize {
        self.min_count.saturating_sub(self.admitted_count)
    }

    fn progress(&self) -> f64 {
        if self.min_count == 0 {
            return 1.0;
        }
        (self.admitted_count as f64 / self.min_count as f64).min(1.0)
    }

    fn is_completed(&self) -> bool {
        self.admitted_count >= self.min_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationKind {
    Strong,
    Conflict,
}

#[derive(Debug, Clone)]
pub struct CorrelationInsight {
    pub a: AttributeId,
    pub b: AttributeId,
    pub kind: CorrelationKind,
    pub both_needed: bool,
}

/// `{ critical_attributes, risk_score, time_remaining, feasibility_score }`.
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub critical_attributes: HashSet<AttributeId>,
    pub risk_score: f64,
    pub time_remaining: f64,
    pub feasibility_score: f64,
}

impl RiskAssessment {
    fn empty(time_remaining: f64) -> Self {
        Self {
            critical_attributes: HashSet::new(),
            risk_score: 0.0,
            time_remaining,
            feasibility_score: 1.0,
        }
    }
}

#[derive(PartialEq)]
pub struct Metrics {
    capacity: usize,
    constraints: HashMap<AttributeId, Constraint>,
    frequency: HashMap<AttributeId, Probability>,
    correlation: HashMap<(AttributeId, AttributeId), Correlation>,
    correlation_pairs: Vec<(AttributeId, AttributeId, CorrelationKind)>,
}

const STRONG_THRESHOLD: f64 = 0.4;
const CONFLICT_THRESHOLD: f64 = -0.4;

impl Metrics {
    /// Builds Metrics from the initial payload, failing closed if a
    /// referenced attribute lacks a frequency or correlation entry.
    pub fn from_payload(payload: &InitPayload, capacity: usize) -> Result<Self> {
        let mut frequency = HashMap::new();
        for spec in &payload.constraints {
            let freq = *payload
                .attribute_statistics
                .relative_frequencies
                .get(&spec.attribute)
                .ok_or_else(|| AdmissionError::MissingStatistic {
                    attribute: spec.attribute.clone(),
                })?;
            frequency.insert(spec.attribute.clone(), freq);
        }

        let mut correlation = HashMap::new();
        for spec_a in &payload.constraints {
            for spec_b in &payload.constraints {
                let row = payload
                    .attribute_statistics
                    .correlations
                    .get(&spec_a.attribute)
                    .ok_or_else(|| AdmissionError::MissingStatistic {
                        attribute: spec_a.attribute.clone(),
                    })?;
                let value = if spec_a.attribute == spec_b.attribute {
                    *row.get(&spec_b.attribute).unwrap_or(&1.0)
                } else {
                    *row.get(&spec_b.attribute).ok_or_else(|| AdmissionError::MissingCorrelation {
                        a: spec_a.attribute.clone(),
                        b: spec_b.attribute.clone(),
                    })?
                };
                correlation.insert((spec_a.attribute.clone(), spec_b.attribute.clone()), value);
            }
        }

        let constraints = payload
            .constraints
            .iter()
            .map(|spec| {
                (
                    spec.attribute.clone(),
                    Constraint {
                        attribute_id: spec.attribute.clone(),
                        min_count: spec.min_count,
                        admitted_count: 0,
                    },
                )
            })
            .collect();

        Ok(Self::build(capacity, constraints, frequency, correlation))
    }

    /// Lower-level constructor used directly by tests.
    pub fn new(
        capacity: usize,
        constraints: Vec<(AttributeId, usize)>,
        frequency: HashMap<AttributeId, Probability>,
        correlation: HashMap<(AttributeId, AttributeId), Correlation>,
    ) -> Self {
        let constraints = constraints
            .into_iter()
            .map(|(attribute_id, min_count)| {
                (
                    attribute_id.clone(),
                    Constraint {
                        attribute_id,
                        min_count,
                        admitted_count: 0,
                    },
                )
            })
            .collect();
        Self::build(capacity, constraints, frequency, correlation)
    }

    fn build(
        capacity: usize,
        constraints: HashMap<AttributeId, Constraint>,
        frequency: HashMap<AttributeId, Probability>,
        correlation: HashMap<(AttributeId, AttributeId), Correlation>,
    ) -> Self {
        let mut ids: Vec<&AttributeId> = constraints.keys().collect();
        ids.sort();
        let mut correlation_pairs = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in ids.iter().skip(i + 1) {
                let corr = *correlation.get(&((*a).clone(), (*b).clone())).unwrap_or(&0.0);
                if corr > STRONG_THRESHOLD {
                    correlation_pairs.push(((*a).clone(), (*b).clone(), CorrelationKind::Strong));
                } else if corr < CONFLICT_THRESHOLD {
                    correlation_pairs.push(((*a).clone(), (*b).clone(), CorrelationKind::Conflict));
                }
            }
        }
        Self {
            capacity,
            constraints,
            frequency,
            correlation,
            correlation_pairs,
        }
    }

    // -- per-attribute accessors --------------------------------------

    pub fn count(&self, a: &str) -> usize {
        self.constraints.get(a).map(|c| c.admitted_count).unwrap_or(0)
    }

    pub fn needed(&self, a: &str) -> usize {
        self.constraints.get(a).map(|c| c.needed()).unwrap_or(0)
    }

    pub fn progress(&self, a: &str) -> f64 {
        self.constraints.get(a).map(|c| c.progress()).unwrap_or(1.0)
    }

    pub fn is_completed(&self, a: &str) -> bool {
        self.constraints.get(a).map(|c| c.is_completed()).unwrap_or(true)
    }

    pub fn frequency(&self, a: &str) -> f64 {
        *self.frequency.get(a).unwrap_or(&0.0)
    }

    pub fn rarity(&self, a: &str) -> f64 {
        1.0 / self.frequency(a).max(0.01)
    }

    pub fn quota_rate(&self, a: &str) -> f64 {
        match self.constraints.get(a) {
            Some(c) => c.min_count as f64 / self.capacity.max(1) as f64,
            None => 0.0,
        }
    }

    pub fn is_overdemanded(&self, a: &str) -> bool {
        self.quota_rate(a) > 1.5 * self.frequency(a)
    }

    pub fn correlation(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        if let Some(v) = self.correlation.get(&(a.to_string(), b.to_string())) {
            return *v;
        }
        self.correlation.get(&(b.to_string(), a.to_string())).copied().unwrap_or(0.0)
    }

    pub fn positively_correlated(&self, a: &str, theta: f64) -> Vec<AttributeId> {
        self.constraints
            .keys()
            .filter(|b| b.as_str() != a && self.correlation(a, b) > theta)
            .cloned()
            .collect()
    }

    pub fn negatively_correlated(&self, a: &str, theta: f64) -> Vec<AttributeId> {
        self.constraints
            .keys()
            .filter(|b| b.as_str() != a && self.correlation(a, b) < theta)
            .cloned()
            .collect()
    }

    // -- aggregate views -------------------------------------------------

    pub fn total_progress(&self) -> f64 {
        if self.constraints.is_empty() {
            return 1.0;
        }
        let progresses: Vec<f64> = self.constraints.values().map(|c| c.progress()).collect();
        stats::mean(&progresses).min(1.0)
    }

    pub fn all_constraints_met(&self) -> bool {
        self.constraints.values().all(|c| c.is_completed())
    }

    pub fn incomplete_constraints(&self) -> Vec<&Constraint> {
        self.constraints.values().filter(|c| !c.is_completed()).collect()
    }

    pub fn most_needed(&self) -> Vec<&Constraint> {
        let mut cs = self.incomplete_constraints();
        cs.sort_by(|a, b| b.needed().cmp(&a.needed()));
        cs
    }

    pub fn least_progress(&self) -> Vec<&Constraint> {
        let mut cs = self.incomplete_constraints();
        cs.sort_by(|a, b| a.progress().partial_cmp(&b.progress()).unwrap());
        cs
    }

    pub fn rarest(&self) -> Vec<&Constraint> {
        let mut cs = self.incomplete_constraints();
        cs.sort_by(|a, b| {
            self.frequency(&a.attribute_id)
                .partial_cmp(&self.frequency(&b.attribute_id))
                .unwrap()
        });
        cs
    }

    /// Sum of `needed` across all incomplete constraints.
    pub fn total_needed(&self) -> usize {
        self.incomplete_constraints().iter().map(|c| c.needed()).sum()
    }

    pub fn overdemanded(&self) -> Vec<&Constraint> {
        self.constraints
            .values()
            .filter(|c| self.is_overdemanded(&c.attribute_id))
            .collect()
    }

    /// The overfill threshold below which an attribute is still worth
    /// pursuing outside the endgame. Non-decreasing in frequency.
    pub fn overfill_threshold(freq: f64) -> f64 {
        if freq < 0.05 {
            0.95
        } else if freq < 0.10 {
            0.92
        } else {
            stats::clamp(0.82 + 0.3 * freq, 0.85, 0.98)
        }
    }

    /// Attributes the candidate possesses that are still worth admitting
    /// for. Monotone under attribute superset: adding a possessed attribute
    /// never removes entries already present.
    pub fn useful(&self, person_attrs: &HashSet<AttributeId>, is_endgame: bool) -> HashSet<AttributeId> {
        person_attrs
            .iter()
            .filter(|a| self.constraints.contains_key(a.as_str()))
            .filter(|a| {
                if is_endgame {
                    !self.is_completed(a)
                } else {
                    self.progress(a) < Self::overfill_threshold(self.frequency(a))
                }
            })
            .cloned()
            .collect()
    }

    /// Aggregate feasibility assessment over the remaining stream.
    pub fn risk(&self, people_remaining: usize) -> RiskAssessment {
        let time_remaining = 1.0 - self.total_progress();
        let mut incomplete = self.incomplete_constraints();
        if incomplete.is_empty() {
            return RiskAssessment::empty(time_remaining);
        }
        incomplete.sort_by(|a, b| {
            self.frequency(&a.attribute_id)
                .partial_cmp(&self.frequency(&b.attribute_id))
                .unwrap()
        });

        let mut available_people = people_remaining as f64;
        let mut ratios = Vec::with_capacity(incomplete.len());
        for c in &incomplete {
            let expected = people_remaining as f64 * self.frequency(&c.attribute_id);
            let needed = c.needed() as f64;
            let charge = needed.min(0.8 * expected).min(available_people).max(0.0);
            available_people -= charge;
            let r = stats::clamp(3.0 * needed / expected.max(1.0), 0.0, 10.0);
            ratios.push((c.attribute_id.clone(), r));
        }

        let values: Vec<f64> = ratios.iter().map(|(_, r)| *r).collect();
        let risk_score = stats::mean(&values);
        let cutoff = stats::percentile(&values, 0.75);
        let critical_attributes = ratios
            .iter()
            .filter(|(_, r)| *r > cutoff)
            .map(|(a, _)| a.clone())
            .collect();
        let feasibility_score = (1.0 - risk_score / 10.0).max(0.0);

        RiskAssessment {
            critical_attributes,
            risk_score,
            time_remaining,
            feasibility_score,
        }
    }

    /// Unordered attribute pairs classified as strongly correlated or
    /// conflicting, tagged with whether both sides are still incomplete.
    pub fn correlation_insights(&self) -> Vec<CorrelationInsight> {
        self.correlation_pairs
            .iter()
            .map(|(a, b, kind)| CorrelationInsight {
                a: a.clone(),
                b: b.clone(),
                kind: *kind,
                both_needed: !self.is_completed(a) && !self.is_completed(b),
            })
            .collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn attribute_ids(&self) -> impl Iterator<Item = &AttributeId> {
        self.constraints.keys()
    }

    /// Sole mutation entry point: bumps the per-constraint counters for
    /// every constrained attribute the admitted candidate carries.
    pub fn record_admit(&mut self, person_attrs: &HashSet<AttributeId>) {
        for attribute in person_attrs {
            if let Some(c) = self.constraints.get_mut(attribute) {
                c.admitted_count += 1;
            }
        }
    }

    /// Zeroes every constraint's `admitted_count`, restoring the pristine
    /// quota state captured at construction (R1). Frequency, correlation,
    /// and the cached correlation-pair table never change and need no reset.
    pub fn reset(&mut self) {
        for c in self.constraints.values_mut() {
            c.admitted_count = 0;
        }
    }
}
