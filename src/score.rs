//! Per-candidate admission score: urgency, rarity, progress-lag, critical
//! multipliers, correlation bonuses, and a multi-attribute bonus, collapsed
//! through a log normalization. A separate endgame formula dominates once
//! spots are scarce.

use std::collections::{HashMap, HashSet};

use crate::config::{Config, ScoreConstants, Tunables};
use crate::critical::CriticalEntry;
use crate::metrics::Metrics;
use crate::{AttributeId, Score};

pub struct ScoreCalculator {
    constants: ScoreConstants,
    tunables: Tunables,
}

impl ScoreCalculator {
    pub fn new(config: &Config) -> Self {
        Self {
            constants: config.score_constants(),
            tunables: config.tunables,
        }
    }

    /// Regular (non-endgame) admission score for `person_attrs`, before the
    /// final `max_score` clamp applied by `regular_score`.
    #[allow(clippy::too_many_arguments)]
    fn regular(
        &self,
        metrics: &Metrics,
        person_attrs: &HashSet<AttributeId>,
        critical: &HashMap<AttributeId, CriticalEntry>,
        all_quotas_met: bool,
        admitted_count: usize,
        capacity: usize,
        is_endgame: bool,
    ) -> Score {
        if all_quotas_met {
            return 1.0;
        }

        let useful = metrics.useful(person_attrs, is_endgame);
        if useful.is_empty() {
            return 0.0;
        }

        let admitted_ratio = admitted_count as f64 / capacity.max(1) as f64;
        let mut score = 0.0;
        let mut has_critical = false;
        let mut max_critical_modifier = 0.0_f64;

        for a in &useful {
            let needed = metrics.needed(a);
            let urgency = (needed as f64 / self.constants.urgency_divisor).min(self.constants.max_urgency)
                * self.tunables.urgency_modifier;

            let freq = metrics.frequency(a);
            let rarity_bonus = if freq < 0.05 {
                self.tunables.rare_person_bonus.max(self.constants.rarity_bonus_high)
            } else if freq < 0.1 {
                self.constants.rarity_bonus_high
            } else if freq < 0.4 {
                self.constants.rarity_bonus_medium
            } else {
                1.0
            };

            let progress = metrics.progress(a);
            let mut progress_urgency = if progress < 0.2 {
                self.constants.progress_bonus_low
            } else if progress < 0.5 {
                self.constants.progress_bonus_medium
            } else {
                1.0
            };
            if freq > 0.4 && progress < 0.6 {
                progress_urgency *= 1.5;
            }

            let velocity = if admitted_ratio > 0.05 { progress / admitted_ratio } else { 1.0 };
            let velocity_bonus = if velocity < 0.8 {
                2.0
            } else if velocity < 0.9 {
                1.5
            } else {
                1.0
            };

            let correlation_bonus = if progress < 0.9
                && person_attrs
                    .iter()
                    .any(|b| b != a && metrics.correlation(a, b) < self.tunables.negative_correlation_threshold)
            {
                self.tunables.negative_correlation_bonus
            } else {
                1.0
            };

            if let Some(entry) = critical.get(a) {
                has_critical = true;
                max_critical_modifier = max_critical_modifier.max(entry.modifier);
            }

            score += urgency * rarity_bonus * progress_urgency * velocity_bonus * correlation_bonus;
        }

        if has_critical {
            score *= max_critical_modifier.min(self.constants.critical_cap);
        }
        if useful.len() > 1 {
            score *= 1.0 + (useful.len() - 1) as f64 * self.tunables.multi_attribute_bonus;
        }

        (score + 1.0).ln() / self.constants.normalization_base.ln().max(1e-9)
    }

    /// Called only when spots are scarce (`is_endgame`); scarcity-weighted
    /// urgency over the candidate's still-incomplete useful attributes.
    pub fn endgame(&self, metrics: &Metrics, person_attrs: &HashSet<AttributeId>, spots_left: usize) -> Score {
        let useful = metrics.useful(person_attrs, true);
        let mut total = 0.0;
        for a in &useful {
            let urgency = (metrics.needed(a) as f64 / spots_left.max(1) as f64).min(5.0);
            let scarcity = 1.0 / metrics.frequency(a).max(0.01);
            total += urgency * scarcity;
        }
        total.min(self.constants.max_endgame_score)
    }

    /// Public entry point used by the decider: the regular score, already
    /// clamped at `max_score`.
    pub fn regular_score(
        &self,
        metrics: &Metrics,
        person_attrs: &HashSet<AttributeId>,
        critical: &HashMap<AttributeId, CriticalEntry>,
        all_quotas_met: bool,
        admitted_count: usize,
        capacity: usize,
        is_endgame: bool,
    ) -> Score {
        self.regular(
            metrics,
            person_attrs,
            critical,
            all_quotas_met,
            admitted_count,
            capacity,
            is_endgame,
        )
        .min(self.constants.max_score)
    }
}
