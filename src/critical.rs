//! Identifies attributes whose projected supply or capacity share makes
//! non-completion plausible, and classifies them as *required* (capacity
//! pressure) or merely *boosted* (scarcity/risk pressure).

use std::collections::HashMap;

use crate::config::Tunables;
use crate::metrics::{Metrics, RiskAssessment};
use crate::stats;
use crate::AttributeId;

/// `{ needed, required, modifier }`. Rebuilt before every decision once
/// warm-up passes.
#[derive(Debug, Clone, Copy)]
pub struct CriticalEntry {
    pub needed: usize,
    pub required: bool,
    pub modifier: f64,
}

pub const WARMUP_ADMITTED: usize = 50;

pub struct CriticalDetector {
    tunables: Tunables,
}

impl CriticalDetector {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    /// Refreshes the critical table. Returns an empty table during warm-up
    /// (`admitted_count < 50`), per spec.
    pub fn detect(
        &self,
        metrics: &Metrics,
        admitted_count: usize,
        spots_left: usize,
        people_in_line_left: usize,
        risk: &RiskAssessment,
    ) -> HashMap<AttributeId, CriticalEntry> {
        let mut table = HashMap::new();
        if admitted_count < WARMUP_ADMITTED {
            return table;
        }

        for constraint in metrics.incomplete_constraints() {
            let a = constraint.attribute_id.as_str();
            let needed = metrics.needed(a);
            let urgency_ratio = needed as f64 / spots_left.max(1) as f64;
            let expected_remaining = people_in_line_left as f64 * metrics.frequency(a);
            let scarcity_ratio = needed as f64 / expected_remaining.max(1.0);

            let capacity_critical = urgency_ratio > self.tunables.critical_capacity_ratio;
            let scarcity_critical = scarcity_ratio > self.tunables.critical_in_line_ratio;
            let risk_critical = risk.critical_attributes.contains(a);

            if capacity_critical || scarcity_critical || risk_critical {
                let modifier = stats::clamp(urgency_ratio * 10.0 + scarcity_ratio * 5.0, 2.0, 10.0);
                let required = capacity_critical || modifier >= self.tunables.critical_required_threshold;
                table.insert(
                    a.to_string(),
                    CriticalEntry {
                        needed,
                        required,
                        modifier,
                    },
                );
            }
        }
        table
    }
}
