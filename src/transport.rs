//! Serde DTOs mirroring the external interfaces of the game-server contract:
//! the initial payload, the per-step input, and the per-step output. These
//! are pure data — no networking code reads or writes them. A real
//! transport layer (out of scope for this crate) decodes wire bytes into
//! these shapes and calls into the decision core.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AdmissionError;
use crate::AttributeId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub attribute: AttributeId,
    #[serde(rename = "minCount")]
    pub min_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeStatisticsPayload {
    #[serde(rename = "relativeFrequencies")]
    pub relative_frequencies: HashMap<AttributeId, f64>,
    pub correlations: HashMap<AttributeId, HashMap<AttributeId, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitPayload {
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub constraints: Vec<ConstraintSpec>,
    #[serde(rename = "attributeStatistics")]
    pub attribute_statistics: AttributeStatisticsPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatusTag {
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for GameStatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GameStatusTag::Running => "running",
            GameStatusTag::Completed => "completed",
            GameStatusTag::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextPerson {
    pub attributes: HashMap<AttributeId, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInput {
    pub status: GameStatusTag,
    #[serde(rename = "admittedCount")]
    pub admitted_count: usize,
    #[serde(rename = "rejectedCount")]
    pub rejected_count: usize,
    #[serde(rename = "nextPerson")]
    pub next_person: Option<NextPerson>,
}

impl StepInput {
    /// Guards the `status != running` boundary condition from the error
    /// taxonomy: reading the running totals off a non-running step is a
    /// caller error, not something the decider catches or recovers from.
    pub fn admitted_count(&self) -> crate::Result<usize> {
        self.require_running()?;
        Ok(self.admitted_count)
    }

    pub fn rejected_count(&self) -> crate::Result<usize> {
        self.require_running()?;
        Ok(self.rejected_count)
    }

    fn require_running(&self) -> crate::Result<()> {
        if self.status == GameStatusTag::Running {
            Ok(())
        } else {
            Err(AdmissionError::GameNotRunning {
                status: self.status.to_string(),
            })
        }
    }
}

/// Per-step output. `true` admits the candidate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepOutput(pub bool);

impl From<bool> for StepOutput {
    fn from(admit: bool) -> Self {
        StepOutput(admit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_payload_round_trips_through_json() {
        let raw = serde_json::json!({
            "gameId": "g1",
            "constraints": [{"attribute": "young", "minCount": 600}],
            "attributeStatistics": {
                "relativeFrequencies": {"young": 0.5},
                "correlations": {"young": {"young": 1.0}},
            }
        });
        let payload: InitPayload = serde_json::from_value(raw).unwrap();
        assert_eq!(payload.game_id, "g1");
        assert_eq!(payload.constraints[0].min_count, 600);
    }

    #[test]
    fn step_input_accepts_null_next_person() {
        let raw = serde_json::json!({
            "status": "running",
            "admittedCount": 0,
            "rejectedCount": 0,
            "nextPerson": null,
        });
        let step: StepInput = serde_json::from_value(raw).unwrap();
        assert!(step.next_person.is_none());
    }

    #[test]
    fn counters_readable_while_running() {
        let step = StepInput {
            status: GameStatusTag::Running,
            admitted_count: 12,
            rejected_count: 34,
            next_person: None,
        };
        assert_eq!(step.admitted_count().unwrap(), 12);
        assert_eq!(step.rejected_count().unwrap(), 34);
    }

    #[test]
    fn counters_raise_non_running_condition_once_game_ends() {
        let step = StepInput {
            status: GameStatusTag::Completed,
            admitted_count: 1000,
            rejected_count: 500,
            next_person: None,
        };
        assert!(matches!(
            step.admitted_count(),
            Err(AdmissionError::GameNotRunning { .. })
        ));
        assert!(matches!(
            step.rejected_count(),
            Err(AdmissionError::GameNotRunning { .. })
        ));
    }
}
