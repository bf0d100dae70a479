//! Persisted-snapshot contract. The snapshot shape and key format are part
//! of this crate; reading and writing it to disk is not — that stays the
//! external collaborator named in the purpose/scope section.

use serde::{Deserialize, Serialize};

use crate::transport::GameStatusTag;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintSnapshot {
    pub attribute: String,
    pub min_count: usize,
    pub admitted_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub scenario_id: String,
    pub game_id: String,
    pub status: GameStatusTag,
    pub admitted_count: usize,
    pub rejected_count: usize,
    pub constraints: Vec<ConstraintSnapshot>,
}

/// Produces the `scenario-<id>-<gameId>` key the external store keys
/// snapshots by. Format is otherwise opaque to this crate.
pub fn snapshot_key(scenario_id: &str, game_id: &str) -> String {
    format!("scenario-{scenario_id}-{game_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_matches_documented_format() {
        assert_eq!(snapshot_key("7", "abc-123"), "scenario-7-abc-123");
    }
}
