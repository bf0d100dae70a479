//! Configuration surface for a single game: capacity, stream length, the
//! named tunables of the scoring/threshold/deflation/critical components,
//! and the scoring preset. Captured once at decider construction and never
//! mutated afterward — see the "mutable global configuration" design note.

use serde::{Deserialize, Serialize};

/// Named scoring presets. Selected at construction; never swapped mid-game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    Conservative,
    Balanced,
    Aggressive,
    Endgame,
    Optimized,
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Balanced
    }
}

/// Tunable constants consulted by the score calculator, keyed by preset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreConstants {
    pub urgency_divisor: f64,
    pub max_urgency: f64,
    pub rarity_bonus_high: f64,
    pub rarity_bonus_medium: f64,
    pub progress_bonus_low: f64,
    pub progress_bonus_medium: f64,
    pub critical_cap: f64,
    pub normalization_base: f64,
    pub max_score: f64,
    pub max_endgame_score: f64,
}

impl Preset {
    pub fn constants(self) -> ScoreConstants {
        match self {
            Preset::Conservative => ScoreConstants {
                urgency_divisor: 12.0,
                max_urgency: 2.0,
                rarity_bonus_high: 1.8,
                rarity_bonus_medium: 1.3,
                progress_bonus_low: 1.6,
                progress_bonus_medium: 1.2,
                critical_cap: 6.0,
                normalization_base: 3.0,
                max_score: 0.95,
                max_endgame_score: 2.5,
            },
            Preset::Balanced => ScoreConstants {
                urgency_divisor: 10.0,
                max_urgency: 3.0,
                rarity_bonus_high: 2.0,
                rarity_bonus_medium: 1.4,
                progress_bonus_low: 1.8,
                progress_bonus_medium: 1.3,
                critical_cap: 8.0,
                normalization_base: 2.5,
                max_score: 1.0,
                max_endgame_score: 3.0,
            },
            Preset::Aggressive => ScoreConstants {
                urgency_divisor: 8.0,
                max_urgency: 4.0,
                rarity_bonus_high: 2.3,
                rarity_bonus_medium: 1.6,
                progress_bonus_low: 2.0,
                progress_bonus_medium: 1.4,
                critical_cap: 10.0,
                normalization_base: 2.2,
                max_score: 1.0,
                max_endgame_score: 3.5,
            },
            Preset::Endgame => ScoreConstants {
                urgency_divisor: 6.0,
                max_urgency: 5.0,
                rarity_bonus_high: 2.5,
                rarity_bonus_medium: 1.7,
                progress_bonus_low: 2.2,
                progress_bonus_medium: 1.5,
                critical_cap: 10.0,
                normalization_base: 2.0,
                max_score: 1.0,
                max_endgame_score: 4.0,
            },
            Preset::Optimized => ScoreConstants {
                urgency_divisor: 9.0,
                max_urgency: 3.5,
                rarity_bonus_high: 2.1,
                rarity_bonus_medium: 1.45,
                progress_bonus_low: 1.9,
                progress_bonus_medium: 1.35,
                critical_cap: 9.0,
                normalization_base: 2.3,
                max_score: 1.0,
                max_endgame_score: 3.2,
            },
        }
    }
}

/// Tunables named in the external configuration surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tunables {
    pub base_threshold: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
    pub threshold_ramp: f64,
    pub target_range: usize,
    pub target_rate: f64,
    pub urgency_modifier: f64,
    /// Named in the external configuration surface (`CORRELATION_BONUS`) but
    /// not consulted by `ScoreCalculator::regular`, whose `correlation_bonus`
    /// term is the literal two-way branch from spec §4.C (negative
    /// correlation or 1.0). Kept here only so the wire/TOML shape matches the
    /// documented surface; defaults to a no-op.
    pub correlation_bonus: f64,
    pub negative_correlation_bonus: f64,
    pub negative_correlation_threshold: f64,
    pub multi_attribute_bonus: f64,
    pub rare_person_bonus: f64,
    pub critical_required_threshold: f64,
    pub critical_in_line_ratio: f64,
    pub critical_capacity_ratio: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            base_threshold: 0.42,
            min_threshold: 0.20,
            max_threshold: 0.80,
            threshold_ramp: 3.0,
            target_range: 4_000,
            target_rate: 0.25,
            urgency_modifier: 1.0,
            correlation_bonus: 1.0,
            negative_correlation_bonus: 1.8,
            negative_correlation_threshold: -0.5,
            rare_person_bonus: 1.5,
            critical_required_threshold: 8.0,
            critical_in_line_ratio: 0.9,
            critical_capacity_ratio: 0.15,
        }
    }
}

/// Immutable configuration value captured once at decider construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scenario_id: String,
    pub capacity: usize,
    pub total_people: usize,
    pub preset: Preset,
    pub tunables: Tunables,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scenario_id: "default".to_string(),
            capacity: crate::DEFAULT_CAPACITY,
            total_people: crate::DEFAULT_TOTAL_PEOPLE,
            preset: Preset::default(),
            tunables: Tunables::default(),
        }
    }
}

impl Config {
    pub fn score_constants(&self) -> ScoreConstants {
        self.preset.constants()
    }

    /// Load from a TOML scenario file, falling back to defaults for absent fields.
    pub fn from_toml_str(raw: &str) -> crate::Result<Self> {
        toml::from_str(raw).map_err(|source| crate::AdmissionError::UnknownConstraint {
            attribute: format!("config parse failure: {source}"),
        })
    }
}

/// CLI overrides for the demo binary. Read once at startup, folded into
/// `Config` — never consulted as ambient state from within the core.
#[derive(Debug, clap::Parser)]
#[command(name = "simulate", about = "Drive the admission decider over a synthetic stream")]
pub struct CliOverrides {
    #[arg(long, default_value_t = crate::DEFAULT_CAPACITY)]
    pub capacity: usize,

    #[arg(long, default_value_t = crate::DEFAULT_TOTAL_PEOPLE)]
    pub total_people: usize,

    #[arg(long, value_enum, default_value_t = Preset::Balanced)]
    pub preset: Preset,

    #[arg(long)]
    pub target_rate: Option<f64>,

    #[arg(long, default_value = "sim")]
    pub scenario_id: String,

    #[arg(long, default_value_t = 7)]
    pub seed: u64,
}

impl CliOverrides {
    pub fn into_config(self) -> Config {
        let mut config = Config {
            scenario_id: self.scenario_id,
            capacity: self.capacity,
            total_people: self.total_people,
            preset: self.preset,
            ..Config::default()
        };
        if let Some(rate) = self.target_rate {
            config.tunables.target_rate = rate;
        }
        config
    }
}
