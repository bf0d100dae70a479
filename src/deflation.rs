//! Closed-loop factor that scales raw scores up or down to steer the
//! realized admission rate toward `target_rate`. The tiered step function is
//! the reference law; the smooth alternatives are interchangeable pure
//! functions sharing the same contract (monotone non-increasing in
//! `ratio = realized_rate / target_rate`, equal to 1.0 at `ratio = 1`,
//! bounded in `[0.1, 2.0]`).

use crate::stats;

pub const FACTOR_MIN: f64 = 0.1;
pub const FACTOR_MAX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeflationLaw {
    TieredStep,
    Sigmoid { sensitivity: f64 },
    Exponential,
    PowerLaw { exponent: f64 },
}

impl Default for DeflationLaw {
    fn default() -> Self {
        DeflationLaw::TieredStep
    }
}

fn tiered_step(ratio: f64) -> f64 {
    if ratio > 2.5 {
        0.15
    } else if ratio > 2.0 {
        0.25
    } else if ratio > 1.5 {
        0.50
    } else if ratio > 1.2 {
        0.80
    } else if ratio >= 0.8 {
        1.00
    } else {
        (1.25 / ratio).min(1.5)
    }
}

fn sigmoid_law(ratio: f64, sensitivity: f64) -> f64 {
    stats::clamp(1.0 - stats::sigmoid(sensitivity, ratio - 1.0), FACTOR_MIN, FACTOR_MAX)
}

fn exponential_law(ratio: f64) -> f64 {
    stats::clamp(1.0 / ratio, FACTOR_MIN, FACTOR_MAX)
}

fn power_law(ratio: f64, exponent: f64) -> f64 {
    stats::clamp((1.0 / ratio).powf(exponent), FACTOR_MIN, FACTOR_MAX)
}

/// Tracks the realized admission rate and produces the score-scaling
/// factor. `adaptive` sharpens sensitivity-bearing laws later in the game.
pub struct DeflationController {
    law: DeflationLaw,
    target_rate: f64,
    adaptive: bool,
}

impl DeflationController {
    pub fn new(law: DeflationLaw, target_rate: f64, adaptive: bool) -> Self {
        Self {
            law,
            target_rate: target_rate.max(0.001),
            adaptive,
        }
    }

    /// `admitted`/`rejected` are the running totals; `admitted`/`capacity`
    /// drives the adaptive sharpening term.
    pub fn factor(&self, admitted: usize, rejected: usize, capacity: usize) -> f64 {
        let total = admitted + rejected;
        let realized_rate = if total == 0 { 0.0 } else { admitted as f64 / total as f64 };
        let ratio = realized_rate / self.target_rate;
        let sharpen = if self.adaptive {
            1.0 + 2.0 * (admitted as f64 / capacity.max(1) as f64)
        } else {
            1.0
        };

        let raw = match self.law {
            DeflationLaw::TieredStep => tiered_step(ratio),
            DeflationLaw::Sigmoid { sensitivity } => sigmoid_law(ratio, sensitivity * sharpen),
            DeflationLaw::Exponential => exponential_law(ratio),
            DeflationLaw::PowerLaw { exponent } => power_law(ratio, exponent),
        };
        stats::clamp(raw, FACTOR_MIN, FACTOR_MAX)
    }
}
