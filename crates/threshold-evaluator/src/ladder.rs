//! Severity ladders
//!
//! A ladder is three thresholds ordered by severity plus the direction in which the
//! indicator becomes dangerous.

use monitor_core::{CustomThreshold, Direction, Level, ReasonCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub direction: Direction,
    pub yellow: f64,
    pub orange: f64,
    pub red: f64,
    pub reason: ReasonCode,
}

impl Ladder {
    /// Fixed ladder registered for an indicator
    pub fn custom(threshold: &CustomThreshold) -> Self {
        Self {
            direction: threshold.direction,
            yellow: threshold.yellow,
            orange: threshold.orange,
            red: threshold.red,
            reason: ReasonCode::CustomThreshold,
        }
    }

    /// Ladder derived from the rolling mean; always points up
    pub fn auto(mu: f64, multipliers: [f64; 3]) -> Self {
        Self {
            direction: Direction::Up,
            yellow: mu * multipliers[0],
            orange: mu * multipliers[1],
            red: mu * multipliers[2],
            reason: ReasonCode::AutoThreshold,
        }
    }

    /// Most severe tier the value reaches. Equality counts as reaching the tier.
    pub fn classify(&self, value: f64) -> Level {
        let reached = |threshold: f64| match self.direction {
            Direction::Up => value >= threshold,
            Direction::Down => value <= threshold,
        };

        if reached(self.red) {
            Level::Red
        } else if reached(self.orange) {
            Level::Orange
        } else if reached(self.yellow) {
            Level::Yellow
        } else {
            Level::Normal
        }
    }
}
