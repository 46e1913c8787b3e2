//! Angle and confidence thresholds

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Thresholds fixed at machine construction
///
/// `down_angle_deg < up_angle_deg` is a precondition for meaningful
/// counting. The state machine does not check it; call [`Thresholds::validate`]
/// when the values come from outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Both elbows must exceed this for the arms to count as up
    pub up_angle_deg: f32,
    /// Both elbows must be below this for the arms to count as down
    pub down_angle_deg: f32,
    /// Minimum confidence for every required joint
    pub min_confidence: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            up_angle_deg: 160.0,
            down_angle_deg: 70.0,
            min_confidence: 0.5,
        }
    }
}

impl Thresholds {
    pub fn new(up_angle_deg: f32, down_angle_deg: f32, min_confidence: f32) -> Self {
        Self {
            up_angle_deg,
            down_angle_deg,
            min_confidence,
        }
    }

    /// Check the ordering and range preconditions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::ConfidenceOutOfRange(self.min_confidence));
        }
        // Written negated so NaN fails too
        if !(self.down_angle_deg < self.up_angle_deg) {
            return Err(ConfigError::InvertedThresholds {
                up: self.up_angle_deg,
                down: self.down_angle_deg,
            });
        }
        Ok(())
    }
}
