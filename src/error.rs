//! Typed errors for configuration loading
//!
//! The counting core has no error surface; bad frames are skipped. Only
//! building a daemon configuration can fail in a way worth naming.

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HOME is not set")]
    MissingHome,

    #[error("{var} is not a number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("min confidence must be within [0, 1], got {0}")]
    ConfidenceOutOfRange(f32),

    #[error("down angle ({down}) must be below up angle ({up})")]
    InvertedThresholds { up: f32, down: f32 },
}
