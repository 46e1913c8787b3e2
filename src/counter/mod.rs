//! Repetition counting module
//!
//! Provides a hysteresis state machine with three posture states:
//! - Neutral: initial state, nothing seen yet
//! - Up: both elbows extended past the up threshold (counted on entry)
//! - Down: both elbows bent past the down threshold, ready for the next rep

mod machine;
mod thresholds;

#[cfg(test)]
pub(crate) mod testing;

pub use machine::{Command, FrameOutcome, PostureState, RepStateMachine, SkipReason};
pub use thresholds::Thresholds;
