//! Events published by the repetition state machine
//!
//! These are the change notifications the UI side observes. `RepCounted`
//! is sent exactly once per increment, from inside the call that caused it.

use serde::{Deserialize, Serialize};

use crate::counter::PostureState;

/// Events emitted by the state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepEvent {
    /// A repetition was completed (arms reached the top)
    RepCounted {
        /// Counter value after the increment
        count: u32,
    },

    /// Posture state moved
    PostureChanged {
        from: PostureState,
        to: PostureState,
    },

    /// Counter and posture were cleared
    CounterReset,
}

impl std::fmt::Display for RepEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepEvent::RepCounted { count } => write!(f, "REP_COUNTED ({})", count),
            RepEvent::PostureChanged { from, to } => {
                write!(f, "POSTURE_CHANGED ({} -> {})", from, to)
            }
            RepEvent::CounterReset => write!(f, "COUNTER_RESET"),
        }
    }
}
