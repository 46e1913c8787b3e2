//! repcount: repetition counting from per-frame body-pose landmarks
//!
//! The core is two pieces:
//! - `pose::angle`: the angle at a joint from three 3D points
//! - `counter::RepStateMachine`: confidence gating plus a hysteresis
//!   state machine over both elbow angles
//!
//! Around it sit the pieces the `repcount-daemon` binary needs: events,
//! configuration, the IPC server and shutdown handling.

pub mod config;
pub mod counter;
pub mod error;
pub mod events;
pub mod ipc;
pub mod lifecycle;
pub mod pose;
