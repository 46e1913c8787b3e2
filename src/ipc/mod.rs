//! IPC module for pose-source and UI communication

mod protocol;
mod server;

pub use protocol::{CounterStatus, Request, Response};
pub use server::Server;
