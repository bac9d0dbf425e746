//! HTTP API module.
//!
//! Serves the cascading choices and per-selection reports to a
//! presentation layer.

pub mod server;
pub mod types;

pub use server::{router, start_server, AppState};
pub use types::*;
