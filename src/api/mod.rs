//! HTTP front door for the bounty bridge
//!
//! Health reporting, manual poll triggering, and proxying of bounty creation.

pub mod routes;
pub mod server;

pub use server::{create_app, AppState};
