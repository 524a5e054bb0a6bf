//! API route definitions.
//!
//! This module organizes all HTTP routes for the telemetry gateway.

mod health;
mod tools;

pub use health::health_routes;
pub use tools::tools_routes;
