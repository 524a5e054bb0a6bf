//! Integration tests for the telemetry gateway API.
//!
//! These tests drive the full router over in-memory providers, covering the
//! tool catalogue and every provider's tools end to end.

#[path = "integration_tests/common/mod.rs"]
mod common;
#[path = "integration_tests/health_tests.rs"]
mod health_tests;
#[path = "integration_tests/logging_tests.rs"]
mod logging_tests;
#[path = "integration_tests/monitoring_tests.rs"]
mod monitoring_tests;
#[path = "integration_tests/profiler_tests.rs"]
mod profiler_tests;
#[path = "integration_tests/tools_tests.rs"]
mod tools_tests;
#[path = "integration_tests/trace_tests.rs"]
mod trace_tests;
