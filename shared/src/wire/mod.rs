//! Provider wire formats and the translation between them and [`crate::models`].
//!
//! Each submodule holds the `camelCase` JSON shapes of one Google REST API and
//! total mapping functions between the generic string enums and the provider's
//! enum values. Translation never fails: unknown inputs take a documented
//! default.

pub mod logging;
pub mod monitoring;
pub mod profiler;
pub mod trace;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The `google.protobuf.Empty` response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// A monitored resource reference (`{"type": ..., "labels": {...}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredResource {
    /// Resource type, e.g. `global`.
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Resource labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl MonitoredResource {
    /// Creates a resource of the given type without labels.
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            labels: HashMap::new(),
        }
    }
}

/// Formats a page size for a query string, clamping to the provider's `int32`.
pub(crate) fn page_size_param(page_size: usize) -> String {
    i32::try_from(page_size).unwrap_or(i32::MAX).to_string()
}
