//! Metric data models.
//!
//! Metric descriptors, time series and the list requests/responses of the
//! monitoring provider. Enumerated fields (`metric_kind`, `value_type`,
//! aligners, reducers) are plain strings here; translation to the provider's
//! enums happens in [`crate::wire::monitoring`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Default page size for `list_time_series`.
pub const DEFAULT_TIME_SERIES_PAGE_SIZE: usize = 100;
/// Default page size for `list_metric_descriptors`.
pub const DEFAULT_DESCRIPTOR_PAGE_SIZE: usize = 5;
/// Default page size for `list_available_metrics`.
pub const DEFAULT_AVAILABLE_METRICS_PAGE_SIZE: usize = 100;

/// Metadata describing a metric type.
///
/// Identity is `type` within a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct MetricDescriptor {
    /// Fully qualified metric name, e.g. `custom.googleapis.com/my_metric`.
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "Metric type cannot be empty"))]
    pub metric_type: String,

    /// `GAUGE`, `DELTA` or `CUMULATIVE`.
    #[serde(default)]
    pub metric_kind: String,

    /// `BOOL`, `INT64`, `DOUBLE`, `STRING` or `DISTRIBUTION`.
    #[serde(default)]
    pub value_type: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Display name.
    #[serde(default)]
    pub display_name: String,

    /// Label keys and their descriptions.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl MetricDescriptor {
    /// Creates a descriptor with the given type, kind and value type.
    #[must_use]
    pub fn new(
        metric_type: impl Into<String>,
        metric_kind: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            metric_type: metric_type.into(),
            metric_kind: metric_kind.into(),
            value_type: value_type.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

/// A single data point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    /// Point value. Always a double, whatever the descriptor's value type.
    pub value: f64,
    /// End of the point's interval.
    pub timestamp: DateTime<Utc>,
}

/// Points of one metric on one monitored resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TimeSeriesData {
    /// Metric type the points belong to.
    #[validate(length(min = 1, message = "Metric type cannot be empty"))]
    pub metric_type: String,

    /// Metric labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metric_labels: HashMap<String, String>,

    /// Monitored resource type, e.g. `global`.
    #[validate(length(min = 1, message = "Resource type cannot be empty"))]
    pub resource_type: String,

    /// Points in order.
    #[serde(default)]
    pub values: Vec<MetricValue>,
}

impl TimeSeriesData {
    /// Creates a series holding a single point.
    #[must_use]
    pub fn single(
        metric_type: impl Into<String>,
        resource_type: impl Into<String>,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            metric_type: metric_type.into(),
            metric_labels: HashMap::new(),
            resource_type: resource_type.into(),
            values: vec![MetricValue { value, timestamp }],
        }
    }
}

/// Request to create a metric descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateMetricRequest {
    /// The descriptor to create.
    #[validate(nested)]
    pub metric_descriptor: MetricDescriptor,
}

/// Request to write one or more time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct WriteTimeSeriesRequest {
    /// Series to write.
    #[validate(length(min = 1, message = "At least one time series is required"), nested)]
    pub time_series: Vec<TimeSeriesData>,
}

/// A closed time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
}

/// Aggregation applied by the provider when listing time series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Duration string such as `60s` or `5m`; invalid values mean 60 seconds.
    #[serde(default)]
    pub alignment_period: String,

    /// Per-series aligner; `ALIGN_MEAN` when empty or unknown.
    #[serde(default)]
    pub per_series_aligner: String,

    /// Cross-series reducer; reducer and grouping are ignored when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cross_series_reducer: String,

    /// Fields to group by when reducing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by_fields: Vec<String>,
}

/// Request to list time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTimeSeriesRequest {
    /// Monitoring filter expression.
    pub filter: String,
    /// Time window.
    pub interval: TimeInterval,
    /// Optional aggregation; raw points when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggregationConfig>,
    /// Page size; [`DEFAULT_TIME_SERIES_PAGE_SIZE`] when not positive.
    #[serde(default)]
    pub page_size: i64,
    /// Continuation cursor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListTimeSeriesRequest {
    /// Creates a request over `[start_time, end_time]`.
    #[must_use]
    pub fn new(filter: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            filter: filter.into(),
            interval: TimeInterval {
                start_time,
                end_time,
            },
            aggregation: None,
            page_size: 0,
            page_token: String::new(),
        }
    }

    /// Returns the page size actually requested.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        super::effective_page_size(self.page_size, DEFAULT_TIME_SERIES_PAGE_SIZE)
    }
}

/// One page of time series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListTimeSeriesResponse {
    /// Series in provider order.
    pub time_series: Vec<TimeSeriesData>,
    /// Cursor for the next page; empty when no more data remains.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
}

/// Request to list metric descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetricDescriptorsRequest {
    /// Filter expression; all descriptors when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Page size; [`DEFAULT_DESCRIPTOR_PAGE_SIZE`] when not positive.
    #[serde(default)]
    pub page_size: i64,
    /// Continuation cursor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListMetricDescriptorsRequest {
    /// Returns the page size actually requested.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        super::effective_page_size(self.page_size, DEFAULT_DESCRIPTOR_PAGE_SIZE)
    }
}

/// One page of metric descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMetricDescriptorsResponse {
    /// Descriptors without label schema.
    pub descriptors: Vec<MetricDescriptor>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
}

/// Request to list available metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAvailableMetricsRequest {
    /// Filter expression.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Page size; [`DEFAULT_AVAILABLE_METRICS_PAGE_SIZE`] when not positive.
    #[serde(default)]
    pub page_size: i64,
    /// Continuation cursor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListAvailableMetricsRequest {
    /// Returns the page size actually requested.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        super::effective_page_size(self.page_size, DEFAULT_AVAILABLE_METRICS_PAGE_SIZE)
    }
}

/// Label schema entry of an available metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricLabel {
    /// Label key.
    pub key: String,
    /// Always `STRING`.
    pub value_type: String,
    /// Label description.
    #[serde(default)]
    pub description: String,
}

/// A metric descriptor together with its label schema and launch stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableMetric {
    /// Fully qualified metric name.
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Metric kind, `GAUGE` when the provider leaves it unspecified.
    pub metric_kind: String,
    /// Value type, `DOUBLE` when the provider leaves it unspecified.
    pub value_type: String,
    /// Unit, e.g. `By` or `1`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    /// Label schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<MetricLabel>,
    /// Launch stage, e.g. `GA`; empty when unspecified.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub launch_stage: String,
}

/// One page of available metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListAvailableMetricsResponse {
    /// Metrics in provider order.
    pub metrics: Vec<AvailableMetric>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
}
