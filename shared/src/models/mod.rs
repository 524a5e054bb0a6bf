//! Generic request/response models for the four telemetry providers.
//!
//! These types carry only primitives, maps and timestamps. Provider wire types
//! live in [`crate::wire`] and never leak through the client contracts.

pub mod log;
pub mod metric;
pub mod profile;
pub mod trace;

pub use log::{ListEntriesRequest, LogEntry, DEFAULT_LIST_LIMIT, SEVERITIES};
pub use metric::{
    AggregationConfig, AvailableMetric, CreateMetricRequest, ListAvailableMetricsRequest,
    ListAvailableMetricsResponse, ListMetricDescriptorsRequest, ListMetricDescriptorsResponse,
    ListTimeSeriesRequest, ListTimeSeriesResponse, MetricDescriptor, MetricLabel, MetricValue,
    TimeInterval, TimeSeriesData, WriteTimeSeriesRequest, DEFAULT_AVAILABLE_METRICS_PAGE_SIZE,
    DEFAULT_DESCRIPTOR_PAGE_SIZE, DEFAULT_TIME_SERIES_PAGE_SIZE,
};
pub use profile::{
    CreateOfflineProfileRequest, CreateProfileRequest, Deployment, ListProfilesRequest,
    ListProfilesResponse, Profile, ProfileType, UpdateProfileRequest, DEFAULT_PROFILE_PAGE_SIZE,
};
pub use trace::{
    GetTraceRequest, ListTracesRequest, PatchTraceRequest, Span, Trace, DEFAULT_TRACE_PAGE_SIZE,
};

/// Resolves a caller-supplied page size, substituting `default` when the
/// value is zero or negative.
#[must_use]
pub fn effective_page_size(requested: i64, default: usize) -> usize {
    if requested <= 0 {
        default
    } else {
        usize::try_from(requested).unwrap_or(default)
    }
}
