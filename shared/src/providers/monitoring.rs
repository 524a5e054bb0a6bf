//! Monitoring provider.

use crate::config::GcpConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{
    AvailableMetric, CreateMetricRequest, ListAvailableMetricsRequest,
    ListAvailableMetricsResponse, ListMetricDescriptorsRequest, ListMetricDescriptorsResponse,
    ListTimeSeriesRequest, ListTimeSeriesResponse, MetricDescriptor, TimeSeriesData,
    WriteTimeSeriesRequest,
};
use crate::providers::paginate;
use crate::transport::{ApiClient, HttpTransport};
use crate::wire::monitoring::{
    aggregation_query, available_metric_from_wire, descriptor_from_wire, descriptor_to_wire,
    time_series_from_wire, time_series_to_wire, CreateTimeSeriesRequest,
    ListMetricDescriptorsResponse as WireDescriptorPage,
    ListTimeSeriesResponse as WireTimeSeriesPage, WireMetricDescriptor,
};
use crate::wire::{page_size_param, Empty};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use validator::Validate;

/// Operations of the monitoring provider.
#[async_trait]
pub trait MonitoringClient: Send + Sync {
    /// Creates a metric descriptor.
    ///
    /// Unknown kinds are sent as `GAUGE` and unknown value types as `DOUBLE`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is empty or the provider rejects it.
    async fn create_metric_descriptor(&self, request: CreateMetricRequest) -> ProviderResult<()>;

    /// Writes points. Every value is sent as a double.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is malformed or the provider rejects it.
    async fn write_time_series(&self, request: WriteTimeSeriesRequest) -> ProviderResult<()>;

    /// Lists one page of time series, at most `page_size` (default 100).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_time_series(
        &self,
        request: ListTimeSeriesRequest,
    ) -> ProviderResult<ListTimeSeriesResponse>;

    /// Lists one page of bare descriptors, at most `page_size` (default 5).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_metric_descriptors(
        &self,
        request: ListMetricDescriptorsRequest,
    ) -> ProviderResult<ListMetricDescriptorsResponse>;

    /// Deletes the descriptor of `metric_type`.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is empty or the provider call fails.
    async fn delete_metric_descriptor(&self, metric_type: &str) -> ProviderResult<()>;

    /// Lists one page of descriptors with label schema, unit and launch stage,
    /// at most `page_size` (default 100).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_available_metrics(
        &self,
        request: ListAvailableMetricsRequest,
    ) -> ProviderResult<ListAvailableMetricsResponse>;
}

/// Public monitoring client.
#[derive(Clone)]
pub struct CloudMonitoring {
    inner: Arc<dyn MonitoringClient>,
}

impl CloudMonitoring {
    /// Creates a REST-backed client for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_client(Arc::new(RestMonitoringClient::new(config, transport)))
    }

    /// Wraps an existing implementation.
    #[must_use]
    pub fn with_client(inner: Arc<dyn MonitoringClient>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for CloudMonitoring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudMonitoring").finish_non_exhaustive()
    }
}

#[async_trait]
impl MonitoringClient for CloudMonitoring {
    async fn create_metric_descriptor(&self, request: CreateMetricRequest) -> ProviderResult<()> {
        self.inner.create_metric_descriptor(request).await
    }

    async fn write_time_series(&self, request: WriteTimeSeriesRequest) -> ProviderResult<()> {
        self.inner.write_time_series(request).await
    }

    async fn list_time_series(
        &self,
        request: ListTimeSeriesRequest,
    ) -> ProviderResult<ListTimeSeriesResponse> {
        self.inner.list_time_series(request).await
    }

    async fn list_metric_descriptors(
        &self,
        request: ListMetricDescriptorsRequest,
    ) -> ProviderResult<ListMetricDescriptorsResponse> {
        self.inner.list_metric_descriptors(request).await
    }

    async fn delete_metric_descriptor(&self, metric_type: &str) -> ProviderResult<()> {
        self.inner.delete_metric_descriptor(metric_type).await
    }

    async fn list_available_metrics(
        &self,
        request: ListAvailableMetricsRequest,
    ) -> ProviderResult<ListAvailableMetricsResponse> {
        self.inner.list_available_metrics(request).await
    }
}

/// Cloud Monitoring v3 REST adapter.
#[derive(Debug, Clone)]
pub struct RestMonitoringClient {
    api: ApiClient,
    project_id: String,
}

impl RestMonitoringClient {
    /// Creates an adapter for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api: ApiClient::new(transport, config.monitoring_endpoint.clone()),
            project_id: config.project_id.clone(),
        }
    }

    fn path(&self, collection: &str) -> String {
        format!("v3/projects/{}/{collection}", self.project_id)
    }

    async fn descriptor_page(
        &self,
        filter: String,
        page_size: usize,
        page_token: String,
    ) -> ProviderResult<(Vec<WireMetricDescriptor>, String)> {
        let mut query = vec![("pageSize", page_size_param(page_size))];
        if !filter.is_empty() {
            query.push(("filter", filter));
        }
        if !page_token.is_empty() {
            query.push(("pageToken", page_token));
        }

        let page: WireDescriptorPage = self
            .api
            .get(&self.path("metricDescriptors"), &query)
            .await?;

        let descriptors = page.metric_descriptors.into_iter().take(page_size).collect();
        Ok((descriptors, page.next_page_token))
    }
}

#[async_trait]
impl MonitoringClient for RestMonitoringClient {
    async fn create_metric_descriptor(&self, request: CreateMetricRequest) -> ProviderResult<()> {
        request.validate()?;
        let descriptor = descriptor_to_wire(&request.metric_descriptor);

        tracing::debug!(
            metric_type = %descriptor.metric_type,
            metric_kind = %descriptor.metric_kind,
            value_type = %descriptor.value_type,
            "Creating metric descriptor"
        );

        let _: WireMetricDescriptor = self
            .api
            .post(&self.path("metricDescriptors"), &[], &descriptor)
            .await?;
        Ok(())
    }

    async fn write_time_series(&self, request: WriteTimeSeriesRequest) -> ProviderResult<()> {
        request.validate()?;

        let body = CreateTimeSeriesRequest {
            time_series: request.time_series.iter().map(time_series_to_wire).collect(),
        };
        tracing::debug!(series = body.time_series.len(), "Writing time series");

        let _: Empty = self.api.post(&self.path("timeSeries"), &[], &body).await?;
        Ok(())
    }

    async fn list_time_series(
        &self,
        request: ListTimeSeriesRequest,
    ) -> ProviderResult<ListTimeSeriesResponse> {
        let page_size = request.effective_page_size();

        let mut query = vec![
            ("filter", request.filter.clone()),
            ("interval.startTime", request.interval.start_time.to_rfc3339()),
            ("interval.endTime", request.interval.end_time.to_rfc3339()),
            ("pageSize", page_size_param(page_size)),
        ];
        if !request.page_token.is_empty() {
            query.push(("pageToken", request.page_token.clone()));
        }
        if let Some(aggregation) = &request.aggregation {
            query.extend(aggregation_query(aggregation));
        }

        tracing::debug!(filter = %request.filter, page_size, "Listing time series");

        let page: WireTimeSeriesPage = self.api.get(&self.path("timeSeries"), &query).await?;
        let time_series: Vec<TimeSeriesData> = page
            .time_series
            .into_iter()
            .take(page_size)
            .map(time_series_from_wire)
            .collect();

        tracing::debug!(count = time_series.len(), "Listed time series");
        Ok(ListTimeSeriesResponse {
            time_series,
            next_page_token: page.next_page_token,
        })
    }

    async fn list_metric_descriptors(
        &self,
        request: ListMetricDescriptorsRequest,
    ) -> ProviderResult<ListMetricDescriptorsResponse> {
        let page_size = request.effective_page_size();
        tracing::debug!(filter = %request.filter, page_size, "Listing metric descriptors");

        let (descriptors, next_page_token) = self
            .descriptor_page(request.filter, page_size, request.page_token)
            .await?;

        Ok(ListMetricDescriptorsResponse {
            descriptors: descriptors.into_iter().map(descriptor_from_wire).collect(),
            next_page_token,
        })
    }

    async fn delete_metric_descriptor(&self, metric_type: &str) -> ProviderResult<()> {
        if metric_type.trim().is_empty() {
            return Err(ProviderError::invalid_argument("metric_type is required"));
        }

        tracing::debug!(metric_type, "Deleting metric descriptor");
        let path = format!("{}/{metric_type}", self.path("metricDescriptors"));
        let _: Empty = self.api.delete(&path).await?;
        Ok(())
    }

    async fn list_available_metrics(
        &self,
        request: ListAvailableMetricsRequest,
    ) -> ProviderResult<ListAvailableMetricsResponse> {
        let page_size = request.effective_page_size();
        tracing::debug!(filter = %request.filter, page_size, "Listing available metrics");

        let (descriptors, next_page_token) = self
            .descriptor_page(request.filter, page_size, request.page_token)
            .await?;

        Ok(ListAvailableMetricsResponse {
            metrics: descriptors
                .into_iter()
                .map(available_metric_from_wire)
                .collect(),
            next_page_token,
        })
    }
}

/// Matches metric types against the `metric.type` clause of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeFilter {
    Any,
    Exact(String),
    Prefix(String),
}

impl TypeFilter {
    fn parse(filter: &str) -> Self {
        let Some((_, rest)) = filter.split_once("metric.type") else {
            return Self::Any;
        };
        let rest = rest.trim_start().trim_start_matches('=').trim_start();
        let quoted = rest.split('"').nth(1).unwrap_or_default().to_string();

        if rest.starts_with("starts_with(") {
            Self::Prefix(quoted)
        } else {
            Self::Exact(quoted)
        }
    }

    fn matches(&self, metric_type: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => metric_type == expected,
            Self::Prefix(prefix) => metric_type.starts_with(prefix.as_str()),
        }
    }
}

#[derive(Debug, Default)]
struct MonitoringState {
    descriptors: Vec<WireMetricDescriptor>,
    series: Vec<TimeSeriesData>,
}

/// In-memory monitoring provider.
///
/// Understands `metric.type = "..."` and `metric.type = starts_with("...")`
/// filters. Writing to an unknown metric type creates a `GAUGE`/`DOUBLE`
/// descriptor for it. Aggregation settings are accepted but not applied.
#[derive(Debug, Default)]
pub struct InMemoryMonitoring {
    state: Arc<RwLock<MonitoringState>>,
}

impl InMemoryMonitoring {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty provider wrapped in an `Arc`.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn matching_descriptors(&self, filter: &str) -> ProviderResult<Vec<WireMetricDescriptor>> {
        let type_filter = TypeFilter::parse(filter);
        let state = self.state.read().map_err(|_| ProviderError::LockError)?;
        Ok(state
            .descriptors
            .iter()
            .filter(|d| type_filter.matches(&d.metric_type))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MonitoringClient for InMemoryMonitoring {
    async fn create_metric_descriptor(&self, request: CreateMetricRequest) -> ProviderResult<()> {
        request.validate()?;
        let descriptor = descriptor_to_wire(&request.metric_descriptor);

        let mut state = self.state.write().map_err(|_| ProviderError::LockError)?;
        state
            .descriptors
            .retain(|d| d.metric_type != descriptor.metric_type);
        state.descriptors.push(descriptor);
        Ok(())
    }

    async fn write_time_series(&self, request: WriteTimeSeriesRequest) -> ProviderResult<()> {
        request.validate()?;
        let mut state = self.state.write().map_err(|_| ProviderError::LockError)?;

        for series in request.time_series {
            if !state
                .descriptors
                .iter()
                .any(|d| d.metric_type == series.metric_type)
            {
                let descriptor = MetricDescriptor::new(&series.metric_type, "GAUGE", "DOUBLE");
                state.descriptors.push(descriptor_to_wire(&descriptor));
            }

            let existing = state.series.iter_mut().find(|s| {
                s.metric_type == series.metric_type
                    && s.resource_type == series.resource_type
                    && s.metric_labels == series.metric_labels
            });
            match existing {
                Some(existing) => existing.values.extend(series.values),
                None => state.series.push(series),
            }
        }
        Ok(())
    }

    async fn list_time_series(
        &self,
        request: ListTimeSeriesRequest,
    ) -> ProviderResult<ListTimeSeriesResponse> {
        let type_filter = TypeFilter::parse(&request.filter);
        let interval = request.interval;

        let matching: Vec<TimeSeriesData> = {
            let state = self.state.read().map_err(|_| ProviderError::LockError)?;
            state
                .series
                .iter()
                .filter(|s| type_filter.matches(&s.metric_type))
                .filter_map(|s| {
                    let mut values: Vec<_> = s
                        .values
                        .iter()
                        .filter(|v| v.timestamp >= interval.start_time && v.timestamp <= interval.end_time)
                        .copied()
                        .collect();
                    values.sort_by_key(|v| std::cmp::Reverse(v.timestamp));
                    (!values.is_empty()).then(|| TimeSeriesData {
                        values,
                        ..s.clone()
                    })
                })
                .collect()
        };

        let (time_series, next_page_token) = paginate(
            &matching,
            &request.page_token,
            request.effective_page_size(),
        )?;
        Ok(ListTimeSeriesResponse {
            time_series,
            next_page_token,
        })
    }

    async fn list_metric_descriptors(
        &self,
        request: ListMetricDescriptorsRequest,
    ) -> ProviderResult<ListMetricDescriptorsResponse> {
        let matching = self.matching_descriptors(&request.filter)?;
        let (page, next_page_token) =
            paginate(&matching, &request.page_token, request.effective_page_size())?;

        Ok(ListMetricDescriptorsResponse {
            descriptors: page.into_iter().map(descriptor_from_wire).collect(),
            next_page_token,
        })
    }

    async fn delete_metric_descriptor(&self, metric_type: &str) -> ProviderResult<()> {
        if metric_type.trim().is_empty() {
            return Err(ProviderError::invalid_argument("metric_type is required"));
        }

        let mut state = self.state.write().map_err(|_| ProviderError::LockError)?;
        let before = state.descriptors.len();
        state.descriptors.retain(|d| d.metric_type != metric_type);
        if state.descriptors.len() == before {
            return Err(ProviderError::not_found(format!(
                "Metric descriptor {metric_type} not found"
            )));
        }
        state.series.retain(|s| s.metric_type != metric_type);
        Ok(())
    }

    async fn list_available_metrics(
        &self,
        request: ListAvailableMetricsRequest,
    ) -> ProviderResult<ListAvailableMetricsResponse> {
        let matching = self.matching_descriptors(&request.filter)?;
        let (page, next_page_token) =
            paginate(&matching, &request.page_token, request.effective_page_size())?;

        let metrics: Vec<AvailableMetric> =
            page.into_iter().map(available_metric_from_wire).collect();
        Ok(ListAvailableMetricsResponse {
            metrics,
            next_page_token,
        })
    }
}
