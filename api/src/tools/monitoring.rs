//! Monitoring tools.

use super::{Args, ToolError, ToolResult};
use crate::state::AppState;
use serde_json::{Map, Value};
use shared::models::{
    AggregationConfig, CreateMetricRequest, ListAvailableMetricsRequest,
    ListMetricDescriptorsRequest, ListTimeSeriesRequest, MetricDescriptor, TimeSeriesData,
    WriteTimeSeriesRequest,
};

pub(super) async fn create_metric_descriptor(state: &AppState, args: &Args) -> ToolResult {
    let metric_type = args.require_str("type")?;
    let metric_kind = args.require_str("metric_kind")?;
    let value_type = args.require_str("value_type")?;
    let description = args.require_str("description")?;

    let metric_descriptor = MetricDescriptor::new(metric_type, metric_kind, value_type)
        .with_description(description)
        .with_display_name(args.str_or_default("display_name"));

    state
        .monitoring()
        .create_metric_descriptor(CreateMetricRequest { metric_descriptor })
        .await
        .map_err(ToolError::failed("create metric descriptor"))?;

    Ok(Value::from("Metric descriptor created successfully"))
}

pub(super) async fn write_time_series(state: &AppState, args: &Args) -> ToolResult {
    let metric_type = args.require_str("metric_type")?;
    let resource_type = args.require_str("resource_type")?;
    let value = args.require_f64("value")?;

    let mut series = TimeSeriesData::single(
        metric_type,
        resource_type,
        value,
        args.timestamp_or_now("timestamp"),
    );
    series.metric_labels = args.labels("metric_labels");

    state
        .monitoring()
        .write_time_series(WriteTimeSeriesRequest {
            time_series: vec![series],
        })
        .await
        .map_err(ToolError::failed("write time series"))?;

    Ok(Value::from("Time series data written successfully"))
}

pub(super) async fn list_time_series(state: &AppState, args: &Args) -> ToolResult {
    let filter = args.require_str("filter")?;
    let start_time = args.require_timestamp("start_time")?;
    let end_time = args.require_timestamp("end_time")?;

    let mut request = ListTimeSeriesRequest::new(filter, start_time, end_time);
    request.aggregation = args.object("aggregation").map(aggregation);
    request.page_size = args.positive_i64("page_size");
    request.page_token = args.str_or_default("page_token");

    let response = state
        .monitoring()
        .list_time_series(request)
        .await
        .map_err(ToolError::failed("list time series"))?;

    Ok(serde_json::to_value(response)?)
}

pub(super) async fn list_metric_descriptors(state: &AppState, args: &Args) -> ToolResult {
    let request = ListMetricDescriptorsRequest {
        filter: args.str_or_default("filter"),
        page_size: args.positive_i64("page_size"),
        page_token: args.str_or_default("page_token"),
    };

    let response = state
        .monitoring()
        .list_metric_descriptors(request)
        .await
        .map_err(ToolError::failed("list metric descriptors"))?;

    Ok(serde_json::to_value(response)?)
}

pub(super) async fn delete_metric_descriptor(state: &AppState, args: &Args) -> ToolResult {
    let metric_type = args.require_str("metric_type")?;

    state
        .monitoring()
        .delete_metric_descriptor(&metric_type)
        .await
        .map_err(ToolError::failed("delete metric descriptor"))?;

    Ok(Value::from("Metric descriptor deleted successfully"))
}

pub(super) async fn list_available_metrics(state: &AppState, args: &Args) -> ToolResult {
    let request = ListAvailableMetricsRequest {
        filter: args.str_or_default("filter"),
        page_size: args.positive_i64("page_size"),
        page_token: args.str_or_default("page_token"),
    };

    let response = state
        .monitoring()
        .list_available_metrics(request)
        .await
        .map_err(ToolError::failed("list available metrics"))?;

    Ok(serde_json::to_value(response)?)
}

/// Reads an aggregation object; fields of the wrong type are left empty.
fn aggregation(obj: &Map<String, Value>) -> AggregationConfig {
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    AggregationConfig {
        alignment_period: text("alignment_period"),
        per_series_aligner: text("per_series_aligner"),
        cross_series_reducer: text("cross_series_reducer"),
        group_by_fields: obj
            .get("group_by_fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        Args::from_value(value).unwrap()
    }

    #[test]
    fn test_aggregation_parsing() {
        let obj = json!({
            "alignment_period": "5m",
            "per_series_aligner": "ALIGN_RATE",
            "cross_series_reducer": 7,
            "group_by_fields": ["resource.label.zone", 3, "metric.label.env"]
        });
        let config = aggregation(obj.as_object().unwrap());

        assert_eq!(config.alignment_period, "5m");
        assert_eq!(config.per_series_aligner, "ALIGN_RATE");
        assert_eq!(config.cross_series_reducer, "");
        assert_eq!(
            config.group_by_fields,
            vec!["resource.label.zone", "metric.label.env"]
        );
    }

    #[tokio::test]
    async fn test_descriptor_lifecycle() {
        let state = AppState::default();

        create_metric_descriptor(
            &state,
            &args(json!({
                "type": "custom.googleapis.com/queue_depth",
                "metric_kind": "SUMMARY",
                "value_type": "INT64",
                "description": "Jobs waiting"
            })),
        )
        .await
        .unwrap();

        let listed = list_metric_descriptors(&state, &args(json!({}))).await.unwrap();
        let descriptors = listed["descriptors"].as_array().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0]["type"], "custom.googleapis.com/queue_depth");
        assert_eq!(descriptors[0]["metric_kind"], "GAUGE");
        assert_eq!(descriptors[0]["value_type"], "INT64");

        delete_metric_descriptor(
            &state,
            &args(json!({"metric_type": "custom.googleapis.com/queue_depth"})),
        )
        .await
        .unwrap();

        let listed = list_metric_descriptors(&state, &args(json!({}))).await.unwrap();
        assert!(listed["descriptors"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_list_time_series() {
        let state = AppState::default();

        write_time_series(
            &state,
            &args(json!({
                "metric_type": "custom.googleapis.com/latency",
                "resource_type": "global",
                "value": 12.5,
                "metric_labels": {"env": "prod"},
                "timestamp": "2024-03-01T12:00:00Z"
            })),
        )
        .await
        .unwrap();

        let listed = list_time_series(
            &state,
            &args(json!({
                "filter": "metric.type=\"custom.googleapis.com/latency\"",
                "start_time": "2024-03-01T11:00:00Z",
                "end_time": "2024-03-01T13:00:00Z",
                "aggregation": {"alignment_period": "not-a-duration"}
            })),
        )
        .await
        .unwrap();

        let series = listed["time_series"].as_array().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0]["metric_labels"]["env"], "prod");
        assert_eq!(series[0]["values"][0]["value"], 12.5);
    }

    #[tokio::test]
    async fn test_list_time_series_rejects_bad_window() {
        let state = AppState::default();

        let err = list_time_series(
            &state,
            &args(json!({
                "filter": "metric.type=\"x\"",
                "start_time": "yesterday",
                "end_time": "2024-03-01T13:00:00Z"
            })),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().starts_with("Invalid start_time format"));
    }

    #[tokio::test]
    async fn test_write_time_series_requires_number() {
        let state = AppState::default();

        let err = write_time_series(
            &state,
            &args(json!({"metric_type": "m", "resource_type": "global", "value": "12"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "value is required");
    }

    #[tokio::test]
    async fn test_delete_missing_descriptor_is_provider_error() {
        let state = AppState::default();

        let err = delete_metric_descriptor(&state, &args(json!({"metric_type": "custom.googleapis.com/nope"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "provider_error");
    }
}
