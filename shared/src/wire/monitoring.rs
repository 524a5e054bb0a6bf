//! Cloud Monitoring v3 wire format.

use super::MonitoredResource;
use crate::models::{
    AggregationConfig, AvailableMetric, MetricDescriptor, MetricLabel, MetricValue, TimeSeriesData,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Alignment period used when the requested one cannot be parsed.
pub const DEFAULT_ALIGNMENT_PERIOD: Duration = Duration::from_secs(60);

/// Value type reported for every label of an available metric.
const LABEL_VALUE_TYPE: &str = "STRING";

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Returns the provider's JSON name for this value.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            fn lookup(name: &str) -> Option<Self> {
                match name {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

wire_enum! {
    /// `google.api.MetricDescriptor.MetricKind`.
    MetricKind {
        Unspecified => "METRIC_KIND_UNSPECIFIED",
        Gauge => "GAUGE",
        Delta => "DELTA",
        Cumulative => "CUMULATIVE",
    }
}

wire_enum! {
    /// `google.api.MetricDescriptor.ValueType`.
    ValueType {
        Unspecified => "VALUE_TYPE_UNSPECIFIED",
        Bool => "BOOL",
        Int64 => "INT64",
        Double => "DOUBLE",
        String => "STRING",
        Distribution => "DISTRIBUTION",
        Money => "MONEY",
    }
}

wire_enum! {
    /// `google.monitoring.v3.Aggregation.Aligner`.
    Aligner {
        None => "ALIGN_NONE",
        Delta => "ALIGN_DELTA",
        Rate => "ALIGN_RATE",
        Mean => "ALIGN_MEAN",
        Max => "ALIGN_MAX",
        Min => "ALIGN_MIN",
        Sum => "ALIGN_SUM",
        Count => "ALIGN_COUNT",
    }
}

wire_enum! {
    /// `google.monitoring.v3.Aggregation.Reducer`.
    Reducer {
        None => "REDUCE_NONE",
        Mean => "REDUCE_MEAN",
        Max => "REDUCE_MAX",
        Min => "REDUCE_MIN",
        Sum => "REDUCE_SUM",
        Count => "REDUCE_COUNT",
    }
}

/// Maps a generic metric kind to the provider kind; unknown kinds are `Gauge`.
#[must_use]
pub fn metric_kind_to_wire(kind: &str) -> MetricKind {
    match kind {
        "DELTA" => MetricKind::Delta,
        "CUMULATIVE" => MetricKind::Cumulative,
        _ => MetricKind::Gauge,
    }
}

/// Maps a generic value type to the provider type; unknown types are `Double`.
#[must_use]
pub fn value_type_to_wire(value_type: &str) -> ValueType {
    match value_type {
        "BOOL" => ValueType::Bool,
        "INT64" => ValueType::Int64,
        "STRING" => ValueType::String,
        "DISTRIBUTION" => ValueType::Distribution,
        _ => ValueType::Double,
    }
}

/// Maps a provider metric kind name back to a generic kind, `None` when it
/// has no generic counterpart.
#[must_use]
pub fn metric_kind_from_wire(kind: &str) -> Option<&'static str> {
    match MetricKind::lookup(kind) {
        Some(kind @ (MetricKind::Gauge | MetricKind::Delta | MetricKind::Cumulative)) => {
            Some(kind.as_str())
        }
        Some(MetricKind::Unspecified) | None => None,
    }
}

/// Maps a provider value type name back to a generic type, `None` when it has
/// no generic counterpart.
#[must_use]
pub fn value_type_from_wire(value_type: &str) -> Option<&'static str> {
    match ValueType::lookup(value_type) {
        Some(
            value_type @ (ValueType::Bool
            | ValueType::Int64
            | ValueType::Double
            | ValueType::String
            | ValueType::Distribution),
        ) => Some(value_type.as_str()),
        Some(ValueType::Unspecified | ValueType::Money) | None => None,
    }
}

/// Maps a per-series aligner name; unknown or empty names are `Mean`.
#[must_use]
pub fn aligner_to_wire(aligner: &str) -> Aligner {
    match aligner {
        "ALIGN_MAX" => Aligner::Max,
        "ALIGN_MIN" => Aligner::Min,
        "ALIGN_SUM" => Aligner::Sum,
        "ALIGN_RATE" => Aligner::Rate,
        "ALIGN_DELTA" => Aligner::Delta,
        "ALIGN_COUNT" => Aligner::Count,
        _ => Aligner::Mean,
    }
}

/// Maps a cross-series reducer name; unknown names are `None`.
#[must_use]
pub fn reducer_to_wire(reducer: &str) -> Reducer {
    match reducer {
        "REDUCE_MEAN" => Reducer::Mean,
        "REDUCE_MAX" => Reducer::Max,
        "REDUCE_MIN" => Reducer::Min,
        "REDUCE_SUM" => Reducer::Sum,
        "REDUCE_COUNT" => Reducer::Count,
        _ => Reducer::None,
    }
}

/// Parses an alignment period such as `60s`, `5m`, `1h` or `1.5s`.
///
/// Falls back to [`DEFAULT_ALIGNMENT_PERIOD`] when the string is not a valid
/// duration. Negative periods are invalid.
#[must_use]
pub fn parse_alignment_period(period: &str) -> Duration {
    let period = period.trim();
    let parsed = humantime::parse_duration(period)
        .ok()
        .or_else(|| decimal_seconds(period));

    parsed.unwrap_or_else(|| {
        tracing::debug!(period, "Invalid alignment period, using default");
        DEFAULT_ALIGNMENT_PERIOD
    })
}

/// Reads the provider's fractional form, e.g. `"1.5s"`.
fn decimal_seconds(period: &str) -> Option<Duration> {
    let seconds: f64 = period.strip_suffix('s')?.parse().ok()?;
    Duration::try_from_secs_f64(seconds).ok()
}

/// Renders a duration in the provider's JSON form (`"<seconds>s"`).
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}.{:09}s", duration.as_secs(), duration.subsec_nanos())
    }
}

/// Translates an aggregation into `ListTimeSeries` query parameters.
///
/// The reducer and grouping fields are only sent when a reducer is given.
#[must_use]
pub fn aggregation_query(aggregation: &AggregationConfig) -> Vec<(&'static str, String)> {
    let period = parse_alignment_period(&aggregation.alignment_period);
    let mut query = vec![
        ("aggregation.alignmentPeriod", format_duration(period)),
        (
            "aggregation.perSeriesAligner",
            aligner_to_wire(&aggregation.per_series_aligner)
                .as_str()
                .to_string(),
        ),
    ];

    if !aggregation.cross_series_reducer.is_empty() {
        query.push((
            "aggregation.crossSeriesReducer",
            reducer_to_wire(&aggregation.cross_series_reducer)
                .as_str()
                .to_string(),
        ));
        for field in &aggregation.group_by_fields {
            query.push(("aggregation.groupByFields", field.clone()));
        }
    }

    query
}

/// Label schema entry of a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDescriptor {
    /// Label key.
    pub key: String,
    /// Label value type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value_type: String,
    /// Label description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A metric descriptor on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMetricDescriptor {
    /// Resource name; assigned by the provider.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Metric type.
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Label schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelDescriptor>,
    /// Metric kind name.
    #[serde(default)]
    pub metric_kind: String,
    /// Value type name.
    #[serde(default)]
    pub value_type: String,
    /// Unit.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Launch stage name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub launch_stage: String,
}

/// Response of `metricDescriptors.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetricDescriptorsResponse {
    /// Descriptors in the page.
    #[serde(default)]
    pub metric_descriptors: Vec<WireMetricDescriptor>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: String,
}

/// A metric reference in a time series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Metric type.
    #[serde(rename = "type")]
    pub metric_type: String,
    /// Metric labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// A point interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    /// Start time; omitted for gauge points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// End time.
    pub end_time: DateTime<Utc>,
}

/// `int64Value` is a decimal string in JSON, though some proxies send numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Int64Value {
    /// Canonical string form.
    Text(String),
    /// Numeric form.
    Number(i64),
}

impl Int64Value {
    fn as_i64(&self) -> i64 {
        match self {
            Self::Text(text) => text.parse().unwrap_or_default(),
            Self::Number(n) => *n,
        }
    }
}

/// A typed point value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedValue {
    /// Boolean value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bool_value: Option<bool>,
    /// Integer value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub int64_value: Option<Int64Value>,
    /// Double value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_value: Option<f64>,
    /// String value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl TypedValue {
    /// Wraps a double.
    #[must_use]
    pub fn double(value: f64) -> Self {
        Self {
            double_value: Some(value),
            ..Self::default()
        }
    }

    /// Reads the value as a double: doubles as-is, integers widened, booleans
    /// as 1.0 / 0.0 and everything else as 0.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        if let Some(value) = self.double_value {
            value
        } else if let Some(value) = &self.int64_value {
            value.as_i64() as f64
        } else if let Some(value) = self.bool_value {
            if value {
                1.0
            } else {
                0.0
            }
        } else {
            0.0
        }
    }
}

/// A data point on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Point interval.
    pub interval: Interval,
    /// Point value.
    pub value: TypedValue,
}

/// A time series on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTimeSeries {
    /// Metric reference.
    pub metric: Metric,
    /// Monitored resource.
    pub resource: MonitoredResource,
    /// Points, newest first when read back.
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Body of `timeSeries.create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest {
    /// Series to write.
    pub time_series: Vec<WireTimeSeries>,
}

/// Response of `timeSeries.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeSeriesResponse {
    /// Series in the page.
    #[serde(default)]
    pub time_series: Vec<WireTimeSeries>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: String,
}

/// Translates a generic descriptor for creation.
#[must_use]
pub fn descriptor_to_wire(descriptor: &MetricDescriptor) -> WireMetricDescriptor {
    let mut labels: Vec<LabelDescriptor> = descriptor
        .labels
        .iter()
        .map(|(key, description)| LabelDescriptor {
            key: key.clone(),
            value_type: LABEL_VALUE_TYPE.to_string(),
            description: description.clone(),
        })
        .collect();
    labels.sort_by(|a, b| a.key.cmp(&b.key));

    WireMetricDescriptor {
        name: String::new(),
        metric_type: descriptor.metric_type.clone(),
        labels,
        metric_kind: metric_kind_to_wire(&descriptor.metric_kind).as_str().to_string(),
        value_type: value_type_to_wire(&descriptor.value_type).as_str().to_string(),
        unit: String::new(),
        description: descriptor.description.clone(),
        display_name: descriptor.display_name.clone(),
        launch_stage: String::new(),
    }
}

/// Translates a provider descriptor into a bare generic descriptor.
///
/// Kinds and types without a generic counterpart become empty strings.
#[must_use]
pub fn descriptor_from_wire(descriptor: WireMetricDescriptor) -> MetricDescriptor {
    MetricDescriptor {
        metric_kind: metric_kind_from_wire(&descriptor.metric_kind)
            .unwrap_or_default()
            .to_string(),
        value_type: value_type_from_wire(&descriptor.value_type)
            .unwrap_or_default()
            .to_string(),
        metric_type: descriptor.metric_type,
        description: descriptor.description,
        display_name: descriptor.display_name,
        labels: HashMap::new(),
    }
}

/// Translates a provider descriptor into an available metric.
///
/// Unknown kinds read as `GAUGE` and unknown types as `DOUBLE`. Every label
/// is reported with value type `STRING`. An unspecified launch stage is
/// omitted.
#[must_use]
pub fn available_metric_from_wire(descriptor: WireMetricDescriptor) -> AvailableMetric {
    let launch_stage = match descriptor.launch_stage.as_str() {
        "" | "LAUNCH_STAGE_UNSPECIFIED" => String::new(),
        stage => stage.to_string(),
    };

    AvailableMetric {
        metric_kind: metric_kind_from_wire(&descriptor.metric_kind)
            .unwrap_or(MetricKind::Gauge.as_str())
            .to_string(),
        value_type: value_type_from_wire(&descriptor.value_type)
            .unwrap_or(ValueType::Double.as_str())
            .to_string(),
        labels: descriptor
            .labels
            .into_iter()
            .map(|label| MetricLabel {
                key: label.key,
                value_type: LABEL_VALUE_TYPE.to_string(),
                description: label.description,
            })
            .collect(),
        metric_type: descriptor.metric_type,
        display_name: descriptor.display_name,
        description: descriptor.description,
        unit: descriptor.unit,
        launch_stage,
    }
}

/// Translates a generic series for writing. Every point is sent as a double.
#[must_use]
pub fn time_series_to_wire(series: &TimeSeriesData) -> WireTimeSeries {
    WireTimeSeries {
        metric: Metric {
            metric_type: series.metric_type.clone(),
            labels: series.metric_labels.clone(),
        },
        resource: MonitoredResource::new(series.resource_type.clone()),
        points: series
            .values
            .iter()
            .map(|point| Point {
                interval: Interval {
                    start_time: None,
                    end_time: point.timestamp,
                },
                value: TypedValue::double(point.value),
            })
            .collect(),
    }
}

/// Translates a provider series back to the generic model.
#[must_use]
pub fn time_series_from_wire(series: WireTimeSeries) -> TimeSeriesData {
    TimeSeriesData {
        metric_type: series.metric.metric_type,
        metric_labels: series.metric.labels,
        resource_type: series.resource.resource_type,
        values: series
            .points
            .into_iter()
            .map(|point| MetricValue {
                value: point.value.as_f64(),
                timestamp: point.interval.end_time,
            })
            .collect(),
    }
}
