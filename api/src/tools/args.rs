//! Typed access to a loosely-typed tool argument object.
//!
//! Required arguments fail with [`ToolError::InvalidArguments`]; optional ones
//! quietly fall back to a default when absent or of the wrong JSON type.

use super::ToolError;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// The argument object of one tool call.
#[derive(Debug, Clone, Default)]
pub struct Args {
    inner: Map<String, Value>,
}

impl Args {
    /// Wraps an argument object.
    #[must_use]
    pub fn new(inner: Map<String, Value>) -> Self {
        Self { inner }
    }

    /// Converts a request body into arguments; `null` counts as no arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is neither an object nor `null`.
    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Object(inner) => Ok(Self::new(inner)),
            Value::Null => Ok(Self::default()),
            _ => Err(ToolError::invalid("arguments must be a JSON object")),
        }
    }

    /// Returns the raw value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.inner.get(name)
    }

    /// Returns the string `name`, failing if it is absent or not a string.
    ///
    /// # Errors
    ///
    /// Returns `"<name> is required"` when the argument is missing.
    pub fn require_str(&self, name: &str) -> Result<String, ToolError> {
        self.inner
            .get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ToolError::required(name))
    }

    /// Returns the number `name`, failing if it is absent or not a number.
    ///
    /// # Errors
    ///
    /// Returns `"<name> is required"` when the argument is missing.
    pub fn require_f64(&self, name: &str) -> Result<f64, ToolError> {
        self.inner
            .get(name)
            .and_then(Value::as_f64)
            .ok_or_else(|| ToolError::required(name))
    }

    /// Returns the string `name`, or an empty string.
    #[must_use]
    pub fn str_or_default(&self, name: &str) -> String {
        self.inner
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Returns the string `name` when it is present and non-empty.
    #[must_use]
    pub fn non_empty_str(&self, name: &str) -> Option<String> {
        self.inner
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Returns the positive number `name` truncated to an integer, or 0.
    ///
    /// Zero is the "use the provider default" page size.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn positive_i64(&self, name: &str) -> i64 {
        self.inner
            .get(name)
            .and_then(Value::as_f64)
            .filter(|n| *n > 0.0)
            .map_or(0, |n| n as i64)
    }

    /// Returns the string-valued entries of the object `name`.
    ///
    /// Non-string values are dropped.
    #[must_use]
    pub fn labels(&self, name: &str) -> HashMap<String, String> {
        string_map(self.inner.get(name))
    }

    /// Returns the object `name`, if it is one.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Map<String, Value>> {
        self.inner.get(name).and_then(Value::as_object)
    }

    /// Parses the required RFC 3339 timestamp `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the argument is missing or malformed.
    pub fn require_timestamp(&self, name: &str) -> Result<DateTime<Utc>, ToolError> {
        let raw = self.require_str(name)?;
        parse_rfc3339(&raw)
            .map_err(|e| ToolError::invalid(format!("Invalid {name} format: {e}")))
    }

    /// Parses the optional RFC 3339 timestamp `name`, using now when it is
    /// absent or malformed.
    #[must_use]
    pub fn timestamp_or_now(&self, name: &str) -> DateTime<Utc> {
        timestamp_or_now(self.inner.get(name))
    }
}

/// Collects the string-valued entries of a JSON object.
pub(crate) fn string_map(value: Option<&Value>) -> HashMap<String, String> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Parses an RFC 3339 timestamp into UTC.
pub(crate) fn parse_rfc3339(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|t| t.with_timezone(&Utc))
}

/// Parses an optional RFC 3339 timestamp, falling back to now.
pub(crate) fn timestamp_or_now(value: Option<&Value>) -> DateTime<Utc> {
    value
        .and_then(Value::as_str)
        .and_then(|raw| parse_rfc3339(raw).ok())
        .unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        Args::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Args::from_value(json!([1, 2])).is_err());
        assert!(Args::from_value(json!("x")).is_err());
        assert!(Args::from_value(Value::Null).unwrap().get("a").is_none());
    }

    #[test]
    fn test_require_str() {
        let a = args(json!({"name": "app", "count": 3}));
        assert_eq!(a.require_str("name").unwrap(), "app");

        let err = a.require_str("count").unwrap_err();
        assert_eq!(err.to_string(), "count is required");
        assert!(a.require_str("missing").is_err());
    }

    #[test]
    fn test_require_str_allows_empty() {
        let a = args(json!({"filter": ""}));
        assert_eq!(a.require_str("filter").unwrap(), "");
    }

    #[test]
    fn test_positive_i64() {
        let a = args(json!({"a": 25.9, "b": -4, "c": "10", "d": 0}));
        assert_eq!(a.positive_i64("a"), 25);
        assert_eq!(a.positive_i64("b"), 0);
        assert_eq!(a.positive_i64("c"), 0);
        assert_eq!(a.positive_i64("d"), 0);
        assert_eq!(a.positive_i64("missing"), 0);
    }

    #[test]
    fn test_labels_keep_only_strings() {
        let a = args(json!({"labels": {"env": "prod", "replicas": 3, "canary": true}}));
        let labels = a.labels("labels");
        assert_eq!(labels.len(), 1);
        assert_eq!(labels["env"], "prod");

        assert!(a.labels("missing").is_empty());
    }

    #[test]
    fn test_require_timestamp() {
        let a = args(json!({
            "start": "2024-05-01T10:00:00+02:00",
            "bad": "yesterday"
        }));

        let start = a.require_timestamp("start").unwrap();
        assert_eq!(start.to_rfc3339(), "2024-05-01T08:00:00+00:00");

        let err = a.require_timestamp("bad").unwrap_err();
        assert!(err.to_string().starts_with("Invalid bad format"));

        let err = a.require_timestamp("missing").unwrap_err();
        assert_eq!(err.to_string(), "missing is required");
    }

    #[test]
    fn test_timestamp_or_now_falls_back() {
        let before = Utc::now();
        let a = args(json!({"ts": "not-a-time"}));
        assert!(a.timestamp_or_now("ts") >= before);
        assert!(a.timestamp_or_now("missing") >= before);

        let a = args(json!({"ts": "2024-01-01T00:00:00Z"}));
        assert_eq!(a.timestamp_or_now("ts").to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_non_empty_str() {
        let a = args(json!({"a": "", "b": "x"}));
        assert_eq!(a.non_empty_str("a"), None);
        assert_eq!(a.non_empty_str("b").as_deref(), Some("x"));
        assert_eq!(a.str_or_default("missing"), "");
    }
}
