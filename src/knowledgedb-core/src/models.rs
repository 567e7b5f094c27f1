use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// SearchMode selects the ranking strategy of `/search`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    Graph,
    #[default]
    Hybrid,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Keyword => "keyword",
            SearchMode::Graph => "graph",
            SearchMode::Hybrid => "hybrid",
        }
    }
}

impl FromStr for SearchMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(SearchMode::Keyword),
            "graph" => Ok(SearchMode::Graph),
            "hybrid" => Ok(SearchMode::Hybrid),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MemoryType classifies an agent memory entry
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MemoryType {
    Semantic,
    Episodic,
    Procedural,
}

impl MemoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryType::Semantic => "semantic",
            MemoryType::Episodic => "episodic",
            MemoryType::Procedural => "procedural",
        }
    }
}

impl FromStr for MemoryType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic" => Ok(MemoryType::Semantic),
            "episodic" => Ok(MemoryType::Episodic),
            "procedural" => Ok(MemoryType::Procedural),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for MemoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown value: {0}")]
pub struct UnknownVariant(pub String);

/// Options for `/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub mode: SearchMode,
    /// Restrict to these collections; omitted from the request when `None`
    pub collections: Option<Vec<String>>,
    pub graph_depth: u32,
    pub limit: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::Hybrid,
            collections: None,
            graph_depth: 2,
            limit: 10,
        }
    }
}

/// Options for `/ask`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskOptions {
    /// Sent as `contextDepth`
    pub depth: u32,
    pub collections: Option<Vec<String>>,
    pub limit: u32,
}

impl Default for AskOptions {
    fn default() -> Self {
        Self {
            depth: 3,
            collections: None,
            limit: 10,
        }
    }
}

/// Options for `/memory/recall`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecallOptions {
    pub limit: u32,
    pub mem_type: Option<MemoryType>,
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            mem_type: None,
        }
    }
}

/// Options for `/memory/forget`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForgetOptions {
    /// Age filter understood by the service, e.g. `"30"` (days)
    pub older_than: Option<String>,
    pub mem_type: Option<MemoryType>,
}

/// Options for `/memory/list`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub mem_type: Option<MemoryType>,
    pub limit: u32,
    pub skip: u32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            mem_type: None,
            limit: 20,
            skip: 0,
        }
    }
}

/// Blend weights for `/hybrid/enhanced`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridWeights {
    pub vector: f64,
    pub keyword: f64,
    pub graph: f64,
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            vector: 0.4,
            keyword: 0.3,
            graph: 0.3,
        }
    }
}

/// ErrorResponse is the body the service sends with a failing status
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Message to report for a failed request.
///
/// Uses the `error` field of a JSON error body when there is one and falls
/// back to `HTTP <status>` for anything else (empty body, non-JSON body,
/// JSON without `error`).
pub fn error_message(status: u16, body: &str) -> String {
    let extracted = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|resp| resp.error)
        .and_then(|error| match error {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

    extracted.unwrap_or_else(|| format!("HTTP {}", status))
}

/// LiveEvent is one frame of a collection's change stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiveEvent {
    /// `connected`, `document.inserted`, `document.updated`, ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Undecodable frame data, kept verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl LiveEvent {
    /// Decode the `data` of one event frame.
    ///
    /// Data that is not a JSON event becomes an `error` event carrying the
    /// original text in `raw`.
    pub fn from_data(data: &str) -> Self {
        match serde_json::from_str::<LiveEvent>(data) {
            Ok(event) => event,
            Err(err) => {
                tracing::debug!(error = %err, "Undecodable live event");
                let mut extra = HashMap::new();
                extra.insert(
                    "error".to_string(),
                    serde_json::Value::String(err.to_string()),
                );
                Self {
                    kind: "error".to_string(),
                    document: None,
                    timestamp: None,
                    raw: Some(data.to_string()),
                    extra,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_uses_error_field() {
        assert_eq!(error_message(404, r#"{"error": "not found"}"#), "not found");
        assert_eq!(
            error_message(400, r#"{"error": "Validation failed", "details": ["x"]}"#),
            "Validation failed"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(error_message(500, ""), "HTTP 500");
        assert_eq!(error_message(500, "<html>Bad Gateway</html>"), "HTTP 500");
        assert_eq!(error_message(502, r#"{"message": "nope"}"#), "HTTP 502");
        assert_eq!(error_message(503, r#"{"error": null}"#), "HTTP 503");
        assert_eq!(error_message(500, "[1, 2]"), "HTTP 500");
    }

    #[test]
    fn test_error_message_non_string_error() {
        assert_eq!(
            error_message(422, r#"{"error": {"field": "age"}}"#),
            r#"{"field":"age"}"#
        );
    }

    #[test]
    fn test_option_defaults() {
        let search = SearchOptions::default();
        assert_eq!(search.mode, SearchMode::Hybrid);
        assert_eq!(search.graph_depth, 2);
        assert_eq!(search.limit, 10);
        assert!(search.collections.is_none());

        let ask = AskOptions::default();
        assert_eq!((ask.depth, ask.limit), (3, 10));

        assert_eq!(RecallOptions::default().limit, 5);

        let list = ListOptions::default();
        assert_eq!((list.limit, list.skip), (20, 0));
    }

    #[test]
    fn test_enum_round_trip_names() {
        assert_eq!(serde_json::to_value(SearchMode::Keyword).unwrap(), json!("keyword"));
        assert_eq!(serde_json::to_value(MemoryType::Episodic).unwrap(), json!("episodic"));
        assert_eq!("procedural".parse::<MemoryType>().unwrap(), MemoryType::Procedural);
        assert_eq!("graph".parse::<SearchMode>().unwrap(), SearchMode::Graph);
        assert!("fuzzy".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_live_event_decoding() {
        let event = LiveEvent::from_data(
            r#"{"type":"document.inserted","document":{"_id":"1","name":"Alice"},"timestamp":"2026-01-02T03:04:05.678Z"}"#,
        );
        assert_eq!(event.kind, "document.inserted");
        assert_eq!(event.document, Some(json!({"_id": "1", "name": "Alice"})));
        assert!(event.timestamp.is_some());
        assert!(event.raw.is_none());

        let event = LiveEvent::from_data("not json");
        assert_eq!(event.kind, "error");
        assert_eq!(event.raw.as_deref(), Some("not json"));
        assert!(event.extra.contains_key("error"));
    }
}
