//! Wire types for the Couchbase Lite REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One batch from the `_changes` feed: `{results: [...], last_seq: n}`.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ChangesResponse {
    #[serde(default)]
    pub results: Vec<ChangeRow>,
    #[serde(default)]
    pub last_seq: u64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChangeRow {
    pub seq: u64,
    pub id: String,
    #[serde(default)]
    pub changes: Vec<ChangeRev>,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChangeRev {
    pub rev: String,
}

/// A design document: a named set of map/reduce view definitions.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DesignDocument {
    pub views: BTreeMap<String, ViewDefinition>,
}

impl DesignDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_view(mut self, name: impl Into<String>, view: ViewDefinition) -> Self {
        self.views.insert(name.into(), view);
        self
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ViewDefinition {
    pub map: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce: Option<String>,
}

impl ViewDefinition {
    pub fn map(map: impl Into<String>) -> Self {
        ViewDefinition {
            map: map.into(),
            reduce: None,
        }
    }

    pub fn with_reduce(mut self, reduce: impl Into<String>) -> Self {
        self.reduce = Some(reduce.into());
        self
    }
}

/// Body of `POST /_replicate`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ReplicateRequest {
    pub source: String,
    pub target: String,
    pub continuous: bool,
}

/// Result of document and database writes: `{ok, id, rev}`.
#[derive(Clone, Debug, Deserialize)]
pub struct OkResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub rev: Option<String>,
}

/// Result of `GET /{db}`.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseInfo {
    #[serde(default)]
    pub db_name: Option<String>,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default)]
    pub update_seq: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Shape of the listener's JSON error bodies.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changes_response_deserializes() {
        let raw = json!({
            "results": [
                {"seq": 1, "id": "doc1", "changes": [{"rev": "1-abc"}]},
                {"seq": 2, "id": "doc2", "changes": [{"rev": "2-def"}], "deleted": true}
            ],
            "last_seq": 2
        });
        let parsed: ChangesResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.last_seq, 2);
        assert!(!parsed.results[0].deleted);
        assert!(parsed.results[1].deleted);
        assert_eq!(parsed.results[0].changes[0].rev, "1-abc");
    }

    #[test]
    fn test_empty_changes_batch() {
        let parsed: ChangesResponse = serde_json::from_value(json!({
            "results": [],
            "last_seq": 7
        }))
        .unwrap();
        assert!(parsed.results.is_empty());
        assert_eq!(parsed.last_seq, 7);
    }

    #[test]
    fn test_design_document_body_shape() {
        let doc = DesignDocument::new().with_view(
            "byDate",
            ViewDefinition::map("function(doc) { emit(doc.date, null); }"),
        );
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["views"]["byDate"]["map"].is_string());
        // Absent reduce functions are omitted, not serialized as null.
        assert!(value["views"]["byDate"].get("reduce").is_none());
    }

    #[test]
    fn test_design_document_ignores_server_metadata() {
        let parsed: DesignDocument = serde_json::from_value(json!({
            "_id": "_design/reports",
            "_rev": "1-abc",
            "views": {"byDate": {"map": "function(doc) {}"}}
        }))
        .unwrap();
        assert!(parsed.views.contains_key("byDate"));
    }

    #[test]
    fn test_error_body_shapes() {
        let parsed: ErrorBody = serde_json::from_value(json!({
            "status": 404, "error": "not_found", "reason": "missing"
        }))
        .unwrap();
        assert_eq!(parsed.error.as_deref(), Some("not_found"));

        let parsed: ErrorBody = serde_json::from_value(json!({"status": "404"})).unwrap();
        assert_eq!(parsed.status, Some(json!("404")));
    }
}
