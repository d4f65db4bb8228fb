//! Experiment-tracking backend queries.

use async_trait::async_trait;
use podium_core::error::QueryError;
use podium_core::gateway::RunQuery;
use podium_core::model::{QueryWindow, ResultRecord};
use serde::Deserialize;
use tracing::debug;

/// Queries run records from the tracking backend over HTTP.
///
/// The backend exposes runs per namespace (`"{entity}/{project}"`) and
/// filters them server-side by creation time. The response is a JSON array
/// of run objects whose `summary` holds the validator-reported fields.
pub struct HttpRunQuery {
    base_url: String,
    client: reqwest::Client,
}

/// One run object as returned by the backend.
#[derive(Debug, Deserialize)]
struct RunItem {
    #[serde(default)]
    summary: serde_json::Map<String, serde_json::Value>,
}

impl HttpRunQuery {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into();
        HttpRunQuery {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn runs_url(&self, namespace: &str) -> String {
        format!("{}/api/runs/{}", self.base_url, namespace)
    }
}

#[async_trait]
impl RunQuery for HttpRunQuery {
    async fn query_runs(
        &self,
        namespace: &str,
        window: &QueryWindow,
    ) -> Result<Vec<ResultRecord>, QueryError> {
        let url = self.runs_url(namespace);
        debug!(namespace, %url, "querying run records");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("created_after", window.created_after.to_rfc3339()),
                ("created_before", window.created_before.to_rfc3339()),
            ])
            .send()
            .await
            .map_err(|err| QueryError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
            });
        }

        let items: Vec<RunItem> = response
            .json()
            .await
            .map_err(|err| QueryError::Parse(err.to_string()))?;
        Ok(items
            .into_iter()
            .map(|item| ResultRecord::new(item.summary))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::model::FIELD_WINNING_HOTKEY;

    #[test]
    fn test_runs_url_composition() {
        let query = HttpRunQuery::new("https://tracking.example/", reqwest::Client::new());
        assert_eq!(
            query.runs_url("safe-scan-ai/melanoma-1"),
            "https://tracking.example/api/runs/safe-scan-ai/melanoma-1"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_transport_error() {
        let query = HttpRunQuery::new("http://127.0.0.1:9", reqwest::Client::new());
        let window = QueryWindow {
            created_after: chrono::Utc::now() - chrono::Duration::hours(1),
            created_before: chrono::Utc::now(),
        };

        let err = query
            .query_runs("safe-scan-ai/melanoma-1", &window)
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, QueryError::Transport(_)));
    }

    #[test]
    fn test_run_item_summary_parses() {
        let body = r#"[
            {"summary": {"winning_hotkey": "H1", "score": 0.87}},
            {"summary": {}},
            {}
        ]"#;
        let items: Vec<RunItem> = serde_json::from_str(body).expect("items must parse");
        let records: Vec<ResultRecord> = items
            .into_iter()
            .map(|item| ResultRecord::new(item.summary))
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].str_field(FIELD_WINNING_HOTKEY), Some("H1"));
        assert!(!records[1].has(FIELD_WINNING_HOTKEY));
        assert!(!records[2].has(FIELD_WINNING_HOTKEY));
    }
}
