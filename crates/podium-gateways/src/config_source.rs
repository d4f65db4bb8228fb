//! Remote competition configuration fetching.

use async_trait::async_trait;
use podium_core::error::ConfigFetchError;
use podium_core::gateway::ConfigSource;
use podium_core::model::CompetitionDefinition;
use tracing::{error, info};

/// Fetches the competition set from a JSON document over HTTP.
///
/// The document is a JSON array of competition definition objects. Any
/// invalid entry fails the whole fetch, so a half-valid document never
/// replaces the registry; the previous contents stay in effect.
pub struct HttpConfigSource {
    url: String,
    client: reqwest::Client,
}

impl HttpConfigSource {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        HttpConfigSource {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl ConfigSource for HttpConfigSource {
    async fn fetch_competitions(&self) -> Result<Vec<CompetitionDefinition>, ConfigFetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| ConfigFetchError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(ConfigFetchError::Status { status });
        }

        let body = response
            .text()
            .await
            .map_err(|err| ConfigFetchError::Transport(err.to_string()))?;
        let competitions: Vec<CompetitionDefinition> =
            serde_json::from_str(&body).map_err(|err| ConfigFetchError::Parse(err.to_string()))?;

        for competition in &competitions {
            if let Err(err) = competition.validate() {
                error!(
                    competition_id = %competition.competition_id,
                    error = %err,
                    "rejecting competition configuration"
                );
                return Err(err.into());
            }
        }

        info!(count = competitions.len(), "competition configuration fetched");
        Ok(competitions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(document: &str) -> Result<Vec<CompetitionDefinition>, serde_json::Error> {
        serde_json::from_str(document)
    }

    #[test]
    fn test_document_parses() {
        let document = r#"[{
            "competition_id": "melanoma-1",
            "category": "skin",
            "evaluation_times": ["09:00", "15:00"],
            "dataset_hf_repo": "safescan/melanoma",
            "dataset_hf_filename": "eval.zip",
            "dataset_hf_repo_type": "dataset"
        }]"#;
        let competitions = parse(document).expect("document must parse");
        assert_eq!(competitions.len(), 1);
        assert_eq!(competitions[0].competition_id, "melanoma-1");
        assert!(competitions[0].validate().is_ok());
    }

    #[test]
    fn test_document_missing_field_fails() {
        let document = r#"[{"competition_id": "melanoma-1"}]"#;
        assert!(parse(document).is_err());
    }

    #[test]
    fn test_document_must_be_an_array() {
        let document = r#"{"competition_id": "melanoma-1"}"#;
        assert!(parse(document).is_err());
    }
}
