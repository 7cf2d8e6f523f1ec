use crate::providers::traits::ChatBackend;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

pub const NO_PATENTS_FOUND: &str = "No relevant patents found.";

/// Patent search backend. Sends the message as a free-text query and replies
/// with the summary the service returns.
#[derive(Clone)]
pub struct PqaiBackend {
    client: Client,
    api_url: String,
    api_key: String,
}

impl PqaiBackend {
    pub fn new(client: Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for PqaiBackend {
    fn label(&self) -> &str {
        "PQAI"
    }

    async fn reply(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "query": message,
                "filters": {}
            }))
            .send()
            .await?;

        let response_json: Value = response.json().await?;
        Ok(summary_or_default(&response_json))
    }
}

fn summary_or_default(response_json: &Value) -> String {
    response_json
        .get("summary")
        .and_then(|s| s.as_str())
        .map(|s| s.to_string())
        .unwrap_or_else(|| NO_PATENTS_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_present() {
        let body = json!({ "summary": "3 patents on solid-state batteries", "results": [] });
        assert_eq!(summary_or_default(&body), "3 patents on solid-state batteries");
    }

    #[test]
    fn test_summary_missing() {
        assert_eq!(summary_or_default(&json!({ "results": [] })), NO_PATENTS_FOUND);
        assert_eq!(summary_or_default(&json!([])), NO_PATENTS_FOUND);
    }
}
