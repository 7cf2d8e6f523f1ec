use crate::providers::traits::ChatBackend;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

/// Forwards a single user message to an OpenAI-style chat completions API.
#[derive(Clone)]
pub struct Gpt4Backend {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl Gpt4Backend {
    pub fn new(client: Client, api_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for Gpt4Backend {
    fn label(&self) -> &str {
        "GPT-4"
    }

    async fn reply(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": message
                    }
                ]
            }))
            .send()
            .await?;

        // The body decides, whatever the status: error payloads have no choices.
        let response_json: Value = response.json().await?;
        extract_content(&response_json)
    }
}

fn extract_content(response_json: &Value) -> Result<String> {
    response_json
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| match response_json.get("error") {
            Some(error) => anyhow!("API returned error: {}", error),
            None => anyhow!("response has no choices[0].message.content"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello there" } }]
        });
        assert_eq!(extract_content(&body).unwrap(), "Hello there");
    }

    #[test]
    fn test_extract_reports_api_error() {
        let body = json!({ "error": { "message": "Incorrect API key provided" } });
        let err = extract_content(&body).unwrap_err().to_string();
        assert!(err.starts_with("API returned error:"));
        assert!(err.contains("Incorrect API key provided"));
    }

    #[test]
    fn test_extract_missing_choices() {
        let body = json!({ "choices": [] });
        let err = extract_content(&body).unwrap_err().to_string();
        assert_eq!(err, "response has no choices[0].message.content");
    }
}
