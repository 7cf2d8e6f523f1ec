use crate::providers::error::InferenceError;
use crate::providers::traits::CompletionProvider;
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Text2text generation through a hosted inference endpoint
/// (`POST {base}/models/{model_id}`).
#[derive(Clone)]
pub struct HuggingFacePipeline {
    client: Client,
    base_url: String,
    model_id: String,
    api_token: Option<String>,
    max_length: u32,
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationReply {
    Batch(Vec<Generated>),
    Failed { error: String },
    Single(Generated),
}

impl HuggingFacePipeline {
    pub fn from_model_id(
        client: Client,
        base_url: &str,
        model_id: &str,
        api_token: Option<String>,
        max_length: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
            api_token,
            max_length,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model_id)
    }

    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let mut req = self.client.post(self.endpoint()).json(&json!({
            "inputs": prompt,
            "parameters": { "max_length": self.max_length },
            "options": { "wait_for_model": true }
        }));

        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(InferenceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!("{} replied with {} bytes", self.model_id, body.len());
        parse_generation(&body)
    }
}

#[async_trait]
impl CompletionProvider for HuggingFacePipeline {
    async fn complete(&self, prompt: &str) -> Result<String> {
        Ok(self.generate(prompt).await?)
    }

    fn get_model_info(&self) -> String {
        self.model_id.clone()
    }
}

pub(crate) fn parse_generation(body: &str) -> Result<String, InferenceError> {
    let reply: GenerationReply =
        serde_json::from_str(body).map_err(|e| InferenceError::Format(e.to_string()))?;

    match reply {
        GenerationReply::Batch(items) => items
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .ok_or_else(|| InferenceError::Format("empty generation list".to_string())),
        GenerationReply::Single(g) => Ok(g.generated_text.trim().to_string()),
        GenerationReply::Failed { error } => Err(InferenceError::Api {
            status: 200,
            message: error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch_reply() {
        let text = parse_generation(r#"[{"generated_text": " Paris "}]"#).unwrap();
        assert_eq!(text, "Paris");
    }

    #[test]
    fn test_parse_single_reply() {
        let text = parse_generation(r#"{"generated_text": "ok"}"#).unwrap();
        assert_eq!(text, "ok");
    }

    #[test]
    fn test_parse_error_reply() {
        let err = parse_generation(r#"{"error": "Model is loading"}"#).unwrap_err();
        assert!(matches!(err, InferenceError::Api { message, .. } if message == "Model is loading"));
    }

    #[test]
    fn test_parse_empty_batch() {
        assert!(matches!(
            parse_generation("[]"),
            Err(InferenceError::Format(_))
        ));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let llm = HuggingFacePipeline::from_model_id(
            Client::new(),
            "http://localhost:8080/",
            "google/flan-t5-base",
            None,
            512,
        );
        assert_eq!(llm.endpoint(), "http://localhost:8080/models/google/flan-t5-base");
        assert_eq!(llm.get_model_info(), "google/flan-t5-base");
    }
}
