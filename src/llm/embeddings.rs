use crate::providers::error::InferenceError;
use anyhow::{Error, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const BATCH_SIZE: usize = 32;

/// Maps text to fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::msg("No embedding returned for query"))
    }
}

/// Sentence embeddings from a hosted feature-extraction pipeline
/// (`POST {base}/models/{model}/pipeline/feature-extraction`).
#[derive(Clone)]
pub struct HuggingFaceEmbeddings {
    client: Client,
    base_url: String,
    model_name: String,
    api_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FeatureReply {
    Sentences(Vec<Vec<f32>>),
    Tokens(Vec<Vec<Vec<f32>>>),
}

impl HuggingFaceEmbeddings {
    pub fn new(client: Client, base_url: &str, model_name: &str, api_token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_name: model_name.to_string(),
            api_token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}/pipeline/feature-extraction",
            self.base_url, self.model_name
        )
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, InferenceError> {
        let mut req = self.client.post(self.endpoint()).json(&json!({
            "inputs": texts,
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

        let vectors = parse_features(&body)?;
        if vectors.len() != texts.len() {
            return Err(InferenceError::Format(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

#[async_trait]
impl Embedder for HuggingFaceEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Embedding {} texts in batches of {} with {}",
            texts.len(),
            BATCH_SIZE,
            self.model_name
        );
        let batches = texts.chunks(BATCH_SIZE).map(|batch| self.embed_batch(batch));
        let results = futures::future::try_join_all(batches).await?;
        Ok(results.into_iter().flatten().collect())
    }
}

/// Accepts pooled sentence vectors or per-token vectors, which are mean-pooled.
/// An input that comes back without any values is an error.
pub(crate) fn parse_features(body: &str) -> Result<Vec<Vec<f32>>, InferenceError> {
    let reply: FeatureReply =
        serde_json::from_str(body).map_err(|e| InferenceError::Format(e.to_string()))?;

    let vectors = match reply {
        FeatureReply::Sentences(vectors) => vectors,
        FeatureReply::Tokens(per_text) => per_text.iter().map(|tokens| mean_pool(tokens)).collect(),
    };

    if let Some(i) = vectors.iter().position(|v| v.is_empty()) {
        return Err(InferenceError::Format(format!(
            "empty embedding for input {}",
            i
        )));
    }
    Ok(vectors)
}

fn mean_pool(tokens: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = tokens.first() else {
        return Vec::new();
    };
    let mut pooled = vec![0.0; first.len()];
    for token in tokens {
        for (acc, x) in pooled.iter_mut().zip(token) {
            *acc += x;
        }
    }
    let n = tokens.len() as f32;
    pooled.iter_mut().for_each(|x| *x /= n);
    pooled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentence_vectors() {
        let vectors = parse_features("[[0.1, 0.2], [0.3, 0.4]]").unwrap();
        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn test_parse_token_vectors_mean_pools() {
        let vectors = parse_features("[[[1.0, 3.0], [3.0, 5.0]]]").unwrap();
        assert_eq!(vectors, vec![vec![2.0, 4.0]]);
    }

    #[test]
    fn test_parse_rejects_empty_token_list() {
        match parse_features("[[[1.0, 3.0]], []]") {
            Err(InferenceError::Format(msg)) => assert_eq!(msg, "empty embedding for input 1"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse_features("[[]]"), Err(InferenceError::Format(_))));
    }

    #[test]
    fn test_parse_rejects_error_object() {
        assert!(matches!(
            parse_features(r#"{"error": "Model is loading"}"#),
            Err(InferenceError::Format(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let embeddings = HuggingFaceEmbeddings::new(
            Client::new(),
            "https://router.huggingface.co/hf-inference",
            "sentence-transformers/all-MiniLM-L6-v2",
            None,
        );
        assert_eq!(
            embeddings.endpoint(),
            "https://router.huggingface.co/hf-inference/models/sentence-transformers/all-MiniLM-L6-v2/pipeline/feature-extraction"
        );
    }
}
