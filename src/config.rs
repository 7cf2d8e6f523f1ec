use std::env;
use std::path::PathBuf;

pub const DEFAULT_PDF_PATH: &str = "example.pdf";
pub const DEFAULT_EMBED_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_LLM_MODEL_ID: &str = "google/flan-t5-base";
pub const DEFAULT_INFERENCE_URL: &str = "https://router.huggingface.co/hf-inference";

pub const DEFAULT_PQAI_API_URL: &str = "https://search.projectpq.ai/api/search";
pub const DEFAULT_GPT4_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Settings shared by the question-answering binaries.
#[derive(Debug, Clone)]
pub struct QaConfig {
    pub pdf_path: PathBuf,
    pub embed_model: String,
    pub llm_model_id: String,
    pub inference_url: String,
    pub api_token: Option<String>,
    pub top_k: usize,
    pub max_length: u32,
    /// Unset means pages are indexed whole.
    pub chunk_size: Option<usize>,
    pub chunk_overlap: usize,
}

impl QaConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            pdf_path: non_empty("PDF_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PDF_PATH)),
            embed_model: non_empty("EMBED_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            llm_model_id: non_empty("LLM_MODEL_ID")
                .unwrap_or_else(|| DEFAULT_LLM_MODEL_ID.to_string()),
            inference_url: non_empty("HF_INFERENCE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string()),
            api_token: non_empty("HF_API_TOKEN"),
            top_k: non_empty("RETRIEVER_K")
                .and_then(|k| k.parse().ok())
                .filter(|k| *k > 0)
                .unwrap_or(4),
            max_length: non_empty("LLM_MAX_LENGTH")
                .and_then(|n| n.parse().ok())
                .unwrap_or(512),
            chunk_size: non_empty("CHUNK_SIZE")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0),
            chunk_overlap: non_empty("CHUNK_OVERLAP")
                .and_then(|n| n.parse().ok())
                .unwrap_or(200),
        }
    }
}

/// Settings for the chat relay server and its two upstream APIs.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub pqai_api_url: String,
    pub pqai_api_key: String,
    pub gpt4_api_url: String,
    pub gpt4_api_key: String,
    pub gpt4_model: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("RELAY_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: non_empty("RELAY_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_path: non_empty("CHAT_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("chat_history.db")),
            pqai_api_url: non_empty("PQAI_API_URL")
                .unwrap_or_else(|| DEFAULT_PQAI_API_URL.to_string()),
            // A missing key still sends "Bearer " and lets the upstream reject it.
            pqai_api_key: lookup("PQAI_API_KEY").unwrap_or_default(),
            gpt4_api_url: non_empty("GPT4_API_URL")
                .unwrap_or_else(|| DEFAULT_GPT4_API_URL.to_string()),
            gpt4_api_key: lookup("GPT4_API_KEY").unwrap_or_default(),
            gpt4_model: non_empty("GPT4_MODEL").unwrap_or_else(|| "gpt-4".to_string()),
        }
    }
}
