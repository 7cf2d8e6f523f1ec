//! Question answering over a single document.
//!
//! All three flavours share the same setup: load the file, split it into
//! segments, embed them into a [`VectorStore`] and talk to a text generation
//! endpoint. They differ only in how the retrieved segments reach the model.

pub mod agent;
pub mod chain;
pub mod manual;

use crate::config::QaConfig;
use crate::document::{self, Document};
use crate::llm::embeddings::{Embedder, HuggingFaceEmbeddings};
use crate::llm::semantic_search::VectorStore;
use crate::providers::huggingface::HuggingFacePipeline;
use crate::providers::traits::CompletionProvider;
use anyhow::{Context, Result};
use log::info;
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

pub use agent::{Agent, AgentOutcome, PdfSearchTool, Tool};
pub use chain::RetrievalQa;
pub use manual::answer_query;

/// Loads the configured document. Pages are indexed whole unless a chunk
/// size is configured.
pub async fn load_segments(config: &QaConfig) -> Result<Vec<Document>> {
    let path: PathBuf = config.pdf_path.clone();
    let pages = tokio::task::spawn_blocking(move || document::load(&path))
        .await
        .context("document loader task panicked")??;

    let Some(chunk_size) = config.chunk_size else {
        return Ok(pages);
    };

    let segments = document::split_documents(&pages, chunk_size, config.chunk_overlap);
    info!(
        "Split {} page(s) into {} segment(s)",
        pages.len(),
        segments.len()
    );
    Ok(segments)
}

pub fn build_embeddings(config: &QaConfig, client: Client) -> Arc<dyn Embedder> {
    Arc::new(HuggingFaceEmbeddings::new(
        client,
        &config.inference_url,
        &config.embed_model,
        config.api_token.clone(),
    ))
}

pub fn build_llm(config: &QaConfig, client: Client) -> Arc<dyn CompletionProvider> {
    let llm = HuggingFacePipeline::from_model_id(
        client,
        &config.inference_url,
        &config.llm_model_id,
        config.api_token.clone(),
        config.max_length,
    );
    info!("Generating with {}", llm.get_model_info());
    Arc::new(llm)
}

pub async fn build_vectorstore(
    segments: Vec<Document>,
    embedder: &dyn Embedder,
) -> Result<Arc<VectorStore>> {
    let store = VectorStore::from_documents(segments, embedder).await?;
    Ok(Arc::new(store))
}

/// Joins segment contents for a "stuff" style prompt.
pub(crate) fn join_contents<'a>(docs: impl IntoIterator<Item = &'a Document>, sep: &str) -> String {
    docs.into_iter()
        .map(|d| d.page_content.as_str())
        .collect::<Vec<_>>()
        .join(sep)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_segments_missing_file() {
        let config = QaConfig::from_lookup(|key| {
            (key == "PDF_PATH").then(|| "no/such/file.pdf".to_string())
        });
        let err = load_segments(&config).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<document::LoaderError>(),
            Some(document::LoaderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_load_segments_splits_pages() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{}", "word ".repeat(500)).unwrap();
        let path = file.path().display().to_string();

        let config = QaConfig::from_lookup(move |key| match key {
            "PDF_PATH" => Some(path.clone()),
            "CHUNK_SIZE" => Some("1000".to_string()),
            "CHUNK_OVERLAP" => Some("200".to_string()),
            _ => None,
        });
        let segments = load_segments(&config).await.unwrap();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| s.metadata.page == 0));
    }

    #[tokio::test]
    async fn test_load_segments_keeps_whole_pages_by_default() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{}\u{c}{}", "first ".repeat(400), "second ".repeat(400)).unwrap();
        let path = file.path().display().to_string();

        let config = QaConfig::from_lookup(move |key| (key == "PDF_PATH").then(|| path.clone()));
        let segments = load_segments(&config).await.unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].metadata.page, 1);
        assert!(segments[0].page_content.len() > 2000);
    }
}
