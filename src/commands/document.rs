use crate::config::QaConfig;
use crate::llm::semantic_search::Retriever;
use crate::qa;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::time::Duration;

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Loads, splits and embeds the configured document behind a spinner.
pub async fn index_document(config: &QaConfig, client: Client) -> Result<Retriever> {
    let pb = spinner(&format!("Loading {}", config.pdf_path.display()));

    let segments = match qa::load_segments(config).await {
        Ok(segments) => segments,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message(format!(
        "Embedding {} segment(s) with {}",
        segments.len(),
        config.embed_model
    ));
    let embedder = qa::build_embeddings(config, client);
    let store = match qa::build_vectorstore(segments, embedder.as_ref()).await {
        Ok(store) => store,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_with_message(format!("Indexed {} segment(s)", store.len()));
    Ok(store.as_retriever(embedder, config.top_k))
}
