use super::join_contents;
use crate::config::QaConfig;
use crate::llm::prompt::{PromptTemplate, RETRIEVAL_QA_PROMPT};
use crate::llm::semantic_search::Retriever;
use crate::providers::traits::CompletionProvider;
use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::sync::Arc;

/// Retrieval QA of the "stuff" kind: every retrieved segment goes into a
/// single prompt.
pub struct RetrievalQa {
    llm: Arc<dyn CompletionProvider>,
    retriever: Retriever,
    prompt: PromptTemplate,
}

impl RetrievalQa {
    pub fn from_chain_type(llm: Arc<dyn CompletionProvider>, retriever: Retriever) -> Self {
        Self {
            llm,
            retriever,
            prompt: PromptTemplate::from_template(RETRIEVAL_QA_PROMPT),
        }
    }

    /// Load, index and wire up everything the chain needs from `config`.
    pub async fn build(config: &QaConfig, client: Client) -> Result<Self> {
        let segments = super::load_segments(config).await?;
        let embedder = super::build_embeddings(config, client.clone());
        let store = super::build_vectorstore(segments, embedder.as_ref()).await?;
        let retriever = store.as_retriever(embedder, config.top_k);
        let llm = super::build_llm(config, client);
        Ok(Self::from_chain_type(llm, retriever))
    }

    pub async fn run(&self, question: &str) -> Result<String> {
        let docs = self.retriever.invoke(question).await?;
        debug!("Retrieved {} segment(s) for {:?}", docs.len(), question);

        let context = join_contents(&docs, "\n\n");
        let prompt = self
            .prompt
            .format(&[("context", &context), ("question", question)])?;
        self.llm.complete(&prompt).await
    }
}
