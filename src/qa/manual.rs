use super::join_contents;
use crate::llm::prompt::{PromptTemplate, MANUAL_QA_PROMPT};
use crate::llm::semantic_search::Retriever;
use crate::providers::traits::CompletionProvider;
use anyhow::Result;

const MAX_CONTEXT_DOCS: usize = 4;

/// Retrieves context for `query`, assembles the prompt by hand and runs the model.
pub async fn answer_query(
    query: &str,
    retriever: &Retriever,
    llm: &dyn CompletionProvider,
) -> Result<String> {
    let docs = retriever.invoke(query).await?;
    let context = join_contents(docs.iter().take(MAX_CONTEXT_DOCS), "\n\n");

    let prompt = PromptTemplate::from_template(MANUAL_QA_PROMPT);
    let formatted = prompt.format(&[("context", &context), ("question", query)])?;

    llm.complete(&formatted).await
}
