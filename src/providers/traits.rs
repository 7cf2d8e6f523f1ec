use anyhow::Result;
use async_trait::async_trait;

/// Text generation from a single prompt string.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn get_model_info(&self) -> String;
}

/// One upstream the chat relay can forward a message to.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable name used in error replies, e.g. "GPT-4".
    fn label(&self) -> &str;

    async fn reply(&self, message: &str) -> Result<String>;
}
