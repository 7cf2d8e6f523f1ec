pub mod api;
pub mod commands;
pub mod config;
pub mod database;
pub mod document;
pub mod llm;
pub mod providers;
pub mod qa;

// Re-export commonly used items
pub use config::{QaConfig, RelayConfig};
pub use database::Database;
pub use document::{Document, DocumentMetadata};
pub use llm::semantic_search::{Retriever, VectorStore};
pub use providers::relay::Relay;
