pub mod loader;
pub mod splitter;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use loader::{documents_from_pages, documents_from_text, load, LoaderError};
pub use splitter::split_documents;

/// Where a segment came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    /// 0-based page index.
    pub page: usize,
    /// 0-based chunk index within the page.
    pub chunk: usize,
}

/// A text segment handed to the embedding model and the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(page_content: impl Into<String>, source: impl Into<String>, page: usize) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                page,
                chunk: 0,
            },
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} p.{}#{}] {}",
            self.metadata.source,
            self.metadata.page + 1,
            self.metadata.chunk,
            self.page_content
        )
    }
}
