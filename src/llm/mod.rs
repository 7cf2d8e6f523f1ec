pub mod embeddings;
pub mod prompt;
pub mod semantic_search;

pub use embeddings::{Embedder, HuggingFaceEmbeddings};
pub use prompt::{PromptError, PromptTemplate};
pub use semantic_search::{IndexError, Retriever, ScoredDocument, VectorStore};
