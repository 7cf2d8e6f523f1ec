pub mod error;
pub mod huggingface;
pub mod openai;
pub mod pqai;
pub mod relay;
pub mod traits;

pub use error::InferenceError;
pub use traits::{ChatBackend, CompletionProvider};
