pub mod huggingface;

pub use huggingface::HuggingFacePipeline;
