pub mod openai;

pub use openai::Gpt4Backend;
