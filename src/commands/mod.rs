//! Terminal helpers shared by the question-answering binaries.

mod document;

pub use document::{index_document, spinner};

use colored::Colorize;

pub const DEMO_QUERIES: [&str; 3] = [
    "Summarize the main topic of the PDF.",
    "List the key points mentioned in the document.",
    "What does the document say about the introduction?",
];

/// `RUST_LOG` wins; otherwise everything at `info` and above is shown.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// The questions given on the command line, or the demo set when there are none.
pub fn queries_or_demo(queries: Vec<String>) -> Vec<String> {
    if queries.is_empty() {
        DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        queries
    }
}

pub fn print_banner(title: &str, source: &str) {
    println!("\n{}", title.bright_cyan().bold());
    println!("📄 {}\n", source.bright_yellow());
}

pub fn print_query(query: &str) {
    println!("{} {}", "🔍 Query:".bold(), query.bright_white());
}

pub fn print_answer(answer: &str) {
    println!("{} {}\n", "🧠 Answer:".bold(), answer.trim().truecolor(255, 236, 179));
}

pub fn print_failure(err: &anyhow::Error) {
    eprintln!("{} {:#}\n", "❌ Error:".red().bold(), err);
}
