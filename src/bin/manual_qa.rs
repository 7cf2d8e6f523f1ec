use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use pdf_qa::commands::{self, print_answer, print_banner, print_failure, print_query};
use pdf_qa::config::QaConfig;
use pdf_qa::qa;
use reqwest::Client;
use std::path::PathBuf;

/// Answer questions about a PDF, assembling the prompt by hand.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Question to ask; repeat for several. Defaults to the demo questions.
    #[arg(short, long = "query")]
    queries: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    commands::init_logging();

    let args = Args::parse();
    let mut config = QaConfig::from_env();
    if let Some(pdf) = args.pdf {
        config.pdf_path = pdf;
    }

    print_banner("Manual QA", &config.pdf_path.display().to_string());

    let client = Client::new();
    let retriever = commands::index_document(&config, client.clone()).await?;
    let llm = qa::build_llm(&config, client);

    for query in commands::queries_or_demo(args.queries) {
        print_query(&query);
        match qa::answer_query(&query, &retriever, llm.as_ref()).await {
            Ok(answer) => print_answer(&answer),
            Err(e) => print_failure(&e),
        }
    }
    Ok(())
}
