use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use pdf_qa::commands::{self, print_answer, print_banner, print_failure, print_query};
use pdf_qa::config::QaConfig;
use pdf_qa::qa::RetrievalQa;
use reqwest::Client;
use std::path::PathBuf;

/// Answer questions about a PDF with a retrieval QA chain.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document to index
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

    print_banner("Retrieval QA", &config.pdf_path.display().to_string());

    let pb = commands::spinner("Building the retrieval chain");
    let chain = RetrievalQa::build(&config, Client::new()).await;
    pb.finish_and_clear();
    let chain = chain?;

    for query in commands::queries_or_demo(args.queries) {
        print_query(&query);
        match chain.run(&query).await {
            Ok(answer) => print_answer(&answer),
            Err(e) => print_failure(&e),
        }
    }
    Ok(())
}
