use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use pdf_qa::commands::{self, print_answer, print_banner, print_query};
use pdf_qa::config::QaConfig;
use pdf_qa::qa::{self, Agent, PdfSearchTool, Tool};
use reqwest::Client;
use std::path::PathBuf;

const DEFAULT_INPUT: &str = "Summarize the main topic of the PDF.";

/// Let an agent decide when to search the PDF before answering.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    pdf: Option<PathBuf>,

    #[arg(short, long, default_value = DEFAULT_INPUT)]
    input: String,
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

    print_banner("PDF agent", &config.pdf_path.display().to_string());

    let client = Client::new();
    let retriever = commands::index_document(&config, client.clone()).await?;
    let tools: Vec<Box<dyn Tool>> = vec![Box::new(PdfSearchTool::new(retriever))];
    let agent = Agent::new(qa::build_llm(&config, client), tools);

    print_query(&args.input);
    let outcome = agent.run(&args.input).await?;
    for step in &outcome.steps {
        println!(
            "{} {}({})",
            "🔧 Action:".bold(),
            step.tool.bright_cyan(),
            step.tool_input
        );
        println!("{}", step.observation.dimmed());
    }
    if !outcome.finished {
        println!("{}", "⚠️  Stopped at the iteration limit.".yellow());
    }
    print_answer(&outcome.output);
    Ok(())
}
