use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use log::info;
use pdf_qa::api::{self, AppState};
use pdf_qa::commands;
use pdf_qa::config::RelayConfig;
use pdf_qa::database::Database;
use pdf_qa::providers::relay::Relay;
use reqwest::Client;
use tokio::net::TcpListener;

/// Web chat that relays messages to PQAI or GPT-4 and keeps a history.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, env = "RELAY_HOST")]
    host: Option<String>,

    #[arg(long, env = "RELAY_PORT")]
    port: Option<u16>,

    /// SQLite file holding the chat history
    #[arg(long, env = "CHAT_DB_PATH")]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    commands::init_logging();

    let args = Args::parse();
    let mut config = RelayConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database.into();
    }

    let db = Database::new(&config.database_path)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;
    info!(
        "Chat history at {} ({} exchange(s) logged)",
        config.database_path.display(),
        db.count_chats().await?
    );

    let relay = Relay::from_config(&config, Client::new());
    let app = api::create_api(AppState::new(relay, db));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Relay listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
