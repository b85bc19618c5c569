use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use privilege_shop_api::api::HttpEvent;
use privilege_shop_api::config;
use privilege_shop_api::database::{DatabaseManager, PgStore, Store};
use privilege_shop_api::testing::MemoryStore;
use privilege_shop_api::{handlers, server};

const SCHEMA: &str = include_str!("../sql/schema.sql");

#[derive(Parser)]
#[command(name = "privilege-shop")]
#[command(about = "Privilege shop function - privileges, orders and admin accounts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Serve the function over HTTP (default)")]
    Serve {
        #[arg(long, help = "Port to listen on; overrides API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Run a single invocation event and print the response")]
    Invoke {
        #[arg(help = "Event JSON file; reads stdin when omitted")]
        file: Option<PathBuf>,

        #[arg(long, help = "Use an empty in-memory store instead of DATABASE_URL")]
        memory: bool,
    },

    #[command(about = "Create the privileges, orders and admins tables")]
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::config();
    tracing::info!("Starting privilege shop in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let manager = DatabaseManager::from_env(config).await?;
            let store: Arc<dyn Store> = Arc::new(PgStore::new(manager.clone()));

            let bind_addr = format!("{}:{}", config.api.host, port.unwrap_or(config.api.port));
            let listener = tokio::net::TcpListener::bind(&bind_addr)
                .await
                .with_context(|| format!("failed to bind {}", bind_addr))?;
            tracing::info!("Privilege shop listening on http://{}", bind_addr);

            axum::serve(listener, server::app(store))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            manager.close().await;
        }
        Commands::Invoke { file, memory } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let event: HttpEvent = serde_json::from_str(&raw).context("event is not valid JSON")?;

            let response = if memory {
                handlers::handle(&MemoryStore::new(), event).await
            } else {
                let manager = DatabaseManager::from_env(config).await?;
                let response = handlers::handle(&PgStore::new(manager.clone()), event).await;
                manager.close().await;
                response
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::InitDb => {
            let manager = DatabaseManager::from_env(config).await?;
            manager.apply_script(SCHEMA).await?;
            manager.close().await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
