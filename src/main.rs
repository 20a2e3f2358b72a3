use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use denario::api;
use denario::application::BankService;

/// A small three-tier banking service: accounts, tiered-fee transfers,
/// durable audit trail.
#[derive(Parser)]
#[command(name = "denario", version, about)]
struct Cli {
    /// Path to the SQLite database file (created if missing)
    #[arg(long, default_value = "denario.db")]
    database: String,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Seed the demo users (alice/bob) when the database is empty
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let service = BankService::init(&cli.database).await?;
    if cli.seed_demo {
        service.seed_demo_accounts().await?;
    }

    let app = api::build_app(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
