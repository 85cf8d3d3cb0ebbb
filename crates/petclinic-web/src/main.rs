use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use petclinic_core::seed::seed_demo_data;
use petclinic_core::Database;
use petclinic_web::{router, AppState};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Serve the petclinic visit forms over HTTP")]
struct Args {
    #[arg(long, env = "PETCLINIC_HTTP_ADDR", default_value = "127.0.0.1:8080")]
    http_addr: SocketAddr,

    /// SQLite database file, created if missing
    #[arg(long, env = "PETCLINIC_DATABASE", default_value = "petclinic.db")]
    database: PathBuf,

    /// Load demo owners, pets and vets into an empty database
    #[arg(long, env = "PETCLINIC_SEED")]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let db = Database::open(&args.database)
        .with_context(|| format!("failed to open database {}", args.database.display()))?;
    if args.seed && seed_demo_data(&db)? {
        tracing::info!("demo data loaded");
    }

    let app = router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(args.http_addr)
        .await
        .with_context(|| format!("failed to bind {}", args.http_addr))?;
    tracing::info!(
        addr = %args.http_addr,
        database = %args.database.display(),
        "petclinic listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
