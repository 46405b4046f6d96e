//! PrintHub Server
//!
//! Entry point for the printhub-server binary with configuration loading,
//! database migrations, and HTTP server startup.

use std::sync::Arc;

use tokio::net::TcpListener;

use printhub_queue::{ArtifactStore, QueueService};
use printhub_server::build_router;
use printhub_server::state::AppState;

mod cli;
mod tracing_setup;

use cli::CliArgs;
use tracing_setup::install_tracing_from_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.help_requested {
        CliArgs::print_help();
        return Ok(());
    }

    // Resolve config path: CLI > environment variable
    let config_path = args
        .config_path
        .or_else(|| std::env::var("PRINTHUB_CONFIG_PATH").ok());

    let config = load_config(&config_path)?;
    install_tracing_from_config(&config.logging);

    // Create and migrate database
    let mut db_cfg = printhub_db::DbConnectionConfig::new(config.database_url());
    db_cfg.max_connections = config.database.max_connections;
    let db_pool = printhub_db::create_pool(&db_cfg).await?;
    run_migrations(&db_pool).await?;

    tracing::info!(
        db_url = %db_cfg.url,
        db_max_connections = %db_cfg.max_connections,
        artifacts_dir = %config.artifacts.directory,
        "database and artifact storage configured"
    );

    let artifacts = ArtifactStore::new(&config.artifacts.directory);
    let service = QueueService::new(db_pool, artifacts);

    // Sweep leftovers from unclean shutdowns before accepting traffic.
    match service.collect_garbage().await {
        Ok(removed) if removed > 0 => {
            tracing::info!(removed, "startup sweep removed orphaned artifacts")
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(%e, "startup artifact sweep failed"),
    }

    let state = Arc::new(AppState::new(service));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Load configuration from file or defaults.
fn load_config(path: &Option<String>) -> anyhow::Result<printhub_config::Config> {
    match path.as_deref() {
        Some(p) => printhub_config::load_config(Some(p)).map_err(|e| {
            eprintln!("failed to load configuration: {e}");
            anyhow::anyhow!(e.to_string())
        }),
        None => printhub_config::load_config::<&std::path::Path>(None).map_err(|e| {
            eprintln!("failed to load configuration: {e}");
            anyhow::anyhow!(e.to_string())
        }),
    }
}

async fn run_migrations(db_pool: &printhub_db::DbPool) -> anyhow::Result<()> {
    match printhub_migrations::sqlite_migrator().run(db_pool).await {
        Ok(_) => {
            tracing::info!("database migrations applied successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(%e, "failed to apply database migrations");
            Err(anyhow::anyhow!("failed to apply database migrations: {e}"))
        }
    }
}
