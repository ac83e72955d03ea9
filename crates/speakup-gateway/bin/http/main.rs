mod cli;

use crate::cli::{LogFormat, StorageBackendArg, CLI};
use clap::Parser;
use speakup_gateway::{App, AppState};
use speakup_storage::{InMemoryRepository, PgArticleRepository};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        allowed_hosts = ?config.allowed_hosts,
        redirect_log = config.redirect_log,
        "starting speakup edge server"
    );

    let edge = config.edge_config();
    let state = match config.storage {
        StorageBackendArg::InMemory => AppState::build(edge, InMemoryRepository::new()).await?,
        StorageBackendArg::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("database url is required when storage backend is postgres")?;
            let repository = PgArticleRepository::connect(database_url).await?;
            if config.run_migrations {
                repository.migrate().await?;
            }
            AppState::build(edge, repository).await?
        }
    };

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        App::router(state.clone()).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if state.hosts().allows_all() {
        info!(hosts = ?state.hosts().hosts(), "hosts served");
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
