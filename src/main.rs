//! Tik-Tag - hot-seat or networked tic-tac-toe.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use std::time::Duration;
use tiktag::{MatchHost, Settings, transport};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::load_or_default(&cli.config)?;
    if let Some(occupied) = cli.occupied {
        settings = settings.with_occupied_policy(occupied.into());
    }

    match cli.command {
        Command::Local => run_local(settings).await,
        Command::Serve { port, host } => run_server(settings.with_address(host, port)).await,
    }
}

/// Run a hot-seat match on this terminal
async fn run_local(settings: Settings) -> Result<()> {
    // Keep log output off the game screen.
    if let Ok(path) = std::env::var("TIKTAG_LOG") {
        let log_file = std::fs::File::create(path)?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(Arc::new(log_file))
            .with_ansi(false)
            .try_init();
    }

    tokio::task::spawn_blocking(move || tiktag::local::run(&settings)).await?
}

/// Run the TCP match server
#[instrument(skip_all, fields(host = %settings.host(), port = settings.port()))]
async fn run_server(settings: Settings) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tiktag=debug")),
        )
        .init();

    let host = Arc::new(MatchHost::new(&settings));
    let idle = settings.idle_timeout_secs().map(Duration::from_secs);
    let listener = tokio::net::TcpListener::bind((settings.host().as_str(), *settings.port())).await?;
    info!(addr = ?listener.local_addr()?, "Server ready");

    tokio::select! {
        result = transport::serve(listener, host, idle) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down server"),
    }
    Ok(())
}
