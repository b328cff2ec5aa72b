mod board;
mod cli;
mod config;
mod http;
mod model;
mod tracker;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::Command;
use config::AppConfig;
use tracker::linear::LinearFactory;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cycleboard=info,tower_http=info"));

    // stderr keeps `cycleboard snapshot` output clean on stdout
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: AppConfig) -> Result<()> {
    let trackers = Arc::new(LinearFactory::new(config.linear.endpoint.clone()));
    let state = http::AppState::from_config(&config, trackers);
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!(
        bind = %config.server.bind,
        shape = ?config.response.shape,
        fallback_key = config.linear.api_key.is_some(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("Server error")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    if command == Command::Help {
        cli::print_help();
        return Ok(());
    }

    init_tracing();
    let mut config = config::load_config()?;

    match command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            serve(config).await
        }
        Command::Snapshot { shape } => cli::print_snapshot(&config, shape).await,
        Command::Help => Ok(()),
    }
}
