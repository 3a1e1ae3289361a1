use std::sync::Arc;

use clap::Parser;
use tinyserve::config::{Cli, Config};
use tinyserve::server::{listener, ServerState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli)?;
    let state = Arc::new(ServerState::from_config(&cfg.identity));

    tracing::info!(
        root = %cfg.site.root.display(),
        max_connections = cfg.server.max_connections,
        "Starting {}",
        state.name()
    );

    tokio::select! {
        res = listener::run(&cfg, state) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
