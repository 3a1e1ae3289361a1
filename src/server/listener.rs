use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tracing::{info, Instrument};

use crate::config::Config;
use crate::http::connection::{Connection, ConnectionSettings};
use crate::http::path::PathResolver;
use crate::http::router::Router;
use crate::server::state::ServerState;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Binds the configured address and serves until the task is dropped.
///
/// Only the bind can fail; errors on individual connections are logged.
pub async fn run(cfg: &Config, state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = cfg.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    let router = Arc::new(Router::new(state, PathResolver::from_config(&cfg.site)));
    serve(listener, router, ConnectionSettings::from_config(&cfg.server), cfg.server.max_connections).await
}

/// Accept loop over an already bound listener.
///
/// Each connection runs in its own task. At most `max_connections` run at
/// once; further accepts wait for a slot to free up.
pub async fn serve(
    listener: TcpListener,
    router: Arc<Router>,
    settings: ConnectionSettings,
    max_connections: usize,
) -> anyhow::Result<()> {
    let slots = Arc::new(Semaphore::new(max_connections.max(1)));

    loop {
        let permit = Arc::clone(&slots).acquire_owned().await?;

        let Some((socket, peer)) = accepted_or_back_off(listener.accept().await).await else {
            continue;
        };
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, router, settings);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
                drop(permit);
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}

/// Passes a successful accept through. A failure is logged and followed by
/// a pause of `ACCEPT_BACKOFF` before the caller accepts again.
async fn accepted_or_back_off<T>(result: std::io::Result<T>) -> Option<T> {
    match result {
        Ok(accepted) => Some(accepted),
        Err(e) => {
            tracing::error!("Accept failed: {}", e);
            tokio::time::sleep(ACCEPT_BACKOFF).await;
            None
        }
    }
}
