use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, Instrument};

use crate::config::Config;
use crate::http::connection::{Connection, Timeouts};
use crate::router::Router;

/// Binds the configured address and serves until the accept loop fails.
pub async fn run(cfg: &Config, router: Arc<Router>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, router, cfg.timeouts()).await
}

/// Accepts connections forever, one task per connection.
///
/// A failing connection never affects the loop or any other connection;
/// failed `accept` calls are logged and skipped.
pub async fn serve(listener: TcpListener, router: Arc<Router>, timeouts: Timeouts) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = Arc::clone(&router);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, router, timeouts);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {:#}", peer, e);
                }
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
