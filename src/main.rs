use std::sync::Arc;

use anyhow::Context;
use stile::config::Config;
use stile::router::Router;
use stile::server;
use stile::store::{CredentialStore, FileStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let files = FileStore::new(&cfg.root)
        .with_context(|| format!("invalid document root {}", cfg.root.display()))?;
    let credentials = CredentialStore::load(&cfg.credentials)?;
    tracing::info!(
        root = %files.root().display(),
        users = credentials.len(),
        "Stores loaded"
    );

    let router = Arc::new(Router::new(files, credentials));

    tokio::select! {
        res = server::listener::run(&cfg, router) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
