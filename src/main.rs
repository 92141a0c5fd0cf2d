use std::sync::Arc;

use capsule::config::Config;
use capsule::server;
use capsule::site::Site;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config::load()?;

    // Everything is loaded before the first connection is accepted
    let site = Arc::new(Site::load(&cfg)?);
    let acceptor = server::tls::load_acceptor(&cfg.tls)?;

    tokio::select! {
        res = server::listener::run(&cfg, site, acceptor) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
