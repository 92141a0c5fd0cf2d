use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tokio_rustls::TlsAcceptor;
use tracing::{Instrument, info};

use crate::config::{Config, LimitsConfig};
use crate::gemini::connection::Connection;
use crate::server::tls;
use crate::site::Site;

/// Pause after a failed accept so a persistent error (e.g. out of file
/// descriptors) does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: &Config, site: Arc<Site>, acceptor: TlsAcceptor) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    info!("Listening on {}", cfg.listen_addr);

    serve(listener, acceptor, site, cfg.limits.clone()).await
}

/// Accepts connections until the task is dropped.
///
/// Each connection runs in its own task and holds one of
/// `limits.max_connections` permits for its whole lifetime.
pub async fn serve(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    site: Arc<Site>,
    limits: LimitsConfig,
) -> anyhow::Result<()> {
    let permits = Arc::new(Semaphore::new(limits.max_connections));

    loop {
        let permit = permits.clone().acquire_owned().await?;

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Error accepting connection");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let site = site.clone();
        let limits = limits.clone();

        tokio::spawn(
            async move {
                let _permit = permit;
                if let Err(e) = handle(socket, acceptor, site, &limits).await {
                    tracing::warn!(error = %e, "Connection error");
                }
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}

async fn handle(
    socket: TcpStream,
    acceptor: TlsAcceptor,
    site: Arc<Site>,
    limits: &LimitsConfig,
) -> anyhow::Result<()> {
    let stream = tokio::time::timeout(limits.handshake_timeout(), acceptor.accept(socket))
        .await
        .context("TLS handshake timed out")?
        .context("TLS handshake failed")?;

    let client = tls::client_identity(&stream);
    let mut conn = Connection::new(stream, site, client, limits.read_timeout());
    conn.run().await
}
