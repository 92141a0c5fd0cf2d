//! TLS configuration and certificate loading.

use anyhow::Context;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use rustls::{RootCertStore, ServerConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

use crate::config::TlsConfig;
use crate::gemini::request::ClientIdentity;

/// Builds the acceptor for the listener.
///
/// Clients may present a certificate; when they do it must chain to the
/// client trust anchor. Clients without one are still accepted.
pub fn load_acceptor(cfg: &TlsConfig) -> anyhow::Result<TlsAcceptor> {
    let certs = load_certs(&cfg.cert_path)?;
    let key = load_key(&cfg.key_path)?;

    let anchors = match &cfg.client_ca_path {
        Some(path) => load_certs(path)?,
        None => {
            tracing::warn!(
                "No client_ca_path configured; trusting the server certificate for admin clients"
            );
            certs.clone()
        }
    };

    let mut roots = RootCertStore::empty();
    for anchor in anchors {
        roots.add(anchor).context("unable to add client CA certificate")?;
    }

    let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
        .allow_unauthenticated()
        .build()
        .context("building client certificate verifier")?;

    let config = ServerConfig::builder()
        .with_client_cert_verifier(verifier)
        .with_single_cert(certs, key)
        .context("invalid server certificate or key")?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

fn load_certs(path: &Path) -> anyhow::Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .with_context(|| format!("Certificate file not found: {}", path.display()))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("reading certificates from {}", path.display()))?;

    if certs.is_empty() {
        anyhow::bail!("no certificates in {}", path.display());
    }
    Ok(certs)
}

fn load_key(path: &Path) -> anyhow::Result<PrivateKeyDer<'static>> {
    let file = File::open(path)
        .with_context(|| format!("Private key file not found: {}", path.display()))?;

    rustls_pemfile::private_key(&mut BufReader::new(file))
        .with_context(|| format!("reading private key from {}", path.display()))?
        .with_context(|| format!("no private key in {}", path.display()))
}

/// Identity of the client that completed `stream`'s handshake, if it
/// presented a certificate.
pub fn client_identity<IO>(stream: &tokio_rustls::server::TlsStream<IO>) -> Option<ClientIdentity> {
    let (_, conn) = stream.get_ref();
    let leaf = conn.peer_certificates()?.first()?;
    Some(identity_from_der(leaf))
}

/// Reads the subject common name out of a DER certificate.
///
/// A certificate without a readable common name still counts as presented.
pub fn identity_from_der(der: &[u8]) -> ClientIdentity {
    let common_name = x509_parser::parse_x509_certificate(der)
        .ok()
        .and_then(|(_, cert)| {
            cert.subject()
                .iter_common_name()
                .next()
                .and_then(|cn| cn.as_str().ok())
                .map(str::to_string)
        });

    ClientIdentity { common_name }
}
