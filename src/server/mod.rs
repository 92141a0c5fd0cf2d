//! Network front: TLS setup and the accept loop.

pub mod listener;
pub mod tls;
