//! Capsule - Gemini site server
//!
//! Serves a personal Gemini capsule over TLS, with full-text search and a
//! cached microblog feed.

pub mod config;
pub mod feed;
pub mod gemini;
pub mod search;
pub mod server;
pub mod site;
