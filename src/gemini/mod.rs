//! Gemini protocol implementation.
//!
//! A Gemini request is a single URL line terminated by CRLF. The response is
//! a status line `<code> <meta>\r\n`, followed by a body only on success.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Parses the request line from a byte buffer
//! - **`request`**: Parsed request plus the client's certificate identity
//! - **`response`**: Status codes and responses
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each connection serves exactly one request:
//!
//! ```text
//!        ┌─────────────┐
//!        │  AwaitLine  │ ← Read one request line
//!        └──────┬──────┘
//!               │ Line parsed ─────────────┐ Malformed / bad input
//!               ▼                          │
//!        ┌──────────────────┐              │
//!        │    Authorize     │ ← Admin paths need an admin@ certificate
//!        └──────┬───────────┘              │
//!               │ Allowed ──────────┐ Denied (60 / 61)
//!               ▼                   │      │
//!        ┌──────────────────┐       │      │
//!        │    Dispatch      │       │      │
//!        └──────┬───────────┘       │      │
//!               ▼                   ▼      ▼
//!        ┌──────────────────────────────────┐
//!        │             Respond              │ ← Status line, then body
//!        └──────┬───────────────────────────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
