use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::gemini::parser::{ParseError, parse_request_line};
use crate::gemini::request::{ClientIdentity, Request};
use crate::gemini::response::{Response, Status};
use crate::gemini::writer::ResponseWriter;
use crate::site::Site;
use crate::site::auth;

pub struct Connection<S> {
    stream: S,
    buffer: Vec<u8>,
    state: ConnectionState,
    client: Option<ClientIdentity>,
    site: Arc<Site>,
    read_timeout: Duration,
    target: Option<String>,
    status: Option<Status>,
}

pub enum ConnectionState {
    AwaitLine,
    Authorize(Request),
    Dispatch(Request),
    Respond(ResponseWriter),
    Closed,
}

enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    Eof,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `client` is the identity from the certificate the peer presented
    /// during the handshake, if any.
    pub fn new(
        stream: S,
        site: Arc<Site>,
        client: Option<ClientIdentity>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(1024),
            state: ConnectionState::AwaitLine,
            client,
            site,
            read_timeout,
            target: None,
            status: None,
        }
    }

    /// Serves exactly one request. The stream is dropped, and so closed,
    /// when the connection is.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let start = Instant::now();
        let result = self.drive().await;

        tracing::info!(
            request = self.target.as_deref().unwrap_or("-"),
            status = self.status.map(|s| s.code()),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request finished"
        );
        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            self.state = match state {
                ConnectionState::AwaitLine => {
                    match tokio::time::timeout(self.read_timeout, self.read_request()).await {
                        Ok(Ok(ReadOutcome::Request(req))) => {
                            self.target = Some(req.url.to_string());
                            ConnectionState::Authorize(req.with_client(self.client.clone()))
                        }
                        Ok(Ok(ReadOutcome::Malformed(e))) => {
                            tracing::info!(error = %e, "Malformed request");
                            self.respond(Response::bad_request())
                        }
                        Ok(Ok(ReadOutcome::Eof)) => ConnectionState::Closed,
                        Ok(Err(e)) => return Err(e),
                        Err(_) => {
                            tracing::info!("Timed out waiting for request line");
                            ConnectionState::Closed
                        }
                    }
                }

                ConnectionState::Authorize(req) => match auth::authorize(&req) {
                    Ok(()) => ConnectionState::Dispatch(req),
                    Err(status) => {
                        tracing::info!(path = %req.path, code = status.code(), "Access denied");
                        self.respond(Response::status(status))
                    }
                },

                ConnectionState::Dispatch(req) => {
                    let response = self.site.dispatch(&req).await;
                    self.respond(response)
                }

                ConnectionState::Respond(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(error = %e, "Error shutting down stream");
                    }
                    ConnectionState::Closed
                }

                ConnectionState::Closed => break,
            };
        }

        Ok(())
    }

    fn respond(&mut self, response: Response) -> ConnectionState {
        self.status = Some(response.status);
        ConnectionState::Respond(ResponseWriter::new(&response))
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            match parse_request_line(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            let mut temp = [0u8; 1024];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                // Client went away; only a partial line deserves an answer
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Eof);
                }
                return Ok(ReadOutcome::Malformed(ParseError::Incomplete));
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}
