use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::gemini::response::Response;

fn serialize_response(resp: &Response) -> Vec<u8> {
    let status_line = resp.status_line();

    let body: &[u8] = if resp.status.allows_body() {
        &resp.body
    } else {
        &[]
    };

    let mut buf = Vec::with_capacity(status_line.len() + body.len());
    buf.extend_from_slice(status_line.as_bytes());
    buf.extend_from_slice(body);
    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
