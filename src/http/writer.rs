use std::io;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Ceiling for the serialized header block.
pub const HEADER_BLOCK_LIMIT: usize = 2048;

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const END_OF_HEADERS: &[u8] = b"Connection: close\r\n\r\n";

/// Serializes the status line and header block of `resp`.
///
/// Status line, `Content-Type` and `Content-Length` come first and are always
/// written. Extra headers follow in order until the next one would push the
/// block past [`HEADER_BLOCK_LIMIT`]; that header and every later one are left
/// out. `Connection: close` and the blank line always end the block.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    let content_type = resp.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
    let required = format!(
        "{} {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        content_type,
        resp.content_length()
    );
    buf.extend_from_slice(required.as_bytes());

    let budget = HEADER_BLOCK_LIMIT.saturating_sub(END_OF_HEADERS.len());
    for (i, header) in resp.extra_headers.iter().enumerate() {
        let line_len = header.name.len() + 2 + header.value.len() + 2;
        if buf.len() + line_len > budget {
            tracing::debug!(
                omitted = resp.extra_headers.len() - i,
                "Header block full, remaining headers omitted"
            );
            break;
        }
        buf.extend_from_slice(header.name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(header.value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(END_OF_HEADERS);
    buf
}

/// Writes all of `buf`, retrying on interrupts.
///
/// A write that accepts zero bytes is a stalled peer and fails with
/// [`io::ErrorKind::WriteZero`].
pub async fn write_all<W>(stream: &mut W, buf: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut written = 0;
    while written < buf.len() {
        match stream.write(&buf[written..]).await {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "connection closed while writing",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

pub struct ResponseWriter {
    head: Vec<u8>,
    body: Body,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            head: serialize_head(response),
            body: response.body.clone(),
        }
    }

    /// Header block followed by the body, as it goes on the wire.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.head.len() + self.body.len());
        out.extend_from_slice(&self.head);
        out.extend_from_slice(self.body.as_bytes());
        Bytes::from(out)
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        write_all(stream, &self.head).await?;
        if !self.body.is_empty() {
            write_all(stream, self.body.as_bytes()).await?;
        }
        stream.flush().await?;
        Ok(())
    }
}
