use std::io;

use bytes::Bytes;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::AsyncRead;

use crate::http::buffer::RecvBuffer;
use crate::http::request::{Header, Method, Request};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("header section exceeds {limit} bytes")]
    HeaderSectionTooLarge { limit: usize },
    #[error("peer closed the connection before the header section ended")]
    Incomplete,
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("malformed header line")]
    MalformedHeader,
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

/// Protocol limits applied while reading one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    /// Size of the first receive window.
    pub initial_buffer: usize,
    /// Ceiling for the whole header section, request line included.
    pub header_section: usize,
    /// Ceiling for the stored body.
    pub body: usize,
    /// Headers kept per request; the rest are dropped and counted.
    pub max_headers: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        Self {
            initial_buffer: 256,
            header_section: 4096,
            body: 4096,
            max_headers: 32,
        }
    }
}

/// The three tokens of a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub path: String,
    pub version: String,
}

/// A request together with the number of headers that did not fit.
#[derive(Debug)]
pub struct ParsedRequest {
    pub request: Request,
    pub dropped_headers: usize,
}

/// Reads and parses one request from `reader`, using `buffer` as the
/// receive buffer.
///
/// The header section must fit into `limits.header_section` bytes. The body
/// is read according to `Content-Length`, capped at `limits.body`; a peer
/// that closes early produces a short body, not an error.
pub async fn read_request<R>(
    reader: &mut R,
    buffer: &mut RecvBuffer,
    limits: &ParserLimits,
) -> Result<ParsedRequest, ParseError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let headers_end = accumulate_headers(reader, buffer).await?;
    let body_start = headers_end + 4;

    let (line, line_end) = parse_request_line(&buffer.as_slice()[..body_start])?;
    tracing::debug!(
        method = %line.method,
        path = %line.path,
        version = %line.version,
        "Parsed request line"
    );

    let (headers, dropped_headers) =
        parse_headers(&buffer.as_slice()[line_end..headers_end + 2], limits.max_headers)?;
    if dropped_headers > 0 {
        tracing::debug!(
            kept = headers.len(),
            dropped = dropped_headers,
            "Header limit reached, extra headers dropped"
        );
    }

    let content_length = content_length(&headers);
    let body = if content_length > 0 {
        read_body(reader, buffer, body_start, content_length, limits.body).await?
    } else {
        None
    };

    Ok(ParsedRequest {
        request: Request {
            method: line.method,
            path: line.path,
            version: line.version,
            headers,
            content_length,
            body,
        },
        dropped_headers,
    })
}

/// Reads until the buffer contains CR LF CR LF and returns its offset.
async fn accumulate_headers<R>(reader: &mut R, buffer: &mut RecvBuffer) -> Result<usize, ParseError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut scanned = 0;
    loop {
        if let Some(idx) = find_double_crlf(&buffer.as_slice()[scanned..]) {
            return Ok(scanned + idx);
        }
        // The terminator may straddle two reads.
        scanned = buffer.len().saturating_sub(3);

        if buffer.is_full() && !buffer.grow() {
            return Err(ParseError::HeaderSectionTooLarge {
                limit: buffer.limit(),
            });
        }
        if buffer.fill(reader).await? == 0 {
            return Err(ParseError::Incomplete);
        }
    }
}

/// Reads the rest of the body and detaches it from the receive buffer.
async fn read_body<R>(
    reader: &mut R,
    buffer: &mut RecvBuffer,
    body_start: usize,
    content_length: usize,
    body_limit: usize,
) -> Result<Option<Bytes>, ParseError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let target = content_length.min(body_limit);
    let buffered = buffer.len() - body_start;

    if buffered < target {
        buffer.set_limit(body_start + target);
        buffer.reserve_to(body_start + target);
        buffer.fill_exactly(reader, target - buffered).await?;
    } else {
        buffer.truncate(body_start + target);
    }

    let body = buffer.split_off(body_start).freeze();
    if body.len() < content_length {
        tracing::warn!(
            declared = content_length,
            received = body.len(),
            "Short request body"
        );
    }

    Ok((!body.is_empty()).then_some(body))
}

/// Parses `METHOD SP PATH SP VERSION CRLF` at the start of `buf`.
///
/// Returns the line and the offset just past its CR LF.
pub fn parse_request_line(buf: &[u8]) -> Result<(RequestLine, usize), ParseError> {
    let end = find_crlf(buf).ok_or(ParseError::MalformedRequestLine)?;
    let line = std::str::from_utf8(&buf[..end]).map_err(|_| ParseError::MalformedRequestLine)?;

    let (method, rest) = line.split_once(' ').ok_or(ParseError::MalformedRequestLine)?;
    let (path, version) = rest.split_once(' ').ok_or(ParseError::MalformedRequestLine)?;

    if method.is_empty() || path.is_empty() || version.is_empty() || version.contains(' ') {
        return Err(ParseError::MalformedRequestLine);
    }

    let line = RequestLine {
        method: Method::parse(method),
        path: path.to_string(),
        version: version.to_string(),
    };
    Ok((line, end + 2))
}

/// Parses CRLF-terminated `Name: value` lines until an empty line or the end
/// of `buf`.
///
/// At most `max_headers` are kept; the number of further lines is returned
/// alongside.
pub fn parse_headers(buf: &[u8], max_headers: usize) -> Result<(Vec<Header>, usize), ParseError> {
    let mut headers = Vec::new();
    let mut dropped = 0;
    let mut rest = buf;

    while let Some(end) = find_crlf(rest) {
        if end == 0 {
            break;
        }
        let line = &rest[..end];
        rest = &rest[end + 2..];

        if headers.len() >= max_headers {
            dropped += 1;
            continue;
        }
        headers.push(parse_header_line(line)?);
    }

    Ok((headers, dropped))
}

fn parse_header_line(line: &[u8]) -> Result<Header, ParseError> {
    let colon = line
        .iter()
        .position(|&b| b == b':')
        .ok_or(ParseError::MalformedHeader)?;

    let name = trim_spaces_and_tabs(&line[..colon]);
    if name.is_empty() {
        return Err(ParseError::MalformedHeader);
    }
    let value = trim_spaces_and_tabs(&line[colon + 1..]);

    Ok(Header::new(
        String::from_utf8_lossy(name).into_owned(),
        String::from_utf8_lossy(value).into_owned(),
    ))
}

/// Declared body length; missing or unparsable values count as 0.
pub fn content_length(headers: &[Header]) -> usize {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("Content-Length"))
        .and_then(|h| h.value.parse().ok())
        .unwrap_or(0)
}

fn trim_spaces_and_tabs(mut s: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = s {
        s = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = s {
        s = rest;
    }
    s
}

pub fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

pub fn find_double_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
