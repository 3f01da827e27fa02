//! HTTP protocol implementation.
//!
//! This module implements a one-request-per-connection HTTP/1.1 server core.
//! Every response carries `Connection: close`; there is no keep-alive,
//! pipelining or chunked encoding.
//!
//! # Architecture
//!
//! - **`reader`**: retrying `read_some` / `read_exactly` over any async reader
//! - **`buffer`**: receive buffer that doubles its window up to a limit
//! - **`parser`**: request line, header block and `Content-Length` body
//! - **`request`**: parsed request and header types
//! - **`response`**: response representation with builder pattern
//! - **`writer`**: serializes responses into a bounded header block plus body
//! - **`connection`**: the parse → dispatch → write → release cycle
//! - **`mime`**: media type classification
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Parse one request (error → close, nothing sent)
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Dispatch exactly once
//!        └──────┬───────────┘
//!               │ Response filled
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send, then release response and request
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use porthole::http::connection::Connection;
//! use porthole::http::parser::ParserLimits;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let state = build_state()?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, ParserLimits::default());
//!         if let Err(e) = conn.run(&state).await {
//!             eprintln!("Connection error: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod buffer;
pub mod connection;
pub mod mime;
pub mod parser;
pub mod reader;
pub mod request;
pub mod response;
pub mod writer;
