use anyhow::Context;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::http::buffer::RecvBuffer;
use crate::http::parser::{ParserLimits, read_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// Turns a parsed request into a response.
///
/// Called exactly once per connection with a fresh default [`Response`].
/// An `Err` marks a technical failure; the response slot should still hold
/// something sendable, which the connection writes before reporting the error.
pub trait Dispatch {
    fn dispatch(&self, request: &Request, response: &mut Response) -> anyhow::Result<()>;
}

impl<F> Dispatch for F
where
    F: Fn(&Request, &mut Response) -> anyhow::Result<()>,
{
    fn dispatch(&self, request: &Request, response: &mut Response) -> anyhow::Result<()> {
        self(request, response)
    }
}

pub struct Connection<S> {
    stream: S,
    buffer: RecvBuffer,
    limits: ParserLimits,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Request, Response),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, limits: ParserLimits) -> Self {
        Self {
            stream,
            buffer: RecvBuffer::new(limits.initial_buffer, limits.header_section),
            limits,
            state: ConnectionState::Reading,
        }
    }

    /// Runs one parse → dispatch → write cycle and closes.
    ///
    /// A parse failure returns before dispatching and writes nothing. Request,
    /// response and receive buffer are released on every path.
    pub async fn run<D>(&mut self, dispatcher: &D) -> anyhow::Result<()>
    where
        D: Dispatch + ?Sized,
    {
        let result = self.drive(dispatcher).await;
        self.state = ConnectionState::Closed;
        self.buffer.release();
        result
    }

    async fn drive<D>(&mut self, dispatcher: &D) -> anyhow::Result<()>
    where
        D: Dispatch + ?Sized,
    {
        let mut outcome = Ok(());

        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    let parsed = read_request(&mut self.stream, &mut self.buffer, &self.limits)
                        .await
                        .context("HTTP parse error")?;
                    self.state = ConnectionState::Processing(parsed.request);
                }

                ConnectionState::Processing(request) => {
                    let mut response = Response::default();
                    if let Err(e) = dispatcher.dispatch(&request, &mut response) {
                        tracing::warn!(
                            method = %request.method,
                            path = %request.path,
                            error = %e,
                            "Dispatch failed"
                        );
                        outcome = Err(e);
                    }
                    self.state = ConnectionState::Writing(request, response);
                }

                ConnectionState::Writing(mut request, mut response) => {
                    let writer = ResponseWriter::new(&response);
                    let sent = writer.write_to_stream(&mut self.stream).await;

                    if sent.is_ok() {
                        tracing::info!(
                            method = %request.method,
                            path = %request.path,
                            status = response.status.as_u16(),
                            bytes = response.content_length(),
                            "Request served"
                        );
                    }

                    response.clear();
                    request.clear();
                    sent?;
                }

                ConnectionState::Closed => break,
            }
        }

        outcome
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Gives the transport back, e.g. to inspect it in tests.
    pub fn into_inner(self) -> S {
        self.stream
    }
}
