use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Router;

const READ_CHUNK: usize = 4096;

/// Deadlines applied to a single connection. `None` waits forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Limit on receiving the whole request, head and body together.
    pub read: Option<Duration>,
    /// Limit on writing the whole response.
    pub write: Option<Duration>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: Some(Duration::from_secs(30)),
            write: Some(Duration::from_secs(30)),
        }
    }
}

pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    router: Arc<Router>,
    timeouts: Timeouts,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, router: Arc<Router>, timeouts: Timeouts) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            router,
            timeouts,
            state: ConnectionState::Reading,
        }
    }

    /// Handles exactly one request and closes the connection.
    ///
    /// Any failure is answered with a 500 if no response bytes went out yet;
    /// otherwise the connection is just dropped. The error is still returned
    /// so the caller can log it.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        if let Err(e) = &result {
            self.fail(e).await;
        }

        self.state = ConnectionState::Closed;
        let _ = self.stream.shutdown().await;

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    let limit = self.timeouts.read;
                    let read = self.read_request();
                    let parsed = match limit {
                        Some(limit) => timeout(limit, read).await.context("Read timeout")??,
                        None => read.await?,
                    };

                    match parsed {
                        Ok(request) => {
                            tracing::info!(
                                method = %request.method,
                                path = %request.path,
                                "Request received"
                            );
                            self.state = ConnectionState::Processing(request);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Rejected request");
                            let response = Response::error(e.status());
                            self.state = ConnectionState::Writing(Self::prepare(&response));
                        }
                    }
                }

                ConnectionState::Processing(request) => {
                    let response = self.router.route(request).await?;
                    self.state = ConnectionState::Writing(Self::prepare(&response));
                }

                ConnectionState::Writing(writer) => {
                    let write = writer.write_to_stream(&mut self.stream);
                    match self.timeouts.write {
                        Some(limit) => timeout(limit, write).await.context("Write timeout")??,
                        None => write.await?,
                    }

                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until one full request is buffered.
    ///
    /// The read timeout bounds the whole call, not each read, so a client
    /// trickling bytes cannot hold the connection open. The outer error is a
    /// transport failure; the inner one is a request the client got wrong
    /// and that still deserves a response. Hitting EOF before the request is
    /// complete counts as an invalid request.
    pub async fn read_request(&mut self) -> anyhow::Result<Result<Request, ParseError>> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer, self.router.files()) {
                Ok((request, _consumed)) => return Ok(Ok(request)),
                Err(ParseError::Incomplete) => {}
                Err(e) => return Ok(Err(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                return Ok(Err(ParseError::InvalidRequest));
            }
        }
    }

    fn prepare(response: &Response) -> ResponseWriter {
        tracing::info!(
            status = response.status.as_u16(),
            reason = response.status.reason_phrase(),
            content_type = response.content_type.as_deref().unwrap_or("-"),
            length = response.content_length(),
            "Response ready"
        );
        ResponseWriter::new(response)
    }

    /// Best-effort 500 after an unhandled failure.
    async fn fail(&mut self, error: &anyhow::Error) {
        let headers_sent = matches!(
            &self.state,
            ConnectionState::Writing(writer) if writer.written() > 0
        );

        if headers_sent {
            tracing::warn!(error = %error, "Dropping connection after partial response");
            return;
        }

        let mut writer = Self::prepare(&Response::internal_error());
        let write = writer.write_to_stream(&mut self.stream);
        let outcome = match self.timeouts.write {
            Some(limit) => timeout(limit, write).await.unwrap_or_else(|e| Err(e.into())),
            None => write.await,
        };

        if let Err(e) = outcome {
            tracing::debug!(error = %e, "Could not deliver error response");
        }
    }
}
