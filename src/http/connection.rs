use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::Instant;

use crate::config::ServerConfig;
use crate::http::parser::{parse_http_request_with_limit, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::Router;
use crate::http::writer::{Framing, ResponseWriter};

/// Per-connection limits and wire options.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Budget for receiving the whole request head
    pub read_timeout: Option<Duration>,
    /// Budget for sending the whole response
    pub write_timeout: Option<Duration>,
    pub max_head_bytes: usize,
    pub framing: Framing,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

impl ConnectionSettings {
    pub fn from_config(server: &ServerConfig) -> Self {
        Self {
            read_timeout: server.read_timeout(),
            write_timeout: server.write_timeout(),
            max_head_bytes: server.max_head_bytes,
            framing: server.framing,
        }
    }
}

pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    state: ConnectionState,
    router: Arc<Router>,
    settings: ConnectionSettings,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, router: Arc<Router>, settings: ConnectionSettings) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::Reading,
            router,
            settings,
        }
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            tracing::warn!("Malformed request: {:?}", e);
                            let writer = ResponseWriter::new(&Response::bad_request(), self.settings.framing);
                            ConnectionState::Writing(writer)
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.router.handle(req).await;
                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        query = req.query.as_deref(),
                        user_agent = req.header("User-Agent"),
                        status = response.status.as_u16(),
                        "Handled request"
                    );

                    let writer = ResponseWriter::new(&response, self.settings.framing);
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    let write = writer.write_to_stream(&mut self.stream);
                    match self.settings.write_timeout {
                        Some(limit) => tokio::time::timeout(limit, write)
                            .await
                            .map_err(|_| anyhow::anyhow!("write timed out after {:?}", limit))??,
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

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        let deadline = self.settings.read_timeout.map(|limit| Instant::now() + limit);

        loop {
            match parse_http_request_with_limit(&self.buffer, self.settings.max_head_bytes) {
                Ok((request, _consumed)) => return Ok(ReadOutcome::Request(request)),
                Err(ParseError::Incomplete) => {}
                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            let read = self.stream.read_buf(&mut self.buffer);
            let n = match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, read).await {
                    Ok(n) => n?,
                    Err(_) => {
                        tracing::debug!(
                            buffered = self.buffer.len(),
                            "Request head not received within {:?}",
                            self.settings.read_timeout.unwrap_or_default()
                        );
                        return Ok(ReadOutcome::Closed);
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(buffered = self.buffer.len(), "Client closed before end of request head");
                }
                return Ok(ReadOutcome::Closed);
            }
        }
    }
}

enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    /// EOF or timeout before a full head; nothing is sent back
    Closed,
}
