//! One-shot TCP exchanges with the daemon.
//!
//! The daemon answers exactly one command per connection and then closes it,
//! and responses carry no request ID, so every command gets a fresh
//! connection. The [`Transport`] trait abstracts that exchange, allowing
//! scripted mocks for deterministic testing of the command layer.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::config::{ClientConfig, Endpoint};
use crate::error::{ApiError, ApiResult};
use crate::framing::{read_frame, repair};
use crate::messages::CommandRequest;

/// Request/response exchange with the daemon.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one command and return the repaired, still undecoded response.
    async fn send(&self, request: &CommandRequest) -> ApiResult<String>;
}

/// TCP transport: one connection per command.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    endpoint: Endpoint,
    connect_timeout: Duration,
}

impl TcpTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint,
            connect_timeout: config.connect_timeout,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn connect(&self) -> ApiResult<TcpStream> {
        let addr = self.endpoint.to_string();
        debug!(endpoint = %addr, "Connecting to daemon");

        let dial = TcpStream::connect(addr.clone());
        connect_within(addr, self.connect_timeout, dial).await
    }
}

/// Await a dial, giving up after `connect_timeout`.
///
/// Dial failures map to [`ApiError::Connection`]; running out of time maps to
/// [`ApiError::ConnectTimeout`].
async fn connect_within<F, S>(endpoint: String, connect_timeout: Duration, dial: F) -> ApiResult<S>
where
    F: Future<Output = std::io::Result<S>>,
{
    match timeout(connect_timeout, dial).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(source)) => Err(ApiError::Connection { endpoint, source }),
        Err(_) => Err(ApiError::ConnectTimeout {
            endpoint,
            timeout: connect_timeout,
        }),
    }
}

/// Write the request and read back one framed response.
///
/// Takes the stream by value: it is closed when this returns, on success and
/// on every error path alike.
async fn exchange(stream: TcpStream, payload: &[u8]) -> ApiResult<Vec<u8>> {
    let (read_half, mut write_half) = stream.into_split();

    write_half.write_all(payload).await?;
    write_half.flush().await?;

    let mut reader = BufReader::new(read_half);
    read_frame(&mut reader).await
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, request: &CommandRequest) -> ApiResult<String> {
        let payload = request.encode()?;
        let stream = self.connect().await?;

        trace!(tx = %String::from_utf8_lossy(&payload), "Sending request");
        let raw = exchange(stream, &payload).await?;

        let text = String::from_utf8_lossy(&raw);
        trace!(rx = %text.trim_end_matches('\0'), "Received response");
        debug!(command = %request, bytes = raw.len(), "Exchange complete");

        Ok(repair(&text))
    }
}

/// Scripted transport for deterministic testing.
///
/// Replies with queued raw responses in order (repairing them like the TCP
/// transport would) and records every request it was asked to send.
#[cfg(test)]
pub(crate) struct MockTransport {
    replies: std::sync::Mutex<std::collections::VecDeque<String>>,
    requests: std::sync::Mutex<Vec<CommandRequest>>,
}

#[cfg(test)]
impl MockTransport {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: std::sync::Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<CommandRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &CommandRequest) -> ApiResult<String> {
        request.encode()?;
        self.requests.lock().unwrap().push(request.clone());

        match self.replies.lock().unwrap().pop_front() {
            Some(raw) => Ok(repair(&raw)),
            None => Err(ApiError::Framing { received: 0 }),
        }
    }
}
