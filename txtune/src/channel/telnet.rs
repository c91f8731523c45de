//! Telnet channel for scripted interactive sessions.

use std::time::Duration;

use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::buffer::MarkerBuffer;
use super::markers::MarkerSet;
use crate::error::{ChannelError, Result};
use crate::transport::{TelnetConfig, TelnetTransport};

/// Line terminator the remote shell expects.
const CRLF: &[u8] = b"\r\n";

/// High-level channel for interactive telnet sessions.
///
/// This wraps the transport and provides marker-based reads and
/// CRLF-framed writes.
pub struct TelnetChannel<S = TcpStream> {
    /// The underlying transport.
    transport: TelnetTransport<S>,

    /// Buffer for the read in progress.
    buffer: MarkerBuffer,

    /// Optional bound on each `read_until`.
    timeout: Option<Duration>,
}

impl TelnetChannel<TcpStream> {
    /// Connect to the host described by `config`.
    pub async fn connect(config: &TelnetConfig) -> Result<Self> {
        let transport = TelnetTransport::connect(config).await?;
        Ok(Self::new(transport, config.timeout))
    }
}

impl<S> TelnetChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a channel over an open transport.
    pub fn new(transport: TelnetTransport<S>, timeout: Option<Duration>) -> Self {
        Self {
            transport,
            buffer: MarkerBuffer::new(),
            timeout,
        }
    }

    /// Remote address of the session.
    pub fn peer(&self) -> &str {
        self.transport.peer()
    }

    /// Read until any marker in `markers` appears in the accumulated output.
    ///
    /// The returned text is everything read by this call, ending with the
    /// marker that matched. If the stream ends (or a read fails) first, the
    /// partial output is returned with [`ReadResult::matched`] set to `None`;
    /// that case is not an error. Without a configured timeout this waits
    /// indefinitely.
    pub async fn read_until(&mut self, markers: &MarkerSet) -> Result<ReadResult> {
        self.buffer.clear();

        let accumulate = Self::accumulate(&mut self.transport, &mut self.buffer, markers);
        let matched = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, accumulate)
                .await
                .map_err(|_| ChannelError::PatternTimeout(timeout))?,
            None => accumulate.await,
        };

        let data = self.buffer.take();
        match matched.and_then(|index| markers.marker(index)) {
            Some(marker) => debug!("Matched {:?} after {} bytes", marker, data.len()),
            None => warn!(
                "Stream from {} ended before any of {} after {} bytes",
                self.transport.peer(),
                markers,
                data.len()
            ),
        }

        Ok(ReadResult {
            text: String::from_utf8_lossy(&data).into_owned(),
            matched,
        })
    }

    /// Send `command` followed by CRLF.
    pub async fn send_line(&mut self, command: &str) -> Result<()> {
        debug!("Sending: {}", command);
        self.write_line(command.as_bytes()).await
    }

    /// Send a secret followed by CRLF without logging it.
    pub async fn send_secret(&mut self, secret: &SecretString) -> Result<()> {
        debug!("Sending: <hidden>");
        self.write_line(secret.expose_secret().as_bytes()).await
    }

    /// Close the session.
    pub async fn close(self) -> Result<()> {
        self.transport.close().await
    }

    async fn accumulate(
        transport: &mut TelnetTransport<S>,
        buffer: &mut MarkerBuffer,
        markers: &MarkerSet,
    ) -> Option<usize> {
        while let Some(byte) = transport.read_byte().await {
            buffer.push(byte);
            if let Some(index) = buffer.search_tail(markers) {
                return Some(index);
            }
        }
        None
    }

    async fn write_line(&mut self, body: &[u8]) -> Result<()> {
        let mut line = Vec::with_capacity(body.len() + CRLF.len());
        line.extend_from_slice(body);
        line.extend_from_slice(CRLF);
        self.transport.write_all(&line).await
    }
}

/// Result of a `read_until` call.
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// Everything read by the call (lossy UTF-8).
    pub text: String,

    /// Index of the marker that ended the read, `None` if the stream ended.
    pub matched: Option<usize>,
}

impl ReadResult {
    /// Whether a marker ended the read.
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }

    /// Check if the output contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.text.contains(pattern)
    }
}
