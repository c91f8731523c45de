//! Telnet transport implementation over a tokio byte stream.

use log::{debug, trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::config::TelnetConfig;
use crate::error::{Result, TransportError};

/// Interpret As Command.
const IAC: u8 = 255;
const DONT: u8 = 254;
const DO: u8 = 253;
const WONT: u8 = 252;
const WILL: u8 = 251;
/// Subnegotiation begin.
const SB: u8 = 250;
/// Subnegotiation end.
const SE: u8 = 240;

/// Telnet transport wrapping a duplex byte stream.
///
/// Reads hand out one data byte at a time with telnet command sequences
/// removed. Every option the peer proposes is refused, which is enough for
/// common telnet daemons to move on to the login prompt.
///
/// Dropping the transport releases the underlying stream; [`close`](Self::close)
/// additionally shuts down the write half and consumes the transport so it
/// cannot be used afterwards.
pub struct TelnetTransport<S = TcpStream> {
    /// Buffered stream; writes pass straight through to the inner stream.
    stream: BufReader<S>,

    /// Remote address, for logging.
    peer: String,
}

impl TelnetTransport<TcpStream> {
    /// Connect to the telnet server.
    pub async fn connect(config: &TelnetConfig) -> Result<Self> {
        let connect = TcpStream::connect((config.host.as_str(), config.port));

        let connected = match config.timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| TransportError::Timeout(timeout))?,
            None => connect.await,
        };

        let stream = connected.map_err(|source| TransportError::ConnectionFailed {
            host: config.host.clone(),
            port: config.port,
            source,
        })?;

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }

        debug!("Connected to {}", config.socket_addr());
        Ok(Self::new(stream, config.socket_addr()))
    }
}

impl<S> TelnetTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already-connected stream.
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: BufReader::new(stream),
            peer: peer.into(),
        }
    }

    /// Remote address this transport talks to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Read the next data byte.
    ///
    /// Returns `None` once the stream has ended or a read failed; either is
    /// terminal and the caller must stop waiting.
    pub async fn read_byte(&mut self) -> Option<u8> {
        loop {
            let byte = self.read_raw().await?;
            if byte != IAC {
                return Some(byte);
            }

            let command = self.read_raw().await?;
            match command {
                // Escaped 0xFF data byte
                IAC => return Some(IAC),
                DO | DONT | WILL | WONT => {
                    let option = self.read_raw().await?;
                    self.refuse(command, option).await;
                }
                SB => self.skip_subnegotiation().await?,
                other => trace!("Ignoring telnet command {}", other),
            }
        }
    }

    /// Write all bytes to the stream and flush.
    pub async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.stream
            .write_all(data)
            .await
            .map_err(TransportError::Io)?;
        self.stream.flush().await.map_err(TransportError::Io)?;
        Ok(())
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<()> {
        debug!("Closing connection to {}", self.peer);
        self.stream.shutdown().await.map_err(TransportError::Io)?;
        Ok(())
    }

    async fn read_raw(&mut self) -> Option<u8> {
        match self.stream.read_u8().await {
            Ok(byte) => Some(byte),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("Stream from {} ended", self.peer);
                None
            }
            Err(e) => {
                warn!("Read from {} failed: {}", self.peer, e);
                None
            }
        }
    }

    /// Answer an option request with a refusal.
    ///
    /// `DONT`/`WONT` already describe the disabled state and get no reply.
    async fn refuse(&mut self, command: u8, option: u8) {
        let reply = match command {
            DO => WONT,
            WILL => DONT,
            _ => {
                trace!("Peer disabled option {}", option);
                return;
            }
        };

        trace!("Refusing telnet option {} ({} -> {})", option, command, reply);
        if let Err(e) = self.write_all(&[IAC, reply, option]).await {
            warn!("Failed to refuse telnet option {}: {}", option, e);
        }
    }

    /// Discard bytes up to and including `IAC SE`.
    async fn skip_subnegotiation(&mut self) -> Option<()> {
        let mut previous = 0u8;
        loop {
            let byte = self.read_raw().await?;
            if previous == IAC && byte == SE {
                return Some(());
            }
            // IAC IAC inside a subnegotiation is an escaped data byte
            previous = if previous == IAC && byte == IAC { 0 } else { byte };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::io::Builder;

    async fn drain<S>(transport: &mut TelnetTransport<S>) -> Vec<u8>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut out = Vec::new();
        while let Some(byte) = transport.read_byte().await {
            out.push(byte);
        }
        out
    }

    #[tokio::test]
    async fn test_plain_bytes_pass_through() {
        let mock = Builder::new().read(b"login: ").build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, b"login: ");
    }

    #[tokio::test]
    async fn test_option_requests_are_refused() {
        // DO ECHO, WILL SGA
        let mock = Builder::new()
            .read(&[IAC, DO, 1, IAC, WILL, 3])
            .write(&[IAC, WONT, 1])
            .write(&[IAC, DONT, 3])
            .read(b"login:")
            .build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, b"login:");
    }

    #[tokio::test]
    async fn test_disabling_options_gets_no_reply() {
        let mock = Builder::new().read(&[IAC, WONT, 1, IAC, DONT, 3, b'#']).build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, b"#");
    }

    #[tokio::test]
    async fn test_escaped_iac_is_data() {
        let mock = Builder::new().read(&[b'a', IAC, IAC, b'b']).build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, vec![b'a', IAC, b'b']);
    }

    #[tokio::test]
    async fn test_subnegotiation_is_skipped() {
        // SB TERMINAL-TYPE SEND IAC SE
        let mock = Builder::new()
            .read(&[b'x', IAC, SB, 24, 1, IAC, SE, b'y'])
            .build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, b"xy");
    }

    #[tokio::test]
    async fn test_read_error_ends_stream() {
        let mock = Builder::new()
            .read(b"ab")
            .read_error(std::io::Error::other("reset"))
            .build();
        let mut transport = TelnetTransport::new(mock, "mock");
        assert_eq!(drain(&mut transport).await, b"ab");
    }

    #[tokio::test]
    async fn test_write_all_passes_bytes_verbatim() {
        let mock = Builder::new().write(b"root\r\n").build();
        let mut transport = TelnetTransport::new(mock, "mock");
        transport.write_all(b"root\r\n").await.unwrap();
        transport.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = TelnetConfig::new("127.0.0.1").with_port(port);
        let err = TelnetTransport::connect(&config).await.err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::ConnectionFailed { port: p, .. }) if p == port
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_times_out_when_configured() {
        // A listener that never accepts stops answering SYNs once its
        // backlog is full.
        let socket = tokio::net::TcpSocket::new_v4().unwrap();
        socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let listener = socket.listen(1).unwrap();
        let addr = listener.local_addr().unwrap();

        let mut backlog = Vec::new();
        for _ in 0..16 {
            let pending = tokio::time::timeout(Duration::from_secs(1), TcpStream::connect(addr));
            match pending.await {
                Ok(stream) => backlog.push(stream.unwrap()),
                Err(_) => break,
            }
        }

        let config = TelnetConfig::new("127.0.0.1")
            .with_port(addr.port())
            .with_timeout(Some(Duration::from_secs(5)));
        let err = TelnetTransport::connect(&config).await.err().unwrap();
        assert!(matches!(
            err,
            crate::Error::Transport(TransportError::Timeout(d)) if d == Duration::from_secs(5)
        ));
    }
}
