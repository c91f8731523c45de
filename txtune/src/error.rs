//! Error types for txtune.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for txtune operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Telnet transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Marker matching errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Router session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl Error {
    /// The line printed on the operator console before the process exits.
    pub fn user_message(&self) -> String {
        match self {
            Error::Transport(TransportError::ConnectionFailed { host, port, .. }) => {
                format!("Unable to connect to router by addr {host}:{port}")
            }
            Error::Transport(TransportError::Timeout(_)) => {
                "Timed out connecting to router".to_string()
            }
            Error::Session(_) => "failed to get current power".to_string(),
            other => other.to_string(),
        }
    }
}

/// Transport layer errors (TCP connection, raw I/O).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connect did not complete within the configured timeout
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// I/O error while writing
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Channel layer errors.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// None of the markers appeared before the configured timeout
    #[error("Marker not found within {0:?}")]
    PatternTimeout(Duration),
}

/// Router session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The query output carried no `NN.NN` value
    #[error("No TxPower value in output: {output:?}")]
    TxPowerNotFound { output: String },

    /// The value matched but did not parse as a number
    #[error("Invalid TxPower value '{value}': {source}")]
    InvalidTxPower {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Result type alias using txtune's Error.
pub type Result<T> = std::result::Result<T, Error>;
