//! Telnet transport layer over TCP.
//!
//! This module owns the raw byte stream: connection setup, single-byte
//! reads with telnet command stripping, writes and shutdown.

pub mod config;
mod telnet;

pub use config::TelnetConfig;
pub use telnet::TelnetTransport;
