//! Authenticated router shell: TxPower query and update.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::SHELL_PROMPT;
use crate::channel::{MarkerSet, ReadResult, TelnetChannel};
use crate::error::{Result, SessionError};

/// Two digits, a dot, two digits: how `iw` prints dBm values.
static TX_POWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{2}[.][0-9]{2}").unwrap());

/// Shell command that prints the interface's TxPower line.
pub fn query_command(interface: &str) -> String {
    format!("iw dev {interface} info | grep txpower")
}

/// Shell command that sets the interface's TxPower in dBm.
pub fn set_command(interface: &str, tx_power: i64) -> String {
    format!("iwconfig {interface} txpower {tx_power}dBm")
}

/// Shell command that bounces the interface so the new power applies.
pub fn cycle_command(interface: &str) -> String {
    format!("ifconfig {interface} down && ifconfig {interface} up")
}

/// Extract the TxPower from command output, truncated to whole dBm.
///
/// The first `NN.NN` in `output` is used, so `19.50` yields `19`.
pub fn parse_tx_power(output: &str) -> std::result::Result<i64, SessionError> {
    let value = TX_POWER_PATTERN
        .find(output)
        .ok_or_else(|| SessionError::TxPowerNotFound {
            output: output.to_string(),
        })?
        .as_str();

    let parsed: f64 = value
        .parse()
        .map_err(|source| SessionError::InvalidTxPower {
            value: value.to_string(),
            source,
        })?;

    Ok(parsed.trunc() as i64)
}

/// A logged-in root shell on the router.
///
/// Only [`Login`](super::Login) creates one, so every method here runs
/// after authentication.
pub struct RouterSession<S = TcpStream> {
    channel: TelnetChannel<S>,
}

impl<S> RouterSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(channel: TelnetChannel<S>) -> Self {
        Self { channel }
    }

    /// Read the current TxPower of `interface`.
    pub async fn current_tx_power(&mut self, interface: &str) -> Result<i64> {
        let output = self.run(&query_command(interface)).await?;
        let tx_power = parse_tx_power(&output.text)?;
        debug!("{} TxPower on {}: {} dBm", interface, self.channel.peer(), tx_power);
        Ok(tx_power)
    }

    /// Set the TxPower of `interface` and cycle the interface.
    ///
    /// Nothing checks that the router accepted the new value.
    pub async fn apply_tx_power(&mut self, interface: &str, tx_power: i64) -> Result<()> {
        info!("Setting {} TxPower to {} dBm", interface, tx_power);
        self.run(&set_command(interface, tx_power)).await?;
        self.run(&cycle_command(interface)).await?;
        Ok(())
    }

    /// Close the session.
    pub async fn close(self) -> Result<()> {
        self.channel.close().await
    }

    /// Send one command and wait for the shell prompt to come back.
    async fn run(&mut self, command: &str) -> Result<ReadResult> {
        self.channel.send_line(command).await?;
        self.channel.read_until(&MarkerSet::new([SHELL_PROMPT])).await
    }
}
