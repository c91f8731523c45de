//! The end-to-end flow: connect, log in, compare, maybe apply.

use std::fmt;

use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use super::login::{Login, LoginOutcome};
use crate::channel::TelnetChannel;
use crate::config::Settings;
use crate::error::Result;
use crate::transport::TelnetConfig;

/// Result of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The TxPower differed from the target and was changed.
    Changed,

    /// The TxPower already matched the target.
    NotRequired,

    /// The router rejected the password; nothing was queried.
    WrongPassword,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Outcome::Changed => "TxPower has been changed",
            Outcome::NotRequired => "TxPower change is not required",
            Outcome::WrongPassword => "Wrong password",
        };
        f.write_str(message)
    }
}

/// Connect to the router described by `config` and tune it.
pub async fn run(settings: &Settings, config: &TelnetConfig) -> Result<Outcome> {
    let channel = TelnetChannel::connect(config).await?;
    tune(channel, settings).await
}

/// Tune the router on an already-open channel.
///
/// The channel is closed before returning `Ok`; on `Err` it is dropped,
/// which releases the connection.
pub async fn tune<S>(channel: TelnetChannel<S>, settings: &Settings) -> Result<Outcome>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = match Login::new(&settings.password).run(channel).await? {
        LoginOutcome::Authenticated(session) => session,
        LoginOutcome::Rejected(channel) => {
            if let Err(e) = channel.close().await {
                warn!("Failed to close session: {}", e);
            }
            return Ok(Outcome::WrongPassword);
        }
    };

    let current = session.current_tx_power(&settings.interface).await?;
    info!(
        "{} TxPower is {} dBm, target {} dBm",
        settings.interface, current, settings.target_tx_power
    );

    let outcome = if current != settings.target_tx_power {
        session
            .apply_tx_power(&settings.interface, settings.target_tx_power)
            .await?;
        Outcome::Changed
    } else {
        Outcome::NotRequired
    };

    if let Err(e) = session.close().await {
        warn!("Failed to close session: {}", e);
    }
    Ok(outcome)
}
