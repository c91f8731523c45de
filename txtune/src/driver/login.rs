//! Login handshake as an explicit state machine.
//!
//! ```text
//! Start -> AwaitLoginPrompt -> AwaitPasswordPrompt -> AwaitShellOrRejection
//!                                                      |-> Authenticated
//!                                                      '-> Rejected
//! ```
//!
//! `Start` means the connection is open and nothing has been read yet.

use std::fmt;

use log::{info, warn};
use secrecy::SecretString;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::router::RouterSession;
use super::{LOGIN_PROMPT, LOGIN_USER, PASSWORD_PROMPT, REJECTION, SHELL_PROMPT};
use crate::channel::{MarkerSet, TelnetChannel};
use crate::error::Result;

/// A state of the login handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Start,
    AwaitLoginPrompt,
    AwaitPasswordPrompt,
    AwaitShellOrRejection,
    Authenticated,
    Rejected,
}

impl LoginState {
    /// Whether the handshake has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoginState::Authenticated | LoginState::Rejected)
    }
}

impl fmt::Display for LoginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginState::Start => "start",
            LoginState::AwaitLoginPrompt => "await-login-prompt",
            LoginState::AwaitPasswordPrompt => "await-password-prompt",
            LoginState::AwaitShellOrRejection => "await-shell-or-rejection",
            LoginState::Authenticated => "authenticated",
            LoginState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// How the handshake ended.
pub enum LoginOutcome<S = TcpStream> {
    /// The shell prompt appeared; the session is ready for commands.
    Authenticated(RouterSession<S>),

    /// The router rejected the password. The channel is handed back so the
    /// caller can close it.
    Rejected(TelnetChannel<S>),
}

/// Drives the login handshake for one connection.
pub struct Login<'a> {
    password: &'a SecretString,
    state: LoginState,
}

impl<'a> Login<'a> {
    /// Create a handshake in the `Start` state.
    pub fn new(password: &'a SecretString) -> Self {
        Self {
            password,
            state: LoginState::Start,
        }
    }

    /// Current state.
    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Perform one transition and return the new state.
    ///
    /// Terminal states do not transition.
    pub async fn step<S>(&mut self, channel: &mut TelnetChannel<S>) -> Result<LoginState>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let next = match self.state {
            LoginState::Start => LoginState::AwaitLoginPrompt,
            LoginState::AwaitLoginPrompt => {
                channel.read_until(&MarkerSet::new([LOGIN_PROMPT])).await?;
                channel.send_line(LOGIN_USER).await?;
                LoginState::AwaitPasswordPrompt
            }
            LoginState::AwaitPasswordPrompt => {
                channel.read_until(&MarkerSet::new([PASSWORD_PROMPT])).await?;
                channel.send_secret(self.password).await?;
                LoginState::AwaitShellOrRejection
            }
            LoginState::AwaitShellOrRejection => {
                let output = channel
                    .read_until(&MarkerSet::new([SHELL_PROMPT, REJECTION]))
                    .await?;
                if output.contains(REJECTION) {
                    LoginState::Rejected
                } else {
                    if !output.is_matched() {
                        warn!("No shell prompt from {}, assuming logged in", channel.peer());
                    }
                    LoginState::Authenticated
                }
            }
            terminal => terminal,
        };

        if next != self.state {
            info!("Login on {}: {} -> {}", channel.peer(), self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    /// Run the handshake to completion.
    pub async fn run<S>(mut self, mut channel: TelnetChannel<S>) -> Result<LoginOutcome<S>>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        while !self.step(&mut channel).await?.is_terminal() {}

        Ok(match self.state {
            LoginState::Rejected => LoginOutcome::Rejected(channel),
            _ => LoginOutcome::Authenticated(RouterSession::new(channel)),
        })
    }
}
