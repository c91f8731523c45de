//! Router session protocol.
//!
//! The driver layer scripts the router's telnet shell: the login
//! handshake, reading the current TxPower and applying a new one.

mod login;
mod router;
mod tune;

pub use login::{Login, LoginOutcome, LoginState};
pub use router::{RouterSession, cycle_command, parse_tx_power, query_command, set_command};
pub use tune::{Outcome, run, tune};

/// Printed by the router when it wants a user name.
pub const LOGIN_PROMPT: &str = "login:";

/// Printed by the router when it wants the password.
pub const PASSWORD_PROMPT: &str = "Password:";

/// Root shell prompt in the home directory.
pub const SHELL_PROMPT: &str = "~#";

/// Appears in the router's reply to a bad password.
pub const REJECTION: &str = "incorrect";

/// The only account the router's telnet daemon accepts.
pub const LOGIN_USER: &str = "root";
