//! # txtune
//!
//! Telnet automation that keeps a router's wireless TxPower at a target
//! value.
//!
//! The crate is layered the way the session is:
//!
//! - [`transport`]: TCP stream with telnet command stripping
//! - [`channel`]: read until a literal marker, send CRLF-terminated lines
//! - [`driver`]: login handshake, TxPower query and update
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use txtune::{Settings, run};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), txtune::Error> {
//!     let settings = Settings::default();
//!     let outcome = run(&settings, &settings.telnet_config()).await?;
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod transport;

// Re-export main types for convenience
pub use channel::{MarkerSet, ReadResult, TelnetChannel};
pub use config::Settings;
pub use driver::{Login, LoginOutcome, LoginState, Outcome, RouterSession, run, tune};
pub use error::{Error, Result};
pub use transport::{TelnetConfig, TelnetTransport};
