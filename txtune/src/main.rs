//! Command-line entry point.
//!
//! ```bash
//! txtune --addr 192.168.31.1 --password secret --targetTxPower 21 --interface wl0
//! ```
//!
//! Set `RUST_LOG=debug` to see the session traffic.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::error;
use secrecy::SecretString;

use txtune::config::{DEFAULT_ADDR, DEFAULT_INTERFACE, DEFAULT_TARGET_TX_POWER};
use txtune::transport::config::DEFAULT_PORT;
use txtune::{Outcome, Settings, TelnetConfig};

#[derive(Parser, Debug)]
#[command(name = "txtune", version, about = "Check and set router wireless TxPower over telnet")]
struct Cli {
    /// Router address.
    #[arg(long, value_name = "HOST", default_value = DEFAULT_ADDR)]
    addr: String,

    /// Telnet port.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Root password.
    #[arg(long, env = "TXTUNE_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Target TxPower in dBm.
    #[arg(long = "targetTxPower", value_name = "DBM", default_value_t = DEFAULT_TARGET_TX_POWER)]
    target_tx_power: i64,

    /// Wireless interface name, e.g. wl0 for 5GHz or wl1 for 2.4GHz.
    #[arg(long, default_value = DEFAULT_INTERFACE)]
    interface: String,

    /// Give up connecting or waiting for a prompt after this many seconds.
    /// Waits forever when unset.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Seconds to keep the final message on screen before exiting.
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    pause: u64,
}

impl Cli {
    fn telnet_config(&self) -> TelnetConfig {
        TelnetConfig::new(self.addr.clone())
            .with_port(self.port)
            .with_timeout(self.timeout.map(Duration::from_secs))
    }

    fn into_settings(self) -> Settings {
        Settings {
            address: self.addr,
            password: SecretString::from(self.password),
            target_tx_power: self.target_tx_power,
            interface: self.interface,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let pause = Duration::from_secs(cli.pause);
    let config = cli.telnet_config();
    let settings = cli.into_settings();

    let (message, code) = conclude(&txtune::run(&settings, &config).await);
    println!("{}", message);

    tokio::time::sleep(pause).await;
    code
}

/// Console line and exit code for a finished run.
///
/// A rejected password is a normal outcome; every error is fatal.
fn conclude(result: &txtune::Result<Outcome>) -> (String, ExitCode) {
    match result {
        Ok(outcome) => (outcome.to_string(), ExitCode::SUCCESS),
        Err(e) => {
            error!("{}", e);
            (e.user_message(), ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io;
    use txtune::error::{SessionError, TransportError};

    #[test]
    fn test_parses_defaults() {
        let cli = Cli::try_parse_from(["txtune"]).expect("defaults should parse");
        assert_eq!(cli.pause, 3);

        let config = cli.telnet_config();
        assert_eq!(config.socket_addr(), "192.168.31.1:23");
        assert!(config.timeout.is_none());

        let settings = cli.into_settings();
        assert_eq!(settings.target_tx_power, 21);
        assert_eq!(settings.interface, "wl0");
    }

    #[test]
    fn test_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "txtune",
            "--addr",
            "10.0.0.1",
            "--password",
            "secret",
            "--targetTxPower",
            "15",
            "--interface",
            "wl1",
            "--timeout",
            "10",
        ])
        .expect("flags should parse");

        assert_eq!(cli.telnet_config().timeout, Some(Duration::from_secs(10)));
        let settings = cli.into_settings();
        assert_eq!(settings.address, "10.0.0.1");
        assert_eq!(settings.password.expose_secret(), "secret");
        assert_eq!(settings.target_tx_power, 15);
        assert_eq!(settings.interface, "wl1");
    }

    #[test]
    fn test_conclude_outcomes_exit_successfully() {
        let (message, code) = conclude(&Ok(Outcome::WrongPassword));
        assert_eq!(message, "Wrong password");
        assert_eq!(code, ExitCode::SUCCESS);

        let (message, code) = conclude(&Ok(Outcome::NotRequired));
        assert_eq!(message, "TxPower change is not required");
        assert_eq!(code, ExitCode::SUCCESS);

        let (message, code) = conclude(&Ok(Outcome::Changed));
        assert_eq!(message, "TxPower has been changed");
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn test_conclude_errors_exit_with_failure() {
        let refused: txtune::Error = TransportError::ConnectionFailed {
            host: "192.168.31.1".to_string(),
            port: 23,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        }
        .into();
        let (message, code) = conclude(&Err(refused));
        assert_eq!(
            message,
            "Unable to connect to router by addr 192.168.31.1:23"
        );
        assert_eq!(code, ExitCode::FAILURE);

        let unparsed: txtune::Error = SessionError::TxPowerNotFound {
            output: "root@XiaoQiang:~#".to_string(),
        }
        .into();
        let (message, code) = conclude(&Err(unparsed));
        assert_eq!(message, "failed to get current power");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_rejects_non_numeric_target() {
        let err = Cli::try_parse_from(["txtune", "--targetTxPower", "high"])
            .expect_err("non-numeric target should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
