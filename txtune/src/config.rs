//! Run settings supplied once at startup.

use secrecy::SecretString;

use crate::transport::TelnetConfig;

/// Default router address.
pub const DEFAULT_ADDR: &str = "192.168.31.1";

/// Default target TxPower in dBm.
pub const DEFAULT_TARGET_TX_POWER: i64 = 21;

/// Default wireless interface (`wl0` is 5 GHz, `wl1` is 2.4 GHz).
pub const DEFAULT_INTERFACE: &str = "wl0";

/// What to connect to and what TxPower to enforce.
///
/// Built once before the session starts and only read afterwards.
#[derive(Debug)]
pub struct Settings {
    /// Router host name or IP address.
    pub address: String,

    /// Root password; empty by default.
    pub password: SecretString,

    /// Desired TxPower in whole dBm.
    pub target_tx_power: i64,

    /// Wireless interface name.
    pub interface: String,
}

impl Settings {
    /// Transport configuration for this router on the default telnet port.
    pub fn telnet_config(&self) -> TelnetConfig {
        TelnetConfig::new(self.address.clone())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDR.to_string(),
            password: SecretString::from(String::new()),
            target_tx_power: DEFAULT_TARGET_TX_POWER,
            interface: DEFAULT_INTERFACE.to_string(),
        }
    }
}
