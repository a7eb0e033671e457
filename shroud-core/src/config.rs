//! Address configuration.
//!
//! The network byte is the only address parameter that varies between deployments, so it is
//! carried as configuration instead of being baked into the address codec.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NETWORK_BYTE, ENV_NETWORK_BYTE};
use crate::error::{Result, ShroudError};

/// Parameters for encoding and validating wallet addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressConfig {
    /// Tag expected in the first byte of every address.
    pub network_byte: u8,
}

impl AddressConfig {
    /// Creates a configuration for the given network byte.
    pub fn new(network_byte: u8) -> Self {
        Self { network_byte }
    }

    /// Loads configuration from `SHROUD_NETWORK_BYTE`, falling back to the default tag.
    pub fn from_env() -> Result<Self> {
        Self::from_var(std::env::var(ENV_NETWORK_BYTE).ok().as_deref())
    }

    /// Builds configuration from an optional raw variable value.
    pub fn from_var(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => Ok(Self::new(parse_network_byte(raw)?)),
            None => Ok(Self::default()),
        }
    }
}

impl Default for AddressConfig {
    fn default() -> Self {
        Self {
            network_byte: DEFAULT_NETWORK_BYTE,
        }
    }
}

/// Parses a network byte written in decimal (`85`) or hex (`0x55`).
pub fn parse_network_byte(raw: &str) -> Result<u8> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex_digits) => u8::from_str_radix(hex_digits, 16),
        None => raw.parse::<u8>(),
    };
    parsed.map_err(|e| ShroudError::ConfigError(format!("invalid network byte '{raw}': {e}")))
}
