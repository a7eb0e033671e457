//! # SHROUD Core
//!
//! Foundational pieces shared by every SHROUD crate:
//!
//! - **Errors**: a single error enum with classification helpers
//! - **Constants**: key widths and the wallet-address byte layout
//! - **Config**: address parameters (network byte), loadable from the environment
//!
//! ## Example
//!
//! ```rust
//! use shroud_core::{AddressConfig, WALLET_ADDRESS_SIZE};
//!
//! let config = AddressConfig::default();
//! assert_eq!(config.network_byte, 0x55);
//! assert_eq!(WALLET_ADDRESS_SIZE, 71);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used items at crate root
pub use config::{parse_network_byte, AddressConfig};
pub use constants::*;
pub use error::{Result, ShroudError};
