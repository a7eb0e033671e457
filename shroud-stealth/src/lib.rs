//! # SHROUD Stealth Address Protocol
//!
//! High-level API for wallets, wallet addresses and one-time stealth outputs.
//!
//! This crate provides:
//!
//! - **Wallet Keys**: independent spend and view keys, export/import
//! - **Wallet Address**: the 71-byte checksummed address and its base-58 form
//! - **Payments**: one-time stealth outputs for a recipient address
//! - **Discovery**: recognizing which outputs belong to a wallet
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shroud_crypto::SecureRng;
//! use shroud_stealth::{create_stealth_output, WalletAddress, WalletKeys};
//!
//! let mut rng = SecureRng::from_entropy()?;
//!
//! // Recipient: generate keys and publish the address
//! let wallet = WalletKeys::create_separate(&mut rng);
//! let published = wallet.address().to_base58();
//!
//! // Sender: parse the address and pay output 0 of a transaction
//! let address: WalletAddress = published.parse()?;
//! let output = create_stealth_output(&address, 0, &mut rng)?;
//!
//! // Recipient: scan outputs seen on the ledger
//! let report = wallet.scan(&[output]);
//! assert_eq!(report.owned.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod address;
pub mod discovery;
pub mod payment;
pub mod wallet;

pub use address::WalletAddress;
pub use discovery::{
    scan_output, scan_outputs, scan_outputs_with, OwnedOutput, ScanReport, ScanResult, ScanStats,
};
pub use payment::{create_stealth_output, create_stealth_outputs, StealthOutput};
pub use wallet::{WalletExport, WalletKeys};
