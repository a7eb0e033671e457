//! Wallet addresses.
//!
//! ## Layout
//!
//! ```text
//! ┌─────────┬───────────────┬───────────────┬──────────┐
//! │ network │   spend_pub   │   view_pub    │ checksum │
//! │   1 B   │     33 B      │     33 B      │   4 B    │
//! └─────────┴───────────────┴───────────────┴──────────┘
//!  checksum = SHA3-256(bytes[0..67])[0..4]
//! ```
//!
//! The text form is base-58 (Bitcoin alphabet) of all 71 bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::debug;

use shroud_core::config::AddressConfig;
use shroud_core::constants::{
    CHECKSUM_OFFSET, PUBLIC_KEY_SIZE, SPEND_KEY_OFFSET, VIEW_KEY_OFFSET, WALLET_ADDRESS_SIZE,
};
use shroud_core::error::{Result, ShroudError};
use shroud_crypto::{checksum, derive_one_time_key, PrivateKey, PublicKey};

/// Address text alphabet; same digits as `BASE58_ALPHABET`.
const ALPHABET: &bs58::Alphabet = bs58::Alphabet::BITCOIN;

/// A published wallet address: network tag, spend and view public keys, checksum.
///
/// Every value of this type has a correct checksum. The embedded public keys are decoded
/// only when used.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress {
    bytes: [u8; WALLET_ADDRESS_SIZE],
}

impl WalletAddress {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONSTRUCTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Builds an address for `(spend_pub, view_pub)` under the default network byte.
    pub fn from_pub_keys(spend_pub: &PublicKey, view_pub: &PublicKey) -> Self {
        Self::from_pub_keys_with(&AddressConfig::default(), spend_pub, view_pub)
    }

    /// Builds an address for `(spend_pub, view_pub)` under `config`.
    pub fn from_pub_keys_with(
        config: &AddressConfig,
        spend_pub: &PublicKey,
        view_pub: &PublicKey,
    ) -> Self {
        let mut bytes = [0u8; WALLET_ADDRESS_SIZE];
        bytes[0] = config.network_byte;
        bytes[SPEND_KEY_OFFSET..VIEW_KEY_OFFSET].copy_from_slice(spend_pub.as_bytes());
        bytes[VIEW_KEY_OFFSET..CHECKSUM_OFFSET].copy_from_slice(view_pub.as_bytes());

        let sum = checksum(&bytes[..CHECKSUM_OFFSET]);
        bytes[CHECKSUM_OFFSET..].copy_from_slice(&sum);

        Self { bytes }
    }

    /// Parses 71 raw bytes under the default network byte.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(&AddressConfig::default(), bytes)
    }

    /// Parses 71 raw bytes under `config`.
    ///
    /// # Errors
    /// Checks run in order and stop at the first failure:
    /// - `InvalidLength` unless `bytes` is 71 bytes long
    /// - `InvalidNetworkByte` if the tag differs from `config.network_byte`
    /// - `ChecksumMismatch` if the trailing 4 bytes do not match
    pub fn from_bytes_with(config: &AddressConfig, bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; WALLET_ADDRESS_SIZE] =
            bytes.try_into().map_err(|_| ShroudError::InvalidLength {
                expected: WALLET_ADDRESS_SIZE,
                actual: bytes.len(),
            })?;

        if bytes[0] != config.network_byte {
            debug!(
                expected = config.network_byte,
                actual = bytes[0],
                "Rejected address with foreign network byte"
            );
            return Err(ShroudError::InvalidNetworkByte {
                expected: config.network_byte,
                actual: bytes[0],
            });
        }

        let address = Self { bytes };
        address.validate_checksum()?;
        Ok(address)
    }

    /// Parses the base-58 text form under the default network byte.
    pub fn from_base58(s: &str) -> Result<Self> {
        Self::from_base58_with(&AddressConfig::default(), s)
    }

    /// Parses the base-58 text form under `config`.
    ///
    /// # Errors
    /// `InvalidBase58` for characters outside the alphabet, then the errors of
    /// [`WalletAddress::from_bytes_with`].
    pub fn from_base58_with(config: &AddressConfig, s: &str) -> Result<Self> {
        let bytes = bs58::decode(s.trim())
            .with_alphabet(ALPHABET)
            .into_vec()
            .map_err(|e| ShroudError::InvalidBase58(e.to_string()))?;
        Self::from_bytes_with(config, &bytes)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION & ENCODING
    // ═══════════════════════════════════════════════════════════════════════════

    /// Recomputes the checksum over the first 67 bytes and compares it to the stored one.
    pub fn validate_checksum(&self) -> Result<()> {
        let expected = checksum(&self.bytes[..CHECKSUM_OFFSET]);
        let actual = &self.bytes[CHECKSUM_OFFSET..];

        if bool::from(expected[..].ct_eq(actual)) {
            Ok(())
        } else {
            debug!("Address checksum mismatch");
            Err(ShroudError::ChecksumMismatch {
                expected: hex::encode(expected),
                actual: hex::encode(actual),
            })
        }
    }

    /// Returns the base-58 text form.
    pub fn to_base58(&self) -> String {
        bs58::encode(&self.bytes).with_alphabet(ALPHABET).into_string()
    }

    /// Returns the raw 71 bytes.
    pub fn as_bytes(&self) -> &[u8; WALLET_ADDRESS_SIZE] {
        &self.bytes
    }

    /// Returns the network tag.
    pub fn network_byte(&self) -> u8 {
        self.bytes[0]
    }

    /// Returns the stored checksum.
    pub fn checksum(&self) -> [u8; 4] {
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.bytes[CHECKSUM_OFFSET..]);
        out
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EMBEDDED KEYS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns the spend public key stored at bytes `[1, 34)`.
    pub fn spend_pub_key(&self) -> PublicKey {
        Self::key_at(&self.bytes[SPEND_KEY_OFFSET..VIEW_KEY_OFFSET])
    }

    /// Returns the view public key stored at bytes `[34, 67)`.
    pub fn view_pub_key(&self) -> PublicKey {
        Self::key_at(&self.bytes[VIEW_KEY_OFFSET..CHECKSUM_OFFSET])
    }

    fn key_at(slice: &[u8]) -> PublicKey {
        let mut arr = [0u8; PUBLIC_KEY_SIZE];
        arr.copy_from_slice(slice);
        PublicKey::from_array(arr)
    }

    /// Derives the one-time public key a sender pays to, for ephemeral scalar `r` and output
    /// position `output_index`.
    ///
    /// # Errors
    /// Fails with `InvalidPoint` if either embedded key does not decode.
    pub fn one_time_stealth_address(&self, r: &PrivateKey, output_index: u8) -> Result<PublicKey> {
        derive_one_time_key(r, &self.spend_pub_key(), &self.view_pub_key(), output_index)
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.to_base58())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

/// Parses under the default network byte; use [`WalletAddress::from_base58_with`] otherwise.
impl FromStr for WalletAddress {
    type Err = ShroudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base58(s)
    }
}

// Serde implementation that uses base-58 text
impl Serialize for WalletAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
