//! SHROUD wallet keys.
//!
//! A wallet holds two independent private keys:
//! - Spend key: controls the funds (its public half goes into every one-time key)
//! - View key: recognizes incoming payments (can be shared with an auditor)

use chrono::{DateTime, Utc};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroize;

use shroud_core::config::AddressConfig;
use shroud_core::constants::EXPORT_VERSION;
use shroud_core::error::{Result, ShroudError};
use shroud_crypto::{is_one_time_key_owned, PrivateKey, PublicKey};

use crate::address::WalletAddress;
use crate::discovery::{scan_outputs, ScanReport};
use crate::payment::StealthOutput;

/// Spend and view keys of one wallet, with their public keys cached.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletKeys {
    spend_key: PrivateKey,
    view_key: PrivateKey,
    spend_pub_key: PublicKey,
    view_pub_key: PublicKey,
}

impl WalletKeys {
    /// Generates a wallet with two independently drawn private keys.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use shroud_crypto::SecureRng;
    /// use shroud_stealth::WalletKeys;
    ///
    /// let mut rng = SecureRng::from_entropy()?;
    /// let wallet = WalletKeys::create_separate(&mut rng);
    /// println!("Address: {}", wallet.address());
    /// ```
    pub fn create_separate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let spend_key = PrivateKey::generate(rng);
        let view_key = PrivateKey::generate(rng);
        Self::from_keys(spend_key, view_key)
    }

    /// Restores a wallet from existing private keys.
    pub fn from_keys(spend_key: PrivateKey, view_key: PrivateKey) -> Self {
        let spend_pub_key = spend_key.public_key();
        let view_pub_key = view_key.public_key();
        Self {
            spend_key,
            view_key,
            spend_pub_key,
            view_pub_key,
        }
    }

    /// Returns the private spend key.
    pub fn spend_key(&self) -> &PrivateKey {
        &self.spend_key
    }

    /// Returns the private view key.
    pub fn view_key(&self) -> &PrivateKey {
        &self.view_key
    }

    /// Returns the public spend key.
    pub fn spend_pub_key(&self) -> &PublicKey {
        &self.spend_pub_key
    }

    /// Returns the public view key.
    pub fn view_pub_key(&self) -> &PublicKey {
        &self.view_pub_key
    }

    /// Returns the address to publish, under the default network byte.
    pub fn address(&self) -> WalletAddress {
        WalletAddress::from_pub_keys(&self.spend_pub_key, &self.view_pub_key)
    }

    /// Returns the address to publish, under `config`.
    pub fn address_with(&self, config: &AddressConfig) -> WalletAddress {
        WalletAddress::from_pub_keys_with(config, &self.spend_pub_key, &self.view_pub_key)
    }

    /// Tests whether `candidate` is the one-time key of output `output_index` paid to this
    /// wallet, given the ephemeral public key published with it.
    ///
    /// # Errors
    /// Fails if `ephemeral_pub` does not decode to a curve point.
    pub fn is_my_one_time_stealth_address(
        &self,
        candidate: &PublicKey,
        ephemeral_pub: &PublicKey,
        output_index: u8,
    ) -> Result<bool> {
        is_one_time_key_owned(
            candidate,
            ephemeral_pub,
            &self.view_key,
            &self.spend_pub_key,
            output_index,
        )
    }

    /// Scans candidate outputs and returns the ones paid to this wallet.
    pub fn scan(&self, outputs: &[StealthOutput]) -> ScanReport {
        scan_outputs(self, outputs)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPORT / IMPORT
    // ═══════════════════════════════════════════════════════════════════════════

    /// Exports the wallet under the default network byte.
    pub fn export(&self) -> WalletExport {
        self.export_with(&AddressConfig::default())
    }

    /// Exports private keys, public keys and the address under `config`.
    ///
    /// # Security
    /// The export contains both private keys in hex.
    pub fn export_with(&self, config: &AddressConfig) -> WalletExport {
        WalletExport {
            version: EXPORT_VERSION,
            created_at: Utc::now(),
            network_byte: config.network_byte,
            spend_key: self.spend_key.to_hex(),
            view_key: self.view_key.to_hex(),
            spend_pub_key: self.spend_pub_key,
            view_pub_key: self.view_pub_key,
            address: self.address_with(config).to_base58(),
        }
    }

    /// Restores a wallet from an export, re-deriving and checking every public value.
    ///
    /// # Errors
    /// - `VersionMismatch` for an unknown export version
    /// - `HexError` / `InvalidLength` / `InvalidScalar` for malformed private keys
    /// - `KeyMismatch` if the stored public keys or address disagree with the private keys
    pub fn import(export: &WalletExport) -> Result<Self> {
        if export.version != EXPORT_VERSION {
            return Err(ShroudError::VersionMismatch {
                expected: EXPORT_VERSION,
                actual: export.version,
            });
        }

        let wallet = Self::from_keys(
            PrivateKey::from_hex(&export.spend_key)?,
            PrivateKey::from_hex(&export.view_key)?,
        );

        if wallet.spend_pub_key != export.spend_pub_key {
            return Err(ShroudError::KeyMismatch(
                "spend public key does not match spend key".into(),
            ));
        }
        if wallet.view_pub_key != export.view_pub_key {
            return Err(ShroudError::KeyMismatch(
                "view public key does not match view key".into(),
            ));
        }

        let config = AddressConfig::new(export.network_byte);
        if wallet.address_with(&config).to_base58() != export.address.trim() {
            return Err(ShroudError::KeyMismatch(
                "address does not match wallet keys".into(),
            ));
        }

        debug!(network_byte = export.network_byte, "Imported wallet");
        Ok(wallet)
    }
}

impl std::fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletKeys")
            .field("spend_pub_key", &self.spend_pub_key)
            .field("view_pub_key", &self.view_pub_key)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Serializable wallet backup.
#[derive(Clone, Serialize, Deserialize)]
pub struct WalletExport {
    /// Version for forward compatibility
    pub version: u8,
    /// When the export was written
    pub created_at: DateTime<Utc>,
    /// Network byte the address was built with
    pub network_byte: u8,
    /// Private spend key (hex)
    pub spend_key: String,
    /// Private view key (hex)
    pub view_key: String,
    /// Public spend key (hex)
    pub spend_pub_key: PublicKey,
    /// Public view key (hex)
    pub view_pub_key: PublicKey,
    /// Wallet address (base-58)
    pub address: String,
}

impl WalletExport {
    /// Serializes to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses an export from JSON. Does not validate keys; see [`WalletKeys::import`].
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Drop for WalletExport {
    fn drop(&mut self) {
        self.spend_key.zeroize();
        self.view_key.zeroize();
    }
}

impl std::fmt::Debug for WalletExport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletExport")
            .field("version", &self.version)
            .field("created_at", &self.created_at)
            .field("address", &self.address)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}
