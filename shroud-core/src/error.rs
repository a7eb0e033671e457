//! Error types for SHROUD.
//!
//! Every fallible operation in the workspace returns [`ShroudError`]. Construction of keys and
//! addresses fails synchronously and never leaves a partially valid value behind.

use thiserror::Error;

/// Result type alias using `ShroudError`.
pub type Result<T> = std::result::Result<T, ShroudError>;

/// Main error type for all SHROUD operations.
#[derive(Debug, Error)]
pub enum ShroudError {
    // ═══════════════════════════════════════════════════════════════════════════
    // KEY MATERIAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Wrong byte count for a key, address, or public-key encoding.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Point at infinity, or an encoding that does not decompress onto the curve.
    #[error("Invalid curve point: {0}")]
    InvalidPoint(String),

    /// Scalar outside the open range `(0, n)`.
    #[error("Invalid scalar: value must be non-zero and below the group order")]
    InvalidScalar,

    /// Private and public halves of an imported wallet disagree.
    #[error("Key mismatch: {0}")]
    KeyMismatch(String),

    /// The OS entropy source could not seed the generator.
    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESS ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Address tag byte does not match the configured network.
    #[error("Invalid network byte: expected {expected:#04x}, got {actual:#04x}")]
    InvalidNetworkByte { expected: u8, actual: u8 },

    /// Truncated-hash integrity check failed.
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Text is not valid base-58.
    #[error("Invalid base58: {0}")]
    InvalidBase58(String),

    /// More stealth outputs requested than output indices exist.
    #[error("Too many outputs: at most {max} per transaction, got {actual}")]
    TooManyOutputs { max: usize, actual: usize },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Wallet export written by an unknown format version.
    #[error("Unsupported export version: expected {expected}, got {actual}")]
    VersionMismatch { expected: u8, actual: u8 },

    // ═══════════════════════════════════════════════════════════════════════════
    // ENVIRONMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ShroudError {
    /// Returns true if the error was caused by malformed caller input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ShroudError::InvalidLength { .. }
                | ShroudError::InvalidNetworkByte { .. }
                | ShroudError::ChecksumMismatch { .. }
                | ShroudError::InvalidBase58(_)
                | ShroudError::HexError(_)
                | ShroudError::VersionMismatch { .. }
                | ShroudError::TooManyOutputs { .. }
        )
    }

    /// Returns true if this is a cryptographic error.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            ShroudError::InvalidPoint(_)
                | ShroudError::InvalidScalar
                | ShroudError::KeyMismatch(_)
                | ShroudError::EntropyUnavailable(_)
        )
    }
}
