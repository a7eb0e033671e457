//! Key types for SHROUD.
//!
//! - [`PrivateKey`]: scalar `d` with `0 < d < n` (32 bytes, zeroized on drop)
//! - [`PublicKey`]: point `Q` in the 33-byte compressed form
//! - [`KeyPair`]: `(d, Q)` with `Q = d·G`, only built from the private half

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use k256::Scalar;

use shroud_core::constants::{PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE};
use shroud_core::error::{Result, ShroudError};

use crate::curve::{self, Point, ORDER_BITS};

// ═══════════════════════════════════════════════════════════════════════════════
// PRIVATE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Private scalar, stored big-endian.
///
/// Never expose this key in logs or error messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl PrivateKey {
    /// Draws a uniformly random scalar in `(0, n)`.
    ///
    /// Candidates of `n.bitLength()` bits are rejected and redrawn while zero or `>= n`.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let excess_bits = PRIVATE_KEY_SIZE * 8 - ORDER_BITS as usize;
        let top_mask = 0xFFu8 >> excess_bits;

        let mut candidate = [0u8; PRIVATE_KEY_SIZE];
        loop {
            rng.fill_bytes(&mut candidate);
            candidate[0] &= top_mask;
            if curve::scalar_from_bytes(&candidate).is_some() {
                let key = Self { bytes: candidate };
                candidate.zeroize();
                return key;
            }
        }
    }

    /// Creates a private key from raw bytes.
    ///
    /// # Errors
    /// - `InvalidLength` unless `bytes` is exactly 32 bytes
    /// - `InvalidScalar` if the value is zero or not below the group order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| ShroudError::InvalidLength {
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;

        if curve::scalar_from_bytes(&arr).is_none() {
            return Err(ShroudError::InvalidScalar);
        }
        Ok(Self { bytes: arr })
    }

    /// Creates a private key from a hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = hex::decode(s.trim())?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    /// Returns the raw scalar bytes.
    ///
    /// # Security
    /// Handle the returned bytes carefully - do not log or expose them.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded scalar.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Returns the scalar value.
    pub fn scalar(&self) -> Scalar {
        // Range was checked at construction, so reduction is the identity.
        curve::reduce_scalar(&self.bytes)
    }

    /// Computes `Q = d·G`.
    pub fn public_key(&self) -> PublicKey {
        let q = curve::mul_base(&self.scalar());
        // d is in (0, n), so Q is finite.
        PublicKey {
            bytes: curve::encode_affine(&q.to_affine()),
        }
    }

    /// Pairs this key with its public key.
    pub fn key_pair(&self) -> KeyPair {
        KeyPair::from_private(self.clone())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for PrivateKey {}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivateKey([REDACTED])")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PUBLIC KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Compressed public point: `x (32 bytes) ‖ parity (0x00 even, 0x01 odd)`.
///
/// Equality is byte equality on this encoding. Use [`PublicKey::matches_point`] to compare
/// against a decoded point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl PublicKey {
    /// Encodes a curve point.
    ///
    /// # Errors
    /// Returns `InvalidPoint` for the point at infinity.
    pub fn from_point(point: &Point) -> Result<Self> {
        Ok(Self {
            bytes: curve::encode_point(point)?,
        })
    }

    /// Wraps a 33-byte encoding without decoding it.
    ///
    /// Decoding is deferred to [`PublicKey::point`]; call [`PublicKey::validate`] to check
    /// eagerly.
    ///
    /// # Errors
    /// Returns `InvalidLength` unless `bytes` is 33 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| ShroudError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes: arr })
    }

    /// Creates a public key from a fixed-size array.
    pub fn from_array(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Decompresses the stored encoding into a curve point.
    pub fn point(&self) -> Result<Point> {
        curve::decode_point(&self.bytes)
    }

    /// Checks that the encoding decompresses onto the curve.
    pub fn validate(&self) -> Result<()> {
        self.point().map(|_| ())
    }

    /// Returns true if this key encodes `point`.
    pub fn matches_point(&self, point: &Point) -> bool {
        match curve::encode_point(point) {
            Ok(encoded) => self.ct_eq(&Self { bytes: encoded }),
            Err(_) => false,
        }
    }

    /// Constant-time byte equality.
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }

    /// Returns the raw bytes of the public key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the public key as a fixed-size array reference.
    pub fn as_array(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Returns the hex-encoded public key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Creates a public key from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())?;
        Self::from_bytes(&bytes)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation that uses hex encoding
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PAIR
// ═══════════════════════════════════════════════════════════════════════════════

/// A private key together with its public key.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    private: PrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Derives the public half from `private`.
    pub fn from_private(private: PrivateKey) -> Self {
        let public = private.public_key();
        Self { private, public }
    }

    /// Generates a fresh random key pair.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::from_private(PrivateKey::generate(rng))
    }

    /// Returns the private key.
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    /// Returns the public key.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .field("private", &"[REDACTED]")
            .finish()
    }
}
