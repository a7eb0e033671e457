//! One-time stealth key derivation and recognition.
//!
//! ## Derivation Flow
//!
//! ```text
//! sender:     D = r·V                 (V = recipient view public key)
//! recipient:  D = v·R                 (v = view private key, R = r·G)
//!                   ↓
//! h = SHA3-256(encode(D) ‖ output_index)
//!                   ↓
//! P = h·G + S                         (S = recipient spend public key)
//! ```
//!
//! Both sides reach the same `D` because `r·(v·G) = v·(r·G)`. Only the holder of `v` can
//! recompute `D` from the published `R`, so only the recipient recognizes `P`.

use subtle::ConstantTimeEq;
use tracing::debug;

use k256::Scalar;

use shroud_core::constants::PUBLIC_KEY_SIZE;
use shroud_core::error::Result;

use crate::curve::{self, Point};
use crate::hash::hash_to_scalar;
use crate::keys::{PrivateKey, PublicKey};

/// Hashes the shared point and output index into the stealth tweak `h`.
fn stealth_tweak(shared: &Point, output_index: u8) -> Result<Scalar> {
    let encoded: [u8; PUBLIC_KEY_SIZE] = curve::encode_point(shared)?;
    Ok(hash_to_scalar(&[&encoded[..], &[output_index][..]]))
}

/// Computes `h·G + S` for a shared point.
fn one_time_point(shared: &Point, spend_pub: &PublicKey, output_index: u8) -> Result<Point> {
    let tweak = stealth_tweak(shared, output_index)?;
    Ok(curve::mul_base(&tweak) + spend_pub.point()?)
}

// ═══════════════════════════════════════════════════════════════════════════════
// SENDER SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the one-time public key `P` for output `output_index` paid to `(spend_pub, view_pub)`.
///
/// # Arguments
///
/// * `ephemeral` - The sender's per-output scalar `r`
/// * `spend_pub` - Recipient spend public key `S`
/// * `view_pub` - Recipient view public key `V`
/// * `output_index` - Position of the output in its transaction
///
/// # Errors
///
/// Fails if either public key does not decode to a curve point.
pub fn derive_one_time_key(
    ephemeral: &PrivateKey,
    spend_pub: &PublicKey,
    view_pub: &PublicKey,
    output_index: u8,
) -> Result<PublicKey> {
    let shared = view_pub.point()? * ephemeral.scalar();
    let p = one_time_point(&shared, spend_pub, output_index)?;
    PublicKey::from_point(&p)
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECIPIENT SIDE
// ═══════════════════════════════════════════════════════════════════════════════

/// Tests whether `candidate` is the one-time key for output `output_index` of a payment whose
/// ephemeral public key is `ephemeral_pub`.
///
/// Comparison is byte-exact on the 33-byte encodings and constant-time.
///
/// # Errors
///
/// Fails if `ephemeral_pub` or `spend_pub` does not decode. A candidate that simply belongs to
/// someone else yields `Ok(false)`.
pub fn is_one_time_key_owned(
    candidate: &PublicKey,
    ephemeral_pub: &PublicKey,
    view_key: &PrivateKey,
    spend_pub: &PublicKey,
    output_index: u8,
) -> Result<bool> {
    let shared = ephemeral_pub.point()? * view_key.scalar();
    let expected = one_time_point(&shared, spend_pub, output_index)?;

    match curve::encode_point(&expected) {
        Ok(encoded) => Ok(encoded[..].ct_eq(candidate.as_bytes()).into()),
        Err(_) => {
            debug!(output_index, "Derived one-time point is at infinity");
            Ok(false)
        }
    }
}
