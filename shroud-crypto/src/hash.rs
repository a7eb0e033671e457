//! Hashing utilities.
//!
//! One hash function (SHA3-256) serves both protocol uses:
//!
//! ```text
//! checksum = SHA3-256(network ‖ spend_pub ‖ view_pub)[0..4]
//! h        = SHA3-256(encode(D) ‖ output_index)  as a big-endian integer mod n
//! ```
//!
//! Unlike Base58Check there is a single hash round and no domain prefix, so the byte strings
//! above are hashed exactly as written.

use k256::Scalar;
use sha3::{Digest, Sha3_256};

use shroud_core::constants::{CHECKSUM_SIZE, HASH_OUTPUT_SIZE};

// ═══════════════════════════════════════════════════════════════════════════════
// SHA3-256
// ═══════════════════════════════════════════════════════════════════════════════

/// Computes SHA3-256 of a single input.
pub fn sha3_256(input: &[u8]) -> [u8; HASH_OUTPUT_SIZE] {
    Sha3_256::digest(input).into()
}

/// Computes SHA3-256 over the concatenation of several inputs.
///
/// No length prefixes are inserted: `sha3_256_concat(&[a, b]) == sha3_256(a ‖ b)`.
pub fn sha3_256_concat(inputs: &[&[u8]]) -> [u8; HASH_OUTPUT_SIZE] {
    let mut hasher = Sha3_256::new();
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize().into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// DERIVED VALUES
// ═══════════════════════════════════════════════════════════════════════════════

/// Interprets the hash of `inputs` as a big-endian integer reduced into the scalar field.
pub fn hash_to_scalar(inputs: &[&[u8]]) -> Scalar {
    crate::curve::reduce_scalar(&sha3_256_concat(inputs))
}

/// Returns the 4-byte truncated-hash checksum of `payload`.
///
/// Detects transcription errors only; it does not authenticate the payload.
pub fn checksum(payload: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let digest = sha3_256(payload);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}
