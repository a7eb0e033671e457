//! Protocol constants for SHROUD.
//!
//! Widths follow from a 256-bit prime-field curve: the group order and the field both fit in
//! 32 bytes, so a compressed point is 33 bytes. `shroud-crypto` checks these against the curve
//! backend in its tests.

// ═══════════════════════════════════════════════════════════════════════════════
// KEY SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Byte length of a private scalar (byte length of the group order).
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Byte length of a field element (the x-coordinate of a point).
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Byte length of a compressed public key: x-coordinate followed by one parity byte.
pub const PUBLIC_KEY_SIZE: usize = FIELD_ELEMENT_SIZE + 1;

/// Parity byte for an even y-coordinate.
pub const PARITY_EVEN: u8 = 0x00;

/// Parity byte for an odd y-coordinate.
pub const PARITY_ODD: u8 = 0x01;

// ═══════════════════════════════════════════════════════════════════════════════
// HASH OUTPUT SIZES
// ═══════════════════════════════════════════════════════════════════════════════

/// Output size of the protocol hash (SHA3-256).
pub const HASH_OUTPUT_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET ADDRESS LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════
// [network(1)][spend_pub(33)][view_pub(33)][checksum(4)]

/// Network/version tag placed in the first address byte.
pub const DEFAULT_NETWORK_BYTE: u8 = 0x55;

/// Number of checksum bytes at the end of an address.
pub const CHECKSUM_SIZE: usize = 4;

/// Offset of the spend public key inside an address.
pub const SPEND_KEY_OFFSET: usize = 1;

/// Offset of the view public key inside an address.
pub const VIEW_KEY_OFFSET: usize = SPEND_KEY_OFFSET + PUBLIC_KEY_SIZE;

/// Offset of the checksum; everything before it is hashed.
pub const CHECKSUM_OFFSET: usize = VIEW_KEY_OFFSET + PUBLIC_KEY_SIZE;

/// Total size of a serialized wallet address.
/// 1 + 33 + 33 + 4 = 71 bytes
pub const WALLET_ADDRESS_SIZE: usize = CHECKSUM_OFFSET + CHECKSUM_SIZE;

/// Base-58 alphabet used for address text (Bitcoin ordering, no `0OIl`).
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

// ═══════════════════════════════════════════════════════════════════════════════
// STEALTH OUTPUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Output indices are hashed as a single byte, so a transaction carries at most this many
/// stealth outputs.
pub const MAX_OUTPUTS_PER_TX: usize = u8::MAX as usize + 1;

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET EXPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Current wallet export format version.
pub const EXPORT_VERSION: u8 = 1;

/// Environment variable overriding the address network byte.
pub const ENV_NETWORK_BYTE: &str = "SHROUD_NETWORK_BYTE";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_layout() {
        assert_eq!(PUBLIC_KEY_SIZE, 33);
        assert_eq!(SPEND_KEY_OFFSET, 1);
        assert_eq!(VIEW_KEY_OFFSET, 34);
        assert_eq!(CHECKSUM_OFFSET, 67);
        assert_eq!(WALLET_ADDRESS_SIZE, 71);
    }

    #[test]
    fn test_base58_alphabet_excludes_ambiguous_chars() {
        assert_eq!(BASE58_ALPHABET.len(), 58);
        for c in ['0', 'O', 'I', 'l'] {
            assert!(!BASE58_ALPHABET.contains(c));
        }
    }

    #[test]
    fn test_checksum_fits_in_hash() {
        assert!(CHECKSUM_SIZE <= HASH_OUTPUT_SIZE);
    }
}
