//! # SHROUD Cryptography
//!
//! Elliptic-curve primitives for the SHROUD stealth-address protocol.
//!
//! This crate provides:
//!
//! - **Curve**: the group adapter and the 33-byte `x ‖ parity` point encoding
//! - **Keys**: private scalars, public points, key pairs
//! - **Hash**: SHA3-256, the address checksum, hash-to-scalar
//! - **RNG**: the process CSPRNG
//! - **Derivation**: one-time stealth keys and their recognition
//!
//! ## Security Properties
//!
//! - Private keys are zeroized on drop and redacted in `Debug`
//! - Ownership checks compare encodings in constant time
//!
//! ## Example
//!
//! ```rust,ignore
//! use shroud_crypto::{derive_one_time_key, is_one_time_key_owned, KeyPair, PrivateKey, SecureRng};
//!
//! let mut rng = SecureRng::from_entropy()?;
//! let spend = KeyPair::generate(&mut rng);
//! let view = KeyPair::generate(&mut rng);
//!
//! // Sender picks a fresh r per output and publishes R = r·G next to P
//! let r = PrivateKey::generate(&mut rng);
//! let p = derive_one_time_key(&r, spend.public(), view.public(), 0)?;
//!
//! // Recipient recognizes P with the view key
//! assert!(is_one_time_key_owned(&p, &r.public_key(), view.private(), spend.public(), 0)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod curve;
pub mod derive;
pub mod hash;
pub mod keys;
pub mod rng;

// Re-export main types at crate root
pub use curve::Point;
pub use derive::{derive_one_time_key, is_one_time_key_owned};
pub use hash::{checksum, hash_to_scalar, sha3_256, sha3_256_concat};
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use rng::SecureRng;
