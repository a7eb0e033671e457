//! Process CSPRNG.
//!
//! [`SecureRng`] is a ChaCha20 generator seeded exactly once from OS entropy when it is
//! constructed. It is passed explicitly to every operation that draws randomness.
//!
//! ```rust,ignore
//! use shroud_crypto::{PrivateKey, SecureRng};
//!
//! let mut rng = SecureRng::from_entropy()?;
//! let key = PrivateKey::generate(&mut rng);
//!
//! // Shared between threads: `&SecureRng` is itself a generator.
//! let shared = std::sync::Arc::new(SecureRng::from_entropy()?);
//! let key = PrivateKey::generate(&mut &*shared);
//! ```

use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::debug;

use shroud_core::error::{Result, ShroudError};

/// ChaCha20 CSPRNG behind a mutex so one instance can serve several threads.
pub struct SecureRng {
    inner: Mutex<ChaCha20Rng>,
}

impl SecureRng {
    /// Seeds a new generator from the operating system.
    ///
    /// # Errors
    /// Returns `EntropyUnavailable` if the OS source fails.
    pub fn from_entropy() -> Result<Self> {
        let rng = ChaCha20Rng::from_rng(OsRng)
            .map_err(|e| ShroudError::EntropyUnavailable(e.to_string()))?;
        debug!("Seeded ChaCha20 generator from OS entropy");
        Ok(Self {
            inner: Mutex::new(rng),
        })
    }

    /// Creates a generator from a fixed seed. Reproducible output, for tests and vectors only.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: Mutex::new(ChaCha20Rng::from_seed(seed)),
        }
    }
}

impl std::fmt::Debug for SecureRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureRng(ChaCha20)")
    }
}

// Exclusive access skips the lock.
impl RngCore for SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.get_mut().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.get_mut().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.get_mut().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.inner.get_mut().try_fill_bytes(dest)
    }
}

impl CryptoRng for SecureRng {}

impl RngCore for &SecureRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.lock().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.lock().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.lock().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
        self.inner.lock().try_fill_bytes(dest)
    }
}

impl CryptoRng for &SecureRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_from_entropy_produces_distinct_streams() {
        let mut a = SecureRng::from_entropy().unwrap();
        let mut b = SecureRng::from_entropy().unwrap();
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = SecureRng::from_seed([7u8; 32]);
        let mut b = SecureRng::from_seed([7u8; 32]);
        let mut buf_a = [0u8; 64];
        let mut buf_b = [0u8; 64];
        a.fill_bytes(&mut buf_a);
        b.fill_bytes(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn test_shared_reference_advances_one_stream() {
        let rng = SecureRng::from_seed([1u8; 32]);
        let first = (&rng).next_u64();
        let second = (&rng).next_u64();
        assert_ne!(first, second);
    }

    #[test]
    fn test_shared_across_threads() {
        let rng = Arc::new(SecureRng::from_entropy().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let rng = Arc::clone(&rng);
                std::thread::spawn(move || (&*rng).next_u64())
            })
            .collect();
        let mut draws: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        draws.sort_unstable();
        draws.dedup();
        assert_eq!(draws.len(), 4);
    }

    #[test]
    fn test_debug_hides_state() {
        let rng = SecureRng::from_seed([0u8; 32]);
        assert_eq!(format!("{:?}", rng), "SecureRng(ChaCha20)");
    }
}
