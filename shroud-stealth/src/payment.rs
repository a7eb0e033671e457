//! Stealth payment creation (sender side).

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shroud_core::constants::MAX_OUTPUTS_PER_TX;
use shroud_core::error::{Result, ShroudError};
use shroud_crypto::{PrivateKey, PublicKey};

use crate::address::WalletAddress;

/// One stealth output: the key to pay and the ephemeral key to publish beside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StealthOutput {
    /// One-time public key `P` the funds are locked to
    pub one_time_key: PublicKey,
    /// Ephemeral public key `R = r·G`
    pub ephemeral_key: PublicKey,
    /// Position of the output in its transaction
    pub output_index: u8,
}

/// Pays `address` at position `output_index` with a fresh ephemeral scalar.
///
/// # Errors
/// Fails with `InvalidPoint` if a key embedded in `address` does not decode.
pub fn create_stealth_output<R: RngCore + CryptoRng + ?Sized>(
    address: &WalletAddress,
    output_index: u8,
    rng: &mut R,
) -> Result<StealthOutput> {
    let r = PrivateKey::generate(rng);
    let one_time_key = address.one_time_stealth_address(&r, output_index)?;

    debug!(output_index, "Created stealth output");

    Ok(StealthOutput {
        one_time_key,
        ephemeral_key: r.public_key(),
        output_index,
    })
}

/// Pays each address in `recipients` in one transaction, output `i` going to `recipients[i]`.
///
/// Every output gets its own ephemeral scalar.
///
/// # Errors
/// `TooManyOutputs` for more than 256 recipients, otherwise the first failure of
/// [`create_stealth_output`].
pub fn create_stealth_outputs<R: RngCore + CryptoRng + ?Sized>(
    recipients: &[WalletAddress],
    rng: &mut R,
) -> Result<Vec<StealthOutput>> {
    if recipients.len() > MAX_OUTPUTS_PER_TX {
        return Err(ShroudError::TooManyOutputs {
            max: MAX_OUTPUTS_PER_TX,
            actual: recipients.len(),
        });
    }

    recipients
        .iter()
        .zip(0..=u8::MAX)
        .map(|(address, index)| create_stealth_output(address, index, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::WalletKeys;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_wallet(seed: u64) -> WalletKeys {
        WalletKeys::create_separate(&mut ChaCha20Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_create_stealth_output() {
        let wallet = test_wallet(1);
        let mut rng = ChaCha20Rng::seed_from_u64(100);
        let output = create_stealth_output(&wallet.address(), 4, &mut rng).unwrap();

        assert_eq!(output.output_index, 4);
        assert_ne!(&output.one_time_key, wallet.spend_pub_key());
        assert!(output.one_time_key.validate().is_ok());
        assert!(output.ephemeral_key.validate().is_ok());
        assert!(wallet
            .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, 4)
            .unwrap());
    }

    #[test]
    fn test_outputs_are_unlinkable() {
        // Same recipient, same index: fresh r gives a fresh P and R
        let address = test_wallet(2).address();
        let mut rng = ChaCha20Rng::seed_from_u64(200);
        let a = create_stealth_output(&address, 0, &mut rng).unwrap();
        let b = create_stealth_output(&address, 0, &mut rng).unwrap();

        assert_ne!(a.one_time_key, b.one_time_key);
        assert_ne!(a.ephemeral_key, b.ephemeral_key);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let address = test_wallet(3).address();
        let a = create_stealth_output(&address, 1, &mut ChaCha20Rng::seed_from_u64(7)).unwrap();
        let b = create_stealth_output(&address, 1, &mut ChaCha20Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_create_stealth_outputs_indices() {
        let alice = test_wallet(4);
        let bob = test_wallet(5);
        let recipients = [alice.address(), bob.address(), alice.address()];
        let mut rng = ChaCha20Rng::seed_from_u64(300);

        let outputs = create_stealth_outputs(&recipients, &mut rng).unwrap();
        assert_eq!(outputs.len(), 3);

        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.output_index as usize, i);
        }

        let owned_by = |w: &WalletKeys, o: &StealthOutput| {
            w.is_my_one_time_stealth_address(&o.one_time_key, &o.ephemeral_key, o.output_index)
                .unwrap()
        };
        assert!(owned_by(&alice, &outputs[0]));
        assert!(!owned_by(&bob, &outputs[0]));
        assert!(owned_by(&bob, &outputs[1]));
        assert!(owned_by(&alice, &outputs[2]));
        assert_ne!(outputs[0].ephemeral_key, outputs[2].ephemeral_key);
    }

    #[test]
    fn test_create_stealth_outputs_empty() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(create_stealth_outputs(&[], &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_create_stealth_outputs_limit() {
        let address = test_wallet(6).address();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let full = vec![address; MAX_OUTPUTS_PER_TX];
        let outputs = create_stealth_outputs(&full, &mut rng).unwrap();
        assert_eq!(outputs.last().unwrap().output_index, u8::MAX);

        let over = vec![address; MAX_OUTPUTS_PER_TX + 1];
        assert!(matches!(
            create_stealth_outputs(&over, &mut rng),
            Err(ShroudError::TooManyOutputs { max: 256, actual: 257 })
        ));
    }

    #[test]
    fn test_output_serialization() {
        let address = test_wallet(7).address();
        let output = create_stealth_output(&address, 9, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains(&output.one_time_key.to_hex()));
        let restored: StealthOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, output);
    }
}
