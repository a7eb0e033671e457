//! End-to-end wallet, address and stealth payment flows.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use shroud_core::{AddressConfig, ShroudError};
use shroud_crypto::{PrivateKey, SecureRng};
use shroud_stealth::{create_stealth_output, create_stealth_outputs, WalletAddress, WalletKeys};

#[test]
fn address_exposes_wallet_public_keys() {
    let mut rng = SecureRng::from_entropy().unwrap();
    let wallet = WalletKeys::create_separate(&mut rng);
    let address = wallet.address();

    assert_eq!(address.spend_pub_key(), *wallet.spend_pub_key());
    assert_eq!(address.view_pub_key(), *wallet.view_pub_key());
}

#[test]
fn published_address_round_trips_through_text() {
    let mut rng = SecureRng::from_entropy().unwrap();
    let wallet = WalletKeys::create_separate(&mut rng);

    let text = wallet.address().to_base58();
    let parsed: WalletAddress = text.parse().unwrap();

    assert_eq!(parsed, wallet.address());
    assert_eq!(parsed.spend_pub_key(), *wallet.spend_pub_key());
}

#[test]
fn sender_pays_and_recipient_recognizes() {
    let mut rng = SecureRng::from_entropy().unwrap();
    let alice = WalletKeys::create_separate(&mut rng);
    let bob = WalletKeys::create_separate(&mut rng);

    let address = WalletAddress::from_base58(&alice.address().to_base58()).unwrap();
    let output = create_stealth_output(&address, 0, &mut rng).unwrap();

    assert!(alice
        .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, 0)
        .unwrap());
    assert!(!bob
        .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, 0)
        .unwrap());
}

#[test]
fn one_ephemeral_key_pays_same_address_twice() {
    let mut rng = ChaCha20Rng::seed_from_u64(21);
    let wallet = WalletKeys::create_separate(&mut rng);
    let address = wallet.address();
    let r = PrivateKey::generate(&mut rng);
    let big_r = r.public_key();

    let p0 = address.one_time_stealth_address(&r, 0).unwrap();
    let p1 = address.one_time_stealth_address(&r, 1).unwrap();
    assert_ne!(p0, p1);

    assert!(wallet.is_my_one_time_stealth_address(&p0, &big_r, 0).unwrap());
    assert!(wallet.is_my_one_time_stealth_address(&p1, &big_r, 1).unwrap());
    assert!(!wallet.is_my_one_time_stealth_address(&p0, &big_r, 1).unwrap());
}

#[test]
fn mixed_transaction_scan() {
    let mut rng = ChaCha20Rng::seed_from_u64(22);
    let alice = WalletKeys::create_separate(&mut rng);
    let bob = WalletKeys::create_separate(&mut rng);
    let carol = WalletKeys::create_separate(&mut rng);

    let recipients = [
        alice.address(),
        bob.address(),
        carol.address(),
        bob.address(),
    ];
    let outputs = create_stealth_outputs(&recipients, &mut rng).unwrap();

    let positions = |w: &WalletKeys| -> Vec<usize> {
        w.scan(&outputs).owned.iter().map(|o| o.position).collect()
    };
    assert_eq!(positions(&alice), vec![0]);
    assert_eq!(positions(&bob), vec![1, 3]);
    assert_eq!(positions(&carol), vec![2]);
}

#[test]
fn wallet_restored_from_export_still_recognizes_outputs() {
    let mut rng = ChaCha20Rng::seed_from_u64(23);
    let wallet = WalletKeys::create_separate(&mut rng);
    let output = create_stealth_output(&wallet.address(), 5, &mut rng).unwrap();

    let json = wallet.export().to_json().unwrap();
    let export = shroud_stealth::WalletExport::from_json(&json).unwrap();
    let restored = WalletKeys::import(&export).unwrap();

    assert!(restored
        .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, 5)
        .unwrap());
}

#[test]
fn foreign_network_address_is_rejected() {
    let mut rng = ChaCha20Rng::seed_from_u64(24);
    let wallet = WalletKeys::create_separate(&mut rng);
    let testnet = AddressConfig::new(0x56);
    let text = wallet.address_with(&testnet).to_base58();

    assert!(matches!(
        WalletAddress::from_base58(&text),
        Err(ShroudError::InvalidNetworkByte {
            expected: 0x55,
            actual: 0x56
        })
    ));
    assert!(WalletAddress::from_base58_with(&testnet, &text).is_ok());
}

#[test]
fn deterministic_wallet_from_seed() {
    let a = WalletKeys::create_separate(&mut ChaCha20Rng::seed_from_u64(25));
    let b = WalletKeys::create_separate(&mut ChaCha20Rng::seed_from_u64(25));
    assert_eq!(a.address(), b.address());
    assert_eq!(a.address().to_base58(), b.address().to_base58());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stealth_correctness(seed in any::<u64>(), index in any::<u8>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let wallet = WalletKeys::create_separate(&mut rng);
        let output = create_stealth_output(&wallet.address(), index, &mut rng).unwrap();

        prop_assert!(wallet
            .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, index)
            .unwrap());
    }

    #[test]
    fn stealth_non_collision(seed in any::<u64>(), index in any::<u8>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let owner = WalletKeys::create_separate(&mut rng);
        let other = WalletKeys::create_separate(&mut rng);
        let output = create_stealth_output(&owner.address(), index, &mut rng).unwrap();

        prop_assert!(!other
            .is_my_one_time_stealth_address(&output.one_time_key, &output.ephemeral_key, index)
            .unwrap());
    }

    #[test]
    fn checksum_detects_any_single_bit_flip(seed in any::<u64>(), bit in 0usize..(67 * 8)) {
        let wallet = WalletKeys::create_separate(&mut ChaCha20Rng::seed_from_u64(seed));
        let mut bytes = *wallet.address().as_bytes();
        bytes[bit / 8] ^= 1 << (bit % 8);

        let result = WalletAddress::from_bytes(&bytes);
        if bit < 8 {
            prop_assert!(
                matches!(result, Err(ShroudError::InvalidNetworkByte { .. })),
                "network byte flip not reported as network error"
            );
        } else {
            prop_assert!(
                matches!(result, Err(ShroudError::ChecksumMismatch { .. })),
                "flip went undetected"
            );
        }
    }
}
