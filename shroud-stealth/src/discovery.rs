//! Payment discovery (recipient scan).

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, instrument};

use shroud_core::error::ShroudError;

use crate::payment::StealthOutput;
use crate::wallet::WalletKeys;

/// Result of scanning a single output.
#[derive(Debug)]
pub enum ScanResult {
    /// Output is paid to this wallet
    Owned,
    /// Output belongs to someone else
    NotOwned,
    /// Output is malformed (ephemeral key does not decode)
    Failed(ShroudError),
}

impl ScanResult {
    /// Returns true if the output was recognized.
    pub fn is_owned(&self) -> bool {
        matches!(self, ScanResult::Owned)
    }
}

/// An output recognized during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OwnedOutput {
    /// Position of the output in the scanned list
    pub position: usize,
    /// The output itself
    pub output: StealthOutput,
}

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanStats {
    /// Total outputs scanned
    pub total_scanned: u64,
    /// Outputs recognized as ours
    pub owned: u64,
    /// Malformed outputs
    pub errors: u64,
    /// Duration of the scan in milliseconds
    pub duration_ms: u64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a scan result.
    pub fn record(&mut self, result: &ScanResult) {
        self.total_scanned += 1;
        match result {
            ScanResult::Owned => self.owned += 1,
            ScanResult::Failed(_) => self.errors += 1,
            ScanResult::NotOwned => {}
        }
    }

    /// Returns the scan rate (outputs per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }
}

/// Owned outputs and statistics from one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Recognized outputs, in input order
    pub owned: Vec<OwnedOutput>,
    /// Tallies for the whole scan
    pub stats: ScanStats,
}

/// Tests one output against `wallet`.
pub fn scan_output(wallet: &WalletKeys, output: &StealthOutput) -> ScanResult {
    match wallet.is_my_one_time_stealth_address(
        &output.one_time_key,
        &output.ephemeral_key,
        output.output_index,
    ) {
        Ok(true) => ScanResult::Owned,
        Ok(false) => ScanResult::NotOwned,
        Err(e) => ScanResult::Failed(e),
    }
}

/// Scans `outputs` and collects those paid to `wallet`.
///
/// Malformed outputs are counted in `stats.errors` and skipped.
pub fn scan_outputs(wallet: &WalletKeys, outputs: &[StealthOutput]) -> ScanReport {
    scan_outputs_with(wallet, outputs, |_, _| {})
}

/// Like [`scan_outputs`], calling `on_result` with each output's position and result as the
/// scan advances.
#[instrument(skip_all, fields(outputs = outputs.len()))]
pub fn scan_outputs_with<F>(
    wallet: &WalletKeys,
    outputs: &[StealthOutput],
    mut on_result: F,
) -> ScanReport
where
    F: FnMut(usize, &ScanResult),
{
    let start = Instant::now();
    let mut report = ScanReport::default();

    for (position, output) in outputs.iter().enumerate() {
        let result = scan_output(wallet, output);
        if let ScanResult::Failed(e) = &result {
            debug!(position, error = %e, "Skipping malformed output");
        }
        on_result(position, &result);
        if result.is_owned() {
            report.owned.push(OwnedOutput {
                position,
                output: *output,
            });
        }
        report.stats.record(&result);
    }

    report.stats.duration_ms = start.elapsed().as_millis() as u64;
    info!(
        scanned = report.stats.total_scanned,
        owned = report.stats.owned,
        errors = report.stats.errors,
        "Scan complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{create_stealth_output, create_stealth_outputs};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use shroud_crypto::PublicKey;

    fn test_wallet(seed: u64) -> WalletKeys {
        WalletKeys::create_separate(&mut ChaCha20Rng::seed_from_u64(seed))
    }

    #[test]
    fn test_scan_output_owned() {
        let wallet = test_wallet(1);
        let output =
            create_stealth_output(&wallet.address(), 0, &mut ChaCha20Rng::seed_from_u64(10))
                .unwrap();
        assert!(scan_output(&wallet, &output).is_owned());
    }

    #[test]
    fn test_scan_output_not_owned() {
        let wallet = test_wallet(2);
        let output =
            create_stealth_output(&test_wallet(3).address(), 0, &mut ChaCha20Rng::seed_from_u64(11))
                .unwrap();
        assert!(matches!(scan_output(&wallet, &output), ScanResult::NotOwned));
    }

    #[test]
    fn test_scan_finds_exactly_owned_outputs() {
        let alice = test_wallet(4);
        let bob = test_wallet(5);
        let recipients = [
            bob.address(),
            alice.address(),
            bob.address(),
            alice.address(),
        ];
        let outputs =
            create_stealth_outputs(&recipients, &mut ChaCha20Rng::seed_from_u64(12)).unwrap();

        let report = scan_outputs(&alice, &outputs);
        let positions: Vec<usize> = report.owned.iter().map(|o| o.position).collect();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(report.stats.total_scanned, 4);
        assert_eq!(report.stats.owned, 2);
        assert_eq!(report.stats.errors, 0);
        assert_eq!(report.owned[0].output, outputs[1]);
    }

    #[test]
    fn test_malformed_output_counted_as_error() {
        let wallet = test_wallet(6);
        let mut outputs = vec![
            create_stealth_output(&wallet.address(), 0, &mut ChaCha20Rng::seed_from_u64(13))
                .unwrap(),
        ];
        let mut broken = outputs[0];
        broken.ephemeral_key = PublicKey::from_array([0xFF; 33]);
        outputs.push(broken);

        let report = wallet.scan(&outputs);
        assert_eq!(report.owned.len(), 1);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.stats.total_scanned, 2);
    }

    #[test]
    fn test_wrong_index_not_owned() {
        let wallet = test_wallet(7);
        let mut output =
            create_stealth_output(&wallet.address(), 3, &mut ChaCha20Rng::seed_from_u64(14))
                .unwrap();
        output.output_index = 4;
        assert!(!scan_output(&wallet, &output).is_owned());
    }

    #[test]
    fn test_callback_sees_every_result() {
        let wallet = test_wallet(9);
        let recipients = [wallet.address(), test_wallet(10).address()];
        let mut outputs =
            create_stealth_outputs(&recipients, &mut ChaCha20Rng::seed_from_u64(15)).unwrap();
        let mut broken = outputs[0];
        broken.ephemeral_key = PublicKey::from_array([0xFF; 33]);
        outputs.push(broken);

        let mut seen = Vec::new();
        let report = scan_outputs_with(&wallet, &outputs, |position, result| {
            seen.push((position, result.is_owned(), matches!(result, ScanResult::Failed(_))));
        });

        assert_eq!(seen, vec![(0, true, false), (1, false, false), (2, false, true)]);
        assert_eq!(report.stats.total_scanned, 3);
        assert_eq!(report.stats.owned, 1);
        assert_eq!(report.stats.errors, 1);
        assert_eq!(report.owned.len(), 1);
    }

    #[test]
    fn test_scan_stats_rate() {
        let mut stats = ScanStats::new();
        assert_eq!(stats.rate(), 0.0);

        stats.total_scanned = 500;
        stats.duration_ms = 250;
        assert_eq!(stats.rate(), 2000.0);
    }

    #[test]
    fn test_empty_scan() {
        let report = scan_outputs(&test_wallet(8), &[]);
        assert!(report.owned.is_empty());
        assert_eq!(report.stats.total_scanned, 0);
    }
}
