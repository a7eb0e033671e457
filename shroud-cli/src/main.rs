//! SHROUD CLI
//!
//! Command-line interface for SHROUD wallet keys, addresses and stealth outputs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shroud_core::{parse_network_byte, AddressConfig, ShroudError};
use shroud_crypto::{PublicKey, SecureRng};
use shroud_stealth::{
    create_stealth_output, create_stealth_outputs, scan_outputs_with, ScanResult, StealthOutput,
    WalletAddress, WalletExport, WalletKeys,
};

/// SHROUD - Stealth address wallet tool
#[derive(Parser)]
#[command(name = "shroud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Address network byte (decimal or 0x-hex)
    #[arg(long, global = true, env = "SHROUD_NETWORK_BYTE", value_parser = network_byte_arg)]
    network_byte: Option<u8>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new wallet keys
    Generate {
        /// Output file for the wallet export (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Print the address of a saved wallet
    Address {
        /// Path to wallet export file
        #[arg(short, long)]
        keys: PathBuf,
    },

    /// Validate an address and show its parts
    Inspect {
        /// Base-58 wallet address
        address: String,
    },

    /// Create stealth outputs paying one or more addresses
    Send {
        /// Recipient addresses (base-58); output i pays address i
        #[arg(required = true)]
        addresses: Vec<String>,
        /// Output index, for a single recipient only
        #[arg(short, long)]
        index: Option<u8>,
    },

    /// Test whether one output belongs to a wallet
    Check {
        /// Path to wallet export file
        #[arg(short, long)]
        keys: PathBuf,
        /// One-time public key P (hex)
        #[arg(long)]
        output_key: String,
        /// Ephemeral public key R (hex)
        #[arg(long)]
        ephemeral: String,
        /// Output index
        #[arg(short, long, default_value = "0")]
        index: u8,
    },

    /// Scan a JSON array of outputs for payments
    Scan {
        /// Path to wallet export file
        #[arg(short, long)]
        keys: PathBuf,
        /// Path to outputs file (as printed by `send`)
        #[arg(short, long)]
        outputs: PathBuf,
    },
}

fn network_byte_arg(raw: &str) -> std::result::Result<u8, String> {
    parse_network_byte(raw).map_err(|e| e.to_string())
}

/// Exit status for address, key-file and argument validation failures
const EXIT_VALIDATION: i32 = 2;
/// Exit status for invalid keys or points
const EXIT_CRYPTO: i32 = 3;

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        std::process::exit(exit_code(&err));
    }
}

/// Maps the first [`ShroudError`] in the error chain to an exit status.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.chain().find_map(|e| e.downcast_ref::<ShroudError>()) {
        Some(e) if e.is_validation_error() => EXIT_VALIDATION,
        Some(e) if e.is_crypto_error() => EXIT_CRYPTO,
        _ => 1,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "shroud=debug,info"
    } else {
        "shroud=info,warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    // Logs go to stderr so JSON on stdout stays pipeable
    if cli.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = cli
        .network_byte
        .map(AddressConfig::new)
        .unwrap_or_default();
    debug!(network_byte = config.network_byte, "Address configuration");

    match cli.command {
        Commands::Generate { output, force } => cmd_generate(&config, output, force),
        Commands::Address { keys } => cmd_address(cli.network_byte, &keys),
        Commands::Inspect { address } => cmd_inspect(&config, &address),
        Commands::Send { addresses, index } => cmd_send(&config, &addresses, index),
        Commands::Check {
            keys,
            output_key,
            ephemeral,
            index,
        } => cmd_check(&keys, &output_key, &ephemeral, index),
        Commands::Scan { keys, outputs } => cmd_scan(&keys, &outputs),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET FILES
// ═══════════════════════════════════════════════════════════════════════════════

fn save_wallet(path: &Path, export: &WalletExport) -> Result<()> {
    std::fs::write(path, export.to_json()?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn load_wallet(path: &Path) -> Result<(WalletKeys, WalletExport)> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open keys file {}", path.display()))?;
    let export = WalletExport::from_json(&json).context("Keys file is not a wallet export")?;
    let wallet = WalletKeys::import(&export).context("Keys file failed validation")?;
    Ok((wallet, export))
}

/// Network byte for a saved wallet's address: `--network-byte` if given, else the one it was
/// exported with.
fn saved_address_config(explicit: Option<u8>, export: &WalletExport) -> AddressConfig {
    AddressConfig::new(explicit.unwrap_or(export.network_byte))
}

fn load_outputs(path: &Path) -> Result<Vec<StealthOutput>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open outputs file {}", path.display()))?;
    serde_json::from_reader(file).context("Outputs file is not a JSON array of outputs")
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMANDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Generate new wallet keys
fn cmd_generate(config: &AddressConfig, output: Option<PathBuf>, force: bool) -> Result<()> {
    println!("{}", "🔑 Generating SHROUD wallet...".cyan().bold());

    let mut rng = SecureRng::from_entropy().context("Failed to seed random generator")?;
    let wallet = WalletKeys::create_separate(&mut rng);
    let export = wallet.export_with(config);

    if let Some(path) = output {
        if path.exists() && !force {
            let overwrite = Confirm::new()
                .with_prompt(format!("{} exists. Overwrite?", path.display()))
                .default(false)
                .interact()?;
            if !overwrite {
                println!("{}", "Aborted.".yellow());
                return Ok(());
            }
        }
        save_wallet(&path, &export)?;
        println!("{} {}", "✅ Wallet saved to:".green(), path.display());
    } else {
        println!("\n{}", "Wallet (JSON):".yellow().bold());
        println!("{}", export.to_json()?);
    }

    println!("\n{} {}", "Address:".green().bold(), export.address);
    println!("\n{}", "⚠️  IMPORTANT: Keep your private keys safe!".red().bold());
    println!("   spend_key and view_key must never be shared.");

    Ok(())
}

/// Print wallet address
fn cmd_address(network_byte: Option<u8>, keys: &Path) -> Result<()> {
    let (wallet, export) = load_wallet(keys)?;
    let config = saved_address_config(network_byte, &export);
    println!("{}", wallet.address_with(&config));
    Ok(())
}

/// Validate and decompose an address
fn cmd_inspect(config: &AddressConfig, address: &str) -> Result<()> {
    let address =
        WalletAddress::from_base58_with(config, address).context("Invalid wallet address")?;

    println!("{}", "✅ Valid address".green().bold());
    println!(
        "   {} {:#04x}",
        "Network byte:".dimmed(),
        address.network_byte()
    );
    print_key("Spend key:", &address.spend_pub_key());
    print_key("View key:", &address.view_pub_key());
    println!(
        "   {} {}",
        "Checksum:".dimmed(),
        hex::encode(address.checksum())
    );

    Ok(())
}

fn print_key(label: &str, key: &PublicKey) {
    match key.validate() {
        Ok(()) => println!("   {} {}", label.dimmed(), key),
        Err(e) => println!("   {} {} {}", label.dimmed(), key, format!("({e})").as_str().red()),
    }
}

/// Create stealth outputs
fn cmd_send(config: &AddressConfig, addresses: &[String], index: Option<u8>) -> Result<()> {
    let recipients = addresses
        .iter()
        .map(|a| {
            WalletAddress::from_base58_with(config, a)
                .with_context(|| format!("Invalid wallet address {a}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rng = SecureRng::from_entropy().context("Failed to seed random generator")?;

    let outputs = match (index, recipients.as_slice()) {
        (Some(i), [single]) => vec![create_stealth_output(single, i, &mut rng)?],
        (Some(_), _) => bail!("--index applies to a single recipient"),
        (None, _) => create_stealth_outputs(&recipients, &mut rng)?,
    };

    eprintln!(
        "{} {} stealth output(s)",
        "💸 Created".cyan().bold(),
        outputs.len()
    );
    eprintln!("   Publish each ephemeral_key next to its one_time_key.");

    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

/// Test ownership of one output
fn cmd_check(keys: &Path, output_key: &str, ephemeral: &str, index: u8) -> Result<()> {
    let (wallet, _) = load_wallet(keys)?;
    let candidate = PublicKey::from_hex(output_key).context("Invalid output key")?;
    let ephemeral = PublicKey::from_hex(ephemeral).context("Invalid ephemeral key")?;

    if wallet.is_my_one_time_stealth_address(&candidate, &ephemeral, index)? {
        println!("{}", "✅ Output belongs to this wallet".green().bold());
    } else {
        println!("{}", "Output does not belong to this wallet.".yellow());
    }
    Ok(())
}

/// Scan outputs for payments
fn cmd_scan(keys: &Path, outputs_path: &Path) -> Result<()> {
    println!("{}", "🔎 Scanning for payments...".cyan().bold());

    let (wallet, _) = load_wallet(keys)?;
    let outputs = load_outputs(outputs_path)?;

    if outputs.is_empty() {
        println!("\n{}", "⚠️  No outputs to scan.".yellow());
        return Ok(());
    }

    let pb = ProgressBar::new(outputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let report = scan_outputs_with(&wallet, &outputs, |position, result| {
        if let ScanResult::Failed(e) = result {
            pb.println(format!("   {} output #{position}: {e}", "skipped".red()));
        }
        pb.inc(1);
    });
    pb.finish_and_clear();

    let stats = &report.stats;
    if report.owned.is_empty() {
        println!("\n{}", "No payments found.".yellow());
    } else {
        println!("\n{} {} payment(s) found:", "✅".green(), report.owned.len());
        for found in &report.owned {
            println!(
                "   #{} {} {}",
                found.position,
                "Key:".green(),
                found.output.one_time_key
            );
        }
    }

    println!(
        "\n   {} scanned, {} errors, {:.0} outputs/sec",
        stats.total_scanned,
        stats.errors,
        stats.rate()
    );
    Ok(())
}
