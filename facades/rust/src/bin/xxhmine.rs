//! Command-line front end for the XXH64 inversion miner. A convenience
//! wrapper around [`xxhmine::Miner`], not part of the mathematical contract
//! the library crate implements.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use xxhmine::Miner;
use xxhmine_core::{fastmine_inner, BruteLen, MineOptions, Nonce};

#[derive(Parser)]
#[command(name = "xxhmine", version, about = "Invert XXH64 to solve DUCO-style proof-of-work nonces")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Invert a single (prefix, target) pair.
    Solve {
        /// The known prefix, taken literally unless it starts with '@', in
        /// which case the rest is a path to read the prefix bytes from.
        #[arg(long)]
        prefix: String,

        /// The target XXH64 digest, as hex (with or without a leading 0x).
        #[arg(long)]
        target: String,

        /// The XXH64 seed the target was computed with.
        #[arg(long, default_value_t = xxhmine_core::driver::DEFAULT_SEED)]
        seed: u64,

        /// Return the raw nonce bytes (as hex) instead of requiring an
        /// all-digit numeric nonce.
        #[arg(long)]
        raw: bool,
    },
    /// Run the canonical nine-scenario corpus through the crate's own
    /// forward hasher and inverter, reporting pass/fail per scenario.
    SelfTest,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    xxhmine_core::verify_invariants().context("startup invariant check failed")?;

    match cli.command {
        Command::Solve {
            prefix,
            target,
            seed,
            raw,
        } => solve(&prefix, &target, seed, raw),
        Command::SelfTest => self_test(),
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_prefix(arg: &str) -> Result<Vec<u8>> {
    if let Some(path) = arg.strip_prefix('@') {
        std::fs::read(path).with_context(|| format!("reading prefix from {path}"))
    } else {
        Ok(arg.as_bytes().to_vec())
    }
}

fn parse_target(arg: &str) -> Result<u64> {
    let trimmed = arg.strip_prefix("0x").unwrap_or(arg);
    u64::from_str_radix(trimmed, 16).with_context(|| format!("parsing target hash {arg:?} as hex"))
}

fn solve(prefix_arg: &str, target_arg: &str, seed: u64, raw: bool) -> Result<()> {
    let prefix = read_prefix(prefix_arg)?;
    let target = parse_target(target_arg)?;

    if raw {
        let nonce = fastmine_inner(
            &prefix,
            target,
            MineOptions {
                suffix: &[],
                numeric_only: false,
                seed,
                brute_len: BruteLen::Eight,
            },
        );
        match nonce {
            Some(Nonce::Raw(bytes)) => {
                println!("{}", hex::encode(bytes));
                Ok(())
            }
            _ => bail!("no raw nonce found for the given prefix/target"),
        }
    } else {
        let miner = Miner::with_seed(seed);
        match miner.mine(&prefix, target) {
            Some(Nonce::Numeric(n)) => {
                println!("{n}");
                Ok(())
            }
            Some(Nonce::Raw(bytes)) => {
                println!("{}", hex::encode(bytes));
                Ok(())
            }
            None => bail!("no nonce found for the given prefix/target"),
        }
    }
}

/// The nine-scenario corpus: a 40-byte prefix and every digit-suffix length
/// from 9 down to 1, each expected to invert exactly.
const CORPUS_PREFIX: &[u8] = b"PREFIXESPREFIXESPREFIXESPREFIXESPREFIXES";
const CORPUS_SUFFIXES: &[&str] = &[
    "123456789",
    "12345678",
    "1234567",
    "123456",
    "12345",
    "1234",
    "123",
    "12",
    "1",
];

fn self_test() -> Result<()> {
    let miner = Miner::new();
    let mut failures = 0;

    for suffix in CORPUS_SUFFIXES {
        let mut full = CORPUS_PREFIX.to_vec();
        full.extend_from_slice(suffix.as_bytes());
        let target = xxhmine_core::Xxh64::oneshot(xxhmine_core::driver::DEFAULT_SEED, &full);

        match miner.mine(CORPUS_PREFIX, target) {
            Some(nonce) if nonce.as_bytes() == suffix.as_bytes() => {
                println!("PASS  suffix={suffix}");
            }
            Some(nonce) => {
                println!(
                    "WARN  suffix={suffix} recovered a different nonce: {:?} (still rehash-valid? checking)",
                    String::from_utf8_lossy(&nonce.as_bytes())
                );
                let mut rehash = CORPUS_PREFIX.to_vec();
                rehash.extend_from_slice(&nonce.as_bytes());
                if xxhmine_core::Xxh64::oneshot(xxhmine_core::driver::DEFAULT_SEED, &rehash) != target {
                    failures += 1;
                    println!("FAIL  suffix={suffix} recovered nonce does not rehash to target");
                }
            }
            None => {
                failures += 1;
                println!("FAIL  suffix={suffix} no nonce recovered");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} self-test scenarios failed", CORPUS_SUFFIXES.len());
    }
    println!("all {} self-test scenarios passed", CORPUS_SUFFIXES.len());
    Ok(())
}
