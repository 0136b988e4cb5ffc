//! CLI-equivalent integration test: exercises the same `Miner` API the
//! `solve` subcommand calls, without spawning the binary (this crate has no
//! process-spawning test harness).

use xxhmine::Miner;
use xxhmine_core::{Nonce, Xxh64};

const PREFIX: &[u8] = b"PREFIXESPREFIXESPREFIXESPREFIXESPREFIXES";

#[test]
fn solve_recovers_and_rehashes_every_canonical_scenario() {
    let miner = Miner::new();

    for suffix in [
        "123456789", "12345678", "1234567", "123456", "12345", "1234", "123", "12", "1",
    ] {
        let mut full = PREFIX.to_vec();
        full.extend_from_slice(suffix.as_bytes());
        let target = Xxh64::oneshot(xxhmine_core::driver::DEFAULT_SEED, &full);

        let nonce = miner
            .mine(PREFIX, target)
            .unwrap_or_else(|| panic!("no nonce recovered for suffix {suffix:?}"));

        let mut rehash = PREFIX.to_vec();
        rehash.extend_from_slice(&nonce.as_bytes());
        assert_eq!(
            Xxh64::oneshot(xxhmine_core::driver::DEFAULT_SEED, &rehash),
            target,
            "recovered nonce for suffix {suffix:?} does not rehash to target"
        );
    }
}

#[test]
fn nine_digit_scenario_matches_the_literal_suffix() {
    let miner = Miner::new();
    let mut full = PREFIX.to_vec();
    full.extend_from_slice(b"123456789");
    let target = Xxh64::oneshot(xxhmine_core::driver::DEFAULT_SEED, &full);

    assert_eq!(miner.mine(PREFIX, target), Some(Nonce::Numeric(123456789)));
}
