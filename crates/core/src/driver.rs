//! The miner driver: orchestrates a search over short suffixes and block
//! sizes, inverting [`crate::forward::premine`]'s output through
//! [`crate::inverse`] at each tier and falling back to brute force once the
//! nonce is too short to invert at all.
//!
//! This module has no notion of "the" search order beyond what
//! [`fastmine`] walks; [`fastmine_inner`] is a single self-contained attempt
//! and is the piece every tier (and every test) actually calls.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::forward::Xxh64;
use crate::inverse::{inv_avalanche, inv_finalize32, inv_finalize64, inv_suffix};

/// The default seed the reference DUCO-style challenge uses.
pub const DEFAULT_SEED: u64 = 2811;

/// Which tail word size a [`fastmine_inner`] attempt inverts: the full
/// 8-byte block-aligned XXH64 tail word, or the 4-byte one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BruteLen {
    /// Invert the 4-byte tail absorption step ([`crate::inverse::inv_finalize32`]).
    Four,
    /// Invert the 8-byte tail absorption step ([`crate::inverse::inv_finalize64`]).
    Eight,
}

impl BruteLen {
    fn byte_len(self) -> usize {
        match self {
            BruteLen::Four => 4,
            BruteLen::Eight => 8,
        }
    }
}

/// A recovered nonce, returned either as the decimal integer DUCO-style
/// protocols expect or as the raw bytes for callers that don't require an
/// all-digit result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Nonce {
    /// An all-ASCII-digit nonce, parsed as a decimal integer.
    Numeric(u128),
    /// The raw nonce bytes, for `numeric_only: false` searches.
    Raw(Vec<u8>),
}

impl Nonce {
    /// The nonce bytes, regardless of which variant this is.
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            Nonce::Numeric(n) => n.to_string().into_bytes(),
            Nonce::Raw(bytes) => bytes.clone(),
        }
    }
}

/// Parameters for a single [`fastmine_inner`] attempt.
#[derive(Debug, Clone, Copy)]
pub struct MineOptions<'a> {
    /// The known trailing bytes of the nonce, absorbed after the brute block.
    /// Must be 7 bytes or fewer: [`crate::inverse::inv_suffix`] only inverts
    /// the per-byte tail absorption within a single unfinished 8-byte word.
    pub suffix: &'a [u8],
    /// Reject any recovered block whose bytes aren't ASCII digits `0x30..=0x39`.
    pub numeric_only: bool,
    /// The XXH64 seed the target was computed with.
    pub seed: u64,
    /// Whether to invert the 4-byte or 8-byte tail absorption step.
    pub brute_len: BruteLen,
}

impl Default for MineOptions<'_> {
    fn default() -> Self {
        MineOptions {
            suffix: &[],
            numeric_only: true,
            seed: DEFAULT_SEED,
            brute_len: BruteLen::Eight,
        }
    }
}

/// Attempt to invert `target` for one specific `(suffix, brute_len)` shape.
///
/// Returns `None` if `opts.suffix` is longer than 7 bytes, if the 4-byte
/// inversion has no 32-bit preimage, or (when `numeric_only` is set) if the
/// recovered block isn't all ASCII digits. A `None` here means "this shape
/// has no solution", not an error — see [`fastmine`] for the tiered search
/// that tries the next shape.
pub fn fastmine_inner(prefix: &[u8], target: u64, opts: MineOptions<'_>) -> Option<Nonce> {
    if opts.suffix.len() > 7 {
        return None;
    }

    let block_len = opts.brute_len.byte_len();
    let total_len = prefix.len() as u64 + block_len as u64 + opts.suffix.len() as u64;

    let postfinal = inv_suffix(inv_avalanche(target), opts.suffix);
    let prefinal = crate::forward::premine(prefix, opts.seed, total_len);

    let mut nonce_bytes = Vec::with_capacity(block_len + opts.suffix.len());
    match opts.brute_len {
        BruteLen::Eight => {
            let block = inv_finalize64(prefinal, postfinal);
            nonce_bytes.extend_from_slice(&block.to_le_bytes());
        }
        BruteLen::Four => {
            let block = inv_finalize32(prefinal, postfinal)?;
            nonce_bytes.extend_from_slice(&(block as u32).to_le_bytes());
        }
    }
    nonce_bytes.extend_from_slice(opts.suffix);

    if !opts.numeric_only {
        return Some(Nonce::Raw(nonce_bytes));
    }

    if !nonce_bytes.iter().all(|&b| (0x30..=0x39).contains(&b)) {
        return None;
    }
    let text = core::str::from_utf8(&nonce_bytes).ok()?;
    let value: u128 = text.parse().ok()?;
    Some(Nonce::Numeric(value))
}

/// All digit strings of exactly `width` bytes, zero-padded, for `0..10^width`.
fn zero_padded_digits(width: usize) -> impl Iterator<Item = Vec<u8>> {
    let upper = 10u32.pow(width as u32);
    (0..upper).map(move |i| {
        let mut s = i.to_string();
        while s.len() < width {
            s.insert(0, '0');
        }
        s.into_bytes()
    })
}

/// Invert `target` for `prefix` under the default seed ([`DEFAULT_SEED`]),
/// requiring an all-digit nonce.
///
/// Walks the attempt tiers described in the module docs, cheapest and
/// highest-hit-rate first, falling back to direct brute force for nonces
/// too short to invert. Returns `None` if none of the ~2,231 attempts
/// succeed.
pub fn fastmine(prefix: &[u8], target: u64) -> Option<Nonce> {
    fastmine_with_seed(prefix, target, DEFAULT_SEED)
}

/// As [`fastmine`], but against an explicit seed rather than [`DEFAULT_SEED`].
pub fn fastmine_with_seed(prefix: &[u8], target: u64, seed: u64) -> Option<Nonce> {
    let attempt = |suffix: &[u8], brute_len: BruteLen| {
        fastmine_inner(
            prefix,
            target,
            MineOptions {
                suffix,
                numeric_only: true,
                seed,
                brute_len,
            },
        )
    };

    // Tier 1: a single 8-byte inversion, no known suffix.
    if let Some(n) = attempt(&[], BruteLen::Eight) {
        return Some(n);
    }

    // Tier 2: 8-byte inversion with one known trailing digit (10 tries).
    for d in 0u8..10 {
        let suffix = [b'0' + d];
        if let Some(n) = attempt(&suffix, BruteLen::Eight) {
            return Some(n);
        }
    }

    // Tiers 3-5: 4-byte inversion with a 3-, 2-, then 1-digit known suffix.
    for width in [3usize, 2, 1] {
        for suffix in zero_padded_digits(width) {
            if let Some(n) = attempt(&suffix, BruteLen::Four) {
                return Some(n);
            }
        }
    }

    // Final inversion: 4-byte block, no known suffix.
    if let Some(n) = attempt(&[], BruteLen::Four) {
        return Some(n);
    }

    // Final tier: brute-force nonces too short to invert (fewer than 4 bytes).
    brute_force(prefix, target, seed, 0..1000)
}

/// Try every decimal integer in `range` as a literal nonce, hashing `prefix
/// || ascii(i)` directly. This is the only tier that does not use inversion
/// at all; it exists because [`premine`](crate::forward::premine) has no
/// state to invert for a block shorter than 4 bytes.
fn brute_force(
    prefix: &[u8],
    target: u64,
    seed: u64,
    range: core::ops::Range<u32>,
) -> Option<Nonce> {
    let mut buf = Vec::with_capacity(prefix.len() + 3);
    for i in range {
        buf.clear();
        buf.extend_from_slice(prefix);
        let digits = i.to_string();
        buf.extend_from_slice(digits.as_bytes());
        if Xxh64::oneshot(seed, &buf) == target {
            return Some(Nonce::Numeric(i as u128));
        }
    }
    None
}

/// As [`fastmine`], but evaluates the 1,000-entry 3-digit inversion tier and
/// the 1,000-entry final brute-force tier across a thread pool.
///
/// A pure throughput optimization: the attempt order within each parallel
/// tier is not meaningful (any solution in a tier is as good as any other,
/// since all have already passed the cheaper tiers with no hit), so
/// searching the tier concurrently cannot change which nonce is returned,
/// only how fast it's found.
#[cfg(feature = "rayon")]
pub fn fastmine_parallel(prefix: &[u8], target: u64) -> Option<Nonce> {
    use rayon::prelude::*;

    let seed = DEFAULT_SEED;
    let attempt = |suffix: &[u8], brute_len: BruteLen| {
        fastmine_inner(
            prefix,
            target,
            MineOptions {
                suffix,
                numeric_only: true,
                seed,
                brute_len,
            },
        )
    };

    if let Some(n) = attempt(&[], BruteLen::Eight) {
        return Some(n);
    }
    for d in 0u8..10 {
        let suffix = [b'0' + d];
        if let Some(n) = attempt(&suffix, BruteLen::Eight) {
            return Some(n);
        }
    }

    let three_digit: Vec<Vec<u8>> = zero_padded_digits(3).collect();
    if let Some(n) = three_digit
        .into_par_iter()
        .find_map_any(|suffix| attempt(&suffix, BruteLen::Four))
    {
        return Some(n);
    }

    for width in [2usize, 1] {
        for suffix in zero_padded_digits(width) {
            if let Some(n) = attempt(&suffix, BruteLen::Four) {
                return Some(n);
            }
        }
    }

    if let Some(n) = attempt(&[], BruteLen::Four) {
        return Some(n);
    }

    (0u32..1000)
        .into_par_iter()
        .find_map_any(|i| {
            let mut buf = Vec::with_capacity(prefix.len() + 3);
            buf.extend_from_slice(prefix);
            buf.extend_from_slice(i.to_string().as_bytes());
            (Xxh64::oneshot(seed, &buf) == target).then_some(Nonce::Numeric(i as u128))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward::Xxh64;

    const PREFIX: &[u8] = b"PREFIXESPREFIXESPREFIXESPREFIXESPREFIXES";

    fn target_for(suffix: &[u8]) -> u64 {
        let mut full = PREFIX.to_vec();
        full.extend_from_slice(suffix);
        Xxh64::oneshot(DEFAULT_SEED, &full)
    }

    #[test]
    fn recovers_nine_digit_suffix_exactly() {
        let target = target_for(b"123456789");
        let nonce = fastmine(PREFIX, target).expect("nine-digit nonce should invert");
        assert_eq!(nonce, Nonce::Numeric(123456789));
    }

    #[test]
    fn recovers_every_canonical_scenario_by_rehashing() {
        let suffixes: &[&[u8]] = &[
            b"123456789",
            b"12345678",
            b"1234567",
            b"123456",
            b"12345",
            b"1234",
            b"123",
            b"12",
            b"1",
        ];
        for suffix in suffixes {
            let target = target_for(suffix);
            let nonce = fastmine(PREFIX, target)
                .unwrap_or_else(|| panic!("no nonce recovered for suffix {suffix:?}"));
            let mut full = PREFIX.to_vec();
            full.extend_from_slice(&nonce.as_bytes());
            assert_eq!(
                Xxh64::oneshot(DEFAULT_SEED, &full),
                target,
                "recovered nonce does not rehash to target for suffix {suffix:?}"
            );
        }
    }

    #[test]
    fn fastmine_inner_rejects_suffix_longer_than_seven_bytes() {
        let opts = MineOptions {
            suffix: b"12345678",
            ..MineOptions::default()
        };
        assert_eq!(fastmine_inner(PREFIX, 0, opts), None);
    }

    #[test]
    fn nonce_as_bytes_matches_variant() {
        assert_eq!(Nonce::Numeric(42).as_bytes(), b"42".to_vec());
        assert_eq!(Nonce::Raw(b"ab".to_vec()).as_bytes(), b"ab".to_vec());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_driver_agrees_with_sequential_driver() {
        let target = target_for(b"123456789");
        let sequential = fastmine(PREFIX, target);
        let parallel = fastmine_parallel(PREFIX, target);
        assert_eq!(sequential, parallel);
    }
}
