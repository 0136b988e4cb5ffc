//! XXH64 hash-inversion primitives: given a fixed byte prefix and a target
//! 64-bit XXH64 digest, recover a short ASCII-numeric nonce that hashes to
//! it, by running XXH64's composition steps backward instead of searching
//! the nonce space forward.
//!
//! The crate is organized as a small dependency stack, leaves first:
//!
//! - [`primitives`]: wrapping 64-bit arithmetic and the precomputed inverses
//!   of XXH64's prime multipliers.
//! - [`forward`]: a from-scratch XXH64 implementation, plus [`forward::premine`],
//!   the partial hasher the driver inverts against.
//! - [`inverse`]: the inverse of each XXH64 step.
//! - [`driver`]: [`fastmine`] and [`fastmine_inner`], which walk the inverse
//!   steps backward from a target digest to a candidate nonce.
//!
//! `std` is enabled by default; disabling it still requires `alloc` (the
//! driver's attempt tiers build owned byte buffers).

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod driver;
pub mod error;
pub mod forward;
pub mod inverse;
pub mod primitives;

pub use driver::{fastmine, fastmine_inner, fastmine_with_seed, BruteLen, MineOptions, Nonce};
#[cfg(feature = "rayon")]
pub use driver::fastmine_parallel;
pub use error::{CoreError, Result};
pub use forward::{premine, Xxh64};

/// Verify the precomputed multiplicative-inverse table, surfacing a
/// [`CoreError`] rather than panicking.
///
/// The core never fails on caller input; this is the one path that can
/// report an internal invariant violation, for callers (such as the CLI's
/// startup check) that want an `Err` instead of a `debug_assert!`.
pub fn verify_invariants() -> Result<()> {
    if primitives::verify_inverses() {
        Ok(())
    } else {
        Err(CoreError::InvariantViolation(
            "XXH64 prime inverse table does not satisfy Pk * Ik = 1 mod 2^64",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_invariants_passes_on_the_shipped_constant_table() {
        assert!(verify_invariants().is_ok());
    }
}
