//! Modular arithmetic primitives shared by the forward hasher and the inverse
//! step library. Every other module in this crate does its 64-bit arithmetic
//! through these functions and nothing else.

/// XXH64's five prime multipliers, bit-exact.
pub const P1: u64 = 0x9E3779B185EBCA87;
pub const P2: u64 = 0xC2B2AE3D27D4EB4F;
pub const P3: u64 = 0x165667B19E3779F9;
pub const P4: u64 = 0x85EBCA77C2B2AE63;
pub const P5: u64 = 0x27D4EB2F165667C5;

/// Multiplicative inverses of `P1..P5` modulo 2^64, computed offline with an
/// extended-Euclidean-algorithm style algebra system (all `Pk` are odd, hence
/// invertible mod 2^64). `I4` and `I5` are carried for completeness and the
/// invariant check in [`debug_assert_invariants`] even though the current
/// inverse steps never need to divide by `P4` or `P5`.
pub const I1: u64 = 0x0887_4934_32ba_db37;
pub const I2: u64 = 0x0ba7_9078_168d_4baf;
pub const I3: u64 = 0xe9e9_f4c4_1d6d_f849;
pub const I4: u64 = 0xd872_e78f_6fe1_434b;
pub const I5: u64 = 0xc592_c09f_dfba_7f0d;

/// Rotate `x` left by `n` bits, `n` in `[0, 63]`.
#[inline(always)]
pub const fn rotl64(x: u64, n: u32) -> u64 {
    x.rotate_left(n)
}

/// Rotate `x` right by `n` bits, `n` in `[0, 63]`.
#[inline(always)]
pub const fn rotr64(x: u64, n: u32) -> u64 {
    x.rotate_right(n)
}

/// Verify that every precomputed inverse actually inverts its prime mod 2^64.
///
/// Called from a test and, in debug builds, from the CLI's startup path; a
/// failure here means the constant table above was transcribed incorrectly.
pub fn verify_inverses() -> bool {
    P1.wrapping_mul(I1) == 1
        && P2.wrapping_mul(I2) == 1
        && P3.wrapping_mul(I3) == 1
        && P4.wrapping_mul(I4) == 1
        && P5.wrapping_mul(I5) == 1
}

/// Debug-only assertion guarding the inverse table; a no-op in release builds.
#[inline]
pub fn debug_assert_invariants() {
    debug_assert!(verify_inverses(), "XXH64 prime inverse table is corrupt");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_and_inverses_multiply_to_one_mod_2_64() {
        assert!(verify_inverses());
    }

    #[test]
    fn rotl_and_rotr_round_trip() {
        let x = 0x0123_4567_89ab_cdefu64;
        for n in 0..64u32 {
            assert_eq!(rotr64(rotl64(x, n), n), x);
        }
    }
}
