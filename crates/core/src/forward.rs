//! A from-scratch XXH64 implementation: a streaming [`Xxh64`] hasher, the
//! [`premine`] partial hasher the driver inverts against, and the individual
//! forward step functions whose inverses live in [`crate::inverse`].
//!
//! Keeping a full forward hasher in this crate (rather than depending on an
//! external xxhash crate) means the test suite and the CLI's `self-test`
//! subcommand can compute target hashes for arbitrary inputs without needing
//! anything beyond this module.

use crate::primitives::{rotl64, P1, P2, P3, P4, P5};

/// `round(acc, x) = rotl64(acc + x*P2, 31) * P1`, XXH64's core mixing step.
/// A bijection in `x` (and in `acc`) over 64-bit integers; [`crate::inverse::inv_round`]
/// is its inverse.
#[inline(always)]
pub(crate) const fn round(acc: u64, x: u64) -> u64 {
    rotl64(acc.wrapping_add(x.wrapping_mul(P2)), 31).wrapping_mul(P1)
}

/// Folds one lane accumulator `v` into the running hash `acc` after the
/// stripe loop, XXH64's "merge round".
#[inline(always)]
pub(crate) const fn merge_round(acc: u64, v: u64) -> u64 {
    (acc ^ round(0, v)).wrapping_mul(P1).wrapping_add(P4)
}

/// XXH64's final diffusion step.
pub fn avalanche(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(P2);
    h ^= h >> 29;
    h = h.wrapping_mul(P3);
    h ^= h >> 32;
    h
}

/// Absorb one complete 8-byte tail word `x` into `prefinal`, XXH64's 64-bit
/// tail absorption step. Inverted by [`crate::inverse::inv_finalize64`].
pub(crate) fn finalize64_step(prefinal: u64, x: u64) -> u64 {
    rotl64(prefinal ^ round(0, x), 27)
        .wrapping_mul(P1)
        .wrapping_add(P4)
}

/// Absorb a zero-extended 32-bit tail word `x` into `prefinal`, XXH64's
/// 4-byte tail absorption step. Inverted by [`crate::inverse::inv_finalize32`].
pub(crate) fn finalize32_step(prefinal: u64, x: u32) -> u64 {
    rotl64(prefinal ^ (x as u64).wrapping_mul(P1), 23)
        .wrapping_mul(P2)
        .wrapping_add(P3)
}

/// Absorb a short (< 8 byte) trailing suffix one byte at a time, XXH64's
/// final per-byte tail step. Inverted (in reverse byte order) by
/// [`crate::inverse::inv_suffix`].
pub(crate) fn suffix_step(mut h: u64, buf: &[u8]) -> u64 {
    for &b in buf {
        h = rotl64(h ^ (b as u64).wrapping_mul(P5), 11).wrapping_mul(P1);
    }
    h
}

/// Compute XXH64's internal accumulator after consuming `data` and folding
/// in `total_len`, but *before* absorbing any bytes past the last 8-byte
/// boundary of `data` and before avalanche.
///
/// `total_len` is the *claimed* eventual message length, not `data.len()` —
/// the miner driver pre-commits to the final length before the nonce bytes
/// that will occupy the remainder are known.
///
/// `data.len()` must be a multiple of 8: the driver always arranges for the
/// block boundary to fall exactly at the end of the known prefix, so that
/// the 4- or 8-byte nonce block begins at a fresh 8-byte word. A prefix
/// whose length is not a multiple of 8 is a caller bug, not an expected
/// "no solution" outcome, so this is an ordinary assertion rather than a
/// recoverable error.
pub fn premine(data: &[u8], seed: u64, total_len: u64) -> u64 {
    if data.is_empty() {
        return seed.wrapping_add(P5).wrapping_add(total_len);
    }

    let mut v1 = seed.wrapping_add(P1).wrapping_add(P2);
    let mut v2 = seed.wrapping_add(P2);
    let mut v3 = seed;
    let mut v4 = seed.wrapping_sub(P1);

    let mut stripes = data.chunks_exact(32);
    for stripe in &mut stripes {
        v1 = round(v1, u64::from_le_bytes(stripe[0..8].try_into().unwrap()));
        v2 = round(v2, u64::from_le_bytes(stripe[8..16].try_into().unwrap()));
        v3 = round(v3, u64::from_le_bytes(stripe[16..24].try_into().unwrap()));
        v4 = round(v4, u64::from_le_bytes(stripe[24..32].try_into().unwrap()));
    }

    let mut h = rotl64(v1, 1)
        .wrapping_add(rotl64(v2, 7))
        .wrapping_add(rotl64(v3, 12))
        .wrapping_add(rotl64(v4, 18));
    h = merge_round(h, v1);
    h = merge_round(h, v2);
    h = merge_round(h, v3);
    h = merge_round(h, v4);

    h = h.wrapping_add(total_len);

    let mut tail = stripes.remainder();
    while tail.len() >= 8 {
        let (word, rest) = tail.split_at(8);
        h = finalize64_step(h, u64::from_le_bytes(word.try_into().unwrap()));
        tail = rest;
    }

    assert!(
        tail.is_empty(),
        "premine: `data` length must be a multiple of 8 bytes"
    );

    h
}

/// Streaming XXH64 hasher, used to compute target hashes in tests and in
/// the CLI's `self-test` path.
#[derive(Clone)]
pub struct Xxh64 {
    seed: u64,
    acc: [u64; 4],
    buffer: [u8; 32],
    buffer_len: usize,
    total_len: u64,
}

impl Xxh64 {
    /// Create a hasher seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            acc: [
                seed.wrapping_add(P1).wrapping_add(P2),
                seed.wrapping_add(P2),
                seed,
                seed.wrapping_sub(P1),
            ],
            buffer: [0u8; 32],
            buffer_len: 0,
            total_len: 0,
        }
    }

    /// Absorb `bytes` into the hasher state.
    pub fn write(&mut self, mut bytes: &[u8]) {
        self.total_len += bytes.len() as u64;
        while !bytes.is_empty() {
            let n = bytes.len().min(32 - self.buffer_len);
            let (head, tail) = bytes.split_at(n);
            self.buffer[self.buffer_len..self.buffer_len + n].copy_from_slice(head);
            self.buffer_len += n;
            bytes = tail;

            if self.buffer_len == 32 {
                for (lane, acc) in self.buffer.chunks_exact(8).zip(self.acc.iter_mut()) {
                    *acc = round(*acc, u64::from_le_bytes(lane.try_into().unwrap()));
                }
                self.buffer_len = 0;
            }
        }
    }

    /// Finish hashing and return the 64-bit digest.
    pub fn finish(&self) -> u64 {
        let mut acc = if self.total_len < 32 {
            // No 32-byte stripe was ever completed, so acc[2] would still be
            // the untouched seed — use it directly instead of re-deriving it.
            self.seed.wrapping_add(P5)
        } else {
            let mut a = rotl64(self.acc[0], 1)
                .wrapping_add(rotl64(self.acc[1], 7))
                .wrapping_add(rotl64(self.acc[2], 12))
                .wrapping_add(rotl64(self.acc[3], 18));
            a = merge_round(a, self.acc[0]);
            a = merge_round(a, self.acc[1]);
            a = merge_round(a, self.acc[2]);
            a = merge_round(a, self.acc[3]);
            a
        };

        acc = acc.wrapping_add(self.total_len);

        let mut i = 0usize;
        while i + 8 <= self.buffer_len {
            let word = u64::from_le_bytes(self.buffer[i..i + 8].try_into().unwrap());
            acc = finalize64_step(acc, word);
            i += 8;
        }
        if self.buffer_len - i >= 4 {
            let word = u32::from_le_bytes(self.buffer[i..i + 4].try_into().unwrap());
            acc = finalize32_step(acc, word);
            i += 4;
        }
        acc = suffix_step(acc, &self.buffer[i..self.buffer_len]);

        avalanche(acc)
    }

    /// Hash `data` with `seed` in one call.
    pub fn oneshot(seed: u64, data: &[u8]) -> u64 {
        let mut hasher = Self::with_seed(seed);
        hasher.write(data);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_matches_known_digests() {
        assert_eq!(Xxh64::oneshot(0, b""), 0xef46db3751d8e999);
        assert_eq!(Xxh64::oneshot(0x55555555_55555555, b""), 0x28e7a0126181c619);
    }

    #[test]
    fn premine_on_empty_buffer_matches_direct_formula() {
        let seed = 2811u64;
        let total_len = 17u64;
        assert_eq!(
            premine(b"", seed, total_len),
            seed.wrapping_add(P5).wrapping_add(total_len)
        );
    }

    #[test]
    fn streaming_and_oneshot_agree_across_block_boundaries() {
        let data: Vec<u8> = (0u32..100).map(|i| (i % 251) as u8).collect();
        for &seed in &[0u64, 1, 2811, u64::MAX] {
            for len in [0usize, 1, 7, 8, 31, 32, 33, 63, 64, 65, 100] {
                let slice = &data[..len];
                let oneshot = Xxh64::oneshot(seed, slice);

                let mut streamed = Xxh64::with_seed(seed);
                // Feed in small, uneven chunks to exercise the buffering path.
                for chunk in slice.chunks(3) {
                    streamed.write(chunk);
                }
                assert_eq!(streamed.finish(), oneshot, "seed={seed} len={len}");
            }
        }
    }

    #[test]
    fn premine_matches_prefinal_state_used_by_finish() {
        // For a prefix whose length is a multiple of 8, premine's result
        // plus the remaining finalize step must equal a direct oneshot hash
        // (modulo avalanche), confirming premine and Xxh64::finish agree on
        // what "prefinal" means.
        let prefix = b"PREFIXESPREFIXESPREFIXESPREFIXESPREFIXES"; // 41 bytes, not aligned
        let aligned = &prefix[..40]; // 40 bytes, multiple of 8
        let seed = 2811u64;
        let tail: u64 = 0x3132333435363738; // "12345678" little-endian
        let total_len = aligned.len() as u64 + 8;

        let prefinal = premine(aligned, seed, total_len);
        let via_premine = avalanche(finalize64_step(prefinal, tail));

        let mut full = aligned.to_vec();
        full.extend_from_slice(&tail.to_le_bytes());
        let via_oneshot = Xxh64::oneshot(seed, &full);

        assert_eq!(via_premine, via_oneshot);
    }
}
