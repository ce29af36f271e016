// Seeded random source for the tessitura generators.
//
// xoshiro256++ (Blackman & Vigna) whose 256-bit state is filled from one
// `u64` by SplitMix64. Every random choice the music crate makes (root
// strategy, rhythm runs, note draws, chord sizes, titles) goes through a
// `Prng` the caller lends out as `&mut Prng`, so a piece is a pure function
// of its seed and config.
//
// Output must be bit-identical across platforms and builds: the core step
// is integer-only, and floats appear only when converting to [0, 1).

use serde::{Deserialize, Serialize};

/// Xoshiro256++ generator, the only source of randomness in the workspace.
///
/// Cloning forks the stream: the clone replays exactly what the original
/// would have produced from that point. The state serializes, so a run can
/// be paused and resumed mid-stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prng {
    s: [u64; 4],
}

impl Prng {
    /// Expand `seed` into a full generator state.
    ///
    /// SplitMix64 fills the four state words, so even small or zero seeds
    /// give a well-mixed starting point. Equal seeds give equal streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let mut s = [0u64; 4];
        for word in &mut s {
            *word = splitmix64(&mut sm);
        }
        Prng { s }
    }

    /// Seed from the system clock. The binary draws its run seed from this
    /// when no `--seed` is given.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }

    /// Advance the state and return the next 64 output bits.
    ///
    /// Every other method is built on this one.
    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = self.s;
        let out = s0.wrapping_add(s3).rotate_left(23).wrapping_add(s0);

        let t = s1 << 17;
        let s2 = s2 ^ s0;
        let s3 = s3 ^ s1;
        let s1 = s1 ^ s2;
        let s0 = s0 ^ s3;
        self.s = [s0, s1, s2 ^ t, s3.rotate_left(45)];

        out
    }

    /// Uniform in [0, 1), from the top 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// Uniform integer in `low..high`, without modulo bias.
    ///
    /// Panics on an empty range.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "empty range {low}..{high}");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // Reject the short tail so every residue is equally likely.
        let floor = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= floor {
                return low + r % span;
            }
        }
    }

    /// Uniform index in `low..high`, for picking from catalogs and slices.
    ///
    /// Panics on an empty range.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform value in `low..=high`. Panics if `low > high`.
    pub fn range_usize_inclusive(&mut self, low: usize, high: usize) -> usize {
        assert!(low <= high, "empty range {low}..={high}");
        self.range_u64(low as u64, high as u64 + 1) as usize
    }

    /// `true` with probability `p`. `p <= 0` is never, `p >= 1` always.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Fair coin flip. Shorthand for `random_bool(0.5)`.
    pub fn coin(&mut self) -> bool {
        self.random_bool(0.5)
    }

    /// A uniformly chosen element, or `None` if `items` is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.range_usize(0, items.len()))
        }
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
