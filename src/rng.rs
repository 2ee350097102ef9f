//! Small deterministic PRNG used for particle spawning and widget picks.
//!
//! The renderer needs a batch of independent uniform values per regeneration,
//! so a persistent xorshift64* state is kept instead of deriving every value
//! from the current timestamp (values drawn within the same millisecond would
//! otherwise correlate). Seeding comes from `performance.now()` by default;
//! the `rng` feature upgrades seeding to browser entropy via `getrandom`.

use std::cell::RefCell;

/// Xorshift64* generator (not crypto secure; decorative use only).
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a generator from an explicit seed. A zero seed is remapped so
    /// the generator never degenerates to the all-zero fixed point.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Seed from the environment: browser entropy when the `rng` feature is
    /// enabled, otherwise the page's high-resolution clock.
    pub fn from_clock() -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::new(u64::from_le_bytes(buf));
            }
        }
        let now = crate::performance_now();
        // Simple linear transform of the timestamp bits (not crypto secure)
        Self::new(now.to_bits().wrapping_mul(1664525).wrapping_add(1013904223))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform f64 in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        // 53 high-quality bits, the mantissa width of f64.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform index into a slice of length `len`; 0 when `len` is 0.
    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

thread_local! {
    static WIDGET_RNG: RefCell<Option<XorShift64>> = RefCell::new(None);
}

/// Uniform index for one-off widget picks (facts, surprise destinations).
/// Shared thread-local state, lazily clock-seeded on first use.
pub fn rand_index(len: usize) -> usize {
    WIDGET_RNG.with(|cell| {
        cell.borrow_mut()
            .get_or_insert_with(XorShift64::from_clock)
            .index(len)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = XorShift64::new(42);
        let mut b = XorShift64::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut r = XorShift64::new(0);
        assert_ne!(r.next_u64(), 0);
    }

    #[test]
    fn next_f64_stays_in_unit_interval() {
        let mut r = XorShift64::new(7);
        for _ in 0..1000 {
            let v = r.next_f64();
            assert!((0.0..1.0).contains(&v), "value {v} escaped [0,1)");
        }
    }

    #[test]
    fn range_respects_bounds() {
        let mut r = XorShift64::new(99);
        for _ in 0..1000 {
            let v = r.range(-0.25, 0.25);
            assert!((-0.25..0.25).contains(&v), "value {v} escaped [-0.25,0.25)");
        }
    }

    #[test]
    fn index_stays_in_range_and_handles_empty() {
        let mut r = XorShift64::new(3);
        for _ in 0..100 {
            assert!(r.index(10) < 10);
        }
        assert_eq!(r.index(0), 0);
    }
}
