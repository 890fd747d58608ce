//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through SessionRng instances derived
//! from the single master seed of the run.
//!
//! Every session gets its own stream, seeded from
//! (master_seed XOR stream_index). This means:
//!   - Sessions can be simulated in any order, or in parallel,
//!     and still reproduce bit for bit.
//!   - The catalog stream never shifts when the session count changes.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

const STREAM_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// A named, deterministic RNG stream.
pub struct SessionRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SessionRng {
    /// Create a stream from the master seed and a stable stream index.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ stream_index.wrapping_mul(STREAM_MIX);
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll a u64 in [lo, hi], both ends included.
    pub fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo <= hi, "empty range {lo}..={hi}");
        lo + self.next_u64_below(hi - lo + 1)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Draw an index from a categorical distribution.
    /// Weights need not sum to 1; they are normalised here.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        assert!(!weights.is_empty(), "weights must not be empty");
        let total: f64 = weights.iter().sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if roll < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }

    /// Pick one element uniformly. None for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.next_u64_below(items.len() as u64) as usize;
        items.get(i)
    }

    /// Draw `k` distinct indices from `0..n` in draw order.
    ///
    /// Partial Fisher-Yates: the first `k` slots of a shuffled
    /// index permutation. No rejection loop.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.next_u64_below((n - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }
}

/// Stream factory for a single run.
#[derive(Debug, Clone, Copy)]
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Stream used to synthesise the catalog.
    pub fn for_catalog(&self) -> SessionRng {
        SessionRng::new(self.master_seed, StreamSlot::Catalog as u64).with_name("catalog")
    }

    /// Stream used to generate the past-order history.
    pub fn for_history(&self) -> SessionRng {
        SessionRng::new(self.master_seed, StreamSlot::History as u64).with_name("history")
    }

    /// Private stream for the session at `index`.
    pub fn for_session(&self, index: u64) -> SessionRng {
        SessionRng::new(self.master_seed, StreamSlot::FIRST_SESSION + index).with_name("session")
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Slots below FIRST_SESSION are
/// reserved; append only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Catalog = 0,
    History = 1,
}

impl StreamSlot {
    pub const FIRST_SESSION: u64 = 16;
}
