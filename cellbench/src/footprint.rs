//! Memory footprint and napkin-math estimates.

const MIB: f64 = (1u64 << 20) as f64;

/// Sequential memory cost assumed by [`Napkin`]: 50 µs per MiB touched.
const MICROS_PER_MIB: f64 = 50.0;

/// `(element_bytes * count) / 2^20`.
#[inline]
pub fn mib(element_bytes: usize, count: usize) -> f64 {
    (element_bytes as f64 * count as f64) / MIB
}

/// Back-of-the-envelope phase times for one collection of `mib` MiB.
///
/// Generation writes two collections, compute touches three.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Napkin {
    pub generation_ms: f64,
    pub compute_ms: f64,
}

impl Napkin {
    pub fn for_mib(mib: f64) -> Self {
        Self {
            generation_ms: mib * MICROS_PER_MIB * 2.0 / 1000.0,
            compute_ms: mib * MICROS_PER_MIB * 3.0 / 1000.0,
        }
    }
}
