//! Keys for the map-backed layouts.
//!
//! Runs iterate one flat logical index `0..populated(count)`. The
//! [`LogicalKey`] trait maps that index to whatever a layout is keyed by:
//! positions and integer keys use the index itself, composite layouts use a
//! band-major [`Key`].

use std::fmt::Debug;
use std::hash::Hash;

/// Number of bands a composite key space is partitioned into.
pub const BANDS: usize = 255;

/// Composite map key: an 8-bit band plus a 64-bit sequence within the band.
///
/// Two keys are equal iff both fields are equal. Ordering is band-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    band: u8,
    sequence: i64,
}

impl Key {
    #[inline]
    pub const fn new(band: u8, sequence: i64) -> Self {
        Self { band, sequence }
    }

    #[inline]
    pub const fn band(&self) -> u8 {
        self.band
    }

    #[inline]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }
}

/// A key type reachable from a flat logical index.
pub trait LogicalKey: Copy + Eq + Hash + Debug + 'static {
    /// Type name used in variant descriptions.
    const LABEL: &'static str;

    /// Number of entries a run generates for a requested `count`.
    fn populated(count: usize) -> usize;

    /// Maps `index` in `0..populated(count)` to a key.
    ///
    /// Pure: the same `(index, count)` always yields the same key, and
    /// distinct indices yield distinct keys.
    fn from_index(index: usize, count: usize) -> Self;
}

impl LogicalKey for usize {
    const LABEL: &'static str = "usize";

    #[inline]
    fn populated(count: usize) -> usize {
        count
    }

    #[inline]
    fn from_index(index: usize, _count: usize) -> Self {
        index
    }
}

impl LogicalKey for Key {
    const LABEL: &'static str = "Key";

    /// Whole bands only. Up to 254 trailing elements are dropped when
    /// `count` is not a multiple of [`BANDS`].
    #[inline]
    fn populated(count: usize) -> usize {
        BANDS * (count / BANDS)
    }

    #[inline]
    fn from_index(index: usize, count: usize) -> Self {
        let per_band = count / BANDS;
        debug_assert!(per_band > 0, "no whole band for count {count}");
        debug_assert!(index < Self::populated(count));
        Key::new((index / per_band) as u8, (index % per_band) as i64)
    }
}
