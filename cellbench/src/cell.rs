//! Padded cell records.
//!
//! Every shape carries exactly one `f64` payload. The padding only exists to
//! change `size_of::<Cell<PAD>>()`, so a run can hold the arithmetic constant
//! while varying how many records share a cache line.
//!
//! | Alias    | Padding | Size |
//! |----------|---------|------|
//! | `Cell8`  | 0       | 8    |
//! | `Cell16` | 8       | 16   |
//! | `Cell32` | 24      | 32   |
//! | `Cell64` | 56      | 64   |
//! | `Cell88` | 80      | 88   |

use std::mem;

/// A payload with `PAD` inert bytes in front of it.
///
/// The padding is zeroed on construction and never read afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct Cell<const PAD: usize> {
    _padding: [u8; PAD],
    value: f64,
}

/// Bare payload, no padding.
pub type Cell8 = Cell<0>;
/// Two records per 32 bytes.
pub type Cell16 = Cell<8>;
/// Two records per cache line.
pub type Cell32 = Cell<24>;
/// One record per cache line.
pub type Cell64 = Cell<56>;
/// Straddles a cache line boundary.
pub type Cell88 = Cell<80>;

impl<const PAD: usize> Cell<PAD> {
    pub const ZERO: Self = Self::new(0.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            _padding: [0; PAD],
            value,
        }
    }

    #[inline]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn value_mut(&mut self) -> &mut f64 {
        &mut self.value
    }
}

/// A fixed-size record shape the stores are generic over.
pub trait Record: Copy + 'static {
    /// In-memory size of one record.
    const SIZE: usize;

    /// Type name used in variant descriptions.
    const LABEL: &'static str;

    fn new(value: f64) -> Self;

    fn value(&self) -> f64;

    fn value_mut(&mut self) -> &mut f64;
}

impl<const PAD: usize> Record for Cell<PAD> {
    const SIZE: usize = mem::size_of::<Self>();

    const LABEL: &'static str = match PAD {
        0 => "Cell8",
        8 => "Cell16",
        24 => "Cell32",
        56 => "Cell64",
        80 => "Cell88",
        _ => "Cell",
    };

    #[inline]
    fn new(value: f64) -> Self {
        Cell::new(value)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    fn value_mut(&mut self) -> &mut f64 {
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_labels() {
        assert_eq!(Cell8::SIZE, 8);
        assert_eq!(Cell16::SIZE, 16);
        assert_eq!(Cell32::SIZE, 32);
        assert_eq!(Cell64::SIZE, 64);
        assert_eq!(Cell88::SIZE, 88);

        assert_eq!(Cell8::LABEL, "Cell8");
        assert_eq!(Cell88::LABEL, "Cell88");
    }

    #[test]
    fn alignment_is_payload_alignment() {
        assert_eq!(mem::align_of::<Cell88>(), mem::align_of::<f64>());
        assert_eq!(mem::align_of::<Cell8>(), mem::align_of::<f64>());
    }

    #[test]
    fn value_access() {
        let mut cell = Cell64::new(0.25);
        assert_eq!(cell.value(), 0.25);

        *cell.value_mut() = 0.5;
        assert_eq!(Record::value(&cell), 0.5);
        assert_eq!(Cell64::ZERO.value(), 0.0);
    }
}
