//! Registry of layout variants.
//!
//! Each [`Variant`] pins one [`Store`] type together with its sizing policy,
//! operation and result mode. The driver selects variants by name instead of
//! toggling call sites.

use std::collections::HashMap;

use crate::cell::{Cell8, Cell16, Cell32, Cell64, Cell88};
use crate::error::BenchError;
use crate::footprint;
use crate::key::{Key, LogicalKey};
use crate::runner::{self, Op, PhaseTimings, ResultMode, RunConfig};
use crate::store::{Arena, Container, Ownership, Sizing, Store};

/// One benchmarkable layout.
#[derive(Clone, Copy, Debug)]
pub struct Variant {
    pub name: &'static str,
    pub container: Container,
    pub ownership: Ownership,
    /// Size of one record.
    pub record_bytes: usize,
    /// Estimated bytes per element, including key and indirection.
    pub element_bytes: usize,
    /// Label of the key type (`usize` for positions and integer keys).
    pub key: &'static str,
    pub sizing: Sizing,
    pub op: Op,
    pub result: ResultMode,
    describe: fn() -> String,
    runner: fn(&RunConfig) -> PhaseTimings,
}

impl Variant {
    const fn of<K, S>(name: &'static str, sizing: Sizing, op: Op, result: ResultMode) -> Self
    where
        K: LogicalKey,
        S: Store<K>,
    {
        Self {
            name,
            container: S::CONTAINER,
            ownership: S::OWNERSHIP,
            record_bytes: S::RECORD_BYTES,
            element_bytes: S::ELEMENT_BYTES,
            key: K::LABEL,
            sizing,
            op,
            result,
            describe: S::describe,
            runner: runner::run::<K, S>,
        }
    }

    const fn multiply<K, S>(name: &'static str) -> Self
    where
        K: LogicalKey,
        S: Store<K>,
    {
        Self::of::<K, S>(name, Sizing::Presized, Op::Multiply, ResultMode::Fresh)
    }

    const fn growable<K, S>(name: &'static str) -> Self
    where
        K: LogicalKey,
        S: Store<K>,
    {
        Self::of::<K, S>(name, Sizing::Growable, Op::Multiply, ResultMode::Fresh)
    }

    /// Rust type of the layout, with a note for growable sizing.
    pub fn description(&self) -> String {
        let mut text = (self.describe)();
        if self.sizing == Sizing::Growable {
            text.push_str(" (growable)");
        }
        text
    }

    /// Estimated footprint of one collection of `count` elements, in MiB.
    pub fn footprint_mib(&self, count: usize) -> f64 {
        footprint::mib(self.element_bytes, count)
    }

    /// Run configuration for `count` elements with `seed`.
    pub fn config(&self, count: usize, seed: Option<u64>) -> RunConfig {
        RunConfig::new(count)
            .seed(seed)
            .sizing(self.sizing)
            .op(self.op)
            .result(self.result)
    }

    /// Runs the variant and reclaims its collections.
    pub fn run(&self, count: usize, seed: Option<u64>) -> PhaseTimings {
        (self.runner)(&self.config(count, seed))
    }
}

/// Every registered variant, in report order.
pub static VARIANTS: &[Variant] = &[
    // Contiguous values
    Variant::multiply::<usize, Vec<Cell8>>("vec-f64"),
    Variant::multiply::<usize, Vec<Cell16>>("vec-16"),
    Variant::multiply::<usize, Vec<Cell32>>("vec-32"),
    Variant::multiply::<usize, Vec<Cell64>>("vec-64"),
    Variant::multiply::<usize, Vec<Cell88>>("vec-88"),
    // Contiguous pointers
    Variant::multiply::<usize, Vec<Box<Cell88>>>("vec-box-88"),
    Variant::growable::<usize, Vec<Box<Cell88>>>("vec-box-88-growable"),
    Variant::multiply::<usize, Arena<Vec<usize>, Cell88>>("vec-arena-88"),
    // Integer-keyed maps
    Variant::multiply::<usize, HashMap<usize, Cell32>>("map-int-32"),
    Variant::multiply::<usize, HashMap<usize, Box<Cell32>>>("map-int-box-32"),
    Variant::multiply::<usize, HashMap<usize, Box<Cell64>>>("map-int-box-64"),
    Variant::multiply::<usize, HashMap<usize, Box<Cell88>>>("map-int-box-88"),
    // Composite-keyed maps
    Variant::multiply::<Key, HashMap<Key, Box<Cell32>>>("map-rank-box-32"),
    Variant::multiply::<Key, HashMap<Key, Box<Cell64>>>("map-rank-box-64"),
    Variant::multiply::<Key, HashMap<Key, Box<Cell88>>>("map-rank-box-88"),
    Variant::growable::<Key, HashMap<Key, Box<Cell88>>>("map-rank-box-88-growable"),
    Variant::multiply::<Key, Arena<HashMap<Key, usize>, Cell88>>("map-rank-arena-88"),
    Variant::multiply::<Key, HashMap<Key, Cell88>>("map-rank-88"),
    // Additive, result updated in place
    Variant::of::<usize, HashMap<usize, Box<Cell88>>>(
        "map-int-box-88-add",
        Sizing::Presized,
        Op::Add,
        ResultMode::InPlace,
    ),
];

/// Variants run when the caller does not pick any.
pub const DEFAULT_SELECTION: &[&str] = &["vec-box-88", "map-rank-box-88"];

/// Looks a variant up by name.
pub fn find(name: &str) -> Result<&'static Variant, BenchError> {
    VARIANTS
        .iter()
        .find(|v| v.name == name)
        .ok_or_else(|| BenchError::UnknownVariant(name.to_string()))
}
