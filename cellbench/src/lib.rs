//! cellbench - data-layout micro-benchmarks.
//!
//! Measures how the layout of a large collection changes allocation cost,
//! access latency and allocator pressure for one trivial operation:
//! `result[k] = a[k] * b[k]` (or `+`) over tens of millions of padded cells.
//!
//! The arithmetic stays fixed. What changes per [`Variant`]:
//!
//! - **Container**: contiguous `Vec` or `HashMap`.
//! - **Ownership**: records inline, one `Box` per record, or keys into a
//!   pre-sized slab arena.
//! - **Record size**: 8, 16, 32, 64 or 88 bytes via [`Cell`] padding.
//! - **Key**: position, integer, or composite [`Key`] (band + sequence).
//!
//! Runs are single-threaded. Generation and compute are timed separately
//! with a monotonic clock; freeing the collections afterwards is recorded
//! by the [`probe`] as a reclamation pause.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use cellbench::{Cell88, Key, RunConfig, Store, runner, variant};
//!
//! // Through the registry: run, reclaim, keep only the timings.
//! let v = variant::find("map-rank-box-88").unwrap();
//! let timings = v.run(255, Some(0xCA0541));
//! assert!(timings.generation_ms() < 10_000);
//!
//! // Directly: keep the collections for inspection.
//! let run = runner::execute::<Key, HashMap<Key, Box<Cell88>>>(&RunConfig::new(255));
//! assert_eq!(run.result.entries(), 255);
//! let k = Key::new(7, 0);
//! assert_eq!(run.result.load(k), run.a.load(k) * run.b.load(k));
//! ```
//!
//! # Element counts
//!
//! Composite-keyed variants only generate whole bands: a run of `n`
//! elements holds `255 * (n / 255)` entries. A count of zero is an empty run.
//! Allocation failure aborts the process.

pub mod cell;
pub mod error;
pub mod footprint;
pub mod key;
pub mod payload;
pub mod probe;
pub mod report;
pub mod runner;
pub mod store;
pub mod variant;

pub use cell::{Cell, Cell8, Cell16, Cell32, Cell64, Cell88, Record};
pub use error::BenchError;
pub use key::{BANDS, Key, LogicalKey};
pub use payload::{DEFAULT_SEED, Payloads};
pub use probe::{CollectorStats, CountingAlloc};
pub use report::Report;
pub use runner::{Op, PhaseTimings, ResultMode, Run, RunConfig};
pub use store::{Arena, Container, Ownership, Sizing, Store};
pub use variant::{VARIANTS, Variant};
