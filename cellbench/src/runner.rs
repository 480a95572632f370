//! Two-phase benchmark runner.
//!
//! A run allocates operand collections A and B, fills them with payloads
//! (generation), then writes `A[k] op B[k]` into a result collection
//! (compute). Both phases are timed with [`Instant`]; nothing else is.
//!
//! Every key is visited in logical-index order, and A and B draw alternately
//! from one payload source, so a fixed seed reproduces the same operands.

use std::hint::black_box;
use std::time::{Duration, Instant};

use crate::key::LogicalKey;
use crate::payload::{DEFAULT_SEED, Payloads};
use crate::probe;
use crate::store::{Sizing, Store};

/// Element-wise operation of the compute phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Multiply,
    Add,
}

impl Op {
    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Multiply => a * b,
            Op::Add => a + b,
        }
    }

    /// Phase name for reports.
    pub fn label(self) -> &'static str {
        match self {
            Op::Multiply => "Multiplication",
            Op::Add => "Addition",
        }
    }
}

/// Where compute-phase results go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultMode {
    /// Allocate the result collection in the compute phase, one fresh record
    /// per key.
    Fresh,
    /// Allocate and zero-fill the result collection during generation, then
    /// overwrite payloads in place.
    InPlace,
}

/// Parameters of a single run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Requested element count. Zero yields an empty run.
    pub count: usize,
    /// `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub sizing: Sizing,
    pub op: Op,
    pub result: ResultMode,
}

impl RunConfig {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            seed: Some(DEFAULT_SEED),
            sizing: Sizing::Presized,
            op: Op::Multiply,
            result: ResultMode::Fresh,
        }
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn sizing(mut self, sizing: Sizing) -> Self {
        self.sizing = sizing;
        self
    }

    pub fn op(mut self, op: Op) -> Self {
        self.op = op;
        self
    }

    pub fn result(mut self, result: ResultMode) -> Self {
        self.result = result;
        self
    }
}

/// Wall-clock time spent in each phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    pub generation: Duration,
    pub compute: Duration,
}

impl PhaseTimings {
    pub fn generation_ms(&self) -> u128 {
        self.generation.as_millis()
    }

    pub fn compute_ms(&self) -> u128 {
        self.compute.as_millis()
    }
}

/// A finished run. Owns all three collections.
#[derive(Debug)]
pub struct Run<S> {
    pub a: S,
    pub b: S,
    pub result: S,
    pub timings: PhaseTimings,
}

/// Runs both phases and hands back the populated collections.
///
/// Allocation failure aborts the process; there is no partial run.
pub fn execute<K, S>(config: &RunConfig) -> Run<S>
where
    K: LogicalKey,
    S: Store<K>,
{
    let count = config.count;
    let populated = K::populated(count);
    let mut payloads = Payloads::new(config.seed);

    // Generation
    let start = Instant::now();

    let mut a = S::allocate(count, config.sizing);
    let mut b = S::allocate(count, config.sizing);
    for index in 0..populated {
        let key = K::from_index(index, count);
        a.put(key, payloads.draw());
        b.put(key, payloads.draw());
    }

    let prefilled = match config.result {
        ResultMode::Fresh => None,
        ResultMode::InPlace => {
            let mut result = S::allocate(count, config.sizing);
            for index in 0..populated {
                result.put(K::from_index(index, count), 0.0);
            }
            Some(result)
        }
    };

    let generation = start.elapsed();
    log::debug!(
        "{}: generated {populated} of {count} elements in {generation:?}",
        S::describe()
    );

    // Compute
    let op = config.op;
    let start = Instant::now();

    let result = match prefilled {
        Some(mut result) => {
            for index in 0..populated {
                let key = K::from_index(index, count);
                let value = op.apply(a.load(key), b.load(key));
                if let Some(slot) = result.lookup_mut(key) {
                    *slot = value;
                }
            }
            result
        }
        None => {
            let mut result = S::allocate(count, config.sizing);
            for index in 0..populated {
                let key = K::from_index(index, count);
                result.put(key, op.apply(a.load(key), b.load(key)));
            }
            result
        }
    };
    black_box(&result);

    let compute = start.elapsed();
    log::debug!("{}: {} in {compute:?}", S::describe(), op.label());

    Run {
        a,
        b,
        result,
        timings: PhaseTimings {
            generation,
            compute,
        },
    }
}

/// Runs both phases, then reclaims the collections through the probe.
///
/// Reclamation is timed as a pause and stays out of both phase timings.
pub fn run<K, S>(config: &RunConfig) -> PhaseTimings
where
    K: LogicalKey,
    S: Store<K>,
{
    let run = execute::<K, S>(config);
    let timings = run.timings;
    probe::reclaim(run);
    timings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell8, Cell88};
    use crate::key::Key;
    use std::collections::HashMap;

    #[test]
    fn op_apply() {
        assert_eq!(Op::Multiply.apply(0.5, 0.25), 0.125);
        assert_eq!(Op::Add.apply(0.5, 0.25), 0.75);
        assert_eq!(Op::Add.label(), "Addition");
    }

    #[test]
    fn config_builder() {
        let config = RunConfig::new(10)
            .seed(None)
            .sizing(Sizing::Growable)
            .op(Op::Add)
            .result(ResultMode::InPlace);
        assert_eq!(config.count, 10);
        assert_eq!(config.seed, None);
        assert_eq!(config.sizing, Sizing::Growable);
        assert_eq!(config.op, Op::Add);
        assert_eq!(config.result, ResultMode::InPlace);

        assert_eq!(RunConfig::new(1).seed, Some(DEFAULT_SEED));
    }

    #[test]
    fn operands_follow_the_payload_stream() {
        let run = execute::<usize, Vec<Cell8>>(&RunConfig::new(64).seed(Some(9)));
        let mut payloads = Payloads::new(Some(9));
        for i in 0..64 {
            assert_eq!(run.a.load(i), payloads.draw());
            assert_eq!(run.b.load(i), payloads.draw());
        }
    }

    #[test]
    fn product_per_index() {
        let run = execute::<usize, Vec<Box<Cell88>>>(&RunConfig::new(1000));
        assert_eq!(run.result.entries(), 1000);
        for i in 0..1000 {
            assert_eq!(run.result.load(i), run.a.load(i) * run.b.load(i));
        }
    }

    #[test]
    fn in_place_sum() {
        let config = RunConfig::new(500).op(Op::Add).result(ResultMode::InPlace);
        let run = execute::<usize, HashMap<usize, Box<Cell88>>>(&config);
        assert_eq!(run.result.entries(), 500);
        for i in 0..500 {
            assert_eq!(run.result.load(i), run.a.load(i) + run.b.load(i));
        }
    }

    #[test]
    fn composite_run_truncates() {
        let run = execute::<Key, HashMap<Key, Cell88>>(&RunConfig::new(1000));
        assert_eq!(run.a.entries(), 765);
        assert_eq!(run.b.entries(), 765);
        assert_eq!(run.result.entries(), 765);
    }

    #[test]
    fn zero_count_is_empty() {
        let run = execute::<Key, HashMap<Key, Box<Cell88>>>(&RunConfig::new(0));
        assert_eq!(run.result.entries(), 0);
        assert!(run.timings.generation >= Duration::ZERO);

        let timings = super::run::<usize, Vec<Cell88>>(&RunConfig::new(0));
        assert!(timings.compute >= Duration::ZERO);
    }
}
