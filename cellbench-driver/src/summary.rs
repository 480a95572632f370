//! Per-variant phase-time summary across repeated runs.

use anyhow::Context;
use cellbench::{PhaseTimings, Variant};
use hdrhistogram::Histogram;

/// Millisecond histograms of both phases for one variant.
pub struct Summary {
    variant: &'static Variant,
    generation: Histogram<u64>,
    compute: Histogram<u64>,
}

impl Summary {
    pub fn new(variant: &'static Variant) -> anyhow::Result<Self> {
        Ok(Self {
            variant,
            generation: Histogram::new(3).context("generation histogram")?,
            compute: Histogram::new(3).context("compute histogram")?,
        })
    }

    pub fn record(&mut self, timings: PhaseTimings) {
        self.generation
            .saturating_record(u64::try_from(timings.generation_ms()).unwrap_or(u64::MAX));
        self.compute
            .saturating_record(u64::try_from(timings.compute_ms()).unwrap_or(u64::MAX));
    }

    pub fn runs(&self) -> u64 {
        self.generation.len()
    }

    /// One row: `name  generation min/p50/max | <op> min/p50/max`.
    pub fn row(&self) -> String {
        format!(
            "{:26} generation ms min {:5} p50 {:5} max {:5} | {} ms min {:5} p50 {:5} max {:5}",
            self.variant.name,
            self.generation.min(),
            self.generation.value_at_quantile(0.50),
            self.generation.max(),
            self.variant.op.label(),
            self.compute.min(),
            self.compute.value_at_quantile(0.50),
            self.compute.max(),
        )
    }
}
