//! Experiment driver for the cellbench layouts.
//!
//! Run with:
//!   cargo build --release -p cellbench-driver
//!   ./target/release/cellbench --cells 50_000_000 --runs 10
//!   ./target/release/cellbench --variant vec-88,map-rank-88 --cells 10_000_000
//!   ./target/release/cellbench --list
//!
//! Set RUST_LOG=debug for per-phase log lines.

mod summary;

use anyhow::Context;
use cellbench::probe::{self, CountingAlloc};
use cellbench::variant::{self, DEFAULT_SELECTION, VARIANTS};
use cellbench::{DEFAULT_SEED, Report, Variant};
use clap::Parser;
use num_format::{Locale, ToFormattedString};

use crate::summary::Summary;

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[derive(Parser, Debug)]
#[command(about = "Times generation and element-wise arithmetic over different data layouts")]
struct Args {
    /// Element counts to run, comma separated. Underscores are allowed.
    #[arg(long, value_delimiter = ',', value_parser = parse_count, default_value = "50_000_000")]
    cells: Vec<usize>,

    /// Repetitions of the whole selection.
    #[arg(long, default_value_t = 10)]
    runs: usize,

    /// Variants to run, comma separated. Defaults to vec-box-88,map-rank-box-88.
    #[arg(long = "variant", value_delimiter = ',')]
    variants: Vec<String>,

    /// Payload seed.
    #[arg(long, default_value_t = DEFAULT_SEED, conflicts_with = "entropy")]
    seed: u64,

    /// Seed payloads from OS entropy instead of --seed.
    #[arg(long)]
    entropy: bool,

    /// Print the registered variants and exit.
    #[arg(long)]
    list: bool,
}

fn parse_count(s: &str) -> Result<usize, String> {
    s.replace('_', "")
        .parse()
        .map_err(|err| format!("invalid element count `{s}`: {err}"))
}

fn select(names: &[String]) -> anyhow::Result<Vec<&'static Variant>> {
    if names.is_empty() {
        return DEFAULT_SELECTION
            .iter()
            .map(|name| variant::find(name).context("default selection"))
            .collect();
    }
    names
        .iter()
        .map(|name| variant::find(name).with_context(|| "try --list for the registered names"))
        .collect()
}

fn list() {
    for v in VARIANTS {
        println!(
            "{:26} {:<40} {:>4} B/elem  {:?}",
            v.name,
            v.description(),
            v.element_bytes,
            v.op
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::init();

    if args.list {
        list();
        return Ok(());
    }

    let selected = select(&args.variants)?;
    let seed = (!args.entropy).then_some(args.seed);
    log::info!(
        "{} variant(s), counts {:?}, {} run(s), seed {:?}",
        selected.len(),
        args.cells,
        args.runs,
        seed
    );

    let mut summaries = selected
        .iter()
        .copied()
        .map(Summary::new)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let start = probe::snapshot();
    for run in 1..=args.runs {
        for &count in &args.cells {
            println!("{}", probe::snapshot());
            println!();
            println!(
                "{} cells, run {run}/{}",
                count.to_formatted_string(&Locale::en),
                args.runs
            );

            for (variant, summary) in selected.iter().zip(summaries.iter_mut()) {
                let timings = variant.run(count, seed);
                println!("{}", Report::new(variant, count, timings));
                println!();
                summary.record(timings);
            }
        }
    }

    println!("=== Summary ({} run(s)) ===", args.runs);
    for summary in &summaries {
        if summary.runs() > 0 {
            println!("{}", summary.row());
        }
    }
    println!();
    println!("=== Collector delta ===");
    println!("{}", probe::snapshot().since(&start));

    Ok(())
}
