//! Process-wide allocator and reclamation counters.
//!
//! Two sources feed the counters:
//!
//! - [`CountingAlloc`], a [`GlobalAlloc`] wrapper around [`System`]. A binary
//!   opts in with `#[global_allocator]`; without it the allocation counters
//!   stay at zero.
//! - [`reclaim`], which drops a finished run's collections and records the
//!   time spent freeing them as a pause.
//!
//! [`snapshot`] copies everything out with relaxed loads. It never allocates
//! and never reclaims anything.
//!
//! # Example
//!
//! ```ignore
//! use cellbench::probe::{self, CountingAlloc};
//!
//! #[global_allocator]
//! static GLOBAL: CountingAlloc = CountingAlloc;
//!
//! let before = probe::snapshot();
//! probe::reclaim(vec![0u64; 1 << 20]);
//! let batch = probe::snapshot().since(&before);
//! assert_eq!(batch.collections, 1);
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Number of recent pauses kept in a snapshot.
pub const PAUSE_WINDOW: usize = 8;

static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static DEALLOCATIONS: AtomicU64 = AtomicU64::new(0);
static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static LIVE_BYTES: AtomicU64 = AtomicU64::new(0);
static PEAK_BYTES: AtomicU64 = AtomicU64::new(0);

static COLLECTIONS: AtomicU64 = AtomicU64::new(0);
static TOTAL_PAUSE_NANOS: AtomicU64 = AtomicU64::new(0);
static RECENT_PAUSE_NANOS: [AtomicU64; PAUSE_WINDOW] = [const { AtomicU64::new(0) }; PAUSE_WINDOW];

// =============================================================================
// Counting allocator
// =============================================================================

/// [`System`] allocator that counts calls and bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingAlloc;

#[inline]
fn on_alloc(size: usize) {
    let size = size as u64;
    ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    ALLOCATED_BYTES.fetch_add(size, Ordering::Relaxed);
    let live = LIVE_BYTES.fetch_add(size, Ordering::Relaxed) + size;
    PEAK_BYTES.fetch_max(live, Ordering::Relaxed);
}

#[inline]
fn on_dealloc(size: usize) {
    DEALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    LIVE_BYTES.fetch_sub(size as u64, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            on_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        on_dealloc(layout.size());
        unsafe { System.dealloc(ptr, layout) }
    }

    /// Counted as a free of the old block plus an allocation of the new one.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            on_dealloc(layout.size());
            on_alloc(new_size);
        }
        new_ptr
    }
}

// =============================================================================
// Reclamation pauses
// =============================================================================

/// Drops `value` and records the time it took as a reclamation pause.
pub fn reclaim<T>(value: T) -> Duration {
    let start = Instant::now();
    drop(value);
    let pause = start.elapsed();
    record_pause(pause);
    log::trace!("reclaimed in {pause:?}");
    pause
}

/// Records one reclamation pause.
pub fn record_pause(pause: Duration) {
    let nanos = u64::try_from(pause.as_nanos()).unwrap_or(u64::MAX);
    let seq = COLLECTIONS.load(Ordering::Relaxed);
    RECENT_PAUSE_NANOS[seq as usize % PAUSE_WINDOW].store(nanos, Ordering::Relaxed);
    TOTAL_PAUSE_NANOS.fetch_add(nanos, Ordering::Relaxed);
    COLLECTIONS.store(seq + 1, Ordering::Relaxed);
}

/// Orders a ring of pause samples newest first.
///
/// `recorded` is the total number of pauses ever written into `ring`. Slots
/// that were never written come back as zero.
fn newest_first(ring: &[u64; PAUSE_WINDOW], recorded: u64) -> [Duration; PAUSE_WINDOW] {
    let mut out = [Duration::ZERO; PAUSE_WINDOW];
    let filled = recorded.min(PAUSE_WINDOW as u64) as usize;
    for (age, slot) in out.iter_mut().take(filled).enumerate() {
        let idx = (recorded as usize - 1 - age) % PAUSE_WINDOW;
        *slot = Duration::from_nanos(ring[idx]);
    }
    out
}

// =============================================================================
// Snapshot
// =============================================================================

/// Point-in-time copy of the process-wide counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollectorStats {
    /// Sum of all reclamation pauses.
    pub total_pause: Duration,
    /// Last [`PAUSE_WINDOW`] pauses, most recent first.
    pub recent_pauses: [Duration; PAUSE_WINDOW],
    /// Number of reclamations.
    pub collections: u64,
    pub allocations: u64,
    pub deallocations: u64,
    /// Bytes ever handed out.
    pub allocated_bytes: u64,
    pub live_bytes: u64,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: u64,
}

/// Reads the current counters.
pub fn snapshot() -> CollectorStats {
    let collections = COLLECTIONS.load(Ordering::Relaxed);
    let ring = std::array::from_fn(|i| RECENT_PAUSE_NANOS[i].load(Ordering::Relaxed));

    CollectorStats {
        total_pause: Duration::from_nanos(TOTAL_PAUSE_NANOS.load(Ordering::Relaxed)),
        recent_pauses: newest_first(&ring, collections),
        collections,
        allocations: ALLOCATIONS.load(Ordering::Relaxed),
        deallocations: DEALLOCATIONS.load(Ordering::Relaxed),
        allocated_bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
        live_bytes: LIVE_BYTES.load(Ordering::Relaxed),
        peak_bytes: PEAK_BYTES.load(Ordering::Relaxed),
    }
}

impl CollectorStats {
    /// Counter deltas since `earlier`.
    ///
    /// Window, live and peak figures are taken from `self` as-is.
    pub fn since(&self, earlier: &CollectorStats) -> CollectorStats {
        CollectorStats {
            total_pause: self.total_pause.saturating_sub(earlier.total_pause),
            recent_pauses: self.recent_pauses,
            collections: self.collections.saturating_sub(earlier.collections),
            allocations: self.allocations.saturating_sub(earlier.allocations),
            deallocations: self.deallocations.saturating_sub(earlier.deallocations),
            allocated_bytes: self.allocated_bytes.saturating_sub(earlier.allocated_bytes),
            live_bytes: self.live_bytes,
            peak_bytes: self.peak_bytes,
        }
    }
}

const MIB: f64 = (1u64 << 20) as f64;

impl fmt::Display for CollectorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total reclaim time: {:?}", self.total_pause)?;
        writeln!(f, "Recent reclaim times: {:?}", self.recent_pauses)?;
        writeln!(f, "Total reclaims: {}", self.collections)?;
        write!(
            f,
            "Allocations: {} (freed {}), {:.1} MiB allocated, {:.1} MiB live, {:.1} MiB peak",
            self.allocations,
            self.deallocations,
            self.allocated_bytes as f64 / MIB,
            self.live_bytes as f64 / MIB,
            self.peak_bytes as f64 / MIB,
        )
    }
}
