//! Physical time for stamping report updates.
//!
//! Update stamping goes through the `PhysicalClock` trait so merge ordering
//! is deterministic under test. Production code uses `SystemClock`; tests and
//! simulations use `ManualClock` or wrap a closure in `FnClock`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Wall-clock time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhysicalTime {
    /// Milliseconds since the Unix epoch
    pub ts_ms: u64,
}

impl PhysicalTime {
    /// Create a timestamp from milliseconds since the epoch.
    pub const fn from_ms(ts_ms: u64) -> Self {
        Self { ts_ms }
    }

    /// Milliseconds since the epoch.
    pub const fn as_ms(&self) -> u64 {
        self.ts_ms
    }

    /// `true` if `self` is strictly earlier than `other`.
    pub fn is_before(&self, other: &PhysicalTime) -> bool {
        self.ts_ms < other.ts_ms
    }
}

impl fmt::Display for PhysicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.ts_ms)
    }
}

impl From<u64> for PhysicalTime {
    fn from(ts_ms: u64) -> Self {
        Self::from_ms(ts_ms)
    }
}

/// Source of the current wall-clock time.
pub trait PhysicalClock: Send + Sync {
    /// Current time.
    fn physical_time(&self) -> PhysicalTime;
}

impl<T: PhysicalClock + ?Sized> PhysicalClock for &T {
    fn physical_time(&self) -> PhysicalTime {
        (**self).physical_time()
    }
}

impl<T: PhysicalClock + ?Sized> PhysicalClock for Arc<T> {
    fn physical_time(&self) -> PhysicalTime {
        (**self).physical_time()
    }
}

impl<T: PhysicalClock + ?Sized> PhysicalClock for Box<T> {
    fn physical_time(&self) -> PhysicalTime {
        (**self).physical_time()
    }
}

/// Adapts a plain `Fn() -> PhysicalTime` into a clock.
#[derive(Clone, Copy)]
pub struct FnClock<F>(pub F);

impl<F> PhysicalClock for FnClock<F>
where
    F: Fn() -> PhysicalTime + Send + Sync,
{
    fn physical_time(&self) -> PhysicalTime {
        (self.0)()
    }
}

/// Clock backed by `SystemTime::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl PhysicalClock for SystemClock {
    fn physical_time(&self) -> PhysicalTime {
        let elapsed = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        PhysicalTime::from_ms(saturating_ms(elapsed))
    }
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn saturating_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Manually driven clock for tests and simulation.
///
/// Each read returns the current value and then advances it by `step_ms`.
/// A step of zero gives a frozen clock.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicU64,
    step_ms: u64,
}

impl ManualClock {
    /// Frozen clock at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self::with_step(start_ms, 0)
    }

    /// Clock starting at `start_ms` that advances `step_ms` after every read.
    pub fn with_step(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
            step_ms,
        }
    }

    /// Move the clock to `ts_ms`.
    pub fn set(&self, ts_ms: u64) {
        self.now_ms.store(ts_ms, Ordering::SeqCst);
    }

    /// Advance the clock by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now_ms.fetch_add(ms, Ordering::SeqCst);
    }

    /// Value the next read will return, without advancing.
    pub fn peek(&self) -> PhysicalTime {
        PhysicalTime::from_ms(self.now_ms.load(Ordering::SeqCst))
    }
}

impl PhysicalClock for ManualClock {
    fn physical_time(&self) -> PhysicalTime {
        PhysicalTime::from_ms(self.now_ms.fetch_add(self.step_ms, Ordering::SeqCst))
    }
}
