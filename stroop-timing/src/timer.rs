use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic clock used to time responses
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync + fmt::Debug;

    fn now(&self) -> Self::Timestamp;

    /// Timestamp `d` after now.
    fn after(&self, d: Duration) -> Self::Timestamp;

    fn elapsed(&self, ts: Self::Timestamp) -> Duration;

    /// Marks the start of a timed interval.
    fn start(&self) -> Self::Timestamp {
        self.now()
    }

    /// Whole milliseconds since `ts`; never negative.
    fn elapsed_ms(&self, ts: Self::Timestamp) -> u64 {
        self.elapsed(ts).as_millis() as u64
    }
}

/// Nanosecond timestamps from a process-local `Instant`.
#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    pub start: Instant,
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn after(&self, d: Duration) -> u64 {
        self.now().saturating_add(d.as_nanos() as u64)
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock that only moves when told to. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    now_ns: Arc<AtomicU64>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns
            .fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Timer for ManualTimer {
    type Timestamp = u64;

    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn after(&self, d: Duration) -> u64 {
        self.now().saturating_add(d.as_nanos() as u64)
    }

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_timer_clones_share_the_clock() {
        let timer = ManualTimer::new();
        let start = timer.start();
        let clone = timer.clone();
        clone.advance_ms(420);
        assert_eq!(timer.elapsed_ms(start), 420);
        assert_eq!(timer.now(), clone.now());
    }

    #[test]
    fn elapsed_saturates_for_future_timestamps() {
        let timer = ManualTimer::new();
        let future = timer.after(Duration::from_millis(150));
        assert_eq!(timer.elapsed_ms(future), 0);
        timer.advance_ms(200);
        assert_eq!(timer.elapsed_ms(future), 50);
    }

    #[test]
    fn elapsed_ms_truncates_partial_milliseconds() {
        let timer = ManualTimer::new();
        let start = timer.start();
        timer.advance(Duration::from_micros(1_999));
        assert_eq!(timer.elapsed_ms(start), 1);
    }

    #[test]
    fn high_precision_timer_is_monotonic() {
        let timer = HighPrecisionTimer::new();
        let a = timer.now();
        let b = timer.now();
        assert!(b >= a);
        assert!(timer.after(Duration::from_secs(1)) > b);
    }
}
