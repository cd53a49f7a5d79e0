use portable_atomic::{AtomicU64, Ordering};

/// Monitoring counters maintained by a generator.
///
/// These never feed back into ID generation, so all accesses are `Relaxed`;
/// a reader may observe the three values at slightly different moments.
#[derive(Debug, Default)]
pub struct Counters {
    total_generated: AtomicU64,
    clock_backward_events: AtomicU64,
    sequence_overflow_waits: AtomicU64,
}

impl Counters {
    pub const fn new() -> Self {
        Self {
            total_generated: AtomicU64::new(0),
            clock_backward_events: AtomicU64::new(0),
            sequence_overflow_waits: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn record_generated(&self, count: u64) {
        self.total_generated.fetch_add(count, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_clock_backward(&self) {
        self.clock_backward_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_overflow_wait(&self) {
        self.sequence_overflow_waits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_generated(&self) -> u64 {
        self.total_generated.load(Ordering::Relaxed)
    }

    pub fn clock_backward_events(&self) -> u64 {
        self.clock_backward_events.load(Ordering::Relaxed)
    }

    pub fn sequence_overflow_waits(&self) -> u64 {
        self.sequence_overflow_waits.load(Ordering::Relaxed)
    }

    /// Zeroes all three counters.
    pub(crate) fn reset(&self) {
        self.total_generated.store(0, Ordering::Relaxed);
        self.clock_backward_events.store(0, Ordering::Relaxed);
        self.sequence_overflow_waits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_reset() {
        let counters = Counters::new();
        counters.record_generated(3);
        counters.record_generated(1);
        counters.record_clock_backward();
        counters.record_overflow_wait();
        counters.record_overflow_wait();

        assert_eq!(counters.total_generated(), 4);
        assert_eq!(counters.clock_backward_events(), 1);
        assert_eq!(counters.sequence_overflow_waits(), 2);

        counters.reset();
        assert_eq!(counters.total_generated(), 0);
        assert_eq!(counters.clock_backward_events(), 0);
        assert_eq!(counters.sequence_overflow_waits(), 0);
    }
}
