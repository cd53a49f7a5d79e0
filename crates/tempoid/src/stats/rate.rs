/// Generation rate measured between consecutive snapshots.
///
/// Each call to [`RateWindow::sample`] compares the running total against the
/// previous sample, so the reported rate covers the interval since the last
/// snapshot rather than the whole process lifetime.
#[derive(Debug, Default)]
pub(crate) struct RateWindow {
    previous: Option<Sample>,
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    total: u64,
    at_millis: u64,
}

impl RateWindow {
    pub(crate) const fn new() -> Self {
        Self { previous: None }
    }

    /// Records `(total, now_millis)` and returns IDs per second since the
    /// previous sample.
    ///
    /// Returns `None` on the first sample, when no wall time has elapsed, or
    /// when the clock or the total went backward (e.g. after a reset).
    pub(crate) fn sample(&mut self, total: u64, now_millis: u64) -> Option<f64> {
        let current = Sample {
            total,
            at_millis: now_millis,
        };
        let previous = self.previous.replace(current)?;

        let elapsed = now_millis.checked_sub(previous.at_millis)?;
        let delta = total.checked_sub(previous.total)?;
        if elapsed == 0 {
            return None;
        }
        Some(delta as f64 * 1000.0 / elapsed as f64)
    }

    pub(crate) fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sample_has_no_rate() {
        let mut window = RateWindow::new();
        assert_eq!(window.sample(100, 1_000), None);
    }

    #[test]
    fn rate_covers_interval_since_previous_sample() {
        let mut window = RateWindow::new();
        window.sample(0, 1_000);
        assert_eq!(window.sample(500, 1_500), Some(1_000.0));
        assert_eq!(window.sample(600, 2_500), Some(100.0));
    }

    #[test]
    fn zero_elapsed_or_backward_inputs_have_no_rate() {
        let mut window = RateWindow::new();
        window.sample(10, 1_000);
        assert_eq!(window.sample(20, 1_000), None);
        assert_eq!(window.sample(30, 999), None);
        assert_eq!(window.sample(5, 2_000), None);
    }

    #[test]
    fn reset_forgets_previous_sample() {
        let mut window = RateWindow::new();
        window.sample(10, 1_000);
        window.reset();
        assert_eq!(window.sample(20, 2_000), None);
    }
}
