use crate::DEFAULT_EPOCH;
use core::time::Duration;

/// Immutable settings of a [`SnowflakeGenerator`].
///
/// [`SnowflakeGenerator`]: crate::SnowflakeGenerator
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeneratorConfig {
    epoch_millis: u64,
    clock_backward_tolerance_millis: u64,
}

impl GeneratorConfig {
    /// Backward clock steps up to this size are waited out by default.
    pub const DEFAULT_TOLERANCE: Duration = Duration::from_millis(5);

    /// Creates a config anchored at `epoch` (a [`Duration`] since
    /// 1970-01-01 UTC) with the default tolerance.
    pub const fn new(epoch: Duration) -> Self {
        Self {
            epoch_millis: saturating_millis(epoch),
            clock_backward_tolerance_millis: saturating_millis(Self::DEFAULT_TOLERANCE),
        }
    }

    /// Sets how far the clock may step backward before generation fails.
    ///
    /// A zero tolerance makes every backward step fatal.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.clock_backward_tolerance_millis = saturating_millis(tolerance);
        self
    }

    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }

    pub const fn tolerance_millis(&self) -> u64 {
        self.clock_backward_tolerance_millis
    }
}

/// Whole milliseconds of `duration`, clamped to `u64::MAX`.
const fn saturating_millis(duration: Duration) -> u64 {
    let millis = duration.as_millis();
    if millis > u64::MAX as u128 {
        u64::MAX
    } else {
        millis as u64
    }
}

impl Default for GeneratorConfig {
    /// [`DEFAULT_EPOCH`] with a 5 ms tolerance.
    fn default() -> Self {
        Self::new(DEFAULT_EPOCH)
    }
}
