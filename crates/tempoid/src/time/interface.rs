use std::sync::Arc;

/// A source of wall-clock time in milliseconds since the Unix epoch.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests. Unlike a monotonic timer, implementations are allowed
/// to step backward; the generator is responsible for coping with that.
///
/// # Example
///
/// ```
/// use tempoid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_721_433_600_005
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_721_433_600_005);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since 1970-01-01 UTC.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
