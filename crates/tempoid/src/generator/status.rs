use crate::SnowflakeId;

/// Outcome of a non-blocking generation attempt.
///
/// - [`Poll::Ready`] carries a newly committed ID.
/// - [`Poll::Pending`] means the generator would have had to wait, either
///   because the sequence for the current millisecond is exhausted or because
///   the clock is behind (within tolerance). Nothing was committed; retry
///   after `yield_for` milliseconds.
///
/// # Example
///
/// ```
/// use tempoid::{GeneratorConfig, Poll, SnowflakeGenerator};
///
/// let generator = SnowflakeGenerator::with_system_clock(GeneratorConfig::default());
/// let id = loop {
///     match generator.try_poll_id().unwrap() {
///         Poll::Ready { id } => break id,
///         Poll::Pending { yield_for } => {
///             std::thread::sleep(std::time::Duration::from_millis(yield_for));
///         }
///     }
/// };
/// assert!(generator.is_valid(id.to_raw()));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// No ID could be generated without waiting.
    Pending {
        /// Milliseconds to wait before trying again.
        yield_for: u64,
    },
}
