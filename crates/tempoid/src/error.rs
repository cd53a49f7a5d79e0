/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `tempoid` can emit.
///
/// Generation errors never coexist with a returned ID: a call either yields a
/// valid [`SnowflakeId`] or one of these, and a failed call leaves the
/// generator state exactly as it found it.
///
/// [`SnowflakeId`]: crate::SnowflakeId
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The wall clock stepped backward further than the configured tolerance.
    ///
    /// Usually an NTP step or a manual clock change. The call may be retried
    /// once the clock has caught up again.
    #[error(
        "clock moved backwards by {backward_millis}ms (tolerance {tolerance_millis}ms), refusing to generate"
    )]
    ClockRegressionExceeded {
        backward_millis: u64,
        tolerance_millis: u64,
    },

    /// The 41-bit timestamp field can no longer represent the current time.
    ///
    /// The generator must be redeployed with a later epoch.
    #[error("timestamp offset {offset_millis}ms exceeds the {max_offset_millis}ms capacity of the id layout")]
    CapacityExhausted {
        offset_millis: u64,
        max_offset_millis: u64,
    },

    /// The clock reads earlier than the configured epoch.
    #[error("clock reads {now_millis}ms which is before the epoch at {epoch_millis}ms")]
    ClockBeforeEpoch { now_millis: u64, epoch_millis: u64 },

    /// The input cannot be a [`SnowflakeId`] (negative, sign bit set, or not a
    /// decimal integer).
    ///
    /// [`SnowflakeId`]: crate::SnowflakeId
    #[error("invalid id format: {reason}")]
    InvalidIdFormat { reason: &'static str },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is never produced.
    #[error("generator lock poisoned")]
    LockPoisoned,

    /// A process-wide generator has already been installed.
    #[error("a global generator is already installed")]
    AlreadyInstalled,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
