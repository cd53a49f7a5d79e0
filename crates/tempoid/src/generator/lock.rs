use core::{cmp::Ordering, time::Duration};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Counters, DecodedId, Error, GeneratorConfig, Poll, RateWindow, Result, SnowflakeId,
    StatsSnapshot, SystemClock, TimeSource,
    generator::{Mutex, MutexGuard, lock_unpoisoned},
};

/// `last_timestamp` before the first ID has been generated.
const UNSET: i64 = -1;

/// One millisecond worth of IDs.
const MAX_PREALLOCATED_IDS: usize = SnowflakeId::max_sequence() as usize + 1;

#[derive(Clone, Copy, Debug)]
pub(crate) struct State {
    pub(crate) last_timestamp: i64,
    pub(crate) sequence: u64,
}

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// All generator state (last timestamp and per-millisecond sequence) sits
/// behind a single mutex, and every call to [`generate`] runs start to finish
/// while holding it. That includes the two waits the generator may perform:
///
/// - a sleep when the clock stepped backward by no more than the configured
///   tolerance, and
/// - a spin until the next millisecond when all 2^22 sequence values of the
///   current millisecond are used.
///
/// Share one instance (e.g. behind an `Arc`, or via [`install_global`]) to get
/// uniqueness across threads. Separate instances share nothing.
///
/// ## See Also
/// - [`Poll`] and [`SnowflakeGenerator::try_poll_id`] for a non-blocking step
///
/// [`generate`]: SnowflakeGenerator::generate
/// [`install_global`]: crate::install_global
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    config: GeneratorConfig,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<State>,
    counters: Counters,
    rate: Mutex<RateWindow>,
    time: T,
}

impl SnowflakeGenerator<SystemClock> {
    /// Creates a generator reading the host's wall clock.
    pub fn with_system_clock(config: GeneratorConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl Default for SnowflakeGenerator<SystemClock> {
    fn default() -> Self {
        Self::with_system_clock(GeneratorConfig::default())
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a new [`SnowflakeGenerator`] that has not generated anything
    /// yet.
    ///
    /// # Example
    /// ```
    /// use tempoid::{GeneratorConfig, SnowflakeGenerator, SystemClock, DEFAULT_EPOCH};
    ///
    /// let generator = SnowflakeGenerator::new(GeneratorConfig::new(DEFAULT_EPOCH), SystemClock);
    /// let a = generator.generate().unwrap();
    /// let b = generator.generate().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new(config: GeneratorConfig, time: T) -> Self {
        Self::from_state(config, time, UNSET, 0)
    }

    /// Creates a generator preloaded with explicit state.
    pub(crate) fn from_state(
        config: GeneratorConfig,
        time: T,
        last_timestamp: i64,
        sequence: u64,
    ) -> Self {
        debug_assert!(sequence <= SnowflakeId::max_sequence(), "sequence overflow");
        let state = Mutex::new(State {
            last_timestamp,
            sequence,
        });
        Self {
            config,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(state),
            #[cfg(not(feature = "cache-padded"))]
            state,
            counters: Counters::new(),
            rate: Mutex::new(RateWindow::new()),
            time,
        }
    }

    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the next ID, waiting if necessary.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegressionExceeded`] if the clock is behind the last
    ///   generated timestamp by more than the tolerance
    /// - [`Error::ClockBeforeEpoch`] if the clock reads earlier than the epoch
    /// - [`Error::CapacityExhausted`] once the 41-bit timestamp range is used
    ///   up
    /// - [`Error::LockPoisoned`] if another thread panicked mid-generation
    ///
    /// No state is changed when an error is returned.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        let mut state = self.lock_state()?;
        self.next_locked(&mut state)
    }

    /// Generates `count` IDs under a single lock acquisition.
    ///
    /// Fails fast: on the first error the whole batch is discarded and only
    /// the error is returned. IDs minted before the failure are still
    /// consumed (they will never be handed out again).
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate_many(&self, count: usize) -> Result<Vec<SnowflakeId>> {
        // the lock is held for the whole batch, so `count` is only a hint
        let mut ids = Vec::with_capacity(count.min(MAX_PREALLOCATED_IDS));
        let mut state = self.lock_state()?;
        for _ in 0..count {
            ids.push(self.next_locked(&mut state)?);
        }
        Ok(ids)
    }

    /// Attempts to generate the next ID without sleeping or spinning.
    ///
    /// Where [`generate`] would wait, this returns [`Poll::Pending`] and leaves
    /// the state untouched. Only `total_generated` is counted on this path.
    ///
    /// # Errors
    ///
    /// Same as [`SnowflakeGenerator::generate`].
    ///
    /// [`generate`]: SnowflakeGenerator::generate
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut state = self.lock_state()?;
        let now = self.now();

        let sequence = match now.cmp(&state.last_timestamp) {
            Ordering::Greater => 0,
            Ordering::Equal => {
                if state.sequence < SnowflakeId::max_sequence() {
                    state.sequence + 1
                } else {
                    return Ok(Poll::Pending { yield_for: 1 });
                }
            }
            Ordering::Less => {
                let backward = self.check_regression(now, state.last_timestamp)?;
                // same wait as the blocking path
                return Ok(Poll::Pending {
                    yield_for: backward + 1,
                });
            }
        };

        let offset = self.encode(now)?;
        Ok(Poll::Ready {
            id: self.commit(&mut state, now, offset, sequence),
        })
    }

    /// Decodes `id` against this generator's epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdFormat`] if the reserved sign bit is set.
    pub fn decode(&self, id: u64) -> Result<DecodedId> {
        DecodedId::new(id, self.config.epoch_millis())
    }

    /// Returns `true` if `id` decodes to a timestamp between the epoch and
    /// now, inclusive. Never fails.
    ///
    /// The answer depends on the current time: an ID that is not yet valid
    /// (timestamp in the future) may become valid later.
    pub fn is_valid(&self, id: u64) -> bool {
        let Ok(decoded) = self.decode(id) else {
            return false;
        };
        let now = self.time.current_millis();
        (self.config.epoch_millis()..=now).contains(&decoded.timestamp_millis)
    }

    /// Takes a snapshot of the monitoring counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        let last_timestamp_millis = lock_unpoisoned(self.state_mutex()).last_timestamp;
        let current_timestamp_millis = self.time.current_millis();
        let total_generated = self.counters.total_generated();
        let ids_per_second =
            lock_unpoisoned(&self.rate).sample(total_generated, current_timestamp_millis);

        StatsSnapshot {
            total_generated,
            clock_backward_events: self.counters.clock_backward_events(),
            sequence_overflow_waits: self.counters.sequence_overflow_waits(),
            last_timestamp_millis,
            current_timestamp_millis,
            tolerance_millis: self.config.tolerance_millis(),
            ids_per_second,
        }
    }

    /// Zeroes the counters and the rate window. Generation state is kept.
    pub fn reset_statistics(&self) {
        self.counters.reset();
        lock_unpoisoned(&self.rate).reset();
    }

    #[inline]
    fn state_mutex(&self) -> &Mutex<State> {
        &self.state
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, State>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state_mutex().lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state_mutex().lock()?)
        }
    }

    #[inline]
    fn now(&self) -> i64 {
        i64::try_from(self.time.current_millis()).unwrap_or(i64::MAX)
    }

    /// One step of the state machine. The caller holds the state lock.
    fn next_locked(&self, state: &mut State) -> Result<SnowflakeId> {
        let mut now = self.now();

        while now < state.last_timestamp {
            now = self.cold_clock_behind(now, state.last_timestamp)?;
        }

        let sequence = if now == state.last_timestamp {
            let next = (state.sequence + 1) & SnowflakeId::SEQUENCE_MASK;
            if next == 0 {
                now = self.cold_sequence_exhausted(state.last_timestamp)?;
            }
            next
        } else {
            0
        };

        let offset = self.encode(now)?;
        Ok(self.commit(state, now, offset, sequence))
    }

    #[inline]
    fn commit(&self, state: &mut State, now: i64, offset: u64, sequence: u64) -> SnowflakeId {
        state.last_timestamp = now;
        state.sequence = sequence;
        self.counters.record_generated(1);
        SnowflakeId::from_components(offset, sequence)
    }

    /// Computes the timestamp offset for `now`, checking it fits the layout.
    fn encode(&self, now: i64) -> Result<u64> {
        let now_millis = now.unsigned_abs();
        let epoch_millis = self.config.epoch_millis();
        let Some(offset) = now_millis.checked_sub(epoch_millis) else {
            return Err(Error::ClockBeforeEpoch {
                now_millis,
                epoch_millis,
            });
        };
        if offset > SnowflakeId::max_timestamp_offset() {
            return Err(Self::cold_capacity_exhausted(offset));
        }
        Ok(offset)
    }

    /// Returns how far the clock is behind, or the fatal error if that is
    /// beyond tolerance.
    fn check_regression(&self, now: i64, last_timestamp: i64) -> Result<u64> {
        let backward_millis = last_timestamp.abs_diff(now);
        let tolerance_millis = self.config.tolerance_millis();
        if backward_millis > tolerance_millis {
            #[cfg(feature = "tracing")]
            tracing::error!(
                backward_millis,
                tolerance_millis,
                "clock moved backwards beyond tolerance"
            );
            return Err(Error::ClockRegressionExceeded {
                backward_millis,
                tolerance_millis,
            });
        }
        Ok(backward_millis)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, now: i64, last_timestamp: i64) -> Result<i64> {
        let backward_millis = self.check_regression(now, last_timestamp)?;
        self.counters.record_clock_backward();
        #[cfg(feature = "tracing")]
        tracing::warn!(backward_millis, "clock moved backwards, waiting for it to catch up");
        std::thread::sleep(Duration::from_millis(backward_millis + 1));
        Ok(self.now())
    }

    #[cold]
    #[inline(never)]
    fn cold_sequence_exhausted(&self, last_timestamp: i64) -> Result<i64> {
        #[cfg(feature = "tracing")]
        tracing::warn!(last_timestamp, "sequence exhausted, spinning until next millisecond");
        loop {
            let now = self.now();
            match now.cmp(&last_timestamp) {
                Ordering::Greater => {
                    self.counters.record_overflow_wait();
                    return Ok(now);
                }
                // a step back while spinning must not outlast the tolerance
                Ordering::Less => {
                    self.check_regression(now, last_timestamp)?;
                }
                Ordering::Equal => {}
            }
            core::hint::spin_loop();
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_capacity_exhausted(offset_millis: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(offset_millis, "timestamp range of the id layout is exhausted");
        Error::CapacityExhausted {
            offset_millis,
            max_offset_millis: SnowflakeId::max_timestamp_offset(),
        }
    }
}
