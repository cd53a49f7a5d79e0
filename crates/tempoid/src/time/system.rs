use crate::TimeSource;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH as SYSTEM_UNIX_EPOCH};

/// Default epoch: Saturday, July 20, 2024 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_721_433_600_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// The host's wall clock.
///
/// Every call is a `SystemTime::now()` syscall, so readings follow NTP steps
/// and manual adjustments, including backward ones. A clock set before 1970
/// reads as `0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(SYSTEM_UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_default_epoch() {
        let now = SystemClock.current_millis();
        assert!(now > DEFAULT_EPOCH.as_millis() as u64);
    }

    #[test]
    fn epochs_are_ordered() {
        assert!(UNIX_EPOCH < TWITTER_EPOCH);
        assert!(TWITTER_EPOCH < DISCORD_EPOCH);
        assert!(DISCORD_EPOCH < DEFAULT_EPOCH);
    }
}
