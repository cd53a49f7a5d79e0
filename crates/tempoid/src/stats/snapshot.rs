/// A point-in-time view of a generator's statistics.
///
/// Taken without stopping concurrent generation, so it may lag or lead a
/// concurrent `generate` call by one step.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct StatsSnapshot {
    pub total_generated: u64,
    pub clock_backward_events: u64,
    pub sequence_overflow_waits: u64,
    /// `-1` until the first ID has been generated.
    pub last_timestamp_millis: i64,
    pub current_timestamp_millis: u64,
    pub tolerance_millis: u64,
    /// IDs per second since the previous snapshot.
    pub ids_per_second: Option<f64>,
}
