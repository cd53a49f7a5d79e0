mod counters;
mod rate;
mod snapshot;

pub use counters::*;
pub(crate) use rate::*;
pub use snapshot::*;
