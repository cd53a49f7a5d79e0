use crate::{Result, SnowflakeId};
use core::fmt;

/// An identifier split back into its absolute timestamp and sequence.
///
/// `timestamp_millis` is the offset plus the epoch of the generator that
/// decoded it, so the same raw ID decodes differently under different epochs.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedId {
    pub raw_id: u64,
    pub timestamp_millis: u64,
    pub timestamp_offset: u64,
    pub sequence: u64,
}

impl DecodedId {
    /// Decodes `raw` against `epoch_millis`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidIdFormat`] if the reserved sign bit is
    /// set.
    pub fn new(raw: u64, epoch_millis: u64) -> Result<Self> {
        let id = SnowflakeId::try_from_raw(raw)?;
        Ok(Self::from_id(id, epoch_millis))
    }

    pub fn from_id(id: SnowflakeId, epoch_millis: u64) -> Self {
        let timestamp_offset = id.timestamp_offset();
        Self {
            raw_id: id.to_raw(),
            timestamp_millis: timestamp_offset.saturating_add(epoch_millis),
            timestamp_offset,
            sequence: id.sequence(),
        }
    }

    /// Re-encodes the decoded fields; always equals the original raw value.
    pub const fn to_id(&self) -> SnowflakeId {
        SnowflakeId::from_components(self.timestamp_offset, self.sequence)
    }
}

impl fmt::Display for DecodedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (ts={}, seq={})",
            self.raw_id, self.timestamp_millis, self.sequence
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    const EPOCH: u64 = 1_721_433_600_000;

    #[test]
    fn adds_epoch_back() {
        let decoded = DecodedId::new(20_971_527, EPOCH).unwrap();
        assert_eq!(decoded.timestamp_millis, 1_721_433_600_005);
        assert_eq!(decoded.timestamp_offset, 5);
        assert_eq!(decoded.sequence, 7);
        assert_eq!(decoded.to_id().to_raw(), 20_971_527);
        assert_eq!(
            decoded.to_string(),
            "20971527 (ts=1721433600005, seq=7)"
        );
    }

    #[test]
    fn rejects_sign_bit() {
        assert!(matches!(
            DecodedId::new(u64::MAX, EPOCH),
            Err(Error::InvalidIdFormat { .. })
        ));
    }
}
