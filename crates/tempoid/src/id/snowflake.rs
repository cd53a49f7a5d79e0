use crate::{Error, Result};
use core::{fmt, str::FromStr};

/// Packs a timestamp offset and a sequence into a raw 64-bit identifier.
///
/// Both fields must already be in range; this is checked in debug builds only.
#[inline]
pub const fn encode(timestamp_offset: u64, sequence: u64) -> u64 {
    debug_assert!(
        timestamp_offset <= SnowflakeId::TIMESTAMP_MASK,
        "timestamp overflow"
    );
    debug_assert!(sequence <= SnowflakeId::SEQUENCE_MASK, "sequence overflow");
    ((timestamp_offset & SnowflakeId::TIMESTAMP_MASK) << SnowflakeId::TIMESTAMP_SHIFT)
        | (sequence & SnowflakeId::SEQUENCE_MASK)
}

/// Splits a raw identifier into `(timestamp_offset, sequence)`.
///
/// The sign bit is masked away; use [`SnowflakeId::is_well_formed`] to reject
/// such input first.
#[inline]
pub const fn decode(id: u64) -> (u64, u64) {
    (
        (id >> SnowflakeId::TIMESTAMP_SHIFT) & SnowflakeId::TIMESTAMP_MASK,
        id & SnowflakeId::SEQUENCE_MASK,
    )
}

/// A 64-bit time-ordered identifier.
///
/// - 1 bit reserved (always zero, keeps the value a non-negative `i64`)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 22 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             0
///              +--------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | sequence (22) |
///              +--------------+----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB -->|
/// ```
///
/// The raw integer sorts the same way as `(timestamp, sequence)`, so IDs from
/// one generator can be compared directly.
///
/// # Example
///
/// ```
/// use tempoid::SnowflakeId;
///
/// let id = SnowflakeId::from_components(5, 7);
/// assert_eq!(id.to_raw(), 20_971_527);
/// assert_eq!(id.timestamp_offset(), 5);
/// assert_eq!(id.sequence(), 7);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 22;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 22-bit sequence field. Occupies bits 0
    /// through 21.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 = Self::SEQUENCE_BITS;

    /// The reserved most significant bit.
    pub const SIGN_BIT: u64 = 1 << 63;

    /// Builds an ID from its two fields.
    ///
    /// # Panics
    ///
    /// In debug builds, if either field exceeds its mask.
    pub const fn from_components(timestamp_offset: u64, sequence: u64) -> Self {
        Self {
            id: encode(timestamp_offset, sequence),
        }
    }

    /// Extracts the timestamp offset (milliseconds since the epoch).
    pub const fn timestamp_offset(&self) -> u64 {
        decode(self.id).0
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        decode(self.id).1
    }

    /// Returns the largest representable timestamp offset.
    pub const fn max_timestamp_offset() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the largest sequence value within one millisecond.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the raw integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw integer without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the reserved sign bit is clear.
    pub const fn is_well_formed(&self) -> bool {
        self.id & Self::SIGN_BIT == 0
    }

    /// Wraps a raw integer, rejecting values with the reserved bit set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdFormat`] if the sign bit is set.
    pub const fn try_from_raw(raw: u64) -> Result<Self> {
        let id = Self::from_raw(raw);
        if id.is_well_formed() {
            Ok(id)
        } else {
            Err(Error::InvalidIdFormat {
                reason: "reserved sign bit is set",
            })
        }
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("{:#066b}", self.id))
            .field("timestamp_offset", &self.timestamp_offset())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl TryFrom<u64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: u64) -> Result<Self> {
        Self::try_from_raw(raw)
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(raw: i64) -> Result<Self> {
        let raw = u64::try_from(raw).map_err(|_| Error::InvalidIdFormat {
            reason: "negative value",
        })?;
        Ok(Self::from_raw(raw))
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidIdFormat {
                reason: "expected a decimal integer",
            });
        }
        let raw = s.parse::<u64>().map_err(|_| Error::InvalidIdFormat {
            reason: "value does not fit in 64 bits",
        })?;
        Self::try_from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout_matches_reference_value() {
        // clock 1_721_433_600_005 against epoch 1_721_433_600_000, sequence 7
        assert_eq!(encode(5, 7), (5 << 22) | 7);
        assert_eq!(encode(5, 7), 20_971_527);
        assert_eq!(decode(20_971_527), (5, 7));
    }

    #[test]
    fn fields_and_bounds() {
        let ts = SnowflakeId::max_timestamp_offset();
        let seq = SnowflakeId::max_sequence();

        let id = SnowflakeId::from_components(ts, seq);
        println!("ID: {id:?}");
        assert_eq!(id.timestamp_offset(), ts);
        assert_eq!(id.sequence(), seq);
        assert!(id.is_well_formed());
        assert_eq!(id.to_raw(), i64::MAX as u64);
    }

    #[test]
    fn ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, SnowflakeId::max_sequence());
        let b = SnowflakeId::from_components(11, 0);
        let c = SnowflakeId::from_components(11, 1);
        assert!(a < b && b < c);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = SnowflakeId::max_timestamp_offset() + 1;
        SnowflakeId::from_components(ts, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = SnowflakeId::max_sequence() + 1;
        SnowflakeId::from_components(0, seq);
    }

    #[test]
    fn sign_bit_is_rejected() {
        let raw = SnowflakeId::SIGN_BIT | 42;
        assert!(!SnowflakeId::from_raw(raw).is_well_formed());
        assert!(matches!(
            SnowflakeId::try_from(raw),
            Err(Error::InvalidIdFormat { .. })
        ));
    }

    #[test]
    fn negative_i64_is_rejected() {
        assert!(matches!(
            SnowflakeId::try_from(-1_i64),
            Err(Error::InvalidIdFormat { .. })
        ));
        assert_eq!(
            SnowflakeId::try_from(20_971_527_i64).map(|id| id.sequence()),
            Ok(7)
        );
    }

    #[test]
    fn parses_decimal_strings() {
        let id: SnowflakeId = "20971527".parse().unwrap();
        assert_eq!(id.timestamp_offset(), 5);
        assert_eq!(id.to_string(), "20971527");
        assert_eq!(id.to_padded_string(), "00000000000020971527");

        for bad in ["", "-1", "12a", " 1", "18446744073709551616", "9223372036854775808"] {
            assert!(
                matches!(bad.parse::<SnowflakeId>(), Err(Error::InvalidIdFormat { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
