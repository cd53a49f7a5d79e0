use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a [`SnowflakeId`] field as its native integer, rejecting
/// malformed values on the way back in.
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tempoid::{SnowflakeId, as_native};
///
/// #[derive(Serialize, Deserialize)]
/// struct Row {
///     #[serde(with = "as_native")]
///     id: SnowflakeId,
/// }
/// ```
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_raw().serialize(s)
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The reserved sign bit is set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = u64::deserialize(d)?;
        SnowflakeId::try_from_raw(n).map_err(serde::de::Error::custom)
    }
}

/// Serialize a [`SnowflakeId`] field as a decimal string.
///
/// Useful for JSON consumers (such as JavaScript) whose numbers cannot hold
/// every 64-bit integer exactly.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub mod as_string {
    use super::{Deserializer, Serializer};
    use crate::SnowflakeId;

    /// Serialize an ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal integer
    /// - The reserved sign bit is set
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal id string")
            }

            #[inline]
            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(serde::de::Error::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodedId, GeneratorConfig, SnowflakeId, StatsSnapshot};
    use serde_json::json;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native")]
        native: SnowflakeId,
        #[serde(with = "as_string")]
        text: SnowflakeId,
    }

    #[test]
    fn row_uses_both_representations() {
        let id = SnowflakeId::from_components(5, 7);
        let row = Row {
            native: id,
            text: id,
        };

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, json!({ "native": 20_971_527, "text": "20971527" }));

        let back: Row = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn sign_bit_is_rejected() {
        let bad_native = json!({ "native": u64::MAX, "text": "1" });
        assert!(serde_json::from_value::<Row>(bad_native).is_err());

        let bad_text = json!({ "native": 1, "text": "18446744073709551615" });
        assert!(serde_json::from_value::<Row>(bad_text).is_err());

        let not_a_number = json!({ "native": 1, "text": "abc" });
        assert!(serde_json::from_value::<Row>(not_a_number).is_err());
    }

    #[test]
    fn transparent_id_and_records() {
        let id = SnowflakeId::from_components(5, 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "20971527");

        let decoded = DecodedId::from_id(id, 1_721_433_600_000);
        let value = serde_json::to_value(decoded).unwrap();
        assert_eq!(value["timestamp_millis"], 1_721_433_600_005_u64);
        assert_eq!(value["sequence"], 7);

        let config = GeneratorConfig::default();
        let back: GeneratorConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(back, config);

        let snapshot = StatsSnapshot {
            total_generated: 3,
            clock_backward_events: 0,
            sequence_overflow_waits: 0,
            last_timestamp_millis: -1,
            current_timestamp_millis: 10,
            tolerance_millis: 5,
            ids_per_second: None,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["last_timestamp_millis"], -1);
        assert!(value["ids_per_second"].is_null());
    }
}
