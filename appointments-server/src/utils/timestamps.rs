//! Wire format for appointment timestamps
//!
//! Appointment dates are naive local timestamps exchanged as
//! `yyyy-MM-ddTHH:mm:ss`: no offset, no fractional seconds. The same format is
//! used in both directions, so a value read from a request is echoed back
//! unchanged.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serializer};

/// `chrono` format string of the wire representation
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a wire timestamp. Rejects offsets and fractional seconds.
pub fn parse(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, WIRE_FORMAT)
}

/// Render a timestamp in wire format. Sub-second precision is dropped.
pub fn format(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// Current local wall-clock time, the reference for audit columns
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| {
        serde::de::Error::custom(format!(
            "invalid timestamp '{}': {} (expected yyyy-MM-ddTHH:mm:ss)",
            raw, e
        ))
    })
}

/// Same format for optional fields; `null` and absent map to `None`
pub mod option {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => super::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse(&raw).map(Some).map_err(|e| {
                serde::de::Error::custom(format!(
                    "invalid timestamp '{}': {} (expected yyyy-MM-ddTHH:mm:ss)",
                    raw, e
                ))
            }),
            None => Ok(None),
        }
    }
}
