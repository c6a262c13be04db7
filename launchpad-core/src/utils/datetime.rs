//! `DateTime<Utc>` <-> RFC3339 string helpers for `#[serde(with = ...)]`.
//!
//! Stored documents always carry RFC3339 strings; Unix timestamps (seconds or
//! milliseconds) are accepted on read for records written by external tools.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Unix(i64),
}

impl RawTimestamp {
    fn into_datetime<E: serde::de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            Self::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("Invalid RFC3339 timestamp '{s}': {e}"))),
            Self::Unix(ts) => {
                // 大于 10^11 视为毫秒
                let parsed = if ts > 100_000_000_000 {
                    DateTime::from_timestamp_millis(ts)
                } else {
                    DateTime::from_timestamp(ts, 0)
                };
                parsed.ok_or_else(|| E::custom(format!("Invalid Unix timestamp {ts}")))
            }
        }
    }
}

pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    RawTimestamp::deserialize(deserializer)?.into_datetime()
}

/// Same encoding for `Option<DateTime<Utc>>`; `None` is `null`.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, RawTimestamp, Serializer, Utc};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawTimestamp>::deserialize(deserializer)?
            .map(RawTimestamp::into_datetime)
            .transpose()
    }
}
