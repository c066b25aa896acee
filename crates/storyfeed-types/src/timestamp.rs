use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// An instant stored as milliseconds since the UNIX epoch.
///
/// Stories written by older clients carry `createdAt` either as a number of
/// milliseconds or as an RFC 3339 string. Both decode into the same value and
/// the canonical encoding is always the integer form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wrap a raw millisecond count.
    pub const fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    /// The epoch itself.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Milliseconds since the epoch.
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Convert to a UTC datetime.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, TypeError> {
        Utc.timestamp_millis_opt(self.0)
            .single()
            .ok_or(TypeError::TimestampOutOfRange(self.0))
    }

    /// RFC 2822 rendering, as RSS `pubDate` expects.
    pub fn to_rfc2822(&self) -> Result<String, TypeError> {
        self.to_datetime().map(|dt| dt.to_rfc2822())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(ms) = trimmed.parse::<i64>() {
            return Ok(Self(ms));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.timestamp_millis()))
            .map_err(|_| TypeError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Ok(dt) => write!(f, "{}", dt.to_rfc3339()),
            Err(_) => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("epoch milliseconds or an RFC 3339 string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Ok(Timestamp(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        i64::try_from(v)
            .map(Timestamp)
            .map_err(|_| E::custom(format!("timestamp {v} does not fit in i64")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        if v.is_finite() {
            Ok(Timestamp(v.trunc() as i64))
        } else {
            Err(E::custom("non-finite timestamp"))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        v.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_integer_millis() {
        let ts: Timestamp = serde_json::from_str("1546300800000").unwrap();
        assert_eq!(ts.as_millis(), 1_546_300_800_000);
    }

    #[test]
    fn decodes_float_millis() {
        let ts: Timestamp = serde_json::from_str("1546300800000.7").unwrap();
        assert_eq!(ts.as_millis(), 1_546_300_800_000);
    }

    #[test]
    fn decodes_rfc3339_string() {
        let ts: Timestamp = serde_json::from_str("\"2019-01-01T00:00:00.000Z\"").unwrap();
        assert_eq!(ts.as_millis(), 1_546_300_800_000);
    }

    #[test]
    fn decodes_numeric_string() {
        let ts: Timestamp = serde_json::from_str("\"1546300800000\"").unwrap();
        assert_eq!(ts.as_millis(), 1_546_300_800_000);
    }

    #[test]
    fn rejects_garbage_string() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
        assert!(serde_json::from_str::<Timestamp>("true").is_err());
    }

    #[test]
    fn serializes_as_integer() {
        let ts = Timestamp::from_millis(42);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "42");
    }

    #[test]
    fn rfc2822_rendering() {
        let ts = Timestamp::from_millis(1_546_300_800_000);
        let rendered = ts.to_rfc2822().unwrap();
        assert!(rendered.starts_with("Tue, "));
        assert!(rendered.ends_with("Jan 2019 00:00:00 +0000"));
    }

    #[test]
    fn out_of_range_is_an_error() {
        let ts = Timestamp::from_millis(i64::MAX);
        assert_eq!(
            ts.to_datetime().unwrap_err(),
            TypeError::TimestampOutOfRange(i64::MAX)
        );
    }

    #[test]
    fn ordering_follows_millis() {
        assert!(Timestamp::from_millis(1) < Timestamp::from_millis(2));
        assert_eq!(Timestamp::default(), Timestamp::zero());
    }

    #[test]
    fn display_is_rfc3339() {
        let ts = Timestamp::from_millis(0);
        assert_eq!(ts.to_string(), "1970-01-01T00:00:00+00:00");
    }
}
