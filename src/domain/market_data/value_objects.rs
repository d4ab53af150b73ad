use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use derive_more::{Constructor, Deref, Display, From, Into};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Value Object - quoted price
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Default, From, Into, Constructor, Serialize, Deserialize,
)]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Value Object - stock identifier, kept exactly as the supplier sent it
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deref, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Value Object - observation time of a tick, UTC.
///
/// Accepts epoch milliseconds or a date-time string on input; always
/// serializes as epoch milliseconds, which is what a `date` column takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Timestamp {
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Parse `YYYY-MM-DD HH:MM:SS[.ffffff]` (assumed UTC) or RFC 3339.
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(parsed.with_timezone(&Utc)));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|naive| Self(naive.and_utc()))
            .ok_or_else(|| format!("unrecognised timestamp `{}`", value))
    }

    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S%.6f"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_millis())
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("epoch milliseconds or a date-time string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
        Timestamp::from_millis(v).ok_or_else(|| E::custom(format!("timestamp {} out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
        let millis = i64::try_from(v).map_err(|_| E::custom(format!("timestamp {} out of range", v)))?;
        self.visit_i64(millis)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
        let nanos = (v * 1_000_000.0).round();
        if !(i64::MIN as f64..i64::MAX as f64).contains(&nanos) {
            return Err(E::custom(format!("timestamp {} out of range", v)));
        }
        Ok(Timestamp(Utc.timestamp_nanos(nanos as i64)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        Timestamp::parse(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_server_format_with_microseconds() {
        let ts = Timestamp::parse("2019-02-01 14:09:46.286305").unwrap();
        assert_eq!(ts.as_millis(), 1_549_030_186_286);
        assert_eq!(ts.to_string(), "2019-02-01 14:09:46.286305");
    }

    #[test]
    fn parses_without_fraction_and_rfc3339() {
        let plain = Timestamp::parse("2019-02-01 14:09:46").unwrap();
        let rfc = Timestamp::parse("2019-02-01T14:09:46Z").unwrap();
        assert_eq!(plain, rfc);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn numbers_are_epoch_millis() {
        let ts: Timestamp = serde_json::from_str("1549030186286").unwrap();
        assert_eq!(ts.as_millis(), 1_549_030_186_286);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1549030186286");
    }

    #[test]
    fn fractional_millis_are_accepted() {
        let ts: Timestamp = serde_json::from_str("1549030186286.5").unwrap();
        assert_eq!(ts.as_millis(), 1_549_030_186_286);
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert!(serde_json::from_str::<Timestamp>("1e300").is_err());
        assert!(serde_json::from_str::<Timestamp>("-1e300").is_err());
        assert!(serde_json::from_str::<Timestamp>("9223372036854775807").is_err());
    }
}
