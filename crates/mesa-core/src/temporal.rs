//! # Temporal Types: Reference Timestamps and Injected Clocks
//!
//! References carry the moment they were created. Timestamp generation is
//! not part of the enforcement policy, so the [`ReferenceBuilder`] takes a
//! [`Clock`] instead of reading the system time itself; tests pin time with
//! [`FixedClock`].
//!
//! Timestamps are UTC, truncated to seconds, and render as
//! `YYYY-MM-DDTHH:MM:SSZ` (e.g. `2025-11-08T00:00:00Z`).
//!
//! [`ReferenceBuilder`]: crate::ReferenceBuilder

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::MesaError;

/// A UTC timestamp with seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// From a `DateTime<Utc>`, discarding sub-second precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Parse an RFC 3339 string with a `Z` suffix.
    ///
    /// Explicit offsets (including `+00:00`) are rejected so that every
    /// serialized reference uses the same textual form.
    pub fn parse(s: &str) -> Result<Self, MesaError> {
        if !s.ends_with('Z') {
            return Err(MesaError::Timestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| MesaError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self::from_utc(dt.with_timezone(&Utc)))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with `Z` suffix.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> Self {
        ts.to_iso8601()
    }
}

impl TryFrom<String> for Timestamp {
    type Error = MesaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

/// Source of creation timestamps for references.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2025, 11, 8, 0, 0, 0)
            .unwrap()
            .with_nanosecond(987_654_321)
            .unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_iso8601(), "2025-11-08T00:00:00Z");
    }

    #[test]
    fn test_parse_accepts_z_only() {
        assert!(Timestamp::parse("2025-11-08T00:00:00Z").is_ok());
        assert!(Timestamp::parse("2025-11-08T00:00:00+00:00").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_serializes_as_iso_string() {
        let ts = Timestamp::parse("2025-11-08T00:00:00Z").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2025-11-08T00:00:00Z\"");
        let back: Timestamp = serde_json::from_str("\"2025-11-08T00:00:00Z\"").unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_fixed_clock_is_stable() {
        let ts = Timestamp::parse("2025-11-08T00:00:00Z").unwrap();
        let clock = FixedClock(ts);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), ts);
    }
}
