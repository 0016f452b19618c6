//! Identifier and timestamp generation.
//!
//! Identifiers come straight from the OS random source via `uuid`; there is
//! no counter or registry to share between calls. Timestamps are taken from
//! the system clock and formatted by pure functions.

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

use crate::error::{SamlError, SamlResult};

/// Returns a fresh SAML identifier: `_` followed by a random v4 UUID.
///
/// The leading underscore keeps the value a valid `xs:ID`, which may not
/// start with a digit.
#[must_use]
pub fn new_id() -> String {
    format!("_{}", Uuid::new_v4())
}

/// Fractional-second precision of a formatted instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstantPrecision {
    /// `YYYY-MM-DDTHH:MM:SSZ`, used for requests.
    #[default]
    Seconds,
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, used for responses and assertions.
    Millis,
}

/// Returns the current UTC time.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Drops sub-second digits beyond `precision`.
#[must_use]
pub fn truncate(time: DateTime<Utc>, precision: InstantPrecision) -> DateTime<Utc> {
    match precision {
        InstantPrecision::Seconds => time.trunc_subsecs(0),
        InstantPrecision::Millis => time.trunc_subsecs(3),
    }
}

/// Formats `time` as an `xs:dateTime` in UTC.
#[must_use]
pub fn format_instant(time: DateTime<Utc>, precision: InstantPrecision) -> String {
    match precision {
        InstantPrecision::Seconds => time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        InstantPrecision::Millis => time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
    }
}

/// Parses an `xs:dateTime` value such as `IssueInstant`.
///
/// # Errors
///
/// Returns [`SamlError::XmlParse`] if the value is not an RFC 3339 timestamp.
pub fn parse_instant(value: &str) -> SamlResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| SamlError::XmlParse(format!("invalid instant '{value}': {e}")))
}
