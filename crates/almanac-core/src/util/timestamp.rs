//! Timestamp decomposition into calendar components.
//!
//! ## Summary
//! Converts a point in time into `[year, month, day, hour, minute]`, read
//! either through the host's local offset or in UTC. Inputs that cannot be
//! turned into an instant yield `NaN` in every slot instead of an error.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::Deserialize;

use crate::error::CoreError;

/// Ordered `[year, month (1-based), day, hour, minute]`.
pub type DateArray = [f64; 5];

/// Largest representable distance from the epoch, in milliseconds (±100,000,000 days).
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Which clock the components are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    #[default]
    Local,
    Utc,
}

impl Representation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }
}

impl FromStr for Representation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(CoreError::InvalidInput(format!(
                "unknown time representation: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Representation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can name an instant.
#[derive(Debug, Clone, PartialEq)]
pub enum TimestampInput {
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// An already resolved instant.
    Instant(DateTime<Utc>),
    /// Date or date-time text.
    Text(String),
}

impl TimestampInput {
    /// ## Summary
    /// Resolves the input to an instant, or `None` when it names no valid time.
    ///
    /// Text is accepted as RFC 3339, as a bare `YYYY-MM-DD` (UTC midnight), or
    /// as a zoneless date-time read on the local clock.
    #[must_use]
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => instant_from_millis(*ms),
            Self::Instant(dt) => Some(*dt),
            Self::Text(text) => instant_from_text(text),
        }
    }
}

impl From<i64> for TimestampInput {
    #[expect(
        clippy::cast_precision_loss,
        reason = "Epoch milliseconds inside the valid range fit in an f64 mantissa"
    )]
    fn from(ms: i64) -> Self {
        Self::Millis(ms as f64)
    }
}

impl From<f64> for TimestampInput {
    fn from(ms: f64) -> Self {
        Self::Millis(ms)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimestampInput {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::Instant(dt.with_timezone(&Utc))
    }
}

impl From<&str> for TimestampInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TimestampInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Range is checked against MAX_EPOCH_MILLIS before the cast"
)]
fn instant_from_millis(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
}

fn instant_from_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Converts a timestamp into `[year, month, day, hour, minute]`.
///
/// The month is reported 1-based. Inputs that do not resolve to an instant
/// produce `NaN` for every component.
#[must_use]
pub fn convert_timestamp_to_array(
    timestamp: impl Into<TimestampInput>,
    representation: Representation,
) -> DateArray {
    let Some(instant) = timestamp.into().to_instant() else {
        tracing::trace!("Timestamp did not resolve to an instant");
        return [f64::NAN; 5];
    };

    match representation {
        Representation::Local => components(&instant.with_timezone(&Local)),
        Representation::Utc => components(&instant),
    }
}

fn components<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateArray {
    [
        f64::from(dt.year()),
        f64::from(dt.month0() + 1),
        f64::from(dt.day()),
        f64::from(dt.hour()),
        f64::from(dt.minute()),
    ]
}
