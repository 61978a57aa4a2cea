//! Resolution of caller-supplied dates into iCalendar DATE / DATE-TIME values.

use almanac_core::{Representation, TimestampInput};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::DateInput;
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{Date, DateTime, DateTimeForm, Property};

/// A resolved calendar time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeValue {
    /// All-day date.
    Date(Date),
    /// Date with time of day, UTC or floating.
    DateTime(DateTime),
}

impl TimeValue {
    /// Wraps the value in a property named `name`.
    #[must_use]
    pub fn into_property(self, name: &str) -> Property {
        match self {
            Self::Date(d) => Property::date(name, d),
            Self::DateTime(dt) => Property::datetime(name, dt),
        }
    }
}

/// ## Summary
/// Resolves `input` into a calendar time.
///
/// Component arrays are read on the `input` clock (local wall time or UTC);
/// three components yield an all-day date. The resulting instant is written
/// as UTC, or as floating local wall time when `output` is `Local`.
///
/// ## Errors
/// Returns `RfcError::ValidationError` naming `field` if the input has the
/// wrong number of components, names a non-existent date or time, or cannot
/// be written in the basic iCalendar form.
pub fn resolve_date(
    field: &str,
    input: &DateInput,
    input_clock: Representation,
    output: Representation,
) -> RfcResult<TimeValue> {
    let instant = match input {
        DateInput::Parts(parts) => match parts.as_slice() {
            [year, month, day] => return all_day(field, *year, *month, *day).map(TimeValue::Date),
            [year, month, day, hour, minute] => {
                let naive = wall_clock(field, [*year, *month, *day, *hour, *minute, 0])?;
                on_clock(field, &naive, input_clock)?
            }
            [year, month, day, hour, minute, second] => {
                let naive = wall_clock(field, [*year, *month, *day, *hour, *minute, *second])?;
                on_clock(field, &naive, input_clock)?
            }
            _ => {
                return Err(invalid(
                    field,
                    &format!("expected 3, 5 or 6 components, got {}", parts.len()),
                ));
            }
        },
        DateInput::Millis(ms) => TimestampInput::Millis(*ms)
            .to_instant()
            .ok_or_else(|| invalid(field, "epoch milliseconds out of range"))?,
        DateInput::Text(text) => TimestampInput::Text(text.clone())
            .to_instant()
            .ok_or_else(|| invalid(field, &format!("unrecognised date text {text:?}")))?,
    };

    let (naive, form) = match output {
        Representation::Utc => (instant.naive_utc(), DateTimeForm::Utc),
        Representation::Local => (
            instant.with_timezone(&Local).naive_local(),
            DateTimeForm::Floating,
        ),
    };

    DateTime::from_naive(&naive, form)
        .map(TimeValue::DateTime)
        .ok_or_else(|| invalid(field, "year outside 0..=9999"))
}

fn all_day(field: &str, year: i64, month: i64, day: i64) -> RfcResult<Date> {
    let date = naive_date(field, year, month, day)?;
    let year = u16::try_from(year)
        .ok()
        .filter(|y| *y <= 9999)
        .ok_or_else(|| invalid(field, "year outside 0..=9999"))?;
    // month and day were range-checked by chrono
    let month = u8::try_from(month).map_err(|e| invalid(field, &e.to_string()))?;
    let day = u8::try_from(day).map_err(|e| invalid(field, &e.to_string()))?;

    tracing::trace!(field, %date, "Resolved all-day date");
    Ok(Date::new(year, month, day))
}

fn naive_date(field: &str, year: i64, month: i64, day: i64) -> RfcResult<NaiveDate> {
    let year = i32::try_from(year).map_err(|e| invalid(field, &e.to_string()))?;
    let month = u32::try_from(month).map_err(|e| invalid(field, &e.to_string()))?;
    let day = u32::try_from(day).map_err(|e| invalid(field, &e.to_string()))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| invalid(field, &format!("{year:04}-{month:02}-{day:02} is not a date")))
}

fn wall_clock(field: &str, [year, month, day, hour, minute, second]: [i64; 6]) -> RfcResult<NaiveDateTime> {
    let date = naive_date(field, year, month, day)?;
    let hour = u32::try_from(hour).map_err(|e| invalid(field, &e.to_string()))?;
    let minute = u32::try_from(minute).map_err(|e| invalid(field, &e.to_string()))?;
    let second = u32::try_from(second).map_err(|e| invalid(field, &e.to_string()))?;

    date.and_hms_opt(hour, minute, second).ok_or_else(|| {
        invalid(
            field,
            &format!("{hour:02}:{minute:02}:{second:02} is not a time of day"),
        )
    })
}

fn on_clock(
    field: &str,
    naive: &NaiveDateTime,
    clock: Representation,
) -> RfcResult<chrono::DateTime<Utc>> {
    match clock {
        Representation::Utc => Ok(naive.and_utc()),
        Representation::Local => Local
            .from_local_datetime(naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| invalid(field, &format!("{naive} does not exist on the local clock"))),
    }
}

fn invalid(field: &str, message: &str) -> RfcError {
    RfcError::ValidationError(format!("{field}: {message}"))
}
