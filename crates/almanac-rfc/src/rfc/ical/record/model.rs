//! Typed shapes of header and event attributes.

use almanac_core::Representation;
use serde::Deserialize;

use crate::rfc::ical::core::Duration;

/// Validated calendar-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarHeader {
    pub product_id: String,
    pub method: String,
    pub cal_scale: String,
    #[serde(default)]
    pub cal_name: Option<String>,
}

/// A date as callers may express it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
    /// `[year, month, day]` for an all-day date, or
    /// `[year, month, day, hour, minute]` (optionally with seconds).
    Parts(Vec<i64>),
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// RFC 3339 or `YYYY-MM-DD` text.
    Text(String),
}

/// A duration expressed as named components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DurationInput {
    pub before: bool,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationInput {
    #[must_use]
    pub fn to_duration(self) -> Duration {
        Duration::builder()
            .negative(self.before)
            .weeks(self.weeks)
            .days(self.days)
            .hours(self.hours)
            .minutes(self.minutes)
            .seconds(self.seconds)
            .build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Geo {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Tentative,
    Confirmed,
    Cancelled,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tentative => "TENTATIVE",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BusyStatus {
    Free,
    Busy,
    Tentative,
    Oof,
}

impl BusyStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "FREE",
            Self::Busy => "BUSY",
            Self::Tentative => "TENTATIVE",
            Self::Oof => "OOF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Transparency {
    Opaque,
    Transparent,
}

impl Transparency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Opaque => "OPAQUE",
            Self::Transparent => "TRANSPARENT",
        }
    }
}

/// An organizer or other calendar user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<String>,
    pub dir: Option<String>,
    pub sent_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub dir: Option<String>,
    pub rsvp: Option<bool>,
    pub partstat: Option<String>,
    pub role: Option<String>,
    pub cutype: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmAction {
    Display,
    Audio,
    Email,
}

impl AlarmAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Display => "DISPLAY",
            Self::Audio => "AUDIO",
            Self::Email => "EMAIL",
        }
    }
}

/// When an alarm fires: an absolute date, or an offset from the event start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AlarmTrigger {
    Absolute(DateInput),
    Relative(DurationInput),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alarm {
    pub action: AlarmAction,
    pub trigger: Option<AlarmTrigger>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub repeat: Option<u32>,
    pub duration: Option<DurationInput>,
    pub attach: Option<String>,
}

/// Event attributes after type checking, before domain rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    pub uid: String,
    pub title: String,
    pub timestamp: DateInput,
    pub start: DateInput,
    #[serde(default)]
    pub start_input_type: Representation,
    pub start_output_type: Option<Representation>,
    pub end: Option<DateInput>,
    pub end_input_type: Option<Representation>,
    pub end_output_type: Option<Representation>,
    pub duration: Option<DurationInput>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    pub geo: Option<Geo>,
    pub status: Option<EventStatus>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub organizer: Option<Person>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default)]
    pub alarms: Vec<Alarm>,
    pub recurrence_rule: Option<String>,
    #[serde(default)]
    pub exclusion_dates: Vec<DateInput>,
    pub sequence: Option<u32>,
    pub created: Option<DateInput>,
    pub last_modified: Option<DateInput>,
    pub html_content: Option<String>,
    pub busy_status: Option<BusyStatus>,
    pub transp: Option<Transparency>,
    pub classification: Option<String>,
}

impl EventFields {
    /// Output representation for the start, UTC unless asked otherwise.
    #[must_use]
    pub fn start_output(&self) -> Representation {
        self.start_output_type.unwrap_or(Representation::Utc)
    }

    /// Input representation for the end, inheriting the start's.
    #[must_use]
    pub fn end_input(&self) -> Representation {
        self.end_input_type.unwrap_or(self.start_input_type)
    }

    /// Output representation for the end, inheriting the start's.
    #[must_use]
    pub fn end_output(&self) -> Representation {
        self.end_output_type.unwrap_or_else(|| self.start_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn date_input_shapes() {
        let parts: DateInput = serde_json::from_value(json!([2026, 1, 2])).unwrap();
        assert_eq!(parts, DateInput::Parts(vec![2026, 1, 2]));

        let millis: DateInput = serde_json::from_value(json!(1_767_225_600_000_i64)).unwrap();
        assert_eq!(millis, DateInput::Millis(1_767_225_600_000.0));

        let text: DateInput = serde_json::from_value(json!("2026-01-01")).unwrap();
        assert_eq!(text, DateInput::Text("2026-01-01".into()));
    }

    #[test]
    fn alarm_trigger_shapes() {
        let relative: AlarmTrigger =
            serde_json::from_value(json!({ "minutes": 30, "before": true })).unwrap();
        assert_eq!(
            relative,
            AlarmTrigger::Relative(DurationInput {
                before: true,
                minutes: 30,
                ..DurationInput::default()
            })
        );

        let absolute: AlarmTrigger = serde_json::from_value(json!([2026, 1, 1, 8, 0])).unwrap();
        assert!(matches!(absolute, AlarmTrigger::Absolute(DateInput::Parts(_))));
    }

    #[test]
    fn duration_rejects_unknown_units() {
        assert!(serde_json::from_value::<DurationInput>(json!({ "months": 1 })).is_err());
    }

    #[test]
    fn end_types_inherit_from_start() {
        let fields: EventFields = serde_json::from_value(json!({
            "uid": "u",
            "title": "t",
            "timestamp": 0,
            "start": [2026, 1, 1, 9, 0],
            "startInputType": "utc",
            "startOutputType": "local"
        }))
        .unwrap();

        assert_eq!(fields.end_input(), Representation::Utc);
        assert_eq!(fields.end_output(), Representation::Local);
    }
}
