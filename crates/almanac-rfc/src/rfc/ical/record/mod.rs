//! Attribute records: the build → validate → format collaborators.
//!
//! Callers describe a calendar with loosely typed attribute maps. Building
//! applies defaults and never fails; validation turns a draft into a typed,
//! checked value; formatting renders validated values to folded iCalendar
//! text.

mod build;
mod date;
mod format;
mod model;
mod validate;

pub use build::{EventDraft, HEADER_FIELDS, HeaderDraft, build_event, build_header};
pub use date::{TimeValue, resolve_date};
pub use format::{format_event, format_footer, format_header};
pub use model::{
    Alarm, AlarmAction, AlarmTrigger, Attendee, BusyStatus, CalendarHeader, DateInput,
    DurationInput, EventFields, EventStatus, Geo, Person, Transparency,
};
pub use validate::{ValidatedEvent, validate_header, validate_header_and_event};

/// An open mapping from attribute name to value, as supplied by a caller.
pub type Attributes = serde_json::Map<String, serde_json::Value>;
