//! Rendering of validated records to iCalendar text.

use almanac_core::constants::{ICALENDAR_VERSION, PUBLISHED_TTL};

use super::{CalendarHeader, ValidatedEvent};
use crate::rfc::ical::build::{serialize_component, serialize_component_close, serialize_component_open};
use crate::rfc::ical::core::{Component, Property, names};

fn calendar_component(header: &CalendarHeader) -> Component {
    let mut calendar = Component::calendar();
    calendar.add_property(Property::text(names::VERSION, ICALENDAR_VERSION));
    calendar.add_property(Property::text(names::CALSCALE, &header.cal_scale));
    calendar.add_property(Property::text(names::PRODID, &header.product_id));
    calendar.add_property(Property::text(names::METHOD, &header.method));
    if let Some(name) = &header.cal_name {
        calendar.add_property(Property::text(names::X_WR_CALNAME, name));
    }
    calendar.add_property(Property::raw(names::X_PUBLISHED_TTL, PUBLISHED_TTL));
    calendar
}

/// ## Summary
/// Renders the opening `VCALENDAR` lines and calendar properties.
#[must_use]
pub fn format_header(header: &CalendarHeader) -> String {
    serialize_component_open(&calendar_component(header))
}

/// ## Summary
/// Renders one `VEVENT`, alarms included.
#[must_use]
pub fn format_event(validated: &ValidatedEvent) -> String {
    serialize_component(&validated.event)
}

/// Closing line of a calendar document.
#[must_use]
pub fn format_footer() -> String {
    serialize_component_close(&Component::calendar())
}
