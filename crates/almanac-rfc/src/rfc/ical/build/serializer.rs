//! iCalendar serializer (RFC 5545).
//!
//! Serializes components and properties to folded CRLF content lines.

use super::escape::{escape_param_value, escape_text};
use super::fold::fold_line;
use crate::rfc::ical::core::{Component, ComponentKind, Parameter, Property, Value};

/// Serializes a complete component, children included.
#[must_use]
pub fn serialize_component(component: &Component) -> String {
    let mut result = serialize_component_open(component);

    for child in &component.children {
        result.push_str(&serialize_component(child));
    }

    result.push_str(&serialize_component_close(component));
    result
}

/// Serializes the `BEGIN` line and the properties of a component, leaving it
/// open for children rendered separately.
#[must_use]
pub fn serialize_component_open(component: &Component) -> String {
    let mut result = fold_line(&format!("BEGIN:{}", component.name));

    for prop in canonical_property_order(&component.properties, component.kind) {
        result.push_str(&serialize_property(prop));
    }

    result
}

/// Serializes the `END` line of a component.
#[must_use]
pub fn serialize_component_close(component: &Component) -> String {
    fold_line(&format!("END:{}", component.name))
}

/// Serializes a property to a folded content line.
#[must_use]
pub fn serialize_property(prop: &Property) -> String {
    let mut line = prop.name.clone();

    for param in canonical_param_order(&prop.params) {
        line.push(';');
        line.push_str(&serialize_parameter(param));
    }

    line.push(':');
    line.push_str(&serialize_value(&prop.value));

    fold_line(&line)
}

fn serialize_parameter(param: &Parameter) -> String {
    let mut result = param.name.clone();
    result.push('=');

    let values: Vec<String> = param.values.iter().map(|v| escape_param_value(v)).collect();
    result.push_str(&values.join(","));

    result
}

fn serialize_value(value: &Value) -> String {
    match value {
        Value::Text(s) => escape_text(s),
        Value::TextList(list) => list
            .iter()
            .map(|s| escape_text(s))
            .collect::<Vec<_>>()
            .join(","),
        Value::Date(d) => d.to_string(),
        Value::DateTime(dt) => dt.to_string(),
        Value::Duration(d) => d.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::CalAddress(s) | Value::Uri(s) | Value::Raw(s) => s.clone(),
    }
}

/// Returns properties in canonical order for deterministic output.
fn canonical_property_order(props: &[Property], kind: Option<ComponentKind>) -> Vec<&Property> {
    let order: &[&str] = match kind {
        Some(ComponentKind::Calendar) => &[
            "VERSION",
            "CALSCALE",
            "PRODID",
            "METHOD",
            "X-WR-CALNAME",
            "X-PUBLISHED-TTL",
        ],
        Some(ComponentKind::Event) => &[
            "UID",
            "SUMMARY",
            "DTSTAMP",
            "DTSTART",
            "DTEND",
            "DURATION",
            "RRULE",
            "EXDATE",
            "DESCRIPTION",
            "X-ALT-DESC",
            "URL",
            "GEO",
            "LOCATION",
            "STATUS",
            "CATEGORIES",
            "ORGANIZER",
            "ATTENDEE",
            "CLASS",
            "TRANSP",
            "X-MICROSOFT-CDO-BUSYSTATUS",
            "CREATED",
            "LAST-MODIFIED",
            "SEQUENCE",
        ],
        Some(ComponentKind::Alarm) => &[
            "ACTION",
            "REPEAT",
            "DESCRIPTION",
            "SUMMARY",
            "DURATION",
            "TRIGGER",
            "ATTACH",
        ],
        _ => &[],
    };

    let mut ordered: Vec<&Property> = Vec::with_capacity(props.len());

    // First, add properties in defined order
    for &name in order {
        for prop in props {
            if prop.name.eq_ignore_ascii_case(name) {
                ordered.push(prop);
            }
        }
    }

    // Then add remaining properties (including X-properties) in insertion order
    for prop in props {
        if !order.iter().any(|&n| prop.name.eq_ignore_ascii_case(n)) {
            ordered.push(prop);
        }
    }

    ordered
}

/// Returns parameters in canonical order.
fn canonical_param_order(params: &[Parameter]) -> Vec<&Parameter> {
    let order = [
        "VALUE", "FMTTYPE", "RSVP", "ROLE", "PARTSTAT", "CUTYPE", "CN", "DIR", "SENT-BY",
    ];

    let mut ordered: Vec<&Parameter> = Vec::with_capacity(params.len());

    for name in &order {
        for param in params {
            if param.name.eq_ignore_ascii_case(name) {
                ordered.push(param);
            }
        }
    }

    for param in params {
        if !order.iter().any(|n| param.name.eq_ignore_ascii_case(n)) {
            ordered.push(param);
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rfc::ical::core::{DateTime, Duration};

    #[test]
    fn serialize_simple_vevent() {
        let mut event = Component::event();
        event.add_property(Property::text("UID", "test-uid-123"));
        event.add_property(Property::text("SUMMARY", "Test Event"));
        event.add_property(Property::datetime(
            "DTSTART",
            DateTime::utc(2026, 1, 23, 14, 0, 0),
        ));

        let output = serialize_component(&event);

        assert!(output.starts_with("BEGIN:VEVENT\r\n"));
        assert!(output.ends_with("END:VEVENT\r\n"));
        assert!(output.contains("UID:test-uid-123\r\n"));
        assert!(output.contains("DTSTART:20260123T140000Z\r\n"));
    }

    #[test]
    fn serialize_escapes_text() {
        let mut event = Component::event();
        event.add_property(Property::text("SUMMARY", "Meeting, important"));
        event.add_property(Property::text("DESCRIPTION", "Line 1\nLine 2"));

        let output = serialize_component(&event);

        assert!(output.contains("SUMMARY:Meeting\\, important\r\n"));
        assert!(output.contains("DESCRIPTION:Line 1\\nLine 2\r\n"));
    }

    #[test]
    fn serialize_folds_long_lines() {
        let mut event = Component::event();
        let long_summary = "A".repeat(100);
        event.add_property(Property::text("SUMMARY", &long_summary));

        let output = serialize_component(&event);

        assert!(output.contains("\r\n "));
        let unfolded = output.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{long_summary}\r\n")));
    }

    #[test]
    fn canonical_order_preserved() {
        let mut event = Component::event();
        event.add_property(Property::text("X-CUSTOM", "x"));
        event.add_property(Property::text("SUMMARY", "Summary"));
        event.add_property(Property::text("UID", "uid"));

        let output = serialize_component(&event);

        let uid_pos = output.find("UID:").unwrap();
        let summary_pos = output.find("SUMMARY:").unwrap();
        let custom_pos = output.find("X-CUSTOM:").unwrap();
        assert!(uid_pos < summary_pos);
        assert!(summary_pos < custom_pos);
    }

    #[test]
    fn open_and_close_split_calendar() {
        let mut calendar = Component::calendar();
        calendar.add_property(Property::text("PRODID", "test"));
        calendar.add_property(Property::text("VERSION", "2.0"));

        assert_eq!(
            serialize_component_open(&calendar),
            "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:test\r\n"
        );
        assert_eq!(serialize_component_close(&calendar), "END:VCALENDAR\r\n");
    }

    #[test]
    fn nested_alarm_and_params() {
        let mut alarm = Component::alarm();
        alarm.add_property(Property::text("ACTION", "DISPLAY"));
        alarm.add_property(Property::duration(
            "TRIGGER",
            Duration::builder().negative(true).minutes(30).build(),
        ));

        let mut event = Component::event();
        event.add_property(
            Property::cal_address("ORGANIZER", "mailto:ada@example.com")
                .with_param(Parameter::cn("Ada, Countess")),
        );
        event.add_child(alarm);

        let output = serialize_component(&event);

        assert!(output.contains("ORGANIZER;CN=\"Ada, Countess\":mailto:ada@example.com\r\n"));
        assert!(output.contains("BEGIN:VALARM\r\nACTION:DISPLAY\r\nTRIGGER:-PT30M\r\nEND:VALARM\r\n"));
        assert!(output.ends_with("END:VALARM\r\nEND:VEVENT\r\n"));
    }
}
