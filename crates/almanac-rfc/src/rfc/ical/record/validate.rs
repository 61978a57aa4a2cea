//! Domain rules for header and event drafts.
//!
//! Validation type-checks a draft through serde, applies the calendar rules
//! that types cannot express, and produces the value the formatter renders.

use almanac_core::{Representation, is_valid_url};
use rrule::{RRule, Unvalidated};
use serde_json::Value;

use super::date::resolve_date;
use super::{
    Alarm, AlarmTrigger, Attendee, CalendarHeader, EventDraft, EventFields, HeaderDraft, Person,
};
use crate::error::{RfcError, RfcResult};
use crate::rfc::ical::core::{Component, Parameter, Property, names};

/// Scheduling methods from RFC 5546 §1.4.
const METHODS: &[&str] = &[
    "PUBLISH",
    "REQUEST",
    "REPLY",
    "ADD",
    "CANCEL",
    "REFRESH",
    "COUNTER",
    "DECLINECOUNTER",
];

/// A validated header together with one validated event.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEvent {
    pub header: CalendarHeader,
    pub event: Component,
}

/// ## Summary
/// Validates a header draft.
///
/// ## Errors
/// Returns an error if a header attribute has the wrong type, the product id
/// is blank, or the method is not an iTIP method.
pub fn validate_header(draft: HeaderDraft) -> RfcResult<CalendarHeader> {
    let header: CalendarHeader = serde_json::from_value(Value::Object(draft.into_fields()))?;

    if header.product_id.trim().is_empty() {
        return Err(RfcError::ValidationError(
            "productId must not be empty".to_string(),
        ));
    }
    if !METHODS.contains(&header.method.as_str()) {
        return Err(RfcError::ValidationError(format!(
            "method must be one of {}, got {:?}",
            METHODS.join(", "),
            header.method
        )));
    }

    Ok(header)
}

/// ## Summary
/// Validates a header draft and an event draft built from the same record.
///
/// ## Errors
/// Returns the header error if the header is invalid, otherwise an error if
/// any event attribute has the wrong type or breaks an event rule.
pub fn validate_header_and_event(
    header: HeaderDraft,
    event: EventDraft,
) -> RfcResult<ValidatedEvent> {
    let header = validate_header(header)?;
    let fields: EventFields = serde_json::from_value(Value::Object(event.into_fields()))?;
    let event = event_component(&fields)?;

    tracing::trace!(uid = %fields.uid, "Validated event");
    Ok(ValidatedEvent { header, event })
}

fn event_component(fields: &EventFields) -> RfcResult<Component> {
    let mut event = Component::event();

    event.add_property(Property::text(names::UID, &fields.uid));
    event.add_property(Property::text(names::SUMMARY, &fields.title));

    add_schedule(&mut event, fields)?;
    add_description(&mut event, fields)?;

    if let Some(organizer) = &fields.organizer {
        event.add_property(organizer_property(organizer)?);
    }
    for (index, attendee) in fields.attendees.iter().enumerate() {
        event.add_property(attendee_property(index, attendee)?);
    }

    add_bookkeeping(&mut event, fields)?;

    for (index, alarm) in fields.alarms.iter().enumerate() {
        event.add_child(alarm_component(index, alarm, fields)?);
    }

    Ok(event)
}

/// DTSTAMP, DTSTART, DTEND or DURATION, RRULE and EXDATE.
fn add_schedule(event: &mut Component, fields: &EventFields) -> RfcResult<()> {
    event.add_property(
        resolve_date(
            "timestamp",
            &fields.timestamp,
            Representation::Utc,
            Representation::Utc,
        )?
        .into_property(names::DTSTAMP),
    );
    event.add_property(
        resolve_date(
            "start",
            &fields.start,
            fields.start_input_type,
            fields.start_output(),
        )?
        .into_property(names::DTSTART),
    );

    match (&fields.end, &fields.duration) {
        (Some(_), Some(_)) => {
            return Err(RfcError::ValidationError(
                "end and duration are mutually exclusive".to_string(),
            ));
        }
        (Some(end), None) => event.add_property(
            resolve_date("end", end, fields.end_input(), fields.end_output())?
                .into_property(names::DTEND),
        ),
        (None, Some(duration)) => {
            if duration.before {
                return Err(RfcError::ValidationError(
                    "duration must not be negative".to_string(),
                ));
            }
            event.add_property(Property::duration(names::DURATION, duration.to_duration()));
        }
        (None, None) => {}
    }

    if let Some(rule) = &fields.recurrence_rule {
        let body = rule.strip_prefix("RRULE:").unwrap_or(rule);
        body.parse::<RRule<Unvalidated>>()?;
        event.add_property(Property::raw(names::RRULE, body));
    }
    for (index, date) in fields.exclusion_dates.iter().enumerate() {
        let field = format!("exclusionDates[{index}]");
        event.add_property(
            resolve_date(&field, date, fields.start_input_type, fields.start_output())?
                .into_property(names::EXDATE),
        );
    }

    Ok(())
}

fn add_description(event: &mut Component, fields: &EventFields) -> RfcResult<()> {
    event.add_optional(
        fields
            .description
            .as_ref()
            .map(|d| Property::text(names::DESCRIPTION, d)),
    );
    event.add_optional(fields.html_content.as_ref().map(|html| {
        Property::text(names::X_ALT_DESC, html).with_param(Parameter::fmttype("text/html"))
    }));

    if let Some(url) = &fields.url {
        if !is_valid_url(url) {
            return Err(RfcError::ValidationError(format!(
                "url is not a valid URL: {url:?}"
            )));
        }
        event.add_property(Property::uri(names::URL, url));
    }

    if let Some(geo) = fields.geo {
        if !(-90.0..=90.0).contains(&geo.lat) || !(-180.0..=180.0).contains(&geo.lon) {
            return Err(RfcError::ValidationError(format!(
                "geo out of range: {};{}",
                geo.lat, geo.lon
            )));
        }
        event.add_property(Property::raw(names::GEO, format!("{};{}", geo.lat, geo.lon)));
    }

    event.add_optional(
        fields
            .location
            .as_ref()
            .map(|l| Property::text(names::LOCATION, l)),
    );
    event.add_optional(
        fields
            .status
            .map(|s| Property::text(names::STATUS, s.as_str())),
    );
    if !fields.categories.is_empty() {
        event.add_property(Property::text_list(
            names::CATEGORIES,
            fields.categories.clone(),
        ));
    }

    Ok(())
}

fn add_bookkeeping(event: &mut Component, fields: &EventFields) -> RfcResult<()> {
    event.add_optional(
        fields
            .classification
            .as_ref()
            .map(|c| Property::text(names::CLASS, c)),
    );
    event.add_optional(
        fields
            .transp
            .map(|t| Property::text(names::TRANSP, t.as_str())),
    );
    event.add_optional(
        fields
            .busy_status
            .map(|b| Property::text(names::X_BUSY_STATUS, b.as_str())),
    );

    if let Some(created) = &fields.created {
        event.add_property(
            resolve_date("created", created, Representation::Utc, Representation::Utc)?
                .into_property(names::CREATED),
        );
    }
    if let Some(modified) = &fields.last_modified {
        event.add_property(
            resolve_date(
                "lastModified",
                modified,
                Representation::Utc,
                Representation::Utc,
            )?
            .into_property(names::LAST_MODIFIED),
        );
    }
    event.add_optional(
        fields
            .sequence
            .map(|s| Property::integer(names::SEQUENCE, i64::from(s))),
    );

    Ok(())
}

fn mailto(field: &str, email: Option<&str>) -> RfcResult<String> {
    match email {
        Some(email) if email.contains('@') => Ok(format!("mailto:{email}")),
        Some(email) => Err(RfcError::ValidationError(format!(
            "{field}.email is not an address: {email:?}"
        ))),
        None => Err(RfcError::ValidationError(format!(
            "{field}.email is required"
        ))),
    }
}

fn organizer_property(organizer: &Person) -> RfcResult<Property> {
    let mut prop = Property::cal_address(
        names::ORGANIZER,
        mailto("organizer", organizer.email.as_deref())?,
    );
    if let Some(name) = &organizer.name {
        prop.add_param(Parameter::cn(name));
    }
    if let Some(dir) = &organizer.dir {
        prop.add_param(Parameter::dir(dir));
    }
    if let Some(sent_by) = &organizer.sent_by {
        prop.add_param(Parameter::sent_by(mailto("organizer.sentBy", Some(sent_by.as_str()))?));
    }
    Ok(prop)
}

fn attendee_property(index: usize, attendee: &Attendee) -> RfcResult<Property> {
    let field = format!("attendees[{index}]");
    let mut prop = Property::cal_address(names::ATTENDEE, mailto(&field, attendee.email.as_deref())?);

    if let Some(rsvp) = attendee.rsvp {
        prop.add_param(Parameter::rsvp(rsvp));
    }
    if let Some(role) = &attendee.role {
        prop.add_param(Parameter::role(role.to_ascii_uppercase()));
    }
    if let Some(partstat) = &attendee.partstat {
        prop.add_param(Parameter::partstat(partstat.to_ascii_uppercase()));
    }
    if let Some(cutype) = &attendee.cutype {
        prop.add_param(Parameter::cutype(cutype.to_ascii_uppercase()));
    }
    if let Some(name) = &attendee.name {
        prop.add_param(Parameter::cn(name));
    }
    if let Some(dir) = &attendee.dir {
        prop.add_param(Parameter::dir(dir));
    }
    Ok(prop)
}

fn alarm_component(index: usize, alarm: &Alarm, fields: &EventFields) -> RfcResult<Component> {
    let field = format!("alarms[{index}]");
    let mut component = Component::alarm();

    component.add_property(Property::text(names::ACTION, alarm.action.as_str()));

    let trigger = match &alarm.trigger {
        Some(AlarmTrigger::Relative(offset)) => {
            Property::duration(names::TRIGGER, offset.to_duration())
        }
        Some(AlarmTrigger::Absolute(at)) => {
            resolve_date(
                &format!("{field}.trigger"),
                at,
                fields.start_input_type,
                Representation::Utc,
            )?
            .into_property(names::TRIGGER)
        }
        None => {
            return Err(RfcError::ValidationError(format!(
                "{field}.trigger is required"
            )));
        }
    };
    component.add_property(trigger);

    // RFC 5545 §3.6.6: REPEAT and DURATION appear together or not at all
    match (alarm.repeat, alarm.duration) {
        (Some(repeat), Some(duration)) => {
            component.add_property(Property::integer(names::REPEAT, i64::from(repeat)));
            component.add_property(Property::duration(names::DURATION, duration.to_duration()));
        }
        (None, None) => {}
        _ => {
            return Err(RfcError::ValidationError(format!(
                "{field}: repeat and duration must be given together"
            )));
        }
    }

    let description = alarm.description.as_deref().unwrap_or(&fields.title);
    component.add_property(Property::text(names::DESCRIPTION, description));
    component.add_optional(
        alarm
            .summary
            .as_ref()
            .map(|s| Property::text(names::SUMMARY, s)),
    );
    component.add_optional(alarm.attach.as_ref().map(|a| Property::uri(names::ATTACH, a)));

    Ok(component)
}
