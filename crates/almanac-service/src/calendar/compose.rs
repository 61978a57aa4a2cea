//! Composition of attribute records into validated header and event values.

use almanac_rfc::error::RfcResult;
use almanac_rfc::rfc::ical::record::{
    Attributes, CalendarHeader, ValidatedEvent, build_event, build_header, validate_header,
    validate_header_and_event,
};

/// ## Summary
/// Shallow-merges `event` over `shared`. On a key collision the event's value
/// wins.
#[must_use]
pub fn merge_attributes(shared: &Attributes, event: &Attributes) -> Attributes {
    let mut merged = shared.clone();
    for (key, value) in event {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// ## Summary
/// Builds and validates a calendar header from `attrs`.
///
/// ## Errors
/// Returns the validation error unchanged if the header breaks a rule.
pub fn compose_header(attrs: &Attributes) -> RfcResult<CalendarHeader> {
    validate_header(build_header(attrs))
}

/// ## Summary
/// Builds a header and an event from the same merged record and validates
/// them together.
///
/// ## Errors
/// Returns the validation error unchanged if either part breaks a rule.
pub fn compose_header_and_event(attrs: &Attributes) -> RfcResult<ValidatedEvent> {
    #[cfg(test)]
    panic_on_request(attrs);

    validate_header_and_event(build_header(attrs), build_event(attrs))
}

/// Attribute that makes composition panic in test builds.
#[cfg(test)]
pub(crate) const PANIC_ATTRIBUTE: &str = "x-test-panic";

#[cfg(test)]
fn panic_on_request(attrs: &Attributes) {
    assert!(!attrs.contains_key(PANIC_ATTRIBUTE), "composition panicked");
}
