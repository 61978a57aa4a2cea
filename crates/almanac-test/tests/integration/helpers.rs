#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Builds attribute records with fixed UIDs and stamps so that documents
//! produced by different entry points can be compared byte for byte.

use serde_json::{Value, json};

pub use almanac_test::almanac_rfc::rfc::ical::record::Attributes;
pub use almanac_test::almanac_service::calendar::*;
pub use almanac_test::almanac_service::error::ServiceError;

/// ## Summary
/// Converts a JSON object literal into an attribute record.
pub fn attrs(value: Value) -> Attributes {
    value
        .as_object()
        .cloned()
        .expect("attribute literal must be a JSON object")
}

/// ## Summary
/// A valid one-hour event whose UID and title are derived from `n`.
pub fn event(n: usize) -> Attributes {
    attrs(json!({
        "uid": format!("evt-{n:05}"),
        "title": format!("Event {n}"),
        "timestamp": [2026, 1, 1, 0, 0],
        "start": [2026, 6, 1, 9, 0],
        "startInputType": "utc",
        "duration": { "hours": 1 }
    }))
}

/// ## Summary
/// `count` valid events, numbered from zero.
pub fn events(count: usize) -> Vec<Attributes> {
    (0..count).map(event).collect()
}

/// ## Summary
/// An event that fails validation because its status is not a known value.
pub fn invalid_event(n: usize) -> Attributes {
    let mut attrs = event(n);
    attrs.insert("status".into(), json!("PROBABLY"));
    attrs
}

/// ## Summary
/// Offsets of each event's UID line in `text`, in input order.
pub fn uid_positions(text: &str, count: usize) -> Vec<usize> {
    (0..count)
        .map(|n| {
            text.find(&format!("UID:evt-{n:05}\r\n"))
                .expect("every event should be rendered")
        })
        .collect()
}
