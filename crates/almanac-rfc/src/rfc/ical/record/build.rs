//! Draft construction with defaults. Never fails; malformed values are left
//! for validation to report.

use almanac_core::constants::{DEFAULT_CAL_SCALE, DEFAULT_METHOD, DEFAULT_PRODUCT_ID};
use serde_json::Value;

use super::Attributes;

/// Attribute names that describe the calendar rather than an event.
pub const HEADER_FIELDS: &[&str] = &["productId", "method", "calName", "calScale"];

const DEFAULT_TITLE: &str = "Untitled event";

/// Header attributes with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDraft {
    fields: Attributes,
}

impl HeaderDraft {
    #[must_use]
    pub fn fields(&self) -> &Attributes {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Attributes {
        self.fields
    }
}

/// Event attributes with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    fields: Attributes,
}

impl EventDraft {
    #[must_use]
    pub fn fields(&self) -> &Attributes {
        &self.fields
    }

    #[must_use]
    pub fn into_fields(self) -> Attributes {
        self.fields
    }
}

/// Picks the header attributes out of `attrs`, filling in calendar defaults.
#[must_use]
pub fn build_header(attrs: &Attributes) -> HeaderDraft {
    let mut fields = Attributes::new();
    fields.insert("productId".into(), Value::from(DEFAULT_PRODUCT_ID));
    fields.insert("method".into(), Value::from(DEFAULT_METHOD));
    fields.insert("calScale".into(), Value::from(DEFAULT_CAL_SCALE));

    for (key, value) in attrs {
        if HEADER_FIELDS.contains(&key.as_str()) && !value.is_null() {
            fields.insert(key.clone(), value.clone());
        }
    }

    HeaderDraft { fields }
}

/// Picks the event attributes out of `attrs`, filling in a title, a fresh
/// UID, and the current time as the stamp when they are missing.
#[must_use]
pub fn build_event(attrs: &Attributes) -> EventDraft {
    let mut fields = Attributes::new();
    fields.insert("title".into(), Value::from(DEFAULT_TITLE));
    fields.insert("uid".into(), Value::from(uuid::Uuid::new_v4().to_string()));
    fields.insert(
        "timestamp".into(),
        Value::from(chrono::Utc::now().timestamp_millis()),
    );

    for (key, value) in attrs {
        if !HEADER_FIELDS.contains(&key.as_str()) && !value.is_null() {
            fields.insert(key.clone(), value.clone());
        }
    }

    EventDraft { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: serde_json::Value) -> Attributes {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn header_defaults() {
        let draft = build_header(&Attributes::new());

        assert_eq!(draft.fields()["productId"], json!(DEFAULT_PRODUCT_ID));
        assert_eq!(draft.fields()["method"], json!("PUBLISH"));
        assert_eq!(draft.fields()["calScale"], json!("GREGORIAN"));
    }

    #[test]
    fn header_keeps_only_header_fields() {
        let draft = build_header(&attrs(json!({
            "productId": "acme/cal",
            "calName": "Team",
            "title": "ignored",
            "method": null
        })));

        assert_eq!(draft.fields()["productId"], json!("acme/cal"));
        assert_eq!(draft.fields()["calName"], json!("Team"));
        assert_eq!(draft.fields()["method"], json!("PUBLISH"));
        assert!(!draft.fields().contains_key("title"));
    }

    #[test]
    fn event_defaults_do_not_override_caller() {
        let draft = build_event(&attrs(json!({
            "title": "Standup",
            "uid": "fixed",
            "start": [2026, 1, 5, 9, 0],
            "productId": "acme/cal"
        })));

        assert_eq!(draft.fields()["title"], json!("Standup"));
        assert_eq!(draft.fields()["uid"], json!("fixed"));
        assert!(draft.fields()["timestamp"].is_i64());
        assert!(!draft.fields().contains_key("productId"));
    }

    #[test]
    fn event_uids_are_fresh() {
        let a = build_event(&Attributes::new());
        let b = build_event(&Attributes::new());
        assert_ne!(a.fields()["uid"], b.fields()["uid"]);
    }

    #[test]
    fn build_accepts_malformed_values() {
        let draft = build_event(&attrs(json!({ "start": "yesterday-ish", "geo": 5 })));
        assert_eq!(draft.into_fields()["geo"], json!(5));
    }
}
