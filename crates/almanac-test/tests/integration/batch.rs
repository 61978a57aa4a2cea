//! Tests for synchronous batch assembly.
//!
//! Verifies fragment ordering, short-circuiting on the first invalid record,
//! and that the plain, callback and compatibility entry points agree.

use serde_json::json;

use super::helpers::*;

const FOOTER: &str = "END:VCALENDAR\r\n";

/// Header fragment of a document assembled without shared attributes.
fn header_fragment() -> String {
    let empty = create_events(Some(&[]), None).expect("empty batch should assemble");
    empty
        .strip_suffix(FOOTER)
        .expect("document should end with the footer")
        .to_string()
}

/// The single event fragment of a one-event document.
fn event_fragment(attrs: &Attributes) -> String {
    let single = create_event(attrs).expect("event should assemble");
    let header = header_fragment();
    single
        .strip_prefix(header.as_str())
        .and_then(|rest| rest.strip_suffix(FOOTER))
        .expect("single-event document should wrap one fragment")
        .to_string()
}

/// ## Summary
/// A batch is the header, one fragment per event in input order, and the footer.
#[test_log::test]
fn batch_is_header_events_footer() {
    let batch = events(5);

    let text = create_events(Some(&batch), None).expect("batch should assemble");

    let mut expected = header_fragment();
    for event in &batch {
        expected.push_str(&event_fragment(event));
    }
    expected.push_str(FOOTER);
    assert_eq!(text, expected);
}

/// ## Summary
/// An empty batch renders the shared header and the footer only.
#[test_log::test]
fn empty_batch_uses_shared_header() {
    let header = attrs(json!({ "productId": "acme/cal", "calName": "Quiet week" }));

    let text = create_events(Some(&[]), Some(&header)).expect("empty batch should assemble");

    assert!(text.starts_with("BEGIN:VCALENDAR\r\nVERSION:2.0\r\n"));
    assert!(text.contains("PRODID:acme/cal\r\n"));
    assert!(text.contains("X-WR-CALNAME:Quiet week\r\n"));
    assert!(!text.contains("BEGIN:VEVENT"));
    assert!(text.ends_with(FOOTER));
}

/// ## Summary
/// A failure at any index fails the whole batch without partial output.
#[test_log::test]
fn any_invalid_event_fails_batch() {
    for failing in [0, 3, 9] {
        let mut batch = events(10);
        batch[failing] = invalid_event(failing);

        let (error, value) = create_events_with(Some(&batch), None, |error, value| (error, value));

        assert!(
            matches!(error, Some(ServiceError::RfcError(_))),
            "index {failing}: {error:?}"
        );
        assert!(value.is_none(), "index {failing} produced output");
    }
}

/// ## Summary
/// Invalid shared header attributes fail the batch before any event is read.
#[test_log::test]
fn invalid_shared_header_fails_batch() {
    let header = attrs(json!({ "method": "SHOUT" }));

    assert!(create_events(Some(&events(3)), Some(&header)).is_err());
    assert!(create_events(Some(&[]), Some(&header)).is_err());
}

/// ## Summary
/// An event may override a shared header attribute for its own composition.
#[test_log::test]
fn event_attributes_override_shared() {
    let header = attrs(json!({ "location": "HQ" }));
    let mut batch = events(2);
    batch[1].insert("location".into(), json!("Annex"));

    let text = create_events(Some(&batch), Some(&header)).expect("batch should assemble");

    let first = uid_positions(&text, 2);
    let hq = text.find("LOCATION:HQ\r\n").expect("shared location rendered");
    let annex = text.find("LOCATION:Annex\r\n").expect("override rendered");
    assert!(first[0] < hq && hq < first[1] && first[1] < annex);
}

/// ## Summary
/// `create_event` matches a one-element `create_events`, through both styles.
#[test_log::test]
fn single_event_equivalence() {
    let attrs = event(7);

    assert_eq!(
        create_event(&attrs).expect("event should assemble"),
        create_events(Some(std::slice::from_ref(&attrs)), None).expect("batch should assemble"),
    );

    let via_event = create_event_with(&attrs, |_, value| value);
    let via_events = create_events_with(Some(std::slice::from_ref(&attrs)), None, |_, value| value);
    assert!(via_event.is_some());
    assert_eq!(via_event, via_events);
}

/// ## Summary
/// A missing batch is reported the same way from every synchronous entry point.
#[test_log::test]
fn missing_events_reported_everywhere() {
    let header = attrs(json!({ "calName": "ignored" }));

    let err = create_events(None, Some(&header)).expect_err("missing batch must fail");
    assert_eq!(err.to_string(), "one argument is required");

    let (error, value) = create_events_with(None, Some(&header), |error, value| (error, value));
    assert!(matches!(error, Some(ServiceError::MissingInput)));
    assert!(value.is_none());

    let outcome = create_events_compat::<fn(Option<ServiceError>, Option<String>), ()>(
        None,
        Some(HeaderOrCallback::Header(header)),
        None,
    );
    assert!(matches!(
        outcome,
        Dispatch::Returned(Err(ServiceError::MissingInput))
    ));
}

type Handler = Box<dyn FnOnce(Option<ServiceError>, Option<String>) -> Option<String>>;

/// ## Summary
/// An explicit third handler wins over a handler passed in the header position.
#[test_log::test]
fn compat_explicit_handler_wins() {
    let batch = events(2);
    let inferred: Handler = Box::new(|_, _| Some("inferred".to_string()));
    let explicit: Handler = Box::new(|_, value| value);

    let outcome = create_events_compat(
        Some(&batch),
        Some(HeaderOrCallback::Callback(inferred)),
        Some(explicit),
    );

    let Dispatch::Delivered(Some(text)) = outcome else {
        panic!("explicit handler should have received the document");
    };
    assert_eq!(uid_positions(&text, 2).len(), 2);
}

/// ## Summary
/// Header attributes given through the compatibility entry point are applied.
#[test_log::test]
fn compat_header_then_handler() {
    let header = attrs(json!({ "calName": "Compat" }));
    let handler: Handler = Box::new(|_, value| value);

    let outcome = create_events_compat(
        Some(&events(1)),
        Some(HeaderOrCallback::Header(header)),
        Some(handler),
    );

    let Dispatch::Delivered(Some(text)) = outcome else {
        panic!("handler should have received the document");
    };
    assert!(text.contains("X-WR-CALNAME:Compat\r\n"));
}
