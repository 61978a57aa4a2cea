//! Tests for timestamp decomposition and the URL predicate.

use almanac_test::almanac_core::{Representation, convert_timestamp_to_array, is_valid_url};
use chrono::{Local, TimeZone, Utc};

/// ## Summary
/// Months come back 1-based and local components follow the host clock.
#[test_log::test]
fn timestamp_components() {
    let new_year = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let millis = new_year.timestamp_millis();

    assert_eq!(
        convert_timestamp_to_array(millis, Representation::Utc),
        [2026.0, 1.0, 1.0, 0.0, 0.0]
    );

    let local = new_year.with_timezone(&Local);
    let expected_local = convert_timestamp_to_array(local, Representation::Local);
    assert_eq!(
        convert_timestamp_to_array(millis, Representation::Local),
        expected_local
    );

    if local.offset().to_string() == "+00:00" {
        assert_eq!(expected_local, [2026.0, 1.0, 1.0, 0.0, 0.0]);
    }
}

/// ## Summary
/// Unusable input yields `NaN` in every slot.
#[test_log::test]
fn timestamp_invalid_input() {
    let components = convert_timestamp_to_array("the day after tomorrow", Representation::Utc);
    assert!(components.iter().all(|c| c.is_nan()));
}

/// ## Summary
/// The URL predicate accepts absolute URLs and rejects everything else.
#[test_log::test]
fn url_predicate() {
    assert!(is_valid_url("https://example.com/path"));
    assert!(!is_valid_url("not a url"));
    assert!(!is_valid_url(""));
}
