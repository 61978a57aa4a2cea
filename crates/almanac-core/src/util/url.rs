//! URL shape predicate.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme, optional credentials, an IPv4 address or dotted host name (or
/// `localhost`), optional port, optional path/query/fragment.
const URL_PATTERN: &str = r"(?i)^[a-z][a-z0-9+.\-]*://(?:\S+(?::\S*)?@)?(?:(?:[1-9]\d?|1\d\d|2[01]\d|22[0-3])(?:\.(?:1?\d{1,2}|2[0-4]\d|25[0-5])){2}\.(?:[1-9]\d?|1\d\d|2[0-4]\d|25[0-4])|(?:(?:[\p{Alphabetic}\p{Nd}][\p{Alphabetic}\p{Nd}_\-]{0,62})?[\p{Alphabetic}\p{Nd}]\.)+\p{Alphabetic}{2,}\.?|localhost)(?::\d{2,5})?(?:[/?#]\S*)?$";

#[expect(clippy::expect_used, reason = "Pattern is a compile-time constant")]
pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(URL_PATTERN).expect("valid url regex"));

/// Returns whether `url` looks like an absolute URL.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}
