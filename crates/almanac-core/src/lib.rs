//! Shared building blocks for the almanac workspace.
//!
//! Holds configuration loading, the core error type, and the two pure
//! utilities every layer relies on: timestamp decomposition and the URL
//! predicate.

pub mod config;
pub mod constants;
pub mod error;
pub mod util;

pub use util::timestamp::{DateArray, Representation, TimestampInput, convert_timestamp_to_array};
pub use util::url::{URL_REGEX, is_valid_url};
