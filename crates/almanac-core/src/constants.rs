/// Product naming shared across crates
pub const PRODUCT_NAME: &str = "almanac";
pub const DEFAULT_PRODUCT_ID: &str = const_str::concat!(PRODUCT_NAME, "/ics");

/// iCalendar defaults emitted in every calendar header
pub const ICALENDAR_VERSION: &str = "2.0";
pub const DEFAULT_METHOD: &str = "PUBLISH";
pub const DEFAULT_CAL_SCALE: &str = "GREGORIAN";
pub const PUBLISHED_TTL: &str = "PT1H";

/// Number of events processed between cooperative yields in chunked assembly
pub const DEFAULT_YIELD_EVERY: usize = 1000;
