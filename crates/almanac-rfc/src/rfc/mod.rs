//! RFC implementations used to render calendar documents.

pub mod ical;
