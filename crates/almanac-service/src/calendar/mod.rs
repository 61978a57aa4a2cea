//! Calendar document assembly.

pub mod assemble;
pub mod chunked;
pub mod compose;

pub use assemble::{
    Dispatch, HeaderOrCallback, create_event, create_event_with, create_events,
    create_events_compat, create_events_with,
};
pub use chunked::{ChunkedAssembler, create_events_async};
pub use compose::{compose_header, compose_header_and_event, merge_attributes};
