//! Integration tests for calendar batch assembly.

mod batch;
mod chunked;
mod helpers;
mod utilities;
