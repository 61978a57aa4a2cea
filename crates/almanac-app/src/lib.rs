//! Command-line front end: reads a batch request as JSON and renders it.

pub mod error;
pub mod request;
