//! iCalendar (RFC 5545) generation.
//!
//! - [`core`] - Component, property, and value model
//! - [`build`] - Escaping, line folding, and serialization
//! - [`record`] - Attribute records: build, validate, and format

pub mod build;
pub mod core;
pub mod record;
