//! iCalendar core models (RFC 5545).
//!
//! The subset of the RFC 5545 object model needed to render calendars:
//! components, properties, parameters, and the value types attribute
//! records can produce.

mod component;
mod datetime;
mod duration;
mod parameter;
mod property;
mod value;

pub use component::{Component, ComponentKind};
pub use datetime::{DateTime, DateTimeForm};
pub use duration::{Duration, DurationBuilder};
pub use parameter::Parameter;
pub use property::{Property, names};
pub use value::{Date, Value};
