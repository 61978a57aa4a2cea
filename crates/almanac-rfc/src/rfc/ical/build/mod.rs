//! iCalendar serialization (RFC 5545).
//!
//! - Escape: Text and parameter value escaping
//! - Fold: Content line folding at 75 octets
//! - Serializer: Component and property serialization with canonical ordering

mod escape;
mod fold;
mod serializer;

pub use escape::{escape_param_value, escape_text};
pub use fold::fold_line;
pub use serializer::{
    serialize_component, serialize_component_close, serialize_component_open, serialize_property,
};
