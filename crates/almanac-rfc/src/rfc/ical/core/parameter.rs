//! iCalendar parameter types (RFC 5545 §3.2).

use std::fmt;

/// A single iCalendar property parameter.
///
/// Parameters modify or provide metadata for a property value.
/// For example: `ATTENDEE;CN=Jane Doe:mailto:jane@example.com`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name (normalized to uppercase).
    pub name: String,
    /// Parameter values. Most parameters have one value, but some
    /// (like MEMBER) can have multiple comma-separated values.
    pub values: Vec<String>,
}

impl Parameter {
    /// Creates a new parameter with a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_uppercase(),
            values: vec![value.into()],
        }
    }

    /// Returns the first (and usually only) value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Creates a VALUE parameter.
    #[must_use]
    pub fn value_type(value_type: impl Into<String>) -> Self {
        Self::new("VALUE", value_type)
    }

    /// Creates a CN (common name) parameter.
    #[must_use]
    pub fn cn(name: impl Into<String>) -> Self {
        Self::new("CN", name)
    }

    /// Creates a CUTYPE (calendar user type) parameter.
    #[must_use]
    pub fn cutype(cutype: impl Into<String>) -> Self {
        Self::new("CUTYPE", cutype)
    }

    /// Creates a PARTSTAT (participation status) parameter.
    #[must_use]
    pub fn partstat(status: impl Into<String>) -> Self {
        Self::new("PARTSTAT", status)
    }

    /// Creates a ROLE parameter.
    #[must_use]
    pub fn role(role: impl Into<String>) -> Self {
        Self::new("ROLE", role)
    }

    /// Creates an RSVP parameter.
    #[must_use]
    pub fn rsvp(rsvp: bool) -> Self {
        Self::new("RSVP", if rsvp { "TRUE" } else { "FALSE" })
    }

    /// Creates a DIR (directory entry) parameter.
    #[must_use]
    pub fn dir(uri: impl Into<String>) -> Self {
        Self::new("DIR", uri)
    }

    /// Creates a SENT-BY parameter.
    #[must_use]
    pub fn sent_by(address: impl Into<String>) -> Self {
        Self::new("SENT-BY", address)
    }

    /// Creates an FMTTYPE parameter.
    #[must_use]
    pub fn fmttype(media_type: impl Into<String>) -> Self {
        Self::new("FMTTYPE", media_type)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.values.is_empty() {
            write!(f, "=")?;
            for (i, value) in self.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                if needs_quoting(value) {
                    write!(f, "\"{value}\"")?;
                } else {
                    write!(f, "{value}")?;
                }
            }
        }
        Ok(())
    }
}

/// Checks if a parameter value needs quoting.
fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| matches!(c, ':' | ';' | ','))
}
