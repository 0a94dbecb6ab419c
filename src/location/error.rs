//! Error types for location identifiers

use thiserror::Error;

/// Result type for location parsing and construction
pub type LocationResult<T> = Result<T, LocationError>;

/// Errors raised while parsing or constructing a location identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// Text matched neither the location grammar nor the missing-slash variant
    #[error("Invalid location: {0}")]
    Invalid(String),

    /// A component contains characters outside the allowed set
    #[error("Invalid characters in '{value}'")]
    InvalidCharacters { value: String },

    /// An ordered field list had the wrong number of entries
    #[error("Location has {actual} parts, expected {expected}")]
    WrongLength { expected: &'static str, actual: usize },

    /// A named-field map lacked a required key
    #[error("Location is missing field '{0}'")]
    MissingField(String),

    /// A named-field map carried a key that is not a location field
    #[error("Unknown location field '{0}'")]
    UnknownField(String),

    /// A required (non-revision) field is empty
    #[error("Insufficiently specified location: {0}")]
    Underspecified(String),
}

impl LocationError {
    /// True for every variant that signals malformed input rather than an
    /// underspecified but well-formed identifier.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, LocationError::Underspecified(_))
    }
}
