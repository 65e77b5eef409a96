use thiserror::Error;

/// A request violated a documented constraint and was rejected locally.
///
/// Validation errors are produced by the request builders and by the enum
/// `parse` functions. They are never the result of a network call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("`{field}` is required and must not be empty")]
    MissingField { field: &'static str },

    #[error("`{field}` must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("`{field}` is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

impl ValidationError {
    pub fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, or the enum kind for unknown variants.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidValue { field, .. } => field,
            Self::UnknownVariant { kind, .. } => kind,
        }
    }
}

/// Check that `value` lies within the inclusive range `[min, max]`.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, min, max, value })
    }
}

/// Check that a string is present and not just whitespace.
pub(crate) fn check_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

/// A response payload did not match the schema expected for its operation.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("failed to decode {operation} response: {message}")]
pub struct DecodeError {
    pub operation: &'static str,
    pub message: String,
    /// Raw payload, kept so callers can report what the server actually sent.
    pub body: Option<String>,
}

impl DecodeError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}
