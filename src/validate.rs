//! Request decoding and validation for incoming alert events

use std::fmt;

use tracing::warn;

use crate::alert::AlertEvent;

/// Fields an event must carry with a non-empty value
pub const REQUIRED_FIELDS: [&str; 3] = ["module", "service_name", "event_name"];

/// The caller sent something we cannot accept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Body is not a JSON object of the expected shape
    InvalidJson(String),

    /// One or more of [`REQUIRED_FIELDS`] is empty or absent
    MissingFields(Vec<&'static str>),

    /// Dashboard requested for a module that is not recognised
    UnknownModule(String),
}

impl ValidationError {
    /// Reason string surfaced to the client
    pub fn reason(&self) -> &'static str {
        match self {
            ValidationError::InvalidJson(_) => "Invalid JSON",
            ValidationError::MissingFields(_) => "Missing required fields",
            ValidationError::UnknownModule(_) => "Invalid module",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidJson(msg) => write!(f, "invalid alert JSON: {}", msg),
            ValidationError::MissingFields(fields) => {
                write!(f, "missing required fields: {}", fields.join(", "))
            }
            ValidationError::UnknownModule(module) => write!(f, "unknown module: {}", module),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Decode a request body into an [`AlertEvent`]
pub fn decode_event(body: &[u8]) -> Result<AlertEvent, ValidationError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("failed to parse alert JSON: {e}");
        ValidationError::InvalidJson(e.to_string())
    })
}

/// Check the required fields of an event
///
/// Only `module`, `service_name` and `event_name` are checked. The remaining
/// common fields are accepted as they are, empty or not.
pub fn validate_event(event: AlertEvent) -> Result<AlertEvent, ValidationError> {
    let missing: Vec<&'static str> = [
        (REQUIRED_FIELDS[0], &event.module),
        (REQUIRED_FIELDS[1], &event.service_name),
        (REQUIRED_FIELDS[2], &event.event_name),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();

    if missing.is_empty() {
        Ok(event)
    } else {
        warn!(module = %event.module, "missing required fields in alert: {missing:?}");
        Err(ValidationError::MissingFields(missing))
    }
}
