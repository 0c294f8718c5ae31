use std::fmt;

use crate::model::FieldId;

/// Failure of a remote collaborator call (query, session registry, report engine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never produced a response
    Transport(String),
    /// The host answered with an error status
    Status { code: u16, message: String },
    /// The response body could not be interpreted
    Decode(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Transport(msg) => write!(f, "request failed: {msg}"),
            ServiceError::Status { code, message } => write!(f, "HTTP {code}: {message}"),
            ServiceError::Decode(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Rejected user input on a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The field is disabled or locked by a running request
    Unavailable(FieldId),
    /// The value is not one of the field's current options
    UnknownOption { field: FieldId, value: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Unavailable(field) => write!(f, "{field} is not available"),
            InputError::UnknownOption { field, value } => {
                write!(f, "'{value}' is not a valid choice for {field}")
            }
        }
    }
}

impl std::error::Error for InputError {}

/// Why a submit action was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// A plot request is already in flight
    Running,
    /// Required fields are empty or out of range
    NotReady { unmet: Vec<FieldId> },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Running => write!(f, "a plot is already being generated"),
            SubmitError::NotReady { unmet } => {
                let names: Vec<&str> = unmet.iter().map(|field| field.label()).collect();
                write!(f, "missing or invalid: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for SubmitError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidTextSizeBounds { min: i64, max: i64, default: i64 },
    ZeroImageSize,
    ZeroPageSize,
    EmptyReportId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTextSizeBounds { min, max, default } => write!(
                f,
                "text size bounds must satisfy min <= default <= max (min={min}, default={default}, max={max})"
            ),
            ConfigError::ZeroImageSize => write!(f, "max_image_px must be positive"),
            ConfigError::ZeroPageSize => write!(f, "gene_page_size must be positive"),
            ConfigError::EmptyReportId => write!(f, "report_id must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
