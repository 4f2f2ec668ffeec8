//! Error types for cloudflare-dyndns
//!
//! This module defines all error types used throughout the workspace.
//! Callers are expected to tell the kinds apart: a transport error means the
//! server was never reached, a decode error means it answered with something
//! that is not an envelope, and an API error carries the provider's own codes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reconciler::RecordReport;

/// Result type alias for dyndns operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single entry of the provider's `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Provider-assigned error code
    pub code: i64,
    /// Human readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)
    }
}

/// Core error type for cloudflare-dyndns
#[derive(Error, Debug)]
pub enum Error {
    /// The request never produced a response (connect, DNS, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// The provider answered with `success=false`
    #[error("Provider rejected the request: {}", join_api_errors(.errors))]
    Api {
        /// The provider's `errors` array, unchanged
        errors: Vec<ApiError>,
    },

    /// The IP echo service could not be reached within the retry budget
    #[error("Unable to get IP address after {attempts} attempt(s): {last_error}")]
    IpUnresolved {
        /// Number of attempts made
        attempts: usize,
        /// Failure reported by the last attempt
        last_error: String,
    },

    /// A record update failed and the run was aborted
    #[error("Failed to update DNS record {record}")]
    UpdateFailed {
        /// Name of the record whose update failed
        record: String,
        /// Address the record held before the attempt
        previous: String,
        /// Address the update tried to set
        attempted: String,
        /// Underlying provider error
        source: Box<Error>,
        /// Outcomes of the records finished before the failure
        completed: Vec<RecordReport>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local I/O errors (config files, log files, route tables)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API error from the provider's error list
    pub fn api(errors: Vec<ApiError>) -> Self {
        Self::Api { errors }
    }

    /// Provider error entries carried by this error, looking through
    /// [`Error::UpdateFailed`] wrapping. Empty for every other kind.
    pub fn api_errors(&self) -> &[ApiError] {
        match self {
            Self::Api { errors } => errors,
            Self::UpdateFailed { source, .. } => source.api_errors(),
            _ => &[],
        }
    }

    /// Whether the failure happened before any response was received
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::UpdateFailed { source, .. } => source.is_transport(),
            _ => false,
        }
    }
}

fn join_api_errors(errors: &[ApiError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
