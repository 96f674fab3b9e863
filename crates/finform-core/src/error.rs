//! Error types for form submissions.
//!
//! This module defines [`FormError`] which covers every way a submission can
//! fail between reading the form and rendering the server's answer.

use thiserror::Error;

/// Errors that can occur while submitting a query or fetching its export.
#[derive(Error, Debug)]
pub enum FormError {
    /// The server could not be reached (connection refused, DNS, reset, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{}", server_message(*status, detail.as_deref()))]
    Server {
        /// Numeric HTTP status code.
        status: u16,
        /// The `detail` text of the error body, if one could be extracted.
        detail: Option<String>,
    },

    /// The server answered successfully but the body could not be understood.
    #[error("Malformed response: {0}")]
    Parse(String),

    /// A base URL or link target could not be turned into a request URL.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Local I/O failed (for example writing a downloaded export).
    #[error("I/O error: {0}")]
    Io(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl FormError {
    /// Builds a [`FormError::Server`] from a status code and an optional detail.
    #[must_use]
    pub fn server(status: u16, detail: Option<String>) -> Self {
        Self::Server { status, detail }
    }

    /// Returns the HTTP status for server-reported failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn server_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("Request failed: {status}"),
    }
}

/// Result type alias using [`FormError`].
pub type Result<T> = std::result::Result<T, FormError>;
