//! Core request types.
//!
//! This module defines the data sent to the backend:
//!
//! - [`Symbol`] - Stock symbol as typed by the user
//! - [`Credentials`] - Optional API credentials forwarded as headers
//! - [`RequestPayload`] - JSON body of the financials query
//! - [`QueryRequest`] - Body plus credentials, handed to a backend

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{number::FieldNumber, period::PeriodType};

/// Header carrying the user's Tushare token.
pub const TUSHARE_TOKEN_HEADER: &str = "X-Tushare-Token";

/// Header carrying the user's OpenAI key.
pub const OPENAI_KEY_HEADER: &str = "X-OpenAI-Key";

/// A stock symbol.
///
/// Symbols are forwarded verbatim; the backend owns normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Optional API credentials.
///
/// Never part of the request body; each one present becomes a request header.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Tushare data token.
    pub tushare_token: Option<String>,
    /// OpenAI API key used by the backend for the summary.
    pub openai_key: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tushare_token", &self.tushare_token.as_ref().map(|_| "[REDACTED]"))
            .field("openai_key", &self.openai_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Credentials {
    /// Builds credentials from raw field text, dropping values that are empty
    /// after trimming.
    #[must_use]
    pub fn from_fields(tushare_token: &str, openai_key: &str) -> Self {
        Self {
            tushare_token: non_empty(tushare_token),
            openai_key: non_empty(openai_key),
        }
    }

    /// Returns the `(header, value)` pairs to attach to the request.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, &str)> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = &self.tushare_token {
            headers.push((TUSHARE_TOKEN_HEADER, token.as_str()));
        }
        if let Some(key) = &self.openai_key {
            headers.push((OPENAI_KEY_HEADER, key.as_str()));
        }
        headers
    }
}

/// JSON body of `POST /api/financials`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RequestPayload {
    /// Requested symbols (at most ten).
    pub symbols: Vec<Symbol>,
    /// Period granularity.
    pub period_type: PeriodType,
    /// First year of the range.
    pub start_year: FieldNumber,
    /// Last year of the range.
    pub end_year: FieldNumber,
    /// First quarter, quarter mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_quarter: Option<FieldNumber>,
    /// Last quarter, quarter mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_quarter: Option<FieldNumber>,
    /// Requested export file name, only when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// A complete query: body plus the credentials that travel as headers.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    /// The JSON body.
    pub payload: RequestPayload,
    /// Credentials forwarded as headers.
    pub credentials: Credentials,
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
