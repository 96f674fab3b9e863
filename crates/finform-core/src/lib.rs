#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the financial statement query form.
//!
//! - [`FormState`](form::FormState) - Snapshot of the form at submit time
//! - [`RequestPayload`](types::RequestPayload) - JSON body of the query
//! - [`ResultView`](view::ResultView) - Parsed, display-ready response
//! - [`Regions`](ui::Regions) - Injected UI regions
//! - [`FinancialsBackend`](backend::FinancialsBackend) - Query transport

/// Backend trait for submitting queries.
pub mod backend;
/// Error types for submissions.
pub mod error;
/// Form fields and the submit-time snapshot.
pub mod form;
/// Numeric coercion of field text.
pub mod number;
/// Reporting period definitions.
pub mod period;
/// Request types (Symbol, Credentials, payload).
pub mod types;
/// UI region traits.
pub mod ui;
/// Response model and display coercion.
pub mod view;

// Re-export commonly used items at crate root
pub use backend::FinancialsBackend;
pub use error::{FormError, Result};
pub use form::{Field, FormState, MAX_SYMBOLS, parse_symbols};
pub use number::FieldNumber;
pub use period::{PeriodControl, PeriodType};
pub use types::{
    Credentials, OPENAI_KEY_HEADER, QueryRequest, RequestPayload, Symbol, TUSHARE_TOKEN_HEADER,
};
pub use ui::{FormSource, LinkRegion, Regions, TableRegion, TextRegion, VisibilityRegion};
pub use view::{ResultView, display_text, is_truthy};
