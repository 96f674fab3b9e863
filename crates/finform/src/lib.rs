#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/finform/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Form controller for querying stock financial statements.
//!
//! This crate re-exports the core types, the in-memory page and the HTTP
//! backend, and provides the [`FormController`] that wires them together.
//!
//! # Features
//!
//! - `http` - HTTP backend against the `/api/financials` endpoint
//! - `dataframe` - Convert a rendered result into a polars `DataFrame`

/// Controller configuration.
pub mod config;
/// The form controller.
pub mod controller;

pub use config::{ControllerConfig, Labels, SubmissionPolicy};
pub use controller::{ControllerEvent, FormController, SubmitOutcome};

// Core types and traits
pub use finform_core::*;

// Page regions
pub use finform_page::{
    LinkState, MemoryForm, MemoryLink, MemoryPage, MemoryTable, MemoryText, MemoryVisibility,
    PageSnapshot, render_text,
};

// Backends
#[cfg(feature = "http")]
pub use finform_http::{DEFAULT_BASE_URL, FINANCIALS_PATH, HttpBackend};
