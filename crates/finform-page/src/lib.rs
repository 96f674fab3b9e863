#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! In-memory UI regions for the financial statement query form.
//!
//! - [`MemoryPage`] - Every region in memory, for tests and terminal hosts
//! - [`render_text`] - Plain-text rendering of a [`PageSnapshot`]

/// In-memory page implementation.
pub mod memory;
/// Plain-text rendering.
pub mod text;

pub use memory::{
    LinkState, MemoryForm, MemoryLink, MemoryPage, MemoryTable, MemoryText, MemoryVisibility,
    PageSnapshot,
};
pub use text::render_text;
