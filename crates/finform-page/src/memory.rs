//! In-memory page implementation.

use finform_core::{
    Field, FormSource, LinkRegion, Regions, TableRegion, TextRegion, VisibilityRegion,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Form inputs held in memory.
#[derive(Debug, Default)]
pub struct MemoryForm {
    values: RwLock<HashMap<Field, String>>,
    quarter_mode: RwLock<bool>,
}

impl MemoryForm {
    /// Sets the raw text of a field.
    pub fn set(&self, field: Field, value: impl Into<String>) {
        write(&self.values).insert(field, value.into());
    }

    /// Checks or unchecks the quarter-mode control.
    pub fn set_quarter_mode(&self, checked: bool) {
        *write(&self.quarter_mode) = checked;
    }
}

impl FormSource for MemoryForm {
    fn value(&self, field: Field) -> String {
        read(&self.values).get(&field).cloned().unwrap_or_default()
    }

    fn quarter_mode(&self) -> bool {
        *read(&self.quarter_mode)
    }
}

/// A text region held in memory.
#[derive(Debug, Default)]
pub struct MemoryText {
    text: RwLock<String>,
}

impl MemoryText {
    /// Returns the current text.
    #[must_use]
    pub fn text(&self) -> String {
        read(&self.text).clone()
    }
}

impl TextRegion for MemoryText {
    fn set_text(&self, text: &str) {
        *write(&self.text) = text.to_string();
    }
}

/// A visibility flag held in memory.
#[derive(Debug)]
pub struct MemoryVisibility {
    hidden: RwLock<bool>,
}

impl MemoryVisibility {
    /// Creates a region with the given initial state.
    #[must_use]
    pub const fn new(hidden: bool) -> Self {
        Self {
            hidden: RwLock::new(hidden),
        }
    }

    /// Returns true while the region is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        *read(&self.hidden)
    }
}

impl VisibilityRegion for MemoryVisibility {
    fn set_hidden(&self, hidden: bool) {
        *write(&self.hidden) = hidden;
    }
}

/// Header cells and body rows held in memory.
#[derive(Debug, Default)]
pub struct MemoryTable {
    head: RwLock<Vec<String>>,
    body: RwLock<Vec<Vec<String>>>,
}

impl MemoryTable {
    /// Returns the header cells.
    #[must_use]
    pub fn head(&self) -> Vec<String> {
        read(&self.head).clone()
    }

    /// Returns the body rows.
    #[must_use]
    pub fn body(&self) -> Vec<Vec<String>> {
        read(&self.body).clone()
    }
}

impl TableRegion for MemoryTable {
    fn clear(&self) {
        write(&self.head).clear();
        write(&self.body).clear();
    }

    fn push_header(&self, text: &str) {
        write(&self.head).push(text.to_string());
    }

    fn push_row(&self, cells: &[String]) {
        write(&self.body).push(cells.to_vec());
    }
}

/// State of the download link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LinkState {
    /// Link target, `None` when removed.
    pub href: Option<String>,
    /// Visible label.
    pub label: String,
    /// Whether the link forces a download.
    pub download: bool,
    /// Whether the disabled state is applied.
    pub disabled: bool,
}

/// A download link held in memory.
#[derive(Debug)]
pub struct MemoryLink {
    state: RwLock<LinkState>,
}

impl Default for MemoryLink {
    fn default() -> Self {
        Self {
            state: RwLock::new(LinkState {
                disabled: true,
                ..LinkState::default()
            }),
        }
    }
}

impl MemoryLink {
    /// Returns the current link state.
    #[must_use]
    pub fn state(&self) -> LinkState {
        read(&self.state).clone()
    }
}

impl LinkRegion for MemoryLink {
    fn enable(&self, href: &str, label: &str) {
        let mut state = write(&self.state);
        state.href = Some(href.to_string());
        state.label = label.to_string();
        state.download = true;
        state.disabled = false;
    }

    fn disable(&self) {
        let mut state = write(&self.state);
        state.href = None;
        state.disabled = true;
    }
}

/// Point-in-time copy of every region of a [`MemoryPage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    /// Whether the quarter-only fields are hidden.
    pub quarter_fields_hidden: bool,
    /// Status indicator text.
    pub status: String,
    /// Whether the result panel is hidden.
    pub result_hidden: bool,
    /// Summary text.
    pub summary: String,
    /// Header cells.
    pub columns: Vec<String>,
    /// Body rows.
    pub rows: Vec<Vec<String>>,
    /// Download link.
    pub download: LinkState,
}

/// A complete page whose regions live in memory.
///
/// Used by tests and by hosts that render the page themselves after a
/// submission. Fresh pages start with the result panel hidden, the quarter
/// fields visible (until a controller syncs them) and the link disabled.
#[derive(Debug)]
pub struct MemoryPage {
    /// Form inputs.
    pub form: Arc<MemoryForm>,
    /// Quarter-only fields.
    pub quarter_fields: Arc<MemoryVisibility>,
    /// Status indicator.
    pub status: Arc<MemoryText>,
    /// Result panel.
    pub result: Arc<MemoryVisibility>,
    /// Summary text.
    pub summary: Arc<MemoryText>,
    /// Result table.
    pub table: Arc<MemoryTable>,
    /// Download link.
    pub download: Arc<MemoryLink>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self {
            form: Arc::default(),
            quarter_fields: Arc::new(MemoryVisibility::new(false)),
            status: Arc::default(),
            result: Arc::new(MemoryVisibility::new(true)),
            summary: Arc::default(),
            table: Arc::default(),
            download: Arc::default(),
        }
    }
}

impl MemoryPage {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the regions bundle to hand to a controller.
    #[must_use]
    pub fn regions(&self) -> Regions {
        Regions {
            form: self.form.clone(),
            quarter_fields: self.quarter_fields.clone(),
            status: self.status.clone(),
            result: self.result.clone(),
            summary: self.summary.clone(),
            table: self.table.clone(),
            download: self.download.clone(),
        }
    }

    /// Copies the current state of every output region.
    #[must_use]
    pub fn snapshot(&self) -> PageSnapshot {
        let snapshot = PageSnapshot {
            quarter_fields_hidden: self.quarter_fields.is_hidden(),
            status: self.status.text(),
            result_hidden: self.result.is_hidden(),
            summary: self.summary.text(),
            columns: self.table.head(),
            rows: self.table.body(),
            download: self.download.state(),
        };
        trace!(status = %snapshot.status, rows = snapshot.rows.len(), "Page snapshot");
        snapshot
    }
}
