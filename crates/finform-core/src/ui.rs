//! UI region traits.
//!
//! The controller never reaches for ambient page state. Every region it reads
//! or mutates is injected as a trait object through [`Regions`], so hosts can
//! back them with a real page, a terminal, or in-memory stand-ins.
//!
//! Regions are shared between concurrent submissions and therefore take
//! `&self`; implementations use interior mutability.

use std::fmt;
use std::sync::Arc;

use crate::form::Field;

/// Read access to the form's inputs.
pub trait FormSource: Send + Sync {
    /// Returns the raw, untrimmed text of a field.
    fn value(&self, field: Field) -> String;

    /// Returns true when the quarter-mode control is checked.
    fn quarter_mode(&self) -> bool;
}

/// A region whose content is plain text.
pub trait TextRegion: Send + Sync {
    /// Replaces the region's text.
    fn set_text(&self, text: &str);
}

/// A region that can be shown or hidden.
pub trait VisibilityRegion: Send + Sync {
    /// Hides (`true`) or shows (`false`) the region.
    fn set_hidden(&self, hidden: bool);
}

/// The result table.
pub trait TableRegion: Send + Sync {
    /// Removes every header cell and body row.
    fn clear(&self);

    /// Appends one header cell.
    fn push_header(&self, text: &str);

    /// Appends one body row.
    fn push_row(&self, cells: &[String]);
}

/// The export download link.
pub trait LinkRegion: Send + Sync {
    /// Points the link at `href` as a forced download labelled `label`, and
    /// removes any disabled state.
    fn enable(&self, href: &str, label: &str);

    /// Removes the link target and applies the disabled state.
    fn disable(&self);
}

/// The named UI regions a form controller works on.
#[derive(Clone)]
pub struct Regions {
    /// Form inputs.
    pub form: Arc<dyn FormSource>,
    /// Every element tagged quarter-only.
    pub quarter_fields: Arc<dyn VisibilityRegion>,
    /// Status indicator.
    pub status: Arc<dyn TextRegion>,
    /// Result panel wrapping summary, table and link.
    pub result: Arc<dyn VisibilityRegion>,
    /// Summary text.
    pub summary: Arc<dyn TextRegion>,
    /// Result table.
    pub table: Arc<dyn TableRegion>,
    /// Download link.
    pub download: Arc<dyn LinkRegion>,
}

impl fmt::Debug for Regions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Regions").finish_non_exhaustive()
    }
}
