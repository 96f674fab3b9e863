//! Reporting period definitions.
//!
//! This module defines [`PeriodType`], the granularity of the requested
//! financial period, and [`PeriodControl`], the two form controls that select it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quarter used when the start quarter field is left blank.
pub const DEFAULT_START_QUARTER: i64 = 1;

/// Quarter used when the end quarter field is left blank.
pub const DEFAULT_END_QUARTER: i64 = 4;

/// Granularity of the requested financial period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Annual reporting periods.
    #[default]
    Year,
    /// Quarterly reporting periods.
    Quarter,
}

impl PeriodType {
    /// Derives the period type from the state of the quarter-mode control.
    #[must_use]
    pub const fn from_quarter_mode(quarter_mode: bool) -> Self {
        if quarter_mode { Self::Quarter } else { Self::Year }
    }

    /// Returns true for quarterly periods.
    #[must_use]
    pub const fn is_quarterly(&self) -> bool {
        matches!(self, Self::Quarter)
    }

    /// Returns the wire name (`"year"` or `"quarter"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two mutually exclusive period controls on the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeriodControl {
    /// The "year mode" control.
    Year,
    /// The "quarter mode" control.
    Quarter,
}
