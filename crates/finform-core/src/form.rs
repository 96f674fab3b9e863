//! Reading the form.
//!
//! [`FormState`] is a snapshot of every user-entered value at the moment of
//! submission. It is read fresh from a [`FormSource`] on each submit and
//! discarded once the [`QueryRequest`] has been built.

use std::fmt;

use crate::{
    number::FieldNumber,
    period::{DEFAULT_END_QUARTER, DEFAULT_START_QUARTER, PeriodType},
    types::{Credentials, QueryRequest, RequestPayload, Symbol, non_empty},
    ui::FormSource,
};

/// Maximum number of symbols forwarded per query.
pub const MAX_SYMBOLS: usize = 10;

/// Text inputs on the query form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Tushare token input.
    TushareToken,
    /// OpenAI key input.
    OpenAiKey,
    /// Export file name input.
    Filename,
    /// Free-form symbol list input.
    Symbols,
    /// Start year input.
    StartYear,
    /// End year input.
    EndYear,
    /// Start quarter input (quarter-only).
    StartQuarter,
    /// End quarter input (quarter-only).
    EndQuarter,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 8] = [
        Self::TushareToken,
        Self::OpenAiKey,
        Self::Filename,
        Self::Symbols,
        Self::StartYear,
        Self::EndYear,
        Self::StartQuarter,
        Self::EndQuarter,
    ];

    /// Returns the element id the field carries on the page.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::TushareToken => "tushareToken",
            Self::OpenAiKey => "openaiKey",
            Self::Filename => "filename",
            Self::Symbols => "symbols",
            Self::StartYear => "startYear",
            Self::EndYear => "endYear",
            Self::StartQuarter => "startQuarter",
            Self::EndQuarter => "endQuarter",
        }
    }

    /// Returns true for fields shown only in quarter mode.
    #[must_use]
    pub const fn is_quarter_only(&self) -> bool {
        matches!(self, Self::StartQuarter | Self::EndQuarter)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Splits raw symbol input into at most [`MAX_SYMBOLS`] symbols.
///
/// Separators are ASCII commas, full-width commas and whitespace; runs of
/// separators collapse and empty tokens are dropped.
#[must_use]
pub fn parse_symbols(raw: &str) -> Vec<Symbol> {
    raw.trim()
        .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .take(MAX_SYMBOLS)
        .map(Symbol::from)
        .collect()
}

/// Snapshot of the form at submit time.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    /// Credentials forwarded as headers.
    pub credentials: Credentials,
    /// Trimmed export file name, if any.
    pub filename: Option<String>,
    /// Parsed symbols.
    pub symbols: Vec<Symbol>,
    /// Selected period granularity.
    pub period_type: PeriodType,
    /// Coerced start year.
    pub start_year: FieldNumber,
    /// Coerced end year.
    pub end_year: FieldNumber,
    /// Start and end quarter, present only in quarter mode.
    pub quarters: Option<(FieldNumber, FieldNumber)>,
}

impl FormState {
    /// Reads the current values of every field from `source`.
    #[must_use]
    pub fn read(source: &dyn FormSource) -> Self {
        let period_type = PeriodType::from_quarter_mode(source.quarter_mode());
        let quarters = period_type.is_quarterly().then(|| {
            (
                quarter_or(&source.value(Field::StartQuarter), DEFAULT_START_QUARTER),
                quarter_or(&source.value(Field::EndQuarter), DEFAULT_END_QUARTER),
            )
        });

        Self {
            credentials: Credentials::from_fields(
                &source.value(Field::TushareToken),
                &source.value(Field::OpenAiKey),
            ),
            filename: non_empty(&source.value(Field::Filename)),
            symbols: parse_symbols(&source.value(Field::Symbols)),
            period_type,
            start_year: FieldNumber::coerce(&source.value(Field::StartYear)),
            end_year: FieldNumber::coerce(&source.value(Field::EndYear)),
            quarters,
        }
    }

    /// Builds the JSON body. Credentials are deliberately left out.
    #[must_use]
    pub fn payload(&self) -> RequestPayload {
        RequestPayload {
            symbols: self.symbols.clone(),
            period_type: self.period_type,
            start_year: self.start_year,
            end_year: self.end_year,
            start_quarter: self.quarters.map(|(start, _)| start),
            end_quarter: self.quarters.map(|(_, end)| end),
            filename: self.filename.clone(),
        }
    }

    /// Consumes the snapshot and builds the query handed to a backend.
    #[must_use]
    pub fn into_request(self) -> QueryRequest {
        let payload = self.payload();
        QueryRequest {
            payload,
            credentials: self.credentials,
        }
    }
}

fn quarter_or(text: &str, default: i64) -> FieldNumber {
    if text.trim().is_empty() {
        FieldNumber::from(default)
    } else {
        FieldNumber::coerce(text)
    }
}
