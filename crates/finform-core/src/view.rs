//! Server response model.
//!
//! A successful response is parsed into a [`ResultView`]: the summary, the
//! header cells, the body rows and the optional export link, each already
//! coerced to display text. Every field of the response is optional.

use serde_json::{Map, Value};

use crate::error::{FormError, Result};

/// Path under which the backend serves exports named by `download_token`.
pub const DOWNLOAD_PATH: &str = "/api/download";

/// Renders a JSON value as display text.
///
/// This is the single coercion used for summaries, header cells, body cells
/// and link targets: strings are verbatim, numbers use their shortest decimal
/// form (integral floats drop the fraction), `null` is empty, arrays join
/// their elements with `,` and objects render as compact JSON.
#[must_use]
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{f:.0}")
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(display_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Returns false for `null`, `false`, `0`, NaN and the empty string.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Rendered representation of a successful response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultView {
    /// Summary text, `None` when the response had no truthy summary.
    pub summary: Option<String>,
    /// Header cells in order.
    pub columns: Vec<String>,
    /// Body rows, one text cell per value.
    pub rows: Vec<Vec<String>>,
    /// Export link target, `None` disables the download link.
    pub file_url: Option<String>,
}

impl ResultView {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Parse`] when the body is not JSON, is JSON `null`,
    /// or when a `rows` entry is not itself an array.
    pub fn from_json_str(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body).map_err(|e| FormError::Parse(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Builds the view from a parsed response value.
    ///
    /// Besides `rows`/`file_url`, the record-oriented `table` and the
    /// `download_token` shape are accepted when the former are absent.
    ///
    /// # Errors
    ///
    /// See [`ResultView::from_json_str`].
    pub fn from_json(value: &Value) -> Result<Self> {
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Null => return Err(FormError::Parse("response body is null".to_string())),
            _ => return Ok(Self::default()),
        };

        let columns = match obj.get("columns") {
            Some(Value::Array(cols)) => cols.iter().map(display_text).collect(),
            _ => Vec::new(),
        };

        let rows = match (obj.get("rows"), obj.get("table")) {
            (Some(Value::Array(rows)), _) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| match row {
                    Value::Array(cells) => Ok(cells.iter().map(display_text).collect::<Vec<_>>()),
                    other => Err(FormError::Parse(format!(
                        "row {i} is not an array: {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            (None, Some(Value::Array(records))) => rows_from_records(obj, records),
            _ => Vec::new(),
        };

        Ok(Self {
            summary: truthy_text(obj.get("summary")),
            columns,
            rows,
            file_url: truthy_text(obj.get("file_url")).or_else(|| token_url(obj)),
        })
    }

    /// Returns true when neither header nor body cells were rendered.
    #[must_use]
    pub fn is_table_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// Converts the rendered table into a DataFrame of string columns.
    ///
    /// Cells past the last column are dropped; missing cells are empty strings.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Other`] when polars rejects the frame, e.g. on
    /// duplicate column names.
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> Result<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame, PlSmallStr};

        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<String> = self
                    .rows
                    .iter()
                    .map(|row| row.get(i).cloned().unwrap_or_default())
                    .collect();
                Column::new(PlSmallStr::from(name.as_str()), values)
            })
            .collect();

        DataFrame::new(columns).map_err(|e| FormError::Other(e.to_string()))
    }
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display_text)
}

fn token_url(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("download_token") {
        Some(Value::String(token)) if !token.is_empty() => {
            Some(format!("{DOWNLOAD_PATH}/{token}"))
        }
        _ => None,
    }
}

fn rows_from_records(obj: &Map<String, Value>, records: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Array(columns)) = obj.get("columns") else {
        return Vec::new();
    };
    let keys: Vec<String> = columns.iter().map(display_text).collect();
    records
        .iter()
        .filter_map(Value::as_object)
        .map(|record| {
            keys.iter()
                .map(|key| record.get(key).map(display_text).unwrap_or_default())
                .collect()
        })
        .collect()
}
