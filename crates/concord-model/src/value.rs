use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CodingError;

/// Versioned, JSON-friendly representation of a cell value.
///
/// The enum uses an explicit `{type, value}` tagged layout for stable IPC.
/// Spreadsheet hosts hand cell contents to the engine as dynamically typed
/// values; this is the typed projection at the boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    /// Empty / unset cell value.
    Empty,
    /// IEEE-754 double precision number. Numeric codes (e.g. `1`, `42`) reach
    /// the engine in this form when the host stores them as numbers.
    Number(f64),
    /// Plain string.
    Text(String),
    /// Calendar date. Dates are never valid code material and are rejected by
    /// [`CellValue::as_text`] rather than silently coerced.
    Date(NaiveDate),
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl CellValue {
    /// Returns true if the value is [`CellValue::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Project the value to code text.
    ///
    /// - `Empty` projects to `""`.
    /// - `Number` renders the way a sheet displays it (no trailing `.0` for
    ///   integral values), so numeric shortcut codes compare equal to their
    ///   textual spelling.
    /// - `Date` fails with a [`CodingError::Validation`].
    pub fn as_text(&self) -> Result<Cow<'_, str>, CodingError> {
        match self {
            CellValue::Empty => Ok(Cow::Borrowed("")),
            CellValue::Text(s) => Ok(Cow::Borrowed(s)),
            CellValue::Number(n) => Ok(Cow::Owned(format_number(*n))),
            CellValue::Date(d) => Err(CodingError::validation(format!(
                "cell holds a date ({d}), not a code"
            ))),
        }
    }
}

/// Render a number the way the sheet grid displays it: integral values
/// without a decimal point, everything else via the shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Date(d) => write!(f, "{d}"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_projection() {
        assert_eq!(CellValue::Empty.as_text().unwrap(), "");
        assert_eq!(CellValue::from("privacy").as_text().unwrap(), "privacy");
        assert_eq!(CellValue::from(3.0).as_text().unwrap(), "3");
        assert_eq!(CellValue::from(2.5).as_text().unwrap(), "2.5");
    }

    #[test]
    fn dates_are_rejected() {
        let date = CellValue::from(NaiveDate::from_ymd_opt(2021, 3, 14).unwrap());
        assert!(matches!(
            date.as_text(),
            Err(CodingError::Validation { .. })
        ));
    }

    #[test]
    fn tagged_serde_layout() {
        let v = CellValue::from("a,b");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["value"], "a,b");

        let back: CellValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);
    }
}
