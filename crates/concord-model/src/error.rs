use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by coding computations.
///
/// Every variant is fatal to the single computation that raised it; other
/// cells and statistics are unaffected. Row and column indices in messages are
/// **1-based**, matching what a spreadsheet user sees.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum CodingError {
    /// Input range has the wrong shape (e.g. a row without exactly two rater
    /// columns where a pairwise statistic requires them).
    #[error("{message}")]
    Structural { message: String },

    /// A token was not found among the codebook's codes or flags, or a
    /// codebook entry carried an unrecognized type label.
    #[error("{message}")]
    Classification { message: String },

    /// Could not determine which question/codebook a sheet belongs to, or the
    /// codebook itself is missing.
    #[error("{message}")]
    Configuration { message: String },

    /// A cell violated a value-level expectation (multiple codes where one
    /// was required, or a date where text/number was expected).
    #[error("{message}")]
    Validation { message: String },
}

impl CodingError {
    pub fn structural(message: impl Into<String>) -> Self {
        CodingError::Structural {
            message: message.into(),
        }
    }

    pub fn classification(message: impl Into<String>) -> Self {
        CodingError::Classification {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        CodingError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CodingError::Validation {
            message: message.into(),
        }
    }

    /// Structural error for a row that does not hold the expected number of
    /// rater columns. `row` is 1-based for user display.
    pub fn bad_row_width(row: usize, expected: usize, found: usize) -> Self {
        CodingError::structural(format!(
            "expecting {expected} cells in each input row, but found {found} in row {row}"
        ))
    }

    /// Classification error for a token that is neither a code nor a flag.
    pub fn unrecognized_token(token: &str) -> Self {
        CodingError::classification(format!(
            "not recognized as either code or flag: {token}"
        ))
    }
}
