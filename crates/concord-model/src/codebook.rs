//! The authoritative code/flag vocabulary for one coding question.

use serde::{Deserialize, Serialize};

use crate::{codes_in_cell, unique_codes_in, CellValue, CodingError, Grid};

/// Codebook entry label for substantive codes (and the default when a row
/// carries no label).
pub const CODEBOOK_LABEL_CODE: &str = "code";
/// Codebook entry label for flags, which never count as disagreement.
pub const CODEBOOK_LABEL_FLAG: &str = "flag";

/// How the codebook classifies a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// A substantive code; disagreements over it are real conflicts.
    Code,
    /// Metadata-like marker; a flag present for only one rater is still
    /// agreement.
    Flag,
}

/// An ordered vocabulary of codes partitioned into substantive codes and
/// flags.
///
/// Codebooks are rebuilt from host data on every statistic invocation and
/// never cached across calls, so sheet edits take effect immediately.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codebook {
    codes: Vec<String>,
    flags: Vec<String>,
}

impl Codebook {
    pub fn new(codes: Vec<String>, flags: Vec<String>) -> Self {
        Self { codes, flags }
    }

    /// Build a codebook from raw `(code, type-label)` entry rows.
    ///
    /// Blank code cells are holes and are skipped. A blank label defaults to
    /// [`CODEBOOK_LABEL_CODE`]; any other unrecognized label fails with a
    /// [`CodingError::Classification`].
    pub fn from_entries(
        entries: &[(CellValue, CellValue)],
        question_id: &str,
    ) -> Result<Self, CodingError> {
        let mut codes = Vec::new();
        let mut flags = Vec::new();

        for (code_cell, label_cell) in entries {
            let code = code_cell.as_text()?.trim().to_string();
            if code.is_empty() {
                // Tolerate holes in the codebook.
                continue;
            }

            let label_text = label_cell.as_text()?;
            let label = label_text.trim();
            let label = if label.is_empty() {
                CODEBOOK_LABEL_CODE
            } else {
                label
            };

            match label {
                CODEBOOK_LABEL_CODE => codes.push(code),
                CODEBOOK_LABEL_FLAG => flags.push(code),
                other => {
                    return Err(CodingError::classification(format!(
                        "unrecognized code type {other} in codebook {question_id}"
                    )))
                }
            }
        }

        Ok(Self { codes, flags })
    }

    /// Infer a codebook from the data itself: every distinct code in the grid
    /// becomes a substantive code and there are no flags.
    ///
    /// Used for ad hoc reliability checks when no explicit codebook exists;
    /// in this mode codes and flags cannot be told apart.
    pub fn inferred_from(grid: &Grid) -> Result<Self, CodingError> {
        Ok(Self {
            codes: unique_codes_in(grid)?,
            flags: Vec::new(),
        })
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Classify a token, or `None` when the codebook does not know it.
    pub fn classify(&self, token: &str) -> Option<TokenKind> {
        if self.codes.iter().any(|c| c == token) {
            Some(TokenKind::Code)
        } else if self.flags.iter().any(|f| f == token) {
            Some(TokenKind::Flag)
        } else {
            None
        }
    }

    pub fn is_flag(&self, token: &str) -> bool {
        self.classify(token) == Some(TokenKind::Flag)
    }

    /// Classify a token, failing with a [`CodingError::Classification`] when
    /// it is neither a code nor a flag. Unrecognized tokens are a fatal input
    /// error, never silently skipped.
    pub fn require(&self, token: &str) -> Result<TokenKind, CodingError> {
        self.classify(token)
            .ok_or_else(|| CodingError::unrecognized_token(token))
    }
}

/// Host seam for reading codebook sheets.
///
/// Implementations read the raw rows from wherever the codebook lives (a
/// `<question>_codebook` sheet, a fixture, ...). Loaders call through this on
/// **every** invocation; no caching happens on this side of the boundary.
pub trait CodebookProvider {
    /// Raw `(code, type-label)` rows for the question's codebook.
    fn codebook_entries(
        &self,
        question_id: &str,
    ) -> Result<Vec<(CellValue, CellValue)>, CodingError>;

    /// Raw `(code, final-name)` rows for the question's codebook.
    fn final_name_entries(
        &self,
        question_id: &str,
    ) -> Result<Vec<(CellValue, CellValue)>, CodingError>;
}

/// Load the question's codebook through the provider.
pub fn load_codebook(
    provider: &impl CodebookProvider,
    question_id: &str,
) -> Result<Codebook, CodingError> {
    let entries = provider.codebook_entries(question_id)?;
    Codebook::from_entries(&entries, question_id)
}

/// Load the question's final-name mapping through the provider.
pub fn load_final_names(
    provider: &impl CodebookProvider,
    question_id: &str,
) -> Result<FinalNames, CodingError> {
    let entries = provider.final_name_entries(question_id)?;
    FinalNames::from_entries(&entries)
}

/// Mapping from working code names to their reconciled final names.
///
/// Entry order follows the codebook sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalNames {
    entries: Vec<(String, String)>,
}

impl FinalNames {
    /// Build the mapping from raw `(code, final-name)` rows. Blank code cells
    /// are holes; a blank final name keeps the original code name.
    pub fn from_entries(entries: &[(CellValue, CellValue)]) -> Result<Self, CodingError> {
        let mut mapped = Vec::new();
        for (code_cell, final_cell) in entries {
            let code = code_cell.as_text()?.trim().to_string();
            if code.is_empty() {
                continue;
            }

            let final_text = final_cell.as_text()?;
            let final_name = final_text.trim();
            let final_name = if final_name.is_empty() {
                code.clone()
            } else {
                final_name.to_string()
            };
            mapped.push((code, final_name));
        }
        Ok(Self { entries: mapped })
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, f)| f.as_str())
    }

    /// Rewrite a cell's code list to final names, re-joined with the
    /// separator. A code missing from the mapping is a
    /// [`CodingError::Classification`].
    pub fn rename_cell(&self, cell: &CellValue) -> Result<String, CodingError> {
        let renamed = codes_in_cell(cell)?
            .into_iter()
            .map(|code| {
                self.get(&code).map(str::to_string).ok_or_else(|| {
                    CodingError::classification(format!("{code} not found in codebook"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(renamed.join(","))
    }

    /// Deduplicated list of all final names, in codebook order.
    pub fn final_code_list(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (_, final_name) in &self.entries {
            if !names.iter().any(|n| n == final_name) {
                names.push(final_name.clone());
            }
        }
        names
    }
}
