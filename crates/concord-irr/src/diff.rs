//! Set-difference between two raters' code lists, and per-row conflict
//! resolution over a paired range.

use std::fmt;

use serde::{Deserialize, Serialize};

use concord_model::{codes_in_cell, Codebook, CodingError, Grid, CODE_SEPARATOR};

/// Commonalities and differences between two raters' code lists.
///
/// Every distinct code from either list lands in exactly one bucket. A flag
/// present in only one list still lands in `both`: flags mark metadata, not
/// substantive disagreement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeDiff {
    /// Codes in agreement, including flag-driven overrides.
    pub both: Vec<String>,
    /// Substantive codes only rater A assigned.
    pub only_a: Vec<String>,
    /// Substantive codes only rater B assigned.
    pub only_b: Vec<String>,
}

/// Whether a row's two codings count as agreement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    Agree,
    Conflict,
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgreementStatus::Agree => f.write_str("agree"),
            AgreementStatus::Conflict => f.write_str("conflict"),
        }
    }
}

impl CodeDiff {
    /// `Agree` iff no substantive code is unique to one rater.
    pub fn status(&self) -> AgreementStatus {
        if self.only_a.is_empty() && self.only_b.is_empty() {
            AgreementStatus::Agree
        } else {
            AgreementStatus::Conflict
        }
    }

    /// Merged reconciliation text: agreed codes joined by the separator,
    /// then a `<`-prefixed line of A-only codes and a `>`-prefixed line of
    /// B-only codes.
    pub fn merged_text(&self) -> String {
        let sep = CODE_SEPARATOR.to_string();
        let sep = sep.as_str();
        let mut out = String::new();
        if !self.both.is_empty() {
            out.push_str(&self.both.join(sep));
        }
        if !self.only_a.is_empty() {
            out.push_str("\n<");
            out.push_str(&self.only_a.join(sep));
        }
        if !self.only_b.is_empty() {
            out.push_str("\n>");
            out.push_str(&self.only_b.join(sep));
        }
        out
    }
}

/// Diff two code lists against a codebook.
///
/// Pass over A: a code present in B agrees; otherwise a flag still agrees;
/// otherwise it is A-only. Symmetric pass over B (codes already matched are
/// not re-added). Any token the codebook does not recognize fails with a
/// [`CodingError::Classification`].
pub fn diff_codes(
    a: &[String],
    b: &[String],
    codebook: &Codebook,
) -> Result<CodeDiff, CodingError> {
    for token in a.iter().chain(b) {
        codebook.require(token)?;
    }

    let mut diff = CodeDiff::default();

    for code in a {
        if b.contains(code) || codebook.is_flag(code) {
            diff.both.push(code.clone());
        } else {
            diff.only_a.push(code.clone());
        }
    }

    for code in b {
        if a.contains(code) {
            // Already covered by the first pass.
        } else if codebook.is_flag(code) {
            diff.both.push(code.clone());
        } else {
            diff.only_b.push(code.clone());
        }
    }

    Ok(diff)
}

/// One row of conflict-resolution output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRow {
    /// Merged/union text destined for the `final` column.
    pub merged: String,
    /// Agree/conflict label destined for the `status` column. The host uses
    /// `Conflict` rows to drive highlighting.
    pub status: AgreementStatus,
}

/// Resolve a 2-column range of paired codings row by row.
pub fn find_conflicts(grid: &Grid, codebook: &Codebook) -> Result<Vec<ConflictRow>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let codes_a = codes_in_cell(cell_a)?;
            let codes_b = codes_in_cell(cell_b)?;
            let diff = diff_codes(&codes_a, &codes_b, codebook)?;
            Ok(ConflictRow {
                status: diff.status(),
                merged: diff.merged_text(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_model::CellValue;
    use pretty_assertions::assert_eq;

    fn book() -> Codebook {
        Codebook::new(vec!["1".into(), "2".into()], vec!["9".into()])
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_only_on_one_side_is_agreement() {
        let diff = diff_codes(&codes(&["1", "9"]), &codes(&["1"]), &book()).unwrap();
        assert_eq!(diff.both, ["1", "9"]);
        assert!(diff.only_a.is_empty());
        assert!(diff.only_b.is_empty());
        assert_eq!(diff.status(), AgreementStatus::Agree);
    }

    #[test]
    fn divergent_codes_conflict() {
        let diff = diff_codes(&codes(&["1"]), &codes(&["2"]), &book()).unwrap();
        assert_eq!(diff.only_a, ["1"]);
        assert_eq!(diff.only_b, ["2"]);
        assert_eq!(diff.status(), AgreementStatus::Conflict);
    }

    #[test]
    fn unrecognized_token_is_fatal() {
        let err = diff_codes(&codes(&["1", "mystery"]), &codes(&["1"]), &book()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "not recognized as either code or flag: mystery"
        );
    }

    #[test]
    fn merged_text_annotates_unique_sides() {
        let diff = diff_codes(&codes(&["1", "9"]), &codes(&["2", "1"]), &book()).unwrap();
        assert_eq!(diff.merged_text(), "1,9\n>2");

        let diff = diff_codes(&codes(&["1"]), &codes(&["2"]), &book()).unwrap();
        assert_eq!(diff.merged_text(), "\n<1\n>2");
    }

    #[test]
    fn conflict_rows_over_a_range() {
        let grid = Grid::new(vec![
            vec![CellValue::from("1,9"), CellValue::from("1")],
            vec![CellValue::from("1"), CellValue::from("2")],
            vec![CellValue::Empty, CellValue::Empty],
        ]);
        let rows = find_conflicts(&grid, &book()).unwrap();
        assert_eq!(
            rows,
            vec![
                ConflictRow {
                    merged: "1,9".into(),
                    status: AgreementStatus::Agree
                },
                ConflictRow {
                    merged: "\n<1\n>2".into(),
                    status: AgreementStatus::Conflict
                },
                ConflictRow {
                    merged: "".into(),
                    status: AgreementStatus::Agree
                },
            ]
        );
    }
}
