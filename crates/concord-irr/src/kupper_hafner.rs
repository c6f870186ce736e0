//! Kupper-Hafner concordance for non-exclusive coding.
//!
//! For the i-th unit, `a_i` and `b_i` count the substantive codes chosen by
//! raters A and B, and `x_i` counts the codes common to both sets. The
//! observed per-unit concordance is `x_i / max(a_i, b_i)`; the chance term
//! pools per-unit minimum counts against the codebook size.

use serde::{Deserialize, Serialize};

use concord_model::{codes_in_cell, Codebook, CodingError, Grid, TokenKind};

use crate::summary::{coefficient, mean_ignoring_missing, AgreementSummary};

/// Where the codebook for a concordance run comes from.
///
/// The two modes are distinct entry points, never auto-selected: `Referenced`
/// excludes flags from the counts, while `Inferred` treats every distinct
/// code in the range as substantive because it has no way to tell flags
/// apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CodebookSource {
    /// Use an explicit codebook (flags excluded from the calculation).
    Referenced(Codebook),
    /// Build the codebook from the contents of the range itself.
    Inferred,
}

impl CodebookSource {
    fn resolve(&self, grid: &Grid) -> Result<Codebook, CodingError> {
        match self {
            CodebookSource::Referenced(book) => Ok(book.clone()),
            CodebookSource::Inferred => Codebook::inferred_from(grid),
        }
    }
}

/// Per-row observed concordance `pi_hat_i = x_i / max(a_i, b_i)`.
///
/// Rows where both raters assigned nothing (or nothing substantive) are not
/// applicable and yield `None`. Tokens outside the codebook fail with a
/// [`CodingError::Classification`].
pub fn concordance_rows(
    grid: &Grid,
    codebook: &Codebook,
) -> Result<Vec<Option<f64>>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let codes_a = codes_in_cell(cell_a)?;
            let codes_b = codes_in_cell(cell_b)?;

            if codes_a.is_empty() && codes_b.is_empty() {
                return Ok(None);
            }

            let mut b_i = 0u32;
            for code in &codes_b {
                if codebook.require(code)? == TokenKind::Code {
                    b_i += 1;
                }
            }

            let mut a_i = 0u32;
            let mut x_i = 0u32;
            for code in &codes_a {
                if codebook.require(code)? == TokenKind::Code {
                    a_i += 1;
                    if codes_b.contains(code) {
                        x_i += 1;
                    }
                }
            }

            if a_i == 0 && b_i == 0 {
                return Ok(None);
            }

            Ok(Some(f64::from(x_i) / f64::from(a_i.max(b_i))))
        })
        .collect()
}

/// Per-row `min(a_i, b_i)` after excluding flag occurrences from the raw code
/// counts. Rows where both raters assigned nothing yield `None`.
pub fn min_count_rows(
    grid: &Grid,
    codebook: &Codebook,
) -> Result<Vec<Option<u32>>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let codes_a = codes_in_cell(cell_a)?;
            let codes_b = codes_in_cell(cell_b)?;

            if codes_a.is_empty() && codes_b.is_empty() {
                return Ok(None);
            }

            let substantive = |codes: &[String]| -> Result<u32, CodingError> {
                let mut n = 0u32;
                for code in codes {
                    if codebook.require(code)? == TokenKind::Code {
                        n += 1;
                    }
                }
                Ok(n)
            };

            let a_i = substantive(&codes_a)?;
            let b_i = substantive(&codes_b)?;
            Ok(Some(a_i.min(b_i)))
        })
        .collect()
}

/// Kupper-Hafner concordance over a 2-column range.
///
/// `pi_hat` is the mean per-row concordance over applicable rows; the chance
/// term is `pi_0 = sum(min counts) / (applicable rows * codebook size)`; the
/// final coefficient is `(pi_hat - pi_0) / (1 - pi_0)`.
pub fn concordance(
    grid: &Grid,
    source: &CodebookSource,
) -> Result<AgreementSummary, CodingError> {
    let codebook = source.resolve(grid)?;

    let pi_hat = mean_ignoring_missing(&concordance_rows(grid, &codebook)?)?;

    let min_counts = min_count_rows(grid, &codebook)?;
    let applicable = min_counts.iter().flatten().count();
    let min_sum: u32 = min_counts.iter().flatten().sum();
    let code_count = codebook.codes().len();
    if applicable == 0 || code_count == 0 {
        return Err(CodingError::structural(
            "no rows with codes in range".to_string(),
        ));
    }
    let pi_0 = f64::from(min_sum) / (applicable as f64 * code_count as f64);

    Ok(AgreementSummary {
        observed_agreement: pi_hat,
        chance_agreement: pi_0,
        coefficient: coefficient(pi_hat, pi_0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_model::CellValue;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[(&str, &str)]) -> Grid {
        Grid::new(
            rows.iter()
                .map(|(a, b)| vec![CellValue::from(*a), CellValue::from(*b)])
                .collect(),
        )
    }

    fn book(codes: &[&str], flags: &[&str]) -> Codebook {
        Codebook::new(
            codes.iter().map(|s| s.to_string()).collect(),
            flags.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn worked_example() {
        // A = {x, y}, B = {x}: a=2, b=1, x=1 -> pi_hat = 1/2.
        let rows =
            concordance_rows(&grid(&[("x,y", "x")]), &book(&["x", "y"], &[])).unwrap();
        assert_eq!(rows, vec![Some(0.5)]);
    }

    #[test]
    fn empty_and_flag_only_rows_are_not_applicable() {
        let codebook = book(&["x"], &["9"]);
        let g = grid(&[("", ""), ("9", ""), ("x", "x")]);
        assert_eq!(
            concordance_rows(&g, &codebook).unwrap(),
            vec![None, None, Some(1.0)]
        );
        // Min counts only skip fully empty rows; the flag-only row counts
        // zero substantive codes.
        assert_eq!(
            min_count_rows(&g, &codebook).unwrap(),
            vec![None, Some(0), Some(1)]
        );
    }

    #[test]
    fn flags_are_excluded_from_counts() {
        let rows = min_count_rows(&grid(&[("x,9,y", "x,9")]), &book(&["x", "y"], &["9"])).unwrap();
        assert_eq!(rows, vec![Some(1)]);
    }

    #[test]
    fn unrecognized_token_aborts() {
        let err = concordance_rows(&grid(&[("x,weird", "x")]), &book(&["x"], &[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "not recognized as either code or flag: weird"
        );
    }

    #[test]
    fn referenced_mode_summary() {
        let codebook = book(&["x", "y"], &[]);
        let g = grid(&[("x,y", "x"), ("y", "y")]);
        let summary = concordance(&g, &CodebookSource::Referenced(codebook)).unwrap();

        // pi_hat = (0.5 + 1.0) / 2; pi_0 = (1 + 1) / (2 rows * 2 codes).
        assert_eq!(summary.observed_agreement, 0.75);
        assert_eq!(summary.chance_agreement, 0.5);
        assert!((summary.coefficient - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inferred_mode_builds_codebook_from_range() {
        // "9" is just another code here; nothing marks it as a flag.
        let summary = concordance(&grid(&[("x,9", "x,9")]), &CodebookSource::Inferred).unwrap();
        assert_eq!(summary.observed_agreement, 1.0);
        assert_eq!(summary.coefficient, 1.0);
    }
}
