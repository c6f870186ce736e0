//! Spreadsheet-facing entry points.
//!
//! These mirror the custom functions a host exposes in formulas: grids in,
//! grids (or scalars) out, with per-row outputs preserving the input's row
//! order. All of them are pure; the host maps a returned error to a single
//! error value in the output cell rather than failing the whole sheet.

use concord_model::{
    codes_in_cell, count_code_in, load_codebook, unique_codes_in, CellValue, Codebook,
    CodebookProvider, CodingError, FinalNames, Grid,
};

use crate::cohen::{agreement_rows, chance_agreement};
use crate::cohen_multi::{chance_agreement_multi, common_code_rows, max_count_rows};
use crate::diff::diff_codes;
use crate::krippendorff::CoincidenceMatrix;
use crate::kupper_hafner::{concordance_rows, min_count_rows};

/// Resolve the codebook for a statistic call: an explicit question id loads
/// the question's codebook through the provider, otherwise the codebook is
/// inferred from the range itself.
pub fn resolve_codebook(
    provider: &impl CodebookProvider,
    question_id: Option<&str>,
    grid: &Grid,
) -> Result<Codebook, CodingError> {
    match question_id {
        Some(question_id) => load_codebook(provider, question_id),
        None => Codebook::inferred_from(grid),
    }
}

/// Per-row agree/conflict labels for a 2-column range.
pub fn codes_agree(grid: &Grid, codebook: &Codebook) -> Result<Grid, CodingError> {
    let cells = grid
        .pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let diff = diff_codes(&codes_in_cell(cell_a)?, &codes_in_cell(cell_b)?, codebook)?;
            Ok(CellValue::from(diff.status().to_string()))
        })
        .collect::<Result<Vec<_>, CodingError>>()?;
    Ok(Grid::column(cells))
}

/// Per-row 0/1 agreement for exclusive (single-code) cells.
pub fn codes_agree2(grid: &Grid) -> Result<Grid, CodingError> {
    Ok(Grid::column(
        agreement_rows(grid)?
            .into_iter()
            .map(|v| CellValue::Number(f64::from(v))),
    ))
}

/// Per-row count of codes the two raters share.
pub fn codes_agree_count(grid: &Grid) -> Result<Grid, CodingError> {
    Ok(Grid::column(
        common_code_rows(grid)?
            .into_iter()
            .map(|v| CellValue::Number(f64::from(v))),
    ))
}

/// Per-row maximum code count across the two raters.
pub fn max_count(grid: &Grid) -> Result<Grid, CodingError> {
    Ok(Grid::column(
        max_count_rows(grid)?
            .into_iter()
            .map(|v| CellValue::Number(f64::from(v))),
    ))
}

/// Chance-agreement scalar for exclusive Cohen's kappa.
pub fn cohen_probability(grid: &Grid) -> Result<f64, CodingError> {
    chance_agreement(grid)
}

/// Chance-agreement scalar for the multi-code kappa variant.
pub fn cohen_probability_multiple(grid: &Grid) -> Result<f64, CodingError> {
    chance_agreement_multi(grid)
}

/// Per-row Kupper-Hafner concordance values; not-applicable rows render as
/// empty cells.
pub fn concordance(grid: &Grid, codebook: &Codebook) -> Result<Grid, CodingError> {
    Ok(Grid::column(
        concordance_rows(grid, codebook)?
            .into_iter()
            .map(|v| v.map(CellValue::Number).unwrap_or_default()),
    ))
}

/// Per-row Kupper-Hafner minimum substantive-code counts; not-applicable rows
/// render as empty cells.
pub fn min_count(grid: &Grid, codebook: &Codebook) -> Result<Grid, CodingError> {
    Ok(Grid::column(min_count_rows(grid, codebook)?.into_iter().map(
        |v| v.map(|n| CellValue::Number(f64::from(n))).unwrap_or_default(),
    )))
}

/// Labeled coincidence matrix for a Krippendorff range.
pub fn coincidence_matrix(grid: &Grid) -> Result<Grid, CodingError> {
    Ok(CoincidenceMatrix::build(grid)?.to_grid())
}

/// Count occurrences of each code in `codes_grid` across `range`, preserving
/// the shape of `codes_grid`.
pub fn count_code(codes_grid: &Grid, range: &Grid) -> Result<Grid, CodingError> {
    codes_grid.map_cells(|cell| {
        let code = cell.as_text()?;
        Ok(CellValue::Number(count_code_in(code.trim(), range)? as f64))
    })
}

/// One row per distinct code in the range, in first-seen order.
pub fn list_unique_codes(grid: &Grid) -> Result<Grid, CodingError> {
    Ok(Grid::column(
        unique_codes_in(grid)?.into_iter().map(CellValue::from),
    ))
}

/// Number of distinct codes in the range.
pub fn count_unique_codes(grid: &Grid) -> Result<usize, CodingError> {
    Ok(unique_codes_in(grid)?.len())
}

/// Rewrite every cell's code list to the codebook's final names, preserving
/// the grid's shape.
pub fn final_names(grid: &Grid, names: &FinalNames) -> Result<Grid, CodingError> {
    grid.map_cells(|cell| Ok(CellValue::from(names.rename_cell(cell)?)))
}

/// Tally each final code's occurrences across the range: one `(code, count)`
/// row per final name, in codebook order.
pub fn count_codebook(names: &FinalNames, range: &Grid) -> Result<Grid, CodingError> {
    let rows = names
        .final_code_list()
        .into_iter()
        .map(|code| {
            let count = count_code_in(&code, range)?;
            Ok(vec![CellValue::from(code), CellValue::Number(count as f64)])
        })
        .collect::<Result<Vec<_>, CodingError>>()?;
    Ok(Grid::new(rows))
}
