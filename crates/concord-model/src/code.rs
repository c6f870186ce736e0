//! Parsing of comma-separated code lists out of raw cell values.
//!
//! Codes are opaque string tokens; equality is case-sensitive exact match.

use crate::{CellValue, CodingError, Grid};

/// Separator between codes within a single cell.
pub const CODE_SEPARATOR: char = ',';

/// Parse a cell's text into its code list: split on [`CODE_SEPARATOR`], trim
/// each token, drop empties, and deduplicate preserving first-seen order.
///
/// Never fails; an empty or all-whitespace cell yields an empty list.
pub fn parse_codes(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for token in text.split(CODE_SEPARATOR) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        if !codes.iter().any(|c| c == token) {
            codes.push(token.to_string());
        }
    }
    codes
}

/// Parse the code list out of a cell value.
///
/// Fails only when the value itself cannot be projected to text (dates).
pub fn codes_in_cell(cell: &CellValue) -> Result<Vec<String>, CodingError> {
    Ok(parse_codes(&cell.as_text()?))
}

/// Require that a cell holds at most one code and return it (trimmed).
///
/// An empty cell yields an empty string; statistics that treat empties as
/// missing data filter afterwards. A cell containing the separator fails with
/// a [`CodingError::Validation`].
pub fn require_single_code(cell: &CellValue) -> Result<String, CodingError> {
    let text = cell.as_text()?;
    if text.contains(CODE_SEPARATOR) {
        return Err(CodingError::validation(format!(
            "cell has more than one code: {text}"
        )));
    }
    Ok(text.trim().to_string())
}

/// All distinct codes appearing anywhere in the grid, in first-seen
/// (row-major) order.
pub fn unique_codes_in(grid: &Grid) -> Result<Vec<String>, CodingError> {
    let mut codes: Vec<String> = Vec::new();
    for cell in grid.cells() {
        for code in codes_in_cell(cell)? {
            if !codes.iter().any(|c| *c == code) {
                codes.push(code);
            }
        }
    }
    Ok(codes)
}

/// Count how many cells of the grid contain the given code.
///
/// Each cell contributes at most one occurrence per code because cell code
/// lists are deduplicated on parse.
pub fn count_code_in(code: &str, grid: &Grid) -> Result<usize, CodingError> {
    let mut count = 0;
    for cell in grid.cells() {
        if codes_in_cell(cell)?.iter().any(|c| c == code) {
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_splits_trims_and_dedupes() {
        assert_eq!(parse_codes("a, b ,a,,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_codes(""), Vec::<String>::new());
        assert_eq!(parse_codes(" , ,"), Vec::<String>::new());
    }

    #[test]
    fn parse_is_idempotent_on_normalized_text() {
        let once = parse_codes("b, a , b, c");
        let twice = parse_codes(&once.join(","));
        assert_eq!(once, twice);
    }

    #[test]
    fn single_code_validation() {
        assert_eq!(require_single_code(&CellValue::from("x ")).unwrap(), "x");
        assert_eq!(require_single_code(&CellValue::Empty).unwrap(), "");
        assert_eq!(require_single_code(&CellValue::from(7.0)).unwrap(), "7");
        assert!(matches!(
            require_single_code(&CellValue::from("x,y")),
            Err(CodingError::Validation { .. })
        ));
    }

    #[test]
    fn unique_codes_are_row_major_first_seen() {
        let grid = Grid::new(vec![
            vec![CellValue::from("b,a"), CellValue::from("c")],
            vec![CellValue::from("a"), CellValue::Empty],
        ]);
        assert_eq!(unique_codes_in(&grid).unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn count_counts_cells_not_tokens() {
        let grid = Grid::new(vec![
            vec![CellValue::from("a,a,b")],
            vec![CellValue::from("a")],
            vec![CellValue::from("c")],
        ]);
        assert_eq!(count_code_in("a", &grid).unwrap(), 2);
        assert_eq!(count_code_in("missing", &grid).unwrap(), 0);
    }
}
