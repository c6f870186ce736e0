//! Krippendorff's alpha via a coincidence matrix.
//!
//! Unlike the pairwise statistics, alpha generalizes to any number of rater
//! columns. Each cell holds at most one code; empty cells are missing data.
//! For a row with `k` ratable values, every ordered pair of values in that
//! row adds `1 / (k - 1)` to the corresponding matrix cell.

use serde::{Deserialize, Serialize};

use concord_model::{require_single_code, CellValue, CodingError, Grid};

/// Pairwise co-occurrence weight table over the distinct codes of a range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoincidenceMatrix {
    codes: Vec<String>,
    /// Row-major `codes.len() x codes.len()` weights.
    counts: Vec<f64>,
}

impl CoincidenceMatrix {
    /// Build the matrix for a range of single-code cells.
    ///
    /// Fails with a [`CodingError::Validation`] when a cell holds more than
    /// one code. Rows with fewer than two ratable values contribute nothing.
    pub fn build(grid: &Grid) -> Result<Self, CodingError> {
        let mut codes: Vec<String> = Vec::new();
        let mut row_values: Vec<Vec<usize>> = Vec::with_capacity(grid.height());

        for row in grid.rows() {
            let mut values = Vec::with_capacity(row.len());
            for cell in row {
                let code = require_single_code(cell)?;
                if code.is_empty() {
                    continue; // missing data
                }
                let index = match codes.iter().position(|c| *c == code) {
                    Some(i) => i,
                    None => {
                        codes.push(code);
                        codes.len() - 1
                    }
                };
                values.push(index);
            }
            row_values.push(values);
        }

        let n = codes.len();
        let mut counts = vec![0.0; n * n];
        for values in &row_values {
            if values.len() < 2 {
                continue;
            }
            let weight = 1.0 / (values.len() - 1) as f64;
            for (i, &a) in values.iter().enumerate() {
                for (j, &b) in values.iter().enumerate() {
                    if i != j {
                        counts[a * n + b] += weight;
                    }
                }
            }
        }

        Ok(Self { codes, counts })
    }

    /// The distinct codes of the range, in first-seen order. These label both
    /// axes of the matrix.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Accumulated weight for the ordered code pair `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.counts[i * self.codes.len() + j]
    }

    /// Marginal total for code `i` (its matrix row sum). This equals the
    /// code's pairable count: how often it was rated in rows with at least
    /// two ratings.
    pub fn marginal(&self, i: usize) -> f64 {
        let n = self.codes.len();
        self.counts[i * n..(i + 1) * n].iter().sum()
    }

    /// Total pairable count across all codes.
    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    /// Render the matrix as a labeled grid: a header row of codes, then one
    /// row per code with its label followed by the weights.
    pub fn to_grid(&self) -> Grid {
        let n = self.codes.len();
        let mut rows = Vec::with_capacity(n + 1);

        let mut header = Vec::with_capacity(n + 1);
        header.push(CellValue::Empty);
        header.extend(self.codes.iter().map(|c| CellValue::from(c.as_str())));
        rows.push(header);

        for (i, code) in self.codes.iter().enumerate() {
            let mut row = Vec::with_capacity(n + 1);
            row.push(CellValue::from(code.as_str()));
            row.extend((0..n).map(|j| CellValue::Number(self.get(i, j))));
            rows.push(row);
        }

        Grid::new(rows)
    }
}

/// Sum of the products of every unordered pair of values:
/// `sum over i < j of v[i] * v[j]`.
pub fn product_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            sum += values[i] * values[j];
        }
    }
    sum
}

/// Corpus-level Krippendorff result.
///
/// Alpha is `1 - observed_disagreement / expected_disagreement`; both
/// disagreement terms are normalized by the total pairable count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KrippendorffAlpha {
    pub observed_disagreement: f64,
    pub expected_disagreement: f64,
    pub alpha: f64,
}

/// Krippendorff's alpha over a range with two or more rater columns.
///
/// Rows with fewer than two ratable values are excluded from the pairable
/// denominator. When every pairable value carries the same code there is no
/// disagreement to expect and alpha is 1 by definition.
pub fn alpha(grid: &Grid) -> Result<KrippendorffAlpha, CodingError> {
    let matrix = CoincidenceMatrix::build(grid)?;
    let n = matrix.codes().len();
    let total = matrix.total();

    if total <= 0.0 {
        return Err(CodingError::structural(
            "no rows with two or more ratings in range".to_string(),
        ));
    }

    let mut observed_sum = 0.0;
    let mut expected_sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                observed_sum += matrix.get(i, j);
                expected_sum += matrix.marginal(i) * matrix.marginal(j);
            }
        }
    }

    let observed = observed_sum / total;
    let expected = expected_sum / (total * (total - 1.0));

    let alpha = if expected == 0.0 {
        // A single distinct code: perfect agreement, no chance structure.
        1.0
    } else {
        1.0 - observed / expected
    };

    Ok(KrippendorffAlpha {
        observed_disagreement: observed,
        expected_disagreement: expected,
        alpha,
    })
}
