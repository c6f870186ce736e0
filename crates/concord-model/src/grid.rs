use serde::{Deserialize, Serialize};

use crate::{CellValue, CodingError};

/// A 2D block of cell values, as handed over by the spreadsheet host.
///
/// The grid is row-major and may be ragged at the type level (the host's API
/// offers no rectangularity guarantee); consumers that require a fixed width
/// validate per row and report the offending **1-based** row index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a single-column grid, one value per row.
    pub fn column(values: impl IntoIterator<Item = CellValue>) -> Self {
        Self {
            rows: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    /// View the grid as `(rater A, rater B)` cell pairs.
    ///
    /// Fails with a [`CodingError::Structural`] naming the first row that does
    /// not hold exactly two cells.
    pub fn pairs(&self) -> Result<Vec<(&CellValue, &CellValue)>, CodingError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row.as_slice() {
                [a, b] => Ok((a, b)),
                other => Err(CodingError::bad_row_width(i + 1, 2, other.len())),
            })
            .collect()
    }

    /// Map a fallible per-row function over the grid, preserving row order.
    ///
    /// This is the "spreadsheet formula" shape: one output per input row.
    /// Errors from the closure are tagged with nothing extra; closures that
    /// need the row index receive it 1-based.
    pub fn map_rows<T>(
        &self,
        mut f: impl FnMut(usize, &[CellValue]) -> Result<T, CodingError>,
    ) -> Result<Vec<T>, CodingError> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| f(i + 1, row))
            .collect()
    }

    /// Map a fallible per-cell function over the grid, preserving its shape.
    pub fn map_cells(
        &self,
        mut f: impl FnMut(&CellValue) -> Result<CellValue, CodingError>,
    ) -> Result<Grid, CodingError> {
        let rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(&mut f).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Grid::new(rows))
    }
}

impl From<Vec<Vec<CellValue>>> for Grid {
    fn from(rows: Vec<Vec<CellValue>>) -> Self {
        Grid::new(rows)
    }
}
