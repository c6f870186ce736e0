//! Cohen's kappa for exclusive coding (exactly one code per rater per row).

use std::collections::HashMap;

use concord_model::{require_single_code, CodingError, Grid};

use crate::summary::{summarize, AgreementSummary};

/// Per-row agreement indicators: 1 when both raters assigned the same single
/// code, 0 otherwise.
///
/// Fails with a [`CodingError::Validation`] when any cell holds more than one
/// code; exclusive kappa is only defined for single-code cells.
pub fn agreement_rows(grid: &Grid) -> Result<Vec<u8>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let code_a = require_single_code(cell_a)?;
            let code_b = require_single_code(cell_b)?;
            Ok(u8::from(code_a == code_b))
        })
        .collect()
}

/// Estimated probability of chance agreement, from the raters' marginal code
/// frequencies: `sum over codes c of countA(c) * countB(c) / N^2`.
pub fn chance_agreement(grid: &Grid) -> Result<f64, CodingError> {
    let pairs = grid.pairs()?;
    if pairs.is_empty() {
        return Err(CodingError::structural("no cells in range".to_string()));
    }

    let mut counts: HashMap<String, (u64, u64)> = HashMap::new();
    for (cell_a, cell_b) in &pairs {
        counts.entry(require_single_code(cell_a)?).or_default().0 += 1;
        counts.entry(require_single_code(cell_b)?).or_default().1 += 1;
    }

    let product_sum: u64 = counts.values().map(|(a, b)| a * b).sum();
    let n = pairs.len() as f64;
    Ok(product_sum as f64 / (n * n))
}

/// Cohen's kappa over a 2-column range of exclusive codings.
pub fn kappa(grid: &Grid) -> Result<AgreementSummary, CodingError> {
    let rows: Vec<Option<f64>> = agreement_rows(grid)?
        .into_iter()
        .map(|v| Some(f64::from(v)))
        .collect();
    let chance = chance_agreement(grid)?;
    summarize(&rows, None, chance)
}
