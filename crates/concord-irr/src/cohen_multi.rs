//! Multi-code generalization of Cohen's kappa.
//!
//! This variant scores rows by how many codes the two raters share, weighted
//! by the larger of the two code-set sizes, with chance agreement estimated
//! from multi-valued marginal counts. It is a heuristic generalization, not a
//! peer-reviewed statistic; treat the resulting coefficient as approximate.
//! The formula is deliberately left as-is rather than "corrected".

use std::collections::HashMap;

use concord_model::{codes_in_cell, CodingError, Grid};

use crate::summary::{summarize, AgreementSummary};

/// Per-row count of codes common to both raters' lists.
pub fn common_code_rows(grid: &Grid) -> Result<Vec<u32>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let codes_a = codes_in_cell(cell_a)?;
            let codes_b = codes_in_cell(cell_b)?;
            Ok(codes_a.iter().filter(|c| codes_b.contains(c)).count() as u32)
        })
        .collect()
}

/// Per-row maximum of the two raters' code counts.
pub fn max_count_rows(grid: &Grid) -> Result<Vec<u32>, CodingError> {
    grid.pairs()?
        .into_iter()
        .map(|(cell_a, cell_b)| {
            let codes_a = codes_in_cell(cell_a)?;
            let codes_b = codes_in_cell(cell_b)?;
            Ok(codes_a.len().max(codes_b.len()) as u32)
        })
        .collect()
}

/// Chance agreement over multi-valued marginals:
/// `sum over codes c of countA(c) * countB(c) / N^2`, where each rater's
/// count tallies every cell their list mentions the code in.
pub fn chance_agreement_multi(grid: &Grid) -> Result<f64, CodingError> {
    let pairs = grid.pairs()?;
    if pairs.is_empty() {
        return Err(CodingError::structural("no cells in range".to_string()));
    }

    let mut counts: HashMap<String, (u64, u64)> = HashMap::new();
    for (cell_a, cell_b) in &pairs {
        for code in codes_in_cell(cell_a)? {
            counts.entry(code).or_default().0 += 1;
        }
        for code in codes_in_cell(cell_b)? {
            counts.entry(code).or_default().1 += 1;
        }
    }

    let product_sum: u64 = counts.values().map(|(a, b)| a * b).sum();
    let n = pairs.len() as f64;
    Ok(product_sum as f64 / (n * n))
}

/// Approximate multi-code Cohen's kappa over a 2-column range.
///
/// Observed agreement is `sum(common codes) / sum(max counts)`; rows where
/// neither rater assigned any code carry zero weight and drop out.
pub fn kappa_multi(grid: &Grid) -> Result<AgreementSummary, CodingError> {
    let common = common_code_rows(grid)?;
    let weights: Vec<f64> = max_count_rows(grid)?.into_iter().map(f64::from).collect();
    let values: Vec<Option<f64>> = common
        .into_iter()
        .zip(&weights)
        .map(|(c, w)| if *w == 0.0 { None } else { Some(f64::from(c)) })
        .collect();
    let chance = chance_agreement_multi(grid)?;
    summarize(&values, Some(&weights), chance)
}
