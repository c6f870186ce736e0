//! Corpus-level aggregation shared by all reliability statistics.

use serde::{Deserialize, Serialize};

use concord_model::CodingError;

/// Corpus-level result of a reliability statistic.
///
/// `coefficient = (observed - chance) / (1 - chance)` for every statistic in
/// this crate; they differ only in how the two estimates are computed.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub observed_agreement: f64,
    pub chance_agreement: f64,
    pub coefficient: f64,
}

impl AgreementSummary {
    pub fn from_parts(observed: f64, chance: f64) -> Self {
        Self {
            observed_agreement: observed,
            chance_agreement: chance,
            coefficient: coefficient(observed, chance),
        }
    }
}

/// The shared chance-corrected coefficient.
///
/// When chance agreement reaches 1 the denominator vanishes; the coefficient
/// is then 1 for perfect observed agreement and 0 otherwise, so the statistic
/// stays a total function.
pub fn coefficient(observed: f64, chance: f64) -> f64 {
    let denominator = 1.0 - chance;
    if denominator.abs() < f64::EPSILON {
        if (observed - 1.0).abs() < f64::EPSILON {
            1.0
        } else {
            0.0
        }
    } else {
        (observed - chance) / denominator
    }
}

/// Mean of the applicable rows. `None` entries mark rows that are not
/// applicable (e.g. both raters left the cell empty) and are excluded from
/// both numerator and denominator, not treated as zero.
pub fn mean_ignoring_missing(values: &[Option<f64>]) -> Result<f64, CodingError> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values.iter().flatten() {
        sum += value;
        count += 1;
    }
    if count == 0 {
        return Err(CodingError::structural(
            "no rows with codes in range".to_string(),
        ));
    }
    Ok(sum / count as f64)
}

/// Fold per-row values (and optional per-row weights) plus a chance estimate
/// into an [`AgreementSummary`].
///
/// Without weights, observed agreement is the mean of the applicable rows.
/// With weights, it is `sum(values) / sum(weights)` over the applicable rows
/// (the multi-code kappa shape, where a row's weight is its larger code
/// count).
pub fn summarize(
    values: &[Option<f64>],
    weights: Option<&[f64]>,
    chance: f64,
) -> Result<AgreementSummary, CodingError> {
    let observed = match weights {
        None => mean_ignoring_missing(values)?,
        Some(weights) => {
            debug_assert_eq!(values.len(), weights.len());
            let mut value_sum = 0.0;
            let mut weight_sum = 0.0;
            for (value, weight) in values.iter().zip(weights) {
                if let Some(value) = value {
                    value_sum += value;
                    weight_sum += weight;
                }
            }
            if weight_sum == 0.0 {
                return Err(CodingError::structural(
                    "no rows with codes in range".to_string(),
                ));
            }
            value_sum / weight_sum
        }
    };
    Ok(AgreementSummary::from_parts(observed, chance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_are_excluded_not_zeroed() {
        let mean = mean_ignoring_missing(&[Some(1.0), None, Some(0.0), None]).unwrap();
        assert_eq!(mean, 0.5);
    }

    #[test]
    fn all_missing_is_an_error() {
        assert!(mean_ignoring_missing(&[None, None]).is_err());
        assert!(mean_ignoring_missing(&[]).is_err());
    }

    #[test]
    fn coefficient_is_chance_corrected() {
        assert_eq!(coefficient(1.0, 0.5), 1.0);
        assert_eq!(coefficient(0.5, 0.5), 0.0);
        assert!(coefficient(0.25, 0.5) < 0.0);
    }

    #[test]
    fn degenerate_chance_never_divides_by_zero() {
        assert_eq!(coefficient(1.0, 1.0), 1.0);
        assert_eq!(coefficient(0.8, 1.0), 0.0);
    }

    #[test]
    fn weighted_fold_divides_sums() {
        let summary = summarize(
            &[Some(2.0), Some(1.0), None],
            Some(&[3.0, 1.0, 5.0]),
            0.25,
        )
        .unwrap();
        // 3 agreements over 4 weighted slots; the None row's weight drops out.
        assert_eq!(summary.observed_agreement, 0.75);
        assert_eq!(summary.chance_agreement, 0.25);
        assert!((summary.coefficient - (0.75 - 0.25) / 0.75).abs() < 1e-12);
    }
}
