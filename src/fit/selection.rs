//! Family comparison: fit every family and rank by R².
//!
//! Families that cannot be fitted to the data (log of a non-positive value,
//! too few points, singular design) are reported as skipped with the reason
//! rather than failing the whole comparison.
//!
//! Ranking rules:
//! 1. Higher R² first.
//! 2. If two R² values agree to within `R2_TIE`, the model with fewer parameters wins.

use crate::domain::{FitOptions, FittedModel, MAX_POLYNOMIAL_ORDER, MIN_POLYNOMIAL_ORDER, ModelFamily, SamplePair};
use crate::error::FitError;
use crate::fit::fitter::fit_with_options;

/// R² differences below this are treated as ties.
const R2_TIE: f64 = 1e-12;

/// Output of fitting + ranking.
#[derive(Debug, Clone)]
pub struct FamilyRanking {
    /// Successful fits, best first.
    pub ranked: Vec<FittedModel>,
    /// Families that could not be fitted and why.
    pub skipped: Vec<(ModelFamily, FitError)>,
}

impl FamilyRanking {
    pub fn best(&self) -> Option<&FittedModel> {
        self.ranked.first()
    }
}

/// The families compared by `rank_families`.
pub fn candidate_families(max_order: usize) -> Vec<ModelFamily> {
    let max_order = max_order.clamp(MIN_POLYNOMIAL_ORDER, MAX_POLYNOMIAL_ORDER);
    let mut out = vec![
        ModelFamily::Linear,
        ModelFamily::Exponential,
        ModelFamily::Logarithmic,
        ModelFamily::Power,
    ];
    out.extend((2..=max_order).map(ModelFamily::Polynomial));
    out
}

/// Fit every candidate family and rank the successful fits.
///
/// `max_order` caps the polynomial orders tried (clamped into `[1, 10]`;
/// order 1 is the linear model and is not repeated).
pub fn rank_families(samples: &[SamplePair], max_order: usize, opts: &FitOptions) -> FamilyRanking {
    let mut ranked = Vec::new();
    let mut skipped = Vec::new();

    for family in candidate_families(max_order) {
        match fit_with_options(samples, family, opts) {
            Ok(model) => ranked.push(model),
            Err(err) => skipped.push((family, err)),
        }
    }

    // R² is quantized to `R2_TIE` so near-equal fits compare as equal and the
    // sort key stays a total order.
    ranked.sort_by_key(|m| {
        let r2_bucket = (m.quality.r_squared / R2_TIE).round() as i64;
        (std::cmp::Reverse(r2_bucket), m.family.param_count())
    });

    FamilyRanking { ranked, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reference_samples;

    #[test]
    fn candidates_respect_max_order() {
        assert_eq!(candidate_families(1).len(), 4);
        assert_eq!(candidate_families(3).last(), Some(&ModelFamily::Polynomial(3)));
        assert_eq!(candidate_families(99).len(), 4 + 9);
    }

    #[test]
    fn reference_data_skips_log_families() {
        let ranking = rank_families(&reference_samples(), 4, &FitOptions::default());

        let skipped: Vec<ModelFamily> = ranking.skipped.iter().map(|(f, _)| *f).collect();
        assert!(skipped.contains(&ModelFamily::Exponential));
        assert!(skipped.contains(&ModelFamily::Logarithmic));
        assert!(skipped.contains(&ModelFamily::Power));

        // Higher polynomial orders can only improve R² on nested models.
        assert_eq!(ranking.best().map(|m| m.family), Some(ModelFamily::Polynomial(4)));
        for pair in ranking.ranked.windows(2) {
            assert!(pair[0].quality.r_squared >= pair[1].quality.r_squared - R2_TIE);
        }
    }

    #[test]
    fn exact_ties_prefer_fewer_parameters() {
        // A straight line is fitted exactly by linear and every polynomial.
        let samples: Vec<SamplePair> = (1..=8).map(|i| SamplePair::new(i as f64, 2.0 * i as f64 + 1.0)).collect();
        let ranking = rank_families(&samples, 3, &FitOptions::default());
        assert_eq!(ranking.best().map(|m| m.family), Some(ModelFamily::Linear));
    }

    #[test]
    fn overflowing_families_are_skipped_not_ranked() {
        let samples: Vec<SamplePair> = [(1000.0, 1.0), (1001.0, (-1.0_f64).exp())]
            .into_iter()
            .map(SamplePair::from)
            .collect();
        let ranking = rank_families(&samples, 1, &FitOptions::default());

        assert!(ranking.ranked.iter().all(|m| m.quality.r_squared.is_finite()));
        assert!(ranking.skipped.iter().any(|(f, e)| {
            *f == ModelFamily::Exponential && matches!(e, FitError::CoefficientOverflow { .. })
        }));
    }
}
