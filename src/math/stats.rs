//! Goodness-of-fit statistics.

use crate::domain::FitQuality;

/// Total sum of squares below this (relative to `n·ȳ²`) is treated as zero.
const FLAT_TOL: f64 = 1e-24;

/// Compute SSE, RMSE and `R² = 1 - SSE/SST` on the original scale.
///
/// For a flat response (`SST = 0`) R² is 1 when the fit is exact and 0
/// otherwise, instead of the undefined `0/0`.
pub fn fit_quality(observed: &[f64], fitted: &[f64]) -> FitQuality {
    let n = observed.len();
    let mean = observed.iter().sum::<f64>() / n.max(1) as f64;

    let sse: f64 = observed
        .iter()
        .zip(fitted.iter())
        .map(|(y, f)| (y - f) * (y - f))
        .sum();
    let sst: f64 = observed.iter().map(|y| (y - mean) * (y - mean)).sum();

    let scale = (n as f64 * mean * mean).max(1.0);
    let r_squared = if sst > FLAT_TOL * scale {
        1.0 - sse / sst
    } else if sse <= FLAT_TOL * scale {
        1.0
    } else {
        0.0
    };

    FitQuality {
        r_squared,
        sse,
        rmse: (sse / n.max(1) as f64).sqrt(),
        n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_fit_has_unit_r_squared() {
        let q = fit_quality(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert_eq!(q.r_squared, 1.0);
        assert_eq!(q.sse, 0.0);
        assert_eq!(q.n, 3);
    }

    #[test]
    fn mean_prediction_has_zero_r_squared() {
        let q = fit_quality(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]);
        assert!(q.r_squared.abs() < 1e-15);
        assert!((q.rmse - (2.0_f64 / 3.0).sqrt()).abs() < 1e-15);
    }

    #[test]
    fn flat_response_is_defined() {
        assert_eq!(fit_quality(&[5.0, 5.0], &[5.0, 5.0]).r_squared, 1.0);
        assert_eq!(fit_quality(&[5.0, 5.0], &[4.0, 6.0]).r_squared, 0.0);
    }
}
