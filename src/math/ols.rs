//! Least squares solver.
//!
//! Every model family reduces to a small linear regression problem:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! where `x_i` is a design row built by `models::fill_design_row`.
//!
//! Implementation choices:
//! - We solve with SVD, which handles tall design matrices (more rows than
//!   columns). Nalgebra's `QR::solve` is intended for square systems.
//! - Polynomial design matrices mix columns of wildly different scale
//!   (`1` next to `x^10`). We equilibrate each column to unit norm before the
//!   decomposition and undo the scaling on the solution, which keeps the rank
//!   test meaningful.
//! - Rank deficiency (duplicate x values, too few distinct points) is reported
//!   instead of returning a minimum-norm solution.

use nalgebra::{DMatrix, DVector};

/// Singular values below `RANK_RTOL * σ_max` count as zero.
const RANK_RTOL: f64 = 1e-12;

/// Why a least squares solve failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeastSquaresError {
    /// The (equilibrated) design matrix has numerical rank below its column count.
    RankDeficient { rank: usize, columns: usize },
}

/// Solve a least squares problem using column-equilibrated SVD.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<DVector<f64>, LeastSquaresError> {
    let columns = x.ncols();

    let mut scaled = x.clone();
    let mut scales = Vec::with_capacity(columns);
    for j in 0..columns {
        let norm = scaled.column(j).norm();
        if !(norm.is_finite() && norm > 0.0) {
            // An all-zero column carries no information; the system is singular.
            return Err(LeastSquaresError::RankDeficient {
                rank: numerical_rank(x),
                columns,
            });
        }
        scaled.column_mut(j).unscale_mut(norm);
        scales.push(norm);
    }

    let svd = scaled.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = sigma_max * RANK_RTOL;

    let rank = svd.rank(eps);
    if rank < columns {
        return Err(LeastSquaresError::RankDeficient { rank, columns });
    }

    let beta_scaled = svd
        .solve(y, eps)
        .map_err(|_| LeastSquaresError::RankDeficient { rank, columns })?;

    let beta = DVector::from_iterator(
        columns,
        beta_scaled.iter().zip(scales.iter()).map(|(b, s)| b / s),
    );

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(LeastSquaresError::RankDeficient { rank, columns })
    }
}

fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let svd = x.clone().svd(false, false);
    let eps = svd.singular_values.max() * RANK_RTOL;
    svd.singular_values.iter().filter(|&&s| s > eps).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn least_squares_averages_noise() {
        // y = 1 + x with symmetric noise; the intercept/slope stay exact.
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 1.0, 0.0, 1.0, 2.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[0.5, 1.5, 2.5, 3.5]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 1.0).abs() < 1e-10);
        assert!((beta[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn duplicate_x_is_rank_deficient() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 4.0, 1.0, 4.0, 1.0, 4.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(
            solve_least_squares(&x, &y),
            Err(LeastSquaresError::RankDeficient { rank: 1, columns: 2 })
        );
    }

    #[test]
    fn zero_column_is_rank_deficient() {
        let x = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.0, 0.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(matches!(
            solve_least_squares(&x, &y),
            Err(LeastSquaresError::RankDeficient { columns: 2, .. })
        ));
    }
}
