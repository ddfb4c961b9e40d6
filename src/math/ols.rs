//! Ordinary least squares, delegated to nalgebra.
//!
//! Every regression in this crate is linear in its coefficients:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We solve with SVD so tall design matrices (many more days than columns)
//!   are handled directly. (Nalgebra's `QR::solve` is intended for square
//!   systems and will panic for non-square matrices.)
//! - Standard errors come from `σ² (XᵀX)⁻¹` with `σ² = SSE / (n - p)`.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Classical OLS standard errors for each column of `x`.
///
/// Returns `None` when there are no residual degrees of freedom or `XᵀX`
/// cannot be inverted.
pub fn coefficient_std_errors(x: &DMatrix<f64>, residuals: &DVector<f64>) -> Option<Vec<f64>> {
    let n = x.nrows();
    let p = x.ncols();
    if n <= p || residuals.len() != n {
        return None;
    }

    let sigma2 = residuals.norm_squared() / (n - p) as f64;
    let xtx_inv = (x.transpose() * x).try_inverse()?;

    let out: Vec<f64> = (0..p).map(|j| (sigma2 * xtx_inv[(j, j)]).sqrt()).collect();
    if out.iter().all(|v| v.is_finite()) {
        Some(out)
    } else {
        None
    }
}
