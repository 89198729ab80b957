// ─────────────────────────────────────────────────────────────────────
// Numlab — Tridiag
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Thomas algorithm (tridiagonal matrix algorithm) for tridiagonal systems.
//!
//! Forward sweep:
//!   alpha_i = -c_i / (b_i + a_i alpha_{i-1})
//!   beta_i  = (d_i - a_i beta_{i-1}) / (b_i + a_i alpha_{i-1})
//! Back substitution:
//!   x_i = alpha_i x_{i+1} + beta_i

use ndarray::Array2;
use numlab_types::constants::PIVOT_EPS;
use numlab_types::error::{NumlabError, NumlabResult};

/// Solve tridiagonal system Ax = d using the Thomas algorithm.
///
/// - `a`: sub-diagonal \[n\] (a\[0\] unused)
/// - `b`: main diagonal \[n\]
/// - `c`: super-diagonal \[n\] (c\[n-1\] unused)
/// - `d`: right-hand side \[n\]
///
/// Returns `SingularMatrix` when a sweep denominator vanishes.
pub fn thomas_solve(a: &[f64], b: &[f64], c: &[f64], d: &[f64]) -> NumlabResult<Vec<f64>> {
    let n = d.len();
    if n == 0 {
        return Err(NumlabError::ConfigError("system size must be > 0".to_string()));
    }
    if a.len() != n || b.len() != n || c.len() != n {
        return Err(NumlabError::DimensionMismatch(format!(
            "diagonals have lengths a={}, b={}, c={} for rhs of length {n}",
            a.len(),
            b.len(),
            c.len()
        )));
    }

    let mut alpha = vec![0.0; n];
    let mut beta = vec![0.0; n];

    // Forward sweep
    if b[0].abs() < PIVOT_EPS {
        return Err(NumlabError::SingularMatrix(
            "zero denominator in forward sweep at row 0".to_string(),
        ));
    }
    alpha[0] = -c[0] / b[0];
    beta[0] = d[0] / b[0];

    for i in 1..n {
        let den = b[i] + a[i] * alpha[i - 1];
        if den.abs() < PIVOT_EPS {
            return Err(NumlabError::SingularMatrix(format!(
                "zero denominator in forward sweep at row {i}"
            )));
        }
        alpha[i] = if i < n - 1 { -c[i] / den } else { 0.0 };
        beta[i] = (d[i] - a[i] * beta[i - 1]) / den;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = beta[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = alpha[i] * x[i + 1] + beta[i];
    }

    Ok(x)
}

/// A tridiagonal system stored as its three diagonals plus right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct TridiagonalSystem {
    pub sub: Vec<f64>,
    pub main: Vec<f64>,
    pub sup: Vec<f64>,
    pub rhs: Vec<f64>,
}

impl TridiagonalSystem {
    /// Extract the diagonals of a dense square matrix.
    ///
    /// Any non-zero entry with |i - j| > 1 is rejected as `NotTridiagonal`.
    pub fn from_dense(matrix: &Array2<f64>, rhs: &[f64]) -> NumlabResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(NumlabError::DimensionMismatch(format!(
                "matrix must be square, got {rows}x{cols}"
            )));
        }
        if rhs.len() != rows {
            return Err(NumlabError::DimensionMismatch(format!(
                "rhs has {} entries for a {rows}x{rows} matrix",
                rhs.len()
            )));
        }
        for ((row, col), &v) in matrix.indexed_iter() {
            if row.abs_diff(col) > 1 && v != 0.0 {
                return Err(NumlabError::NotTridiagonal { row, col });
            }
        }

        let n = rows;
        Ok(TridiagonalSystem {
            sub: (0..n).map(|i| if i > 0 { matrix[[i, i - 1]] } else { 0.0 }).collect(),
            main: (0..n).map(|i| matrix[[i, i]]).collect(),
            sup: (0..n)
                .map(|i| if i + 1 < n { matrix[[i, i + 1]] } else { 0.0 })
                .collect(),
            rhs: rhs.to_vec(),
        })
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    pub fn solve(&self) -> NumlabResult<Vec<f64>> {
        thomas_solve(&self.sub, &self.main, &self.sup, &self.rhs)
    }

    /// Rebuild the dense matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let n = self.len();
        let mut m = Array2::zeros((n, n));
        for i in 0..n {
            m[[i, i]] = self.main[i];
            if i > 0 {
                m[[i, i - 1]] = self.sub[i];
            }
            if i + 1 < n {
                m[[i, i + 1]] = self.sup[i];
            }
        }
        m
    }
}
