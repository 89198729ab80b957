// ─────────────────────────────────────────────────────────────────────
// Numlab — Power Iteration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Power iteration for the dominant eigenvalue.
//!
//! Step k:
//!   e^(k-1) = x^(k-1) / ‖x^(k-1)‖
//!   x^(k)   = A e^(k-1)
//!   λ^(k)   = <x^(k), e^(k-1)>
//! stopping once |λ^(k) - λ^(k-1)| < ε, with λ^(0) = 0.

use ndarray::{Array1, Array2};
use numlab_types::error::{NumlabError, NumlabResult};
use rand::Rng;

use crate::linalg::l2_norm;

#[derive(Debug, Clone)]
pub struct PowerIteration {
    pub eigenvalue: f64,
    /// Unit (L2) eigenvector estimate.
    pub eigenvector: Array1<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Symmetric test matrix with a growing diagonal.
///
/// With 1-based i, j:
///   a_ii = 10 i^(p/2),  a_ij = b ((i/j)^p + (j/i)^p)^(1/q)
pub fn coursework_matrix(n: usize, p: f64, q: f64, b: f64) -> NumlabResult<Array2<f64>> {
    if n == 0 {
        return Err(NumlabError::ConfigError("matrix size must be > 0".to_string()));
    }
    if !q.is_finite() || q == 0.0 {
        return Err(NumlabError::ConfigError(format!("q must be finite and non-zero, got {q}")));
    }
    Ok(Array2::from_shape_fn((n, n), |(r, c)| {
        let (i, j) = ((r + 1) as f64, (c + 1) as f64);
        if r == c {
            10.0 * i.powf(p / 2.0)
        } else {
            b * ((i / j).powf(p) + (j / i).powf(p)).powf(1.0 / q)
        }
    }))
}

/// Random start vector with components uniform in [0, 1).
pub fn random_start<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array1<f64> {
    Array1::from_shape_fn(n, |_| rng.gen::<f64>())
}

/// Run power iteration from `x0`.
///
/// Reaching `k_max` returns the last estimate with `converged = false`.
pub fn power_method(
    a: &Array2<f64>,
    x0: &Array1<f64>,
    epsilon: f64,
    k_max: usize,
) -> NumlabResult<PowerIteration> {
    let (n, m) = a.dim();
    if n != m || x0.len() != n {
        return Err(NumlabError::DimensionMismatch(format!(
            "power iteration needs a square matrix and matching start vector, got {n}x{m} and {}",
            x0.len()
        )));
    }
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(NumlabError::ConfigError(format!(
            "epsilon must be finite and > 0, got {epsilon}"
        )));
    }
    if k_max == 0 {
        return Err(NumlabError::ConfigError("k_max must be >= 1".to_string()));
    }

    let mut x = x0.clone();
    let mut e = x0.clone();
    let mut lambda = 0.0;

    for k in 1..=k_max {
        let norm = l2_norm(&x);
        if !(norm > 0.0 && norm.is_finite()) {
            return Err(NumlabError::ConfigError(format!(
                "iterate has norm {norm} at step {k}; start vector may be zero or orthogonal to the dominant eigenvector"
            )));
        }
        e = &x / norm;
        let x_next = a.dot(&e);
        let lambda_next = x_next.dot(&e);

        if (lambda_next - lambda).abs() < epsilon {
            tracing::debug!(iterations = k, eigenvalue = lambda_next, "power iteration converged");
            return Ok(PowerIteration {
                eigenvalue: lambda_next,
                eigenvector: normalized(&x_next, &e),
                iterations: k,
                converged: true,
            });
        }
        lambda = lambda_next;
        x = x_next;
    }

    tracing::warn!(k_max, eigenvalue = lambda, "power iteration reached k_max");
    Ok(PowerIteration {
        eigenvalue: lambda,
        eigenvector: normalized(&x, &e),
        iterations: k_max,
        converged: false,
    })
}

/// Unit vector along `v`, falling back to `fallback` when `v` vanishes.
fn normalized(v: &Array1<f64>, fallback: &Array1<f64>) -> Array1<f64> {
    let norm = l2_norm(v);
    if norm > 0.0 && norm.is_finite() {
        v / norm
    } else {
        fallback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_diagonal_matrix() {
        let a = Array2::from_diag(&array![1.0, 5.0, 2.0]);
        let res = power_method(&a, &array![1.0, 1.0, 1.0], 1e-12, 500).unwrap();
        assert!(res.converged);
        assert!((res.eigenvalue - 5.0).abs() < 1e-9);
        assert!((res.eigenvector[1].abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_symmetric_2x2() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let res = power_method(&a, &array![1.0, 0.0], 1e-12, 200).unwrap();
        assert!(res.converged);
        assert!((res.eigenvalue - 3.0).abs() < 1e-10);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((res.eigenvector[0] - s).abs() < 1e-5);
        assert!((res.eigenvector[1] - s).abs() < 1e-5);
    }

    #[test]
    fn test_coursework_matrix_eigenpair() {
        let a = coursework_matrix(6, 3.0, 2.0, 0.05).unwrap();
        assert!((a[[0, 0]] - 10.0).abs() < 1e-12);
        assert!((a[[0, 1]] - a[[1, 0]]).abs() < 1e-12, "matrix is symmetric");

        let mut rng = StdRng::seed_from_u64(7);
        let x0 = random_start(6, &mut rng);
        let res = power_method(&a, &x0, 1e-10, 10_000).unwrap();
        assert!(res.converged);

        // A v ≈ λ v
        let av = a.dot(&res.eigenvector);
        let lv = &res.eigenvector * res.eigenvalue;
        let err = l2_norm(&(av - lv));
        assert!(err < 1e-3 * res.eigenvalue, "‖Av - λv‖ = {err}");
        // Dominated by the largest diagonal 10 * 6^1.5
        assert!(res.eigenvalue > 10.0 * 6f64.powf(1.5));
    }

    #[test]
    fn test_cap_reported() {
        let a = coursework_matrix(6, 3.0, 2.0, 0.05).unwrap();
        let res = power_method(&a, &Array1::ones(6), 1e-300, 2).unwrap();
        assert!(!res.converged);
        assert_eq!(res.iterations, 2);
        assert!((l2_norm(&res.eigenvector) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cap_with_vanishing_iterate_stays_unit() {
        // nilpotent: A² = 0, so the second product is the zero vector
        let a = array![[1.0, 1.0], [-1.0, -1.0]];
        let res = power_method(&a, &array![1.0, 0.0], 1e-6, 2).unwrap();
        assert!(!res.converged);
        assert!(res.eigenvector.iter().all(|v| v.is_finite()));
        assert!((l2_norm(&res.eigenvector) - 1.0).abs() < 1e-12);
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((res.eigenvector[0] - s).abs() < 1e-12);
        assert!((res.eigenvector[1] + s).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_input() {
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        assert!(power_method(&a, &array![0.0, 0.0], 1e-6, 10).is_err());
        assert!(power_method(&a, &array![1.0, 0.0, 0.0], 1e-6, 10).is_err());
        assert!(power_method(&a, &array![1.0, 0.0], 0.0, 10).is_err());
        assert!(power_method(&a, &array![1.0, 0.0], 1e-6, 0).is_err());
    }

    #[test]
    fn test_random_start_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let x = random_start(100, &mut rng);
        assert!(x.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
