// ─────────────────────────────────────────────────────────────────────
// Numlab — Quadrature
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical integration on [a, b].
//!
//! - Rectangle (midpoint) rule: h Σ f(a + (j - 1/2) h), j = 1..n
//! - Gauss-Legendre: ((b - a)/2) Σ A_i f((a + b)/2 + (b - a)/2 · t_i)
//!
//! Orders 5 and 7 use the tabulated 10-digit nodes; any other order gets
//! its nodes from Newton iteration on the Legendre polynomial P_m.

use numlab_types::constants::{GAUSS_5_NODES, GAUSS_5_WEIGHTS, GAUSS_7_NODES, GAUSS_7_WEIGHTS};
use numlab_types::error::{NumlabError, NumlabResult};

const NEWTON_TOL: f64 = 1e-14;
const NEWTON_MAX_ITERS: usize = 100;

/// One row of a rectangle-rule convergence study.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergencePoint {
    pub n: usize,
    pub value: f64,
    pub abs_error: f64,
}

/// Reference integrand (x² - 1) e^(-2x).
pub fn reference_integrand(x: f64) -> f64 {
    (x * x - 1.0) * (-2.0 * x).exp()
}

/// Antiderivative of [`reference_integrand`]: e^(-2x) (-x²/2 - x/2 + 1/4).
pub fn reference_antiderivative(x: f64) -> f64 {
    (-2.0 * x).exp() * (-0.5 * x * x - 0.5 * x + 0.25)
}

/// Exact ∫_a^b (x² - 1) e^(-2x) dx.
pub fn reference_exact(a: f64, b: f64) -> f64 {
    reference_antiderivative(b) - reference_antiderivative(a)
}

fn check_interval(a: f64, b: f64) -> NumlabResult<()> {
    if !a.is_finite() || !b.is_finite() {
        return Err(NumlabError::ConfigError(format!(
            "integration limits must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Err(NumlabError::ConfigError(
            "integration limits a and b must differ".to_string(),
        ));
    }
    Ok(())
}

fn finite_or_err(value: f64, a: f64, b: f64) -> NumlabResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumlabError::ConfigError(format!(
            "integrand is not finite on [{a}, {b}]"
        )))
    }
}

/// Composite midpoint rule with `n` sub-intervals.
pub fn rectangle_method<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> NumlabResult<f64> {
    check_interval(a, b)?;
    if n == 0 {
        return Err(NumlabError::ConfigError("n must be positive".to_string()));
    }
    let h = (b - a) / n as f64;
    let s: f64 = (1..=n).map(|j| f(a + (j as f64 - 0.5) * h)).sum();
    finite_or_err(h * s, a, b)
}

/// Nodes and weights of the m-point Gauss-Legendre rule on [-1, 1],
/// nodes ascending.
pub fn gauss_legendre_rule(m: usize) -> NumlabResult<(Vec<f64>, Vec<f64>)> {
    match m {
        5 => Ok((GAUSS_5_NODES.to_vec(), GAUSS_5_WEIGHTS.to_vec())),
        7 => Ok((GAUSS_7_NODES.to_vec(), GAUSS_7_WEIGHTS.to_vec())),
        _ => legendre_rule(m),
    }
}

/// Computed m-point Gauss-Legendre rule (no tables).
pub fn legendre_rule(m: usize) -> NumlabResult<(Vec<f64>, Vec<f64>)> {
    if m == 0 {
        return Err(NumlabError::ConfigError(
            "Gauss-Legendre order must be >= 1".to_string(),
        ));
    }

    let mut nodes = Vec::with_capacity(m);
    let mut weights = Vec::with_capacity(m);
    let mf = m as f64;

    for i in 1..=m {
        // Tricomi initial guess for the i-th root (descending)
        let mut x = (std::f64::consts::PI * (i as f64 - 0.25) / (mf + 0.5)).cos();
        let mut converged = false;
        for _ in 0..NEWTON_MAX_ITERS {
            let (p, d) = legendre_with_derivative(m, x);
            let dx = p / d;
            x -= dx;
            if dx.abs() < NEWTON_TOL {
                converged = true;
                break;
            }
        }
        if !converged {
            return Err(NumlabError::NotConverged {
                method: "Legendre root search",
                iterations: NEWTON_MAX_ITERS,
            });
        }
        let (_, dp) = legendre_with_derivative(m, x);
        nodes.push(x);
        weights.push(2.0 / ((1.0 - x * x) * dp * dp));
    }

    nodes.reverse();
    weights.reverse();
    Ok((nodes, weights))
}

/// P_m(x) and P_m'(x) via the three-term recurrence.
fn legendre_with_derivative(m: usize, x: f64) -> (f64, f64) {
    let mut p0 = 1.0;
    let mut p1 = x;
    for k in 2..=m {
        let kf = k as f64;
        let p2 = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    // p1 = P_m, p0 = P_{m-1} (P_0 = 1 when m = 1)
    let dp = m as f64 * (x * p1 - p0) / (x * x - 1.0);
    (p1, dp)
}

/// m-point Gauss-Legendre quadrature on [a, b].
pub fn gauss_method<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, m: usize) -> NumlabResult<f64> {
    check_interval(a, b)?;
    let (t, w) = gauss_legendre_rule(m)?;
    let xm = 0.5 * (b + a);
    let xr = 0.5 * (b - a);
    let s: f64 = t.iter().zip(w.iter()).map(|(&ti, &ai)| ai * f(xm + xr * ti)).sum();
    finite_or_err(xr * s, a, b)
}

/// Rectangle-rule values and absolute errors for each node count.
pub fn rectangle_convergence<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    exact: f64,
    n_values: &[usize],
) -> NumlabResult<Vec<ConvergencePoint>> {
    n_values
        .iter()
        .map(|&n| {
            let value = rectangle_method(&f, a, b, n)?;
            Ok(ConvergencePoint {
                n,
                value,
                abs_error: (value - exact).abs(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_exact_value() {
        // -1/4 - (11/4) e^-4
        let expected = -0.25 - 2.75 * (-4.0f64).exp();
        assert!((reference_exact(0.0, 2.0) - expected).abs() < 1e-15);
        assert!((reference_exact(0.0, 2.0) + 0.300368).abs() < 1e-6);
    }

    #[test]
    fn test_antiderivative_matches_integrand() {
        for &x in &[0.0, 0.3, 1.0, 1.7] {
            let h = 1e-5;
            let fd = (reference_antiderivative(x + h) - reference_antiderivative(x - h)) / (2.0 * h);
            assert!((fd - reference_integrand(x)).abs() < 1e-8);
        }
    }

    #[test]
    fn test_rectangle_converges() {
        let exact = reference_exact(0.0, 2.0);
        let ns: Vec<usize> = (1..=20).map(|k| 5 * k).collect();
        let table = rectangle_convergence(reference_integrand, 0.0, 2.0, exact, &ns).unwrap();
        assert_eq!(table.len(), 20);
        assert!(table[19].abs_error < table[0].abs_error / 100.0);
        assert!(table[19].abs_error < 1e-4);
    }

    #[test]
    fn test_rectangle_second_order() {
        let exact = reference_exact(0.0, 2.0);
        let e1 = (rectangle_method(reference_integrand, 0.0, 2.0, 40).unwrap() - exact).abs();
        let e2 = (rectangle_method(reference_integrand, 0.0, 2.0, 80).unwrap() - exact).abs();
        let ratio = e1 / e2;
        assert!((ratio - 4.0).abs() < 0.1, "error ratio {ratio}");
    }

    #[test]
    fn test_rectangle_exact_for_linear() {
        let v = rectangle_method(|x| 3.0 * x + 1.0, -1.0, 2.0, 3).unwrap();
        // ∫ = 1.5 x² + x from -1 to 2 = (6 + 2) - (1.5 - 1) = 7.5
        assert!((v - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_gauss_tabulated_accuracy() {
        let exact = reference_exact(0.0, 2.0);
        let g5 = gauss_method(reference_integrand, 0.0, 2.0, 5).unwrap();
        let g7 = gauss_method(reference_integrand, 0.0, 2.0, 7).unwrap();
        assert!((g5 - exact).abs() < 1e-5, "m=5 error {}", (g5 - exact).abs());
        assert!((g7 - exact).abs() < (g5 - exact).abs() + 1e-9);
        assert!((g7 - exact).abs() < 1e-8);
    }

    #[test]
    fn test_tables_match_computed_rule() {
        for m in [5, 7] {
            let (t_tab, w_tab) = gauss_legendre_rule(m).unwrap();
            let (t, w) = legendre_rule(m).unwrap();
            for i in 0..m {
                assert!((t_tab[i] - t[i]).abs() < 1e-9, "m={m} node {i}");
                assert!((w_tab[i] - w[i]).abs() < 1e-9, "m={m} weight {i}");
            }
        }
    }

    #[test]
    fn test_gauss_exact_for_degree_2m_minus_1() {
        for m in 1..=10usize {
            let deg = 2 * m - 1;
            let f = |x: f64| x.powi(deg as i32) + x.powi(deg.saturating_sub(1) as i32);
            let exact = 1.0 / (deg + 1) as f64 + 1.0 / deg as f64;
            let v = gauss_method(f, 0.0, 1.0, m).unwrap();
            let tol = if m == 5 || m == 7 { 1e-8 } else { 1e-12 };
            assert!((v - exact).abs() < tol, "m={m}: {v} vs {exact}");
        }
    }

    #[test]
    fn test_weights_sum_to_two() {
        for m in [1, 2, 3, 4, 6, 8, 12, 20] {
            let (_, w) = legendre_rule(m).unwrap();
            let s: f64 = w.iter().sum();
            assert!((s - 2.0).abs() < 1e-13, "m={m} sum {s}");
        }
    }

    #[test]
    fn test_invalid_input_rejected() {
        assert!(rectangle_method(reference_integrand, 1.0, 1.0, 10).is_err());
        assert!(rectangle_method(reference_integrand, 0.0, 1.0, 0).is_err());
        assert!(gauss_method(reference_integrand, 0.0, 1.0, 0).is_err());
        assert!(gauss_method(reference_integrand, f64::NAN, 1.0, 5).is_err());
        assert!(rectangle_method(|x| 1.0 / x, -1.0, 1.0, 1).is_err());
    }
}
