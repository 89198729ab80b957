// ─────────────────────────────────────────────────────────────────────
// Numlab — Root Finding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scalar root finding: bisection and Newton.
//!
//! Unlike the relaxation and linear solvers, running out of iterations
//! here is an error (`NotConverged`), not a flagged result.

use numlab_types::error::{NumlabError, NumlabResult};

/// Largest table `sample_function` will build.
pub const MAX_SAMPLE_POINTS: usize = 10_000_000;

/// f(x) = sinh(x^j) - cos^k(π x^m), with j, k, m in 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinhCosFunction {
    j: i32,
    k: i32,
    m: i32,
}

impl SinhCosFunction {
    pub fn new(j: u32, k: u32, m: u32) -> NumlabResult<Self> {
        for (name, v) in [("j", j), ("k", k), ("m", m)] {
            if !(1..=4).contains(&v) {
                return Err(NumlabError::ConfigError(format!(
                    "{name} must be in 1..=4, got {v}"
                )));
            }
        }
        // 1..=4 always fits
        Ok(SinhCosFunction {
            j: j as i32,
            k: k as i32,
            m: m as i32,
        })
    }

    pub fn value(&self, x: f64) -> f64 {
        let arg = std::f64::consts::PI * x.powi(self.m);
        x.powi(self.j).sinh() - arg.cos().powi(self.k)
    }

    /// j x^(j-1) cosh(x^j) + k m π x^(m-1) cos^(k-1)(π x^m) sin(π x^m)
    pub fn derivative(&self, x: f64) -> f64 {
        let (j, k, m) = (self.j as f64, self.k as f64, self.m as f64);
        let arg = std::f64::consts::PI * x.powi(self.m);
        let sinh_term = j * x.powi(self.j - 1) * x.powi(self.j).cosh();
        let cos_term = k
            * m
            * std::f64::consts::PI
            * x.powi(self.m - 1)
            * arg.cos().powi(self.k - 1)
            * arg.sin();
        sinh_term + cos_term
    }
}

/// A located root and the work it took.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootReport {
    pub root: f64,
    /// f(root)
    pub value: f64,
    pub iterations: usize,
}

fn check_tolerance(tol: f64, max_iter: usize) -> NumlabResult<()> {
    if !tol.is_finite() || tol <= 0.0 {
        return Err(NumlabError::ConfigError(format!(
            "tolerance must be finite and > 0, got {tol}"
        )));
    }
    if max_iter == 0 {
        return Err(NumlabError::ConfigError("max_iter must be >= 1".to_string()));
    }
    Ok(())
}

/// Interval halving on [a, b].
///
/// Stops at the midpoint c once |f(c)| < tol or the half-width drops
/// below tol.
pub fn bisection<F: Fn(f64) -> f64>(
    f: F,
    a: f64,
    b: f64,
    tol: f64,
    max_iter: usize,
) -> NumlabResult<RootReport> {
    check_tolerance(tol, max_iter)?;
    if !(a.is_finite() && b.is_finite() && a < b) {
        return Err(NumlabError::ConfigError(format!(
            "bracket must be finite with a < b, got [{a}, {b}]"
        )));
    }

    let (mut lo, mut hi) = (a, b);
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo * f_hi > 0.0 {
        return Err(NumlabError::SameSignBracket { a, b });
    }

    for k in 1..=max_iter {
        let c = 0.5 * (lo + hi);
        let fc = f(c);
        if fc.abs() < tol || 0.5 * (hi - lo) < tol {
            tracing::debug!(iterations = k, root = c, "bisection converged");
            return Ok(RootReport {
                root: c,
                value: fc,
                iterations: k,
            });
        }
        if f_lo * fc < 0.0 {
            hi = c;
        } else {
            lo = c;
            f_lo = fc;
        }
    }

    Err(NumlabError::NotConverged {
        method: "bisection",
        iterations: max_iter,
    })
}

/// Newton iteration from `x0`; stops when |x_new - x| < tol.
pub fn newton<F, D>(f: F, df: D, x0: f64, tol: f64, max_iter: usize) -> NumlabResult<RootReport>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    check_tolerance(tol, max_iter)?;
    let mut x = x0;
    for k in 1..=max_iter {
        let d = df(x);
        if d == 0.0 {
            return Err(NumlabError::ZeroDerivative { x });
        }
        let x_new = x - f(x) / d;
        if !x_new.is_finite() {
            break;
        }
        if (x_new - x).abs() < tol {
            tracing::debug!(iterations = k, root = x_new, "Newton converged");
            return Ok(RootReport {
                root: x_new,
                value: f(x_new),
                iterations: k,
            });
        }
        x = x_new;
    }

    Err(NumlabError::NotConverged {
        method: "Newton",
        iterations: max_iter,
    })
}

/// Table of (x, f(x)) for x = 0, step, 2·step, … up to 1.
///
/// Points are generated as i·step, so 1.0 itself is included whenever
/// step divides it.
pub fn sample_function<F: Fn(f64) -> f64>(f: F, step: f64) -> NumlabResult<Vec<(f64, f64)>> {
    if !(step > 0.0 && step <= 1.0) {
        return Err(NumlabError::ConfigError(format!(
            "step must be in (0, 1], got {step}"
        )));
    }
    let intervals = (1.0 / step + 1e-9).floor();
    if !(intervals < MAX_SAMPLE_POINTS as f64) {
        return Err(NumlabError::ConfigError(format!(
            "step {step} gives more than {MAX_SAMPLE_POINTS} points"
        )));
    }
    let count = intervals as usize;
    Ok((0..=count)
        .map(|i| {
            let x = i as f64 * step;
            (x, f(x))
        })
        .collect())
}
