//! Dense linear systems.
//!
//! LU factorisation with partial pivoting (PA = LU) and the Gauss-Seidel
//! iteration, plus the residual norms used to compare them.

use ndarray::{Array1, Array2};
use numlab_types::constants::PIVOT_EPS;
use numlab_types::error::{NumlabError, NumlabResult};

/// Packed LU factorisation: unit-lower L below the diagonal, U on and above.
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    lu: Array2<f64>,
    /// Row permutation: row `i` of PA is row `perm[i]` of A.
    perm: Vec<usize>,
}

impl LuDecomposition {
    /// Doolittle elimination with partial pivoting.
    pub fn new(a: &Array2<f64>) -> NumlabResult<Self> {
        let (n, m) = a.dim();
        if n != m {
            return Err(NumlabError::DimensionMismatch(format!(
                "LU requires a square matrix, got {n}x{m}"
            )));
        }
        if n == 0 {
            return Err(NumlabError::ConfigError("LU of an empty matrix".to_string()));
        }

        let mut lu = a.clone();
        let mut perm: Vec<usize> = (0..n).collect();

        for k in 0..n {
            // Pivot: largest |entry| in column k at or below the diagonal
            let mut p = k;
            let mut max = lu[[k, k]].abs();
            for i in (k + 1)..n {
                let v = lu[[i, k]].abs();
                if v > max {
                    max = v;
                    p = i;
                }
            }
            if max < PIVOT_EPS {
                return Err(NumlabError::SingularMatrix(format!(
                    "zero pivot in column {k}"
                )));
            }
            if p != k {
                for j in 0..n {
                    lu.swap([k, j], [p, j]);
                }
                perm.swap(k, p);
            }

            let pivot = lu[[k, k]];
            for i in (k + 1)..n {
                let factor = lu[[i, k]] / pivot;
                lu[[i, k]] = factor;
                for j in (k + 1)..n {
                    lu[[i, j]] -= factor * lu[[k, j]];
                }
            }
        }

        Ok(LuDecomposition { lu, perm })
    }

    pub fn dim(&self) -> usize {
        self.perm.len()
    }

    /// Solve Ax = b by forward then backward substitution.
    pub fn solve(&self, b: &Array1<f64>) -> NumlabResult<Array1<f64>> {
        let n = self.dim();
        if b.len() != n {
            return Err(NumlabError::DimensionMismatch(format!(
                "rhs has {} entries for a {n}x{n} system",
                b.len()
            )));
        }

        // Ly = Pb
        let mut y = Array1::<f64>::zeros(n);
        for i in 0..n {
            let mut sum = b[self.perm[i]];
            for j in 0..i {
                sum -= self.lu[[i, j]] * y[j];
            }
            y[i] = sum;
        }

        // Ux = y
        let mut x = Array1::<f64>::zeros(n);
        for i in (0..n).rev() {
            let mut sum = y[i];
            for j in (i + 1)..n {
                sum -= self.lu[[i, j]] * x[j];
            }
            x[i] = sum / self.lu[[i, i]];
        }
        Ok(x)
    }

    /// det(A), sign included from the row swaps.
    pub fn determinant(&self) -> f64 {
        let n = self.dim();
        let mut det: f64 = (0..n).map(|i| self.lu[[i, i]]).product();
        // Parity of the permutation via cycle decomposition
        let mut seen = vec![false; n];
        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut len = 0;
            let mut i = start;
            while !seen[i] {
                seen[i] = true;
                i = self.perm[i];
                len += 1;
            }
            if len % 2 == 0 {
                det = -det;
            }
        }
        det
    }
}

/// Factor and solve in one call.
pub fn lu_solve(a: &Array2<f64>, b: &Array1<f64>) -> NumlabResult<Array1<f64>> {
    LuDecomposition::new(a)?.solve(b)
}

/// Result of an iterative linear solve.
#[derive(Debug, Clone)]
pub struct IterativeSolution {
    pub x: Array1<f64>,
    pub iterations: usize,
    pub converged: bool,
}

/// Gauss-Seidel iteration from x = 0.
///
/// Stops when ‖x - x_old‖∞ < `epsilon`. Hitting `max_iter` is not an
/// error: the last iterate is returned with `converged = false`.
pub fn gauss_seidel(
    a: &Array2<f64>,
    b: &Array1<f64>,
    epsilon: f64,
    max_iter: usize,
) -> NumlabResult<IterativeSolution> {
    let (n, m) = a.dim();
    if n != m || b.len() != n {
        return Err(NumlabError::DimensionMismatch(format!(
            "Gauss-Seidel needs a square matrix and matching rhs, got {n}x{m} and {}",
            b.len()
        )));
    }
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(NumlabError::ConfigError(format!(
            "epsilon must be finite and > 0, got {epsilon}"
        )));
    }
    if let Some(i) = (0..n).find(|&i| a[[i, i]].abs() < PIVOT_EPS) {
        return Err(NumlabError::SingularMatrix(format!(
            "zero diagonal element at row {i}"
        )));
    }

    let mut x = Array1::<f64>::zeros(n);
    for k in 1..=max_iter {
        let mut delta: f64 = 0.0;
        for i in 0..n {
            let mut s = b[i];
            for j in 0..n {
                if j != i {
                    s -= a[[i, j]] * x[j];
                }
            }
            let xi = s / a[[i, i]];
            delta = delta.max((xi - x[i]).abs());
            x[i] = xi;
        }
        if !delta.is_finite() {
            return Err(NumlabError::NotConverged {
                method: "Gauss-Seidel",
                iterations: k,
            });
        }
        if delta < epsilon {
            tracing::debug!(iterations = k, delta, "Gauss-Seidel converged");
            return Ok(IterativeSolution {
                x,
                iterations: k,
                converged: true,
            });
        }
    }

    tracing::warn!(max_iter, "Gauss-Seidel did not converge within the iteration cap");
    Ok(IterativeSolution {
        x,
        iterations: max_iter,
        converged: false,
    })
}

/// ‖v‖∞
pub fn inf_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0_f64, |m, x| m.max(x.abs()))
}

/// ‖v‖₂
pub fn l2_norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// ‖Ax - b‖₂
pub fn residual_norm(a: &Array2<f64>, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
    l2_norm(&(a.dot(x) - b))
}

/// Diagonally dominant test system with weak alternating-sign coupling.
///
/// With 1-based i, j:
///   a_ii = 10 i^(n/2),  a_ij = (-1)^(i+j) 1e-3 (i/j)^(1/q),  b_i = 9 i^(n/2)
pub fn coursework_system(n: usize, q: f64) -> NumlabResult<(Array2<f64>, Array1<f64>)> {
    if n == 0 {
        return Err(NumlabError::ConfigError("system size must be > 0".to_string()));
    }
    if !q.is_finite() || q == 0.0 {
        return Err(NumlabError::ConfigError(format!("q must be finite and non-zero, got {q}")));
    }
    let half_n = n as f64 / 2.0;
    let a = Array2::from_shape_fn((n, n), |(r, c)| {
        let (i, j) = ((r + 1) as f64, (c + 1) as f64);
        if r == c {
            10.0 * i.powf(half_n)
        } else {
            let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
            sign * 1e-3 * (i / j).powf(1.0 / q)
        }
    });
    let b = Array1::from_shape_fn(n, |r| 9.0 * ((r + 1) as f64).powf(half_n));
    Ok((a, b))
}
