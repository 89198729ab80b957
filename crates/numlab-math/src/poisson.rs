//! Relaxation solvers for the Dirichlet problem -Δu = f on a square grid.
//!
//! Five-point stencil with equal step h in both directions:
//!   u[i,j] = (u[i+1,j] + u[i-1,j] + u[i,j+1] + u[i,j-1] + h² f[i,j]) / 4
//!
//! Jacobi reads only the previous iterate and writes a second buffer.
//! The red-black sweep updates in place and doubles as Gauss-Seidel
//! (omega = 1) and SOR (1 < omega < 2).

use ndarray::Array2;
use numlab_types::config::RelaxationMethod;
use numlab_types::error::{NumlabError, NumlabResult};
use numlab_types::state::RelaxationState;

/// Outcome of [`relax`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationResult {
    pub converged: bool,
    /// Steps taken by this call.
    pub iterations: usize,
    /// Largest point change of the last step.
    pub max_diff: f64,
}

/// One Jacobi sweep from `u_old` into `u_new`.
///
/// Boundary rows/columns of `u_new` are NOT written.
/// Returns the largest |u_new - u_old| over interior points.
pub fn jacobi_step(u_old: &Array2<f64>, u_new: &mut Array2<f64>, source: &Array2<f64>, h: f64) -> f64 {
    let (rows, cols) = u_old.dim();
    debug_assert_eq!(u_new.dim(), (rows, cols));
    debug_assert_eq!(source.dim(), (rows, cols));
    let h_sq = h * h;

    let mut max_diff: f64 = 0.0;
    for i in 1..rows - 1 {
        for j in 1..cols - 1 {
            let neighbours = u_old[[i + 1, j]] + u_old[[i - 1, j]] + u_old[[i, j + 1]] + u_old[[i, j - 1]];
            let value = (neighbours + h_sq * source[[i, j]]) / 4.0;
            u_new[[i, j]] = value;
            max_diff = max_diff.max((value - u_old[[i, j]]).abs());
        }
    }
    max_diff
}

/// One red-black SOR sweep in place.
///
/// `omega = 1.0` is Gauss-Seidel. Returns the largest point change.
pub fn sor_step(u: &mut Array2<f64>, source: &Array2<f64>, h: f64, omega: f64) -> f64 {
    let (rows, cols) = u.dim();
    let h_sq = h * h;
    let mut max_diff: f64 = 0.0;

    // Red pass: (i + j) % 2 == 0, then black pass
    for parity in [0, 1] {
        for i in 1..rows - 1 {
            for j in 1..cols - 1 {
                if (i + j) % 2 != parity {
                    continue;
                }
                let neighbours = u[[i + 1, j]] + u[[i - 1, j]] + u[[i, j + 1]] + u[[i, j - 1]];
                let u_star = (neighbours + h_sq * source[[i, j]]) / 4.0;
                let old = u[[i, j]];
                let value = (1.0 - omega) * old + omega * u_star;
                u[[i, j]] = value;
                max_diff = max_diff.max((value - old).abs());
            }
        }
    }
    max_diff
}

/// Max-norm residual of the discrete equation: |(4u - Σneighbours)/h² - f|.
pub fn poisson_residual(u: &Array2<f64>, source: &Array2<f64>, h: f64) -> f64 {
    let (rows, cols) = u.dim();
    let h_sq = h * h;
    let mut max_res: f64 = 0.0;
    for i in 1..rows - 1 {
        for j in 1..cols - 1 {
            let neighbours = u[[i + 1, j]] + u[[i - 1, j]] + u[[i, j + 1]] + u[[i, j - 1]];
            let lhs = (4.0 * u[[i, j]] - neighbours) / h_sq;
            max_res = max_res.max((lhs - source[[i, j]]).abs());
        }
    }
    max_res
}

/// Advance `state` by one step of `method`.
///
/// Afterwards `u_old == u_new`, the iteration counter is incremented and
/// `last_max_diff` holds the returned change.
pub fn advance(state: &mut RelaxationState, source: &Array2<f64>, h: f64, method: RelaxationMethod) -> f64 {
    let max_diff = match method {
        RelaxationMethod::Jacobi => {
            let d = jacobi_step(&state.u_old, &mut state.u_new, source, h);
            state.u_old.assign(&state.u_new);
            d
        }
        RelaxationMethod::GaussSeidel => {
            let d = sor_step(&mut state.u_old, source, h, 1.0);
            state.u_new.assign(&state.u_old);
            d
        }
        RelaxationMethod::Sor { omega } => {
            let d = sor_step(&mut state.u_old, source, h, omega);
            state.u_new.assign(&state.u_old);
            d
        }
    };
    state.iteration += 1;
    state.last_max_diff = Some(max_diff);
    max_diff
}

/// Step until the largest point change drops below `epsilon` or
/// `max_iterations` steps have been taken.
///
/// A state that is already converged returns immediately with zero steps.
pub fn relax(
    state: &mut RelaxationState,
    source: &Array2<f64>,
    h: f64,
    method: RelaxationMethod,
    epsilon: f64,
    max_iterations: usize,
) -> NumlabResult<RelaxationResult> {
    validate_problem(state, source, h, method, epsilon)?;

    if state.is_converged(epsilon) {
        return Ok(RelaxationResult {
            converged: true,
            iterations: 0,
            max_diff: state.last_max_diff.unwrap_or(0.0),
        });
    }

    let mut max_diff = f64::INFINITY;
    for k in 1..=max_iterations {
        max_diff = advance(state, source, h, method);
        if !max_diff.is_finite() {
            return Err(NumlabError::ConfigError(format!(
                "relaxation diverged at step {}",
                state.iteration
            )));
        }
        if max_diff < epsilon {
            tracing::debug!(?method, iterations = k, max_diff, "relaxation converged");
            return Ok(RelaxationResult {
                converged: true,
                iterations: k,
                max_diff,
            });
        }
    }

    tracing::warn!(?method, max_iterations, max_diff, "relaxation hit iteration cap");
    Ok(RelaxationResult {
        converged: false,
        iterations: max_iterations,
        max_diff,
    })
}

/// Checks shared by [`relax`] and callers that drive [`advance`] directly.
pub fn validate_problem(
    state: &RelaxationState,
    source: &Array2<f64>,
    h: f64,
    method: RelaxationMethod,
    epsilon: f64,
) -> NumlabResult<()> {
    let (rows, cols) = state.u_old.dim();
    if rows < 3 || cols < 3 {
        return Err(NumlabError::ConfigError(format!(
            "relaxation grid {rows}x{cols} has no interior"
        )));
    }
    if source.dim() != (rows, cols) {
        return Err(NumlabError::DimensionMismatch(format!(
            "source is {:?}, grid is {rows}x{cols}",
            source.dim()
        )));
    }
    if !h.is_finite() || h <= 0.0 {
        return Err(NumlabError::ConfigError(format!("grid step must be > 0, got {h}")));
    }
    if !epsilon.is_finite() || epsilon <= 0.0 {
        return Err(NumlabError::ConfigError(format!(
            "epsilon must be finite and > 0, got {epsilon}"
        )));
    }
    if let RelaxationMethod::Sor { omega } = method {
        if !(omega > 0.0 && omega < 2.0) {
            return Err(NumlabError::ConfigError(format!(
                "SOR omega must lie in (0, 2), got {omega}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numlab_types::config::BoundaryConditions;
    use numlab_types::state::Grid2D;

    fn laplace_state(n: usize, bc: &BoundaryConditions) -> (RelaxationState, Array2<f64>) {
        let grid = Grid2D::new(n, 1.0).unwrap();
        (RelaxationState::new(&grid, bc), Array2::zeros((n, n)))
    }

    /// Field equal to `f` on the boundary and zero inside.
    fn boundary_from(grid: &Grid2D, f: impl Fn(f64, f64) -> f64) -> Array2<f64> {
        let mut u = grid.sample(f);
        let n = grid.n;
        for i in 1..n - 1 {
            for j in 1..n - 1 {
                u[[i, j]] = 0.0;
            }
        }
        u
    }

    #[test]
    fn test_first_jacobi_step_from_hot_top() {
        let (mut state, source) = laplace_state(10, &BoundaryConditions::default());
        let d = advance(&mut state, &source, 1.0, RelaxationMethod::Jacobi);

        assert!((d - 25.0).abs() < 1e-12);
        assert_eq!(state.iteration, 1);
        for j in 1..9 {
            assert!((state.u_old[[1, j]] - 25.0).abs() < 1e-12, "row 1 col {j}");
            assert_eq!(state.u_old[[2, j]], 0.0);
        }
        assert_eq!(state.u_old, state.u_new);
    }

    #[test]
    fn test_linear_boundary_reproduced_inside() {
        let grid = Grid2D::new(8, 0.5).unwrap();
        let exact = grid.sample(|x, y| x + y);
        let mut state = RelaxationState::from_field(boundary_from(&grid, |x, y| x + y)).unwrap();
        let source = Array2::zeros((8, 8));

        let res = relax(&mut state, &source, grid.h, RelaxationMethod::Jacobi, 1e-10, 20_000).unwrap();
        assert!(res.converged);
        for i in 0..8 {
            for j in 0..8 {
                let err = (state.u_old[[i, j]] - exact[[i, j]]).abs();
                assert!(err < 1e-6, "u[{i},{j}] off by {err}");
            }
        }
    }

    #[test]
    fn test_quadratic_solution_with_source() {
        // u = x² + y² satisfies -Δu = -4, and the 5-point stencil is exact for quadratics.
        let grid = Grid2D::new(9, 0.25).unwrap();
        let exact = grid.sample(|x, y| x * x + y * y);
        let mut state = RelaxationState::from_field(boundary_from(&grid, |x, y| x * x + y * y)).unwrap();
        let source = Array2::from_elem((9, 9), -4.0);

        let res = relax(
            &mut state,
            &source,
            grid.h,
            RelaxationMethod::Sor { omega: 1.5 },
            1e-12,
            10_000,
        )
        .unwrap();
        assert!(res.converged);
        let max_err = state
            .u_old
            .iter()
            .zip(exact.iter())
            .fold(0.0_f64, |m, (a, b)| m.max((a - b).abs()));
        assert!(max_err < 1e-9, "max error {max_err}");
        assert!(poisson_residual(&state.u_old, &source, grid.h) < 1e-8);
    }

    #[test]
    fn test_maximum_principle_and_symmetry() {
        let n = 10;
        let (mut state, source) = laplace_state(n, &BoundaryConditions::default());
        relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-6, 10_000).unwrap();

        for i in 1..n - 1 {
            for j in 1..n - 1 {
                let v = state.u_old[[i, j]];
                assert!(v > 0.0 && v < 100.0, "u[{i},{j}] = {v}");
                let mirror = state.u_old[[i, n - 1 - j]];
                assert!((v - mirror).abs() < 1e-9, "asymmetric at ({i},{j})");
            }
        }
        // Values fall off away from the hot edge
        assert!(state.u_old[[1, 4]] > state.u_old[[4, 4]]);
        assert!(state.u_old[[4, 4]] > state.u_old[[8, 4]]);
    }

    #[test]
    fn test_jacobi_and_sor_agree() {
        let bc = BoundaryConditions::reset_preset();
        let (mut jacobi, source) = laplace_state(12, &bc);
        let (mut sor, _) = laplace_state(12, &bc);

        let rj = relax(&mut jacobi, &source, 1.0, RelaxationMethod::Jacobi, 1e-9, 50_000).unwrap();
        let rs = relax(&mut sor, &source, 1.0, RelaxationMethod::Sor { omega: 1.6 }, 1e-9, 50_000).unwrap();
        assert!(rj.converged && rs.converged);
        assert!(rs.iterations < rj.iterations, "SOR should need fewer steps");

        for (a, b) in jacobi.u_old.iter().zip(sor.u_old.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gauss_seidel_faster_than_jacobi() {
        let bc = BoundaryConditions::default();
        let (mut jacobi, source) = laplace_state(10, &bc);
        let (mut gs, _) = laplace_state(10, &bc);
        let rj = relax(&mut jacobi, &source, 1.0, RelaxationMethod::Jacobi, 1e-6, 10_000).unwrap();
        let rg = relax(&mut gs, &source, 1.0, RelaxationMethod::GaussSeidel, 1e-6, 10_000).unwrap();
        assert!(rg.iterations < rj.iterations);
    }

    #[test]
    fn test_boundary_preserved() {
        let bc = BoundaryConditions::reset_preset();
        let (mut state, source) = laplace_state(10, &bc);
        let initial = state.u_old.clone();
        relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-4, 500).unwrap();

        for k in 0..10 {
            assert_eq!(state.u_old[[0, k]], initial[[0, k]]);
            assert_eq!(state.u_old[[9, k]], initial[[9, k]]);
            assert_eq!(state.u_old[[k, 0]], initial[[k, 0]]);
            assert_eq!(state.u_old[[k, 9]], initial[[k, 9]]);
        }
    }

    #[test]
    fn test_zero_problem_stays_zero() {
        let bc = BoundaryConditions {
            top: 0.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
            ..Default::default()
        };
        let (mut state, source) = laplace_state(16, &bc);
        let res = relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-12, 10).unwrap();
        assert!(res.converged);
        assert_eq!(res.iterations, 1);
        assert!(state.u_old.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_residual_decreases() {
        let (mut state, source) = laplace_state(16, &BoundaryConditions::default());
        let before = poisson_residual(&state.u_old, &source, 1.0);
        relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-12, 200).unwrap();
        let after = poisson_residual(&state.u_old, &source, 1.0);
        assert!(after < before, "residual {before} -> {after}");
    }

    #[test]
    fn test_iteration_cap_reported() {
        let (mut state, source) = laplace_state(20, &BoundaryConditions::default());
        let res = relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-12, 5).unwrap();
        assert!(!res.converged);
        assert_eq!(res.iterations, 5);
        assert_eq!(state.iteration, 5);
    }

    #[test]
    fn test_already_converged_takes_no_steps() {
        let (mut state, source) = laplace_state(10, &BoundaryConditions::default());
        relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-3, 10_000).unwrap();
        let steps = state.iteration;
        let again = relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 1e-3, 10_000).unwrap();
        assert!(again.converged);
        assert_eq!(again.iterations, 0);
        assert_eq!(state.iteration, steps);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let (mut state, source) = laplace_state(10, &BoundaryConditions::default());
        assert!(relax(&mut state, &source, 1.0, RelaxationMethod::Jacobi, 0.0, 10).is_err());
        assert!(relax(&mut state, &source, -1.0, RelaxationMethod::Jacobi, 1e-3, 10).is_err());
        assert!(relax(&mut state, &source, 1.0, RelaxationMethod::Sor { omega: 2.5 }, 1e-3, 10).is_err());
        let wrong = Array2::zeros((5, 5));
        assert!(matches!(
            relax(&mut state, &wrong, 1.0, RelaxationMethod::Jacobi, 1e-3, 10),
            Err(NumlabError::DimensionMismatch(_))
        ));
    }
}
