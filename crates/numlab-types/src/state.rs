// ─────────────────────────────────────────────────────────────────────
// Numlab — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::{Array1, Array2};

use crate::config::BoundaryConditions;
use crate::error::{NumlabError, NumlabResult};

/// Square N x N grid with equal spacing in both directions.
///
/// Rows run top to bottom (`y`), columns left to right (`x`); both start at 0.
#[derive(Debug, Clone)]
pub struct Grid2D {
    pub n: usize,
    pub h: f64,
    pub x: Array1<f64>, // column coordinates [n]
    pub y: Array1<f64>, // row coordinates [n]
}

impl Grid2D {
    pub fn new(n: usize, h: f64) -> NumlabResult<Self> {
        if n < 3 {
            return Err(NumlabError::ConfigError(format!(
                "grid needs at least 3 points per side to have an interior, got {n}"
            )));
        }
        if !h.is_finite() || h <= 0.0 {
            return Err(NumlabError::ConfigError(format!(
                "grid spacing must be finite and > 0, got {h}"
            )));
        }
        let extent = h * (n - 1) as f64;
        Ok(Grid2D {
            n,
            h,
            x: Array1::linspace(0.0, extent, n),
            y: Array1::linspace(0.0, extent, n),
        })
    }

    /// Evaluate `f(x, y)` at every node, indexed `[row, col]`.
    pub fn sample<F: Fn(f64, f64) -> f64>(&self, f: F) -> Array2<f64> {
        Array2::from_shape_fn((self.n, self.n), |(i, j)| f(self.x[j], self.y[i]))
    }

    pub fn interior_points(&self) -> usize {
        (self.n - 2) * (self.n - 2)
    }
}

/// Iteration state of a relaxation run.
///
/// `u_old` holds the previous iterate and `u_new` the one being written.
/// After each completed step both buffers are equal.
#[derive(Debug, Clone)]
pub struct RelaxationState {
    pub u_old: Array2<f64>,
    pub u_new: Array2<f64>,
    pub iteration: usize,
    pub last_max_diff: Option<f64>,
}

impl RelaxationState {
    /// Zero interior, Dirichlet boundary from `bc`.
    pub fn new(grid: &Grid2D, bc: &BoundaryConditions) -> Self {
        let mut u_old = Array2::zeros((grid.n, grid.n));
        bc.apply(&mut u_old);
        let u_new = u_old.clone();
        RelaxationState {
            u_old,
            u_new,
            iteration: 0,
            last_max_diff: None,
        }
    }

    /// Start from an arbitrary field; its outer ring is taken as the boundary.
    pub fn from_field(u: Array2<f64>) -> NumlabResult<Self> {
        let (rows, cols) = u.dim();
        if rows != cols || rows < 3 {
            return Err(NumlabError::DimensionMismatch(format!(
                "relaxation field must be square with n >= 3, got {rows}x{cols}"
            )));
        }
        Ok(RelaxationState {
            u_new: u.clone(),
            u_old: u,
            iteration: 0,
            last_max_diff: None,
        })
    }

    /// True once a completed step changed no point by `epsilon` or more.
    pub fn is_converged(&self, epsilon: f64) -> bool {
        matches!(self.last_max_diff, Some(d) if d < epsilon)
    }

    pub fn solution(&self) -> &Array2<f64> {
        &self.u_old
    }
}
