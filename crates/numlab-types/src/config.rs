// ─────────────────────────────────────────────────────────────────────
// Numlab — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::constants::{THOMAS_DEFAULT_MATRIX, THOMAS_DEFAULT_RHS};

/// Top-level run configuration.
/// Every section is optional in JSON; a missing section falls back to the
/// coursework parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabConfig {
    #[serde(default)]
    pub poisson: PoissonConfig,
    #[serde(default)]
    pub quadrature: QuadratureConfig,
    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
    #[serde(default)]
    pub linear: LinearSystemConfig,
    #[serde(default)]
    pub power: PowerConfig,
    #[serde(default)]
    pub thomas: ThomasConfig,
    #[serde(default)]
    pub roots: RootsConfig,
}

impl LabConfig {
    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> crate::error::NumlabResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

// ── Poisson / relaxation ─────────────────────────────────────────────

/// Which edges hold the four corner cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOwner {
    /// Top and bottom rows are written last.
    #[default]
    Rows,
    /// Left and right columns are written last.
    Columns,
}

/// Dirichlet values on the four sides of the square grid.
/// Row 0 is the top edge, column 0 the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConditions {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    #[serde(default)]
    pub corners: CornerOwner,
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        BoundaryConditions {
            top: 100.0,
            bottom: 0.0,
            left: 0.0,
            right: 0.0,
            corners: CornerOwner::Rows,
        }
    }
}

impl BoundaryConditions {
    /// Hot top edge plus a warm left edge. The left column is laid
    /// over the top row, so both left corners read 50.
    pub fn reset_preset() -> Self {
        BoundaryConditions {
            top: 100.0,
            bottom: 0.0,
            left: 50.0,
            right: 0.0,
            corners: CornerOwner::Columns,
        }
    }

    /// Write the boundary values into the outer ring of `u`.
    pub fn apply(&self, u: &mut Array2<f64>) {
        let (rows, cols) = u.dim();
        if rows == 0 || cols == 0 {
            return;
        }
        match self.corners {
            CornerOwner::Rows => {
                self.fill_columns(u);
                self.fill_rows(u);
            }
            CornerOwner::Columns => {
                self.fill_rows(u);
                self.fill_columns(u);
            }
        }
    }

    fn fill_rows(&self, u: &mut Array2<f64>) {
        let (rows, cols) = u.dim();
        for j in 0..cols {
            u[[0, j]] = self.top;
            u[[rows - 1, j]] = self.bottom;
        }
    }

    fn fill_columns(&self, u: &mut Array2<f64>) {
        let (rows, cols) = u.dim();
        for i in 0..rows {
            u[[i, 0]] = self.left;
            u[[i, cols - 1]] = self.right;
        }
    }

    pub fn max_value(&self) -> f64 {
        self.top.max(self.bottom).max(self.left).max(self.right)
    }

    pub fn min_value(&self) -> f64 {
        self.top.min(self.bottom).min(self.left).min(self.right)
    }
}

/// Relaxation scheme used by the Poisson solver.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelaxationMethod {
    /// Two-buffer Jacobi iteration.
    #[default]
    Jacobi,
    /// In-place red-black sweep with omega = 1.
    GaussSeidel,
    /// Red-black successive over-relaxation.
    Sor { omega: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoissonConfig {
    /// Points per side (N x N grid, boundary included).
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    /// Grid step h (h1 = h2).
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Uniform right-hand side f of -Δu = f (0 gives the Laplace problem).
    #[serde(default)]
    pub source: f64,
    #[serde(default = "default_poisson_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_poisson_max_iterations")]
    pub max_iterations: usize,
    #[serde(default)]
    pub boundary: BoundaryConditions,
    #[serde(default)]
    pub method: RelaxationMethod,
}

fn default_grid_size() -> usize {
    10
}
fn default_spacing() -> f64 {
    1.0
}
fn default_poisson_epsilon() -> f64 {
    1e-4
}
fn default_poisson_max_iterations() -> usize {
    10_000
}

impl Default for PoissonConfig {
    fn default() -> Self {
        PoissonConfig {
            grid_size: default_grid_size(),
            spacing: default_spacing(),
            source: 0.0,
            epsilon: default_poisson_epsilon(),
            max_iterations: default_poisson_max_iterations(),
            boundary: BoundaryConditions::default(),
            method: RelaxationMethod::default(),
        }
    }
}

// ── Quadrature ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureConfig {
    pub lower: f64,
    pub upper: f64,
    /// Node counts for the rectangle-rule convergence table.
    pub rectangle_nodes: Vec<usize>,
    pub gauss_orders: Vec<usize>,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        QuadratureConfig {
            lower: 0.0,
            upper: 2.0,
            rectangle_nodes: (1..=20).map(|k| 5 * k).collect(),
            gauss_orders: vec![5, 7],
        }
    }
}

// ── Monte Carlo ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Hyper-ellipsoid semi-axes a_i.
    pub semi_axes: Vec<f64>,
    /// Weight centres α_i (one per weighted coordinate).
    pub alpha: Vec<f64>,
    /// Weight exponents β_i.
    pub beta: Vec<f64>,
    pub sample_counts: Vec<usize>,
    /// Fixed RNG seed; entropy-seeded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        MonteCarloConfig {
            semi_axes: vec![2.0, 3.0, 1.5, 2.5, 1.0, 4.0],
            alpha: vec![-0.11668255, -1.90093714, -2.28172284],
            beta: vec![3.74736003, 2.88284760, 1.59672290],
            sample_counts: vec![1_000, 10_000, 100_000, 1_000_000],
            seed: None,
        }
    }
}

// ── Linear systems ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearSystemConfig {
    pub size: usize,
    pub q: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for LinearSystemConfig {
    fn default() -> Self {
        LinearSystemConfig {
            size: 5,
            q: 2.0,
            epsilon: 1e-10,
            max_iterations: 10_000,
        }
    }
}

// ── Power iteration ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub size: usize,
    pub p: f64,
    pub q: f64,
    pub b: f64,
    pub epsilon: f64,
    pub k_max: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PowerConfig {
    fn default() -> Self {
        PowerConfig {
            size: 6,
            p: 3.0,
            q: 2.0,
            b: 0.05,
            epsilon: 1e-3,
            k_max: 100,
            seed: None,
        }
    }
}

// ── Thomas ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThomasConfig {
    /// Dense row-major matrix; must be square and tridiagonal.
    pub matrix: Vec<Vec<f64>>,
    pub rhs: Vec<f64>,
}

impl Default for ThomasConfig {
    fn default() -> Self {
        ThomasConfig {
            matrix: THOMAS_DEFAULT_MATRIX.iter().map(|row| row.to_vec()).collect(),
            rhs: THOMAS_DEFAULT_RHS.to_vec(),
        }
    }
}

impl ThomasConfig {
    /// Convert the nested rows into an `Array2`, rejecting ragged input.
    pub fn matrix_array(&self) -> crate::error::NumlabResult<Array2<f64>> {
        let n = self.matrix.len();
        if let Some((row, r)) = self
            .matrix
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n)
        {
            return Err(crate::error::NumlabError::DimensionMismatch(format!(
                "row {row} has {} entries, expected {n}",
                r.len()
            )));
        }
        let flat: Vec<f64> = self.matrix.iter().flatten().copied().collect();
        Array2::from_shape_vec((n, n), flat)
            .map_err(|e| crate::error::NumlabError::DimensionMismatch(e.to_string()))
    }
}

// ── Root finding ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RootsConfig {
    pub j: u32,
    pub k: u32,
    pub m: u32,
    /// Sampling step for the function table on [0, 1].
    pub step: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub newton_start: f64,
    pub bracket: [f64; 2],
}

impl Default for RootsConfig {
    fn default() -> Self {
        RootsConfig {
            j: 2,
            k: 2,
            m: 1,
            step: 0.01,
            tolerance: 1e-6,
            max_iterations: 1000,
            newton_start: 0.5,
            bracket: [0.0, 1.0],
        }
    }
}
