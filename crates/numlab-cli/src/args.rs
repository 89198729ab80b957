// ─────────────────────────────────────────────────────────────────────
// Numlab — Command Line Arguments
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `clap` definitions. Every flag is optional and, when given, overrides
//! the matching value from the JSON configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use numlab_types::config::{
    BoundaryConditions, LinearSystemConfig, MonteCarloConfig, PoissonConfig, PowerConfig,
    QuadratureConfig, RelaxationMethod, RootsConfig,
};

const DEFAULT_OMEGA: f64 = 1.5;

#[derive(Debug, Parser)]
#[command(name = "numlab", version)]
#[command(about = "Classical numerical methods: relaxation, quadrature, Monte Carlo, linear systems, eigenvalues, roots")]
pub struct Cli {
    /// JSON configuration file; missing sections keep the built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for CSV output
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Relax the Dirichlet Poisson problem on a square grid
    Poisson(PoissonArgs),
    /// Rectangle and Gauss-Legendre quadrature of (x² - 1) e^(-2x)
    Quadrature(QuadratureArgs),
    /// Monte Carlo integral and volume of a weighted hyper-ellipsoid
    MonteCarlo(MonteCarloArgs),
    /// LU and Gauss-Seidel on the diagonally dominant test system
    Linear(LinearArgs),
    /// Dominant eigenvalue of the symmetric test matrix
    Power(PowerArgs),
    /// Thomas algorithm on a tridiagonal system
    Thomas(ThomasArgs),
    /// Bisection and Newton roots of sinh(x^j) - cos^k(π x^m)
    Roots(RootsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Jacobi,
    GaussSeidel,
    Sor,
}

#[derive(Debug, Args)]
pub struct PoissonArgs {
    /// Points per side, boundary included
    #[arg(long)]
    pub n: Option<usize>,

    /// Grid step h
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Uniform right-hand side f
    #[arg(long)]
    pub source: Option<f64>,

    #[arg(long)]
    pub epsilon: Option<f64>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Use the reset boundary preset (top 100, left 50)
    #[arg(long)]
    pub reset_preset: bool,

    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Relaxation factor for --method sor
    #[arg(long)]
    pub omega: Option<f64>,

    /// Take exactly this many single steps instead of relaxing to convergence
    #[arg(long)]
    pub steps: Option<usize>,
}

impl PoissonArgs {
    pub fn apply(&self, cfg: &mut PoissonConfig) {
        if let Some(n) = self.n {
            cfg.grid_size = n;
        }
        if let Some(h) = self.spacing {
            cfg.spacing = h;
        }
        if let Some(f) = self.source {
            cfg.source = f;
        }
        if let Some(eps) = self.epsilon {
            cfg.epsilon = eps;
        }
        if let Some(max) = self.max_iterations {
            cfg.max_iterations = max;
        }
        if self.reset_preset {
            cfg.boundary = BoundaryConditions::reset_preset();
        }
        let config_omega = match cfg.method {
            RelaxationMethod::Sor { omega } => Some(omega),
            _ => None,
        };
        match (self.method, self.omega) {
            (Some(MethodArg::Jacobi), _) => cfg.method = RelaxationMethod::Jacobi,
            (Some(MethodArg::GaussSeidel), _) => cfg.method = RelaxationMethod::GaussSeidel,
            (Some(MethodArg::Sor), omega) => {
                cfg.method = RelaxationMethod::Sor {
                    omega: omega.or(config_omega).unwrap_or(DEFAULT_OMEGA),
                }
            }
            // --omega alone retunes a configured SOR run
            (None, Some(omega)) if config_omega.is_some() => {
                cfg.method = RelaxationMethod::Sor { omega }
            }
            (None, _) => {}
        }
    }
}

#[derive(Debug, Args)]
pub struct QuadratureArgs {
    #[arg(long)]
    pub lower: Option<f64>,

    #[arg(long)]
    pub upper: Option<f64>,

    /// Node counts for the rectangle rule, comma separated
    #[arg(long, value_delimiter = ',')]
    pub nodes: Vec<usize>,

    /// Gauss-Legendre orders, comma separated
    #[arg(long, value_delimiter = ',')]
    pub orders: Vec<usize>,
}

impl QuadratureArgs {
    pub fn apply(&self, cfg: &mut QuadratureConfig) {
        if let Some(a) = self.lower {
            cfg.lower = a;
        }
        if let Some(b) = self.upper {
            cfg.upper = b;
        }
        if !self.nodes.is_empty() {
            cfg.rectangle_nodes = self.nodes.clone();
        }
        if !self.orders.is_empty() {
            cfg.gauss_orders = self.orders.clone();
        }
    }
}

#[derive(Debug, Args)]
pub struct MonteCarloArgs {
    /// RNG seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Sample counts, comma separated
    #[arg(long, value_delimiter = ',')]
    pub samples: Vec<usize>,
}

impl MonteCarloArgs {
    pub fn apply(&self, cfg: &mut MonteCarloConfig) {
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if !self.samples.is_empty() {
            cfg.sample_counts = self.samples.clone();
        }
    }
}

#[derive(Debug, Args)]
pub struct LinearArgs {
    /// System size
    #[arg(long)]
    pub n: Option<usize>,

    #[arg(long)]
    pub q: Option<f64>,

    #[arg(long)]
    pub epsilon: Option<f64>,

    #[arg(long)]
    pub max_iterations: Option<usize>,
}

impl LinearArgs {
    pub fn apply(&self, cfg: &mut LinearSystemConfig) {
        if let Some(n) = self.n {
            cfg.size = n;
        }
        if let Some(q) = self.q {
            cfg.q = q;
        }
        if let Some(eps) = self.epsilon {
            cfg.epsilon = eps;
        }
        if let Some(max) = self.max_iterations {
            cfg.max_iterations = max;
        }
    }
}

#[derive(Debug, Args)]
pub struct PowerArgs {
    /// Matrix size
    #[arg(long)]
    pub n: Option<usize>,

    /// RNG seed for the start vector
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub epsilon: Option<f64>,

    #[arg(long)]
    pub k_max: Option<usize>,
}

impl PowerArgs {
    pub fn apply(&self, cfg: &mut PowerConfig) {
        if let Some(n) = self.n {
            cfg.size = n;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(eps) = self.epsilon {
            cfg.epsilon = eps;
        }
        if let Some(k) = self.k_max {
            cfg.k_max = k;
        }
    }
}

#[derive(Debug, Args)]
pub struct ThomasArgs {
    /// JSON file with `matrix` (rows) and `rhs`
    #[arg(long)]
    pub matrix_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RootsArgs {
    #[arg(long)]
    pub j: Option<u32>,

    #[arg(long)]
    pub k: Option<u32>,

    #[arg(long)]
    pub m: Option<u32>,

    /// Sampling step for function_values.csv
    #[arg(long)]
    pub step: Option<f64>,

    #[arg(long)]
    pub tolerance: Option<f64>,
}

impl RootsArgs {
    pub fn apply(&self, cfg: &mut RootsConfig) {
        if let Some(j) = self.j {
            cfg.j = j;
        }
        if let Some(k) = self.k {
            cfg.k = k;
        }
        if let Some(m) = self.m {
            cfg.m = m;
        }
        if let Some(step) = self.step {
            cfg.step = step;
        }
        if let Some(tol) = self.tolerance {
            cfg.tolerance = tol;
        }
    }
}
