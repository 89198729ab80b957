// ─────────────────────────────────────────────────────────────────────
// Numlab — Commands
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One runner per subcommand. Runners print to `out` and write CSV files
//! under the output directory; all numerical work lives in `numlab-math`.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use numlab_math::eigen::{coursework_matrix, power_method, random_start};
use numlab_math::linalg::{coursework_system, gauss_seidel, inf_norm, lu_solve, residual_norm};
use numlab_math::montecarlo::{estimate, HyperEllipsoid, PowerWeight};
use numlab_math::poisson::{advance, relax, validate_problem};
use numlab_math::quadrature::{
    gauss_method, rectangle_convergence, reference_exact, reference_integrand,
};
use numlab_math::roots::{bisection, newton, sample_function, SinhCosFunction};
use numlab_math::tridiag::TridiagonalSystem;
use numlab_types::config::{
    LabConfig, LinearSystemConfig, MonteCarloConfig, PoissonConfig, PowerConfig, QuadratureConfig,
    RootsConfig, ThomasConfig,
};
use numlab_types::error::NumlabError;
use numlab_types::state::{Grid2D, RelaxationState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::args::{Cli, Command};
use crate::output::{
    format_grid, format_vector, output_path, write_grid_csv, write_records, write_xy_csv,
};

/// Load the configuration, apply flag overrides and dispatch.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => LabConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LabConfig::default(),
    };
    let output = cli.output.as_deref();

    match &cli.command {
        Command::Poisson(args) => {
            args.apply(&mut config.poisson);
            run_poisson(&config.poisson, args.steps, output, out)
        }
        Command::Quadrature(args) => {
            args.apply(&mut config.quadrature);
            run_quadrature(&config.quadrature, output, out)
        }
        Command::MonteCarlo(args) => {
            args.apply(&mut config.monte_carlo);
            run_monte_carlo(&config.monte_carlo, out)
        }
        Command::Linear(args) => {
            args.apply(&mut config.linear);
            run_linear(&config.linear, out)
        }
        Command::Power(args) => {
            args.apply(&mut config.power);
            run_power(&config.power, out)
        }
        Command::Thomas(args) => {
            let system = match &args.matrix_file {
                Some(path) => load_thomas_file(path)?,
                None => config.thomas,
            };
            run_thomas(&system, out)
        }
        Command::Roots(args) => {
            args.apply(&mut config.roots);
            // Root tables always land on disk, in the cwd by default
            run_roots(&config.roots, output.unwrap_or(Path::new(".")), out)
        }
    }
}

fn load_thomas_file(path: &Path) -> Result<ThomasConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let system = serde_json::from_str(&text)
        .with_context(|| format!("invalid tridiagonal system in {}", path.display()))?;
    Ok(system)
}

pub fn run_poisson(
    cfg: &PoissonConfig,
    steps: Option<usize>,
    output: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let grid = Grid2D::new(cfg.grid_size, cfg.spacing)?;
    let mut state = RelaxationState::new(&grid, &cfg.boundary);
    let source = Array2::from_elem((grid.n, grid.n), cfg.source);

    writeln!(out, "method: {:?}", cfg.method)?;
    match steps {
        Some(k) => {
            validate_problem(&state, &source, grid.h, cfg.method, cfg.epsilon)?;
            for _ in 0..k {
                if state.is_converged(cfg.epsilon) {
                    writeln!(out, "already converged")?;
                    break;
                }
                let d = advance(&mut state, &source, grid.h, cfg.method);
                if !d.is_finite() {
                    bail!("relaxation diverged at step {}", state.iteration);
                }
            }
            writeln!(out, "iterations: {}", state.iteration)?;
            writeln!(out, "converged: {}", state.is_converged(cfg.epsilon))?;
            if let Some(d) = state.last_max_diff {
                writeln!(out, "max change: {d:.3e}")?;
            }
        }
        None => {
            let res = relax(
                &mut state,
                &source,
                grid.h,
                cfg.method,
                cfg.epsilon,
                cfg.max_iterations,
            )?;
            writeln!(out, "iterations: {}", res.iterations)?;
            writeln!(out, "converged: {}", res.converged)?;
            writeln!(out, "max change: {:.3e}", res.max_diff)?;
        }
    }
    write!(out, "{}", format_grid(state.solution(), 2))?;

    if let Some(dir) = output {
        let path = output_path(dir, "poisson_grid.csv")?;
        write_grid_csv(&path, state.solution())?;
        writeln!(out, "grid written to {}", path.display())?;
    }
    Ok(())
}

#[derive(Serialize)]
struct QuadratureRow {
    method: &'static str,
    nodes: usize,
    value: f64,
    abs_error: f64,
}

pub fn run_quadrature(cfg: &QuadratureConfig, output: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let (a, b) = (cfg.lower, cfg.upper);
    let exact = reference_exact(a, b);
    writeln!(out, "∫ (x² - 1) e^(-2x) dx on [{a}, {b}]")?;
    writeln!(out, "exact: {exact:.10}")?;

    let mut rows = Vec::new();
    writeln!(out, "{:>6} {:>16} {:>12}", "n", "rectangle", "abs error")?;
    for p in rectangle_convergence(reference_integrand, a, b, exact, &cfg.rectangle_nodes)? {
        writeln!(out, "{:>6} {:>16.10} {:>12.3e}", p.n, p.value, p.abs_error)?;
        rows.push(QuadratureRow {
            method: "rectangle",
            nodes: p.n,
            value: p.value,
            abs_error: p.abs_error,
        });
    }

    writeln!(out, "{:>6} {:>16} {:>12}", "m", "gauss", "abs error")?;
    for &m in &cfg.gauss_orders {
        let value = gauss_method(reference_integrand, a, b, m)?;
        let abs_error = (value - exact).abs();
        writeln!(out, "{m:>6} {value:>16.10} {abs_error:>12.3e}")?;
        rows.push(QuadratureRow {
            method: "gauss",
            nodes: m,
            value,
            abs_error,
        });
    }

    if let Some(dir) = output {
        let path = output_path(dir, "quadrature.csv")?;
        write_records(&path, &rows)?;
    }
    Ok(())
}

pub fn run_monte_carlo(cfg: &MonteCarloConfig, out: &mut dyn Write) -> Result<()> {
    let domain = HyperEllipsoid::new(cfg.semi_axes.clone())?;
    let weight = PowerWeight::new(cfg.alpha.clone(), cfg.beta.clone())?;
    if weight.dims() > domain.dim() {
        return Err(NumlabError::DimensionMismatch(format!(
            "weight reads {} coordinates of a {}-dimensional domain",
            weight.dims(),
            domain.dim()
        ))
        .into());
    }
    if cfg.sample_counts.is_empty() {
        bail!("no sample counts given");
    }

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    writeln!(out, "box volume W = {:.6}", domain.bounding_volume())?;
    writeln!(out, "exact volume = {:.6}", domain.exact_volume())?;
    writeln!(
        out,
        "{:>9} {:>9} {:>9} {:>12} {:>14} {:>12}",
        "N", "M", "M/N", "mean rho", "I", "V"
    )?;
    for &n in &cfg.sample_counts {
        let est = estimate(&domain, |x| weight.eval(x), n, &mut rng)?;
        if est.inside == 0 {
            writeln!(out, "{n:>9} no points inside")?;
            continue;
        }
        writeln!(
            out,
            "{:>9} {:>9} {:>9.5} {:>12.6} {:>14.6} {:>12.6}",
            est.samples, est.inside, est.hit_ratio, est.mean_weight, est.integral, est.volume
        )?;
    }
    Ok(())
}

pub fn run_linear(cfg: &LinearSystemConfig, out: &mut dyn Write) -> Result<()> {
    let (a, b) = coursework_system(cfg.size, cfg.q)?;
    let x_lu = lu_solve(&a, &b)?;
    let gs = gauss_seidel(&a, &b, cfg.epsilon, cfg.max_iterations)?;

    writeln!(out, "n = {}, q = {}", cfg.size, cfg.q)?;
    writeln!(out, "A =")?;
    write!(out, "{}", format_grid(&a, 4))?;
    writeln!(out, "b =")?;
    write!(out, "{}", format_vector("b", &b, 4))?;
    writeln!(out, "LU:")?;
    write!(out, "{}", format_vector("x", &x_lu, 10))?;
    writeln!(
        out,
        "Gauss-Seidel ({} iterations{}):",
        gs.iterations,
        if gs.converged { "" } else { ", not converged" }
    )?;
    write!(out, "{}", format_vector("x", &gs.x, 10))?;
    writeln!(out, "‖Ax - b‖₂ LU:           {:.3e}", residual_norm(&a, &x_lu, &b))?;
    writeln!(out, "‖Ax - b‖₂ Gauss-Seidel: {:.3e}", residual_norm(&a, &gs.x, &b))?;
    writeln!(out, "‖x_LU - x_GS‖∞:         {:.3e}", inf_norm(&(&x_lu - &gs.x)))?;
    Ok(())
}

pub fn run_power(cfg: &PowerConfig, out: &mut dyn Write) -> Result<()> {
    let a = coursework_matrix(cfg.size, cfg.p, cfg.q, cfg.b)?;
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let x0 = random_start(cfg.size, &mut rng);
    let res = power_method(&a, &x0, cfg.epsilon, cfg.k_max)?;

    writeln!(out, "A =")?;
    write!(out, "{}", format_grid(&a, 4))?;
    let status = if res.converged { "converged" } else { "k_max reached" };
    writeln!(out, "status: {status}")?;
    writeln!(out, "iterations: {}", res.iterations)?;
    writeln!(out, "lambda_max: {:.8}", res.eigenvalue)?;
    writeln!(out, "eigenvector:")?;
    write!(out, "{}", format_vector("e", &res.eigenvector, 8))?;
    Ok(())
}

pub fn run_thomas(cfg: &ThomasConfig, out: &mut dyn Write) -> Result<()> {
    let system = TridiagonalSystem::from_dense(&cfg.matrix_array()?, &cfg.rhs)?;
    let x = system.solve()?;
    writeln!(out, "solution:")?;
    write!(out, "{}", format_vector("x", &Array1::from(x), 5))?;
    Ok(())
}

pub fn run_roots(cfg: &RootsConfig, dir: &Path, out: &mut dyn Write) -> Result<()> {
    let f = SinhCosFunction::new(cfg.j, cfg.k, cfg.m)?;
    let table = sample_function(|x| f.value(x), cfg.step)?;
    write_xy_csv(&output_path(dir, "function_values.csv")?, &table)?;

    let [a, b] = cfg.bracket;
    let bis = bisection(|x| f.value(x), a, b, cfg.tolerance, cfg.max_iterations)
        .context("bisection failed")?;
    write_xy_csv(&output_path(dir, "root_bisection.csv")?, &[(bis.root, bis.value)])?;

    let nwt = newton(
        |x| f.value(x),
        |x| f.derivative(x),
        cfg.newton_start,
        cfg.tolerance,
        cfg.max_iterations,
    )
    .context("Newton failed")?;
    write_xy_csv(&output_path(dir, "root_newton.csv")?, &[(nwt.root, nwt.value)])?;

    writeln!(
        out,
        "f(x) = sinh(x^{}) - cos^{}(pi x^{})",
        cfg.j, cfg.k, cfg.m
    )?;
    writeln!(out, "root (bisection): {:.6}  [{} iterations]", bis.root, bis.iterations)?;
    writeln!(out, "root (Newton):    {:.6}  [{} iterations]", nwt.root, nwt.iterations)?;
    writeln!(out, "tables written to {}", dir.display())?;
    Ok(())
}
