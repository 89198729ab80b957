// ─────────────────────────────────────────────────────────────────────
// Numlab — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NumlabError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Singular system: {0}")]
    SingularMatrix(String),

    #[error("Matrix is not tridiagonal: non-zero entry at row={row}, col={col}")]
    NotTridiagonal { row: usize, col: usize },

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("f(a) and f(b) have the same sign on [{a}, {b}]; bisection needs a sign change")]
    SameSignBracket { a: f64, b: f64 },

    #[error("Derivative vanished at x = {x}")]
    ZeroDerivative { x: f64 },

    #[error("{method} did not converge within {iterations} iterations")]
    NotConverged {
        method: &'static str,
        iterations: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type NumlabResult<T> = Result<T, NumlabError>;
