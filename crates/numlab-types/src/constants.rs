// ─────────────────────────────────────────────────────────────────────
// Numlab — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Pivots and sweep denominators below this magnitude are treated as zero.
pub const PIVOT_EPS: f64 = 1e-12;

/// 5-point Gauss-Legendre nodes on [-1, 1] (10 significant digits, as tabulated).
pub const GAUSS_5_NODES: [f64; 5] = [-0.9061798459, -0.5384693101, 0.0, 0.5384693101, 0.9061798459];

/// 5-point Gauss-Legendre weights.
pub const GAUSS_5_WEIGHTS: [f64; 5] = [
    0.2369268850,
    0.4786286705,
    0.5688888889,
    0.4786286705,
    0.2369268850,
];

/// 7-point Gauss-Legendre nodes on [-1, 1].
pub const GAUSS_7_NODES: [f64; 7] = [
    -0.9491079123,
    -0.7415311856,
    -0.4058451514,
    0.0,
    0.4058451514,
    0.7415311856,
    0.9491079123,
];

/// 7-point Gauss-Legendre weights.
pub const GAUSS_7_WEIGHTS: [f64; 7] = [
    0.1294849662,
    0.2797053915,
    0.3818300505,
    0.4179591837,
    0.3818300505,
    0.2797053915,
    0.1294849662,
];

/// Coursework 5x5 tridiagonal system (row-major) used as the Thomas default.
pub const THOMAS_DEFAULT_MATRIX: [[f64; 5]; 5] = [
    [8.0, -2.0, 0.0, 0.0, 0.0],
    [-1.0, 5.0, 3.0, 0.0, 0.0],
    [0.0, 7.0, -5.0, -9.0, 0.0],
    [0.0, 0.0, 4.0, 7.0, 9.0],
    [0.0, 0.0, 0.0, -5.0, 8.0],
];

/// Right-hand side paired with [`THOMAS_DEFAULT_MATRIX`].
pub const THOMAS_DEFAULT_RHS: [f64; 5] = [-7.0, 6.0, 9.0, -8.0, 5.0];
