// ─────────────────────────────────────────────────────────────────────
// Numlab — Output
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! CSV files and plain-text tables.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use numlab_types::error::NumlabResult;
use serde::Serialize;

/// `dir/name`, creating `dir` if needed.
pub fn output_path(dir: &Path, name: &str) -> NumlabResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(name))
}

/// Two-column table with header `x,f(x)`.
pub fn write_xy_csv(path: &Path, rows: &[(f64, f64)]) -> NumlabResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["x", "f(x)"])?;
    for (x, fx) in rows {
        writer.write_record([x.to_string(), fx.to_string()])?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// One CSV row per grid row, no header.
pub fn write_grid_csv(path: &Path, grid: &Array2<f64>) -> NumlabResult<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    for row in grid.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    tracing::debug!(path = %path.display(), "wrote grid CSV");
    Ok(())
}

/// Serde rows; the header comes from the field names.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> NumlabResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn format_grid(grid: &Array2<f64>, decimals: usize) -> String {
    let width = decimals + 6;
    let mut s = String::new();
    for row in grid.rows() {
        let line: Vec<String> = row
            .iter()
            .map(|v| format!("{v:>width$.decimals$}"))
            .collect();
        let _ = writeln!(s, "{}", line.join(" "));
    }
    s
}

/// `x1 = …` lines, 1-based.
pub fn format_vector(label: &str, v: &Array1<f64>, decimals: usize) -> String {
    let mut s = String::new();
    for (i, x) in v.iter().enumerate() {
        let _ = writeln!(s, "  {label}{} = {x:.decimals$}", i + 1);
    }
    s
}
