//! Classical numerical methods for Numlab.

pub mod eigen;
pub mod linalg;
pub mod montecarlo;
pub mod poisson;
pub mod quadrature;
pub mod roots;
pub mod tridiag;
