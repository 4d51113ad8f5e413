//! Dense linear algebra: Gaussian elimination with partial pivoting, determinants,
//! linear solves and matrix inversion.

pub mod matrix;
