//! Numkit is a small numerical toolkit built around dense Gaussian elimination.
//!
//! It can be used to solve linear systems, compute determinants and inverses,
//! do arithmetic with univariate polynomials, and fit polynomials and cubic splines
//! to data. Root finding and quadrature complete the toolbox.
//!
//! For example:
//!
//! ```
//! use numkit::{poly::interpolation::Interpolant, tensors::matrix::Matrix};
//!
//! fn main() {
//!     let a = Matrix::from_nested_vec(vec![vec![2., 1.], vec![1., 3.]]).unwrap();
//!     let x = a.solve_vec(&[3., 5.]).unwrap();
//!     println!("x = {:?}", x);
//!
//!     let p = Interpolant::vandermonde(&[0., 1., 2.], &[1., 3., 7.]).unwrap();
//!     println!("p(x) = {}", p.polynomial());
//! }
//! ```
//!
//! All algorithms are generic over the number types in [domains::float], so that
//! linear systems and polynomials also work with [Complex](domains::float::Complex) numbers.
//! Progress and failures are reported through [tracing].

pub mod domains;
pub mod numerical_integration;
pub mod poly;
pub mod roots;
pub mod tensors;
