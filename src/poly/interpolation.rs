//! Polynomial interpolation through a set of points.
//!
//! All three constructions yield the unique polynomial of degree `N-1` through `N`
//! points with distinct abscissas, up to floating point error.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    domains::float::{NumericalFloatLike, SingleFloat},
    tensors::matrix::Matrix,
};

use super::{check_samples, univariate::Polynomial, FitError};

/// Create the `x.len()` by `ncols` Vandermonde matrix with increasing powers,
/// so that row `i` reads `1, x_i, x_i^2, ..., x_i^(ncols-1)`.
pub fn vandermonde_matrix<T: NumericalFloatLike>(x: &[T], ncols: u32) -> Matrix<T> {
    let mut m = Matrix::new(x.len() as u32, ncols);
    for (r, xi) in x.iter().enumerate() {
        let mut p = xi.one();
        for c in 0..ncols {
            m[(r as u32, c)] = p.clone();
            p *= xi;
        }
    }
    m
}

/// An interpolating polynomial, together with the points it passes through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interpolant<T> {
    polynomial: Polynomial<T>,
    nodes: Vec<T>,
    values: Vec<T>,
}

impl<T: SingleFloat> Interpolant<T> {
    /// Interpolate by solving the Vandermonde system `V a = y` for the coefficients `a`.
    ///
    /// Duplicate abscissas make the system singular, which is reported as
    /// [FitError::Matrix].
    #[instrument(level = "debug", skip_all, fields(points = x.len()))]
    pub fn vandermonde(x: &[T], y: &[T]) -> Result<Self, FitError> {
        check_samples(x, y)?;

        let v = vandermonde_matrix(x, x.len() as u32);
        let coefficients = v.solve_vec(y)?;

        Ok(Interpolant {
            polynomial: Polynomial::new(coefficients),
            nodes: x.to_vec(),
            values: y.to_vec(),
        })
    }

    /// Interpolate as a sum of Lagrange basis polynomials
    /// `y_i * prod_{j != i} (x - x_j) / (x_i - x_j)`.
    #[instrument(level = "debug", skip_all, fields(points = x.len()))]
    pub fn lagrange(x: &[T], y: &[T]) -> Result<Self, FitError> {
        check_samples(x, y)?;
        check_distinct(x)?;

        let factors: Vec<_> = x.iter().map(Polynomial::linear_factor).collect();

        let mut res = Polynomial::constant(x[0].zero());
        for (i, (xi, yi)) in x.iter().zip(y).enumerate() {
            let mut basis = Polynomial::constant(xi.one());
            for (j, f) in factors.iter().enumerate() {
                if i != j {
                    basis = basis * f;
                }
            }

            let scale = yi.clone() / basis.evaluate(xi);
            res = res + basis.mul_coeff(&scale);
        }

        Ok(Interpolant {
            polynomial: res,
            nodes: x.to_vec(),
            values: y.to_vec(),
        })
    }

    /// Interpolate with Neville's recursion, which combines the interpolants
    /// through `i..i+j` and `i+1..i+j+1` into the interpolant through `i..i+j+1`.
    #[instrument(level = "debug", skip_all, fields(points = x.len()))]
    pub fn neville(x: &[T], y: &[T]) -> Result<Self, FitError> {
        check_samples(x, y)?;
        check_distinct(x)?;

        let mut p: Vec<_> = y.iter().map(|yi| Polynomial::constant(yi.clone())).collect();
        let n = y.len();

        for j in 1..n {
            for i in 0..n - j {
                let factor = (x[i].clone() - &x[i + j]).inv();
                let upper = Polynomial::linear_factor(&x[i + j]);
                let lower = Polynomial::linear_factor(&x[i]);

                p[i] = (&upper * &p[i] - &lower * &p[i + 1]).mul_coeff(&factor);
            }
        }

        let polynomial = p.swap_remove(0);

        Ok(Interpolant {
            polynomial,
            nodes: x.to_vec(),
            values: y.to_vec(),
        })
    }
}

impl<T: NumericalFloatLike> Interpolant<T> {
    pub fn polynomial(&self) -> &Polynomial<T> {
        &self.polynomial
    }

    pub fn into_polynomial(self) -> Polynomial<T> {
        self.polynomial
    }

    /// The abscissas of the interpolated points.
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    /// The ordinates of the interpolated points.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn degree(&self) -> usize {
        self.polynomial.degree()
    }

    pub fn evaluate(&self, x: &T) -> T {
        self.polynomial.evaluate(x)
    }

    pub fn evaluate_many(&self, xs: &[T]) -> Vec<T> {
        self.polynomial.evaluate_many(xs)
    }
}

/// Reject abscissas that occur more than once.
fn check_distinct<T: SingleFloat>(x: &[T]) -> Result<(), FitError> {
    for (i, xi) in x.iter().enumerate() {
        if x[..i].iter().any(|xj| (xi.clone() - xj).is_zero()) {
            debug!("Duplicate abscissa at index {}", i);
            return Err(FitError::DuplicateAbscissa(i));
        }
    }
    Ok(())
}
