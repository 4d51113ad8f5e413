//! Polynomial least-squares regression.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domains::float::{NumericalFloatLike, SingleFloat};

use super::{check_samples, interpolation::vandermonde_matrix, univariate::Polynomial, FitError};

/// The polynomial of a given degree that minimizes the sum of squared residuals
/// `sum_i |y_i - p(x_i)|^2` over a set of points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeastSquaresFit<T> {
    polynomial: Polynomial<T>,
    residual_sum_of_squares: f64,
}

impl<T: SingleFloat> LeastSquaresFit<T> {
    /// Fit a polynomial of degree `degree` through the points `(x_i, y_i)` by solving
    /// the normal equations `G^H G a = G^H y`, where `G` is the `M` by `degree+1`
    /// Vandermonde matrix of the abscissas and `G^H` its conjugate transpose.
    ///
    /// At least `degree+1` points are required. With exactly `degree+1` distinct points
    /// the fit interpolates and the residual is zero up to rounding.
    #[instrument(level = "debug", skip_all, fields(points = x.len(), degree = degree))]
    pub fn fit(x: &[T], y: &[T], degree: usize) -> Result<Self, FitError> {
        check_samples(x, y)?;

        if x.len() <= degree {
            return Err(FitError::TooFewPoints {
                got: x.len(),
                min: degree.saturating_add(1),
            });
        }

        let g = vandermonde_matrix(x, degree as u32 + 1);
        let gh = g.conjugate_transpose();

        let normal = &gh * &g;
        let rhs: Vec<T> = (0..gh.nrows() as u32)
            .map(|i| {
                gh[i]
                    .iter()
                    .zip(y)
                    .fold(y[0].zero(), |acc, (a, b)| a.mul_add(b, &acc))
            })
            .collect();

        let coefficients = normal.solve_vec(&rhs)?;
        let polynomial = Polynomial::new(coefficients);

        let residual_sum_of_squares: f64 = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| {
                let r = (polynomial.evaluate(xi) - yi).norm();
                r * r
            })
            .sum();

        debug!("Residual sum of squares: {}", residual_sum_of_squares);

        Ok(LeastSquaresFit {
            polynomial,
            residual_sum_of_squares,
        })
    }
}

impl<T: NumericalFloatLike> LeastSquaresFit<T> {
    pub fn polynomial(&self) -> &Polynomial<T> {
        &self.polynomial
    }

    pub fn into_polynomial(self) -> Polynomial<T> {
        self.polynomial
    }

    /// The sum of squared residuals `sum_i |y_i - p(x_i)|^2` of the fitted points.
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residual_sum_of_squares
    }

    pub fn evaluate(&self, x: &T) -> T {
        self.polynomial.evaluate(x)
    }

    pub fn evaluate_many(&self, xs: &[T]) -> Vec<T> {
        self.polynomial.evaluate_many(xs)
    }
}
