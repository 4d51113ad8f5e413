//! Univariate polynomials and the curve fits that produce them.
//!
//! - [Polynomial](univariate::Polynomial) is the dense coefficient representation.
//! - [Interpolant](interpolation::Interpolant) passes exactly through a set of points.
//! - [LeastSquaresFit](regression::LeastSquaresFit) approximates points with a low degree polynomial.
//! - [CubicSpline](spline::CubicSpline) is a piecewise cubic through increasing abscissas.
pub mod interpolation;
pub mod regression;
pub mod spline;
pub mod univariate;

use crate::tensors::matrix::MatrixError;

/// Errors that can occur when fitting a curve to sample points.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// No sample points were provided.
    EmptyInput,
    /// The abscissas and ordinates have a different length.
    MismatchedInputs { x_len: usize, y_len: usize },
    /// There are fewer sample points than the fit requires.
    TooFewPoints { got: usize, min: usize },
    /// The abscissa at this index occurs earlier in the input as well.
    DuplicateAbscissa(usize),
    /// The abscissa at this index is not larger than the one before it.
    NotIncreasing { index: usize },
    /// A spline does not have exactly one segment between each pair of neighbouring knots.
    SegmentCount { knots: usize, segments: usize },
    /// The evaluation point lies outside of `[lower, upper)`.
    OutOfDomain { x: f64, lower: f64, upper: f64 },
    /// The linear system of the fit could not be solved.
    Matrix(MatrixError),
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::EmptyInput => write!(f, "No sample points were provided"),
            FitError::MismatchedInputs { x_len, y_len } => write!(
                f,
                "The number of abscissas ({}) and ordinates ({}) differ",
                x_len, y_len
            ),
            FitError::TooFewPoints { got, min } => {
                write!(f, "At least {} sample points are required, got {}", min, got)
            }
            FitError::DuplicateAbscissa(i) => write!(f, "Abscissa {} is a duplicate", i),
            FitError::NotIncreasing { index } => {
                write!(f, "Abscissa {} is not larger than its predecessor", index)
            }
            FitError::SegmentCount { knots, segments } => write!(
                f,
                "A spline with {} knots cannot have {} segments",
                knots, segments
            ),
            FitError::OutOfDomain { x, lower, upper } => {
                write!(f, "{} is outside of the domain [{}, {})", x, lower, upper)
            }
            FitError::Matrix(e) => write!(f, "Could not solve the fit: {}", e),
        }
    }
}

impl std::error::Error for FitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FitError::Matrix(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MatrixError> for FitError {
    fn from(e: MatrixError) -> Self {
        FitError::Matrix(e)
    }
}

/// Check that the sample abscissas and ordinates are non-empty and of equal length.
pub(crate) fn check_samples<T>(x: &[T], y: &[T]) -> Result<(), FitError> {
    if x.len() != y.len() {
        return Err(FitError::MismatchedInputs {
            x_len: x.len(),
            y_len: y.len(),
        });
    }

    if x.is_empty() {
        return Err(FitError::EmptyInput);
    }

    Ok(())
}
