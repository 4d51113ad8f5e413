//! Defines the numerical domains the algorithms are generic over.
//!
//! The central trait is [NumericalFloatLike](float::NumericalFloatLike), which supplies the
//! arithmetic needed for polynomial evaluation and Gaussian elimination. Elements are created
//! from existing values with `zero()` and `one()` where possible, so that the same code works for
//! [f64] and for [Complex](float::Complex) numbers.
//!
//! Algorithms that need to compare magnitudes, such as partial pivoting, require
//! [SingleFloat](float::SingleFloat). Algorithms that need a total ordering of the input, such as
//! splines and quadrature, require [Real](float::Real).
pub mod float;
