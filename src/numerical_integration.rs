//! Quadrature of a real function over a finite interval.
//!
//! The fixed rules [rectangle], [midpoint] and [trapezoid] sample the integrand at `n`
//! equally spaced subintervals. [romberg] repeatedly halves the step of the trapezoid
//! rule and removes the leading error terms with Richardson extrapolation, until
//! two successive estimates agree.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domains::float::Real;

/// Errors that can occur during numerical integration.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrationError<T> {
    /// A fixed rule was called with zero subintervals.
    NoSubintervals,
    /// Romberg integration did not converge. The last estimate is included.
    MaxIterationsExceeded { estimate: RombergEstimate<T> },
}

impl<T: Real> std::fmt::Display for IntegrationError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationError::NoSubintervals => write!(f, "At least one subinterval is required"),
            IntegrationError::MaxIterationsExceeded { estimate } => write!(
                f,
                "Exceeded the maximum number of iterations ({}), last estimate {}",
                estimate.iterations, estimate
            ),
        }
    }
}

impl<T: Real> std::error::Error for IntegrationError<T> {}

/// Settings for [romberg].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RombergSettings {
    /// Converged when the change of the estimate is smaller than this.
    pub tolerance: f64,
    /// Converged when the change of the estimate is smaller than this times the estimate.
    pub relative_tolerance: f64,
    /// The maximum number of step halvings.
    pub max_iterations: usize,
}

impl Default for RombergSettings {
    fn default() -> Self {
        RombergSettings {
            tolerance: 1e-8,
            relative_tolerance: 1e-8,
            max_iterations: 10,
        }
    }
}

/// The result of Romberg integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RombergEstimate<T> {
    pub value: T,
    /// The absolute difference with the estimate of the previous iteration.
    pub error: T,
    /// The number of step halvings performed.
    pub iterations: usize,
}

impl<T: Real> std::fmt::Display for RombergEstimate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ± {:e}", self.value, self.error.to_f64())
    }
}

/// The step size of `n` equal subintervals of `[a, b]`.
fn step<T: Real>(a: T, b: T, n: usize) -> Result<T, IntegrationError<T>> {
    if n == 0 {
        return Err(IntegrationError::NoSubintervals);
    }

    Ok((b - a) / T::new_from_usize(n))
}

/// Integrate `f` over `[a, b]` with the left rectangle rule on `n` subintervals.
pub fn rectangle<T: Real, F: FnMut(&T) -> T>(
    mut f: F,
    a: T,
    b: T,
    n: usize,
) -> Result<T, IntegrationError<T>> {
    let h = step(a, b, n)?;

    let mut sum = T::new_zero();
    for i in 0..n {
        sum += f(&(a + T::new_from_usize(i) * h));
    }

    Ok(h * sum)
}

/// Integrate `f` over `[a, b]` with the midpoint rule on `n` subintervals.
pub fn midpoint<T: Real, F: FnMut(&T) -> T>(
    mut f: F,
    a: T,
    b: T,
    n: usize,
) -> Result<T, IntegrationError<T>> {
    let h = step(a, b, n)?;
    let half = h / T::new_from_usize(2);

    let mut sum = T::new_zero();
    for i in 0..n {
        sum += f(&(a + T::new_from_usize(i) * h + half));
    }

    Ok(h * sum)
}

/// Integrate `f` over `[a, b]` with the trapezoid rule on `n` subintervals.
pub fn trapezoid<T: Real, F: FnMut(&T) -> T>(
    mut f: F,
    a: T,
    b: T,
    n: usize,
) -> Result<T, IntegrationError<T>> {
    let h = step(a, b, n)?;

    let mut sum = (f(&a) + f(&b)) / T::new_from_usize(2);
    for i in 1..n {
        sum += f(&(a + T::new_from_usize(i) * h));
    }

    Ok(h * sum)
}

/// Combine the estimates `q1` with step `h/2` and `q0` with step `h`, which both
/// have a leading error of order `h^(2m)`, into an estimate of higher order.
fn richardson<T: Real>(q1: T, q0: T, m: usize) -> T {
    let k = T::new_from_usize(4).pow(m as u64);
    (k * q1 - q0) / (k - T::new_one())
}

/// Integrate `f` over `[a, b]` with Romberg's method.
///
/// Iteration `i` evaluates the trapezoid rule with `2^i` subintervals, reusing all
/// previous function evaluations, and extrapolates it `i` times. The iteration stops
/// once the change of the most extrapolated estimate falls below
/// `tolerance` or below `relative_tolerance` times its magnitude.
///
/// If this does not happen within `max_iterations`,
/// [IntegrationError::MaxIterationsExceeded] is returned with the last estimate.
///
/// # Example
///
/// ```
/// use numkit::numerical_integration::{romberg, RombergSettings};
///
/// let r = romberg(|x: &f64| x.sin(), 0., std::f64::consts::PI, &RombergSettings::default()).unwrap();
/// assert!((r.value - 2.).abs() < 1e-8);
/// ```
pub fn romberg<T: Real, F: FnMut(&T) -> T>(
    mut f: F,
    a: T,
    b: T,
    settings: &RombergSettings,
) -> Result<RombergEstimate<T>, IntegrationError<T>> {
    let two = T::new_from_usize(2);
    let mut h = b - a;
    let mut n = 1;

    let mut q0 = vec![h * (f(&a) + f(&b)) / two];
    let mut estimate = RombergEstimate {
        value: q0[0],
        error: T::from_f64(f64::INFINITY),
        iterations: 0,
    };

    for i in 1..=settings.max_iterations {
        n *= 2;
        h = h / two;

        let mut sum = T::new_zero();
        for k in (1..n).step_by(2) {
            sum += f(&(a + T::new_from_usize(k) * h));
        }

        let mut q1 = Vec::with_capacity(i + 1);
        q1.push(q0[0] / two + h * sum);
        for j in 0..i {
            let r = richardson(q1[j], q0[j], j + 1);
            q1.push(r);
        }

        let value = q1[i];
        let error = (value - q0[i - 1]).abs();
        estimate = RombergEstimate {
            value,
            error,
            iterations: i,
        };

        debug!("Romberg iteration {}: h = {}, {}", i, h, estimate);

        let e = error.to_f64();
        if e < settings.tolerance || e < settings.relative_tolerance * value.abs().to_f64() {
            return Ok(estimate);
        }

        q0 = q1;
    }

    warn!(
        "Romberg integration did not converge in {} iterations",
        settings.max_iterations
    );

    Err(IntegrationError::MaxIterationsExceeded { estimate })
}
