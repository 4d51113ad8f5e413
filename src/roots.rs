//! Iterative root finding for scalar functions.
//!
//! All methods iterate until both the residual `|f(x)|` and the last step are smaller
//! than [RootFinderSettings::tolerance], and give up after
//! [RootFinderSettings::max_iterations] steps.
//!
//! # Example
//!
//! ```
//! use numkit::roots::{newton_raphson, RootFinderSettings};
//!
//! let root = newton_raphson(
//!     |x: &f64| x * x - 2.,
//!     |x: &f64| 2. * x,
//!     1.,
//!     &RootFinderSettings::default(),
//! )
//! .unwrap();
//! assert!((root - 2f64.sqrt()).abs() < 1e-5);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domains::float::{Real, SingleFloat};

/// Errors that can occur during root finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootFindingError {
    /// The secant method needs two seeds.
    TooFewSeeds { got: usize },
    /// The search interval is empty or has fewer than two sample points.
    InvalidInterval,
    MaxIterationsExceeded { iterations: usize },
    /// An iterate is infinite or NaN, for example because the derivative vanished.
    NonFinite,
}

impl std::fmt::Display for RootFindingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RootFindingError::TooFewSeeds { got } => {
                write!(f, "Two seeds are required, but {} were given", got)
            }
            RootFindingError::InvalidInterval => write!(f, "Invalid search interval"),
            RootFindingError::MaxIterationsExceeded { iterations } => {
                write!(f, "No root found within {} iterations", iterations)
            }
            RootFindingError::NonFinite => write!(f, "The iteration produced a non-finite value"),
        }
    }
}

impl std::error::Error for RootFindingError {}

/// Settings for the root finders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootFinderSettings {
    /// The bound on both the residual and the step size of a converged root.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RootFinderSettings {
    fn default() -> Self {
        RootFinderSettings {
            tolerance: 1e-5,
            max_iterations: 100,
        }
    }
}

/// Find a root of `f` with the secant method, starting from the first two `seeds`.
pub fn secant<T: SingleFloat, F: FnMut(&T) -> T>(
    mut f: F,
    seeds: &[T],
    settings: &RootFinderSettings,
) -> Result<T, RootFindingError> {
    let (mut a, mut b) = match seeds {
        [a, b, ..] => (a.clone(), b.clone()),
        _ => return Err(RootFindingError::TooFewSeeds { got: seeds.len() }),
    };

    let mut fa = f(&a);
    let mut fb = f(&b);

    for i in 0..settings.max_iterations {
        let next = b.clone() - fb.clone() * (a.clone() - &b) / (fa - &fb);
        a = std::mem::replace(&mut b, next);
        fa = std::mem::replace(&mut fb, f(&b));

        if !b.is_finite() || !fb.is_finite() {
            debug!("Secant iteration {} diverged", i);
            return Err(RootFindingError::NonFinite);
        }

        debug!("Secant iteration {}: x = {}, f(x) = {}", i, b, fb);

        if fb.norm() < settings.tolerance && (b.clone() - &a).norm() < settings.tolerance {
            return Ok(b);
        }
    }

    warn!(
        "Secant method did not converge in {} iterations",
        settings.max_iterations
    );
    Err(RootFindingError::MaxIterationsExceeded {
        iterations: settings.max_iterations,
    })
}

/// Find a root of `f` with derivative `df` using the Newton-Raphson method, starting from `x0`.
///
/// For complex `T`, a complex seed can converge to a complex root.
pub fn newton_raphson<T: SingleFloat, F: FnMut(&T) -> T, D: FnMut(&T) -> T>(
    mut f: F,
    mut df: D,
    x0: T,
    settings: &RootFinderSettings,
) -> Result<T, RootFindingError> {
    let mut x = x0;

    for i in 0..settings.max_iterations {
        let val = f(&x);
        let step = val.clone() / df(&x);
        x -= &step;

        if !x.is_finite() {
            debug!("Newton-Raphson iteration {} diverged", i);
            return Err(RootFindingError::NonFinite);
        }

        debug!("Newton-Raphson iteration {}: x = {}", i, x);

        if step.norm() < settings.tolerance && val.norm() < settings.tolerance {
            return Ok(x);
        }
    }

    warn!(
        "Newton-Raphson did not converge in {} iterations",
        settings.max_iterations
    );
    Err(RootFindingError::MaxIterationsExceeded {
        iterations: settings.max_iterations,
    })
}

/// Find all roots of `f` in `[a, b]` by sampling `f` at `cells` equally spaced points
/// and refining every sign change between neighbouring samples with the secant method.
///
/// Roots that do not cause a sign change, such as double roots, are not found.
pub fn bisection_scan<T: Real, F: FnMut(&T) -> T>(
    mut f: F,
    a: T,
    b: T,
    cells: usize,
    settings: &RootFinderSettings,
) -> Result<Vec<T>, RootFindingError> {
    if cells < 2 || !(a < b) {
        return Err(RootFindingError::InvalidInterval);
    }

    let h = (b - a) / T::new_from_usize(cells - 1);
    let xs: Vec<T> = (0..cells)
        .map(|i| if i == cells - 1 { b } else { a + T::new_from_usize(i) * h })
        .collect();
    let fs: Vec<T> = xs.iter().map(&mut f).collect();

    let mut roots = vec![];
    for (x, fx) in xs.windows(2).zip(fs.windows(2)) {
        if fx[0] * fx[1] < T::new_zero() {
            debug!("Sign change in [{}, {}]", x[0], x[1]);
            roots.push(secant(&mut f, x, settings)?);
        }
    }

    Ok(roots)
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::{bisection_scan, newton_raphson, secant, RootFinderSettings, RootFindingError};
    use crate::domains::float::Complex;

    #[test]
    fn secant_sqrt() {
        let settings = RootFinderSettings::default();
        let r = secant(|x: &f64| x * x - 2., &[1., 2.], &settings).unwrap();
        assert_abs_diff_eq!(r, 2f64.sqrt(), epsilon = 1e-5);

        assert_eq!(
            secant(|x: &f64| *x, &[1.], &settings),
            Err(RootFindingError::TooFewSeeds { got: 1 })
        );
    }

    #[test]
    fn newton_cos() {
        let r = newton_raphson(
            |x: &f64| x.cos() - x,
            |x: &f64| -x.sin() - 1.,
            1.,
            &RootFinderSettings::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(r.cos(), r, epsilon = 1e-5);
    }

    #[test]
    fn newton_complex() {
        // x^2 + 1 has no real roots
        let one = Complex::new(1., 0.);
        let r = newton_raphson(
            |x: &Complex<f64>| *x * *x + one,
            |x: &Complex<f64>| Complex::new(2., 0.) * *x,
            Complex::new(0.5, 0.5),
            &RootFinderSettings::default(),
        )
        .unwrap();

        assert_abs_diff_eq!(r.re, 0., epsilon = 1e-5);
        assert_abs_diff_eq!(r.im, 1., epsilon = 1e-5);
    }

    #[test]
    fn newton_failure() {
        // the derivative vanishes at the seed
        assert_eq!(
            newton_raphson(
                |x: &f64| x * x + 1.,
                |x: &f64| 2. * x,
                0.,
                &RootFinderSettings::default()
            ),
            Err(RootFindingError::NonFinite)
        );

        let settings = RootFinderSettings {
            tolerance: 1e-5,
            max_iterations: 5,
        };
        assert_eq!(
            newton_raphson(|x: &f64| x * x + 1., |x: &f64| 2. * x, 0.3, &settings),
            Err(RootFindingError::MaxIterationsExceeded { iterations: 5 })
        );
    }

    #[test]
    fn scan() {
        let settings = RootFinderSettings {
            tolerance: 1e-10,
            max_iterations: 100,
        };
        let roots = bisection_scan(|x: &f64| x.sin(), 0.5, 10., 50, &settings).unwrap();

        assert_eq!(roots.len(), 3);
        for (r, k) in roots.iter().zip(1..) {
            assert_abs_diff_eq!(*r, k as f64 * std::f64::consts::PI, epsilon = 1e-8);
        }

        assert_eq!(
            bisection_scan(|x: &f64| *x, 1., 0., 50, &settings),
            Err(RootFindingError::InvalidInterval)
        );
        assert_eq!(
            bisection_scan(|x: &f64| *x, 0., 1., 1, &settings),
            Err(RootFindingError::InvalidInterval)
        );
    }
}
