//! Piecewise cubic interpolation.
//!
//! A [CubicSpline] over the knots `x_0 < x_1 < ... < x_{N-1}` consists of `N-1`
//! [CubicSegment]s. Segment `k` covers `[x_k, x_{k+1})` and is a cubic in the local
//! coordinate `t = (x - x_k) / (x_{k+1} - x_k)`, so that `t` runs from 0 to 1.
//!
//! Each segment is the cubic Hermite interpolant of the values and slopes at its end
//! points, which makes the spline and its first derivative continuous for any
//! choice of slopes. The constructors differ in how the slopes are chosen.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{domains::float::Real, tensors::matrix::Matrix};

use super::{check_samples, FitError};

/// A cubic `a + b t + c t^2 + d t^3` on the interval `[x_k, x_{k+1})`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment<T> {
    /// The index `k` of the interval.
    pub interval: usize,
    /// The coefficients `[a, b, c, d]` in ascending powers of `t`.
    pub coefficients: [T; 4],
}

impl<T: Real> CubicSegment<T> {
    /// Create the Hermite cubic with value `y0` and slope `m0` at the start and value `y1`
    /// and slope `m1` at the end of an interval of width `h`.
    fn hermite(interval: usize, h: T, y0: T, y1: T, m0: T, m1: T) -> Self {
        let two = T::new_from_usize(2);
        let three = T::new_from_usize(3);
        let dy = y1 - y0;
        let s0 = h * m0;
        let s1 = h * m1;

        CubicSegment {
            interval,
            coefficients: [
                y0,
                s0,
                three * dy - two * s0 - s1,
                s0 + s1 - two * dy,
            ],
        }
    }

    /// Evaluate the cubic at the local coordinate `t`.
    pub fn evaluate(&self, t: &T) -> T {
        let [a, b, c, d] = &self.coefficients;
        d.mul_add(t, c).mul_add(t, b).mul_add(t, a)
    }

    /// Evaluate the derivative with respect to the local coordinate `t`.
    pub fn derivative(&self, t: &T) -> T {
        let [_, b, c, d] = &self.coefficients;
        let two = T::new_from_usize(2);
        let three = T::new_from_usize(3);
        (three * d).mul_add(t, &(two * c)).mul_add(t, b)
    }
}

/// A piecewise cubic with a continuous first derivative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawCubicSpline<T>",
    bound(deserialize = "T: Real + Deserialize<'de>")
)]
pub struct CubicSpline<T> {
    knots: Vec<T>,
    segments: Vec<CubicSegment<T>>,
}

#[derive(Deserialize)]
struct RawCubicSpline<T> {
    knots: Vec<T>,
    segments: Vec<CubicSegment<T>>,
}

impl<T: Real> TryFrom<RawCubicSpline<T>> for CubicSpline<T> {
    type Error = FitError;

    fn try_from(s: RawCubicSpline<T>) -> Result<Self, Self::Error> {
        check_increasing(&s.knots)?;

        if s.segments.len() != s.knots.len() - 1 {
            return Err(FitError::SegmentCount {
                knots: s.knots.len(),
                segments: s.segments.len(),
            });
        }

        Ok(CubicSpline {
            knots: s.knots,
            segments: s.segments,
        })
    }
}

impl<T: Real> CubicSpline<T> {
    /// Construct the spline whose slopes also make the second derivative continuous
    /// at the interior knots, and vanish at the end points.
    ///
    /// The slopes `m_k` solve the tridiagonal system
    /// ```text
    /// 2 m_0 + m_1 = 3 s_0
    /// h_k m_{k-1} + 2 (h_{k-1} + h_k) m_k + h_{k-1} m_{k+1} = 3 (h_k s_{k-1} + h_{k-1} s_k)
    /// m_{N-2} + 2 m_{N-1} = 3 s_{N-2}
    /// ```
    /// where `h_k = x_{k+1} - x_k` and `s_k = (y_{k+1} - y_k) / h_k`. For unit
    /// spacing the interior rows read `[1, 4, 1]` with right-hand side `3 (y_{k+1} - y_{k-1})`.
    #[instrument(level = "debug", skip_all, fields(knots = x.len()))]
    pub fn clamped(x: &[T], y: &[T]) -> Result<Self, FitError> {
        check_knots(x, y)?;

        let n = x.len();
        let h: Vec<T> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<T> = y
            .windows(2)
            .zip(&h)
            .map(|(w, h)| (w[1] - w[0]) / h)
            .collect();

        let one = T::new_one();
        let two = T::new_from_usize(2);
        let three = T::new_from_usize(3);

        let mut system = Matrix::new(n as u32, n as u32);
        let mut rhs = Vec::with_capacity(n);

        system[(0, 0)] = two;
        system[(0, 1)] = one;
        rhs.push(three * s[0]);

        for k in 1..n - 1 {
            let r = k as u32;
            system[(r, r - 1)] = h[k];
            system[(r, r)] = two * (h[k - 1] + h[k]);
            system[(r, r + 1)] = h[k - 1];
            rhs.push(three * (h[k] * s[k - 1] + h[k - 1] * s[k]));
        }

        let last = n as u32 - 1;
        system[(last, last - 1)] = one;
        system[(last, last)] = two;
        rhs.push(three * s[n - 2]);

        let slopes = system.solve_vec(&rhs)?;
        debug!("Knot slopes: {:?}", slopes);

        Ok(Self::from_slopes(x, y, &slopes))
    }

    /// Construct the spline whose slope at each interior knot is the centred difference
    /// `(y_{k+1} - y_{k-1}) / (x_{k+1} - x_{k-1})`, and zero at the end points.
    ///
    /// No linear system is solved, but the second derivative is in general
    /// discontinuous at the knots.
    #[instrument(level = "debug", skip_all, fields(knots = x.len()))]
    pub fn centered_differences(x: &[T], y: &[T]) -> Result<Self, FitError> {
        check_knots(x, y)?;

        let n = x.len();
        let mut slopes = vec![T::new_zero(); n];
        for k in 1..n - 1 {
            slopes[k] = (y[k + 1] - y[k - 1]) / (x[k + 1] - x[k - 1]);
        }

        Ok(Self::from_slopes(x, y, &slopes))
    }

    fn from_slopes(x: &[T], y: &[T], slopes: &[T]) -> Self {
        let segments = (0..x.len() - 1)
            .map(|k| {
                CubicSegment::hermite(k, x[k + 1] - x[k], y[k], y[k + 1], slopes[k], slopes[k + 1])
            })
            .collect();

        CubicSpline {
            knots: x.to_vec(),
            segments,
        }
    }

    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    pub fn segments(&self) -> &[CubicSegment<T>] {
        &self.segments
    }

    /// The half-open domain `[x_0, x_{N-1})` on which the spline can be evaluated.
    pub fn domain(&self) -> (T, T) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    /// Find the segment `k` with `x_k <= x < x_{k+1}` and the local coordinate of `x` in it.
    fn locate(&self, x: &T) -> Result<(&CubicSegment<T>, T, T), FitError> {
        let (lower, upper) = self.domain();
        if !(*x >= lower && *x < upper) {
            return Err(FitError::OutOfDomain {
                x: x.to_f64(),
                lower: lower.to_f64(),
                upper: upper.to_f64(),
            });
        }

        let k = self.knots.partition_point(|xk| xk <= x) - 1;
        let h = self.knots[k + 1] - self.knots[k];
        Ok((&self.segments[k], (*x - self.knots[k]) / h, h))
    }

    /// Evaluate the spline at `x`, which must lie in [domain](Self::domain).
    pub fn evaluate(&self, x: &T) -> Result<T, FitError> {
        let (segment, t, _) = self.locate(x)?;
        Ok(segment.evaluate(&t))
    }

    /// Evaluate the spline at every point in `xs`. Fails if any point is out of the domain.
    pub fn evaluate_many(&self, xs: &[T]) -> Result<Vec<T>, FitError> {
        xs.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Evaluate the first derivative `dp/dx` of the spline at `x`.
    pub fn derivative(&self, x: &T) -> Result<T, FitError> {
        let (segment, t, h) = self.locate(x)?;
        Ok(segment.derivative(&t) / h)
    }
}

/// Check that there are at least two knots, and that they are strictly increasing.
fn check_knots<T: Real>(x: &[T], y: &[T]) -> Result<(), FitError> {
    check_samples(x, y)?;
    check_increasing(x)
}

fn check_increasing<T: Real>(x: &[T]) -> Result<(), FitError> {
    if x.len() < 2 {
        return Err(FitError::TooFewPoints {
            got: x.len(),
            min: 2,
        });
    }

    for (i, w) in x.windows(2).enumerate() {
        if !(w[1] > w[0]) {
            debug!("Knot {} is not larger than its predecessor", i + 1);
            return Err(FitError::NotIncreasing { index: i + 1 });
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::CubicSpline;
    use crate::poly::FitError;

    #[test]
    fn symmetric() {
        let s = CubicSpline::clamped(&[0., 1., 2.], &[0., 1., 0.]).unwrap();

        let expected = [[0., 1.5, 0., -0.5], [1., 0., -1.5, 0.5]];
        for (seg, e) in s.segments().iter().zip(expected) {
            for (c, e) in seg.coefficients.iter().zip(e) {
                assert_abs_diff_eq!(*c, e, epsilon = 1e-14);
            }
        }

        let left = s.evaluate(&0.5).unwrap();
        let right = s.evaluate(&1.5).unwrap();
        assert_abs_diff_eq!(left, 0.6875, epsilon = 1e-14);
        assert_abs_diff_eq!(left, right, epsilon = 1e-14);
    }

    #[test]
    fn reproduces_knots() {
        let x = [-4., -3., -2., -1., 0., 1., 2., 3., 4.];
        let y: Vec<f64> = x.iter().map(|x: &f64| (-x * x).exp()).collect();

        for s in [
            CubicSpline::clamped(&x, &y).unwrap(),
            CubicSpline::centered_differences(&x, &y).unwrap(),
        ] {
            for (xi, yi) in x[..x.len() - 1].iter().zip(&y) {
                assert_eq!(s.evaluate(xi).unwrap(), *yi);
            }
        }
    }

    #[test]
    fn continuity() {
        let x = [0., 0.5, 2., 3., 4.5, 5.];
        let y: Vec<f64> = x.iter().map(|x: &f64| x.sin()).collect();

        for s in [
            CubicSpline::clamped(&x, &y).unwrap(),
            CubicSpline::centered_differences(&x, &y).unwrap(),
        ] {
            let seg = s.segments();
            for k in 1..x.len() - 1 {
                let h_left = x[k] - x[k - 1];
                let h_right = x[k + 1] - x[k];

                assert_abs_diff_eq!(seg[k - 1].evaluate(&1.), y[k], epsilon = 1e-12);
                assert_abs_diff_eq!(seg[k].evaluate(&0.), y[k], epsilon = 1e-12);
                assert_abs_diff_eq!(
                    seg[k - 1].derivative(&1.) / h_left,
                    seg[k].derivative(&0.) / h_right,
                    epsilon = 1e-12
                );
                assert_abs_diff_eq!(
                    s.derivative(&x[k]).unwrap(),
                    seg[k].derivative(&0.) / h_right,
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn straight_line() {
        let x = [0., 0.3, 1., 2.5, 3.];
        let y: Vec<f64> = x.iter().map(|x| 2. * x + 1.).collect();

        let s = CubicSpline::clamped(&x, &y).unwrap();
        for p in [0.1, 0.7, 1.9, 2.9] {
            assert_abs_diff_eq!(s.evaluate(&p).unwrap(), 2. * p + 1., epsilon = 1e-12);
            assert_abs_diff_eq!(s.derivative(&p).unwrap(), 2., epsilon = 1e-12);
        }
    }

    #[test]
    fn centered_slopes() {
        let s = CubicSpline::centered_differences(&[0., 1., 3.], &[0., 2., 4.]).unwrap();

        assert_eq!(s.derivative(&0.).unwrap(), 0.);
        assert_abs_diff_eq!(s.derivative(&1.).unwrap(), 4. / 3., epsilon = 1e-14);
    }

    #[test]
    fn domain() {
        let s = CubicSpline::clamped(&[0., 1., 2.], &[0., 1., 0.]).unwrap();

        assert_eq!(s.domain(), (0., 2.));
        assert_eq!(s.knots(), &[0., 1., 2.]);
        assert_eq!(s.evaluate(&0.).unwrap(), 0.);
        assert_eq!(
            s.evaluate(&2.),
            Err(FitError::OutOfDomain {
                x: 2.,
                lower: 0.,
                upper: 2.
            })
        );
        assert!(s.evaluate(&-0.1).is_err());
        assert!(s.evaluate(&f64::NAN).is_err());
        assert!(s.evaluate_many(&[0.5, 1.5, 3.]).is_err());
        assert_eq!(s.evaluate_many(&[0., 1.]).unwrap(), vec![0., 1.]);
    }

    #[test]
    fn invalid_knots() {
        assert_eq!(
            CubicSpline::clamped(&[0., 2., 1.], &[0., 1., 0.]),
            Err(FitError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            CubicSpline::centered_differences(&[0., 0.], &[0., 1.]),
            Err(FitError::NotIncreasing { index: 1 })
        );
        assert_eq!(
            CubicSpline::clamped(&[0.], &[0.]),
            Err(FitError::TooFewPoints { got: 1, min: 2 })
        );
    }

    #[test]
    fn deserialize() {
        let s = CubicSpline::clamped(&[0., 1., 2.], &[0., 1., 0.]).unwrap();
        let back: CubicSpline<f64> = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(back.knots(), s.knots());
        assert_abs_diff_eq!(back.evaluate(&0.5).unwrap(), 0.6875, epsilon = 1e-14);

        let segment = r#"{"interval":0,"coefficients":[0.0,1.0,0.0,0.0]}"#;
        for (json, err) in [
            (
                r#"{"knots":[],"segments":[]}"#.to_string(),
                FitError::TooFewPoints { got: 0, min: 2 },
            ),
            (
                r#"{"knots":[0.0,1.0,2.0],"segments":[]}"#.to_string(),
                FitError::SegmentCount {
                    knots: 3,
                    segments: 0,
                },
            ),
            (
                format!(r#"{{"knots":[1.0,0.0],"segments":[{}]}}"#, segment),
                FitError::NotIncreasing { index: 1 },
            ),
        ] {
            let e = serde_json::from_str::<CubicSpline<f64>>(&json).unwrap_err();
            assert!(e.to_string().contains(&err.to_string()));
        }

        let s: CubicSpline<f64> =
            serde_json::from_str(&format!(r#"{{"knots":[0.0,1.0],"segments":[{}]}}"#, segment))
                .unwrap();
        assert_eq!(s.evaluate(&0.25).unwrap(), 0.25);
    }
}
