use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::domains::float::{Complex, NumericalFloatLike, SingleFloat};

/// A dense univariate polynomial `p(x) = c_0 + c_1 x + ... + c_n x^n`, stored as
/// its coefficients in ascending powers.
///
/// A polynomial always has at least one coefficient and its degree is the number
/// of coefficients minus one. Leading zeroes that arise from cancellation in
/// addition or subtraction are kept, so that the degree of a sum is the larger
/// of the degrees of its terms.
///
/// All arithmetic returns a new polynomial and leaves the operands untouched.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolynomial<T>")]
pub struct Polynomial<T> {
    coefficients: Vec<T>,
}

#[derive(Deserialize)]
struct RawPolynomial<T> {
    coefficients: Vec<T>,
}

impl<T> TryFrom<RawPolynomial<T>> for Polynomial<T> {
    type Error = &'static str;

    fn try_from(p: RawPolynomial<T>) -> Result<Self, Self::Error> {
        if p.coefficients.is_empty() {
            return Err("A polynomial needs at least one coefficient");
        }

        Ok(Polynomial {
            coefficients: p.coefficients,
        })
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Polynomial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        write!(f, "[ ")?;
        for c in self.coefficients.iter() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?} }}", c)?;
        }
        write!(f, " ]")
    }
}

impl<T: SingleFloat> std::fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        for (e, c) in self.coefficients.iter().enumerate() {
            if c.is_zero() {
                continue;
            }

            if first {
                first = false;
            } else {
                write!(f, "+")?;
            }

            match e {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}*x", c)?,
                _ => write!(f, "{}*x^{}", c, e)?,
            }
        }

        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}

impl<T: NumericalFloatLike> From<Vec<T>> for Polynomial<T> {
    fn from(coefficients: Vec<T>) -> Self {
        Polynomial::new(coefficients)
    }
}

impl<T: NumericalFloatLike> Polynomial<T> {
    /// Create a polynomial from its coefficients in ascending powers.
    /// An empty list yields the zero polynomial `[0]`.
    pub fn new(coefficients: Vec<T>) -> Self {
        if coefficients.is_empty() {
            return Self::constant(T::new_zero());
        }

        Polynomial { coefficients }
    }

    /// Constructs a constant polynomial.
    #[inline]
    pub fn constant(coeff: T) -> Self {
        Polynomial {
            coefficients: vec![coeff],
        }
    }

    /// Constructs a polynomial with a single term.
    pub fn monomial(coeff: T, exponent: usize) -> Self {
        let mut coefficients = vec![coeff.zero(); exponent + 1];
        coefficients[exponent] = coeff;
        Polynomial { coefficients }
    }

    /// Constructs the polynomial `x - root`.
    pub fn linear_factor(root: &T) -> Self {
        Polynomial {
            coefficients: vec![-root.clone(), root.one()],
        }
    }

    /// Constructs a zero polynomial of degree zero.
    #[inline]
    pub fn zero(&self) -> Self {
        Self::constant(self.coefficients[0].zero())
    }

    /// Constructs a polynomial that is one.
    #[inline]
    pub fn one(&self) -> Self {
        Self::constant(self.coefficients[0].one())
    }

    #[inline]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    #[inline]
    pub fn into_coefficients(self) -> Vec<T> {
        self.coefficients
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Get the leading coefficient.
    pub fn lcoeff(&self) -> &T {
        &self.coefficients[self.coefficients.len() - 1]
    }

    /// Get the constant term of the polynomial.
    #[inline]
    pub fn get_constant(&self) -> &T {
        &self.coefficients[0]
    }

    /// Evaluate the polynomial at `x` using Horner's method.
    pub fn evaluate(&self, x: &T) -> T {
        let mut res = x.zero();
        for c in self.coefficients.iter().rev() {
            res = res.mul_add(x, c);
        }
        res
    }

    /// Evaluate the polynomial at every point in `xs`.
    pub fn evaluate_many(&self, xs: &[T]) -> Vec<T> {
        xs.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Multiply every coefficient with `coeff`.
    pub fn mul_coeff(mut self, coeff: &T) -> Self {
        for c in &mut self.coefficients {
            *c *= coeff;
        }
        self
    }

    /// Compute `self^pow`.
    pub fn pow(&self, mut pow: usize) -> Self {
        if pow == 0 {
            return self.one();
        }

        let mut x = self.clone();
        let mut y = self.one();
        while pow != 1 {
            if pow % 2 == 1 {
                y = &y * &x;
                pow -= 1;
            }

            x = &x * &x;
            pow /= 2;
        }

        x * &y
    }

    /// Compute the `order`-th derivative. The derivative of a constant is the
    /// zero polynomial `[0]`, and so are all its further derivatives.
    pub fn derivative(&self, order: usize) -> Self {
        let mut p = self.clone();
        for _ in 0..order {
            if p.coefficients.len() == 1 {
                return p.zero();
            }

            p.coefficients = p
                .coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(e, c)| c.from_usize(e) * c)
                .collect();
        }

        p
    }
}

impl<T: SingleFloat> Polynomial<T> {
    /// Returns true if all coefficients are zero.
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|c| c.is_zero())
    }

    /// Remove leading zero coefficients, keeping at least one coefficient.
    pub fn truncate(mut self) -> Self {
        while self.coefficients.len() > 1 && self.lcoeff().is_zero() {
            self.coefficients.pop();
        }
        self
    }
}

impl<T: NumericalFloatLike> Add for Polynomial<T> {
    type Output = Self;

    /// Add two polynomials. The tail of the longer operand is kept as is.
    fn add(mut self, mut other: Self) -> Self::Output {
        if self.coefficients.len() < other.coefficients.len() {
            std::mem::swap(&mut self, &mut other);
        }

        for (c, o) in self.coefficients.iter_mut().zip(other.coefficients) {
            *c += o;
        }

        self
    }
}

impl<'a, 'b, T: NumericalFloatLike> Add<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    fn add(self, other: &'a Polynomial<T>) -> Self::Output {
        self.clone().add(other.clone())
    }
}

impl<T: NumericalFloatLike> Sub for Polynomial<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        self.add(other.neg())
    }
}

impl<'a, 'b, T: NumericalFloatLike> Sub<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    fn sub(self, other: &'a Polynomial<T>) -> Self::Output {
        self.clone().add(other.clone().neg())
    }
}

impl<T: NumericalFloatLike> Neg for Polynomial<T> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = -c.clone();
        }
        self
    }
}

impl<'a, T: NumericalFloatLike> Neg for &'a Polynomial<T> {
    type Output = Polynomial<T>;

    fn neg(self) -> Self::Output {
        self.clone().neg()
    }
}

impl<'a, 'b, T: NumericalFloatLike> Mul<&'a Polynomial<T>> for &'b Polynomial<T> {
    type Output = Polynomial<T>;

    /// Multiply two polynomials by convolving their coefficients.
    /// The degree of the result is the sum of the degrees.
    fn mul(self, rhs: &'a Polynomial<T>) -> Self::Output {
        let k = self.coefficients.len();
        let zero = self.coefficients[0].zero();
        let mut coefficients = vec![zero; k + rhs.degree()];

        for (i, c) in rhs.coefficients.iter().enumerate() {
            for (r, s) in coefficients[i..i + k].iter_mut().zip(&self.coefficients) {
                *r += c.clone() * s;
            }
        }

        Polynomial { coefficients }
    }
}

impl<'a, T: NumericalFloatLike> Mul<&'a Polynomial<T>> for Polynomial<T> {
    type Output = Polynomial<T>;

    #[inline]
    fn mul(self, rhs: &'a Polynomial<T>) -> Self::Output {
        (&self) * rhs
    }
}

impl<T: NumericalFloatLike> Mul for Polynomial<T> {
    type Output = Polynomial<T>;

    #[inline]
    fn mul(self, rhs: Polynomial<T>) -> Self::Output {
        (&self) * &rhs
    }
}

/// Arithmetic between a polynomial and a scalar, where the scalar is treated as a
/// polynomial of degree zero.
macro_rules! impl_scalar_ops {
    ($($t:ty),*) => {
        $(
            impl Add<$t> for Polynomial<$t> {
                type Output = Polynomial<$t>;

                fn add(self, rhs: $t) -> Self::Output {
                    self + Polynomial::constant(rhs)
                }
            }

            impl Add<Polynomial<$t>> for $t {
                type Output = Polynomial<$t>;

                fn add(self, rhs: Polynomial<$t>) -> Self::Output {
                    rhs + Polynomial::constant(self)
                }
            }

            impl Sub<$t> for Polynomial<$t> {
                type Output = Polynomial<$t>;

                fn sub(self, rhs: $t) -> Self::Output {
                    self - Polynomial::constant(rhs)
                }
            }

            impl Sub<Polynomial<$t>> for $t {
                type Output = Polynomial<$t>;

                fn sub(self, rhs: Polynomial<$t>) -> Self::Output {
                    Polynomial::constant(self) - rhs
                }
            }

            impl Mul<$t> for Polynomial<$t> {
                type Output = Polynomial<$t>;

                fn mul(self, rhs: $t) -> Self::Output {
                    self.mul_coeff(&rhs)
                }
            }

            impl Mul<$t> for &Polynomial<$t> {
                type Output = Polynomial<$t>;

                fn mul(self, rhs: $t) -> Self::Output {
                    self.clone().mul_coeff(&rhs)
                }
            }

            impl Mul<Polynomial<$t>> for $t {
                type Output = Polynomial<$t>;

                fn mul(self, rhs: Polynomial<$t>) -> Self::Output {
                    rhs.mul_coeff(&self)
                }
            }
        )*
    };
}

impl_scalar_ops!(f64, Complex<f64>);

#[cfg(test)]
mod test {
    use approx::assert_abs_diff_eq;

    use super::Polynomial;
    use crate::domains::float::Complex;

    #[test]
    fn arithmetic() {
        let p = Polynomial::new(vec![1., 2., 3., 4.]);
        let q = Polynomial::new(vec![1., 1.]);

        assert_eq!((2.5 * p.clone()).coefficients(), &[2.5, 5., 7.5, 10.]);
        assert_eq!((-&p).coefficients(), &[-1., -2., -3., -4.]);
        assert_eq!((&p + &q).coefficients(), &[2., 3., 3., 4.]);
        assert_eq!((&p - &q).coefficients(), &[0., 1., 3., 4.]);
        assert_eq!((&q - &p).coefficients(), &[0., -1., -3., -4.]);
        assert_eq!((&p * &q).coefficients(), &[1., 3., 5., 7., 4.]);
        assert_eq!((&p * &q).degree(), p.degree() + q.degree());
        assert_eq!(((&p + &q) - q.clone()), p);

        // the operands are unchanged
        assert_eq!(p.coefficients(), &[1., 2., 3., 4.]);
        assert_eq!(q.coefficients(), &[1., 1.]);
    }

    #[test]
    fn scalar_arithmetic() {
        let p = Polynomial::new(vec![1., 2., 3.]);

        assert_eq!((p.clone() + 1.).coefficients(), &[2., 2., 3.]);
        assert_eq!((1. + p.clone()).coefficients(), &[2., 2., 3.]);
        assert_eq!((p.clone() - 1.).coefficients(), &[0., 2., 3.]);
        assert_eq!((1. - p.clone()).coefficients(), &[0., -2., -3.]);
        assert_eq!(p.clone() * 1., p);
        assert_eq!(&p * 1., p);
        assert_eq!((p.clone() * Polynomial::constant(1.)), p);
        assert_eq!((0. * p.clone()).degree(), 2);
    }

    #[test]
    fn no_trimming() {
        let p = Polynomial::new(vec![1., 2., 3.]);
        let zero = &p - &p;

        assert_eq!(zero.degree(), 2);
        assert!(zero.is_zero());
        assert_eq!(zero.truncate().degree(), 0);

        assert_eq!(Polynomial::<f64>::new(vec![]).coefficients(), &[0.]);
    }

    #[test]
    fn deserialize() {
        let p: Polynomial<f64> = serde_json::from_str(r#"{"coefficients":[1.0,0.0,2.0]}"#).unwrap();
        assert_eq!(p.degree(), 2);
        assert_eq!(*p.get_constant(), 1.);
        assert_eq!(p.into_coefficients(), vec![1., 0., 2.]);

        assert!(serde_json::from_str::<Polynomial<f64>>(r#"{"coefficients":[]}"#).is_err());
    }

    #[test]
    fn evaluate() {
        let p = Polynomial::new(vec![1., 2., 3., 4.]);
        assert_eq!(p.evaluate(&2.5), 87.25);
        assert_eq!(p.evaluate_many(&[1., 2., 2.5]), vec![10., 49., 87.25]);
        assert_eq!(Polynomial::constant(3.).evaluate(&100.), 3.);
        assert_eq!(Polynomial::monomial(2., 3).evaluate(&2.), 16.);
        assert_eq!(Polynomial::linear_factor(&2.).evaluate(&5.), 3.);
    }

    #[test]
    fn derivative() {
        let p = Polynomial::new(vec![1., 2., 3., 4.]);

        assert_eq!(p.derivative(0), p);
        assert_eq!(p.derivative(1).coefficients(), &[2., 6., 12.]);
        assert_eq!(p.derivative(2).coefficients(), &[6., 24.]);
        assert_eq!(p.derivative(3).coefficients(), &[24.]);
        assert_eq!(p.derivative(4).coefficients(), &[0.]);
        assert_eq!(p.derivative(5).coefficients(), &[0.]);

        for c in [-3., 0., 7.5] {
            assert_eq!(Polynomial::constant(c).derivative(1).coefficients(), &[0.]);
        }
    }

    #[test]
    fn pow() {
        let q = Polynomial::new(vec![1., 1.]);
        assert_eq!(q.pow(0).coefficients(), &[1.]);
        assert_eq!(q.pow(3).coefficients(), &[1., 3., 3., 1.]);
        assert_eq!(q.pow(4).coefficients(), &[1., 4., 6., 4., 1.]);
    }

    #[test]
    fn complex() {
        let i = Complex::new(0., 1.);
        let p = Polynomial::new(vec![Complex::new(1., 0.), Complex::new(0., 0.), Complex::new(1., 0.)]);

        // 1 + x^2 vanishes at x = i
        let r = p.evaluate(&i);
        assert_abs_diff_eq!(r.re, 0.);
        assert_abs_diff_eq!(r.im, 0.);

        let q = p.clone() * i;
        assert_eq!(q.coefficients()[2], i);
        assert_eq!((i + p).coefficients()[0], Complex::new(1., 1.));
    }

    #[test]
    fn display() {
        let p = Polynomial::new(vec![1., 0., -3., 2.]);
        assert_eq!(p.to_string(), "1+-3*x^2+2*x^3");
        assert_eq!(Polynomial::new(vec![0., 0.]).to_string(), "0");
        assert_eq!(Polynomial::new(vec![0., 2.]).to_string(), "2*x");
    }
}
