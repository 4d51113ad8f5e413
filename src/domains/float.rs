//! Floating-point numbers and traits.

use std::{
    fmt::{self, Debug, Display, Write},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// A number, that is potentially floating point.
pub trait NumericalFloatLike:
    PartialEq
    + Clone
    + Debug
    + Display
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Div<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + DivAssign<Self>
{
    /// Perform `(self * a) + b`.
    fn mul_add(&self, a: &Self, b: &Self) -> Self;
    fn zero(&self) -> Self;
    /// Create a zero without a template value.
    fn new_zero() -> Self;
    fn one(&self) -> Self;
    fn pow(&self, e: u64) -> Self;
    fn inv(&self) -> Self;

    fn from_usize(&self, a: usize) -> Self;
    fn from_i64(&self, a: i64) -> Self;

    fn get_epsilon(&self) -> f64;
}

/// A number that behaves like a single number.
pub trait SingleFloat: NumericalFloatLike {
    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;
    fn is_finite(&self) -> bool;
    /// The absolute value (modulus) of the number.
    /// Pivot selection and convergence tests compare this quantity.
    fn norm(&self) -> f64;
    /// The complex conjugate. Real numbers are their own conjugate.
    fn conj(&self) -> Self;
}

/// A float that can be constructed without any parameters, such as f64.
pub trait ConstructibleFloat: NumericalFloatLike {
    fn new_one() -> Self;
    fn new_from_usize(a: usize) -> Self;
    fn new_from_i64(a: i64) -> Self;
}

/// A totally ordered real number.
pub trait Real: SingleFloat + ConstructibleFloat + PartialOrd + Copy {
    fn abs(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn to_f64(&self) -> f64;
    fn from_f64(a: f64) -> Self;
}

impl NumericalFloatLike for f64 {
    #[inline(always)]
    fn mul_add(&self, a: &Self, b: &Self) -> Self {
        f64::mul_add(*self, *a, *b)
    }

    #[inline(always)]
    fn zero(&self) -> Self {
        0.
    }

    #[inline(always)]
    fn new_zero() -> Self {
        0.
    }

    #[inline(always)]
    fn one(&self) -> Self {
        1.
    }

    #[inline]
    fn pow(&self, e: u64) -> Self {
        debug_assert!(e <= i32::MAX as u64);
        self.powi(e as i32)
    }

    #[inline(always)]
    fn inv(&self) -> Self {
        1. / self
    }

    #[inline(always)]
    fn from_usize(&self, a: usize) -> Self {
        a as f64
    }

    #[inline(always)]
    fn from_i64(&self, a: i64) -> Self {
        a as f64
    }

    #[inline(always)]
    fn get_epsilon(&self) -> f64 {
        f64::EPSILON / 2.
    }
}

impl SingleFloat for f64 {
    #[inline(always)]
    fn is_zero(&self) -> bool {
        *self == 0.
    }

    #[inline(always)]
    fn is_one(&self) -> bool {
        *self == 1.
    }

    #[inline(always)]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }

    #[inline(always)]
    fn norm(&self) -> f64 {
        f64::abs(*self)
    }

    #[inline(always)]
    fn conj(&self) -> Self {
        *self
    }
}

impl ConstructibleFloat for f64 {
    #[inline(always)]
    fn new_one() -> Self {
        1.
    }

    #[inline(always)]
    fn new_from_usize(a: usize) -> Self {
        a as f64
    }

    #[inline(always)]
    fn new_from_i64(a: i64) -> Self {
        a as f64
    }
}

impl Real for f64 {
    #[inline(always)]
    fn abs(&self) -> Self {
        f64::abs(*self)
    }

    #[inline(always)]
    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }

    #[inline(always)]
    fn to_f64(&self) -> f64 {
        *self
    }

    #[inline(always)]
    fn from_f64(a: f64) -> Self {
        a
    }
}

/// A complex number `re + i*im`.
#[derive(Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T: NumericalFloatLike> Complex<T> {
    #[inline]
    pub fn new(re: T, im: T) -> Complex<T> {
        Complex { re, im }
    }

    #[inline]
    pub fn new_i() -> Self
    where
        T: ConstructibleFloat,
    {
        Complex {
            re: T::new_zero(),
            im: T::new_one(),
        }
    }

    #[inline]
    pub fn conj(&self) -> Self {
        Complex {
            re: self.re.clone(),
            im: -self.im.clone(),
        }
    }

    #[inline]
    pub fn norm_squared(&self) -> T {
        self.re.clone() * &self.re + self.im.clone() * &self.im
    }
}

impl<T: NumericalFloatLike> From<T> for Complex<T> {
    fn from(re: T) -> Self {
        Complex {
            im: re.zero(),
            re,
        }
    }
}

impl<T: NumericalFloatLike> Add<Complex<T>> for Complex<T> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl<T: NumericalFloatLike> Sub<Complex<T>> for Complex<T> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl<T: NumericalFloatLike> Mul<Complex<T>> for Complex<T> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Complex::new(
            self.re.clone() * &rhs.re - self.im.clone() * &rhs.im,
            self.re * &rhs.im + self.im * &rhs.re,
        )
    }
}

impl<T: NumericalFloatLike> Div<Complex<T>> for Complex<T> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self::Output {
        let n = rhs.norm_squared();
        let re = self.re.clone() * &rhs.re + self.im.clone() * &rhs.im;
        let im = self.im * &rhs.re - self.re * &rhs.im;
        Complex::new(re / &n, im / &n)
    }
}

impl<T: NumericalFloatLike> Neg for Complex<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Complex::new(-self.re, -self.im)
    }
}

macro_rules! forward_complex_ops {
    ($($tr:ident, $method:ident, $tr_assign:ident, $method_assign:ident;)*) => {
        $(
            impl<'a, T: NumericalFloatLike> $tr<&'a Complex<T>> for Complex<T> {
                type Output = Self;

                #[inline]
                fn $method(self, rhs: &'a Complex<T>) -> Self::Output {
                    self.$method(rhs.clone())
                }
            }

            impl<T: NumericalFloatLike> $tr_assign<Complex<T>> for Complex<T> {
                #[inline]
                fn $method_assign(&mut self, rhs: Complex<T>) {
                    *self = self.clone().$method(rhs);
                }
            }

            impl<'a, T: NumericalFloatLike> $tr_assign<&'a Complex<T>> for Complex<T> {
                #[inline]
                fn $method_assign(&mut self, rhs: &'a Complex<T>) {
                    *self = self.clone().$method(rhs.clone());
                }
            }
        )*
    };
}

forward_complex_ops! {
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
}

impl<T: NumericalFloatLike> Display for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        Display::fmt(&self.re, f)?;
        f.write_char('+')?;
        Display::fmt(&self.im, f)?;
        f.write_str("i)")
    }
}

impl<T: NumericalFloatLike> Debug for Complex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        Debug::fmt(&self.re, f)?;
        f.write_char('+')?;
        Debug::fmt(&self.im, f)?;
        f.write_str("i)")
    }
}

impl<T: NumericalFloatLike> NumericalFloatLike for Complex<T> {
    #[inline]
    fn mul_add(&self, a: &Self, b: &Self) -> Self {
        self.clone() * a + b
    }

    #[inline]
    fn zero(&self) -> Self {
        Complex {
            re: self.re.zero(),
            im: self.im.zero(),
        }
    }

    fn new_zero() -> Self {
        Complex {
            re: T::new_zero(),
            im: T::new_zero(),
        }
    }

    fn one(&self) -> Self {
        Complex {
            re: self.re.one(),
            im: self.im.zero(),
        }
    }

    fn pow(&self, mut e: u64) -> Self {
        let mut base = self.clone();
        let mut r = self.one();
        while e > 0 {
            if e % 2 == 1 {
                r *= &base;
            }
            base = base.clone() * &base;
            e /= 2;
        }
        r
    }

    fn inv(&self) -> Self {
        let n = self.norm_squared();
        Complex::new(self.re.clone() / &n, -self.im.clone() / &n)
    }

    fn from_usize(&self, a: usize) -> Self {
        Complex {
            re: self.re.from_usize(a),
            im: self.im.zero(),
        }
    }

    fn from_i64(&self, a: i64) -> Self {
        Complex {
            re: self.re.from_i64(a),
            im: self.im.zero(),
        }
    }

    #[inline(always)]
    fn get_epsilon(&self) -> f64 {
        self.re.get_epsilon()
    }
}

impl<T: SingleFloat> SingleFloat for Complex<T> {
    #[inline]
    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    #[inline]
    fn is_one(&self) -> bool {
        self.re.is_one() && self.im.is_zero()
    }

    #[inline]
    fn is_finite(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }

    #[inline]
    fn norm(&self) -> f64 {
        self.re.norm().hypot(self.im.norm())
    }

    #[inline]
    fn conj(&self) -> Self {
        Complex {
            re: self.re.clone(),
            im: -self.im.clone(),
        }
    }
}

impl<T: ConstructibleFloat> ConstructibleFloat for Complex<T> {
    fn new_one() -> Self {
        Complex {
            re: T::new_one(),
            im: T::new_zero(),
        }
    }

    fn new_from_usize(a: usize) -> Self {
        Complex {
            re: T::new_from_usize(a),
            im: T::new_zero(),
        }
    }

    fn new_from_i64(a: i64) -> Self {
        Complex {
            re: T::new_from_i64(a),
            im: T::new_zero(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Complex, NumericalFloatLike, SingleFloat};

    #[test]
    fn complex_arithmetic() {
        let a = Complex::new(1., 2.);
        let b = Complex::new(3., -1.);

        assert_eq!(a + b, Complex::new(4., 1.));
        assert_eq!(a - b, Complex::new(-2., 3.));
        assert_eq!(a * b, Complex::new(5., 5.));
        assert_eq!((a * b) / b, a);
        assert_eq!(a.conj(), Complex::new(1., -2.));
        assert_eq!(a * a.inv(), Complex::new(1., 0.));
        assert_eq!(Complex::new_i().pow(2), Complex::new(-1., 0.));
        assert_eq!(a.pow(3), a * a * a);
    }

    #[test]
    fn norm() {
        assert_eq!(Complex::new(3., -4.).norm(), 5.);
        assert_eq!((-2.5f64).norm(), 2.5);
        assert_eq!(SingleFloat::conj(&-2.5f64), -2.5);
        assert_eq!(SingleFloat::conj(&Complex::new(1., 2.)), Complex::new(1., -2.));
        assert!(!Complex::new(f64::NAN, 0.).is_finite());
        assert!(Complex::new(0., 0.).is_zero());
    }
}
