use std::{
    fmt::{Display, Write},
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
    slice::Chunks,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::domains::float::{NumericalFloatLike, SingleFloat};

/// A dense row-major matrix with floating point entries.
/// A vector can be represented as a matrix with one row or one column.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix<T>")]
pub struct Matrix<T> {
    pub(crate) data: SmallVec<[T; 25]>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
}

/// The serialized form of a [Matrix], whose shape is checked on deserialization.
#[derive(Deserialize)]
struct RawMatrix<T> {
    data: SmallVec<[T; 25]>,
    nrows: u32,
    ncols: u32,
}

impl<T> TryFrom<RawMatrix<T>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(m: RawMatrix<T>) -> Result<Self, Self::Error> {
        if m.data.len() != m.nrows as usize * m.ncols as usize {
            return Err(MatrixError::DataLength {
                len: m.data.len(),
                nrows: m.nrows,
                ncols: m.ncols,
            });
        }

        Ok(Matrix {
            data: m.data,
            nrows: m.nrows,
            ncols: m.ncols,
        })
    }
}

impl<T: NumericalFloatLike> Matrix<T> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32) -> Matrix<T> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| T::new_zero())
                .collect(),
            nrows,
            ncols,
        }
    }

    /// Create a new square matrix with `nrows` rows and ones on the main diagonal and zeroes elsewhere.
    pub fn identity(nrows: u32) -> Matrix<T> {
        let zero = T::new_zero();
        let one = zero.one();
        Matrix {
            data: (0..nrows as usize * nrows as usize)
                .map(|i| {
                    if i % nrows as usize == i / nrows as usize {
                        one.clone()
                    } else {
                        zero.clone()
                    }
                })
                .collect(),
            nrows,
            ncols: nrows,
        }
    }

    /// Create a new column vector from a list of scalars.
    pub fn new_vec(data: Vec<T>) -> Matrix<T> {
        Matrix {
            nrows: data.len() as u32,
            ncols: 1,
            data: SmallVec::from_vec(data),
        }
    }

    /// Convert a linear, row-major representation of a matrix to a `Matrix`.
    pub fn from_linear(data: Vec<T>, nrows: u32, ncols: u32) -> Result<Matrix<T>, MatrixError> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix {
                data: SmallVec::from_vec(data),
                nrows,
                ncols,
            })
        } else {
            Err(MatrixError::DataLength {
                len: data.len(),
                nrows,
                ncols,
            })
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(matrix: Vec<Vec<T>>) -> Result<Matrix<T>, MatrixError> {
        let nrows = matrix.len();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        let mut data = SmallVec::with_capacity(nrows * cols);
        for d in matrix {
            if d.len() != cols {
                return Err(MatrixError::NotRectangular);
            }

            data.extend(d);
        }

        Ok(Matrix {
            nrows: nrows as u32,
            ncols: cols as u32,
            data,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return the entries in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consume the matrix and return its entries in row-major order.
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    pub fn row_iter(&self) -> Chunks<'_, T> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Return a copy of column `col`.
    pub fn column(&self, col: u32) -> Vec<T> {
        (0..self.nrows).map(|r| self[(r, col)].clone()).collect()
    }

    /// Return the main diagonal.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.nrows.min(self.ncols))
            .map(|i| self[(i, i)].clone())
            .collect()
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<T> {
        let mut m = Matrix::new(self.ncols, self.nrows);
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                m[(c, r)] = self[(r, c)].clone();
            }
        }
        m
    }

    /// Multiply each entry with the scalar `e`.
    pub fn mul_scalar(&self, e: &T) -> Matrix<T> {
        Matrix {
            data: self.data.iter().map(|x| x.clone() * e).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }

    /// Place the columns of `rhs` to the right of the columns of `self`.
    pub fn augment(&self, rhs: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if self.nrows != rhs.nrows {
            return Err(MatrixError::ShapeMismatch {
                expected: self.nrows,
                got: rhs.nrows,
            });
        }

        let ncols = self.ncols + rhs.ncols;
        let mut data = SmallVec::with_capacity(self.nrows as usize * ncols as usize);
        for (a, b) in self.row_iter().zip(rhs.row_iter()) {
            data.extend(a.iter().cloned());
            data.extend(b.iter().cloned());
        }

        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols,
        })
    }

    /// Swap rows `a` and `b`, only touching the columns starting at `from_col`.
    pub fn swap_rows(&mut self, a: u32, b: u32, from_col: u32) {
        if a == b {
            return;
        }

        for l in from_col..self.ncols {
            self.data
                .swap((self.ncols * a + l) as usize, (self.ncols * b + l) as usize);
        }
    }
}

impl<T> Index<u32> for Matrix<T> {
    type Output = [T];

    /// Get the `i`th row of the matrix.
    fn index(&self, index: u32) -> &Self::Output {
        &self.data[index as usize * self.ncols as usize..(index as usize + 1) * self.ncols as usize]
    }
}

impl<T> Index<(u32, u32)> for Matrix<T> {
    type Output = T;

    /// Get the `i`th row and `j`th column of the matrix.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<T> IndexMut<(u32, u32)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut T {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl<T: NumericalFloatLike> Display for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (ri, r) in self.row_iter().enumerate() {
            f.write_char('{')?;
            for (ci, c) in r.iter().enumerate() {
                Display::fmt(c, f)?;
                if ci + 1 < self.ncols as usize {
                    f.write_char(',')?;
                }
            }
            f.write_char('}')?;
            if ri + 1 < self.nrows as usize {
                f.write_char(',')?;
            }
        }
        f.write_char('}')
    }
}

impl<T: NumericalFloatLike> Add<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Add two matrices.
    fn add(self, rhs: &Matrix<T>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| a.clone() + b)
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: NumericalFloatLike> Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Subtract `rhs` from `self`.
    fn sub(self, rhs: &Matrix<T>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| a.clone() - b)
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

impl<T: NumericalFloatLike> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<T>) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols);
        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                let mut acc = T::new_zero();
                for k in 0..self.ncols {
                    acc = self[(i, k)].mul_add(&rhs[(k, j)], &acc);
                }
                m[(i, j)] = acc;
            }
        }

        m
    }
}

impl<T: NumericalFloatLike> Neg for Matrix<T> {
    type Output = Matrix<T>;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = -e.clone();
        }

        self
    }
}

/// Errors that can occur when performing matrix operations.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// The operation requires a square matrix.
    NotSquare { nrows: u32, ncols: u32 },
    /// The right-hand side does not have as many rows as the matrix.
    ShapeMismatch { expected: u32, got: u32 },
    /// A zero pivot or a non-finite solution was found in `row`.
    Singular { row: u32 },
    /// The matrix has no entries.
    Empty,
    /// The linear data does not fill an `nrows` by `ncols` matrix.
    DataLength { len: usize, nrows: u32, ncols: u32 },
    NotRectangular,
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::NotSquare { nrows, ncols } => {
                write!(f, "The matrix is not square: ({},{})", nrows, ncols)
            }
            MatrixError::ShapeMismatch { expected, got } => write!(
                f,
                "The right-hand side has {} rows, but the matrix has {}",
                got, expected
            ),
            MatrixError::Singular { row } => {
                write!(f, "The matrix is singular: zero pivot in row {}", row)
            }
            MatrixError::Empty => write!(f, "The matrix is empty"),
            MatrixError::DataLength { len, nrows, ncols } => write!(
                f,
                "Data length does not match matrix dimensions: {} vs ({},{})",
                len, nrows, ncols
            ),
            MatrixError::NotRectangular => write!(f, "Matrix is not rectangular"),
        }
    }
}

impl std::error::Error for MatrixError {}

/// The outcome of selecting a pivot for one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pivot {
    /// The row that held the largest entry, and that now sits at the pivot position.
    pub row: u32,
    pub swapped: bool,
}

/// Bookkeeping of a reduction to echelon form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowEchelon {
    /// The number of row swaps performed.
    pub swaps: usize,
    /// The rows `(k, r)` exchanged at step `k`, for every step that swapped.
    pub transpositions: Vec<(u32, u32)>,
}

impl RowEchelon {
    /// Returns true if an odd number of rows was swapped, which flips the sign of the determinant.
    pub fn is_odd(&self) -> bool {
        self.swaps % 2 == 1
    }

    /// Construct an `n`-dimensional diagnostic permutation matrix that has a one at
    /// `(k, r)` and `(r, k)` for every step `k` that swapped with row `r`, and that
    /// is the identity elsewhere.
    ///
    /// The swaps are overlaid and not composed, so this matrix is not suited
    /// to unscramble a solution.
    pub fn permutation_matrix<T: NumericalFloatLike>(&self, n: u32) -> Matrix<T> {
        let mut m = Matrix::identity(n);
        let zero = T::new_zero();
        let one = zero.one();
        for &(k, r) in &self.transpositions {
            m[(k, k)] = zero.clone();
            m[(r, r)] = zero.clone();
            m[(k, r)] = one.clone();
            m[(r, k)] = one.clone();
        }
        m
    }
}

impl<T: SingleFloat> Matrix<T> {
    /// Transpose the matrix and conjugate every entry.
    pub fn conjugate_transpose(&self) -> Matrix<T> {
        let mut m = self.transpose();
        for x in &mut m.data {
            *x = x.conj();
        }
        m
    }

    /// Find the row at or below `k` whose entry in column `k` has the largest magnitude
    /// and swap it into row `k`. Ties are resolved in favour of the topmost row.
    ///
    /// This operates on the trailing submatrix starting at `(k, k)` and mutates `self`.
    pub fn pivot(&mut self, k: u32) -> Pivot {
        let mut row = k;
        let mut max = self[(k, k)].norm();
        for r in k + 1..self.nrows {
            let n = self[(r, k)].norm();
            if n > max {
                max = n;
                row = r;
            }
        }

        let swapped = row != k;
        if swapped {
            trace!("Swapping row {} with pivot row {}", row, k);
            self.swap_rows(k, row, k);
        }

        Pivot { row, swapped }
    }

    /// Write the matrix in echelon form in-place, using Gaussian elimination with partial pivoting.
    ///
    /// Every column that has a row below it is reduced, so for an augmented matrix
    /// `[A | b]` the right-hand side is permuted and reduced along with `A`.
    /// Columns that are zero at and below the pivot are skipped, leaving a zero on
    /// the diagonal.
    pub fn echelon_form(&mut self) -> RowEchelon {
        let mut echelon = RowEchelon::default();

        let steps = self.nrows.min(self.ncols);
        for k in 0..steps.saturating_sub(1) {
            let p = self.pivot(k);
            if p.swapped {
                echelon.swaps += 1;
                echelon.transpositions.push((k, p.row));
            }

            if self[(k, k)].is_zero() {
                continue;
            }

            let inv_pivot = self[(k, k)].inv();
            for i in k + 1..self.nrows {
                if self[(i, k)].is_zero() {
                    continue;
                }

                let s = self[(i, k)].clone() * &inv_pivot;
                self[(i, k)] = s.zero();
                for l in k + 1..self.ncols {
                    let e = self[(k, l)].clone() * &s;
                    self[(i, l)] -= e;
                }
            }
        }

        echelon
    }

    /// Compute the determinant of the matrix.
    pub fn det(&self) -> Result<T, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        if self.nrows == 0 {
            return Err(MatrixError::Empty);
        }

        self.clone().det_in_place()
    }

    /// Compute the determinant of the matrix in-place, leaving `self` in echelon form.
    pub fn det_in_place(&mut self) -> Result<T, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        if self.nrows == 0 {
            return Err(MatrixError::Empty);
        }

        let echelon = self.echelon_form();

        let mut det = self.data[0].one();
        for x in 0..self.nrows {
            det *= &self.data[(x + self.nrows * x) as usize];
        }

        if echelon.is_odd() {
            det = -det;
        }

        Ok(det)
    }

    /// Solve `A * x = b` for `x`, where `A` is `self`. The right-hand side `b` may have
    /// multiple columns, which are solved simultaneously.
    pub fn solve(&self, b: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        if self.nrows == 0 {
            return Err(MatrixError::Empty);
        }
        if self.nrows != b.nrows {
            return Err(MatrixError::ShapeMismatch {
                expected: self.nrows,
                got: b.nrows,
            });
        }

        let mut m = self.augment(b)?;
        m.echelon_form();
        m.back_substitution(self.ncols)
    }

    /// Solve `A * x = b` for a single right-hand side `b`.
    pub fn solve_vec(&self, b: &[T]) -> Result<Vec<T>, MatrixError> {
        Ok(self.solve(&Matrix::new_vec(b.to_vec()))?.into_vec())
    }

    /// Compute the inverse of a square matrix, by solving with the identity as right-hand side.
    /// If the matrix is not invertible, this function returns `MatrixError::Singular`.
    pub fn inv(&self) -> Result<Matrix<T>, MatrixError> {
        self.solve(&Matrix::identity(self.nrows))
    }

    /// Solve an augmented matrix in echelon form, where the first `n` columns
    /// are the coefficients and the remaining columns the right-hand sides.
    fn back_substitution(&self, n: u32) -> Result<Matrix<T>, MatrixError> {
        let nrhs = self.ncols - n;
        let mut x = Matrix::new(n, nrhs);

        for i in (0..n).rev() {
            let pivot = &self[(i, i)];
            if pivot.is_zero() {
                debug!("Zero pivot in row {} during back substitution", i);
                return Err(MatrixError::Singular { row: i });
            }

            for c in 0..nrhs {
                let mut e = self[(i, n + c)].clone();
                for j in i + 1..n {
                    e -= self[(i, j)].clone() * &x[(j, c)];
                }
                e /= pivot;

                if !e.is_finite() {
                    debug!("Non-finite solution in row {}", i);
                    return Err(MatrixError::Singular { row: i });
                }

                x[(i, c)] = e;
            }
        }

        Ok(x)
    }
}
