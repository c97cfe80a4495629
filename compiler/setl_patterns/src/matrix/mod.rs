//! Numeric matrices and the linear-algebra collaborator.
//!
//! The evaluator only ever talks to [`LinearAlgebra`]; [`DenseBackend`] is
//! the row-major default implementation.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::errors::{incompatible_type, matrix_error, EvalError};

/// Pivots smaller than this are treated as zero.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Iteration cap for the Jacobi eigenvalue method.
const MAX_JACOBI_SWEEPS: usize = 100;

/// Rectangular grid of doubles, row-major, copy-on-write.
#[derive(Clone, Debug)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Rc<Vec<f64>>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, EvalError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(matrix_error(format!(
                "A {rows}x{cols} matrix needs {} entries, got {}.",
                rows.saturating_mul(cols),
                data.len()
            )));
        }
        Ok(Matrix {
            rows,
            cols,
            data: Rc::new(data),
        })
    }

    /// Build from rows of equal, non-zero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, EvalError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(matrix_error("A matrix needs at least one row and one column."));
        }
        if rows.iter().any(|r| r.len() != cols) {
            return Err(matrix_error("All rows of a matrix must have the same length."));
        }
        let data = rows.iter().flatten().copied().collect();
        Matrix::new(rows.len(), cols, data)
    }

    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Matrix {
            rows: n,
            cols: n,
            data: Rc::new(data),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(row, col)`, both 0-based.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| &self.data[row * self.cols..(row + 1) * self.cols])
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols.max(1)).map(<[f64]>::to_vec).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn same_shape(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// Shape first, then entries in row-major order.
    pub fn total_cmp(&self, other: &Matrix) -> Ordering {
        self.rows
            .cmp(&other.rows)
            .then(self.cols.cmp(&other.cols))
            .then_with(|| {
                self.data
                    .iter()
                    .zip(other.data.iter())
                    .map(|(a, b)| a.total_cmp(b))
                    .find(|o| o.is_ne())
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Operations the evaluator delegates to a numeric library.
pub trait LinearAlgebra {
    fn product(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError>;

    fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError>;

    fn difference(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError>;

    fn scale(&self, a: &Matrix, factor: f64) -> Matrix;

    fn transpose(&self, a: &Matrix) -> Matrix;

    fn determinant(&self, a: &Matrix) -> Result<f64, EvalError>;

    /// Solve `a * x = b` for `x`; `b` may have several columns.
    fn solve(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError>;

    /// Eigenvalues in ascending order.
    fn eigenvalues(&self, a: &Matrix) -> Result<Vec<f64>, EvalError>;

    /// Unit eigenvectors as the columns of a matrix, in the order of
    /// [`eigenvalues`](Self::eigenvalues).
    fn eigenvectors(&self, a: &Matrix) -> Result<Matrix, EvalError>;

    fn inverse(&self, a: &Matrix) -> Result<Matrix, EvalError> {
        self.solve(a, &Matrix::identity(a.rows()))
    }

    /// `a ** exp`; negative exponents invert first.
    fn power(&self, a: &Matrix, exp: i64) -> Result<Matrix, EvalError> {
        if !a.is_square() {
            return Err(incompatible_type("Only square matrices can be raised to a power."));
        }
        let mut base = if exp < 0 { self.inverse(a)? } else { a.clone() };
        let mut e = exp.unsigned_abs();
        let mut acc = Matrix::identity(a.rows());
        while e > 0 {
            if e & 1 == 1 {
                acc = self.product(&acc, &base)?;
            }
            e >>= 1;
            if e > 0 {
                base = self.product(&base, &base)?;
            }
        }
        Ok(acc)
    }
}

/// Straightforward dense implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenseBackend;

impl DenseBackend {
    fn elementwise(
        a: &Matrix,
        b: &Matrix,
        what: &str,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Matrix, EvalError> {
        if !a.same_shape(b) {
            return Err(incompatible_type(format!(
                "Matrix {what} needs equal shapes, got {}x{} and {}x{}.",
                a.rows, a.cols, b.rows, b.cols
            )));
        }
        let data = a.data.iter().zip(b.data.iter()).map(|(x, y)| f(*x, *y)).collect();
        Matrix::new(a.rows, a.cols, data)
    }

    fn require_square(a: &Matrix, what: &str) -> Result<(), EvalError> {
        if a.is_square() {
            Ok(())
        } else {
            Err(incompatible_type(format!(
                "The {what} is only defined for square matrices, got {}x{}.",
                a.rows, a.cols
            )))
        }
    }

    fn is_symmetric(a: &Matrix) -> bool {
        let n = a.rows;
        let scale = a.data.iter().fold(1.0_f64, |m, x| m.max(x.abs()));
        (0..n).all(|i| {
            (i + 1..n).all(|j| (a.data[i * n + j] - a.data[j * n + i]).abs() <= 1e-9 * scale)
        })
    }

    /// Cyclic Jacobi rotations on a symmetric matrix. Returns each diagonal
    /// entry with its column index, and the accumulated rotations whose
    /// columns are the matching eigenvectors.
    fn jacobi(a: &Matrix) -> Result<(Vec<(f64, usize)>, Vec<f64>), EvalError> {
        Self::require_square(a, "eigenvalue decomposition")?;
        if !Self::is_symmetric(a) {
            return Err(matrix_error(
                "Eigen decomposition is only supported for symmetric matrices.",
            ));
        }
        let n = a.rows;
        let mut m = a.data.as_ref().clone();
        let mut v = Matrix::identity(n).data.as_ref().clone();
        for _ in 0..MAX_JACOBI_SWEEPS {
            let off: f64 = (0..n)
                .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
                .map(|(i, j)| m[i * n + j] * m[i * n + j])
                .sum();
            if off < SINGULAR_EPSILON * SINGULAR_EPSILON {
                break;
            }
            for p in 0..n {
                for q in p + 1..n {
                    let apq = m[p * n + q];
                    if apq.abs() < f64::MIN_POSITIVE {
                        continue;
                    }
                    let theta = (m[q * n + q] - m[p * n + p]) / (2.0 * apq);
                    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                    let c = 1.0 / (t * t + 1.0).sqrt();
                    let s = t * c;
                    rotate_columns(&mut m, n, p, q, c, s);
                    rotate_columns(&mut v, n, p, q, c, s);
                    for r in 0..n {
                        let apr = m[p * n + r];
                        let aqr = m[q * n + r];
                        m[p * n + r] = c * apr - s * aqr;
                        m[q * n + r] = s * apr + c * aqr;
                    }
                }
            }
        }
        let diagonal = (0..n).map(|i| (m[i * n + i], i)).collect();
        Ok((diagonal, v))
    }
}

impl LinearAlgebra for DenseBackend {
    fn product(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError> {
        if a.cols != b.rows {
            return Err(incompatible_type(format!(
                "Cannot multiply a {}x{} matrix with a {}x{} matrix.",
                a.rows, a.cols, b.rows, b.cols
            )));
        }
        let mut data = vec![0.0; a.rows * b.cols];
        for i in 0..a.rows {
            for k in 0..a.cols {
                let aik = a.data[i * a.cols + k];
                for j in 0..b.cols {
                    data[i * b.cols + j] += aik * b.data[k * b.cols + j];
                }
            }
        }
        Matrix::new(a.rows, b.cols, data)
    }

    fn sum(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError> {
        Self::elementwise(a, b, "sum", |x, y| x + y)
    }

    fn difference(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError> {
        Self::elementwise(a, b, "difference", |x, y| x - y)
    }

    fn scale(&self, a: &Matrix, factor: f64) -> Matrix {
        Matrix {
            rows: a.rows,
            cols: a.cols,
            data: Rc::new(a.data.iter().map(|x| x * factor).collect()),
        }
    }

    fn transpose(&self, a: &Matrix) -> Matrix {
        let mut data = Vec::with_capacity(a.data.len());
        for j in 0..a.cols {
            for i in 0..a.rows {
                data.push(a.data[i * a.cols + j]);
            }
        }
        Matrix {
            rows: a.cols,
            cols: a.rows,
            data: Rc::new(data),
        }
    }

    fn determinant(&self, a: &Matrix) -> Result<f64, EvalError> {
        Self::require_square(a, "determinant")?;
        let n = a.rows;
        let mut m = a.data.as_ref().clone();
        let mut det = 1.0;
        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&x, &y| m[x * n + col].abs().total_cmp(&m[y * n + col].abs()))
                .unwrap_or(col);
            if m[pivot * n + col].abs() < SINGULAR_EPSILON {
                return Ok(0.0);
            }
            if pivot != col {
                for j in 0..n {
                    m.swap(pivot * n + j, col * n + j);
                }
                det = -det;
            }
            let p = m[col * n + col];
            det *= p;
            for row in col + 1..n {
                let factor = m[row * n + col] / p;
                for j in col..n {
                    m[row * n + j] -= factor * m[col * n + j];
                }
            }
        }
        Ok(det)
    }

    fn solve(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, EvalError> {
        Self::require_square(a, "solution of a linear system")?;
        if b.rows != a.rows {
            return Err(incompatible_type(format!(
                "Right-hand side has {} rows, the system has {}.",
                b.rows, a.rows
            )));
        }
        let n = a.rows;
        let k = b.cols;
        let mut m = a.data.as_ref().clone();
        let mut x = b.data.as_ref().clone();
        for col in 0..n {
            let pivot = (col..n)
                .max_by(|&p, &q| m[p * n + col].abs().total_cmp(&m[q * n + col].abs()))
                .unwrap_or(col);
            if m[pivot * n + col].abs() < SINGULAR_EPSILON {
                return Err(matrix_error("Matrix is singular."));
            }
            if pivot != col {
                for j in 0..n {
                    m.swap(pivot * n + j, col * n + j);
                }
                for j in 0..k {
                    x.swap(pivot * k + j, col * k + j);
                }
            }
            let p = m[col * n + col];
            for row in 0..n {
                if row == col {
                    continue;
                }
                let factor = m[row * n + col] / p;
                if factor == 0.0 {
                    continue;
                }
                for j in col..n {
                    m[row * n + j] -= factor * m[col * n + j];
                }
                for j in 0..k {
                    x[row * k + j] -= factor * x[col * k + j];
                }
            }
        }
        for row in 0..n {
            let p = m[row * n + row];
            for j in 0..k {
                x[row * k + j] /= p;
            }
        }
        Matrix::new(n, k, x)
    }

    fn eigenvalues(&self, a: &Matrix) -> Result<Vec<f64>, EvalError> {
        let (values, _) = Self::jacobi(a)?;
        let mut values: Vec<f64> = values.into_iter().map(|(value, _)| value).collect();
        values.sort_by(f64::total_cmp);
        Ok(values)
    }

    fn eigenvectors(&self, a: &Matrix) -> Result<Matrix, EvalError> {
        let (mut values, v) = Self::jacobi(a)?;
        values.sort_by(|x, y| x.0.total_cmp(&y.0));
        let n = a.rows;
        let mut data = vec![0.0; n * n];
        for (col, &(_, source)) in values.iter().enumerate() {
            for row in 0..n {
                data[row * n + col] = v[row * n + source];
            }
        }
        Matrix::new(n, n, data)
    }
}

/// Right-multiply an `n x n` row-major matrix by the rotation in plane
/// `(p, q)`.
fn rotate_columns(m: &mut [f64], n: usize, p: usize, q: usize, c: f64, s: f64) {
    for r in 0..n {
        let arp = m[r * n + p];
        let arq = m[r * n + q];
        m[r * n + p] = c * arp - s * arq;
        m[r * n + q] = s * arp + c * arq;
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
