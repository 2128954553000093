use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Entries closer than this are considered equal by `approx_eq`.
pub const PRECISION: f64 = 1e-6;

/// Dense row-major matrix with a lazy transpose flag.
///
/// `rows`/`cols` describe the stored buffer. When `transposed` is set the
/// logical shape is `cols x rows` and `(i, j)` reads buffer cell `(j, i)`;
/// the buffer itself is never reordered.
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    transposed: bool,
    data: Vec<f64>,
}

/// A single entry located by `min_element` / `max_element`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            transposed: false,
            data: vec![value; rows * cols],
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 1.0)
    }

    pub fn identity(n: usize) -> Matrix {
        let mut res = Matrix::zeros(n, n);
        for i in 0..n {
            res.data[i * n + i] = 1.0;
        }
        res
    }

    /// Wraps `values` as a `1 x len` matrix.
    pub fn from_row_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            transposed: false,
            data: values,
        }
    }

    /// Wraps `values` as a `len x 1` matrix.
    pub fn from_column_vector(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            transposed: false,
            data: values,
        }
    }

    /// A `rows x cols` matrix with entries uniform in `[min, max)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, min: f64, max: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        res.random_fill(min, max, rng);
        res
    }

    pub fn row_count(&self) -> usize {
        if self.transposed { self.cols } else { self.rows }
    }

    pub fn col_count(&self) -> usize {
        if self.transposed { self.rows } else { self.cols }
    }

    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_transposed(&self) -> bool {
        self.transposed
    }

    /// The underlying buffer in storage order (ignores the transpose flag).
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn index(&self, i: usize, j: usize) -> usize {
        let (m, n) = (self.row_count(), self.col_count());
        if i >= m || j >= n {
            panic!("Matrix index ({}, {}) out of range for {}x{} matrix", i, j, m, n);
        }
        if self.transposed {
            j * self.cols + i
        } else {
            i * self.cols + j
        }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.index(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) -> &mut Matrix {
        let idx = self.index(i, j);
        self.data[idx] = value;
        self
    }

    /// Zeroes every entry in place.
    pub fn reset(&mut self) -> &mut Matrix {
        self.data.iter_mut().for_each(|x| *x = 0.0);
        self
    }

    /// Transposed view. Clones the buffer and flips the flag on the clone;
    /// `self` is left untouched.
    pub fn t(&self) -> Matrix {
        let mut res = self.clone();
        res.transposed = !res.transposed;
        res
    }

    fn assert_same_shape(&self, other: &Matrix, op: &str) {
        if self.row_count() != other.row_count() || self.col_count() != other.col_count() {
            panic!(
                "Matrix::{}: shape mismatch {}x{} vs {}x{}",
                op,
                self.row_count(),
                self.col_count(),
                other.row_count(),
                other.col_count()
            );
        }
    }

    /// Writes `f(self[i][j], other[i][j])` into `self`, walking logical
    /// coordinates so either operand may be a transposed view.
    fn zip_with<F>(&mut self, other: &Matrix, op: &str, f: F) -> &mut Matrix
    where
        F: Fn(f64, f64) -> f64,
    {
        self.assert_same_shape(other, op);
        if self.transposed == other.transposed {
            for (x, &y) in self.data.iter_mut().zip(other.data.iter()) {
                *x = f(*x, y);
            }
        } else {
            for i in 0..self.row_count() {
                for j in 0..self.col_count() {
                    let v = f(self.get(i, j), other.get(i, j));
                    self.set(i, j, v);
                }
            }
        }
        self
    }

    pub fn add(&self, other: &Matrix) -> Matrix {
        let mut res = self.clone();
        res.add_with(other);
        res
    }

    pub fn add_with(&mut self, other: &Matrix) -> &mut Matrix {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Matrix) -> Matrix {
        let mut res = self.clone();
        res.sub_with(other);
        res
    }

    pub fn sub_with(&mut self, other: &Matrix) -> &mut Matrix {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        let mut res = self.clone();
        res.hadamard_with(other);
        res
    }

    pub fn hadamard_with(&mut self, other: &Matrix) -> &mut Matrix {
        self.zip_with(other, "hadamard", |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        let mut res = self.clone();
        res.scale_with(factor);
        res
    }

    pub fn scale_with(&mut self, factor: f64) -> &mut Matrix {
        self.map_with(|x| x * factor)
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        let mut res = self.clone();
        res.map_with(functor);
        res
    }

    pub fn map_with<F>(&mut self, functor: F) -> &mut Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.data.iter_mut().for_each(|x| *x = functor(*x));
        self
    }

    /// Standard matrix product `self * other`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let (m, l, n) = (self.row_count(), self.col_count(), other.col_count());
        if l != other.row_count() {
            panic!(
                "Matrix::multiply: dim mismatch {}x{} vs {}x{}",
                m,
                l,
                other.row_count(),
                n
            );
        }

        let mut res = Matrix::zeros(m, n);
        for i in 0..m {
            for j in 0..n {
                let mut sum = 0.0;
                for k in 0..l {
                    sum += self.get(i, k) * other.get(k, j);
                }
                res.data[i * n + j] = sum;
            }
        }
        res
    }

    /// Sums `f(x)` over every entry.
    pub fn accumulate<F>(&self, f: F) -> f64
    where
        F: Fn(f64) -> f64,
    {
        self.data.iter().map(|&x| f(x)).sum()
    }

    pub fn sum(&self) -> f64 {
        self.accumulate(|x| x)
    }

    pub fn norm_l1(&self) -> f64 {
        self.accumulate(f64::abs)
    }

    pub fn norm_l2(&self) -> f64 {
        self.accumulate(|x| x * x).sqrt()
    }

    /// Lp norm, `p >= 1`.
    pub fn norm_lp(&self, p: f64) -> f64 {
        self.accumulate(|x| x.abs().powf(p)).powf(1.0 / p)
    }

    /// Smallest entry in row-major logical order; ties keep the first seen.
    /// Returns `None` for an empty matrix.
    pub fn min_element(&self) -> Option<Element> {
        self.extreme(|candidate, best| candidate < best)
    }

    /// Largest entry in row-major logical order; ties keep the first seen.
    pub fn max_element(&self) -> Option<Element> {
        self.extreme(|candidate, best| candidate > best)
    }

    fn extreme<F>(&self, replaces: F) -> Option<Element>
    where
        F: Fn(f64, f64) -> bool,
    {
        let mut best: Option<Element> = None;
        for i in 0..self.row_count() {
            for j in 0..self.col_count() {
                let value = self.get(i, j);
                match best {
                    Some(b) if !replaces(value, b.value) => {}
                    _ => best = Some(Element { row: i, col: j, value }),
                }
            }
        }
        best
    }

    /// Fills every entry uniformly from `[min, max)`. An empty range
    /// (`max <= min`) fills with `min`.
    pub fn random_fill<R: Rng + ?Sized>(&mut self, min: f64, max: f64, rng: &mut R) -> &mut Matrix {
        if max <= min {
            self.data.iter_mut().for_each(|x| *x = min);
            return self;
        }
        let dist = Uniform::new(min, max);
        self.data.iter_mut().for_each(|x| *x = dist.sample(rng));
        self
    }

    /// Same logical shape and every entry within `PRECISION`.
    pub fn approx_eq(&self, other: &Matrix) -> bool {
        let (m, n) = (self.row_count(), self.col_count());
        if m != other.row_count() || n != other.col_count() {
            return false;
        }
        for i in 0..m {
            for j in 0..n {
                if (self.get(i, j) - other.get(i, j)).abs() > PRECISION {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::zeros(0, 0)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..self.row_count() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[")?;
            for j in 0..self.col_count() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:.6}", self.get(i, j))?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Self::Output {
        Matrix::add(self, rhs)
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        Matrix::sub(self, rhs)
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(rhs)
    }
}
