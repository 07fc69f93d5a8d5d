//! Square N×N matrices for N-dimensional rotations
//!
//! Row-major storage. `transform` computes `M * v` with `v` as a column
//! vector, and `mul(a, b)` applies `b` first, then `a`.

use crate::VecN;

/// Square matrix of runtime dimension
#[derive(Clone, Debug, PartialEq)]
pub struct MatN {
    n: usize,
    data: Vec<f64>,
}

impl MatN {
    /// Identity matrix of dimension `n`
    pub fn identity(n: usize) -> Self {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Self { n, data }
    }

    /// Dimension of the matrix
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Entry at (`row`, `col`)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    /// Set entry at (`row`, `col`)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Matrix product `self * other`
    ///
    /// # Panics
    /// Panics if the dimensions differ.
    #[allow(clippy::needless_range_loop)]
    pub fn mul(&self, other: &MatN) -> MatN {
        assert_eq!(self.n, other.n, "dimension mismatch in matrix product");
        let n = self.n;
        let mut result = MatN { n, data: vec![0.0; n * n] };
        for i in 0..n {
            for k in 0..n {
                let a = self.get(i, k);
                if a == 0.0 {
                    continue;
                }
                for j in 0..n {
                    result.data[i * n + j] += a * other.get(k, j);
                }
            }
        }
        result
    }

    /// Right-multiply in place by the plane rotation `plane_rotation(n, angle, i, j)`
    ///
    /// Only columns `i` and `j` change, so composing a chain of plane
    /// rotations costs O(n) per factor instead of a full O(n³) product.
    pub fn rotate_plane_right(&mut self, angle: f64, i: usize, j: usize) {
        let (sn, cs) = angle.sin_cos();
        let n = self.n;
        for r in 0..n {
            let wi = self.data[r * n + i];
            let wj = self.data[r * n + j];
            self.data[r * n + i] = wi * cs - wj * sn;
            self.data[r * n + j] = wi * sn + wj * cs;
        }
    }

    /// Transform a vector: result = M * v
    ///
    /// # Panics
    /// Panics if `v` has a different dimension.
    pub fn transform(&self, v: &VecN) -> VecN {
        assert_eq!(self.n, v.dim(), "dimension mismatch in transform");
        let n = self.n;
        let x = v.as_slice();
        VecN::new(
            (0..n)
                .map(|row| {
                    self.data[row * n..(row + 1) * n]
                        .iter()
                        .zip(x)
                        .map(|(m, xi)| m * xi)
                        .sum()
                })
                .collect(),
        )
    }

    /// Transpose
    pub fn transpose(&self) -> MatN {
        let n = self.n;
        let mut result = MatN::identity(n);
        for i in 0..n {
            for j in 0..n {
                result.data[j * n + i] = self.data[i * n + j];
            }
        }
        result
    }

    /// True when `M^T M` is the identity within `tolerance`
    pub fn is_orthogonal(&self, tolerance: f64) -> bool {
        let product = self.transpose().mul(self);
        let identity = MatN::identity(self.n);
        product
            .data
            .iter()
            .zip(&identity.data)
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

/// Rotation by `angle` in the plane of axes `i` and `j`
///
/// Identity except `R[i][i] = R[j][j] = cos`, `R[i][j] = sin`,
/// `R[j][i] = -sin`.
///
/// # Example
/// ```
/// use ndcube_math::{matn::plane_rotation, VecN};
/// let r = plane_rotation(3, std::f64::consts::FRAC_PI_2, 1, 0);
/// let v = r.transform(&VecN::new(vec![1.0, 0.0, 0.0]));
/// assert!((v[1] - 1.0).abs() < 1e-12);
/// ```
pub fn plane_rotation(n: usize, angle: f64, i: usize, j: usize) -> MatN {
    let (sn, cs) = angle.sin_cos();
    let mut m = MatN::identity(n);
    m.set(i, i, cs);
    m.set(j, j, cs);
    m.set(i, j, sn);
    m.set(j, i, -sn);
    m
}
