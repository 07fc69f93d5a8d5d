//! N-dimensional vector type
//!
//! The dimension is only known at runtime (the user picks it), so components
//! live on the heap. The dot product requires both operands to share a
//! dimension and panics otherwise, the same way slice indexing does.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// N-dimensional vector with `f64` components
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VecN {
    data: Vec<f64>,
}

impl VecN {
    /// Create a vector from its components
    #[inline]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Zero vector of dimension `n`
    #[inline]
    pub fn zeros(n: usize) -> Self {
        Self { data: vec![0.0; n] }
    }

    /// Unit vector along `axis` in dimension `n`
    ///
    /// # Panics
    /// Panics if `axis >= n`.
    pub fn unit(n: usize, axis: usize) -> Self {
        let mut v = Self::zeros(n);
        v.data[axis] = 1.0;
        v
    }

    /// Number of components
    #[inline]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Components as a slice
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Component at `axis`, or 0.0 past the end
    ///
    /// Projections read fixed leading axes; this keeps them total for
    /// low-dimensional inputs that were already validated upstream.
    #[inline]
    pub fn get_or_zero(&self, axis: usize) -> f64 {
        self.data.get(axis).copied().unwrap_or(0.0)
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        assert_eq!(self.dim(), other.dim(), "dimension mismatch in dot product");
        self.data.iter().zip(&other.data).map(|(a, b)| a * b).sum()
    }

    /// Length squared (faster than length)
    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    /// Length (Euclidean norm)
    #[inline]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Iterate over the components
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }
}

impl Index<usize> for VecN {
    type Output = f64;
    #[inline]
    fn index(&self, axis: usize) -> &f64 {
        &self.data[axis]
    }
}

impl IndexMut<usize> for VecN {
    #[inline]
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        &mut self.data[axis]
    }
}

/// Formats as `(1.00, -1.00, 0.50)`
impl fmt::Display for VecN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.2}", x)?;
        }
        write!(f, ")")
    }
}
