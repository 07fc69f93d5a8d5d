//! N-dimensional Mathematics Library
//!
//! This crate provides the runtime-dimension vector and matrix types used by
//! the ndcube engine.
//!
//! ## Core Types
//!
//! - [`VecN`] - N-dimensional vector with `f64` components
//! - [`MatN`] - N×N matrix for rotations
//! - [`Vec2`] - 2D point for projected output

mod vecn;
mod vec2;
pub mod matn;

pub use vecn::VecN;
pub use vec2::Vec2;
pub use matn::{MatN, plane_rotation};

/// Linear interpolation: `a·(1−x) + b·x`
///
/// `lerp(0.0, a, b) == a` and `lerp(1.0, a, b) == b` exactly.
#[inline]
pub fn lerp(x: f64, a: f64, b: f64) -> f64 {
    a * (1.0 - x) + b * x
}

/// Binomial coefficient `C(n, r)`, or 0 when `r > n`
pub fn binomial(n: usize, r: usize) -> usize {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    // Multiply before dividing so every intermediate stays an integer
    (0..r).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        for &(a, b) in &[(0.0, 1.0), (-3.5, 7.25), (1e6, -1e-6), (0.1, 0.2)] {
            assert_eq!(lerp(0.0, a, b), a);
            assert_eq!(lerp(1.0, a, b), b);
        }
        assert_eq!(lerp(0.5, 2.0, 4.0), 3.0);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(1, 2), 0);
        assert_eq!(binomial(2, 2), 1);
        assert_eq!(binomial(3, 2), 3);
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(9, 2), 36);
        assert_eq!(binomial(16, 2), 120);
        assert_eq!(binomial(10, 5), 252);
    }
}
