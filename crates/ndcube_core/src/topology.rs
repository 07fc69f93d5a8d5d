//! Hypercube (n-cube) topology
//!
//! An n-cube has 2^n vertices, one per n-bit index, and n·2^(n-1) edges
//! joining indices that differ in exactly one bit.
//!
//! Vertex `i` sits at +1 on axis `j` when bit `j` of `i` is set and at -1
//! otherwise, so for n = 3 index 0 is (-1, -1, -1) and index 7 is (1, 1, 1).

use ndcube_math::VecN;

use crate::error::{validate_dimension, EngineError};

/// An edge between two vertices whose indices differ in one bit
///
/// Stored with `high > low` so each unordered pair appears once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Larger vertex index
    pub high: usize,
    /// Smaller vertex index
    pub low: usize,
}

/// Coordinate of vertex `index` in dimension `n`
pub fn vertex_coordinate(index: usize, n: usize) -> VecN {
    VecN::new(
        (0..n)
            .map(|j| if (index >> j) & 1 == 1 { 1.0 } else { -1.0 })
            .collect(),
    )
}

/// Vertex and edge structure of an n-cube
///
/// Immutable once built; a dimension change builds a new one.
#[derive(Clone, Debug)]
pub struct Hypercube {
    dimension: usize,
    vertices: Vec<VecN>,
    edges: Vec<Edge>,
}

impl Hypercube {
    /// Build the n-cube
    ///
    /// Fails with a dimension error before allocating if `n` is zero or
    /// larger than the supported maximum.
    pub fn new(n: usize) -> Result<Self, EngineError> {
        validate_dimension(n)?;

        let count = 1usize << n;
        let vertices: Vec<VecN> = (0..count).map(|i| vertex_coordinate(i, n)).collect();

        let mut edges = Vec::with_capacity(n * count / 2);
        for i in 0..count {
            for k in 0..n {
                let j = i ^ (1 << k);
                if j < i {
                    edges.push(Edge { high: i, low: j });
                }
            }
        }

        Ok(Self { dimension: n, vertices, edges })
    }

    /// Dimension n
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// All 2^n vertex coordinates, indexed by vertex id
    #[inline]
    pub fn vertices(&self) -> &[VecN] {
        &self.vertices
    }

    /// All n·2^(n-1) edges
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of vertices (2^n)
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges (n·2^(n-1))
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if `a` and `b` are distinct vertices joined by an edge
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        a < self.vertex_count() && b < self.vertex_count() && (a ^ b).count_ones() == 1
    }

    /// The n neighbours of vertex `index`, ordered by the axis flipped
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.dimension).map(move |k| index ^ (1 << k))
    }
}
