//! N-dimensional rotation from plane angles
//!
//! A rotation in n dimensions is parameterized by one angle per coordinate
//! plane, `C(n, 2)` in total. The full rotation is the ordered product of
//! the elementary plane rotations, so the plane order fixed by
//! [`RotationGenerators`] is part of the meaning of an angle vector.
//!
//! [`RotationEngine`] drifts the angles along a random direction that is
//! re-sampled on a fixed period. Angles are wrapped into [0, 2π) only at
//! those refresh points.

use std::f64::consts::TAU;
use std::time::Duration;

use log::debug;
use ndcube_math::{binomial, MatN, VecN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{validate_dimension, EngineError};

/// Default angle step per tick, in radians
pub const DEFAULT_STEP: f64 = 1.0 / 50.0;

/// Default time between direction refreshes
pub const DEFAULT_REFRESH_PERIOD: Duration = Duration::from_secs(1);

/// A coordinate plane spanned by two axes, `axis_i > axis_j`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RotationPlane {
    pub axis_i: usize,
    pub axis_j: usize,
}

impl RotationPlane {
    /// The n×n rotation matrix for `angle` in this plane
    pub fn matrix(&self, n: usize, angle: f64) -> MatN {
        ndcube_math::plane_rotation(n, angle, self.axis_i, self.axis_j)
    }
}

/// The fixed, ordered set of rotation planes for a dimension
///
/// Planes are enumerated with the outer loop over `i` ascending and the
/// inner loop over `j < i` ascending: for n = 4 the order is
/// (1,0), (2,0), (2,1), (3,0), (3,1), (3,2).
#[derive(Clone, Debug, PartialEq)]
pub struct RotationGenerators {
    dimension: usize,
    planes: Vec<RotationPlane>,
}

impl RotationGenerators {
    /// Build the `C(n, 2)` planes for dimension `n`
    pub fn new(n: usize) -> Result<Self, EngineError> {
        validate_dimension(n)?;

        let mut planes = Vec::with_capacity(binomial(n, 2));
        for i in 0..n {
            for j in 0..i {
                planes.push(RotationPlane { axis_i: i, axis_j: j });
            }
        }

        Ok(Self { dimension: n, planes })
    }

    /// Dimension these planes live in
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The planes, in composition order
    #[inline]
    pub fn planes(&self) -> &[RotationPlane] {
        &self.planes
    }

    /// Number of planes, `C(n, 2)`
    #[inline]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// True for n = 1, which has no rotation planes
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Compose `R_0 · R_1 · … · R_{ncr-1}` for the given angles
    pub fn compose(&self, angles: &[f64]) -> Result<MatN, EngineError> {
        if angles.len() != self.planes.len() {
            return Err(EngineError::RotationParameter {
                expected: self.planes.len(),
                actual: angles.len(),
            });
        }

        let mut w = MatN::identity(self.dimension);
        for (plane, &angle) in self.planes.iter().zip(angles) {
            w.rotate_plane_right(angle, plane.axis_i, plane.axis_j);
        }
        Ok(w)
    }
}

/// How a new drift direction is chosen at each refresh
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationStyle {
    /// Spin in a single random plane, one way or the other
    Axis,
    /// Spin along a random unit direction across all planes
    #[default]
    Unit,
}

/// Direction with exactly one non-zero component, `±step`
///
/// Empty when `ncr` is zero.
pub fn sample_axis(ncr: usize, step: f64, rng: &mut impl Rng) -> Vec<f64> {
    let mut dir = vec![0.0; ncr];
    if ncr == 0 {
        return dir;
    }
    let k = rng.gen_range(0..ncr);
    dir[k] = if rng.gen_bool(0.5) { -step } else { step };
    dir
}

/// Random direction of Euclidean length `step`
///
/// Components are drawn uniformly from [-1, 1) and normalized; an all-zero
/// draw is retried. Empty when `ncr` is zero.
pub fn sample_unit(ncr: usize, step: f64, rng: &mut impl Rng) -> Vec<f64> {
    if ncr == 0 {
        return Vec::new();
    }
    loop {
        let raw: Vec<f64> = (0..ncr).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        let mag = raw.iter().map(|x| x * x).sum::<f64>().sqrt();
        if mag > 0.0 {
            return raw.into_iter().map(|x| x / mag * step).collect();
        }
    }
}

/// Reduce an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Settings for a [`RotationEngine`]
#[derive(Clone, Debug, PartialEq)]
pub struct RotationConfig {
    /// Angle added per tick along the drift direction
    pub step: f64,
    /// Time between direction refreshes
    pub refresh_period: Duration,
    /// Direction sampling style
    pub style: RotationStyle,
    /// Seed for reproducible runs; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            refresh_period: DEFAULT_REFRESH_PERIOD,
            style: RotationStyle::default(),
            seed: None,
        }
    }
}

/// Owns the rotation angles and drives them over time
pub struct RotationEngine {
    generators: RotationGenerators,
    angles: Vec<f64>,
    direction: Vec<f64>,
    step: f64,
    refresh_period: Duration,
    last_refresh: Duration,
    style: RotationStyle,
    rng: StdRng,
}

impl RotationEngine {
    /// Create an engine at the zero rotation with a freshly sampled direction
    ///
    /// `now` is the engine clock reading the refresh timer starts from.
    pub fn new(n: usize, config: &RotationConfig, now: Duration) -> Result<Self, EngineError> {
        let generators = RotationGenerators::new(n)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(generators, config, now, rng)
    }

    fn with_rng(
        generators: RotationGenerators,
        config: &RotationConfig,
        now: Duration,
        rng: StdRng,
    ) -> Result<Self, EngineError> {
        let ncr = generators.len();
        let mut engine = Self {
            generators,
            angles: vec![0.0; ncr],
            direction: vec![0.0; ncr],
            step: config.step,
            refresh_period: config.refresh_period,
            last_refresh: now,
            style: config.style,
            rng,
        };
        engine.refresh_direction(now);
        Ok(engine)
    }

    /// Rebuild for a new dimension, keeping settings and the random stream
    ///
    /// Angles restart at zero since their meaning depends on n.
    pub fn resized(&self, n: usize, now: Duration) -> Result<Self, EngineError> {
        let generators = RotationGenerators::new(n)?;
        let config = RotationConfig {
            step: self.step,
            refresh_period: self.refresh_period,
            style: self.style,
            seed: None,
        };
        Self::with_rng(generators, &config, now, self.rng.clone())
    }

    /// Dimension n
    #[inline]
    pub fn dimension(&self) -> usize {
        self.generators.dimension()
    }

    /// Number of rotation parameters, `C(n, 2)`
    #[inline]
    pub fn ncr(&self) -> usize {
        self.generators.len()
    }

    /// The rotation planes in composition order
    #[inline]
    pub fn generators(&self) -> &RotationGenerators {
        &self.generators
    }

    /// Current angle vector
    #[inline]
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Current drift direction
    #[inline]
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }

    /// Active direction sampling style
    #[inline]
    pub fn style(&self) -> RotationStyle {
        self.style
    }

    /// Switch sampling style; takes effect at the next refresh
    pub fn set_style(&mut self, style: RotationStyle) {
        self.style = style;
    }

    /// Replace the angle vector
    pub fn set_angles(&mut self, angles: Vec<f64>) -> Result<(), EngineError> {
        if angles.len() != self.ncr() {
            return Err(EngineError::RotationParameter {
                expected: self.ncr(),
                actual: angles.len(),
            });
        }
        self.angles = angles;
        Ok(())
    }

    /// Sample a new direction, restart the refresh timer, and wrap angles
    pub fn refresh_direction(&mut self, now: Duration) {
        let ncr = self.ncr();
        self.direction = match self.style {
            RotationStyle::Axis => sample_axis(ncr, self.step, &mut self.rng),
            RotationStyle::Unit => sample_unit(ncr, self.step, &mut self.rng),
        };
        self.last_refresh = now;

        for angle in &mut self.angles {
            *angle = wrap_angle(*angle);
        }
        debug!("Rotation direction refreshed ({:?}, {} planes)", self.style, ncr);
    }

    /// Add the direction to the angles `ticks` times, without wrapping
    pub fn advance(&mut self, ticks: u32) {
        let ticks = f64::from(ticks);
        for (angle, d) in self.angles.iter_mut().zip(&self.direction) {
            *angle += d * ticks;
        }
    }

    /// One frame tick at engine time `now`
    ///
    /// Refreshes the direction once the period has elapsed, otherwise
    /// advances one step. Returns true when a refresh happened.
    pub fn tick(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_refresh) > self.refresh_period {
            self.refresh_direction(now);
            true
        } else {
            self.advance(1);
            false
        }
    }

    /// The composed rotation for the current angles
    pub fn rotation(&self) -> Result<MatN, EngineError> {
        self.generators.compose(&self.angles)
    }

    /// Rotate every point by the composed rotation
    ///
    /// # Panics
    /// Panics if a point's dimension differs from the engine's.
    pub fn apply(&self, points: &[VecN]) -> Result<Vec<VecN>, EngineError> {
        let w = self.rotation()?;
        Ok(points.iter().map(|p| w.transform(p)).collect())
    }
}
