//! Projection of rotated N-dimensional points onto the 2D plane
//!
//! Four models are supported:
//!
//! - **Isometric**: axis k maps to the unit-circle point at angle 2πk/n and
//!   the contributions are summed. The view position is ignored.
//! - **Perspective (average)**: the view position is added, the n axes are
//!   averaged into three groups (axis j feeds group j mod 3), and the first
//!   two groups are divided by the third.
//! - **Perspective (trim)**: the view position is added and the first two
//!   raw coordinates are divided by the third.
//! - **Orthographic**: the first two raw coordinates. The view position is
//!   ignored.
//!
//! Every model finally divides by its scale. The view position is added,
//! not subtracted, for both perspective models.

use std::f64::consts::{SQRT_2, TAU};

use ndcube_math::{Vec2, VecN};
use serde::{Serialize, Deserialize};

use crate::error::{validate_dimension, DimensionReason, EngineError};

/// Axis of the view position that carries the camera depth
pub const DEPTH_AXIS: usize = 2;

/// Floor for the animated view depth
///
/// Rotated vertices stay within √n of the origin. Targets come from
/// [`default_view_depth`], and `10 + √2·n > √n` keeps the perspective
/// divisor positive; the engine clamps to this floor on top of that.
pub const MIN_VIEW_DEPTH: f64 = 1.0;

/// Divisor magnitude below which the perspective divide is clamped
pub const DEPTH_EPSILON: f64 = 1e-9;

/// A projection model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionModel {
    #[default]
    Isometric,
    PerspectiveAverage,
    PerspectiveTrim,
    Orthographic,
}

impl ProjectionModel {
    /// All models, in menu order
    pub const ALL: [ProjectionModel; 4] = [
        ProjectionModel::Isometric,
        ProjectionModel::PerspectiveAverage,
        ProjectionModel::PerspectiveTrim,
        ProjectionModel::Orthographic,
    ];

    /// Fewest axes this model can project
    pub fn min_dimension(self) -> usize {
        match self {
            ProjectionModel::Isometric => 1,
            ProjectionModel::Orthographic => 2,
            ProjectionModel::PerspectiveAverage | ProjectionModel::PerspectiveTrim => 3,
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            ProjectionModel::Isometric => "Isometric",
            ProjectionModel::PerspectiveAverage => "Perspective - Avg",
            ProjectionModel::PerspectiveTrim => "Perspective - Trim",
            ProjectionModel::Orthographic => "Orthographic",
        }
    }

    /// Whether the view position affects this model
    pub fn uses_view(self) -> bool {
        matches!(
            self,
            ProjectionModel::PerspectiveAverage | ProjectionModel::PerspectiveTrim
        )
    }

    /// Scale that frames an n-cube under this model at the given view depth
    pub fn default_scale(self, n: usize, view_depth: f64) -> f64 {
        let root_n = (n as f64).sqrt();
        match self {
            ProjectionModel::Isometric => SQRT_2 * root_n,
            ProjectionModel::PerspectiveAverage | ProjectionModel::PerspectiveTrim => {
                4.0 * SQRT_2 * root_n / view_depth
            }
            ProjectionModel::Orthographic => root_n,
        }
    }

    /// Fail unless this model can project `n` axes
    pub fn check_dimension(self, n: usize) -> Result<(), EngineError> {
        let min = self.min_dimension();
        if n < min {
            return Err(EngineError::dimension(
                n,
                DimensionReason::BelowProjectionMinimum(min),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for ProjectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// View depth that frames an n-cube: `10 + √2·n`
pub fn default_view_depth(n: usize) -> f64 {
    10.0 + SQRT_2 * n as f64
}

/// A projection model together with its scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionSpec {
    pub model: ProjectionModel,
    pub scale: f64,
}

impl ProjectionSpec {
    /// The default spec for `model` in dimension `n` at `view_depth`
    pub fn framed(model: ProjectionModel, n: usize, view_depth: f64) -> Self {
        Self {
            model,
            scale: model.default_scale(n, view_depth),
        }
    }
}

/// A chain of projection blends
///
/// When a projection change interrupts a blend that is still in flight, the
/// interrupted blend is frozen at its current fraction and becomes the
/// `from` side of the new one, so the picture never jumps.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectionMix {
    /// A single model
    Pure(ProjectionModel),
    /// `from` blended towards `to` by fraction `t`
    Blend {
        from: Box<ProjectionMix>,
        to: ProjectionModel,
        t: f64,
    },
}

impl ProjectionMix {
    /// Every model that contributes to this mix
    pub fn models(&self) -> Vec<ProjectionModel> {
        match self {
            ProjectionMix::Pure(m) => vec![*m],
            ProjectionMix::Blend { from, to, .. } => {
                let mut models = from.models();
                models.push(*to);
                models
            }
        }
    }

    /// The model being blended towards
    pub fn target(&self) -> ProjectionModel {
        match self {
            ProjectionMix::Pure(m) => *m,
            ProjectionMix::Blend { to, .. } => *to,
        }
    }
}

/// Precomputed projection matrices for one dimension
#[derive(Clone, Debug)]
pub struct Projector {
    dimension: usize,
    /// Column k of the 2×n isometric matrix
    isometric: Vec<(f64, f64)>,
    /// For axis j: (row, weight) in the 3×n averaging matrix
    average: Vec<(usize, f64)>,
}

impl Projector {
    /// Build the matrices for dimension `n`
    pub fn new(n: usize) -> Result<Self, EngineError> {
        validate_dimension(n)?;

        let isometric = (0..n)
            .map(|k| {
                let theta = TAU * k as f64 / n as f64;
                (theta.cos(), theta.sin())
            })
            .collect();

        // Rows get n/3 axes each; the first n%3 rows take one extra
        let row_count = |row: usize| n / 3 + usize::from(n % 3 > row);
        let average = (0..n)
            .map(|j| {
                let row = j % 3;
                (row, 1.0 / row_count(row) as f64)
            })
            .collect();

        Ok(Self { dimension: n, isometric, average })
    }

    /// Dimension n
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Project one point under `model`, dividing by `scale`
    ///
    /// `point` is a rotated vertex and `view` the camera offset; both should
    /// have the projector's dimension. Missing trailing axes read as zero.
    pub fn project(
        &self,
        point: &VecN,
        view: &VecN,
        model: ProjectionModel,
        scale: f64,
    ) -> Result<Vec2, EngineError> {
        model.check_dimension(self.dimension)?;

        let raw = match model {
            ProjectionModel::Isometric => {
                let mut out = Vec2::ZERO;
                for (k, &(cx, cy)) in self.isometric.iter().enumerate() {
                    let x = point.get_or_zero(k);
                    out.x += cx * x;
                    out.y += cy * x;
                }
                out
            }
            ProjectionModel::PerspectiveAverage => {
                let mut rows = [0.0f64; 3];
                for (j, &(row, weight)) in self.average.iter().enumerate() {
                    rows[row] += weight * (point.get_or_zero(j) + view.get_or_zero(j));
                }
                perspective_divide(rows[0], rows[1], rows[2])
            }
            ProjectionModel::PerspectiveTrim => {
                let shifted = |axis: usize| point.get_or_zero(axis) + view.get_or_zero(axis);
                perspective_divide(shifted(0), shifted(1), shifted(2))
            }
            ProjectionModel::Orthographic => {
                Vec2::new(point.get_or_zero(0), point.get_or_zero(1))
            }
        };

        Ok(raw * (1.0 / scale))
    }

    /// Project under two models and interpolate the results by `t`
    #[allow(clippy::too_many_arguments)]
    pub fn project_blended(
        &self,
        point: &VecN,
        view: &VecN,
        from: ProjectionModel,
        scale_from: f64,
        to: ProjectionModel,
        scale_to: f64,
        t: f64,
    ) -> Result<Vec2, EngineError> {
        let a = self.project(point, view, from, scale_from)?;
        let b = self.project(point, view, to, scale_to)?;
        Ok(a.lerp(b, t))
    }

    /// Project under a (possibly chained) blend with one shared scale
    ///
    /// The engine animates the scale alongside the model, so every model in
    /// the chain divides by the same interpolated on-screen scale.
    pub fn project_mix(
        &self,
        point: &VecN,
        view: &VecN,
        mix: &ProjectionMix,
        scale: f64,
    ) -> Result<Vec2, EngineError> {
        match mix {
            ProjectionMix::Pure(model) => self.project(point, view, *model, scale),
            ProjectionMix::Blend { from, to, t } => {
                let a = self.project_mix(point, view, from, scale)?;
                let b = self.project(point, view, *to, scale)?;
                Ok(a.lerp(b, *t))
            }
        }
    }
}

/// `(x / depth, y / depth)` with the divisor kept away from zero
fn perspective_divide(x: f64, y: f64, depth: f64) -> Vec2 {
    let depth = if depth.abs() < DEPTH_EPSILON {
        DEPTH_EPSILON.copysign(depth)
    } else {
        depth
    };
    Vec2::new(x / depth, y / depth)
}

/// Pixel dimensions of the target surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Map a projected point (y up) to screen space (y down)
    ///
    /// Multiplies by `min(width, height) / scale` and moves the origin to
    /// the viewport centre.
    pub fn to_screen(&self, point: Vec2, scale: f64) -> Vec2 {
        let s = self.width.min(self.height) / scale;
        Vec2::new(
            s * point.x + self.width / 2.0,
            -s * point.y + self.height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::vertex_coordinate;
    use crate::error::MAX_DIMENSION;

    const EPSILON: f64 = 1e-12;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    fn view(n: usize, depth: f64) -> VecN {
        let mut v = VecN::zeros(n);
        v[DEPTH_AXIS] = depth;
        v
    }

    #[test]
    fn test_orthographic_takes_first_two_axes() {
        let p = Projector::new(5).unwrap();
        let point = VecN::new(vec![0.25, -3.0, 7.0, 1.0, 2.0]);
        let out = p.project(&point, &view(5, 12.0), ProjectionModel::Orthographic, 1.0).unwrap();
        assert_eq!(out, Vec2::new(0.25, -3.0));

        let halved = p.project(&point, &view(5, 12.0), ProjectionModel::Orthographic, 2.0).unwrap();
        assert_eq!(halved, Vec2::new(0.125, -1.5));
    }

    #[test]
    fn test_isometric_zero_is_origin() {
        for n in 1..=9 {
            let p = Projector::new(n).unwrap();
            let out = p.project(&VecN::zeros(n), &VecN::zeros(n), ProjectionModel::Isometric, 1.7).unwrap();
            assert_eq!(out, Vec2::ZERO);
        }
    }

    #[test]
    fn test_isometric_axes_on_unit_circle() {
        let p = Projector::new(4).unwrap();
        let zero = VecN::zeros(4);
        let x = p.project(&VecN::unit(4, 0), &zero, ProjectionModel::Isometric, 1.0).unwrap();
        let y = p.project(&VecN::unit(4, 1), &zero, ProjectionModel::Isometric, 1.0).unwrap();
        let z = p.project(&VecN::unit(4, 2), &zero, ProjectionModel::Isometric, 1.0).unwrap();
        assert!(approx(x, Vec2::new(1.0, 0.0)));
        assert!(approx(y, Vec2::new(0.0, 1.0)));
        assert!(approx(z, Vec2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_isometric_ignores_view() {
        let p = Projector::new(3).unwrap();
        let point = VecN::new(vec![0.3, 0.2, -0.4]);
        let a = p.project(&point, &view(3, 0.0), ProjectionModel::Isometric, 1.0).unwrap();
        let b = p.project(&point, &view(3, 50.0), ProjectionModel::Isometric, 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_average_matrix_rows() {
        // n = 7: rows hold axes {0,3,6}, {1,4}, {2,5}
        let p = Projector::new(7).unwrap();
        let weight = |row: usize, j: usize| match p.average[j] {
            (r, w) if r == row => w,
            _ => 0.0,
        };
        assert!((weight(0, 0) - 1.0 / 3.0).abs() < EPSILON);
        assert!((weight(0, 6) - 1.0 / 3.0).abs() < EPSILON);
        assert_eq!(weight(1, 4), 0.5);
        assert_eq!(weight(2, 5), 0.5);
        assert_eq!(weight(1, 0), 0.0);

        for row in 0..3 {
            let total: f64 = (0..7).map(|j| weight(row, j)).sum();
            assert!((total - 1.0).abs() < EPSILON, "row {} sums to {}", row, total);
        }
    }

    #[test]
    fn test_perspective_trim_adds_view() {
        let p = Projector::new(4).unwrap();
        let point = VecN::new(vec![2.0, -1.0, 1.0, 9.0]);
        let out = p.project(&point, &view(4, 3.0), ProjectionModel::PerspectiveTrim, 1.0).unwrap();
        // depth = 1 + 3
        assert!(approx(out, Vec2::new(0.5, -0.25)));
    }

    #[test]
    fn test_perspective_average_in_three_dimensions_matches_trim() {
        // With n = 3 each group holds exactly one axis
        let p = Projector::new(3).unwrap();
        let point = VecN::new(vec![0.4, -0.8, 0.2]);
        let v = view(3, default_view_depth(3));
        let avg = p.project(&point, &v, ProjectionModel::PerspectiveAverage, 0.5).unwrap();
        let trim = p.project(&point, &v, ProjectionModel::PerspectiveTrim, 0.5).unwrap();
        assert!(approx(avg, trim));
    }

    #[test]
    fn test_perspective_average_groups_axes() {
        let p = Projector::new(6).unwrap();
        let point = VecN::new(vec![1.0, 2.0, 0.0, 3.0, 4.0, 2.0]);
        let out = p.project(&point, &view(6, 4.0), ProjectionModel::PerspectiveAverage, 1.0).unwrap();
        // rows: (1+3)/2 = 2, (2+4)/2 = 3, (0+4+2)/2 = 3
        assert!(approx(out, Vec2::new(2.0 / 3.0, 1.0)));
    }

    #[test]
    fn test_perspective_divide_guarded() {
        let p = Projector::new(3).unwrap();
        let point = VecN::new(vec![1.0, 1.0, 0.0]);
        let out = p.project(&point, &VecN::zeros(3), ProjectionModel::PerspectiveTrim, 1.0).unwrap();
        assert!(out.x.is_finite() && out.y.is_finite());
    }

    #[test]
    fn test_models_reject_low_dimensions() {
        let p = Projector::new(2).unwrap();
        let point = VecN::new(vec![1.0, 1.0]);
        let zero = VecN::zeros(2);
        assert!(p.project(&point, &zero, ProjectionModel::Orthographic, 1.0).is_ok());
        assert!(p.project(&point, &zero, ProjectionModel::Isometric, 1.0).is_ok());
        let err = p.project(&point, &zero, ProjectionModel::PerspectiveTrim, 1.0).unwrap_err();
        assert_eq!(
            err,
            EngineError::dimension(2, DimensionReason::BelowProjectionMinimum(3))
        );
        assert!(p.project(&point, &zero, ProjectionModel::PerspectiveAverage, 1.0).is_err());

        let p1 = Projector::new(1).unwrap();
        let one = VecN::new(vec![1.0]);
        assert!(p1.project(&one, &VecN::zeros(1), ProjectionModel::Orthographic, 1.0).is_err());
        assert!(p1.project(&one, &VecN::zeros(1), ProjectionModel::Isometric, 1.0).is_ok());
    }

    #[test]
    fn test_blend_endpoints() {
        let p = Projector::new(4).unwrap();
        let point = vertex_coordinate(9, 4);
        let v = view(4, default_view_depth(4));
        let iso = p.project(&point, &v, ProjectionModel::Isometric, 2.0).unwrap();
        let ortho = p.project(&point, &v, ProjectionModel::Orthographic, 3.0).unwrap();

        let at = |t| {
            p.project_blended(&point, &v, ProjectionModel::Isometric, 2.0, ProjectionModel::Orthographic, 3.0, t)
                .unwrap()
        };
        assert_eq!(at(0.0), iso);
        assert_eq!(at(1.0), ortho);
        assert!(approx(at(0.5), iso.lerp(ortho, 0.5)));
    }

    #[test]
    fn test_chained_mix() {
        let p = Projector::new(3).unwrap();
        let point = vertex_coordinate(5, 3);
        let v = view(3, default_view_depth(3));
        let iso = p.project(&point, &v, ProjectionModel::Isometric, 1.0).unwrap();
        let ortho = p.project(&point, &v, ProjectionModel::Orthographic, 1.0).unwrap();
        let trim = p.project(&point, &v, ProjectionModel::PerspectiveTrim, 1.0).unwrap();

        let mix = ProjectionMix::Blend {
            from: Box::new(ProjectionMix::Blend {
                from: Box::new(ProjectionMix::Pure(ProjectionModel::Isometric)),
                to: ProjectionModel::Orthographic,
                t: 0.25,
            }),
            to: ProjectionModel::PerspectiveTrim,
            t: 0.5,
        };
        let out = p.project_mix(&point, &v, &mix, 1.0).unwrap();
        assert!(approx(out, iso.lerp(ortho, 0.25).lerp(trim, 0.5)));
        assert_eq!(mix.target(), ProjectionModel::PerspectiveTrim);
        assert_eq!(mix.models().len(), 3);
    }

    #[test]
    fn test_mix_shares_one_scale() {
        let p = Projector::new(4).unwrap();
        let point = vertex_coordinate(6, 4);
        let v = view(4, default_view_depth(4));
        let mix = ProjectionMix::Blend {
            from: Box::new(ProjectionMix::Pure(ProjectionModel::Isometric)),
            to: ProjectionModel::PerspectiveAverage,
            t: 0.4,
        };
        let shared = p.project_mix(&point, &v, &mix, 2.5).unwrap();
        let blended = p
            .project_blended(&point, &v, ProjectionModel::Isometric, 2.5, ProjectionModel::PerspectiveAverage, 2.5, 0.4)
            .unwrap();
        assert!(approx(shared, blended));
    }

    #[test]
    fn test_default_scales() {
        let d = default_view_depth(4);
        assert!((d - (10.0 + 4.0 * SQRT_2)).abs() < EPSILON);
        assert!((ProjectionModel::Orthographic.default_scale(4, d) - 2.0).abs() < EPSILON);
        assert!((ProjectionModel::Isometric.default_scale(4, d) - 2.0 * SQRT_2).abs() < EPSILON);
        assert!(
            (ProjectionModel::PerspectiveTrim.default_scale(4, d) - 8.0 * SQRT_2 / d).abs() < EPSILON
        );
        assert!(default_view_depth(1) > MIN_VIEW_DEPTH);
    }

    #[test]
    fn test_default_view_depth_clears_vertices() {
        for n in 1..=MAX_DIMENSION {
            assert!(default_view_depth(n) > (n as f64).sqrt(), "n = {}", n);
        }
    }

    #[test]
    fn test_viewport_to_screen() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_screen(Vec2::ZERO, 1.0), Vec2::new(400.0, 300.0));
        // y flips, scale uses the shorter side
        assert_eq!(vp.to_screen(Vec2::new(0.5, 0.5), 1.0), Vec2::new(700.0, 0.0));
        assert_eq!(vp.to_screen(Vec2::new(-1.0, 0.0), 2.0), Vec2::new(100.0, 300.0));
    }

    #[test]
    fn test_model_serde_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            model: ProjectionModel,
        }
        let w: Wrapper = toml::from_str("model = \"perspective_average\"").unwrap();
        assert_eq!(w.model, ProjectionModel::PerspectiveAverage);
        assert_eq!(ProjectionModel::PerspectiveTrim.to_string(), "Perspective - Trim");
    }
}
