//! The hypercube engine
//!
//! [`Engine`] owns every piece of mutable state: the topology, the rotation
//! angles, and the animated projection parameters. A host drives it with
//! two calls per frame:
//!
//! 1. [`Engine::update`] applies queued parameter changes, settles finished
//!    transitions, and ticks the rotation.
//! 2. [`Engine::frame`] is a pure read that rotates and projects every
//!    vertex for the current time.
//!
//! A dimension change builds the new topology, rotation planes and
//! projection matrices to the side and swaps them in as one value. A failed
//! build leaves the old geometry untouched, so a frame only ever sees a
//! consistent set.

use std::collections::VecDeque;
use std::time::Duration;

use bitflags::bitflags;
use log::{debug, info, warn};
use ndcube_math::{Vec2, VecN};
use serde::{Serialize, Deserialize};

use crate::error::{validate_dimension, EngineError};
use crate::projection::{
    default_view_depth, ProjectionMix, ProjectionModel, ProjectionSpec, Projector, Viewport,
    DEPTH_AXIS, MIN_VIEW_DEPTH,
};
use crate::rotation::{RotationConfig, RotationEngine, RotationStyle};
use crate::topology::{Edge, Hypercube};
use crate::transition::{TransitionController, DEFAULT_DURATION};

/// Dimension the reference UI starts in
pub const DEFAULT_DIMENSION: usize = 3;

bitflags! {
    /// What an [`Engine::update`] call did
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct UpdateFlags: u8 {
        /// Nothing happened beyond advancing the rotation
        const NONE = 0;
        /// Topology was rebuilt for a new dimension
        const REBUILT = 1 << 0;
        /// A new rotation direction was sampled and angles wrapped
        const DIRECTION_REFRESHED = 1 << 1;
        /// At least one parameter started animating
        const TRANSITION_STARTED = 1 << 2;
        /// At least one parameter settled on its target
        const TRANSITION_FINISHED = 1 << 3;
        /// A queued change was rejected (see the report's `rejected`)
        const CHANGE_REJECTED = 1 << 4;
    }
}

/// A user-driven parameter change
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterChange {
    /// Rebuild for a new dimension
    Dimension(usize),
    /// Blend to a new projection model
    Projection(ProjectionModel),
    /// Change how rotation directions are sampled
    RotationStyle(RotationStyle),
    /// Toggle per-vertex coordinate labels
    DebugOverlay(bool),
}

/// Settings for a new [`Engine`]
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Starting dimension
    pub dimension: usize,
    /// Starting projection model
    pub projection: ProjectionModel,
    /// Rotation drift settings
    pub rotation: RotationConfig,
    /// Length of every parameter transition
    pub transition_duration: Duration,
    /// Start with coordinate labels on
    pub debug_overlay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            projection: ProjectionModel::default(),
            rotation: RotationConfig::default(),
            transition_duration: DEFAULT_DURATION,
            debug_overlay: false,
        }
    }
}

/// Everything whose shape depends on the dimension
struct Geometry {
    cube: Hypercube,
    rotation: RotationEngine,
    projector: Projector,
}

impl Geometry {
    fn new(n: usize, rotation: RotationEngine) -> Result<Self, EngineError> {
        Ok(Self {
            cube: Hypercube::new(n)?,
            projector: Projector::new(n)?,
            rotation,
        })
    }

    fn dimension(&self) -> usize {
        self.cube.dimension()
    }
}

/// Outcome of an [`Engine::update`]
#[derive(Debug, Default)]
pub struct UpdateReport {
    pub flags: UpdateFlags,
    /// Queued changes that could not be applied, with the reason
    pub rejected: Vec<(ParameterChange, EngineError)>,
}

/// One frame of projected output
#[derive(Debug)]
pub struct Frame<'a> {
    /// Dimension of the cube in this frame
    pub dimension: usize,
    /// Projected position of every vertex, indexed by vertex id (y up)
    pub points: Vec<Vec2>,
    /// Vertex pairs to connect
    pub edges: &'a [Edge],
    /// Rotated coordinate of every vertex, formatted, when the debug overlay is on
    pub labels: Option<Vec<String>>,
    /// Projection blend used for this frame
    pub projection: ProjectionMix,
    /// Scale used for this frame
    pub scale: f64,
}

impl Frame<'_> {
    /// Endpoints of every edge
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.edges
            .iter()
            .map(move |e| (self.points[e.high], self.points[e.low]))
    }

    /// Every point mapped to screen space
    ///
    /// The frame's points already include the division by scale, so the
    /// mapping here only applies the viewport size.
    pub fn to_screen(&self, viewport: &Viewport) -> Vec<Vec2> {
        self.points.iter().map(|&p| viewport.to_screen(p, 1.0)).collect()
    }

    /// Projected points as raw bytes, ready for a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.points)
    }
}

/// The hypercube animation engine
pub struct Engine {
    geometry: Geometry,
    transitions: TransitionController,
    pending: VecDeque<ParameterChange>,
    debug_overlay: bool,
}

impl Engine {
    /// Create an engine at engine time `now`
    ///
    /// Fails if the dimension is unbuildable or too small for the
    /// starting projection.
    pub fn new(config: &EngineConfig, now: Duration) -> Result<Self, EngineError> {
        let n = config.dimension;
        validate_dimension(n)?;
        config.projection.check_dimension(n)?;

        let rotation = RotationEngine::new(n, &config.rotation, now)?;
        let geometry = Geometry::new(n, rotation)?;

        let depth = default_view_depth(n);
        let transitions = TransitionController::new(
            ProjectionSpec::framed(config.projection, n, depth),
            depth,
            config.transition_duration,
        );

        info!(
            "Engine ready: {}-cube, {} vertices, {} edges, {} projection",
            n,
            geometry.cube.vertex_count(),
            geometry.cube.edge_count(),
            config.projection
        );

        Ok(Self {
            geometry,
            transitions,
            pending: VecDeque::new(),
            debug_overlay: config.debug_overlay,
        })
    }

    /// Current dimension
    #[inline]
    pub fn dimension(&self) -> usize {
        self.geometry.dimension()
    }

    /// The current cube
    #[inline]
    pub fn topology(&self) -> &Hypercube {
        &self.geometry.cube
    }

    /// The rotation state
    #[inline]
    pub fn rotation(&self) -> &RotationEngine {
        &self.geometry.rotation
    }

    /// The animated projection parameters
    #[inline]
    pub fn transitions(&self) -> &TransitionController {
        &self.transitions
    }

    /// Whether coordinate labels are on
    #[inline]
    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Replace the rotation angles
    pub fn set_angles(&mut self, angles: Vec<f64>) -> Result<(), EngineError> {
        self.geometry.rotation.set_angles(angles)
    }

    /// Queue a change for the next [`update`](Self::update)
    pub fn request(&mut self, change: ParameterChange) {
        debug!("Queued {:?}", change);
        self.pending.push_back(change);
    }

    /// Number of queued changes
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    /// Advance to engine time `now`
    ///
    /// Applies queued changes in order (rejected ones are reported, not
    /// fatal), settles finished transitions, then ticks the rotation.
    pub fn update(&mut self, now: Duration) -> UpdateReport {
        let mut report = UpdateReport::default();

        while let Some(change) = self.pending.pop_front() {
            match self.apply(change, now) {
                Ok(flags) => report.flags |= flags,
                Err(err) => {
                    warn!("Rejected {:?}: {}", change, err);
                    report.flags |= UpdateFlags::CHANGE_REJECTED;
                    report.rejected.push((change, err));
                }
            }
        }

        if self.transitions.update(now) {
            debug!("Transition settled on {}", self.transitions.target_spec().model);
            report.flags |= UpdateFlags::TRANSITION_FINISHED;
        }

        if self.geometry.rotation.tick(now) {
            report.flags |= UpdateFlags::DIRECTION_REFRESHED;
        }

        report
    }

    /// Apply one change immediately at engine time `now`
    pub fn apply(&mut self, change: ParameterChange, now: Duration) -> Result<UpdateFlags, EngineError> {
        match change {
            ParameterChange::Dimension(n) => self.rebuild(n, now),
            ParameterChange::Projection(model) => self.change_projection(model, now),
            ParameterChange::RotationStyle(style) => {
                info!("Rotation style: {:?}", style);
                self.geometry.rotation.set_style(style);
                Ok(UpdateFlags::NONE)
            }
            ParameterChange::DebugOverlay(on) => {
                info!("Debug overlay: {}", if on { "ON" } else { "OFF" });
                self.debug_overlay = on;
                Ok(UpdateFlags::NONE)
            }
        }
    }

    fn rebuild(&mut self, n: usize, now: Duration) -> Result<UpdateFlags, EngineError> {
        if n == self.dimension() {
            return Ok(UpdateFlags::NONE);
        }
        validate_dimension(n)?;
        let model = self.transitions.target_spec().model;
        model.check_dimension(n)?;

        let rotation = self.geometry.rotation.resized(n, now)?;
        let geometry = Geometry::new(n, rotation)?;

        let old = self.dimension();
        self.geometry = geometry;
        let depth = default_view_depth(n);
        self.transitions.snap(ProjectionSpec::framed(model, n, depth), depth);

        info!(
            "Rebuilt {}-cube -> {}-cube ({} vertices, {} rotation planes)",
            old,
            n,
            self.geometry.cube.vertex_count(),
            self.geometry.rotation.ncr()
        );
        Ok(UpdateFlags::REBUILT)
    }

    fn change_projection(&mut self, model: ProjectionModel, now: Duration) -> Result<UpdateFlags, EngineError> {
        let n = self.dimension();
        model.check_dimension(n)?;

        let current = self.transitions.target_spec().model;
        if model == current && !self.transitions.is_active() {
            return Ok(UpdateFlags::NONE);
        }

        info!("Changing projection {} -> {}", current, model);
        let depth = default_view_depth(n);
        self.transitions.retarget_projection(now, model);
        self.transitions.retarget_scale(now, model.default_scale(n, depth));
        if self.transitions.target_view_depth() != depth {
            self.transitions.retarget_view_depth(now, depth);
        }
        Ok(UpdateFlags::TRANSITION_STARTED)
    }

    /// The view position at `now`: zero except the depth axis
    ///
    /// The depth never drops below [`MIN_VIEW_DEPTH`].
    pub fn view_position(&self, now: Duration) -> VecN {
        let mut view = VecN::zeros(self.dimension());
        if DEPTH_AXIS < view.dim() {
            view[DEPTH_AXIS] = self.transitions.view_depth(now).max(MIN_VIEW_DEPTH);
        }
        view
    }

    /// Rotate and project every vertex for engine time `now`
    ///
    /// Does not mutate.
    pub fn frame(&self, now: Duration) -> Result<Frame<'_>, EngineError> {
        let geometry = &self.geometry;
        let rotated = geometry.rotation.apply(geometry.cube.vertices())?;
        let view = self.view_position(now);
        let scale = self.transitions.scale(now);
        let projection = self.transitions.projection_mix(now);

        let points = rotated
            .iter()
            .map(|p| geometry.projector.project_mix(p, &view, &projection, scale))
            .collect::<Result<Vec<_>, _>>()?;

        let labels = self
            .debug_overlay
            .then(|| rotated.iter().map(|p| p.to_string()).collect());

        Ok(Frame {
            dimension: geometry.dimension(),
            points,
            edges: geometry.cube.edges(),
            labels,
            projection,
            scale,
        })
    }
}
