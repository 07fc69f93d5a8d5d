//! Core engine for rotating and projecting N-dimensional hypercubes
//!
//! This crate provides everything between "pick a dimension" and "here are
//! 2D points to draw":
//!
//! - [`Hypercube`] - Vertex and edge structure of the n-cube
//! - [`RotationEngine`] - Angle vector over the C(n, 2) rotation planes, drifting over time
//! - [`Projector`] - The four projection models onto the plane
//! - [`TransitionController`] - Timed blends of scale, view depth and projection
//! - [`Engine`] - Owns all of the above and produces a [`Frame`] per draw
//! - [`EngineError`] - Dimension and rotation parameter failures

mod error;
mod topology;
mod rotation;
mod projection;
mod transition;
mod engine;

pub use error::{EngineError, DimensionReason, MAX_DIMENSION, validate_dimension};
pub use topology::{Edge, Hypercube, vertex_coordinate};
pub use rotation::{
    RotationConfig, RotationEngine, RotationGenerators, RotationPlane, RotationStyle,
    sample_axis, sample_unit, wrap_angle, DEFAULT_REFRESH_PERIOD, DEFAULT_STEP,
};
pub use projection::{
    ProjectionMix, ProjectionModel, ProjectionSpec, Projector, Viewport,
    default_view_depth, DEPTH_AXIS, DEPTH_EPSILON, MIN_VIEW_DEPTH,
};
pub use transition::{
    AnimatedValue, Parameter, ProjectionTransition, Transition, TransitionController,
    DEFAULT_DURATION,
};
pub use engine::{
    Engine, EngineConfig, Frame, ParameterChange, UpdateFlags, UpdateReport,
    DEFAULT_DIMENSION,
};

// Re-export the math types that appear in this crate's API
pub use ndcube_math::{MatN, Vec2, VecN};
