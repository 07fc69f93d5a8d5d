//! Application systems
//!
//! The frame loop is split into a simulation step and a render step so each
//! can be tested without the other.

mod render;
mod simulation;

pub use render::{RenderError, RenderSystem, TextCanvas, describe_projection, fit_canvas};
pub use simulation::{SimulationResult, SimulationSystem};
