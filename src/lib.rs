//! ndcube - N-dimensional hypercube viewer
//!
//! Headless host around [`ndcube_core::Engine`]: layered configuration, a
//! scripted timeline of parameter changes, and a text renderer.

pub mod config;
pub mod input;
pub mod systems;
