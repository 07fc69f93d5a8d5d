//! Input handling module
//!
//! Replays a scripted timeline of parameter changes in place of UI widgets.

mod script;

pub use script::{Script, ScriptEntry};
