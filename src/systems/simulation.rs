//! Simulation system
//!
//! Owns the engine clock and runs one update per frame:
//! - Advance the clock by one fixed frame period
//! - Hand due script entries to the engine
//! - Update the engine

use std::time::Duration;

use ndcube_core::{Engine, UpdateFlags};

use crate::input::Script;

/// Result of a simulation update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    /// Engine clock after this frame
    pub now: Duration,
    /// What the engine did
    pub flags: UpdateFlags,
    /// Number of changes the engine rejected
    pub rejected: usize,
}

/// Fixed-step frame loop around an [`Engine`]
///
/// The engine clock advances by exactly one frame period per update, so a
/// run is reproducible regardless of how long each frame takes to draw.
pub struct SimulationSystem {
    now: Duration,
    frame_period: Duration,
    frames: u64,
}

impl SimulationSystem {
    /// Create a simulation ticking at `fps` frames per second
    pub fn new(fps: u32) -> Self {
        Self {
            now: Duration::ZERO,
            frame_period: Duration::from_secs(1) / fps.max(1),
            frames: 0,
        }
    }

    /// Current engine clock
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Length of one frame
    #[inline]
    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// Frames run so far
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one simulation frame
    pub fn update(&mut self, engine: &mut Engine, script: &mut Script) -> SimulationResult {
        self.now += self.frame_period;
        self.frames += 1;

        for change in script.due(self.now) {
            engine.request(change);
        }

        let report = engine.update(self.now);
        if report.flags.contains(UpdateFlags::REBUILT) {
            log::info!("Frame {}: now drawing a {}-cube", self.frames, engine.dimension());
        }

        SimulationResult {
            now: self.now,
            flags: report.flags,
            rejected: report.rejected.len(),
        }
    }
}

impl Default for SimulationSystem {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptEntry;
    use ndcube_core::{EngineConfig, ParameterChange, RotationConfig};

    fn engine() -> Engine {
        let config = EngineConfig {
            rotation: RotationConfig { seed: Some(1), ..RotationConfig::default() },
            ..EngineConfig::default()
        };
        Engine::new(&config, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_clock_advances_by_frame_period() {
        let mut sim = SimulationSystem::new(50);
        let mut engine = engine();
        let mut script = Script::default();
        for _ in 0..50 {
            sim.update(&mut engine, &mut script);
        }
        assert_eq!(sim.frames(), 50);
        assert_eq!(sim.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_script_changes_reach_engine() {
        let mut sim = SimulationSystem::new(10);
        let mut engine = engine();
        let mut script = Script::new(vec![
            ScriptEntry::new(0.25, ParameterChange::Dimension(4)),
            ScriptEntry::new(0.25, ParameterChange::Dimension(0)),
        ]);

        let first = sim.update(&mut engine, &mut script);
        assert_eq!(engine.dimension(), 3);
        assert_eq!(first.rejected, 0);

        sim.update(&mut engine, &mut script);
        let third = sim.update(&mut engine, &mut script);
        assert!(third.flags.contains(UpdateFlags::REBUILT));
        assert_eq!(third.rejected, 1);
        assert_eq!(engine.dimension(), 4);
        assert!(script.is_finished());
    }

    #[test]
    fn test_default_construction() {
        let sim = SimulationSystem::default();
        assert_eq!(sim.now(), Duration::ZERO);
        assert_eq!(sim.frame_period(), Duration::from_secs(1) / 60);
    }
}
