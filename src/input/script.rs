//! Scripted parameter changes
//!
//! A script is a list of `{ at_secs, change }` entries from the config file.
//! Each entry fires once, on the first frame whose engine clock reaches
//! `at_secs`, and is handed to the engine as a [`ParameterChange`].

use std::time::Duration;

use ndcube_core::ParameterChange;
use serde::{Serialize, Deserialize};

/// One timed change
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Engine time in seconds at which the change fires
    pub at_secs: f64,
    /// The change to request
    pub change: ParameterChange,
}

impl ScriptEntry {
    pub fn new(at_secs: f64, change: ParameterChange) -> Self {
        Self { at_secs, change }
    }
}

/// A timeline of changes, consumed in time order
#[derive(Debug, Clone, Default)]
pub struct Script {
    entries: Vec<ScriptEntry>,
    cursor: usize,
}

impl Script {
    /// Build a timeline; entries are ordered by time, ties keep file order
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.retain(|e| {
            let ok = e.at_secs.is_finite();
            if !ok {
                log::warn!("Dropping script entry with time {}: {:?}", e.at_secs, e.change);
            }
            ok
        });
        entries.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Self { entries, cursor: 0 }
    }

    /// Changes that became due by `now`, each returned once
    pub fn due(&mut self, now: Duration) -> Vec<ParameterChange> {
        let now = now.as_secs_f64();
        let start = self.cursor;
        while self
            .entries
            .get(self.cursor)
            .is_some_and(|e| e.at_secs <= now)
        {
            self.cursor += 1;
        }
        self.entries[start..self.cursor].iter().map(|e| e.change).collect()
    }

    /// Entries not yet fired
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// True once every entry has fired
    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }
}
