// Per-Rollout JSONL Recorder
// Outputs one JSON line per rollout for independent analysis

use portfolio_engine::{ProjectState, StateTally};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct RolloutSnapshot {
    pub rollout: u32,
    pub idea: u32,
    pub proposal: u32,
    pub approved: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub absorbed: bool,
}

impl RolloutSnapshot {
    pub fn from_tally(rollout: u32, tally: &StateTally) -> Self {
        Self {
            rollout,
            idea: tally.count(ProjectState::Idea),
            proposal: tally.count(ProjectState::Proposal),
            approved: tally.count(ProjectState::Approved),
            in_progress: tally.count(ProjectState::InProgress),
            completed: tally.count(ProjectState::Completed),
            cancelled: tally.count(ProjectState::Cancelled),
            absorbed: tally.unresolved() == 0,
        }
    }
}

/// Recorder that accumulates per-rollout snapshots and writes JSONL
pub struct RolloutRecorder {
    snapshots: Vec<RolloutSnapshot>,
}

impl RolloutRecorder {
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }

    pub fn record(&mut self, tally: &StateTally) {
        let rollout = self.snapshots.len() as u32;
        self.snapshots.push(RolloutSnapshot::from_tally(rollout, tally));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
