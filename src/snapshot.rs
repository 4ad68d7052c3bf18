use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::clock::ClockReading;
use crate::environment::{EnvironmentState, Location};
use crate::field::{FieldSummary, Plot};
use crate::player::{PlayerProfile, Resources};
use crate::state::GameState;

#[derive(Debug, Serialize)]
pub struct GameSnapshot {
    pub scenario: String,
    pub taken_at: DateTime<Utc>,
    pub frame: u64,
    pub tick: u64,
    pub clock: ClockReading,
    pub time_display: String,
    pub environment: EnvironmentState,
    pub location: Location,
    pub field: FieldSummary,
    pub plots: Vec<Plot>,
    pub player: PlayerProfile,
    pub resources: Resources,
}

impl GameSnapshot {
    pub fn capture(state: &GameState, frame: u64) -> Self {
        let clock = state.clock.reading();
        Self {
            scenario: state.name.clone(),
            taken_at: Utc::now(),
            frame,
            tick: state.clock.total_ticks(),
            clock,
            time_display: clock.to_string(),
            environment: *state.environment(),
            location: state.location.clone(),
            field: state.field.summary(),
            plots: state.field.plots().cloned().collect(),
            player: state.player.clone(),
            resources: state.resources,
        }
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Writes `<dir>/<scenario>/tick_NNNNNN.json` whenever the clock crosses a
/// multiple of `interval_ticks`. An interval of 0 disables it.
pub struct SnapshotWriter {
    dir: PathBuf,
    interval_ticks: u64,
    last_bucket: u64,
}

impl SnapshotWriter {
    pub fn new(dir: impl AsRef<Path>, interval_ticks: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_ticks,
            last_bucket: 0,
        }
    }

    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), 0)
    }

    pub fn maybe_write(
        &mut self,
        state: &GameState,
        frame: u64,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        if self.interval_ticks == 0 {
            return Ok(None);
        }
        let tick = state.clock.total_ticks();
        let bucket = tick / self.interval_ticks;
        if bucket <= self.last_bucket {
            return Ok(None);
        }

        let path = self
            .dir
            .join(&state.name)
            .join(format!("tick_{tick:06}.json"));
        GameSnapshot::capture(state, frame).write_to(&path)?;
        self.last_bucket = bucket;
        tracing::debug!(path = %path.display(), tick, "snapshot written");
        Ok(Some(path))
    }
}
