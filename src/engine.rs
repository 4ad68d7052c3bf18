use anyhow::Result;
use tracing::{debug, info};

use crate::clock::AdvanceReport;
use crate::environment::EnvironmentState;
use crate::events::{EventSink, GameEvent};
use crate::field::{FieldError, Plot};
use crate::player::{ProfileError, ProfileUpdate};
use crate::snapshot::{GameSnapshot, SnapshotWriter};
use crate::state::GameState;

/// Result of one display frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub frame: u64,
    pub ticks: u32,
    pub new_day: bool,
    pub environment: Option<EnvironmentState>,
}

impl FrameSummary {
    pub fn ticked(&self) -> bool {
        self.ticks > 0
    }
}

pub struct EngineBuilder {
    state: GameState,
    sinks: Vec<Box<dyn EventSink>>,
    snapshot_writer: SnapshotWriter,
}

impl EngineBuilder {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            sinks: Vec::new(),
            snapshot_writer: SnapshotWriter::disabled(),
        }
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn with_snapshots(mut self, writer: SnapshotWriter) -> Self {
        self.snapshot_writer = writer;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            state: self.state,
            sinks: self.sinks,
            snapshot_writer: self.snapshot_writer,
            frame: 0,
        }
    }
}

/// Per-frame driver. Owns the game state; the presentation layer reads it
/// through [`Engine::state`] and writes only through `select`, `cultivate`
/// and `update_player`.
pub struct Engine {
    state: GameState,
    sinks: Vec<Box<dyn EventSink>>,
    snapshot_writer: SnapshotWriter,
    frame: u64,
}

impl Engine {
    pub fn new(state: GameState) -> Self {
        EngineBuilder::new(state).build()
    }

    pub fn add_sink(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Drops every sink registered after the first `len`.
    pub fn truncate_sinks(&mut self, len: usize) {
        self.sinks.truncate(len);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    pub fn frame(&mut self, elapsed_ms: u64) -> Result<FrameSummary> {
        self.frame += 1;
        let previous_season = self.state.clock.season();
        let AdvanceReport { ticks, new_day, .. } = self.state.clock.advance_counting(elapsed_ms);

        let mut summary = FrameSummary {
            frame: self.frame,
            ticks,
            new_day,
            environment: None,
        };
        if ticks == 0 {
            return Ok(summary);
        }

        let reading = self.state.clock.reading();
        if new_day {
            info!(day = reading.day, season = %reading.season, "new day");
            if reading.season != previous_season {
                info!(from = %previous_season, to = %reading.season, "season changed");
            }
            self.emit(GameEvent::DayStarted {
                day: reading.day,
                season: reading.season,
            });
        }

        let environment = self.state.refresh_environment();
        debug!(
            time = %reading,
            ticks,
            temperature = environment.temperature,
            "clock ticked"
        );
        self.emit(GameEvent::TimeChanged(reading));
        self.emit(GameEvent::EnvironmentChanged {
            temperature: environment.temperature,
            season: environment.season,
        });
        summary.environment = Some(environment);

        self.snapshot_writer.maybe_write(&self.state, self.frame)?;
        Ok(summary)
    }

    pub fn select(&mut self, x: i64, z: i64) -> Result<(), FieldError> {
        match self.state.field.select(x, z).cloned() {
            Ok(plot) => {
                debug!(x, z, "plot selected");
                self.emit(GameEvent::SquareSelected(plot));
                Ok(())
            }
            Err(err) => {
                debug!(%err, "selection ignored");
                Err(err)
            }
        }
    }

    pub fn cultivate(&mut self, x: i64, z: i64, plant: &str) -> Result<(), FieldError> {
        match self.state.field.cultivate(x, z, plant).cloned() {
            Ok(plot) => {
                debug!(x, z, plant, "plot cultivated");
                self.emit(GameEvent::PlotCultivated(plot));
                Ok(())
            }
            Err(err) => {
                debug!(%err, "cultivation rejected");
                Err(err)
            }
        }
    }

    pub fn selected_plot(&self) -> Option<&Plot> {
        self.state.field.selected()
    }

    pub fn update_player(&mut self, update: ProfileUpdate) -> Result<(), ProfileError> {
        self.state.player.apply(update)?;
        debug!(name = %self.state.player.name, "player profile updated");
        let profile = self.state.player.clone();
        self.emit(GameEvent::PlayerUpdated(profile));
        Ok(())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state, self.frame)
    }

    /// Runs `frames` synthetic frames of `frame_ms` each.
    pub fn run_frames(&mut self, frames: u64, frame_ms: u64) -> Result<RunSummary> {
        self.run_with_hook(frames, frame_ms, |_| {})
    }

    /// Like [`run_frames`](Self::run_frames), calling `hook` with a snapshot
    /// after every frame in which the clock ticked.
    pub fn run_with_hook<F>(
        &mut self,
        frames: u64,
        frame_ms: u64,
        mut hook: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(GameSnapshot),
    {
        let mut run = RunSummary::default();
        for _ in 0..frames {
            let summary = self.frame(frame_ms)?;
            run.frames += 1;
            run.ticks += u64::from(summary.ticks);
            if summary.new_day {
                run.days_started += 1;
            }
            if summary.ticked() {
                hook(self.snapshot());
            }
        }
        Ok(run)
    }

    fn emit(&mut self, event: GameEvent) {
        for sink in &mut self.sinks {
            sink.notify(&event);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub ticks: u64,
    pub days_started: u64,
}
