//! Wall-clock driver: feeds measured frame times into the engine until
//! Ctrl+C, forwarding every event over a channel.

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::engine::{Engine, RunSummary};
use crate::events::GameEvent;

pub struct RealtimeConfig {
    pub frame_interval: Duration,
    /// Stop after this many frames; run until interrupted when `None`.
    pub max_frames: Option<u64>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(16),
            max_frames: None,
        }
    }
}

pub async fn run(mut engine: Engine, config: RealtimeConfig) -> Result<(Engine, RunSummary)> {
    let (tx, rx) = mpsc::unbounded_channel::<GameEvent>();
    let caller_sinks = engine.sink_count();
    engine.add_sink(tx);
    let consumer = tokio::spawn(log_events(rx));

    let mut interval = tokio::time::interval(config.frame_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();
    let mut run = RunSummary::default();

    info!(
        scenario = %engine.state().name,
        frame_ms = config.frame_interval.as_millis() as u64,
        "realtime loop started (Ctrl+C to stop)"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        if config.max_frames.is_some_and(|max| run.frames >= max) {
            break;
        }
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                let now = Instant::now();
                let elapsed_ms = now.duration_since(last).as_millis() as u64;
                last = now;
                let summary = engine.frame(elapsed_ms)?;
                run.frames += 1;
                run.ticks += u64::from(summary.ticks);
                if summary.new_day {
                    run.days_started += 1;
                }
            }
        }
    }

    // Dropping the sender closes the channel once the queue is drained.
    engine.truncate_sinks(caller_sinks);
    consumer.await?;
    info!(frames = run.frames, ticks = run.ticks, "realtime loop stopped");
    Ok((engine, run))
}

async fn log_events(mut rx: mpsc::UnboundedReceiver<GameEvent>) {
    while let Some(event) = rx.recv().await {
        match &event {
            GameEvent::TimeChanged(reading) => debug!(time = %reading, day = reading.day, "time"),
            GameEvent::EnvironmentChanged {
                temperature,
                season,
            } => debug!(temperature, season = %season, "environment"),
            GameEvent::DayStarted { day, season } => info!(day, season = %season, "day started"),
            GameEvent::SquareSelected(plot) => {
                debug!(x = plot.position.x, z = plot.position.z, "square selected")
            }
            GameEvent::PlotCultivated(plot) => debug!(
                x = plot.position.x,
                z = plot.position.z,
                plant = plot.plant.as_deref().unwrap_or_default(),
                "plot cultivated"
            ),
            GameEvent::PlayerUpdated(profile) => {
                debug!(name = %profile.name, country = %profile.country, "player updated")
            }
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down realtime loop");
}
