use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use green_area::{
    config::ConfigLoader,
    engine::EngineBuilder,
    realtime::{self, RealtimeConfig},
    snapshot::SnapshotWriter,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Green Area farming simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/loreto.yaml")]
    scenario: PathBuf,

    /// Number of frames to simulate (headless default: one in-game day)
    #[arg(long)]
    frames: Option<u64>,

    /// Length of one frame in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for periodic snapshots (uses scenario setting when omitted)
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Write the final state as JSON to this file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Drive the clock from the wall clock instead of synthetic frames
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ConfigLoader::new(".");
    let mut config = loader.load(&cli.scenario)?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        scenario = %config.name,
        seed = ?config.seed,
        field_size = config.field.size,
        "configuration loaded"
    );

    let state = config.build_state()?;
    let snapshots = match &cli.snapshot_dir {
        Some(dir) => SnapshotWriter::new(dir, config.snapshot.interval_ticks.max(1)),
        None => config.snapshot_writer(),
    };
    let engine = EngineBuilder::new(state).with_snapshots(snapshots).build();

    let engine = if cli.realtime {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let realtime_config = RealtimeConfig {
            frame_interval: Duration::from_millis(cli.frame_ms.max(1)),
            max_frames: cli.frames,
        };
        let (engine, _) = runtime.block_on(realtime::run(engine, realtime_config))?;
        engine
    } else {
        let mut engine = engine;
        let frames = cli
            .frames
            .unwrap_or_else(|| frames_per_day(&config.clock.settings(), cli.frame_ms));
        let run = engine.run_frames(frames, cli.frame_ms)?;
        info!(
            frames = run.frames,
            ticks = run.ticks,
            days = run.days_started,
            "headless run finished"
        );
        engine
    };

    let state = engine.state();
    let summary = state.field.summary();
    println!(
        "Scenario '{}' ended on day {} at {} ({}, {}°C). Free plots: {}/{}, avg fertility {}%, avg moisture {}%.",
        state.name,
        state.clock.day(),
        state.clock.reading(),
        state.environment().season,
        state.environment().temperature,
        summary.available,
        summary.total,
        summary.average_fertility,
        summary.average_moisture,
    );

    if let Some(path) = cli.export {
        engine.snapshot().write_to(&path)?;
        info!(path = %path.display(), "final state exported");
    }
    Ok(())
}

/// Frames needed for one full in-game day at the given frame length.
fn frames_per_day(settings: &green_area::clock::ClockSettings, frame_ms: u64) -> u64 {
    let ticks_per_day = u64::from(86_400 / settings.sim_seconds_per_tick.max(1));
    let day_ms = ticks_per_day.saturating_mul(settings.time_speed_ms);
    day_ms.div_ceil(frame_ms.max(1))
}
