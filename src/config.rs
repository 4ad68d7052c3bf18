use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::clock::{ClockError, ClockSettings, WorldClock};
use crate::environment::Location;
use crate::field::{FieldError, FieldGrid, ReplantPolicy, DEFAULT_FIELD_SIZE, DEFAULT_SQUARE_SIZE};
use crate::player::{PlayerProfile, Resources};
use crate::rng::SeedSource;
use crate::snapshot::SnapshotWriter;
use crate::state::GameState;

const MAX_FIELD_SIZE: u32 = 256;
const SECONDS_PER_DAY: u32 = 86_400;

fn default_field_size() -> u32 {
    DEFAULT_FIELD_SIZE
}

fn default_square_size() -> f32 {
    DEFAULT_SQUARE_SIZE
}

fn default_time_speed_secs() -> f64 {
    2.0
}

fn default_sim_seconds_per_tick() -> u32 {
    60
}

fn default_max_ticks_per_advance() -> u32 {
    60
}

fn default_start_day() -> u32 {
    1
}

fn default_start_hours() -> u32 {
    6
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("snapshots")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Fixed seed for reproducible plots; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub player: PlayerProfile,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default = "default_field_size")]
    pub size: u32,
    #[serde(default = "default_square_size")]
    pub square_size: f32,
    #[serde(default)]
    pub replant: ReplantPolicy,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            size: default_field_size(),
            square_size: default_square_size(),
            replant: ReplantPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Real seconds between simulated ticks.
    #[serde(default = "default_time_speed_secs")]
    pub time_speed_secs: f64,
    #[serde(default = "default_sim_seconds_per_tick")]
    pub sim_seconds_per_tick: u32,
    #[serde(default = "default_max_ticks_per_advance")]
    pub max_ticks_per_advance: u32,
    #[serde(default)]
    pub start: StartTime,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            time_speed_secs: default_time_speed_secs(),
            sim_seconds_per_tick: default_sim_seconds_per_tick(),
            max_ticks_per_advance: default_max_ticks_per_advance(),
            start: StartTime::default(),
        }
    }
}

impl ClockConfig {
    pub fn settings(&self) -> ClockSettings {
        ClockSettings {
            time_speed_ms: (self.time_speed_secs * 1_000.0).round() as u64,
            sim_seconds_per_tick: self.sim_seconds_per_tick,
            max_ticks_per_advance: self.max_ticks_per_advance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTime {
    #[serde(default = "default_start_day")]
    pub day: u32,
    #[serde(default = "default_start_hours")]
    pub hours: u32,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl Default for StartTime {
    fn default() -> Self {
        Self {
            day: default_start_day(),
            hours: default_start_hours(),
            minutes: 0,
            seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Clock ticks between snapshots; 0 disables them.
    #[serde(default)]
    pub interval_ticks: u64,
    #[serde(default = "default_snapshot_dir")]
    pub output_dir: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            interval_ticks: 0,
            output_dir: default_snapshot_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("scenario must define a name")]
    MissingName,
    #[error("field size must be between 1 and 256, got {0}")]
    FieldSize(u32),
    #[error("square size must be positive, got {0}")]
    SquareSize(f32),
    #[error("time speed must be positive, got {0}")]
    TimeSpeed(f64),
    #[error("simulated seconds per tick must be between 1 and 86400, got {0}")]
    TickLength(u32),
    #[error("at least one tick per advance must be allowed")]
    TickCap,
    #[error("invalid start time: {0}")]
    StartTime(#[from] ClockError),
    #[error("location humidity must be within 0..=100, got {0}")]
    Humidity(f64),
    #[error(transparent)]
    Field(#[from] FieldError),
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::MissingName);
        }
        if !(1..=MAX_FIELD_SIZE).contains(&self.field.size) {
            return Err(ConfigError::FieldSize(self.field.size));
        }
        if !(self.field.square_size > 0.0) {
            return Err(ConfigError::SquareSize(self.field.square_size));
        }
        if !(self.clock.time_speed_secs > 0.0) || self.clock.settings().time_speed_ms == 0 {
            return Err(ConfigError::TimeSpeed(self.clock.time_speed_secs));
        }
        if !(1..=SECONDS_PER_DAY).contains(&self.clock.sim_seconds_per_tick) {
            return Err(ConfigError::TickLength(self.clock.sim_seconds_per_tick));
        }
        if self.clock.max_ticks_per_advance == 0 {
            return Err(ConfigError::TickCap);
        }
        if !(0.0..=100.0).contains(&self.location.humidity) {
            return Err(ConfigError::Humidity(self.location.humidity));
        }
        self.start_clock()?;
        Ok(())
    }

    pub fn start_clock(&self) -> Result<WorldClock, ClockError> {
        let start = &self.clock.start;
        WorldClock::starting_at(
            self.clock.settings(),
            start.day,
            start.hours,
            start.minutes,
            start.seconds,
        )
    }

    pub fn build_state(&self) -> Result<GameState, ConfigError> {
        let seeds = SeedSource::from_seed_option(self.seed);
        if self.seed.is_none() {
            info!(seed = seeds.seed(), "field seeded from entropy");
        }
        self.build_state_with(&seeds)
    }

    pub fn build_state_with(&self, seeds: &SeedSource) -> Result<GameState, ConfigError> {
        self.validate()?;
        let field = FieldGrid::seeded(
            self.field.size,
            self.field.square_size,
            self.field.replant,
            seeds,
        )?;
        let clock = self.start_clock()?;
        Ok(GameState::new(&self.name, field, clock, self.location.clone())
            .with_player(self.player.clone())
            .with_resources(self.resources))
    }

    pub fn snapshot_writer(&self) -> SnapshotWriter {
        SnapshotWriter::new(&self.snapshot.output_dir, self.snapshot.interval_ticks)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "green_area".to_string(),
            description: None,
            seed: None,
            field: FieldConfig::default(),
            clock: ClockConfig::default(),
            location: Location::default(),
            player: PlayerProfile::default(),
            resources: Resources::default(),
            snapshot: SnapshotConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<GameConfig> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let config = GameConfig::from_yaml_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: GameConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
