//! Season cycle and the temperature model fed by the world clock.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Days spent in each season before the cycle moves on.
pub const DAYS_PER_SEASON: u32 = 7;

/// Amplitude of the day/night swing around the seasonal base, in °C.
pub const DIURNAL_AMPLITUDE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    /// Cycle order; index 0 is the season of day 1.
    pub const CYCLE: [Season; 4] = [
        Season::Summer,
        Season::Autumn,
        Season::Winter,
        Season::Spring,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn for_day(day: u32) -> Self {
        Self::from_index(season_index(day))
    }

    pub fn base_temperature(self) -> f64 {
        match self {
            Season::Summer => 30.0,
            Season::Autumn => 20.0,
            Season::Winter => 15.0,
            Season::Spring => 25.0,
        }
    }

    /// Name shown to the player.
    pub fn display_name(self) -> &'static str {
        match self {
            Season::Summer => "Verano",
            Season::Autumn => "Otoño",
            Season::Winter => "Invierno",
            Season::Spring => "Primavera",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("unknown season '{0}'")]
    InvalidSeason(String),
}

impl FromStr for Season {
    type Err = EnvironmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "verano" | "summer" => Ok(Season::Summer),
            "otoño" | "otono" | "autumn" | "fall" => Ok(Season::Autumn),
            "invierno" | "winter" => Ok(Season::Winter),
            "primavera" | "spring" => Ok(Season::Spring),
            _ => Err(EnvironmentError::InvalidSeason(value.to_string())),
        }
    }
}

pub fn season_index(day: u32) -> usize {
    ((day / DAYS_PER_SEASON) % 4) as usize
}

/// Air temperature in whole degrees for a season and hour of day.
///
/// Lowest at midnight, at the seasonal base at 06:00 and 18:00, warmest at
/// noon.
pub fn temperature(season: Season, hour: u32) -> i32 {
    let variation = ((f64::from(hour) - 6.0) * PI / 12.0).sin() * DIURNAL_AMPLITUDE;
    (season.base_temperature() + variation).round() as i32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub humidity: f64,
    pub pressure: f64,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            name: "Loreto, Perú".to_string(),
            humidity: 60.0,
            pressure: 1013.0,
        }
    }
}

/// Conditions for the current tick. Derived from the clock, never stored
/// beyond the next recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnvironmentState {
    pub temperature: i32,
    pub season: Season,
    pub humidity: f64,
    pub pressure: f64,
}

impl EnvironmentState {
    pub fn compute(season: Season, hour: u32, location: &Location) -> Self {
        Self {
            temperature: temperature(season, hour),
            season,
            humidity: location.humidity,
            pressure: location.pressure,
        }
    }
}
