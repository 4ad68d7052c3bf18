//! Simulated in-game time.
//!
//! The clock runs much faster than real time: every `time_speed` of real
//! time yields one tick of `sim_seconds_per_tick` simulated seconds, so a
//! whole in-game day fits into a short play session.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::environment::Season;

pub const SECONDS_PER_MINUTE: u32 = 60;
pub const MINUTES_PER_HOUR: u32 = 60;
pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("day must be at least 1, got {0}")]
    InvalidDay(u32),
    #[error("hour must be below 24, got {0}")]
    InvalidHour(u32),
    #[error("minute must be below 60, got {0}")]
    InvalidMinute(u32),
    #[error("second must be below 60, got {0}")]
    InvalidSecond(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSettings {
    /// Real milliseconds per simulated tick.
    pub time_speed_ms: u64,
    pub sim_seconds_per_tick: u32,
    /// Upper bound on ticks produced by a single `advance`, so a long stall
    /// (suspended tab, debugger) does not fast-forward whole days.
    pub max_ticks_per_advance: u32,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            time_speed_ms: 2_000,
            sim_seconds_per_tick: 60,
            max_ticks_per_advance: 60,
        }
    }
}

/// Read-only copy of the clock handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockReading {
    pub day: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub season: Season,
}

impl ClockReading {
    pub fn as_24h(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for ClockReading {
    /// 12-hour wall clock, e.g. `06:00:00 AM`; midnight and noon show `12`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let period = if self.hours >= 12 { "PM" } else { "AM" };
        let display_hours = match self.hours % 12 {
            0 => 12,
            h => h,
        };
        write!(
            f,
            "{:02}:{:02}:{:02} {}",
            display_hours, self.minutes, self.seconds, period
        )
    }
}

/// What changed during a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rollover {
    pub new_day: bool,
    pub new_season: bool,
}

#[derive(Debug, Clone)]
pub struct WorldClock {
    seconds: u32,
    minutes: u32,
    hours: u32,
    day: u32,
    season: Season,
    accumulated_ms: u64,
    settings: ClockSettings,
    ticks: u64,
}

impl WorldClock {
    /// Day 1 at 06:00:00.
    pub fn new(settings: ClockSettings) -> Self {
        Self {
            seconds: 0,
            minutes: 0,
            hours: 6,
            day: 1,
            season: Season::for_day(1),
            accumulated_ms: 0,
            settings,
            ticks: 0,
        }
    }

    pub fn starting_at(
        settings: ClockSettings,
        day: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Result<Self, ClockError> {
        if day == 0 {
            return Err(ClockError::InvalidDay(day));
        }
        if hours >= HOURS_PER_DAY {
            return Err(ClockError::InvalidHour(hours));
        }
        if minutes >= MINUTES_PER_HOUR {
            return Err(ClockError::InvalidMinute(minutes));
        }
        if seconds >= SECONDS_PER_MINUTE {
            return Err(ClockError::InvalidSecond(seconds));
        }
        Ok(Self {
            seconds,
            minutes,
            hours,
            day,
            season: Season::for_day(day),
            accumulated_ms: 0,
            settings,
            ticks: 0,
        })
    }

    /// Feeds real elapsed time into the clock. Returns `true` when at least
    /// one simulated tick happened, so callers can skip refreshing displays
    /// on frames where nothing moved.
    pub fn advance(&mut self, elapsed_real_ms: u64) -> bool {
        self.advance_counting(elapsed_real_ms).ticks > 0
    }

    /// Like [`advance`](Self::advance) but reports how many ticks ran and
    /// whether any of them crossed a day or season boundary.
    pub fn advance_counting(&mut self, elapsed_real_ms: u64) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        if self.settings.time_speed_ms == 0 {
            return report;
        }

        self.accumulated_ms = self.accumulated_ms.saturating_add(elapsed_real_ms);
        while self.accumulated_ms >= self.settings.time_speed_ms {
            if report.ticks >= self.settings.max_ticks_per_advance {
                // Drop the backlog instead of replaying it.
                self.accumulated_ms %= self.settings.time_speed_ms;
                break;
            }
            self.accumulated_ms -= self.settings.time_speed_ms;
            let rollover = self.tick();
            report.ticks += 1;
            report.new_day |= rollover.new_day;
            report.new_season |= rollover.new_season;
        }
        report
    }

    /// One simulated tick with 60/60/24 carry.
    pub fn tick(&mut self) -> Rollover {
        self.ticks += 1;
        let total_seconds = self.seconds + self.settings.sim_seconds_per_tick;
        self.seconds = total_seconds % SECONDS_PER_MINUTE;

        let total_minutes = self.minutes + total_seconds / SECONDS_PER_MINUTE;
        self.minutes = total_minutes % MINUTES_PER_HOUR;

        let total_hours = self.hours + total_minutes / MINUTES_PER_HOUR;
        self.hours = total_hours % HOURS_PER_DAY;

        let elapsed_days = total_hours / HOURS_PER_DAY;
        if elapsed_days == 0 {
            return Rollover::default();
        }

        self.day += elapsed_days;
        let previous = self.season;
        self.season = Season::for_day(self.day);
        Rollover {
            new_day: true,
            new_season: previous != self.season,
        }
    }

    pub fn reading(&self) -> ClockReading {
        ClockReading {
            day: self.day,
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            season: self.season,
        }
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    /// Ticks since the clock was created.
    pub fn total_ticks(&self) -> u64 {
        self.ticks
    }

    pub fn settings(&self) -> &ClockSettings {
        &self.settings
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(ClockSettings::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub ticks: u32,
    pub new_day: bool,
    pub new_season: bool,
}
