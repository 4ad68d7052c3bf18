use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::ClockReading;
use crate::rng::SeedSource;

pub const DEFAULT_FIELD_SIZE: u32 = 8;
pub const DEFAULT_SQUARE_SIZE: f32 = 3.0;

const MOISTURE_RANGE: std::ops::Range<f64> = 30.0..70.0;
const FERTILITY_RANGE: std::ops::Range<f64> = 50.0..100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub z: u32,
}

impl GridPos {
    pub fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot {
    pub position: GridPos,
    pub is_empty: bool,
    pub plant: Option<String>,
    pub moisture: f64,
    pub fertility: f64,
    pub selected: bool,
    pub last_harvest: Option<ClockReading>,
}

impl Plot {
    fn fresh(position: GridPos, rng: &mut impl Rng) -> Self {
        Self {
            position,
            is_empty: true,
            plant: None,
            moisture: rng.gen_range(MOISTURE_RANGE),
            fertility: rng.gen_range(FERTILITY_RANGE),
            selected: false,
            last_harvest: None,
        }
    }
}

/// What `cultivate` does with a plot that already holds a crop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplantPolicy {
    #[default]
    Reject,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field must be at least 1x1")]
    EmptyField,
    #[error("plot ({x}, {z}) is outside the {size}x{size} field")]
    OutOfBounds { x: i64, z: i64, size: u32 },
    #[error("plot ({x}, {z}) already holds {plant}")]
    AlreadyOccupied { x: u32, z: u32, plant: String },
}

/// Aggregate numbers shown on the terrain and progress panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub field_size: u32,
    pub total: usize,
    pub available: usize,
    pub average_fertility: u32,
    pub average_moisture: u32,
    pub progress_percent: u32,
}

/// The square grid of cultivable plots. Fully populated at construction and
/// never resized.
#[derive(Debug, Clone)]
pub struct FieldGrid {
    field_size: u32,
    square_size: f32,
    policy: ReplantPolicy,
    plots: Vec<Plot>,
}

impl FieldGrid {
    /// Draws every plot from one shared generator, in row-major order.
    pub fn new(
        field_size: u32,
        square_size: f32,
        policy: ReplantPolicy,
        rng: &mut impl Rng,
    ) -> Result<Self, FieldError> {
        Self::build(field_size, square_size, policy, |pos| Plot::fresh(pos, &mut *rng))
    }

    /// Gives each plot its own generator from `seeds`, so the soil at a
    /// coordinate is the same for every field size.
    pub fn seeded(
        field_size: u32,
        square_size: f32,
        policy: ReplantPolicy,
        seeds: &SeedSource,
    ) -> Result<Self, FieldError> {
        Self::build(field_size, square_size, policy, |pos| {
            Plot::fresh(pos, &mut seeds.plot_rng(pos))
        })
    }

    fn build(
        field_size: u32,
        square_size: f32,
        policy: ReplantPolicy,
        mut fresh: impl FnMut(GridPos) -> Plot,
    ) -> Result<Self, FieldError> {
        if field_size == 0 {
            return Err(FieldError::EmptyField);
        }
        let side = field_size as usize;
        let mut plots = Vec::with_capacity(side * side);
        for x in 0..field_size {
            for z in 0..field_size {
                plots.push(fresh(GridPos::new(x, z)));
            }
        }
        Ok(Self {
            field_size,
            square_size,
            policy,
            plots,
        })
    }

    pub fn field_size(&self) -> u32 {
        self.field_size
    }

    pub fn square_size(&self) -> f32 {
        self.square_size
    }

    pub fn plots(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }

    pub fn plot(&self, x: i64, z: i64) -> Option<&Plot> {
        self.index(x, z).ok().map(|idx| &self.plots[idx])
    }

    pub fn selected(&self) -> Option<&Plot> {
        self.plots.iter().find(|plot| plot.selected)
    }

    /// Selects one plot and deselects every other. Out-of-range coordinates
    /// leave the grid untouched.
    pub fn select(&mut self, x: i64, z: i64) -> Result<&Plot, FieldError> {
        let idx = self.index(x, z)?;
        self.clear_selection();
        let plot = &mut self.plots[idx];
        plot.selected = true;
        Ok(plot)
    }

    pub fn clear_selection(&mut self) {
        for plot in &mut self.plots {
            plot.selected = false;
        }
    }

    pub fn cultivate(&mut self, x: i64, z: i64, plant: &str) -> Result<&Plot, FieldError> {
        let idx = self.index(x, z)?;
        let policy = self.policy;
        let plot = &mut self.plots[idx];
        if !plot.is_empty && policy == ReplantPolicy::Reject {
            return Err(FieldError::AlreadyOccupied {
                x: plot.position.x,
                z: plot.position.z,
                plant: plot.plant.clone().unwrap_or_default(),
            });
        }
        plot.is_empty = false;
        plot.plant = Some(plant.to_string());
        Ok(plot)
    }

    pub fn average_fertility(&self) -> f64 {
        self.average(|plot| plot.fertility)
    }

    pub fn average_moisture(&self) -> f64 {
        self.average(|plot| plot.moisture)
    }

    pub fn available_count(&self) -> usize {
        self.plots.iter().filter(|plot| plot.is_empty).count()
    }

    pub fn used_count(&self) -> usize {
        self.plots.len() - self.available_count()
    }

    pub fn total_count(&self) -> usize {
        self.plots.len()
    }

    pub fn progress_percent(&self) -> u32 {
        if self.plots.is_empty() {
            return 0;
        }
        (self.used_count() as f64 / self.plots.len() as f64 * 100.0).round() as u32
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            field_size: self.field_size,
            total: self.total_count(),
            available: self.available_count(),
            average_fertility: self.average_fertility().round() as u32,
            average_moisture: self.average_moisture().round() as u32,
            progress_percent: self.progress_percent(),
        }
    }

    /// Scene-space centre of a plot, with the grid centred on the origin.
    pub fn plot_center(&self, pos: GridPos) -> (f32, f32) {
        let half = self.field_size as f32 / 2.0;
        let offset = |v: u32| (v as f32 - half) * self.square_size + self.square_size / 2.0;
        (offset(pos.x), offset(pos.z))
    }

    fn average(&self, value: impl Fn(&Plot) -> f64) -> f64 {
        if self.plots.is_empty() {
            return 0.0;
        }
        self.plots.iter().map(value).sum::<f64>() / self.plots.len() as f64
    }

    fn index(&self, x: i64, z: i64) -> Result<usize, FieldError> {
        let size = i64::from(self.field_size);
        if !(0..size).contains(&x) || !(0..size).contains(&z) {
            return Err(FieldError::OutOfBounds {
                x,
                z,
                size: self.field_size,
            });
        }
        Ok((x * size + z) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grid(policy: ReplantPolicy) -> FieldGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        FieldGrid::new(DEFAULT_FIELD_SIZE, DEFAULT_SQUARE_SIZE, policy, &mut rng).unwrap()
    }

    #[test]
    fn zero_size_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = FieldGrid::new(0, DEFAULT_SQUARE_SIZE, ReplantPolicy::Reject, &mut rng);
        assert_eq!(err.unwrap_err(), FieldError::EmptyField);
        let err = FieldGrid::seeded(0, 1.0, ReplantPolicy::Reject, &SeedSource::new(1));
        assert_eq!(err.unwrap_err(), FieldError::EmptyField);
    }

    #[test]
    fn single_plot_field() {
        let seeds = SeedSource::new(1);
        let grid = FieldGrid::seeded(1, 1.0, ReplantPolicy::Reject, &seeds).unwrap();
        assert_eq!(grid.total_count(), 1);
        assert_eq!(grid.plot_center(GridPos::new(0, 0)), (0.0, 0.0));
    }

    #[test]
    fn plots_are_laid_out_row_major() {
        let grid = grid(ReplantPolicy::Reject);
        assert_eq!(grid.total_count(), 64);
        for (idx, plot) in grid.plots().enumerate() {
            let expected = GridPos::new(idx as u32 / 8, idx as u32 % 8);
            assert_eq!(plot.position, expected);
        }
        assert_eq!(grid.plot(3, 5).map(|p| p.position), Some(GridPos::new(3, 5)));
        assert!(grid.plot(8, 0).is_none());
        assert!(grid.plot(0, -1).is_none());
    }

    #[test]
    fn fresh_plots_within_ranges() {
        let grid = grid(ReplantPolicy::Reject);
        for plot in grid.plots() {
            assert!(plot.is_empty);
            assert!(plot.plant.is_none());
            assert!(!plot.selected);
            assert!((30.0..70.0).contains(&plot.moisture));
            assert!((50.0..100.0).contains(&plot.fertility));
        }
    }

    #[test]
    fn overwrite_policy_replants() {
        let mut grid = grid(ReplantPolicy::Overwrite);
        grid.cultivate(1, 1, "maiz").unwrap();
        let plot = grid.cultivate(1, 1, "yuca").unwrap();
        assert_eq!(plot.plant.as_deref(), Some("yuca"));
        assert_eq!(grid.available_count(), 63);
    }

    #[test]
    fn reject_policy_keeps_first_crop() {
        let mut grid = grid(ReplantPolicy::Reject);
        grid.cultivate(2, 4, "maiz").unwrap();
        let err = grid.cultivate(2, 4, "yuca").unwrap_err();
        assert_eq!(
            err,
            FieldError::AlreadyOccupied {
                x: 2,
                z: 4,
                plant: "maiz".to_string()
            }
        );
        assert_eq!(grid.plot(2, 4).unwrap().plant.as_deref(), Some("maiz"));
    }

    #[test]
    fn progress_rounds_to_whole_percent() {
        let mut grid = grid(ReplantPolicy::Reject);
        assert_eq!(grid.progress_percent(), 0);
        grid.cultivate(0, 0, "tomato").unwrap();
        // 1/64 = 1.5625 %
        assert_eq!(grid.progress_percent(), 2);
        let summary = grid.summary();
        assert_eq!(summary.available, 63);
        assert_eq!(summary.total, 64);
    }

    #[test]
    fn plot_centres_are_symmetric() {
        let grid = grid(ReplantPolicy::Reject);
        assert_eq!(grid.plot_center(GridPos::new(0, 7)), (-10.5, 10.5));
        assert_eq!(grid.plot_center(GridPos::new(4, 3)), (1.5, -1.5));
    }
}
