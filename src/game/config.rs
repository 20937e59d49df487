use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest playfield accepted, in cells
pub const MAX_GRID_CELLS: usize = 65_536;

/// Configuration for a game session
///
/// Every field has a default, so a JSON file only needs to name the values
/// it changes:
///
/// ```json
/// { "grid_width": 20, "grid_height": 15 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playfield in cells
    pub grid_width: usize,
    /// Height of the playfield in cells
    pub grid_height: usize,
    /// Number of segments the snake starts with
    pub initial_snake_length: usize,
    /// Points awarded per food eaten
    pub food_reward: u32,
    /// Seconds of accumulated time between two grid steps
    pub move_interval_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 4,
            food_reward: 10,
            move_interval_secs: 0.15,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(12, 12)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Total number of cells, which is also the maximum snake length
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    /// Validate the configuration
    ///
    /// The initial body is laid out to the left of column `grid_width / 4`,
    /// so it has to fit between that column and the left wall.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }
        match self.grid_width.checked_mul(self.grid_height) {
            Some(cells) if cells <= MAX_GRID_CELLS => {}
            _ => {
                return Err(format!(
                    "grid_width x grid_height must be at most {} cells, got {}x{}",
                    MAX_GRID_CELLS, self.grid_width, self.grid_height
                ));
            }
        }
        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }
        let max_initial = self.grid_width / 4 + 1;
        if self.initial_snake_length > max_initial {
            return Err(format!(
                "initial_snake_length {} does not fit a grid {} wide (max {})",
                self.initial_snake_length, self.grid_width, max_initial
            ));
        }
        if self.initial_snake_length >= self.cell_count() {
            return Err(format!(
                "initial_snake_length {} leaves no room for food on a {}-cell grid",
                self.initial_snake_length,
                self.cell_count()
            ));
        }
        if !self.move_interval_secs.is_finite() || self.move_interval_secs <= 0.0 {
            return Err(format!(
                "move_interval_secs must be positive, got {}",
                self.move_interval_secs
            ));
        }
        Ok(())
    }
}
