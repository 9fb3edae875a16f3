//! Game configuration.
//!
//! Manages match and window settings loaded from an INI configuration file.
//! Provides defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [map]
//! rows = 13
//! cols = 14
//! inner_walls = 10
//!
//! [snake]
//! speed = 5.0
//!
//! [match]
//! seed = 42
//! time_scale = 1.0
//!
//! [window]
//! width = 1120
//! height = 1040
//! target_fps = 60
//! ```

use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::entities::gamemap::MapConfig;
use crate::systems::maze::{MAX_GRID_SIDE, max_inner_wall_pairs};

/// Default safe values for startup
const DEFAULT_ROWS: i32 = 13;
const DEFAULT_COLS: i32 = 14;
const DEFAULT_INNER_WALLS: u32 = 10;
const DEFAULT_SNAKE_SPEED: f32 = 5.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_WINDOW_WIDTH: u32 = 1120;
const DEFAULT_WINDOW_HEIGHT: u32 = 1040;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Smallest grid that still has an inside once the border is walled.
const MIN_GRID_SIDE: i32 = 3;

/// Game configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Grid rows, border included.
    pub rows: i32,
    /// Grid columns, border included.
    pub cols: i32,
    /// Number of symmetric inner wall pairs to place.
    pub inner_walls: u32,
    /// Snake speed in cells per second.
    pub snake_speed: f32,
    /// Fixed RNG seed; random when `None`.
    pub seed: Option<u64>,
    /// Multiplier applied to frame deltas.
    pub time_scale: f32,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            inner_walls: DEFAULT_INNER_WALLS,
            snake_speed: DEFAULT_SNAKE_SPEED,
            seed: None,
            time_scale: DEFAULT_TIME_SCALE,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values. Out-of-range
    /// values are reported and replaced by defaults.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [map] section
        if let Some(rows) = config.getint("map", "rows").ok().flatten() {
            read_into(&mut self.rows, rows, "map.rows");
        }
        if let Some(cols) = config.getint("map", "cols").ok().flatten() {
            read_into(&mut self.cols, cols, "map.cols");
        }
        if let Some(walls) = config.getuint("map", "inner_walls").ok().flatten() {
            read_into(&mut self.inner_walls, walls, "map.inner_walls");
        }

        // [snake] section
        if let Some(speed) = config.getfloat("snake", "speed").ok().flatten() {
            self.snake_speed = speed as f32;
        }

        // [match] section
        if let Some(seed) = config.getuint("match", "seed").ok().flatten() {
            self.seed = Some(seed);
        }
        if let Some(scale) = config.getfloat("match", "time_scale").ok().flatten() {
            self.time_scale = scale as f32;
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            read_into(&mut self.window_width, width, "window.width");
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            read_into(&mut self.window_height, height, "window.height");
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            read_into(&mut self.target_fps, fps, "window.target_fps");
        }

        self.sanitize();

        info!(
            "Loaded config: {}x{} grid, {} inner walls, speed={}, seed={:?}, time_scale={}, {}x{} window, fps={}",
            self.rows,
            self.cols,
            self.inner_walls,
            self.snake_speed,
            self.seed,
            self.time_scale,
            self.window_width,
            self.window_height,
            self.target_fps
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [map] section
        config.set("map", "rows", Some(self.rows.to_string()));
        config.set("map", "cols", Some(self.cols.to_string()));
        config.set("map", "inner_walls", Some(self.inner_walls.to_string()));

        // [snake] section
        config.set("snake", "speed", Some(self.snake_speed.to_string()));

        // [match] section
        if let Some(seed) = self.seed {
            config.set("match", "seed", Some(seed.to_string()));
        }
        config.set("match", "time_scale", Some(self.time_scale.to_string()));

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Replace out-of-range values with defaults.
    pub fn sanitize(&mut self) {
        let side_ok = |side: i32| (MIN_GRID_SIDE..=MAX_GRID_SIDE).contains(&side);
        if !side_ok(self.rows) || !side_ok(self.cols) {
            warn!(
                "Grid {}x{} outside {}..={} per side, using {}x{}",
                self.rows, self.cols, MIN_GRID_SIDE, MAX_GRID_SIDE, DEFAULT_ROWS, DEFAULT_COLS
            );
            self.rows = DEFAULT_ROWS;
            self.cols = DEFAULT_COLS;
        }
        let max_pairs = max_inner_wall_pairs(self.rows, self.cols);
        if self.inner_walls > max_pairs {
            warn!(
                "{} inner wall pairs do not fit a {}x{} grid, using {}",
                self.inner_walls, self.rows, self.cols, max_pairs
            );
            self.inner_walls = max_pairs;
        }
        if !(self.snake_speed > 0.0 && self.snake_speed.is_finite()) {
            warn!(
                "Snake speed {} invalid, using {}",
                self.snake_speed, DEFAULT_SNAKE_SPEED
            );
            self.snake_speed = DEFAULT_SNAKE_SPEED;
        }
        if !(self.time_scale >= 0.0 && self.time_scale.is_finite()) {
            warn!(
                "Time scale {} invalid, using {}",
                self.time_scale, DEFAULT_TIME_SCALE
            );
            self.time_scale = DEFAULT_TIME_SCALE;
        }
    }

    /// The part of the configuration the simulation needs.
    pub fn map_config(&self) -> MapConfig {
        MapConfig {
            rows: self.rows,
            cols: self.cols,
            inner_walls: self.inner_walls,
            snake_speed: self.snake_speed,
        }
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

/// Store `value` in `slot` if it fits, otherwise keep the current value.
fn read_into<T, V>(slot: &mut T, value: V, key: &str)
where
    T: TryFrom<V> + std::fmt::Display,
    V: Copy + std::fmt::Display,
{
    match T::try_from(value) {
        Ok(v) => *slot = v,
        Err(_) => warn!("{key} = {value} is out of range, keeping {slot}"),
    }
}
