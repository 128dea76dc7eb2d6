//! Tunables for the simulation and the terminal front-end.
//!
//! Every field has a default, so a JSON config only needs the keys it wants
//! to override.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::map::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};
use crate::map::generator::{MAX_ROOM_H, MAX_ROOM_W};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub map_width: i32,
    pub map_height: i32,
    /// Descending past this floor wins the run.
    pub final_depth: i32,
    pub inventory_capacity: usize,
    pub fov_radius: i32,
    pub fov_rays: u32,
    pub room_attempts: u32,
    /// Fixed seed for reproducible runs; `None` draws one from entropy.
    pub seed: Option<u64>,
    /// Minimum gap between accepted key presses in the terminal driver.
    pub input_cooldown_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            final_depth: 12,
            inventory_capacity: 8,
            fov_radius: 6,
            fov_rays: 72,
            room_attempts: 200,
            seed: None,
            input_cooldown_ms: 120,
        }
    }
}

impl EngineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // The largest room plus a wall on each side must fit.
        if self.map_width < MAX_ROOM_W + 2 {
            return Err(invalid(
                "map_width",
                format!("must be at least {}", MAX_ROOM_W + 2),
            ));
        }
        if self.map_height < MAX_ROOM_H + 2 {
            return Err(invalid(
                "map_height",
                format!("must be at least {}", MAX_ROOM_H + 2),
            ));
        }
        if self.final_depth < 1 {
            return Err(invalid("final_depth", "must be at least 1".into()));
        }
        if self.inventory_capacity == 0 {
            return Err(invalid("inventory_capacity", "must be non-zero".into()));
        }
        if self.fov_radius < 1 {
            return Err(invalid("fov_radius", "must be at least 1".into()));
        }
        if self.fov_rays == 0 {
            return Err(invalid("fov_rays", "must be non-zero".into()));
        }
        if self.room_attempts == 0 {
            return Err(invalid("room_attempts", "must be non-zero".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
