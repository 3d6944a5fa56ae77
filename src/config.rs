//! Runtime configuration

use crate::constants::*;
use error::GameError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables loaded from an optional JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tick_millis: u64,
    pub survival_threshold: f64,
    pub default_explosion_range: (f64, f64),
    pub default_max_flight_time: f64,
    pub leaderboard_capacity: usize,
    pub store_path: PathBuf,
    /// Fixed RNG seed; OS entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_millis: TICK_MILLIS,
            survival_threshold: SURVIVAL_THRESHOLD,
            default_explosion_range: DEFAULT_EXPLOSION_RANGE,
            default_max_flight_time: DEFAULT_MAX_FLIGHT_TIME,
            leaderboard_capacity: leaderboard::DEFAULT_CAPACITY,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Read a JSON config. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| GameError::Config(format!("{:?}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.tick_millis == 0 {
            return Err(GameError::Config("tick_millis must be positive".into()));
        }
        let (min, max) = self.default_explosion_range;
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(GameError::Config(format!(
                "default_explosion_range [{}, {}] is invalid",
                min, max
            )));
        }
        if !self.default_max_flight_time.is_finite() || self.default_max_flight_time <= 0.0 {
            return Err(GameError::Config("default_max_flight_time must be positive".into()));
        }
        if self.leaderboard_capacity == 0 {
            return Err(GameError::Config("leaderboard_capacity must be positive".into()));
        }
        Ok(())
    }

    /// Wall-clock period between ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}
