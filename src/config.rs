/// Gameplay tuning.
///
/// Keep this separate from entity constants (car size, particle counts),
/// which are fixed. Everything here can be overridden from a TOML file.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read tuning file: {e}"),
            ConfigError::Parse(e) => write!(f, "malformed tuning file: {e}"),
            ConfigError::Invalid(what) => write!(f, "invalid tuning: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    /// Simulation ticks per second; continuous motion is expressed per tick.
    pub tick_rate: u32,

    /// Score needed per difficulty level.
    pub difficulty_interval: u32,

    pub base_traffic_density: f32,
    pub traffic_density_step: f32,
    pub max_traffic_density: f32,
    /// Final multiplier applied to the density used as spawn probability.
    pub density_scale: f32,

    pub base_car_speed: f32,
    pub car_speed_step: f32,
    /// Width of the speed range new cars are drawn from.
    pub car_speed_spread: f32,
    pub max_car_speed: f32,

    /// Bosses appear every `boss_spawn_interval * 100` points.
    pub boss_spawn_interval: u32,
    pub boss_shoot_interval: f32,
    pub min_boss_shoot_interval: f32,
    pub boss_shoot_interval_step: f32,
    /// Boss speed relative to the current minimum car speed.
    pub boss_speed_factor: f32,

    pub max_bullets: usize,
    /// Random spawning stops at this many cars per pool.
    pub max_pool_cars: usize,
    /// Absolute per-pool ceiling, bosses included.
    pub pool_hard_cap: usize,
    pub initial_cars_per_pool: usize,

    /// How long the controls overlay stays up after a game starts.
    pub controls_overlay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            difficulty_interval: 1000,
            base_traffic_density: 0.3,
            traffic_density_step: 0.05,
            max_traffic_density: 0.6,
            density_scale: 0.7,
            base_car_speed: 2.0,
            car_speed_step: 0.5,
            car_speed_spread: 3.0,
            max_car_speed: 8.0,
            boss_spawn_interval: 2,
            boss_shoot_interval: 30.0,
            min_boss_shoot_interval: 10.0,
            boss_shoot_interval_step: 0.5,
            boss_speed_factor: 0.75,
            max_bullets: 20,
            max_pool_cars: 8,
            pool_hard_cap: 10,
            initial_cars_per_pool: 3,
            controls_overlay_ticks: 180,
        }
    }
}

impl Tuning {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = toml::from_str(src)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive"));
        }
        if self.difficulty_interval == 0 {
            return Err(ConfigError::Invalid("difficulty_interval must be positive"));
        }
        let unit = 0.0..=1.0;
        if !unit.contains(&self.base_traffic_density)
            || !unit.contains(&self.max_traffic_density)
            || !unit.contains(&self.density_scale)
        {
            return Err(ConfigError::Invalid("traffic densities must lie in [0, 1]"));
        }
        if self.base_traffic_density > self.max_traffic_density {
            return Err(ConfigError::Invalid("base_traffic_density exceeds max_traffic_density"));
        }
        if self.base_car_speed < 0.0 || self.base_car_speed > self.max_car_speed {
            return Err(ConfigError::Invalid("base_car_speed must lie in [0, max_car_speed]"));
        }
        if self.car_speed_step < 0.0
            || self.car_speed_spread < 0.0
            || self.traffic_density_step < 0.0
            || self.boss_shoot_interval_step < 0.0
        {
            return Err(ConfigError::Invalid("difficulty steps must not be negative"));
        }
        if self.min_boss_shoot_interval <= 0.0
            || self.min_boss_shoot_interval > self.boss_shoot_interval
        {
            return Err(ConfigError::Invalid(
                "min_boss_shoot_interval must lie in (0, boss_shoot_interval]",
            ));
        }
        if self.max_bullets == 0 {
            return Err(ConfigError::Invalid("max_bullets must be positive"));
        }
        if self.max_pool_cars == 0 || self.pool_hard_cap == 0 {
            return Err(ConfigError::Invalid("pool caps must be positive"));
        }
        if self.max_pool_cars > self.pool_hard_cap {
            return Err(ConfigError::Invalid("max_pool_cars exceeds pool_hard_cap"));
        }
        Ok(())
    }
}
