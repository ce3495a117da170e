use crate::error::{NavError, NavResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "rectpath.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hit: HitConfig,
    #[serde(default)]
    pub pathfinder: PathfinderConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitConfig {
    /// Distance kept between the predicted impact and the safe stopping point
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f32,
    /// Spacing of ray origins along each edge in precise mode
    #[serde(default = "default_precise_sample_step")]
    pub precise_sample_step: f32,
    /// Line-of-sight visibility as a multiple of the from/to distance
    #[serde(default = "default_line_of_sight_factor")]
    pub line_of_sight_factor: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathfinderConfig {
    #[serde(default = "default_orthogonal_cost")]
    pub orthogonal_cost: u32,
    #[serde(default = "default_diagonal_cost")]
    pub diagonal_cost: u32,
    /// Vertical deltas are multiplied by this before costing
    #[serde(default = "default_vertical_weight")]
    pub vertical_weight: u32,
    #[serde(default = "default_compress_corners")]
    pub compress_corners: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Waypoints farther than this are never line-of-sight tested during a prune
    #[serde(default = "default_prune_distance")]
    pub prune_distance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f32,
    /// Obstacles are grown by this much before planning
    #[serde(default = "default_obstacle_padding")]
    pub obstacle_padding: f32,
    /// Units per second
    #[serde(default = "default_speed")]
    pub default_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_event_log")]
    pub enable_event_log: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_safety_margin() -> f32 { 0.1 }
fn default_precise_sample_step() -> f32 { 0.5 }
fn default_line_of_sight_factor() -> f32 { 3.0 }
fn default_orthogonal_cost() -> u32 { 10 }
fn default_diagonal_cost() -> u32 { 14 }
fn default_vertical_weight() -> u32 { 2 }
fn default_compress_corners() -> bool { true }
fn default_prune_distance() -> f32 { 6.0 }
fn default_arrival_tolerance() -> f32 { 0.05 }
fn default_obstacle_padding() -> f32 { 0.0 }
fn default_speed() -> f32 { 4.0 }
fn default_enable_event_log() -> bool { false }
fn default_event_log_path() -> String { "nav_events.json".to_string() }

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            precise_sample_step: default_precise_sample_step(),
            line_of_sight_factor: default_line_of_sight_factor(),
        }
    }
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            orthogonal_cost: default_orthogonal_cost(),
            diagonal_cost: default_diagonal_cost(),
            vertical_weight: default_vertical_weight(),
            compress_corners: default_compress_corners(),
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            prune_distance: default_prune_distance(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            arrival_tolerance: default_arrival_tolerance(),
            obstacle_padding: default_obstacle_padding(),
            default_speed: default_speed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_event_log: default_enable_event_log(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hit: HitConfig::default(),
            pathfinder: PathfinderConfig::default(),
            navigation: NavigationConfig::default(),
            executor: ExecutorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `rectpath.toml`, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        if !Path::new(DEFAULT_CONFIG_PATH).exists() {
            tracing::debug!("no {} found, using default configuration", DEFAULT_CONFIG_PATH);
            return Config::default();
        }
        match Self::load_from(DEFAULT_CONFIG_PATH) {
            Ok(config) => {
                tracing::debug!("loaded configuration from {}", DEFAULT_CONFIG_PATH);
                config
            }
            Err(e) => {
                tracing::warn!("{}; using default configuration", e);
                Config::default()
            }
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> NavResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> NavResult<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NavResult<()> {
        if !(self.hit.safety_margin >= 0.0) {
            return Err(NavError::InvalidConfig("hit.safety_margin must be >= 0".into()));
        }
        if !(self.hit.precise_sample_step > 0.0) {
            return Err(NavError::InvalidConfig("hit.precise_sample_step must be > 0".into()));
        }
        if !(self.hit.line_of_sight_factor >= 1.0) {
            return Err(NavError::InvalidConfig("hit.line_of_sight_factor must be >= 1".into()));
        }
        if self.pathfinder.orthogonal_cost == 0 || self.pathfinder.vertical_weight == 0 {
            return Err(NavError::InvalidConfig(
                "pathfinder.orthogonal_cost and pathfinder.vertical_weight must be > 0".into(),
            ));
        }
        if self.pathfinder.diagonal_cost < self.pathfinder.orthogonal_cost {
            return Err(NavError::InvalidConfig(
                "pathfinder.diagonal_cost must not be below orthogonal_cost".into(),
            ));
        }
        if !(self.navigation.prune_distance >= 0.0) {
            return Err(NavError::InvalidConfig("navigation.prune_distance must be >= 0".into()));
        }
        if !(self.executor.arrival_tolerance >= 0.0) || !(self.executor.obstacle_padding >= 0.0) {
            return Err(NavError::InvalidConfig(
                "executor tolerance and padding must be >= 0".into(),
            ));
        }
        if !(self.executor.default_speed > 0.0) {
            return Err(NavError::InvalidConfig("executor.default_speed must be > 0".into()));
        }
        Ok(())
    }
}
