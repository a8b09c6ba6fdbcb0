//! Runtime configuration
//!
//! Uses RON (Rusty Object Notation) for a human-editable config file.
//! Every section has defaults tuned for the demo level, so a missing or
//! partial file still yields a playable setup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::InputBindings;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "CAPSULE_CONFIG";

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    Fps30,
    #[default]
    Fps60,
    /// As fast as possible
    Unlocked,
}

impl FpsLimit {
    /// Target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }

    /// Cycle to next value
    pub fn next(self) -> Self {
        match self {
            FpsLimit::Fps30 => FpsLimit::Fps60,
            FpsLimit::Fps60 => FpsLimit::Unlocked,
            FpsLimit::Unlocked => FpsLimit::Fps30,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FpsLimit::Fps30 => "30",
            FpsLimit::Fps60 => "60",
            FpsLimit::Unlocked => "Unlocked",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Capsule Runtime".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// World scale and stepping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Screen pixels per physics meter
    pub pixels_per_meter: f32,
    /// Gravity in m/s², y points down like the screen
    pub gravity: [f32; 2],
    /// Fixed physics step in seconds (one step per frame)
    pub timestep: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            pixels_per_meter: 30.0,
            gravity: [0.0, 9.8],
            timestep: 1.0 / 60.0,
        }
    }
}

/// Movement and friction tuning for player-controlled characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal force per unit mass while grounded
    pub ground_speed: f32,
    /// Horizontal force per unit mass while airborne
    pub air_speed: f32,
    /// Upward impulse per unit mass
    pub jump_speed: f32,

    pub ground_friction: f32,
    pub idle_ground_friction: f32,
    pub dynamic_body_friction: f32,
    pub air_friction: f32,
    /// Foot friction on a slope with no direction held
    pub slope_idle_friction: f32,
    /// Foot friction on a slope while walking
    pub slope_moving_friction: f32,

    /// Gravity scale applied to both bodies while standing on a slope
    pub slope_gravity_scale: f32,
    /// Horizontal speed (pixels/s) below which the character counts as still
    pub moving_dead_zone_px: f32,

    /// Minimum gap between two jumps, in milliseconds
    pub jump_debounce_ms: u64,
    /// Minimum time a jump stays active, in milliseconds
    pub jump_hold_ms: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            ground_speed: 12.5,
            air_speed: 15.0,
            jump_speed: 15.0,
            ground_friction: 0.95,
            idle_ground_friction: 15.0,
            dynamic_body_friction: 0.45,
            air_friction: 0.0,
            slope_idle_friction: 200.0,
            slope_moving_friction: 0.0,
            slope_gravity_scale: 0.2,
            moving_dead_zone_px: 8.0,
            jump_debounce_ms: 75,
            jump_hold_ms: 300,
        }
    }
}

/// How ground/slope/dynamic-body flags are derived from contacts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactSettings {
    /// Derive flags from physics contacts each frame. When false the flags
    /// are left to whoever drives the world.
    pub derive_flags: bool,
    /// Minimum upward component of a contact normal to count as ground
    pub ground_normal_min: f32,
    /// Ground tilt (degrees) above which the contact counts as a slope
    pub slope_min_deg: f32,
}

impl Default for ContactSettings {
    fn default() -> Self {
        Self {
            derive_flags: true,
            ground_normal_min: 0.5,
            slope_min_deg: 8.0,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub player: PlayerTuning,
    pub contacts: ContactSettings,
    pub input: InputBindings,
    pub fps_limit: FpsLimit,
    /// `tracing` filter directive, overridden by RUST_LOG
    pub log_filter: String,
}

impl RuntimeConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse and validate config from a RON string.
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let mut config: RuntimeConfig = ron::from_str(s)?;
        if config.log_filter.is_empty() {
            config.log_filter = default_log_filter();
        }
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        let ron_string = ron::ser::to_string_pretty(self, pretty)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, ron_string)?;
        Ok(())
    }

    /// Reject values that would produce a degenerate simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(physics.pixels_per_meter.is_finite() && physics.pixels_per_meter > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pixels_per_meter must be positive, got {}",
                physics.pixels_per_meter
            )));
        }
        if !(physics.timestep.is_finite() && physics.timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "timestep must be positive, got {}",
                physics.timestep
            )));
        }
        if physics.gravity.iter().any(|g| !g.is_finite()) {
            return Err(ConfigError::Invalid("gravity must be finite".to_string()));
        }

        let player = &self.player;
        if player.jump_hold_ms <= player.jump_debounce_ms {
            return Err(ConfigError::Invalid(format!(
                "jump_hold_ms ({}) must exceed jump_debounce_ms ({})",
                player.jump_hold_ms, player.jump_debounce_ms
            )));
        }
        if player.moving_dead_zone_px < 0.0 {
            return Err(ConfigError::Invalid("moving_dead_zone_px must not be negative".to_string()));
        }

        let contacts = &self.contacts;
        if !(0.0..=1.0).contains(&contacts.ground_normal_min) {
            return Err(ConfigError::Invalid(format!(
                "ground_normal_min must be within 0..=1, got {}",
                contacts.ground_normal_min
            )));
        }

        if self.window.width <= 0 || self.window.height <= 0 {
            return Err(ConfigError::Invalid("window size must be positive".to_string()));
        }
        Ok(())
    }

    /// Where the config is looked up: `$CAPSULE_CONFIG`, then the user
    /// config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            dirs::config_dir().map(|dir| dir.join("capsule-runtime").join("config.ron"))
        }
        #[cfg(target_arch = "wasm32")]
        {
            None
        }
    }

    /// Defaults with the log filter filled in.
    pub fn with_defaults() -> Self {
        Self {
            log_filter: default_log_filter(),
            ..Self::default()
        }
    }
}

fn default_log_filter() -> String {
    "info,capsule_runtime=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RuntimeConfig::with_defaults();
        assert!(config.validate().is_ok());
        assert_eq!(config.player.jump_debounce_ms, 75);
        assert_eq!(config.player.jump_hold_ms, 300);
        assert_eq!(config.physics.pixels_per_meter, 30.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ron");

        let mut config = RuntimeConfig::with_defaults();
        config.player.ground_speed = 20.0;
        config.fps_limit = FpsLimit::Fps30;
        config.save(&path).unwrap();

        let loaded = RuntimeConfig::load(&path).unwrap();
        assert_eq!(loaded.player.ground_speed, 20.0);
        assert_eq!(loaded.fps_limit, FpsLimit::Fps30);
        assert_eq!(loaded.log_filter, config.log_filter);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = RuntimeConfig::from_ron("(player: (jump_speed: 20.0))").unwrap();
        assert_eq!(config.player.jump_speed, 20.0);
        assert_eq!(config.player.ground_speed, 12.5);
        assert!(config.contacts.derive_flags);
        assert!(!config.log_filter.is_empty());
    }

    #[test]
    fn test_rejects_bad_scale() {
        let err = RuntimeConfig::from_ron("(physics: (pixels_per_meter: 0.0))").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_inverted_jump_timers() {
        let err = RuntimeConfig::from_ron("(player: (jump_debounce_ms: 400, jump_hold_ms: 300))")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = RuntimeConfig::from_ron("(physics: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_fps_limit_cycle() {
        assert_eq!(FpsLimit::Fps30.next(), FpsLimit::Fps60);
        assert_eq!(FpsLimit::Unlocked.next(), FpsLimit::Fps30);
        assert_eq!(FpsLimit::Unlocked.frame_time(), None);
    }
}
