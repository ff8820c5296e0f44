//! Game configuration — panel size, player, flashlight, footsteps, saves.
//!
//! Every field has a default, and JSON config files may omit any of them:
//!
//! ```
//! use backrooms_logic::config::GameConfig;
//!
//! let config = GameConfig::from_json_str(r#"{ "panel": { "width": 1280, "height": 720 } }"#).unwrap();
//! assert_eq!(config.panel.width, 1280);
//! assert_eq!(config.player.radius, 8.0);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Panel dimensions and world seed. Both feed room generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: i32,
    pub height: i32,
    /// Mixed into every room seed. `0` is the canonical world.
    pub world_seed: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            world_seed: 0,
        }
    }
}

impl PanelConfig {
    pub fn width_f(&self) -> f32 {
        self.width as f32
    }

    pub fn height_f(&self) -> f32 {
        self.height as f32
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.width / 2) as f32, (self.height / 2) as f32)
    }

    /// True if `(x, y)` lies in `[0, width) x [0, height)`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width_f() && y >= 0.0 && y < self.height_f()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Pixels per movement step.
    pub speed: f32,
    /// Half the side of the collision box.
    pub radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            radius: 8.0,
        }
    }
}

/// Flashlight cone and ambient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub ray_count: u32,
    /// Total cone width in radians.
    pub cone_angle: f32,
    pub max_radius: f32,
    pub step: f32,
    pub min_offset: f32,
    /// Side of the square wall probe around each sample.
    pub probe_size: f32,
    /// Largest light spot radius, reached at zero distance.
    pub spot_radius: f32,
    pub ambient: f32,
    /// Weight of the flicker term in the ambient floor.
    pub flicker_gain: f32,
    /// Side of one illumination mask cell.
    pub mask_cell: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ray_count: 15,
            cone_angle: 0.8,
            max_radius: 200.0,
            step: 8.0,
            min_offset: 10.0,
            probe_size: 4.0,
            spot_radius: 12.0,
            ambient: 0.3,
            flicker_gain: 0.1,
            mask_cell: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    pub capacity: usize,
    pub lifetime: u32,
    pub max_radius: f32,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            capacity: 8,
            lifetime: 60,
            max_radius: 30.0,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub panel: PanelConfig,
    pub player: PlayerConfig,
    pub lighting: LightingConfig,
    pub footsteps: FootstepConfig,
    /// Directory holding `save_slot_<n>.json` files.
    pub save_dir: PathBuf,
    /// Drop cached rooms farther than this many panels from the player.
    /// `None` keeps every room for the whole session.
    pub cache_retention: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            panel: PanelConfig::default(),
            player: PlayerConfig::default(),
            lighting: LightingConfig::default(),
            footsteps: FootstepConfig::default(),
            save_dir: PathBuf::from("backrooms_2d_saves"),
            cache_retention: None,
        }
    }
}

/// Smallest panel side that still fits every interior feature range.
pub const MIN_PANEL_SIDE: i32 = 400;

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values that would make generation ranges empty or the
    /// flashlight degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panel.width < MIN_PANEL_SIDE || self.panel.height < MIN_PANEL_SIDE {
            return Err(ConfigError::Invalid(format!(
                "panel {}x{} is smaller than {}x{}",
                self.panel.width, self.panel.height, MIN_PANEL_SIDE, MIN_PANEL_SIDE
            )));
        }
        if self.player.speed <= 0.0 || self.player.radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "player speed and radius must be positive".into(),
            ));
        }
        let l = &self.lighting;
        if l.ray_count == 0
            || l.step <= 0.0
            || l.max_radius <= 0.0
            || l.mask_cell <= 0.0
            || l.probe_size <= 0.0
        {
            return Err(ConfigError::Invalid(
                "lighting ray count, step, radius, probe and mask cell must be positive".into(),
            ));
        }
        if self.footsteps.capacity == 0 || self.footsteps.lifetime == 0 {
            return Err(ConfigError::Invalid(
                "footstep capacity and lifetime must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = GameConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            GameConfig::from_json_str(r#"{ "lighting": { "ray_count": 31 }, "cache_retention": 4 }"#)
                .unwrap();
        assert_eq!(config.lighting.ray_count, 31);
        assert_eq!(config.lighting.max_radius, 200.0);
        assert_eq!(config.cache_retention, Some(4));
    }

    #[test]
    fn test_tiny_panel_rejected() {
        let err = GameConfig::from_json_str(r#"{ "panel": { "width": 200 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("smaller"));
    }

    #[test]
    fn test_bad_json_rejected() {
        let err = GameConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_panel_contains_is_half_open() {
        let panel = PanelConfig::default();
        assert!(panel.contains(0.0, 0.0));
        assert!(!panel.contains(panel.width_f(), 10.0));
        assert!(!panel.contains(10.0, -0.5));
    }
}
