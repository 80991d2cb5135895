//! Rig tuning with TOML file support.
//!
//! Every section uses `#[serde(default)]` so a file that only overrides
//! `[zoom]` still yields a complete configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::input::KeyBindings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RigConfig {
    pub movement: MovementOptions,
    pub look: LookOptions,
    pub zoom: ZoomOptions,
    pub follow: FollowOptions,
    pub camera: CameraOptions,
    pub keys: KeyBindings,
}

impl RigConfig {
    /// Load from a TOML file and validate. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!("loaded rig config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        if !(m.base_speed > 0.0 && m.boost_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "movement speeds must be positive (base {}, boost {})",
                m.base_speed, m.boost_speed
            )));
        }
        let z = &self.zoom;
        if !(z.min_degrees > 0.0 && z.min_degrees < z.max_degrees && z.max_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom range must satisfy 0 < min < max < 180 (got {}..{})",
                z.min_degrees, z.max_degrees
            )));
        }
        let fov = self.camera.fov_degrees;
        if fov < z.min_degrees || fov > z.max_degrees {
            return Err(ConfigError::Invalid(format!(
                "camera fov {fov} lies outside the zoom range {}..{}",
                z.min_degrees, z.max_degrees
            )));
        }
        if !(self.follow.distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "follow distance must be positive (got {})",
                self.follow.distance
            )));
        }
        let c = &self.camera;
        if !(c.z_near > 0.0 && c.z_near < c.z_far) {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far (got {}..{})",
                c.z_near, c.z_far
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MovementOptions {
    /// Units per second.
    pub base_speed: f32,
    /// Units per second while the boost key is held.
    pub boost_speed: f32,
}

impl Default for MovementOptions {
    fn default() -> Self {
        Self { base_speed: 10.0, boost_speed: 50.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookOptions {
    /// Radians per pixel of cursor displacement.
    pub mouse_sensitivity: f32,
}

impl Default for LookOptions {
    fn default() -> Self {
        Self { mouse_sensitivity: 0.01 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZoomOptions {
    /// Radians of field of view per scroll unit; negative widens on scroll up.
    pub sensitivity: f32,
    pub min_degrees: f32,
    pub max_degrees: f32,
}

impl Default for ZoomOptions {
    fn default() -> Self {
        Self { sensitivity: -0.1, min_degrees: 10.0, max_degrees: 120.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FollowOptions {
    /// Distance kept between the follow eye and the player.
    pub distance: f32,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self { distance: 5.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraOptions {
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Camera start position relative to the player.
    pub start_offset: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            z_near: 0.1,
            z_far: 1000.0,
            start_offset: [0.0, 2.0, 6.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::input::Key;

    #[test]
    fn test_defaults_are_valid() {
        let config = RigConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement.base_speed, 10.0);
        assert_eq!(config.movement.boost_speed, 50.0);
        assert_eq!(config.follow.distance, 5.0);
        assert_eq!(config.keys.toggle_mode, Key::Tab);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = RigConfig::from_toml_str(
            r#"
            [zoom]
            max_degrees = 90.0

            [keys]
            up = "E"
            down = "Q"
            "#,
        )
        .unwrap();

        assert_eq!(config.zoom.max_degrees, 90.0);
        assert_eq!(config.zoom.min_degrees, 10.0);
        assert_eq!(config.keys.up, Key::E);
        assert_eq!(config.keys.forward, Key::W);
        assert_eq!(config.movement, MovementOptions::default());
    }

    #[test]
    fn test_rejects_inverted_zoom_range() {
        let err = RigConfig::from_toml_str("[zoom]\nmin_degrees = 100.0\nmax_degrees = 20.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_fov_outside_zoom_range() {
        let err = RigConfig::from_toml_str("[camera]\nfov_degrees = 150.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = RigConfig::from_toml_str("[movement]\nbase_speed = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = RigConfig::load(Path::new("does/not/exist/camrig.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let mut config = RigConfig::default();
        config.look.mouse_sensitivity = 0.005;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(RigConfig::from_toml_str(&text).unwrap(), config);
    }
}
