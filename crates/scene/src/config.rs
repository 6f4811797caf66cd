//! Scene configuration.
//!
//! Every field has a default matching the shipped hero scene, so an empty
//! YAML document (or no file at all) yields the stock look.

use counsel_common::Rgb;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Full scene configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Star field seed. `None` draws from OS entropy on every mount.
    pub seed: Option<u64>,
    pub surface: SurfaceConfig,
    pub camera: CameraConfig,
    pub lights: LightsConfig,
    pub ring: RingConfig,
    pub core: CoreConfig,
    pub stars: StarsConfig,
    pub parallax: ParallaxConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Clear color behind the scene.
    pub background: Rgb,
    /// Clear with zero alpha so the host page shows through.
    pub transparent: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            background: Rgb(0x0a0f1c),
            transparent: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance from the origin along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub key_color: Rgb,
    pub key_intensity: f32,
    pub key_position: Vec3,
    pub glow_color: Rgb,
    pub glow_intensity: f32,
    pub glow_range: f32,
    pub glow_position: Vec3,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: Rgb::WHITE,
            ambient_intensity: 1.0,
            key_color: Rgb(0xf0c24b),
            key_intensity: 2.5,
            key_position: Vec3::new(2.0, 5.0, 5.0),
            glow_color: Rgb(0x00ffff),
            glow_intensity: 10.0,
            glow_range: 100.0,
            glow_position: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub offset_y: f32,
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    /// Radians per second around each axis.
    pub spin: Vec3,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 1.5,
            tube: 0.1,
            radial_segments: 16,
            tubular_segments: 100,
            offset_y: 0.2,
            color: Rgb(0xf0c24b),
            metalness: 0.8,
            roughness: 0.2,
            spin: Vec3::new(0.05, 0.1, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub offset_y: f32,
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub spin: Vec3,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            width_segments: 32,
            height_segments: 32,
            offset_y: 0.2,
            color: Rgb(0x00ffff),
            emissive: Rgb(0x00ffff),
            emissive_intensity: 3.0,
            spin: Vec3::new(0.1, 0.1, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarsConfig {
    pub count: u32,
    /// Edge length of the cube the stars are scattered in, centered on the origin.
    pub extent: f32,
    pub color: Rgb,
    pub size: f32,
    pub spin: Vec3,
}

impl Default for StarsConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            extent: 15.0,
            color: Rgb::WHITE,
            size: 0.005,
            spin: Vec3::new(-1.0 / 10.0, -1.0 / 15.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Camera offset per unit of normalized pointer.
    pub camera_gain: f32,
    /// Group tilt (radians) per unit of normalized pointer.
    pub tilt_gain: f32,
    /// Fraction of the remaining distance covered each frame.
    pub easing: f32,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            camera_gain: 0.2,
            tilt_gain: PI / 20.0,
            easing: 0.05,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = if text.trim().is_empty() {
            SceneConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!("loaded scene config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be in (0, 180)"));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(invalid("camera.near/far", "need 0 < near < far"));
        }
        if !(self.parallax.easing > 0.0 && self.parallax.easing <= 1.0) {
            return Err(invalid("parallax.easing", "must be in (0, 1]"));
        }
        if self.ring.radial_segments < 3 || self.ring.tubular_segments < 3 {
            return Err(invalid("ring.segments", "need at least 3 per direction"));
        }
        if !(self.ring.radius > 0.0 && self.ring.tube > 0.0) {
            return Err(invalid("ring.radius/tube", "must be positive"));
        }
        if self.core.width_segments < 3 || self.core.height_segments < 2 {
            return Err(invalid("core.segments", "need width >= 3 and height >= 2"));
        }
        if self.core.radius <= 0.0 {
            return Err(invalid("core.radius", "must be positive"));
        }
        if self.stars.count == 0 {
            return Err(invalid("stars.count", "must be at least 1"));
        }
        if self.stars.extent <= 0.0 {
            return Err(invalid("stars.extent", "must be positive"));
        }
        Ok(())
    }
}
