//! Harness configuration and the two demo presets.
//!
//! A config can be written as YAML; any field left out takes the value of the
//! orbit preset.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use viewport_common::{clamp_pixel_ratio, Color, SurfaceSize, DEFAULT_MAX_PIXEL_RATIO};
use viewport_input::OrbitSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the surface pixel ratio is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PixelRatioPolicy {
    /// Ignore the display and use this ratio.
    Fixed { ratio: f64 },
    /// Follow the display, capped at `max`.
    Device { max: f64 },
}

impl PixelRatioPolicy {
    pub fn resolve(&self, device_pixel_ratio: f64) -> f64 {
        match *self {
            PixelRatioPolicy::Fixed { ratio } => ratio,
            PixelRatioPolicy::Device { max } => clamp_pixel_ratio(device_pixel_ratio, max),
        }
    }
}

impl Default for PixelRatioPolicy {
    fn default() -> Self {
        PixelRatioPolicy::Device {
            max: DEFAULT_MAX_PIXEL_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: Vec3,
    pub pixel_ratio: PixelRatioPolicy,
    /// Fixed surface size. `None` means "whatever the host window is".
    pub initial_size: Option<SurfaceSize>,
    /// `None` disables orbit controls entirely.
    pub controls: Option<OrbitSettings>,
    /// Whether the host should forward resize events.
    pub track_resize: bool,
    /// Keep ticking after the first frame.
    pub continuous: bool,
    pub background: Color,
    pub cube_color: Color,
    /// Cube rotation around +Y in radians per second of elapsed time.
    pub spin_rate: f32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::orbit()
    }
}

impl HarnessConfig {
    /// Window-sized viewport with damped orbit controls and a continuous loop.
    pub fn orbit() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            camera_position: Vec3::new(0.0, 0.0, 2.0),
            pixel_ratio: PixelRatioPolicy::default(),
            initial_size: None,
            controls: Some(OrbitSettings {
                enable_damping: true,
                ..OrbitSettings::default()
            }),
            track_resize: true,
            continuous: true,
            background: Color::BLACK,
            cube_color: Color::from_hex(0xff0000),
            spin_rate: 0.0,
        }
    }

    /// Fixed 800x600 surface rendered once, no controls, no resize tracking.
    pub fn fixed() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 2000.0,
            camera_position: Vec3::new(0.0, 0.0, 3.0),
            pixel_ratio: PixelRatioPolicy::Fixed { ratio: 1.0 },
            initial_size: Some(SurfaceSize::new(800, 600)),
            controls: None,
            track_resize: false,
            continuous: false,
            background: Color::BLACK,
            cube_color: Color::RED,
            spin_rate: 0.0,
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading harness config");
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return invalid(format!("fov_degrees must be in (0, 180), got {}", self.fov_degrees));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return invalid(format!(
                "clip planes need 0 < near < far, got near={} far={}",
                self.near, self.far
            ));
        }
        if let Some(size) = self.initial_size {
            if size.width == 0 || size.height == 0 {
                return invalid(format!(
                    "initial_size must be non-zero, got {}x{}",
                    size.width, size.height
                ));
            }
        }
        let ratio = match self.pixel_ratio {
            PixelRatioPolicy::Fixed { ratio } => ratio,
            PixelRatioPolicy::Device { max } => max,
        };
        if !(ratio.is_finite() && ratio > 0.0) {
            return invalid(format!("pixel ratio must be positive, got {ratio}"));
        }
        if let Some(controls) = &self.controls {
            let f = controls.damping_factor;
            if !(f > 0.0 && f <= 1.0) {
                return invalid(format!("damping_factor must be in (0, 1], got {f}"));
            }
            if !(controls.min_distance >= 0.0 && controls.max_distance >= controls.min_distance) {
                return invalid(format!(
                    "distance limits need 0 <= min_distance <= max_distance, got {}..{}",
                    controls.min_distance, controls.max_distance
                ));
            }
            if !(controls.min_polar_angle <= controls.max_polar_angle) {
                return invalid(format!(
                    "polar limits need min_polar_angle <= max_polar_angle, got {}..{}",
                    controls.min_polar_angle, controls.max_polar_angle
                ));
            }
            let speeds = [
                ("rotate_speed", controls.rotate_speed),
                ("zoom_speed", controls.zoom_speed),
                ("pan_speed", controls.pan_speed),
            ];
            if let Some((name, v)) = speeds.into_iter().find(|(_, v)| !v.is_finite()) {
                return invalid(format!("{name} must be finite, got {v}"));
            }
        }
        Ok(())
    }
}
