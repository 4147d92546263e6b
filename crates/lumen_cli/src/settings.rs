//! Settings file for the command line renderer.
//!
//! Every field is optional; missing ones take the defaults below.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use lumen_math::{Camera, Mat4, Mat4Ext, Vec3};
use lumen_renderer::RenderConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    pub camera: CameraSettings,
    pub model: ModelSettings,
}

/// Orbit camera looking down -Z at `target`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub target: [f32; 3],
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            target: [0.0, 0.0, 0.0],
            distance: 4.0,
            fov: 60.0,
        }
    }
}

impl CameraSettings {
    pub fn camera(&self) -> Camera {
        let mut camera = Camera::orbit(Vec3::from_array(self.target), self.distance);
        camera.fov_y = self.fov;
        camera
    }
}

/// Placement of the loaded mesh: translate, then rotate about Y, then scale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub scale: [f32; 3],
    /// Rotation about the Y axis in degrees
    pub rotate_y: f32,
    pub translate: [f32; 3],
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            scale: [1.0, 1.0, 1.0],
            rotate_y: 0.0,
            translate: [0.0, 0.0, 0.0],
        }
    }
}

impl ModelSettings {
    pub fn matrix(&self) -> Mat4 {
        Mat4::placement(
            Vec3::from_array(self.scale),
            self.rotate_y,
            Vec3::from_array(self.translate),
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

impl Settings {
    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        let settings: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid settings {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("invalid settings {}", path.display()))?;
        Ok(settings)
    }

    /// Reject cameras that would give a degenerate projection.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if !(camera.distance.is_finite() && camera.distance > 0.0) {
            bail!("camera distance must be positive, got {}", camera.distance);
        }
        if !(camera.fov > 0.0 && camera.fov < 180.0) {
            bail!("camera fov must be between 0 and 180 degrees, got {}", camera.fov);
        }
        Ok(())
    }
}
