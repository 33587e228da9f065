/// Viewer configuration: camera defaults, light, step sizes and lighting policy
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::camera::{CameraState, Frustum};
use crate::error::SceneError;
use crate::lighting::LightingModel;
use crate::selection::EditSteps;

/// Initial camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub lookat: [f32; 3],
    pub up: [f32; 3],
    pub window_dist: f32,
    pub frustum: Frustum,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = CameraState::default();
        Self {
            eye: [camera.eye.x, camera.eye.y, camera.eye.z],
            lookat: camera.lookat.into(),
            up: camera.up.into(),
            window_dist: camera.window_dist,
            frustum: camera.frustum,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> CameraState {
        CameraState {
            eye: Point3::from(self.eye),
            lookat: Vector3::from(self.lookat),
            up: Vector3::from(self.up),
            window_dist: self.window_dist,
            frustum: self.frustum,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub light_position: [f32; 3],
    pub lighting: LightingModel,
    /// Uniform scale applied to the selected set
    pub highlight_scale: f32,
    pub object_translate_step: f32,
    /// Degrees
    pub object_rotate_step: f32,
    pub camera_move_step: f32,
    /// Degrees
    pub camera_turn_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            light_position: [-0.5, 1.5, -0.5],
            lighting: LightingModel::default(),
            highlight_scale: 1.2,
            object_translate_step: 0.05,
            object_rotate_step: 5.0,
            camera_move_step: 0.05,
            camera_turn_step: 5.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let f = &self.camera.frustum;
        let checks = [
            (self.camera.window_dist > 0.0, "window_dist must be positive"),
            (f.left < f.right, "frustum left must be less than right"),
            (f.bottom < f.top, "frustum bottom must be less than top"),
            (f.near < f.far, "frustum near must be less than far"),
            (self.highlight_scale > 0.0, "highlight_scale must be positive"),
            (self.object_translate_step > 0.0, "object_translate_step must be positive"),
            (self.object_rotate_step > 0.0, "object_rotate_step must be positive"),
            (self.camera_move_step > 0.0, "camera_move_step must be positive"),
            (self.camera_turn_step > 0.0, "camera_turn_step must be positive"),
        ];
        if let Some((_, message)) = checks.iter().find(|(ok, _)| !ok) {
            return Err(SceneError::Config(message.to_string()));
        }
        // a basis must exist or no frame can be projected
        self.camera.to_camera().basis().map_err(|_| {
            SceneError::Config("camera lookat must be non-zero and not parallel to up".to_string())
        })?;
        Ok(())
    }

    pub fn light(&self) -> Point3<f32> {
        Point3::from(self.light_position)
    }

    pub fn edit_steps(&self) -> EditSteps {
        EditSteps {
            translate: self.object_translate_step,
            rotate: self.object_rotate_step.to_radians(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        ViewerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(r#"{"highlight_scale": 1.5, "lighting": {"specular": "ungated"}}"#).unwrap();
        assert_eq!(config.highlight_scale, 1.5);
        assert_eq!(config.lighting.specular, crate::lighting::SpecularPolicy::Ungated);
        assert!(config.lighting.clamp_color);
        assert_eq!(config.camera.eye, [0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_inverted_frustum_rejected() {
        let text = r#"{"camera": {"frustum": {"left": 1, "right": -1, "bottom": -1, "top": 1, "near": 0.1, "far": 10}}}"#;
        assert!(matches!(ViewerConfig::from_json(text), Err(SceneError::Config(_))));
    }

    #[test]
    fn test_parallel_camera_up_rejected() {
        let text = r#"{"camera": {"lookat": [0, 1, 0], "up": [0, 2, 0]}}"#;
        assert!(matches!(ViewerConfig::from_json(text), Err(SceneError::Config(_))));
    }

    #[test]
    fn test_zero_lookat_rejected() {
        let mut config = ViewerConfig::default();
        config.camera.lookat = [0.0; 3];
        assert!(matches!(config.validate(), Err(SceneError::Config(_))));
    }

    #[test]
    fn test_camera_round_trip() {
        let camera = ViewerConfig::default().camera.to_camera();
        assert_eq!(camera, CameraState::default());
    }
}
