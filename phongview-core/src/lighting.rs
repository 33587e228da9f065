/// Phong reflection with double-sided normals
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::math;
use crate::scene::Material;

/// Whether the specular term requires a lit (positive diffuse) surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecularPolicy {
    /// Specular only when `N . L > 0`
    #[default]
    Gated,
    /// Specular whenever `N . H > 0`, even on the unlit side
    Ungated,
}

/// Knobs of the reflection model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingModel {
    pub specular: SpecularPolicy,
    pub clamp_color: bool,
}

impl Default for LightingModel {
    fn default() -> Self {
        Self {
            specular: SpecularPolicy::Gated,
            clamp_color: true,
        }
    }
}

/// Evaluate Phong lighting at one shaded point.
///
/// The normal is renormalized and flipped toward the eye when it faces away,
/// so both sides of a triangle are lit. Specular uses the half vector between
/// the eye and light directions.
pub fn phong(
    normal: &Vector3<f32>,
    position: &Point3<f32>,
    material: &Material,
    light: &Point3<f32>,
    eye: &Point3<f32>,
    model: &LightingModel,
) -> Result<Vector3<f32>, GeometryError> {
    let mut n = math::try_normalize(normal, "zero-length shading normal")?;
    let to_light = math::try_normalize(&(light - position), "light at shaded point")?;
    let to_eye = math::try_normalize(&(eye - position), "eye at shaded point")?;

    if n.dot(&to_eye) < 0.0 {
        n = -n;
    }

    let mut color = material.ambient;
    let diff = n.dot(&to_light);
    if diff > 0.0 {
        color += material.diffuse * diff;
    }
    if diff > 0.0 || model.specular == SpecularPolicy::Ungated {
        // eye and light exactly opposed leave no half vector
        if let Some(half) = (to_eye + to_light).try_normalize(math::MIN_NORM) {
            let spec = n.dot(&half);
            if spec > 0.0 {
                color += material.specular * spec.powf(material.shininess);
            }
        }
    }

    Ok(if model.clamp_color {
        math::clamp_unit(&color)
    } else {
        color
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Material {
        Material::new([0.1, 0.1, 0.1], [0.5, 0.5, 0.5], [0.2, 0.2, 0.2], 8.0)
    }

    #[test]
    fn test_double_sided() {
        let p = Point3::new(0.5, 0.5, 0.75);
        let eye = Point3::new(0.5, 0.5, -0.5);
        let light = Point3::new(-0.5, 1.5, -0.5);
        let model = LightingModel::default();
        let away = Vector3::new(0.0, 0.0, 1.0);
        let a = phong(&away, &p, &material(), &light, &eye, &model).unwrap();
        let b = phong(&-away, &p, &material(), &light, &eye, &model).unwrap();
        assert!((a - b).norm() < 1e-6);
        assert!(a.x > 0.1);
    }

    #[test]
    fn test_light_behind_surface_gets_ambient_only() {
        let p = Point3::origin();
        let eye = Point3::new(0.0, 0.0, -1.0);
        let light = Point3::new(0.0, 0.0, 1.0);
        let color = phong(
            &Vector3::z(),
            &p,
            &material(),
            &light,
            &eye,
            &LightingModel::default(),
        )
        .unwrap();
        assert!((color - Vector3::new(0.1, 0.1, 0.1)).norm() < 1e-6);
    }

    #[test]
    fn test_ungated_specular_on_unlit_side() {
        // Light grazes just behind the surface while the half vector still
        // leans toward the eye-facing normal.
        let p = Point3::origin();
        let eye = Point3::new(0.0, 0.0, -1.0);
        let light = Point3::new(1.0, 0.0, 0.05);
        let gated = phong(
            &Vector3::z(),
            &p,
            &material(),
            &light,
            &eye,
            &LightingModel::default(),
        )
        .unwrap();
        let ungated = phong(
            &Vector3::z(),
            &p,
            &material(),
            &light,
            &eye,
            &LightingModel {
                specular: SpecularPolicy::Ungated,
                clamp_color: true,
            },
        )
        .unwrap();
        assert!((gated - material().ambient).norm() < 1e-6);
        assert!(ungated.x > gated.x);
    }

    #[test]
    fn test_clamp() {
        let bright = Material::new([0.9, 0.9, 0.9], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], 1.0);
        let p = Point3::origin();
        let eye = Point3::new(0.0, 0.0, -1.0);
        let clamped = phong(&Vector3::z(), &p, &bright, &eye, &eye, &LightingModel::default()).unwrap();
        assert!(clamped.iter().all(|&c| c <= 1.0));
        let raw = phong(
            &Vector3::z(),
            &p,
            &bright,
            &eye,
            &eye,
            &LightingModel {
                clamp_color: false,
                ..LightingModel::default()
            },
        )
        .unwrap();
        assert!(raw.x > 1.0);
    }

    #[test]
    fn test_zero_normal_is_degenerate() {
        let p = Point3::origin();
        let eye = Point3::new(0.0, 0.0, -1.0);
        let result = phong(&Vector3::zeros(), &p, &material(), &eye, &eye, &LightingModel::default());
        assert!(result.is_err());
    }
}
