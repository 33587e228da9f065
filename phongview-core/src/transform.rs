/// 4x4 affine transform builders for object edits
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::GeometryError;
use crate::math;

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a translation matrix
    pub fn translation_matrix(offset: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(offset)
    }

    /// Create a uniform scale matrix about the origin
    pub fn scale_matrix(factor: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(factor)
    }

    /// Create a rotation of `angle` radians about `axis` through the origin
    pub fn rotation_matrix(axis: &Vector3<f32>, angle: f32) -> Result<Matrix4<f32>, GeometryError> {
        let axis = math::try_unit(axis, "rotation axis")?;
        Ok(Matrix4::from_axis_angle(&axis, angle))
    }

    /// Conjugate `delta` so it acts about `pivot`: `T(pivot) * delta * T(-pivot)`
    pub fn about_pivot(pivot: &Point3<f32>, delta: &Matrix4<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(&pivot.coords) * delta * Matrix4::new_translation(&-pivot.coords)
    }

    /// Left-multiply a pivoted edit onto an accumulated transform
    pub fn compose_about(
        existing: &Matrix4<f32>,
        pivot: &Point3<f32>,
        delta: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        Self::about_pivot(pivot, delta) * existing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_about_pivot_keeps_pivot_fixed() {
        let pivot = Point3::new(1.0, 2.0, 3.0);
        let m = Transform::about_pivot(&pivot, &Transform::scale_matrix(1.2));
        assert!((m.transform_point(&pivot) - pivot).norm() < 1e-6);
    }

    #[test]
    fn test_rotation_about_pivot() {
        let pivot = Point3::new(1.0, 0.0, 0.0);
        let r = Transform::rotation_matrix(&Vector3::z(), std::f32::consts::FRAC_PI_2).unwrap();
        let m = Transform::about_pivot(&pivot, &r);
        let p = m.transform_point(&Point3::new(2.0, 0.0, 0.0));
        assert!((p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_zero_axis_rejected() {
        assert!(Transform::rotation_matrix(&Vector3::zeros(), 0.1).is_err());
    }

    #[test]
    fn test_compose_is_left_multiplied() {
        let existing = Transform::translation_matrix(&Vector3::new(1.0, 0.0, 0.0));
        let delta = Transform::scale_matrix(2.0);
        let m = Transform::compose_about(&existing, &Point3::origin(), &delta);
        // translate first, then scale
        let p = m.transform_point(&Point3::origin());
        assert!((p - Point3::new(2.0, 0.0, 0.0)).norm() < 1e-6);
    }
}
