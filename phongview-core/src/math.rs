/// Vector helpers shared by the camera, shading and selection code
use nalgebra::{Point3, Unit, Vector3};

use crate::error::GeometryError;

/// Vectors shorter than this are treated as zero-length.
pub const MIN_NORM: f32 = 1e-7;

/// Normalize `v`, reporting `what` as degenerate when it has no direction.
pub fn try_normalize(v: &Vector3<f32>, what: &'static str) -> Result<Vector3<f32>, GeometryError> {
    v.try_normalize(MIN_NORM)
        .ok_or(GeometryError::DegenerateGeometry(what))
}

/// Like [`try_normalize`] but keeps the unit-length guarantee in the type.
pub fn try_unit(v: &Vector3<f32>, what: &'static str) -> Result<Unit<Vector3<f32>>, GeometryError> {
    Unit::try_new(*v, MIN_NORM).ok_or(GeometryError::DegenerateGeometry(what))
}

/// `a + b * s`
pub fn scale_add(a: &Vector3<f32>, b: &Vector3<f32>, s: f32) -> Vector3<f32> {
    a + b * s
}

/// Remove the component of `v` along the unit vector `onto`.
pub fn reject(v: &Vector3<f32>, onto: &Vector3<f32>) -> Vector3<f32> {
    v - onto * v.dot(onto)
}

/// Length of the projection of `v` onto `axis`, for an axis of any length.
pub fn component_along(v: &Vector3<f32>, axis: &Vector3<f32>) -> f32 {
    v.dot(axis) / axis.dot(axis)
}

/// Map `value` from `[low, high]` to `[-1, 1]`.
pub fn to_ndc(value: f32, low: f32, high: f32) -> f32 {
    2.0 * (value - low) / (high - low) - 1.0
}

/// Arithmetic mean of a point cloud, `None` when empty.
pub fn centroid<I>(points: I) -> Option<Point3<f32>>
where
    I: IntoIterator<Item = Point3<f32>>,
{
    let mut sum = Vector3::zeros();
    let mut count = 0usize;
    for p in points {
        sum += p.coords;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(Point3::from(sum / count as f32))
    }
}

/// Component-wise clamp of a color to `[0, 1]`.
pub fn clamp_unit(c: &Vector3<f32>) -> Vector3<f32> {
    c.map(|x| x.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_degenerate() {
        let err = try_normalize(&Vector3::zeros(), "normal").unwrap_err();
        assert_eq!(err, GeometryError::DegenerateGeometry("normal"));
    }

    #[test]
    fn test_reject_leaves_orthogonal_part() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        let z = Vector3::z();
        let r = reject(&v, &z);
        assert!(r.dot(&z).abs() < 1e-6);
        assert!((r - Vector3::new(1.0, 2.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_to_ndc_bounds() {
        assert!((to_ndc(-0.5, -0.5, 0.5) + 1.0).abs() < 1e-6);
        assert!((to_ndc(0.5, -0.5, 0.5) - 1.0).abs() < 1e-6);
        assert!(to_ndc(0.0, -0.5, 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_centroid() {
        let c = centroid(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 3.0, 0.0),
        ])
        .unwrap();
        assert!((c - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-6);
        assert!(centroid(Vec::new()).is_none());
    }

    #[test]
    fn test_component_along_unnormalized_axis() {
        let v = Vector3::new(3.0, 0.0, 0.0);
        assert!((component_along(&v, &Vector3::new(2.0, 0.0, 0.0)) - 1.5).abs() < 1e-6);
    }
}
