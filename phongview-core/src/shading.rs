/// Flat-shading preprocessor: one normal per triangle, no shared vertices
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::GeometryError;
use crate::math;
use crate::scene::{Material, TriangleSet};

/// A vertex instance owned by exactly one triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadedVertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub material: Material,
}

/// Unit face normal of a triangle, `normalize((v2 - v0) x (v1 - v0))`
pub fn flat_normal(corners: &[Point3<f32>; 3]) -> Result<Vector3<f32>, GeometryError> {
    let a = corners[2] - corners[0];
    let b = corners[1] - corners[0];
    math::try_normalize(&a.cross(&b), "collinear triangle")
}

/// Shade one triangle of `set` under `transform`
pub fn shade_triangle(
    set: &TriangleSet,
    index: usize,
    transform: &Matrix4<f32>,
) -> Result<[ShadedVertex; 3], GeometryError> {
    let corners = set.triangle_positions(index, transform);
    let normal = flat_normal(&corners)?;
    Ok(corners.map(|position| ShadedVertex {
        position,
        normal,
        material: set.material,
    }))
}

/// Shaded vertices of one triangle set, three per emitted triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadedSet {
    pub vertices: Vec<ShadedVertex>,
    /// Triangles dropped because their normal was degenerate
    pub skipped: usize,
}

impl ShadedSet {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Shade every triangle of `set`, skipping degenerate ones
pub fn shade_set(set: &TriangleSet, transform: &Matrix4<f32>) -> ShadedSet {
    let mut shaded = ShadedSet {
        vertices: Vec::with_capacity(set.triangle_count() * 3),
        skipped: 0,
    };
    for index in 0..set.triangle_count() {
        match shade_triangle(set, index, transform) {
            Ok(vertices) => shaded.vertices.extend_from_slice(&vertices),
            Err(e) => {
                warn!("skipping triangle {}: {}", index, e);
                shaded.skipped += 1;
            }
        }
    }
    shaded
}

/// Flat per-vertex attribute arrays ready for upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadedBuffers {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub ambient: Vec<f32>,
    pub diffuse: Vec<f32>,
    pub specular: Vec<f32>,
    pub shininess: Vec<f32>,
    pub indices: Vec<u32>,
}

impl ShadedBuffers {
    /// Concatenate shaded sets in order; indices are sequential since no
    /// vertex is shared.
    pub fn from_sets<'a, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'a ShadedSet>,
    {
        let mut buffers = Self::default();
        for set in sets {
            for v in &set.vertices {
                buffers.push(v);
            }
        }
        buffers.indices = (0..buffers.vertex_count() as u32).collect();
        buffers
    }

    fn push(&mut self, v: &ShadedVertex) {
        self.positions.extend_from_slice(&[v.position.x, v.position.y, v.position.z]);
        self.normals.extend_from_slice(v.normal.as_slice());
        self.ambient.extend_from_slice(v.material.ambient.as_slice());
        self.diffuse.extend_from_slice(v.material.diffuse.as_slice());
        self.specular.extend_from_slice(v.material.specular.as_slice());
        self.shininess.push(v.material.shininess);
    }

    pub fn vertex_count(&self) -> usize {
        self.shininess.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> TriangleSet {
        TriangleSet::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            Material::default(),
        )
    }

    #[test]
    fn test_flat_normal_winding() {
        let set = unit_triangle();
        let corners = set.triangle_positions(0, &Matrix4::identity());
        let n = flat_normal(&corners).unwrap();
        assert!((n - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
        assert!((n.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_shared_vertices_are_duplicated() {
        let quad = TriangleSet::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            Material::default(),
        );
        let shaded = shade_set(&quad, &Matrix4::identity());
        assert_eq!(shaded.vertices.len(), 6);
        assert_eq!(shaded.skipped, 0);
        // vertex 0 appears in both triangles with different normals
        assert_eq!(shaded.vertices[0].position, shaded.vertices[3].position);
        assert!((shaded.vertices[0].normal - shaded.vertices[3].normal).norm() > 1e-3);
    }

    #[test]
    fn test_collinear_triangle_skipped() {
        let set = TriangleSet::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 1, 3]],
            Material::default(),
        );
        assert!(shade_triangle(&set, 0, &Matrix4::identity()).is_err());
        let shaded = shade_set(&set, &Matrix4::identity());
        assert_eq!(shaded.skipped, 1);
        assert_eq!(shaded.triangle_count(), 1);
    }

    #[test]
    fn test_transform_applied_before_normal() {
        let set = unit_triangle();
        let shift = Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0));
        let shaded = shade_set(&set, &shift);
        assert!((shaded.vertices[0].position.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_buffers_layout() {
        let shaded = shade_set(&unit_triangle(), &Matrix4::identity());
        let buffers = ShadedBuffers::from_sets([&shaded, &shaded]);
        assert_eq!(buffers.vertex_count(), 6);
        assert_eq!(buffers.positions.len(), 18);
        assert_eq!(buffers.normals.len(), 18);
        assert_eq!(buffers.diffuse.len(), 18);
        assert_eq!(buffers.indices, vec![0, 1, 2, 3, 4, 5]);
    }
}
