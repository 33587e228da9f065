/// Scene model: triangle sets with one material each
use std::path::Path;

use log::info;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Phong material shared by every triangle of one set.
///
/// Colors are conventionally in `[0, 1]` but are not clamped here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMaterial", into = "RawMaterial")]
pub struct Material {
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    pub fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            ambient: Vector3::from(ambient),
            diffuse: Vector3::from(diffuse),
            specular: Vector3::from(specular),
            shininess,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new([0.1, 0.1, 0.1], [0.6, 0.6, 0.6], [0.3, 0.3, 0.3], 10.0)
    }
}

#[derive(Serialize, Deserialize)]
struct RawMaterial {
    ambient: [f32; 3],
    diffuse: [f32; 3],
    specular: [f32; 3],
    n: f32,
}

impl From<RawMaterial> for Material {
    fn from(raw: RawMaterial) -> Self {
        Self::new(raw.ambient, raw.diffuse, raw.specular, raw.n)
    }
}

impl From<Material> for RawMaterial {
    fn from(m: Material) -> Self {
        Self {
            ambient: m.ambient.into(),
            diffuse: m.diffuse.into(),
            specular: m.specular.into(),
            n: m.shininess,
        }
    }
}

/// Raw triangle set record as it appears in the scene description
#[derive(Serialize, Deserialize)]
struct RawTriangleSet {
    material: Material,
    vertices: Vec<[f32; 3]>,
    triangles: Vec<[u32; 3]>,
}

/// A group of triangles sharing one material.
///
/// Immutable once loaded; object edits live in a separate transform per set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTriangleSet", into = "RawTriangleSet")]
pub struct TriangleSet {
    pub vertices: Vec<Point3<f32>>,
    pub triangles: Vec<[u32; 3]>,
    pub material: Material,
}

impl From<RawTriangleSet> for TriangleSet {
    fn from(raw: RawTriangleSet) -> Self {
        Self {
            vertices: raw.vertices.into_iter().map(Point3::from).collect(),
            triangles: raw.triangles,
            material: raw.material,
        }
    }
}

impl From<TriangleSet> for RawTriangleSet {
    fn from(set: TriangleSet) -> Self {
        Self {
            material: set.material,
            vertices: set.vertices.iter().map(|p| [p.x, p.y, p.z]).collect(),
            triangles: set.triangles,
        }
    }
}

impl TriangleSet {
    pub fn new(vertices: Vec<Point3<f32>>, triangles: Vec<[u32; 3]>, material: Material) -> Self {
        Self {
            vertices,
            triangles,
            material,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex positions of every vertex in the set after applying `transform`
    pub fn transformed_vertices<'a>(
        &'a self,
        transform: &'a Matrix4<f32>,
    ) -> impl Iterator<Item = Point3<f32>> + 'a {
        self.vertices.iter().map(move |p| transform.transform_point(p))
    }

    /// Corners of triangle `index` in winding order after applying `transform`
    ///
    /// Indices are assumed valid; see [`Scene::validate`].
    pub fn triangle_positions(&self, index: usize, transform: &Matrix4<f32>) -> [Point3<f32>; 3] {
        let [a, b, c] = self.triangles[index];
        [
            transform.transform_point(&self.vertices[a as usize]),
            transform.transform_point(&self.vertices[b as usize]),
            transform.transform_point(&self.vertices[c as usize]),
        ]
    }

    /// Axis-aligned cube centered on `center`, two triangles per face
    pub fn cube(center: Point3<f32>, size: f32, material: Material) -> Self {
        let h = size / 2.0;
        let corner = |x: f32, y: f32, z: f32| center + Vector3::new(x * h, y * h, z * h);
        let vertices = vec![
            corner(-1.0, -1.0, -1.0),
            corner(1.0, -1.0, -1.0),
            corner(1.0, 1.0, -1.0),
            corner(-1.0, 1.0, -1.0),
            corner(-1.0, -1.0, 1.0),
            corner(1.0, -1.0, 1.0),
            corner(1.0, 1.0, 1.0),
            corner(-1.0, 1.0, 1.0),
        ];
        let triangles = vec![
            // Front (z-)
            [0, 2, 1],
            [0, 3, 2],
            // Back (z+)
            [4, 5, 6],
            [4, 6, 7],
            // Top
            [3, 7, 6],
            [3, 6, 2],
            // Bottom
            [0, 1, 5],
            [0, 5, 4],
            // Right
            [1, 2, 6],
            [1, 6, 5],
            // Left
            [0, 4, 7],
            [0, 7, 3],
        ];
        Self::new(vertices, triangles, material)
    }
}

/// Every triangle set of a loaded scene, in description order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub sets: Vec<TriangleSet>,
}

impl Scene {
    /// Build a scene from already constructed sets, validating them
    pub fn new(sets: Vec<TriangleSet>) -> Result<Self, SceneError> {
        let scene = Self { sets };
        scene.validate()?;
        Ok(scene)
    }

    /// Parse the JSON scene description: an array of triangle set records
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let sets: Vec<TriangleSet> = serde_json::from_str(text)?;
        let scene = Self::new(sets)?;
        info!(
            "loaded scene: {} sets, {} triangles",
            scene.sets.len(),
            scene.triangle_count()
        );
        Ok(scene)
    }

    /// Load a JSON scene description from disk
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize back to the scene description format
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.sets)?)
    }

    /// Check every index triple and material exponent
    pub fn validate(&self) -> Result<(), SceneError> {
        for (set_index, set) in self.sets.iter().enumerate() {
            let n = set.material.shininess;
            if !(n.is_finite() && n > 0.0) {
                return Err(SceneError::InvalidExponent { set: set_index, n });
            }
            let vertex_count = set.vertices.len();
            for (tri_index, tri) in set.triangles.iter().enumerate() {
                if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertex_count) {
                    return Err(SceneError::IndexOutOfRange {
                        set: set_index,
                        triangle: tri_index,
                        index: bad,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.sets.iter().map(TriangleSet::triangle_count).sum()
    }

    /// Concatenate all sets into one shared-vertex buffer pair.
    ///
    /// Each set's index triples are offset by the number of vertices emitted
    /// before it, so the result can be drawn with a single indexed call.
    pub fn flatten_indexed(&self) -> (Vec<f32>, Vec<u32>) {
        let mut coords = Vec::new();
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);
        for set in &self.sets {
            let offset = (coords.len() / 3) as u32;
            for p in &set.vertices {
                coords.extend_from_slice(&[p.x, p.y, p.z]);
            }
            for tri in &set.triangles {
                indices.extend(tri.iter().map(|i| i + offset));
            }
        }
        (coords, indices)
    }
}
