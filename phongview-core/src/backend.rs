/// Seam between the viewer core and a concrete renderer
use nalgebra::{Point3, Vector3};

use crate::camera::{CameraBasis, CameraState, Frustum};
use crate::error::FrameError;
use crate::lighting::LightingModel;

/// Per-vertex channels published each time shaded geometry changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttribute {
    Position,
    Normal,
    Ambient,
    Diffuse,
    Specular,
    Shininess,
}

impl VertexAttribute {
    pub const ALL: [VertexAttribute; 6] = [
        VertexAttribute::Position,
        VertexAttribute::Normal,
        VertexAttribute::Ambient,
        VertexAttribute::Diffuse,
        VertexAttribute::Specular,
        VertexAttribute::Shininess,
    ];

    /// Floats per vertex
    pub fn components(self) -> usize {
        match self {
            VertexAttribute::Shininess => 1,
            _ => 3,
        }
    }

    /// Shader-side attribute name
    pub fn name(self) -> &'static str {
        match self {
            VertexAttribute::Position => "vertexPosition",
            VertexAttribute::Normal => "vertexNormal",
            VertexAttribute::Ambient => "vertexAmbient",
            VertexAttribute::Diffuse => "vertexDiffuse",
            VertexAttribute::Specular => "vertexSpecular",
            VertexAttribute::Shininess => "vertexShininess",
        }
    }
}

/// Per-frame parameters: camera frame, light, window and frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub eye: Point3<f32>,
    /// Orthonormalized up
    pub up: Vector3<f32>,
    /// Unit look direction
    pub lookat: Vector3<f32>,
    pub light_pos: Point3<f32>,
    pub window_dist: f32,
    pub frustum: Frustum,
    pub lighting: LightingModel,
}

impl FrameUniforms {
    pub fn new(
        camera: &CameraState,
        light_pos: Point3<f32>,
        lighting: LightingModel,
    ) -> Result<Self, FrameError> {
        let basis = camera.basis()?;
        Ok(Self {
            eye: basis.eye,
            up: basis.up,
            lookat: basis.forward,
            light_pos,
            window_dist: camera.window_dist,
            frustum: camera.frustum,
            lighting,
        })
    }

    /// Camera basis implied by these uniforms
    pub fn basis(&self) -> CameraBasis {
        CameraBasis {
            eye: self.eye,
            forward: self.lookat,
            up: self.up,
            right: self.lookat.cross(&self.up),
        }
    }
}

/// Operations a renderer exposes to the frame loop
pub trait RenderBackend {
    fn clear(&mut self) -> Result<(), FrameError>;

    /// Replace the array bound to `attribute`; `data.len()` is a multiple of
    /// `attribute.components()`.
    fn upload_vertex_attribute(
        &mut self,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<(), FrameError>;

    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), FrameError>;

    fn set_uniforms(&mut self, uniforms: &FrameUniforms) -> Result<(), FrameError>;

    /// Draw `index_count` indices of the uploaded triangle list
    fn draw(&mut self, index_count: usize) -> Result<(), FrameError>;
}
