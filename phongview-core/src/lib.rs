/// PhongView Core Library - viewing, shading and object-edit logic
///
/// This library turns a triangle-set scene into flat-shaded per-vertex arrays
/// and per-frame camera/light parameters for a rendering backend, and keeps
/// the interactive selection and transform state between frames.

pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod keymap;
pub mod lighting;
pub mod math;
pub mod scene;
pub mod selection;
pub mod shading;
pub mod stl;
pub mod transform;
pub mod viewer;

// Re-export commonly used types
pub use backend::{FrameUniforms, RenderBackend, VertexAttribute};
pub use camera::{Axis, CameraBasis, CameraState, Frustum, Turn};
pub use config::ViewerConfig;
pub use error::{FrameError, GeometryError, SceneError};
pub use lighting::{phong, LightingModel, SpecularPolicy};
pub use scene::{Material, Scene, TriangleSet};
pub use selection::{Direction, ObjectEdit, Selection, Sign};
pub use shading::{ShadedBuffers, ShadedSet, ShadedVertex};
pub use transform::Transform;
pub use viewer::{Command, FrameStats, Viewer};
