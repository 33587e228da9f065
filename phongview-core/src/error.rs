/// Error types for scene loading, geometry and frame submission
use thiserror::Error;

/// A geometric precondition was violated at the point of computation.
///
/// Raised instead of letting NaN or infinity flow into the frame: normalizing a
/// zero-length vector, or dividing by a zero distance along the view direction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
}

/// Failures while reading or validating a scene description
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("set {set}, triangle {triangle}: index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        set: usize,
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("set {set}: specular exponent must be positive and finite, got {n}")]
    InvalidExponent { set: usize, n: f32 },

    #[error("invalid STL data: {0}")]
    Stl(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failures raised while producing or submitting a frame
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("render backend: {0}")]
    Backend(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
