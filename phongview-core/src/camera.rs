/// Camera basis construction and planar perspective projection
use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::math;

/// One of the three camera-relative directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Right,
    Up,
    Lookat,
}

/// View volume bounds: window-plane extents plus depth range along the view direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            left: -0.5,
            right: 0.5,
            bottom: -0.5,
            top: 0.5,
            near: 0.1,
            far: 10.0,
        }
    }
}

/// Orthonormal camera frame derived from the stored eye/lookat/up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub eye: Point3<f32>,
    pub forward: Vector3<f32>,
    pub up: Vector3<f32>,
    pub right: Vector3<f32>,
}

impl CameraBasis {
    /// Build `(right, up', forward)` from a look direction and an approximate up.
    ///
    /// `up` must not be parallel to `lookat`; if it is, the orthogonalized up
    /// has no length and `DegenerateGeometry` is returned.
    pub fn new(
        eye: Point3<f32>,
        lookat: &Vector3<f32>,
        up: &Vector3<f32>,
    ) -> Result<Self, GeometryError> {
        let forward = math::try_normalize(lookat, "zero-length look direction")?;
        let up = math::try_normalize(&math::reject(up, &forward), "up parallel to look direction")?;
        let right = forward.cross(&up);
        Ok(Self {
            eye,
            forward,
            up,
            right,
        })
    }

    pub fn axis(&self, axis: Axis) -> Vector3<f32> {
        match axis {
            Axis::Right => self.right,
            Axis::Up => self.up,
            Axis::Lookat => self.forward,
        }
    }

    /// Distance of `point` from the eye, measured along the view direction
    pub fn depth(&self, point: &Point3<f32>) -> f32 {
        math::component_along(&(point - self.eye), &self.forward)
    }

    /// Map a world-space point into normalized device coordinates.
    ///
    /// The point is projected through the eye onto the window plane at
    /// `window_dist`, split into right/up components and remapped from the
    /// frustum bounds to `[-1, 1]`. Depth is remapped from the distance along
    /// the view direction. No clipping is done; points outside the frustum
    /// land outside `[-1, 1]`.
    pub fn project(
        &self,
        point: &Point3<f32>,
        window_dist: f32,
        frustum: &Frustum,
    ) -> Result<Point3<f32>, GeometryError> {
        let relative = point - self.eye;
        let dist_along_lookat = math::component_along(&relative, &self.forward);
        if dist_along_lookat.abs() < math::MIN_NORM {
            return Err(GeometryError::DegenerateGeometry("point in the eye plane"));
        }
        let projected = relative / dist_along_lookat * window_dist;
        let dist_along_up = math::component_along(&projected, &self.up);
        let dist_along_right = math::component_along(&projected, &self.right);

        Ok(Point3::new(
            math::to_ndc(dist_along_right, frustum.left, frustum.right),
            math::to_ndc(dist_along_up, frustum.bottom, frustum.top),
            math::to_ndc(dist_along_lookat, frustum.near, frustum.far),
        ))
    }
}

/// First-person camera controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    YawLeft,
    YawRight,
    PitchUp,
    PitchDown,
}

/// Mutable camera state.
///
/// `lookat` and `up` are stored as given and re-orthonormalized on every use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub eye: Point3<f32>,
    pub lookat: Vector3<f32>,
    pub up: Vector3<f32>,
    pub window_dist: f32,
    pub frustum: Frustum,
}

impl CameraState {
    pub fn basis(&self) -> Result<CameraBasis, GeometryError> {
        CameraBasis::new(self.eye, &self.lookat, &self.up)
    }

    /// Project a world-space point with the current basis
    pub fn project(&self, point: &Point3<f32>) -> Result<Point3<f32>, GeometryError> {
        self.basis()?.project(point, self.window_dist, &self.frustum)
    }

    /// Move the eye by `amount` along one of the current basis axes
    pub fn move_along(&mut self, axis: Axis, amount: f32) -> Result<(), GeometryError> {
        let basis = self.basis()?;
        self.eye = Point3::from(math::scale_add(&self.eye.coords, &basis.axis(axis), amount));
        Ok(())
    }

    /// Turn the view by `angle` radians.
    ///
    /// Yaw rotates the look direction about up. Pitch rotates both look
    /// direction and up about right, so the two stay consistent.
    pub fn turn(&mut self, turn: Turn, angle: f32) -> Result<(), GeometryError> {
        let basis = self.basis()?;
        match turn {
            Turn::YawLeft | Turn::YawRight => {
                let signed = if turn == Turn::YawLeft { angle } else { -angle };
                let axis = math::try_unit(&basis.up, "yaw axis")?;
                let rotation = Rotation3::from_axis_angle(&axis, signed);
                self.lookat = rotation * self.lookat;
            }
            Turn::PitchUp | Turn::PitchDown => {
                let signed = if turn == Turn::PitchUp { angle } else { -angle };
                let axis = math::try_unit(&basis.right, "pitch axis")?;
                let rotation = Rotation3::from_axis_angle(&axis, signed);
                self.lookat = rotation * self.lookat;
                self.up = rotation * self.up;
            }
        }
        Ok(())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            eye: Point3::new(0.5, 0.5, -0.5),
            lookat: Vector3::new(0.0, 0.0, 1.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            window_dist: 0.5,
            frustum: Frustum::default(),
        }
    }
}
