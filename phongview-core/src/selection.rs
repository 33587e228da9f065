/// Per-set object transforms and the selection/highlight state machine
use log::debug;
use nalgebra::{Matrix4, Point3};

use crate::camera::{Axis, CameraState};
use crate::error::GeometryError;
use crate::math;
use crate::scene::Scene;
use crate::transform::Transform;

/// Direction of travel along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn apply(self, magnitude: f32) -> f32 {
        match self {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        }
    }
}

/// Selection cycling direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// An incremental edit of the selected object, along or about a camera axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectEdit {
    Translate(Axis, Sign),
    Rotate(Axis, Sign),
}

/// Which set, if any, is selected. A selected set is always highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Highlighted(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Unselected => None,
            Selection::Highlighted(i) => Some(i),
        }
    }
}

/// Step magnitudes for object edits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditSteps {
    pub translate: f32,
    /// Radians
    pub rotate: f32,
}

/// Accumulated transform per triangle set plus the current selection.
///
/// Every mutation returns the set indices whose transform changed so the
/// caller can invalidate their shaded caches.
#[derive(Debug, Clone)]
pub struct ObjectState {
    transforms: Vec<Matrix4<f32>>,
    selection: Selection,
    highlight_scale: f32,
}

impl ObjectState {
    pub fn new(set_count: usize, highlight_scale: f32) -> Self {
        Self {
            transforms: vec![Matrix4::identity(); set_count],
            selection: Selection::Unselected,
            highlight_scale,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn transform(&self, set: usize) -> Option<&Matrix4<f32>> {
        self.transforms.get(set)
    }

    pub fn transforms(&self) -> &[Matrix4<f32>] {
        &self.transforms
    }

    /// Mean of the set's vertices under its current transform
    pub fn centroid(&self, scene: &Scene, set: usize) -> Option<Point3<f32>> {
        let transform = self.transforms.get(set)?;
        math::centroid(scene.sets.get(set)?.transformed_vertices(transform))
    }

    fn scale_about_centroid(&mut self, scene: &Scene, set: usize, factor: f32) {
        if let Some(center) = self.centroid(scene, set) {
            self.transforms[set] =
                Transform::compose_about(&self.transforms[set], &center, &Transform::scale_matrix(factor));
        }
    }

    /// Move the selection to the next or previous set.
    ///
    /// "Unselected" is a stop on the ring between the last and first set, so
    /// stepping forward from the last set deselects, and stepping back from
    /// "Unselected" lands on the last set.
    pub fn cycle(&mut self, scene: &Scene, direction: Direction) -> Vec<usize> {
        let count = scene.len().min(self.transforms.len());
        if count == 0 {
            return Vec::new();
        }
        let mut dirty = self.deselect(scene);

        let current = dirty.first().map_or(-1, |&i| i as isize);
        let step = match direction {
            Direction::Next => 1,
            Direction::Previous => -1,
        };
        let ring = count as isize + 1;
        let landed = (current + 1 + step).rem_euclid(ring) - 1;

        if landed >= 0 {
            let set = landed as usize;
            self.scale_about_centroid(scene, set, self.highlight_scale);
            self.selection = Selection::Highlighted(set);
            if !dirty.contains(&set) {
                dirty.push(set);
            }
        }
        debug!("selection: {:?}", self.selection);
        dirty
    }

    /// Drop the selection, undoing its highlight scale
    pub fn deselect(&mut self, scene: &Scene) -> Vec<usize> {
        match self.selection {
            Selection::Unselected => Vec::new(),
            Selection::Highlighted(set) => {
                self.scale_about_centroid(scene, set, 1.0 / self.highlight_scale);
                self.selection = Selection::Unselected;
                vec![set]
            }
        }
    }

    /// Apply an edit to the selected set about its centroid.
    ///
    /// The edit is expressed in the camera frame, conjugated by the centroid of
    /// the current transform, and left-multiplied onto the accumulated
    /// transform. Without a selection this is a no-op and the camera is not
    /// consulted. On error the transform is left untouched.
    pub fn edit(
        &mut self,
        scene: &Scene,
        camera: &CameraState,
        edit: ObjectEdit,
        steps: &EditSteps,
    ) -> Result<Option<usize>, GeometryError> {
        let Some(set) = self.selection.index() else {
            return Ok(None);
        };
        let Some(center) = self.centroid(scene, set) else {
            return Ok(None);
        };
        let basis = camera.basis()?;
        let delta = match edit {
            ObjectEdit::Translate(axis, sign) => {
                Transform::translation_matrix(&(basis.axis(axis) * sign.apply(steps.translate)))
            }
            ObjectEdit::Rotate(axis, sign) => {
                Transform::rotation_matrix(&basis.axis(axis), sign.apply(steps.rotate))?
            }
        };
        self.transforms[set] = Transform::compose_about(&self.transforms[set], &center, &delta);
        debug!("edited set {}: {:?}", set, edit);
        Ok(Some(set))
    }
}
