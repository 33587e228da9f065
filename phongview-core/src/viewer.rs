/// Frame loop: input commands, lazily recomputed shaded caches, and submission
use log::{debug, trace};

use crate::backend::{FrameUniforms, RenderBackend, VertexAttribute};
use crate::camera::{Axis, CameraState, Turn};
use crate::config::ViewerConfig;
use crate::error::{FrameError, GeometryError, SceneError};
use crate::scene::Scene;
use crate::selection::{Direction, ObjectEdit, ObjectState, Selection, Sign};
use crate::shading::{self, ShadedBuffers, ShadedSet};

/// Input events the viewer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CycleSelection(Direction),
    Deselect,
    EditObject(ObjectEdit),
    MoveCamera(Axis, Sign),
    TurnCamera(Turn),
}

/// Summary of one submitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub vertex_count: usize,
    /// Whether vertex/index arrays were re-sent this frame
    pub uploaded: bool,
}

/// Owns the scene, camera, object transforms and shaded caches
pub struct Viewer {
    scene: Scene,
    config: ViewerConfig,
    camera: CameraState,
    objects: ObjectState,
    caches: Vec<Option<ShadedSet>>,
    buffers: ShadedBuffers,
    upload_pending: bool,
    frame_count: u64,
}

impl Viewer {
    /// Build a viewer over `scene`; fails if `config` does not validate
    pub fn new(scene: Scene, config: ViewerConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let count = scene.len();
        Ok(Self {
            camera: config.camera.to_camera(),
            objects: ObjectState::new(count, config.highlight_scale),
            caches: vec![None; count],
            buffers: ShadedBuffers::default(),
            upload_pending: true,
            frame_count: 0,
            scene,
            config,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn objects(&self) -> &ObjectState {
        &self.objects
    }

    pub fn selection(&self) -> Selection {
        self.objects.selection()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Cached shading for `set`, `None` until computed or after invalidation
    pub fn shaded(&self, set: usize) -> Option<&ShadedSet> {
        self.caches.get(set).and_then(Option::as_ref)
    }

    /// Arrays last built from the caches
    pub fn buffers(&self) -> &ShadedBuffers {
        &self.buffers
    }

    /// Mark a set's shaded vertices stale
    pub fn invalidate(&mut self, set: usize) {
        if let Some(cache) = self.caches.get_mut(set) {
            *cache = None;
        }
    }

    fn invalidate_all(&mut self, sets: &[usize]) {
        for &set in sets {
            self.invalidate(set);
        }
    }

    /// Apply one input event synchronously
    pub fn dispatch(&mut self, command: Command) -> Result<(), GeometryError> {
        debug!("dispatch {:?}", command);
        match command {
            Command::CycleSelection(direction) => {
                let dirty = self.objects.cycle(&self.scene, direction);
                self.invalidate_all(&dirty);
            }
            Command::Deselect => {
                let dirty = self.objects.deselect(&self.scene);
                self.invalidate_all(&dirty);
            }
            Command::EditObject(edit) => {
                let steps = self.config.edit_steps();
                if let Some(set) = self.objects.edit(&self.scene, &self.camera, edit, &steps)? {
                    self.invalidate(set);
                }
            }
            Command::MoveCamera(axis, sign) => {
                self.camera
                    .move_along(axis, sign.apply(self.config.camera_move_step))?;
            }
            Command::TurnCamera(turn) => {
                self.camera
                    .turn(turn, self.config.camera_turn_step.to_radians())?;
            }
        }
        Ok(())
    }

    /// Recompute every stale cache; returns whether anything was recomputed
    pub fn refresh_caches(&mut self) -> bool {
        let mut changed = false;
        for (index, cache) in self.caches.iter_mut().enumerate() {
            if cache.is_none() {
                let transform = self.objects.transforms()[index];
                let shaded = shading::shade_set(&self.scene.sets[index], &transform);
                trace!("reshaded set {}: {} triangles", index, shaded.triangle_count());
                *cache = Some(shaded);
                changed = true;
            }
        }
        if changed {
            self.buffers = ShadedBuffers::from_sets(self.caches.iter().flatten());
            self.upload_pending = true;
        }
        changed
    }

    pub fn uniforms(&self) -> Result<FrameUniforms, FrameError> {
        FrameUniforms::new(&self.camera, self.config.light(), self.config.lighting)
    }

    /// One tick: clear, refresh stale caches, upload if needed, set uniforms, draw
    pub fn frame<B: RenderBackend + ?Sized>(
        &mut self,
        backend: &mut B,
    ) -> Result<FrameStats, FrameError> {
        backend.clear()?;
        self.refresh_caches();

        let uploaded = self.upload_pending;
        if self.upload_pending {
            for attribute in VertexAttribute::ALL {
                backend.upload_vertex_attribute(attribute, self.attribute_data(attribute))?;
            }
            backend.upload_indices(&self.buffers.indices)?;
            self.upload_pending = false;
        }

        backend.set_uniforms(&self.uniforms()?)?;
        backend.draw(self.buffers.indices.len())?;

        self.frame_count += 1;
        Ok(FrameStats {
            frame: self.frame_count,
            vertex_count: self.buffers.vertex_count(),
            uploaded,
        })
    }

    fn attribute_data(&self, attribute: VertexAttribute) -> &[f32] {
        match attribute {
            VertexAttribute::Position => &self.buffers.positions,
            VertexAttribute::Normal => &self.buffers.normals,
            VertexAttribute::Ambient => &self.buffers.ambient,
            VertexAttribute::Diffuse => &self.buffers.diffuse,
            VertexAttribute::Specular => &self.buffers.specular,
            VertexAttribute::Shininess => &self.buffers.shininess,
        }
    }
}
