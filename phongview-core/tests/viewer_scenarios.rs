//! Cross-module scenarios: scene load, commands, caches and frame submission

use nalgebra::{Matrix4, Point3};
use phongview_core::{
    Axis, Command, Direction, FrameError, FrameUniforms, ObjectEdit, RenderBackend, Scene,
    SceneError, Selection, Sign, VertexAttribute, Viewer, ViewerConfig,
};

const SINGLE_TRIANGLE: &str = r#"[{
    "material": {"ambient": [0.1,0.1,0.1], "diffuse": [0.5,0.5,0.5], "specular": [0.2,0.2,0.2], "n": 8},
    "vertices": [[0.15,0.15,0.75],[0.25,0.75,0.75],[0.35,0.25,0.75]],
    "triangles": [[0,1,2]]
}]"#;

const TWO_SETS: &str = r#"[
    {
        "material": {"ambient": [0.1,0.1,0.1], "diffuse": [0.6,0.4,0.4], "specular": [0.3,0.3,0.3], "n": 11},
        "vertices": [[0.15,0.6,0.75],[0.25,0.9,0.75],[0.35,0.6,0.75]],
        "triangles": [[0,1,2]]
    },
    {
        "material": {"ambient": [0.1,0.1,0.1], "diffuse": [0.6,0.6,0.4], "specular": [0.3,0.3,0.3], "n": 17},
        "vertices": [[0.15,0.15,0.75],[0.15,0.35,0.75],[0.35,0.35,0.75],[0.35,0.15,0.75]],
        "triangles": [[0,1,2],[2,3,0]]
    }
]"#;

/// Records what the frame loop sends
#[derive(Default)]
struct RecordingBackend {
    clears: usize,
    attribute_uploads: Vec<(VertexAttribute, usize)>,
    index_uploads: Vec<usize>,
    uniforms: Option<FrameUniforms>,
    draws: Vec<usize>,
    positions: Vec<f32>,
    normals: Vec<f32>,
}

impl RenderBackend for RecordingBackend {
    fn clear(&mut self) -> Result<(), FrameError> {
        self.clears += 1;
        Ok(())
    }

    fn upload_vertex_attribute(
        &mut self,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<(), FrameError> {
        assert_eq!(data.len() % attribute.components(), 0);
        match attribute {
            VertexAttribute::Position => self.positions = data.to_vec(),
            VertexAttribute::Normal => self.normals = data.to_vec(),
            _ => {}
        }
        self.attribute_uploads.push((attribute, data.len()));
        Ok(())
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), FrameError> {
        self.index_uploads.push(indices.len());
        Ok(())
    }

    fn set_uniforms(&mut self, uniforms: &FrameUniforms) -> Result<(), FrameError> {
        self.uniforms = Some(*uniforms);
        Ok(())
    }

    fn draw(&mut self, index_count: usize) -> Result<(), FrameError> {
        self.draws.push(index_count);
        Ok(())
    }
}

struct FailingBackend;

impl RenderBackend for FailingBackend {
    fn clear(&mut self) -> Result<(), FrameError> {
        Ok(())
    }

    fn upload_vertex_attribute(&mut self, _: VertexAttribute, _: &[f32]) -> Result<(), FrameError> {
        Err(FrameError::Backend("out of memory".to_string()))
    }

    fn upload_indices(&mut self, _: &[u32]) -> Result<(), FrameError> {
        Ok(())
    }

    fn set_uniforms(&mut self, _: &FrameUniforms) -> Result<(), FrameError> {
        Ok(())
    }

    fn draw(&mut self, _: usize) -> Result<(), FrameError> {
        Ok(())
    }
}

fn viewer(text: &str) -> Viewer {
    Viewer::new(Scene::from_json(text).unwrap(), ViewerConfig::default()).unwrap()
}

#[test]
fn single_triangle_end_to_end() {
    let mut viewer = viewer(SINGLE_TRIANGLE);
    let mut backend = RecordingBackend::default();
    let stats = viewer.frame(&mut backend).unwrap();

    assert_eq!(stats.vertex_count, 3);
    assert!(stats.uploaded);
    assert_eq!(backend.draws, vec![3]);
    assert_eq!(backend.positions.len(), 9);

    let normals: Vec<&[f32]> = backend.normals.chunks(3).collect();
    assert_eq!(normals.len(), 3);
    assert!(normals.iter().all(|n| *n == normals[0]));

    let uniforms = backend.uniforms.unwrap();
    assert_eq!(uniforms.eye, Point3::new(0.5, 0.5, -0.5));
    assert_eq!(uniforms.light_pos, Point3::new(-0.5, 1.5, -0.5));

    let camera = viewer.camera();
    let basis = camera.basis().unwrap();
    for p in backend.positions.chunks(3) {
        let point = Point3::new(p[0], p[1], p[2]);
        let depth = basis.depth(&point);
        assert!(depth > camera.frustum.near && depth < camera.frustum.far);
        let ndc = camera.project(&point).unwrap();
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}

#[test]
fn unchanged_frames_do_not_reupload() {
    let mut viewer = viewer(TWO_SETS);
    let mut backend = RecordingBackend::default();
    viewer.frame(&mut backend).unwrap();
    let second = viewer.frame(&mut backend).unwrap();

    assert!(!second.uploaded);
    assert_eq!(second.frame, 2);
    assert_eq!(backend.clears, 2);
    assert_eq!(backend.index_uploads, vec![9]);
    assert_eq!(backend.attribute_uploads.len(), VertexAttribute::ALL.len());
    assert_eq!(backend.draws, vec![9, 9]);
}

#[test]
fn edit_invalidates_only_selected_set() {
    let mut viewer = viewer(TWO_SETS);
    let mut backend = RecordingBackend::default();
    viewer.frame(&mut backend).unwrap();
    let untouched = viewer.shaded(0).cloned().unwrap();

    viewer
        .dispatch(Command::CycleSelection(Direction::Previous))
        .unwrap();
    assert_eq!(viewer.selection(), Selection::Highlighted(1));
    assert!(viewer.shaded(0).is_some());
    assert!(viewer.shaded(1).is_none());

    let stats = viewer.frame(&mut backend).unwrap();
    assert!(stats.uploaded);
    assert_eq!(viewer.shaded(0), Some(&untouched));

    viewer
        .dispatch(Command::EditObject(ObjectEdit::Translate(Axis::Up, Sign::Positive)))
        .unwrap();
    assert!(viewer.shaded(1).is_none());
    assert!(viewer.shaded(0).is_some());
}

#[test]
fn selection_round_trip_restores_transforms() {
    let mut viewer = viewer(TWO_SETS);
    viewer.dispatch(Command::CycleSelection(Direction::Next)).unwrap();
    viewer.dispatch(Command::CycleSelection(Direction::Next)).unwrap();
    viewer.dispatch(Command::Deselect).unwrap();
    assert_eq!(viewer.selection(), Selection::Unselected);
    for m in viewer.objects().transforms() {
        assert!((m - Matrix4::identity()).norm() < 1e-5);
    }
}

#[test]
fn commands_on_empty_scene_are_noops() {
    let mut viewer = Viewer::new(Scene::default(), ViewerConfig::default()).unwrap();
    viewer.dispatch(Command::CycleSelection(Direction::Next)).unwrap();
    viewer.dispatch(Command::Deselect).unwrap();
    viewer
        .dispatch(Command::EditObject(ObjectEdit::Rotate(Axis::Right, Sign::Negative)))
        .unwrap();
    let mut backend = RecordingBackend::default();
    let stats = viewer.frame(&mut backend).unwrap();
    assert_eq!(stats.vertex_count, 0);
    assert_eq!(backend.draws, vec![0]);
}

#[test]
fn camera_commands_move_the_eye() {
    let mut viewer = viewer(SINGLE_TRIANGLE);
    viewer
        .dispatch(Command::MoveCamera(Axis::Lookat, Sign::Positive))
        .unwrap();
    assert!((viewer.camera().eye.z - (-0.45)).abs() < 1e-6);
}

#[test]
fn failed_upload_is_retried_next_frame() {
    let mut viewer = viewer(SINGLE_TRIANGLE);
    assert!(matches!(
        viewer.frame(&mut FailingBackend),
        Err(FrameError::Backend(_))
    ));
    let mut backend = RecordingBackend::default();
    let stats = viewer.frame(&mut backend).unwrap();
    assert!(stats.uploaded);
    assert_eq!(stats.frame, 1);
}

#[test]
fn edit_without_selection_is_a_noop() {
    let mut viewer = viewer(TWO_SETS);
    let mut backend = RecordingBackend::default();
    viewer.frame(&mut backend).unwrap();
    viewer
        .dispatch(Command::EditObject(ObjectEdit::Rotate(Axis::Up, Sign::Positive)))
        .unwrap();
    assert!(viewer.shaded(0).is_some());
    assert!(viewer.shaded(1).is_some());
    assert!(!viewer.frame(&mut backend).unwrap().uploaded);
}

#[test]
fn degenerate_camera_config_is_rejected() {
    let mut config = ViewerConfig::default();
    config.camera.up = config.camera.lookat;
    let scene = Scene::from_json(SINGLE_TRIANGLE).unwrap();
    assert!(matches!(Viewer::new(scene, config), Err(SceneError::Config(_))));
}

#[test]
fn zero_highlight_scale_is_rejected() {
    let config = ViewerConfig {
        highlight_scale: 0.0,
        ..ViewerConfig::default()
    };
    assert!(matches!(
        Viewer::new(Scene::default(), config),
        Err(SceneError::Config(_))
    ));
}
