/// PhongView Terminal - interactive flat-shaded scene viewer
///
/// Usage: phongview-terminal [scene.json] [config.json]
///
/// Controls:
///   - Left/Right arrows: select previous/next triangle set, Space: deselect
///   - a/d, w/s, q/e: move camera; A/D, W/S: turn camera
///   - k/;, o/l, i/p: translate selection; K/:, O/L, I/P: rotate selection
///   - Esc: quit
use nalgebra::Point3;
use phongview_core::{Material, Scene, SceneError, TriangleSet, ViewerConfig};
use phongview_terminal::{status, TerminalApp};
use std::env;
use std::io;
use std::path::Path;

fn to_io(e: SceneError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e.to_string())
}

/// Two cubes in front of the default camera
fn demo_scene() -> Result<Scene, SceneError> {
    Scene::new(vec![
        TriangleSet::cube(
            Point3::new(0.3, 0.5, 0.8),
            0.25,
            Material::new([0.1, 0.1, 0.1], [0.6, 0.4, 0.4], [0.3, 0.3, 0.3], 11.0),
        ),
        TriangleSet::cube(
            Point3::new(0.7, 0.5, 0.8),
            0.2,
            Material::new([0.1, 0.1, 0.1], [0.4, 0.6, 0.4], [0.3, 0.3, 0.3], 17.0),
        ),
    ])
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let scene = match args.get(1) {
        Some(path) => {
            println!("Loading scene: {}", path);
            Scene::load(Path::new(path)).map_err(to_io)?
        }
        None => demo_scene().map_err(to_io)?,
    };
    let config = match args.get(2) {
        Some(path) => ViewerConfig::load(Path::new(path)).map_err(to_io)?,
        None => ViewerConfig::default(),
    };

    status::init().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    log::info!(
        "{} sets, {} triangles",
        scene.len(),
        scene.triangle_count()
    );

    let mut app = TerminalApp::new(scene, config)?;
    app.run()?;

    println!("Thank you for using PhongView!");
    Ok(())
}
