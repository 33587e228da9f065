/// Example: Load and view an STL file in the terminal
///
/// Usage: cargo run --example load_stl -- path/to/file.stl
use std::env;
use std::fs;
use std::io;

use phongview_core::{stl, Material, Scene, ViewerConfig};
use phongview_terminal::{status, TerminalApp};

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <stl-file>", args[0]);
        return Ok(());
    }

    let stl_path = &args[1];
    println!("Loading STL file: {}", stl_path);

    let data = fs::read(stl_path).map_err(|e| {
        io::Error::new(io::ErrorKind::NotFound, format!("Failed to read STL file: {}", e))
    })?;

    let set = stl::parse_stl(&data, Material::default())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    println!("Loaded {} triangles", set.triangle_count());

    let scene = Scene::new(vec![set])
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    status::init().map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    // STL models are rarely sized for the unit window; pull the camera back
    let mut config = ViewerConfig::default();
    config.camera.eye = [0.0, 0.0, -5.0];
    config.camera.frustum.far = 100.0;

    let mut app = TerminalApp::new(scene, config)?;
    app.run()
}
