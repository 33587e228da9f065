/// PhongView Web - WASM/WebGL2 front-end
///
/// The host page owns the canvas and event wiring; it forwards key names to
/// `handle_key` and calls `render` from its animation-frame callback.
use log::{info, warn};
use phongview_core::{keymap, Scene, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod console;
pub mod gl;
pub mod shaders;

use gl::GlBackend;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    viewer: Viewer,
    backend: Option<GlBackend>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebRenderer, JsValue> {
        Ok(WebRenderer {
            viewer: Viewer::new(Scene::default(), ViewerConfig::default()).map_err(to_js)?,
            backend: None,
        })
    }

    /// Initialize the renderer with a canvas element
    pub fn init(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {}", canvas_id)))?
            .dyn_into()?;
        let context: WebGl2RenderingContext = canvas
            .get_context("webgl2")?
            .ok_or_else(|| JsValue::from_str("unable to create webgl2 context"))?
            .dyn_into()?;

        self.backend = Some(GlBackend::new(context)?);
        info!("webgl2 context ready on #{}", canvas_id);
        Ok(())
    }

    /// Replace the scene with a JSON scene description, keeping the configuration
    pub fn load_scene(&mut self, json: &str) -> Result<(), JsValue> {
        let scene = Scene::from_json(json).map_err(to_js)?;
        self.viewer = Viewer::new(scene, *self.viewer.config()).map_err(to_js)?;
        Ok(())
    }

    /// Apply a JSON viewer configuration; resets camera and selection
    pub fn load_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = ViewerConfig::from_json(json).map_err(to_js)?;
        let scene = self.viewer.scene().clone();
        self.viewer = Viewer::new(scene, config).map_err(to_js)?;
        Ok(())
    }

    /// Handle a `KeyboardEvent.key` value; returns whether the key is bound
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(command) = keymap::command_for_key(key) else {
            return false;
        };
        if let Err(e) = self.viewer.dispatch(command) {
            warn!("{:?} ignored: {}", command, e);
        }
        true
    }

    /// Render a frame
    pub fn render(&mut self) -> Result<(), JsValue> {
        let backend = self
            .backend
            .as_mut()
            .ok_or_else(|| JsValue::from_str("renderer not initialized; call init first"))?;
        self.viewer.frame(backend).map_err(to_js)?;
        Ok(())
    }

    /// Currently selected set, or -1
    pub fn selected(&self) -> i32 {
        self.viewer
            .selection()
            .index()
            .map_or(-1, |i| i as i32)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console::init().map_err(to_js)?;
    Ok(())
}
