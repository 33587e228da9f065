/// WebGL2 rendering backend
use std::collections::HashMap;

use phongview_core::{FrameError, FrameUniforms, RenderBackend, SpecularPolicy, VertexAttribute};
use wasm_bindgen::JsValue;
use web_sys::{WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlUniformLocation};

use crate::shaders;

fn create_buffer(gl: &Gl) -> Result<WebGlBuffer, JsValue> {
    gl.create_buffer()
        .ok_or_else(|| JsValue::from_str("unable to create buffer"))
}

/// Owns the program, one array buffer per attribute, and the index buffer
pub struct GlBackend {
    gl: Gl,
    program: WebGlProgram,
    buffers: HashMap<VertexAttribute, WebGlBuffer>,
    index_buffer: WebGlBuffer,
    uniforms: HashMap<&'static str, WebGlUniformLocation>,
}

impl GlBackend {
    pub fn new(gl: Gl) -> Result<Self, JsValue> {
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear_depth(1.0);
        gl.enable(Gl::DEPTH_TEST);

        let program = shaders::link_program(&gl)?;
        gl.use_program(Some(&program));

        let mut buffers = HashMap::new();
        for attribute in VertexAttribute::ALL {
            buffers.insert(attribute, create_buffer(&gl)?);
        }
        let index_buffer = create_buffer(&gl)?;

        // unused uniforms may be optimized out and have no location
        let uniforms = shaders::UNIFORMS
            .iter()
            .filter_map(|&name| gl.get_uniform_location(&program, name).map(|loc| (name, loc)))
            .collect();

        Ok(Self {
            gl,
            program,
            buffers,
            index_buffer,
            uniforms,
        })
    }

    fn location(&self, name: &str) -> Option<&WebGlUniformLocation> {
        self.uniforms.get(name)
    }
}

impl RenderBackend for GlBackend {
    fn clear(&mut self) -> Result<(), FrameError> {
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        Ok(())
    }

    fn upload_vertex_attribute(
        &mut self,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<(), FrameError> {
        let buffer = self
            .buffers
            .get(&attribute)
            .ok_or_else(|| FrameError::Backend(format!("no buffer for {}", attribute.name())))?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl
            .buffer_data_with_u8_array(Gl::ARRAY_BUFFER, bytemuck::cast_slice(data), Gl::STATIC_DRAW);

        let location = self.gl.get_attrib_location(&self.program, attribute.name());
        // attributes the compiler dropped report -1
        if location >= 0 {
            let location = location as u32;
            self.gl.enable_vertex_attrib_array(location);
            self.gl.vertex_attrib_pointer_with_i32(
                location,
                attribute.components() as i32,
                Gl::FLOAT,
                false,
                0,
                0,
            );
        }
        Ok(())
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), FrameError> {
        self.gl
            .bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&self.index_buffer));
        self.gl.buffer_data_with_u8_array(
            Gl::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(indices),
            Gl::STATIC_DRAW,
        );
        Ok(())
    }

    fn set_uniforms(&mut self, u: &FrameUniforms) -> Result<(), FrameError> {
        let gl = &self.gl;
        let f = &u.frustum;
        gl.uniform3fv_with_f32_array(self.location("eye"), u.eye.coords.as_slice());
        gl.uniform3fv_with_f32_array(self.location("up"), u.up.as_slice());
        gl.uniform3fv_with_f32_array(self.location("lookat"), u.lookat.as_slice());
        gl.uniform3fv_with_f32_array(self.location("lightPos"), u.light_pos.coords.as_slice());
        gl.uniform1f(self.location("windowDist"), u.window_dist);
        gl.uniform4f(self.location("windowBounds"), f.left, f.right, f.bottom, f.top);
        gl.uniform2f(self.location("depthBounds"), f.near, f.far);
        gl.uniform1i(
            self.location("specularGated"),
            (u.lighting.specular == SpecularPolicy::Gated) as i32,
        );
        gl.uniform1i(self.location("clampColor"), u.lighting.clamp_color as i32);
        Ok(())
    }

    fn draw(&mut self, index_count: usize) -> Result<(), FrameError> {
        let count = i32::try_from(index_count)
            .map_err(|_| FrameError::Backend(format!("{} indices exceed a draw call", index_count)))?;
        self.gl
            .draw_elements_with_i32(Gl::TRIANGLES, count, Gl::UNSIGNED_INT, 0);
        Ok(())
    }
}
