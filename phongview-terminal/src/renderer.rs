/// ASCII rasterizer backend for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Point3, Vector3};
use phongview_core::{
    phong, FrameError, FrameUniforms, Material, RenderBackend, VertexAttribute,
};
use std::collections::HashMap;
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// A vertex after projection and per-vertex lighting
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    color: Vector3<f32>,
}

/// CPU renderer that rasterizes the published triangle list into characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Vector3<f32>>,
    attributes: HashMap<VertexAttribute, Vec<f32>>,
    indices: Vec<u32>,
    uniforms: Option<FrameUniforms>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Vector3::zeros(); size],
            attributes: HashMap::new(),
            indices: Vec::new(),
            uniforms: None,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            attributes: std::mem::take(&mut self.attributes),
            indices: std::mem::take(&mut self.indices),
            uniforms: self.uniforms,
            ..Self::new(width, height)
        };
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    fn attribute(&self, attribute: VertexAttribute, vertex: usize) -> Option<&[f32]> {
        let n = attribute.components();
        self.attributes.get(&attribute)?.get(vertex * n..vertex * n + n)
    }

    fn vec3(&self, attribute: VertexAttribute, vertex: usize) -> Option<Vector3<f32>> {
        self.attribute(attribute, vertex)
            .map(|v| Vector3::new(v[0], v[1], v[2]))
    }

    /// Project and light one vertex; `None` when it cannot be placed on screen
    fn shade_vertex(&self, vertex: usize, uniforms: &FrameUniforms) -> Option<ScreenVertex> {
        let position = Point3::from(self.vec3(VertexAttribute::Position, vertex)?);
        let normal = self.vec3(VertexAttribute::Normal, vertex)?;
        let material = Material {
            ambient: self.vec3(VertexAttribute::Ambient, vertex)?,
            diffuse: self.vec3(VertexAttribute::Diffuse, vertex)?,
            specular: self.vec3(VertexAttribute::Specular, vertex)?,
            shininess: self.attribute(VertexAttribute::Shininess, vertex)?[0],
        };

        let ndc = uniforms
            .basis()
            .project(&position, uniforms.window_dist, &uniforms.frustum)
            .ok()?;
        // outside the depth range
        if !(-1.0..=1.0).contains(&ndc.z) {
            return None;
        }
        let color = phong(
            &normal,
            &position,
            &material,
            &uniforms.light_pos,
            &uniforms.eye,
            &uniforms.lighting,
        )
        .ok()?;

        Some(ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: ndc.z,
            color,
        })
    }

    fn rasterize_triangle(&mut self, v: &[ScreenVertex; 3]) {
        let (v0, v1, v2) = (v[0], v[1], v[2]);

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let color = v0.color * w0 + v1.color * w1 + v2.color * w2;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = luminosity_char(&color);
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    /// Write the character buffer to a terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(to_terminal_color(&self.color_buffer[idx])))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    fn clear(&mut self) -> Result<(), FrameError> {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Vector3::zeros());
        Ok(())
    }

    fn upload_vertex_attribute(
        &mut self,
        attribute: VertexAttribute,
        data: &[f32],
    ) -> Result<(), FrameError> {
        if data.len() % attribute.components() != 0 {
            return Err(FrameError::Backend(format!(
                "{} length {} is not a multiple of {}",
                attribute.name(),
                data.len(),
                attribute.components()
            )));
        }
        self.attributes.insert(attribute, data.to_vec());
        Ok(())
    }

    fn upload_indices(&mut self, indices: &[u32]) -> Result<(), FrameError> {
        self.indices = indices.to_vec();
        Ok(())
    }

    fn set_uniforms(&mut self, uniforms: &FrameUniforms) -> Result<(), FrameError> {
        self.uniforms = Some(*uniforms);
        Ok(())
    }

    fn draw(&mut self, index_count: usize) -> Result<(), FrameError> {
        let uniforms = self
            .uniforms
            .ok_or_else(|| FrameError::Backend("draw before uniforms were set".to_string()))?;
        let count = index_count.min(self.indices.len());
        let triangles: Vec<[usize; 3]> = self.indices[..count]
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();

        for [a, b, c] in triangles {
            // triangles with any unplaceable corner are dropped whole
            let corners = (
                self.shade_vertex(a, &uniforms),
                self.shade_vertex(b, &uniforms),
                self.shade_vertex(c, &uniforms),
            );
            if let (Some(a), Some(b), Some(c)) = corners {
                self.rasterize_triangle(&[a, b, c]);
            }
        }
        Ok(())
    }
}

/// Map a lit color to a ramp character by its luminance
fn luminosity_char(color: &Vector3<f32>) -> char {
    let luminance = 0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z;
    let index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    // never draw a covered cell as blank
    LUMINOSITY_RAMP[index.clamp(1, LUMINOSITY_RAMP.len() - 1)]
}

fn to_terminal_color(color: &Vector3<f32>) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use phongview_core::{Scene, Viewer, ViewerConfig};

    #[test]
    fn test_barycentric_centroid() {
        let (w0, w1, w2) = barycentric((0.0, 0.0), (3.0, 0.0), (0.0, 3.0), (1.0, 1.0)).unwrap();
        assert!((w0 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w1 - 1.0 / 3.0).abs() < 1e-5);
        assert!((w2 - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_barycentric() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_luminosity_ramp_ends() {
        assert_eq!(luminosity_char(&Vector3::new(1.0, 1.0, 1.0)), '@');
        assert_eq!(luminosity_char(&Vector3::zeros()), '.');
    }

    #[test]
    fn test_draw_before_uniforms_fails() {
        let mut renderer = AsciiRenderer::new(4, 4);
        assert!(renderer.draw(0).is_err());
    }

    #[test]
    fn test_viewer_frame_covers_center() {
        let scene = Scene::from_json(
            r#"[{
                "material": {"ambient": [0.1,0.1,0.1], "diffuse": [0.5,0.5,0.5], "specular": [0.2,0.2,0.2], "n": 8},
                "vertices": [[0.0,0.0,0.75],[1.0,0.0,0.75],[0.5,1.0,0.75]],
                "triangles": [[0,1,2]]
            }]"#,
        )
        .unwrap();
        let mut viewer = Viewer::new(scene, ViewerConfig::default()).unwrap();
        let mut renderer = AsciiRenderer::new(40, 20);
        viewer.frame(&mut renderer).unwrap();

        assert_ne!(renderer.cell(20, 10), Some(' '));
        assert_eq!(renderer.cell(0, 0), Some(' '));
        assert_eq!(renderer.cell(40, 0), None);
    }
}
