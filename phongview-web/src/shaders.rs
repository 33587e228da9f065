/// GLSL programs: window-plane projection in the vertex stage, Phong per fragment
use wasm_bindgen::JsValue;
use web_sys::{WebGl2RenderingContext as Gl, WebGlProgram, WebGlShader};

pub const VERTEX_SHADER: &str = r#"#version 300 es
in vec3 vertexPosition;
in vec3 vertexNormal;
in vec3 vertexAmbient;
in vec3 vertexDiffuse;
in vec3 vertexSpecular;
in float vertexShininess;

uniform vec3 eye;
uniform vec3 up;
uniform vec3 lookat;
uniform float windowDist;
uniform vec4 windowBounds; // left, right, bottom, top
uniform vec2 depthBounds;  // near, far

out vec3 fragPosition;
out vec3 fragNormal;
out vec3 fragAmbient;
out vec3 fragDiffuse;
out vec3 fragSpecular;
out float fragShininess;

float toNdc(float value, float low, float high) {
    return 2.0 * (value - low) / (high - low) - 1.0;
}

void main(void) {
    vec3 right = cross(lookat, up);
    vec3 relative = vertexPosition - eye;
    float distAlongLookat = dot(lookat, relative) / dot(lookat, lookat);
    vec3 projected = relative / distAlongLookat * windowDist;
    float distAlongUp = dot(up, projected) / dot(up, up);
    float distAlongRight = dot(right, projected) / dot(right, right);

    gl_Position = vec4(
        toNdc(distAlongRight, windowBounds.x, windowBounds.y),
        toNdc(distAlongUp, windowBounds.z, windowBounds.w),
        toNdc(distAlongLookat, depthBounds.x, depthBounds.y),
        1.0);

    fragPosition = vertexPosition;
    fragNormal = vertexNormal;
    fragAmbient = vertexAmbient;
    fragDiffuse = vertexDiffuse;
    fragSpecular = vertexSpecular;
    fragShininess = vertexShininess;
}
"#;

pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 fragPosition;
in vec3 fragNormal;
in vec3 fragAmbient;
in vec3 fragDiffuse;
in vec3 fragSpecular;
in float fragShininess;

uniform vec3 eye;
uniform vec3 lightPos;
uniform bool specularGated;
uniform bool clampColor;

out vec4 outColor;

void main(void) {
    vec3 n = normalize(fragNormal);
    vec3 toLight = normalize(lightPos - fragPosition);
    vec3 toEye = normalize(eye - fragPosition);
    if (dot(n, toEye) < 0.0)
        n = -n;

    vec3 color = fragAmbient;
    float diff = dot(n, toLight);
    if (diff > 0.0)
        color += fragDiffuse * diff;
    if (diff > 0.0 || !specularGated) {
        float spec = dot(n, normalize(toEye + toLight));
        if (spec > 0.0)
            color += fragSpecular * pow(spec, fragShininess);
    }
    if (clampColor)
        color = clamp(color, 0.0, 1.0);
    outColor = vec4(color, 1.0);
}
"#;

/// Uniform names set every frame
pub const UNIFORMS: [&str; 9] = [
    "eye",
    "up",
    "lookat",
    "lightPos",
    "windowDist",
    "windowBounds",
    "depthBounds",
    "specularGated",
    "clampColor",
];

pub fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| JsValue::from_str("unable to create shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(JsValue::from_str(&format!("error during shader compile: {}", log)))
    }
}

pub fn link_program(gl: &Gl) -> Result<WebGlProgram, JsValue> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
    let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("unable to create program object"))?;
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        Err(JsValue::from_str(&format!("error during program link: {}", log)))
    }
}
