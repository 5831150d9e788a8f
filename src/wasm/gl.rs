//! Thin WebGL2 helpers shared by the effect units.

use glam::Mat4;
use js_sys::{Float32Array, Object, Reflect, Uint32Array};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlFramebuffer, WebGlProgram, WebGlShader, WebGlTexture, WebGlVertexArrayObject,
};

use crate::error::{FxError, Result};

/// WebGL2 context with a transparent, non-premultiplied back buffer so the
/// page shows through.
pub fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    let opts = Object::new();
    Reflect::set(&opts, &"alpha".into(), &JsValue::TRUE)?;
    Reflect::set(&opts, &"premultipliedAlpha".into(), &JsValue::FALSE)?;
    Reflect::set(&opts, &"antialias".into(), &JsValue::TRUE)?;
    let gl: GL = canvas
        .get_context_with_context_options("webgl2", &opts)?
        .ok_or(FxError::NoContext)?
        .dyn_into()
        .map_err(|_| FxError::NoContext)?;
    Ok(gl)
}

fn compile(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or(FxError::Missing("shader object"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(FxError::ShaderCompile(log))
    }
}

/// Linked program plus typed uniform setters.
pub struct Program {
    program: WebGlProgram,
}

impl Program {
    pub fn new(gl: &GL, vertex: &str, fragment: &str) -> Result<Self> {
        let vs = compile(gl, GL::VERTEX_SHADER, vertex)?;
        let fs = compile(gl, GL::FRAGMENT_SHADER, fragment)?;
        let program = gl
            .create_program()
            .ok_or(FxError::Missing("program object"))?;
        gl.attach_shader(&program, &vs);
        gl.attach_shader(&program, &fs);
        gl.link_program(&program);
        // Shaders are no longer needed once linked (or once linking failed).
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        if gl
            .get_program_parameter(&program, GL::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(Self { program })
        } else {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(FxError::ProgramLink(log))
        }
    }

    pub fn bind(&self, gl: &GL) {
        gl.use_program(Some(&self.program));
    }

    pub fn f32(&self, gl: &GL, name: &str, v: f32) {
        gl.uniform1f(gl.get_uniform_location(&self.program, name).as_ref(), v);
    }

    pub fn vec2(&self, gl: &GL, name: &str, v: [f32; 2]) {
        gl.uniform2f(gl.get_uniform_location(&self.program, name).as_ref(), v[0], v[1]);
    }

    pub fn vec3(&self, gl: &GL, name: &str, v: [f32; 3]) {
        gl.uniform3f(
            gl.get_uniform_location(&self.program, name).as_ref(),
            v[0],
            v[1],
            v[2],
        );
    }

    pub fn mat4(&self, gl: &GL, name: &str, m: &Mat4) {
        gl.uniform_matrix4fv_with_f32_array(
            gl.get_uniform_location(&self.program, name).as_ref(),
            false,
            &m.to_cols_array(),
        );
    }

    /// Binds `texture` to `unit` and points sampler `name` at it.
    pub fn texture(&self, gl: &GL, name: &str, unit: u32, texture: &WebGlTexture) {
        gl.active_texture(GL::TEXTURE0 + unit);
        gl.bind_texture(GL::TEXTURE_2D, Some(texture));
        gl.uniform1i(
            gl.get_uniform_location(&self.program, name).as_ref(),
            unit as i32,
        );
    }
}

/// One float attribute inside an interleaved vertex buffer.
#[derive(Clone, Copy)]
pub struct Attribute {
    pub location: u32,
    pub size: i32,
}

/// Vertex array over an interleaved f32 buffer and an optional u32 index
/// buffer.
pub struct Mesh {
    vao: WebGlVertexArrayObject,
    vertices: WebGlBuffer,
    indices: Option<WebGlBuffer>,
    count: i32,
    mode: u32,
}

impl Mesh {
    pub fn new(
        gl: &GL,
        mode: u32,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: &[Attribute],
    ) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(FxError::Missing("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));

        let vbo = gl.create_buffer().ok_or(FxError::Missing("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vbo));
        gl.buffer_data_with_array_buffer_view(
            GL::ARRAY_BUFFER,
            &Float32Array::from(vertices),
            GL::STATIC_DRAW,
        );

        let stride: i32 = layout.iter().map(|a| a.size).sum();
        let mut offset = 0;
        for attr in layout {
            gl.enable_vertex_attrib_array(attr.location);
            gl.vertex_attrib_pointer_with_i32(
                attr.location,
                attr.size,
                GL::FLOAT,
                false,
                stride * 4,
                offset * 4,
            );
            offset += attr.size;
        }

        let (ibo, count) = match indices {
            Some(indices) => {
                let ibo = gl.create_buffer().ok_or(FxError::Missing("buffer"))?;
                gl.bind_buffer(GL::ELEMENT_ARRAY_BUFFER, Some(&ibo));
                gl.buffer_data_with_array_buffer_view(
                    GL::ELEMENT_ARRAY_BUFFER,
                    &Uint32Array::from(indices),
                    GL::STATIC_DRAW,
                );
                (Some(ibo), indices.len() as i32)
            }
            None => (None, vertices.len() as i32 / stride.max(1)),
        };
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            vertices: vbo,
            indices: ibo,
            count,
            mode,
        })
    }

    pub fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        if self.indices.is_some() {
            gl.draw_elements_with_i32(self.mode, self.count, GL::UNSIGNED_INT, 0);
        } else {
            gl.draw_arrays(self.mode, 0, self.count);
        }
        gl.bind_vertex_array(None);
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.vertices));
        gl.delete_buffer(self.indices.as_ref());
    }
}

/// Full-screen triangle; the vertex shader derives positions from
/// `gl_VertexID`, so no buffers are bound.
pub fn draw_fullscreen(gl: &GL) {
    gl.draw_arrays(GL::TRIANGLES, 0, 3);
}

fn sampling_params(gl: &GL) {
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
}

/// Uploads a decoded image, flipped so uv (0, 0) is the bottom-left corner.
pub fn image_texture(gl: &GL, image: &HtmlImageElement) -> Result<WebGlTexture> {
    let texture = gl.create_texture().ok_or(FxError::Missing("texture"))?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
    gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        image,
    )?;
    gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
    sampling_params(gl);
    Ok(texture)
}

/// Storage precision for off-screen surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Byte,
    /// Half-float; needs `EXT_color_buffer_float` to be renderable.
    Half,
}

impl Precision {
    /// Half-float when the context can render to it, bytes otherwise.
    pub fn best(gl: &GL) -> Self {
        match gl.get_extension("EXT_color_buffer_float") {
            Ok(Some(_)) => Precision::Half,
            _ => Precision::Byte,
        }
    }

    /// Whether shaders must bias signed values into [0, 1].
    pub fn encoded(self) -> bool {
        self == Precision::Byte
    }

    fn formats(self) -> (i32, u32) {
        match self {
            Precision::Byte => (GL::RGBA8 as i32, GL::UNSIGNED_BYTE),
            Precision::Half => (GL::RGBA16F as i32, GL::HALF_FLOAT),
        }
    }
}

/// Texture-backed framebuffer.
pub struct RenderTarget {
    pub framebuffer: WebGlFramebuffer,
    pub texture: WebGlTexture,
    pub width: u32,
    pub height: u32,
    pub precision: Precision,
}

impl RenderTarget {
    pub fn new(gl: &GL, width: u32, height: u32, precision: Precision) -> Result<Self> {
        let texture = gl.create_texture().ok_or(FxError::Missing("texture"))?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        let (internal, kind) = precision.formats();
        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            GL::TEXTURE_2D,
            0,
            internal,
            width as i32,
            height as i32,
            0,
            GL::RGBA,
            kind,
            None,
        )?;
        sampling_params(gl);

        let framebuffer = gl
            .create_framebuffer()
            .ok_or(FxError::Missing("framebuffer"))?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );
        let status = gl.check_framebuffer_status(GL::FRAMEBUFFER);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        if status != GL::FRAMEBUFFER_COMPLETE {
            gl.delete_framebuffer(Some(&framebuffer));
            gl.delete_texture(Some(&texture));
            return Err(FxError::FramebufferIncomplete(status));
        }
        Ok(Self {
            framebuffer,
            texture,
            width,
            height,
            precision,
        })
    }

    /// Binds for drawing and sets the viewport to cover the target.
    pub fn bind(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.framebuffer));
        gl.viewport(0, 0, self.width as i32, self.height as i32);
    }

    pub fn clear(&self, gl: &GL, rgba: [f32; 4]) {
        self.bind(gl);
        gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
        gl.clear(GL::COLOR_BUFFER_BIT);
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    }

    pub fn delete(&self, gl: &GL) {
        gl.delete_framebuffer(Some(&self.framebuffer));
        gl.delete_texture(Some(&self.texture));
    }
}

/// Binds the canvas back buffer at its full size.
pub fn bind_screen(gl: &GL, canvas: &HtmlCanvasElement) {
    gl.bind_framebuffer(GL::FRAMEBUFFER, None);
    gl.viewport(0, 0, canvas.width() as i32, canvas.height() as i32);
}

