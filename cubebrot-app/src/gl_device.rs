//! OpenGL implementation of [`GraphicsDevice`] on top of eframe's `glow`
//! context.
//!
//! GL object handles live in [`GlResources`], which is created once at startup
//! and stored behind the paint-callback mutex. The context itself is only
//! borrowed: every frame wraps it in a short-lived [`GlDevice`].

use std::collections::HashMap;

use eframe::egui_glow;
use eframe::glow::{self, HasContext};
use glam::{Mat2, Mat4};
use tracing::{debug, info};

use cubebrot_render::geometry::{CUBE_INDEX_COUNT, FULLSCREEN_QUAD};
use cubebrot_render::uniforms::names;
use cubebrot_render::{
    cube_indices, cube_vertices, CubeUniforms, CubeVertex, Extent, GraphicsDevice, QuadVertex,
    RenderError, UniformSink,
};

const CUBE_VERT: &str = include_str!("shaders/cube.vert");
const CUBE_FRAG: &str = include_str!("shaders/cube.frag");
const COMPOSITE_VERT: &str = include_str!("shaders/composite.vert");
const COMPOSITE_FRAG: &str = include_str!("shaders/composite.frag");

const ATTRIB_POSITION: u32 = 0;
const ATTRIB_UV: u32 = 1;

/// Upper bound on errors drained from the queue, for contexts that report
/// errors forever (e.g. after context loss).
const MAX_QUEUED_ERRORS: usize = 32;

// ---------------------------------------------------------------------------
// Shader programs
// ---------------------------------------------------------------------------

/// A linked program with a cache of its uniform locations.
pub(crate) struct GlProgram {
    program: glow::Program,
    locations: HashMap<String, Option<glow::UniformLocation>>,
}

impl GlProgram {
    fn new(
        gl: &glow::Context,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> cubebrot_render::Result<Self> {
        let header = egui_glow::ShaderVersion::get(gl).version_declaration();
        let sources = [
            (glow::VERTEX_SHADER, format!("{header}\n{vertex_src}")),
            (glow::FRAGMENT_SHADER, format!("{header}\n{fragment_src}")),
        ];

        unsafe {
            let program = gl
                .create_program()
                .map_err(|e| RenderError::Device(format!("{label}: create program: {e}")))?;

            let mut shaders = Vec::with_capacity(sources.len());
            for (kind, source) in &sources {
                let shader = match gl.create_shader(*kind) {
                    Ok(shader) => shader,
                    Err(e) => {
                        delete_shaders(gl, program, &shaders);
                        gl.delete_program(program);
                        return Err(RenderError::Device(format!("{label}: create shader: {e}")));
                    }
                };
                gl.shader_source(shader, source);
                gl.compile_shader(shader);
                if !gl.get_shader_compile_status(shader) {
                    let log = gl.get_shader_info_log(shader);
                    gl.delete_shader(shader);
                    delete_shaders(gl, program, &shaders);
                    gl.delete_program(program);
                    return Err(RenderError::Device(format!("{label}: compile failed: {log}")));
                }
                gl.attach_shader(program, shader);
                shaders.push(shader);
            }

            gl.bind_attrib_location(program, ATTRIB_POSITION, "a_position");
            gl.bind_attrib_location(program, ATTRIB_UV, "a_uv");
            gl.link_program(program);
            let linked = gl.get_program_link_status(program);
            let log = gl.get_program_info_log(program);
            delete_shaders(gl, program, &shaders);
            if !linked {
                gl.delete_program(program);
                return Err(RenderError::Device(format!("{label}: link failed: {log}")));
            }

            debug!(label, "Shader program linked");
            Ok(Self {
                program,
                locations: HashMap::new(),
            })
        }
    }

    fn location(&mut self, gl: &glow::Context, name: &str) -> Option<glow::UniformLocation> {
        if let Some(loc) = self.locations.get(name) {
            return loc.clone();
        }
        let loc = unsafe { gl.get_uniform_location(self.program, name) };
        self.locations.insert(name.to_owned(), loc.clone());
        loc
    }
}

unsafe fn delete_shaders(gl: &glow::Context, program: glow::Program, shaders: &[glow::Shader]) {
    for &shader in shaders {
        gl.detach_shader(program, shader);
        gl.delete_shader(shader);
    }
}

/// Uniform upload for the program currently in use.
struct BoundProgram<'a> {
    gl: &'a glow::Context,
    program: &'a mut GlProgram,
}

impl BoundProgram<'_> {
    fn location(&mut self, name: &str) -> Option<glow::UniformLocation> {
        self.program.location(self.gl, name)
    }
}

impl UniformSink for BoundProgram<'_> {
    fn set_f32(&mut self, name: &str, value: f32) {
        let loc = self.location(name);
        unsafe { self.gl.uniform_1_f32(loc.as_ref(), value) }
    }

    fn set_i32(&mut self, name: &str, value: i32) {
        let loc = self.location(name);
        unsafe { self.gl.uniform_1_i32(loc.as_ref(), value) }
    }

    fn set_vec2(&mut self, name: &str, value: [f32; 2]) {
        let loc = self.location(name);
        unsafe { self.gl.uniform_2_f32(loc.as_ref(), value[0], value[1]) }
    }

    fn set_vec3(&mut self, name: &str, value: [f32; 3]) {
        let loc = self.location(name);
        unsafe { self.gl.uniform_3_f32(loc.as_ref(), value[0], value[1], value[2]) }
    }

    fn set_mat2(&mut self, name: &str, value: &Mat2) {
        let loc = self.location(name);
        unsafe {
            self.gl
                .uniform_matrix_2_f32_slice(loc.as_ref(), false, &value.to_cols_array())
        }
    }

    fn set_mat4(&mut self, name: &str, value: &Mat4) {
        let loc = self.location(name);
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(loc.as_ref(), false, &value.to_cols_array())
        }
    }
}

// ---------------------------------------------------------------------------
// Long-lived GL objects
// ---------------------------------------------------------------------------

/// Programs and vertex buffers shared by every frame.
pub(crate) struct GlResources {
    cube_program: GlProgram,
    composite_program: GlProgram,
    cube_vao: glow::VertexArray,
    cube_vbo: glow::Buffer,
    cube_ebo: glow::Buffer,
    quad_vao: glow::VertexArray,
    quad_vbo: glow::Buffer,
}

impl GlResources {
    pub(crate) fn new(gl: &glow::Context) -> cubebrot_render::Result<Self> {
        let cube_program = GlProgram::new(gl, "cube", CUBE_VERT, CUBE_FRAG)?;
        let composite_program = GlProgram::new(gl, "composite", COMPOSITE_VERT, COMPOSITE_FRAG)?;

        unsafe {
            let vertices = cube_vertices();
            let indices = cube_indices();
            let (cube_vao, cube_vbo) = upload_vertices(
                gl,
                bytemuck::cast_slice(&vertices),
                std::mem::size_of::<CubeVertex>(),
                3,
            )?;
            let cube_ebo = gl
                .create_buffer()
                .map_err(|e| RenderError::Device(format!("create index buffer: {e}")))?;
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(cube_ebo));
            gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(&indices),
                glow::STATIC_DRAW,
            );
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            let (quad_vao, quad_vbo) = upload_vertices(
                gl,
                bytemuck::cast_slice(&FULLSCREEN_QUAD),
                std::mem::size_of::<QuadVertex>(),
                2,
            )?;
            gl.bind_vertex_array(None);

            info!("GL resources created");
            Ok(Self {
                cube_program,
                composite_program,
                cube_vao,
                cube_vbo,
                cube_ebo,
                quad_vao,
                quad_vbo,
            })
        }
    }

    pub(crate) fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.cube_program.program);
            gl.delete_program(self.composite_program.program);
            gl.delete_vertex_array(self.cube_vao);
            gl.delete_buffer(self.cube_vbo);
            gl.delete_buffer(self.cube_ebo);
            gl.delete_vertex_array(self.quad_vao);
            gl.delete_buffer(self.quad_vbo);
        }
        debug!("GL resources destroyed");
    }
}

/// Create a VAO + VBO for interleaved `position` (`position_len` floats) and
/// `uv` (2 floats) attributes. Leaves the VAO bound.
unsafe fn upload_vertices(
    gl: &glow::Context,
    bytes: &[u8],
    stride: usize,
    position_len: i32,
) -> cubebrot_render::Result<(glow::VertexArray, glow::Buffer)> {
    let vao = gl
        .create_vertex_array()
        .map_err(|e| RenderError::Device(format!("create vertex array: {e}")))?;
    let vbo = match gl.create_buffer() {
        Ok(vbo) => vbo,
        Err(e) => {
            gl.delete_vertex_array(vao);
            return Err(RenderError::Device(format!("create vertex buffer: {e}")));
        }
    };
    gl.bind_vertex_array(Some(vao));
    gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
    gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);

    let stride = stride as i32;
    let float = std::mem::size_of::<f32>() as i32;
    gl.enable_vertex_attrib_array(ATTRIB_POSITION);
    gl.vertex_attrib_pointer_f32(ATTRIB_POSITION, position_len, glow::FLOAT, false, stride, 0);
    gl.enable_vertex_attrib_array(ATTRIB_UV);
    gl.vertex_attrib_pointer_f32(ATTRIB_UV, 2, glow::FLOAT, false, stride, position_len * float);
    gl.bind_buffer(glow::ARRAY_BUFFER, None);
    Ok((vao, vbo))
}

// ---------------------------------------------------------------------------
// Offscreen target
// ---------------------------------------------------------------------------

/// Color texture plus depth renderbuffer attached to one framebuffer.
#[derive(Debug)]
pub(crate) struct GlTarget {
    framebuffer: glow::Framebuffer,
    color: glow::Texture,
    depth: glow::Renderbuffer,
}

// ---------------------------------------------------------------------------
// Per-frame device
// ---------------------------------------------------------------------------

/// Where egui wants the callback's output: its intermediate framebuffer (or
/// the default one) and the callback rectangle in physical pixels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScreenTarget {
    pub framebuffer: Option<glow::Framebuffer>,
    /// Lower-left corner of the callback rect, GL convention.
    pub origin: [i32; 2],
    /// Scissor rect: x, y (from bottom), width, height.
    pub clip: [i32; 4],
}

impl ScreenTarget {
    pub(crate) fn from_callback(
        info: &eframe::egui::PaintCallbackInfo,
        framebuffer: Option<glow::Framebuffer>,
    ) -> (Self, Extent) {
        let viewport = info.viewport_in_pixels();
        let clip = info.clip_rect_in_pixels();
        let size = Extent::new(
            viewport.width_px.max(0) as u32,
            viewport.height_px.max(0) as u32,
        );
        let screen = Self {
            framebuffer,
            origin: [viewport.left_px, viewport.from_bottom_px],
            clip: [clip.left_px, clip.from_bottom_px, clip.width_px, clip.height_px],
        };
        (screen, size)
    }

    /// For work outside a paint callback, such as teardown.
    pub(crate) fn detached() -> Self {
        Self {
            framebuffer: None,
            origin: [0, 0],
            clip: [0, 0, 0, 0],
        }
    }
}

/// [`GraphicsDevice`] borrowing the GL context for one frame.
pub(crate) struct GlDevice<'a> {
    gl: &'a glow::Context,
    resources: &'a mut GlResources,
    screen: ScreenTarget,
    on_screen: bool,
}

impl<'a> GlDevice<'a> {
    pub(crate) fn new(
        gl: &'a glow::Context,
        resources: &'a mut GlResources,
        screen: ScreenTarget,
    ) -> Self {
        let device = Self {
            gl,
            resources,
            screen,
            on_screen: true,
        };
        device.clear_stale_errors();
        device
    }

    /// Drop errors left queued by earlier GL users (egui) so `check_error`
    /// only reports our own calls.
    fn clear_stale_errors(&self) {
        let stale = drain_error_queue(|| unsafe { self.gl.get_error() });
        if stale > 0 {
            debug!(stale, "Discarded queued GL errors");
        }
    }

    fn check_error(&self, what: &str) -> cubebrot_render::Result<()> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(RenderError::Device(format!("{what}: GL error 0x{code:04X}")))
        }
    }
}

impl GraphicsDevice for GlDevice<'_> {
    type Target = GlTarget;

    fn create_target(&mut self, size: Extent) -> cubebrot_render::Result<GlTarget> {
        let gl = self.gl;
        let (width, height) = (size.width as i32, size.height as i32);
        self.clear_stale_errors();
        unsafe {
            let color = gl
                .create_texture()
                .map_err(|e| RenderError::Device(format!("create texture: {e}")))?;
            gl.bind_texture(glow::TEXTURE_2D, Some(color));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(None),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            let depth = match gl.create_renderbuffer() {
                Ok(depth) => depth,
                Err(e) => {
                    gl.delete_texture(color);
                    return Err(RenderError::Device(format!("create renderbuffer: {e}")));
                }
            };
            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(depth));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH_COMPONENT24, width, height);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);

            let framebuffer = match gl.create_framebuffer() {
                Ok(fb) => fb,
                Err(e) => {
                    gl.delete_texture(color);
                    gl.delete_renderbuffer(depth);
                    return Err(RenderError::Device(format!("create framebuffer: {e}")));
                }
            };
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(color),
                0,
            );
            gl.framebuffer_renderbuffer(
                glow::FRAMEBUFFER,
                glow::DEPTH_ATTACHMENT,
                glow::RENDERBUFFER,
                Some(depth),
            );
            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
            gl.bind_framebuffer(glow::FRAMEBUFFER, self.screen.framebuffer);
            self.on_screen = true;

            let target = GlTarget {
                framebuffer,
                color,
                depth,
            };
            if status != glow::FRAMEBUFFER_COMPLETE {
                self.destroy_target(target);
                return Err(RenderError::Device(format!(
                    "framebuffer {size} incomplete: 0x{status:04X}"
                )));
            }
            if let Err(e) = self.check_error("create target") {
                self.destroy_target(target);
                return Err(e);
            }
            Ok(target)
        }
    }

    fn destroy_target(&mut self, target: GlTarget) {
        unsafe {
            self.gl.delete_framebuffer(target.framebuffer);
            self.gl.delete_texture(target.color);
            self.gl.delete_renderbuffer(target.depth);
        }
    }

    fn bind_target(&mut self, target: &GlTarget) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(target.framebuffer));
            // egui leaves scissoring and blending on for its own meshes.
            self.gl.disable(glow::SCISSOR_TEST);
            self.gl.disable(glow::BLEND);
        }
        self.on_screen = false;
    }

    fn bind_screen(&mut self) {
        let [x, y, w, h] = self.screen.clip;
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, self.screen.framebuffer);
            self.gl.enable(glow::SCISSOR_TEST);
            self.gl.scissor(x, y, w, h);
        }
        self.on_screen = true;
    }

    fn set_viewport(&mut self, size: Extent) {
        let [x, y] = if self.on_screen {
            self.screen.origin
        } else {
            [0, 0]
        };
        unsafe {
            self.gl
                .viewport(x, y, size.width as i32, size.height as i32);
        }
    }

    fn set_depth_test(&mut self, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(glow::DEPTH_TEST);
                self.gl.depth_func(glow::LESS);
                self.gl.depth_mask(true);
            } else {
                self.gl.disable(glow::DEPTH_TEST);
            }
        }
    }

    fn clear(&mut self, color: [f32; 4], depth: bool) {
        let [r, g, b, a] = color;
        let mut mask = glow::COLOR_BUFFER_BIT;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            if depth {
                self.gl.clear_depth_f32(1.0);
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            self.gl.clear(mask);
        }
    }

    fn draw_cube(&mut self, uniforms: &CubeUniforms) -> cubebrot_render::Result<()> {
        let gl = self.gl;
        unsafe {
            gl.use_program(Some(self.resources.cube_program.program));
        }
        uniforms.apply(&mut BoundProgram {
            gl,
            program: &mut self.resources.cube_program,
        });
        unsafe {
            gl.bind_vertex_array(Some(self.resources.cube_vao));
            gl.draw_elements(
                glow::TRIANGLES,
                CUBE_INDEX_COUNT as i32,
                glow::UNSIGNED_SHORT,
                0,
            );
            gl.bind_vertex_array(None);
        }
        self.check_error("cube draw")
    }

    fn draw_composite(&mut self, source: &GlTarget) -> cubebrot_render::Result<()> {
        let gl = self.gl;
        unsafe {
            gl.use_program(Some(self.resources.composite_program.program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(source.color));
            // Mip chain gives a box-filtered downsample for factors above 2.
            gl.generate_mipmap(glow::TEXTURE_2D);
        }
        BoundProgram {
            gl,
            program: &mut self.resources.composite_program,
        }
        .set_i32(names::SOURCE, 0);
        unsafe {
            gl.bind_vertex_array(Some(self.resources.quad_vao));
            gl.draw_arrays(glow::TRIANGLES, 0, FULLSCREEN_QUAD.len() as i32);
            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
        self.check_error("composite draw")
    }
}

/// Pop errors off a `glGetError`-style queue until it reports `NO_ERROR`.
/// Returns how many were discarded.
fn drain_error_queue(mut next_error: impl FnMut() -> u32) -> usize {
    (0..MAX_QUEUED_ERRORS)
        .take_while(|_| next_error() != glow::NO_ERROR)
        .count()
}
