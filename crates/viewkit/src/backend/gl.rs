//! glow implementation of the geometry backend.
//!
//! Each line buffer is a VAO/VBO pair holding position-only vertices,
//! drawn with `LINES` through a single uniform-colour shader program.
//! The view-projection matrix and line colour are staged per frame with
//! [`GlLineBackend::set_view`] / [`GlLineBackend::set_color`] before the
//! grid replays its buffer.

use std::collections::HashMap;
use std::sync::Arc;

use glow::HasContext;

use crate::lines::LineList;

use super::{BackendError, GeometryBackend, LineBuffer};

struct GpuLines {
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: i32,
}

pub struct GlLineBackend {
    gl: Arc<glow::Context>,
    program: glow::Program,
    buffers: HashMap<LineBuffer, GpuLines>,
    next_id: u64,
    mvp: glam::Mat4,
    color: [f32; 4],
}

impl GlLineBackend {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, BackendError> {
        let program = compile_program(&gl, LINE_VERT, LINE_FRAG)?;
        Ok(Self {
            gl,
            program,
            buffers: HashMap::new(),
            next_id: 0,
            mvp: glam::Mat4::IDENTITY,
            color: [0.25, 0.25, 0.25, 1.0],
        })
    }

    /// Stage the view-projection matrix used by subsequent replays.
    pub fn set_view(&mut self, mvp: glam::Mat4) {
        self.mvp = mvp;
    }

    /// Stage the line colour used by subsequent replays.
    pub fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
    }

    /// Free every GPU object owned by this backend.
    pub fn destroy(&mut self) {
        unsafe {
            for (_, lines) in self.buffers.drain() {
                self.gl.delete_vertex_array(lines.vao);
                self.gl.delete_buffer(lines.vbo);
            }
            self.gl.delete_program(self.program);
        }
    }
}

impl GeometryBackend for GlLineBackend {
    fn acquire(&mut self) -> Result<LineBuffer, BackendError> {
        let gl = &self.gl;
        unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(BackendError::Allocation)?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(BackendError::Allocation(e));
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            // position: location 0, tightly packed vec3
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 3 * 4, 0);
            gl.bind_vertex_array(None);

            self.next_id += 1;
            let buffer = LineBuffer(self.next_id);
            self.buffers.insert(
                buffer,
                GpuLines {
                    vao,
                    vbo,
                    vertex_count: 0,
                },
            );
            Ok(buffer)
        }
    }

    fn release(&mut self, buffer: LineBuffer) {
        if let Some(lines) = self.buffers.remove(&buffer) {
            unsafe {
                self.gl.delete_vertex_array(lines.vao);
                self.gl.delete_buffer(lines.vbo);
            }
        }
    }

    fn upload(&mut self, buffer: LineBuffer, lines: &LineList) -> Result<(), BackendError> {
        let slot = self
            .buffers
            .get_mut(&buffer)
            .ok_or(BackendError::UnknownBuffer(buffer))?;

        let floats = lines.to_floats();
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(slot.vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                cast_f32_slice(&floats),
                glow::STATIC_DRAW,
            );
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
        slot.vertex_count = lines.vertex_count() as i32;
        Ok(())
    }

    fn replay(&mut self, buffer: LineBuffer) {
        let Some(lines) = self.buffers.get(&buffer) else {
            tracing::warn!("replay of unknown buffer {buffer:?} skipped");
            return;
        };
        if lines.vertex_count == 0 {
            return;
        }
        let gl = &self.gl;
        unsafe {
            gl.use_program(Some(self.program));
            let loc = gl.get_uniform_location(self.program, "u_mvp");
            gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &self.mvp.to_cols_array());
            let loc = gl.get_uniform_location(self.program, "u_color");
            gl.uniform_4_f32(
                loc.as_ref(),
                self.color[0],
                self.color[1],
                self.color[2],
                self.color[3],
            );

            gl.bind_vertex_array(Some(lines.vao));
            gl.draw_arrays(glow::LINES, 0, lines.vertex_count);
            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::Program, BackendError> {
    unsafe {
        let program = gl.create_program().map_err(BackendError::Allocation)?;

        for (kind, src) in [(glow::VERTEX_SHADER, vert_src), (glow::FRAGMENT_SHADER, frag_src)] {
            let shader = gl.create_shader(kind).map_err(BackendError::Allocation)?;
            gl.shader_source(shader, src);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                tracing::error!("Shader compile error: {log}");
                gl.delete_shader(shader);
                gl.delete_program(program);
                return Err(BackendError::Allocation(log));
            }
            gl.attach_shader(program, shader);
            gl.delete_shader(shader);
        }

        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
            gl.delete_program(program);
            return Err(BackendError::Allocation(log));
        }

        Ok(program)
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_f32_slice(slice: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(slice.as_ptr() as *const u8, std::mem::size_of_val(slice))
    }
}

// ── Shaders ──────────────────────────────────────────────────

const LINE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;

layout(location = 0) in vec3 a_position;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const LINE_FRAG: &str = r#"#version 330 core
uniform vec4 u_color;
out vec4 frag_color;

void main() {
    frag_color = u_color;
}
"#;
