use std::rc::Rc;

use glow::HasContext;
use thiserror::Error;
use zerocopy::AsBytes;

type VertexArrayId = <glow::Context as glow::HasContext>::VertexArray;
type BufferId = <glow::Context as glow::HasContext>::Buffer;
type UniformLocationId = <glow::Context as glow::HasContext>::UniformLocation;
type ProgramId = <glow::Context as glow::HasContext>::Program;
type ShaderId = <glow::Context as glow::HasContext>::Shader;
type TextureId = <glow::Context as glow::HasContext>::Texture;

pub struct Shader(Rc<ShaderId>);

/// An RGBA8 texture.
pub struct Texture {
    context: Rc<glow::Context>,
    texture_id: Rc<TextureId>,
    width: u32,
    height: u32,
}

pub struct VertexBuffer {
    context: Rc<glow::Context>,
    vertex_array: Rc<VertexArrayId>,
    buffer: Rc<BufferId>,
    len: usize,
}

/// Owns every GL object it hands out. Objects whose handles have all been
/// dropped are deleted on the next `maintain`.
pub struct Context {
    context: Rc<glow::Context>,
    shaders: Vec<Rc<ShaderId>>,
    programs: Vec<Rc<ProgramId>>,
    vertex_arrays: Vec<Rc<VertexArrayId>>,
    buffers: Vec<Rc<BufferId>>,
    textures: Vec<Rc<TextureId>>,
}

#[derive(Debug, Error)]
#[error("OpenGL error: {0}")]
pub struct GLError(String);

impl Context {
    pub fn from_glow_context(context: glow::Context) -> Context {
        Context {
            context: Rc::new(context),
            shaders: Vec::new(),
            programs: Vec::new(),
            vertex_arrays: Vec::new(),
            buffers: Vec::new(),
            textures: Vec::new(),
        }
    }

    pub unsafe fn create_shader(
        &mut self,
        shader_type: ShaderType,
        src: &str,
    ) -> Result<Shader, GLError> {
        let shader_id = self
            .context
            .create_shader(shader_type as u32)
            .map_err(GLError)?;
        self.context.shader_source(shader_id, src);
        self.context.compile_shader(shader_id);
        if !self.context.get_shader_compile_status(shader_id) {
            let log = self.context.get_shader_info_log(shader_id);
            self.context.delete_shader(shader_id);
            Err(GLError(log))
        } else {
            let shader = Shader(Rc::new(shader_id));
            self.shaders.push(shader.0.clone());
            Ok(shader)
        }
    }

    pub unsafe fn create_program(&mut self, desc: &ProgramDescriptor) -> Result<Program, GLError> {
        let program_id = self.context.create_program().map_err(GLError)?;
        self.context
            .attach_shader(program_id, *desc.vertex_shader.0);
        self.context
            .attach_shader(program_id, *desc.fragment_shader.0);
        self.context.link_program(program_id);
        if !self.context.get_program_link_status(program_id) {
            let log = self.context.get_program_info_log(program_id);
            self.context.delete_program(program_id);
            return Err(GLError(log));
        }

        let mut set_uniforms = Vec::new();
        for entry in desc.uniforms {
            let location = self
                .context
                .get_uniform_location(program_id, entry.name)
                .ok_or_else(|| {
                    GLError(format!("could not get location for uniform {}", entry.name))
                })?;
            set_uniforms.push((location, None));
        }

        let vertex_format = VertexFormatInner {
            stride: desc.vertex_format.stride as i32,
            attributes: desc
                .vertex_format
                .attributes
                .iter()
                .map(|attr_desc| {
                    let location = self
                        .context
                        .get_attrib_location(program_id, attr_desc.name)
                        .ok_or_else(|| {
                            GLError(format!(
                                "could not get location of attribute {}",
                                attr_desc.name
                            ))
                        })?;
                    Ok((
                        location,
                        VertexAttributeInner {
                            size: attr_desc.size,
                            offset: attr_desc.offset,
                        },
                    ))
                })
                .collect::<Result<Vec<_>, GLError>>()?,
        };

        let program_id = Rc::new(program_id);
        self.programs.push(program_id.clone());
        Ok(Program {
            context: self.context.clone(),
            program_id,
            _vertex_shader: desc.vertex_shader.0.clone(),
            _fragment_shader: desc.fragment_shader.0.clone(),
            uniform_entry_types: desc.uniforms.iter().map(|e| e.ty).collect(),
            set_uniforms,
            vertex_format,
        })
    }

    pub unsafe fn create_vertex_buffer(&mut self) -> Result<VertexBuffer, GLError> {
        let vertex_array_id = Rc::new(self.context.create_vertex_array().map_err(GLError)?);
        self.vertex_arrays.push(vertex_array_id.clone());
        let buffer_id = Rc::new(self.context.create_buffer().map_err(GLError)?);
        self.buffers.push(buffer_id.clone());

        Ok(VertexBuffer {
            context: self.context.clone(),
            vertex_array: vertex_array_id,
            buffer: buffer_id,
            len: 0,
        })
    }

    pub unsafe fn create_texture(&mut self, width: u32, height: u32) -> Result<Texture, GLError> {
        let texture_id = self.context.create_texture().map_err(GLError)?;
        self.context
            .bind_texture(glow::TEXTURE_2D, Some(texture_id));
        self.context.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::NEAREST as i32,
        );
        self.context.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::NEAREST as i32,
        );
        self.context.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        self.context.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );

        self.context.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );

        let texture_id = Rc::new(texture_id);
        self.textures.push(texture_id.clone());
        Ok(Texture {
            context: self.context.clone(),
            texture_id,
            width,
            height,
        })
    }

    pub unsafe fn maintain(&mut self) {
        for i in (0..self.programs.len()).rev() {
            if Rc::strong_count(&self.programs[i]) == 1 {
                let program = self.programs.swap_remove(i);
                self.context.delete_program(*program);
            }
        }
        for i in (0..self.shaders.len()).rev() {
            if Rc::strong_count(&self.shaders[i]) == 1 {
                let shader = self.shaders.swap_remove(i);
                self.context.delete_shader(*shader);
            }
        }
        for i in (0..self.vertex_arrays.len()).rev() {
            if Rc::strong_count(&self.vertex_arrays[i]) == 1 {
                let vertex_array = self.vertex_arrays.swap_remove(i);
                self.context.delete_vertex_array(*vertex_array);
            }
        }
        for i in (0..self.buffers.len()).rev() {
            if Rc::strong_count(&self.buffers[i]) == 1 {
                let buffer = self.buffers.swap_remove(i);
                self.context.delete_buffer(*buffer);
            }
        }
        for i in (0..self.textures.len()).rev() {
            if Rc::strong_count(&self.textures[i]) == 1 {
                let texture = self.textures.swap_remove(i);
                self.context.delete_texture(*texture);
            }
        }
    }

    pub unsafe fn clear(&mut self, color: [f32; 4]) {
        self.context
            .clear_color(color[0], color[1], color[2], color[3]);
        self.context.clear(glow::COLOR_BUFFER_BIT);
    }
}

impl VertexBuffer {
    pub unsafe fn write<V: AsBytes>(&mut self, vertices: &[V]) {
        self.len = vertices.len();
        self.context.bind_vertex_array(Some(*self.vertex_array));
        self.context
            .bind_buffer(glow::ARRAY_BUFFER, Some(*self.buffer));
        self.context.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            vertices.as_bytes(),
            glow::STREAM_DRAW,
        );
    }
}

impl Texture {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes RGBA8 rows into the given region.
    pub unsafe fn write(&mut self, x: u32, y: u32, width: u32, height: u32, data: &[u8]) {
        self.context
            .bind_texture(glow::TEXTURE_2D, Some(*self.texture_id));
        self.context.tex_sub_image_2d_u8_slice(
            glow::TEXTURE_2D,
            0,
            x as i32,
            y as i32,
            width as i32,
            height as i32,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            Some(data),
        );
    }
}

#[repr(u32)]
pub enum ShaderType {
    Vertex = glow::VERTEX_SHADER,
    Fragment = glow::FRAGMENT_SHADER,
}

struct VertexFormatInner {
    stride: i32,
    attributes: Vec<(VertexAttributeLocation, VertexAttributeInner)>,
}

struct VertexAttributeInner {
    size: u32,
    offset: u32,
}

pub struct Program {
    context: Rc<glow::Context>,
    program_id: Rc<ProgramId>,
    // held so the shaders outlive the program in `Context::maintain`
    _vertex_shader: Rc<ShaderId>,
    _fragment_shader: Rc<ShaderId>,
    uniform_entry_types: Vec<UniformType>,
    set_uniforms: Vec<(UniformLocationId, Option<SetUniformValue>)>,
    vertex_format: VertexFormatInner,
}

impl Program {
    pub fn set_uniform(&mut self, index: usize, value: Uniform<'_>) -> Result<(), GLError> {
        if index >= self.set_uniforms.len() {
            return Err(GLError(format!("Uniform index {} is out of range", index)));
        }
        if value.uniform_type() != self.uniform_entry_types[index] {
            return Err(GLError(format!(
                "Wrong uniform type. Expected: {:?} Got uniform of type: {:?}",
                self.uniform_entry_types[index],
                value.uniform_type()
            )));
        }
        self.set_uniforms[index].1 = Some(match value {
            Uniform::Texture(texture) => SetUniformValue::Texture(texture.texture_id.clone()),
            Uniform::Mat3(m) => SetUniformValue::Mat3(m),
        });

        Ok(())
    }

    pub unsafe fn render_vertices(&self, vertex_buffer: &VertexBuffer) -> Result<(), GLError> {
        self.context
            .blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
        self.context.enable(glow::BLEND);

        self.context
            .bind_vertex_array(Some(*vertex_buffer.vertex_array));
        self.context
            .bind_buffer(glow::ARRAY_BUFFER, Some(*vertex_buffer.buffer));

        self.context.use_program(Some(*self.program_id));

        let mut texture_index = 0;
        for (i, (location, uniform_value)) in self.set_uniforms.iter().enumerate() {
            match uniform_value {
                None => return Err(GLError(format!("uniform {} is not set", i))),
                Some(SetUniformValue::Texture(texture)) => {
                    self.context.active_texture(glow::TEXTURE0 + texture_index);
                    self.context.bind_texture(glow::TEXTURE_2D, Some(**texture));
                    self.context
                        .uniform_1_i32(Some(location.clone()), texture_index as i32);
                    texture_index += 1;
                }
                Some(SetUniformValue::Mat3(m)) => {
                    self.context.uniform_matrix_3_f32_slice(
                        Some(location.clone()),
                        false,
                        &[
                            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1],
                            m[2][2],
                        ],
                    );
                }
            }
        }

        for (location, attribute) in self.vertex_format.attributes.iter() {
            self.context.enable_vertex_attrib_array(*location);
            self.context.vertex_attrib_pointer_f32(
                *location,
                attribute.size as i32,
                glow::FLOAT,
                false,
                self.vertex_format.stride,
                attribute.offset as i32,
            );
        }

        self.context
            .draw_arrays(glow::TRIANGLES, 0, vertex_buffer.len as i32);

        Ok(())
    }
}

enum SetUniformValue {
    Texture(Rc<TextureId>),
    Mat3([[f32; 3]; 3]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformType {
    Texture,
    Mat3,
}

pub enum Uniform<'a> {
    Texture(&'a Texture),
    /// Column major.
    Mat3([[f32; 3]; 3]),
}

impl<'a> Uniform<'a> {
    fn uniform_type(&self) -> UniformType {
        match self {
            Uniform::Texture(_) => UniformType::Texture,
            Uniform::Mat3(_) => UniformType::Mat3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UniformEntry<'a> {
    pub name: &'a str,
    pub ty: UniformType,
}

/// A float vertex attribute.
#[derive(Clone)]
pub struct VertexAttribute<'a> {
    pub name: &'a str,
    pub size: u32,
    pub offset: u32,
}

type VertexAttributeLocation = u32;

pub struct VertexFormat<'a> {
    pub stride: usize,
    pub attributes: &'a [VertexAttribute<'a>],
}

pub struct ProgramDescriptor<'a> {
    pub vertex_shader: &'a Shader,
    pub fragment_shader: &'a Shader,
    pub uniforms: &'a [UniformEntry<'a>],
    pub vertex_format: VertexFormat<'a>,
}
