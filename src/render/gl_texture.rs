use anyhow::Error;
use euclid::{default::Point2D, size2};

use super::Renderer;
use crate::{
    constants::CLEAR_COLOR,
    gl,
    graphics::{create_sprite_program, full_uv, render_quad, Vertex, TEXTURE_UNIFORM},
    settings::RenderBackend,
    sprite_store::{Sprite, SpriteStore},
};

/// Gives every sprite its own texture and issues one draw call per sprite
/// drawn.
pub struct GlTextureRenderer {
    program: gl::Program,
    vertex_buffer: gl::VertexBuffer,
    sprites: SpriteStore<gl::Texture>,
    draws: Vec<(Sprite, Point2D<f32>)>,
    vertices: Vec<Vertex>,
}

impl GlTextureRenderer {
    pub fn new(context: &mut gl::Context, screen_size: (u32, u32)) -> Result<Self, Error> {
        let program = create_sprite_program(context, screen_size)?;
        let vertex_buffer = unsafe { context.create_vertex_buffer()? };

        Ok(Self {
            program,
            vertex_buffer,
            sprites: SpriteStore::new(),
            draws: Vec::new(),
            vertices: Vec::with_capacity(6),
        })
    }
}

impl Renderer for GlTextureRenderer {
    fn backend(&self) -> RenderBackend {
        RenderBackend::GlTexture
    }

    fn load_sprite(
        &mut self,
        context: &mut gl::Context,
        sprite_ref: &str,
    ) -> Result<Sprite, Error> {
        self.sprites.get_or_load(sprite_ref, |image| {
            let (width, height) = image.dimensions();
            let mut texture = unsafe { context.create_texture(width, height)? };
            unsafe { texture.write(0, 0, width, height, image.as_raw()) };
            Ok(texture)
        })
    }

    fn draw(&mut self, sprite: &Sprite, position: Point2D<f32>) {
        self.draws.push((*sprite, position));
    }

    fn present(&mut self, context: &mut gl::Context) -> Result<(), Error> {
        unsafe { context.clear(CLEAR_COLOR) };
        for (sprite, position) in self.draws.drain(..) {
            let texture = self.sprites.get(&sprite);
            self.program
                .set_uniform(TEXTURE_UNIFORM, gl::Uniform::Texture(texture))?;

            self.vertices.clear();
            render_quad(
                position,
                size2(texture.width() as f32, texture.height() as f32),
                full_uv(),
                &mut self.vertices,
            );
            unsafe {
                self.vertex_buffer.write(&self.vertices);
                self.program.render_vertices(&self.vertex_buffer)?;
            }
        }
        Ok(())
    }
}
