use anyhow::Error;
use euclid::{default::Point2D, size2};

use super::Renderer;
use crate::{
    constants::CLEAR_COLOR,
    gl,
    graphics::{
        atlas_uv, create_sprite_program, render_quad, Vertex, TEXTURE_ATLAS_SIZE, TEXTURE_UNIFORM,
    },
    settings::RenderBackend,
    sprite_store::{Sprite, SpriteStore},
    texture_atlas::{TextureAtlas, TextureRect},
};

/// Packs every sprite into one atlas texture and batches a whole frame into a
/// single draw call.
pub struct GlAtlasRenderer {
    program: gl::Program,
    vertex_buffer: gl::VertexBuffer,
    texture: gl::Texture,
    atlas: TextureAtlas,
    sprites: SpriteStore<TextureRect>,
    vertices: Vec<Vertex>,
}

impl GlAtlasRenderer {
    pub fn new(context: &mut gl::Context, screen_size: (u32, u32)) -> Result<Self, Error> {
        let mut program = create_sprite_program(context, screen_size)?;
        let texture = unsafe {
            context.create_texture(TEXTURE_ATLAS_SIZE.width, TEXTURE_ATLAS_SIZE.height)?
        };
        program.set_uniform(TEXTURE_UNIFORM, gl::Uniform::Texture(&texture))?;
        let vertex_buffer = unsafe { context.create_vertex_buffer()? };

        Ok(Self {
            program,
            vertex_buffer,
            texture,
            atlas: TextureAtlas::new((TEXTURE_ATLAS_SIZE.width, TEXTURE_ATLAS_SIZE.height)),
            sprites: SpriteStore::new(),
            vertices: Vec::new(),
        })
    }
}

impl Renderer for GlAtlasRenderer {
    fn backend(&self) -> RenderBackend {
        RenderBackend::Gl
    }

    fn load_sprite(
        &mut self,
        _context: &mut gl::Context,
        sprite_ref: &str,
    ) -> Result<Sprite, Error> {
        let atlas = &mut self.atlas;
        let texture = &mut self.texture;
        self.sprites.get_or_load(sprite_ref, |image| {
            let rect = atlas.add_texture(image.dimensions())?;
            unsafe {
                texture.write(
                    rect[0],
                    rect[1],
                    rect[2] - rect[0],
                    rect[3] - rect[1],
                    image.as_raw(),
                );
            }
            Ok(rect)
        })
    }

    fn draw(&mut self, sprite: &Sprite, position: Point2D<f32>) {
        let rect = *self.sprites.get(sprite);
        let size = sprite.size();
        render_quad(
            position,
            size2(size.width as f32, size.height as f32),
            atlas_uv(rect, TEXTURE_ATLAS_SIZE),
            &mut self.vertices,
        );
    }

    fn present(&mut self, context: &mut gl::Context) -> Result<(), Error> {
        unsafe {
            context.clear(CLEAR_COLOR);
            self.vertex_buffer.write(&self.vertices);
            self.program.render_vertices(&self.vertex_buffer)?;
        }
        self.vertices.clear();
        Ok(())
    }
}
