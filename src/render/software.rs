use anyhow::Error;
use euclid::{default::Point2D, point2, size2};
use image::{Rgba, RgbaImage};

use super::Renderer;
use crate::{
    constants::CLEAR_COLOR,
    gl,
    graphics::{create_sprite_program, full_uv, render_quad, Vertex, TEXTURE_UNIFORM},
    settings::RenderBackend,
    sprite_store::{Sprite, SpriteStore},
};

/// Composites sprites on the CPU, then shows the finished frame as a single
/// full screen texture.
pub struct SoftwareRenderer {
    frame: RgbaImage,
    sprites: SpriteStore<RgbaImage>,

    program: gl::Program,
    vertex_buffer: gl::VertexBuffer,
    frame_texture: gl::Texture,
}

impl SoftwareRenderer {
    pub fn new(context: &mut gl::Context, screen_size: (u32, u32)) -> Result<Self, Error> {
        let mut program = create_sprite_program(context, screen_size)?;
        let frame_texture = unsafe { context.create_texture(screen_size.0, screen_size.1)? };
        program.set_uniform(TEXTURE_UNIFORM, gl::Uniform::Texture(&frame_texture))?;

        let mut vertex_buffer = unsafe { context.create_vertex_buffer()? };
        let mut vertices: Vec<Vertex> = Vec::with_capacity(6);
        render_quad(
            point2(0., 0.),
            size2(screen_size.0 as f32, screen_size.1 as f32),
            full_uv(),
            &mut vertices,
        );
        unsafe { vertex_buffer.write(&vertices) };

        let mut frame = RgbaImage::new(screen_size.0, screen_size.1);
        clear(&mut frame);

        Ok(Self {
            frame,
            sprites: SpriteStore::new(),
            program,
            vertex_buffer,
            frame_texture,
        })
    }
}

impl Renderer for SoftwareRenderer {
    fn backend(&self) -> RenderBackend {
        RenderBackend::Software
    }

    fn load_sprite(
        &mut self,
        _context: &mut gl::Context,
        sprite_ref: &str,
    ) -> Result<Sprite, Error> {
        self.sprites.get_or_load(sprite_ref, Ok)
    }

    fn draw(&mut self, sprite: &Sprite, position: Point2D<f32>) {
        blit(&mut self.frame, self.sprites.get(sprite), position);
    }

    fn present(&mut self, context: &mut gl::Context) -> Result<(), Error> {
        unsafe {
            self.frame_texture.write(
                0,
                0,
                self.frame.width(),
                self.frame.height(),
                self.frame.as_raw(),
            );
            context.clear(CLEAR_COLOR);
            self.program.render_vertices(&self.vertex_buffer)?;
        }
        clear(&mut self.frame);
        Ok(())
    }
}

fn clear(frame: &mut RgbaImage) {
    let [r, g, b, a] = CLEAR_COLOR;
    let color = Rgba([
        (r * 255.) as u8,
        (g * 255.) as u8,
        (b * 255.) as u8,
        (a * 255.) as u8,
    ]);
    for pixel in frame.pixels_mut() {
        *pixel = color;
    }
}

/// Copies the opaque pixels of `sprite` onto `frame` with its top left corner
/// at `position`, clipped to the frame. Any non-zero alpha counts as opaque.
fn blit(frame: &mut RgbaImage, sprite: &RgbaImage, position: Point2D<f32>) {
    let origin_x = position.x as i64;
    let origin_y = position.y as i64;
    let x_range = origin_x.max(0)..(origin_x + sprite.width() as i64).min(frame.width() as i64);
    let y_range = origin_y.max(0)..(origin_y + sprite.height() as i64).min(frame.height() as i64);

    for y in y_range {
        for x in x_range.clone() {
            let pixel = sprite.get_pixel((x - origin_x) as u32, (y - origin_y) as u32);
            if pixel[3] > 0 {
                frame.put_pixel(x as u32, y as u32, *pixel);
            }
        }
    }
}
