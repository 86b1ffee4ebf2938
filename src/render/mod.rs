//! Interchangeable ways of getting sprites on screen.
//!
//! The backend is picked once at start-up. Sprites are only valid for the
//! renderer that loaded them.

mod gl_atlas;
mod gl_texture;
mod software;

use anyhow::Error;
use euclid::default::Point2D;

pub use gl_atlas::GlAtlasRenderer;
pub use gl_texture::GlTextureRenderer;
pub use software::SoftwareRenderer;

use crate::{gl, settings::RenderBackend, sprite_store::Sprite};

pub trait Renderer {
    fn backend(&self) -> RenderBackend;

    /// Loads the sprite named by `sprite_ref`, or returns the one already
    /// loaded under that name.
    fn load_sprite(&mut self, context: &mut gl::Context, sprite_ref: &str)
        -> Result<Sprite, Error>;

    /// Queues `sprite` with its top left corner at `position` (screen pixels).
    fn draw(&mut self, sprite: &Sprite, position: Point2D<f32>);

    /// Puts everything drawn since the last call on screen.
    fn present(&mut self, context: &mut gl::Context) -> Result<(), Error>;
}

pub fn create(
    backend: RenderBackend,
    context: &mut gl::Context,
    screen_size: (u32, u32),
) -> Result<Box<dyn Renderer>, Error> {
    Ok(match backend {
        RenderBackend::Software => Box::new(SoftwareRenderer::new(context, screen_size)?),
        RenderBackend::Gl => Box::new(GlAtlasRenderer::new(context, screen_size)?),
        RenderBackend::GlTexture => Box::new(GlTextureRenderer::new(context, screen_size)?),
    })
}
