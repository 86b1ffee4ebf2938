mod assets;
mod constants;
mod entity;
mod game;
#[allow(unused)]
mod gl;
mod graphics;
mod input;
mod platform;
mod render;
mod settings;
mod sprite_store;
mod texture_atlas;
mod time;

use anyhow::Error;

use constants::{SCREEN_SIZE, WINDOW_TITLE};
use game::{Flow, Game, Sprites};
use settings::{RenderBackend, Settings};
use time::{FixedStep, FpsCounter};

fn main() {
    let settings = match Settings::from_args(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            let names: Vec<_> = RenderBackend::ALL.iter().map(|b| b.name()).collect();
            eprintln!("Usage: invaders [{}]", names.join("|"));
            std::process::exit(1);
        }
    };

    let result = platform::run(WINDOW_TITLE, SCREEN_SIZE, move |gl_context: &mut gl::Context| {
        let mut renderer = render::create(settings.backend, gl_context, SCREEN_SIZE)?;
        let sprites = Sprites::load(renderer.as_mut(), gl_context)?;
        log::info!("{} renderer ready", renderer.backend());

        let mut game = Game::new(sprites);
        let mut fps = FpsCounter::new();
        let mut step = FixedStep::new();
        Ok(
            move |dt: f32,
                  inputs: &[input::InputEvent],
                  gl_context: &mut gl::Context,
                  window: &mut platform::WindowRequests|
                  -> Result<(), Error> {
                let flow = step.advance(dt, inputs, |tick_dt, tick_inputs| {
                    game.update(tick_dt, tick_inputs)
                });
                if flow == Flow::Exit {
                    window.close = true;
                    return Ok(());
                }

                game.draw(renderer.as_mut());
                renderer.present(gl_context)?;

                if let Some(fps) = fps.frame(dt) {
                    window.title = Some(format!("{} (FPS: {})", WINDOW_TITLE, fps));
                }
                Ok(())
            },
        )
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
