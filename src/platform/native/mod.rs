use anyhow::{format_err, Error};
use glutin::event::{ElementState, KeyboardInput, VirtualKeyCode};

use crate::{
    gl,
    input::{InputEvent, Key},
};

/// What the frame callback wants done to the window once it returns.
#[derive(Debug, Default)]
pub struct WindowRequests {
    pub title: Option<String>,
    pub close: bool,
}

/// Opens the window and runs the event loop until the window closes.
///
/// `f` is called once the GL context is current and returns the frame
/// callback, which then runs on every redraw with the seconds elapsed since
/// the previous redraw and the input received in between. Errors from either
/// end the process.
pub fn run<F, U>(title: &str, size: (u32, u32), f: F) -> Result<(), Error>
where
    F: FnOnce(&mut gl::Context) -> Result<U, Error>,
    U: FnMut(f32, &[InputEvent], &mut gl::Context, &mut WindowRequests) -> Result<(), Error>
        + 'static,
{
    use glutin::{
        event,
        event::WindowEvent,
        event_loop::{ControlFlow, EventLoop},
    };
    use std::time::Instant;

    env_logger::init();
    let event_loop = EventLoop::new();
    let wb = glutin::window::WindowBuilder::new()
        .with_title(title)
        .with_inner_size(glutin::dpi::LogicalSize::new(size.0, size.1))
        .with_resizable(false);
    let windowed_context = glutin::ContextBuilder::new()
        .with_gl(glutin::GlRequest::Specific(glutin::Api::OpenGlEs, (2, 0)))
        .with_vsync(true)
        .build_windowed(wb, &event_loop)
        .map_err(|e| format_err!("Could not create window: {:?}", e))?;
    let windowed_context = unsafe {
        windowed_context
            .make_current()
            .map_err(|(_, e)| format_err!("Could not make GL context current: {:?}", e))?
    };

    let mut gl_context =
        gl::Context::from_glow_context(glow::Context::from_loader_function(|addr| {
            windowed_context.get_proc_address(addr)
        }));

    let mut update_fn = f(&mut gl_context)?;

    let mut input_events = Vec::new();
    let mut last_time = Instant::now();
    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            event::Event::MainEventsCleared => windowed_context.window().request_redraw(),
            event::Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                log::info!("Window closed");
                *control_flow = ControlFlow::Exit;
            }
            event::Event::WindowEvent {
                event:
                    WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                virtual_keycode: Some(key),
                                state,
                                ..
                            },
                        ..
                    },
                ..
            } => {
                let key = get_key(key);
                input_events.push(match state {
                    ElementState::Pressed => InputEvent::KeyDown(key),
                    ElementState::Released => InputEvent::KeyUp(key),
                });
            }
            event::Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = (now - last_time).as_micros() as f32 / 1_000_000.;
                last_time = now;

                let mut requests = WindowRequests::default();
                let result = update_fn(dt, &input_events, &mut gl_context, &mut requests)
                    .and_then(|()| {
                        windowed_context
                            .swap_buffers()
                            .map_err(|e| format_err!("Could not swap buffers: {:?}", e))
                    });
                input_events.clear();
                unsafe { gl_context.maintain() };

                if let Err(e) = result {
                    log::error!("{:#}", e);
                    std::process::exit(1);
                }
                if let Some(title) = requests.title {
                    windowed_context.window().set_title(&title);
                }
                if requests.close {
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    })
}

fn get_key(vk: VirtualKeyCode) -> Key {
    match vk {
        VirtualKeyCode::Left => Key::Left,
        VirtualKeyCode::Right => Key::Right,
        VirtualKeyCode::Up => Key::Up,
        VirtualKeyCode::Down => Key::Down,
        VirtualKeyCode::Space => Key::Space,
        VirtualKeyCode::Return => Key::Return,
        VirtualKeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}
