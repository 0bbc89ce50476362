use std::path::PathBuf;

use clap::Parser;
use winit::{
    event::*,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

use wgpu_flag_demo::{State, TextureOptions};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image to fly on the flag instead of the built-in tricolor
    #[arg(long)]
    flag_texture: Option<PathBuf>,

    /// Image atlas for the flagpole, ground, and wall
    #[arg(long)]
    backdrop_texture: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let event_loop = winit::event_loop::EventLoop::new().expect("Failed to create event loop");

    let window = WindowBuilder::new()
        .with_title("Flag")
        .build(&event_loop)
        .unwrap();

    let mut state = State::new(
        window,
        TextureOptions {
            flag: args.flag_texture.as_deref(),
            backdrop: args.backdrop_texture.as_deref(),
        },
    )
    .expect("Failed to initialize");
    let mut mouse_captured = false;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
                match event {
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key_code),
                                state: key_state,
                                ..
                            },
                        ..
                    } => {
                        let pressed = key_state == ElementState::Pressed;
                        match key_code {
                            KeyCode::Escape => {
                                if pressed {
                                    mouse_captured = false;
                                    state
                                        .window()
                                        .set_cursor_grab(winit::window::CursorGrabMode::None)
                                        .unwrap();
                                    state.window().set_cursor_visible(true);
                                }
                            }
                            _ => state.scene.process_keyboard(key_code, pressed),
                        }
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        mouse_captured = true;
                        state
                            .window()
                            .set_cursor_grab(winit::window::CursorGrabMode::Confined)
                            .or_else(|_e| {
                                state
                                    .window()
                                    .set_cursor_grab(winit::window::CursorGrabMode::Locked)
                            })
                            .unwrap();
                        state.window().set_cursor_visible(false);
                    }
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        state.resize(new_size.width, new_size.height);
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(e) = state.render() {
                            log::error!("Render error: {}", e);
                        }
                    }
                    _ => {}
                }
            }
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } if mouse_captured => {
                state.scene.process_mouse(delta.0 as f32, delta.1 as f32);
            }
            Event::AboutToWait => {
                if let Err(e) = state.update() {
                    log::error!("Update error: {}", e);
                }
                state.window().request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
