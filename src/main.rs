use std::cell::RefCell;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

mod camera;
mod collision;
mod config;
mod game;
mod gpu;
mod input;
mod mesh;
mod overlay;
mod player;
mod render;
mod scene;

use config::Tuning;
use game::GameState;
use input::InputState;
use overlay::ContactOverlay;
use render::Renderer;
use scene::LoadedScene;

struct ClientState {
    renderer: Renderer,
    game: GameState,
    input: InputState,
    overlay: ContactOverlay,
}

impl ClientState {
    fn new(renderer: Renderer, tuning: Tuning) -> Self {
        Self {
            renderer,
            game: GameState::new(tuning),
            input: InputState::new(),
            overlay: ContactOverlay::new(),
        }
    }

    fn attach_scene(&mut self, scene: LoadedScene) {
        self.renderer.upload_scene(&scene.mesh);
        self.game.set_obstacles(scene.obstacles);
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        self.game.tick(self.input.intent());
        self.overlay.update(self.game.in_contact);

        match self.renderer.render_frame(&self.game) {
            Ok(_) => self.renderer.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = (self.renderer.width(), self.renderer.height());
                self.renderer.resize(w, h);
                self.renderer.request_redraw();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
            Err(e) => {
                log::error!("Render error: {:?}", e);
                self.renderer.request_redraw();
            }
        }
    }
}

thread_local! {
    static STATE: RefCell<Option<ClientState>> = const { RefCell::new(None) };
}

fn with_state(f: impl FnOnce(&mut ClientState)) {
    STATE.with(|s| {
        if let Some(state) = s.borrow_mut().as_mut() {
            f(state);
        }
    });
}

/// Drops the renderer and game state. The frame loop ends with them.
fn stop() {
    if STATE.with(|s| s.borrow_mut().take()).is_some() {
        log::info!("Stopped frame loop");
    }
}

struct App {
    tuning: Tuning,
}

impl App {
    fn new() -> Self {
        Self {
            tuning: Tuning::default(),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if STATE.with(|s| s.borrow().is_some()) {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("Column Walk"))
                .unwrap(),
        );

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;
            let canvas = window.canvas().expect("No canvas");

            let web_window = web_sys::window().expect("No window");
            let dpr = web_window.device_pixel_ratio();
            canvas.set_width((web_window.inner_width().unwrap().as_f64().unwrap() * dpr) as u32);
            canvas.set_height((web_window.inner_height().unwrap().as_f64().unwrap() * dpr) as u32);
            canvas
                .style()
                .set_css_text("width: 100%; height: 100%; display: block;");

            web_window
                .document()
                .and_then(|doc| {
                    let parent = doc
                        .get_element_by_id("wasm-container")
                        .or_else(|| doc.body().map(Into::into))?;
                    parent.append_child(&canvas).ok()
                })
                .expect("Couldn't append canvas");

            let tuning = self.tuning;
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = Renderer::new(window.clone(), tuning.player_size).await;
                STATE.with(|s| *s.borrow_mut() = Some(ClientState::new(renderer, tuning)));

                if let Err(e) = overlay::web::install(|| with_state(|state| state.overlay.dismiss())) {
                    log::warn!("Failed to install contact overlay: {:?}", e);
                }
                window.request_redraw();

                match scene::fetch_scene(config::SCENE_URL).await {
                    Ok(loaded) => with_state(|state| state.attach_scene(loaded)),
                    Err(e) => log::warn!("Continuing without scene: {}", e),
                }
            });
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = pollster::block_on(Renderer::new(window.clone(), self.tuning.player_size));
            let mut state = ClientState::new(renderer, self.tuning);

            let path = std::env::var("SCENE_PATH").unwrap_or_else(|_| config::SCENE_PATH.to_string());
            match scene::load_scene(std::path::Path::new(&path)) {
                Ok(loaded) => state.attach_scene(loaded),
                Err(e) => log::warn!("Continuing without scene {}: {}", path, e),
            }

            STATE.with(|s| *s.borrow_mut() = Some(state));
            window.request_redraw();
        }

        log::info!("Started frame loop");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                stop();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                with_state(|state| state.renderer.resize(size.width, size.height));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(key) = event.physical_key else {
                    return;
                };
                let pressed = event.state == ElementState::Pressed;
                with_state(|state| {
                    if key == KeyCode::Escape && pressed {
                        state.overlay.dismiss();
                    } else {
                        state.input.handle_key(key, pressed);
                    }
                });
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                let pressed = button_state == ElementState::Pressed;
                with_state(|state| state.input.handle_pointer_button(pressed));
            }
            WindowEvent::CursorMoved { position, .. } => {
                with_state(|state| state.input.handle_pointer_move(position.x, position.y));
            }
            WindowEvent::RedrawRequested => {
                with_state(|state| state.frame(event_loop));
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn run() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        console_log::init_with_level(log::Level::Info).expect("Logger init failed");
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        env_logger::init();
    }

    let event_loop = EventLoop::new().unwrap();
    #[allow(clippy::let_underscore_future)]
    let _ = event_loop.run_app(&mut App::new());
}

fn main() {
    run();
}
