use cfg_if::cfg_if;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use simulation::ControlInput;

mod camera;
mod controls;
mod geometry;
mod profiler;
mod scene;
mod state;
use state::State;

const WINDOW_TITLE: &str = "Light Clock";
const WINDOW_WIDTH: f64 = 1280.0;
const WINDOW_HEIGHT: f64 = 640.0;

thread_local! {
    // Inputs from outside the event loop (the page's controls on wasm),
    // applied at the start of the next frame.
    static PENDING_INPUTS: RefCell<Vec<ControlInput>> = RefCell::new(Vec::new());
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn enqueue(input: ControlInput) {
    PENDING_INPUTS.with(|queue| queue.borrow_mut().push(input));
}

pub(crate) fn take_pending_inputs() -> Vec<ControlInput> {
    PENDING_INPUTS.with(|queue| std::mem::take(&mut *queue.borrow_mut()))
}

struct App {
    state: Rc<RefCell<Option<State<'static>>>>,
    window: Option<Arc<Window>>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(None)),
            window: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let mut window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|win| win.document())
                .and_then(|doc| doc.get_element_by_id("wasm-canvas"))
                .and_then(|canvas| canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            if canvas.is_none() {
                log::warn!("no #wasm-canvas element; letting winit create one");
            }
            window_attributes = window_attributes.with_canvas(canvas);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                let state_ref = Rc::clone(&self.state);
                wasm_bindgen_futures::spawn_local(async move {
                    match State::new(window).await {
                        Ok(new_state) => {
                            *state_ref.borrow_mut() = Some(new_state);
                            log::info!("renderer ready");
                        }
                        Err(err) => log::error!("renderer setup failed: {err:#}"),
                    }
                });
            } else {
                match pollster::block_on(State::new(window)) {
                    Ok(new_state) => *self.state.borrow_mut() = Some(new_state),
                    Err(err) => {
                        log::error!("renderer setup failed: {err:#}");
                        event_loop.exit();
                    }
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else {
            return;
        };
        if window.id() != id {
            return;
        }

        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        {
            event_loop.exit();
            return;
        }

        if let Some(state) = self.state.borrow_mut().as_mut() {
            if state.input(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                if let Some(state) = self.state.borrow_mut().as_mut() {
                    state.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.borrow_mut().as_mut() {
                    match state.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            state.resize(state.size)
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("OutOfMemory");
                            event_loop.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            log::warn!("Surface timeout")
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Sets β from the page's slider. Out-of-range values are clamped.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_velocity_ratio(value: f32) {
    let beta = simulation::VelocityRatio::saturating(value);
    if beta.get() != value {
        log::warn!("velocity ratio {value} clamped to {}", beta.get());
    }
    enqueue(ControlInput::SetVelocityRatio(beta.get()));
}

/// Accepts a scenario name such as `"earth-orbit"`, in any case.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn select_scenario(name: &str) {
    match name.parse::<simulation::Scenario>() {
        Ok(scenario) => enqueue(ControlInput::SelectScenario(scenario)),
        Err(err) => log::warn!("{err}"),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn toggle_play() {
    enqueue(ControlInput::TogglePlay);
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_trail_enabled(enabled: bool) {
    enqueue(ControlInput::SetTrailEnabled(enabled));
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn reset_simulation() {
    enqueue(ControlInput::Reset);
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen)]
pub fn run() {
    cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            let _ = console_log::init_with_level(log::Level::Warn);
        } else {
            env_logger::init();
        }
    }

    log::info!("Space play/pause, Up/Down β, 1-4 scenario, T trail, R reset, Esc quit");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("failed to create event loop: {err}");
            return;
        }
    };
    let mut app = App::default();
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_inputs_drain_in_order() {
        enqueue(ControlInput::TogglePlay);
        enqueue(ControlInput::Reset);
        assert_eq!(
            take_pending_inputs(),
            vec![ControlInput::TogglePlay, ControlInput::Reset]
        );
        assert!(take_pending_inputs().is_empty());
    }
}
