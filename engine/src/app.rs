use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{
    ElementState, Event, KeyboardInput, MouseButton, TouchPhase, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, WindowBuilder};

use crate::error::EngineError;
use crate::graphics::{CpuRenderer, Renderer2d};
use crate::input::{InputEvent, PointerEvent, PointerTracker};
use crate::pixels_renderer::PixelsPresenter;
use crate::surface::{Surface, SurfaceSize};
use crate::ui::Vec2;

/// Longest simulated step for one frame; a stalled window must not fling everything at once.
pub const MAX_FRAME_DT: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    /// Logical frame size every screen lays out against.
    pub logical_size: SurfaceSize,
    /// Initial window size; the frame is scaled to fit it.
    pub window_size: SurfaceSize,
    pub fullscreen: bool,
    pub fps: u32,
}

impl AppConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.fps.max(1) as u64)
    }
}

/// Something the driver can pump once per frame.
pub trait FrameApp {
    fn handle_input(&mut self, event: &PointerEvent);
    fn update(&mut self, dt: f32);
    fn render(&mut self, gfx: &mut dyn Renderer2d);
}

/// Runs one frame in the fixed order: all queued input, then update, then draw.
pub fn run_frame<A, I>(app: &mut A, events: I, dt: f32, frame: &mut [u8], size: SurfaceSize)
where
    A: FrameApp + ?Sized,
    I: IntoIterator<Item = PointerEvent>,
{
    for event in events {
        app.handle_input(&event);
    }
    app.update(dt.clamp(0.0, MAX_FRAME_DT));

    let mut gfx = CpuRenderer::new(frame, size);
    gfx.begin_frame(size);
    app.render(&mut gfx);
}

/// Opens the window and drives `app` until the window closes or Escape is pressed.
pub fn run_app<A: FrameApp + 'static>(config: AppConfig, mut app: A) -> Result<(), EngineError> {
    let event_loop = EventLoop::new();
    let logical = config.logical_size;

    let mut builder = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.window_size.width, config.window_size.height))
        .with_resizable(!config.fullscreen);
    if config.fullscreen {
        builder = builder.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = builder.build(&event_loop)?;
    if config.fullscreen {
        window.set_cursor_visible(false);
    }

    let window_size = window.inner_size();
    let texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let pixels = Pixels::new(logical.width, logical.height, texture)?;
    let mut presenter = PixelsPresenter::new(pixels, logical);

    tracing::info!(
        title = %config.title,
        width = logical.width,
        height = logical.height,
        fullscreen = config.fullscreen,
        fps = config.fps,
        "window opened"
    );

    let frame_interval = config.frame_interval();
    let mut tracker = PointerTracker::default();
    let mut queued: Vec<PointerEvent> = Vec::new();
    let mut last_frame = Instant::now();
    let mut next_frame = last_frame + frame_interval;

    event_loop.run(move |event, _, control_flow| {
        match &event {
            Event::WindowEvent { event, .. } => {
                if let WindowEvent::Resized(size) = event {
                    if let Err(err) = presenter.resize_window(size.width, size.height) {
                        tracing::warn!(%err, "surface resize failed");
                    }
                }
                match translate(event, &mut tracker, |p| presenter.to_logical(p)) {
                    Some(InputEvent::Quit) => {
                        tracing::info!("quit requested");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    Some(InputEvent::Pointer(ev)) => queued.push(ev),
                    None => {}
                }
            }
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame).as_secs_f32();
                last_frame = now;

                let size = presenter.size();
                run_frame(&mut app, queued.drain(..), dt, presenter.frame_mut(), size);
                if let Err(err) = presenter.present() {
                    tracing::error!(%err, "present failed");
                }
            }
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_frame {
                    window.request_redraw();
                    next_frame += frame_interval;
                    if next_frame < now {
                        next_frame = now + frame_interval;
                    }
                }
            }
            _ => {}
        }

        if *control_flow != ControlFlow::Exit {
            *control_flow = ControlFlow::WaitUntil(next_frame);
        }
    });
}

/// Maps a window event to app input. Escape and window close quit; only the left button and
/// the first finger produce pointer events.
fn translate<F>(event: &WindowEvent, tracker: &mut PointerTracker, to_logical: F) -> Option<InputEvent>
where
    F: Fn(PhysicalPosition<f64>) -> Vec2,
{
    match event {
        WindowEvent::CloseRequested => Some(InputEvent::Quit),
        WindowEvent::KeyboardInput {
            input:
                KeyboardInput {
                    virtual_keycode: Some(VirtualKeyCode::Escape),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } => Some(InputEvent::Quit),
        WindowEvent::CursorMoved { position, .. } => {
            Some(tracker.cursor_moved(to_logical(*position)).into())
        }
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => {
            let ev = match state {
                ElementState::Pressed => tracker.mouse_pressed(),
                ElementState::Released => tracker.mouse_released(),
            };
            ev.map(InputEvent::from)
        }
        WindowEvent::Touch(touch) => {
            let pos = to_logical(touch.location);
            let ev = match touch.phase {
                TouchPhase::Started => tracker.touch_started(touch.id, pos),
                TouchPhase::Moved => tracker.touch_moved(touch.id, pos),
                TouchPhase::Ended | TouchPhase::Cancelled => tracker.touch_ended(touch.id, pos),
            };
            ev.map(InputEvent::from)
        }
        _ => None,
    }
}

pub(crate) fn physical_to_vec2(position: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}
