pub mod app;
pub mod assets;
pub mod drag;
pub mod error;
pub mod graphics;
pub mod input;
pub mod particles;
pub mod pixels_renderer;
pub mod placement;
pub mod press;
pub mod screen;
pub mod scroll;
pub mod surface;
pub mod toolbar;
pub mod ui;

pub use error::EngineError;

use app::{FrameApp, run_frame};
use input::PointerEvent;
use surface::{RgbaBufferSurface, Surface, SurfaceSize};

/// Drives a [`FrameApp`] without a window: same frame order as the real loop, rendered into an
/// in-memory RGBA buffer.
pub struct HeadlessDriver<A: FrameApp> {
    app: A,
    surface: RgbaBufferSurface,
    frame: u64,
}

impl<A: FrameApp> HeadlessDriver<A> {
    pub fn new(app: A, size: SurfaceSize) -> Self {
        Self {
            app,
            surface: RgbaBufferSurface::new(size),
            frame: 0,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn surface(&self) -> &RgbaBufferSurface {
        &self.surface
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Runs one frame with `events` queued before it. Returns the new frame number.
    pub fn step<I>(&mut self, events: I, dt: f32) -> u64
    where
        I: IntoIterator<Item = PointerEvent>,
    {
        let size = self.surface.size();
        run_frame(&mut self.app, events, dt, self.surface.frame_mut(), size);
        // Infallible.
        let _ = self.surface.present();
        self.frame += 1;
        self.frame
    }

    /// Runs `frames` frames with no input.
    pub fn idle(&mut self, frames: usize, dt: f32) -> u64 {
        for _ in 0..frames {
            self.step(std::iter::empty(), dt);
        }
        self.frame
    }

    /// A full press-and-release at `pos`, spread over two frames.
    pub fn tap(&mut self, pos: ui::Vec2, dt: f32) -> u64 {
        self.step([PointerEvent::Down(pos)], dt);
        self.step([PointerEvent::Up(pos)], dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::Renderer2d;
    use crate::ui::{Rect, Vec2};

    /// Paints a white square wherever the last press landed.
    #[derive(Default)]
    struct TapMarker {
        last_down: Option<Vec2>,
        updates: u32,
    }

    impl FrameApp for TapMarker {
        fn handle_input(&mut self, event: &PointerEvent) {
            if let PointerEvent::Down(p) = event {
                self.last_down = Some(*p);
            }
        }

        fn update(&mut self, _dt: f32) {
            self.updates += 1;
        }

        fn render(&mut self, gfx: &mut dyn Renderer2d) {
            gfx.clear([0, 0, 0, 255]);
            if let Some(p) = self.last_down {
                gfx.fill_rect(Rect::centered_at(p, 4, 4), [255, 255, 255, 255]);
            }
        }
    }

    #[test]
    fn headless_driver_renders_each_step() {
        let mut driver = HeadlessDriver::new(TapMarker::default(), SurfaceSize::new(32, 32));
        driver.idle(2, 0.016);
        assert_eq!(driver.surface().pixel(10, 10), Some([0, 0, 0, 255]));

        driver.tap(Vec2::new(10.0, 10.0), 0.016);
        assert_eq!(driver.frame(), 4);
        assert_eq!(driver.app().updates, 4);
        assert_eq!(driver.surface().presented_frames(), 4);
        assert_eq!(driver.surface().pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(driver.surface().pixel(20, 20), Some([0, 0, 0, 255]));
    }
}
