use pixels::Pixels;
use winit::dpi::PhysicalPosition;

use crate::app::physical_to_vec2;
use crate::surface::{Surface, SurfaceSize};
use crate::ui::Vec2;

/// Window presenter built on `pixels`.
///
/// The pixel buffer always stays at the logical frame size; only the window surface follows the
/// window, and `pixels` letterboxes the buffer into it. Pointer positions are mapped back into
/// buffer coordinates with [`PixelsPresenter::to_logical`].
pub struct PixelsPresenter {
    pixels: Pixels,
    logical: SurfaceSize,
}

impl PixelsPresenter {
    pub fn new(pixels: Pixels, logical: SurfaceSize) -> Self {
        Self { pixels, logical }
    }

    pub fn resize_window(&mut self, width: u32, height: u32) -> Result<(), pixels::Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }

    /// Maps a window position into the logical frame, clamping positions in the letterbox bars.
    pub fn to_logical(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let raw = physical_to_vec2(position);
        let max_x = self.logical.width.saturating_sub(1) as f32;
        let max_y = self.logical.height.saturating_sub(1) as f32;
        match self.pixels.window_pos_to_pixel((raw.x, raw.y)) {
            Ok((x, y)) => Vec2::new(x as f32, y as f32),
            Err((x, y)) => Vec2::new((x as f32).clamp(0.0, max_x), (y as f32).clamp(0.0, max_y)),
        }
    }
}

impl Surface for PixelsPresenter {
    type Error = pixels::Error;

    fn size(&self) -> SurfaceSize {
        self.logical
    }

    fn frame_mut(&mut self) -> &mut [u8] {
        self.pixels.frame_mut()
    }

    fn present(&mut self) -> Result<(), Self::Error> {
        self.pixels.render()
    }
}
