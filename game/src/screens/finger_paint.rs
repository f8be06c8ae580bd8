use engine::assets::Image;
use engine::graphics::{Color, CpuRenderer, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Spark, SparkPool};
use engine::screen::{Nav, Screen};
use engine::surface::SurfaceSize;
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const PALETTE: [Color; 8] = [
    rgb(220, 30, 30),
    rgb(255, 140, 0),
    rgb(255, 220, 0),
    rgb(30, 180, 50),
    rgb(30, 100, 220),
    rgb(130, 40, 200),
    rgb(255, 100, 180),
    rgb(255, 255, 255),
];
const DEFAULT_COLOR: usize = 4;

const BRUSH_SIZES: [f32; 3] = [6.0, 14.0, 24.0];
const DEFAULT_BRUSH: usize = 1;

const TOOLBAR_H: i32 = 90;
const TOOLBAR_Y: i32 = SCREEN_H - TOOLBAR_H;
const SWATCH: i32 = 44;
const SWATCH_STEP: i32 = 49;
const BRUSH_BTN_R: f32 = 20.0;
const BRUSH_X: i32 = 405;
const BRUSH_STEP: i32 = 46;
const STAMP: i32 = 50;
const STAMP_X: i32 = 551;
const STAMP_STEP: i32 = 54;
const CLEAR_BUTTON: Rect = Rect::new(SCREEN_W - 90 - 12, 16, 90, 44);

/// Travel between stroke sparkles.
const SPARKLE_EVERY: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    Star,
    Heart,
    Paw,
}

const STAMPS: [Stamp; 3] = [Stamp::Star, Stamp::Heart, Stamp::Paw];

fn swatch_rect(i: usize) -> Rect {
    Rect::new(5 + i as i32 * SWATCH_STEP, TOOLBAR_Y + (TOOLBAR_H - SWATCH) / 2, SWATCH, SWATCH)
}

fn brush_center(i: usize) -> Vec2 {
    Vec2::new(
        (BRUSH_X + i as i32 * BRUSH_STEP) as f32 + BRUSH_BTN_R,
        (TOOLBAR_Y + TOOLBAR_H / 2) as f32,
    )
}

fn stamp_rect(i: usize) -> Rect {
    Rect::new(STAMP_X + i as i32 * STAMP_STEP, TOOLBAR_Y + (TOOLBAR_H - STAMP) / 2, STAMP, STAMP)
}

fn draw_stamp(gfx: &mut dyn Renderer2d, stamp: Stamp, c: Vec2, size: f32, color: Color) {
    match stamp {
        Stamp::Star => gfx.fill_polygon(&widgets::star_points(c, size, size * 0.4, 5, 0.0), color),
        Stamp::Heart => widgets::draw_heart(gfx, c, size, color),
        Stamp::Paw => {
            gfx.fill_circle(c + Vec2::new(0.0, size * 0.15), size * 0.45, color);
            for (ox, oy) in [(-0.42, -0.35), (-0.13, -0.55), (0.13, -0.55), (0.42, -0.35)] {
                gfx.fill_circle(c + Vec2::new(size * ox, size * oy), size * 0.22, color);
            }
        }
    }
}

pub struct FingerPaint {
    rng: SmallRng,
    canvas: Image,
    color: usize,
    brush: usize,
    stamp: Option<Stamp>,
    last: Option<Vec2>,
    since_sparkle: f32,
    sparkles: SparkPool,
}

impl FingerPaint {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            canvas: Image::filled(SCREEN_W as u32, SCREEN_H as u32, WHITE),
            color: DEFAULT_COLOR,
            brush: DEFAULT_BRUSH,
            stamp: None,
            last: None,
            since_sparkle: 0.0,
            sparkles: SparkPool::new(64),
        }
    }

    fn paint(&mut self, f: impl FnOnce(&mut dyn Renderer2d)) {
        let size = SurfaceSize::new(self.canvas.width, self.canvas.height);
        let mut gfx = CpuRenderer::new(self.canvas.rgba_mut(), size);
        f(&mut gfx);
    }

    fn toolbar_tap(&mut self, p: Vec2) {
        if let Some(i) = (0..PALETTE.len()).find(|&i| swatch_rect(i).contains(p)) {
            self.color = i;
            self.stamp = None;
            return;
        }
        if let Some(i) = (0..BRUSH_SIZES.len()).find(|&i| brush_center(i).distance(p) <= BRUSH_BTN_R + 4.0) {
            self.brush = i;
            self.stamp = None;
            return;
        }
        if let Some(i) = (0..STAMPS.len()).find(|&i| stamp_rect(i).contains(p)) {
            let stamp = STAMPS[i];
            self.stamp = if self.stamp == Some(stamp) { None } else { Some(stamp) };
        }
    }

    fn sparkle(&mut self, at: Vec2) {
        let vel = Vec2::new(self.rng.gen_range(-40.0..40.0), self.rng.gen_range(-80.0..-20.0));
        let color = widgets::brighten(PALETTE[self.color], 60);
        self.sparkles.emit(Spark::new(at, vel, color, self.rng.gen_range(2.0..4.0), 0.5));
    }

    fn stroke_to(&mut self, p: Vec2) {
        let color = PALETTE[self.color];
        let radius = BRUSH_SIZES[self.brush];
        let from = self.last.unwrap_or(p);
        self.paint(|gfx| gfx.draw_line(from, p, radius * 2.0, color));

        self.since_sparkle += from.distance(p);
        if self.since_sparkle >= SPARKLE_EVERY {
            self.since_sparkle = 0.0;
            self.sparkle(p);
        }
        self.last = Some(p);
    }

    /// Color currently under `p` on the canvas.
    pub fn canvas_pixel(&self, p: Vec2) -> Color {
        self.canvas.pixel(p.x.max(0.0) as u32, p.y.max(0.0) as u32)
    }
}

impl Default for FingerPaint {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for FingerPaint {
    fn on_enter(&mut self) {
        self.canvas.fill(WHITE);
        self.color = DEFAULT_COLOR;
        self.brush = DEFAULT_BRUSH;
        self.stamp = None;
        self.last = None;
        self.since_sparkle = 0.0;
        self.sparkles.clear();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        match *event {
            PointerEvent::Down(p) => {
                if widgets::back_button_hit(p) {
                    return Nav::Back;
                }
                if CLEAR_BUTTON.contains(p) {
                    self.canvas.fill(WHITE);
                    return Nav::Stay;
                }
                if p.y >= TOOLBAR_Y as f32 {
                    self.toolbar_tap(p);
                    return Nav::Stay;
                }
                match self.stamp {
                    Some(stamp) => {
                        let color = PALETTE[self.color];
                        self.paint(|gfx| draw_stamp(gfx, stamp, p, 30.0, color));
                        self.sparkle(p);
                    }
                    None => {
                        self.last = None;
                        self.stroke_to(p);
                    }
                }
            }
            PointerEvent::Move(p) => {
                if self.last.is_none() {
                    return Nav::Stay;
                }
                if p.y < TOOLBAR_Y as f32 {
                    self.stroke_to(p);
                } else {
                    // Leaving the canvas ends the stroke.
                    self.last = None;
                }
            }
            PointerEvent::Up(_) => self.last = None,
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.sparkles.update(dt);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.draw_image(&self.canvas, Rect::from_size(SCREEN_W, SCREEN_H));
        self.sparkles.draw(gfx);

        gfx.blend_rect(Rect::new(0, TOOLBAR_Y, SCREEN_W, TOOLBAR_H), rgb(40, 40, 40), 220);
        for (i, color) in PALETTE.iter().enumerate() {
            let rect = swatch_rect(i);
            if i == self.color && self.stamp.is_none() {
                gfx.fill_rounded_rect(rect.inflate(4), 10, WHITE);
            }
            gfx.fill_rounded_rect(rect.inflate(1), 8, rgb(160, 160, 160));
            gfx.fill_rounded_rect(rect.inflate(-1), 7, *color);
        }
        for (i, size) in BRUSH_SIZES.iter().enumerate() {
            let c = brush_center(i);
            if i == self.brush && self.stamp.is_none() {
                gfx.circle_outline(c, BRUSH_BTN_R + 4.0, 3.0, rgb(0, 220, 255));
            }
            gfx.fill_circle(c, BRUSH_BTN_R, rgb(80, 80, 80));
            gfx.fill_circle(c, size / 2.0, WHITE);
        }
        for (i, stamp) in STAMPS.iter().enumerate() {
            let rect = stamp_rect(i);
            let active = self.stamp == Some(*stamp);
            if active {
                gfx.fill_rounded_rect(rect.inflate(3), 12, rgb(200, 140, 255));
            }
            let bg = if active { rgb(100, 60, 160) } else { rgb(70, 70, 70) };
            gfx.fill_rounded_rect(rect, 10, bg);
            draw_stamp(gfx, *stamp, rect.center(), 15.0, WHITE);
        }

        gfx.fill_rounded_rect(CLEAR_BUTTON.inflate(2), 14, rgb(255, 100, 100));
        gfx.fill_rounded_rect(CLEAR_BUTTON, 12, rgb(200, 50, 50));
        gfx.draw_text_centered(CLEAR_BUTTON.center(), "CLEAR", WHITE, 3);

        widgets::back_button(gfx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{drag, pixel, render, tap};

    fn screen() -> FingerPaint {
        let mut s = FingerPaint::with_rng(SmallRng::seed_from_u64(5));
        s.on_enter();
        s
    }

    #[test]
    fn toolbar_fits_on_screen() {
        assert!(swatch_rect(PALETTE.len() - 1).right() < BRUSH_X);
        assert!(brush_center(BRUSH_SIZES.len() - 1).x + BRUSH_BTN_R < STAMP_X as f32);
        assert!(stamp_rect(STAMPS.len() - 1).right() <= SCREEN_W);
    }

    #[test]
    fn dragging_paints_a_continuous_stroke() {
        let mut s = screen();
        drag(
            &mut s,
            Vec2::new(200.0, 300.0),
            &[Vec2::new(300.0, 300.0), Vec2::new(400.0, 300.0)],
        );
        for x in [200.0, 250.0, 300.0, 350.0, 400.0] {
            assert_eq!(s.canvas_pixel(Vec2::new(x, 300.0)), PALETTE[DEFAULT_COLOR], "x={x}");
        }
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 400.0)), WHITE);
        assert!(!s.sparkles.is_empty());
    }

    #[test]
    fn picking_a_swatch_changes_the_paint() {
        let mut s = screen();
        tap(&mut s, swatch_rect(0).center());
        tap(&mut s, Vec2::new(300.0, 300.0));
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 300.0)), PALETTE[0]);
    }

    #[test]
    fn clear_wipes_the_canvas() {
        let mut s = screen();
        tap(&mut s, Vec2::new(300.0, 300.0));
        tap(&mut s, CLEAR_BUTTON.center());
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 300.0)), WHITE);
    }

    #[test]
    fn stamp_toggles_and_stamps() {
        let mut s = screen();
        tap(&mut s, stamp_rect(0).center());
        assert_eq!(s.stamp, Some(Stamp::Star));
        tap(&mut s, Vec2::new(300.0, 300.0));
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 300.0)), PALETTE[DEFAULT_COLOR]);
        tap(&mut s, stamp_rect(0).center());
        assert_eq!(s.stamp, None);
    }

    #[test]
    fn moves_without_a_press_do_not_paint() {
        let mut s = screen();
        s.handle_event(&PointerEvent::Move(Vec2::new(300.0, 300.0)));
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 300.0)), WHITE);
    }

    #[test]
    fn canvas_shows_through_and_toolbar_is_drawn() {
        let mut s = screen();
        tap(&mut s, Vec2::new(360.0, 300.0));
        let frame = render(&s);
        assert_eq!(pixel(&frame, 360, 300), PALETTE[DEFAULT_COLOR]);
        let c = swatch_rect(0).center();
        assert_eq!(pixel(&frame, c.x as i32, c.y as i32), PALETTE[0]);
    }

    #[test]
    fn reenter_restores_a_blank_canvas() {
        let mut s = screen();
        tap(&mut s, swatch_rect(2).center());
        tap(&mut s, Vec2::new(300.0, 300.0));
        s.on_enter();
        assert_eq!(s.canvas_pixel(Vec2::new(300.0, 300.0)), WHITE);
        assert_eq!(s.color, DEFAULT_COLOR);
    }
}
