use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::press::{DelayedNav, PressTracker};
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, GREEN, ORANGE, PURPLE, SKY_BLUE, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const NAV_DELAY: f32 = 0.12;
const SHAPE_COUNT: usize = 12;

const BUTTONS: [(Rect, Color, &str, ScreenId); 3] = [
    (Rect::new(110, 300, 500, 100), GREEN, "PLAY GAMES", ScreenId::GamesMenu),
    (Rect::new(110, 430, 500, 100), ORANGE, "WATCH SHOWS", ScreenId::Shows),
    (Rect::new(110, 560, 500, 100), PURPLE, "COOL VIDEOS", ScreenId::Videos),
];

const PASTELS: [Color; 6] = [
    rgb(255, 200, 220),
    rgb(200, 220, 255),
    rgb(255, 255, 180),
    rgb(220, 200, 255),
    rgb(180, 255, 220),
    rgb(255, 180, 200),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum ShapeKind {
    Star,
    Heart,
    Dot,
}

/// Decoration drifting left to right behind the menu.
#[derive(Debug, Clone)]
struct FloatingShape {
    pos: Vec2,
    speed: Vec2,
    size: f32,
    phase: f32,
    spin: f32,
    alpha: u8,
    color: Color,
    kind: ShapeKind,
}

impl FloatingShape {
    fn spawn(rng: &mut SmallRng) -> Self {
        let mut shape = Self::offscreen(rng);
        shape.pos = Vec2::new(
            rng.gen_range(0.0..SCREEN_W as f32),
            rng.gen_range(0.0..SCREEN_H as f32),
        );
        shape
    }

    fn offscreen(rng: &mut SmallRng) -> Self {
        let kind = match rng.gen_range(0..3) {
            0 => ShapeKind::Star,
            1 => ShapeKind::Heart,
            _ => ShapeKind::Dot,
        };
        Self {
            pos: Vec2::new(rng.gen_range(-40.0..-10.0), rng.gen_range(50.0..SCREEN_H as f32 - 50.0)),
            speed: Vec2::new(rng.gen_range(15.0..40.0), rng.gen_range(-8.0..8.0)),
            size: rng.gen_range(8.0..18.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            spin: rng.gen_range(0.5..2.0),
            alpha: rng.gen_range(40..100),
            color: PASTELS[rng.gen_range(0..PASTELS.len())],
            kind,
        }
    }

    fn draw(&self, gfx: &mut dyn Renderer2d, time: f32) {
        match self.kind {
            ShapeKind::Star => {
                let pts = widgets::star_points(self.pos, self.size, self.size * 0.45, 5, time * self.spin);
                gfx.blend_polygon(&pts, self.color, self.alpha);
            }
            ShapeKind::Heart => {
                let r = self.size / 2.0;
                gfx.blend_circle(self.pos + Vec2::new(-r / 2.0, -r / 3.0), r, self.color, self.alpha);
                gfx.blend_circle(self.pos + Vec2::new(r / 2.0, -r / 3.0), r, self.color, self.alpha);
                gfx.blend_polygon(
                    &[
                        self.pos + Vec2::new(-self.size + 2.0, -2.0),
                        self.pos + Vec2::new(self.size - 2.0, -2.0),
                        self.pos + Vec2::new(0.0, self.size),
                    ],
                    self.color,
                    self.alpha,
                );
            }
            ShapeKind::Dot => gfx.blend_circle(self.pos, self.size / 2.0, self.color, self.alpha),
        }
    }
}

pub struct MainMenu {
    rng: SmallRng,
    press: PressTracker,
    nav: DelayedNav<ScreenId>,
    time: f32,
    shapes: Vec<FloatingShape>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(mut rng: SmallRng) -> Self {
        let shapes = (0..SHAPE_COUNT).map(|_| FloatingShape::spawn(&mut rng)).collect();
        Self {
            rng,
            press: PressTracker::new(BUTTONS.len()),
            nav: DelayedNav::new(),
            time: 0.0,
            shapes,
        }
    }

    /// The big button that leads to `target`.
    pub fn button_for(target: ScreenId) -> Option<Rect> {
        BUTTONS.iter().find(|b| b.3 == target).map(|b| b.0)
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for MainMenu {
    fn on_enter(&mut self) {
        self.press.reset();
        self.nav.cancel();
        self.time = 0.0;
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if let Some(i) = BUTTONS.iter().position(|(rect, ..)| rect.contains(p)) {
            self.press.press(i);
            self.nav.schedule(BUTTONS[i].3, NAV_DELAY);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.time += dt;
        self.press.update(dt);
        for shape in &mut self.shapes {
            shape.pos.x += shape.speed.x * dt;
            shape.pos.y += shape.speed.y * dt + (self.time * shape.spin + shape.phase).sin() * 0.3;
            if shape.pos.x > SCREEN_W as f32 + 40.0 {
                *shape = FloatingShape::offscreen(&mut self.rng);
            }
        }
        match self.nav.tick(dt) {
            Some(target) => Nav::GoTo(target),
            None => Nav::Stay,
        }
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(SKY_BLUE);
        for shape in &self.shapes {
            shape.draw(gfx, self.time);
        }

        let bob = (self.time * 2.0).sin() * 6.0;
        let title = Vec2::new(SCREEN_W as f32 / 2.0, 130.0 + bob);
        gfx.draw_text_centered(title + Vec2::new(3.0, 4.0), "TOYBOX", rgb(90, 150, 180), 14);
        gfx.draw_text_centered(title, "TOYBOX", WHITE, 14);
        gfx.draw_text_centered(title + Vec2::new(0.0, 70.0), "GAME BOX", rgb(230, 245, 255), 3);

        for (i, (rect, color, label, _)) in BUTTONS.iter().enumerate() {
            widgets::button_3d(
                gfx,
                *rect,
                *color,
                label,
                5,
                self.press.scale(i),
                self.press.is_pressed(i),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{pixel, render, run_for, tap};

    fn menu() -> MainMenu {
        MainMenu::with_rng(SmallRng::seed_from_u64(7))
    }

    #[test]
    fn tapping_a_button_navigates_after_the_press_animation() {
        let mut m = menu();
        assert_eq!(tap(&mut m, Vec2::new(360.0, 480.0)), Nav::Stay);
        assert!(m.press.is_pressed(1));
        assert_eq!(m.update(0.05), Nav::Stay);
        assert_eq!(run_for(&mut m, 0.2), Nav::GoTo(ScreenId::Shows));
    }

    #[test]
    fn tapping_empty_space_does_nothing() {
        let mut m = menu();
        tap(&mut m, Vec2::new(20.0, 700.0));
        assert_eq!(run_for(&mut m, 1.0), Nav::Stay);
    }

    #[test]
    fn on_enter_cancels_pending_navigation() {
        let mut m = menu();
        tap(&mut m, Vec2::new(360.0, 350.0));
        m.on_enter();
        assert_eq!(run_for(&mut m, 1.0), Nav::Stay);
    }

    #[test]
    fn shapes_recycle_after_leaving_the_right_edge() {
        let mut m = menu();
        run_for(&mut m, 60.0);
        assert_eq!(m.shapes.len(), SHAPE_COUNT);
        assert!(m.shapes.iter().all(|s| s.pos.x <= SCREEN_W as f32 + 40.0));
    }

    #[test]
    fn draws_buttons_in_their_colors() {
        let frame = render(&menu());
        assert_eq!(pixel(&frame, 115, 350), GREEN);
        assert_eq!(pixel(&frame, 115, 610), PURPLE);
    }
}
