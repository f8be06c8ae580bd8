use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::press::{DelayedNav, PressTracker};
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};

use crate::widgets::{self, BACK_BUTTON, SKY_BLUE, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const NAV_DELAY: f32 = 0.12;
const COLS: i32 = 2;
const ROWS: i32 = 4;
const MARGIN: i32 = 16;
const GAP: i32 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Icon {
    Bubbles,
    Brush,
    Shapes,
    Critter,
    Flower,
    Rocket,
    Sparkle,
    Cloud,
}

const GAMES: [(ScreenId, &str, Color, Icon); 8] = [
    (ScreenId::BubblePop, "BUBBLE POP", rgb(90, 170, 255), Icon::Bubbles),
    (ScreenId::FingerPaint, "FINGER PAINT", rgb(255, 80, 120), Icon::Brush),
    (ScreenId::ShapeSorter, "SHAPE SORTER", rgb(80, 180, 255), Icon::Shapes),
    (ScreenId::WhackACritter, "WHACK A CRITTER", rgb(200, 130, 60), Icon::Critter),
    (ScreenId::MagicGarden, "MAGIC GARDEN", rgb(80, 200, 80), Icon::Flower),
    (ScreenId::Fireworks, "FIREWORKS", rgb(255, 160, 40), Icon::Rocket),
    (ScreenId::ParticlePlayground, "PARTICLES", rgb(180, 60, 220), Icon::Sparkle),
    (ScreenId::WeatherToy, "WEATHER TOY", rgb(60, 180, 200), Icon::Cloud),
];

fn card_rect(index: usize) -> Rect {
    let top = BACK_BUTTON.bottom() + 10;
    let col_w = (SCREEN_W - 2 * MARGIN - GAP * (COLS - 1)) / COLS;
    let row_h = (SCREEN_H - top - MARGIN - GAP * (ROWS - 1)) / ROWS;
    let col = index as i32 % COLS;
    let row = index as i32 / COLS;
    Rect::new(
        MARGIN + col * (col_w + GAP),
        top + row * (row_h + GAP),
        col_w,
        row_h,
    )
}

pub struct GamesMenu {
    press: PressTracker,
    nav: DelayedNav<ScreenId>,
    time: f32,
}

impl GamesMenu {
    pub fn new() -> Self {
        Self {
            press: PressTracker::new(GAMES.len()),
            nav: DelayedNav::new(),
            time: 0.0,
        }
    }

    /// Where the card that opens `game` sits.
    pub fn card_for(game: ScreenId) -> Option<Rect> {
        GAMES.iter().position(|g| g.0 == game).map(card_rect)
    }

    fn draw_icon(&self, gfx: &mut dyn Renderer2d, icon: Icon, c: Vec2, s: f32) {
        let t = self.time;
        let v = |x: f32, y: f32| c + Vec2::new(x * s, y * s);
        match icon {
            Icon::Bubbles => {
                for (i, (x, y, r)) in [(-18.0, 6.0, 16.0), (14.0, -8.0, 20.0), (20.0, 22.0, 9.0)]
                    .into_iter()
                    .enumerate()
                {
                    let bob = (t * 2.0 + i as f32).sin() * 3.0;
                    let center = v(x, y + bob);
                    gfx.circle_outline(center, r * s, 3.0, WHITE);
                    gfx.fill_circle(center + Vec2::new(-r * s / 3.0, -r * s / 3.0), r * s / 4.0, WHITE);
                }
            }
            Icon::Brush => {
                gfx.draw_line(v(-20.0, 28.0), v(14.0, -20.0), (8.0 * s).max(3.0), rgb(255, 255, 200));
                gfx.fill_circle(v(16.0, -24.0), 14.0 * s, WHITE);
                for (j, col) in [rgb(255, 0, 0), rgb(0, 200, 0), rgb(0, 100, 255)].into_iter().enumerate() {
                    gfx.fill_circle(v(-26.0 + j as f32 * 20.0, 38.0), 9.0 * s, col);
                }
            }
            Icon::Shapes => {
                gfx.fill_triangle(v(-34.0, 20.0), v(-12.0, -20.0), v(8.0, 20.0), rgb(255, 220, 80));
                gfx.fill_circle(v(28.0, -8.0), 16.0 * s, rgb(100, 220, 255));
                let sq = v(6.0, 2.0);
                gfx.fill_rect(
                    Rect::new(sq.x as i32, sq.y as i32, (28.0 * s) as i32, (28.0 * s) as i32),
                    rgb(255, 130, 130),
                );
            }
            Icon::Critter => {
                gfx.fill_rect(
                    Rect::centered_at(v(0.0, 26.0), (70.0 * s) as i32, (14.0 * s) as i32),
                    rgb(90, 60, 30),
                );
                let peek = (t * 3.0).sin().abs() * 10.0;
                let head = v(0.0, 8.0 - peek);
                gfx.fill_circle(head, 20.0 * s, rgb(150, 110, 80));
                gfx.fill_circle(head + Vec2::new(-7.0 * s, -4.0 * s), 3.0 * s, WHITE);
                gfx.fill_circle(head + Vec2::new(7.0 * s, -4.0 * s), 3.0 * s, WHITE);
                gfx.fill_circle(head + Vec2::new(0.0, 5.0 * s), 4.0 * s, rgb(255, 150, 160));
            }
            Icon::Flower => {
                for k in 0..5 {
                    let a = (k as f32 * 72.0).to_radians();
                    gfx.fill_circle(c + Vec2::from_angle(a, 20.0 * s), 13.0 * s, rgb(255, 180, 200));
                }
                gfx.fill_circle(c, 11.0 * s, rgb(255, 220, 80));
                gfx.draw_line(v(0.0, 20.0), v(0.0, 42.0), (4.0 * s).max(2.0), rgb(80, 180, 80));
            }
            Icon::Rocket => {
                gfx.fill_triangle(v(0.0, -35.0), v(-14.0, 8.0), v(14.0, 8.0), WHITE);
                let body = v(-11.0, 8.0);
                gfx.fill_rect(
                    Rect::new(body.x as i32, body.y as i32, (22.0 * s) as i32, (14.0 * s) as i32),
                    rgb(200, 200, 200),
                );
                let bob = (t * 12.0).sin() * 4.0;
                gfx.fill_triangle(v(-8.0, 22.0), v(0.0, 35.0 + bob), v(8.0, 22.0), rgb(255, 160, 40));
            }
            Icon::Sparkle => {
                let colors = [rgb(255, 100, 255), rgb(100, 200, 255), rgb(255, 255, 100), rgb(100, 255, 150)];
                for j in 0..8 {
                    let angle = j as f32 * std::f32::consts::FRAC_PI_4 + t * 2.0;
                    let len = (20.0 + (t * 5.0 + j as f32).sin() * 7.0) * s;
                    gfx.draw_line(
                        c + Vec2::from_angle(angle, 8.0 * s),
                        c + Vec2::from_angle(angle, len),
                        (3.0 * s).max(2.0),
                        colors[j % 4],
                    );
                }
                gfx.fill_circle(c, 7.0 * s, WHITE);
            }
            Icon::Cloud => {
                gfx.fill_circle(v(-16.0, -8.0), 20.0 * s, WHITE);
                gfx.fill_circle(v(16.0, -8.0), 20.0 * s, WHITE);
                gfx.fill_circle(v(0.0, -20.0), 20.0 * s, WHITE);
                let base = v(-28.0, -12.0);
                gfx.fill_rect(
                    Rect::new(base.x as i32, base.y as i32, (56.0 * s) as i32, (16.0 * s) as i32),
                    WHITE,
                );
                let fall = 35.0 * s;
                for j in 0..3 {
                    let dy = (t * 40.0 + j as f32 * 15.0) % fall;
                    gfx.fill_circle(v(-16.0 + j as f32 * 16.0, 12.0) + Vec2::new(0.0, dy), 4.0 * s, rgb(100, 180, 255));
                }
            }
        }
    }
}

impl Default for GamesMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for GamesMenu {
    fn on_enter(&mut self) {
        self.press.reset();
        self.nav.cancel();
        self.time = 0.0;
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        if let Some(i) = (0..GAMES.len()).find(|&i| card_rect(i).contains(p)) {
            self.press.press(i);
            self.nav.schedule(GAMES[i].0, NAV_DELAY);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.time += dt;
        self.press.update(dt);
        match self.nav.tick(dt) {
            Some(target) => Nav::GoTo(target),
            None => Nav::Stay,
        }
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(SKY_BLUE);
        gfx.draw_text_centered(Vec2::new(SCREEN_W as f32 / 2.0 + 40.0, 55.0), "PICK A GAME", WHITE, 5);

        for (i, (_, name, color, icon)) in GAMES.iter().enumerate() {
            let pressed = self.press.is_pressed(i);
            let card = card_rect(i).scaled(self.press.scale(i));
            let face = widgets::card_3d(gfx, card, *color, 18, pressed);
            let off = if pressed { 2.0 } else { 0.0 };

            let icon_at = Vec2::new(face.x as f32 + face.w as f32 * 0.3, face.center().y + off);
            self.draw_icon(gfx, *icon, icon_at, face.h as f32 / 185.0);

            let text_cx = face.x as f32 + face.w as f32 * 0.68;
            let scale = widgets::fit_text_scale(name, face.w / 2 - 8, 3);
            let mut lines = name.splitn(2, ' ');
            let first = lines.next().unwrap_or_default();
            match lines.next() {
                Some(rest) => {
                    gfx.draw_text_centered(Vec2::new(text_cx, face.center().y - 14.0 + off), first, WHITE, scale);
                    gfx.draw_text_centered(Vec2::new(text_cx, face.center().y + 14.0 + off), rest, WHITE, scale);
                }
                None => gfx.draw_text_centered(Vec2::new(text_cx, face.center().y + off), first, WHITE, scale),
            }
        }

        widgets::back_button(gfx);
    }
}
