use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Spark, SparkPool};
use engine::press::PressTracker;
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, BLACK, GREEN, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const ROUND_SECS: f32 = 45.0;
const MAX_UP: usize = 3;
const RISE_SECS: f32 = 0.2;
const HIT_SECS: f32 = 0.4;
const BODY_R: f32 = 32.0;
const STARS_PER_HIT: usize = 12;
const CONFETTI_MIN: usize = 50;

const GRASS_TOP: Color = rgb(80, 170, 80);
const GRASS_BOTTOM: Color = rgb(50, 130, 50);
const SCORE_YELLOW: Color = rgb(255, 255, 100);
const PLAY_AGAIN: Rect = Rect::new(210, 480, 300, 80);

const HOLES: [Vec2; 9] = [
    Vec2::new(120.0, 250.0),
    Vec2::new(360.0, 250.0),
    Vec2::new(600.0, 250.0),
    Vec2::new(120.0, 410.0),
    Vec2::new(360.0, 410.0),
    Vec2::new(600.0, 410.0),
    Vec2::new(120.0, 570.0),
    Vec2::new(360.0, 570.0),
    Vec2::new(600.0, 570.0),
];

const STAR_COLORS: [Color; 6] = [
    rgb(255, 255, 100),
    rgb(255, 200, 50),
    rgb(255, 150, 0),
    rgb(255, 255, 200),
    rgb(255, 180, 255),
    rgb(150, 255, 255),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bunny,
    Frog,
    Bear,
    Chick,
    Piggy,
    Alien,
}

impl Kind {
    const ALL: [Kind; 6] = [Kind::Bunny, Kind::Frog, Kind::Bear, Kind::Chick, Kind::Piggy, Kind::Alien];

    fn body(self) -> Color {
        match self {
            Kind::Bunny => rgb(255, 200, 220),
            Kind::Frog => rgb(120, 220, 120),
            Kind::Bear => rgb(180, 130, 80),
            Kind::Chick => rgb(255, 230, 100),
            Kind::Piggy => rgb(255, 180, 200),
            Kind::Alien => rgb(180, 220, 255),
        }
    }

    fn accent(self) -> Color {
        match self {
            Kind::Bunny => rgb(255, 150, 180),
            Kind::Frog => rgb(80, 180, 80),
            Kind::Bear => rgb(140, 100, 60),
            Kind::Chick => rgb(255, 180, 50),
            Kind::Piggy => rgb(255, 140, 170),
            Kind::Alien => rgb(130, 180, 255),
        }
    }

    /// Ear height, or `None` for earless critters.
    fn ears(self) -> Option<f32> {
        match self {
            Kind::Bunny => Some(30.0),
            Kind::Bear | Kind::Piggy => Some(20.0),
            Kind::Frog | Kind::Chick | Kind::Alien => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Rising,
    Up { left: f32 },
    Sinking,
    Hit { elapsed: f32 },
    Gone,
}

#[derive(Debug, Clone)]
struct Critter {
    hole: usize,
    kind: Kind,
    phase: Phase,
    /// How far out of the hole, `0..=1`.
    progress: f32,
    up_secs: f32,
    blink_in: f32,
    blinking: bool,
}

impl Critter {
    fn new(rng: &mut SmallRng, hole: usize) -> Self {
        Self {
            hole,
            kind: Kind::ALL[rng.gen_range(0..Kind::ALL.len())],
            phase: Phase::Rising,
            progress: 0.0,
            up_secs: rng.gen_range(1.8..3.0),
            blink_in: rng.gen_range(1.0..3.0),
            blinking: false,
        }
    }

    fn body_center(&self) -> Vec2 {
        let sink = (1.0 - self.progress) * BODY_R * 2.0;
        HOLES[self.hole] + Vec2::new(0.0, -BODY_R - 5.0 + sink)
    }

    fn is_hittable(&self) -> bool {
        matches!(self.phase, Phase::Rising | Phase::Up { .. })
    }

    fn hit_test(&self, p: Vec2) -> bool {
        self.is_hittable() && self.body_center().distance(p) < BODY_R + 12.0
    }

    fn update(&mut self, rng: &mut SmallRng, dt: f32) {
        self.blink_in -= dt;
        if self.blink_in <= 0.0 {
            self.blinking = !self.blinking;
            self.blink_in = if self.blinking { 0.1 } else { rng.gen_range(1.5..3.0) };
        }

        self.phase = match self.phase {
            Phase::Rising => {
                self.progress = (self.progress + dt / RISE_SECS).min(1.0);
                if self.progress >= 1.0 {
                    Phase::Up { left: self.up_secs }
                } else {
                    Phase::Rising
                }
            }
            Phase::Up { left } if left - dt <= 0.0 => Phase::Sinking,
            Phase::Up { left } => Phase::Up { left: left - dt },
            Phase::Sinking => {
                self.progress = (self.progress - dt / RISE_SECS).max(0.0);
                if self.progress <= 0.0 { Phase::Gone } else { Phase::Sinking }
            }
            Phase::Hit { elapsed } if elapsed + dt > HIT_SECS => Phase::Gone,
            Phase::Hit { elapsed } => Phase::Hit { elapsed: elapsed + dt },
            Phase::Gone => Phase::Gone,
        };
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        let c = self.body_center();
        let body = self.kind.body();
        let accent = self.kind.accent();

        if let Phase::Hit { elapsed } = self.phase {
            let squish = (elapsed / 0.15).min(1.0);
            let h = (BODY_R * 2.0 * (1.0 - squish * 0.7)).max(8.0);
            let w = BODY_R * 2.0 * (1.0 + squish * 0.3);
            let base = c.y + BODY_R;
            let mid = Vec2::new(c.x, base - h / 2.0);
            gfx.fill_polygon(&widgets::ellipse_points(mid, w / 2.0, h / 2.0), body);
            for dx in [-10.0, 10.0] {
                let e = mid + Vec2::new(dx, 0.0);
                gfx.draw_line(e + Vec2::new(-4.0, -4.0), e + Vec2::new(4.0, 4.0), 2.0, BLACK);
                gfx.draw_line(e + Vec2::new(4.0, -4.0), e + Vec2::new(-4.0, 4.0), 2.0, BLACK);
            }
            for i in 0..3 {
                let angle = elapsed * 8.0 + i as f32 * std::f32::consts::TAU / 3.0;
                let star = mid + Vec2::new(25.0 * angle.cos(), -10.0 + 8.0 * angle.sin());
                gfx.fill_circle(star, 3.0, SCORE_YELLOW);
            }
            return;
        }

        if let Some(ear_h) = self.kind.ears() {
            for dx in [-15.0, 15.0] {
                let ear = c + Vec2::new(dx, -BODY_R - ear_h / 2.0 + 8.0);
                gfx.fill_polygon(&widgets::ellipse_points(ear, 7.0, ear_h / 2.0), body);
                gfx.fill_polygon(&widgets::ellipse_points(ear + Vec2::new(0.0, 2.0), 3.5, ear_h / 2.0 - 4.0), accent);
            }
        }

        gfx.fill_circle(c, BODY_R, body);
        gfx.fill_circle(c + Vec2::new(0.0, 5.0), BODY_R - 10.0, accent);

        for dx in [-11.0, 11.0] {
            let e = c + Vec2::new(dx, -8.0);
            gfx.fill_circle(e, 8.0, WHITE);
            if self.blinking {
                gfx.draw_line(e - Vec2::new(6.0, 0.0), e + Vec2::new(6.0, 0.0), 2.0, BLACK);
            } else {
                gfx.fill_circle(e, 4.0, BLACK);
                gfx.fill_circle(e - Vec2::new(2.0, 2.0), 2.0, WHITE);
            }
        }

        match self.kind {
            Kind::Chick => gfx.fill_triangle(
                c + Vec2::new(-6.0, 6.0),
                c + Vec2::new(6.0, 6.0),
                c + Vec2::new(0.0, 14.0),
                rgb(255, 160, 50),
            ),
            Kind::Piggy => {
                gfx.fill_polygon(&widgets::ellipse_points(c + Vec2::new(0.0, 9.0), 8.0, 5.0), widgets::darken(accent, 20));
                gfx.fill_circle(c + Vec2::new(-3.0, 9.0), 2.0, BLACK);
                gfx.fill_circle(c + Vec2::new(3.0, 9.0), 2.0, BLACK);
            }
            _ => {
                let half = if self.kind == Kind::Frog { 12.0 } else { 8.0 };
                gfx.draw_line(c + Vec2::new(-half, 8.0), c + Vec2::new(0.0, 13.0), 2.0, BLACK);
                gfx.draw_line(c + Vec2::new(0.0, 13.0), c + Vec2::new(half, 8.0), 2.0, BLACK);
            }
        }

        gfx.blend_circle(c + Vec2::new(-20.0, 5.0), 6.0, accent, 100);
        gfx.blend_circle(c + Vec2::new(20.0, 5.0), 6.0, accent, 100);
    }
}

#[derive(Debug, Clone)]
struct Popup {
    pos: Vec2,
    life: f32,
}

pub struct WhackACritter {
    rng: SmallRng,
    critters: Vec<Critter>,
    stars: SparkPool,
    popups: Vec<Popup>,
    confetti: SparkPool,
    score: u32,
    time_left: f32,
    spawn_in: f32,
    game_over: bool,
    elapsed: f32,
    press: PressTracker,
}

impl WhackACritter {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        Self {
            rng,
            critters: Vec::with_capacity(MAX_UP),
            stars: SparkPool::new(STARS_PER_HIT * 6),
            popups: Vec::new(),
            confetti: SparkPool::new(CONFETTI_MIN * 2),
            score: 0,
            time_left: ROUND_SECS,
            spawn_in: 0.0,
            game_over: false,
            elapsed: 0.0,
            press: PressTracker::new(1),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn restart(&mut self) {
        self.critters.clear();
        self.stars.clear();
        self.popups.clear();
        self.confetti.clear();
        self.score = 0;
        self.time_left = ROUND_SECS;
        self.spawn_in = 0.0;
        self.game_over = false;
        self.elapsed = 0.0;
        self.press.reset();
    }

    fn spawn(&mut self) {
        if self.critters.len() >= MAX_UP {
            return;
        }
        let free: Vec<usize> = (0..HOLES.len())
            .filter(|h| self.critters.iter().all(|c| c.hole != *h))
            .collect();
        if let Some(&hole) = free.choose(&mut self.rng) {
            self.critters.push(Critter::new(&mut self.rng, hole));
        }
    }

    fn drop_confetti(&mut self) {
        let x = self.rng.gen_range(0.0..SCREEN_W as f32);
        let y = self.rng.gen_range(-(SCREEN_H as f32)..0.0);
        let vel = Vec2::new(self.rng.gen_range(-30.0..30.0), self.rng.gen_range(100.0..250.0));
        let color = widgets::hsv_to_rgb(self.rng.r#gen(), 0.6, 1.0);
        self.confetti.emit(Spark::new(Vec2::new(x, y), vel, color, self.rng.gen_range(3.0..6.0), 4.0));
    }

    fn whack(&mut self, p: Vec2) {
        let Some(critter) = self.critters.iter_mut().rev().find(|c| c.hit_test(p)) else {
            return;
        };
        critter.phase = Phase::Hit { elapsed: 0.0 };
        let hole = HOLES[critter.hole];
        self.score += 1;
        for _ in 0..STARS_PER_HIT {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(150.0..400.0));
            let color = STAR_COLORS[self.rng.gen_range(0..STAR_COLORS.len())];
            let spark = Spark::new(hole - Vec2::new(0.0, 20.0), vel, color, self.rng.gen_range(4.0..10.0), 0.5)
                .with_gravity(100.0);
            if !self.stars.emit(spark) {
                break;
            }
        }
        self.popups.push(Popup {
            pos: hole - Vec2::new(0.0, 50.0),
            life: 0.7,
        });
    }

    fn draw_field(&self, gfx: &mut dyn Renderer2d) {
        for &hole in &HOLES {
            gfx.fill_polygon(&widgets::ellipse_points(hole, 50.0, 14.0), rgb(30, 60, 30));
            gfx.fill_polygon(&widgets::ellipse_points(hole, 42.0, 10.0), rgb(20, 45, 20));
        }
        for critter in &self.critters {
            critter.draw(gfx);
        }
        // Grass lip in front of each hole so sinking critters disappear into it.
        for &hole in &HOLES {
            let lip = Rect::new(hole.x as i32 - 55, hole.y as i32 + 2, 110, 40);
            widgets::vertical_gradient(gfx, lip, widgets::lerp_color(GRASS_TOP, GRASS_BOTTOM, hole.y / SCREEN_H as f32), GRASS_BOTTOM);
            gfx.fill_polygon(&widgets::ellipse_points(hole + Vec2::new(0.0, 1.0), 50.0, 4.0), rgb(90, 160, 90));
        }
        self.stars.draw(gfx);
        for popup in &self.popups {
            let alpha = (popup.life * 500.0).min(255.0) as u8;
            let color = widgets::lerp_color(GRASS_TOP, SCORE_YELLOW, alpha as f32 / 255.0);
            gfx.draw_text_centered(popup.pos, "+1", color, 5);
        }

        let secs = self.time_left.ceil() as u32;
        let color = if secs <= 5 { rgb(255, 80, 80) } else { WHITE };
        gfx.draw_text_centered(Vec2::new(SCREEN_W as f32 / 2.0, 105.0), &format!(":{secs:02}"), color, 4);
    }

    fn draw_score_card(&self, gfx: &mut dyn Renderer2d) {
        self.confetti.draw(gfx);
        let cx = SCREEN_W as f32 / 2.0;
        gfx.draw_text_centered(Vec2::new(cx + 3.0, 263.0), "GREAT JOB!", rgb(40, 90, 40), 9);
        gfx.draw_text_centered(Vec2::new(cx, 260.0), "GREAT JOB!", SCORE_YELLOW, 9);
        gfx.draw_text_centered(Vec2::new(cx, 360.0), &format!("SCORE: {}", self.score), WHITE, 6);
        gfx.draw_text_centered(Vec2::new(cx, 420.0), tier_message(self.score), rgb(255, 220, 180), 4);
        widgets::button_3d(gfx, PLAY_AGAIN, GREEN, "PLAY AGAIN", 4, self.press.scale(0), self.press.is_pressed(0));
    }
}

fn tier_message(score: u32) -> &'static str {
    match score {
        25.. => "SUPER STAR!",
        15.. => "AMAZING!",
        8.. => "GREAT WORK!",
        _ => "NICE TRY!",
    }
}

impl Default for WhackACritter {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for WhackACritter {
    fn on_enter(&mut self) {
        self.restart();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        if self.game_over {
            if PLAY_AGAIN.contains(p) {
                tracing::debug!(score = self.score, "whack-a-critter restarted");
                self.restart();
                self.press.press(0);
            }
            return Nav::Stay;
        }
        self.whack(p);
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.elapsed += dt;
        self.press.update(dt);

        if self.game_over {
            self.confetti.update(dt);
            if self.confetti.len() < CONFETTI_MIN {
                self.drop_confetti();
            }
            return Nav::Stay;
        }

        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.game_over = true;
            self.critters.clear();
            tracing::debug!(score = self.score, "whack-a-critter round over");
            for _ in 0..40 {
                self.drop_confetti();
            }
            return Nav::Stay;
        }

        self.spawn_in -= dt;
        if self.spawn_in <= 0.0 {
            self.spawn_in = self.rng.gen_range(0.8..1.5);
            self.spawn();
        }

        for critter in &mut self.critters {
            critter.update(&mut self.rng, dt);
        }
        self.critters.retain(|c| c.phase != Phase::Gone);

        self.stars.update(dt);
        for popup in &mut self.popups {
            popup.pos.y -= 100.0 * dt;
            popup.life -= dt;
        }
        self.popups.retain(|p| p.life > 0.0);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        widgets::vertical_gradient(gfx, Rect::from_size(SCREEN_W, SCREEN_H), GRASS_TOP, GRASS_BOTTOM);

        const PETALS: [Color; 3] = [rgb(255, 200, 200), rgb(255, 255, 180), rgb(200, 220, 255)];
        for i in 0..8 {
            let center = Vec2::new(60.0 + i as f32 * 90.0, 180.0 + (i % 3) as f32 * 200.0);
            for a in 0..5 {
                let angle = a as f32 * std::f32::consts::TAU / 5.0 + self.elapsed * 0.3;
                gfx.fill_circle(center + Vec2::from_angle(angle, 8.0), 5.0, PETALS[i % 3]);
            }
            gfx.fill_circle(center, 4.0, SCORE_YELLOW);
        }

        widgets::header(gfx, "WHACK!", None);
        let score = format!("* {}", self.score);
        gfx.draw_text_scaled(SCREEN_W - 140, 30, &score, SCORE_YELLOW, 5);

        if self.game_over {
            self.draw_score_card(gfx);
        } else {
            self.draw_field(gfx);
        }
    }
}
