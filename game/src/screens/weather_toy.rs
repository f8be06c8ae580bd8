use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Bounds, ParticlePool, Spark, SparkPool};
use engine::screen::{Nav, Screen};
use engine::toolbar::{ScrollToolbar, ToolbarLayout, ToolbarTuning};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const W: f32 = SCREEN_W as f32;
const H: f32 = SCREEN_H as f32;

const SNOWFLAKES: usize = 220;
const RAINDROPS: usize = 400;
const FIREFLIES: usize = 80;
const PETALS: usize = 150;
const STARS: usize = 120;

const SPLASH_COUNT: usize = 20;
const SPLASH_GRAVITY: f32 = 500.0;
const RAIN_WIND: f32 = -30.0;
const FIREFLY_MAX_SPEED: f32 = 50.0;
const RIPPLE_SECS: f32 = 3.0;
const RIPPLE_SPEED: f32 = 200.0;

const AURORA_TOP: i32 = 80;
const AURORA_BANDS: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Snow,
    Rain,
    Fireflies,
    Blossoms,
    Aurora,
}

impl Scene {
    pub const ALL: [Scene; 5] = [Scene::Snow, Scene::Rain, Scene::Fireflies, Scene::Blossoms, Scene::Aurora];

    fn label(self) -> &'static str {
        match self {
            Scene::Snow => "SNOW",
            Scene::Rain => "RAIN",
            Scene::Fireflies => "FIREFLIES",
            Scene::Blossoms => "BLOSSOMS",
            Scene::Aurora => "AURORA",
        }
    }

    fn button_color(self) -> Color {
        match self {
            Scene::Snow => rgb(100, 140, 180),
            Scene::Rain => rgb(60, 90, 140),
            Scene::Fireflies => rgb(60, 50, 100),
            Scene::Blossoms => rgb(180, 100, 140),
            Scene::Aurora => rgb(40, 80, 100),
        }
    }

    fn draw_sky(self, gfx: &mut dyn Renderer2d) {
        let full = Rect::from_size(SCREEN_W, SCREEN_H);
        match self {
            Scene::Snow => widgets::vertical_gradient(gfx, full, rgb(180, 200, 220), rgb(220, 230, 245)),
            Scene::Rain => widgets::vertical_gradient(gfx, full, rgb(50, 60, 80), rgb(80, 90, 110)),
            Scene::Fireflies => {
                // Deep blue into purple, then down to an orange horizon.
                let half = SCREEN_H / 2;
                widgets::vertical_gradient(gfx, Rect::new(0, 0, SCREEN_W, half), rgb(10, 10, 60), rgb(60, 20, 80));
                widgets::vertical_gradient(
                    gfx,
                    Rect::new(0, half, SCREEN_W, SCREEN_H - half),
                    rgb(60, 20, 80),
                    rgb(180, 100, 40),
                );
            }
            Scene::Blossoms => widgets::vertical_gradient(gfx, full, rgb(220, 180, 220), rgb(170, 200, 240)),
            Scene::Aurora => widgets::vertical_gradient(gfx, full, rgb(5, 5, 20), rgb(15, 13, 35)),
        }
    }

    fn draw_icon(self, gfx: &mut dyn Renderer2d, c: Vec2) {
        match self {
            Scene::Snow => {
                for deg in [0.0f32, 60.0, 120.0] {
                    let d = Vec2::from_angle(deg.to_radians(), 8.0);
                    gfx.draw_line(c - d, c + d, 2.0, rgb(220, 230, 255));
                }
            }
            Scene::Rain => {
                for ox in [-6.0, 0.0, 6.0] {
                    gfx.draw_line(c + Vec2::new(ox, -6.0), c + Vec2::new(ox - 2.0, 6.0), 2.0, rgb(140, 180, 255));
                }
            }
            Scene::Fireflies => {
                for (ox, oy) in [(-5.0, -3.0), (4.0, 2.0), (-2.0, 5.0), (6.0, -5.0)] {
                    gfx.fill_circle(c + Vec2::new(ox, oy), 2.0, rgb(255, 255, 130));
                }
            }
            Scene::Blossoms => {
                for (ox, oy) in [(-4.0, -4.0), (3.0, 0.0), (-1.0, 5.0)] {
                    gfx.fill_circle(c + Vec2::new(ox, oy), 3.0, rgb(255, 180, 200));
                }
            }
            Scene::Aurora => {
                let colors = [rgb(80, 255, 180), rgb(100, 200, 255), rgb(180, 120, 255)];
                for (i, color) in colors.into_iter().enumerate() {
                    let y = -4.0 + i as f32 * 4.0;
                    for j in 0..4 {
                        let a = c + Vec2::new(-8.0 + j as f32 * 4.0, y + ((j + i) as f32).sin() * 2.0);
                        let b = c + Vec2::new(-4.0 + j as f32 * 4.0, y + ((j + i + 1) as f32).sin() * 2.0);
                        gfx.draw_line(a, b, 2.0, color);
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Drifter {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    phase: f32,
    sway_speed: f32,
    sway_amp: f32,
    /// Petals only.
    rotation: f32,
    rot_speed: f32,
    shade: Color,
}

#[derive(Debug, Clone)]
struct Firefly {
    pos: Vec2,
    vel: Vec2,
    size: f32,
    phase: f32,
    pulse_speed: f32,
    /// In turns.
    hue: f32,
}

#[derive(Debug, Clone)]
struct Star {
    pos: Vec2,
    size: f32,
    brightness: f32,
    twinkle_speed: f32,
    phase: f32,
}

#[derive(Debug, Clone, Copy)]
struct Ripple {
    x: f32,
    age: f32,
}

const PETAL_SHADES: [Color; 6] = [
    rgb(255, 183, 197),
    rgb(255, 200, 210),
    rgb(255, 220, 230),
    rgb(255, 170, 190),
    rgb(245, 160, 180),
    rgb(255, 230, 240),
];

const SPLASH_SHADES: [Color; 5] = [
    rgb(140, 180, 255),
    rgb(160, 200, 255),
    rgb(100, 150, 230),
    rgb(180, 210, 255),
    rgb(120, 170, 240),
];

fn toolbar_layout() -> ToolbarLayout {
    ToolbarLayout {
        left_x: 110.0,
        right_x: W,
        y: 10.0,
        height: 58.0,
        btn_width: 140.0,
        btn_gap: 6.0,
        btn_count: Scene::ALL.len(),
    }
}

pub struct WeatherToy {
    rng: SmallRng,
    toolbar: ScrollToolbar,
    scene: Scene,
    time: f32,
    /// Snowflakes or petals, depending on the scene.
    drifters: Vec<Drifter>,
    rain: ParticlePool,
    splashes: SparkPool,
    fireflies: Vec<Firefly>,
    stars: Vec<Star>,
    ripples: Vec<Ripple>,
}

impl WeatherToy {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        let mut toy = Self {
            rng,
            toolbar: ScrollToolbar::new(toolbar_layout(), ToolbarTuning::default()),
            scene: Scene::Snow,
            time: 0.0,
            drifters: Vec::new(),
            rain: ParticlePool::new(RAINDROPS, Bounds::UNBOUNDED, 1.0),
            splashes: SparkPool::new(SPLASH_COUNT * 10),
            fireflies: Vec::new(),
            stars: Vec::new(),
            ripples: Vec::new(),
        };
        toy.switch_scene(Scene::Snow);
        toy
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    fn switch_scene(&mut self, scene: Scene) {
        tracing::debug!(?scene, "weather scene");
        self.scene = scene;
        self.drifters.clear();
        self.rain.clear();
        self.splashes.clear();
        self.fireflies.clear();
        self.stars.clear();
        self.ripples.clear();
        match scene {
            Scene::Snow => {
                for _ in 0..SNOWFLAKES {
                    let flake = self.snowflake(true);
                    self.drifters.push(flake);
                }
            }
            Scene::Rain => self.refill_rain(true),
            Scene::Fireflies => {
                for _ in 0..FIREFLIES {
                    let fly = self.firefly();
                    self.fireflies.push(fly);
                }
            }
            Scene::Blossoms => {
                for _ in 0..PETALS {
                    let petal = self.petal(true);
                    self.drifters.push(petal);
                }
            }
            Scene::Aurora => {
                let rng = &mut self.rng;
                self.stars = (0..STARS)
                    .map(|_| Star {
                        pos: Vec2::new(rng.gen_range(0.0..W), rng.gen_range(H * 0.45..H)),
                        size: if rng.gen_range(0..4) == 0 { 2.0 } else { 1.0 },
                        brightness: rng.gen_range(80.0..255.0),
                        twinkle_speed: rng.gen_range(1.0..4.0),
                        phase: rng.gen_range(0.0..std::f32::consts::TAU),
                    })
                    .collect();
            }
        }
    }

    fn snowflake(&mut self, anywhere: bool) -> Drifter {
        let rng = &mut self.rng;
        let y = if anywhere { rng.gen_range(0.0..H) } else { rng.gen_range(-40.0..-5.0) };
        Drifter {
            pos: Vec2::new(rng.gen_range(0.0..W), y),
            vel: Vec2::new(rng.gen_range(-10.0..10.0), rng.gen_range(30.0..80.0)),
            size: rng.gen_range(2.0..6.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            sway_speed: rng.gen_range(1.0..3.0),
            sway_amp: rng.gen_range(15.0..40.0),
            rotation: 0.0,
            rot_speed: 0.0,
            shade: WHITE,
        }
    }

    fn petal(&mut self, anywhere: bool) -> Drifter {
        let shade = *PETAL_SHADES.choose(&mut self.rng).unwrap_or(&PETAL_SHADES[0]);
        let rng = &mut self.rng;
        let y = if anywhere { rng.gen_range(0.0..H) } else { rng.gen_range(-40.0..-5.0) };
        Drifter {
            pos: Vec2::new(rng.gen_range(0.0..W), y),
            vel: Vec2::new(rng.gen_range(-15.0..25.0), rng.gen_range(25.0..70.0)),
            size: rng.gen_range(3.0..7.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            sway_speed: rng.gen_range(0.8..2.5),
            sway_amp: rng.gen_range(20.0..50.0),
            rotation: rng.gen_range(0.0..std::f32::consts::TAU),
            rot_speed: rng.gen_range(1.0..4.0),
            shade,
        }
    }

    fn firefly(&mut self) -> Firefly {
        let rng = &mut self.rng;
        Firefly {
            pos: Vec2::new(rng.gen_range(20.0..W - 20.0), rng.gen_range(80.0..H - 20.0)),
            vel: Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0)),
            size: rng.gen_range(2.0..5.0),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            pulse_speed: rng.gen_range(1.5..4.0),
            hue: rng.gen_range(40.0..70.0) / 360.0,
        }
    }

    /// Tops the rain pool back up. Each drop lives exactly until it leaves the bottom edge.
    fn refill_rain(&mut self, anywhere: bool) {
        while !self.rain.is_full() {
            let y = if anywhere { self.rng.gen_range(0.0..H) } else { self.rng.gen_range(-60.0..-5.0) };
            let x = self.rng.gen_range(0.0..W);
            let vy = self.rng.gen_range(500.0..900.0);
            let life = (H + 10.0 - y) / vy;
            if !self.rain.emit(Vec2::new(x, y), Vec2::new(RAIN_WIND, vy), rgb(140, 170, 240), 1, life) {
                break;
            }
        }
    }

    fn on_tap(&mut self, at: Vec2) {
        match self.scene {
            Scene::Snow => {
                for flake in &mut self.drifters {
                    let d = flake.pos - at;
                    let dist = d.length() + 0.1;
                    if dist < 150.0 {
                        let force = (150.0 - dist) / 150.0 * 300.0;
                        flake.vel.x += d.x / dist * force;
                        flake.vel.y += d.y / dist * force * 0.5;
                    }
                }
            }
            Scene::Rain => {
                for _ in 0..SPLASH_COUNT {
                    let angle = self.rng.gen_range(-std::f32::consts::PI..0.0);
                    let speed = self.rng.gen_range(100.0..350.0);
                    let pos = at + Vec2::new(self.rng.gen_range(-5.0..5.0), self.rng.gen_range(-3.0..3.0));
                    let color = *SPLASH_SHADES.choose(&mut self.rng).unwrap_or(&SPLASH_SHADES[0]);
                    let spark = Spark::new(
                        pos,
                        Vec2::from_angle(angle, speed),
                        color,
                        self.rng.gen_range(2.0..5.0),
                        self.rng.gen_range(0.3..0.7),
                    )
                    .with_gravity(SPLASH_GRAVITY);
                    if !self.splashes.emit(spark) {
                        break;
                    }
                }
            }
            Scene::Fireflies => {
                for fly in &mut self.fireflies {
                    let d = at - fly.pos;
                    let dist = d.length() + 0.1;
                    if dist < 200.0 {
                        let strength = (200.0 - dist) / 200.0 * 60.0;
                        fly.vel += d * (strength / dist);
                    }
                }
            }
            Scene::Blossoms => {
                for petal in &mut self.drifters {
                    let d = petal.pos - at;
                    let dist = d.length() + 0.1;
                    if dist < 160.0 {
                        let force = (160.0 - dist) / 160.0;
                        petal.vel.x += -d.y / dist * force * 200.0 + self.rng.gen_range(-40.0..40.0);
                        petal.vel.y -= force * 250.0;
                    }
                }
            }
            Scene::Aurora => self.ripples.push(Ripple { x: at.x, age: 0.0 }),
        }
    }

    fn update_snow(&mut self, dt: f32) {
        for i in 0..self.drifters.len() {
            let flake = &mut self.drifters[i];
            let sway = (self.time * flake.sway_speed + flake.phase).sin() * flake.sway_amp;
            flake.pos.x += (flake.vel.x + sway) * dt;
            flake.pos.y += flake.vel.y * dt;
            flake.vel.x *= 0.96;
            if flake.pos.y > H + 10.0 {
                let fresh = self.snowflake(false);
                self.drifters[i] = fresh;
                continue;
            }
            wrap_x(&mut flake.pos, 20.0);
        }
    }

    fn update_blossoms(&mut self, dt: f32) {
        for i in 0..self.drifters.len() {
            let petal = &mut self.drifters[i];
            let sway = (self.time * petal.sway_speed + petal.phase).sin() * petal.sway_amp;
            petal.pos.x += (petal.vel.x + sway) * dt;
            petal.pos.y += petal.vel.y * dt;
            petal.rotation += petal.rot_speed * dt;
            petal.vel.x *= 0.97;
            if petal.vel.y < 25.0 {
                petal.vel.y += 120.0 * dt;
            }
            if petal.pos.y > H + 10.0 {
                let fresh = self.petal(false);
                self.drifters[i] = fresh;
                continue;
            }
            if petal.pos.y < -80.0 {
                petal.vel.y = self.rng.gen_range(25.0..70.0);
            }
            wrap_x(&mut petal.pos, 30.0);
        }
    }

    fn update_fireflies(&mut self, dt: f32) {
        for fly in &mut self.fireflies {
            fly.vel += Vec2::new(self.rng.gen_range(-30.0..30.0), self.rng.gen_range(-30.0..30.0)) * dt;
            fly.vel = fly.vel * 0.98;
            let speed = fly.vel.length();
            if speed > FIREFLY_MAX_SPEED {
                fly.vel = fly.vel * (FIREFLY_MAX_SPEED / speed);
            }
            fly.pos += fly.vel * dt;
            // Soft walls: a gentle push back inside.
            if fly.pos.x < 10.0 {
                fly.vel.x += 30.0 * dt;
            } else if fly.pos.x > W - 10.0 {
                fly.vel.x -= 30.0 * dt;
            }
            if fly.pos.y < 80.0 {
                fly.vel.y += 30.0 * dt;
            } else if fly.pos.y > H - 10.0 {
                fly.vel.y -= 30.0 * dt;
            }
        }
    }

    fn draw_drifters(&self, gfx: &mut dyn Renderer2d) {
        match self.scene {
            Scene::Snow => {
                for flake in &self.drifters {
                    let size = flake.size.floor();
                    let shade = if size > 4.0 {
                        [WHITE, rgb(220, 230, 250), rgb(200, 220, 245)][(flake.phase * 3.0) as usize % 3]
                    } else {
                        WHITE
                    };
                    gfx.fill_circle(flake.pos, size, shade);
                    if size >= 4.0 {
                        gfx.fill_circle(flake.pos, (size / 2.0).max(1.0), WHITE);
                    }
                }
            }
            Scene::Blossoms => {
                for petal in &self.drifters {
                    let d = Vec2::from_angle(petal.rotation, petal.size * 0.5);
                    let s = (petal.size * 0.7).max(2.0);
                    gfx.fill_circle(petal.pos + d, s, petal.shade);
                    gfx.fill_circle(petal.pos - d, (s - 1.0).max(1.0), petal.shade);
                    gfx.fill_circle(petal.pos, (s / 2.0).max(1.0), rgb(255, 240, 245));
                }
            }
            _ => {}
        }
    }

    fn draw_rain(&self, gfx: &mut dyn Renderer2d) {
        for i in 0..self.rain.len() {
            let (Some(pos), Some(vel)) = (self.rain.position(i), self.rain.velocity(i)) else {
                continue;
            };
            // Faster drops streak longer and look brighter.
            let t = ((vel.y - 500.0) / 400.0).clamp(0.0, 1.0);
            let len = 8.0 + 12.0 * t;
            let color = rgb(140, 170, 220 + (35.0 * t) as u8);
            gfx.draw_line(pos, pos + Vec2::new(2.0, len), 1.0, color);
        }
        self.splashes.draw(gfx);
    }

    fn draw_fireflies(&self, gfx: &mut dyn Renderer2d) {
        for fly in &self.fireflies {
            let pulse = ((self.time * fly.pulse_speed + fly.phase).sin() + 1.0) * 0.5;
            let alpha = 40.0 + 215.0 * pulse;
            let glow = fly.size * 3.0 + pulse * 6.0;
            let color = widgets::hsv_to_rgb(fly.hue, 0.8, 1.0);
            gfx.blend_circle(fly.pos, glow, color, (alpha / 3.0) as u8);
            gfx.blend_circle(fly.pos, (glow / 2.0).max(1.0), color, (alpha / 2.0) as u8);
            let core = [
                color[0].saturating_add(60),
                color[1].saturating_add(60),
                color[2].saturating_add(20),
                255,
            ];
            gfx.fill_circle(fly.pos, (fly.size * (0.6 + 0.4 * pulse)).max(1.0), core);
        }
    }

    fn ripple_offset(&self, x: f32) -> f32 {
        self.ripples
            .iter()
            .map(|r| {
                let dist = (x - r.x).abs();
                let front = r.age * RIPPLE_SPEED;
                if (dist - front).abs() < 80.0 {
                    let strength = (1.0 - r.age / RIPPLE_SECS).max(0.0);
                    ((dist - front) * 0.1).sin() * 25.0 * strength
                } else {
                    0.0
                }
            })
            .sum()
    }

    fn draw_aurora(&self, gfx: &mut dyn Renderer2d) {
        let t = self.time;
        for star in &self.stars {
            let twinkle = ((t * star.twinkle_speed + star.phase).sin() + 1.0) * 0.5;
            let v = (star.brightness * (0.4 + 0.6 * twinkle)) as u8;
            gfx.fill_circle(star.pos, star.size, rgb(v, v, v.saturating_add(30)));
        }

        let band_bottom = (H * 0.55) as i32;
        let band_h = (band_bottom - AURORA_TOP) / AURORA_BANDS;
        for band in 0..AURORA_BANDS {
            let base_hue = 120.0 + band as f32 * 35.0;
            let y_base = (AURORA_TOP + band * band_h) as f32;
            let center = y_base + band_h as f32 / 2.0;
            for x in (0..SCREEN_W).step_by(3) {
                let xf = x as f32;
                let b = band as f32;
                let wave = (xf * 0.008 + t * 0.5 + b * 0.7).sin() * 30.0
                    + (xf * 0.015 + t * 0.8 + b * 1.2).sin() * 15.0
                    + (xf * 0.003 + t * 0.3).sin() * 20.0
                    + self.ripple_offset(xf);
                let y = center + wave;
                let hue = (base_hue + (xf * 0.005 + t * 0.4).sin() * 20.0 + t * 8.0) / 360.0;
                let color = widgets::hsv_to_rgb(hue, 0.7, 1.0);
                let alpha = (120.0 * (1.0 - (y - center).abs() / (band_h as f32 * 0.8))).clamp(0.0, 120.0);
                if alpha <= 0.0 || y < AURORA_TOP as f32 || y >= band_bottom as f32 - 4.0 {
                    continue;
                }
                for dy in -2i32..=2 {
                    let fade = alpha - dy.abs() as f32 * 30.0;
                    if fade > 0.0 {
                        gfx.blend_rect(Rect::new(x, y as i32 + dy, 3, 1), color, fade as u8);
                    }
                }
            }
        }

        // Treeline silhouette, identical every frame.
        let ground = (H * 0.88) as i32;
        gfx.fill_rect(Rect::new(0, ground, SCREEN_W, SCREEN_H - ground), rgb(8, 10, 15));
        let mut trees = SmallRng::seed_from_u64(7);
        for x in (0..SCREEN_W).step_by(12) {
            let tree_h = trees.gen_range(15.0..50.0);
            let g = ground as f32;
            let x = x as f32;
            gfx.fill_triangle(
                Vec2::new(x, g),
                Vec2::new(x + 6.0, g - tree_h),
                Vec2::new(x + 12.0, g),
                rgb(10, 15, 12),
            );
        }
    }

    fn draw_toolbar(&self, gfx: &mut dyn Renderer2d) {
        let band = self.toolbar.band();
        for (i, rect) in self.toolbar.visible_buttons() {
            let scene = Scene::ALL[i];
            let clipped = rect.intersect(band);
            if clipped.is_empty() {
                continue;
            }
            if scene == self.scene {
                gfx.fill_rounded_rect(clipped, 14, widgets::brighten(scene.button_color(), 60));
                gfx.rect_outline(clipped, 2, WHITE);
            } else {
                gfx.blend_rect(clipped, scene.button_color(), 160);
            }
            if band.contains(rect.center()) {
                let c = rect.center();
                scene.draw_icon(gfx, c + Vec2::new(0.0, -10.0));
                let scale = widgets::fit_text_scale(scene.label(), rect.w - 8, 2);
                gfx.draw_text_centered(Vec2::new(c.x, (rect.bottom() - 12) as f32), scene.label(), WHITE, scale);
            }
        }
        let (_, more_right) = self.toolbar.overflow();
        if more_right {
            let mid = band.center().y;
            let r = band.right() as f32;
            gfx.fill_triangle(
                Vec2::new(r - 2.0, mid),
                Vec2::new(r - 10.0, mid - 8.0),
                Vec2::new(r - 10.0, mid + 8.0),
                WHITE,
            );
        }
    }
}

/// Wraps a drifting particle that leaves the side edges back around.
fn wrap_x(pos: &mut Vec2, margin: f32) {
    if pos.x < -margin {
        pos.x = W + 10.0;
    } else if pos.x > W + margin {
        pos.x = -10.0;
    }
}

impl Default for WeatherToy {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for WeatherToy {
    fn on_enter(&mut self) {
        self.time = 0.0;
        self.switch_scene(Scene::Snow);
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if self.toolbar.handle_event(event) {
            if let PointerEvent::Up(p) = *event {
                if let Some(i) = self.toolbar.button_at(p) {
                    if Scene::ALL[i] != self.scene {
                        self.switch_scene(Scene::ALL[i]);
                    }
                }
            }
            return Nav::Stay;
        }
        if let PointerEvent::Down(p) = *event {
            if widgets::back_button_hit(p) {
                return Nav::Back;
            }
            self.on_tap(p);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.time += dt;
        self.toolbar.update(dt);
        match self.scene {
            Scene::Snow => self.update_snow(dt),
            Scene::Rain => {
                self.rain.update(dt, 0.0);
                self.refill_rain(false);
                self.splashes.update(dt);
            }
            Scene::Fireflies => self.update_fireflies(dt),
            Scene::Blossoms => self.update_blossoms(dt),
            Scene::Aurora => {
                for r in &mut self.ripples {
                    r.age += dt;
                }
                self.ripples.retain(|r| r.age < RIPPLE_SECS);
            }
        }
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        self.scene.draw_sky(gfx);
        match self.scene {
            Scene::Snow | Scene::Blossoms => self.draw_drifters(gfx),
            Scene::Rain => self.draw_rain(gfx),
            Scene::Fireflies => self.draw_fireflies(gfx),
            Scene::Aurora => self.draw_aurora(gfx),
        }
        self.draw_toolbar(gfx);
        widgets::back_button(gfx);
    }
}
