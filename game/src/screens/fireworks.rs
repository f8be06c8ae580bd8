use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Spark, SparkPool};
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const STAR_COUNT: usize = 50;
/// Rockets explode once this close to their target.
const ARRIVE_DIST: f32 = 10.0;
const TRAIL_EVERY: f32 = 0.015;
/// Explosions never go off below this line.
const LOWEST_TARGET: f32 = SCREEN_H as f32 - 80.0;
const SKY_TOP: Color = rgb(5, 5, 25);
const SKY_BOTTOM: Color = rgb(15, 15, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Starburst,
    Ring,
    Cascade,
    Spiral,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [Pattern::Starburst, Pattern::Ring, Pattern::Cascade, Pattern::Spiral];

    /// Launch velocity of particle `i` of `count`.
    fn velocity(self, rng: &mut SmallRng, i: usize, count: usize) -> Vec2 {
        use std::f32::consts::{PI, TAU};
        let frac = i as f32 / count as f32;
        match self {
            Pattern::Starburst => Vec2::from_angle(rng.gen_range(0.0..TAU), rng.gen_range(60.0..220.0)),
            Pattern::Ring => {
                let angle = frac * TAU + rng.gen_range(-0.1..0.1);
                Vec2::from_angle(angle, rng.gen_range(120.0..170.0))
            }
            Pattern::Cascade => {
                let angle = rng.gen_range(-PI * 0.8..-PI * 0.2);
                Vec2::from_angle(angle, rng.gen_range(80.0..200.0))
                    + Vec2::new(rng.gen_range(-30.0..30.0), -rng.gen_range(0.0..60.0))
            }
            Pattern::Spiral => Vec2::from_angle(frac * TAU * 3.0, 60.0 + frac * 160.0),
        }
    }
}

#[derive(Debug, Clone)]
struct Rocket {
    pos: Vec2,
    target: Vec2,
    speed: f32,
    hue: f32,
    trail_in: f32,
}

#[derive(Debug, Clone)]
struct Star {
    pos: Vec2,
    radius: f32,
    phase: f32,
    speed: f32,
}

fn hue_color(rng: &mut SmallRng, hue: f32, spread: f32, sat: f32) -> Color {
    let h = (hue + rng.gen_range(-spread..spread)).rem_euclid(1.0);
    widgets::hsv_to_rgb(h, sat, 1.0)
}

/// Sparks dim toward black as they burn out.
fn draw_embers(gfx: &mut dyn Renderer2d, pool: &SparkPool) {
    for s in pool.iter() {
        let a = s.alpha();
        let color = rgb(
            (s.color[0] as f32 * a) as u8,
            (s.color[1] as f32 * a) as u8,
            (s.color[2] as f32 * a) as u8,
        );
        gfx.fill_circle(s.pos, (s.radius * a).max(1.0), color);
    }
}

pub struct Fireworks {
    rng: SmallRng,
    rockets: Vec<Rocket>,
    trails: SparkPool,
    bursts: SparkPool,
    stars: Vec<Star>,
    last_pattern: Option<Pattern>,
}

impl Fireworks {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        let mut fireworks = Self {
            rng,
            rockets: Vec::new(),
            trails: SparkPool::new(600),
            bursts: SparkPool::new(1200),
            stars: Vec::with_capacity(STAR_COUNT),
            last_pattern: None,
        };
        fireworks.scatter_stars();
        fireworks
    }

    fn scatter_stars(&mut self) {
        let rng = &mut self.rng;
        self.stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.gen_range(0.0..SCREEN_W as f32),
                    rng.gen_range(0.0..SCREEN_H as f32 - 100.0),
                ),
                radius: rng.gen_range(1.0..2.5),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                speed: rng.gen_range(1.5..3.5),
            })
            .collect();
    }

    fn launch(&mut self, target: Vec2) {
        let target = Vec2::new(target.x, target.y.min(LOWEST_TARGET));
        self.rockets.push(Rocket {
            pos: Vec2::new(SCREEN_W as f32 / 2.0, SCREEN_H as f32),
            target,
            speed: self.rng.gen_range(500.0..650.0),
            hue: self.rng.r#gen(),
            trail_in: 0.0,
        });
    }

    fn explode(&mut self, at: Vec2, hue: f32) {
        let pattern = Pattern::ALL[self.rng.gen_range(0..Pattern::ALL.len())];
        let count = self.rng.gen_range(50..=80);
        tracing::trace!(?pattern, count, "firework burst");
        for i in 0..count {
            let sat = self.rng.gen_range(0.7..1.0);
            let color = hue_color(&mut self.rng, hue, 0.07, sat);
            let vel = pattern.velocity(&mut self.rng, i, count);
            let jitter = Vec2::new(self.rng.gen_range(-2.0..2.0), self.rng.gen_range(-2.0..2.0));
            let spark = Spark::new(
                at + jitter,
                vel,
                color,
                self.rng.gen_range(2.0..4.0),
                self.rng.gen_range(1.5..2.5),
            )
            .with_gravity(self.rng.gen_range(60.0..120.0));
            if !self.bursts.emit(spark) {
                break;
            }
        }
        self.last_pattern = Some(pattern);
    }

    fn update_rockets(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.rockets.len() {
            let rocket = &mut self.rockets[i];
            let to_target = rocket.target - rocket.pos;
            let dist = to_target.length();
            if dist < ARRIVE_DIST {
                let Rocket { pos, hue, .. } = self.rockets.swap_remove(i);
                self.explode(pos, hue);
                continue;
            }
            let step = (rocket.speed * dt).min(dist);
            rocket.pos += to_target * (step / dist);

            rocket.trail_in -= dt;
            if rocket.trail_in <= 0.0 {
                rocket.trail_in = TRAIL_EVERY;
                let (pos, hue) = (rocket.pos, rocket.hue);
                let offset = Vec2::new(self.rng.gen_range(-3.0..3.0), self.rng.gen_range(-2.0..2.0));
                let color = hue_color(&mut self.rng, hue, 0.055, 0.8);
                let life = self.rng.gen_range(0.2..0.45);
                let mut spark = Spark::new(pos + offset, Vec2::ZERO, color, self.rng.gen_range(1.5..3.0), life);
                spark.max_life = 0.45;
                self.trails.emit(spark);
            }
            i += 1;
        }
    }
}

impl Default for Fireworks {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for Fireworks {
    fn on_enter(&mut self) {
        self.rockets.clear();
        self.trails.clear();
        self.bursts.clear();
        self.last_pattern = None;
        self.scatter_stars();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        self.launch(p);
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        for star in &mut self.stars {
            star.phase += star.speed * dt;
        }
        self.update_rockets(dt);
        self.trails.update(dt);
        self.bursts.update(dt);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        widgets::vertical_gradient(gfx, Rect::from_size(SCREEN_W, SCREEN_H), SKY_TOP, SKY_BOTTOM);

        for star in &self.stars {
            let twinkle = (star.phase.sin() + 1.0) / 2.0;
            let v = (120.0 + 135.0 * twinkle) as u8;
            gfx.fill_circle(star.pos, (star.radius * (0.6 + 0.4 * twinkle)).max(1.0), rgb(v, v, v));
        }

        draw_embers(gfx, &self.trails);
        for rocket in &self.rockets {
            gfx.fill_circle(rocket.pos, 4.0, widgets::hsv_to_rgb(rocket.hue, 0.9, 1.0));
            gfx.fill_circle(rocket.pos, 2.0, WHITE);
        }
        draw_embers(gfx, &self.bursts);

        widgets::back_button(gfx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{render, run_for, tap};

    fn screen() -> Fireworks {
        let mut s = Fireworks::with_rng(SmallRng::seed_from_u64(8));
        s.on_enter();
        s
    }

    #[test]
    fn tap_launches_from_the_bottom_center() {
        let mut s = screen();
        tap(&mut s, Vec2::new(500.0, 200.0));
        assert_eq!(s.rockets.len(), 1);
        assert_eq!(s.rockets[0].pos, Vec2::new(360.0, 720.0));
        assert_eq!(s.rockets[0].target, Vec2::new(500.0, 200.0));
    }

    #[test]
    fn low_taps_explode_above_the_floor() {
        let mut s = screen();
        tap(&mut s, Vec2::new(200.0, 710.0));
        assert_eq!(s.rockets[0].target.y, LOWEST_TARGET);
    }

    #[test]
    fn rocket_trails_then_bursts_at_the_target() {
        let mut s = screen();
        let target = Vec2::new(300.0, 250.0);
        tap(&mut s, target);
        s.update(0.1);
        assert!(!s.trails.is_empty());
        run_for(&mut s, 1.2);
        assert!(s.rockets.is_empty());
        assert!(s.last_pattern.is_some());
        assert!((50..=80).contains(&s.bursts.len()));
        let near = s.bursts.iter().filter(|p| p.pos.distance(target) < 400.0).count();
        assert_eq!(near, s.bursts.len());
        let _ = render(&s);
    }

    #[test]
    fn every_pattern_spreads_outward() {
        let mut rng = SmallRng::seed_from_u64(2);
        for pattern in Pattern::ALL {
            let vels: Vec<Vec2> = (0..60).map(|i| pattern.velocity(&mut rng, i, 60)).collect();
            assert!(vels.iter().all(|v| v.length() > 20.0), "{pattern:?}");
        }
        let cascade: Vec<Vec2> = (0..60).map(|i| Pattern::Cascade.velocity(&mut rng, i, 60)).collect();
        assert!(cascade.iter().all(|v| v.y < 0.0));
    }

    #[test]
    fn bursts_fade_out() {
        let mut s = screen();
        tap(&mut s, Vec2::new(360.0, 300.0));
        run_for(&mut s, 4.0);
        assert!(s.bursts.is_empty() && s.trails.is_empty());
    }

    #[test]
    fn back_button_navigates_back() {
        let mut s = screen();
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Back);
        assert!(s.rockets.is_empty());
    }
}
