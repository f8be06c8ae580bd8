use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Spark, SparkPool};
use engine::placement::{Circle, PlacementParams, Region, place_circle};
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const BUBBLE_COUNT: usize = 12;
const SPARKS_PER_POP: usize = 15;
const BG_TOP: Color = rgb(200, 230, 255);
const BG_BOTTOM: Color = rgb(255, 210, 240);

const PALETTE: [Color; 12] = [
    rgb(255, 120, 150),
    rgb(120, 200, 255),
    rgb(180, 130, 255),
    rgb(255, 200, 100),
    rgb(100, 230, 180),
    rgb(255, 160, 200),
    rgb(150, 220, 255),
    rgb(255, 150, 120),
    rgb(200, 255, 180),
    rgb(255, 180, 255),
    rgb(120, 255, 200),
    rgb(255, 230, 130),
];

#[derive(Debug, Clone)]
struct Bubble {
    home: Vec2,
    radius: f32,
    color: Color,
    phase: f32,
    bob_speed: f32,
    bob_amount: f32,
}

impl Bubble {
    fn center(&self, time: f32) -> Vec2 {
        let bob = (time * self.bob_speed + self.phase).sin() * self.bob_amount;
        self.home + Vec2::new(0.0, bob)
    }
}

#[derive(Debug, Clone)]
struct PopLabel {
    pos: Vec2,
    color: Color,
    life: f32,
}

#[derive(Debug, Clone)]
struct Cloud {
    pos: Vec2,
    speed: f32,
    size: f32,
    alpha: u8,
}

pub struct BubblePop {
    rng: SmallRng,
    bubbles: Vec<Bubble>,
    sparks: SparkPool,
    labels: Vec<PopLabel>,
    clouds: Vec<Cloud>,
    time: f32,
}

impl BubblePop {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(mut rng: SmallRng) -> Self {
        let clouds = (0..6)
            .map(|_| Cloud {
                pos: Vec2::new(
                    rng.gen_range(-100.0..SCREEN_W as f32 + 100.0),
                    rng.gen_range(50.0..SCREEN_H as f32 - 100.0),
                ),
                speed: rng.gen_range(8.0..25.0),
                size: rng.gen_range(40.0..90.0),
                alpha: rng.gen_range(30..70),
            })
            .collect();
        Self {
            rng,
            bubbles: Vec::with_capacity(BUBBLE_COUNT),
            sparks: SparkPool::new(SPARKS_PER_POP * 8),
            labels: Vec::new(),
            clouds,
            time: 0.0,
        }
    }

    fn spawn_bubble(&mut self) {
        let radius = self.rng.gen_range(30..=65) as f32;
        let existing: Vec<Circle> = self
            .bubbles
            .iter()
            .map(|b| Circle::new(b.home, b.radius))
            .collect();
        let region = Region::new(Vec2::ZERO, Vec2::new(SCREEN_W as f32, SCREEN_H as f32));
        let spot = place_circle(&mut self.rng, region, radius, &existing, PlacementParams::default());

        self.bubbles.push(Bubble {
            home: spot.center,
            radius,
            color: PALETTE[self.rng.gen_range(0..PALETTE.len())],
            phase: self.rng.gen_range(0.0..std::f32::consts::TAU),
            bob_speed: self.rng.gen_range(1.5..3.0),
            bob_amount: self.rng.gen_range(2.0..5.0),
        });
    }

    fn pop(&mut self, index: usize) {
        let bubble = self.bubbles.remove(index);
        let at = bubble.center(self.time);
        for _ in 0..SPARKS_PER_POP {
            let jitter = |rng: &mut SmallRng, c: u8| {
                (c as i32 + rng.gen_range(-30..=50)).clamp(0, 255) as u8
            };
            let shade = rgb(
                jitter(&mut self.rng, bubble.color[0]),
                jitter(&mut self.rng, bubble.color[1]),
                jitter(&mut self.rng, bubble.color[2]),
            );
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(200.0..500.0));
            let spark = Spark::new(
                at,
                vel,
                shade,
                self.rng.gen_range(4.0..10.0),
                self.rng.gen_range(0.3..0.6),
            )
            .with_gravity(200.0);
            if !self.sparks.emit(spark) {
                break;
            }
        }
        self.labels.push(PopLabel {
            pos: at - Vec2::new(0.0, bubble.radius),
            color: widgets::darken(bubble.color, 40),
            life: 0.8,
        });
        self.spawn_bubble();
    }
}

impl Default for BubblePop {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for BubblePop {
    fn on_enter(&mut self) {
        self.bubbles.clear();
        self.sparks.clear();
        self.labels.clear();
        self.time = 0.0;
        for _ in 0..BUBBLE_COUNT {
            self.spawn_bubble();
        }
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        let time = self.time;
        if let Some(i) = self
            .bubbles
            .iter()
            .position(|b| b.center(time).distance(p) < b.radius)
        {
            self.pop(i);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.time += dt;
        for cloud in &mut self.clouds {
            cloud.pos.x += cloud.speed * dt;
            if cloud.pos.x > SCREEN_W as f32 + 120.0 {
                cloud.pos.x = -120.0;
                cloud.pos.y = self.rng.gen_range(50.0..SCREEN_H as f32 - 100.0);
            }
        }
        self.sparks.update(dt);
        for label in &mut self.labels {
            label.pos.y -= 120.0 * dt;
            label.life -= dt;
        }
        self.labels.retain(|l| l.life > 0.0);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        widgets::vertical_gradient(gfx, Rect::from_size(SCREEN_W, SCREEN_H), BG_TOP, BG_BOTTOM);

        for cloud in &self.clouds {
            let r = cloud.size / 3.0;
            let p = cloud.pos;
            gfx.blend_circle(p + Vec2::new(-cloud.size / 2.0, r + 5.0), r, WHITE, cloud.alpha);
            gfx.blend_circle(p + Vec2::new(0.0, r), r * 1.3, WHITE, cloud.alpha);
            gfx.blend_circle(p + Vec2::new(cloud.size / 2.0, r + 5.0), r, WHITE, cloud.alpha);
        }

        for b in &self.bubbles {
            let c = b.center(self.time);
            let r = b.radius;
            gfx.blend_circle(c, r * 1.3, b.color, 25);
            gfx.fill_circle(c, r, b.color);
            gfx.circle_outline(c, r, 2.0, widgets::darken(b.color, 40));
            gfx.fill_circle(c - Vec2::new(r * 0.3, r * 0.3), (r / 4.0).max(3.0), WHITE);
            gfx.blend_circle(c - Vec2::new(r * 0.15, r * 0.5), (r / 6.0).max(2.0), WHITE, 180);
        }

        self.sparks.draw(gfx);
        for label in &self.labels {
            gfx.draw_text_centered(label.pos, "POP!", label.color, 4);
        }

        widgets::back_button(gfx);
    }
}
