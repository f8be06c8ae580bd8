use engine::drag::{BoardTick, DragBoard, DragTuning, DraggableItem, DropOutcome};
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

const BG: Color = rgb(230, 240, 255);
const SHAPE_SIZE: f32 = 45.0;
const SNAP_SPARKS: usize = 12;
const CONFETTI: usize = 80;
const TARGET_Y: f32 = SCREEN_H as f32 - 150.0;
const DIVIDER_Y: i32 = SCREEN_H / 2 + 20;
/// Edges of the area loose shapes start in; clear of the back button.
const HOME_REGION: Region = Region::new(Vec2::new(70.0, 75.0), Vec2::new(650.0, 355.0));

const CONFETTI_COLORS: [Color; 7] = [
    rgb(220, 50, 50),
    rgb(50, 100, 220),
    rgb(240, 200, 30),
    rgb(50, 190, 80),
    rgb(160, 60, 200),
    rgb(255, 140, 50),
    rgb(255, 100, 180),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Hexagon,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Hexagon,
    ];

    fn color(self) -> Color {
        match self {
            ShapeKind::Circle => rgb(220, 50, 50),
            ShapeKind::Square => rgb(50, 100, 220),
            ShapeKind::Triangle => rgb(240, 200, 30),
            ShapeKind::Star => rgb(50, 190, 80),
            ShapeKind::Hexagon => rgb(160, 60, 200),
        }
    }

    fn outline(self) -> Color {
        widgets::darken(self.color(), 40)
    }

    fn outline_points(self, c: Vec2, size: f32) -> Vec<Vec2> {
        match self {
            ShapeKind::Circle => widgets::regular_polygon(c, size, 32, 0.0),
            ShapeKind::Square => vec![
                c + Vec2::new(-size, -size),
                c + Vec2::new(size, -size),
                c + Vec2::new(size, size),
                c + Vec2::new(-size, size),
            ],
            ShapeKind::Triangle => vec![
                c + Vec2::new(0.0, -size),
                c + Vec2::new(size, size * 0.8),
                c + Vec2::new(-size, size * 0.8),
            ],
            ShapeKind::Star => widgets::star_points(c, size, size * 0.4, 5, 0.0),
            ShapeKind::Hexagon => widgets::regular_polygon(c, size, 6, -std::f32::consts::FRAC_PI_6),
        }
    }

    fn fill(self, gfx: &mut dyn Renderer2d, c: Vec2, size: f32, color: Color) {
        match self {
            ShapeKind::Circle => gfx.fill_circle(c, size, color),
            _ => gfx.fill_polygon(&self.outline_points(c, size), color),
        }
    }

    fn stroke(self, gfx: &mut dyn Renderer2d, c: Vec2, size: f32, thickness: f32, color: Color) {
        if self == ShapeKind::Circle {
            gfx.circle_outline(c, size, thickness, color);
            return;
        }
        let pts = self.outline_points(c, size);
        for (i, &a) in pts.iter().enumerate() {
            let b = pts[(i + 1) % pts.len()];
            gfx.draw_line(a, b, thickness, color);
        }
    }
}

#[derive(Debug, Clone)]
struct Confetti {
    pos: Vec2,
    vel: Vec2,
    color: Color,
    size: f32,
    rot: f32,
    spin: f32,
}

impl Confetti {
    fn spawn(rng: &mut SmallRng) -> Self {
        Self {
            pos: Vec2::new(rng.gen_range(0.0..SCREEN_W as f32), rng.gen_range(-(SCREEN_H as f32)..0.0)),
            vel: Vec2::new(rng.gen_range(-60.0..60.0), rng.gen_range(100.0..300.0)),
            color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
            size: rng.gen_range(4.0..10.0),
            rot: rng.gen_range(0.0..std::f32::consts::TAU),
            spin: rng.gen_range(-3.5..3.5),
        }
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        let half_w = Vec2::from_angle(self.rot, self.size / 2.0);
        let half_h = Vec2::from_angle(self.rot + std::f32::consts::FRAC_PI_2, self.size * 0.3);
        gfx.fill_polygon(
            &[
                self.pos - half_w - half_h,
                self.pos + half_w - half_h,
                self.pos + half_w + half_h,
                self.pos - half_w + half_h,
            ],
            self.color,
        );
    }
}

fn target_for(index: usize) -> Vec2 {
    let spacing = SCREEN_W as f32 / (ShapeKind::ALL.len() + 1) as f32;
    Vec2::new(spacing * (index + 1) as f32, TARGET_Y)
}

pub struct ShapeSorter {
    rng: SmallRng,
    board: DragBoard<ShapeKind>,
    sparks: SparkPool,
    confetti: Vec<Confetti>,
}

impl ShapeSorter {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        let tuning = DragTuning {
            hit_radius: SHAPE_SIZE + 10.0,
            ..DragTuning::default()
        };
        let mut sorter = Self {
            rng,
            board: DragBoard::new(Vec::new(), tuning),
            sparks: SparkPool::new(SNAP_SPARKS * ShapeKind::ALL.len()),
            confetti: Vec::with_capacity(CONFETTI),
        };
        sorter.deal();
        sorter
    }

    /// Fresh round: every shape back in the upper half at a new random spot.
    fn deal(&mut self) {
        let mut homes: Vec<Circle> = Vec::with_capacity(ShapeKind::ALL.len());
        for _ in ShapeKind::ALL {
            let spot = place_circle(&mut self.rng, HOME_REGION, SHAPE_SIZE, &homes, PlacementParams::default());
            homes.push(Circle::new(spot.center, SHAPE_SIZE));
        }
        let items = ShapeKind::ALL
            .iter()
            .zip(&homes)
            .enumerate()
            .map(|(i, (&kind, home))| DraggableItem::new(kind, home.center, target_for(i)))
            .collect();
        self.board.reset(items);
        self.sparks.clear();
        self.confetti.clear();
    }

    fn snapped(&mut self, target: Vec2, completed: bool) {
        let color = self
            .board
            .items()
            .iter()
            .find(|it| it.target == target)
            .map_or(WHITE, |it| it.data.color());
        for _ in 0..SNAP_SPARKS {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(150.0..400.0));
            let spark = Spark::new(target, vel, color, self.rng.gen_range(4.0..9.0), self.rng.gen_range(0.4..0.8))
                .with_gravity(150.0);
            if !self.sparks.emit(spark) {
                break;
            }
        }
        if completed {
            tracing::debug!("shape sorter round complete");
            self.confetti = (0..CONFETTI).map(|_| Confetti::spawn(&mut self.rng)).collect();
        }
    }
}

impl Default for ShapeSorter {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for ShapeSorter {
    fn on_enter(&mut self) {
        self.deal();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if matches!(*event, PointerEvent::Down(p) if widgets::back_button_hit(p)) {
            return Nav::Back;
        }
        if let Some(DropOutcome::Snapped { target, completed }) = self.board.handle_event(event) {
            self.snapped(target, completed);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.sparks.update(dt);
        match self.board.update(dt) {
            BoardTick::Running => {}
            BoardTick::Celebrating => {
                for c in &mut self.confetti {
                    c.pos += c.vel * dt;
                    c.rot += c.spin * dt;
                    if c.pos.y > SCREEN_H as f32 + 20.0 {
                        c.pos = Vec2::new(self.rng.gen_range(0.0..SCREEN_W as f32), self.rng.gen_range(-40.0..-10.0));
                        c.vel.y = self.rng.gen_range(100.0..300.0);
                    }
                }
            }
            BoardTick::RoundOver => self.deal(),
        }
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(BG);
        gfx.fill_rect(Rect::new(30, DIVIDER_Y - 1, SCREEN_W - 60, 2), rgb(200, 210, 230));
        gfx.draw_text_centered(
            Vec2::new(SCREEN_W as f32 / 2.0, DIVIDER_Y as f32 - 18.0),
            "DRAG SHAPES DOWN",
            rgb(140, 150, 170),
            3,
        );

        for item in self.board.items() {
            item.data.stroke(gfx, item.target, SHAPE_SIZE, 3.0, item.data.outline());
            item.data.stroke(gfx, item.target, SHAPE_SIZE - 6.0, 1.0, item.data.outline());
        }

        let snap_secs = self.board.tuning().snap_secs;
        let dragged = self.board.dragging().map(|d| d.target);
        for item in self.board.items() {
            let kind = item.data;
            if Some(item.target) == dragged {
                kind.fill(gfx, item.pos + Vec2::new(3.0, 3.0), SHAPE_SIZE + 4.0, rgb(160, 160, 180));
                kind.fill(gfx, item.pos, SHAPE_SIZE + 4.0, kind.color());
            } else if item.placed {
                kind.fill(gfx, item.pos, SHAPE_SIZE * item.scale(snap_secs), kind.color());
            } else {
                kind.fill(gfx, item.pos + Vec2::new(3.0, 3.0), SHAPE_SIZE, rgb(180, 180, 200));
                kind.fill(gfx, item.pos, SHAPE_SIZE, kind.color());
            }
        }

        self.sparks.draw(gfx);

        if let Some(left) = self.board.celebration_left() {
            gfx.blend_rect(Rect::from_size(SCREEN_W, SCREEN_H), WHITE, 100);
            for c in &self.confetti {
                c.draw(gfx);
            }
            let center = Vec2::new(SCREEN_W as f32 / 2.0, SCREEN_H as f32 / 2.0);
            let scale = if (left * 8.0).sin() > 0.0 { 17 } else { 15 };
            gfx.draw_text_centered(center + Vec2::new(3.0, 3.0), "YAY!", rgb(120, 120, 120), scale);
            let hue = (left * 0.55).fract();
            gfx.draw_text_centered(center, "YAY!", widgets::hsv_to_rgb(hue, 0.8, 1.0), scale);
        }

        widgets::back_button(gfx);
    }
}
