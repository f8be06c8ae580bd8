
use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Spark, SparkPool};
use engine::placement::{Circle, PlacementParams, Region, place_circle};
use engine::screen::{Nav, Screen};
use engine::toolbar::{ScrollToolbar, ToolbarLayout, ToolbarTuning};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::widgets::{self, BLACK, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

pub const MAX_ITEMS: usize = 30;
const GRASS_TOP: i32 = SCREEN_H - 200;
const PLANT_MIN_Y: f32 = 90.0;
const FLOWER_RADIUS: f32 = 14.0;
const SPARKLES_PER_PLANT: usize = 10;
const CLEAR_BUTTON: Rect = Rect::new(SCREEN_W - 80 - 12, 16, 80, 50);
/// Planting may nudge a flower or tree this far from the tap to keep it clear of neighbours.
const NUDGE: f32 = 60.0;

const SKY_TOP: Color = rgb(135, 206, 250);
const SKY_BOTTOM: Color = rgb(200, 230, 255);
const GRASS_TOP_COLOR: Color = rgb(100, 200, 80);
const GRASS_BOTTOM_COLOR: Color = rgb(60, 150, 50);

const PETAL_COLORS: [Color; 6] = [
    rgb(255, 130, 170),
    rgb(230, 60, 60),
    rgb(255, 220, 80),
    rgb(255, 160, 60),
    rgb(200, 120, 255),
    rgb(255, 180, 200),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Flower,
    Tree,
    Butterfly,
    Bee,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Flower, Tool::Tree, Tool::Butterfly, Tool::Bee];

    fn label(self) -> &'static str {
        match self {
            Tool::Flower => "FLOWER",
            Tool::Tree => "TREE",
            Tool::Butterfly => "FLY",
            Tool::Bee => "BEE",
        }
    }

    fn fill(self) -> Color {
        match self {
            Tool::Flower => rgb(255, 140, 180),
            Tool::Tree => rgb(110, 80, 50),
            Tool::Butterfly => rgb(190, 130, 255),
            Tool::Bee => rgb(255, 220, 60),
        }
    }
}

#[derive(Debug, Clone)]
struct Flower {
    base: Vec2,
    petal_color: Color,
    petals: usize,
    max_height: f32,
    petal_size: f32,
    sway_phase: f32,
    sway_speed: f32,
}

#[derive(Debug, Clone)]
struct Tree {
    base: Vec2,
    max_height: f32,
    crown_radius: f32,
    trunk_width: f32,
    sway_phase: f32,
    leaf: Color,
}

/// Butterflies and bees orbit the spot they were dropped at.
#[derive(Debug, Clone)]
struct Flyer {
    home: Vec2,
    color: Color,
    phase: Vec2,
    speed: Vec2,
    range: Vec2,
    wing_speed: f32,
    size: f32,
}

#[derive(Debug, Clone)]
enum Kind {
    Flower(Flower),
    Tree(Tree),
    Butterfly(Flyer),
    Bee(Flyer),
}

#[derive(Debug, Clone)]
struct GardenItem {
    kind: Kind,
    age: f32,
}

impl GardenItem {
    fn grow_secs(&self) -> f32 {
        match self.kind {
            Kind::Flower(_) => 1.8,
            Kind::Tree(_) => 2.5,
            Kind::Butterfly(_) | Kind::Bee(_) => 0.0,
        }
    }

    fn progress(&self) -> f32 {
        let grow = self.grow_secs();
        if grow <= 0.0 { 1.0 } else { (self.age / grow).min(1.0) }
    }

    fn is_ground(&self) -> bool {
        matches!(self.kind, Kind::Flower(_) | Kind::Tree(_))
    }

    /// Footprint used to keep ground plants apart.
    fn footprint(&self) -> Option<Circle> {
        match &self.kind {
            Kind::Flower(f) => Some(Circle::new(f.base, FLOWER_RADIUS)),
            Kind::Tree(t) => Some(Circle::new(t.base, t.crown_radius * 0.6)),
            Kind::Butterfly(_) | Kind::Bee(_) => None,
        }
    }

    /// Where the flyer is at `time`.
    fn flyer_pos(f: &Flyer, time: f32, figure_eight: bool) -> Vec2 {
        let t = time * f.speed.x + f.phase.x;
        if figure_eight {
            f.home + Vec2::new(t.sin() * f.range.x, (t * 2.0).sin() * f.range.y)
        } else {
            let ty = time * f.speed.y + f.phase.y;
            f.home + Vec2::new(t.sin() * f.range.x, ty.sin() * f.range.y)
        }
    }

    fn draw(&self, gfx: &mut dyn Renderer2d, time: f32) {
        let progress = self.progress();
        match &self.kind {
            Kind::Flower(f) => draw_flower(gfx, f, progress, time),
            Kind::Tree(t) => draw_tree(gfx, t, progress, time),
            Kind::Butterfly(b) => draw_butterfly(gfx, b, Self::flyer_pos(b, time, false), time),
            Kind::Bee(b) => draw_bee(gfx, b, Self::flyer_pos(b, time, true), time),
        }
    }
}

fn draw_flower(gfx: &mut dyn Renderer2d, f: &Flower, progress: f32, time: f32) {
    let sway = (time * f.sway_speed + f.sway_phase).sin() * 6.0 * progress;
    let stem_h = f.max_height * progress;
    let tip = f.base + Vec2::new(sway, -stem_h);

    if stem_h > 2.0 {
        let stem = rgb(60, 160, 50);
        let mid = f.base + Vec2::new(sway * 0.4, -stem_h * 0.5);
        gfx.draw_line(f.base, mid, 3.0, stem);
        gfx.draw_line(mid, tip, 3.0, stem);
        if progress > 0.4 {
            let leaf = f.base + Vec2::new(sway * 0.3, -stem_h * 0.45);
            gfx.fill_polygon(&widgets::ellipse_points(leaf, 8.0, 3.5), rgb(80, 190, 60));
        }
    }

    if progress > 0.5 {
        let bloom = (progress - 0.5) / 0.5;
        let r = f.petal_size * bloom;
        if r > 1.0 {
            for i in 0..f.petals {
                let angle = std::f32::consts::TAU / f.petals as f32 * i as f32;
                gfx.fill_circle(tip + Vec2::from_angle(angle, r * 0.7), r, f.petal_color);
            }
            gfx.fill_circle(tip, (r * 0.45).max(2.0), rgb(255, 230, 80));
        }
    } else if progress > 0.05 {
        gfx.fill_circle(tip, 3.0, rgb(100, 180, 70));
    }
}

fn draw_tree(gfx: &mut dyn Renderer2d, t: &Tree, progress: f32, time: f32) {
    let trunk_progress = (progress / 0.5).min(1.0);
    let crown_progress = ((progress - 0.4) / 0.6).max(0.0);
    let sway = (time * 1.2 + t.sway_phase).sin() * 3.0 * progress;

    let trunk_h = t.max_height * trunk_progress;
    let top = t.base + Vec2::new(sway, -trunk_h);
    if trunk_h > 2.0 {
        let hw = t.trunk_width / 2.0;
        let top_hw = (hw - 2.0).max(2.0);
        gfx.fill_polygon(
            &[
                t.base - Vec2::new(hw, 0.0),
                t.base + Vec2::new(hw, 0.0),
                top + Vec2::new(top_hw, 0.0),
                top - Vec2::new(top_hw, 0.0),
            ],
            rgb(110, 75, 45),
        );
        gfx.draw_line(t.base, top, 2.0, rgb(140, 100, 60));
    }

    let cr = t.crown_radius * crown_progress;
    if cr > 2.0 {
        let crown = top - Vec2::new(0.0, cr * 0.3);
        gfx.fill_circle(crown, cr, t.leaf);
        let highlight = widgets::brighten(t.leaf, 40);
        for (dx, dy) in [(-0.3, -0.4), (0.3, -0.5), (0.0, -0.7)] {
            gfx.fill_circle(crown + Vec2::new(cr * dx, cr * dy), cr * 0.5, highlight);
        }
    }
}

fn draw_butterfly(gfx: &mut dyn Renderer2d, b: &Flyer, at: Vec2, time: f32) {
    let flap = ((time * b.wing_speed).sin() + 1.0) * 0.4 + 0.2;
    let s = b.size;
    let wing_w = s * flap;
    let accent = rgb(
        b.color[0].saturating_add(50),
        b.color[1].saturating_add(50),
        b.color[2].saturating_sub(30),
    );
    if wing_w > 1.0 {
        for side in [-1.0, 1.0] {
            let wing = at + Vec2::new(side * (wing_w / 2.0 + 2.0), 0.0);
            gfx.fill_polygon(&widgets::ellipse_points(wing, wing_w / 2.0, s), b.color);
            gfx.fill_polygon(&widgets::ellipse_points(wing, (wing_w / 4.0).max(1.0), s / 2.0), accent);
        }
    }
    gfx.fill_polygon(&widgets::ellipse_points(at, 2.0, s / 2.0), rgb(40, 30, 30));
    let head = at - Vec2::new(0.0, s / 2.0);
    for dx in [-4.0, 4.0] {
        let tip = head + Vec2::new(dx, -6.0);
        gfx.draw_line(head, tip, 1.0, rgb(60, 50, 50));
        gfx.fill_circle(tip, 2.0, b.color);
    }
}

fn draw_bee(gfx: &mut dyn Renderer2d, b: &Flyer, at: Vec2, time: f32) {
    let s = b.size;
    let flutter = (time * b.wing_speed).sin() * 3.0;
    let wing = rgb(200, 220, 255);
    gfx.fill_polygon(&widgets::ellipse_points(at + Vec2::new(-s / 2.0 + 2.0, -s / 2.0 + flutter), s / 2.0, s / 2.0 - 1.0), wing);
    gfx.fill_polygon(&widgets::ellipse_points(at + Vec2::new(s / 2.0 - 1.0, -s / 2.0 - flutter), s / 2.0, s / 2.0 - 1.0), wing);
    gfx.fill_polygon(&widgets::ellipse_points(at, s / 2.0, s * 0.35), b.color);
    let stripe = (s / 5.0).max(1.0);
    let mut x = -s / 4.0;
    while x < s / 3.0 {
        gfx.draw_line(at + Vec2::new(x, -s / 4.0), at + Vec2::new(x, s / 4.0), (stripe / 2.0).max(1.0), BLACK);
        x += stripe * 2.0;
    }
    let head = at - Vec2::new(s / 2.0, 0.0);
    gfx.fill_circle(head, (s / 3.0).max(2.0), rgb(50, 40, 10));
    gfx.fill_circle(head - Vec2::new(1.0, 1.0), (s / 6.0).max(1.0), WHITE);
    gfx.fill_circle(at + Vec2::new(s / 2.0 + 1.0, 0.0), (s / 5.0).max(1.0), rgb(40, 30, 10));
}

fn toolbar_layout() -> ToolbarLayout {
    ToolbarLayout {
        left_x: 110.0,
        right_x: CLEAR_BUTTON.x as f32 - 8.0,
        y: 10.0,
        height: 62.0,
        btn_width: 120.0,
        btn_gap: 10.0,
        btn_count: Tool::ALL.len(),
    }
}

pub struct MagicGarden {
    rng: SmallRng,
    toolbar: ScrollToolbar,
    tool: Tool,
    items: Vec<GardenItem>,
    sparkles: SparkPool,
    /// Grass blades: base, tip, color. Fixed so they don't flicker.
    blades: Vec<(Vec2, Vec2, Color)>,
    time: f32,
}

impl MagicGarden {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        let mut blade_rng = SmallRng::seed_from_u64(42);
        let blades = (0..60)
            .map(|_| {
                let base = Vec2::new(
                    blade_rng.gen_range(0.0..SCREEN_W as f32),
                    blade_rng.gen_range(GRASS_TOP as f32..SCREEN_H as f32),
                );
                let tip = base + Vec2::new(blade_rng.gen_range(-3.0..3.0), -blade_rng.gen_range(5.0..15.0));
                let shade = blade_rng.gen_range(0..40);
                (base, tip, rgb(60 - shade, 140 + blade_rng.gen_range(0..30), 50 - shade))
            })
            .collect();
        Self {
            rng,
            toolbar: ScrollToolbar::new(toolbar_layout(), ToolbarTuning::default()),
            tool: Tool::Flower,
            items: Vec::with_capacity(MAX_ITEMS),
            sparkles: SparkPool::new(SPARKLES_PER_PLANT * 8),
            blades,
            time: 0.0,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Picks a base near `at` that keeps clear of other ground plants.
    fn ground_spot(&mut self, at: Vec2, radius: f32, min_y: f32) -> Vec2 {
        let at = Vec2::new(at.x, at.y.max(min_y));
        let existing: Vec<Circle> = self.items.iter().filter_map(GardenItem::footprint).collect();
        let region = Region::new(
            Vec2::new((at.x - NUDGE - radius).max(0.0), (at.y - NUDGE - radius).max(min_y - radius)),
            Vec2::new(
                (at.x + NUDGE + radius).min(SCREEN_W as f32),
                (at.y + NUDGE + radius).min(SCREEN_H as f32),
            ),
        );
        let params = PlacementParams {
            attempts: 20,
            margin: 0.0,
            buffer: 2.0,
        };
        let clear = existing.iter().all(|c| c.center.distance(at) >= c.radius + radius + params.buffer);
        if clear {
            return at;
        }
        place_circle(&mut self.rng, region, radius, &existing, params).center
    }

    fn flyer(&mut self, home: Vec2, color: Color, bee: bool) -> Flyer {
        let rng = &mut self.rng;
        if bee {
            let speed = rng.gen_range(1.5..2.5);
            Flyer {
                home,
                color,
                phase: Vec2::new(rng.gen_range(0.0..std::f32::consts::TAU), 0.0),
                speed: Vec2::new(speed, speed),
                range: Vec2::new(rng.gen_range(30.0..60.0), rng.gen_range(20.0..40.0)),
                wing_speed: rng.gen_range(12.0..18.0),
                size: rng.gen_range(8..=12) as f32,
            }
        } else {
            Flyer {
                home,
                color,
                phase: Vec2::new(
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                ),
                speed: Vec2::new(rng.gen_range(0.4..0.9), rng.gen_range(0.5..1.0)),
                range: Vec2::new(rng.gen_range(40.0..80.0), rng.gen_range(25.0..50.0)),
                wing_speed: rng.gen_range(5.0..8.0),
                size: rng.gen_range(10..=15) as f32,
            }
        }
    }

    fn plant(&mut self, at: Vec2) {
        if self.items.len() >= MAX_ITEMS {
            tracing::debug!("garden full, tap ignored");
            return;
        }
        let (kind, spot, sparkle) = match self.tool {
            Tool::Flower => {
                let base = self.ground_spot(at, FLOWER_RADIUS, GRASS_TOP as f32 + 10.0);
                let flower = Flower {
                    base,
                    petal_color: PETAL_COLORS[self.rng.gen_range(0..PETAL_COLORS.len())],
                    petals: self.rng.gen_range(5..=7),
                    max_height: self.rng.gen_range(50..=100) as f32,
                    petal_size: self.rng.gen_range(10..=16) as f32,
                    sway_phase: self.rng.gen_range(0.0..std::f32::consts::TAU),
                    sway_speed: self.rng.gen_range(1.5..2.5),
                };
                let color = flower.petal_color;
                (Kind::Flower(flower), base, color)
            }
            Tool::Tree => {
                let crown_radius = self.rng.gen_range(30..=50) as f32;
                let base = self.ground_spot(at, crown_radius * 0.6, GRASS_TOP as f32 + 20.0);
                let leaf = rgb(
                    self.rng.gen_range(40..=80),
                    self.rng.gen_range(150..=210),
                    self.rng.gen_range(40..=80),
                );
                let tree = Tree {
                    base,
                    max_height: self.rng.gen_range(80..=140) as f32,
                    crown_radius,
                    trunk_width: self.rng.gen_range(8..=14) as f32,
                    sway_phase: self.rng.gen_range(0.0..std::f32::consts::TAU),
                    leaf,
                };
                (Kind::Tree(tree), base, rgb(100, 200, 80))
            }
            Tool::Butterfly => {
                let color = rgb(
                    self.rng.gen_range(150..=255),
                    self.rng.gen_range(80..=255),
                    self.rng.gen_range(150..=255),
                );
                (Kind::Butterfly(self.flyer(at, color, false)), at, color)
            }
            Tool::Bee => {
                let color = rgb(255, 220, 50);
                (Kind::Bee(self.flyer(at, color, true)), at, rgb(255, 220, 60))
            }
        };

        self.items.push(GardenItem { kind, age: 0.0 });

        for _ in 0..SPARKLES_PER_PLANT {
            let jitter = |rng: &mut SmallRng, c: u8| (c as i32 + rng.gen_range(-30..=40)).clamp(0, 255) as u8;
            let shade = rgb(
                jitter(&mut self.rng, sparkle[0]),
                jitter(&mut self.rng, sparkle[1]),
                jitter(&mut self.rng, sparkle[2]),
            );
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(60.0..180.0)) - Vec2::new(0.0, 60.0);
            let spark = Spark::new(spot, vel, shade, self.rng.gen_range(2.0..5.0), self.rng.gen_range(0.4..0.8))
                .with_gravity(120.0);
            if !self.sparkles.emit(spark) {
                break;
            }
        }
    }

    fn draw_tool_icon(gfx: &mut dyn Renderer2d, tool: Tool, c: Vec2) {
        match tool {
            Tool::Flower => {
                for a in 0..5 {
                    let angle = std::f32::consts::TAU / 5.0 * a as f32;
                    gfx.fill_circle(c + Vec2::from_angle(angle, 8.0), 5.0, rgb(255, 80, 130));
                }
                gfx.fill_circle(c, 4.0, rgb(255, 230, 80));
            }
            Tool::Tree => {
                gfx.fill_rect(Rect::new(c.x as i32 - 3, c.y as i32 + 2, 6, 10), rgb(80, 55, 30));
                gfx.fill_circle(c - Vec2::new(0.0, 4.0), 10.0, rgb(60, 160, 60));
            }
            Tool::Butterfly => {
                let wing = rgb(230, 180, 255);
                gfx.fill_polygon(&widgets::ellipse_points(c + Vec2::new(-5.5, 0.0), 4.5, 6.0), wing);
                gfx.fill_polygon(&widgets::ellipse_points(c + Vec2::new(5.5, 0.0), 4.5, 6.0), wing);
                gfx.fill_rect(Rect::new(c.x as i32 - 1, c.y as i32 - 5, 2, 10), rgb(60, 40, 80));
            }
            Tool::Bee => {
                gfx.fill_polygon(&widgets::ellipse_points(c, 7.0, 5.0), rgb(255, 220, 50));
                gfx.draw_line(c + Vec2::new(-3.0, -5.0), c + Vec2::new(-3.0, 5.0), 1.0, BLACK);
                gfx.draw_line(c + Vec2::new(2.0, -5.0), c + Vec2::new(2.0, 5.0), 1.0, BLACK);
            }
        }
    }
}

impl Default for MagicGarden {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for MagicGarden {
    fn on_enter(&mut self) {
        self.items.clear();
        self.sparkles.clear();
        self.tool = Tool::Flower;
        self.time = 0.0;
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if self.toolbar.handle_event(event) {
            if let PointerEvent::Up(p) = *event {
                if let Some(i) = self.toolbar.button_at(p) {
                    self.tool = Tool::ALL[i];
                }
            }
            return Nav::Stay;
        }

        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        if CLEAR_BUTTON.contains(p) {
            self.items.clear();
            self.sparkles.clear();
            return Nav::Stay;
        }
        if p.y > PLANT_MIN_Y {
            self.plant(p);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.time += dt;
        self.toolbar.update(dt);
        for item in &mut self.items {
            item.age += dt;
        }
        self.sparkles.update(dt);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        widgets::vertical_gradient(gfx, Rect::new(0, 0, SCREEN_W, GRASS_TOP), SKY_TOP, SKY_BOTTOM);
        widgets::vertical_gradient(
            gfx,
            Rect::new(0, GRASS_TOP, SCREEN_W, SCREEN_H - GRASS_TOP),
            GRASS_TOP_COLOR,
            GRASS_BOTTOM_COLOR,
        );
        for (base, tip, color) in &self.blades {
            gfx.draw_line(*base, *tip, 1.0, *color);
        }
        gfx.fill_rect(Rect::new(0, GRASS_TOP - 1, SCREEN_W, 2), rgb(80, 180, 60));

        let sun = Vec2::new(SCREEN_W as f32 - 80.0, 110.0);
        for r in (25..=50).rev().step_by(5) {
            gfx.blend_circle(sun, r as f32, rgb(255, 240, 100), (40 + (50 - r) * 3) as u8);
        }
        gfx.fill_circle(sun, 22.0, rgb(255, 240, 130));

        for item in self.items.iter().filter(|it| it.is_ground()) {
            item.draw(gfx, self.time);
        }
        for item in self.items.iter().filter(|it| !it.is_ground()) {
            item.draw(gfx, self.time);
        }
        self.sparkles.draw(gfx);

        widgets::back_button(gfx);

        for (i, rect) in self.toolbar.visible_buttons() {
            let tool = Tool::ALL[i];
            let selected = tool == self.tool;
            if selected {
                gfx.fill_rounded_rect(rect.inflate(3), 14, WHITE);
            }
            gfx.fill_rounded_rect(rect, 10, tool.fill());
            if !selected {
                gfx.rect_outline(rect, 2, rgb(60, 60, 60));
            }
            Self::draw_tool_icon(gfx, tool, rect.center() - Vec2::new(0.0, 10.0));
            gfx.draw_text_centered(
                Vec2::new(rect.center().x, (rect.bottom() - 12) as f32),
                tool.label(),
                WHITE,
                2,
            );
        }

        gfx.fill_rounded_rect(CLEAR_BUTTON, 10, rgb(200, 70, 70));
        gfx.draw_text_centered(CLEAR_BUTTON.center(), "CLEAR", WHITE, 3);

        if self.items.len() >= MAX_ITEMS {
            gfx.draw_text_centered(Vec2::new(SCREEN_W as f32 / 2.0, 90.0), "GARDEN FULL!", rgb(200, 60, 60), 3);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{render, run_for, tap};

    fn screen() -> MagicGarden {
        let mut s = MagicGarden::with_rng(SmallRng::seed_from_u64(4));
        s.on_enter();
        s
    }

    fn pick(s: &mut MagicGarden, tool: Tool) {
        let i = Tool::ALL.iter().position(|t| *t == tool).unwrap();
        let at = s.toolbar.button_rect(i).center();
        tap(s, at);
        assert_eq!(s.tool(), tool);
    }

    fn bases(s: &MagicGarden) -> Vec<Circle> {
        s.items.iter().filter_map(GardenItem::footprint).collect()
    }

    #[test]
    fn toolbar_buttons_select_tools() {
        let mut s = screen();
        pick(&mut s, Tool::Bee);
        pick(&mut s, Tool::Tree);
        assert_eq!(s.item_count(), 0);
    }

    #[test]
    fn flowers_are_planted_on_the_grass() {
        let mut s = screen();
        tap(&mut s, Vec2::new(300.0, 200.0));
        assert_eq!(s.item_count(), 1);
        let base = bases(&s)[0].center;
        assert!(base.y >= GRASS_TOP as f32 + 10.0);
        assert_eq!(s.sparkles.len(), SPARKLES_PER_PLANT);
    }

    #[test]
    fn flyers_stay_where_tapped() {
        let mut s = screen();
        pick(&mut s, Tool::Butterfly);
        tap(&mut s, Vec2::new(300.0, 200.0));
        let Kind::Butterfly(b) = &s.items[0].kind else {
            panic!("expected a butterfly");
        };
        assert_eq!(b.home, Vec2::new(300.0, 200.0));
        assert!(bases(&s).is_empty());
    }

    #[test]
    fn repeated_taps_spread_flowers_apart() {
        let mut s = screen();
        let at = Vec2::new(360.0, 620.0);
        for _ in 0..4 {
            tap(&mut s, at);
        }
        let circles = bases(&s);
        assert_eq!(circles.len(), 4);
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                assert!(a.center.distance(b.center) >= a.radius + b.radius, "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn full_garden_refuses_new_planting() {
        let mut s = screen();
        pick(&mut s, Tool::Bee);
        for i in 0..MAX_ITEMS {
            tap(&mut s, Vec2::new(120.0 + i as f32 * 10.0, 300.0));
        }
        assert_eq!(s.item_count(), MAX_ITEMS);

        tap(&mut s, Vec2::new(600.0, 300.0));
        assert_eq!(s.item_count(), MAX_ITEMS);
        let homes: Vec<Vec2> = s
            .items
            .iter()
            .map(|it| match &it.kind {
                Kind::Bee(bee) => bee.home,
                _ => panic!("expected a bee"),
            })
            .collect();
        assert_eq!(homes[0], Vec2::new(120.0, 300.0));
        assert_eq!(homes[MAX_ITEMS - 1], Vec2::new(410.0, 300.0));
        let _ = render(&s);
    }

    #[test]
    fn clear_empties_the_garden() {
        let mut s = screen();
        tap(&mut s, Vec2::new(300.0, 600.0));
        tap(&mut s, CLEAR_BUTTON.center());
        assert_eq!(s.item_count(), 0);
        assert!(s.sparkles.is_empty());
    }

    #[test]
    fn plants_grow_to_full_size() {
        let mut s = screen();
        pick(&mut s, Tool::Tree);
        tap(&mut s, Vec2::new(300.0, 600.0));
        assert_eq!(s.items[0].progress(), 0.0);
        run_for(&mut s, 3.0);
        assert_eq!(s.items[0].progress(), 1.0);
        let _ = render(&s);
    }

    #[test]
    fn back_button_navigates_back() {
        let mut s = screen();
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Back);
    }
}
