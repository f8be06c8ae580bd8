use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::particles::{Bounds, ParticlePool};
use engine::screen::{Nav, Screen};
use engine::toolbar::{ScrollToolbar, ToolbarLayout, ToolbarTuning};
use engine::ui::{Rect, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::screens::gauss;
use crate::widgets::{self, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

pub const MAX_PARTICLES: usize = 2500;
const TOOLBAR_H: f32 = 80.0;
const GRAVITY: f32 = 400.0;
const BOUNCE_DAMPING: f32 = 0.6;
const LIFETIME: f32 = 4.0;
const BG: Color = rgb(10, 10, 18);

const FOUNTAIN_RATE: f32 = 120.0;
const RAIN_RATE: f32 = 200.0;
const SWIRL_RATE: f32 = 80.0;
const BOOM_COUNT: usize = 150;
/// Wind only reaches particles within this distance of the finger.
const WIND_RADIUS: f32 = 300.0;

const DOT_R: f32 = 20.0;
const DOT_STEP: f32 = 48.0;
const DOTS_X: f32 = SCREEN_W as f32 - 4.0 * DOT_STEP + DOT_R - 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    Fountain,
    Rain,
    Swirl,
    Boom,
}

impl EmitMode {
    pub const ALL: [EmitMode; 4] = [EmitMode::Fountain, EmitMode::Rain, EmitMode::Swirl, EmitMode::Boom];

    fn label(self) -> &'static str {
        match self {
            EmitMode::Fountain => "FOUNTAIN",
            EmitMode::Rain => "RAIN",
            EmitMode::Swirl => "SWIRL",
            EmitMode::Boom => "BOOM",
        }
    }

    fn color(self) -> Color {
        match self {
            EmitMode::Fountain => rgb(80, 180, 255),
            EmitMode::Rain => rgb(100, 200, 120),
            EmitMode::Swirl => rgb(200, 130, 255),
            EmitMode::Boom => rgb(255, 120, 80),
        }
    }

    fn gravity(self) -> f32 {
        match self {
            EmitMode::Swirl => GRAVITY * 0.15,
            _ => GRAVITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Rainbow,
    Fire,
    Ice,
    Neon,
}

impl Palette {
    pub const ALL: [Palette; 4] = [Palette::Rainbow, Palette::Fire, Palette::Ice, Palette::Neon];

    /// A particle color; `hue` (in turns) only matters for the rainbow, which drifts with time.
    pub fn pick(self, rng: &mut SmallRng, hue: f32) -> Color {
        match self {
            Palette::Rainbow => widgets::hsv_to_rgb((hue + rng.gen_range(0.0..1.0 / 6.0)).fract(), 1.0, 1.0),
            Palette::Fire => widgets::hsv_to_rgb(rng.gen_range(0.0..50.0 / 360.0), 1.0, rng.gen_range(0.8..1.0)),
            Palette::Ice => widgets::hsv_to_rgb(rng.gen_range(0.5..220.0 / 360.0), rng.gen_range(0.3..0.9), 1.0),
            Palette::Neon => match rng.gen_range(0..3) {
                0 => rgb(255, rng.gen_range(30..=80), rng.gen_range(180..=240)),
                1 => rgb(rng.gen_range(30..=80), 255, rng.gen_range(80..=140)),
                _ => rgb(rng.gen_range(150..=200), rng.gen_range(30..=80), 255),
            },
        }
    }

    fn preview(self) -> &'static [Color] {
        const RAINBOW: [Color; 4] = [rgb(255, 0, 0), rgb(255, 200, 0), rgb(0, 255, 0), rgb(0, 100, 255)];
        const FIRE: [Color; 3] = [rgb(255, 60, 0), rgb(255, 140, 0), rgb(255, 220, 50)];
        const ICE: [Color; 3] = [rgb(100, 180, 255), rgb(0, 255, 255), rgb(220, 240, 255)];
        const NEON: [Color; 3] = [rgb(255, 50, 200), rgb(50, 255, 100), rgb(180, 50, 255)];
        match self {
            Palette::Rainbow => &RAINBOW,
            Palette::Fire => &FIRE,
            Palette::Ice => &ICE,
            Palette::Neon => &NEON,
        }
    }
}

fn dot_center(i: usize) -> Vec2 {
    Vec2::new(DOTS_X + i as f32 * DOT_STEP, TOOLBAR_H / 2.0)
}

fn toolbar_layout() -> ToolbarLayout {
    ToolbarLayout {
        left_x: 110.0,
        right_x: DOTS_X - DOT_R - 10.0,
        y: (TOOLBAR_H - 56.0) / 2.0,
        height: 56.0,
        btn_width: 120.0,
        btn_gap: 8.0,
        btn_count: EmitMode::ALL.len(),
    }
}

pub struct ParticlePlayground {
    rng: SmallRng,
    pool: ParticlePool,
    toolbar: ScrollToolbar,
    mode: EmitMode,
    palette: Palette,
    /// Rainbow drift, in turns.
    hue: f32,
    touch: Option<Vec2>,
    /// Fractional particles carried between frames for the steady emitters.
    owed: f32,
}

impl ParticlePlayground {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    pub fn with_rng(rng: SmallRng) -> Self {
        let bounds = Bounds::new(0.0, TOOLBAR_H, SCREEN_W as f32 - 1.0, SCREEN_H as f32 - 1.0);
        Self {
            rng,
            pool: ParticlePool::new(MAX_PARTICLES, bounds, BOUNCE_DAMPING),
            toolbar: ScrollToolbar::new(toolbar_layout(), ToolbarTuning::default()),
            mode: EmitMode::Fountain,
            palette: Palette::Rainbow,
            hue: 0.0,
            touch: None,
            owed: 0.0,
        }
    }

    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn particle_count(&self) -> usize {
        self.pool.len()
    }

    fn color(&mut self) -> Color {
        self.palette.pick(&mut self.rng, self.hue)
    }

    /// How many particles a steady emitter owes this frame at `rate` per second.
    fn due(&mut self, rate: f32, dt: f32) -> usize {
        self.owed += rate * dt;
        let n = self.owed.floor();
        self.owed -= n;
        n as usize
    }

    fn emit_fountain(&mut self, at: Vec2, dt: f32) {
        for _ in 0..self.due(FOUNTAIN_RATE, dt) {
            let angle = -std::f32::consts::FRAC_PI_2 + gauss(&mut self.rng, 0.0, 0.4);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(150.0..350.0));
            let pos = at + Vec2::new(self.rng.gen_range(-3.0..3.0), 0.0);
            let color = self.color();
            let size = if self.rng.gen_range(0..4) == 0 { 3 } else { 2 };
            let life = self.rng.gen_range(2.0..LIFETIME);
            if !self.pool.emit(pos, vel, color, size, life) {
                break;
            }
        }
    }

    fn emit_rain(&mut self, dt: f32) {
        for _ in 0..self.due(RAIN_RATE, dt) {
            let pos = Vec2::new(self.rng.gen_range(0.0..SCREEN_W as f32), TOOLBAR_H);
            let vel = Vec2::new(self.rng.gen_range(-20.0..20.0), self.rng.gen_range(80.0..200.0));
            let color = self.color();
            let size = if self.rng.gen_range(0..3) == 0 { 1 } else { 2 };
            let life = self.rng.gen_range(3.0..5.0);
            if !self.pool.emit(pos, vel, color, size, life) {
                break;
            }
        }
    }

    fn emit_swirl(&mut self, at: Vec2, dt: f32) {
        for _ in 0..self.due(SWIRL_RATE, dt) {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let pos = at + Vec2::from_angle(angle, self.rng.gen_range(5.0..40.0));
            let vel = Vec2::from_angle(angle + std::f32::consts::FRAC_PI_2, self.rng.gen_range(100.0..250.0));
            let color = self.color();
            let size = if self.rng.gen_range(0..3) == 0 { 3 } else { 2 };
            let life = self.rng.gen_range(2.5..LIFETIME);
            if !self.pool.emit(pos, vel, color, size, life) {
                break;
            }
        }
    }

    fn emit_boom(&mut self, at: Vec2) {
        for _ in 0..BOOM_COUNT {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let vel = Vec2::from_angle(angle, self.rng.gen_range(100.0..500.0));
            let color = self.color();
            let size = [2, 3, 3, 4][self.rng.gen_range(0..4)];
            let life = self.rng.gen_range(1.5..3.5);
            if !self.pool.emit(at, vel, color, size, life) {
                break;
            }
        }
    }

    /// Pulls particles toward `at` while spinning them around it.
    fn swirl_field(&mut self, at: Vec2, dt: f32) {
        let attract = 600.0 * dt;
        let tangent = 400.0 * dt;
        self.pool.apply_field(|pos, vel| {
            let d = at - pos;
            let len = d.length();
            if len < 1.0 {
                return;
            }
            let n = d * (1.0 / len);
            *vel += n * attract + Vec2::new(-n.y, n.x) * tangent;
            *vel = *vel * 0.98;
        });
    }

    /// Blows particles away from `at`.
    fn wind_field(&mut self, at: Vec2, dt: f32) {
        let strength = 80_000.0 * dt;
        self.pool.apply_field(|pos, vel| {
            let d = pos - at;
            let dist_sq = d.x * d.x + d.y * d.y + 100.0;
            if dist_sq > WIND_RADIUS * WIND_RADIUS {
                return;
            }
            let force = strength / dist_sq;
            *vel += d * (force / dist_sq.sqrt());
        });
    }

    fn select_mode(&mut self, mode: EmitMode) {
        if self.mode != mode {
            tracing::debug!(?mode, "particle mode");
        }
        self.mode = mode;
        self.owed = 0.0;
    }
}

impl Default for ParticlePlayground {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<ScreenId> for ParticlePlayground {
    fn on_enter(&mut self) {
        self.pool.clear();
        self.hue = 0.0;
        self.touch = None;
        self.owed = 0.0;
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if self.toolbar.handle_event(event) {
            if let PointerEvent::Up(p) = *event {
                if let Some(i) = self.toolbar.button_at(p) {
                    self.select_mode(EmitMode::ALL[i]);
                }
            }
            return Nav::Stay;
        }

        match *event {
            PointerEvent::Down(p) => {
                if widgets::back_button_hit(p) {
                    return Nav::Back;
                }
                if let Some(i) = (0..Palette::ALL.len()).find(|&i| dot_center(i).distance(p) <= DOT_R) {
                    self.palette = Palette::ALL[i];
                    return Nav::Stay;
                }
                if p.y > TOOLBAR_H {
                    self.touch = Some(p);
                    if self.mode == EmitMode::Boom {
                        self.emit_boom(p);
                    }
                }
            }
            PointerEvent::Move(p) => {
                if self.touch.is_some() {
                    self.touch = Some(Vec2::new(p.x, p.y.max(TOOLBAR_H)));
                }
            }
            PointerEvent::Up(_) => self.touch = None,
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.hue = (self.hue + dt * 0.25).fract();

        match (self.mode, self.touch) {
            (EmitMode::Fountain, Some(at)) => self.emit_fountain(at, dt),
            (EmitMode::Rain, _) => self.emit_rain(dt),
            (EmitMode::Swirl, Some(at)) => self.emit_swirl(at, dt),
            _ => {}
        }

        self.toolbar.update(dt);
        self.pool.update(dt, self.mode.gravity());

        match (self.mode, self.touch) {
            (EmitMode::Swirl, Some(at)) => self.swirl_field(at, dt),
            (EmitMode::Rain, Some(at)) => self.wind_field(at, dt),
            _ => {}
        }
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(BG);
        self.pool.draw(gfx);

        gfx.fill_rect(Rect::new(0, 0, SCREEN_W, TOOLBAR_H as i32), rgb(20, 20, 30));
        gfx.fill_rect(Rect::new(0, TOOLBAR_H as i32 - 1, SCREEN_W, 2), rgb(50, 50, 70));

        for (i, rect) in self.toolbar.visible_buttons() {
            let mode = EmitMode::ALL[i];
            let selected = mode == self.mode;
            let band = self.toolbar.band();
            let clipped = rect.intersect(band);
            if clipped.is_empty() {
                continue;
            }
            let fill = if selected { mode.color() } else { rgb(60, 60, 70) };
            gfx.fill_rounded_rect(clipped, 10, fill);
            if selected {
                gfx.rect_outline(clipped, 2, WHITE);
            }
            if band.contains(rect.center()) {
                let text = if selected { WHITE } else { rgb(150, 150, 150) };
                gfx.draw_text_centered(rect.center(), mode.label(), text, 3);
            }
        }
        let (more_left, more_right) = self.toolbar.overflow();
        let band = self.toolbar.band();
        let mid = band.center().y;
        if more_left {
            gfx.fill_triangle(
                Vec2::new(band.x as f32 + 2.0, mid),
                Vec2::new(band.x as f32 + 10.0, mid - 8.0),
                Vec2::new(band.x as f32 + 10.0, mid + 8.0),
                WHITE,
            );
        }
        if more_right {
            let r = band.right() as f32;
            gfx.fill_triangle(
                Vec2::new(r - 2.0, mid),
                Vec2::new(r - 10.0, mid - 8.0),
                Vec2::new(r - 10.0, mid + 8.0),
                WHITE,
            );
        }

        for (i, palette) in Palette::ALL.iter().enumerate() {
            let c = dot_center(i);
            let colors = palette.preview();
            gfx.fill_circle(c, DOT_R, colors[0]);
            gfx.fill_circle(c + Vec2::new(-3.0, 3.0), DOT_R / 2.0 + 1.0, colors[1]);
            if let Some(third) = colors.get(2) {
                gfx.fill_circle(c + Vec2::new(3.0, -3.0), DOT_R / 2.0, *third);
            }
            if *palette == self.palette {
                gfx.circle_outline(c, DOT_R + 3.0, 2.0, WHITE);
            }
        }

        let count = self.pool.len().to_string();
        let w = engine::graphics::text_width(&count, 2);
        gfx.draw_text_scaled(SCREEN_W - w - 10, TOOLBAR_H as i32 + 8, &count, rgb(80, 80, 100), 2);

        widgets::back_button(gfx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{render, run_for, tap};

    fn screen() -> ParticlePlayground {
        let mut s = ParticlePlayground::with_rng(SmallRng::seed_from_u64(12));
        s.on_enter();
        s
    }

    fn pick_mode(s: &mut ParticlePlayground, mode: EmitMode) {
        let i = EmitMode::ALL.iter().position(|m| *m == mode).unwrap();
        let band = s.toolbar.band();
        let center = s.toolbar.button_rect(i).center();
        if !band.contains(center) {
            // Fling the strip all the way toward the hidden button.
            let (l, r) = (band.x as f32 + 5.0, band.right() as f32 - 5.0);
            let (from, to) = if center.x < band.x as f32 { (l, r) } else { (r, l) };
            let y = center.y;
            s.handle_event(&PointerEvent::Down(Vec2::new(from, y)));
            s.handle_event(&PointerEvent::Move(Vec2::new(to, y)));
            s.handle_event(&PointerEvent::Up(Vec2::new(to, y)));
        }
        let at = s.toolbar.button_rect(i).center();
        tap(s, at);
        assert_eq!(s.mode(), mode);
    }

    fn hold(s: &mut ParticlePlayground, at: Vec2, secs: f32) {
        s.handle_event(&PointerEvent::Down(at));
        run_for(s, secs);
        s.handle_event(&PointerEvent::Up(at));
    }

    #[test]
    fn toolbar_overflows_and_scrolls_to_every_mode() {
        let mut s = screen();
        assert!(s.toolbar.max_scroll() > 0.0);
        pick_mode(&mut s, EmitMode::Boom);
        pick_mode(&mut s, EmitMode::Fountain);
    }

    #[test]
    fn palette_dots_switch_palettes() {
        let mut s = screen();
        tap(&mut s, dot_center(2));
        assert_eq!(s.palette(), Palette::Ice);
        assert_eq!(s.particle_count(), 0);
    }

    #[test]
    fn fountain_emits_only_while_held() {
        let mut s = screen();
        hold(&mut s, Vec2::new(360.0, 600.0), 1.0);
        let n = s.particle_count();
        assert!((110..=130).contains(&n), "{n}");
        run_for(&mut s, 0.5);
        assert_eq!(s.particle_count(), n);
    }

    #[test]
    fn rain_falls_without_a_finger() {
        let mut s = screen();
        pick_mode(&mut s, EmitMode::Rain);
        run_for(&mut s, 1.0);
        let n = s.particle_count();
        assert!((190..=210).contains(&n), "{n}");
    }

    #[test]
    fn boom_bursts_on_tap_and_the_pool_caps() {
        let mut s = screen();
        pick_mode(&mut s, EmitMode::Boom);
        tap(&mut s, Vec2::new(360.0, 400.0));
        assert_eq!(s.particle_count(), BOOM_COUNT);
        for _ in 0..20 {
            tap(&mut s, Vec2::new(360.0, 400.0));
        }
        assert_eq!(s.particle_count(), MAX_PARTICLES);
    }

    #[test]
    fn particles_stay_below_the_toolbar() {
        let mut s = screen();
        pick_mode(&mut s, EmitMode::Boom);
        tap(&mut s, Vec2::new(100.0, 100.0));
        for _ in 0..30 {
            s.update(1.0 / 60.0);
            for i in 0..s.particle_count() {
                let p = s.pool.position(i).unwrap();
                assert!(p.y >= TOOLBAR_H && p.y <= SCREEN_H as f32 - 1.0, "{p:?}");
                assert!(p.x >= 0.0 && p.x <= SCREEN_W as f32 - 1.0, "{p:?}");
            }
        }
    }

    #[test]
    fn wind_pushes_away_from_the_finger() {
        let mut s = screen();
        pick_mode(&mut s, EmitMode::Rain);
        s.on_enter();
        s.pool.emit(Vec2::new(300.0, 400.0), Vec2::ZERO, WHITE, 2, 10.0);
        s.touch = Some(Vec2::new(320.0, 400.0));
        s.wind_field(Vec2::new(320.0, 400.0), 1.0 / 60.0);
        assert!(s.pool.velocity(0).unwrap().x < 0.0);
    }

    #[test]
    fn swirl_pulls_toward_the_finger() {
        let mut s = screen();
        s.pool.emit(Vec2::new(500.0, 400.0), Vec2::ZERO, WHITE, 2, 10.0);
        s.swirl_field(Vec2::new(300.0, 400.0), 1.0 / 60.0);
        let v = s.pool.velocity(0).unwrap();
        assert!(v.x < 0.0);
    }

    #[test]
    fn palettes_produce_their_hues() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..50 {
            let fire = Palette::Fire.pick(&mut rng, 0.0);
            assert!(fire[0] >= fire[2], "{fire:?}");
            let ice = Palette::Ice.pick(&mut rng, 0.0);
            assert!(ice[2] >= ice[0], "{ice:?}");
        }
        let _ = render(&screen());
    }

    #[test]
    fn back_button_navigates_back() {
        let mut s = screen();
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Back);
    }
}
