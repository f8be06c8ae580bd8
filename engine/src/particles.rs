//! Bounded particle pools.
//!
//! [`ParticlePool`] is the struct-of-arrays layout for screens that keep thousands of particles
//! alive at once. [`SparkPool`] holds plain [`Spark`] values for the small bursts everywhere else.
//! Both refuse to grow past their capacity: `emit` returns `false` instead.

use crate::graphics::{Color, Renderer2d};
use crate::ui::{Rect, Vec2};

/// Fraction of the lifetime over which particles fade toward black.
pub const FADE_FRACTION: f32 = 0.3;

/// Scales RGB toward black over the last [`FADE_FRACTION`] of a particle's life. A particle
/// without a lifetime (`max_life <= 0`) is drawn unscaled.
pub fn faded_color(color: Color, life: f32, max_life: f32) -> Color {
    if max_life <= 0.0 {
        return color;
    }
    let frac = (life / max_life).clamp(0.0, 1.0);
    if frac >= FADE_FRACTION {
        return color;
    }
    let k = frac / FADE_FRACTION;
    [
        (color[0] as f32 * k) as u8,
        (color[1] as f32 * k) as u8,
        (color[2] as f32 * k) as u8,
        color[3],
    ]
}

/// Walls particles bounce off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Effectively unbounded; particles only die of old age.
    pub const UNBOUNDED: Bounds = Bounds::new(f32::MIN, f32::MIN, f32::MAX, f32::MAX);
}

pub struct ParticlePool {
    capacity: usize,
    count: usize,
    bounds: Bounds,
    damping: f32,

    x: Vec<f32>,
    y: Vec<f32>,
    vx: Vec<f32>,
    vy: Vec<f32>,
    life: Vec<f32>,
    max_life: Vec<f32>,
    r: Vec<u8>,
    g: Vec<u8>,
    b: Vec<u8>,
    size: Vec<u8>,
}

impl ParticlePool {
    pub fn new(capacity: usize, bounds: Bounds, damping: f32) -> Self {
        Self {
            capacity,
            count: 0,
            bounds,
            damping,
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            vx: vec![0.0; capacity],
            vy: vec![0.0; capacity],
            life: vec![0.0; capacity],
            max_life: vec![0.0; capacity],
            r: vec![0; capacity],
            g: vec![0; capacity],
            b: vec![0; capacity],
            size: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Adds one particle. Returns `false` (and does nothing) when the pool is full.
    pub fn emit(&mut self, pos: Vec2, vel: Vec2, color: Color, size: u8, lifetime: f32) -> bool {
        if self.count >= self.capacity {
            return false;
        }
        let i = self.count;
        self.x[i] = pos.x;
        self.y[i] = pos.y;
        self.vx[i] = vel.x;
        self.vy[i] = vel.y;
        self.life[i] = lifetime;
        self.max_life[i] = lifetime;
        self.r[i] = color[0];
        self.g[i] = color[1];
        self.b[i] = color[2];
        self.size[i] = size;
        self.count += 1;
        true
    }

    /// Drops every particle; storage is kept for reuse.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Lets callers push on live velocities (wind, swirl) before the next [`ParticlePool::update`].
    ///
    /// The closure receives position and a mutable velocity.
    pub fn apply_field(&mut self, mut field: impl FnMut(Vec2, &mut Vec2)) {
        for i in 0..self.count {
            let mut vel = Vec2::new(self.vx[i], self.vy[i]);
            field(Vec2::new(self.x[i], self.y[i]), &mut vel);
            self.vx[i] = vel.x;
            self.vy[i] = vel.y;
        }
    }

    pub fn update(&mut self, dt: f32, gravity: f32) {
        let Bounds {
            left,
            top,
            right,
            bottom,
        } = self.bounds;
        let damping = self.damping;

        let mut i = 0;
        while i < self.count {
            self.life[i] -= dt;
            if self.life[i] <= 0.0 {
                self.swap_remove(i);
                continue;
            }

            self.vy[i] += gravity * dt;
            self.x[i] += self.vx[i] * dt;
            self.y[i] += self.vy[i] * dt;

            if self.x[i] < left {
                self.x[i] = left;
                self.vx[i] = -self.vx[i] * damping;
            } else if self.x[i] > right {
                self.x[i] = right;
                self.vx[i] = -self.vx[i] * damping;
            }
            if self.y[i] < top {
                self.y[i] = top;
                self.vy[i] = -self.vy[i] * damping;
            } else if self.y[i] > bottom {
                self.y[i] = bottom;
                self.vy[i] = -self.vy[i] * damping;
            }

            i += 1;
        }
    }

    fn swap_remove(&mut self, i: usize) {
        let last = self.count - 1;
        if i != last {
            self.x[i] = self.x[last];
            self.y[i] = self.y[last];
            self.vx[i] = self.vx[last];
            self.vy[i] = self.vy[last];
            self.life[i] = self.life[last];
            self.max_life[i] = self.max_life[last];
            self.r[i] = self.r[last];
            self.g[i] = self.g[last];
            self.b[i] = self.b[last];
            self.size[i] = self.size[last];
        }
        self.count = last;
    }

    pub fn position(&self, i: usize) -> Option<Vec2> {
        (i < self.count).then(|| Vec2::new(self.x[i], self.y[i]))
    }

    pub fn velocity(&self, i: usize) -> Option<Vec2> {
        (i < self.count).then(|| Vec2::new(self.vx[i], self.vy[i]))
    }

    pub fn life(&self, i: usize) -> Option<f32> {
        (i < self.count).then(|| self.life[i])
    }

    pub fn draw(&self, gfx: &mut dyn Renderer2d) {
        for i in 0..self.count {
            let color = faded_color(
                [self.r[i], self.g[i], self.b[i], 255],
                self.life[i],
                self.max_life[i],
            );
            let s = self.size[i] as i32;
            // (x, y) is the top-left corner.
            gfx.fill_rect(Rect::new(self.x[i] as i32, self.y[i] as i32, s, s), color);
        }
    }
}

/// A small, self-contained effect particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub radius: f32,
    pub life: f32,
    pub max_life: f32,
    /// Downward acceleration in px/s².
    pub gravity: f32,
    /// Per-second velocity multiplier; `1.0` means no drag.
    pub drag: f32,
}

impl Spark {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, radius: f32, life: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            radius,
            life,
            max_life: life,
            gravity: 0.0,
            drag: 1.0,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Remaining life as `0..=1`.
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }
}

pub struct SparkPool {
    sparks: Vec<Spark>,
    capacity: usize,
}

impl SparkPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            sparks: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn emit(&mut self, spark: Spark) -> bool {
        if self.sparks.len() >= self.capacity {
            return false;
        }
        self.sparks.push(spark);
        true
    }

    pub fn clear(&mut self) {
        self.sparks.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spark> {
        self.sparks.iter()
    }

    pub fn update(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.sparks.len() {
            let s = &mut self.sparks[i];
            s.life -= dt;
            if s.life <= 0.0 {
                self.sparks.swap_remove(i);
                continue;
            }
            s.pos += s.vel * dt;
            s.vel.y += s.gravity * dt;
            if s.drag != 1.0 {
                s.vel = s.vel * s.drag.powf(dt);
            }
            i += 1;
        }
    }

    /// Circles that shrink with remaining life.
    pub fn draw(&self, gfx: &mut dyn Renderer2d) {
        for s in &self.sparks {
            let r = (s.radius * s.alpha()).max(1.0);
            gfx.fill_circle(s.pos, r, s.color);
        }
    }
}
