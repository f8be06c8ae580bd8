//! Collision-avoidant random placement of circular items.

use rand::Rng;

use crate::ui::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned area new items must fit inside (edges, not centers).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub min: Vec2,
    pub max: Vec2,
}

impl Region {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementParams {
    /// Candidate budget; after this many the last candidate is accepted.
    pub attempts: u32,
    /// Extra distance kept from the region edges, on top of the radius.
    pub margin: f32,
    /// Extra gap required between neighbouring circles.
    pub buffer: f32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            attempts: 50,
            margin: 10.0,
            buffer: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub center: Vec2,
    pub attempts: u32,
    /// True when the budget ran out and `center` still overlaps something.
    pub overlapping: bool,
}

/// Rejection-samples a center for a circle of `radius` that keeps clear of `existing`.
///
/// Always terminates: when no clear spot turns up within `params.attempts` candidates the last
/// one is returned with `overlapping` set.
pub fn place_circle<R: Rng>(
    rng: &mut R,
    region: Region,
    radius: f32,
    existing: &[Circle],
    params: PlacementParams,
) -> Placement {
    let inset = radius + params.margin;
    let (x_lo, x_hi) = axis_range(region.min.x + inset, region.max.x - inset);
    let (y_lo, y_hi) = axis_range(region.min.y + inset, region.max.y - inset);

    let attempts = params.attempts.max(1);
    let mut candidate = Vec2::new(x_lo, y_lo);
    for attempt in 1..=attempts {
        candidate = Vec2::new(sample(rng, x_lo, x_hi), sample(rng, y_lo, y_hi));
        let clear = existing
            .iter()
            .all(|c| candidate.distance(c.center) >= radius + c.radius + params.buffer);
        if clear {
            return Placement {
                center: candidate,
                attempts: attempt,
                overlapping: false,
            };
        }
    }

    tracing::trace!(attempts, radius, "placement budget exhausted, accepting overlap");
    Placement {
        center: candidate,
        attempts,
        overlapping: true,
    }
}

/// Collapses an inverted range to its midpoint so tiny regions never panic.
fn axis_range(lo: f32, hi: f32) -> (f32, f32) {
    if lo <= hi {
        (lo, hi)
    } else {
        let mid = (lo + hi) / 2.0;
        (mid, mid)
    }
}

fn sample<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}
