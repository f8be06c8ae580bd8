//! Drag-and-snap board: pick items up, drop them near their target, celebrate, repeat.

use crate::input::PointerEvent;
use crate::ui::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct DraggableItem<T> {
    pub data: T,
    pub pos: Vec2,
    pub home: Vec2,
    pub target: Vec2,
    pub placed: bool,
    /// Seconds since the item snapped, while the snap animation runs.
    snap_elapsed: Option<f32>,
}

impl<T> DraggableItem<T> {
    pub fn new(data: T, home: Vec2, target: Vec2) -> Self {
        Self {
            data,
            pos: home,
            home,
            target,
            placed: false,
            snap_elapsed: None,
        }
    }

    pub fn is_snapping(&self) -> bool {
        self.snap_elapsed.is_some()
    }

    /// Draw scale: a quick overshoot pop while snapping, `1.0` otherwise.
    pub fn scale(&self, snap_secs: f32) -> f32 {
        match self.snap_elapsed {
            Some(t) if snap_secs > 0.0 => {
                let p = (t / snap_secs).clamp(0.0, 1.0);
                1.0 + 0.25 * (p * std::f32::consts::PI).sin()
            }
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTuning {
    /// Pickup radius around an item's center.
    pub hit_radius: f32,
    /// Drops closer than this to the target snap.
    pub snap_distance: f32,
    pub snap_secs: f32,
    pub celebrate_secs: f32,
}

impl Default for DragTuning {
    fn default() -> Self {
        Self {
            hit_radius: 80.0,
            snap_distance: 55.0,
            snap_secs: 0.3,
            celebrate_secs: 2.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropOutcome {
    Snapped { target: Vec2, completed: bool },
    Released { at: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardTick {
    Running,
    Celebrating,
    /// The celebration just ended; the caller should deal a fresh round.
    RoundOver,
}

#[derive(Debug, Clone)]
pub struct DragBoard<T> {
    items: Vec<DraggableItem<T>>,
    tuning: DragTuning,
    dragging: Option<usize>,
    grab_offset: Vec2,
    celebrating: Option<f32>,
}

impl<T> DragBoard<T> {
    pub fn new(items: Vec<DraggableItem<T>>, tuning: DragTuning) -> Self {
        Self {
            items,
            tuning,
            dragging: None,
            grab_offset: Vec2::ZERO,
            celebrating: None,
        }
    }

    pub fn tuning(&self) -> DragTuning {
        self.tuning
    }

    /// Items in draw order (last is on top).
    pub fn items(&self) -> &[DraggableItem<T>] {
        &self.items
    }

    pub fn dragging(&self) -> Option<&DraggableItem<T>> {
        self.dragging.and_then(|i| self.items.get(i))
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating.is_some()
    }

    /// Remaining celebration time, if any.
    pub fn celebration_left(&self) -> Option<f32> {
        self.celebrating
    }

    pub fn all_placed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|it| it.placed)
    }

    /// Replaces the round: new items, no drag, no celebration.
    pub fn reset(&mut self, items: Vec<DraggableItem<T>>) {
        self.items = items;
        self.dragging = None;
        self.grab_offset = Vec2::ZERO;
        self.celebrating = None;
    }

    pub fn handle_event(&mut self, event: &PointerEvent) -> Option<DropOutcome> {
        if self.celebrating.is_some() {
            return None;
        }
        match *event {
            PointerEvent::Down(p) => {
                self.pointer_down(p);
                None
            }
            PointerEvent::Move(p) => {
                self.pointer_move(p);
                None
            }
            PointerEvent::Up(_) => self.pointer_up(),
        }
    }

    /// Picks up the topmost unplaced item under `p`. Returns whether one was grabbed.
    pub fn pointer_down(&mut self, p: Vec2) -> bool {
        if self.celebrating.is_some() {
            return false;
        }
        let hit = self
            .items
            .iter()
            .rposition(|it| !it.placed && it.pos.distance(p) <= self.tuning.hit_radius);
        let Some(idx) = hit else {
            return false;
        };

        let item = self.items.remove(idx);
        self.grab_offset = item.pos - p;
        self.items.push(item);
        self.dragging = Some(self.items.len() - 1);
        true
    }

    pub fn pointer_move(&mut self, p: Vec2) {
        if let Some(item) = self.dragging.and_then(|i| self.items.get_mut(i)) {
            item.pos = p + self.grab_offset;
        }
    }

    pub fn pointer_up(&mut self) -> Option<DropOutcome> {
        let idx = self.dragging.take()?;
        let snap_distance = self.tuning.snap_distance;
        let item = self.items.get_mut(idx)?;

        if item.pos.distance(item.target) < snap_distance {
            item.pos = item.target;
            item.placed = true;
            item.snap_elapsed = Some(0.0);
            let target = item.target;
            let completed = self.all_placed();
            if completed {
                self.celebrating = Some(self.tuning.celebrate_secs);
            }
            Some(DropOutcome::Snapped { target, completed })
        } else {
            Some(DropOutcome::Released { at: item.pos })
        }
    }

    pub fn update(&mut self, dt: f32) -> BoardTick {
        let snap_secs = self.tuning.snap_secs;
        for item in &mut self.items {
            if let Some(t) = item.snap_elapsed.as_mut() {
                *t += dt;
                if *t >= snap_secs {
                    item.snap_elapsed = None;
                }
            }
        }

        match self.celebrating.as_mut() {
            None => BoardTick::Running,
            Some(left) => {
                *left -= dt;
                if *left <= 0.0 {
                    self.celebrating = None;
                    BoardTick::RoundOver
                } else {
                    BoardTick::Celebrating
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> DragBoard<&'static str> {
        DragBoard::new(
            vec![
                DraggableItem::new("circle", Vec2::new(100.0, 100.0), Vec2::new(100.0, 500.0)),
                DraggableItem::new("square", Vec2::new(300.0, 100.0), Vec2::new(300.0, 500.0)),
            ],
            DragTuning::default(),
        )
    }

    fn drag(b: &mut DragBoard<&'static str>, from: Vec2, to: Vec2) -> Option<DropOutcome> {
        b.handle_event(&PointerEvent::Down(from));
        b.handle_event(&PointerEvent::Move(to));
        b.handle_event(&PointerEvent::Up(to))
    }

    #[test]
    fn pickup_keeps_grab_offset() {
        let mut b = board();
        assert!(b.pointer_down(Vec2::new(110.0, 90.0)));
        b.pointer_move(Vec2::new(210.0, 190.0));
        assert_eq!(b.dragging().map(|it| it.pos), Some(Vec2::new(200.0, 200.0)));
    }

    #[test]
    fn grabbed_item_moves_to_top() {
        let mut b = board();
        assert!(b.pointer_down(Vec2::new(100.0, 100.0)));
        assert_eq!(b.items().last().map(|it| it.data), Some("circle"));
    }

    #[test]
    fn miss_does_not_grab() {
        let mut b = board();
        assert!(!b.pointer_down(Vec2::new(600.0, 600.0)));
        assert_eq!(b.pointer_up(), None);
    }

    #[test]
    fn release_near_target_snaps_exactly() {
        let mut b = board();
        let out = drag(&mut b, Vec2::new(100.0, 100.0), Vec2::new(130.0, 470.0));
        assert_eq!(
            out,
            Some(DropOutcome::Snapped {
                target: Vec2::new(100.0, 500.0),
                completed: false
            })
        );
        let circle = b.items().iter().find(|it| it.data == "circle").unwrap();
        assert!(circle.placed);
        assert_eq!(circle.pos, circle.target);
        assert!(circle.is_snapping());
    }

    #[test]
    fn release_far_from_target_stays_where_dropped() {
        let mut b = board();
        let out = drag(&mut b, Vec2::new(100.0, 100.0), Vec2::new(400.0, 300.0));
        assert_eq!(
            out,
            Some(DropOutcome::Released {
                at: Vec2::new(400.0, 300.0)
            })
        );
        let circle = b.items().iter().find(|it| it.data == "circle").unwrap();
        assert!(!circle.placed);
        assert_eq!(circle.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn placed_items_cannot_be_picked_up() {
        let mut b = board();
        drag(&mut b, Vec2::new(100.0, 100.0), Vec2::new(100.0, 500.0));
        assert!(!b.pointer_down(Vec2::new(100.0, 500.0)));
    }

    #[test]
    fn completing_the_set_celebrates_then_asks_for_a_new_round() {
        let mut b = board();
        drag(&mut b, Vec2::new(100.0, 100.0), Vec2::new(100.0, 500.0));
        let out = drag(&mut b, Vec2::new(300.0, 100.0), Vec2::new(300.0, 500.0));
        assert!(matches!(
            out,
            Some(DropOutcome::Snapped {
                completed: true,
                ..
            })
        ));
        assert!(b.is_celebrating());

        // Input is ignored while celebrating.
        assert_eq!(b.handle_event(&PointerEvent::Down(Vec2::new(100.0, 500.0))), None);

        assert_eq!(b.update(1.0), BoardTick::Celebrating);
        assert_eq!(b.update(1.5), BoardTick::RoundOver);
        assert!(!b.is_celebrating());
    }

    #[test]
    fn snap_animation_ends_after_its_duration() {
        let mut b = board();
        drag(&mut b, Vec2::new(100.0, 100.0), Vec2::new(100.0, 500.0));
        let snap_secs = b.tuning().snap_secs;
        b.update(0.15);
        let circle = b.items().iter().find(|it| it.data == "circle").unwrap();
        assert!(circle.scale(snap_secs) > 1.0);
        b.update(0.2);
        let circle = b.items().iter().find(|it| it.data == "circle").unwrap();
        assert!(!circle.is_snapping());
        assert_eq!(circle.scale(snap_secs), 1.0);
    }
}
