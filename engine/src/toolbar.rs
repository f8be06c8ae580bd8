//! Horizontal button strip that scrolls by drag, keeps momentum after a fling, and only
//! activates buttons on taps.

use crate::input::PointerEvent;
use crate::ui::{Rect, Vec2};

/// Feel constants. Tuned by hand; none of them come from a physical model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarTuning {
    /// Horizontal travel (px) after which a press becomes a drag.
    pub drag_threshold: f32,
    /// Velocity multiplier per 60 Hz frame while coasting.
    pub friction: f32,
    /// Coasting stops below this speed (px per 60 Hz frame).
    pub min_velocity: f32,
}

impl Default for ToolbarTuning {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            friction: 0.92,
            min_velocity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarLayout {
    /// Left edge of the strip (space to the left belongs to the back button).
    pub left_x: f32,
    /// Right edge of the visible strip.
    pub right_x: f32,
    pub y: f32,
    pub height: f32,
    pub btn_width: f32,
    pub btn_gap: f32,
    pub btn_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Session {
    start_x: f32,
    start_scroll: f32,
    last_x: f32,
}

#[derive(Debug, Clone)]
pub struct ScrollToolbar {
    layout: ToolbarLayout,
    tuning: ToolbarTuning,
    scroll_x: f32,
    velocity: f32,
    session: Option<Session>,
    was_drag: bool,
}

impl ScrollToolbar {
    pub fn new(layout: ToolbarLayout, tuning: ToolbarTuning) -> Self {
        Self {
            layout,
            tuning,
            scroll_x: 0.0,
            velocity: 0.0,
            session: None,
            was_drag: false,
        }
    }

    pub fn layout(&self) -> &ToolbarLayout {
        &self.layout
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn was_drag(&self) -> bool {
        self.was_drag
    }

    pub fn content_width(&self) -> f32 {
        let l = &self.layout;
        let n = l.btn_count as f32;
        if l.btn_count == 0 {
            0.0
        } else {
            n * l.btn_width + (n - 1.0) * l.btn_gap
        }
    }

    pub fn visible_width(&self) -> f32 {
        (self.layout.right_x - self.layout.left_x).max(0.0)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.content_width() - self.visible_width()).max(0.0)
    }

    pub fn band(&self) -> Rect {
        let l = &self.layout;
        Rect::new(
            l.left_x as i32,
            l.y as i32,
            self.visible_width() as i32,
            l.height as i32,
        )
    }

    pub fn in_band(&self, p: Vec2) -> bool {
        let l = &self.layout;
        p.x >= l.left_x && p.x < l.right_x && p.y >= l.y && p.y < l.y + l.height
    }

    /// On-screen rect of button `index` at the current scroll offset.
    pub fn button_rect(&self, index: usize) -> Rect {
        let l = &self.layout;
        let x = l.left_x + index as f32 * (l.btn_width + l.btn_gap) - self.scroll_x;
        Rect::new(
            x.round() as i32,
            l.y as i32,
            l.btn_width as i32,
            l.height as i32,
        )
    }

    /// Buttons intersecting the visible strip, with their rects.
    pub fn visible_buttons(&self) -> impl Iterator<Item = (usize, Rect)> + '_ {
        let band = self.band();
        (0..self.layout.btn_count)
            .map(|i| (i, self.button_rect(i)))
            .filter(move |(_, r)| r.right() > band.x && r.x < band.right())
    }

    /// Button under `p`, unless the last gesture was a drag.
    pub fn button_at(&self, p: Vec2) -> Option<usize> {
        if self.was_drag || !self.in_band(p) {
            return None;
        }
        (0..self.layout.btn_count).find(|&i| self.button_rect(i).contains(p))
    }

    /// Whether there is more content to the left / right of the visible strip.
    pub fn overflow(&self) -> (bool, bool) {
        let max = self.max_scroll();
        (self.scroll_x > 0.5, self.scroll_x < max - 0.5)
    }

    /// Feeds one pointer event. Returns `true` when the event belongs to a toolbar gesture.
    pub fn handle_event(&mut self, event: &PointerEvent) -> bool {
        match *event {
            PointerEvent::Down(p) => {
                if !self.in_band(p) {
                    return false;
                }
                self.session = Some(Session {
                    start_x: p.x,
                    start_scroll: self.scroll_x,
                    last_x: p.x,
                });
                self.was_drag = false;
                self.velocity = 0.0;
                true
            }
            PointerEvent::Move(p) => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                let moved = p.x - session.start_x;
                if moved.abs() > self.tuning.drag_threshold {
                    self.was_drag = true;
                }
                let frame_dx = p.x - session.last_x;
                session.last_x = p.x;
                let target = session.start_scroll - moved;
                if self.was_drag {
                    self.scroll_x = target.clamp(0.0, self.max_scroll());
                    self.velocity = -frame_dx;
                }
                true
            }
            PointerEvent::Up(_) => {
                if self.session.take().is_none() {
                    return false;
                }
                if !self.was_drag {
                    self.velocity = 0.0;
                }
                true
            }
        }
    }

    /// Coasts on residual velocity. `dt` is in seconds; friction is defined per 60 Hz frame.
    pub fn update(&mut self, dt: f32) {
        if self.session.is_some() || self.velocity == 0.0 {
            return;
        }
        let frames = dt * 60.0;
        self.scroll_x += self.velocity * frames;
        self.velocity *= self.tuning.friction.powf(frames);

        let max = self.max_scroll();
        if self.scroll_x <= 0.0 || self.scroll_x >= max {
            self.scroll_x = self.scroll_x.clamp(0.0, max);
            self.velocity = 0.0;
        }
        if self.velocity.abs() < self.tuning.min_velocity {
            self.velocity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Six 120px buttons with 8px gaps in a 610px strip: 768px of content, 158px of scroll.
    fn toolbar() -> ScrollToolbar {
        ScrollToolbar::new(
            ToolbarLayout {
                left_x: 110.0,
                right_x: 720.0,
                y: 10.0,
                height: 60.0,
                btn_width: 120.0,
                btn_gap: 8.0,
                btn_count: 6,
            },
            ToolbarTuning::default(),
        )
    }

    fn p(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn max_scroll_is_content_minus_visible() {
        let t = toolbar();
        assert_eq!(t.content_width(), 768.0);
        assert_eq!(t.max_scroll(), 158.0);
    }

    #[test]
    fn max_scroll_is_zero_when_everything_fits() {
        let mut layout = *toolbar().layout();
        layout.btn_count = 2;
        let t = ScrollToolbar::new(layout, ToolbarTuning::default());
        assert_eq!(t.max_scroll(), 0.0);
    }

    #[test]
    fn small_wiggle_still_taps_the_button() {
        let mut t = toolbar();
        assert!(t.handle_event(&PointerEvent::Down(p(150.0, 40.0))));
        assert!(t.handle_event(&PointerEvent::Move(p(156.0, 42.0))));
        assert!(t.handle_event(&PointerEvent::Up(p(156.0, 42.0))));
        assert!(!t.was_drag());
        assert_eq!(t.button_at(p(156.0, 42.0)), Some(0));
        assert_eq!(t.scroll_x(), 0.0);
    }

    #[test]
    fn drag_ending_over_a_button_does_not_tap_it() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(400.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(350.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(300.0, 40.0)));
        t.handle_event(&PointerEvent::Up(p(300.0, 40.0)));
        assert!(t.was_drag());
        assert_eq!(t.scroll_x(), 100.0);
        assert_eq!(t.button_at(p(300.0, 40.0)), None);
    }

    #[test]
    fn drag_scroll_is_clamped() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(700.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(120.0, 40.0)));
        assert_eq!(t.scroll_x(), t.max_scroll());
        t.handle_event(&PointerEvent::Move(p(710.0, 40.0)));
        assert_eq!(t.scroll_x(), 0.0);
    }

    #[test]
    fn events_outside_the_band_are_not_consumed() {
        let mut t = toolbar();
        assert!(!t.handle_event(&PointerEvent::Down(p(50.0, 40.0))));
        assert!(!t.handle_event(&PointerEvent::Down(p(300.0, 400.0))));
        assert!(!t.handle_event(&PointerEvent::Move(p(300.0, 40.0))));
        assert!(!t.handle_event(&PointerEvent::Up(p(300.0, 40.0))));
    }

    #[test]
    fn fling_coasts_then_stops_at_edge() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(500.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(480.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(450.0, 40.0)));
        t.handle_event(&PointerEvent::Up(p(450.0, 40.0)));
        assert_eq!(t.scroll_x(), 50.0);
        assert_eq!(t.velocity(), 30.0);

        t.update(1.0 / 60.0);
        assert!(t.scroll_x() > 50.0);
        assert!(t.velocity() < 30.0);

        for _ in 0..120 {
            t.update(1.0 / 60.0);
        }
        assert_eq!(t.scroll_x(), t.max_scroll());
        assert_eq!(t.velocity(), 0.0);
    }

    #[test]
    fn coasting_decays_to_rest_without_hitting_an_edge() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(500.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(485.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(483.0, 40.0)));
        t.handle_event(&PointerEvent::Up(p(483.0, 40.0)));
        for _ in 0..200 {
            t.update(1.0 / 60.0);
        }
        assert_eq!(t.velocity(), 0.0);
        assert!(t.scroll_x() > 17.0 && t.scroll_x() < t.max_scroll());
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(500.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(450.0, 40.0)));
        t.handle_event(&PointerEvent::Up(p(450.0, 40.0)));
        let (s, v) = (t.scroll_x(), t.velocity());
        t.update(0.0);
        assert_eq!((t.scroll_x(), t.velocity()), (s, v));
    }

    #[test]
    fn new_press_cancels_momentum_and_resets_drag_flag() {
        let mut t = toolbar();
        t.handle_event(&PointerEvent::Down(p(500.0, 40.0)));
        t.handle_event(&PointerEvent::Move(p(450.0, 40.0)));
        t.handle_event(&PointerEvent::Up(p(450.0, 40.0)));
        assert!(t.was_drag());

        t.handle_event(&PointerEvent::Down(p(300.0, 40.0)));
        assert_eq!(t.velocity(), 0.0);
        assert!(!t.was_drag());
    }
}
