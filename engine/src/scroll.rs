//! Vertical scrolling for card grids, with tap and horizontal-swipe detection.

use crate::input::PointerEvent;
use crate::ui::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    /// Vertical travel after which a press scrolls the list.
    pub scroll_threshold: f32,
    /// Releases with less total travel than this on both axes count as taps.
    pub tap_slop: f32,
    /// Horizontal travel needed for a swipe.
    pub swipe_distance: f32,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            scroll_threshold: 10.0,
            tap_slop: 15.0,
            swipe_distance: 80.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    None,
    Tap(Vec2),
    /// Horizontal swipe; negative `dx` is leftward.
    Swipe { dx: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    start: Vec2,
    last_y: f32,
    scrolling: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollList {
    tuning: GestureTuning,
    scroll_y: f32,
    max_scroll: f32,
    press: Option<Press>,
}

impl ScrollList {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            scroll_y: 0.0,
            max_scroll: 0.0,
            press: None,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn is_scrolling(&self) -> bool {
        self.press.is_some_and(|p| p.scrolling)
    }

    /// Sets the scrollable range from content and viewport heights.
    pub fn set_extent(&mut self, content_height: f32, viewport_height: f32) {
        self.max_scroll = (content_height - viewport_height).max(0.0);
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll);
    }

    pub fn reset(&mut self) {
        self.scroll_y = 0.0;
        self.press = None;
    }

    pub fn handle_event(&mut self, event: &PointerEvent) -> Gesture {
        match *event {
            PointerEvent::Down(p) => {
                self.press = Some(Press {
                    start: p,
                    last_y: p.y,
                    scrolling: false,
                });
                Gesture::None
            }
            PointerEvent::Move(p) => {
                let Some(press) = self.press.as_mut() else {
                    return Gesture::None;
                };
                let dx = (p.x - press.start.x).abs();
                let dy = (p.y - press.start.y).abs();
                if !press.scrolling && dy > self.tuning.scroll_threshold && dy > dx {
                    press.scrolling = true;
                }
                if press.scrolling {
                    self.scroll_y = (self.scroll_y - (p.y - press.last_y)).clamp(0.0, self.max_scroll);
                }
                press.last_y = p.y;
                Gesture::None
            }
            PointerEvent::Up(p) => {
                let Some(press) = self.press.take() else {
                    return Gesture::None;
                };
                if press.scrolling {
                    return Gesture::None;
                }
                let dx = p.x - press.start.x;
                let dy = p.y - press.start.y;
                if dx.abs() < self.tuning.tap_slop && dy.abs() < self.tuning.tap_slop {
                    Gesture::Tap(p)
                } else if dx.abs() > self.tuning.swipe_distance && dx.abs() > dy.abs() * 1.5 {
                    Gesture::Swipe { dx }
                } else {
                    Gesture::None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ScrollList {
        let mut l = ScrollList::new(GestureTuning::default());
        l.set_extent(1500.0, 600.0);
        l
    }

    fn p(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn short_press_is_a_tap() {
        let mut l = list();
        l.handle_event(&PointerEvent::Down(p(100.0, 300.0)));
        l.handle_event(&PointerEvent::Move(p(105.0, 306.0)));
        assert_eq!(l.handle_event(&PointerEvent::Up(p(105.0, 306.0))), Gesture::Tap(p(105.0, 306.0)));
        assert_eq!(l.scroll_y(), 0.0);
    }

    #[test]
    fn vertical_drag_scrolls_and_is_not_a_tap() {
        let mut l = list();
        l.handle_event(&PointerEvent::Down(p(100.0, 500.0)));
        l.handle_event(&PointerEvent::Move(p(100.0, 480.0)));
        l.handle_event(&PointerEvent::Move(p(100.0, 300.0)));
        assert!(l.is_scrolling());
        assert_eq!(l.scroll_y(), 200.0);
        assert_eq!(l.handle_event(&PointerEvent::Up(p(100.0, 300.0))), Gesture::None);
    }

    #[test]
    fn scroll_is_clamped_to_extent() {
        let mut l = list();
        l.handle_event(&PointerEvent::Down(p(100.0, 700.0)));
        l.handle_event(&PointerEvent::Move(p(100.0, -900.0)));
        assert_eq!(l.scroll_y(), 900.0);
        l.handle_event(&PointerEvent::Move(p(100.0, 2000.0)));
        assert_eq!(l.scroll_y(), 0.0);
    }

    #[test]
    fn long_horizontal_drag_is_a_swipe() {
        let mut l = list();
        l.handle_event(&PointerEvent::Down(p(500.0, 300.0)));
        l.handle_event(&PointerEvent::Move(p(300.0, 310.0)));
        assert_eq!(
            l.handle_event(&PointerEvent::Up(p(380.0, 310.0))),
            Gesture::Swipe { dx: -120.0 }
        );
    }

    #[test]
    fn shrinking_extent_pulls_scroll_back() {
        let mut l = list();
        l.handle_event(&PointerEvent::Down(p(100.0, 700.0)));
        l.handle_event(&PointerEvent::Move(p(100.0, 100.0)));
        l.set_extent(700.0, 600.0);
        assert_eq!(l.scroll_y(), 100.0);
    }
}
