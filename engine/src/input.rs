use crate::ui::Vec2;

/// A single touch or left-mouse interaction, in logical frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
}

impl PointerEvent {
    pub fn pos(&self) -> Vec2 {
        match *self {
            PointerEvent::Down(p) | PointerEvent::Move(p) | PointerEvent::Up(p) => p,
        }
    }
}

/// Everything the driver delivers to an app between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Quit,
}

impl From<PointerEvent> for InputEvent {
    fn from(ev: PointerEvent) -> Self {
        InputEvent::Pointer(ev)
    }
}

/// Tracks which finger (or the mouse) owns the pointer so multi-touch collapses to one stream.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Vec2>,
    mouse_down: bool,
    active_touch: Option<u64>,
}

impl PointerTracker {
    pub fn cursor_moved(&mut self, pos: Vec2) -> PointerEvent {
        self.cursor = Some(pos);
        PointerEvent::Move(pos)
    }

    pub fn mouse_pressed(&mut self) -> Option<PointerEvent> {
        if self.mouse_down || self.active_touch.is_some() {
            return None;
        }
        self.mouse_down = true;
        self.cursor.map(PointerEvent::Down)
    }

    pub fn mouse_released(&mut self) -> Option<PointerEvent> {
        if !self.mouse_down {
            return None;
        }
        self.mouse_down = false;
        self.cursor.map(PointerEvent::Up)
    }

    pub fn touch_started(&mut self, id: u64, pos: Vec2) -> Option<PointerEvent> {
        if self.active_touch.is_some() || self.mouse_down {
            return None;
        }
        self.active_touch = Some(id);
        self.cursor = Some(pos);
        Some(PointerEvent::Down(pos))
    }

    pub fn touch_moved(&mut self, id: u64, pos: Vec2) -> Option<PointerEvent> {
        if self.active_touch != Some(id) {
            return None;
        }
        self.cursor = Some(pos);
        Some(PointerEvent::Move(pos))
    }

    pub fn touch_ended(&mut self, id: u64, pos: Vec2) -> Option<PointerEvent> {
        if self.active_touch != Some(id) {
            return None;
        }
        self.active_touch = None;
        self.cursor = Some(pos);
        Some(PointerEvent::Up(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_finger_is_ignored_until_first_lifts() {
        let mut t = PointerTracker::default();
        let a = Vec2::new(10.0, 10.0);
        let b = Vec2::new(50.0, 50.0);

        assert_eq!(t.touch_started(1, a), Some(PointerEvent::Down(a)));
        assert_eq!(t.touch_started(2, b), None);
        assert_eq!(t.touch_moved(2, b), None);
        assert_eq!(t.touch_ended(1, a), Some(PointerEvent::Up(a)));
        assert_eq!(t.touch_started(2, b), Some(PointerEvent::Down(b)));
    }

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut t = PointerTracker::default();
        assert_eq!(t.mouse_pressed(), None);
        assert_eq!(t.mouse_released(), None);

        let p = Vec2::new(3.0, 4.0);
        t.cursor_moved(p);
        assert_eq!(t.mouse_pressed(), Some(PointerEvent::Down(p)));
        assert_eq!(t.mouse_pressed(), None);
        assert_eq!(t.mouse_released(), Some(PointerEvent::Up(p)));
    }
}
