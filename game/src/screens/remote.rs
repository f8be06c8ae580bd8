use std::rc::Rc;

use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::press::PressTracker;
use engine::screen::{Nav, Screen};
use engine::ui::{Rect, Vec2};

use crate::remote::{RemoteKey, RemoteSender};
use crate::widgets::{self, WHITE};
use crate::{SCREEN_W, ScreenId};

const PAD_CX: i32 = SCREEN_W / 2;
const PAD_CY: i32 = 320;
const BTN_W: i32 = 100;
const BTN_H: i32 = 80;
const GAP: i32 = 8;
const OK_W: i32 = 120;
const ROW_W: i32 = 140;
const ROW_H: i32 = 70;
const ROW_GAP: i32 = 20;
const ROW_Y: i32 = PAD_CY + BTN_H + GAP + BTN_H + 50;

const BLUE: Color = rgb(55, 80, 180);
const OK_GREEN: Color = rgb(50, 170, 80);
const GRAY: Color = rgb(90, 90, 110);
const BG: Color = rgb(20, 20, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arrow {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Button {
    rect: Rect,
    color: Color,
    label: &'static str,
    arrow: Option<Arrow>,
    key: RemoteKey,
}

/// D-pad first (hit-tested in this order), then the bottom row.
fn layout() -> Vec<Button> {
    let arrow = |rect, arrow, key| Button {
        rect,
        color: BLUE,
        label: "",
        arrow: Some(arrow),
        key,
    };
    let labeled = |rect, color, label, key| Button {
        rect,
        color,
        label,
        arrow: None,
        key,
    };
    let row_x = (SCREEN_W - (3 * ROW_W + 2 * ROW_GAP)) / 2;
    vec![
        arrow(
            Rect::new(PAD_CX - BTN_W / 2, PAD_CY - BTN_H - GAP - BTN_H, BTN_W, BTN_H),
            Arrow::Up,
            RemoteKey::Up,
        ),
        arrow(
            Rect::new(PAD_CX - BTN_W - GAP - BTN_W / 2, PAD_CY - BTN_H / 2, BTN_W, BTN_H),
            Arrow::Left,
            RemoteKey::Left,
        ),
        labeled(
            Rect::new(PAD_CX - OK_W / 2, PAD_CY - BTN_H / 2, OK_W, BTN_H),
            OK_GREEN,
            "OK",
            RemoteKey::Select,
        ),
        arrow(
            Rect::new(PAD_CX + GAP + BTN_W / 2, PAD_CY - BTN_H / 2, BTN_W, BTN_H),
            Arrow::Right,
            RemoteKey::Right,
        ),
        arrow(
            Rect::new(PAD_CX - BTN_W / 2, PAD_CY + GAP + BTN_H / 2, BTN_W, BTN_H),
            Arrow::Down,
            RemoteKey::Down,
        ),
        labeled(Rect::new(row_x, ROW_Y, ROW_W, ROW_H), GRAY, "HOME", RemoteKey::Home),
        labeled(
            Rect::new(row_x + ROW_W + ROW_GAP, ROW_Y, ROW_W, ROW_H),
            GRAY,
            "PLAY/PAUSE",
            RemoteKey::Play,
        ),
        labeled(
            Rect::new(row_x + 2 * (ROW_W + ROW_GAP), ROW_Y, ROW_W, ROW_H),
            GRAY,
            "BACK",
            RemoteKey::Back,
        ),
    ]
}

fn draw_arrow(gfx: &mut dyn Renderer2d, c: Vec2, dir: Arrow) {
    let s = 16.0;
    let h = s / 2.0;
    let (a, b, d) = match dir {
        Arrow::Up => (Vec2::new(0.0, -s), Vec2::new(-s, h), Vec2::new(s, h)),
        Arrow::Down => (Vec2::new(0.0, s), Vec2::new(-s, -h), Vec2::new(s, -h)),
        Arrow::Left => (Vec2::new(-s, 0.0), Vec2::new(h, -s), Vec2::new(h, s)),
        Arrow::Right => (Vec2::new(s, 0.0), Vec2::new(-h, -s), Vec2::new(-h, s)),
    };
    gfx.fill_triangle(c + a, c + b, c + d, WHITE);
}

pub struct Remote {
    remote: Rc<dyn RemoteSender>,
    buttons: Vec<Button>,
    press: PressTracker,
}

impl Remote {
    pub fn new(remote: Rc<dyn RemoteSender>) -> Self {
        let buttons = layout();
        let press = PressTracker::new(buttons.len());
        Self {
            remote,
            buttons,
            press,
        }
    }
}

impl Screen<ScreenId> for Remote {
    fn on_enter(&mut self) {
        self.press.reset();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        let PointerEvent::Down(p) = *event else {
            return Nav::Stay;
        };
        if widgets::back_button_hit(p) {
            return Nav::Back;
        }
        if let Some(i) = self.buttons.iter().position(|b| b.rect.contains(p)) {
            let key = self.buttons[i].key;
            self.press.press(i);
            tracing::debug!(key = key.as_str(), "remote button");
            self.remote.send_key(key);
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.press.update(dt);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(BG);
        widgets::header(gfx, "REMOTE", None);

        for (i, button) in self.buttons.iter().enumerate() {
            let pressed = self.press.is_pressed(i);
            if !pressed {
                gfx.blend_rect(button.rect.offset(0, 3), widgets::BLACK, 50);
            }
            let scale = widgets::fit_text_scale(button.label, button.rect.w - 16, 4);
            widgets::button_3d(gfx, button.rect, button.color, button.label, scale, self.press.scale(i), pressed);
            if let Some(dir) = button.arrow {
                let c = button.rect.center() + Vec2::new(0.0, if pressed { 2.0 } else { -1.0 });
                draw_arrow(gfx, c, dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::testing::{RecordingRemote, Sent};
    use crate::screens::testing::{render, run_for, tap};

    fn screen() -> (Remote, Rc<RecordingRemote>) {
        let recorder = Rc::new(RecordingRemote::default());
        let mut s = Remote::new(recorder.clone());
        s.on_enter();
        (s, recorder)
    }

    fn center_of(s: &Remote, key: RemoteKey) -> Vec2 {
        s.buttons
            .iter()
            .find(|b| b.key == key)
            .map(|b| b.rect.center())
            .unwrap()
    }

    #[test]
    fn every_button_sends_its_key() {
        let (mut s, recorder) = screen();
        let keys = [
            RemoteKey::Up,
            RemoteKey::Left,
            RemoteKey::Select,
            RemoteKey::Right,
            RemoteKey::Down,
            RemoteKey::Home,
            RemoteKey::Play,
            RemoteKey::Back,
        ];
        for key in keys {
            let at = center_of(&s, key);
            assert_eq!(tap(&mut s, at), Nav::Stay);
        }
        let sent: Vec<Sent> = keys.into_iter().map(Sent::Key).collect();
        assert_eq!(*recorder.sent.borrow(), sent);
    }

    #[test]
    fn buttons_stay_on_screen_and_clear_the_header() {
        let (s, _) = screen();
        for b in &s.buttons {
            assert!(b.rect.y >= widgets::HEADER_H && b.rect.bottom() <= crate::SCREEN_H, "{:?}", b.key);
            assert!(b.rect.x >= 0 && b.rect.right() <= SCREEN_W);
        }
    }

    #[test]
    fn press_feedback_wears_off() {
        let (mut s, _) = screen();
        let at = center_of(&s, RemoteKey::Select);
        tap(&mut s, at);
        let ok = s.buttons.iter().position(|b| b.key == RemoteKey::Select).unwrap();
        assert!(s.press.is_pressed(ok));
        let _ = render(&s);
        run_for(&mut s, 0.3);
        assert!(!s.press.is_pressed(ok));
    }

    #[test]
    fn empty_space_sends_nothing() {
        let (mut s, recorder) = screen();
        tap(&mut s, Vec2::new(650.0, 200.0));
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn back_button_navigates_without_sending() {
        let (mut s, recorder) = screen();
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Back);
        assert!(recorder.sent.borrow().is_empty());
    }
}
