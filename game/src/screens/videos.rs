use std::rc::Rc;

use engine::graphics::{Color, Renderer2d, rgb};
use engine::input::PointerEvent;
use engine::press::PressTracker;
use engine::screen::{Nav, Screen};
use engine::scroll::{Gesture, GestureTuning, ScrollList};
use engine::ui::{Rect, Vec2};

use crate::catalog::VideoEntry;
use crate::video::{Playback, VideoPlayer};
use crate::widgets::{self, HEADER_H, SKY_BLUE, WHITE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const MARGIN: i32 = 20;
const GAP: i32 = 16;
const CARD_W: i32 = (SCREEN_W - MARGIN * 2 - GAP) / 2;
const CARD_H: i32 = 140;
const GRID_TOP: i32 = HEADER_H + 10;
const NOTE: Color = rgb(200, 220, 240);

pub struct Videos {
    player: Rc<dyn VideoPlayer>,
    entries: Vec<VideoEntry>,
    list: ScrollList,
    press: PressTracker,
    playback: Option<Playback>,
}

impl Videos {
    pub fn new(player: Rc<dyn VideoPlayer>, entries: Vec<VideoEntry>) -> Self {
        let rows = entries.len().div_ceil(2) as i32;
        let content = rows * CARD_H + (rows - 1).max(0) * GAP;
        let mut list = ScrollList::new(GestureTuning::default());
        list.set_extent(content as f32, (SCREEN_H - GRID_TOP) as f32);
        let press = PressTracker::new(entries.len());
        Self {
            player,
            entries,
            list,
            press,
            playback: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playback.as_ref().is_some_and(Playback::is_playing)
    }

    pub fn card_rect(&self, index: usize) -> Rect {
        let col = (index % 2) as i32;
        let row = (index / 2) as i32;
        Rect::new(
            MARGIN + col * (CARD_W + GAP),
            GRID_TOP + row * (CARD_H + GAP) - self.list.scroll_y().round() as i32,
            CARD_W,
            CARD_H,
        )
    }

    fn card_at(&self, p: Vec2) -> Option<usize> {
        if p.y < HEADER_H as f32 {
            return None;
        }
        (0..self.entries.len()).find(|&i| {
            let rect = self.card_rect(i);
            rect.contains(p) && rect.y >= HEADER_H - 10
        })
    }

    fn play(&mut self, index: usize) {
        let entry = &self.entries[index];
        self.press.press(index);
        tracing::info!(title = %entry.title, "starting video");
        self.playback = Some(self.player.play(&entry.video_id));
    }

    fn draw_cards(&self, gfx: &mut dyn Renderer2d) {
        for (i, entry) in self.entries.iter().enumerate() {
            let rect = self.card_rect(i);
            if rect.bottom() < HEADER_H || rect.y > SCREEN_H {
                continue;
            }
            let color = entry.card_color();
            let pressed = self.press.is_pressed(i);
            let face = widgets::card_3d(gfx, rect, color, 16, pressed);

            let c = Vec2::new((face.x + 45) as f32, face.center().y);
            let tri = 18.0;
            let points = [
                c + Vec2::new(-tri / 2.0, -tri),
                c + Vec2::new(-tri / 2.0, tri),
                c + Vec2::new(tri, 0.0),
            ];
            if pressed {
                gfx.fill_polygon(&points, WHITE);
            } else {
                gfx.blend_polygon(&points, WHITE, 180);
            }

            let text_center = Vec2::new((face.x + (face.w + 70) / 2) as f32, face.center().y);
            let text = widgets::text_color_for(color);
            widgets::draw_wrapped_centered(gfx, &entry.title, text_center, face.w - 90, text, 3);
        }

        let max = self.list.max_scroll();
        if max > 0.0 {
            let area_h = (SCREEN_H - GRID_TOP) as f32;
            let content = area_h + max;
            let bar_h = (area_h * area_h / content).max(30.0);
            let bar_y = GRID_TOP as f32 + (area_h - bar_h) * self.list.scroll_y() / max;
            gfx.fill_rounded_rect(
                Rect::new(SCREEN_W - 6, bar_y as i32, 4, bar_h as i32),
                2,
                rgb(180, 180, 200),
            );
        }
    }
}

impl Screen<ScreenId> for Videos {
    fn on_enter(&mut self) {
        self.list.reset();
        self.press.reset();
        self.playback = None;
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if self.is_playing() {
            return Nav::Stay;
        }
        if matches!(*event, PointerEvent::Down(p) if widgets::back_button_hit(p)) {
            return Nav::Back;
        }
        if let Gesture::Tap(p) = self.list.handle_event(event) {
            if let Some(i) = self.card_at(p) {
                self.play(i);
            }
        }
        Nav::Stay
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.press.update(dt);
        if self.playback.is_some() && !self.is_playing() {
            tracing::debug!("video finished");
            self.playback = None;
        }
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(SKY_BLUE);
        let mid = Vec2::new(SCREEN_W as f32 / 2.0, SCREEN_H as f32 / 2.0);
        if self.entries.is_empty() {
            widgets::draw_wrapped_centered(gfx, "NO VIDEOS YET!", mid + Vec2::new(0.0, -30.0), SCREEN_W - 60, WHITE, 5);
            widgets::draw_wrapped_centered(
                gfx,
                "ADD VIDEOS IN THE SETTINGS FILE",
                mid + Vec2::new(0.0, 20.0),
                SCREEN_W - 60,
                NOTE,
                3,
            );
        } else if self.is_playing() {
            widgets::draw_wrapped_centered(gfx, "PLAYING VIDEO...", mid + Vec2::new(0.0, -10.0), SCREEN_W - 60, WHITE, 5);
            widgets::draw_wrapped_centered(
                gfx,
                "TAP THE VIDEO TO PAUSE",
                mid + Vec2::new(0.0, 30.0),
                SCREEN_W - 60,
                NOTE,
                3,
            );
        } else {
            self.draw_cards(gfx);
        }
        widgets::header(gfx, "COOL VIDEOS", Some(SKY_BLUE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::testing::{drag, pixel, render, tap};
    use crate::video::testing::ManualPlayer;

    fn entries(n: usize) -> Vec<VideoEntry> {
        (0..n)
            .map(|i| VideoEntry {
                title: format!("Video {i}"),
                video_id: format!("id{i}"),
                color: [200, 60, 60],
            })
            .collect()
    }

    fn screen(n: usize) -> (Videos, Rc<ManualPlayer>) {
        let player = Rc::new(ManualPlayer::default());
        let mut s = Videos::new(player.clone(), entries(n));
        s.on_enter();
        (s, player)
    }

    #[test]
    fn tap_plays_the_card_under_the_finger() {
        let (mut s, player) = screen(4);
        let at = s.card_rect(3).center();
        tap(&mut s, at);
        assert_eq!(*player.requested.borrow(), vec!["id3".to_string()]);
        assert!(s.is_playing());
    }

    #[test]
    fn taps_are_ignored_while_playing() {
        let (mut s, player) = screen(4);
        let at = s.card_rect(0).center();
        tap(&mut s, at);
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Stay);
        let at = s.card_rect(1).center();
        tap(&mut s, at);
        assert_eq!(player.requested.borrow().len(), 1);

        player.finish();
        s.update(0.016);
        assert!(!s.is_playing());
        let at = s.card_rect(1).center();
        tap(&mut s, at);
        assert_eq!(player.requested.borrow().len(), 2);
    }

    #[test]
    fn playing_overlay_hides_the_cards() {
        let (mut s, _player) = screen(2);
        let card = s.card_rect(0);
        let probe = (card.x + 10, card.center().y as i32);
        let before = render(&s);
        assert_ne!(pixel(&before, probe.0, probe.1), [135, 206, 235, 255]);
        tap(&mut s, card.center());
        let during = render(&s);
        assert_eq!(pixel(&during, probe.0, probe.1), [135, 206, 235, 255]);
    }

    #[test]
    fn scrolling_is_not_a_tap() {
        let (mut s, player) = screen(12);
        drag(&mut s, Vec2::new(200.0, 600.0), &[Vec2::new(200.0, 580.0), Vec2::new(200.0, 400.0)]);
        assert_eq!(s.list.scroll_y(), 200.0);
        assert!(player.requested.borrow().is_empty());
    }

    #[test]
    fn empty_catalog_shows_a_notice() {
        let (mut s, player) = screen(0);
        let frame = render(&s);
        let mid = SCREEN_H / 2 - 30;
        let lit = (0..SCREEN_W).any(|x| pixel(&frame, x, mid) == [255, 255, 255, 255]);
        assert!(lit);
        tap(&mut s, Vec2::new(360.0, 360.0));
        assert!(player.requested.borrow().is_empty());
        assert_eq!(tap(&mut s, Vec2::new(50.0, 50.0)), Nav::Back);
    }
}
