use std::cell::RefCell;
use std::rc::Rc;

use engine::assets::{Image, ImageCache};
use engine::graphics::{Renderer2d, rgb, text_width};
use engine::input::PointerEvent;
use engine::press::PressTracker;
use engine::screen::{Nav, Screen};
use engine::scroll::{Gesture, GestureTuning, ScrollList};
use engine::ui::{Rect, Vec2};

use crate::catalog::{SHOWS, Show};
use crate::remote::RemoteSender;
use crate::widgets::{self, HEADER_H, SKY_BLUE};
use crate::{SCREEN_H, SCREEN_W, ScreenId};

const MARGIN: i32 = 14;
const GAP_X: i32 = 12;
const GAP_Y: i32 = 10;
const GRID_TOP: i32 = HEADER_H + 10;
const CARD_W: i32 = (SCREEN_W - MARGIN * 2 - GAP_X) / 2;
/// Card art is 256x112; it fills a bit over half the card width.
const IMG_W: i32 = CARD_W * 58 / 100;
const IMG_H: i32 = IMG_W * 112 / 256;
const IMG_PAD: i32 = 4;
const CARD_H: i32 = IMG_H + 34;

fn rows(count: usize) -> i32 {
    count.div_ceil(2) as i32
}

fn content_height(count: usize) -> f32 {
    let rows = rows(count);
    (rows * CARD_H + (rows - 1).max(0) * GAP_Y) as f32
}

pub struct Shows {
    remote: Rc<dyn RemoteSender>,
    art: Vec<Option<Rc<Image>>>,
    list: ScrollList,
    press: PressTracker,
}

impl Shows {
    pub fn new(remote: Rc<dyn RemoteSender>, images: Rc<RefCell<ImageCache>>) -> Self {
        let mut cache = images.borrow_mut();
        let art = SHOWS
            .iter()
            .map(|show| show.image.and_then(|file| cache.load(format!("shows/{file}"))))
            .collect();
        let mut list = ScrollList::new(GestureTuning::default());
        list.set_extent(content_height(SHOWS.len()), (SCREEN_H - GRID_TOP) as f32);
        Self {
            remote,
            art,
            list,
            press: PressTracker::new(SHOWS.len()),
        }
    }

    /// Card rect at the current scroll offset.
    pub fn card_rect(&self, index: usize) -> Rect {
        let col = (index % 2) as i32;
        let row = (index / 2) as i32;
        Rect::new(
            MARGIN + col * (CARD_W + GAP_X),
            GRID_TOP + row * (CARD_H + GAP_Y) - self.list.scroll_y().round() as i32,
            CARD_W,
            CARD_H,
        )
    }

    fn card_at(&self, p: Vec2) -> Option<usize> {
        if p.y < HEADER_H as f32 {
            return None;
        }
        (0..SHOWS.len()).find(|&i| {
            let rect = self.card_rect(i);
            rect.contains(p) && rect.y >= HEADER_H - 10
        })
    }

    fn launch(&mut self, index: usize) {
        let show: &Show = &SHOWS[index];
        self.press.press(index);
        tracing::debug!(show = show.name, "launching show");
        self.remote
            .launch_content(show.channel, show.content_id, show.media_type);
    }

    fn draw_card(&self, gfx: &mut dyn Renderer2d, index: usize) {
        let show = &SHOWS[index];
        let rect = self.card_rect(index);
        let text = widgets::text_color_for(show.color);
        let face = widgets::card_3d(gfx, rect, show.color, 12, self.press.is_pressed(index));

        match self.art.get(index).and_then(Option::as_ref) {
            Some(image) => {
                let dest = Rect::new(face.right() - IMG_PAD - IMG_W, face.y + IMG_PAD, IMG_W, IMG_H);
                gfx.draw_image(image, dest);
                let text_w = face.w - IMG_W - IMG_PAD * 3;
                let center = Vec2::new(
                    (face.x + IMG_PAD + text_w / 2) as f32,
                    (face.y + (IMG_H + IMG_PAD * 2) / 2) as f32,
                );
                widgets::draw_wrapped_centered(gfx, show.name, center, text_w - 8, text, 2);
            }
            None => {
                widgets::draw_wrapped_centered(gfx, show.name, face.center(), face.w - 20, text, 3);
            }
        }
    }
}

impl Screen<ScreenId> for Shows {
    fn on_enter(&mut self) {
        self.list.reset();
        self.press.reset();
    }

    fn handle_event(&mut self, event: &PointerEvent) -> Nav<ScreenId> {
        if matches!(*event, PointerEvent::Down(p) if widgets::back_button_hit(p)) {
            return Nav::Back;
        }
        match self.list.handle_event(event) {
            Gesture::Tap(p) => {
                if let Some(i) = self.card_at(p) {
                    self.launch(i);
                }
                Nav::Stay
            }
            Gesture::Swipe { dx } if dx < 0.0 => Nav::GoTo(ScreenId::Remote),
            _ => Nav::Stay,
        }
    }

    fn update(&mut self, dt: f32) -> Nav<ScreenId> {
        self.press.update(dt);
        Nav::Stay
    }

    fn draw(&self, gfx: &mut dyn Renderer2d) {
        gfx.clear(SKY_BLUE);

        for i in 0..SHOWS.len() {
            let rect = self.card_rect(i);
            if rect.bottom() < HEADER_H || rect.y > SCREEN_H {
                continue;
            }
            self.draw_card(gfx, i);
        }

        let max = self.list.max_scroll();
        if max > 0.0 {
            let area_h = (SCREEN_H - GRID_TOP) as f32;
            let bar_h = (area_h * area_h / content_height(SHOWS.len())).max(30.0);
            let bar_y = GRID_TOP as f32 + (area_h - bar_h) * self.list.scroll_y() / max;
            gfx.fill_rounded_rect(
                Rect::new(SCREEN_W - 6, bar_y as i32, 4, bar_h as i32),
                2,
                rgb(180, 180, 200),
            );
        }

        // Cards scroll under the header.
        widgets::header(gfx, "SHOWS", Some(SKY_BLUE));

        let hint = "SWIPE LEFT FOR REMOTE >";
        let w = text_width(hint, 2);
        gfx.draw_text_scaled(SCREEN_W - 12 - w, SCREEN_H - 20, hint, rgb(100, 140, 180), 2);
    }
}
