//! Shared look: palette helpers, 3D buttons and cards, the back button and header bar.

use engine::graphics::{Color, Renderer2d, rgb, text_width};
use engine::ui::{Rect, Vec2};

use crate::SCREEN_W;

pub const WHITE: Color = rgb(255, 255, 255);
pub const BLACK: Color = rgb(0, 0, 0);
pub const SKY_BLUE: Color = rgb(135, 206, 235);
pub const GREEN: Color = rgb(76, 175, 80);
pub const ORANGE: Color = rgb(255, 152, 0);
pub const PURPLE: Color = rgb(156, 39, 176);
pub const GOLD: Color = rgb(255, 215, 0);

pub const BACK_BUTTON: Rect = Rect::new(15, 15, 80, 80);
pub const HEADER_H: i32 = 80;

pub fn darken(c: Color, amount: u8) -> Color {
    [
        c[0].saturating_sub(amount),
        c[1].saturating_sub(amount),
        c[2].saturating_sub(amount),
        c[3],
    ]
}

pub fn brighten(c: Color, amount: u8) -> Color {
    [
        c[0].saturating_add(amount),
        c[1].saturating_add(amount),
        c[2].saturating_add(amount),
        c[3],
    ]
}

pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2]), 255]
}

/// `h` in turns (wraps), `s` and `v` in `0..=1`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as i32 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let to_u8 = |x: f32| (x * 255.0).round() as u8;
    rgb(to_u8(r), to_u8(g), to_u8(b))
}

/// Dark text on light backgrounds, white otherwise.
pub fn text_color_for(bg: Color) -> Color {
    if bg[0] as u32 + bg[1] as u32 + bg[2] as u32 > 400 {
        rgb(40, 40, 40)
    } else {
        WHITE
    }
}

pub fn vertical_gradient(gfx: &mut dyn Renderer2d, rect: Rect, top: Color, bottom: Color) {
    // Bands of 4 rows are indistinguishable from per-row steps at this size.
    const BAND: i32 = 4;
    let mut y = 0;
    while y < rect.h {
        let t = if rect.h <= 1 { 0.0 } else { y as f32 / (rect.h - 1) as f32 };
        let h = BAND.min(rect.h - y);
        gfx.fill_rect(Rect::new(rect.x, rect.y + y, rect.w, h), lerp_color(top, bottom, t));
        y += BAND;
    }
}

/// A raised button: darker bottom edge, face, top highlight, centered label.
///
/// `scale` comes from a press tracker; `pressed` flattens the button.
pub fn button_3d(
    gfx: &mut dyn Renderer2d,
    rect: Rect,
    color: Color,
    label: &str,
    text_scale: i32,
    scale: f32,
    pressed: bool,
) {
    let rect = rect.scaled(scale);
    let radius = (rect.h / 4).min(24);
    let label_color = text_color_for(color);

    if pressed {
        let face = Rect::new(rect.x, rect.y + 2, rect.w, rect.h - 2);
        gfx.fill_rounded_rect(face, radius, darken(color, 30));
        gfx.draw_text_centered(face.center(), label, label_color, text_scale);
        return;
    }

    let edge = Rect::new(rect.x, rect.y + 4, rect.w, rect.h - 4);
    gfx.fill_rounded_rect(edge, radius, darken(color, 60));
    let face = Rect::new(rect.x, rect.y, rect.w, rect.h - 4);
    gfx.fill_rounded_rect(face, radius, color);
    let highlight = Rect::new(face.x + radius / 2, face.y + 3, face.w - radius, face.h / 4);
    gfx.fill_rounded_rect(highlight, radius / 2, brighten(color, 30));
    gfx.draw_text_centered(face.center() + Vec2::new(0.0, -2.0), label, label_color, text_scale);
}

/// A raised card; returns the face rect for the caller's content.
pub fn card_3d(gfx: &mut dyn Renderer2d, rect: Rect, color: Color, radius: i32, pressed: bool) -> Rect {
    if pressed {
        let face = Rect::new(rect.x + 1, rect.y + 2, rect.w - 2, rect.h - 2);
        gfx.fill_rounded_rect(face, radius, darken(color, 20));
        return face;
    }
    gfx.fill_rounded_rect(Rect::new(rect.x, rect.y + 3, rect.w, rect.h - 3), radius, darken(color, 50));
    let face = Rect::new(rect.x, rect.y, rect.w, rect.h - 3);
    gfx.fill_rounded_rect(face, radius, color);
    let hl_h = (face.h / 5).max(4);
    let highlight = Rect::new(face.x + radius / 2, face.y + 2, face.w - radius, hl_h);
    gfx.fill_rounded_rect(highlight, radius / 2, brighten(color, 25));
    face
}

pub fn back_button_hit(p: Vec2) -> bool {
    BACK_BUTTON.contains(p)
}

/// Round translucent button with a `<` chevron in the top-left corner.
pub fn back_button(gfx: &mut dyn Renderer2d) {
    let c = BACK_BUTTON.center();
    let r = BACK_BUTTON.w as f32 / 2.0;
    gfx.blend_circle(c + Vec2::new(2.0, 4.0), r, BLACK, 40);
    gfx.blend_circle(c, r, BLACK, 140);
    gfx.circle_outline(c, r - 2.0, 2.0, rgb(110, 110, 110));

    let arrow = 12.0;
    gfx.draw_line(
        c + Vec2::new(arrow / 2.0, -arrow),
        c + Vec2::new(-arrow / 2.0, 0.0),
        4.0,
        WHITE,
    );
    gfx.draw_line(
        c + Vec2::new(-arrow / 2.0, 0.0),
        c + Vec2::new(arrow / 2.0, arrow),
        4.0,
        WHITE,
    );
}

/// Optional colored bar, the back button, and a shadowed title.
pub fn header(gfx: &mut dyn Renderer2d, title: &str, bg: Option<Color>) {
    if let Some(bg) = bg {
        gfx.fill_rect(Rect::new(0, 0, SCREEN_W, HEADER_H), bg);
    }
    back_button(gfx);
    let center = Vec2::new(SCREEN_W as f32 / 2.0, 47.0);
    gfx.draw_text_centered(center + Vec2::new(2.0, 2.0), title, rgb(40, 40, 40), 5);
    gfx.draw_text_centered(center, title, WHITE, 5);
}

/// Star outline with `points` tips, alternating outer and inner radius.
pub fn star_points(center: Vec2, outer: f32, inner: f32, points: usize, rotation: f32) -> Vec<Vec2> {
    let step = std::f32::consts::PI / points as f32;
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = rotation - std::f32::consts::FRAC_PI_2 + i as f32 * step;
            center + Vec2::from_angle(angle, r)
        })
        .collect()
}

/// Regular polygon with the first vertex straight up.
pub fn regular_polygon(center: Vec2, radius: f32, sides: usize, rotation: f32) -> Vec<Vec2> {
    let step = std::f32::consts::TAU / sides as f32;
    (0..sides)
        .map(|i| {
            let angle = rotation - std::f32::consts::FRAC_PI_2 + i as f32 * step;
            center + Vec2::from_angle(angle, radius)
        })
        .collect()
}

pub fn ellipse_points(center: Vec2, rx: f32, ry: f32) -> Vec<Vec2> {
    let segments = ((rx.max(ry) * 0.8) as usize).clamp(12, 48);
    let step = std::f32::consts::TAU / segments as f32;
    (0..segments)
        .map(|i| {
            let angle = i as f32 * step;
            center + Vec2::new(angle.cos() * rx, angle.sin() * ry)
        })
        .collect()
}

/// Two lobes and a point.
pub fn draw_heart(gfx: &mut dyn Renderer2d, center: Vec2, size: f32, color: Color) {
    let r = size / 2.0;
    gfx.fill_circle(center + Vec2::new(-r / 2.0, -r / 3.0), r, color);
    gfx.fill_circle(center + Vec2::new(r / 2.0, -r / 3.0), r, color);
    gfx.fill_triangle(
        center + Vec2::new(-size + 2.0, -2.0),
        center + Vec2::new(size - 2.0, -2.0),
        center + Vec2::new(0.0, size),
        color,
    );
}

/// Largest text scale (down to 2) at which `text` fits in `max_width`.
pub fn fit_text_scale(text: &str, max_width: i32, preferred: i32) -> i32 {
    let mut scale = preferred.max(2);
    while scale > 2 && text_width(text, scale) > max_width {
        scale -= 1;
    }
    scale
}

/// Greedy word wrap. A single word wider than `max_width` gets a line of its own.
pub fn wrap_words(text: &str, max_width: i32, scale: i32) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if line.is_empty() || text_width(&candidate, scale) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrapped lines stacked and centered on `center`.
pub fn draw_wrapped_centered(
    gfx: &mut dyn Renderer2d,
    text: &str,
    center: Vec2,
    max_width: i32,
    color: Color,
    scale: i32,
) {
    let lines = wrap_words(text, max_width, scale);
    let line_h = 7 * scale;
    let top = center.y - (lines.len() as f32 * line_h as f32) / 2.0 + line_h as f32 / 2.0;
    for (i, line) in lines.iter().enumerate() {
        let y = top + (i as i32 * line_h) as f32;
        gfx.draw_text_centered(Vec2::new(center.x, y), line, color, scale);
    }
}
