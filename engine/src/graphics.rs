use crate::assets::Image;
use crate::surface::SurfaceSize;
use crate::ui::{Rect, Vec2};

pub type Color = [u8; 4];

pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r, g, b, 255]
}

// A tiny block font (no external deps). Kept deliberately simple.
pub const DEFAULT_TEXT_SCALE: i32 = 2;
const GLYPH_W: i32 = 3;
const GLYPH_H: i32 = 5;

fn glyph_advance_x(scale: i32) -> i32 {
    (GLYPH_W + 1) * scale.max(1)
}

fn line_advance_y(scale: i32) -> i32 {
    (GLYPH_H + 1) * scale.max(1)
}

/// Pixel width of the widest line of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let scale = scale.max(1);
    text.lines()
        .map(|line| {
            let n = line.chars().count() as i32;
            if n == 0 { 0 } else { n * glyph_advance_x(scale) - scale }
        })
        .max()
        .unwrap_or(0)
}

pub fn text_height(text: &str, scale: i32) -> i32 {
    let lines = text.lines().count().max(1) as i32;
    lines * line_advance_y(scale) - scale.max(1)
}

/// Unified 2D rendering interface.
///
/// Screens only talk to this trait. Implementors provide opaque and blended rect fills plus image
/// blits; every other shape is rasterized into one-pixel-tall rect spans by the default methods.
pub trait Renderer2d {
    fn begin_frame(&mut self, size: SurfaceSize);
    fn size(&self) -> SurfaceSize;

    /// Opaque fill, clipped to the frame.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Alpha-blended rect over existing content (alpha is applied to `color`'s RGB).
    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8);

    /// Nearest-neighbour blit of `image` stretched to `dest`, honouring per-pixel alpha.
    fn draw_image(&mut self, image: &Image, dest: Rect);

    fn clear(&mut self, color: Color) {
        let s = self.size();
        self.fill_rect(Rect::from_size(s.width as i32, s.height as i32), color);
    }

    fn rect_outline(&mut self, rect: Rect, thickness: i32, color: Color) {
        if rect.is_empty() {
            return;
        }
        let t = thickness.max(1).min(rect.w / 2 + 1).min(rect.h / 2 + 1);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.h), color);
        self.fill_rect(Rect::new(rect.right() - t, rect.y, t, rect.h), color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        for_each_circle_span(center, radius, |span| self.fill_rect(span, color));
    }

    fn blend_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: u8) {
        for_each_circle_span(center, radius, |span| self.blend_rect(span, color, alpha));
    }

    /// Ring between `radius - thickness` and `radius`.
    fn circle_outline(&mut self, center: Vec2, radius: f32, thickness: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let inner = (radius - thickness.max(1.0)).max(0.0);
        let top = (center.y - radius).floor() as i32;
        let bottom = (center.y + radius).ceil() as i32;
        for y in top..bottom {
            let dy = y as f32 + 0.5 - center.y;
            if dy.abs() > radius {
                continue;
            }
            let outer_half = (radius * radius - dy * dy).sqrt();
            let x0 = (center.x - outer_half).round() as i32;
            let x1 = (center.x + outer_half).round() as i32;
            if dy.abs() >= inner {
                self.fill_rect(Rect::new(x0, y, x1 - x0, 1), color);
                continue;
            }
            let inner_half = (inner * inner - dy * dy).sqrt();
            let i0 = (center.x - inner_half).round() as i32;
            let i1 = (center.x + inner_half).round() as i32;
            self.fill_rect(Rect::new(x0, y, i0 - x0, 1), color);
            self.fill_rect(Rect::new(i1, y, x1 - i1, 1), color);
        }
    }

    /// Thick line with round caps.
    fn draw_line(&mut self, from: Vec2, to: Vec2, thickness: f32, color: Color) {
        let radius = (thickness / 2.0).max(0.5);
        let len = from.distance(to);
        let step = (radius * 0.5).max(0.5);
        let steps = (len / step).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            self.fill_circle(p, radius, color);
        }
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.fill_polygon(&[a, b, c], color);
    }

    /// Even-odd scanline fill; works for the concave star shapes too.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        for_each_polygon_span(points, |span| self.fill_rect(span, color));
    }

    fn blend_polygon(&mut self, points: &[Vec2], color: Color, alpha: u8) {
        for_each_polygon_span(points, |span| self.blend_rect(span, color, alpha));
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: i32, color: Color) {
        if rect.is_empty() {
            return;
        }
        let r = radius.clamp(0, rect.w.min(rect.h) / 2);
        if r == 0 {
            self.fill_rect(rect, color);
            return;
        }
        self.fill_rect(Rect::new(rect.x, rect.y + r, rect.w, rect.h - 2 * r), color);
        for row in 0..r {
            let dy = r as f32 - row as f32 - 0.5;
            let inset = r - ((r * r) as f32 - dy * dy).max(0.0).sqrt().round() as i32;
            let span_w = rect.w - 2 * inset;
            self.fill_rect(Rect::new(rect.x + inset, rect.y + row, span_w, 1), color);
            self.fill_rect(Rect::new(rect.x + inset, rect.bottom() - 1 - row, span_w, 1), color);
        }
    }

    fn draw_text_scaled(&mut self, x: i32, y: i32, text: &str, color: Color, scale: i32) {
        let scale = scale.max(1);
        let adv_x = glyph_advance_x(scale);
        let adv_y = line_advance_y(scale);

        let mut cursor_x = x;
        let mut cursor_y = y;
        for ch in text.chars() {
            match ch {
                '\n' => {
                    cursor_x = x;
                    cursor_y += adv_y;
                    continue;
                }
                ' ' => {
                    cursor_x += adv_x;
                    continue;
                }
                _ => {}
            }

            for (row, bits) in glyph_rows(ch).into_iter().enumerate() {
                for col in 0..GLYPH_W {
                    let mask = 1u8 << (GLYPH_W - 1 - col);
                    if bits & mask == 0 {
                        continue;
                    }
                    let px = cursor_x + col * scale;
                    let py = cursor_y + row as i32 * scale;
                    self.fill_rect(Rect::new(px, py, scale, scale), color);
                }
            }
            cursor_x += adv_x;
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color) {
        self.draw_text_scaled(x, y, text, color, DEFAULT_TEXT_SCALE);
    }

    /// Draws `text` centered on `center`.
    fn draw_text_centered(&mut self, center: Vec2, text: &str, color: Color, scale: i32) {
        let w = text_width(text, scale);
        let h = text_height(text, scale);
        let x = (center.x - w as f32 / 2.0).round() as i32;
        let y = (center.y - h as f32 / 2.0).round() as i32;
        self.draw_text_scaled(x, y, text, color, scale);
    }
}

fn for_each_circle_span(center: Vec2, radius: f32, mut span: impl FnMut(Rect)) {
    if radius <= 0.0 {
        return;
    }
    if radius < 1.0 {
        span(Rect::new(center.x.floor() as i32, center.y.floor() as i32, 1, 1));
        return;
    }
    let top = (center.y - radius).floor() as i32;
    let bottom = (center.y + radius).ceil() as i32;
    for y in top..bottom {
        let dy = y as f32 + 0.5 - center.y;
        if dy.abs() > radius {
            continue;
        }
        let half = (radius * radius - dy * dy).sqrt();
        let x0 = (center.x - half).round() as i32;
        let x1 = (center.x + half).round() as i32;
        if x1 > x0 {
            span(Rect::new(x0, y, x1 - x0, 1));
        }
    }
}

fn for_each_polygon_span(points: &[Vec2], mut span: impl FnMut(Rect)) {
    if points.len() < 3 {
        return;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));

    let mut xs: Vec<f32> = Vec::with_capacity(points.len());
    for y in min_y.floor() as i32..max_y.ceil() as i32 {
        let yc = y as f32 + 0.5;
        xs.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            let crosses = (a.y <= yc && b.y > yc) || (b.y <= yc && a.y > yc);
            if crosses {
                xs.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        xs.sort_by(|l, r| l.total_cmp(r));
        for pair in xs.chunks_exact(2) {
            let x0 = pair[0].round() as i32;
            let x1 = pair[1].round() as i32;
            if x1 > x0 {
                span(Rect::new(x0, y, x1 - x0, 1));
            }
        }
    }
}

/// CPU renderer that draws into an RGBA frame buffer.
pub struct CpuRenderer<'a> {
    frame: &'a mut [u8],
    size: SurfaceSize,
}

impl<'a> CpuRenderer<'a> {
    pub fn new(frame: &'a mut [u8], size: SurfaceSize) -> Self {
        Self { frame, size }
    }

    /// Clips `rect` to the frame; `None` when nothing is visible or the buffer is too short.
    fn clip(&self, rect: Rect) -> Option<Rect> {
        if self.frame.len() < self.size.rgba_len() || self.size.is_empty() {
            return None;
        }
        let bounds = Rect::from_size(self.size.width as i32, self.size.height as i32);
        let clipped = rect.intersect(bounds);
        (!clipped.is_empty()).then_some(clipped)
    }

    fn row_range(&self, x: i32, y: i32, w: i32) -> std::ops::Range<usize> {
        let stride = self.size.width as usize * 4;
        let start = y as usize * stride + x as usize * 4;
        start..start + w as usize * 4
    }
}

impl Renderer2d for CpuRenderer<'_> {
    fn begin_frame(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = self.clip(rect) else {
            return;
        };
        for y in r.y..r.bottom() {
            let range = self.row_range(r.x, y, r.w);
            for px in self.frame[range].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }

    fn blend_rect(&mut self, rect: Rect, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 {
            self.fill_rect(rect, color);
            return;
        }
        let Some(r) = self.clip(rect) else {
            return;
        };

        for y in r.y..r.bottom() {
            let range = self.row_range(r.x, y, r.w);
            for px in self.frame[range].chunks_exact_mut(4) {
                blend_pixel(px, color, alpha);
            }
        }
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) {
        if image.width == 0 || image.height == 0 || dest.is_empty() {
            return;
        }
        let Some(r) = self.clip(dest) else {
            return;
        };

        for y in r.y..r.bottom() {
            let sy = ((y - dest.y) as i64 * image.height as i64 / dest.h as i64) as u32;
            let range = self.row_range(r.x, y, r.w);
            for (i, px) in self.frame[range].chunks_exact_mut(4).enumerate() {
                let x = r.x + i as i32;
                let sx = ((x - dest.x) as i64 * image.width as i64 / dest.w as i64) as u32;
                let src = image.pixel(sx, sy);
                match src[3] {
                    0 => {}
                    255 => px.copy_from_slice(&src),
                    a => blend_pixel(px, src, a),
                }
            }
        }
    }
}

fn blend_pixel(px: &mut [u8], color: Color, alpha: u8) {
    let a = alpha as u32;
    let inv = 255 - a;
    for c in 0..3 {
        px[c] = ((px[c] as u32 * inv + color[c] as u32 * a + 127) / 255) as u8;
    }
    px[3] = 255;
}

fn glyph_rows(ch: char) -> [u8; GLYPH_H as usize] {
    let c = ch.to_ascii_uppercase();
    match c {
        // Digits
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],

        // Letters
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],

        // Punctuation
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        '>' => [0b100, 0b010, 0b001, 0b010, 0b100],

        // Extras used in formatting.
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],

        _ => [0b111, 0b001, 0b010, 0b000, 0b010], // '?'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_width_ignores_trailing_gap() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 2), 6);
        assert_eq!(text_width("AB", 2), 14);
        assert_eq!(text_width("AB\nABCD", 1), 15);
    }

    #[test]
    fn unknown_glyphs_render_as_question_mark() {
        assert_eq!(glyph_rows('~'), glyph_rows('?'));
        assert_eq!(glyph_rows('a'), glyph_rows('A'));
    }

    #[test]
    fn blend_pixel_rounds_toward_nearest() {
        let mut px = [0u8, 0, 0, 255];
        blend_pixel(&mut px, [255, 255, 255, 255], 128);
        assert_eq!(px, [128, 128, 128, 255]);
    }
}
