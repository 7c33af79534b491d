// Window + text drawing utilities.
// Visual effects provided here:
// 1) A window that shows either the product page or the live AR canvas.
// 2) One `Input` snapshot per frame (pointer, clicks, wheel, keys).
// 3) A tiny 5x7 bitmap font to render page text and the AR HUD.

use crate::error::Error;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Rgba};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, ScaleMode, Window, WindowOptions};

/// Everything the app reads from the window in one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Input {
    /// Pointer in window pixels, if it is over the window.
    pub mouse: Option<(f32, f32)>,
    /// Left button went down this frame.
    pub clicked: bool,
    /// Wheel movement; positive scrolls the page down.
    pub wheel: f32,
    pub escape: bool,
    pub enter: bool,
    /// Nav shortcut 1..=3 pressed (0-based index).
    pub nav: Option<usize>,
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    mouse_was_down: bool,
}

impl Drawer {
    /// Create a fixed-size window; buffers of other sizes (the camera canvas)
    /// are stretched to fit, keeping their aspect ratio.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions {
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, mouse_was_down: false })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current window size in pixels.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Read pointer, wheel and keys for this frame.
    pub fn poll(&mut self) -> Input {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let clicked = down && !self.mouse_was_down;
        self.mouse_was_down = down;

        let nav = [Key::Key1, Key::Key2, Key::Key3]
            .iter()
            .position(|&k| self.window.is_key_pressed(k, KeyRepeat::No));

        Input {
            mouse: self.window.get_mouse_pos(MouseMode::Discard),
            clicked,
            // minifb reports wheel-up as positive; the page scrolls down on wheel-down.
            wheel: self.window.get_scroll_wheel().map_or(0.0, |(_, dy)| -dy),
            escape: self.window.is_key_pressed(Key::Escape, KeyRepeat::No),
            enter: self.window.is_key_pressed(Key::Enter, KeyRepeat::No),
            nav,
        }
    }
}

/* ---------- Text: tiny bitmap font ---------- */

pub const GLYPH_W: i32 = 5;
pub const GLYPH_H: i32 = 7;
/// Horizontal advance per character in font units (glyph + 1 spacing).
pub const ADVANCE: i32 = 6;

/// Return a 5x7 glyph bitmap. Lowercase maps to uppercase; unknown chars render blank.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '$' => g!(0b00100,0b01111,0b10100,0b01110,0b00101,0b11110,0b00100),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '&' => g!(0b01100,0b10010,0b10100,0b01000,0b10101,0b10010,0b01101),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Fill one `scale`x`scale` font cell, blending `color` in.
fn put_cell(fb: &mut FrameBuffer, x: i32, y: i32, scale: i32, color: Rgba, lut: &GammaLut) {
    for dy in 0..scale {
        for dx in 0..scale {
            let (px, py) = (x + dx, y + dy);
            if px < 0 || py < 0 || px as usize >= fb.width || py as usize >= fb.height { continue; }
            let idx = py as usize * fb.width + px as usize;
            fb.pixels[idx] = lut.blend(fb.pixels[idx], color);
        }
    }
}

/// Draw a single glyph at (x,y), each font pixel `scale` screen pixels wide.
/// Visual: the glyph with a 1-cell dark shadow for contrast.
fn draw_char(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, scale: i32, color: Rgba) {
    let Some(rows) = glyph5x7(ch) else { return };
    let lut = GammaLut::shared();
    let shadow = Rgba::new(0, 0, 0, color.a * 0.6);

    // Shadow pass first, then the glyph in the chosen color
    for (pass_color, off) in [(shadow, scale.max(1) / 2 + 1), (color, 0)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..GLYPH_W {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    let cx = x + rx * scale + off;
                    let cy = y + ry as i32 * scale + off;
                    put_cell(fb, cx, cy, scale, pass_color, lut);
                }
            }
        }
    }
}

/// Draw a text string at (x,y) (top-left), glyphs scaled by `scale`.
pub fn draw_text(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, scale: i32, color: Rgba) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char(fb, x, y, ch, scale, color);
        x += ADVANCE * scale;
    }
}

/// Width in pixels `text` occupies at `scale` (no trailing spacing).
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * ADVANCE - 1) * scale.max(1) }
}

/// Draw text horizontally centered on `cx`.
pub fn draw_text_centered(fb: &mut FrameBuffer, cx: i32, y: i32, text: &str, scale: i32, color: Rgba) {
    draw_text(fb, cx - text_width(text, scale) / 2, y, text, scale, color);
}

/// Greedy word wrap to at most `max_chars` per line; long words are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() { lines.push(std::mem::take(&mut line)); }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() { line.push(' '); }
        line.extend(word);
    }
    if !line.is_empty() { lines.push(line); }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_letter_and_digit_has_a_glyph() {
        for ch in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
            assert!(glyph5x7(ch).is_some(), "missing glyph for {ch:?}");
        }
        assert!(glyph5x7('~').is_none());
    }

    #[test]
    fn text_width_counts_advance() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("A", 1), 5);
        assert_eq!(text_width("AB", 2), 22);
    }

    #[test]
    fn drawing_text_lights_pixels_and_clips() {
        let mut fb = FrameBuffer::new(40, 10);
        draw_text(&mut fb, 1, 1, "HI", 1, Rgba::opaque(0x00FF_FFFF));
        assert_eq!(fb.pixel(1, 1), Some(0x00FF_FFFF)); // top-left of 'H'
        draw_text(&mut fb, 35, 5, "WWWW", 3, Rgba::opaque(0x00FF_FFFF));
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("Unable to access camera. Please ensure you have granted camera permissions", 20);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), "Unable to access camera. Please ensure you have granted camera permissions");
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
