// Blocking notification (the native stand-in for a browser `alert`).
// Visual: the page dims, a panel with the message appears, and nothing else
// reacts until the user dismisses it.

use crate::draw::{self, GLYPH_H, Input};
use crate::error::Error;
use crate::surface::{Pen, Surface};
use crate::types::{FrameBuffer, Rect, Rgba};

pub const CAMERA_DENIED_MESSAGE: &str = "Unable to access camera. Please ensure you have granted \
camera permissions and are using a device with a camera.";

const PANEL_W: f32 = 560.0;
const TEXT_SCALE: i32 = 2;
const LINE_GAP: i32 = 8;
const MAX_CHARS: usize = 42;

#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub title: String,
    pub lines: Vec<String>,
}

impl Notice {
    pub fn new(title: &str, message: &str) -> Self {
        Self { title: title.into(), lines: draw::wrap_text(message, MAX_CHARS) }
    }

    /// The notice shown when `start` fails. Only camera errors reach the user.
    pub fn for_error(err: &Error) -> Option<Self> {
        match err {
            Error::CameraAccess(_) => Some(Self::new("Camera", CAMERA_DENIED_MESSAGE)),
            _ => None,
        }
    }

    /// Enter, Escape or a click dismisses.
    pub fn dismissed_by(input: &Input) -> bool {
        input.enter || input.escape || input.clicked
    }

    /// Paint the notice on top of whatever is already in `fb`.
    pub fn draw(&self, fb: &mut FrameBuffer) {
        let (w, h) = (fb.width as f32, fb.height as f32);
        fb.fill_rect(Rect::new(0.0, 0.0, w, h), Rgba::new(0, 0, 0, 0.6));

        let line_h = GLYPH_H * TEXT_SCALE + LINE_GAP;
        let panel_h = (self.lines.len() as i32 + 4) * line_h + 24;
        let panel = Rect::new((w - PANEL_W) / 2.0, (h - panel_h as f32) / 2.0, PANEL_W, panel_h as f32);
        fb.fill_rect(panel, Rgba::new(16, 20, 36, 0.95));
        fb.stroke_rect(panel, Pen::new(Rgba::new(255, 107, 107, 0.9), 2.0));

        let cx = panel.center().x as i32;
        let mut y = panel.y as i32 + 20;
        draw::draw_text_centered(fb, cx, y, &self.title, TEXT_SCALE + 1, Rgba::new(255, 107, 107, 1.0));
        y += line_h * 2;
        for line in &self.lines {
            draw::draw_text_centered(fb, cx, y, line, TEXT_SCALE, Rgba::opaque(0x00F0_F4FF));
            y += line_h;
        }
        y += LINE_GAP;
        draw::draw_text_centered(fb, cx, y, "Press Enter to close", 1, Rgba::new(160, 170, 200, 1.0));
    }
}
