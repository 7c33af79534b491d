// A small Canvas-2D-like drawing API and its software rasterizer.
// The overlay paints through the `Surface` trait only, so tests can record calls
// while the app paints real pixels into a `FrameBuffer`.

use crate::fx;
use crate::gamma::GammaLut;
use crate::types::{FrameBuffer, Point, Rect, Rgba};

/// Stroke style: color + line width in pixels (like `strokeStyle` / `lineWidth`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    pub color: Rgba,
    pub width: f32,
}

impl Pen {
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// The drawing operations the overlay needs.
pub trait Surface {
    /// One path through `points`, stroked once.
    fn stroke_polyline(&mut self, points: &[Point], pen: Pen);
    /// Full circle outline.
    fn stroke_circle(&mut self, center: Point, radius: f32, pen: Pen);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, pen: Pen);
    /// Rectangle outline with a soft halo of `blur` pixels behind it
    /// (a stroke with `shadowBlur` / `shadowColor` set).
    fn stroke_rect_glow(&mut self, rect: Rect, pen: Pen, blur: f32, glow: Rgba);
}

/* ---------- Software rasterizer ---------- */

#[inline]
fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Squared distance from (px,py) to the segment a-b.
#[inline]
fn dist2_to_segment(px: f32, py: f32, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 { (((px - a.x) * dx + (py - a.y) * dy) / len2).clamp(0.0, 1.0) } else { 0.0 };
    let (qx, qy) = (a.x + dx * t - px, a.y + dy * t - py);
    qx * qx + qy * qy
}

/// Clamp a float span [lo, hi] to pixel indices inside 0..n. None if empty.
#[inline]
fn pixel_span(lo: f32, hi: f32, n: usize) -> Option<(usize, usize)> {
    if n == 0 { return None; }
    let lo = lo.floor().max(0.0);
    let hi = hi.ceil().min(n as f32 - 1.0);
    if lo > hi { return None; }
    Some((lo as usize, hi as usize))
}

/// Collect every pixel within `half` of the polyline. Pixels are sampled at
/// integer coordinates, so a 1-px line at x=50 covers exactly column 50.
fn polyline_coverage(w: usize, h: usize, points: &[Point], half: f32, out: &mut Vec<usize>) {
    let h2 = half * half;
    let segments: Vec<(Point, Point)> = match points {
        [p] => vec![(*p, *p)],
        _ => points.windows(2).map(|s| (s[0], s[1])).collect(),
    };
    for (a, b) in segments {
        if !finite(a) || !finite(b) { continue; }
        let Some((x0, x1)) = pixel_span(a.x.min(b.x) - half, a.x.max(b.x) + half, w) else { continue };
        let Some((y0, y1)) = pixel_span(a.y.min(b.y) - half, a.y.max(b.y) + half, h) else { continue };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if dist2_to_segment(x as f32, y as f32, a, b) <= h2 {
                    out.push(y * w + x);
                }
            }
        }
    }
}

impl FrameBuffer {
    /// Blend `color` once into each listed pixel (duplicates collapse first).
    /// Visual: overlapping parts of one stroke are no darker than the rest.
    fn blend_covered(&mut self, covered: &mut Vec<usize>, color: Rgba) {
        covered.sort_unstable();
        covered.dedup();
        let lut = GammaLut::shared();
        for &i in covered.iter() {
            self.pixels[i] = lut.blend(self.pixels[i], color);
        }
    }
}

impl Surface for FrameBuffer {
    fn stroke_polyline(&mut self, points: &[Point], pen: Pen) {
        if points.is_empty() || !(pen.width > 0.0) { return; }
        let half = (pen.width / 2.0).max(0.5);
        let mut covered = Vec::new();
        polyline_coverage(self.width, self.height, points, half, &mut covered);
        self.blend_covered(&mut covered, pen.color);
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, pen: Pen) {
        if !finite(center) || !radius.is_finite() || !(pen.width > 0.0) { return; }
        let radius = radius.max(0.0);
        let half = (pen.width / 2.0).max(0.5);
        let outer = radius + half;
        let Some((x0, x1)) = pixel_span(center.x - outer, center.x + outer, self.width) else { return };
        let Some((y0, y1)) = pixel_span(center.y - outer, center.y + outer, self.height) else { return };

        let mut covered = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - center.x;
                let dy = y as f32 - center.y;
                if ((dx * dx + dy * dy).sqrt() - radius).abs() <= half {
                    covered.push(y * self.width + x);
                }
            }
        }
        self.blend_covered(&mut covered, pen.color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let (x_lo, x_hi) = (rect.x.min(rect.x + rect.w), rect.x.max(rect.x + rect.w));
        let (y_lo, y_hi) = (rect.y.min(rect.y + rect.h), rect.y.max(rect.y + rect.h));
        if !(x_lo.is_finite() && x_hi.is_finite() && y_lo.is_finite() && y_hi.is_finite()) { return; }

        // Half-open pixel range [round(lo), round(hi)) clipped to the buffer.
        let x0 = x_lo.round().max(0.0) as usize;
        let x1 = (x_hi.round().max(0.0) as usize).min(self.width);
        let y0 = y_lo.round().max(0.0) as usize;
        let y1 = (y_hi.round().max(0.0) as usize).min(self.height);

        let lut = GammaLut::shared();
        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                self.pixels[row + x] = lut.blend(self.pixels[row + x], color);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, pen: Pen) {
        self.stroke_polyline(&rect.outline(), pen);
    }

    fn stroke_rect_glow(&mut self, rect: Rect, pen: Pen, blur: f32, glow: Rgba) {
        // Halo first so the crisp stroke sits on top of it.
        fx::glow_polyline(self, &rect.outline(), blur, glow);
        self.stroke_rect(rect, pen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    fn lit(fb: &FrameBuffer) -> usize {
        fb.pixels.iter().filter(|&&p| p != 0).count()
    }

    #[test]
    fn one_pixel_vertical_line_covers_one_column() {
        let mut fb = FrameBuffer::new(100, 20);
        fb.stroke_polyline(&[Point::new(50.0, 0.0), Point::new(50.0, 20.0)], Pen::new(WHITE, 1.0));
        assert_eq!(lit(&fb), 20);
        assert!((0..20).all(|y| fb.pixel(50, y) == Some(0x00FF_FFFF)));
    }

    #[test]
    fn three_pixel_line_is_three_wide() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.stroke_polyline(&[Point::new(0.0, 10.0), Point::new(19.0, 10.0)], Pen::new(WHITE, 3.0));
        assert_eq!(lit(&fb), 20 * 3);
    }

    #[test]
    fn polyline_joints_are_blended_once() {
        // Translucent L: the corner pixel must match the arm pixels.
        let mut fb = FrameBuffer::new(40, 40);
        let pen = Pen::new(Rgba::new(255, 255, 255, 0.5), 3.0);
        fb.stroke_polyline(&[Point::new(10.0, 30.0), Point::new(10.0, 10.0), Point::new(30.0, 10.0)], pen);
        assert_eq!(fb.pixel(10, 10), fb.pixel(20, 10));
        assert_eq!(fb.pixel(10, 10), fb.pixel(10, 20));
    }

    #[test]
    fn circle_ring_lies_at_radius() {
        let mut fb = FrameBuffer::new(100, 100);
        fb.stroke_circle(Point::new(50.0, 50.0), 30.0, Pen::new(WHITE, 3.0));
        assert_ne!(fb.pixel(80, 50), Some(0));
        assert_ne!(fb.pixel(50, 20), Some(0));
        assert_eq!(fb.pixel(50, 50), Some(0));
        assert_eq!(fb.pixel(50, 45), Some(0));
    }

    #[test]
    fn fill_rect_is_half_open_and_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_rect(Rect::new(2.0, 2.0, 3.0, 4.0), WHITE);
        assert_eq!(lit(&fb), 12);
        fb.fill_rect(Rect::new(-5.0, 8.0, 100.0, 100.0), WHITE);
        assert_eq!(lit(&fb), 12 + 20);
    }

    #[test]
    fn degenerate_and_zero_sized_inputs_do_not_panic() {
        let mut empty = FrameBuffer::new(0, 0);
        empty.stroke_polyline(&[Point::new(0.0, 0.0), Point::new(0.0, 0.0)], Pen::new(WHITE, 1.0));
        empty.stroke_circle(Point::new(0.0, 0.0), 30.0, Pen::new(WHITE, 3.0));
        empty.fill_rect(Rect::new(-40.0, -140.0, 80.0, 80.0), WHITE);
        empty.stroke_rect_glow(Rect::new(-40.0, -140.0, 80.0, 80.0), Pen::new(WHITE, 2.0), 20.0, WHITE);

        let mut fb = FrameBuffer::new(5, 5);
        fb.stroke_polyline(&[Point::new(f32::NAN, 0.0), Point::new(2.0, 2.0)], Pen::new(WHITE, 1.0));
        fb.fill_rect(Rect::new(0.0, 0.0, f32::INFINITY, 1.0), WHITE);
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn glow_rect_lights_pixels_outside_the_stroke() {
        let mut plain = FrameBuffer::new(120, 120);
        let mut glowing = FrameBuffer::new(120, 120);
        let rect = Rect::new(20.0, 20.0, 80.0, 80.0);
        let pen = Pen::new(Rgba::new(0, 245, 255, 0.8), 2.0);
        plain.stroke_rect(rect, pen);
        glowing.stroke_rect_glow(rect, pen, 20.0, Rgba::new(0, 245, 255, 0.8));
        assert_eq!(plain.pixel(20, 14), Some(0));
        assert_ne!(glowing.pixel(20, 14), Some(0));
    }
}
