// FX: soft glow, fully software-drawn with additive blending.
// Visual outcome: a stroked outline gets a cyan halo that fades out over `blur` pixels,
// like a canvas `shadowBlur` on a stroke.

use crate::types::{FrameBuffer, Point, Rgba};

/// Stamp spacing along a path, in pixels.
const STAMP_STEP: f32 = 2.0;

/// Additive blend one RGB triplet at (x,y) with saturation to 255.
/// Visual: the pixel gets brighter/colored; repeated draws stack until white.
#[inline]
fn add_rgb_saturating(fb: &mut FrameBuffer, x: i32, y: i32, r: u8, g: u8, b: u8) {
    if x < 0 || y < 0 { return; }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height { return; }

    let idx = y * fb.width + x;
    let old = fb.pixels[idx];

    let or = ((old >> 16) & 0xFF) as u16;
    let og = ((old >> 8)  & 0xFF) as u16;
    let ob = ( old        & 0xFF) as u16;

    let nr = (or + r as u16).min(255) as u32;
    let ng = (og + g as u16).min(255) as u32;
    let nb = (ob + b as u16).min(255) as u32;

    fb.pixels[idx] = (nr << 16) | (ng << 8) | nb;
}

/// Draw a soft round glow disc centered at (cx,cy) with additive blending.
/// Gaussian falloff with sigma = radius/2; `strength` scales the peak.
/// Visual: a fuzzy dot of light. Nearby pixels brighten more than far pixels.
pub fn draw_additive_disc(fb: &mut FrameBuffer, cx: i32, cy: i32, radius: i32, color: Rgba, strength: f32) {
    if radius <= 0 || strength <= 0.0 { return; }
    let r = radius;
    let r2 = (r * r) as f32;
    let sigma = (r as f32) * 0.5;
    let denom = 2.0 * sigma * sigma;

    // Scan the bounding box, clipped to the buffer
    let y_lo = (cy - r).max(0);
    let y_hi = (cy + r).min(fb.height as i32 - 1);
    let x_lo = (cx - r).max(0);
    let x_hi = (cx + r).min(fb.width as i32 - 1);
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            let d2 = dx * dx + dy * dy;
            if d2 > r2 { continue; }

            let w = (-d2 / denom).exp() * strength;
            let cr = (color.r as f32 * w).round().clamp(0.0, 255.0) as u8;
            let cg = (color.g as f32 * w).round().clamp(0.0, 255.0) as u8;
            let cb = (color.b as f32 * w).round().clamp(0.0, 255.0) as u8;
            add_rgb_saturating(fb, x, y, cr, cg, cb);
        }
    }
}

/// Glow along a polyline: discs stamped every ~2 px, normalized so a straight
/// run peaks at roughly `color.a` of the glow color.
/// Visual: a halo hugging the path, strongest on the line, gone `blur` px away.
pub fn glow_polyline(fb: &mut FrameBuffer, points: &[Point], blur: f32, color: Rgba) {
    if !blur.is_finite() || blur < 1.0 || points.len() < 2 { return; }
    let radius = blur.round() as i32;
    let sigma = blur * 0.5;
    let strength = color.a * STAMP_STEP / (sigma * (2.0 * std::f32::consts::PI).sqrt());

    for seg in points.windows(2) {
        let (p0, p1) = (seg[0], seg[1]);
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if !dist.is_finite() { continue; }
        let steps = (dist / STAMP_STEP).ceil().max(1.0) as i32;
        // Skip the last stamp of each segment; the next segment starts there.
        for i in 0..steps {
            let t = i as f32 / steps as f32;
            let x = (p0.x + dx * t).round() as i32;
            let y = (p0.y + dy * t).round() as i32;
            draw_additive_disc(fb, x, y, radius, color, strength);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CYAN: Rgba = Rgba::new(0, 245, 255, 0.8);

    #[test]
    fn disc_is_brightest_at_center() {
        let mut fb = FrameBuffer::new(21, 21);
        draw_additive_disc(&mut fb, 10, 10, 8, CYAN, 1.0);
        let center = fb.pixel(10, 10).unwrap_or(0) & 0xFF;
        let edge = fb.pixel(17, 10).unwrap_or(0) & 0xFF;
        assert_eq!(center, 255);
        assert!(edge < center);
        assert_eq!(fb.pixel(0, 0), Some(0)); // outside the radius
    }

    #[test]
    fn disc_clips_at_buffer_edges() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_additive_disc(&mut fb, -2, -2, 5, CYAN, 1.0);
        draw_additive_disc(&mut fb, 100, 100, 5, CYAN, 1.0);
        assert!(fb.pixel(0, 0).unwrap_or(0) > 0);
    }

    #[test]
    fn glow_fades_away_from_the_path() {
        let mut fb = FrameBuffer::new(200, 100);
        let path = [Point::new(20.0, 50.0), Point::new(180.0, 50.0)];
        glow_polyline(&mut fb, &path, 20.0, CYAN);
        let on = fb.pixel(100, 50).unwrap_or(0) & 0xFF;
        let near = fb.pixel(100, 58).unwrap_or(0) & 0xFF;
        let far = fb.pixel(100, 5).unwrap_or(0) & 0xFF;
        assert!(on > near, "on={on} near={near}");
        assert!(near > far);
        assert_eq!(far, 0);
        // Peak stays near the requested intensity instead of saturating.
        assert!(on < 255, "on={on}");
    }

    #[test]
    fn zero_blur_draws_nothing() {
        let mut fb = FrameBuffer::new(10, 10);
        glow_polyline(&mut fb, &[Point::new(0.0, 0.0), Point::new(9.0, 9.0)], 0.0, CYAN);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }
}
