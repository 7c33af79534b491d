//! The simulated "AR" overlay painted over every camera frame.
//!
//! Layers, bottom to top: a 50 px grid, a pulsing ring at the center, four
//! L-shaped corner brackets that open toward the center, and a glowing square
//! floating 100 px above the center. The result depends only on
//! `(width, height, time)`; nothing is remembered between frames.

use crate::surface::{Pen, Surface};
use crate::types::{Point, Rect, Rgba};

pub const GRID_SPACING: usize = 50;
pub const RING_BASE_RADIUS: f32 = 30.0;
pub const RING_PULSE_AMPLITUDE: f32 = 10.0;
/// Angular speed of the pulse (rad/s); period is pi seconds.
pub const RING_PULSE_RATE: f32 = 2.0;
pub const CORNER_SIZE: f32 = 20.0;
pub const HIGHLIGHT_SIZE: f32 = 80.0;
/// How far above the center the highlight floats.
pub const HIGHLIGHT_LIFT: f32 = 100.0;
pub const HIGHLIGHT_GLOW_BLUR: f32 = 20.0;

const GRID_PEN: Pen = Pen::new(Rgba::new(0, 245, 255, 0.3), 1.0);
const RING_PEN: Pen = Pen::new(Rgba::new(0, 245, 255, 0.8), 3.0);
const CORNER_PEN: Pen = Pen::new(Rgba::new(255, 107, 107, 0.8), 3.0);
const HIGHLIGHT_FILL: Rgba = Rgba::new(0, 245, 255, 0.2);
const HIGHLIGHT_PEN: Pen = Pen::new(Rgba::new(0, 245, 255, 0.8), 2.0);
const HIGHLIGHT_GLOW: Rgba = Rgba::new(0, 245, 255, 0.8);

/// Ring radius at `time_seconds`: 30 + 10·sin(2t), always within [20, 40].
pub fn ring_radius(time_seconds: f32) -> f32 {
    RING_BASE_RADIUS + RING_PULSE_AMPLITUDE * (RING_PULSE_RATE * time_seconds).sin()
}

/// Grid line positions along an axis of `len` pixels: 0, 50, 100, … < len.
pub fn grid_positions(len: usize) -> impl Iterator<Item = usize> {
    (0..len).step_by(GRID_SPACING)
}

/// Which way a corner bracket opens (toward the canvas center).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Pick the bracket shape by comparing the marker with the canvas midpoint.
    /// A marker exactly on a midpoint falls through to `BottomRight`; markers
    /// are always placed off-center, so that case only happens on tiny canvases.
    pub fn for_marker(x: f32, y: f32, width: f32, height: f32) -> Self {
        let (mx, my) = (width / 2.0, height / 2.0);
        if x < mx && y < my {
            Corner::TopLeft
        } else if x > mx && y < my {
            Corner::TopRight
        } else if x < mx && y > my {
            Corner::BottomLeft
        } else {
            Corner::BottomRight
        }
    }

    /// Unit direction the open side faces: (+1,+1) means toward +x and +y.
    pub fn opening(self) -> (i8, i8) {
        match self {
            Corner::TopLeft => (1, 1),
            Corner::TopRight => (-1, 1),
            Corner::BottomLeft => (1, -1),
            Corner::BottomRight => (-1, -1),
        }
    }

    /// The three points of the "L": one arm end, the elbow at (x,y), the other arm end.
    pub fn bracket(self, x: f32, y: f32, size: f32) -> [Point; 3] {
        let (ox, oy) = self.opening();
        let (ox, oy) = (ox as f32 * size, oy as f32 * size);
        match self {
            // Vertical arm first, then horizontal.
            Corner::TopLeft | Corner::BottomLeft => {
                [Point::new(x, y + oy), Point::new(x, y), Point::new(x + ox, y)]
            }
            // Horizontal arm first, then vertical.
            Corner::TopRight | Corner::BottomRight => {
                [Point::new(x + ox, y), Point::new(x, y), Point::new(x, y + oy)]
            }
        }
    }
}

/// Paint the whole overlay onto `surface` for one frame.
pub fn render<S: Surface + ?Sized>(surface: &mut S, width: usize, height: usize, time_seconds: f32) {
    let (w, h) = (width as f32, height as f32);

    // 1) Grid
    for x in grid_positions(width) {
        let x = x as f32;
        surface.stroke_polyline(&[Point::new(x, 0.0), Point::new(x, h)], GRID_PEN);
    }
    for y in grid_positions(height) {
        let y = y as f32;
        surface.stroke_polyline(&[Point::new(0.0, y), Point::new(w, y)], GRID_PEN);
    }

    // 2) Pulsing ring
    let center = Point::new(w / 2.0, h / 2.0);
    surface.stroke_circle(center, ring_radius(time_seconds), RING_PEN);

    // 3) Corner markers
    let s = CORNER_SIZE;
    for (x, y) in [(s, s), (w - s, s), (s, h - s), (w - s, h - s)] {
        draw_corner_marker(surface, x, y, w, h, s);
    }

    // 4) Floating highlight square with glow
    let square = Rect::centered(Point::new(center.x, center.y - HIGHLIGHT_LIFT), HIGHLIGHT_SIZE, HIGHLIGHT_SIZE);
    surface.fill_rect(square, HIGHLIGHT_FILL);
    surface.stroke_rect(square, HIGHLIGHT_PEN);
    surface.stroke_rect_glow(square, HIGHLIGHT_PEN, HIGHLIGHT_GLOW_BLUR, HIGHLIGHT_GLOW);
}

fn draw_corner_marker<S: Surface + ?Sized>(surface: &mut S, x: f32, y: f32, width: f32, height: f32, size: f32) {
    let corner = Corner::for_marker(x, y, width, height);
    surface.stroke_polyline(&corner.bracket(x, y, size), CORNER_PEN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameBuffer;
    use proptest::prelude::*;

    /// Records every call instead of drawing.
    #[derive(Debug, PartialEq)]
    enum Op {
        Polyline(Vec<Point>, Pen),
        Circle(Point, f32, Pen),
        Fill(Rect, Rgba),
        Stroke(Rect, Pen),
        Glow(Rect, Pen, f32, Rgba),
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Surface for Recorder {
        fn stroke_polyline(&mut self, points: &[Point], pen: Pen) {
            self.ops.push(Op::Polyline(points.to_vec(), pen));
        }
        fn stroke_circle(&mut self, center: Point, radius: f32, pen: Pen) {
            self.ops.push(Op::Circle(center, radius, pen));
        }
        fn fill_rect(&mut self, rect: Rect, color: Rgba) {
            self.ops.push(Op::Fill(rect, color));
        }
        fn stroke_rect(&mut self, rect: Rect, pen: Pen) {
            self.ops.push(Op::Stroke(rect, pen));
        }
        fn stroke_rect_glow(&mut self, rect: Rect, pen: Pen, blur: f32, glow: Rgba) {
            self.ops.push(Op::Glow(rect, pen, blur, glow));
        }
    }

    fn record(width: usize, height: usize, t: f32) -> Vec<Op> {
        let mut rec = Recorder::default();
        render(&mut rec, width, height, t);
        rec.ops
    }

    #[test]
    fn full_frame_at_time_zero() {
        let ops = record(1280, 720, 0.0);

        let grid: Vec<&Vec<Point>> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Polyline(pts, pen) if *pen == GRID_PEN => Some(pts),
                _ => None,
            })
            .collect();
        let vertical: Vec<f32> = grid.iter().filter(|p| p[0].x == p[1].x).map(|p| p[0].x).collect();
        let horizontal: Vec<f32> = grid.iter().filter(|p| p[0].y == p[1].y).map(|p| p[0].y).collect();
        assert_eq!(vertical.len(), 26);
        assert_eq!(vertical.first(), Some(&0.0));
        assert_eq!(vertical.last(), Some(&1250.0));
        assert_eq!(horizontal.len(), 15);
        assert_eq!(horizontal.last(), Some(&700.0));
        assert!(grid.iter().filter(|p| p[0].x == p[1].x).all(|p| p[0].y == 0.0 && p[1].y == 720.0));

        let rings: Vec<&Op> = ops.iter().filter(|op| matches!(op, Op::Circle(..))).collect();
        assert_eq!(rings, vec![&Op::Circle(Point::new(640.0, 360.0), 30.0, RING_PEN)]);

        let brackets: Vec<&Vec<Point>> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Polyline(pts, pen) if *pen == CORNER_PEN => Some(pts),
                _ => None,
            })
            .collect();
        let expected: Vec<Vec<Point>> = [(20.0, 20.0), (1260.0, 20.0), (20.0, 700.0), (1260.0, 700.0)]
            .iter()
            .map(|&(x, y)| Corner::for_marker(x, y, 1280.0, 720.0).bracket(x, y, 20.0).to_vec())
            .collect();
        assert_eq!(brackets, expected.iter().collect::<Vec<_>>());
        assert_eq!(brackets[0], &vec![Point::new(20.0, 40.0), Point::new(20.0, 20.0), Point::new(40.0, 20.0)]);

        let square = Rect::new(600.0, 220.0, 80.0, 80.0);
        assert_eq!(square.center(), Point::new(640.0, 260.0));
        let tail = &ops[ops.len() - 3..];
        assert_eq!(tail[0], Op::Fill(square, HIGHLIGHT_FILL));
        assert_eq!(tail[1], Op::Stroke(square, HIGHLIGHT_PEN));
        assert_eq!(tail[2], Op::Glow(square, HIGHLIGHT_PEN, 20.0, HIGHLIGHT_GLOW));
        assert_eq!(ops.len(), 26 + 15 + 1 + 4 + 3);
    }

    #[test]
    fn layers_are_painted_in_order() {
        let ops = record(100, 100, 0.0);
        let first_circle = ops.iter().position(|op| matches!(op, Op::Circle(..)));
        let first_corner = ops.iter().position(|op| matches!(op, Op::Polyline(_, pen) if *pen == CORNER_PEN));
        let first_fill = ops.iter().position(|op| matches!(op, Op::Fill(..)));
        assert_eq!(first_circle, Some(4)); // after 2 + 2 grid lines
        assert!(first_circle < first_corner);
        assert!(first_corner < first_fill);
    }

    #[test]
    fn corner_orientation_by_quadrant() {
        let (w, h) = (1280.0, 720.0);
        assert_eq!(Corner::for_marker(20.0, 20.0, w, h).opening(), (1, 1));
        assert_eq!(Corner::for_marker(1260.0, 20.0, w, h).opening(), (-1, 1));
        assert_eq!(Corner::for_marker(20.0, 700.0, w, h).opening(), (1, -1));
        assert_eq!(Corner::for_marker(1260.0, 700.0, w, h).opening(), (-1, -1));
    }

    #[test]
    fn brackets_match_canvas_paths() {
        let s = 20.0;
        assert_eq!(
            Corner::TopLeft.bracket(20.0, 20.0, s),
            [Point::new(20.0, 40.0), Point::new(20.0, 20.0), Point::new(40.0, 20.0)]
        );
        assert_eq!(
            Corner::TopRight.bracket(1260.0, 20.0, s),
            [Point::new(1240.0, 20.0), Point::new(1260.0, 20.0), Point::new(1260.0, 40.0)]
        );
        assert_eq!(
            Corner::BottomLeft.bracket(20.0, 700.0, s),
            [Point::new(20.0, 680.0), Point::new(20.0, 700.0), Point::new(40.0, 700.0)]
        );
        assert_eq!(
            Corner::BottomRight.bracket(1260.0, 700.0, s),
            [Point::new(1240.0, 700.0), Point::new(1260.0, 700.0), Point::new(1260.0, 680.0)]
        );
    }

    #[test]
    fn marker_on_midpoint_falls_back_to_bottom_right() {
        assert_eq!(Corner::for_marker(20.0, 20.0, 40.0, 40.0), Corner::BottomRight);
    }

    #[test]
    fn zero_sized_canvas_draws_no_grid_and_does_not_panic() {
        let ops = record(0, 0, 1.0);
        assert!(!ops.iter().any(|op| matches!(op, Op::Polyline(_, pen) if *pen == GRID_PEN)));
        let mut fb = FrameBuffer::new(0, 0);
        render(&mut fb, 0, 0, 1.0);
    }

    #[test]
    fn raster_frame_has_grid_ring_and_corners() {
        let mut fb = FrameBuffer::new(1280, 720);
        render(&mut fb, 1280, 720, 0.0);
        assert_ne!(fb.pixel(50, 3), Some(0), "grid column");
        assert_ne!(fb.pixel(670, 360), Some(0), "ring at radius 30");
        assert_ne!(fb.pixel(30, 20), Some(0), "top-left bracket arm");
        assert_eq!(fb.pixel(640, 360), Some(0), "ring center stays clear");
        // Corner arms are coral (red dominant), grid is cyan (red absent).
        let corner = fb.pixel(20, 35).unwrap_or(0);
        assert!((corner >> 16) & 0xFF > corner & 0xFF);
    }

    #[test]
    fn ring_radius_at_zero_is_base() {
        assert_eq!(ring_radius(0.0), 30.0);
        assert!((ring_radius(std::f32::consts::FRAC_PI_4) - 40.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn ring_radius_stays_in_band(t in -1.0e4f32..1.0e4f32) {
            let r = ring_radius(t);
            prop_assert!((20.0..=40.0).contains(&r), "r({t}) = {r}");
        }

        #[test]
        fn grid_count_is_ceil_of_length_over_spacing(len in 0usize..5000) {
            prop_assert_eq!(grid_positions(len).count(), len.div_ceil(GRID_SPACING));
        }
    }
}
