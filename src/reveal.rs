// Scroll-triggered fade-ins.
// `RevealObserver` is the visibility event source: the page registers element
// boxes, feeds it the viewport each frame, and gets back the elements that just
// came into view. Each element is reported once, then forgotten.

use crate::types::Rect;

pub type ElementId = usize;

/// Fraction of an element that must be visible before it counts.
pub const REVEAL_THRESHOLD: f32 = 0.1;
/// The viewport's bottom edge is pulled up by this much (px) for the test.
pub const REVEAL_BOTTOM_MARGIN: f32 = 50.0;
/// Length of the "fade in up" animation.
pub const FADE_SECONDS: f32 = 0.6;
/// How far below its resting place an element starts (px).
pub const FADE_RISE: f32 = 30.0;

#[derive(Clone, Debug)]
pub struct RevealObserver {
    threshold: f32,
    bottom_margin: f32,
    observed: Vec<(ElementId, Rect)>,
}

impl Default for RevealObserver {
    fn default() -> Self {
        Self::new(REVEAL_THRESHOLD, REVEAL_BOTTOM_MARGIN)
    }
}

impl RevealObserver {
    pub fn new(threshold: f32, bottom_margin: f32) -> Self {
        Self { threshold, bottom_margin, observed: Vec::new() }
    }

    /// Watch `bounds` (page coordinates). Re-observing an id replaces its box.
    pub fn observe(&mut self, id: ElementId, bounds: Rect) {
        self.unobserve(id);
        self.observed.push((id, bounds));
    }

    pub fn unobserve(&mut self, id: ElementId) {
        self.observed.retain(|(other, _)| *other != id);
    }

    /// Report (and stop watching) every element at least `threshold` visible
    /// inside `viewport` minus the bottom margin.
    pub fn poll(&mut self, viewport: Rect) -> Vec<ElementId> {
        let root = Rect { h: (viewport.h - self.bottom_margin).max(0.0), ..viewport };
        let mut hits = Vec::new();
        let threshold = self.threshold;
        self.observed.retain(|(id, bounds)| {
            let area = bounds.w * bounds.h;
            let visible = if area > 0.0 {
                let ratio = bounds.intersection_area(&root) / area;
                ratio > 0.0 && ratio >= threshold
            } else {
                root.contains(bounds.center())
            };
            if visible { hits.push(*id); }
            !visible
        });
        hits
    }
}

/// Where an element is in its fade-in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reveal {
    Hidden,
    /// Animation began at this page time (seconds).
    Fading { since: f32 },
    Shown,
}

impl Reveal {
    /// Begin the animation (only from `Hidden`).
    pub fn start(&mut self, now: f32) {
        if *self == Reveal::Hidden {
            *self = Reveal::Fading { since: now };
        }
    }

    /// Advance; returns (opacity, vertical offset in px) for drawing.
    pub fn sample(&mut self, now: f32) -> (f32, f32) {
        match *self {
            Reveal::Hidden => (0.0, FADE_RISE),
            Reveal::Shown => (1.0, 0.0),
            Reveal::Fading { since } => {
                let t = ((now - since) / FADE_SECONDS).clamp(0.0, 1.0);
                if t >= 1.0 {
                    *self = Reveal::Shown;
                    return (1.0, 0.0);
                }
                let k = ease(t);
                (k, FADE_RISE * (1.0 - k))
            }
        }
    }
}

/// CSS `ease`, i.e. cubic-bezier(0.25, 0.1, 0.25, 1.0), at progress `t`.
pub fn ease(t: f32) -> f32 {
    cubic_bezier(0.25, 0.1, 0.25, 1.0, t)
}

fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let coord = |a: f32, b: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * s * a + 3.0 * u * s * s * b + s * s * s
    };
    let slope = |a: f32, b: f32, s: f32| {
        let u = 1.0 - s;
        3.0 * u * u * a + 6.0 * u * s * (b - a) + 3.0 * s * s * (1.0 - b)
    };

    // Solve x(s) = t for s (Newton, then bisection when the slope is flat).
    let mut s = t;
    for _ in 0..8 {
        let err = coord(x1, x2, s) - t;
        let d = slope(x1, x2, s);
        if err.abs() < 1e-5 { return coord(y1, y2, s); }
        if d.abs() < 1e-6 { break; }
        s = (s - err / d).clamp(0.0, 1.0);
    }
    let (mut lo, mut hi) = (0.0f32, 1.0f32);
    s = t;
    for _ in 0..32 {
        let x = coord(x1, x2, s);
        if (x - t).abs() < 1e-5 { break; }
        if x < t { lo = s; } else { hi = s; }
        s = (lo + hi) / 2.0;
    }
    coord(y1, y2, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(scroll: f32) -> Rect {
        Rect::new(0.0, scroll, 1280.0, 720.0)
    }

    #[test]
    fn element_below_the_fold_is_not_reported() {
        let mut obs = RevealObserver::default();
        obs.observe(1, Rect::new(100.0, 900.0, 300.0, 200.0));
        assert!(obs.poll(viewport(0.0)).is_empty());
        assert!(obs.observed.iter().any(|(id, _)| *id == 1));
    }

    #[test]
    fn element_fires_once_after_scrolling_in() {
        let mut obs = RevealObserver::default();
        obs.observe(1, Rect::new(100.0, 900.0, 300.0, 200.0));
        assert_eq!(obs.poll(viewport(400.0)), vec![1]);
        assert!(!obs.observed.iter().any(|(id, _)| *id == 1));
        assert!(obs.poll(viewport(400.0)).is_empty());
    }

    #[test]
    fn bottom_margin_and_threshold_apply() {
        let mut obs = RevealObserver::default();
        // 200px tall box whose top is 40px above the viewport bottom: all 40px
        // fall inside the 50px margin, so nothing counts yet.
        obs.observe(7, Rect::new(0.0, 680.0, 100.0, 200.0));
        assert!(obs.poll(viewport(0.0)).is_empty());
        // 15px inside the shrunk root: 7.5% < 10%.
        assert!(obs.poll(viewport(25.0)).is_empty());
        // 30px inside: 15% >= 10%.
        assert_eq!(obs.poll(viewport(40.0)), vec![7]);
    }

    #[test]
    fn reobserve_replaces_bounds() {
        let mut obs = RevealObserver::default();
        obs.observe(3, Rect::new(0.0, 5000.0, 10.0, 10.0));
        obs.observe(3, Rect::new(0.0, 10.0, 10.0, 10.0));
        assert_eq!(obs.poll(viewport(0.0)), vec![3]);
    }

    #[test]
    fn fade_runs_from_hidden_to_shown() {
        let mut r = Reveal::Hidden;
        assert_eq!(r.sample(0.0), (0.0, FADE_RISE));
        r.start(1.0);
        let (mid_alpha, mid_rise) = r.sample(1.3);
        assert!(mid_alpha > 0.0 && mid_alpha < 1.0);
        assert!(mid_rise > 0.0 && mid_rise < FADE_RISE);
        assert_eq!(r.sample(1.7), (1.0, 0.0));
        assert_eq!(r, Reveal::Shown);
        r.start(5.0); // no restart once shown
        assert_eq!(r, Reveal::Shown);
    }

    #[test]
    fn ease_endpoints_and_shape() {
        assert!(ease(0.0).abs() < 1e-4);
        assert!((ease(1.0) - 1.0).abs() < 1e-4);
        // CSS ease is front-loaded: well past halfway at t = 0.5.
        let mid = ease(0.5);
        assert!(mid > 0.75 && mid < 0.85, "ease(0.5) = {mid}");
        assert!(ease(0.25) < ease(0.5) && ease(0.5) < ease(0.75));
    }
}
