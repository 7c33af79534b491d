// Page scrolling: smooth scroll toward anchors and the hero parallax.
// Visual: clicking a nav link glides the page to its section instead of jumping.

/// How fast the scroll closes the gap to its target (1/s). Higher = snappier.
const EASE_RATE: f32 = 10.0;
/// Closer than this (px) and we snap onto the target.
const SNAP: f32 = 0.5;

pub const HERO_PARALLAX: f32 = 0.5;
pub const PARTICLES_PARALLAX: f32 = 0.3;

#[derive(Clone, Debug)]
pub struct SmoothScroll {
    position: f32,
    target: f32,
    max: f32,
}

impl SmoothScroll {
    /// `max` is the furthest the page can scroll (content height minus viewport).
    pub fn new(max: f32) -> Self {
        Self { position: 0.0, target: 0.0, max: max.max(0.0) }
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    /// Glide so that `y` ends up at the top of the viewport ("block: start").
    pub fn scroll_to(&mut self, y: f32) {
        self.target = y.clamp(0.0, self.max);
    }

    /// Wheel input: nudge the target.
    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.target + dy);
    }

    /// Advance by `dt` seconds with an ease-out curve.
    pub fn update(&mut self, dt: f32) {
        let gap = self.target - self.position;
        if gap.abs() <= SNAP {
            self.position = self.target;
            return;
        }
        let k = 1.0 - (-EASE_RATE * dt.max(0.0)).exp();
        self.position += gap * k;
    }
}

/// Hero parallax: the hero drifts at half the scroll speed, its particles at 0.3x.
/// Once scrolled past the hero the offsets stop updating and keep their last values.
#[derive(Clone, Debug, Default)]
pub struct Parallax {
    hero_height: f32,
    pub hero_offset: f32,
    pub particles_offset: f32,
}

impl Parallax {
    pub fn new(hero_height: f32) -> Self {
        Self { hero_height, ..Self::default() }
    }

    pub fn update(&mut self, scroll_y: f32) {
        if scroll_y < self.hero_height {
            self.hero_offset = scroll_y * HERO_PARALLAX;
            self.particles_offset = scroll_y * PARTICLES_PARALLAX;
        }
    }
}
