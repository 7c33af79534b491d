//! The product page shown around the AR viewer.
//!
//! Everything here lives in *page coordinates* (y grows down the whole page);
//! drawing subtracts the scroll position. The page owns its own little bits of
//! motion: smooth scrolling between sections, hero parallax, hover lift on
//! product items and fade-in of items and step cards as they scroll into view.

use std::path::Path;

use crate::config::Product;
use crate::draw::{self, GLYPH_H, Input};
use crate::error::Error;
use crate::gamma::GammaLut;
use crate::reveal::{ElementId, Reveal, RevealObserver};
use crate::scroll::{Parallax, SmoothScroll};
use crate::surface::{Pen, Surface};
use crate::types::{FrameBuffer, Point, Rect, Rgba};

pub const NAV_H: f32 = 56.0;
pub const HERO_H: f32 = 620.0;
const MARGIN: f32 = 80.0;
const GAP: f32 = 40.0;
const COLUMNS: usize = 3;
const ITEM_H: f32 = 260.0;
const THUMB_H: f32 = 150.0;
const SECTION_HEADER: f32 = 110.0;
const STEP_H: f32 = 190.0;
const FOOTER_H: f32 = 120.0;
/// Pixels scrolled per wheel unit.
const WHEEL_STEP: f32 = 40.0;
/// Hover: lift in px and scale factor.
pub const HOVER_LIFT: f32 = 10.0;
pub const HOVER_SCALE: f32 = 1.02;
const PARTICLES: usize = 60;

const BG: u32 = 0x000A_0E18;
const CYAN: Rgba = Rgba::new(0, 245, 255, 1.0);
const CORAL: Rgba = Rgba::new(255, 107, 107, 1.0);
const TEXT: Rgba = Rgba::new(240, 244, 255, 1.0);
const MUTED: Rgba = Rgba::new(150, 162, 190, 1.0);
const CARD: Rgba = Rgba::new(22, 28, 46, 1.0);

const NAV_LINKS: [&str; 3] = ["Home", "Products", "How it works"];

const STEPS: [(&str, &str); 3] = [
    ("1. Pick", "Choose a product"),
    ("2. Point", "Aim your camera"),
    ("3. Place", "See it in your room"),
];

/// What the page asks the app to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction {
    StartAr,
}

struct Item {
    product: Product,
    bounds: Rect,
    thumb: Option<FrameBuffer>,
    reveal: Reveal,
    /// (opacity, rise px) sampled this frame
    fade: (f32, f32),
    hovered: bool,
}

impl Item {
    fn ar_button(&self) -> Rect {
        let b = self.bounds;
        Rect::new(b.x + b.w - 76.0, b.y + b.h - 44.0, 60.0, 28.0)
    }

    /// Where the item is drawn: hover lift/scale, then the fade-in rise.
    fn drawn_bounds(&self) -> Rect {
        let b = if self.hovered { self.bounds.scaled(HOVER_SCALE).translated(0.0, -HOVER_LIFT) } else { self.bounds };
        b.translated(0.0, self.fade.1)
    }
}

struct Step {
    title: &'static str,
    text: &'static str,
    bounds: Rect,
    reveal: Reveal,
    fade: (f32, f32),
}

pub struct Page {
    width: f32,
    height: f32,
    items: Vec<Item>,
    steps: Vec<Step>,
    /// Section tops, in nav-link order.
    anchors: [f32; 3],
    start_button: Rect,
    product_card: Rect,
    particles: Vec<Point>,
    content_height: f32,
    scroll: SmoothScroll,
    parallax: Parallax,
    observer: RevealObserver,
    clock: f32,
}

impl Page {
    /// Lay out the page for a `width` x `height` viewport. Thumbnails that fail
    /// to load fall back to a drawn placeholder.
    pub fn new(width: usize, height: usize, products: &[Product]) -> Self {
        let (width, height) = (width as f32, height as f32);
        let col_w = ((width - 2.0 * MARGIN - GAP * (COLUMNS as f32 - 1.0)) / COLUMNS as f32).max(1.0);

        // Products grid
        let products_top = HERO_H;
        let grid_top = products_top + SECTION_HEADER;
        let items: Vec<Item> = products
            .iter()
            .enumerate()
            .map(|(i, product)| {
                let (row, col) = ((i / COLUMNS) as f32, (i % COLUMNS) as f32);
                let bounds = Rect::new(MARGIN + col * (col_w + GAP), grid_top + row * (ITEM_H + GAP), col_w, ITEM_H);
                let thumb = product.image.as_deref().and_then(|path| {
                    load_thumbnail(path, (col_w as u32).saturating_sub(24).max(1), THUMB_H as u32 - 12)
                        .map_err(|e| log::warn!("thumbnail for {}: {e}", product.name))
                        .ok()
                });
                Item { product: product.clone(), bounds, thumb, reveal: Reveal::Hidden, fade: (0.0, 0.0), hovered: false }
            })
            .collect();
        let rows = products.len().div_ceil(COLUMNS) as f32;

        // How-it-works cards
        let steps_top = grid_top + rows * (ITEM_H + GAP) + GAP;
        let steps: Vec<Step> = STEPS
            .iter()
            .enumerate()
            .map(|(i, &(title, text))| Step {
                title,
                text,
                bounds: Rect::new(MARGIN + i as f32 * (col_w + GAP), steps_top + SECTION_HEADER, col_w, STEP_H),
                reveal: Reveal::Hidden,
                fade: (0.0, 0.0),
            })
            .collect();
        let content_height = steps_top + SECTION_HEADER + STEP_H + FOOTER_H;

        let mut observer = RevealObserver::default();
        for (id, item) in items.iter().enumerate() {
            observer.observe(id, item.bounds);
        }
        for (i, step) in steps.iter().enumerate() {
            observer.observe(items.len() + i, step.bounds);
        }

        Self {
            width,
            height,
            start_button: Rect::new(MARGIN, 400.0, 200.0, 52.0),
            product_card: Rect::new(width - MARGIN - 320.0, 150.0, 320.0, 360.0),
            particles: scatter_particles(width, HERO_H, PARTICLES),
            anchors: [0.0, products_top, steps_top],
            content_height,
            scroll: SmoothScroll::new(content_height - height),
            parallax: Parallax::new(HERO_H),
            observer,
            clock: 0.0,
            items,
            steps,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll.position()
    }

    /// Smooth-scroll so that nav section `index` starts at the top of the view.
    pub fn scroll_to_section(&mut self, index: usize) {
        if let Some(&y) = self.anchors.get(index) {
            self.scroll.scroll_to(y);
        }
    }

    fn nav_links(&self) -> Vec<Rect> {
        let mut x = self.width - MARGIN;
        let mut rects: Vec<Rect> = NAV_LINKS
            .iter()
            .rev()
            .map(|label| {
                let w = draw::text_width(label, 2) as f32;
                x -= w;
                let r = Rect::new(x, 0.0, w, NAV_H);
                x -= 32.0;
                r
            })
            .collect();
        rects.reverse();
        rects
    }

    fn start_button_on_screen(&self) -> Rect {
        self.start_button.translated(0.0, self.parallax.hero_offset - self.scroll_y())
    }

    /// Advance by `dt` seconds with this frame's input.
    pub fn update(&mut self, input: &Input, dt: f32) -> Option<PageAction> {
        self.clock += dt;
        let mut action = None;

        if let Some(i) = input.nav {
            self.scroll_to_section(i);
        }
        if input.wheel != 0.0 {
            self.scroll.scroll_by(input.wheel * WHEEL_STEP);
        }

        let mouse = input.mouse.map(|(x, y)| Point::new(x, y));
        if input.clicked {
            if let Some(m) = mouse {
                action = self.click(m);
            }
        }

        self.scroll.update(dt);
        let scroll_y = self.scroll.position();
        self.parallax.update(scroll_y);

        // Fade-ins for whatever just came into view
        let now = self.clock;
        let viewport = Rect::new(0.0, scroll_y, self.width, self.height);
        for id in self.observer.poll(viewport) {
            self.reveal_mut(id).start(now);
        }
        for item in &mut self.items {
            item.fade = item.reveal.sample(now);
        }
        for step in &mut self.steps {
            step.fade = step.reveal.sample(now);
        }

        // Hover in page coordinates
        let pointer = mouse.filter(|m| m.y >= NAV_H).map(|m| Point::new(m.x, m.y + scroll_y));
        for item in &mut self.items {
            item.hovered = pointer.is_some_and(|p| item.bounds.contains(p));
        }

        action
    }

    fn reveal_mut(&mut self, id: ElementId) -> &mut Reveal {
        let n = self.items.len();
        if id < n { &mut self.items[id].reveal } else { &mut self.steps[id - n].reveal }
    }

    /// Screen-space click.
    fn click(&mut self, m: Point) -> Option<PageAction> {
        if m.y < NAV_H {
            if let Some(i) = self.nav_links().iter().position(|r| r.contains(m)) {
                self.scroll_to_section(i);
            }
            return None;
        }
        if self.start_button_on_screen().contains(m) {
            return Some(PageAction::StartAr);
        }
        let p = Point::new(m.x, m.y + self.scroll_y());
        if self.items.iter().any(|item| item.ar_button().contains(p)) {
            return Some(PageAction::StartAr);
        }
        None
    }

    /// Paint the page into `fb` (viewport-sized).
    pub fn draw(&self, fb: &mut FrameBuffer, product_card_opacity: f32) {
        fb.fill(BG);
        let scroll_y = self.scroll_y();
        self.draw_hero(fb, scroll_y, product_card_opacity);

        let section_title = |fb: &mut FrameBuffer, y: f32, text: &str| {
            draw::draw_text_centered(fb, (self.width / 2.0) as i32, (y - scroll_y + 40.0) as i32, text, 4, TEXT);
        };
        section_title(fb, self.anchors[1], "Products");
        for item in &self.items {
            self.draw_item(fb, item, scroll_y);
        }
        section_title(fb, self.anchors[2], "How it works");
        for step in &self.steps {
            let (alpha, _) = step.fade;
            if alpha <= 0.0 { continue; }
            let r = step.bounds.translated(0.0, step.fade.1 - scroll_y);
            fb.fill_rect(r, CARD.faded(alpha));
            fb.stroke_rect(r, Pen::new(CYAN.faded(0.4 * alpha), 1.0));
            draw::draw_text(fb, (r.x + 24.0) as i32, (r.y + 40.0) as i32, step.title, 3, CYAN.faded(alpha));
            draw::draw_text(fb, (r.x + 24.0) as i32, (r.y + 100.0) as i32, step.text, 2, TEXT.faded(alpha));
        }

        let footer_y = (self.content_height - FOOTER_H / 2.0 - scroll_y) as i32;
        draw::draw_text_centered(fb, (self.width / 2.0) as i32, footer_y, "AR Commerce - try before you buy", 2, MUTED);

        self.draw_nav(fb);
    }

    fn draw_hero(&self, fb: &mut FrameBuffer, scroll_y: f32, card_opacity: f32) {
        let shift = self.parallax.hero_offset - scroll_y;
        let particle_shift = self.parallax.particles_offset - scroll_y;
        for (i, p) in self.particles.iter().enumerate() {
            // Slow twinkle so the layer reads as alive.
            let a = 0.25 + 0.2 * (self.clock * 1.5 + i as f32).sin();
            fb.fill_rect(Rect::new(p.x, p.y + particle_shift, 3.0, 3.0), CYAN.faded(a));
        }

        let x = MARGIN as i32;
        draw::draw_text(fb, x, (180.0 + shift) as i32, "Try it", 8, TEXT);
        draw::draw_text(fb, x, (250.0 + shift) as i32, "in your space", 8, CYAN);
        draw::draw_text(fb, x, (340.0 + shift) as i32, "See products in your room before you buy.", 2, MUTED);

        let button = self.start_button_on_screen();
        fb.fill_rect(button, CYAN.faded(0.9));
        draw::draw_text_centered(fb, button.center().x as i32, (button.y + 18.0) as i32, "Start AR", 2, Rgba::opaque(BG));

        if card_opacity > 0.0 {
            if let Some(first) = self.items.first() {
                let card = self.product_card.translated(0.0, shift);
                fb.fill_rect(card, CARD.faded(card_opacity));
                fb.stroke_rect(card, Pen::new(CYAN.faded(0.5 * card_opacity), 2.0));
                let thumb_area = Rect::new(card.x + 20.0, card.y + 20.0, card.w - 40.0, 220.0);
                draw_thumb(fb, first, thumb_area, card_opacity);
                draw::draw_text(fb, (card.x + 20.0) as i32, (card.y + 262.0) as i32, &first.product.name, 3, TEXT.faded(card_opacity));
                draw::draw_text(fb, (card.x + 20.0) as i32, (card.y + 306.0) as i32, &first.product.price, 3, CORAL.faded(card_opacity));
            }
        }
    }

    fn draw_item(&self, fb: &mut FrameBuffer, item: &Item, scroll_y: f32) {
        let (alpha, _) = item.fade;
        if alpha <= 0.0 { return; }
        let r = item.drawn_bounds().translated(0.0, -scroll_y);
        if r.y > self.height || r.y + r.h < 0.0 { return; }

        fb.fill_rect(r, CARD.faded(alpha));
        let edge = if item.hovered { CYAN.faded(0.9 * alpha) } else { CYAN.faded(0.3 * alpha) };
        fb.stroke_rect(r, Pen::new(edge, if item.hovered { 2.0 } else { 1.0 }));

        draw_thumb(fb, item, Rect::new(r.x + 12.0, r.y + 12.0, r.w - 24.0, THUMB_H - 12.0), alpha);
        let text_y = r.y + THUMB_H + 16.0;
        draw::draw_text(fb, (r.x + 16.0) as i32, text_y as i32, &item.product.name, 2, TEXT.faded(alpha));
        draw::draw_text(fb, (r.x + 16.0) as i32, (text_y + (GLYPH_H * 2 + 14) as f32) as i32, &item.product.price, 2, CORAL.faded(alpha));

        let b = item.ar_button().translated(r.x - item.bounds.x, r.y - item.bounds.y);
        fb.stroke_rect(b, Pen::new(CYAN.faded(alpha), 2.0));
        draw::draw_text_centered(fb, b.center().x as i32, (b.y + 7.0) as i32, "AR", 2, CYAN.faded(alpha));
    }

    fn draw_nav(&self, fb: &mut FrameBuffer) {
        fb.fill_rect(Rect::new(0.0, 0.0, self.width, NAV_H), Rgba::new(10, 14, 24, 0.92));
        fb.stroke_polyline(&[Point::new(0.0, NAV_H), Point::new(self.width, NAV_H)], Pen::new(CYAN.faded(0.25), 1.0));
        draw::draw_text(fb, MARGIN as i32, 19, "AR", 3, CYAN);
        draw::draw_text(fb, MARGIN as i32 + draw::text_width("AR ", 3), 19, "Commerce", 3, TEXT);
        for (label, r) in NAV_LINKS.iter().zip(self.nav_links()) {
            draw::draw_text(fb, r.x as i32, 22, label, 2, MUTED);
        }
    }
}

/// Thumbnail if loaded, else a placeholder with the product's initial.
fn draw_thumb(fb: &mut FrameBuffer, item: &Item, area: Rect, alpha: f32) {
    match &item.thumb {
        Some(img) => {
            let x = area.center().x - img.width as f32 / 2.0;
            let y = area.center().y - img.height as f32 / 2.0;
            blit(fb, img, x as i32, y as i32, alpha);
        }
        None => {
            fb.fill_rect(area, Rgba::new(0, 245, 255, 0.08 * alpha));
            let initial: String = item.product.name.chars().take(1).collect();
            let c = area.center();
            draw::draw_text_centered(fb, c.x as i32, (c.y - 28.0) as i32, &initial, 8, CYAN.faded(0.6 * alpha));
        }
    }
}

/// Copy `src` into `fb` at (x,y), clipped, blended at `alpha`.
fn blit(fb: &mut FrameBuffer, src: &FrameBuffer, x: i32, y: i32, alpha: f32) {
    let lut = GammaLut::shared();
    for sy in 0..src.height {
        let dy = y + sy as i32;
        if dy < 0 || dy as usize >= fb.height { continue; }
        for sx in 0..src.width {
            let dx = x + sx as i32;
            if dx < 0 || dx as usize >= fb.width { continue; }
            let idx = dy as usize * fb.width + dx as usize;
            let c = src.pixels[sy * src.width + sx];
            fb.pixels[idx] = lut.blend(fb.pixels[idx], Rgba::opaque(c).faded(alpha));
        }
    }
}

/// Decode an image file and shrink it to fit (w,h), keeping aspect ratio.
pub fn load_thumbnail(path: &Path, w: u32, h: u32) -> Result<FrameBuffer, Error> {
    let img = image::open(path)?.to_rgb8();
    let (iw, ih) = img.dimensions();
    if iw == 0 || ih == 0 {
        return Err(Error::Image(format!("{} is empty", path.display())));
    }
    let k = (w as f32 / iw as f32).min(h as f32 / ih as f32).min(1.0);
    let (tw, th) = (((iw as f32 * k) as u32).max(1), ((ih as f32 * k) as u32).max(1));
    let thumb = image::imageops::thumbnail(&img, tw, th);
    let pixels = thumb
        .pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect();
    Ok(FrameBuffer { width: tw as usize, height: th as usize, pixels })
}

/// Deterministic xorshift32 scatter for the hero particle layer.
fn scatter_particles(width: f32, height: f32, count: usize) -> Vec<Point> {
    let mut state = 0x00C0_FFEEu32 | 1;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state >> 8) as f32 / (1u32 << 24) as f32
    };
    (0..count).map(|_| Point::new(next() * width, NAV_H + next() * (height - NAV_H))).collect()
}
