// What you SEE:
// • A product page: scroll with the wheel, 1/2/3 jump to sections, hover lifts items.
// • "Start AR" (or any item's AR button) opens the camera with the AR overlay on top.
// • ESC or the X box closes the camera view. ESC on the page quits.
// • If the camera can't be opened, a notice explains why; Enter dismisses it.

mod camera;
mod config;
mod draw;
mod error;
mod fx;
mod gamma;
mod notice;
mod overlay;
mod page;
mod reveal;
mod scroll;
mod session;
mod surface;
mod types;

use camera::NokhwaProvider;
use config::{CONFIG_ENV, Config};
use draw::{Drawer, Input};
use error::Error;
use notice::Notice;
use page::{Page, PageAction};
use session::{Session, Stage};
use std::time::{Duration, Instant};
use surface::{Pen, Surface};
use types::{FrameBuffer, Point, Rect, Rgba};

/// Close box in the AR view, in canvas pixels (top-right corner).
fn close_box(canvas_w: usize) -> Rect {
    Rect::new(canvas_w as f32 - 64.0, 24.0, 40.0, 40.0)
}

/// Map a window pixel to canvas pixels, undoing the aspect-preserving stretch.
/// None if the pointer is on the letterbox bars.
fn window_to_canvas(mouse: (f32, f32), window: (usize, usize), canvas: (usize, usize)) -> Option<Point> {
    let (ww, wh) = (window.0 as f32, window.1 as f32);
    let (cw, ch) = (canvas.0 as f32, canvas.1 as f32);
    if cw <= 0.0 || ch <= 0.0 || ww <= 0.0 || wh <= 0.0 { return None; }
    let k = (ww / cw).min(wh / ch);
    let (ox, oy) = ((ww - cw * k) / 2.0, (wh - ch * k) / 2.0);
    let p = Point::new((mouse.0 - ox) / k, (mouse.1 - oy) / k);
    Rect::new(0.0, 0.0, cw, ch).contains(p).then_some(p)
}

/// HUD on top of the AR canvas: close box + hint line.
fn draw_ar_chrome(view: &mut FrameBuffer, fps_text: &str, frames: u64) {
    let b = close_box(view.width);
    let pen = Pen::new(Rgba::new(255, 255, 255, 0.9), 3.0);
    view.fill_rect(b, Rgba::new(0, 0, 0, 0.5));
    view.stroke_polyline(&[Point::new(b.x + 10.0, b.y + 10.0), Point::new(b.x + 30.0, b.y + 30.0)], pen);
    view.stroke_polyline(&[Point::new(b.x + 30.0, b.y + 10.0), Point::new(b.x + 10.0, b.y + 30.0)], pen);
    let hud = format!("AR LIVE | ESC: close | {fps_text} | frame {frames}");
    draw::draw_text(view, 24, view.height as i32 - 32, &hud, 2, Rgba::opaque(0x00FF_FFFF));
}

/// Compose the AR view as the stage says: nothing while the viewer is hidden,
/// the camera canvas while the video is visible, black otherwise.
fn compose_ar_view(stage: &Stage, canvas: &FrameBuffer, view: &mut FrameBuffer, fps_text: &str, frames: u64) -> bool {
    if !stage.viewer_active { return false; }
    if stage.video_visible {
        view.clone_from(canvas);
    } else {
        view.resize(canvas.width, canvas.height);
    }
    draw_ar_chrome(view, fps_text, frames);
    true
}

fn wants_close(input: &Input, window: (usize, usize), canvas: &FrameBuffer) -> bool {
    if input.escape { return true; }
    if !input.clicked { return false; }
    input
        .mouse
        .and_then(|m| window_to_canvas(m, window, (canvas.width, canvas.height)))
        .is_some_and(|p| close_box(canvas.width).contains(p))
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    /* --- Config ---
       Optional JSON file: first CLI argument, else $AR_COMMERCE_CONFIG. */
    let path = config::config_path(std::env::args(), std::env::var(CONFIG_ENV).ok());
    let config = Config::load(path.as_deref())?;

    /* --- Window + page ---
       Visual: window opens on the product page hero. */
    let (w, h) = (config.window.width, config.window.height);
    let mut drawer = Drawer::new(&config.window.title, w, h)?;
    let mut screen = FrameBuffer::new(w, h);
    let mut page = Page::new(w, h, &config.products.0);

    /* --- AR session ---
       Owns the camera stream and frame loop once started; idle until then. */
    let mut session = Session::new(NokhwaProvider, config.camera.clone());
    let mut ar_view = FrameBuffer::new(0, 0);
    let mut notice: Option<Notice> = None;

    /* --- FPS ---
       Logged at debug level and shown in the AR HUD. */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut fps_text = String::from("FPS: 0.0");
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        let input = drawer.poll();

        /* 1) A notice blocks everything until dismissed. */
        if notice.is_some() {
            if Notice::dismissed_by(&input) {
                notice = None;
            }
        } else if session.is_running() {
            /* 2) AR view: only close actions matter. */
            if wants_close(&input, drawer.size(), session.canvas()) {
                session.stop();
            }
        } else {
            /* 3) Page: scroll, hover, fade-ins, start buttons. */
            if input.escape {
                break;
            }
            if page.update(&input, dt) == Some(PageAction::StartAr) {
                if let Err(e) = session.start(now) {
                    log::error!("{e}");
                    notice = Notice::for_error(&e);
                }
            }
        }

        /* 4) Paint: camera + overlay while AR runs, otherwise the page. */
        session.tick(now);
        if compose_ar_view(session.stage(), session.canvas(), &mut ar_view, &fps_text, session.frames()) {
            drawer.present(&ar_view)?;
        } else {
            page.draw(&mut screen, session.stage().product_card_opacity);
            if let Some(n) = &notice {
                n.draw(&mut screen);
            }
            drawer.present(&screen)?;
        }

        /* 5) FPS counter (once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            log::debug!("FPS: {:.1}", fps);
            fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    session.stop();
    Ok(())
}
