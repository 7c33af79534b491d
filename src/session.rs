//! The AR session: one object owning the camera stream, the frame loop,
//! the canvas the overlay is painted into, and the on/off state of the
//! pieces of UI that change when AR starts or stops.

use std::time::Instant;

use crate::camera::{StreamRequest, VideoProvider, VideoStream};
use crate::error::Error;
use crate::overlay;
use crate::types::FrameBuffer;

/// Presentation toggles touched by start/stop.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    /// The AR viewer container is shown.
    pub viewer_active: bool,
    /// The video surface is shown.
    pub video_visible: bool,
    /// Opacity of the hero product card (hidden while AR runs).
    pub product_card_opacity: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self { viewer_active: false, video_visible: false, product_card_opacity: 1.0 }
    }
}

/// Handle of the running frame loop.
#[derive(Clone, Copy, Debug)]
pub struct FrameLoop {
    started: Instant,
    frames: u64,
}

impl FrameLoop {
    fn begin(now: Instant) -> Self {
        Self { started: now, frames: 0 }
    }

    /// Seconds since the loop began; never negative.
    fn elapsed(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.started).as_secs_f32()
    }
}

pub struct Session<P: VideoProvider> {
    provider: P,
    request: StreamRequest,
    stream: Option<P::Stream>,
    frame_loop: Option<FrameLoop>,
    canvas: FrameBuffer,
    stage: Stage,
}

impl<P: VideoProvider> Session<P> {
    pub fn new(provider: P, request: StreamRequest) -> Self {
        Self {
            provider,
            request,
            stream: None,
            frame_loop: None,
            canvas: FrameBuffer::new(0, 0),
            stage: Stage::default(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn canvas(&self) -> &FrameBuffer {
        &self.canvas
    }

    /// Frames painted since the last start.
    pub fn frames(&self) -> u64 {
        self.frame_loop.map_or(0, |l| l.frames)
    }

    /// Acquire the camera and begin the frame loop.
    ///
    /// Already running: nothing happens. On failure the error is returned for
    /// the caller to show, and nothing about the session changes.
    pub fn start(&mut self, now: Instant) -> Result<(), Error> {
        if self.is_running() {
            log::debug!("AR session already running");
            return Ok(());
        }

        let stream = self.provider.acquire(&self.request)?;

        // Canvas takes the video's size (the "metadata loaded" moment).
        let (w, h) = stream.resolution();
        self.canvas.resize(w as usize, h as usize);
        self.stream = Some(stream);

        self.stage.video_visible = true;
        self.stage.viewer_active = true;
        self.stage.product_card_opacity = 0.0;

        self.frame_loop = Some(FrameLoop::begin(now));
        log::info!("AR session started ({w}x{h})");
        Ok(())
    }

    /// One frame: copy the newest video frame into the canvas and paint the
    /// overlay on top. Returns the canvas while running.
    ///
    /// A frame the camera can't deliver is skipped; the loop keeps going.
    pub fn tick(&mut self, now: Instant) -> Option<&FrameBuffer> {
        let (Some(stream), Some(frame_loop)) = (self.stream.as_mut(), self.frame_loop.as_mut()) else {
            return None;
        };

        match stream.next_frame() {
            Ok(frame) => {
                if frame.width != self.canvas.width || frame.height != self.canvas.height {
                    log::info!("video size changed to {}x{}", frame.width, frame.height);
                }
                self.canvas = frame;
                let t = frame_loop.elapsed(now);
                let (w, h) = (self.canvas.width, self.canvas.height);
                overlay::render(&mut self.canvas, w, h, t);
                frame_loop.frames += 1;
            }
            Err(e) => log::warn!("skipping frame: {e}"),
        }
        Some(&self.canvas)
    }

    /// Tear everything down. Returns whether there was anything to tear down;
    /// calling it while idle (or twice) does nothing.
    pub fn stop(&mut self) -> bool {
        let mut stopped = false;

        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            stopped = true;
        }
        if let Some(frame_loop) = self.frame_loop.take() {
            log::info!("AR session stopped after {} frames", frame_loop.frames);
            stopped = true;
        }
        if !stopped {
            return false;
        }

        self.canvas.clear();
        self.stage = Stage::default();
        true
    }
}
