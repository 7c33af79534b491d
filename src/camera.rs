// Opens a camera and converts frames into a buffer suitable for the window.
// Visual expectation: when the session calls `next_frame()`, you get a
// Vec<u32> where each pixel is 0x00RRGGBB, ready to paint the overlay on.

use crate::error::Error;
use crate::types::FrameBuffer;

// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};
use serde::Deserialize;

/// What we ask the camera for. The device may pick the closest format it has.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamRequest {
    /// Device index; pick the back/"environment" camera here on multi-camera machines.
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for StreamRequest {
    fn default() -> Self {
        Self { index: 0, width: 1280, height: 720, fps: 30 }
    }
}

/// A live video stream handle.
pub trait VideoStream {
    /// Resolution the stream actually delivers.
    fn resolution(&self) -> (u32, u32);
    /// Next frame as 0x00RRGGBB pixels.
    fn next_frame(&mut self) -> Result<FrameBuffer, Error>;
    /// Release the device. Calling it again does nothing.
    fn stop(&mut self);
}

/// Something that can hand out video streams (the real camera, or a fake in tests).
pub trait VideoProvider {
    type Stream: VideoStream;

    /// Fails with `Error::CameraAccess` when permission is missing or no device exists.
    fn acquire(&mut self, request: &StreamRequest) -> Result<Self::Stream, Error>;
}

/// Hands out nokhwa-backed streams.
#[derive(Default)]
pub struct NokhwaProvider;

impl VideoProvider for NokhwaProvider {
    type Stream = CameraCapture;

    fn acquire(&mut self, request: &StreamRequest) -> Result<CameraCapture, Error> {
        CameraCapture::new(request)
    }
}

// A small wrapper around nokhwa::Camera so the session stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    streaming: bool,
}

impl CameraCapture {
    /// Open the requested camera at (or near) the target resolution and start streaming.
    /// On success, nothing is shown on screen yet; the stream is just held open.
    pub fn new(request: &StreamRequest) -> Result<Self, Error> {
        let idx = CameraIndex::Index(request.index);

        let fmt = CameraFormat::new(
            Resolution::new(request.width, request.height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            request.fps,
        );

        // Ask for RGB frames, closest to what we requested.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        // This is where a missing device or a denied permission shows up.
        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraAccess(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraAccess(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        log::info!(
            "camera {} streaming at {}x{} (asked {}x{})",
            request.index,
            actual.width(),
            actual.height(),
            request.width,
            request.height
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            streaming: true,
        })
    }
}

impl VideoStream for CameraCapture {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Grab one frame (blocks until the camera has one) and convert it to 0x00RRGGBB.
    fn next_frame(&mut self) -> Result<FrameBuffer, Error> {
        if !self.streaming {
            return Err(Error::CameraFrame("stream stopped".into()));
        }
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let rgb_img = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        let (w, h) = rgb_img.dimensions();
        let pixels = rgb_img
            .as_raw()
            .chunks_exact(3)
            .map(|px| ((px[0] as u32) << 16) | ((px[1] as u32) << 8) | px[2] as u32)
            .collect();

        Ok(FrameBuffer {
            width: w as usize,
            height: h as usize,
            pixels,
        })
    }

    fn stop(&mut self) {
        if !self.streaming { return; }
        self.streaming = false;
        if let Err(e) = self.cam.stop_stream() {
            log::warn!("stopping camera stream: {e}");
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
