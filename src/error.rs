// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The camera could not be opened: permission denied or no device.
    /// This is the only error the user is shown (as a blocking notice).
    #[error("Camera access error: {0}")]
    CameraAccess(String),

    /// Grabbing/decoding a frame failed (the frame is skipped).
    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_access_display_names_the_cause() {
        let err = Error::CameraAccess("permission denied".to_string());
        assert_eq!(err.to_string(), "Camera access error: permission denied");
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
