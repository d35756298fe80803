use image::ImageError;
use serde_json::Error as JsonError;

use std::error::Error;
use std::fmt;
use std::io::Error as IOError;

#[derive(Debug)]
pub struct LprError(LprErrorKind);

#[derive(Debug)]
pub enum LprErrorKind {
    IOError(IOError),
    ImageError(ImageError),
    ConfigError(JsonError),
    /// the OCR engine could not be started or exited with a failure
    OcrError(String),
    /// device unavailable or frame read failure
    CameraError(String),
    #[cfg(feature = "camera")]
    OpenCvError(opencv::Error),
}

impl LprError {
    pub fn kind(&self) -> &LprErrorKind {
        &self.0
    }

    pub fn ocr(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::OcrError(msg.into()))
    }

    pub fn camera(msg: impl Into<String>) -> Self {
        Self(LprErrorKind::CameraError(msg.into()))
    }
}

impl<T> From<T> for LprError
where T:  Into<LprErrorKind>
{
    fn from(e: T) -> Self {
        Self(e.into())
    }
}

impl fmt::Display for LprError {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            LprErrorKind::IOError(e) => e.fmt(f),
            LprErrorKind::ImageError(e) => e.fmt(f),
            LprErrorKind::ConfigError(e) => write!(f, "invalid config: {}", e),
            LprErrorKind::OcrError(msg) => write!(f, "ocr failed: {}", msg),
            LprErrorKind::CameraError(msg) => write!(f, "camera: {}", msg),
            #[cfg(feature = "camera")]
            LprErrorKind::OpenCvError(e) => e.fmt(f),
        }
    }
}

impl Error for LprError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self.kind() {
            LprErrorKind::IOError(e) => Some(e),
            LprErrorKind::ImageError(e) => Some(e),
            LprErrorKind::ConfigError(e) => Some(e),
            LprErrorKind::OcrError(_) | LprErrorKind::CameraError(_) => None,
            #[cfg(feature = "camera")]
            LprErrorKind::OpenCvError(e) => Some(e),
        }
    }
}

impl From<IOError> for LprErrorKind {
    fn from(e: IOError) -> Self {
        Self::IOError(e)
    }
}

impl From<ImageError> for LprErrorKind {
    fn from(e: ImageError) -> Self {
        Self::ImageError(e)
    }
}

impl From<JsonError> for LprErrorKind {
    fn from(e: JsonError) -> Self {
        Self::ConfigError(e)
    }
}

#[cfg(feature = "camera")]
impl From<opencv::Error> for LprErrorKind {
    fn from(e: opencv::Error) -> Self {
        Self::OpenCvError(e)
    }
}
