//! Runtime configuration.
//!
//! Every threshold, path and file name the pipeline uses is a named field here.
//! Defaults reproduce the stock behaviour: camera 0, the 30%..70% guide box,
//! a 2.0..5.5 aspect band, Tesseract in LSTM-only single-line mode.

use serde::Deserialize;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LprError;

pub const PLATE_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub locator: LocatorConfig,
    pub recognizer: RecognizerConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Read a JSON config; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LprError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub device_index: i32,
    pub guide: GuideConfig,
    pub preview_window: String,
    /// window showing the binarized plate after a capture, `None` to skip it
    pub debug_window: Option<String>,
    pub capture_key: char,
    pub quit_key: char,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            guide: GuideConfig::default(),
            preview_window: "Webcam Feed".to_string(),
            debug_window: Some("Processed Plate".to_string()),
            capture_key: 'c',
            quit_key: 'q',
        }
    }
}

/// Guide rectangle as fractions of the frame size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self { left: 0.3, top: 0.3, right: 0.7, bottom: 0.7 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// gaussian kernel size before edge detection
    pub blur_kernel: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// exclusive bounds on width / height
    pub min_aspect: f32,
    pub max_aspect: f32,
    /// exclusive pixel floors
    pub min_width: u32,
    pub min_height: u32,
    pub upscale: f32,
    /// neighbourhood size of the adaptive threshold
    pub threshold_block: u32,
    pub threshold_offset: i16,
    /// side of the square element used to rejoin broken strokes
    pub join_kernel: u8,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 100.0,
            canny_high: 200.0,
            min_aspect: 2.0,
            max_aspect: 5.5,
            min_width: 100,
            min_height: 20,
            upscale: 1.5,
            threshold_block: 11,
            threshold_offset: 2,
            join_kernel: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    pub tesseract_cmd: PathBuf,
    pub language: String,
    /// 1 = LSTM only
    pub oem: u8,
    /// 7 = single text line, 6 = single uniform block
    pub psm: u8,
    pub whitelist: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        let tesseract_cmd = if cfg!(windows) {
            PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
        } else {
            PathBuf::from("tesseract")
        };
        Self {
            tesseract_cmd,
            language: "eng".to_string(),
            oem: 1,
            psm: 7,
            whitelist: PLATE_WHITELIST.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub image_file: String,
    pub text_file: String,
}

impl OutputConfig {
    pub fn image_path(&self) -> PathBuf {
        self.dir.join(&self.image_file)
    }

    pub fn text_path(&self) -> PathBuf {
        self.dir.join(&self.text_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            image_file: "captured_license_plate.jpg".to_string(),
            text_file: "recognized_license_plate.txt".to_string(),
        }
    }
}
