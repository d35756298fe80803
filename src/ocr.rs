//! Text recognition through an external OCR engine.

use image::GrayImage;
use tracing::debug;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::RecognizerConfig;
use crate::error::LprError;

pub trait OcrEngine {
    /// Raw engine output for `img`, untrimmed.
    fn image_to_string(&self, img: &GrayImage) -> Result<String, LprError>;
}

/// The `tesseract` command line program.
#[derive(Debug, Clone)]
pub struct Tesseract {
    cmd: PathBuf,
    language: String,
    oem: u8,
    psm: u8,
    whitelist: String,
}

impl Tesseract {

    pub fn new(config: &RecognizerConfig) -> Self {
        Self {
            cmd: config.tesseract_cmd.clone(),
            language: config.language.clone(),
            oem: config.oem,
            psm: config.psm,
            whitelist: config.whitelist.clone(),
        }
    }

    /// Arguments for reading `input` and printing the text to stdout.
    pub fn args(&self, input: &Path) -> Vec<OsString> {
        vec![
            input.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.language.clone().into(),
            "--oem".into(),
            self.oem.to_string().into(),
            "--psm".into(),
            self.psm.to_string().into(),
            "-c".into(),
            format!("tessedit_char_whitelist={}", self.whitelist).into(),
        ]
    }
}

impl OcrEngine for Tesseract {

    fn image_to_string(&self, img: &GrayImage) -> Result<String, LprError> {
        // tesseract only reads from disk
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("plate.png");
        img.save(&input)?;

        let args = self.args(&input);
        debug!("running {:?} {:?}", self.cmd, args);
        let output = Command::new(&self.cmd)
            .args(&args)
            .output()
            .map_err(|e| LprError::ocr(format!("cannot run {}: {}", self.cmd.display(), e)))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LprError::ocr(format!("{} exited with {}: {}", self.cmd.display(), output.status, stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Trim the engine output and drop anything outside `whitelist`.
pub fn clean_text(raw: &str, whitelist: &str) -> String {
    raw.trim().chars().filter(|c| whitelist.contains(*c)).collect()
}
