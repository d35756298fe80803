use image::RgbImage;
use tracing::info;

use std::fs;
use std::path::PathBuf;

use config::Config;
use error::LprError;
use image_process::LocatedPlate;
use ocr::{ OcrEngine, Tesseract };

pub mod capture;
#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod error;
pub mod image_process;
pub mod ocr;
pub mod utils;

#[cfg(test)]
mod test_utils;


/// Text read from one captured region.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub plate: LocatedPlate,
    /// trimmed, whitelist characters only, possibly empty
    pub text: String,
}

/// Result of one capture: both output files plus what was recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub image_path: PathBuf,
    pub text_path: PathBuf,
    /// the region as read back from `image_path`
    pub region: RgbImage,
    pub recognition: Recognition,
}

pub struct Lpr {
    config: Config,
    engine: Box<dyn OcrEngine>,
}

impl Lpr {

    /// Pipeline backed by the tesseract executable from `config`.
    pub fn new(config: Config) -> Self {
        let engine = Tesseract::new(&config.recognizer);
        Self::with_engine(config, Box::new(engine))
    }

    pub fn with_engine(config: Config, engine: Box<dyn OcrEngine>) -> Self {
        Lpr { config, engine }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locate the plate in `img` and read it.
    pub fn recognize(&self, img: &RgbImage) -> Result<Recognition, LprError> {
        let plate = image_process::preprocess(img, &self.config.locator);
        let raw = self.engine.image_to_string(&plate.binary)?;
        let text = ocr::clean_text(&raw, &self.config.recognizer.whitelist);
        Ok(Recognition { plate, text })
    }

    /// Save `region`, recognize it and save the text next to it. Both files are
    /// overwritten, and the text file is written even when nothing was read.
    ///
    /// Recognition runs on the region as decoded from the saved file, so the
    /// file on disk is exactly what was recognized.
    pub fn capture(&self, region: &RgbImage) -> Result<Capture, LprError> {
        let output = &self.config.output;
        fs::create_dir_all(&output.dir)?;

        let image_path = output.image_path();
        region.save(&image_path)?;
        let region = image::open(&image_path)?.to_rgb8();
        info!("captured {}x{} region", region.width(), region.height());

        let recognition = self.recognize(&region)?;
        let text_path = output.text_path();
        fs::write(&text_path, &recognition.text)?;

        Ok(Capture { image_path, text_path, region, recognition })
    }
}
