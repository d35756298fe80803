//! OpenCV webcam with a live preview window.

use image::{ GrayImage, Rgb, RgbImage };
use opencv::{ core::{self, Mat, Scalar}, highgui, imgproc, prelude::*, videoio };
use tracing::{debug, info};

use crate::capture::{ key_action, Event, FrameSource, KeyAction };
use crate::config::CameraConfig;
use crate::error::LprError;
use crate::utils;

pub struct Camera {
    capture: videoio::VideoCapture,
    config: CameraConfig,
}

impl Camera {

    pub fn open(config: &CameraConfig) -> Result<Self, LprError> {
        let capture = videoio::VideoCapture::new(config.device_index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(LprError::camera(format!("could not open camera {}", config.device_index)));
        }
        highgui::named_window(&config.preview_window, highgui::WINDOW_AUTOSIZE)?;
        info!("camera {} opened, press '{}' to capture and '{}' to quit",
            config.device_index, config.capture_key, config.quit_key);
        Ok(Camera { capture, config: config.clone() })
    }

    fn read_frame(&mut self) -> Result<Mat, LprError> {
        let mut frame = Mat::default();
        let ok = self.capture.read(&mut frame)?;
        if !ok || frame.empty() {
            return Err(LprError::camera("failed to capture frame"));
        }
        Ok(frame)
    }
}

impl FrameSource for Camera {

    fn next_event(&mut self) -> Result<Event, LprError> {
        let mut frame = self.read_frame()?;
        let (width, height) = (frame.cols() as u32, frame.rows() as u32);
        let guide = utils::guide_rect(width, height, &self.config.guide);

        // snapshot before the guide is drawn over the frame
        let region = utils::crop(&mat_to_rgb(&frame)?, guide);

        let outline = core::Rect::new(guide.left(), guide.top(), guide.width() as i32, guide.height() as i32);
        imgproc::rectangle(&mut frame, outline, Scalar::new(0.0, 255.0, 0.0, 0.0), 2, imgproc::LINE_8, 0)?;
        highgui::imshow(&self.config.preview_window, &frame)?;

        let event = match key_action(highgui::wait_key(1)?, &self.config) {
            Some(KeyAction::Capture) => Event::CaptureRequested(region),
            Some(KeyAction::Quit) => Event::QuitRequested,
            None => Event::FrameReady,
        };
        Ok(event)
    }

    fn show_processed(&mut self, binary: &GrayImage) -> Result<(), LprError> {
        if let Some(window) = &self.config.debug_window {
            let mat = gray_to_mat(binary)?;
            highgui::imshow(window, &mat)?;
        }
        Ok(())
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        debug!("releasing camera {}", self.config.device_index);
        let _ = self.capture.release();
        let _ = highgui::destroy_all_windows();
    }
}

/// Copy an 8-bit BGR frame into an RGB image.
pub fn mat_to_rgb(frame: &Mat) -> Result<RgbImage, LprError> {
    if frame.typ() != core::CV_8UC3 {
        return Err(LprError::camera(format!("unsupported frame type {}", frame.typ())));
    }
    let owned;
    let frame = if frame.is_continuous() {
        frame
    } else {
        owned = frame.try_clone()?;
        &owned
    };
    let (width, height) = (frame.cols() as u32, frame.rows() as u32);
    let bgr = frame.data_bytes()?;
    Ok(RgbImage::from_fn(width, height, |x, y| {
        let i = ((y * width + x) * 3) as usize;
        Rgb([bgr[i + 2], bgr[i + 1], bgr[i]])
    }))
}

fn gray_to_mat(img: &GrayImage) -> Result<Mat, LprError> {
    let mat = Mat::new_rows_cols_with_data(img.height() as i32, img.width() as i32, img.as_raw().as_slice())?;
    Ok(mat.try_clone()?)
}
