//! Event loop between a frame source and the recognition pipeline.
//!
//! A `FrameSource` turns frames and key presses into `Event`s; `run` consumes
//! them and performs one capture per `CaptureRequested`.

use image::{ GrayImage, RgbImage };
use tracing::{info, warn};

use crate::config::CameraConfig;
use crate::error::LprError;
use crate::{ Capture, Lpr };

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// a frame was shown, nothing else happened
    FrameReady,
    /// the guide region of the current frame
    CaptureRequested(RgbImage),
    QuitRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Capture,
    Quit,
}

/// Map a raw key code to an action. Only the low byte of `key` is looked at.
pub fn key_action(key: i32, config: &CameraConfig) -> Option<KeyAction> {
    if key < 0 {
        return None;
    }
    let key = (key & 0xFF) as u32;
    if key == config.capture_key as u32 {
        Some(KeyAction::Capture)
    } else if key == config.quit_key as u32 {
        Some(KeyAction::Quit)
    } else {
        None
    }
}

pub trait FrameSource {
    /// Block until the next frame has been shown and report what happened.
    /// An error here ends the loop.
    fn next_event(&mut self) -> Result<Event, LprError>;

    /// Show the binary plate image produced by a capture.
    fn show_processed(&mut self, _binary: &GrayImage) -> Result<(), LprError> {
        Ok(())
    }
}

/// Drive `source` until it asks to quit. Returns the number of captures.
pub fn run<S: FrameSource>(source: &mut S, lpr: &Lpr) -> Result<usize, LprError> {
    let mut captures = 0;
    loop {
        match source.next_event()? {
            Event::FrameReady => {},
            Event::CaptureRequested(region) => {
                let capture = lpr.capture(&region)?;
                report(&capture);
                source.show_processed(&capture.recognition.plate.binary)?;
                captures += 1;
            },
            Event::QuitRequested => break,
        }
    }
    Ok(captures)
}

pub fn report(capture: &Capture) {
    info!("captured image saved as {}", capture.image_path.display());
    if capture.recognition.text.is_empty() {
        warn!("no text recognized");
    } else {
        info!("recognized license plate number: {}", capture.recognition.text);
    }
    info!("recognized text saved to {}", capture.text_path.display());
}


#[cfg(test)]
mod test {

    use image::GrayImage;

    use std::collections::VecDeque;
    use std::error::Error;
    use std::fs;

    use crate::config::{ CameraConfig, Config };
    use crate::error::LprError;
    use crate::test_utils::{ plate_scene, uniform_scene, FakeEngine };
    use crate::Lpr;
    use super::*;

    struct ScriptedSource {
        events: VecDeque<Result<Event, LprError>>,
        shown: Vec<GrayImage>,
    }

    impl ScriptedSource {
        fn new(events: Vec<Result<Event, LprError>>) -> Self {
            Self { events: events.into(), shown: Vec::new() }
        }
    }

    impl FrameSource for ScriptedSource {
        fn next_event(&mut self) -> Result<Event, LprError> {
            self.events.pop_front().unwrap_or(Ok(Event::QuitRequested))
        }

        fn show_processed(&mut self, binary: &GrayImage) -> Result<(), LprError> {
            self.shown.push(binary.clone());
            Ok(())
        }
    }

    fn lpr_in(dir: &std::path::Path) -> Lpr {
        let mut config = Config::default();
        config.output.dir = dir.to_path_buf();
        Lpr::with_engine(config, Box::new(FakeEngine))
    }

    #[test]
    fn key_mapping_masks_low_byte() {
        let config = CameraConfig::default();
        assert_eq!(key_action('c' as i32, &config), Some(KeyAction::Capture));
        assert_eq!(key_action('q' as i32, &config), Some(KeyAction::Quit));
        assert_eq!(key_action(0x100 | 'q' as i32, &config), Some(KeyAction::Quit));
        assert_eq!(key_action('x' as i32, &config), None);
        assert_eq!(key_action('C' as i32, &config), None);
        assert_eq!(key_action(-1, &config), None);
    }

    #[test]
    fn run_captures_until_quit() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let lpr = lpr_in(dir.path());
        let mut source = ScriptedSource::new(vec![
            Ok(Event::FrameReady),
            Ok(Event::CaptureRequested(uniform_scene())),
            Ok(Event::FrameReady),
            Ok(Event::CaptureRequested(plate_scene())),
            Ok(Event::QuitRequested),
            Ok(Event::CaptureRequested(plate_scene())),
        ]);

        let captures = run(&mut source, &lpr)?;
        assert_eq!(captures, 2);
        assert_eq!(source.shown.len(), 2);
        // the event after quit is never consumed
        assert_eq!(source.events.len(), 1);
        // the later capture overwrote the earlier text
        assert_eq!(fs::read_to_string(dir.path().join("recognized_license_plate.txt"))?, "AB123CD");
        Ok(())
    }

    #[test]
    fn source_failure_ends_the_loop() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let lpr = lpr_in(dir.path());
        let mut source = ScriptedSource::new(vec![
            Ok(Event::FrameReady),
            Err(LprError::camera("failed to capture frame")),
            Ok(Event::CaptureRequested(plate_scene())),
        ]);

        let err = run(&mut source, &lpr).unwrap_err();
        assert_eq!(err.to_string(), "camera: failed to capture frame");
        assert!(source.shown.is_empty());
        assert!(!dir.path().join("captured_license_plate.jpg").exists());
        Ok(())
    }
}
