use clap::{Arg, App, ArgMatches};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use std::error::Error;
use std::path::PathBuf;

use lpr_capture::config::Config;
use lpr_capture::error::LprError;
use lpr_capture::{ capture, Lpr };


fn main() -> Result<(), Box<dyn Error>>{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = App::new("LPR capture")
                    .version("0.1.0")
                    .author("kingrong")
                    .about("Reads a license plate from the webcam with tesseract")
                    .arg(Arg::with_name("config")
                        .long("config")
                        .value_name("FILE")
                        .help("JSON config file")
                        .takes_value(true))
                    .arg(Arg::with_name("image")
                        .long("image")
                        .value_name("FILE")
                        .help("read a still image instead of the webcam")
                        .takes_value(true))
                    .arg(Arg::with_name("device")
                        .long("device")
                        .value_name("INDEX")
                        .help("camera index")
                        .takes_value(true))
                    .arg(Arg::with_name("tesseract")
                        .long("tesseract")
                        .value_name("PATH")
                        .help("tesseract executable")
                        .takes_value(true))
                    .arg(Arg::with_name("psm")
                        .long("psm")
                        .value_name("N")
                        .help("tesseract page segmentation mode")
                        .takes_value(true))
                    .arg(Arg::with_name("output-dir")
                        .long("output-dir")
                        .value_name("DIR")
                        .help("where the captured image and text are written")
                        .takes_value(true))
                    .get_matches();

    let config = load_config(&matches)?;
    let lpr = Lpr::new(config);

    let res = match matches.value_of("image") {
        Some(path) => recognize_still(&lpr, path),
        None => run_camera(&lpr),
    };
    if let Err(e) = &res {
        error!("{}", e);
    }
    Ok(res?)
}

fn load_config(matches: &ArgMatches) -> Result<Config, Box<dyn Error>> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(device) = matches.value_of("device") {
        config.camera.device_index = device.parse()?;
    }
    if let Some(cmd) = matches.value_of("tesseract") {
        config.recognizer.tesseract_cmd = PathBuf::from(cmd);
    }
    if let Some(psm) = matches.value_of("psm") {
        config.recognizer.psm = psm.parse()?;
    }
    if let Some(dir) = matches.value_of("output-dir") {
        config.output.dir = PathBuf::from(dir);
    }
    Ok(config)
}

fn recognize_still(lpr: &Lpr, path: &str) -> Result<(), LprError> {
    let img = image::open(path)?.to_rgb8();
    let capture = lpr.capture(&img)?;
    capture::report(&capture);
    Ok(())
}

#[cfg(feature = "camera")]
fn run_camera(lpr: &Lpr) -> Result<(), LprError> {
    let mut camera = lpr_capture::camera::Camera::open(&lpr.config().camera)?;
    let captures = capture::run(&mut camera, lpr)?;
    info!("quit after {} captures", captures);
    Ok(())
}

#[cfg(not(feature = "camera"))]
fn run_camera(_lpr: &Lpr) -> Result<(), LprError> {
    info!("pass --image or rebuild with the camera feature");
    Err(LprError::camera("built without camera support"))
}
