use image::Rgb;

use std::error::Error;
use std::env::args;
use std::process;

use lpr_capture::config::LocatorConfig;
use lpr_capture::image_process::{ self, PlateRegion };
use lpr_capture::utils;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = args();
    args.next();
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("didn't get a image from args");
            process::exit(1);
        }
    };

    let mut img = image::open(path)?.to_rgb8();
    let config = LocatorConfig::default();
    let candidates = image_process::candidate_regions(&img, &config);
    let region = image_process::locate_plate(&img, &config);
    for rect in candidates {
        utils::draw_region(&mut img, rect, Rgb([0, 0, 255]), 1);
    }
    match region {
        PlateRegion::Located { rect, .. } => {
            println!("plate at ({}, {}) {}x{}", rect.left(), rect.top(), rect.width(), rect.height());
            utils::draw_region(&mut img, rect, Rgb([255, 0, 0]), 2);
        },
        PlateRegion::Fallback(_) => println!("no plate-shaped contour, the whole image would be read"),
    }

    #[cfg(feature = "display-window")]
    utils::display_image(&img, "locate result");
    #[cfg(not(feature = "display-window"))]
    img.save("located.png")?;
    Ok(())
}
