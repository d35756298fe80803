//! Plate locator: finds a plate-shaped region in a still image and turns it
//! into the binary image handed to the OCR engine.
//!
//! The chain is grayscale, histogram equalization, gaussian blur, canny,
//! dilation, outer contours, bounding boxes filtered by aspect ratio and size.
//! The largest surviving box wins; with no survivor the whole image is used.

use image::{GrayImage, Luma, RgbImage, imageops::{self, FilterType}};
use imageproc::{ contours::{self, BorderType}, contrast, distance_transform::Norm, edges, filter, morphology::{self, Mask}, point::Point, rect::Rect };
use tracing::{debug, warn};

use crate::config::LocatorConfig;

/// Outcome of the plate search. `Fallback` means no contour passed the filter
/// and the whole input stands in for the plate.
#[derive(Debug, Clone, PartialEq)]
pub enum PlateRegion {
    Located { rect: Rect, image: RgbImage },
    Fallback(RgbImage),
}

impl PlateRegion {

    pub fn image(&self) -> &RgbImage {
        match self {
            PlateRegion::Located { image, .. } => image,
            PlateRegion::Fallback(image) => image,
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            PlateRegion::Located { rect, .. } => Some(*rect),
            PlateRegion::Fallback(_) => None,
        }
    }

    pub fn is_located(&self) -> bool {
        self.rect().is_some()
    }
}

/// A plate region after upscaling and binarization.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedPlate {
    pub region: PlateRegion,
    /// upscaled region (or whole image)
    pub upscaled: RgbImage,
    /// white strokes on black, ready for OCR
    pub binary: GrayImage,
}

/// Run the full locator chain on `img`.
pub fn preprocess(img: &RgbImage, config: &LocatorConfig) -> LocatedPlate {
    let region = locate_plate(img, config);
    let upscaled = upscale(region.image(), config.upscale);
    let binary = binarize(&upscaled, config);
    LocatedPlate { region, upscaled, binary }
}

/// Pick the largest plate-shaped contour box, or fall back to the whole image.
pub fn locate_plate(img: &RgbImage, config: &LocatorConfig) -> PlateRegion {
    let candidates = candidate_regions(img, config);
    debug!("{} plate-shaped candidates", candidates.len());
    match select_largest(&candidates) {
        Some(rect) => {
            let image = imageops::crop_imm(img, rect.left() as u32, rect.top() as u32, rect.width(), rect.height()).to_image();
            PlateRegion::Located { rect, image }
        },
        None => {
            warn!("no suitable contour detected, using the entire image");
            PlateRegion::Fallback(img.clone())
        }
    }
}

/// Binary edge map: equalized, blurred, canny, one 3x3 dilation.
pub fn edge_map(img: &RgbImage, config: &LocatorConfig) -> GrayImage {
    let gray = imageops::grayscale(img);
    let equalized = contrast::equalize_histogram(&gray);
    let blurred = gaussian_blur(&equalized, config.blur_kernel);
    let edges = edges::canny(&blurred, config.canny_low, config.canny_high);
    morphology::dilate(&edges, Norm::LInf, 1)
}

/// Bounding boxes of the outer contours of the edge map that look like a plate,
/// in contour order.
pub fn candidate_regions(img: &RgbImage, config: &LocatorConfig) -> Vec<Rect> {
    let edges = edge_map(img, config);
    contours::find_contours::<i32>(&edges)
        .iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
        .filter_map(|contour| bounding_rect(&contour.points))
        .filter(|rect| is_plate_shaped(rect, config))
        .collect()
}

/// Smallest axis-aligned rectangle containing every point.
pub fn bounding_rect(points: &[Point<i32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let width = (max_x - min_x + 1) as u32;
    let height = (max_y - min_y + 1) as u32;
    Some(Rect::at(min_x, min_y).of_size(width, height))
}

pub fn is_plate_shaped(rect: &Rect, config: &LocatorConfig) -> bool {
    let aspect = rect.width() as f32 / rect.height() as f32;
    config.min_aspect < aspect && aspect < config.max_aspect
        && rect.width() > config.min_width
        && rect.height() > config.min_height
}

/// Largest box by area; the earlier box wins a tie.
pub fn select_largest(candidates: &[Rect]) -> Option<Rect> {
    candidates.iter().fold(None, |best: Option<Rect>, rect| {
        match best {
            Some(b) if area(&b) >= area(rect) => Some(b),
            _ => Some(*rect),
        }
    })
}

fn area(rect: &Rect) -> u64 {
    rect.width() as u64 * rect.height() as u64
}

/// Bilinear resize by `factor`, rounding the output size.
pub fn upscale(img: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = img.dimensions();
    let width = ((width as f32 * factor).round() as u32).max(1);
    let height = ((height as f32 * factor).round() as u32).max(1);
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Grayscale, inverted adaptive threshold, then a small dilation to rejoin
/// strokes broken by the threshold.
pub fn binarize(img: &RgbImage, config: &LocatorConfig) -> GrayImage {
    let gray = imageops::grayscale(img);
    let binary = adaptive_threshold_inv(&gray, config.threshold_block, config.threshold_offset);
    join_strokes(&binary, config.join_kernel)
}

/// Pixels brighter than the gaussian-weighted local mean minus `offset` go to 0,
/// the rest to 255.
pub fn adaptive_threshold_inv(gray: &GrayImage, block: u32, offset: i16) -> GrayImage {
    let mean = gaussian_blur(gray, block);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let src = gray.get_pixel(x, y)[0] as i16;
        let threshold = mean.get_pixel(x, y)[0] as i16 - offset;
        if src > threshold { Luma([0]) } else { Luma([255]) }
    })
}

fn join_strokes(binary: &GrayImage, size: u8) -> GrayImage {
    if size < 2 {
        return binary.clone();
    }
    let element = GrayImage::from_pixel(size as u32, size as u32, Luma([255]));
    let mask = Mask::from_image(&element, size / 2, size / 2);
    morphology::grayscale_dilate(binary, &mask)
}

/// Sigma of a gaussian kernel of side `ksize`, derived the way OpenCV does
/// when no sigma is given.
pub fn kernel_sigma(ksize: u32) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D gaussian of exactly `ksize` taps. Small odd sizes use the
/// fixed binomial tables OpenCV's `getGaussianKernel` uses.
pub fn gaussian_kernel(ksize: u32) -> Vec<f32> {
    match ksize {
        0 | 1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
        _ => {
            let sigma = kernel_sigma(ksize);
            let center = (ksize as f32 - 1.0) / 2.0;
            let taps: Vec<f32> = (0..ksize)
                .map(|i| {
                    let d = i as f32 - center;
                    (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect();
            let sum: f32 = taps.iter().sum();
            taps.into_iter().map(|t| t / sum).collect()
        }
    }
}

/// Gaussian blur with a `ksize` x `ksize` window.
pub fn gaussian_blur(gray: &GrayImage, ksize: u32) -> GrayImage {
    filter::separable_filter_equal(gray, &gaussian_kernel(ksize))
}
