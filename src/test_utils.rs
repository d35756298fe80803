//! Synthetic scenes shared by the unit tests.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::{ drawing, rect::Rect };

use crate::error::LprError;
use crate::ocr::OcrEngine;

const BACKGROUND: Rgb<u8> = Rgb([40, 40, 40]);
const PLATE: Rgb<u8> = Rgb([255, 255, 255]);
const GLYPH: Rgb<u8> = Rgb([0, 0, 0]);

/// 320x100 scene: a 300x80 white plate at (10, 10) carrying seven dark glyph
/// blocks, on a dark background.
pub(crate) fn plate_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(320, 100, BACKGROUND);
    drawing::draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(300, 80), PLATE);
    for i in 0..7 {
        let glyph = Rect::at(40 + i * 36, 35).of_size(12, 30);
        drawing::draw_filled_rect_mut(&mut img, glyph, GLYPH);
    }
    img
}

/// 5x7 dot patterns for the characters the rendered plate uses.
fn glyph_rows(c: char) -> [&'static str; 7] {
    match c {
        'A' => [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"],
        'B' => ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."],
        'C' => [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."],
        'D' => ["####.", "#...#", "#...#", "#...#", "#...#", "#...#", "####."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => ["####.", "....#", "....#", ".###.", "....#", "....#", "####."],
        _ => ["....."; 7],
    }
}

/// The `plate_scene` layout with `text` rendered in black 5x7 dot glyphs
/// (5 px dots) centered on the plate instead of solid blocks.
pub(crate) fn text_plate_scene(text: &str) -> RgbImage {
    const DOT: u32 = 5;
    const GAP: u32 = 10;
    let mut img = RgbImage::from_pixel(320, 100, BACKGROUND);
    drawing::draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(300, 80), PLATE);

    let count = text.chars().count() as u32;
    let text_width = count * 5 * DOT + count.saturating_sub(1) * GAP;
    let left = 10 + (300 - text_width.min(300)) / 2;
    let top = 10 + (80 - 7 * DOT) / 2;
    for (i, c) in text.chars().enumerate() {
        let x0 = left + i as u32 * (5 * DOT + GAP);
        for (row, bits) in glyph_rows(c).iter().enumerate() {
            for (col, bit) in bits.chars().enumerate() {
                if bit == '#' {
                    let dot = Rect::at((x0 + col as u32 * DOT) as i32, (top + row as u32 * DOT) as i32).of_size(DOT, DOT);
                    drawing::draw_filled_rect_mut(&mut img, dot, GLYPH);
                }
            }
        }
    }
    img
}

/// Whether the tesseract executable can be started.
pub(crate) fn tesseract_available() -> bool {
    std::process::Command::new("tesseract").arg("--version").output().is_ok()
}

/// 720x140 scene with two plates: 300x80 at (10, 30) and 360x110 at (340, 10).
pub(crate) fn two_plate_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(720, 140, BACKGROUND);
    drawing::draw_filled_rect_mut(&mut img, Rect::at(10, 30).of_size(300, 80), PLATE);
    drawing::draw_filled_rect_mut(&mut img, Rect::at(340, 10).of_size(360, 110), PLATE);
    img
}

/// 170x170 scene holding a 150x150 white square.
pub(crate) fn square_scene() -> RgbImage {
    let mut img = RgbImage::from_pixel(170, 170, BACKGROUND);
    drawing::draw_filled_rect_mut(&mut img, Rect::at(10, 10).of_size(150, 150), PLATE);
    img
}

/// 320x200 flat gray frame without any contour.
pub(crate) fn uniform_scene() -> RgbImage {
    RgbImage::from_pixel(320, 200, Rgb([128, 128, 128]))
}

/// Stands in for tesseract: reads a plate whenever the binary image has any
/// foreground, and nothing otherwise.
pub(crate) struct FakeEngine;

impl OcrEngine for FakeEngine {
    fn image_to_string(&self, img: &GrayImage) -> Result<String, LprError> {
        if img.pixels().any(|p| p[0] > 0) {
            Ok(" AB123CD\n".to_string())
        } else {
            Ok(String::new())
        }
    }
}

/// Engine that ignores the whitelist.
pub(crate) struct SloppyEngine;

impl OcrEngine for SloppyEngine {
    fn image_to_string(&self, _img: &GrayImage) -> Result<String, LprError> {
        Ok("ab 12-3.cd XY9\n\x0c".to_string())
    }
}
