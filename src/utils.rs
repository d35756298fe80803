use image::{ Rgb, RgbImage, imageops };
use imageproc::{ drawing, rect::Rect };

use crate::config::GuideConfig;

#[cfg(feature = "display-window")]
pub fn display_image(image: &RgbImage, title: &str) {
    let (width, height) = image.dimensions();
    imageproc::window::display_image(title, image, width, height);
}

/// Guide rectangle for a `width` x `height` frame. Edges are truncated
/// toward zero and the box is at least one pixel wide and high.
pub fn guide_rect(width: u32, height: u32, guide: &GuideConfig) -> Rect {
    let left = scaled(width, guide.left);
    let top = scaled(height, guide.top);
    let right = scaled(width, guide.right);
    let bottom = scaled(height, guide.bottom);
    let w = (right - left).max(1) as u32;
    let h = (bottom - top).max(1) as u32;
    Rect::at(left, top).of_size(w, h)
}

fn scaled(len: u32, fraction: f64) -> i32 {
    (len as f64 * fraction).floor() as i32
}

/// Owned copy of the part of `img` under `rect`, clipped to the image.
pub fn crop(img: &RgbImage, rect: Rect) -> RgbImage {
    let x = rect.left().max(0) as u32;
    let y = rect.top().max(0) as u32;
    imageops::crop_imm(img, x, y, rect.width(), rect.height()).to_image()
}

/// Outline `rect` on `img` with a border `thickness` pixels wide, growing inward.
pub fn draw_region(img: &mut RgbImage, rect: Rect, color: Rgb<u8>, thickness: u32) {
    for i in 0..thickness {
        let w = rect.width().saturating_sub(2 * i);
        let h = rect.height().saturating_sub(2 * i);
        if w == 0 || h == 0 {
            break;
        }
        let inner = Rect::at(rect.left() + i as i32, rect.top() + i as i32).of_size(w, h);
        drawing::draw_hollow_rect_mut(img, inner, color);
    }
}
