//! Color normalization to opaque RGB

use crate::constants::FLATTEN_BACKGROUND;
use image::{DynamicImage, Rgb, RgbImage, Rgba};

/// Convert any decoded image to 8-bit RGB without transparency.
///
/// Images with an alpha channel are blended onto an opaque white canvas of
/// the same size, weighting each pixel by its own alpha. Everything else is
/// a plain color conversion. Pixel dimensions never change.
pub fn normalize_color(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.into_rgb8();
    }

    let rgba = image.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut canvas = RgbImage::from_pixel(width, height, Rgb(FLATTEN_BACKGROUND));

    for (x, y, pixel) in rgba.enumerate_pixels() {
        canvas.put_pixel(x, y, flatten_pixel(pixel));
    }

    canvas
}

fn flatten_pixel(pixel: &Rgba<u8>) -> Rgb<u8> {
    let alpha = pixel[3] as u32;
    let inv = 255 - alpha;
    let blend = |fg: u8, bg: u8| ((fg as u32 * alpha + bg as u32 * inv + 127) / 255) as u8;

    Rgb([
        blend(pixel[0], FLATTEN_BACKGROUND[0]),
        blend(pixel[1], FLATTEN_BACKGROUND[1]),
        blend(pixel[2], FLATTEN_BACKGROUND[2]),
    ])
}
