//! Image XObject creation
//!
//! Each rasterized bitmap is embedded once as an RGB image XObject and then
//! drawn on its output page with a transformation matrix.

use crate::types::Result;
use image::RgbImage;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

// =============================================================================
// XObject Creation
// =============================================================================

/// Embed an RGB bitmap as an image XObject.
///
/// # Arguments
/// * `output` - The output document to add the XObject to
/// * `pixels` - Opaque 8-bit RGB pixel data
/// * `compress` - Apply lossless Flate compression to the pixel stream
pub fn create_image_xobject(
    output: &mut Document,
    pixels: &RgbImage,
    compress: bool,
) -> Result<ObjectId> {
    let (width, height) = pixels.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let mut stream = Stream::new(dict, pixels.as_raw().clone());
    if compress {
        stream.compress()?;
    }

    Ok(output.add_object(stream))
}
