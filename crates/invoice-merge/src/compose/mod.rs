//! Page composition - two images per output page
//!
//! This module orchestrates layout and rendering:
//! 1. Plan pages from image dimensions (pairs, in input order)
//! 2. Embed and draw each image into its slot
//! 3. Close each page, then finalize the document once

mod document;

pub use document::OutputDocument;

use crate::layout::plan_pages;
use crate::options::MergeOptions;
use crate::rasterize::RasterImage;
use crate::types::*;
use document::DocumentBuilder;

/// Lay out `images` two per page and render the output document.
///
/// Images are consumed in order and dropped as soon as they are embedded.
/// `on_progress` is called after every placed image.
pub fn compose(
    images: Vec<RasterImage>,
    options: &MergeOptions,
    mut on_progress: impl FnMut(&ProgressReport),
) -> Result<OutputDocument> {
    if images.is_empty() {
        return Err(MergeError::EmptyInputSet);
    }

    let geometry = options.geometry();
    let dimensions: Vec<(u32, u32)> = images.iter().map(RasterImage::dimensions).collect();
    let layouts = plan_pages(&dimensions, &geometry, options.scaling);

    let total = images.len();
    let page_total = layouts.len();
    log::debug!(
        "Composing {} images onto {} pages ({:.1}x{:.1} pt, slot {:?})",
        total,
        page_total,
        geometry.page_width,
        geometry.page_height,
        geometry.slot_size()
    );

    let mut builder = DocumentBuilder::new(geometry.page_width, geometry.page_height);
    let mut remaining = images.into_iter();
    let mut placed = 0;

    for (page_index, layout) in layouts.into_iter().enumerate() {
        let mut canvas = builder.new_canvas();

        for placement in &layout.placements {
            let Some(image) = remaining.next() else {
                break;
            };

            canvas.draw_image(
                builder.document_mut(),
                &image,
                &placement.rect,
                options.compress,
            )?;
            placed += 1;

            log::debug!(
                "Placed {} in {:?} slot at ({:.1}, {:.1}) size {:.1}x{:.1}",
                image.label(),
                placement.slot,
                placement.rect.x,
                placement.rect.y,
                placement.rect.width,
                placement.rect.height
            );

            on_progress(&ProgressReport {
                phase: MergePhase::Composing,
                processed: placed,
                total,
                label: image.label().to_string(),
            });
        }

        builder.push_page(canvas, layout);
        log::info!("Page {}/{} complete", page_index + 1, page_total);
    }

    Ok(builder.finish())
}
