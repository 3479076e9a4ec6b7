//! Image placement within slots
//!
//! This module handles the final position of each image:
//! - Fit-to-box scaling that preserves aspect ratio
//! - Horizontal centering
//! - Anchoring to the top or bottom margin
//! - Pairing images onto pages in input order

use crate::constants::SLOTS_PER_PAGE;
use crate::types::{ScalingMode, SlotArrangement};

use super::{LayoutBox, PageGeometry, PageLayout, Placement, Rect, Slot};

/// Calculate the scale factor that fits a `width`×`height` image into a box.
///
/// `Fit` always touches one side of the box. `ShrinkOnly` never exceeds 1.0.
pub fn calculate_scale(width: f32, height: f32, target: &LayoutBox, mode: ScalingMode) -> f32 {
    let scale_w = target.max_width / width;
    let scale_h = target.max_height / height;
    let fit = scale_w.min(scale_h);

    match mode {
        ScalingMode::Fit => fit,
        ScalingMode::ShrinkOnly => fit.min(1.0),
    }
}

/// Place one image into a slot.
///
/// # Arguments
/// * `geometry` - Page geometry for the run
/// * `slot` - Target slot
/// * `source_index` - Index of the image in the rasterized sequence
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `mode` - Scaling mode
pub fn place_image(
    geometry: &PageGeometry,
    slot: Slot,
    source_index: usize,
    width: u32,
    height: u32,
    mode: ScalingMode,
) -> Placement {
    let target = geometry.slot_box(slot);
    let scale = calculate_scale(width as f32, height as f32, &target, mode);

    let scaled_width = width as f32 * scale;
    let scaled_height = height as f32 * scale;

    let (x, y) = match geometry.arrangement {
        SlotArrangement::TopBottom => {
            // Centered on the page, pushed against the nearest outer margin
            let x = (geometry.page_width - scaled_width) / 2.0;
            let y = match slot {
                Slot::First => geometry.page_height - geometry.margin - scaled_height,
                Slot::Second => geometry.margin,
            };
            (x, y)
        }
        SlotArrangement::LeftRight => {
            // Centered within its half, hanging from the top margin
            let x = target.x + (target.max_width - scaled_width) / 2.0;
            let y = target.top() - scaled_height;
            (x, y)
        }
    };

    Placement {
        source_index,
        slot,
        rect: Rect::new(x, y, scaled_width, scaled_height),
        scale,
    }
}

/// Lay out a sequence of images, two per page, strictly in input order.
///
/// `dimensions` holds the (width, height) in pixels of each image. The
/// last page holds a single image when the count is odd.
pub fn plan_pages(
    dimensions: &[(u32, u32)],
    geometry: &PageGeometry,
    mode: ScalingMode,
) -> Vec<PageLayout> {
    dimensions
        .chunks(SLOTS_PER_PAGE)
        .enumerate()
        .map(|(page_index, chunk)| {
            let placements = chunk
                .iter()
                .enumerate()
                .filter_map(|(slot_index, &(width, height))| {
                    let slot = Slot::from_index(slot_index)?;
                    let source_index = page_index * SLOTS_PER_PAGE + slot_index;
                    Some(place_image(geometry, slot, source_index, width, height, mode))
                })
                .collect();
            PageLayout { placements }
        })
        .collect()
}
