//! Shared constants for invoice merging
//!
//! This module centralizes magic numbers and defaults used throughout
//! rasterization and layout.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// PDF user space units per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Layout Defaults
// =============================================================================

/// Default page margin in points
pub const DEFAULT_MARGIN_PT: f32 = 20.0;

/// Default gap between the two slots in points
pub const DEFAULT_SPACING_PT: f32 = 20.0;

/// Images per output page
pub const SLOTS_PER_PAGE: usize = 2;

// =============================================================================
// Rasterization
// =============================================================================

/// Default resolution for rendering PDF pages
pub const DEFAULT_DPI: u32 = 300;

/// Lowest accepted rendering resolution
pub const MIN_DPI: u32 = 72;

/// Highest accepted rendering resolution
pub const MAX_DPI: u32 = 1200;

/// Background used when flattening transparent pixels
pub const FLATTEN_BACKGROUND: [u8; 3] = [255, 255, 255];

/// File extensions accepted as input (lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff"];
