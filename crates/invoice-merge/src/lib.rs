//! Invoice merging - lay out invoice PDFs and images two per page
//!
//! Each input (the first page of a PDF, or a raster image) is rasterized
//! to an opaque RGB bitmap, then pairs of bitmaps are scaled to fit the top
//! and bottom halves of fixed-size pages in a single output PDF.

mod compose;
pub mod constants;
mod input;
mod io;
pub mod layout;
mod merge;
mod options;
pub mod rasterize;
mod render;
mod stats;
mod types;

pub use compose::{OutputDocument, compose};
pub use input::{InputDocument, InputKind, is_supported, validate_inputs};
pub use io::{save_pdf, save_pdf_blocking, to_bytes};
pub use merge::{merge, merge_blocking};
pub use options::*;
pub use rasterize::{PageRenderer, RasterImage, RasterOutcome, Rasterizer, RenderError};
pub use stats::calculate_statistics;
pub use types::*;
