//! PDF rendering modules
//!
//! This module handles all PDF-specific output operations:
//! - Embedding bitmaps as image XObjects
//! - Building output pages with placement matrices

mod page;
mod xobject;

pub use page::PageCanvas;
pub use xobject::create_image_xobject;
