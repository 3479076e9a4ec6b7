//! Layout calculation modules
//!
//! This module handles all the geometric calculations for placing images:
//! - Slot boxes (where each of the two images of a page may go)
//! - Content placement (scaling, centering, anchoring)
//! - Pairing images onto pages

mod placement;
mod slots;
mod types;

pub use placement::*;
pub use types::*;
