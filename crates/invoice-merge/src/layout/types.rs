//! Layout data types
//!
//! These types sit between rasterization and PDF rendering. All
//! coordinates are PDF points with the origin at the bottom-left corner.

use crate::types::SlotArrangement;

/// One of the two image positions on an output page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Top half (TopBottom) or left half (LeftRight)
    First,
    /// Bottom half (TopBottom) or right half (LeftRight)
    Second,
}

impl Slot {
    /// Slot for the n-th image of a page
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Output page geometry shared by every page of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Gap between the two slots
    pub spacing: f32,
    pub arrangement: SlotArrangement,
}

/// Target rectangle for one slot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutBox {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    pub max_width: f32,
    pub max_height: f32,
}

impl LayoutBox {
    pub fn right(&self) -> f32 {
        self.x + self.max_width
    }

    pub fn top(&self) -> f32 {
        self.y + self.max_height
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Final position of one image on an output page
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index into the sequence of rasterized images
    pub source_index: usize,
    pub slot: Slot,
    /// Drawn position and size in points
    pub rect: Rect,
    /// Points per pixel
    pub scale: f32,
}

/// All placements of one output page, in slot order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    pub placements: Vec<Placement>,
}

impl PageLayout {
    /// True when the second slot is empty
    pub fn has_blank_slot(&self) -> bool {
        self.placements.len() < crate::constants::SLOTS_PER_PAGE
    }
}
