//! Slot geometry
//!
//! Computes the two fixed target boxes of an output page from the page
//! size, margin, spacing and slot arrangement.

use crate::types::SlotArrangement;

use super::{LayoutBox, PageGeometry, Slot};

// =============================================================================
// Slot Boxes
// =============================================================================

impl PageGeometry {
    /// Usable (width, height) of a single slot.
    ///
    /// TopBottom splits the height: `(W - 2m, (H - 2m - s) / 2)`.
    /// LeftRight splits the width: `((W - 2m - s) / 2, H - 2m)`.
    pub fn slot_size(&self) -> (f32, f32) {
        let inner_width = self.page_width - 2.0 * self.margin;
        let inner_height = self.page_height - 2.0 * self.margin;

        match self.arrangement {
            SlotArrangement::TopBottom => (inner_width, (inner_height - self.spacing) / 2.0),
            SlotArrangement::LeftRight => ((inner_width - self.spacing) / 2.0, inner_height),
        }
    }

    /// Target box for a slot.
    pub fn slot_box(&self, slot: Slot) -> LayoutBox {
        let (max_width, max_height) = self.slot_size();

        let (x, y) = match (self.arrangement, slot) {
            (SlotArrangement::TopBottom, Slot::First) => {
                (self.margin, self.page_height - self.margin - max_height)
            }
            (SlotArrangement::TopBottom, Slot::Second) => (self.margin, self.margin),
            (SlotArrangement::LeftRight, Slot::First) => (self.margin, self.margin),
            (SlotArrangement::LeftRight, Slot::Second) => {
                (self.margin + max_width + self.spacing, self.margin)
            }
        };

        LayoutBox {
            x,
            y,
            max_width,
            max_height,
        }
    }

    /// Both slot boxes in slot order
    pub fn slot_boxes(&self) -> [LayoutBox; 2] {
        [self.slot_box(Slot::First), self.slot_box(Slot::Second)]
    }
}
