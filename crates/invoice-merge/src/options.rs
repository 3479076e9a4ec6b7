use crate::constants::{DEFAULT_DPI, DEFAULT_MARGIN_PT, DEFAULT_SPACING_PT, MAX_DPI, MIN_DPI};
use crate::layout::PageGeometry;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Merge configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MergeOptions {
    // Output page
    pub paper_size: PaperSize,
    pub orientation: Orientation,

    // Geometry, in points
    pub margin_pt: f32,
    pub spacing_pt: f32,

    // Placement
    pub arrangement: SlotArrangement,
    pub scaling: ScalingMode,

    // Rasterization
    pub dpi: u32,

    /// Flate-compress embedded images (lossless)
    pub compress: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_pt: DEFAULT_MARGIN_PT,
            spacing_pt: DEFAULT_SPACING_PT,
            arrangement: SlotArrangement::TopBottom,
            scaling: ScalingMode::Fit,
            dpi: DEFAULT_DPI,
            compress: true,
        }
    }
}

impl MergeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| MergeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| MergeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page geometry these options describe
    pub fn geometry(&self) -> PageGeometry {
        let (page_width, page_height) = self.paper_size.dimensions_pt(self.orientation);
        PageGeometry {
            page_width,
            page_height,
            margin: self.margin_pt,
            spacing: self.spacing_pt,
            arrangement: self.arrangement,
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.margin_pt.is_finite() || self.margin_pt < 0.0 {
            return Err(MergeError::Config(format!(
                "Margin must be a non-negative number, got {}",
                self.margin_pt
            )));
        }

        if !self.spacing_pt.is_finite() || self.spacing_pt < 0.0 {
            return Err(MergeError::Config(format!(
                "Spacing must be a non-negative number, got {}",
                self.spacing_pt
            )));
        }

        let (page_width, page_height) = self.paper_size.dimensions_pt(self.orientation);
        if !(page_width > 0.0 && page_height > 0.0) {
            return Err(MergeError::Config(format!(
                "Page size must be positive, got {}x{} pt",
                page_width, page_height
            )));
        }

        let slot = self
            .geometry()
            .slot_box(crate::layout::Slot::First);
        if slot.max_width <= 0.0 || slot.max_height <= 0.0 {
            return Err(MergeError::Config(format!(
                "Margins and spacing leave no room for images ({:.1}x{:.1} pt per slot)",
                slot.max_width, slot.max_height
            )));
        }

        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(MergeError::Config(format!(
                "DPI must be between {} and {}, got {}",
                MIN_DPI, MAX_DPI, self.dpi
            )));
        }

        Ok(())
    }
}
