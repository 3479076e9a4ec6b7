use std::path::PathBuf;
use thiserror::Error;

use crate::constants::mm_to_pt;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Unsupported input format: {}", .0.display())]
    InvalidInputFormat(PathBuf),
    #[error("Cannot read {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },
    #[error("PDF has no pages: {}", .0.display())]
    EmptyDocument(PathBuf),
    #[error("No images to lay out")]
    EmptyInputSet,
    #[error("Cannot write output {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MergeError>;

/// Per-file rasterization failure. Never fatal for a merge run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterizeError {
    #[error("cannot read {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },
    #[error("PDF has no pages: {}", .0.display())]
    EmptyDocument(PathBuf),
}

impl RasterizeError {
    pub fn path(&self) -> &PathBuf {
        match self {
            RasterizeError::UnreadableInput { path, .. } => path,
            RasterizeError::EmptyDocument(path) => path,
        }
    }
}

impl From<RasterizeError> for MergeError {
    fn from(err: RasterizeError) -> Self {
        match err {
            RasterizeError::UnreadableInput { path, reason } => {
                MergeError::UnreadableInput { path, reason }
            }
            RasterizeError::EmptyDocument(path) => MergeError::EmptyDocument(path),
        }
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Output paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    /// Explicit page size in points, used as given (orientation is ignored)
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Get base dimensions in millimeters (portrait)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Custom {
                width_pt,
                height_pt,
            } => (
                crate::constants::pt_to_mm(width_pt),
                crate::constants::pt_to_mm(height_pt),
            ),
        }
    }

    /// Get page dimensions in points with orientation applied
    pub fn dimensions_pt(self, orientation: Orientation) -> (f32, f32) {
        if let PaperSize::Custom {
            width_pt,
            height_pt,
        } = self
        {
            return (width_pt, height_pt);
        }

        let (w, h) = self.dimensions_mm();
        let (w, h) = (mm_to_pt(w), mm_to_pt(h));
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// How the two slots of an output page are arranged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SlotArrangement {
    /// First slot fills the top half, second slot the bottom half
    #[default]
    TopBottom,
    /// First slot fills the left half, second slot the right half
    LeftRight,
}

/// Image scaling behavior inside a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScalingMode {
    /// Scale until the image touches the slot's width or height
    #[default]
    Fit,
    /// Like `Fit`, but small images keep their natural size
    ShrinkOnly,
}

/// Which part of the pipeline a progress report comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePhase {
    Rasterizing,
    Composing,
}

impl std::fmt::Display for MergePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergePhase::Rasterizing => write!(f, "Rasterizing"),
            MergePhase::Composing => write!(f, "Composing"),
        }
    }
}

/// Progress notification passed to the caller's callback
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub phase: MergePhase,
    /// Items finished so far in this phase (1-based after the first item)
    pub processed: usize,
    /// Total items in this phase
    pub total: usize,
    /// File name of the item just handled
    pub label: String,
}

/// An input that was left out of the output
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInput {
    pub path: PathBuf,
    pub reason: String,
}

impl From<RasterizeError> for SkippedInput {
    fn from(err: RasterizeError) -> Self {
        Self {
            path: err.path().clone(),
            reason: err.to_string(),
        }
    }
}

/// Result of a successful merge run
#[derive(Debug, Clone, PartialEq)]
pub struct MergeReport {
    /// Number of pages in the written document
    pub output_pages: usize,
    /// Number of images placed on those pages
    pub placed: usize,
    /// Inputs that could not be rasterized, in input order
    pub skipped: Vec<SkippedInput>,
}

/// Planning numbers for a merge, computed without touching the inputs
#[derive(Debug, Clone, PartialEq)]
pub struct MergeStatistics {
    /// Number of input files
    pub inputs: usize,
    /// Output page count if every input rasterizes
    pub output_pages: usize,
    /// Empty slots on the final page (0 or 1)
    pub blank_slots: usize,
}
