//! Input documents and upfront format validation

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::types::*;
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Declared kind of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Image(ImageFormat),
}

/// A source file selected for merging
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub path: PathBuf,
    pub kind: InputKind,
}

impl InputDocument {
    /// Classify a path by its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let kind = detect_kind(path).ok_or_else(|| MergeError::InvalidInputFormat(path.to_owned()))?;
        Ok(Self {
            path: path.to_owned(),
            kind,
        })
    }

    /// File name used in logs and progress reports
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Whether a path has a supported extension
pub fn is_supported(path: impl AsRef<Path>) -> bool {
    detect_kind(path.as_ref()).is_some()
}

/// Validate a whole batch before any processing starts.
///
/// The first unsupported path rejects the batch.
pub fn validate_inputs(paths: &[impl AsRef<Path>]) -> Result<Vec<InputDocument>> {
    if paths.is_empty() {
        return Err(MergeError::EmptyInputSet);
    }

    paths.iter().map(|path| InputDocument::from_path(path)).collect()
}

fn detect_kind(path: &Path) -> Option<InputKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    if ext == "pdf" {
        Some(InputKind::Pdf)
    } else {
        ImageFormat::from_extension(&ext).map(InputKind::Image)
    }
}
