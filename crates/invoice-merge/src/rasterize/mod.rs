//! Rasterization - turning each input file into one opaque RGB bitmap
//!
//! PDFs contribute their first page only, rendered at the configured DPI.
//! Raster images are decoded and turned upright according to their EXIF
//! orientation. Both are normalized to RGB8 with any transparency
//! flattened onto white. Nothing is resized here.

mod normalize;
mod renderer;

pub use normalize::normalize_color;
pub use renderer::{PageRenderer, RenderError, default_renderer};

#[cfg(feature = "pdfium")]
pub use renderer::PdfiumRenderer;

use crate::input::{InputDocument, InputKind};
use crate::types::{MergePhase, ProgressReport, RasterizeError, SkippedInput};
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, ImageResult, RgbImage};
use std::io::{BufRead, Cursor, Seek};

/// A normalized bitmap ready for layout
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    label: String,
    pixels: RgbImage,
}

impl RasterImage {
    pub fn new(label: impl Into<String>, pixels: RgbImage) -> Self {
        Self {
            label: label.into(),
            pixels,
        }
    }

    /// Source file name
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// Outcome of rasterizing one input
#[derive(Debug, Clone, PartialEq)]
pub enum RasterOutcome {
    Rasterized(RasterImage),
    Skipped(SkippedInput),
}

/// Converts input documents to `RasterImage`s
pub struct Rasterizer<'a> {
    renderer: Option<&'a dyn PageRenderer>,
    dpi: u32,
}

impl<'a> Rasterizer<'a> {
    /// `renderer` may be `None`, in which case PDF inputs are unreadable.
    pub fn new(renderer: Option<&'a dyn PageRenderer>, dpi: u32) -> Self {
        Self { renderer, dpi }
    }

    /// Rasterize a single input.
    pub fn rasterize(&self, input: &InputDocument) -> Result<RasterImage, RasterizeError> {
        let bytes = std::fs::read(&input.path).map_err(|e| unreadable(input, e))?;

        let decoded = match input.kind {
            InputKind::Pdf => self.render_first_page(input, &bytes)?,
            InputKind::Image(format) => {
                decode_image(&bytes, format).map_err(|e| unreadable(input, e))?
            }
        };

        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(unreadable(input, "image has zero width or height"));
        }

        log::debug!(
            "Decoded {} as {}x{} {:?}",
            input.label(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );

        Ok(RasterImage::new(input.label(), normalize_color(decoded)))
    }

    fn render_first_page(
        &self,
        input: &InputDocument,
        bytes: &[u8],
    ) -> Result<DynamicImage, RasterizeError> {
        let renderer = self
            .renderer
            .ok_or_else(|| unreadable(input, "PDF rendering is unavailable"))?;

        let page_count = renderer
            .page_count(bytes)
            .map_err(|e| unreadable(input, e))?;
        if page_count == 0 {
            return Err(RasterizeError::EmptyDocument(input.path.clone()));
        }
        if page_count > 1 {
            log::info!(
                "{} has {} pages, using the first",
                input.label(),
                page_count
            );
        }

        renderer
            .render_page(bytes, 0, self.dpi)
            .map_err(|e| unreadable(input, e))
    }

    /// Rasterize every input in order, turning failures into skips.
    ///
    /// Exactly one outcome is returned per input, in input order.
    pub fn rasterize_all(
        &self,
        inputs: &[InputDocument],
        mut on_progress: impl FnMut(&ProgressReport),
    ) -> Vec<RasterOutcome> {
        let total = inputs.len();

        inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                log::info!("Rasterizing {}/{}: {}", i + 1, total, input.path.display());

                let outcome = match self.rasterize(input) {
                    Ok(image) => RasterOutcome::Rasterized(image),
                    Err(e) => {
                        log::warn!("Skipping {}: {}", input.path.display(), e);
                        RasterOutcome::Skipped(e.into())
                    }
                };

                on_progress(&ProgressReport {
                    phase: MergePhase::Rasterizing,
                    processed: i + 1,
                    total,
                    label: input.label(),
                });

                outcome
            })
            .collect()
    }
}

/// Split outcomes into images for layout and the skip manifest.
pub fn partition_outcomes(outcomes: Vec<RasterOutcome>) -> (Vec<RasterImage>, Vec<SkippedInput>) {
    let mut images = Vec::new();
    let mut skipped = Vec::new();

    for outcome in outcomes {
        match outcome {
            RasterOutcome::Rasterized(image) => images.push(image),
            RasterOutcome::Skipped(skip) => skipped.push(skip),
        }
    }

    (images, skipped)
}

/// Decode using the extension's format, falling back to content sniffing
/// when the extension lied.
fn decode_image(bytes: &[u8], format: ImageFormat) -> ImageResult<DynamicImage> {
    decode_upright(ImageReader::with_format(Cursor::new(bytes), format)).or_else(|_| {
        decode_upright(ImageReader::new(Cursor::new(bytes)).with_guessed_format()?)
    })
}

/// Decode and apply the EXIF orientation, so scans taken sideways on a
/// phone come out upright.
fn decode_upright<R: BufRead + Seek>(reader: ImageReader<R>) -> ImageResult<DynamicImage> {
    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image)
}

fn unreadable(input: &InputDocument, reason: impl std::fmt::Display) -> RasterizeError {
    RasterizeError::UnreadableInput {
        path: input.path.clone(),
        reason: reason.to_string(),
    }
}
