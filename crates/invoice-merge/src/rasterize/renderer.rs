//! PDF page rendering backends
//!
//! The rasterizer only needs two things from a PDF library: the page count
//! and a bitmap of one page at a given resolution. `PageRenderer` is that
//! seam; `PdfiumRenderer` is the production implementation.

use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Read-only access to PDF pages as bitmaps
pub trait PageRenderer {
    /// Number of pages in the document
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, RenderError>;

    /// Render one page (0-based) at `dpi` dots per inch
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        dpi: u32,
    ) -> Result<DynamicImage, RenderError>;
}

/// Create the renderer used when the caller does not supply one.
///
/// Returns `None` (with a warning) when no PDF backend can be loaded; PDF
/// inputs are then skipped as unreadable while images still merge.
pub fn default_renderer() -> Option<Box<dyn PageRenderer>> {
    #[cfg(feature = "pdfium")]
    {
        match PdfiumRenderer::new() {
            Ok(renderer) => Some(Box::new(renderer)),
            Err(e) => {
                log::warn!("PDF rendering unavailable: {}", e);
                None
            }
        }
    }

    #[cfg(not(feature = "pdfium"))]
    {
        log::warn!("PDF rendering unavailable: built without the `pdfium` feature");
        None
    }
}

#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRenderer;

#[cfg(feature = "pdfium")]
mod pdfium {
    use super::{PageRenderer, RenderError};
    use crate::constants::POINTS_PER_INCH;
    use image::DynamicImage;
    use pdfium_render::prelude::*;

    /// Environment variable pointing at a directory containing the pdfium library
    const PDFIUM_DIR_ENV: &str = "PDFIUM_LIB_DIR";

    impl From<PdfiumError> for RenderError {
        fn from(err: PdfiumError) -> Self {
            RenderError(err.to_string())
        }
    }

    /// Bind to pdfium, trying `$PDFIUM_LIB_DIR`, then the vendored
    /// library, then the system library.
    fn init_pdfium() -> Result<Pdfium, PdfiumError> {
        let env_path = std::env::var_os(PDFIUM_DIR_ENV).map(std::path::PathBuf::from);

        // When running from cargo, the working directory is the workspace root
        let vendor_path = std::env::current_dir().ok().and_then(|mut p| {
            p.push("vendor/pdfium/lib");
            if p.exists() { Some(p) } else { None }
        });

        for dir in env_path.into_iter().chain(vendor_path) {
            if let Ok(binding) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            {
                log::debug!("Bound pdfium from {}", dir.display());
                return Ok(Pdfium::new(binding));
            }
        }

        Pdfium::bind_to_system_library().map(Pdfium::new)
    }

    /// `PageRenderer` backed by the pdfium library
    pub struct PdfiumRenderer {
        pdfium: Pdfium,
    }

    impl PdfiumRenderer {
        pub fn new() -> Result<Self, RenderError> {
            Ok(Self {
                pdfium: init_pdfium()?,
            })
        }
    }

    impl PageRenderer for PdfiumRenderer {
        fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, RenderError> {
            let document = self.pdfium.load_pdf_from_byte_slice(pdf_bytes, None)?;
            Ok(document.pages().len() as usize)
        }

        fn render_page(
            &self,
            pdf_bytes: &[u8],
            page_index: usize,
            dpi: u32,
        ) -> Result<DynamicImage, RenderError> {
            let index = u16::try_from(page_index)
                .map_err(|_| RenderError(format!("page index {} out of range", page_index)))?;

            let document = self.pdfium.load_pdf_from_byte_slice(pdf_bytes, None)?;
            let page = document.pages().get(index)?;

            let config =
                PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
            let bitmap = page.render_with_config(&config)?;

            Ok(bitmap.as_image())
        }
    }
}
