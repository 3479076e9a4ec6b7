//! The merge entrypoint: validate, rasterize, compose, write

use crate::compose::compose;
use crate::input::{InputKind, validate_inputs};
use crate::io::save_pdf_blocking;
use crate::options::MergeOptions;
use crate::rasterize::{PageRenderer, Rasterizer, default_renderer, partition_outcomes};
use crate::types::*;
use std::path::{Path, PathBuf};

/// Merge `inputs` into a single PDF at `output`.
///
/// Inputs are validated up front; an unsupported file rejects the batch.
/// Files that cannot be rasterized are skipped, logged and listed in the
/// returned report. `on_progress` is called synchronously, once per input
/// while rasterizing and once per placed image while composing.
///
/// This runs on the calling thread. Use [`merge`] from async code.
pub fn merge_blocking(
    inputs: &[impl AsRef<Path>],
    output: &Path,
    options: &MergeOptions,
    renderer: Option<&dyn PageRenderer>,
    mut on_progress: impl FnMut(&ProgressReport),
) -> Result<MergeReport> {
    options.validate()?;
    let documents = validate_inputs(inputs)?;
    log::info!(
        "Merging {} files into {}",
        documents.len(),
        output.display()
    );

    let rasterizer = Rasterizer::new(renderer, options.dpi);
    let outcomes = rasterizer.rasterize_all(&documents, &mut on_progress);
    let (images, skipped) = partition_outcomes(outcomes);

    if !skipped.is_empty() {
        log::warn!(
            "{} of {} files skipped",
            skipped.len(),
            documents.len()
        );
    }

    let document = compose(images, options, &mut on_progress)?;
    let report = MergeReport {
        output_pages: document.page_count(),
        placed: document.placed_count(),
        skipped,
    };

    save_pdf_blocking(document, output)?;
    log::info!(
        "Merged {} images onto {} pages",
        report.placed,
        report.output_pages
    );

    Ok(report)
}

/// Async form of [`merge_blocking`] using the default PDF renderer.
///
/// The pipeline runs on a blocking thread; the renderer is created there
/// and only when at least one input is a PDF.
pub async fn merge(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    options: MergeOptions,
    on_progress: impl FnMut(&ProgressReport) + Send + 'static,
) -> Result<MergeReport> {
    options.validate()?;
    let documents = validate_inputs(&inputs)?;
    let needs_renderer = documents.iter().any(|doc| doc.kind == InputKind::Pdf);

    tokio::task::spawn_blocking(move || {
        let renderer = if needs_renderer {
            default_renderer()
        } else {
            None
        };
        merge_blocking(
            &inputs,
            &output,
            &options,
            renderer.as_deref(),
            on_progress,
        )
    })
    .await?
}
