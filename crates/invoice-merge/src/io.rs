//! Document output

use crate::compose::OutputDocument;
use crate::types::*;
use std::io::Write;
use std::path::Path;

/// Serialize a finished document to PDF bytes
pub fn to_bytes(output: OutputDocument) -> Result<Vec<u8>> {
    let mut document = output.into_document();
    let mut writer = Vec::new();
    document.save_to(&mut writer)?;
    Ok(writer)
}

/// Save the merged document.
///
/// The bytes are staged in a temporary file next to `path` and moved over
/// it only once fully written, so a failed run never leaves a partial PDF.
pub async fn save_pdf(output: OutputDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    tokio::task::spawn_blocking(move || save_pdf_blocking(output, &path)).await?
}

/// Blocking form of [`save_pdf`]
pub fn save_pdf_blocking(output: OutputDocument, path: &Path) -> Result<()> {
    let bytes = to_bytes(output)?;
    write_atomic(path, &bytes).map_err(|source| MergeError::OutputWrite {
        path: path.to_owned(),
        source,
    })?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
