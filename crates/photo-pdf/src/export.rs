//! PDF export
//!
//! Builds one page per photo, in the order of the snapshot it is given:
//! 1. Render the photo (rotation applied)
//! 2. Embed the raster and add a page
//! 3. Place the raster with a centered contain-fit
//! 4. Serialize the document

use crate::collection::SourceImage;
use crate::document::{DocumentWriter, LopdfWriter};
use crate::layout::plan_page;
use crate::options::ExportOptions;
use crate::render::render_for_export;
use crate::types::*;
use std::path::Path;

/// Progress reported while a document is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProgress {
    /// About to add page `current` (1-based) of `total`
    AddingPage { current: usize, total: usize },
    /// All pages added, serializing
    Finalizing,
}

/// Build a PDF from `images` with a fresh [`LopdfWriter`].
pub async fn build_pdf(
    images: Vec<SourceImage>,
    options: ExportOptions,
    progress: impl FnMut(BuildProgress) + Send + 'static,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let writer = LopdfWriter::new().with_title(options.file_name());
        build_document(&images, &options, writer, progress)
    })
    .await
    .map_err(|e| PhotoPdfError::Build(e.to_string()))?
}

/// Build a document with `writer`, one page per image.
///
/// Empty input fails with `EmptyCollection` before the writer is touched.
/// Rotation failures keep their own error; any other failure becomes a
/// `Build` error. Nothing is returned on failure, so no partial document
/// escapes.
pub fn build_document<W: DocumentWriter>(
    images: &[SourceImage],
    options: &ExportOptions,
    mut writer: W,
    mut progress: impl FnMut(BuildProgress),
) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(PhotoPdfError::EmptyCollection);
    }
    options.validate()?;

    let total = images.len();
    for (i, image) in images.iter().enumerate() {
        progress(BuildProgress::AddingPage {
            current: i + 1,
            total,
        });

        let raster = render_for_export(image)?;
        let embedded = writer
            .embed_raster(&raster.bytes, raster.format)
            .map_err(into_build_error)?;

        let plan = plan_page(embedded.width, embedded.height, options)?;
        let page = writer
            .add_page(plan.page_width, plan.page_height)
            .map_err(into_build_error)?;
        writer
            .draw_image(page, embedded, plan.placement.rect)
            .map_err(into_build_error)?;

        log::debug!(
            "Page {}/{}: {} at ({:.2}, {:.2}) {:.2}x{:.2}",
            i + 1,
            total,
            image.name(),
            plan.placement.rect.x,
            plan.placement.rect.y,
            plan.placement.rect.width,
            plan.placement.rect.height
        );
    }

    progress(BuildProgress::Finalizing);
    let bytes = writer.serialize().map_err(into_build_error)?;
    log::info!("Built PDF with {} pages ({} bytes)", total, bytes.len());
    Ok(bytes)
}

/// Write an exported document to disk
pub async fn save_pdf(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path.as_ref(), bytes).await?;
    Ok(())
}

fn into_build_error(error: PhotoPdfError) -> PhotoPdfError {
    match error {
        PhotoPdfError::Build(_) | PhotoPdfError::Rotation { .. } => error,
        other => PhotoPdfError::Build(other.to_string()),
    }
}
