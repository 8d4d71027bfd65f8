//! Reading input files from disk

use crate::collection::RawFile;
use crate::types::*;
use std::path::Path;

/// Content type implied by a file extension
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") | Some("jpe") | Some("jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif") | Some("tiff") => "image/tiff",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Read a file, declaring its content type from the extension
pub async fn load_raw_file(path: impl AsRef<Path>) -> Result<RawFile> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(RawFile::new(name, content_type_for_path(path), bytes))
}

/// Read several files; unreadable files are returned as errors in place
pub async fn load_raw_files(paths: &[impl AsRef<Path>]) -> Vec<(String, Result<RawFile>)> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = load_raw_file(path).await.map_err(|e| PhotoPdfError::Decode {
            name: name.clone(),
            reason: e.to_string(),
        });
        files.push((name, result));
    }
    files
}
