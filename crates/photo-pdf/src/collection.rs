//! Ordered image collection
//!
//! The collection owns the photos of an editing session in export order,
//! together with each photo's rotation. Every operation is synchronous;
//! decoding happens before an image is inserted, so a mutation is visible as
//! soon as the call returns.

use crate::types::*;
use image::DynamicImage;
use std::sync::Arc;

/// Display name used when a file arrives without one
pub const FALLBACK_NAME: &str = "photo";

/// A file handed to the collection for ingestion
#[derive(Debug, Clone)]
pub struct RawFile {
    pub name: String,
    /// Declared MIME type, e.g. `image/jpeg`
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl RawFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            name.to_string()
        }
    }
}

/// A successfully decoded file that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct DecodedImage {
    name: String,
    format: RasterFormat,
    pixels: DynamicImage,
    encoded: Vec<u8>,
}

impl DecodedImage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }
}

/// Check the declared type and decode a file.
///
/// Fails with `UnsupportedFormat` before touching the bytes when the content
/// type is not accepted, and with `Decode` when the bytes are unreadable.
pub fn decode_file(file: RawFile) -> Result<DecodedImage> {
    let name = file.display_name();
    let format = RasterFormat::from_content_type(&file.content_type).ok_or_else(|| {
        PhotoPdfError::UnsupportedFormat {
            name: name.clone(),
            content_type: file.content_type.clone(),
        }
    })?;

    let pixels = image::load_from_memory_with_format(&file.bytes, format.image_format())
        .map_err(|e| PhotoPdfError::Decode {
            name: name.clone(),
            reason: e.to_string(),
        })?;

    Ok(DecodedImage {
        name,
        format,
        pixels,
        encoded: file.bytes,
    })
}

/// Decode a file on the blocking pool
pub async fn decode_file_async(file: RawFile) -> Result<DecodedImage> {
    let name = file.display_name();
    tokio::task::spawn_blocking(move || decode_file(file))
        .await
        .map_err(|e| PhotoPdfError::Decode {
            name,
            reason: e.to_string(),
        })?
}

/// A photo in the collection.
///
/// Pixel data and the original encoded bytes are shared, so cloning a
/// `SourceImage` (e.g. for a build snapshot) does not copy the raster.
#[derive(Debug, Clone)]
pub struct SourceImage {
    id: ImageId,
    name: String,
    format: RasterFormat,
    pixels: Arc<DynamicImage>,
    encoded: Arc<[u8]>,
    rotation: Rotation,
}

impl SourceImage {
    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    /// The bytes the image was ingested from
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Source pixel dimensions (width, height), before rotation
    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }

    /// Pixel dimensions after applying the current rotation
    pub fn rotated_dimensions(&self) -> (u32, u32) {
        let (w, h) = self.dimensions();
        if self.rotation.swaps_dimensions() {
            (h, w)
        } else {
            (w, h)
        }
    }
}

/// Outcome of ingesting a batch of files
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Ids of the images that were added, in insertion order
    pub added: Vec<ImageId>,
    /// Files that were skipped, with the reason
    pub failures: Vec<IngestFailure>,
}

#[derive(Debug)]
pub struct IngestFailure {
    pub name: String,
    pub error: PhotoPdfError,
}

/// The ordered photos of one editing session
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<SourceImage>,
    next_id: u64,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceImage> {
        self.images.iter()
    }

    pub fn get(&self, position: usize) -> Option<&SourceImage> {
        self.images.get(position)
    }

    pub fn get_by_id(&self, id: ImageId) -> Option<&SourceImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn position_of(&self, id: ImageId) -> Option<usize> {
        self.images.iter().position(|img| img.id == id)
    }

    /// Ids in current order
    pub fn ids(&self) -> Vec<ImageId> {
        self.images.iter().map(|img| img.id).collect()
    }

    /// Decode a file and append it.
    pub fn add(&mut self, file: RawFile) -> Result<&SourceImage> {
        let decoded = decode_file(file)?;
        Ok(self.insert(decoded))
    }

    /// Append an already decoded image with a fresh id and no rotation.
    pub fn insert(&mut self, decoded: DecodedImage) -> &SourceImage {
        let id = ImageId(self.next_id);
        self.next_id += 1;

        log::debug!(
            "Added {} as {} ({}x{})",
            decoded.name,
            id,
            decoded.pixels.width(),
            decoded.pixels.height()
        );

        self.images.push(SourceImage {
            id,
            name: decoded.name,
            format: decoded.format,
            pixels: Arc::new(decoded.pixels),
            encoded: Arc::from(decoded.encoded),
            rotation: Rotation::None,
        });
        &self.images[self.images.len() - 1]
    }

    /// Ingest a batch of files.
    ///
    /// Files are decoded concurrently but inserted in the order given. A file
    /// that fails is reported and skipped; the rest of the batch continues.
    pub async fn add_batch(&mut self, files: Vec<RawFile>) -> IngestReport {
        let pending: Vec<_> = files
            .into_iter()
            .map(|file| {
                let name = file.display_name();
                let decode = match RasterFormat::from_content_type(&file.content_type) {
                    Some(_) => Ok(tokio::task::spawn_blocking(move || decode_file(file))),
                    None => Err(PhotoPdfError::UnsupportedFormat {
                        name: name.clone(),
                        content_type: file.content_type,
                    }),
                };
                (name, decode)
            })
            .collect();

        let mut report = IngestReport::default();
        for (name, decode) in pending {
            let result = match decode {
                Ok(handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => Err(PhotoPdfError::Decode {
                        name: name.clone(),
                        reason: e.to_string(),
                    }),
                },
                Err(e) => Err(e),
            };

            match result {
                Ok(decoded) => {
                    let id = self.insert(decoded).id;
                    report.added.push(id);
                }
                Err(error) => {
                    log::warn!("{}", error);
                    report.failures.push(IngestFailure { name, error });
                }
            }
        }

        report
    }

    /// Remove the image at `position`; later images shift down by one.
    pub fn remove(&mut self, position: usize) -> Result<SourceImage> {
        self.check_position(position)?;
        let removed = self.images.remove(position);
        log::debug!("Removed {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn remove_by_id(&mut self, id: ImageId) -> Result<SourceImage> {
        let position = self.require_id(id)?;
        self.remove(position)
    }

    /// Move the image at `position` by `delta` places.
    ///
    /// Moves that would leave the collection (first item up, last item down,
    /// or an invalid source position) are ignored. Returns whether anything
    /// moved.
    pub fn move_image(&mut self, position: usize, delta: isize) -> bool {
        if position >= self.images.len() {
            return false;
        }
        let Some(target) = position.checked_add_signed(delta) else {
            return false;
        };
        if target >= self.images.len() || target == position {
            return false;
        }

        let item = self.images.remove(position);
        self.images.insert(target, item);
        true
    }

    pub fn move_by_id(&mut self, id: ImageId, delta: isize) -> Result<bool> {
        let position = self.require_id(id)?;
        Ok(self.move_image(position, delta))
    }

    /// Rotate the image at `position` a quarter turn clockwise.
    pub fn rotate(&mut self, position: usize) -> Result<Rotation> {
        self.check_position(position)?;
        let image = &mut self.images[position];
        image.rotation = image.rotation.quarter_turn();
        Ok(image.rotation)
    }

    pub fn rotate_by_id(&mut self, id: ImageId) -> Result<Rotation> {
        let position = self.require_id(id)?;
        self.rotate(position)
    }

    /// Drop every image. Ids keep counting up afterwards.
    pub fn clear(&mut self) {
        self.images.clear();
    }

    /// Clone the current order for an export
    pub fn snapshot(&self) -> Vec<SourceImage> {
        self.images.clone()
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.images.len() {
            return Err(PhotoPdfError::InvalidPosition {
                position,
                len: self.images.len(),
            });
        }
        Ok(())
    }

    fn require_id(&self, id: ImageId) -> Result<usize> {
        self.position_of(id).ok_or(PhotoPdfError::UnknownImage(id))
    }
}
