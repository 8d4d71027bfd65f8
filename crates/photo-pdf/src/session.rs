//! Editing session state
//!
//! A [`Session`] owns everything one user edit holds: the ordered photos,
//! the most recent output document, and whether a build is running. Builds
//! are exclusive: [`Session::begin_build`] hands out a [`BuildTicket`] with a
//! snapshot of the collection, and no second ticket is issued until the
//! first is returned through [`Session::finish_build`].

use crate::collection::{ImageCollection, IngestReport, RawFile, SourceImage};
use crate::export::{BuildProgress, build_pdf};
use crate::options::ExportOptions;
use crate::types::*;
use std::sync::Arc;

/// What an export is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// Saved as a file
    Download,
    /// Kept in memory for display until dismissed
    Preview,
}

/// The document produced by the last successful build
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub file_name: String,
    pub bytes: Arc<[u8]>,
    pub page_count: usize,
    pub target: ExportTarget,
}

/// Permission to run one build, carrying the collection snapshot
#[derive(Debug)]
#[must_use = "a ticket must be returned through Session::finish_build"]
pub struct BuildTicket {
    images: Vec<SourceImage>,
    options: ExportOptions,
    target: ExportTarget,
    generation: u64,
}

impl BuildTicket {
    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn target(&self) -> ExportTarget {
        self.target
    }

    /// Build the document for this ticket's snapshot
    pub async fn build(
        &self,
        progress: impl FnMut(BuildProgress) + Send + 'static,
    ) -> Result<Vec<u8>> {
        build_pdf(self.images.clone(), self.options.clone(), progress).await
    }
}

#[derive(Debug, Default)]
pub struct Session {
    collection: ImageCollection,
    artifact: Option<OutputArtifact>,
    build_in_flight: bool,
    /// Bumped by every clear; builds from an older generation are dropped
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    /// Positional access to the collection
    pub fn collection_mut(&mut self) -> &mut ImageCollection {
        &mut self.collection
    }

    pub async fn add_files(&mut self, files: Vec<RawFile>) -> IngestReport {
        self.collection.add_batch(files).await
    }

    pub fn remove(&mut self, id: ImageId) -> Result<SourceImage> {
        self.collection.remove_by_id(id)
    }

    pub fn move_image(&mut self, id: ImageId, delta: isize) -> Result<bool> {
        self.collection.move_by_id(id, delta)
    }

    pub fn rotate(&mut self, id: ImageId) -> Result<Rotation> {
        self.collection.rotate_by_id(id)
    }

    /// Empty the collection and discard the last output document
    pub fn clear(&mut self) {
        self.collection.clear();
        self.release_artifact();
        self.generation += 1;
    }

    pub fn artifact(&self) -> Option<&OutputArtifact> {
        self.artifact.as_ref()
    }

    /// Discard a preview document; downloads are left alone
    pub fn dismiss_preview(&mut self) -> bool {
        let is_preview = matches!(
            &self.artifact,
            Some(artifact) if artifact.target == ExportTarget::Preview
        );
        if is_preview {
            self.release_artifact();
        }
        is_preview
    }

    pub fn is_building(&self) -> bool {
        self.build_in_flight
    }

    /// Start a build over the current order.
    pub fn begin_build(
        &mut self,
        options: &ExportOptions,
        target: ExportTarget,
    ) -> Result<BuildTicket> {
        if self.build_in_flight {
            return Err(PhotoPdfError::BuildInProgress);
        }
        if self.collection.is_empty() {
            return Err(PhotoPdfError::EmptyCollection);
        }
        options.validate()?;

        self.build_in_flight = true;
        log::debug!("Starting build of {} pages", self.collection.len());
        Ok(BuildTicket {
            images: self.collection.snapshot(),
            options: options.clone(),
            target,
            generation: self.generation,
        })
    }

    /// Return a ticket with its build result.
    ///
    /// On success the new document replaces (and releases) the previous one.
    /// On failure the previous document and the collection are untouched.
    /// A build started before the last [`Session::clear`] is dropped with
    /// `BuildDiscarded`, whatever its result.
    pub fn finish_build(
        &mut self,
        ticket: BuildTicket,
        result: Result<Vec<u8>>,
    ) -> Result<&OutputArtifact> {
        self.build_in_flight = false;
        if ticket.generation != self.generation {
            log::debug!("Dropping build of {} cleared pages", ticket.images.len());
            return Err(PhotoPdfError::BuildDiscarded);
        }
        let bytes = result?;

        self.release_artifact();
        Ok(&*self.artifact.insert(OutputArtifact {
            file_name: ticket.options.file_name(),
            bytes: Arc::from(bytes),
            page_count: ticket.images.len(),
            target: ticket.target,
        }))
    }

    /// Build and store a document in one call
    pub async fn export(
        &mut self,
        options: &ExportOptions,
        target: ExportTarget,
        progress: impl FnMut(BuildProgress) + Send + 'static,
    ) -> Result<&OutputArtifact> {
        let ticket = self.begin_build(options, target)?;
        let result = ticket.build(progress).await;
        self.finish_build(ticket, result)
    }

    fn release_artifact(&mut self) {
        if let Some(previous) = self.artifact.take() {
            log::debug!("Released {} ({} bytes)", previous.file_name, previous.bytes.len());
        }
    }
}
