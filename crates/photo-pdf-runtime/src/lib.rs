use std::path::PathBuf;
use std::sync::Arc;

mod worker;

// Re-export types from the library crate
pub use photo_pdf::{ExportOptions, ExportTarget, ImageId, RasterFormat, RawFile, Rotation};
pub use worker::session_worker;

/// Commands sent from the front end to the session worker
#[derive(Debug)]
pub enum SessionCommand {
    AddFiles {
        files: Vec<RawFile>,
    },
    AddPaths {
        paths: Vec<PathBuf>,
    },
    Remove {
        id: ImageId,
    },
    Move {
        id: ImageId,
        delta: isize,
    },
    Rotate {
        id: ImageId,
    },
    Clear,
    /// Build a document from the current order
    Export {
        options: ExportOptions,
        destination: ExportDestination,
    },
    DismissPreview,
}

/// Where an export ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportDestination {
    /// Written into this directory under the options' file name
    Directory(PathBuf),
    /// Kept in memory and handed back as a preview
    Preview,
}

impl ExportDestination {
    pub fn target(&self) -> ExportTarget {
        match self {
            ExportDestination::Directory(_) => ExportTarget::Download,
            ExportDestination::Preview => ExportTarget::Preview,
        }
    }
}

/// Summary of one image, as shown in a list
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSummary {
    pub id: ImageId,
    pub name: String,
    pub format: RasterFormat,
    pub rotation: Rotation,
    pub width: u32,
    pub height: u32,
}

/// Updates sent from the session worker to the front end
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    /// The collection changed, or an ingestion batch finished; carries the
    /// full new order
    CollectionChanged {
        images: Vec<ImageSummary>,
    },
    /// A file of an ingestion batch was skipped
    FileSkipped {
        name: String,
        message: String,
    },
    BuildStarted {
        page_count: usize,
    },
    Exported {
        path: PathBuf,
        page_count: usize,
    },
    PreviewReady {
        file_name: String,
        page_count: usize,
        bytes: Arc<[u8]>,
    },
    PreviewDismissed,
    Error {
        message: String,
    },
}
