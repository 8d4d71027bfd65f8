pub mod collection;
pub mod document;
mod export;
mod io;
pub mod layout;
mod options;
pub mod render;
mod session;
mod types;

pub use collection::{
    DecodedImage, ImageCollection, IngestFailure, IngestReport, RawFile, SourceImage,
    decode_file, decode_file_async,
};
pub use document::{DocumentWriter, ImageHandle, LopdfWriter, PageHandle};
pub use export::{BuildProgress, build_document, build_pdf, save_pdf};
pub use io::{content_type_for_path, load_raw_file, load_raw_files};
pub use layout::{PagePlan, Placement, Rect, compute_placement, page_dimensions, plan_page};
pub use options::*;
pub use session::{BuildTicket, ExportTarget, OutputArtifact, Session};
pub use types::*;
