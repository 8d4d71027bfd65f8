use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoPdfError {
    #[error("Skipped {name}: unsupported format ({content_type})")]
    UnsupportedFormat { name: String, content_type: String },
    #[error("Could not load {name}: {reason}")]
    Decode { name: String, reason: String },
    #[error("Add some photos before converting")]
    EmptyCollection,
    #[error("Failed to rotate {name}: {reason}")]
    Rotation { name: String, reason: String },
    #[error("Conversion failed: {0}")]
    Build(String),
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
    #[error("No image at position {position} (collection has {len})")]
    InvalidPosition { position: usize, len: usize },
    #[error("No image with id {0}")]
    UnknownImage(ImageId),
    #[error("A conversion is already in progress")]
    BuildInProgress,
    #[error("Conversion discarded: the photos were cleared while it ran")]
    BuildDiscarded,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl PhotoPdfError {
    /// Whether this error only affects a single file of an ingestion batch
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            PhotoPdfError::UnsupportedFormat { .. } | PhotoPdfError::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PhotoPdfError>;

/// Stable identifier of an image within a collection.
///
/// Ids are handed out by the owning collection in increasing order and are
/// never reused, even after the image they named was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raster encodings accepted for ingestion and embedding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RasterFormat {
    Jpeg,
    Png,
}

impl RasterFormat {
    /// Content types accepted at ingestion
    pub const ACCEPTED_CONTENT_TYPES: [&'static str; 3] = ["image/jpeg", "image/jpg", "image/png"];

    /// Resolve a declared content type, matched case-insensitively
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let lowered = content_type.trim().to_ascii_lowercase();
        if !Self::ACCEPTED_CONTENT_TYPES.contains(&lowered.as_str()) {
            return None;
        }
        if lowered.contains("png") {
            Some(RasterFormat::Png)
        } else {
            Some(RasterFormat::Jpeg)
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
        }
    }

    pub(crate) fn image_format(self) -> image::ImageFormat {
        match self {
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
            RasterFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Clockwise rotation applied to an image at export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// The rotation after one more quarter turn (270 wraps to 0)
    pub fn quarter_turn(self) -> Self {
        match self {
            Rotation::None => Rotation::Clockwise90,
            Rotation::Clockwise90 => Rotation::Clockwise180,
            Rotation::Clockwise180 => Rotation::Clockwise270,
            Rotation::Clockwise270 => Rotation::None,
        }
    }

    /// Whether the rotated raster has width and height swapped
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Clockwise90 | Rotation::Clockwise270)
    }
}

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Portrait => Orientation::Landscape,
            Orientation::Landscape => Orientation::Portrait,
        }
    }
}

/// Supported output page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    #[default]
    A4,
    Letter,
}

impl PageSize {
    /// Portrait dimensions in points
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
        }
    }
}

/// Margin presets applied uniformly on all four sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Margin {
    #[default]
    None,
    Small,
    Medium,
}

impl Margin {
    pub fn points(self) -> f32 {
        match self {
            Margin::None => 0.0,
            Margin::Small => 20.0,
            Margin::Medium => 40.0,
        }
    }
}
