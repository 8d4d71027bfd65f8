use crate::layout::page_dimensions;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Base name used when the user leaves the output name blank
pub const DEFAULT_OUTPUT_NAME: &str = "converted-photos";

/// Export configuration, chosen per conversion
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin: Margin,

    /// Output base name, without extension
    pub output_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margin: Margin::None,
            output_name: String::new(),
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| PhotoPdfError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PhotoPdfError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page dimensions in points with orientation applied
    pub fn page_dimensions(&self) -> (f32, f32) {
        page_dimensions(self.page_size, self.orientation)
    }

    /// File name of the exported document: trimmed base name plus `.pdf`
    pub fn file_name(&self) -> String {
        let base = self.output_name.trim();
        let base = if base.is_empty() {
            DEFAULT_OUTPUT_NAME
        } else {
            base
        };
        format!("{}.pdf", base)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_dimensions();
        let margin = self.margin.points();
        if width - 2.0 * margin <= 0.0 || height - 2.0 * margin <= 0.0 {
            return Err(PhotoPdfError::InvalidLayout(format!(
                "{:?} margin leaves no printable area on a {} page",
                self.margin,
                self.page_size.name()
            )));
        }

        if self
            .output_name
            .trim()
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '\0'))
        {
            return Err(PhotoPdfError::Config(format!(
                "Output name '{}' must not contain path separators",
                self.output_name
            )));
        }

        Ok(())
    }
}
