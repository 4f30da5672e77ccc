//! JSON export document and re-import.
//!
//! The export is the only persistence the canvas has: image name and native
//! size, every marker, every annotation, and the export timestamp, written
//! as pretty-printed JSON. Import is the inverse and is strict: coordinates
//! must fit the image currently loaded, so a re-imported document renders
//! exactly as it did when exported.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

use crate::doc::{Annotation, PixelPoint, StyleError, check_width};

/// Errors from producing an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to format export timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("failed to serialize export: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from importing a previously exported document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("invalid export document: {0}")]
    Json(String),
    #[error("no image is loaded; upload the image before importing its markers")]
    NoImage,
    #[error("export was made for a {expected_width}x{expected_height} image but the loaded image is {width}x{height}")]
    SizeMismatch { expected_width: u32, expected_height: u32, width: u32, height: u32 },
    #[error("{id} references ({x}, {y}) outside the {width}x{height} image")]
    OutOfBounds { id: String, x: u32, y: u32, width: u32, height: u32 },
    #[error("annotation {id}: {source}")]
    Style { id: String, source: StyleError },
}

/// Native pixel size of the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Image metadata written into an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,
    pub size: ImageSize,
}

/// The exported document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub image: Option<ImageInfo>,
    pub markers: Vec<PixelPoint>,
    pub annotations: Vec<Annotation>,
    /// RFC 3339 UTC timestamp.
    pub export_date: String,
}

impl ExportDocument {
    /// Assemble a document stamped with `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Timestamp`] if `now` cannot be formatted.
    pub fn new(
        image: Option<ImageInfo>,
        markers: Vec<PixelPoint>,
        annotations: Vec<Annotation>,
        now: OffsetDateTime,
    ) -> Result<Self, ExportError> {
        let export_date = now.to_offset(time::UtcOffset::UTC).format(&Rfc3339)?;
        Ok(Self { image, markers, annotations, export_date })
    }

    /// Pretty-printed JSON, two-space indented.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] on serialization failure.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an export document.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Json`] for malformed JSON or unknown shapes.
    pub fn from_json(raw: &str) -> Result<Self, ImportError> {
        serde_json::from_str(raw).map_err(|e| ImportError::Json(e.to_string()))
    }

    /// Suggested download name for this document.
    #[must_use]
    pub fn file_name(&self) -> String {
        match OffsetDateTime::parse(&self.export_date, &Rfc3339) {
            Ok(at) => file_name(at.date()),
            Err(_) => file_name(OffsetDateTime::UNIX_EPOCH.date()),
        }
    }

    /// Check the document against an image of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns the first size, bounds, or stroke-width problem found.
    pub fn check_fits(&self, width: u32, height: u32) -> Result<(), ImportError> {
        if let Some(info) = &self.image {
            if info.size.width != width || info.size.height != height {
                return Err(ImportError::SizeMismatch {
                    expected_width: info.size.width,
                    expected_height: info.size.height,
                    width,
                    height,
                });
            }
        }
        let outside = |id: &str, x: u32, y: u32| {
            (x >= width || y >= height).then(|| ImportError::OutOfBounds { id: id.to_owned(), x, y, width, height })
        };
        for marker in &self.markers {
            if let Some(err) = outside(&marker.id, marker.x, marker.y) {
                return Err(err);
            }
        }
        for annotation in &self.annotations {
            check_width(annotation.stroke_width)
                .map_err(|source| ImportError::Style { id: annotation.id.clone(), source })?;
            for coord in annotation.shape.coords() {
                if let Some(err) = outside(&annotation.id, coord.x, coord.y) {
                    return Err(err);
                }
            }
        }
        Ok(())
    }
}

/// `pixel-marker-data-YYYY-MM-DD.json` for the given day.
#[must_use]
pub fn file_name(date: Date) -> String {
    format!("pixel-marker-data-{:04}-{:02}-{:02}.json", date.year(), u8::from(date.month()), date.day())
}
