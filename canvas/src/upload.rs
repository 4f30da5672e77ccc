//! Image upload: validation, decoding, and the one-upload-in-flight guard.
//!
//! An upload goes through three steps. [`UploadSlot::begin`] checks the file
//! (MIME type `image/*`, at most [`MAX_UPLOAD_BYTES`]) and refuses to start
//! while another upload is loading. [`ImageSession::decode`] turns the bytes
//! into a premultiplied `Pixmap` ready for the renderer. The slot is then
//! released whatever the outcome, so a failed decode can be retried.
//!
//! Nothing here touches the marker document; the engine decides what a
//! successful session replaces.

#[cfg(test)]
#[path = "upload_test.rs"]
mod upload_test;

use std::fmt;
use std::path::Path;

use tiny_skia::{ColorU8, Pixmap};

use crate::consts::MAX_UPLOAD_BYTES;
use crate::export::{ImageInfo, ImageSize};

/// Errors surfaced to the user while loading an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The file is not an image.
    #[error("please select a valid image file (max 10MB): '{mime}' is not an image type")]
    UnsupportedType { mime: String },
    /// The file is larger than the upload limit.
    #[error("please select a valid image file (max 10MB): {size} bytes is too large")]
    TooLarge { size: usize },
    /// Another upload has not finished yet.
    #[error("an image is already loading")]
    Busy,
    /// The bytes could not be decoded as a raster image.
    #[error("failed to load image: {0}")]
    Decode(String),
    /// The file could not be read from disk.
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// A candidate upload: file name, declared MIME type, and raw bytes.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    #[must_use]
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), mime: mime.into(), bytes }
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Read`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path).map_err(|e| UploadError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mime = match image::ImageFormat::from_path(path) {
            Ok(format) => format.to_mime_type().to_owned(),
            Err(_) => "application/octet-stream".to_owned(),
        };
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, mime, bytes })
    }

    /// Check the MIME type and size limit.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedType`] or [`UploadError::TooLarge`].
    pub fn validate(&self) -> Result<(), UploadError> {
        if !self.mime.starts_with("image/") {
            return Err(UploadError::UnsupportedType { mime: self.mime.clone() });
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size: self.bytes.len() });
        }
        Ok(())
    }
}

/// The currently loaded image: its name, native size, and decoded pixels.
#[derive(Clone)]
pub struct ImageSession {
    name: String,
    pixmap: Pixmap,
}

impl ImageSession {
    /// Decode an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Decode`] when the bytes are not a decodable image.
    pub fn decode(file: &ImageFile) -> Result<Self, UploadError> {
        let decoded = image::load_from_memory(&file.bytes).map_err(|e| UploadError::Decode(e.to_string()))?;
        Self::from_rgba(file.name.clone(), &decoded.to_rgba8())
    }

    /// Build a session from an already decoded straight-alpha RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Decode`] for an empty image.
    pub fn from_rgba(name: impl Into<String>, rgba: &image::RgbaImage) -> Result<Self, UploadError> {
        let (width, height) = rgba.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or_else(|| UploadError::Decode(format!("unsupported size {width}x{height}")))?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(Self { name: name.into(), pixmap })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Decoded, premultiplied pixels.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Name and native size, as written into exports.
    #[must_use]
    pub fn info(&self) -> ImageInfo {
        ImageInfo { name: self.name.clone(), size: ImageSize { width: self.width(), height: self.height() } }
    }
}

impl fmt::Debug for ImageSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSession")
            .field("name", &self.name)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

/// Upload guard: at most one image loads at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadSlot {
    /// No upload in flight.
    #[default]
    Ready,
    /// A file is being decoded.
    Loading { name: String },
}

impl UploadSlot {
    /// Validate `file` and mark the slot busy.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Busy`] while another upload is loading, or the
    /// validation error for `file`. The slot is unchanged on error.
    pub fn begin(&mut self, file: &ImageFile) -> Result<(), UploadError> {
        if self.is_loading() {
            return Err(UploadError::Busy);
        }
        file.validate()?;
        *self = Self::Loading { name: file.name.clone() };
        Ok(())
    }

    /// Release the slot after a decode attempt, successful or not.
    pub fn finish(&mut self) {
        *self = Self::Ready;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}
