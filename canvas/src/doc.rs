//! Document model: markers, annotation shapes, stroke styles, and the store.
//!
//! Everything here is expressed in image space (the uploaded raster's native
//! pixel grid), never in canvas space, so the document survives any resize of
//! the host container. `PixelPoint` is a numbered marker or a freehand sample,
//! `Annotation` is a committed drawn shape, and `MarkerStore` owns both lists
//! in insertion order.
//!
//! The serde representation is the export wire format: annotations are
//! internally tagged by `type`, with camelCase field names (`endX`,
//! `strokeColor`, ...).

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::ImageCoord;
use crate::consts::{DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};

/// Errors from constructing stroke styles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// The colour string is not `#RRGGBB`.
    #[error("invalid colour {0:?}; expected #RRGGBB")]
    InvalidColor(String),
    /// The stroke width is outside the selectable range.
    #[error("stroke width {0} outside {MIN_STROKE_WIDTH}..={MAX_STROKE_WIDTH}")]
    WidthOutOfRange(u8),
}

/// A marker or path sample at an integer image-space pixel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
    pub id: String,
}

impl PixelPoint {
    #[must_use]
    pub fn new(coord: ImageCoord, id: impl Into<String>) -> Self {
        Self { x: coord.x, y: coord.y, id: id.into() }
    }

    /// Create a point with a fresh `<prefix>-<uuid>` id.
    #[must_use]
    pub fn fresh(coord: ImageCoord, prefix: &str) -> Self {
        Self::new(coord, fresh_id(prefix))
    }

    #[must_use]
    pub fn coord(&self) -> ImageCoord {
        ImageCoord::new(self.x, self.y)
    }
}

/// Generate a `<prefix>-<uuid>` identifier.
#[must_use]
pub fn fresh_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// An opaque sRGB colour, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || StyleError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)? })
    }
}

impl TryFrom<String> for HexColor {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Colour and width applied to annotations drawn from now on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: HexColor,
    pub width: u8,
}

impl StrokeStyle {
    /// Build a style, rejecting widths outside the selectable range.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::WidthOutOfRange`] for widths outside `1..=10`.
    pub fn new(color: HexColor, width: u8) -> Result<Self, StyleError> {
        check_width(width)?;
        Ok(Self { color, width })
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        let color = DEFAULT_STROKE_COLOR.parse().unwrap_or(HexColor::rgb(0x25, 0x63, 0xEB));
        Self { color, width: DEFAULT_STROKE_WIDTH }
    }
}

/// Validate a stroke width against the selectable range.
///
/// # Errors
///
/// Returns [`StyleError::WidthOutOfRange`] for widths outside `1..=10`.
pub fn check_width(width: u8) -> Result<(), StyleError> {
    if (MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(StyleError::WidthOutOfRange(width))
    }
}

/// The geometry of a committed annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// A single dot.
    Point { x: u32, y: u32 },
    /// A straight segment from `(x, y)` to `(end_x, end_y)`.
    Line {
        x: u32,
        y: u32,
        #[serde(rename = "endX")]
        end_x: u32,
        #[serde(rename = "endY")]
        end_y: u32,
    },
    /// A circle centred on `(x, y)` passing through `(end_x, end_y)`.
    Circle {
        x: u32,
        y: u32,
        #[serde(rename = "endX")]
        end_x: u32,
        #[serde(rename = "endY")]
        end_y: u32,
    },
    /// An ordered polyline of samples.
    Freehand { path: Vec<PixelPoint> },
}

impl Shape {
    /// The wire tag of this shape.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Point { .. } => "point",
            Self::Line { .. } => "line",
            Self::Circle { .. } => "circle",
            Self::Freehand { .. } => "freehand",
        }
    }

    /// Every image-space coordinate the shape references.
    #[must_use]
    pub fn coords(&self) -> Vec<ImageCoord> {
        match self {
            Self::Point { x, y } => vec![ImageCoord::new(*x, *y)],
            Self::Line { x, y, end_x, end_y } | Self::Circle { x, y, end_x, end_y } => {
                vec![ImageCoord::new(*x, *y), ImageCoord::new(*end_x, *end_y)]
            }
            Self::Freehand { path } => path.iter().map(PixelPoint::coord).collect(),
        }
    }
}

/// A committed annotation: shape plus the style active when it was drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: String,
    #[serde(flatten)]
    pub shape: Shape,
    pub stroke_color: HexColor,
    pub stroke_width: u8,
}

impl Annotation {
    /// Create an annotation with a fresh `annotation-<uuid>` id.
    #[must_use]
    pub fn new(shape: Shape, style: StrokeStyle) -> Self {
        Self { id: fresh_id("annotation"), shape, stroke_color: style.color, stroke_width: style.width }
    }

    #[must_use]
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle { color: self.stroke_color, width: self.stroke_width }
    }
}

/// In-memory store of markers and annotations, both in insertion order.
///
/// Marker numbers are positional: the marker at index `i` is number `i + 1`,
/// so removing a marker renumbers every later one.
#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<PixelPoint>,
    annotations: Vec<Annotation>,
}

impl MarkerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a marker and return its 1-based number.
    pub fn push_marker(&mut self, marker: PixelPoint) -> usize {
        self.markers.push(marker);
        self.markers.len()
    }

    /// Append a committed annotation.
    pub fn push_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Remove the marker at a 0-based index, returning it if present.
    pub fn remove_marker(&mut self, index: usize) -> Option<PixelPoint> {
        (index < self.markers.len()).then(|| self.markers.remove(index))
    }

    /// Remove an annotation by id, returning it if present.
    pub fn remove_annotation(&mut self, id: &str) -> Option<Annotation> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(index))
    }

    /// Drop every marker and annotation.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.annotations.clear();
    }

    /// Replace the whole document.
    pub fn load(&mut self, markers: Vec<PixelPoint>, annotations: Vec<Annotation>) {
        self.markers = markers;
        self.annotations = annotations;
    }

    #[must_use]
    pub fn markers(&self) -> &[PixelPoint] {
        &self.markers
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Markers paired with their 1-based display numbers.
    pub fn numbered_markers(&self) -> impl Iterator<Item = (usize, &PixelPoint)> {
        self.markers.iter().enumerate().map(|(i, m)| (i + 1, m))
    }

    /// Total number of markers and annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len() + self.annotations.len()
    }

    /// Returns `true` if the store holds neither markers nor annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.annotations.is_empty()
    }
}
