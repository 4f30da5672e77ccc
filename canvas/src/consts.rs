//! Shared numeric and style constants for the canvas crate.

use crate::doc::HexColor;

// ── Upload ──────────────────────────────────────────────────────

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ── Markers ─────────────────────────────────────────────────────

/// Radius of a numbered marker disc, in canvas pixels.
pub const MARKER_RADIUS_PX: f32 = 6.0;

/// Width of the white ring around a marker disc.
pub const MARKER_OUTLINE_PX: f32 = 2.0;

/// Marker fill colour (`#2563EB`).
pub const MARKER_FILL: HexColor = HexColor::rgb(0x25, 0x63, 0xEB);

/// Marker outline and number colour.
pub const MARKER_INK: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);

/// Radius of a `point` annotation disc, in canvas pixels.
pub const POINT_RADIUS_PX: f32 = 4.0;

// ── Preview ─────────────────────────────────────────────────────

/// Dash and gap length of the in-progress gesture preview.
pub const PREVIEW_DASH_PX: f32 = 5.0;

// ── Stroke style ────────────────────────────────────────────────

/// Stroke colour used until the user picks another swatch.
pub const DEFAULT_STROKE_COLOR: &str = "#2563EB";

/// Default stroke width in canvas pixels.
pub const DEFAULT_STROKE_WIDTH: u8 = 2;

/// Thinnest selectable stroke.
pub const MIN_STROKE_WIDTH: u8 = 1;

/// Thickest selectable stroke.
pub const MAX_STROKE_WIDTH: u8 = 10;

/// Colour swatches offered by the tool bar.
pub const PALETTE: [&str; 10] = [
    "#2563EB", "#DC2626", "#16A34A", "#CA8A04", "#9333EA", "#EA580C", "#0891B2", "#BE185D", "#000000", "#6B7280",
];
