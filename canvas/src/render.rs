//! Rendering: draws the full scene into a `tiny_skia::Pixmap`.
//!
//! This module is the only place that produces pixels. It receives read-only
//! views of the document, the loaded image, and the camera, and redraws
//! everything from scratch on every call: clear, letterboxed image, numbered
//! markers, committed annotations, then the dashed preview of the drag in
//! progress. It never mutates application state.
//!
//! Stored coordinates are image-space integers; every one is mapped through
//! the current [`Fit`] at draw time, so a resized canvas redraws correctly
//! with no migration of the document.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke,
    StrokeDash, Transform,
};

use crate::camera::{Camera, Fit, Point};
use crate::consts::{MARKER_FILL, MARKER_INK, MARKER_OUTLINE_PX, MARKER_RADIUS_PX, POINT_RADIUS_PX, PREVIEW_DASH_PX};
use crate::doc::{HexColor, MarkerStore, PixelPoint, Shape, StrokeStyle};
use crate::upload::ImageSession;

/// Side of one cell of the marker-number bitmap font, in canvas pixels.
const DIGIT_CELL_PX: f32 = 1.4;

/// Gap between adjacent digits, in canvas pixels.
const DIGIT_GAP_PX: f32 = 1.0;

/// 3x5 bitmaps for `0`..=`9`; each row uses the low three bits, MSB on the left.
const DIGIT_GLYPHS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Errors from producing a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} render target")]
    Allocate { width: u32, height: u32 },
    #[error("no image is loaded")]
    NoImage,
    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

/// Whole-pixel size of a render target for a viewport of `width` x `height`.
///
/// # Errors
///
/// Returns [`RenderError::Allocate`] for an empty or non-finite viewport.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn target_size(width: f64, height: f64) -> Result<(u32, u32), RenderError> {
    let limit = f64::from(i32::MAX);
    let valid = |v: f64| v.is_finite() && v > 0.0 && v.ceil() <= limit;
    if !valid(width) || !valid(height) {
        return Err(RenderError::Allocate { width: 0, height: 0 });
    }
    Ok((width.ceil() as u32, height.ceil() as u32))
}

/// Encode a finished frame as PNG.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if the encoder fails.
pub fn encode_png(frame: &Pixmap) -> Result<Vec<u8>, RenderError> {
    frame.encode_png().map_err(|e| RenderError::Encode(e.to_string()))
}

/// Draw the full scene.
///
/// With no camera (no image loaded) or an empty fit, the frame is only
/// cleared.
pub fn draw(
    frame: &mut Pixmap,
    doc: &MarkerStore,
    image: Option<&ImageSession>,
    camera: Option<Camera>,
    preview: Option<&(Shape, StrokeStyle)>,
) {
    // Layer 1: clear.
    frame.fill(Color::TRANSPARENT);

    let Some(fit) = camera.and_then(|c| c.fit()) else {
        return;
    };

    // Layer 2: the image, scaled into its letterbox.
    if let Some(image) = image {
        draw_image(frame, image, &fit);
    }

    // Layer 3: numbered markers.
    for (number, marker) in doc.numbered_markers() {
        draw_marker(frame, &fit, number, marker);
    }

    // Layer 4: committed annotations, in insertion order.
    for annotation in doc.annotations() {
        draw_shape(frame, &fit, &annotation.shape, annotation.style(), false);
    }

    // Layer 5: the drag in progress.
    if let Some((shape, style)) = preview {
        draw_shape(frame, &fit, shape, *style, true);
    }
}

// =============================================================
// Layers
// =============================================================

#[allow(clippy::cast_possible_truncation)]
fn draw_image(frame: &mut Pixmap, image: &ImageSession, fit: &Fit) {
    let scale = fit.scale() as f32;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, fit.offset_x as f32, fit.offset_y as f32);
    let paint = PixmapPaint { quality: FilterQuality::Bilinear, ..PixmapPaint::default() };
    frame.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
}

fn draw_marker(frame: &mut Pixmap, fit: &Fit, number: usize, marker: &PixelPoint) {
    let center = anchor(fit, marker.x, marker.y);
    let Some(disc) = PathBuilder::from_circle(center.0, center.1, MARKER_RADIUS_PX) else {
        return;
    };
    frame.fill_path(&disc, &solid(MARKER_FILL), FillRule::Winding, Transform::identity(), None);
    let ring = Stroke { width: MARKER_OUTLINE_PX, ..Stroke::default() };
    frame.stroke_path(&disc, &solid(MARKER_INK), &ring, Transform::identity(), None);
    draw_number(frame, center, number);
}

fn draw_shape(frame: &mut Pixmap, fit: &Fit, shape: &Shape, style: StrokeStyle, dashed: bool) {
    let paint = solid(style.color);
    let stroke = Stroke {
        width: f32::from(style.width),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        dash: if dashed { StrokeDash::new(vec![PREVIEW_DASH_PX, PREVIEW_DASH_PX], 0.0) } else { None },
        ..Stroke::default()
    };

    match shape {
        Shape::Point { x, y } => {
            let (cx, cy) = anchor(fit, *x, *y);
            if let Some(dot) = PathBuilder::from_circle(cx, cy, POINT_RADIUS_PX) {
                frame.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        Shape::Line { x, y, end_x, end_y } => {
            let mut pb = PathBuilder::new();
            let (x0, y0) = anchor(fit, *x, *y);
            let (x1, y1) = anchor(fit, *end_x, *end_y);
            pb.move_to(x0, y0);
            pb.line_to(x1, y1);
            if let Some(path) = pb.finish() {
                frame.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Shape::Circle { x, y, end_x, end_y } => {
            let (cx, cy) = anchor(fit, *x, *y);
            let (ex, ey) = anchor(fit, *end_x, *end_y);
            let radius = (ex - cx).hypot(ey - cy);
            if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
                frame.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Shape::Freehand { path } => {
            if path.len() < 2 {
                return;
            }
            let mut pb = PathBuilder::new();
            for (i, sample) in path.iter().enumerate() {
                let (px, py) = anchor(fit, sample.x, sample.y);
                if i == 0 {
                    pb.move_to(px, py);
                } else {
                    pb.line_to(px, py);
                }
            }
            if let Some(polyline) = pb.finish() {
                frame.stroke_path(&polyline, &paint, &stroke, Transform::identity(), None);
            }
        }
    }
}

/// White 1-based marker number, centred on the disc.
#[allow(clippy::cast_precision_loss)]
fn draw_number(frame: &mut Pixmap, center: (f32, f32), number: usize) {
    let digits: Vec<usize> = number.to_string().bytes().map(|b| usize::from(b - b'0')).collect();
    let glyph_w = 3.0 * DIGIT_CELL_PX;
    let glyph_h = 5.0 * DIGIT_CELL_PX;
    let total_w = digits.len() as f32 * (glyph_w + DIGIT_GAP_PX) - DIGIT_GAP_PX;
    let left = center.0 - total_w / 2.0;
    let top = center.1 - glyph_h / 2.0;

    let mut pb = PathBuilder::new();
    for (slot, digit) in digits.iter().enumerate() {
        let Some(rows) = DIGIT_GLYPHS.get(*digit) else {
            continue;
        };
        let origin_x = left + slot as f32 * (glyph_w + DIGIT_GAP_PX);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..3u8 {
                if bits & (0b100 >> col) == 0 {
                    continue;
                }
                let cell_x = origin_x + f32::from(col) * DIGIT_CELL_PX;
                let cell_y = top + row as f32 * DIGIT_CELL_PX;
                if let Some(cell) = Rect::from_xywh(cell_x, cell_y, DIGIT_CELL_PX, DIGIT_CELL_PX) {
                    pb.push_rect(cell);
                }
            }
        }
    }
    if let Some(path) = pb.finish() {
        frame.fill_path(&path, &solid(MARKER_INK), FillRule::Winding, Transform::identity(), None);
    }
}

// =============================================================
// Helpers
// =============================================================

/// Canvas position of an image pixel, as `f32` for tiny-skia.
#[allow(clippy::cast_possible_truncation)]
fn anchor(fit: &Fit, x: u32, y: u32) -> (f32, f32) {
    let Point { x, y } = fit.to_screen(f64::from(x), f64::from(y));
    (x as f32, y as f32)
}

fn solid(color: HexColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = true;
    paint
}
