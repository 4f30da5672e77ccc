//! Pixel-marker engine: markers and annotations over an uploaded raster image.
//!
//! The crate owns the full lifecycle of one annotation canvas: validating and
//! decoding the uploaded image, mapping pointer positions from canvas space
//! into the image's native pixel grid, running the drawing gesture state
//! machine, redrawing the scene from scratch, and exporting the result as
//! JSON. The host (the CLI, or any UI shell) only forwards pointer events and
//! reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and the testable [`engine::EngineCore`] |
//! | [`doc`] | Markers, annotation shapes, stroke styles, and the in-memory store |
//! | [`camera`] | Letterbox fit and canvas ↔ image coordinate conversions |
//! | [`input`] | Tools, pointer buttons, and the gesture state machine |
//! | [`render`] | Redraw-from-scratch raster pass into a `tiny_skia::Pixmap` |
//! | [`upload`] | File validation, decoding, and the one-upload-in-flight guard |
//! | [`export`] | JSON export document and re-import |
//! | [`consts`] | Shared constants (radii, dash lengths, upload limit, palette) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod export;
pub mod input;
pub mod render;
pub mod upload;
