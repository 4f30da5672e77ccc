use tiny_skia::Pixmap;
use tracing::{debug, info, warn};

use crate::camera::{Camera, Point};
use crate::doc::{Annotation, HexColor, MarkerStore, PixelPoint, Shape, StrokeStyle, StyleError};
use crate::export::{ExportDocument, ExportError, ImageInfo, ImportError};
use crate::input::{Button, Gesture, InputState, Tool, UiState};
use crate::render::{self, RenderError};
use crate::upload::{ImageFile, ImageSession, UploadError, UploadSlot};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A numbered marker was committed.
    MarkerAdded { number: usize, marker: PixelPoint },
    /// A marker was removed; later markers shifted down by one.
    MarkerRemoved { index: usize, marker: PixelPoint },
    /// A drawn shape was committed.
    AnnotationAdded(Annotation),
    /// An annotation was removed.
    AnnotationRemoved(Annotation),
    /// An in-progress drag was dropped without committing.
    GestureDiscarded,
    /// A new image replaced the previous one; the document was cleared.
    ImageLoaded(ImageInfo),
    /// Markers and annotations were replaced by an import.
    DocumentImported { markers: usize, annotations: usize },
    /// Every marker and annotation was removed.
    Cleared,
    RenderNeeded,
}

/// Core engine state: all logic that doesn't own a render target.
///
/// Separated from `Engine` so pointer handling can be tested without
/// allocating pixmaps.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub doc: MarkerStore,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    image: Option<ImageSession>,
    upload: UploadSlot,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport / image ---

    /// Update the canvas size. Stored coordinates are in image space, so
    /// nothing but the next frame changes.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport_width = width;
        self.viewport_height = height;
        vec![Action::RenderNeeded]
    }

    /// Claim the upload slot for `file`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Busy`] while another upload is loading, or the
    /// file's validation error. State is unchanged on error.
    pub fn begin_upload(&mut self, file: &ImageFile) -> Result<(), UploadError> {
        if let Err(err) = self.upload.begin(file) {
            warn!(name = %file.name, mime = %file.mime, size = file.bytes.len(), error = %err, "upload rejected");
            return Err(err);
        }
        debug!(name = %file.name, size = file.bytes.len(), "upload started");
        Ok(())
    }

    /// Release the upload slot and install the decoded image on success.
    ///
    /// # Errors
    ///
    /// Passes through a decode failure; the previous image and its markers
    /// are kept in that case.
    pub fn finish_upload(&mut self, decoded: Result<ImageSession, UploadError>) -> Result<Vec<Action>, UploadError> {
        self.upload.finish();
        match decoded {
            Ok(session) => Ok(self.load_image(session)),
            Err(err) => {
                warn!(error = %err, "upload failed");
                Err(err)
            }
        }
    }

    /// Whether an upload currently holds the slot.
    #[must_use]
    pub fn upload_in_progress(&self) -> bool {
        self.upload.is_loading()
    }

    /// Replace the current image. Clears markers, annotations, and any gesture.
    pub fn load_image(&mut self, session: ImageSession) -> Vec<Action> {
        let info = session.info();
        info!(name = %info.name, width = info.size.width, height = info.size.height, "image loaded");
        self.doc.clear();
        self.input = InputState::Idle;
        self.image = Some(session);
        vec![Action::ImageLoaded(info), Action::RenderNeeded]
    }

    /// The loaded image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageSession> {
        self.image.as_ref()
    }

    /// The current canvas/image mapping, once an image is loaded.
    #[must_use]
    pub fn camera(&self) -> Option<Camera> {
        let image = self.image.as_ref()?;
        Some(Camera::new(self.viewport_width, self.viewport_height, image.width(), image.height()))
    }

    // --- Tool bar ---

    /// Set the active tool. Switching tools mid-drag discards the drag.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if self.ui.tool == tool {
            return Vec::new();
        }
        self.ui.tool = tool;
        if self.input.is_drawing() {
            return self.discard_gesture("tool changed");
        }
        Vec::new()
    }

    /// Set the colour for annotations started from now on.
    pub fn set_stroke_color(&mut self, color: HexColor) {
        self.ui.stroke.color = color;
    }

    /// Set the width for annotations started from now on.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::WidthOutOfRange`] outside `1..=10`; the current
    /// width is kept.
    pub fn set_stroke_width(&mut self, width: u8) -> Result<(), StyleError> {
        self.ui.stroke = StrokeStyle::new(self.ui.stroke.color, width)?;
        Ok(())
    }

    // --- Pointer events ---

    /// Primary press inside the image commits a marker (point tool) or starts
    /// a drag (line, circle, freehand). Anything else is ignored.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let Some(camera) = self.camera() else {
            return Vec::new();
        };
        let Some(coord) = camera.screen_to_image(screen_pt) else {
            debug!(x = screen_pt.x, y = screen_pt.y, "pointer down outside image");
            return Vec::new();
        };

        let mut actions = Vec::new();
        if self.input.is_drawing() {
            actions.extend(self.discard_gesture("new press"));
        }

        let tool = self.ui.tool;
        match Gesture::begin(tool, coord) {
            None => {
                let marker = PixelPoint::fresh(coord, "marker");
                let number = self.doc.push_marker(marker.clone());
                debug!(number, x = marker.x, y = marker.y, "marker committed");
                actions.push(Action::MarkerAdded { number, marker });
            }
            Some(gesture) => {
                debug!(%tool, x = coord.x, y = coord.y, "gesture started");
                self.input = InputState::Drawing { gesture, style: self.ui.stroke };
            }
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record a drag sample. Samples outside the image are clamped onto it.
    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let Some(camera) = self.camera() else {
            return Vec::new();
        };
        let InputState::Drawing { gesture, .. } = &mut self.input else {
            return Vec::new();
        };
        let Some(coord) = camera.screen_to_image_clamped(screen_pt) else {
            return Vec::new();
        };
        gesture.sample(coord);
        vec![Action::RenderNeeded]
    }

    /// Release commits the in-progress drag using the release position.
    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_drawing() {
            return Vec::new();
        }
        let coord = self.camera().and_then(|camera| camera.screen_to_image_clamped(screen_pt));
        let InputState::Drawing { gesture, style } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let Some(up) = coord else {
            debug!("gesture discarded: no image fit");
            return vec![Action::GestureDiscarded, Action::RenderNeeded];
        };

        let annotation = Annotation::new(gesture.finish(up), style);
        debug!(id = %annotation.id, kind = annotation.shape.kind(), "annotation committed");
        self.doc.push_annotation(annotation.clone());
        vec![Action::AnnotationAdded(annotation), Action::RenderNeeded]
    }

    /// Leaving the canvas drops the in-progress drag.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if !self.input.is_drawing() {
            return Vec::new();
        }
        self.discard_gesture("pointer left canvas")
    }

    /// The dashed preview of the in-progress drag, with its captured style.
    #[must_use]
    pub fn preview(&self) -> Option<(Shape, StrokeStyle)> {
        match &self.input {
            InputState::Idle => None,
            InputState::Drawing { gesture, style } => gesture.preview().map(|shape| (shape, *style)),
        }
    }

    // --- Editing ---

    /// Remove the marker at a 0-based index.
    pub fn remove_marker(&mut self, index: usize) -> Vec<Action> {
        match self.doc.remove_marker(index) {
            Some(marker) => {
                debug!(index, id = %marker.id, "marker removed");
                vec![Action::MarkerRemoved { index, marker }, Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Remove an annotation by id.
    pub fn remove_annotation(&mut self, id: &str) -> Vec<Action> {
        match self.doc.remove_annotation(id) {
            Some(annotation) => {
                debug!(id, "annotation removed");
                vec![Action::AnnotationRemoved(annotation), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Remove every marker and annotation and drop any drag.
    pub fn clear_all(&mut self) -> Vec<Action> {
        self.doc.clear();
        self.input = InputState::Idle;
        debug!("document cleared");
        vec![Action::Cleared, Action::RenderNeeded]
    }

    // --- Export / import ---

    /// Snapshot the document for download.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Timestamp`] if `now` cannot be formatted.
    pub fn export(&self, now: time::OffsetDateTime) -> Result<ExportDocument, ExportError> {
        ExportDocument::new(
            self.image.as_ref().map(ImageSession::info),
            self.doc.markers().to_vec(),
            self.doc.annotations().to_vec(),
            now,
        )
    }

    /// Replace markers and annotations with an exported document.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when no image is loaded or the document does
    /// not fit it. State is unchanged on error.
    pub fn import(&mut self, document: ExportDocument) -> Result<Vec<Action>, ImportError> {
        let image = self.image.as_ref().ok_or(ImportError::NoImage)?;
        document.check_fits(image.width(), image.height())?;

        let markers = document.markers.len();
        let annotations = document.annotations.len();
        self.doc.load(document.markers, document.annotations);
        self.input = InputState::Idle;
        info!(markers, annotations, "document imported");
        Ok(vec![Action::DocumentImported { markers, annotations }, Action::RenderNeeded])
    }

    fn discard_gesture(&mut self, reason: &str) -> Vec<Action> {
        self.input = InputState::Idle;
        debug!(reason, "gesture discarded");
        vec![Action::GestureDiscarded, Action::RenderNeeded]
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the raster render target.
#[derive(Default)]
pub struct Engine {
    pub core: EngineCore,
    frame: Option<Pixmap>,
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate, decode, and install an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns the validation or decode error; the previous image is kept.
    pub fn upload(&mut self, file: &ImageFile) -> Result<Vec<Action>, UploadError> {
        self.core.begin_upload(file)?;
        let decoded = ImageSession::decode(file);
        self.core.finish_upload(decoded)
    }

    // --- Delegated inputs ---

    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.core.set_viewport(width, height)
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    // --- Render ---

    /// Redraw the scene at the viewport size into the engine's frame buffer.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Allocate`] if the viewport is empty or too large.
    pub fn render(&mut self) -> Result<&Pixmap, RenderError> {
        let (width, height) = render::target_size(self.core.viewport_width, self.core.viewport_height)?;
        let reuse = self.frame.as_ref().is_some_and(|f| f.width() == width && f.height() == height);
        if !reuse {
            self.frame = Some(Pixmap::new(width, height).ok_or(RenderError::Allocate { width, height })?);
        }
        let frame = self.frame.as_mut().ok_or(RenderError::Allocate { width, height })?;
        let core = &self.core;
        render::draw(frame, &core.doc, core.image(), core.camera(), core.preview().as_ref());
        Ok(&*frame)
    }

    /// Render at the image's own resolution, one canvas pixel per image pixel.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoImage`] before an image is loaded.
    pub fn render_native(&self) -> Result<Pixmap, RenderError> {
        let image = self.core.image().ok_or(RenderError::NoImage)?;
        let (width, height) = (image.width(), image.height());
        let mut frame = Pixmap::new(width, height).ok_or(RenderError::Allocate { width, height })?;
        let camera = Camera::new(f64::from(width), f64::from(height), width, height);
        let core = &self.core;
        render::draw(&mut frame, &core.doc, Some(image), Some(camera), core.preview().as_ref());
        Ok(frame)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn camera(&self) -> Option<Camera> {
        self.core.camera()
    }

    /// Export the document stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`EngineCore::export`].
    pub fn export_now(&self) -> Result<ExportDocument, ExportError> {
        self.core.export(time::OffsetDateTime::now_utc())
    }
}
