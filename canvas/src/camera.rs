#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

/// A point in canvas (screen) space, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An integer pixel position in the image's native grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageCoord {
    pub x: u32,
    pub y: u32,
}

impl ImageCoord {
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The letterbox rectangle the image occupies inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    /// Left edge of the drawn image, in canvas pixels.
    pub offset_x: f64,
    /// Top edge of the drawn image, in canvas pixels.
    pub offset_y: f64,
    /// Width of the drawn image, in canvas pixels.
    pub draw_width: f64,
    /// Height of the drawn image, in canvas pixels.
    pub draw_height: f64,
    image_width: f64,
    image_height: f64,
}

impl Fit {
    /// Canvas pixels per image pixel. Uniform, since the fit keeps the aspect ratio.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.draw_width / self.image_width
    }

    /// Map an image-space position (possibly fractional) to canvas space.
    #[must_use]
    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        Point {
            x: self.offset_x + (x / self.image_width) * self.draw_width,
            y: self.offset_y + (y / self.image_height) * self.draw_height,
        }
    }

    /// Map a canvas-space point to unrounded image-space coordinates.
    #[must_use]
    pub fn to_image(&self, screen: Point) -> (f64, f64) {
        (
            (screen.x - self.offset_x) / self.draw_width * self.image_width,
            (screen.y - self.offset_y) / self.draw_height * self.image_height,
        )
    }
}

/// Canvas and image dimensions, from which the letterbox fit is derived.
///
/// The canvas size is in canvas pixels and may change at any time (container
/// resize); the image size is the decoded raster's native resolution. Stored
/// coordinates live in image space, so a resize never invalidates them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub image_width: u32,
    pub image_height: u32,
}

impl Camera {
    #[must_use]
    pub fn new(canvas_width: f64, canvas_height: f64, image_width: u32, image_height: u32) -> Self {
        Self { canvas_width, canvas_height, image_width, image_height }
    }

    /// Compute the letterbox fit, or `None` when either rectangle is empty.
    #[must_use]
    pub fn fit(&self) -> Option<Fit> {
        let image_width = f64::from(self.image_width);
        let image_height = f64::from(self.image_height);
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) || self.image_width == 0 || self.image_height == 0 {
            return None;
        }

        let canvas_aspect = self.canvas_width / self.canvas_height;
        let image_aspect = image_width / image_height;

        let (draw_width, draw_height, offset_x, offset_y) = if image_aspect > canvas_aspect {
            let draw_height = self.canvas_width / image_aspect;
            (self.canvas_width, draw_height, 0.0, (self.canvas_height - draw_height) / 2.0)
        } else {
            let draw_width = self.canvas_height * image_aspect;
            (draw_width, self.canvas_height, (self.canvas_width - draw_width) / 2.0, 0.0)
        };

        Some(Fit { offset_x, offset_y, draw_width, draw_height, image_width, image_height })
    }

    /// Convert a canvas point to an image pixel, rejecting points outside the image.
    #[must_use]
    pub fn screen_to_image(&self, screen: Point) -> Option<ImageCoord> {
        let (x, y) = self.project(screen)?;
        let inside = x >= 0 && y >= 0 && x < i64::from(self.image_width) && y < i64::from(self.image_height);
        if !inside {
            return None;
        }
        Some(ImageCoord::new(to_u32(x), to_u32(y)))
    }

    /// Convert a canvas point to an image pixel, clamping it onto the image.
    ///
    /// Used for drag samples, which may wander into the letterbox bands.
    #[must_use]
    pub fn screen_to_image_clamped(&self, screen: Point) -> Option<ImageCoord> {
        let (x, y) = self.project(screen)?;
        let max_x = i64::from(self.image_width) - 1;
        let max_y = i64::from(self.image_height) - 1;
        Some(ImageCoord::new(to_u32(x.clamp(0, max_x)), to_u32(y.clamp(0, max_y))))
    }

    /// Convert an image pixel back to its canvas position.
    #[must_use]
    pub fn image_to_screen(&self, coord: ImageCoord) -> Option<Point> {
        let fit = self.fit()?;
        Some(fit.to_screen(f64::from(coord.x), f64::from(coord.y)))
    }

    /// Rounded image-space coordinates, unchecked against the image bounds.
    #[allow(clippy::cast_possible_truncation)]
    fn project(&self, screen: Point) -> Option<(i64, i64)> {
        let fit = self.fit()?;
        let (x, y) = fit.to_image(screen);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some((round_half_up(x) as i64, round_half_up(y) as i64))
    }
}

/// Round to nearest, with halves going towards positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Narrow a coordinate already known to be within `0..=u32::MAX`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u32(v: i64) -> u32 {
    v.clamp(0, i64::from(u32::MAX)) as u32
}
